use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTier {
    Wide,   // ≥90 cols: board plus a side panel with score and streak
    Narrow, // <90 cols: board only, score folded into the header
}

impl LayoutTier {
    pub fn from_area(area: Rect) -> Self {
        if area.width >= 90 {
            LayoutTier::Wide
        } else {
            LayoutTier::Narrow
        }
    }

    pub fn show_sidebar(&self) -> bool {
        *self == LayoutTier::Wide
    }
}

pub struct AppLayout {
    pub header: Rect,
    pub main: Rect,
    pub sidebar: Option<Rect>,
    pub footer: Rect,
    pub tier: LayoutTier,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let tier = LayoutTier::from_area(area);

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(8),
                Constraint::Length(3),
            ])
            .split(area);

        if tier.show_sidebar() {
            let horizontal = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(72), Constraint::Percentage(28)])
                .split(vertical[1]);

            Self {
                header: vertical[0],
                main: horizontal[0],
                sidebar: Some(horizontal[1]),
                footer: vertical[2],
                tier,
            }
        } else {
            Self {
                header: vertical[0],
                main: vertical[1],
                sidebar: None,
                footer: vertical[2],
                tier,
            }
        }
    }
}

/// Packs key hints into as few footer lines as fit `width`.
pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = "  ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints.iter().filter(|h| !h.is_empty()) {
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width {
            current = candidate;
        } else {
            if has_hint {
                out.push(current);
            }
            current = format!("{prefix}{hint}");
        }
        has_hint = true;
    }

    if has_hint {
        out.push(current);
    }
    out
}

pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    const MIN_POPUP_WIDTH: u16 = 48;
    const MIN_POPUP_HEIGHT: u16 = 14;

    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(MIN_POPUP_WIDTH).min(area.width);
    let target_h = requested_h.max(MIN_POPUP_HEIGHT).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_threshold() {
        assert_eq!(LayoutTier::from_area(Rect::new(0, 0, 120, 40)), LayoutTier::Wide);
        assert_eq!(LayoutTier::from_area(Rect::new(0, 0, 89, 40)), LayoutTier::Narrow);
    }

    #[test]
    fn test_wide_layout_has_sidebar() {
        let layout = AppLayout::new(Rect::new(0, 0, 100, 30));
        assert!(layout.sidebar.is_some());
        assert_eq!(layout.header.height, 3);
        assert_eq!(layout.footer.height, 3);

        let narrow = AppLayout::new(Rect::new(0, 0, 60, 30));
        assert!(narrow.sidebar.is_none());
        assert_eq!(narrow.main.width, 60);
    }

    #[test]
    fn test_pack_hint_lines_wraps() {
        let hints = ["[Enter] Check", "[b] Borrow", "[Esc] Menu"];
        let one = pack_hint_lines(&hints, 80);
        assert_eq!(one, vec!["  [Enter] Check  [b] Borrow  [Esc] Menu".to_string()]);

        let wrapped = pack_hint_lines(&hints, 30);
        assert_eq!(wrapped.len(), 2);
        assert!(wrapped[0].starts_with("  [Enter] Check"));
        assert!(pack_hint_lines(&hints, 0).is_empty());
        assert!(pack_hint_lines(&["", ""], 40).is_empty());
    }

    #[test]
    fn test_centered_rect_clamps_to_area() {
        let area = Rect::new(0, 0, 40, 10);
        let popup = centered_rect(50, 50, area);
        assert_eq!(popup, Rect::new(0, 0, 40, 10));

        let big = centered_rect(50, 50, Rect::new(0, 0, 200, 60));
        assert_eq!(big.width, 100);
        assert_eq!(big.height, 30);
        assert_eq!(big.x, 50);
        assert_eq!(big.y, 15);
    }
}
