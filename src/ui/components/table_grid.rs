use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::operation::Operation;
use crate::session::tables::{BASES, TableRow};
use crate::ui::theme::Theme;

pub const GRID_COLUMNS: u32 = 5;

/// Moves the base selection around a grid of [`GRID_COLUMNS`] per row,
/// clamped to [`BASES`].
pub fn step_base(base: u32, dx: i32, dy: i32) -> u32 {
    let offset = dx + dy * GRID_COLUMNS as i32;
    let next = base as i32 + offset;
    if BASES.contains(&(next.max(0) as u32)) {
        next as u32
    } else {
        base
    }
}

/// Picker for the table to study: 1 to 20 in rows of five.
pub struct TableGrid<'a> {
    pub selected: u32,
    pub theme: &'a Theme,
}

impl Widget for TableGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .title(" Pick a times table ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let bases: Vec<u32> = BASES.collect();
        let mut lines = vec![Line::from("")];
        for row in bases.chunks(GRID_COLUMNS as usize) {
            let spans: Vec<Span> = row
                .iter()
                .map(|&base| {
                    let label = format!("  {base:>2} \u{00d7}  ");
                    if base == self.selected {
                        Span::styled(
                            label,
                            Style::default()
                                .fg(colors.bg())
                                .bg(colors.operation(Operation::Multiply))
                                .add_modifier(Modifier::BOLD),
                        )
                    } else {
                        Span::styled(label, Style::default().fg(colors.fg()))
                    }
                })
                .collect();
            lines.push(Line::from(spans));
            lines.push(Line::from(""));
        }
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}

/// Reference listing `n × 1` to `n × 10`.
pub struct TableReference<'a> {
    pub rows: &'a [TableRow],
    pub theme: &'a Theme,
}

impl Widget for TableReference<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let base = self.rows.first().map_or(0, |r| r.base);
        let block = Block::bordered()
            .title(format!(" {base} Times Table "))
            .border_style(Style::default().fg(colors.operation(Operation::Multiply)))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let mut lines = vec![Line::from("")];
        lines.extend(self.rows.iter().map(|row| {
            Line::from(vec![
                Span::styled(
                    format!("{:>2} \u{00d7} {:>2} = ", row.base, row.multiplier),
                    Style::default().fg(colors.fg()),
                ),
                Span::styled(
                    format!("{:>3}", row.product),
                    Style::default()
                        .fg(colors.answer())
                        .add_modifier(Modifier::BOLD),
                ),
            ])
        }));
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_base_moves_in_grid() {
        assert_eq!(step_base(7, 1, 0), 8);
        assert_eq!(step_base(7, 0, 1), 12);
        assert_eq!(step_base(7, 0, -1), 2);
        assert_eq!(step_base(1, -1, 0), 1);
        assert_eq!(step_base(3, 0, -1), 3);
        assert_eq!(step_base(18, 0, 1), 18);
        assert_eq!(step_base(20, 1, 0), 20);
    }
}
