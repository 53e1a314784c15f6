use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::result::{QuizSummary, TableSummary};
use crate::ui::theme::Theme;

/// `filled` gold stars followed by hollow ones up to `out_of`.
pub fn star_row(filled: u32, out_of: u32) -> String {
    let filled = filled.min(out_of);
    let mut s = "\u{2605}".repeat(filled as usize);
    s.push_str(&"\u{2606}".repeat((out_of - filled) as usize));
    s
}

enum Summary<'a> {
    Quiz(&'a QuizSummary),
    Table(&'a TableSummary),
}

/// End-of-session results card for a quiz or a times-table quiz.
pub struct Dashboard<'a> {
    summary: Summary<'a>,
    theme: &'a Theme,
}

impl<'a> Dashboard<'a> {
    pub fn quiz(summary: &'a QuizSummary, theme: &'a Theme) -> Self {
        Self {
            summary: Summary::Quiz(summary),
            theme,
        }
    }

    pub fn table(summary: &'a TableSummary, theme: &'a Theme) -> Self {
        Self {
            summary: Summary::Table(summary),
            theme,
        }
    }
}

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let (title, stars, headline, percentage, message, detail, positive) = match self.summary {
            Summary::Quiz(s) => (
                format!(" {} Quiz Complete ", s.operation.label()),
                star_row(s.stars, 5),
                s.headline(),
                s.percentage,
                s.message(),
                Some(format!("Best streak: {}   Level: {}", s.best_streak, s.level.label())),
                s.tier.is_positive(),
            ),
            Summary::Table(s) => (
                format!(" {} Times Table ", s.base),
                star_row(s.stars(), 3),
                format!("You got {} out of {}", s.score, s.total),
                f64::from(s.percentage),
                s.message(),
                None,
                s.stars() > 0,
            ),
        };

        let block = Block::bordered()
            .title(title)
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Length(2),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            stars,
            Style::default()
                .fg(colors.warning())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[1], buf);

        let pct_color: Color = if percentage >= 80.0 {
            colors.success()
        } else if percentage >= 50.0 {
            colors.warning()
        } else {
            colors.error()
        };
        Paragraph::new(Line::from(vec![
            Span::styled(
                headline,
                Style::default().fg(colors.fg()).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  ({percentage:.0}%)"),
                Style::default().fg(pct_color),
            ),
        ]))
        .alignment(Alignment::Center)
        .render(layout[2], buf);

        Paragraph::new(Line::from(Span::styled(
            message,
            Style::default().fg(if positive { colors.success() } else { colors.accent() }),
        )))
        .alignment(Alignment::Center)
        .render(layout[3], buf);

        if let Some(detail) = detail {
            Paragraph::new(Line::from(Span::styled(
                detail,
                Style::default().fg(colors.muted()),
            )))
            .alignment(Alignment::Center)
            .render(layout[4], buf);
        }

        Paragraph::new(Line::from(vec![
            Span::styled("[r] Play again  ", Style::default().fg(colors.accent())),
            Span::styled("[Enter/Esc] Menu", Style::default().fg(colors.accent())),
        ]))
        .alignment(Alignment::Center)
        .render(layout[6], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_star_row() {
        assert_eq!(star_row(3, 5), "\u{2605}\u{2605}\u{2605}\u{2606}\u{2606}");
        assert_eq!(star_row(0, 3), "\u{2606}\u{2606}\u{2606}");
        assert_eq!(star_row(7, 3), "\u{2605}\u{2605}\u{2605}");
    }
}
