use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::engine::operation::Operation;
use crate::session::demo::{DemoBoard, DemoState};
use crate::session::lesson::StepState;
use crate::session::plan::Page;
use crate::session::try_it::Exercise;
use crate::ui::components::column_board::{BOARD_HEIGHT, ColumnBoardView};
use crate::ui::theme::Theme;

const DOT: &str = "\u{25cf}";

fn dots(n: u32) -> String {
    vec![DOT; n as usize].join(" ")
}

/// Text picture of a grouping, sharing or break-apart board. Column boards
/// are drawn by [`ColumnBoardView`] instead and yield no lines.
pub fn visual_lines(board: &DemoBoard) -> Vec<String> {
    let mut lines = Vec::new();
    match *board {
        DemoBoard::Columns(_) => {}
        DemoBoard::Groups {
            per_group, shown, ..
        } => {
            for i in 0..shown {
                lines.push(format!("Group {}: ( {} )", i + 1, dots(per_group)));
            }
        }
        DemoBoard::BreakApart {
            a,
            b,
            split,
            tens_solved,
            ones_solved,
            combined,
        } => {
            let tens = a / 10 * 10;
            let ones = a % 10;
            let times = Operation::Multiply.symbol();
            lines.push(format!("{a} {times} {b}"));
            if split {
                lines.push(format!("= ({tens} {times} {b}) + ({ones} {times} {b})"));
            }
            if tens_solved {
                lines.push(format!("{tens} {times} {b} = {}", tens * b));
            }
            if ones_solved {
                lines.push(format!("{ones} {times} {b} = {}", ones * b));
            }
            if combined {
                lines.push(format!("{} + {} = {}", tens * b, ones * b, a * b));
            }
        }
        DemoBoard::Sharing { plates, each, .. } => {
            let left = board.pile_left().unwrap_or(0);
            lines.push(format!("Pile ({left}): {}", dots(left)));
            for plate in 0..plates {
                lines.push(format!("Plate {}: [ {} ]", plate + 1, dots(each)));
            }
        }
        DemoBoard::Grouping {
            per_group, made, ..
        } => {
            let left = board.pile_left().unwrap_or(0);
            lines.push(format!("Pile ({left}): {}", dots(left)));
            for group in 0..made {
                lines.push(format!("Group {}: ( {} )", group + 1, dots(per_group)));
            }
        }
    }
    lines
}

/// Body of the lesson screen: the active step's page, demo or exercise.
pub struct LessonPanel<'a> {
    step: &'a StepState,
    input: &'a str,
    theme: &'a Theme,
}

impl<'a> LessonPanel<'a> {
    pub fn new(step: &'a StepState, input: &'a str, theme: &'a Theme) -> Self {
        Self { step, input, theme }
    }

    fn render_page(&self, page: &Page, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let mut lines = vec![
            Line::from(Span::styled(
                format!("{}  {}", page.mascot, page.title),
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];
        for text in &page.lines {
            lines.push(Line::from(Span::styled(text.as_str(), Style::default().fg(colors.fg()))));
            lines.push(Line::from(""));
        }
        lines.push(Line::from(Span::styled(
            page.call_to_action.as_str(),
            Style::default().fg(colors.success()),
        )));
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(area, buf);
    }

    fn render_demo(&self, demo: &DemoState, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let visual = visual_lines(&demo.board);
        let board_height = match demo.board {
            DemoBoard::Columns(_) => BOARD_HEIGHT,
            _ => visual.len() as u16,
        };

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(board_height),
                Constraint::Length(1),
                Constraint::Min(2),
                Constraint::Length(1),
            ])
            .split(area);

        Paragraph::new(Line::from(Span::styled(
            demo.title.as_str(),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        match &demo.board {
            DemoBoard::Columns(board) => {
                ColumnBoardView::new(board, self.theme).render(layout[1], buf);
            }
            _ => {
                let lines: Vec<Line> = visual
                    .into_iter()
                    .map(|l| Line::from(Span::styled(l, Style::default().fg(colors.answer()))))
                    .collect();
                Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .render(layout[1], buf);
            }
        }

        let mut speech = vec![Line::from(Span::styled(
            format!("\u{1f5e3} {}", demo.speech),
            Style::default().fg(colors.fg()),
        ))];
        if let Some(eq) = &demo.equation {
            speech.push(Line::from(Span::styled(
                eq.as_str(),
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            )));
        }
        Paragraph::new(speech)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(layout[3], buf);

        let footer = if demo.done {
            Span::styled("\u{2714} Done! Press Next \u{2192}", Style::default().fg(colors.success()))
        } else {
            Span::styled(
                format!("[Space] Show me the next step ({} left)", demo.remaining()),
                Style::default().fg(colors.muted()),
            )
        };
        Paragraph::new(Line::from(footer))
            .alignment(Alignment::Center)
            .render(layout[4], buf);
    }

    fn render_exercise(&self, exercise: &Exercise, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let board_height = match exercise {
            Exercise::Columns(_) => BOARD_HEIGHT,
            Exercise::Single(_) => 0,
        };

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(board_height),
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(1),
            ])
            .split(area);

        Paragraph::new(Line::from(Span::styled(
            exercise.title(),
            Style::default()
                .fg(colors.accent())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        if let Exercise::Columns(ex) = exercise {
            ColumnBoardView::new(&ex.board, self.theme).render(layout[1], buf);
        }

        let mut lines = Vec::new();
        let prompt = exercise.prompt();
        if !prompt.is_empty() {
            lines.push(Line::from(Span::styled(prompt, Style::default().fg(colors.fg()))));
        }
        if let Exercise::Single(shot) = exercise {
            if let Some(think) = shot.think_line() {
                lines.push(Line::from(Span::styled(think, Style::default().fg(colors.muted()))));
            }
        }
        if let Some(notice) = exercise.feedback() {
            lines.push(Line::from(Span::styled(
                notice.text.as_str(),
                Style::default()
                    .fg(colors.tone(notice.tone))
                    .add_modifier(Modifier::BOLD),
            )));
        }
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true })
            .render(layout[3], buf);

        let input_line = if exercise.is_complete() {
            Line::from(Span::styled(
                "\u{2714} Press Next \u{2192}",
                Style::default().fg(colors.success()),
            ))
        } else if exercise.awaiting_borrow() {
            Line::from(Span::styled(
                "[b] Borrow from the next column",
                Style::default()
                    .fg(colors.borrow())
                    .add_modifier(Modifier::BOLD),
            ))
        } else {
            Line::from(vec![
                Span::styled("Your answer: ", Style::default().fg(colors.fg())),
                Span::styled(
                    format!("{}_", self.input),
                    Style::default()
                        .fg(colors.answer())
                        .add_modifier(Modifier::BOLD),
                ),
            ])
        };
        Paragraph::new(input_line)
            .alignment(Alignment::Center)
            .render(layout[4], buf);
    }
}

impl Widget for LessonPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border_focused()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        match self.step {
            StepState::Static(page) => self.render_page(page, inner, buf),
            StepState::Demo(demo) => self.render_demo(demo, inner, buf),
            StepState::TryIt(exercise) => self.render_exercise(exercise, inner, buf),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_visual() {
        let board = DemoBoard::Groups {
            groups: 3,
            per_group: 4,
            shown: 2,
        };
        let lines = visual_lines(&board);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "Group 2: ( \u{25cf} \u{25cf} \u{25cf} \u{25cf} )");
    }

    #[test]
    fn test_break_apart_visual_builds_up() {
        let board = DemoBoard::BreakApart {
            a: 12,
            b: 3,
            split: true,
            tens_solved: true,
            ones_solved: true,
            combined: true,
        };
        let lines = visual_lines(&board);
        assert_eq!(lines[0], "12 \u{00d7} 3");
        assert_eq!(lines[1], "= (10 \u{00d7} 3) + (2 \u{00d7} 3)");
        assert_eq!(lines[4], "30 + 6 = 36");
    }

    #[test]
    fn test_sharing_visual_counts_pile() {
        let board = DemoBoard::Sharing {
            total: 12,
            plates: 3,
            each: 2,
        };
        let lines = visual_lines(&board);
        assert!(lines[0].starts_with("Pile (6):"));
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[3], "Plate 3: [ \u{25cf} \u{25cf} ]");
    }

    #[test]
    fn test_demo_panel_renders_title() {
        let theme = Theme::default();
        let step = StepState::Demo(DemoState::columns(Operation::Add, 47, 35));
        let area = Rect::new(0, 0, 60, 20);
        let mut buf = Buffer::empty(area);
        LessonPanel::new(&step, "", &theme).render(area, &mut buf);
        let text: String = (0..area.height)
            .flat_map(|y| (0..area.width).map(move |x| (x, y)))
            .map(|(x, y)| buf[(x, y)].symbol().to_string())
            .collect();
        assert!(text.contains("Watch: 47 + 35"));
    }
}
