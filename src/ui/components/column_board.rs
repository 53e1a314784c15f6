use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Widget;

use crate::session::demo::ColumnBoard;
use crate::ui::theme::Theme;

const CELL_WIDTH: u16 = 4;
/// Carry/borrow row, top row, bottom row, rule, answer row.
pub const BOARD_HEIGHT: u16 = 5;

/// Right-aligned text for one cell.
fn cell(value: Option<u8>) -> String {
    match value {
        Some(v) => format!("{v:>4}"),
        None => "    ".to_string(),
    }
}

/// Vertical column layout of an addition or subtraction with carries,
/// borrows and the answer row.
pub struct ColumnBoardView<'a> {
    board: &'a ColumnBoard,
    theme: &'a Theme,
}

impl<'a> ColumnBoardView<'a> {
    pub fn new(board: &'a ColumnBoard, theme: &'a Theme) -> Self {
        Self { board, theme }
    }

    /// Width in cells, including the operator gutter.
    pub fn width(&self) -> u16 {
        (self.board.num_cols() as u16 + 1) * CELL_WIDTH
    }
}

impl Widget for ColumnBoardView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let board = self.board;
        if area.height < BOARD_HEIGHT || area.width < self.width() {
            return;
        }

        let left = area.x + (area.width - self.width()) / 2;
        let y = area.y;
        let base = Style::default().fg(colors.fg()).bg(colors.bg());
        let op_color = colors.operation(board.operation);

        buf.set_string(
            left,
            y + 2,
            format!("{:>3} ", board.operation.symbol()),
            base.fg(op_color).add_modifier(Modifier::BOLD),
        );
        buf.set_string(
            left,
            y + 3,
            "\u{2500}".repeat(self.width() as usize),
            base.fg(colors.border()),
        );

        for col in 0..board.num_cols() {
            let x = left + (col as u16 + 1) * CELL_WIDTH;
            let active = board.active == Some(col);
            let cell_style = if active {
                base.bg(colors.accent_dim())
            } else {
                base
            };

            let crossed = board.is_crossed(col);
            let above = if crossed {
                Some(board.top[col])
            } else {
                board.carries[col]
            };
            let above_color = if crossed { colors.borrow() } else { colors.carry() };
            buf.set_string(x, y, cell(above), cell_style.fg(above_color));

            let original = board.original_top[col];
            let top_text = if board.is_leading_blank(col, original) && !crossed {
                cell(None)
            } else {
                cell(Some(original))
            };
            let top_style = if crossed {
                cell_style
                    .fg(colors.muted())
                    .add_modifier(Modifier::CROSSED_OUT)
            } else {
                cell_style
            };
            buf.set_string(x, y + 1, top_text, top_style);

            let bottom = board.bottom[col];
            let bottom_text = if board.is_leading_blank(col, bottom) {
                cell(None)
            } else {
                cell(Some(bottom))
            };
            buf.set_string(x, y + 2, bottom_text, cell_style);

            let answer_style = if board.celebrating {
                cell_style.fg(colors.success()).add_modifier(Modifier::BOLD)
            } else {
                cell_style.fg(colors.answer()).add_modifier(Modifier::BOLD)
            };
            let answer_text = if active && board.answers[col].is_none() {
                "   ?".to_string()
            } else {
                cell(board.answers[col])
            };
            buf.set_string(x, y + 4, answer_text, answer_style);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::columns::{AddColumns, SubColumns};

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect::<String>()
    }

    #[test]
    fn test_renders_addition_with_carry() {
        let theme = Theme::default();
        let mut board = ColumnBoard::addition(&AddColumns::new(47, 35));
        board.write_carry(0, 1);
        board.write_answer(1, 2);

        let view = ColumnBoardView::new(&board, &theme);
        assert_eq!(view.width(), 12);
        let area = Rect::new(0, 0, 12, BOARD_HEIGHT);
        let mut buf = Buffer::empty(area);
        view.render(area, &mut buf);

        assert_eq!(row_text(&buf, 0).trim(), "1");
        assert_eq!(row_text(&buf, 1), "       4   7");
        assert_eq!(row_text(&buf, 2), "  +    3   5");
        assert_eq!(row_text(&buf, 4).trim(), "2");
    }

    #[test]
    fn test_borrowed_digit_shows_above() {
        let theme = Theme::default();
        let mut board = ColumnBoard::subtraction(&SubColumns::new(52, 37));
        board.borrow(1);

        let area = Rect::new(0, 0, 12, BOARD_HEIGHT);
        let mut buf = Buffer::empty(area);
        ColumnBoardView::new(&board, &theme).render(area, &mut buf);

        assert_eq!(row_text(&buf, 0), "       4  12");
        assert_eq!(row_text(&buf, 1), "       5   2");
        assert!(buf[(7, 1)].modifier.contains(Modifier::CROSSED_OUT));
    }

    #[test]
    fn test_too_small_area_draws_nothing() {
        let theme = Theme::default();
        let board = ColumnBoard::addition(&AddColumns::new(186, 247));
        let area = Rect::new(0, 0, 8, 3);
        let mut buf = Buffer::empty(area);
        ColumnBoardView::new(&board, &theme).render(area, &mut buf);
        assert_eq!(row_text(&buf, 0).trim(), "");
    }
}
