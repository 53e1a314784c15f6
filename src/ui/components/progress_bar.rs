use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Widget};

use crate::ui::theme::Theme;

/// Bordered one-line bar. The caption is centred on the bar itself,
/// e.g. "Problem 3 of 10" or "Step 2 of 6".
pub struct ProgressBar<'a> {
    pub title: &'a str,
    pub caption: &'a str,
    pub ratio: f64,
    pub fill: Option<Color>,
    pub theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(title: &'a str, caption: &'a str, ratio: f64, theme: &'a Theme) -> Self {
        Self {
            title,
            caption,
            ratio: ratio.clamp(0.0, 1.0),
            fill: None,
            theme,
        }
    }

    pub fn fill(mut self, color: Color) -> Self {
        self.fill = Some(color);
        self
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(format!(" {} ", self.title))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let fill = self.fill.unwrap_or_else(|| colors.bar_filled());
        let filled_width = (self.ratio * inner.width as f64).round() as u16;

        for x in inner.x..inner.x + inner.width {
            let style = if x < inner.x + filled_width {
                Style::default().fg(colors.bg()).bg(fill)
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, inner.y)].set_style(style);
        }

        let caption_len = self.caption.chars().count() as u16;
        let caption_x = inner.x + (inner.width.saturating_sub(caption_len)) / 2;
        buf.set_stringn(
            caption_x,
            inner.y,
            self.caption,
            inner.width as usize,
            Style::default().fg(colors.fg()),
        );
    }
}
