use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuAction {
    Quiz,
    Learn,
    TimesTables,
    Settings,
}

pub struct MenuItem {
    pub key: char,
    pub label: &'static str,
    pub description: &'static str,
    pub action: MenuAction,
}

pub struct Menu<'a> {
    pub items: Vec<MenuItem>,
    pub selected: usize,
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(theme: &'a Theme) -> Self {
        Self {
            items: vec![
                MenuItem {
                    key: '1',
                    label: "Quiz",
                    description: "Answer problems, build a streak, earn stars",
                    action: MenuAction::Quiz,
                },
                MenuItem {
                    key: '2',
                    label: "Learn",
                    description: "Step-by-step lessons with worked examples",
                    action: MenuAction::Learn,
                },
                MenuItem {
                    key: '3',
                    label: "Times Tables",
                    description: "Look up a table from 1 to 20, then test yourself",
                    action: MenuAction::TimesTables,
                },
                MenuItem {
                    key: 's',
                    label: "Settings",
                    description: "Questions, digits, theme and sound",
                    action: MenuAction::Settings,
                },
            ],
            selected: 0,
            theme,
        }
    }

    pub fn next(&mut self) {
        self.selected = (self.selected + 1) % self.items.len();
    }

    pub fn prev(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.items.len() - 1;
        }
    }

    pub fn selected_action(&self) -> MenuAction {
        self.items[self.selected].action
    }

    /// The action bound to a shortcut key, if any.
    pub fn action_for_key(&self, key: char) -> Option<MenuAction> {
        self.items
            .iter()
            .find(|item| item.key == key)
            .map(|item| item.action)
    }
}

impl Widget for &Menu<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(5),
                Constraint::Length(1),
                Constraint::Min(0),
            ])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "\u{1f9ee} Math Kids",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Adding, taking away, times and sharing",
                Style::default().fg(colors.fg()),
            )),
            Line::from(""),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let menu_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                self.items
                    .iter()
                    .map(|_| Constraint::Length(3))
                    .collect::<Vec<_>>(),
            )
            .split(layout[2]);

        for (i, item) in self.items.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };
            let label_style = if is_selected {
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(colors.fg())
            };

            let lines = vec![
                Line::from(Span::styled(
                    format!(" {indicator} [{}] {}", item.key, item.label),
                    label_style,
                )),
                Line::from(Span::styled(
                    format!("     {}", item.description),
                    Style::default().fg(colors.muted()),
                )),
            ];

            if let Some(row) = menu_layout.get(i) {
                Paragraph::new(lines).render(*row, buf);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_menu_wraps_both_ways() {
        let theme = Theme::default();
        let mut menu = Menu::new(&theme);
        menu.prev();
        assert_eq!(menu.selected_action(), MenuAction::Settings);
        menu.next();
        assert_eq!(menu.selected_action(), MenuAction::Quiz);
    }

    #[test]
    fn test_shortcut_keys() {
        let theme = Theme::default();
        let menu = Menu::new(&theme);
        assert_eq!(menu.action_for_key('2'), Some(MenuAction::Learn));
        assert_eq!(menu.action_for_key('3'), Some(MenuAction::TimesTables));
        assert_eq!(menu.action_for_key('x'), None);
    }
}
