use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::app::MenuEntry;
use crate::ui::theme::Theme;

pub struct MenuItem {
    pub key: String,
    pub label: String,
    pub description: String,
}

impl MenuItem {
    fn from_entry(index: usize, entry: MenuEntry) -> Self {
        let (key, label, description) = match entry {
            MenuEntry::Play(mode) => (
                (index + 1).to_string(),
                mode.label().to_string(),
                mode.description().to_string(),
            ),
            MenuEntry::GalaxyMap => (
                "g".to_string(),
                "Galaxy Map".to_string(),
                "See which planets your words have unlocked".to_string(),
            ),
            MenuEntry::Settings => (
                "c".to_string(),
                "Settings".to_string(),
                "Sound and progress".to_string(),
            ),
            MenuEntry::Quit => ("q".to_string(), "Quit".to_string(), String::new()),
        };
        Self {
            key,
            label,
            description,
        }
    }
}

pub struct Menu<'a> {
    pub items: Vec<MenuItem>,
    pub selected: usize,
    pub theme: &'a Theme,
}

impl<'a> Menu<'a> {
    pub fn new(entries: &[MenuEntry], selected: usize, theme: &'a Theme) -> Self {
        Self {
            items: entries
                .iter()
                .enumerate()
                .map(|(i, e)| MenuItem::from_entry(i, *e))
                .collect(),
            selected,
            theme,
        }
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
            .constraints([Constraint::Length(4), Constraint::Min(0)])
            .split(inner);

        let title_lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "🚀 vocab-quest",
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Translate your way across the galaxy",
                Style::default().fg(colors.fg()),
            )),
        ];
        Paragraph::new(title_lines)
            .alignment(Alignment::Center)
            .render(layout[0], buf);

        let row_height = if layout[1].height as usize >= self.items.len() * 2 { 2 } else { 1 };
        let menu_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                self.items
                    .iter()
                    .map(|_| Constraint::Length(row_height))
                    .collect::<Vec<_>>(),
            )
            .split(layout[1]);

        for (i, item) in self.items.iter().enumerate() {
            let is_selected = i == self.selected;
            let indicator = if is_selected { ">" } else { " " };
            let label_text = format!(" {indicator} [{}] {}", item.key, item.label);

            let mut lines = vec![Line::from(Span::styled(
                label_text,
                Style::default()
                    .fg(if is_selected { colors.accent() } else { colors.fg() })
                    .add_modifier(if is_selected {
                        Modifier::BOLD
                    } else {
                        Modifier::empty()
                    }),
            ))];
            if row_height > 1 && !item.description.is_empty() {
                lines.push(Line::from(Span::styled(
                    format!("       {}", item.description),
                    Style::default().fg(colors.muted()),
                )));
            }

            if let Some(row) = menu_layout.get(i) {
                Paragraph::new(lines).render(*row, buf);
            }
        }
    }
}
