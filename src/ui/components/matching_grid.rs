use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::matching::{Card, MatchingBoard};
use crate::ui::theme::Theme;

pub const GRID_COLUMNS: usize = 4;

pub struct MatchingGrid<'a> {
    board: &'a MatchingBoard,
    selected: usize,
    theme: &'a Theme,
}

impl<'a> MatchingGrid<'a> {
    pub fn new(board: &'a MatchingBoard, selected: usize, theme: &'a Theme) -> Self {
        Self {
            board,
            selected,
            theme,
        }
    }

    fn face(card: &Card) -> &str {
        if card.flipped || card.matched {
            &card.content
        } else {
            "?"
        }
    }
}

/// Index reached by moving `delta_rows` rows from `index` in a grid of `len` cards.
pub fn row_step(index: usize, delta_rows: isize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let target = index as isize + delta_rows * GRID_COLUMNS as isize;
    if target < 0 || target >= len as isize {
        index
    } else {
        target as usize
    }
}

impl Widget for MatchingGrid<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let cards = &self.board.cards;
        let rows = cards.len().div_ceil(GRID_COLUMNS).max(1);

        let row_areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints(
                (0..rows)
                    .map(|_| Constraint::Ratio(1, rows as u32))
                    .collect::<Vec<_>>(),
            )
            .split(area);

        for (row, row_area) in row_areas.iter().enumerate() {
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(
                    (0..GRID_COLUMNS)
                        .map(|_| Constraint::Ratio(1, GRID_COLUMNS as u32))
                        .collect::<Vec<_>>(),
                )
                .split(*row_area);

            for (col, cell) in cells.iter().enumerate() {
                let index = row * GRID_COLUMNS + col;
                let Some(card) = cards.get(index) else {
                    continue;
                };
                let is_selected = index == self.selected;

                let (border, text) = if card.matched {
                    (colors.success(), colors.success())
                } else if card.flipped {
                    (colors.accent(), colors.card_face())
                } else {
                    (colors.card_back(), colors.muted())
                };
                let mut border_style = Style::default().fg(border);
                if is_selected {
                    border_style = border_style.fg(colors.warning()).add_modifier(Modifier::BOLD);
                }

                let block = Block::bordered()
                    .title(format!(" {} ", index + 1))
                    .border_style(border_style);
                let inner = block.inner(*cell);
                block.render(*cell, buf);

                let mut style = Style::default().fg(text);
                if card.flipped && !card.matched {
                    style = style.add_modifier(Modifier::BOLD);
                }
                let pad = inner.height.saturating_sub(1) / 2;
                let mut lines = vec![Line::from(""); pad as usize];
                lines.push(Line::from(Span::styled(Self::face(card).to_string(), style)));
                Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .render(inner, buf);
            }
        }
    }
}
