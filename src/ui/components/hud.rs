use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::Session;
use crate::session::mode::SURVIVAL_LIVES;
use crate::ui::theme::Theme;

/// Score, streak and mode-specific counters for the running session.
pub struct Hud<'a> {
    pub session: &'a Session,
    pub theme: &'a Theme,
}

impl<'a> Hud<'a> {
    pub fn new(session: &'a Session, theme: &'a Theme) -> Self {
        Self { session, theme }
    }

    fn lives_text(lives: u32) -> String {
        let lost = SURVIVAL_LIVES.saturating_sub(lives) as usize;
        format!("{}{}", "♥".repeat(lives as usize), "♡".repeat(lost))
    }
}

impl Widget for Hud<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let s = self.session;

        let block = Block::bordered()
            .title(format!(" {} ", s.mode.label()))
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let label = Style::default().fg(colors.muted());
        let value = Style::default()
            .fg(colors.fg())
            .add_modifier(Modifier::BOLD);

        let mut spans = vec![
            Span::styled(" Score ", label),
            Span::styled(s.score.to_string(), value.fg(colors.accent())),
        ];

        if let Some(board) = &s.matching {
            spans.push(Span::styled("   Pairs ", label));
            spans.push(Span::styled(
                format!("{}/{}", board.matched_pairs, board.total_pairs),
                value,
            ));
            spans.push(Span::styled("   Moves ", label));
            spans.push(Span::styled(board.moves.to_string(), value));
        } else {
            spans.push(Span::styled("   Round ", label));
            spans.push(Span::styled(
                format!("{}/{}", s.round_number(), s.word_sequence.len()),
                value,
            ));
            spans.push(Span::styled("   Streak ", label));
            spans.push(Span::styled(s.streak.to_string(), value));
        }

        if let Some(tier) = s.combo() {
            spans.push(Span::raw("   "));
            spans.push(Span::styled(
                format!("🔥 {}", tier.label()),
                Style::default()
                    .fg(colors.warning())
                    .add_modifier(Modifier::BOLD),
            ));
        }

        if let Some(lives) = s.lives {
            spans.push(Span::raw("   "));
            spans.push(Span::styled(
                Self::lives_text(lives),
                Style::default().fg(colors.error()),
            ));
        }

        if let Some(secs) = s.time_left {
            let color = if secs <= 5 {
                colors.error()
            } else {
                colors.fg()
            };
            spans.push(Span::styled("   ⏱ ", label));
            spans.push(Span::styled(format!("{secs}s"), value.fg(color)));
        }

        Paragraph::new(Line::from(spans)).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lives_show_lost_hearts() {
        assert_eq!(Hud::lives_text(3), "♥♥♥");
        assert_eq!(Hud::lives_text(1), "♥♡♡");
        assert_eq!(Hud::lives_text(0), "♡♡♡");
    }
}
