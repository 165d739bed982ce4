use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::achievements::AchievementDefinition;
use crate::session::{HistoryEntry, SessionOutcome};
use crate::ui::theme::Theme;

pub struct Dashboard<'a> {
    pub outcome: &'a SessionOutcome,
    pub history: &'a [HistoryEntry],
    pub unlocked: &'a [&'static AchievementDefinition],
    pub theme: &'a Theme,
}

impl<'a> Dashboard<'a> {
    pub fn new(
        outcome: &'a SessionOutcome,
        history: &'a [HistoryEntry],
        unlocked: &'a [&'static AchievementDefinition],
        theme: &'a Theme,
    ) -> Self {
        Self {
            outcome,
            history,
            unlocked,
            theme,
        }
    }
}

impl Widget for Dashboard<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let outcome = self.outcome;

        let block = Block::bordered()
            .title(" Mission Report ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let achievement_rows = if self.unlocked.is_empty() {
            0
        } else {
            self.unlocked.len() as u16 + 1
        };
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(2),
                Constraint::Length(5),
                Constraint::Length(achievement_rows),
                Constraint::Min(0),
            ])
            .split(inner);

        let (headline, headline_color) = if outcome.won {
            ("Mission accomplished! 🚀", colors.success())
        } else {
            ("Mission failed. Regroup, Cadet.", colors.error())
        };
        Paragraph::new(Line::from(Span::styled(
            headline,
            Style::default()
                .fg(headline_color)
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        let label = Style::default().fg(colors.fg());
        let value = Style::default()
            .fg(colors.accent())
            .add_modifier(Modifier::BOLD);

        let accuracy = outcome.accuracy();
        let acc_color = if accuracy >= 80.0 {
            colors.success()
        } else if accuracy >= 50.0 {
            colors.warning()
        } else {
            colors.error()
        };

        let mut stats = vec![
            Line::from(vec![
                Span::styled("  Score:       ", label),
                Span::styled(outcome.score.to_string(), value),
            ]),
            Line::from(vec![
                Span::styled("  Best streak: ", label),
                Span::styled(outcome.best_streak.to_string(), value),
            ]),
        ];
        if let Some(moves) = outcome.moves {
            stats.push(Line::from(vec![
                Span::styled("  Moves:       ", label),
                Span::styled(moves.to_string(), value),
            ]));
        } else {
            stats.push(Line::from(vec![
                Span::styled("  Accuracy:    ", label),
                Span::styled(
                    format!("{accuracy:.0}%"),
                    Style::default().fg(acc_color).add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    format!("  ({}/{} correct)", outcome.correct, outcome.rounds),
                    Style::default().fg(colors.muted()),
                ),
            ]));
        }
        if let Some(secs) = outcome.elapsed_secs {
            stats.push(Line::from(vec![
                Span::styled("  Time:        ", label),
                Span::styled(format!("{secs}s"), value),
            ]));
        }
        Paragraph::new(stats).render(layout[1], buf);

        if !self.unlocked.is_empty() {
            let mut lines = vec![Line::from(Span::styled(
                "  Achievements unlocked:",
                Style::default()
                    .fg(colors.warning())
                    .add_modifier(Modifier::BOLD),
            ))];
            lines.extend(self.unlocked.iter().map(|a| {
                Line::from(vec![
                    Span::styled(format!("    🏆 {}", a.title), value),
                    Span::styled(
                        format!("  {}", a.description),
                        Style::default().fg(colors.muted()),
                    ),
                ])
            }));
            Paragraph::new(lines).render(layout[2], buf);
        }

        // Most recent answers first, as many as fit.
        let rows = layout[3].height as usize;
        let history: Vec<Line> = self
            .history
            .iter()
            .rev()
            .take(rows)
            .map(|entry| {
                let (mark, color) = if entry.was_correct {
                    ("✓", colors.success())
                } else {
                    ("✗", colors.error())
                };
                Line::from(vec![
                    Span::styled(format!("  {mark} "), Style::default().fg(color)),
                    Span::styled(
                        format!("{} → {}", entry.word.source, entry.word.target),
                        label,
                    ),
                    Span::styled(
                        format!("  ({})", entry.user_answer),
                        Style::default().fg(colors.muted()),
                    ),
                ])
            })
            .collect();
        Paragraph::new(history).render(layout[3], buf);
    }
}
