use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget, Wrap};

use crate::remark::{Remark, RemarkKind};
use crate::session::{InputKind, Session};
use crate::ui::theme::Theme;

/// Prompt, answer entry and round feedback for the translation modes.
pub struct QuizArea<'a> {
    session: &'a Session,
    input: &'a str,
    option_selected: usize,
    remark: Option<&'a Remark>,
    theme: &'a Theme,
}

impl<'a> QuizArea<'a> {
    pub fn new(
        session: &'a Session,
        input: &'a str,
        option_selected: usize,
        remark: Option<&'a Remark>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            session,
            input,
            option_selected,
            remark,
            theme,
        }
    }

    fn answer_lines(&self) -> Vec<Line<'a>> {
        let colors = &self.theme.colors;
        let s = self.session;
        let answered = !s.is_awaiting_answer();

        match s.mode.input() {
            InputKind::MultipleChoice => {
                let expected = s
                    .current_word()
                    .map(|w| w.option_label(s.direction()).to_string());
                let picked = s.history.last().map(|h| h.user_answer.as_str());
                s.options
                    .iter()
                    .enumerate()
                    .map(|(i, option)| {
                        let is_expected = expected.as_deref() == Some(option.as_str());
                        let style = if answered && is_expected {
                            Style::default()
                                .fg(colors.success())
                                .add_modifier(Modifier::BOLD)
                        } else if answered && picked == Some(option.as_str()) {
                            Style::default().fg(colors.error())
                        } else if !answered && i == self.option_selected {
                            Style::default()
                                .fg(colors.accent())
                                .add_modifier(Modifier::BOLD)
                        } else {
                            Style::default().fg(colors.fg())
                        };
                        let marker = if !answered && i == self.option_selected {
                            ">"
                        } else {
                            " "
                        };
                        Line::from(Span::styled(format!("{marker} [{}] {option}", i + 1), style))
                    })
                    .collect()
            }
            _ => {
                let shown = if answered {
                    s.history
                        .last()
                        .map(|h| h.user_answer.clone())
                        .unwrap_or_default()
                } else {
                    format!("{}▏", self.input)
                };
                vec![Line::from(vec![
                    Span::styled("› ", Style::default().fg(colors.accent())),
                    Span::styled(
                        shown,
                        Style::default()
                            .fg(colors.fg())
                            .add_modifier(Modifier::BOLD),
                    ),
                ])]
            }
        }
    }

    fn judgement_line(&self) -> Option<Line<'a>> {
        let colors = &self.theme.colors;
        let s = self.session;
        let correct = s.last_judgement?;
        let line = if correct {
            Line::from(Span::styled(
                "✓ Correct!",
                Style::default()
                    .fg(colors.success())
                    .add_modifier(Modifier::BOLD),
            ))
        } else {
            let answer = s
                .current_word()
                .map(|w| w.answer(s.direction()).to_string())
                .unwrap_or_default();
            Line::from(vec![
                Span::styled(
                    "✗ The answer was ",
                    Style::default().fg(colors.error()),
                ),
                Span::styled(
                    answer,
                    Style::default()
                        .fg(colors.fg())
                        .add_modifier(Modifier::BOLD),
                ),
            ])
        };
        Some(line)
    }

    fn remark_line(&self) -> Option<Line<'a>> {
        let remark = self.remark?;
        let icon = match remark.kind {
            RemarkKind::Encouragement => "🛸",
            RemarkKind::Fact => "💡",
            RemarkKind::Hint => "🔭",
        };
        Some(Line::from(Span::styled(
            format!("{icon} {}", remark.text),
            Style::default()
                .fg(self.theme.colors.accent())
                .add_modifier(Modifier::ITALIC),
        )))
    }
}

impl Widget for QuizArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let s = self.session;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let option_rows = s.options.len().max(1) as u16;
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(3),
                Constraint::Length(option_rows + 1),
                Constraint::Length(2),
                Constraint::Min(0),
            ])
            .split(inner);

        if let Some(word) = s.current_word() {
            let meta = format!("{} · {}", word.category, word.difficulty.as_str());
            Paragraph::new(Line::from(Span::styled(
                meta,
                Style::default().fg(colors.muted()),
            )))
            .alignment(Alignment::Center)
            .render(layout[0], buf);
        }

        let prompt = s.prompt().unwrap_or_default().to_string();
        Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                prompt,
                Style::default()
                    .fg(colors.accent())
                    .add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center)
        .render(layout[1], buf);

        Paragraph::new(self.answer_lines()).render(layout[2], buf);

        if let Some(line) = self.judgement_line() {
            Paragraph::new(line)
                .alignment(Alignment::Center)
                .render(layout[3], buf);
        }

        if let Some(line) = self.remark_line() {
            Paragraph::new(line)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .render(layout[4], buf);
        }
    }
}
