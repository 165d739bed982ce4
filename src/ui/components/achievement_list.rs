use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::achievements::{self, ALL_ACHIEVEMENTS};
use crate::store::Progress;
use crate::ui::theme::Theme;

/// Saved achievements first, then the ones still locked.
pub struct AchievementList<'a> {
    progress: &'a Progress,
    theme: &'a Theme,
}

impl<'a> AchievementList<'a> {
    pub fn new(progress: &'a Progress, theme: &'a Theme) -> Self {
        Self { progress, theme }
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let colors = &self.theme.colors;
        // Ids from older versions that no longer exist are skipped.
        let earned = self
            .progress
            .achievements
            .iter()
            .filter_map(|id| achievements::find(id))
            .map(|a| {
                Line::from(vec![
                    Span::styled(
                        format!(" 🏆 {}", a.title),
                        Style::default()
                            .fg(colors.warning())
                            .add_modifier(Modifier::BOLD),
                    ),
                    Span::styled(
                        format!("  {}", a.description),
                        Style::default().fg(colors.fg()),
                    ),
                ])
            });
        let locked = ALL_ACHIEVEMENTS
            .iter()
            .filter(|a| !self.progress.has_achievement(a.id))
            .map(|a| {
                Line::from(Span::styled(
                    format!(" 🔒 {}  {}", a.title, a.description),
                    Style::default().fg(colors.muted()),
                ))
            });
        earned.chain(locked).collect()
    }
}

impl Widget for AchievementList<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let earned = ALL_ACHIEVEMENTS
            .iter()
            .filter(|a| self.progress.has_achievement(a.id))
            .count();

        let block = Block::bordered()
            .title(format!(" Achievements {earned}/{} ", ALL_ACHIEVEMENTS.len()))
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.lines()).render(inner, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_text(buf: &Buffer, y: u16) -> String {
        (0..buf.area.width)
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    #[test]
    fn saved_achievements_are_listed_first() {
        let mut progress = Progress::default();
        progress.achievements.insert("boss-slayer".to_string());
        progress.achievements.insert("retired-badge".to_string());
        let theme = Theme::default();

        let area = Rect::new(0, 0, 70, 12);
        let mut buf = Buffer::empty(area);
        AchievementList::new(&progress, &theme).render(area, &mut buf);

        assert!(row_text(&buf, 0).contains("Achievements 1/9"));
        assert!(row_text(&buf, 1).contains("Boss Slayer"));
        assert!(row_text(&buf, 2).contains("First Contact"));
        assert!(!(0..12).any(|y| row_text(&buf, y).contains("retired-badge")));
    }
}
