use ratatui::buffer::Buffer;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::engine::galaxy::{self, Planet, PlanetStatus};
use crate::ui::components::progress_bar::ProgressBar;
use crate::ui::theme::Theme;

pub struct GalaxyMap<'a> {
    planets: Vec<Planet>,
    learned: usize,
    theme: &'a Theme,
}

impl<'a> GalaxyMap<'a> {
    pub fn new(learned: usize, theme: &'a Theme) -> Self {
        Self {
            planets: galaxy::chart(learned),
            learned,
            theme,
        }
    }

    /// Cell for a planet placed by percentage inside `area`.
    fn place(planet: &Planet, area: Rect) -> (u16, u16) {
        let x = area.x + (area.width.saturating_sub(1) as u32 * planet.definition.x as u32 / 100) as u16;
        let y = area.y + (area.height.saturating_sub(1) as u32 * planet.definition.y as u32 / 100) as u16;
        (x, y)
    }
}

impl Widget for GalaxyMap<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Galaxy Map ")
            .border_style(Style::default().fg(colors.accent()))
            .style(Style::default().bg(colors.bg()));
        let inner = block.inner(area);
        block.render(area, buf);

        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(6),
                Constraint::Length(3),
            ])
            .split(inner);

        Paragraph::new(Line::from(Span::styled(
            "Every word you learn moves the rocket closer to the core.",
            Style::default().fg(colors.muted()),
        )))
        .alignment(Alignment::Center)
        .render(layout[0], buf);

        let sky = layout[1];
        let rocket = galaxy::rocket_position(self.learned);
        for (i, planet) in self.planets.iter().enumerate() {
            let (x, y) = Self::place(planet, sky);
            let (glyph, color) = match planet.status {
                PlanetStatus::Locked => ("◌", colors.planet_locked()),
                PlanetStatus::Unlocked => ("◉", colors.planet_open()),
                PlanetStatus::Completed => ("●", colors.planet_done()),
            };
            let mut style = Style::default().fg(color);
            if planet.status != PlanetStatus::Locked {
                style = style.add_modifier(Modifier::BOLD);
            }
            let label = format!(
                "{glyph} {} ({})",
                planet.definition.name, planet.definition.words_required
            );
            let room = (sky.x + sky.width).saturating_sub(x) as usize;
            buf.set_stringn(x, y, &label, room, style);

            if i == rocket && y > sky.y {
                buf.set_stringn(x, y - 1, "🚀", room, Style::default().fg(colors.accent()));
            }
        }

        let goal = galaxy::goal();
        let ratio = if goal == 0 {
            0.0
        } else {
            self.learned as f64 / goal as f64
        };
        ProgressBar::new("Words learned", ratio, self.theme)
            .caption(format!("{}/{goal}", self.learned.min(goal)))
            .render(layout[2], buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn planets_stay_inside_the_sky() {
        let sky = Rect::new(2, 3, 40, 10);
        for planet in galaxy::chart(0) {
            let (x, y) = GalaxyMap::place(&planet, sky);
            assert!(x >= sky.x && x < sky.x + sky.width);
            assert!(y >= sky.y && y < sky.y + sky.height);
        }
    }
}
