use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Widget;

use crate::engine::effects::{Fireworks, Spark};
use crate::ui::theme::Theme;

/// Size of the abstract particle space. It is stretched over whatever area
/// the overlay is given, four units per terminal cell on a 80x24 screen.
pub const CANVAS: [f32; 2] = [320.0, 96.0];

pub struct FireworksOverlay<'a> {
    fireworks: &'a Fireworks,
    theme: &'a Theme,
}

impl<'a> FireworksOverlay<'a> {
    pub fn new(fireworks: &'a Fireworks, theme: &'a Theme) -> Self {
        Self { fireworks, theme }
    }
}

/// Terminal cell for a particle position, if it lands inside `area`.
pub fn cell_for(position: [f32; 2], area: Rect) -> Option<(u16, u16)> {
    let [x, y] = position;
    if !(0.0..CANVAS[0]).contains(&x) || !(0.0..CANVAS[1]).contains(&y) {
        return None;
    }
    let col = (x / CANVAS[0] * area.width as f32) as u16;
    let row = (y / CANVAS[1] * area.height as f32) as u16;
    if col >= area.width || row >= area.height {
        return None;
    }
    Some((area.x + col, area.y + row))
}

impl Widget for FireworksOverlay<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        for particle in self.fireworks.particles() {
            let Some((x, y)) = cell_for(particle.position, area) else {
                continue;
            };
            let glyph = match (particle.kind, particle.alpha) {
                (Spark::Gold, _) => "✦",
                (Spark::Firework, a) if a > 0.6 => "*",
                (Spark::Firework, a) if a > 0.3 => "+",
                _ => "·",
            };
            let color = match particle.kind {
                Spark::Gold => colors.warning(),
                Spark::Firework => colors.firework(particle.palette_index),
            };
            let mut style = Style::default().fg(color);
            if particle.alpha > 0.6 {
                style = style.add_modifier(Modifier::BOLD);
            }
            buf[(x, y)].set_symbol(glyph).set_style(style);
        }
    }
}
