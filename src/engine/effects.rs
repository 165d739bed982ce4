//! Firework particles shown after a correct answer. Purely cosmetic: nothing
//! here reads or writes session state.

use rand::Rng;

pub const MAX_PARTICLES: usize = 400;
pub const PARTICLES_PER_BURST: usize = 40;

/// Per-frame physics constants, tuned for a 60 Hz step.
const FRICTION: f32 = 0.96;
const GRAVITY: f32 = 0.12;
const FADE_PER_FRAME: f32 = 0.012;
const FRAME_SECS: f32 = 1.0 / 60.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Spark {
    Firework,
    Gold,
}

#[derive(Clone, Debug)]
pub struct Particle {
    pub position: [f32; 2],
    pub velocity: [f32; 2],
    pub alpha: f32,
    pub kind: Spark,
    pub palette_index: usize,
}

impl Particle {
    /// Advance by `frames` 60 Hz steps. Returns false once fully faded.
    fn step(&mut self, frames: f32) -> bool {
        let drag = FRICTION.powf(frames);
        self.velocity[0] *= drag;
        self.velocity[1] = self.velocity[1] * drag + GRAVITY * frames;
        self.position[0] += self.velocity[0] * frames;
        self.position[1] += self.velocity[1] * frames;
        let fade = match self.kind {
            Spark::Gold => FADE_PER_FRAME * 0.66,
            Spark::Firework => FADE_PER_FRAME,
        };
        self.alpha -= fade * frames;
        self.alpha > 0.0
    }
}

/// Bounded particle pool. Coordinates are in abstract cells; the renderer
/// maps them onto the terminal.
#[derive(Debug, Default)]
pub struct Fireworks {
    particles: Vec<Particle>,
}

impl Fireworks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn burst<R: Rng>(&mut self, origin: [f32; 2], kind: Spark, palette_size: usize, rng: &mut R) {
        let palette_index = rng.gen_range(0..palette_size.max(1));
        for _ in 0..PARTICLES_PER_BURST {
            if self.particles.len() >= MAX_PARTICLES {
                // Oldest sparks make room for new ones.
                self.particles.remove(0);
            }
            let velocity = match kind {
                Spark::Gold => [rng.gen_range(-2.0..2.0), -rng.gen_range(2.0..10.0)],
                Spark::Firework => {
                    let reach: f32 = rng.gen_range(0.0..7.0);
                    [
                        rng.gen_range(-1.0..1.0) * reach,
                        rng.gen_range(-1.0..1.0) * reach,
                    ]
                }
            };
            self.particles.push(Particle {
                position: origin,
                velocity,
                alpha: 1.0,
                kind,
                palette_index,
            });
        }
    }

    pub fn tick(&mut self, dt: f32) {
        let frames = dt / FRAME_SECS;
        self.particles.retain_mut(|p| p.step(frames));
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn is_idle(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn bursts_are_capped() {
        let mut fx = Fireworks::new();
        let mut rng = SmallRng::seed_from_u64(1);
        for _ in 0..50 {
            fx.burst([10.0, 10.0], Spark::Firework, 5, &mut rng);
        }
        assert_eq!(fx.particles().len(), MAX_PARTICLES);
    }

    #[test]
    fn particles_fall_and_fade() {
        let mut fx = Fireworks::new();
        let mut rng = SmallRng::seed_from_u64(2);
        fx.burst([0.0, 0.0], Spark::Gold, 1, &mut rng);
        fx.tick(0.5);
        assert!(fx.particles().iter().all(|p| p.alpha < 1.0));
    }

    #[test]
    fn particles_expire() {
        let mut fx = Fireworks::new();
        let mut rng = SmallRng::seed_from_u64(3);
        fx.burst([0.0, 0.0], Spark::Firework, 3, &mut rng);
        for _ in 0..30 {
            fx.tick(0.1);
        }
        assert!(fx.is_idle());
    }

    #[test]
    fn gravity_pulls_a_resting_particle_down() {
        let mut p = Particle {
            position: [0.0, 0.0],
            velocity: [0.0, 0.0],
            alpha: 1.0,
            kind: Spark::Firework,
            palette_index: 0,
        };
        assert!(p.step(1.0));
        assert!(p.position[1] > 0.0);
    }
}
