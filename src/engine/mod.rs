pub mod achievements;
pub mod effects;
pub mod galaxy;
pub mod grading;
pub mod scoring;

pub use effects::Fireworks;
pub use scoring::ComboTier;
