use crate::session::mode::GameMode;

pub const BASE_AWARD: u32 = 10;
pub const BOSS_HIT_BONUS: u32 = 50;
pub const MATCH_PAIR_AWARD: u32 = 50;

/// Points for one round. `streak` is the streak *before* this answer.
pub fn round_award(mode: GameMode, streak: u32, correct: bool) -> u32 {
    if !correct {
        return 0;
    }
    let award = BASE_AWARD * (streak + 1);
    if mode == GameMode::BossBattle {
        award + BOSS_HIT_BONUS
    } else {
        award
    }
}

pub fn matching_score(total_pairs: usize) -> u32 {
    MATCH_PAIR_AWARD * total_pairs as u32
}

pub fn accuracy(correct: usize, rounds: usize) -> f64 {
    if rounds == 0 {
        return 0.0;
    }
    correct as f64 / rounds as f64 * 100.0
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComboTier {
    Combo,
    OnFire,
    Legendary,
}

impl ComboTier {
    pub fn from_streak(streak: u32) -> Option<Self> {
        match streak {
            0..=2 => None,
            3..=4 => Some(ComboTier::Combo),
            5..=9 => Some(ComboTier::OnFire),
            _ => Some(ComboTier::Legendary),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ComboTier::Combo => "COMBO",
            ComboTier::OnFire => "ON FIRE",
            ComboTier::Legendary => "LEGENDARY",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn award_scales_with_pre_increment_streak() {
        let mode = GameMode::TranslateForward;
        assert_eq!(round_award(mode, 0, true), 10);
        assert_eq!(round_award(mode, 1, true), 20);
        assert_eq!(round_award(mode, 4, true), 50);
        assert_eq!(round_award(mode, 4, false), 0);
    }

    #[test]
    fn boss_hits_get_flat_bonus() {
        assert_eq!(round_award(GameMode::BossBattle, 0, true), 60);
        assert_eq!(round_award(GameMode::BossBattle, 2, true), 80);
        assert_eq!(round_award(GameMode::BossBattle, 2, false), 0);
    }

    #[test]
    fn matching_pays_fifty_per_pair() {
        assert_eq!(matching_score(8), 400);
    }

    #[test]
    fn accuracy_handles_empty_sessions() {
        assert_eq!(accuracy(0, 0), 0.0);
        assert!((accuracy(3, 4) - 75.0).abs() < f64::EPSILON);
    }

    #[test]
    fn combo_tiers_follow_streak_thresholds() {
        assert_eq!(ComboTier::from_streak(2), None);
        assert_eq!(ComboTier::from_streak(3), Some(ComboTier::Combo));
        assert_eq!(ComboTier::from_streak(5), Some(ComboTier::OnFire));
        assert_eq!(ComboTier::from_streak(10), Some(ComboTier::Legendary));
        assert_eq!(ComboTier::from_streak(42).map(ComboTier::label), Some("LEGENDARY"));
    }
}
