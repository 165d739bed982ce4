use chrono::Utc;

use crate::engine::achievements::{self, AchievementContext, AchievementDefinition};
use crate::session::SessionOutcome;
use crate::store::json_store::ProgressStore;
use crate::store::schema::Progress;

/// In-memory progress with write-through persistence. A failed save is
/// logged and the in-memory record stays updated.
pub struct ProgressBook {
    progress: Progress,
    store: Box<dyn ProgressStore>,
}

impl ProgressBook {
    pub fn open(store: Box<dyn ProgressStore>) -> Self {
        let progress = store.load();
        tracing::info!(
            learned = progress.learned_count(),
            games = progress.games_played,
            "Progress loaded"
        );
        Self { progress, store }
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    fn persist(&self) {
        if let Err(err) = self.store.save(&self.progress) {
            tracing::warn!(%err, "Failed to save progress");
        }
    }

    /// Returns true when the word was not known before.
    pub fn record_learned(&mut self, word_id: &str) -> bool {
        let inserted = self.progress.learned_word_ids.insert(word_id.to_string());
        if inserted {
            self.persist();
        }
        inserted
    }

    /// Fold a finished session into the totals and unlock achievements, then
    /// save once. Returns the achievements unlocked by this session.
    pub fn commit_session(&mut self, outcome: &SessionOutcome) -> Vec<&'static AchievementDefinition> {
        let p = &mut self.progress;
        p.total_score += u64::from(outcome.score);
        p.best_streak_ever = p.best_streak_ever.max(outcome.best_streak);
        p.games_played += 1;
        p.last_played = Some(Utc::now());

        let ctx = AchievementContext {
            best_streak: outcome.best_streak,
            learned_words: p.learned_count(),
            mode: outcome.mode,
            won: outcome.won,
        };
        let unlocked: Vec<&'static AchievementDefinition> = achievements::evaluate(&ctx)
            .filter(|a| p.achievements.insert(a.id.to_string()))
            .collect();
        for a in &unlocked {
            tracing::info!(achievement = a.id, "Achievement unlocked");
        }

        self.persist();
        unlocked
    }

    pub fn toggle_sound(&mut self) -> bool {
        self.progress.sound_enabled = !self.progress.sound_enabled;
        self.persist();
        self.progress.sound_enabled
    }

    pub fn reset(&mut self) {
        self.progress = Progress::default();
        tracing::info!("Progress reset");
        self.persist();
    }
}
