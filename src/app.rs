use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use crate::audio::AudioService;
use crate::config::Config;
use crate::engine::achievements::AchievementDefinition;
use crate::engine::effects::{Fireworks, Spark};
use crate::remark::{Remark, RemarkProvider, RemarkService};
use crate::session::{
    Answer, Command, Event, Game, GameMode, InputKind, RoundToken, Session, Status,
};
use crate::store::{ProgressBook, ProgressStore};
use crate::words::{BundledWords, WordBank};

pub const FIREWORK_PALETTE: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AppScreen {
    Menu,
    Playing,
    GalaxyMap,
    Result,
    Settings,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MenuEntry {
    Play(GameMode),
    GalaxyMap,
    Settings,
    Quit,
}

pub fn menu_entries() -> Vec<MenuEntry> {
    GameMode::all()
        .iter()
        .copied()
        .map(MenuEntry::Play)
        .chain([MenuEntry::GalaxyMap, MenuEntry::Settings, MenuEntry::Quit])
        .collect()
}

/// Deferred engine events, dispatched once their due time has passed.
#[derive(Debug, Default)]
pub struct Scheduler {
    entries: Vec<(Instant, Event)>,
}

impl Scheduler {
    pub fn schedule(&mut self, due: Instant, event: Event) {
        self.entries.push((due, event));
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn pending(&self) -> usize {
        self.entries.len()
    }

    /// Remove and return every event due at `now`, earliest first.
    pub fn take_due(&mut self, now: Instant) -> Vec<Event> {
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.entries.drain(..).partition(|(at, _)| *at <= now);
        self.entries = pending;
        due.sort_by_key(|(at, _)| *at);
        due.into_iter().map(|(_, event)| event).collect()
    }
}

pub struct App {
    pub game: Game,
    pub progress: ProgressBook,
    pub config: Config,
    words: BundledWords,
    scheduler: Scheduler,
    remarks: Option<RemarkService>,
    audio: AudioService,
    pub fireworks: Fireworks,
    pub input: String,
    pub remark: Option<Remark>,
    pub unlocked: Vec<&'static AchievementDefinition>,
    pub menu_selected: usize,
    pub settings_selected: usize,
    pub settings_open: bool,
    pub confirm_reset: bool,
    pub option_selected: usize,
    pub card_selected: usize,
    pub should_quit: bool,
    fixed_seed: Option<u64>,
    rng: SmallRng,
    last_frame: Instant,
}

impl App {
    pub fn new(
        config: Config,
        words: BundledWords,
        store: Box<dyn ProgressStore>,
        mut audio: AudioService,
        remark_provider: Option<Arc<dyn RemarkProvider>>,
        fixed_seed: Option<u64>,
    ) -> Self {
        let progress = ProgressBook::open(store);
        audio.set_enabled(progress.progress().sound_enabled);
        audio.init();
        let rng = match fixed_seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        Self {
            game: Game::new(config.timings()),
            progress,
            config,
            words,
            scheduler: Scheduler::default(),
            remarks: remark_provider.map(RemarkService::new),
            audio,
            fireworks: Fireworks::new(),
            input: String::new(),
            remark: None,
            unlocked: Vec::new(),
            menu_selected: 0,
            settings_selected: 0,
            settings_open: false,
            confirm_reset: false,
            option_selected: 0,
            card_selected: 0,
            should_quit: false,
            fixed_seed,
            rng,
            last_frame: Instant::now(),
        }
    }

    pub fn screen(&self) -> AppScreen {
        match self.game.status() {
            Status::Start if self.settings_open => AppScreen::Settings,
            Status::Start => AppScreen::Menu,
            Status::Playing => AppScreen::Playing,
            Status::GalaxyMap => AppScreen::GalaxyMap,
            Status::Result => AppScreen::Result,
        }
    }

    pub fn session(&self) -> Option<&Session> {
        self.game.session()
    }

    pub fn word_count(&self) -> usize {
        self.words.list().len()
    }

    pub fn pending_events(&self) -> usize {
        self.scheduler.pending()
    }

    /// Feed one event to the engine and carry out what it asks for. Returns
    /// false when the engine rejected the event.
    pub fn dispatch(&mut self, event: Event, now: Instant) -> bool {
        let name = event.name();
        let before = self.game.token();
        match self.game.apply(event) {
            Ok(transition) => {
                self.game = transition.state;
                if self.game.token() != before {
                    self.input.clear();
                    self.remark = None;
                    self.option_selected = 0;
                }
                for command in transition.commands {
                    self.execute(command, now);
                }
                true
            }
            Err(err) => {
                tracing::debug!(event = name, %err, "Event rejected");
                false
            }
        }
    }

    fn execute(&mut self, command: Command, now: Instant) {
        match command {
            Command::Schedule { after, event } => self.scheduler.schedule(now + after, event),
            Command::CancelTimers => self.scheduler.clear(),
            Command::RequestRemark {
                token,
                word,
                was_correct,
                streak,
            } => {
                if let Some(remarks) = &self.remarks {
                    remarks.request(token, word, was_correct, streak);
                }
            }
            Command::Play(sound) => self.audio.play(sound),
            Command::Speak { text, side } => self.audio.speak(&text, side),
            Command::RecordLearned { word_id } => {
                self.progress.record_learned(&word_id);
            }
            Command::Commit(outcome) => {
                self.unlocked = self.progress.commit_session(&outcome);
            }
            Command::Fireworks => {
                let origin = [
                    self.rng.gen_range(40.0..280.0),
                    self.rng.gen_range(16.0..56.0),
                ];
                let kind = if self.rng.gen_bool(0.3) {
                    Spark::Gold
                } else {
                    Spark::Firework
                };
                self.fireworks
                    .burst(origin, kind, FIREWORK_PALETTE, &mut self.rng);
            }
        }
    }

    pub fn start(&mut self, mode: GameMode, now: Instant) -> bool {
        self.unlocked.clear();
        self.card_selected = 0;
        self.fireworks.clear();
        let seed = self.fixed_seed.unwrap_or_else(|| self.rng.r#gen());
        let event = Event::Start {
            mode,
            words: self.words.list().to_vec(),
            seed,
            best_streak: self.progress.progress().best_streak_ever,
        };
        self.dispatch(event, now)
    }

    fn input_kind(&self) -> Option<InputKind> {
        match self.game.status() {
            Status::Playing => self.session().map(|s| s.mode.input()),
            _ => None,
        }
    }

    fn awaiting_answer(&self) -> bool {
        self.session().is_some_and(Session::is_awaiting_answer)
    }

    pub fn type_char(&mut self, ch: char) {
        if self.input_kind() == Some(InputKind::FreeText) && self.awaiting_answer() {
            self.input.push(ch);
        }
    }

    pub fn backspace(&mut self) {
        if self.awaiting_answer() {
            self.input.pop();
        }
    }

    pub fn submit(&mut self, now: Instant) -> bool {
        match self.input_kind() {
            Some(InputKind::FreeText) => {
                let text = self.input.clone();
                self.dispatch(Event::Submit(Answer::Typed(text)), now)
            }
            Some(InputKind::MultipleChoice) => self.select_option(self.option_selected, now),
            Some(InputKind::Cards) => self.flip(self.card_selected, now),
            None => false,
        }
    }

    pub fn select_option(&mut self, index: usize, now: Instant) -> bool {
        self.option_selected = index;
        self.dispatch(Event::Submit(Answer::Option(index)), now)
    }

    pub fn move_option(&mut self, delta: isize) {
        let count = self.session().map_or(0, |s| s.options.len());
        if count > 0 {
            self.option_selected =
                (self.option_selected as isize + delta).rem_euclid(count as isize) as usize;
        }
    }

    pub fn flip(&mut self, index: usize, now: Instant) -> bool {
        self.card_selected = index;
        self.dispatch(Event::Flip(index), now)
    }

    pub fn move_card(&mut self, delta: isize) {
        let count = self
            .session()
            .and_then(|s| s.matching.as_ref())
            .map_or(0, |b| b.cards.len());
        if count > 0 {
            self.card_selected =
                (self.card_selected as isize + delta).rem_euclid(count as isize) as usize;
        }
    }

    /// Advance animations, collect remark replies, and fire due events.
    pub fn tick(&mut self, now: Instant) {
        let dt = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.fireworks.tick(dt.as_secs_f32());

        self.drain_remarks();
        for event in self.scheduler.take_due(now) {
            self.dispatch(event, now);
        }
    }

    fn drain_remarks(&mut self) {
        let Some(remarks) = &self.remarks else {
            return;
        };
        let current = self.game.token();
        while let Some(reply) = remarks.try_recv() {
            if Some(reply.token) == current {
                self.remark = Some(reply.remark);
            } else {
                tracing::debug!(token = ?reply.token, "Discarding remark for a finished round");
            }
        }
    }

    pub fn current_token(&self) -> Option<RoundToken> {
        self.game.token()
    }

    pub fn leave(&mut self, now: Instant) -> bool {
        let left = self.dispatch(Event::Leave, now);
        if left {
            self.scheduler.clear();
            self.input.clear();
            self.remark = None;
            self.fireworks.clear();
        }
        left
    }

    pub fn open_galaxy_map(&mut self, now: Instant) -> bool {
        self.dispatch(Event::OpenGalaxyMap, now)
    }

    pub fn open_settings(&mut self) {
        if self.game.status() == Status::Start {
            self.settings_open = true;
            self.settings_selected = 0;
            self.confirm_reset = false;
        }
    }

    pub fn close_settings(&mut self) {
        self.settings_open = false;
        self.confirm_reset = false;
    }

    pub fn toggle_sound(&mut self) -> bool {
        let enabled = self.progress.toggle_sound();
        self.audio.set_enabled(enabled);
        enabled
    }

    /// First call arms the confirmation, second call wipes progress.
    pub fn reset_progress(&mut self) -> bool {
        if !self.confirm_reset {
            self.confirm_reset = true;
            return false;
        }
        self.progress.reset();
        self.audio.set_enabled(self.progress.progress().sound_enabled);
        self.confirm_reset = false;
        true
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn shutdown(&mut self) {
        self.scheduler.clear();
        self.audio.dispose();
    }

    /// Time until the next frame is worth drawing.
    pub fn frame_interval(&self) -> Duration {
        if self.fireworks.is_idle() {
            Duration::from_millis(100)
        } else {
            Duration::from_millis(33)
        }
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::remark::CannedRemarks;
    use crate::store::JsonStore;

    fn make_app(dir: &TempDir) -> App {
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        App::new(
            Config::default(),
            BundledWords::load(),
            Box::new(store),
            AudioService::muted(),
            Some(Arc::new(CannedRemarks)),
            Some(42),
        )
    }

    fn right_answer(app: &App) -> String {
        let s = app.session().unwrap();
        s.current_word().unwrap().answer(s.direction()).to_string()
    }

    #[test]
    fn scheduler_returns_due_events_in_order() {
        let now = Instant::now();
        let mut scheduler = Scheduler::default();
        scheduler.schedule(now + Duration::from_secs(2), Event::Leave);
        scheduler.schedule(now + Duration::from_secs(1), Event::OpenGalaxyMap);
        scheduler.schedule(now + Duration::from_secs(5), Event::Flip(0));
        let due = scheduler.take_due(now + Duration::from_secs(3));
        assert_eq!(due, vec![Event::OpenGalaxyMap, Event::Leave]);
        assert_eq!(scheduler.pending(), 1);
    }

    #[test]
    fn typed_answer_flows_through_to_progress() {
        let dir = TempDir::new().unwrap();
        let mut app = make_app(&dir);
        let now = Instant::now();
        assert!(app.start(GameMode::TranslateForward, now));
        assert_eq!(app.screen(), AppScreen::Playing);

        for ch in right_answer(&app).chars() {
            app.type_char(ch);
        }
        assert!(app.submit(now));
        assert_eq!(app.progress.progress().learned_count(), 1);
        assert_eq!(app.session().unwrap().score, 10);

        // Typing is ignored until the next round starts.
        app.type_char('x');
        assert!(!app.input.ends_with('x'));

        app.tick(now + Duration::from_millis(1800));
        let s = app.session().unwrap();
        assert_eq!(s.current_index, 1);
        assert!(app.input.is_empty());
    }

    #[test]
    fn round_timer_runs_out_through_the_scheduler() {
        let dir = TempDir::new().unwrap();
        let mut app = make_app(&dir);
        let start = Instant::now();
        app.start(GameMode::TranslateReverse, start);
        for secs in 1..=30 {
            app.tick(start + Duration::from_secs(secs));
        }
        let s = app.session().unwrap();
        assert_eq!(s.last_judgement, Some(false));
        assert_eq!(s.history.len(), 1);
    }

    #[test]
    fn leaving_clears_pending_events() {
        let dir = TempDir::new().unwrap();
        let mut app = make_app(&dir);
        let now = Instant::now();
        app.start(GameMode::Survival, now);
        assert!(app.pending_events() > 0);
        assert!(app.leave(now));
        assert_eq!(app.pending_events(), 0);
        assert_eq!(app.screen(), AppScreen::Menu);
        assert!(!app.leave(now));
    }

    #[test]
    fn finishing_commits_once_and_reports_unlocks() {
        let dir = TempDir::new().unwrap();
        let mut app = make_app(&dir);
        let mut now = Instant::now();
        app.start(GameMode::Survival, now);
        for _ in 0..3 {
            for ch in "wrong".chars() {
                app.type_char(ch);
            }
            app.submit(now);
            now += Duration::from_millis(1800);
            app.tick(now);
        }
        assert_eq!(app.screen(), AppScreen::Result);
        assert_eq!(app.progress.progress().games_played, 1);
        assert!(app.unlocked.is_empty());

        app.tick(now + Duration::from_secs(10));
        assert_eq!(app.progress.progress().games_played, 1);
    }

    #[test]
    fn remark_for_current_round_is_shown() {
        let dir = TempDir::new().unwrap();
        let mut app = make_app(&dir);
        let now = Instant::now();
        app.start(GameMode::TranslateForward, now);
        for ch in "nope".chars() {
            app.type_char(ch);
        }
        app.submit(now);
        for _ in 0..200 {
            app.tick(now + Duration::from_millis(1));
            if app.remark.is_some() {
                break;
            }
            std::thread::sleep(Duration::from_millis(5));
        }
        assert!(app.remark.is_some());
    }

    #[test]
    fn sound_toggle_and_reset_persist() {
        let dir = TempDir::new().unwrap();
        let mut app = make_app(&dir);
        assert!(!app.toggle_sound());
        drop(app);

        let mut app = make_app(&dir);
        assert!(!app.progress.progress().sound_enabled);
        assert!(!app.reset_progress());
        assert!(app.reset_progress());
        assert!(app.progress.progress().sound_enabled);
    }

    #[test]
    fn menu_lists_every_mode() {
        let entries = menu_entries();
        for mode in GameMode::all() {
            assert!(entries.contains(&MenuEntry::Play(*mode)));
        }
        assert_eq!(entries.last(), Some(&MenuEntry::Quit));
    }
}
