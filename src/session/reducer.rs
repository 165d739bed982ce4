use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

use crate::audio::SoundEvent;
use crate::engine::grading;
use crate::engine::scoring;
use crate::session::error::SessionError;
use crate::session::matching::{Flip, MatchingBoard};
use crate::session::mode::{BOSS_HIT_DAMAGE, BOSS_MAX_HEALTH, GameMode, InputKind, SURVIVAL_LIVES};
use crate::session::state::{
    HistoryEntry, RoundToken, Session, SessionOutcome, Status, TIMEOUT_ANSWER,
};
use crate::words::{Difficulty, Side, WordPair};

/// Boss battles need at least this many hard words, otherwise they draw a
/// random sample of `BOSS_FALLBACK_SAMPLE` words of any difficulty.
pub const BOSS_MIN_HARD_WORDS: usize = 5;
pub const BOSS_FALLBACK_SAMPLE: usize = 10;

pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

const OPTION_SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timings {
    /// Pause between answering and the next round.
    pub settle: Duration,
    /// How long a matched pair stays revealed before it locks in.
    pub match_reveal: Duration,
    /// How long a mismatched pair stays revealed before flipping back.
    pub mismatch_hide: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(1800),
            match_reveal: Duration::from_millis(500),
            mismatch_hide: Duration::from_millis(1000),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Answer {
    Typed(String),
    Option(usize),
    Timeout,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Start {
        mode: GameMode,
        words: Vec<WordPair>,
        seed: u64,
        best_streak: u32,
    },
    Submit(Answer),
    Tick(RoundToken),
    Advance(RoundToken),
    Flip(usize),
    ResolvePair(RoundToken),
    Leave,
    OpenGalaxyMap,
}

impl Event {
    pub fn name(&self) -> &'static str {
        match self {
            Event::Start { .. } => "start",
            Event::Submit(_) => "submit",
            Event::Tick(_) => "tick",
            Event::Advance(_) => "advance",
            Event::Flip(_) => "flip",
            Event::ResolvePair(_) => "resolve-pair",
            Event::Leave => "leave",
            Event::OpenGalaxyMap => "open-galaxy-map",
        }
    }
}

/// Side effects requested by a transition. The runtime executes them in order.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    Schedule { after: Duration, event: Event },
    CancelTimers,
    RequestRemark {
        token: RoundToken,
        word: String,
        was_correct: bool,
        streak: u32,
    },
    Play(SoundEvent),
    Speak { text: String, side: Side },
    RecordLearned { word_id: String },
    Commit(SessionOutcome),
    Fireworks,
}

#[derive(Clone, Debug)]
pub struct Transition {
    pub state: Game,
    pub commands: Vec<Command>,
}

/// Whole game state. Changed only through [`Game::apply`].
#[derive(Clone, Debug, Default)]
pub struct Game {
    status: Status,
    session: Option<Session>,
    serial: u64,
    timings: Timings,
}

impl Game {
    pub fn new(timings: Timings) -> Self {
        Self {
            timings,
            ..Self::default()
        }
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn timings(&self) -> Timings {
        self.timings
    }

    /// Token of the round in progress, if any.
    pub fn token(&self) -> Option<RoundToken> {
        match self.status {
            Status::Playing => self.session.as_ref().map(Session::token),
            _ => None,
        }
    }

    pub fn apply(&self, event: Event) -> Result<Transition, SessionError> {
        let mut next = self.clone();
        let mut commands = Vec::new();
        match event {
            Event::Start {
                mode,
                words,
                seed,
                best_streak,
            } => next.start(mode, words, seed, best_streak, &mut commands)?,
            Event::Submit(answer) => next.submit(answer, &mut commands)?,
            Event::Tick(token) => next.tick(token, &mut commands)?,
            Event::Advance(token) => next.advance(token, &mut commands)?,
            Event::Flip(index) => next.flip(index, &mut commands)?,
            Event::ResolvePair(token) => next.resolve_pair(token, &mut commands)?,
            Event::Leave => next.leave(&mut commands)?,
            Event::OpenGalaxyMap => {
                if next.status != Status::Start {
                    return Err(SessionError::InvalidTransition);
                }
                next.status = Status::GalaxyMap;
            }
        }
        Ok(Transition {
            state: next,
            commands,
        })
    }

    fn start(
        &mut self,
        mode: GameMode,
        words: Vec<WordPair>,
        seed: u64,
        best_streak: u32,
        commands: &mut Vec<Command>,
    ) -> Result<(), SessionError> {
        if self.status != Status::Start {
            return Err(SessionError::InvalidTransition);
        }
        if words.is_empty() {
            return Err(SessionError::EmptyWordBank);
        }

        let mut rng = SmallRng::seed_from_u64(seed);
        let word_sequence = draw_sequence(mode, words, &mut rng);
        let matching = (mode == GameMode::Matching)
            .then(|| MatchingBoard::new(&word_sequence, &mut rng));

        self.serial += 1;
        let mut session = Session {
            id: self.serial,
            mode,
            seed,
            word_sequence,
            current_index: 0,
            score: 0,
            streak: 0,
            best_streak,
            lives: (mode == GameMode::Survival).then_some(SURVIVAL_LIVES),
            boss_health: (mode == GameMode::BossBattle).then_some(BOSS_MAX_HEALTH),
            history: Vec::new(),
            last_judgement: None,
            time_left: None,
            elapsed_secs: 0,
            options: Vec::new(),
            matching,
            outcome: None,
            step: 0,
        };
        tracing::info!(
            session = session.id,
            mode = mode.as_str(),
            seed,
            words = session.word_sequence.len(),
            "Session started"
        );

        commands.push(Command::Play(SoundEvent::Click));
        if mode != GameMode::Matching {
            enter_round(&mut session, commands);
        }
        self.session = Some(session);
        self.status = Status::Playing;
        Ok(())
    }

    fn playing_mut(&mut self) -> Result<&mut Session, SessionError> {
        match (self.status, self.session.as_mut()) {
            (Status::Playing, Some(session)) => Ok(session),
            _ => Err(SessionError::NotPlaying),
        }
    }

    fn submit(&mut self, answer: Answer, commands: &mut Vec<Command>) -> Result<(), SessionError> {
        let settle = self.timings.settle;
        let session = self.playing_mut()?;
        if session.last_judgement.is_some() {
            return Err(SessionError::AlreadyAnswered);
        }
        let direction = session
            .mode
            .direction()
            .ok_or(SessionError::WrongInputKind)?;
        let word = session
            .current_word()
            .cloned()
            .ok_or(SessionError::NotPlaying)?;

        let (correct, user_answer) = match answer {
            Answer::Typed(text) => {
                if session.mode.input() != InputKind::FreeText {
                    return Err(SessionError::WrongInputKind);
                }
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    return Err(SessionError::EmptyAnswer);
                }
                (grading::grade(&word, direction, trimmed), trimmed.to_string())
            }
            Answer::Option(index) => {
                if session.mode.input() != InputKind::MultipleChoice {
                    return Err(SessionError::WrongInputKind);
                }
                let option = session
                    .options
                    .get(index)
                    .ok_or(SessionError::InvalidOption(index))?;
                (grading::grade(&word, direction, option), option.clone())
            }
            Answer::Timeout => (false, TIMEOUT_ANSWER.to_string()),
        };

        session.score += scoring::round_award(session.mode, session.streak, correct);
        session.streak = if correct { session.streak + 1 } else { 0 };
        session.best_streak = session.best_streak.max(session.streak);
        if correct {
            if let Some(health) = session.boss_health.as_mut() {
                *health = health.saturating_sub(BOSS_HIT_DAMAGE);
            }
        } else if let Some(lives) = session.lives.as_mut() {
            *lives = lives.saturating_sub(1);
        }
        session.history.push(HistoryEntry {
            word: word.clone(),
            was_correct: correct,
            user_answer,
            mode: session.mode,
        });
        session.last_judgement = Some(correct);

        let token = session.token();
        if correct {
            commands.push(Command::Play(SoundEvent::Correct));
            commands.push(Command::Fireworks);
            commands.push(Command::RecordLearned {
                word_id: word.id.clone(),
            });
        } else {
            commands.push(Command::Play(SoundEvent::Incorrect));
        }
        commands.push(Command::RequestRemark {
            token,
            word: word.target.clone(),
            was_correct: correct,
            streak: session.streak,
        });
        commands.push(Command::Schedule {
            after: settle,
            event: Event::Advance(token),
        });
        Ok(())
    }

    fn tick(&mut self, token: RoundToken, commands: &mut Vec<Command>) -> Result<(), SessionError> {
        let session = self.playing_mut()?;
        if session.token() != token {
            return Err(SessionError::StaleToken);
        }
        if session.last_judgement.is_some() {
            return Err(SessionError::AlreadyAnswered);
        }
        let Some(time_left) = session.time_left.as_mut() else {
            return Err(SessionError::WrongInputKind);
        };

        *time_left = time_left.saturating_sub(1);
        session.elapsed_secs += 1;
        if *time_left > 0 {
            commands.push(Command::Schedule {
                after: TICK_INTERVAL,
                event: Event::Tick(token),
            });
            return Ok(());
        }

        if session.mode == GameMode::SpeedRun {
            session.elapsed_secs = session.mode.time_limit_secs().unwrap_or_default();
            self.finish(false, commands);
            Ok(())
        } else {
            self.submit(Answer::Timeout, commands)
        }
    }

    fn advance(&mut self, token: RoundToken, commands: &mut Vec<Command>) -> Result<(), SessionError> {
        let session = self.playing_mut()?;
        if session.token() != token {
            return Err(SessionError::StaleToken);
        }
        if session.last_judgement.is_none() {
            return Err(SessionError::NotAnswered);
        }

        if session.lives == Some(0) {
            self.finish(false, commands);
        } else if session.boss_health == Some(0) {
            self.finish(true, commands);
        } else if session.current_index + 1 >= session.word_sequence.len() {
            // Sequence exhausted: survival still has lives, a boss still
            // standing means the battle was lost.
            let won = session.boss_health.is_none();
            self.finish(won, commands);
        } else {
            session.current_index += 1;
            enter_round(session, commands);
        }
        Ok(())
    }

    fn flip(&mut self, index: usize, commands: &mut Vec<Command>) -> Result<(), SessionError> {
        let timings = self.timings;
        let session = self.playing_mut()?;
        let board = session
            .matching
            .as_mut()
            .ok_or(SessionError::WrongInputKind)?;

        commands.push(Command::Play(SoundEvent::Click));
        if let Flip::Pair { is_match } = board.flip(index)? {
            session.step += 1;
            let after = if is_match {
                timings.match_reveal
            } else {
                timings.mismatch_hide
            };
            commands.push(Command::Schedule {
                after,
                event: Event::ResolvePair(session.token()),
            });
        }
        Ok(())
    }

    fn resolve_pair(&mut self, token: RoundToken, commands: &mut Vec<Command>) -> Result<(), SessionError> {
        let session = self.playing_mut()?;
        if session.token() != token {
            return Err(SessionError::StaleToken);
        }
        let board = session
            .matching
            .as_mut()
            .ok_or(SessionError::WrongInputKind)?;

        if board.resolve()? {
            commands.push(Command::Play(SoundEvent::Correct));
            commands.push(Command::Fireworks);
            if board.is_complete() {
                session.score = scoring::matching_score(board.total_pairs);
                self.finish(true, commands);
            }
        } else {
            commands.push(Command::Play(SoundEvent::Incorrect));
        }
        Ok(())
    }

    fn leave(&mut self, commands: &mut Vec<Command>) -> Result<(), SessionError> {
        match self.status {
            Status::Start => return Err(SessionError::InvalidTransition),
            Status::Playing => {
                if let Some(session) = &self.session {
                    tracing::info!(session = session.id, "Session abandoned");
                }
                commands.push(Command::CancelTimers);
            }
            Status::GalaxyMap | Status::Result => {}
        }
        self.session = None;
        self.status = Status::Start;
        Ok(())
    }

    /// Move to the result screen. Runs at most once per session because
    /// every caller requires `Status::Playing`.
    fn finish(&mut self, won: bool, commands: &mut Vec<Command>) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let outcome = SessionOutcome {
            mode: session.mode,
            score: session.score,
            best_streak: session.best_streak,
            rounds: session.history.len(),
            correct: session.correct_count(),
            won,
            elapsed_secs: (session.mode == GameMode::SpeedRun).then_some(session.elapsed_secs),
            moves: session.matching.as_ref().map(|b| b.moves),
        };
        tracing::info!(
            session = session.id,
            mode = session.mode.as_str(),
            score = outcome.score,
            won,
            "Session finished"
        );
        session.time_left = None;
        session.outcome = Some(outcome.clone());
        self.status = Status::Result;
        commands.push(Command::CancelTimers);
        commands.push(Command::Play(SoundEvent::LevelComplete));
        commands.push(Command::Commit(outcome));
    }
}

/// Shuffled round sequence for `mode`.
fn draw_sequence(mode: GameMode, words: Vec<WordPair>, rng: &mut SmallRng) -> Vec<WordPair> {
    let mut pool = words;
    pool.shuffle(rng);
    if mode != GameMode::BossBattle {
        return pool;
    }
    let hard: Vec<WordPair> = pool
        .iter()
        .filter(|w| w.difficulty == Difficulty::Hard)
        .cloned()
        .collect();
    if hard.len() >= BOSS_MIN_HARD_WORDS {
        hard
    } else {
        pool.truncate(BOSS_FALLBACK_SAMPLE);
        pool
    }
}

/// Start the round at `current_index`: fresh token, timer, and options.
fn enter_round(session: &mut Session, commands: &mut Vec<Command>) {
    session.step += 1;
    session.last_judgement = None;
    session.time_left = session.mode.time_limit_secs();

    let direction = session.direction();
    if session.mode.input() == InputKind::MultipleChoice {
        let mut rng = SmallRng::seed_from_u64(
            session.seed ^ u64::from(session.step).wrapping_mul(OPTION_SEED_MIX),
        );
        session.options = grading::generate_options(
            &session.word_sequence,
            session.current_index,
            direction,
            &mut rng,
        );
    } else {
        session.options.clear();
    }

    let token = session.token();
    if session.time_left.is_some() {
        commands.push(Command::Schedule {
            after: TICK_INTERVAL,
            event: Event::Tick(token),
        });
    }
    if let Some(word) = session.current_word() {
        commands.push(Command::Speak {
            text: word.prompt(direction).to_string(),
            side: WordPair::prompt_side(direction),
        });
    }
}
