//! Short comments from the co-pilot after each answer. Providers may be slow
//! or offline, so requests run on worker threads and every failure turns into
//! a fixed fallback line.

#[cfg(feature = "network")]
pub mod gemini;

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use anyhow::Result;

use crate::session::RoundToken;

#[cfg(feature = "network")]
pub use gemini::GeminiRemarks;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemarkKind {
    Encouragement,
    Fact,
    Hint,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Remark {
    pub text: String,
    pub kind: RemarkKind,
}

impl Remark {
    pub fn fallback(was_correct: bool) -> Self {
        if was_correct {
            Self {
                text: "Great job! 🌟".to_string(),
                kind: RemarkKind::Encouragement,
            }
        } else {
            Self {
                text: "Don't give up! 🛸".to_string(),
                kind: RemarkKind::Hint,
            }
        }
    }
}

pub trait RemarkProvider: Send + Sync {
    fn get_remark(&self, word: &str, was_correct: bool, streak: u32) -> Result<Remark>;
}

const CHEERS: &[&str] = &[
    "Stellar work, Cadet! 🚀",
    "Right on course! 🌌",
    "Warp drive engaged! ⚡",
    "The stars approve! ✨",
];

const FACTS: &[&str] = &[
    "Fun fact: light from the Sun takes about 8 minutes to reach us ☀️",
    "Fun fact: a day on Venus is longer than its year 🪐",
];

const NUDGES: &[&str] = &[
    "Check your star chart and try again 🛰️",
    "Every comet misses sometimes ☄️",
    "Recalibrating... you've got this 🔧",
];

/// Offline provider: picks a line from a fixed list based on the word and
/// streak, so the same situation always gets the same remark.
#[derive(Clone, Copy, Debug, Default)]
pub struct CannedRemarks;

impl RemarkProvider for CannedRemarks {
    fn get_remark(&self, word: &str, was_correct: bool, streak: u32) -> Result<Remark> {
        let seed = word.chars().count() + streak as usize;
        let remark = if was_correct {
            if streak >= 5 {
                Remark {
                    text: format!("{streak} in a row! Unstoppable! 🔥"),
                    kind: RemarkKind::Encouragement,
                }
            } else if streak == 3 {
                Remark {
                    text: FACTS[seed % FACTS.len()].to_string(),
                    kind: RemarkKind::Fact,
                }
            } else {
                Remark {
                    text: CHEERS[seed % CHEERS.len()].to_string(),
                    kind: RemarkKind::Encouragement,
                }
            }
        } else {
            Remark {
                text: NUDGES[seed % NUDGES.len()].to_string(),
                kind: RemarkKind::Hint,
            }
        };
        Ok(remark)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemarkReply {
    pub token: RoundToken,
    pub remark: Remark,
}

/// Runs provider calls off the UI thread and hands replies back through a
/// channel the runtime drains on every tick.
pub struct RemarkService {
    provider: Arc<dyn RemarkProvider>,
    tx: Sender<RemarkReply>,
    rx: Receiver<RemarkReply>,
}

impl RemarkService {
    pub fn new(provider: Arc<dyn RemarkProvider>) -> Self {
        let (tx, rx) = mpsc::channel();
        Self { provider, tx, rx }
    }

    pub fn request(&self, token: RoundToken, word: String, was_correct: bool, streak: u32) {
        let provider = Arc::clone(&self.provider);
        let tx = self.tx.clone();
        thread::spawn(move || {
            let remark = provider
                .get_remark(&word, was_correct, streak)
                .unwrap_or_else(|err| {
                    tracing::warn!(%err, word = %word, "Remark provider failed");
                    Remark::fallback(was_correct)
                });
            let _ = tx.send(RemarkReply { token, remark });
        });
    }

    pub fn try_recv(&self) -> Option<RemarkReply> {
        self.rx.try_recv().ok()
    }

    #[cfg(test)]
    fn recv(&self) -> Option<RemarkReply> {
        self.rx.recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Broken;

    impl RemarkProvider for Broken {
        fn get_remark(&self, _word: &str, _was_correct: bool, _streak: u32) -> Result<Remark> {
            anyhow::bail!("offline")
        }
    }

    const TOKEN: RoundToken = RoundToken { session: 1, step: 3 };

    #[test]
    fn canned_remarks_are_deterministic() {
        let a = CannedRemarks.get_remark("mirror", true, 2).unwrap();
        let b = CannedRemarks.get_remark("mirror", true, 2).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.kind, RemarkKind::Encouragement);
        let miss = CannedRemarks.get_remark("mirror", false, 0).unwrap();
        assert_eq!(miss.kind, RemarkKind::Hint);
    }

    #[test]
    fn long_streaks_are_called_out() {
        let remark = CannedRemarks.get_remark("tree", true, 7).unwrap();
        assert!(remark.text.starts_with("7 in a row"));
        let fact = CannedRemarks.get_remark("tree", true, 3).unwrap();
        assert_eq!(fact.kind, RemarkKind::Fact);
    }

    #[test]
    fn failures_resolve_to_fallback() {
        let service = RemarkService::new(Arc::new(Broken));
        service.request(TOKEN, "tree".to_string(), false, 0);
        let reply = service.recv().unwrap();
        assert_eq!(reply.token, TOKEN);
        assert_eq!(reply.remark, Remark::fallback(false));
        assert_eq!(reply.remark.text, "Don't give up! 🛸");
    }

    #[test]
    fn replies_carry_the_request_token() {
        let service = RemarkService::new(Arc::new(CannedRemarks));
        service.request(TOKEN, "tree".to_string(), true, 1);
        assert_eq!(service.recv().map(|r| r.token), Some(TOKEN));
    }
}
