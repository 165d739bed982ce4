pub mod error;
pub mod matching;
pub mod mode;
pub mod reducer;
pub mod state;

pub use error::SessionError;
pub use mode::{GameMode, InputKind};
pub use reducer::{Answer, Command, Event, Game, Timings, Transition};
pub use state::{HistoryEntry, RoundToken, Session, SessionOutcome, Status};
