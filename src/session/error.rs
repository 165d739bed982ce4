use thiserror::Error;

/// Why the session engine refused an event. A rejected event never changes
/// the game state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("no session is being played")]
    NotPlaying,
    #[error("event is not valid in the current screen")]
    InvalidTransition,
    #[error("round has already been answered")]
    AlreadyAnswered,
    #[error("round has not been answered yet")]
    NotAnswered,
    #[error("answer is empty")]
    EmptyAnswer,
    #[error("input does not fit the current mode")]
    WrongInputKind,
    #[error("option {0} does not exist")]
    InvalidOption(usize),
    #[error("event belongs to a finished round")]
    StaleToken,
    #[error("word bank is empty")]
    EmptyWordBank,
    #[error("cards are locked while a pair is revealed")]
    InputLocked,
    #[error("card {0} cannot be flipped")]
    InvalidCard(usize),
}
