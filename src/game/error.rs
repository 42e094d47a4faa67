use thiserror::Error;

/// Failures surfaced by the episode controller
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("step called before the first reset")]
    NotStarted,
    #[error("step called on a finished episode; call reset first")]
    EpisodeOver,
    #[error("no free cell left for food")]
    BoardFull,
    #[error("invalid game config: {0}")]
    InvalidConfig(String),
}
