use thiserror::Error;

/// Errors raised while building a battle. These reflect a bad roster or
/// configuration, never a game condition, so they are hard failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SetupError {
    /// The class name does not match any of the four playable classes
    #[error("Unknown character class: {0}")]
    UnknownClass(String),
    /// Roster shape is wrong (size, team split, team id, duplicate names)
    #[error("Invalid roster: {0}")]
    InvalidRoster(String),
    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Errors returned by the battle runner when a caller submits an action it
/// is not allowed to submit. Refused in-battle actions are not errors; they
/// come back as a failed `ActionOutcome`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RunnerError {
    #[error("Invalid combatant index: {0}")]
    InvalidCombatantIndex(usize),
    #[error("{0} is bot-controlled and does not accept submitted actions")]
    NotHumanControlled(String),
    #[error("{0} is defeated and cannot act")]
    CombatantDefeated(String),
    #[error("{0} already submitted an action this turn")]
    AlreadySubmitted(String),
    #[error("The battle is over and no longer accepts actions")]
    BattleOver,
    #[error("The battle was abandoned after {0} turns without a winner")]
    TurnLimitReached(u32),
}

/// Type alias for Results using SetupError
pub type SetupResult<T> = Result<T, SetupError>;

/// Type alias for Results using RunnerError
pub type RunnerResult<T> = Result<T, RunnerError>;
