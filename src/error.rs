use crate::movegen::Move;
use crate::state::Team;

/// The six error kinds the engine distinguishes, with distinct recovery policies.
///
/// Kinds 1-4 are local and recoverable; they never leave the state mutated.
/// Kind 5 is a fatal programming error that aborts the affected game.
/// Kind 6 degrades gracefully (sequential fallback).
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum MastergoalError {
    #[error("move {mv:?} is not in the legal set for the current state")]
    IllegalMove { mv: Move },

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("agent {agent} failed to produce a move: {reason}")]
    AgentFailure { agent: String, reason: String },

    #[error("search for {team:?} exceeded its deadline by {overrun_ms}ms")]
    TimeoutExceeded { team: Team, overrun_ms: u64 },

    #[error("invariant violated after executing a move: {detail}")]
    InvariantViolation { detail: String },

    #[error("worker pool could not start: {reason}")]
    ResourceExhaustion { reason: String },
}

impl MastergoalError {
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        MastergoalError::InvalidInput { reason: reason.into() }
    }

    pub fn invariant(detail: impl Into<String>) -> Self {
        MastergoalError::InvariantViolation { detail: detail.into() }
    }

    pub fn agent_failure(agent: impl Into<String>, reason: impl Into<String>) -> Self {
        MastergoalError::AgentFailure { agent: agent.into(), reason: reason.into() }
    }

    pub fn resource_exhaustion(reason: impl Into<String>) -> Self {
        MastergoalError::ResourceExhaustion { reason: reason.into() }
    }

    pub fn timeout_exceeded(team: Team, overrun_ms: u64) -> Self {
        MastergoalError::TimeoutExceeded { team, overrun_ms }
    }
}

/// Position validity errors are folded into `InvalidInput` at the boundary
/// since they only ever matter when accepting caller-provided coordinates.
impl From<PositionError> for MastergoalError {
    fn from(value: PositionError) -> Self {
        MastergoalError::invalid_input(value.to_string())
    }
}

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("position ({row}, {col}) is out of bounds")]
pub struct PositionError {
    pub row: i16,
    pub col: i16,
}

impl PositionError {
    pub fn at(row: i16, col: i16) -> Self {
        PositionError { row, col }
    }
}

pub type Result<T> = std::result::Result<T, MastergoalError>;
