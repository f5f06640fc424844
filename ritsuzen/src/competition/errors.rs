//! Competition error types.

use thiserror::Error;

use super::models::CompetitionStatus;

/// Competition errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompetitionError {
    /// No competition has been created
    #[error("No active competition")]
    NoActiveCompetition,

    /// A competition is already running
    #[error("Competition already active: {0}")]
    CompetitionAlreadyActive(String),

    /// Competition is finished and can no longer be changed
    #[error("Competition is finished")]
    Finished,

    /// Status transition not allowed
    #[error("Invalid status transition from {from} to {to}")]
    InvalidTransition {
        from: CompetitionStatus,
        to: CompetitionStatus,
    },

    /// Participant not found
    #[error("Participant not found: {0}")]
    ParticipantNotFound(String),

    /// Record missing for an existing participant
    #[error("Record not found for participant {0}")]
    RecordNotFound(String),

    /// Participant name or grade rejected
    #[error("Invalid participant: {0}")]
    InvalidParticipant(String),

    /// Round number outside 1..=rounds_count
    #[error("Round {round} out of range (1..={rounds_count})")]
    RoundOutOfRange { round: u32, rounds_count: u32 },

    /// Shot index outside the round
    #[error("Shot index {0} out of range (0..=3)")]
    ShotIndexOutOfRange(usize),

    /// Group size must be at least one
    #[error("Invalid group size: {0}")]
    InvalidGroupSize(usize),

    /// Settings rejected by validation
    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    /// Participant master not found in the roster
    #[error("Participant master not found: {0}")]
    MasterNotFound(String),
}

/// Result type for competition operations
pub type CompetitionResult<T> = Result<T, CompetitionError>;
