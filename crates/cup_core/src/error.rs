use crate::models::Phase;
use crate::save::SnapshotError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TournamentError {
    #[error("{team} is already assigned to group {group}")]
    DuplicateAssignment { team: String, group: String },

    #[error("group {group} already has {capacity} teams")]
    GroupFull { group: String, capacity: usize },

    #[error("group {group} has {count} teams, needs {required}")]
    IncompleteAssignment { group: String, count: usize, required: usize },

    #[error("configuration must be closed before recording results")]
    ConfigurationNotClosed,

    #[error("match {id} not found")]
    MatchNotFound { id: String },

    #[error("team {id} not found")]
    TeamNotFound { id: String },

    #[error("qualification incomplete: expected 16 distinct entrants, found {found}")]
    QualificationIncomplete { found: usize },

    #[error("{phase} has unresolved matches; complete all results before advancing")]
    IncompletePhase { phase: Phase },

    #[error("knockout stage has not been seeded yet")]
    KnockoutNotStarted,

    #[error("round of 16 is already seeded; qualification runs once")]
    KnockoutAlreadySeeded,

    #[error("snapshot error: {0}")]
    Snapshot(#[from] SnapshotError),
}

impl TournamentError {
    /// Whether the operator can fix the condition and retry. All domain
    /// errors are recoverable; only a corrupt snapshot is not.
    pub fn is_recoverable(&self) -> bool {
        match self {
            TournamentError::Snapshot(err) => err.is_recoverable(),
            _ => true,
        }
    }
}

pub type Result<T> = std::result::Result<T, TournamentError>;
