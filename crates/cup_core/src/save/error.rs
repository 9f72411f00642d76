use thiserror::Error;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("corrupt snapshot at {path}: {detail}")]
    Corrupted { path: String, detail: String },

    #[error("snapshot version mismatch: found {found}, expected {expected}")]
    VersionMismatch { found: u32, expected: u32 },

    #[error("invalid snapshot: {0}")]
    Invalid(String),
}

impl SnapshotError {
    /// Whether retrying (after fixing the environment) can succeed. A
    /// corrupt or invalid snapshot needs manual intervention.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, SnapshotError::Io(_))
    }
}
