// Snapshot persistence: versioned JSON envelope, atomic file writes.

pub mod error;
pub mod format;
pub mod manager;

pub use error::SnapshotError;
pub use format::TournamentSnapshot;
pub use manager::SnapshotStore;

pub const SNAPSHOT_VERSION: u32 = 1;
