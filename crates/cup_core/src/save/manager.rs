use super::error::SnapshotError;
use super::format::TournamentSnapshot;
use crate::tournament::Tournament;

use std::fs::{rename, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

/// Persists the tournament as a single JSON snapshot file.
///
/// The snapshot is rewritten in full after every mutating operation.
/// Writes are atomic: the data goes to a temporary sibling file which is
/// fsynced and then renamed over the target, so a crash mid-write never
/// leaves a torn snapshot.
pub struct SnapshotStore {
    path: PathBuf,
}

impl SnapshotStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SnapshotStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Saves the tournament, replacing any previous snapshot.
    pub fn save(&self, tournament: &Tournament) -> Result<(), SnapshotError> {
        let snapshot = TournamentSnapshot::new(tournament.clone());
        snapshot.validate()?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let data = serde_json::to_vec_pretty(&snapshot)?;
        let temp_path = self.path.with_extension("tmp");
        {
            let mut file = File::create(&temp_path)?;
            file.write_all(&data)?;
            file.flush()?;
            // sync_all ensures the bytes hit the disk before the rename.
            file.sync_all()?;
        }
        rename(&temp_path, &self.path)?;

        log::debug!("saved {} bytes to {:?}", data.len(), self.path);
        Ok(())
    }

    /// Loads the snapshot. An absent file means no tournament exists
    /// yet (`Ok(None)`); a present-but-unreadable file is an error,
    /// never a silent reset.
    pub fn load(&self) -> Result<Option<Tournament>, SnapshotError> {
        if !self.path.exists() {
            log::debug!("no snapshot at {:?}", self.path);
            return Ok(None);
        }

        let mut file = File::open(&self.path)?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        let snapshot: TournamentSnapshot =
            serde_json::from_slice(&data).map_err(|err| SnapshotError::Corrupted {
                path: self.path.display().to_string(),
                detail: err.to_string(),
            })?;
        snapshot.validate()?;

        log::debug!("loaded {} bytes from {:?}", data.len(), self.path);
        Ok(Some(snapshot.tournament))
    }

    /// Loads the snapshot, or starts a fresh tournament when none has
    /// been saved yet.
    pub fn load_or_default(&self) -> Result<Tournament, SnapshotError> {
        Ok(self.load()?.unwrap_or_default())
    }
}
