use super::error::SnapshotError;
use super::SNAPSHOT_VERSION;
use crate::tournament::Tournament;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// On-disk snapshot envelope: version + timestamp around the tournament
/// aggregate. Round-trips losslessly through JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TournamentSnapshot {
    pub version: u32,
    pub saved_at: DateTime<Utc>,
    pub tournament: Tournament,
}

impl TournamentSnapshot {
    pub fn new(tournament: Tournament) -> Self {
        TournamentSnapshot { version: SNAPSHOT_VERSION, saved_at: Utc::now(), tournament }
    }

    /// Structural checks beyond what deserialization guarantees.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.version != SNAPSHOT_VERSION {
            return Err(SnapshotError::VersionMismatch {
                found: self.version,
                expected: SNAPSHOT_VERSION,
            });
        }
        for (id, fixture) in self.tournament.fixtures() {
            for team in [&fixture.home, &fixture.away] {
                if self.tournament.team(team).is_none() {
                    return Err(SnapshotError::Invalid(format!(
                        "fixture {id} references unknown team {team}"
                    )));
                }
            }
            // A level knockout result must carry its tie-break record.
            if let Some(score) = &fixture.score {
                if fixture.phase.is_knockout() && score.is_level() && fixture.tie_break.is_none() {
                    return Err(SnapshotError::Invalid(format!(
                        "knockout fixture {id} is level but has no tie-break"
                    )));
                }
            }
        }
        Ok(())
    }
}
