//! # cup_core - Tournament Core
//!
//! Data model and algorithms for a groups-plus-knockout football
//! tournament: group assignment and round-robin scheduling, result
//! recording, standings, qualification selection (group winners,
//! runners-up, best thirds), bracket generation, tie-break resolution
//! (extra time and penalty shootouts), and snapshot persistence.
//!
//! The aggregate [`Tournament`] is an owned value: callers load it from
//! a [`SnapshotStore`], mutate it through explicit operations, and save
//! it back. Randomized tie-breaks take any [`rand::Rng`], so tests and
//! frontends can inject a seeded generator for reproducible outcomes.

pub mod bracket;
pub mod error;
pub mod export;
pub mod groups;
pub mod models;
pub mod qualification;
pub mod save;
pub mod standings;
pub mod tiebreak;
pub mod tournament;

pub use bracket::{advance_knockout, seed_round_of_16, AdvanceOutcome};
pub use error::{Result, TournamentError};
pub use export::{fixture_rows, matchday_rows, standings_rows, FixtureRow, StandingsRow};
pub use groups::{dedup_team_names, GroupAssigner, DEFAULT_GROUP_LABELS, GROUP_CAPACITY};
pub use models::{
    CardTally, Fixture, MatchId, Phase, PlayerStatLine, Score, Team, TeamId, TeamStats, TieBreak,
};
pub use qualification::{select_entrants, Qualifiers, ENTRANT_COUNT};
pub use save::{SnapshotError, SnapshotStore, TournamentSnapshot, SNAPSHOT_VERSION};
pub use standings::group_standings;
pub use tiebreak::{Resolution, TieBreakResolver};
pub use tournament::{RecordedResult, Tournament};
