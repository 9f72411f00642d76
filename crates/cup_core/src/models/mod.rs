pub mod fixture;
pub mod phase;
pub mod team;

pub use fixture::{CardTally, Fixture, MatchId, PlayerStatLine, Score, TieBreak};
pub use phase::Phase;
pub use team::{default_abbreviation, MatchOutcome, Team, TeamId, TeamStats};
