use super::{Phase, TeamId};
use crate::models::team::MatchOutcome;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequential match identifier, e.g. "M001".
pub type MatchId = String;

/// A goal count for each side of a match.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Score {
    pub home: u32,
    pub away: u32,
}

impl Score {
    pub fn new(home: u32, away: u32) -> Self {
        Score { home, away }
    }

    pub fn is_level(&self) -> bool {
        self.home == self.away
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} : {}", self.home, self.away)
    }
}

/// Yellow/red card counts for one side.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CardTally {
    pub yellow: u8,
    pub red: u8,
}

/// Per-player line attached to a fixture by the operator.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PlayerStatLine {
    pub player: String,
    pub goals: u8,
    pub yellow_cards: u8,
    pub red_cards: u8,
}

/// Tie-break record for a knockout match that ended level in regulation.
///
/// `extra_time` holds only the goals scored during extra time; the
/// fixture's stored score already includes them. The shootout, when
/// present, decides advancement but never alters goal tallies.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct TieBreak {
    pub extra_time: Score,
    pub shootout: Option<Score>,
}

/// A scheduled or played match.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Fixture {
    pub home: TeamId,
    pub away: TeamId,
    pub phase: Phase,
    /// Group-stage matchday (1-3); `None` for knockout matches.
    pub matchday: Option<u8>,
    pub kickoff: Option<NaiveDateTime>,
    /// Final stored goals. For a tie-broken knockout match this is the
    /// extended-time score; both fields are set together or not at all.
    pub score: Option<Score>,
    pub home_cards: CardTally,
    pub away_cards: CardTally,
    pub player_stats: Vec<PlayerStatLine>,
    pub tie_break: Option<TieBreak>,
}

impl Fixture {
    pub fn group_stage(home: impl Into<TeamId>, away: impl Into<TeamId>, matchday: u8) -> Self {
        Fixture {
            home: home.into(),
            away: away.into(),
            phase: Phase::GroupStage,
            matchday: Some(matchday),
            kickoff: None,
            score: None,
            home_cards: CardTally::default(),
            away_cards: CardTally::default(),
            player_stats: Vec::new(),
            tie_break: None,
        }
    }

    pub fn knockout(home: impl Into<TeamId>, away: impl Into<TeamId>, phase: Phase) -> Self {
        Fixture {
            home: home.into(),
            away: away.into(),
            phase,
            matchday: None,
            kickoff: None,
            score: None,
            home_cards: CardTally::default(),
            away_cards: CardTally::default(),
            player_stats: Vec::new(),
            tie_break: None,
        }
    }

    pub fn is_played(&self) -> bool {
        self.score.is_some()
    }

    pub fn involves(&self, team: &str) -> bool {
        self.home == team || self.away == team
    }

    /// The advancing team's id, if the match has a resolved winner.
    ///
    /// A level score falls through to the shootout record when one
    /// exists; a level group-stage match has no winner.
    pub fn winner(&self) -> Option<&TeamId> {
        let score = self.score.as_ref()?;
        if score.home > score.away {
            return Some(&self.home);
        }
        if score.away > score.home {
            return Some(&self.away);
        }
        let shootout = self.tie_break.as_ref()?.shootout.as_ref()?;
        if shootout.home > shootout.away {
            Some(&self.home)
        } else if shootout.away > shootout.home {
            Some(&self.away)
        } else {
            None
        }
    }

    /// Outcome from the home side's point of view, honoring a shootout
    /// decision. `None` until a result is recorded.
    pub fn home_outcome(&self) -> Option<MatchOutcome> {
        let score = self.score.as_ref()?;
        if score.home > score.away {
            return Some(MatchOutcome::Won);
        }
        if score.away > score.home {
            return Some(MatchOutcome::Lost);
        }
        match self.winner() {
            Some(id) if *id == self.home => Some(MatchOutcome::Won),
            Some(_) => Some(MatchOutcome::Lost),
            None => Some(MatchOutcome::Drawn),
        }
    }

    /// Short result text for display, e.g. "2 : 1 (pens 4 : 3)".
    pub fn result_text(&self) -> String {
        match (&self.score, &self.tie_break) {
            (None, _) => "PENDING".to_string(),
            (Some(score), None) => score.to_string(),
            (Some(score), Some(tb)) => match tb.shootout {
                Some(pens) => format!("{} (aet, pens {})", score, pens),
                None => format!("{} (aet)", score),
            },
        }
    }
}
