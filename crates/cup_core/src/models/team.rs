use super::Phase;
use serde::{Deserialize, Serialize};

/// Stable team identifier, e.g. "A1" for the first slot of group A.
pub type TeamId = String;

/// A national team taking part in the tournament.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Team {
    pub id: TeamId,
    pub name: String,
    pub abbreviation: String,
    pub confederation: String,
    pub group: String,
    pub stats: TeamStats,
}

impl Team {
    /// Creates a team; the abbreviation defaults to the first three
    /// characters of the name, uppercased.
    pub fn new(id: impl Into<TeamId>, name: impl Into<String>, group: impl Into<String>) -> Self {
        let name = name.into();
        Team {
            id: id.into(),
            name: name.clone(),
            abbreviation: default_abbreviation(&name),
            confederation: String::new(),
            group: group.into(),
            stats: TeamStats::default(),
        }
    }

    pub fn with_abbreviation(mut self, abbreviation: impl Into<String>) -> Self {
        let abbr = abbreviation.into();
        if !abbr.is_empty() {
            self.abbreviation = abbr;
        }
        self
    }
}

pub fn default_abbreviation(name: &str) -> String {
    name.chars().take(3).collect::<String>().to_uppercase()
}

/// Accumulated team statistics. Goal difference is always derived from
/// goals for/against, never stored.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TeamStats {
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub points: u32,
    /// Deepest phase this team has reached so far.
    pub furthest_stage: Option<Phase>,
}

impl TeamStats {
    pub fn goal_difference(&self) -> i32 {
        self.goals_for as i32 - self.goals_against as i32
    }

    /// Ranking key: points, then goal difference, then goals for.
    /// Sorting descending by this key yields the standings order.
    pub fn ranking_key(&self) -> (u32, i32, u32) {
        (self.points, self.goal_difference(), self.goals_for)
    }

    /// Credits one played match with the given goals for/against.
    pub fn apply_result(&mut self, scored: u32, conceded: u32, outcome: MatchOutcome) {
        self.played += 1;
        self.goals_for += scored;
        self.goals_against += conceded;
        match outcome {
            MatchOutcome::Won => {
                self.won += 1;
                self.points += 3;
            }
            MatchOutcome::Drawn => {
                self.drawn += 1;
                self.points += 1;
            }
            MatchOutcome::Lost => self.lost += 1,
        }
    }

    /// Reverts a previously applied result. Counterpart of
    /// [`TeamStats::apply_result`]; used when a result is re-entered.
    pub fn revert_result(&mut self, scored: u32, conceded: u32, outcome: MatchOutcome) {
        self.played = self.played.saturating_sub(1);
        self.goals_for = self.goals_for.saturating_sub(scored);
        self.goals_against = self.goals_against.saturating_sub(conceded);
        match outcome {
            MatchOutcome::Won => {
                self.won = self.won.saturating_sub(1);
                self.points = self.points.saturating_sub(3);
            }
            MatchOutcome::Drawn => {
                self.drawn = self.drawn.saturating_sub(1);
                self.points = self.points.saturating_sub(1);
            }
            MatchOutcome::Lost => self.lost = self.lost.saturating_sub(1),
        }
    }

    /// Records that the team reached `phase`, keeping the deepest marker.
    pub fn reach_stage(&mut self, phase: Phase) {
        match self.furthest_stage {
            Some(current) if current >= phase => {}
            _ => self.furthest_stage = Some(phase),
        }
    }
}

/// Outcome of a match from one team's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchOutcome {
    Won,
    Drawn,
    Lost,
}

impl MatchOutcome {
    pub fn reversed(&self) -> MatchOutcome {
        match self {
            MatchOutcome::Won => MatchOutcome::Lost,
            MatchOutcome::Drawn => MatchOutcome::Drawn,
            MatchOutcome::Lost => MatchOutcome::Won,
        }
    }
}
