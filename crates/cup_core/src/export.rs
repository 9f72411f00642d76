//! Presentation-agnostic tabular views. A frontend renders or exports
//! these rows; the core does not care about the output format.

use crate::models::Phase;
use crate::standings::group_standings;
use crate::tournament::Tournament;
use serde::Serialize;

/// One line of a group standings table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct StandingsRow {
    pub rank: usize,
    pub team_id: String,
    pub name: String,
    pub abbreviation: String,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub goals_for: u32,
    pub goals_against: u32,
    pub goal_difference: i32,
    pub points: u32,
}

/// One line of a fixture/result table.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FixtureRow {
    pub match_id: String,
    pub phase: Phase,
    pub matchday: Option<u8>,
    pub group: Option<String>,
    pub home: String,
    pub away: String,
    pub result: String,
}

/// Standings table for one group, ranked 1..=4.
pub fn standings_rows(tournament: &Tournament, group: &str) -> Vec<StandingsRow> {
    group_standings(tournament, group)
        .into_iter()
        .enumerate()
        .map(|(i, team)| StandingsRow {
            rank: i + 1,
            team_id: team.id.clone(),
            name: team.name.clone(),
            abbreviation: team.abbreviation.clone(),
            played: team.stats.played,
            won: team.stats.won,
            drawn: team.stats.drawn,
            lost: team.stats.lost,
            goals_for: team.stats.goals_for,
            goals_against: team.stats.goals_against,
            goal_difference: team.stats.goal_difference(),
            points: team.stats.points,
        })
        .collect()
}

/// Fixture/result table for one phase, in creation order. Team names
/// fall back to the raw identifier when a team is unknown.
pub fn fixture_rows(tournament: &Tournament, phase: Phase) -> Vec<FixtureRow> {
    tournament
        .fixtures_in_phase(phase)
        .into_iter()
        .map(|(id, fixture)| {
            let name_of = |team_id: &str| {
                tournament.team(team_id).map(|t| t.name.clone()).unwrap_or_else(|| team_id.to_string())
            };
            FixtureRow {
                match_id: id.clone(),
                phase: fixture.phase,
                matchday: fixture.matchday,
                group: tournament.team(&fixture.home).map(|t| t.group.clone()).filter(|_| phase == Phase::GroupStage),
                home: name_of(&fixture.home),
                away: name_of(&fixture.away),
                result: fixture.result_text(),
            }
        })
        .collect()
}

/// Group-stage fixtures of one matchday across all groups.
pub fn matchday_rows(tournament: &Tournament, matchday: u8) -> Vec<FixtureRow> {
    fixture_rows(tournament, Phase::GroupStage)
        .into_iter()
        .filter(|row| row.matchday == Some(matchday))
        .collect()
}
