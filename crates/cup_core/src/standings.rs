//! Group standings: a pure ranking over the teams of one group.

use crate::models::Team;
use crate::tournament::Tournament;

/// Teams of `group` ordered descending by (points, goal difference,
/// goals for). The sort is stable, so residual ties keep slot order.
/// Pure read: no team or match state is touched.
pub fn group_standings<'a>(tournament: &'a Tournament, group: &str) -> Vec<&'a Team> {
    let mut teams = tournament.teams_in_group(group);
    teams.sort_by(|a, b| b.stats.ranking_key().cmp(&a.stats.ranking_key()));
    teams
}
