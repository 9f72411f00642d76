//! The tournament aggregate: team registry, match ledger and the
//! result-recording rules shared by the group stage and the knockout
//! rounds.
//!
//! The aggregate is an owned value passed explicitly to the standings,
//! qualification and bracket functions; persistence is an explicit
//! [`crate::save::SnapshotStore`] call, never a hidden global.

use crate::error::{Result, TournamentError};
use crate::models::{CardTally, Fixture, MatchId, Phase, PlayerStatLine, Score, Team, TeamId, TieBreak};
use crate::tiebreak::TieBreakResolver;
use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Outcome of recording one result, returned for display.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedResult {
    pub match_id: MatchId,
    pub score: Score,
    pub tie_break: Option<TieBreak>,
    /// Advancing team for knockout matches; `None` for a group-stage draw.
    pub winner: Option<TeamId>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Tournament {
    pub name: String,
    pub host: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    configuration_closed: bool,
    next_match_seq: u32,
    teams: BTreeMap<TeamId, Team>,
    fixtures: BTreeMap<MatchId, Fixture>,
}

impl Default for Tournament {
    fn default() -> Self {
        Tournament::new(
            "FIFA U-20 World Cup Chile 2025",
            "Chile",
            NaiveDate::from_ymd_opt(2025, 9, 27).unwrap(),
            NaiveDate::from_ymd_opt(2025, 10, 19).unwrap(),
        )
    }
}

impl Tournament {
    pub fn new(
        name: impl Into<String>,
        host: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Tournament {
            name: name.into(),
            host: host.into(),
            start_date,
            end_date,
            configuration_closed: false,
            next_match_seq: 1,
            teams: BTreeMap::new(),
            fixtures: BTreeMap::new(),
        }
    }

    // --- team registry ---

    pub fn add_team(&mut self, team: Team) {
        self.teams.insert(team.id.clone(), team);
    }

    pub fn team(&self, id: &str) -> Option<&Team> {
        self.teams.get(id)
    }

    pub fn team_mut(&mut self, id: &str) -> Option<&mut Team> {
        self.teams.get_mut(id)
    }

    pub fn teams(&self) -> impl Iterator<Item = &Team> {
        self.teams.values()
    }

    pub fn team_count(&self) -> usize {
        self.teams.len()
    }

    /// Distinct group labels, sorted.
    pub fn group_labels(&self) -> BTreeSet<String> {
        self.teams.values().map(|t| t.group.clone()).collect()
    }

    /// Teams of one group in slot order (identifier order).
    pub fn teams_in_group(&self, group: &str) -> Vec<&Team> {
        self.teams.values().filter(|t| t.group == group).collect()
    }

    // --- match ledger ---

    /// Appends a fixture, assigning the next sequential identifier.
    pub fn add_fixture(&mut self, fixture: Fixture) -> MatchId {
        let id = format!("M{:03}", self.next_match_seq);
        self.next_match_seq += 1;
        self.fixtures.insert(id.clone(), fixture);
        id
    }

    pub fn fixture(&self, id: &str) -> Option<&Fixture> {
        self.fixtures.get(id)
    }

    /// All fixtures in creation order.
    pub fn fixtures(&self) -> impl Iterator<Item = (&MatchId, &Fixture)> {
        self.fixtures.iter()
    }

    /// Fixtures of one phase, in creation order.
    pub fn fixtures_in_phase(&self, phase: Phase) -> Vec<(&MatchId, &Fixture)> {
        self.fixtures.iter().filter(|(_, f)| f.phase == phase).collect()
    }

    pub fn fixture_count(&self) -> usize {
        self.fixtures.len()
    }

    // --- configuration gate ---

    pub fn is_configuration_closed(&self) -> bool {
        self.configuration_closed
    }

    /// Closes configuration; results can only be recorded afterwards.
    pub fn close_configuration(&mut self) {
        self.configuration_closed = true;
        log::info!("tournament configuration closed ({} teams, {} fixtures)",
            self.teams.len(), self.fixtures.len());
    }

    // --- phase queries ---

    /// True once every group-stage fixture has a recorded result.
    pub fn group_stage_complete(&self) -> bool {
        let group_fixtures = self.fixtures_in_phase(Phase::GroupStage);
        !group_fixtures.is_empty() && group_fixtures.iter().all(|(_, f)| f.is_played())
    }

    /// True when every fixture of `phase` has a resolved winner.
    pub fn phase_resolved(&self, phase: Phase) -> bool {
        let fixtures = self.fixtures_in_phase(phase);
        !fixtures.is_empty() && fixtures.iter().all(|(_, f)| f.winner().is_some())
    }

    /// The deepest knockout phase that has fixtures, if any.
    pub fn current_knockout_phase(&self) -> Option<Phase> {
        Phase::KNOCKOUT_ORDER
            .iter()
            .rev()
            .copied()
            .find(|p| !self.fixtures_in_phase(*p).is_empty())
    }

    /// The final's winner, once it has been played.
    pub fn champion(&self) -> Option<&Team> {
        let (_, final_match) = self.fixtures_in_phase(Phase::Final).into_iter().next()?;
        let winner = final_match.winner()?;
        self.teams.get(winner)
    }

    /// True once the final has a resolved winner.
    pub fn knockout_complete(&self) -> bool {
        self.champion().is_some()
    }

    // --- result recording ---

    /// Records a result for `match_id`.
    ///
    /// A level knockout score triggers the tie-break resolver; the stored
    /// score then includes extra-time goals, and a shootout record is
    /// attached when extra time did not separate the sides. Re-entering
    /// a result reverts the previous statistics contribution first, so
    /// stats never double-count. Statistics always derive from the
    /// stored (extended-time) score.
    pub fn record_result<R: Rng>(
        &mut self,
        match_id: &str,
        home_goals: u32,
        away_goals: u32,
        cards: Option<(CardTally, CardTally)>,
        rng: &mut R,
    ) -> Result<RecordedResult> {
        if !self.configuration_closed {
            return Err(TournamentError::ConfigurationNotClosed);
        }
        let fixture = self
            .fixtures
            .get(match_id)
            .ok_or_else(|| TournamentError::MatchNotFound { id: match_id.to_string() })?;
        let home_id = fixture.home.clone();
        let away_id = fixture.away.clone();
        if !self.teams.contains_key(&home_id) {
            return Err(TournamentError::TeamNotFound { id: home_id });
        }
        if !self.teams.contains_key(&away_id) {
            return Err(TournamentError::TeamNotFound { id: away_id });
        }

        // Revert a previously recorded result before re-applying.
        if self.fixtures[match_id].is_played() {
            log::warn!("re-recording result for {match_id}; reverting previous stats");
            self.revert_fixture_stats(match_id);
        }

        let phase = self.fixtures[match_id].phase;
        let entered = Score::new(home_goals, away_goals);
        let (score, tie_break) = if phase.is_knockout() && entered.is_level() {
            let resolution = TieBreakResolver::resolve(entered, rng);
            (resolution.final_score, Some(resolution.tie_break))
        } else {
            (entered, None)
        };

        {
            let fixture = self.fixtures.get_mut(match_id).unwrap();
            fixture.score = Some(score);
            fixture.tie_break = tie_break;
            if let Some((home_cards, away_cards)) = cards {
                fixture.home_cards = home_cards;
                fixture.away_cards = away_cards;
            }
        }

        self.apply_fixture_stats(match_id);

        let winner = self.fixtures[match_id].winner().cloned();
        log::info!(
            "recorded {match_id} ({phase}): {}",
            self.fixtures[match_id].result_text()
        );
        Ok(RecordedResult { match_id: match_id.to_string(), score, tie_break, winner })
    }

    /// Attaches operator-entered per-player stat lines to a fixture.
    pub fn set_player_stats(&mut self, match_id: &str, lines: Vec<PlayerStatLine>) -> Result<()> {
        let fixture = self
            .fixtures
            .get_mut(match_id)
            .ok_or_else(|| TournamentError::MatchNotFound { id: match_id.to_string() })?;
        fixture.player_stats = lines;
        Ok(())
    }

    fn apply_fixture_stats(&mut self, match_id: &str) {
        let fixture = &self.fixtures[match_id];
        let (score, home_outcome) = match (fixture.score, fixture.home_outcome()) {
            (Some(score), Some(outcome)) => (score, outcome),
            _ => return,
        };
        let (home_id, away_id) = (fixture.home.clone(), fixture.away.clone());
        if let Some(home) = self.teams.get_mut(&home_id) {
            home.stats.apply_result(score.home, score.away, home_outcome);
        }
        if let Some(away) = self.teams.get_mut(&away_id) {
            away.stats.apply_result(score.away, score.home, home_outcome.reversed());
        }
    }

    fn revert_fixture_stats(&mut self, match_id: &str) {
        let fixture = &self.fixtures[match_id];
        let (score, home_outcome) = match (fixture.score, fixture.home_outcome()) {
            (Some(score), Some(outcome)) => (score, outcome),
            _ => return,
        };
        let (home_id, away_id) = (fixture.home.clone(), fixture.away.clone());
        if let Some(home) = self.teams.get_mut(&home_id) {
            home.stats.revert_result(score.home, score.away, home_outcome);
        }
        if let Some(away) = self.teams.get_mut(&away_id) {
            away.stats.revert_result(score.away, score.home, home_outcome.reversed());
        }
        let fixture = self.fixtures.get_mut(match_id).unwrap();
        fixture.score = None;
        fixture.tie_break = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    fn two_team_tournament() -> (Tournament, MatchId) {
        let mut t = Tournament::default();
        t.add_team(Team::new("A1", "Chile", "A"));
        t.add_team(Team::new("A2", "Brasil", "A"));
        let id = t.add_fixture(Fixture::group_stage("A1", "A2", 1));
        t.close_configuration();
        (t, id)
    }

    #[test]
    fn match_ids_are_sequential() {
        let mut t = Tournament::default();
        let first = t.add_fixture(Fixture::group_stage("A1", "A2", 1));
        let second = t.add_fixture(Fixture::group_stage("A3", "A4", 1));
        assert_eq!(first, "M001");
        assert_eq!(second, "M002");
    }

    #[test]
    fn recording_requires_closed_configuration() {
        let mut t = Tournament::default();
        t.add_team(Team::new("A1", "Chile", "A"));
        t.add_team(Team::new("A2", "Brasil", "A"));
        let id = t.add_fixture(Fixture::group_stage("A1", "A2", 1));
        let err = t.record_result(&id, 1, 0, None, &mut rng()).unwrap_err();
        assert!(matches!(err, TournamentError::ConfigurationNotClosed));
    }

    #[test]
    fn unknown_match_is_rejected() {
        let (mut t, _) = two_team_tournament();
        let err = t.record_result("M999", 1, 0, None, &mut rng()).unwrap_err();
        assert!(matches!(err, TournamentError::MatchNotFound { .. }));
    }

    #[test]
    fn win_awards_three_points() {
        let (mut t, id) = two_team_tournament();
        let outcome = t.record_result(&id, 2, 1, None, &mut rng()).unwrap();
        assert_eq!(outcome.winner.as_deref(), Some("A1"));
        let home = t.team("A1").unwrap();
        let away = t.team("A2").unwrap();
        assert_eq!((home.stats.points, home.stats.won, home.stats.played), (3, 1, 1));
        assert_eq!((away.stats.points, away.stats.lost, away.stats.played), (0, 1, 1));
        assert_eq!(home.stats.goal_difference(), 1);
    }

    #[test]
    fn group_draw_stands_without_tie_break() {
        let (mut t, id) = two_team_tournament();
        let outcome = t.record_result(&id, 1, 1, None, &mut rng()).unwrap();
        assert_eq!(outcome.tie_break, None);
        assert_eq!(outcome.winner, None);
        assert_eq!(t.team("A1").unwrap().stats.points, 1);
        assert_eq!(t.team("A2").unwrap().stats.points, 1);
    }

    #[test]
    fn re_recording_does_not_double_count() {
        let (mut t, id) = two_team_tournament();
        t.record_result(&id, 3, 0, None, &mut rng()).unwrap();
        t.record_result(&id, 0, 1, None, &mut rng()).unwrap();
        let home = t.team("A1").unwrap();
        let away = t.team("A2").unwrap();
        assert_eq!(home.stats.played, 1);
        assert_eq!(away.stats.played, 1);
        assert_eq!(home.stats.points, 0);
        assert_eq!(away.stats.points, 3);
        assert_eq!(home.stats.goals_for, 0);
        assert_eq!(home.stats.goals_against, 1);
    }

    #[test]
    fn level_knockout_result_gets_tie_break() {
        let mut t = Tournament::default();
        t.add_team(Team::new("A1", "Chile", "A"));
        t.add_team(Team::new("B2", "Brasil", "B"));
        let id = t.add_fixture(Fixture::knockout("A1", "B2", Phase::RoundOf16));
        t.close_configuration();
        let outcome = t.record_result(&id, 1, 1, None, &mut rng()).unwrap();
        let tb = outcome.tie_break.expect("tie break must be recorded");
        assert!(outcome.winner.is_some());
        // Stored score is regulation plus extra time, never shootout kicks.
        assert_eq!(outcome.score.home, 1 + tb.extra_time.home);
        assert_eq!(outcome.score.away, 1 + tb.extra_time.away);
        assert!(t.fixture(&id).unwrap().winner().is_some());
    }

    #[test]
    fn decisive_knockout_result_clears_stale_tie_break() {
        let mut t = Tournament::default();
        t.add_team(Team::new("A1", "Chile", "A"));
        t.add_team(Team::new("B2", "Brasil", "B"));
        let id = t.add_fixture(Fixture::knockout("A1", "B2", Phase::RoundOf16));
        t.close_configuration();
        t.record_result(&id, 2, 2, None, &mut rng()).unwrap();
        assert!(t.fixture(&id).unwrap().tie_break.is_some());
        t.record_result(&id, 2, 0, None, &mut rng()).unwrap();
        assert_eq!(t.fixture(&id).unwrap().tie_break, None);
        assert_eq!(t.team("A1").unwrap().stats.played, 1);
    }

    #[test]
    fn cards_are_stored_on_the_fixture() {
        let (mut t, id) = two_team_tournament();
        let cards = (CardTally { yellow: 2, red: 0 }, CardTally { yellow: 1, red: 1 });
        t.record_result(&id, 1, 0, Some(cards), &mut rng()).unwrap();
        let fx = t.fixture(&id).unwrap();
        assert_eq!(fx.home_cards.yellow, 2);
        assert_eq!(fx.away_cards.red, 1);
    }

    #[test]
    fn player_stat_lines_round_trip() {
        let (mut t, id) = two_team_tournament();
        t.record_result(&id, 2, 0, None, &mut rng()).unwrap();
        let lines = vec![PlayerStatLine {
            player: "R. Soto".to_string(),
            goals: 2,
            yellow_cards: 1,
            red_cards: 0,
        }];
        t.set_player_stats(&id, lines.clone()).unwrap();
        assert_eq!(t.fixture(&id).unwrap().player_stats, lines);

        let err = t.set_player_stats("M999", Vec::new()).unwrap_err();
        assert!(matches!(err, TournamentError::MatchNotFound { .. }));

        let json = serde_json::to_string(&t).unwrap();
        let back: Tournament = serde_json::from_str(&json).unwrap();
        assert_eq!(back.fixture(&id).unwrap().player_stats, lines);
    }

    #[test]
    fn snapshot_roundtrip_preserves_state() {
        let (mut t, id) = two_team_tournament();
        t.record_result(&id, 2, 1, None, &mut rng()).unwrap();
        let json = serde_json::to_string(&t).unwrap();
        let back: Tournament = serde_json::from_str(&json).unwrap();
        assert_eq!(t, back);
    }
}
