//! Knockout qualification: group winners, runners-up and the four best
//! third-placed teams across all groups.

use crate::error::{Result, TournamentError};
use crate::models::TeamId;
use crate::standings::group_standings;
use crate::tournament::Tournament;

/// Number of knockout entrants.
pub const ENTRANT_COUNT: usize = 16;

/// Number of third-placed teams that qualify.
pub const BEST_THIRDS: usize = 4;

/// The selected knockout entrants, grouped by how they qualified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Qualifiers {
    pub winners: Vec<TeamId>,
    pub runners_up: Vec<TeamId>,
    pub best_thirds: Vec<TeamId>,
}

impl Qualifiers {
    /// Entrants in seeding order: winners, then runners-up, then best
    /// thirds, de-duplicated preserving that order.
    pub fn entrant_order(&self) -> Vec<TeamId> {
        let mut combined: Vec<TeamId> = Vec::with_capacity(ENTRANT_COUNT);
        for id in
            self.winners.iter().chain(self.runners_up.iter()).chain(self.best_thirds.iter())
        {
            if !combined.contains(id) {
                combined.push(id.clone());
            }
        }
        combined
    }
}

/// Selects the 16 knockout entrants once the group stage is fully
/// played. Fails with `QualificationIncomplete` when results are
/// missing, a group ranks fewer than three teams, or the combined list
/// does not hold exactly 16 distinct identifiers.
pub fn select_entrants(tournament: &Tournament) -> Result<Qualifiers> {
    if !tournament.group_stage_complete() {
        return Err(TournamentError::QualificationIncomplete { found: 0 });
    }

    let mut winners = Vec::new();
    let mut runners_up = Vec::new();
    let mut thirds: Vec<&crate::models::Team> = Vec::new();

    for group in tournament.group_labels() {
        let table = group_standings(tournament, &group);
        if table.len() < 3 {
            return Err(TournamentError::QualificationIncomplete {
                found: winners.len() + runners_up.len(),
            });
        }
        winners.push(table[0].id.clone());
        runners_up.push(table[1].id.clone());
        thirds.push(table[2]);
    }

    // Rank third-placed teams across groups by the same standings key.
    thirds.sort_by(|a, b| b.stats.ranking_key().cmp(&a.stats.ranking_key()));
    let best_thirds: Vec<TeamId> =
        thirds.iter().take(BEST_THIRDS).map(|t| t.id.clone()).collect();

    let qualifiers = Qualifiers { winners, runners_up, best_thirds };
    let found = qualifiers.entrant_order().len();
    if found != ENTRANT_COUNT {
        return Err(TournamentError::QualificationIncomplete { found });
    }

    log::info!(
        "qualification selected: {} winners, {} runners-up, {} best thirds",
        qualifiers.winners.len(),
        qualifiers.runners_up.len(),
        qualifiers.best_thirds.len()
    );
    Ok(qualifiers)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::groups::GroupAssigner;
    use crate::models::Phase;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// Builds six complete groups where slot order decides every match:
    /// within a group, the lower slot always wins by a margin that makes
    /// the final table mirror slot order.
    pub(crate) fn played_out_tournament() -> Tournament {
        let names: Vec<String> = (0..24).map(|i| format!("Nation {i:02}")).collect();
        let mut assigner = GroupAssigner::new(names.clone());
        for name in &names {
            assigner.assign(name).unwrap();
        }
        let mut t = Tournament::default();
        assigner.finalize(&mut t).unwrap();

        let ids: Vec<String> =
            t.fixtures_in_phase(Phase::GroupStage).iter().map(|(id, _)| (*id).clone()).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        for id in ids {
            let fx = t.fixture(&id).unwrap();
            // Lower slot number wins; bigger slot gap, bigger margin.
            let home_slot = fx.home[1..].parse::<u32>().unwrap();
            let away_slot = fx.away[1..].parse::<u32>().unwrap();
            let (h, a) = if home_slot < away_slot {
                (away_slot - home_slot + 1, 0)
            } else {
                (0, home_slot - away_slot + 1)
            };
            t.record_result(&id, h, a, None, &mut rng).unwrap();
        }
        t
    }

    #[test]
    fn selects_sixteen_distinct_entrants_in_order() {
        let t = played_out_tournament();
        let qualifiers = select_entrants(&t).unwrap();
        assert_eq!(qualifiers.winners.len(), 6);
        assert_eq!(qualifiers.runners_up.len(), 6);
        assert_eq!(qualifiers.best_thirds.len(), 4);

        let order = qualifiers.entrant_order();
        assert_eq!(order.len(), 16);
        let mut distinct = order.clone();
        distinct.sort();
        distinct.dedup();
        assert_eq!(distinct.len(), 16);

        // Winners first, in group order, then runners-up.
        assert_eq!(&order[..6], &["A1", "B1", "C1", "D1", "E1", "F1"]);
        assert_eq!(&order[6..12], &["A2", "B2", "C2", "D2", "E2", "F2"]);
        for id in &order[12..] {
            assert!(id.ends_with('3'), "best thirds must be rank-3 teams, got {id}");
        }
    }

    #[test]
    fn best_thirds_are_ranked_across_groups() {
        let mut t = played_out_tournament();
        // Boost group F's third so it must rank first among thirds.
        t.team_mut("F3").unwrap().stats.points += 2;
        let qualifiers = select_entrants(&t).unwrap();
        assert_eq!(qualifiers.best_thirds[0], "F3");
    }

    #[test]
    fn incomplete_group_stage_is_rejected() {
        let names: Vec<String> = (0..24).map(|i| format!("Nation {i:02}")).collect();
        let mut assigner = GroupAssigner::new(names.clone());
        for name in &names {
            assigner.assign(name).unwrap();
        }
        let mut t = Tournament::default();
        assigner.finalize(&mut t).unwrap();

        // No results recorded at all.
        let err = select_entrants(&t).unwrap_err();
        assert!(matches!(err, TournamentError::QualificationIncomplete { .. }));
    }
}
