//! Bracket generation: seeding the round of 16 from the qualifiers and
//! advancing the knockout state machine one phase at a time.
//!
//! Transitions are operator-triggered; a phase only advances when every
//! one of its matches has a resolved winner.

use crate::error::{Result, TournamentError};
use crate::models::{Fixture, MatchId, Phase, TeamId};
use crate::qualification::{Qualifiers, ENTRANT_COUNT};
use crate::tournament::Tournament;

/// Result of advancing the knockout state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdvanceOutcome {
    /// The next phase has been scheduled.
    Scheduled { phase: Phase, match_ids: Vec<MatchId> },
    /// The final was already resolved; the tournament is complete.
    Champion(TeamId),
}

/// Pairs the 16 qualification-ordered entrants sequentially into the
/// eight round-of-16 matches. Seeding happens exactly once: a second
/// call is refused rather than appending a duplicate set of fixtures.
pub fn seed_round_of_16(
    tournament: &mut Tournament,
    qualifiers: &Qualifiers,
) -> Result<Vec<MatchId>> {
    if !tournament.fixtures_in_phase(Phase::RoundOf16).is_empty() {
        return Err(TournamentError::KnockoutAlreadySeeded);
    }
    let entrants = qualifiers.entrant_order();
    if entrants.len() != ENTRANT_COUNT {
        return Err(TournamentError::QualificationIncomplete { found: entrants.len() });
    }
    let match_ids = schedule_pairs(tournament, &entrants, Phase::RoundOf16);
    log::info!("round of 16 seeded: {} matches", match_ids.len());
    Ok(match_ids)
}

/// Advances past the current knockout phase.
///
/// Every current-phase match must have a resolved winner; otherwise the
/// transition is refused with `IncompletePhase`. From the final, the
/// champion is reported instead of scheduling anything.
pub fn advance_knockout(tournament: &mut Tournament) -> Result<AdvanceOutcome> {
    let current =
        tournament.current_knockout_phase().ok_or(TournamentError::KnockoutNotStarted)?;

    let mut winners: Vec<TeamId> = Vec::new();
    for (_, fixture) in tournament.fixtures_in_phase(current) {
        match fixture.winner() {
            Some(winner) => winners.push(winner.clone()),
            None => return Err(TournamentError::IncompletePhase { phase: current }),
        }
    }

    match current.next() {
        None => {
            let champion = winners.into_iter().next().expect("final has one match");
            log::info!("tournament complete, champion: {champion}");
            Ok(AdvanceOutcome::Champion(champion))
        }
        Some(next) => {
            let match_ids = schedule_pairs(tournament, &winners, next);
            log::info!("{next} scheduled: {} matches", match_ids.len());
            Ok(AdvanceOutcome::Scheduled { phase: next, match_ids })
        }
    }
}

/// Pairs teams sequentially ((0,1), (2,3), ...) into `phase` fixtures.
/// If a pairing would match a team against itself, the next available
/// distinct team is substituted.
fn schedule_pairs(tournament: &mut Tournament, teams: &[TeamId], phase: Phase) -> Vec<MatchId> {
    let mut remaining: Vec<TeamId> = teams.to_vec();
    let mut match_ids = Vec::with_capacity(remaining.len() / 2);

    while remaining.len() >= 2 {
        let home = remaining.remove(0);
        let away_pos = remaining.iter().position(|id| *id != home);
        let Some(pos) = away_pos else {
            log::warn!("no distinct opponent left for {home} in {phase}");
            break;
        };
        let away = remaining.remove(pos);

        for id in [&home, &away] {
            if let Some(team) = tournament.team_mut(id) {
                team.stats.reach_stage(phase);
            }
        }
        match_ids.push(tournament.add_fixture(Fixture::knockout(home, away, phase)));
    }

    match_ids
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qualification::{select_entrants, tests::played_out_tournament};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn seeded_tournament() -> Tournament {
        let mut t = played_out_tournament();
        let qualifiers = select_entrants(&t).unwrap();
        seed_round_of_16(&mut t, &qualifiers).unwrap();
        t
    }

    fn play_phase(t: &mut Tournament, phase: Phase) {
        let ids: Vec<String> =
            t.fixtures_in_phase(phase).iter().map(|(id, _)| (*id).clone()).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        for id in ids {
            // Home side wins every knockout match.
            t.record_result(&id, 1, 0, None, &mut rng).unwrap();
        }
    }

    #[test]
    fn round_of_16_has_eight_disjoint_pairings() {
        let t = seeded_tournament();
        let fixtures = t.fixtures_in_phase(Phase::RoundOf16);
        assert_eq!(fixtures.len(), 8);

        let mut seen: Vec<&TeamId> = Vec::new();
        for (_, fx) in &fixtures {
            assert_ne!(fx.home, fx.away, "a team cannot play itself");
            assert!(!seen.contains(&&fx.home));
            assert!(!seen.contains(&&fx.away));
            seen.push(&fx.home);
            seen.push(&fx.away);
        }
        assert_eq!(seen.len(), 16);
    }

    #[test]
    fn second_seeding_is_refused() {
        let mut t = played_out_tournament();
        let qualifiers = select_entrants(&t).unwrap();
        seed_round_of_16(&mut t, &qualifiers).unwrap();

        let err = seed_round_of_16(&mut t, &qualifiers).unwrap_err();
        assert!(matches!(err, TournamentError::KnockoutAlreadySeeded));
        // The bracket is untouched: still exactly eight matches.
        assert_eq!(t.fixtures_in_phase(Phase::RoundOf16).len(), 8);
    }

    #[test]
    fn seeding_marks_furthest_stage() {
        let t = seeded_tournament();
        assert_eq!(t.team("A1").unwrap().stats.furthest_stage, Some(Phase::RoundOf16));
        // A fourth-placed team stays at its group-stage marker.
        assert_eq!(t.team("A4").unwrap().stats.furthest_stage, None);
    }

    #[test]
    fn advance_refuses_unresolved_phase() {
        let mut t = seeded_tournament();
        let err = advance_knockout(&mut t).unwrap_err();
        assert!(matches!(err, TournamentError::IncompletePhase { phase: Phase::RoundOf16 }));
    }

    #[test]
    fn advance_before_seeding_is_rejected() {
        let mut t = played_out_tournament();
        let err = advance_knockout(&mut t).unwrap_err();
        assert!(matches!(err, TournamentError::KnockoutNotStarted));
    }

    #[test]
    fn full_knockout_run_produces_a_champion() {
        let mut t = seeded_tournament();

        play_phase(&mut t, Phase::RoundOf16);
        match advance_knockout(&mut t).unwrap() {
            AdvanceOutcome::Scheduled { phase, match_ids } => {
                assert_eq!(phase, Phase::Quarterfinals);
                assert_eq!(match_ids.len(), 4);
            }
            other => panic!("unexpected outcome {other:?}"),
        }

        play_phase(&mut t, Phase::Quarterfinals);
        advance_knockout(&mut t).unwrap();
        play_phase(&mut t, Phase::Semifinals);
        match advance_knockout(&mut t).unwrap() {
            AdvanceOutcome::Scheduled { phase, match_ids } => {
                assert_eq!(phase, Phase::Final);
                assert_eq!(match_ids.len(), 1);
            }
            other => panic!("unexpected outcome {other:?}"),
        }

        play_phase(&mut t, Phase::Final);
        let outcome = advance_knockout(&mut t).unwrap();
        let AdvanceOutcome::Champion(champion) = outcome else {
            panic!("expected a champion");
        };
        assert_eq!(t.champion().unwrap().id, champion);
        assert!(t.knockout_complete());
        assert_eq!(
            t.team(&champion).unwrap().stats.furthest_stage,
            Some(Phase::Final)
        );
    }

    #[test]
    fn self_pairing_guard_substitutes_next_entrant() {
        let mut t = played_out_tournament();
        // Degenerate input: duplicate leading entries.
        let teams: Vec<TeamId> = vec![
            "A1".into(),
            "A1".into(),
            "B1".into(),
            "C1".into(),
        ];
        let ids = schedule_pairs(&mut t, &teams, Phase::RoundOf16);
        assert_eq!(ids.len(), 2);
        for id in &ids {
            let fx = t.fixture(id).unwrap();
            assert_ne!(fx.home, fx.away);
        }
    }
}
