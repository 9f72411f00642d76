//! Tie-break resolution for knockout matches that end level in
//! regulation: simulated extra time, then a penalty shootout.

use crate::models::{Score, TieBreak};
use rand::Rng;

/// What the resolver produced: the stored final score (regulation plus
/// extra time) and the tie-break record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub final_score: Score,
    pub tie_break: TieBreak,
}

impl Resolution {
    /// True when the home side advances.
    pub fn home_wins(&self) -> bool {
        if !self.final_score.is_level() {
            return self.final_score.home > self.final_score.away;
        }
        let pens = self.tie_break.shootout.expect("level score must carry a shootout");
        pens.home > pens.away
    }
}

pub struct TieBreakResolver;

impl TieBreakResolver {
    /// Sudden-death rounds after the initial five kicks. With a fair
    /// coin per kick the cap is unreachable in practice; if it is ever
    /// hit, one deciding conversion goes to a uniformly chosen side so
    /// the shootout still ends with unequal totals.
    pub const MAX_SUDDEN_DEATH_ROUNDS: u32 = 20;

    /// Resolves a knockout match that ended level in regulation.
    ///
    /// Each side gets 0-2 extra-time goals, drawn uniformly. If extra
    /// time separates the sides no shootout is taken; otherwise five
    /// kicks per side (fair coin each) plus sudden death decide the
    /// winner. The returned final score never includes shootout kicks.
    pub fn resolve<R: Rng>(regulation: Score, rng: &mut R) -> Resolution {
        debug_assert!(regulation.is_level(), "resolver is only invoked on level scores");

        let extra_time = Score::new(rng.gen_range(0..=2), rng.gen_range(0..=2));
        let final_score =
            Score::new(regulation.home + extra_time.home, regulation.away + extra_time.away);

        if !final_score.is_level() {
            log::debug!("extra time decided it: {final_score}");
            return Resolution { final_score, tie_break: TieBreak { extra_time, shootout: None } };
        }

        let shootout = Self::shootout(rng);
        log::debug!("shootout decided it: {shootout}");
        Resolution {
            final_score,
            tie_break: TieBreak { extra_time, shootout: Some(shootout) },
        }
    }

    fn shootout<R: Rng>(rng: &mut R) -> Score {
        let mut home: u32 = (0..5).map(|_| u32::from(rng.gen_bool(0.5))).sum();
        let mut away: u32 = (0..5).map(|_| u32::from(rng.gen_bool(0.5))).sum();

        let mut rounds = 0;
        while home == away {
            if rounds >= Self::MAX_SUDDEN_DEATH_ROUNDS {
                if rng.gen_bool(0.5) {
                    home += 1;
                } else {
                    away += 1;
                }
                break;
            }
            home += u32::from(rng.gen_bool(0.5));
            away += u32::from(rng.gen_bool(0.5));
            rounds += 1;
        }

        Score::new(home, away)
    }
}
