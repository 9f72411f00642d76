use serde::{Deserialize, Serialize};
use std::fmt;

/// Tournament phase, from the group stage through the final.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    #[serde(rename = "Group Stage")]
    GroupStage,
    #[serde(rename = "Round of 16")]
    RoundOf16,
    #[serde(rename = "Quarterfinals")]
    Quarterfinals,
    #[serde(rename = "Semifinals")]
    Semifinals,
    #[serde(rename = "Final")]
    Final,
}

impl Phase {
    /// Knockout phases in play order. The group stage is not part of the
    /// elimination state machine.
    pub const KNOCKOUT_ORDER: [Phase; 4] =
        [Phase::RoundOf16, Phase::Quarterfinals, Phase::Semifinals, Phase::Final];

    pub fn is_knockout(&self) -> bool {
        !matches!(self, Phase::GroupStage)
    }

    /// The phase that follows this one, or `None` after the final.
    pub fn next(&self) -> Option<Phase> {
        match self {
            Phase::GroupStage => Some(Phase::RoundOf16),
            Phase::RoundOf16 => Some(Phase::Quarterfinals),
            Phase::Quarterfinals => Some(Phase::Semifinals),
            Phase::Semifinals => Some(Phase::Final),
            Phase::Final => None,
        }
    }

    /// Display label, identical to the serialized form.
    pub fn label(&self) -> &'static str {
        match self {
            Phase::GroupStage => "Group Stage",
            Phase::RoundOf16 => "Round of 16",
            Phase::Quarterfinals => "Quarterfinals",
            Phase::Semifinals => "Semifinals",
            Phase::Final => "Final",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn knockout_chain_ends_at_final() {
        let mut phase = Phase::GroupStage;
        let mut seen = vec![phase];
        while let Some(next) = phase.next() {
            seen.push(next);
            phase = next;
        }
        assert_eq!(phase, Phase::Final);
        assert_eq!(seen.len(), 5);
    }

    #[test]
    fn serde_uses_display_labels() {
        let json = serde_json::to_string(&Phase::RoundOf16).unwrap();
        assert_eq!(json, "\"Round of 16\"");
        let back: Phase = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Phase::RoundOf16);
    }

    #[test]
    fn group_stage_is_not_knockout() {
        assert!(!Phase::GroupStage.is_knockout());
        for phase in Phase::KNOCKOUT_ORDER {
            assert!(phase.is_knockout());
        }
    }
}
