//! Group assignment and the group-stage schedule.
//!
//! The operator assigns teams one at a time to the active group; a group
//! takes exactly four teams and the active group auto-advances when it
//! fills. Finalization persists the team/group/slot assignment into the
//! tournament and generates the full three-matchday round-robin.

use crate::error::{Result, TournamentError};
use crate::models::{Fixture, Team};
use crate::tournament::Tournament;
use std::collections::BTreeMap;

/// Teams per group.
pub const GROUP_CAPACITY: usize = 4;

/// Default group labels for a 24-team tournament.
pub const DEFAULT_GROUP_LABELS: [&str; 6] = ["A", "B", "C", "D", "E", "F"];

/// Fixed round-robin pattern for the four slots of a group, one entry
/// per matchday. Every unordered slot pair appears exactly once.
pub const ROUND_ROBIN_DAYS: [[(usize, usize); 2]; 3] =
    [[(0, 1), (2, 3)], [(0, 2), (3, 1)], [(3, 0), (1, 2)]];

/// De-duplicates an ordered list of team names by trimmed equality;
/// the first occurrence wins and blank entries are dropped.
pub fn dedup_team_names<I>(names: I) -> Vec<String>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    let mut seen = Vec::new();
    for name in names {
        let trimmed = name.as_ref().trim();
        if !trimmed.is_empty() && !seen.iter().any(|s: &String| s == trimmed) {
            seen.push(trimmed.to_string());
        }
    }
    seen
}

/// Interactive group assignment state.
#[derive(Debug, Clone)]
pub struct GroupAssigner {
    pool: Vec<String>,
    labels: Vec<String>,
    groups: BTreeMap<String, Vec<String>>,
    active: usize,
}

impl GroupAssigner {
    /// Builds an assigner over the default A-F groups.
    pub fn new(names: Vec<String>) -> Self {
        Self::with_labels(DEFAULT_GROUP_LABELS.iter().map(|s| s.to_string()).collect(), names)
    }

    pub fn with_labels(labels: Vec<String>, names: Vec<String>) -> Self {
        let pool = dedup_team_names(names);
        let groups = labels.iter().map(|l| (l.clone(), Vec::new())).collect();
        GroupAssigner { pool, labels, groups, active: 0 }
    }

    pub fn active_group(&self) -> &str {
        &self.labels[self.active]
    }

    pub fn pool(&self) -> &[String] {
        &self.pool
    }

    pub fn group(&self, label: &str) -> &[String] {
        self.groups.get(label).map(|g| g.as_slice()).unwrap_or(&[])
    }

    pub fn group_labels(&self) -> &[String] {
        &self.labels
    }

    /// Assigns `name` to the active group. Rejects names already placed
    /// in any group, names missing from the pool, and a full active
    /// group. When the assignment fills the group, the active group
    /// advances (except after the last group).
    pub fn assign(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        for (label, members) in &self.groups {
            if members.iter().any(|m| m == name) {
                return Err(TournamentError::DuplicateAssignment {
                    team: name.to_string(),
                    group: label.clone(),
                });
            }
        }
        let Some(pos) = self.pool.iter().position(|p| p == name) else {
            return Err(TournamentError::TeamNotFound { id: name.to_string() });
        };

        let label = self.labels[self.active].clone();
        let members = self.groups.get_mut(&label).expect("label exists");
        if members.len() >= GROUP_CAPACITY {
            return Err(TournamentError::GroupFull { group: label, capacity: GROUP_CAPACITY });
        }

        members.push(self.pool.remove(pos));
        if self.groups[&label].len() == GROUP_CAPACITY && self.active < self.labels.len() - 1 {
            self.active += 1;
        }
        Ok(())
    }

    pub fn previous_group(&mut self) {
        self.active = self.active.saturating_sub(1);
    }

    pub fn next_group(&mut self) {
        if self.active < self.labels.len() - 1 {
            self.active += 1;
        }
    }

    /// True when every group holds exactly four teams.
    pub fn is_complete(&self) -> bool {
        self.groups.values().all(|g| g.len() == GROUP_CAPACITY)
    }

    /// Persists the assignment into `tournament`: creates the teams
    /// (identifier = group label + slot, e.g. "A1"), schedules the
    /// round-robin, and closes configuration. Fails without touching
    /// the tournament if any group is short.
    pub fn finalize(self, tournament: &mut Tournament) -> Result<()> {
        for label in &self.labels {
            let count = self.groups[label].len();
            if count != GROUP_CAPACITY {
                return Err(TournamentError::IncompleteAssignment {
                    group: label.clone(),
                    count,
                    required: GROUP_CAPACITY,
                });
            }
        }

        for label in &self.labels {
            let members = &self.groups[label];
            let ids: Vec<String> =
                (1..=GROUP_CAPACITY).map(|slot| format!("{label}{slot}")).collect();
            for (id, name) in ids.iter().zip(members) {
                tournament.add_team(Team::new(id.clone(), name.clone(), label.clone()));
            }
            for (day, pairings) in ROUND_ROBIN_DAYS.iter().enumerate() {
                for &(a, b) in pairings {
                    tournament.add_fixture(Fixture::group_stage(
                        ids[a].clone(),
                        ids[b].clone(),
                        day as u8 + 1,
                    ));
                }
            }
            log::debug!("group {label} scheduled: {:?}", members);
        }

        tournament.close_configuration();
        Ok(())
    }
}
