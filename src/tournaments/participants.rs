use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::tournaments::teams::Team;

fn default_feedback() -> f64 {
    3.0
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct Judge {
    pub id: String,
    pub name: String,
    pub institution_id: Option<String>,
    pub total_debates_judged: u32,
    pub elimination_debates_judged: u32,
    /// Mean feedback on a 1-5 scale.
    pub avg_feedback_score: f64,
    /// Teams this judge has declared they must not adjudicate.
    pub conflicts: HashSet<String>,
    pub assignments_this_tournament: u32,
    pub cross_tournament_stats: JudgeHistory,
}

impl Default for Judge {
    fn default() -> Self {
        Judge {
            id: String::new(),
            name: String::new(),
            institution_id: None,
            total_debates_judged: 0,
            elimination_debates_judged: 0,
            avg_feedback_score: default_feedback(),
            conflicts: HashSet::new(),
            assignments_this_tournament: 0,
            cross_tournament_stats: JudgeHistory::default(),
        }
    }
}

/// A judge's record at previous tournaments.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct JudgeHistory {
    pub tournaments_judged: u32,
    pub total_debates: u32,
    pub elimination_debates: u32,
    /// Standard deviation of the judge's feedback across tournaments; lower
    /// is more consistent.
    pub feedback_consistency: f64,
}

impl Judge {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Judge {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Experience proxy: elimination debates count double.
    pub fn experience(&self) -> u32 {
        self.total_debates_judged + 2 * self.elimination_debates_judged
    }

    pub fn shares_institution_with(&self, team: &Team) -> bool {
        match (&self.institution_id, &team.institution_id) {
            (Some(judge), Some(team)) => judge == team,
            _ => false,
        }
    }

    pub fn declared_conflict_with(&self, team: &Team) -> bool {
        self.conflicts.contains(&team.id)
    }
}

/// The teams and judges of a round, indexed by id in roster order.
#[derive(Clone, Debug, Default)]
pub struct TournamentParticipants {
    pub teams: IndexMap<String, Team>,
    pub judges: IndexMap<String, Judge>,
}

impl TournamentParticipants {
    /// Indexes the roster. Returns the first id which occurs twice, if any,
    /// as the error value.
    pub fn index(
        teams: &[Team],
        judges: &[Judge],
    ) -> Result<Self, DuplicateParticipant> {
        let mut indexed_teams = IndexMap::with_capacity(teams.len());
        for team in teams {
            if indexed_teams
                .insert(team.id.clone(), team.clone())
                .is_some()
            {
                return Err(DuplicateParticipant::Team(team.id.clone()));
            }
        }

        let mut indexed_judges = IndexMap::with_capacity(judges.len());
        for judge in judges {
            if indexed_judges
                .insert(judge.id.clone(), judge.clone())
                .is_some()
            {
                return Err(DuplicateParticipant::Judge(judge.id.clone()));
            }
        }

        Ok(Self {
            teams: indexed_teams,
            judges: indexed_judges,
        })
    }

    /// Like [`TournamentParticipants::index`], but later duplicates replace
    /// earlier ones. Used where a malformed roster should not stop a check
    /// from running.
    pub fn index_lenient(teams: &[Team], judges: &[Judge]) -> Self {
        Self {
            teams: teams.iter().map(|t| (t.id.clone(), t.clone())).collect(),
            judges: judges.iter().map(|j| (j.id.clone(), j.clone())).collect(),
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum DuplicateParticipant {
    Team(String),
    Judge(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn experience_weights_elimination_rounds() {
        let mut judge = Judge::new("j1", "Judge 1");
        judge.total_debates_judged = 10;
        judge.elimination_debates_judged = 3;
        assert_eq!(judge.experience(), 16);
    }

    #[test]
    fn feedback_defaults_when_absent() {
        let judge: Judge =
            serde_json::from_str(r#"{"id": "j1", "name": "Judge 1"}"#).unwrap();
        assert_eq!(judge.avg_feedback_score, 3.0);
    }

    #[test]
    fn index_rejects_duplicate_teams() {
        let teams = vec![Team::new("a", "A"), Team::new("a", "A again")];
        assert_eq!(
            TournamentParticipants::index(&teams, &[]).unwrap_err(),
            DuplicateParticipant::Team("a".to_string())
        );
    }

    #[test]
    fn institution_clash_requires_both_sides() {
        let mut judge = Judge::new("j1", "Judge 1");
        let mut team = Team::new("t1", "Team 1");
        assert!(!judge.shares_institution_with(&team));
        judge.institution_id = Some("uni".to_string());
        assert!(!judge.shares_institution_with(&team));
        team.institution_id = Some("uni".to_string());
        assert!(judge.shares_institution_with(&team));
    }
}
