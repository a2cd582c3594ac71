use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::tournaments::rounds::side_names::Side;

/// A snapshot of a team, as supplied by the caller for a single round.
///
/// The draw engine never modifies these records: recording the result of a
/// round (sides, opponents, byes) is up to whoever persists the tournament.
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct Team {
    pub id: String,
    pub name: String,
    pub institution_id: Option<String>,
    /// The sides this team has argued, in the order the debates took place.
    pub side_history: Vec<Side>,
    pub opponents_faced: HashSet<String>,
    pub wins: u32,
    pub total_points: f64,
    /// The (1-based) rounds in which this team received a bye.
    pub bye_rounds: HashSet<u32>,
    pub performance_score: f64,
    pub cross_tournament_performance: CrossTournamentPerformance,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(default)]
pub struct CrossTournamentPerformance {
    pub tournaments_participated: u32,
    pub total_wins: u32,
    pub total_debates: u32,
    pub avg_performance: f64,
}

impl Team {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Team {
            id: id.into(),
            name: name.into(),
            ..Default::default()
        }
    }

    /// Number of times on proposition minus the number of times on
    /// opposition. Positive values mean the team is owed an opposition.
    pub fn side_imbalance(&self) -> i64 {
        self.side_history
            .iter()
            .map(|side| match side {
                Side::Proposition => 1,
                Side::Opposition => -1,
            })
            .sum()
    }

    pub fn has_faced(&self, other: &str) -> bool {
        self.opponents_faced.contains(other)
    }

    pub fn had_bye_in(&self, round: u32) -> bool {
        self.bye_rounds.contains(&round)
    }

    pub fn debates_in_tournament(&self) -> usize {
        self.side_history.len()
    }

    /// The strength used to seed the team and to measure how closely two
    /// teams are matched.
    ///
    /// Teams that have not yet debated in this tournament are seeded from
    /// their record at previous tournaments, if they have one.
    pub fn strength(&self) -> f64 {
        if self.debates_in_tournament() == 0
            && self.cross_tournament_performance.tournaments_participated > 0
        {
            self.cross_tournament_performance.avg_performance
        } else {
            self.performance_score
        }
    }
}

/// Whether two teams have met before. Either team's record is enough, since
/// callers do not always update both sides of the history.
pub fn is_rematch(a: &Team, b: &Team) -> bool {
    a.has_faced(&b.id) || b.has_faced(&a.id)
}
