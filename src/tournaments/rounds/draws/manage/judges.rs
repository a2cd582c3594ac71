//! Judge allocation.
//!
//! Rooms are filled in draw order. For each room the available judges are
//! ranked so that conflicted judges come last, then by how many debates they
//! have already been given (fewest first) and finally by experience (most
//! first); the top of that list forms the panel. Conflicted judges are
//! therefore only used when there are not enough other judges left.
//!
//! Each allocation counts towards the judge's load straight away, so a judge
//! who already sits in an earlier room of the round sorts behind everyone
//! still unused. When the pool runs out, judges are used again in later rooms
//! rather than leaving panels short, unless the tournament asks for each judge
//! to sit in at most one room.

use std::collections::HashSet;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::tournaments::{
    config::TournamentConfig,
    participants::{Judge, TournamentParticipants},
    rounds::draws::manage::drawalgs::TeamsOfRoom,
    teams::Team,
};

/// How many debates each judge has been allocated to in this tournament.
///
/// This is threaded through allocation as a value: it starts from the
/// counters in the roster snapshot and the updated copy is handed back to the
/// caller, who may persist it.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct JudgeLoad(pub IndexMap<String, u32>);

impl JudgeLoad {
    pub fn of_judges<'a>(judges: impl IntoIterator<Item = &'a Judge>) -> Self {
        JudgeLoad(
            judges
                .into_iter()
                .map(|judge| {
                    (judge.id.clone(), judge.assignments_this_tournament)
                })
                .collect(),
        )
    }

    pub fn of(&self, judge: &str) -> u32 {
        self.0.get(judge).copied().unwrap_or(0)
    }

    fn record(mut self, judge: &str) -> Self {
        *self.0.entry(judge.to_string()).or_insert(0) += 1;
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Panel {
    /// Head judge first.
    pub judges: Vec<String>,
    pub head_judge_id: Option<String>,
}

impl Panel {
    /// Orders `selected` so that the head judge comes first. The head judge is
    /// the most experienced judge, with ties going to the judge with the best
    /// feedback and then to the judge selected first.
    pub fn with_head_judge(selected: Vec<&Judge>) -> Self {
        let head = selected
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| {
                b.experience().cmp(&a.experience()).then_with(|| {
                    b.avg_feedback_score.total_cmp(&a.avg_feedback_score)
                })
            })
            .map(|(idx, _)| idx);

        let mut judges =
            selected.iter().map(|j| j.id.clone()).collect::<Vec<_>>();
        if let Some(idx) = head {
            let head = judges.remove(idx);
            judges.insert(0, head);
        }

        Panel {
            head_judge_id: judges.first().cloned(),
            judges,
        }
    }
}

/// Allocates a panel to every debate in `rooms`. Byes get an empty panel.
///
/// Returns one panel per room, in the same order, along with `load` updated
/// to include the new allocations.
pub fn allocate_judges(
    rooms: &[TeamsOfRoom],
    participants: &TournamentParticipants,
    config: &TournamentConfig,
    load: JudgeLoad,
) -> (Vec<Panel>, JudgeLoad) {
    let judges_per_debate = config.judges_per_debate;
    let mut used: HashSet<&str> = HashSet::new();
    let mut load = load;
    let mut panels = Vec::with_capacity(rooms.len());

    for room in rooms {
        let (proposition, opposition) = match room {
            TeamsOfRoom::Debate {
                proposition,
                opposition,
            } => (proposition, opposition),
            TeamsOfRoom::Bye(_) => {
                panels.push(Panel::default());
                continue;
            }
        };

        let teams = [proposition, opposition]
            .into_iter()
            .filter_map(|id| participants.teams.get(id))
            .collect::<Vec<_>>();

        let mut candidates = participants
            .judges
            .values()
            .filter(|judge| {
                !config.exclusive_judges || !used.contains(judge.id.as_str())
            })
            .collect::<Vec<_>>();

        candidates.sort_by(|a, b| {
            school_conflict(a, &teams)
                .cmp(&school_conflict(b, &teams))
                .then_with(|| {
                    declared_conflict(a, &teams)
                        .cmp(&declared_conflict(b, &teams))
                })
                .then_with(|| load.of(&a.id).cmp(&load.of(&b.id)))
                .then_with(|| b.experience().cmp(&a.experience()))
        });
        candidates.truncate(judges_per_debate as usize);

        if candidates.len() < judges_per_debate as usize {
            tracing::warn!(
                "Only {} of {} judges available for {} vs {}",
                candidates.len(),
                judges_per_debate,
                proposition,
                opposition
            );
        }

        for judge in &candidates {
            if school_conflict(judge, &teams)
                || declared_conflict(judge, &teams)
            {
                tracing::debug!(
                    "Judge {} is conflicted but needed to fill the panel for \
                     {} vs {}",
                    judge.id,
                    proposition,
                    opposition
                );
            }
            used.insert(judge.id.as_str());
            load = load.record(&judge.id);
        }

        panels.push(Panel::with_head_judge(candidates));
    }

    (panels, load)
}

fn school_conflict(judge: &Judge, teams: &[&Team]) -> bool {
    teams.iter().any(|team| judge.shares_institution_with(team))
}

fn declared_conflict(judge: &Judge, teams: &[&Team]) -> bool {
    teams.iter().any(|team| judge.declared_conflict_with(team))
}
