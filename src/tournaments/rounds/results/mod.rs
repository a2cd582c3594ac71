//! Recording played rounds.
//!
//! Drawing a round never touches the roster. Once the debates have been
//! held, the caller folds their results back into the teams and judges with
//! [`record_round`] before drawing the next round.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tournaments::{
    participants::Judge,
    rounds::{draws::Pairing, side_names::Side},
    teams::Team,
};

/// The result of one debate.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DebateResult {
    pub winner: Side,
    pub proposition_points: f64,
    pub opposition_points: f64,
}

impl DebateResult {
    pub fn points_of(&self, side: Side) -> f64 {
        match side {
            Side::Proposition => self.proposition_points,
            Side::Opposition => self.opposition_points,
        }
    }
}

#[derive(Error, Debug, PartialEq)]
pub enum RecordError {
    #[error("the round has {expected} debates but {got} results were given")]
    ResultCount { expected: usize, got: usize },
    #[error("team `{0}` is not on the roster")]
    UnknownTeam(String),
    #[error("judge `{0}` is not on the roster")]
    UnknownJudge(String),
    #[error("room {0} is not a debate between two teams")]
    Malformed(String),
}

/// Records a round's results. `results` holds one entry for each debate (bye
/// pairings excluded), in the order the debates appear in `pairings`.
///
/// A bye counts as a win without points. Nothing is modified unless the whole
/// round can be recorded.
pub fn record_round(
    teams: &mut [Team],
    judges: &mut [Judge],
    round: u32,
    pairings: &[Pairing],
    results: &[DebateResult],
) -> Result<(), RecordError> {
    let team_idx = teams
        .iter()
        .enumerate()
        .map(|(idx, team)| (team.id.clone(), idx))
        .collect::<HashMap<_, _>>();
    let judge_idx = judges
        .iter()
        .enumerate()
        .map(|(idx, judge)| (judge.id.clone(), idx))
        .collect::<HashMap<_, _>>();

    let debates = pairings
        .iter()
        .filter(|pairing| !pairing.is_bye_round)
        .collect::<Vec<_>>();
    if debates.len() != results.len() {
        return Err(RecordError::ResultCount {
            expected: debates.len(),
            got: results.len(),
        });
    }

    for pairing in pairings {
        for team in pairing.teams() {
            if !team_idx.contains_key(team) {
                return Err(RecordError::UnknownTeam(team.to_string()));
            }
        }
        for judge in &pairing.judges {
            if !judge_idx.contains_key(judge) {
                return Err(RecordError::UnknownJudge(judge.clone()));
            }
        }
    }
    for debate in &debates {
        match (&debate.proposition_team_id, &debate.opposition_team_id) {
            (Some(p), Some(o)) if p != o => (),
            _ => return Err(RecordError::Malformed(debate.room_name.clone())),
        }
    }

    for bye in pairings.iter().filter(|pairing| pairing.is_bye_round) {
        for team in bye.teams() {
            let team = &mut teams[team_idx[team]];
            team.bye_rounds.insert(round);
            team.wins += 1;
        }
    }

    for (debate, result) in debates.into_iter().zip(results) {
        for side in [Side::Proposition, Side::Opposition] {
            let (Some(id), Some(opponent)) = (
                debate.team_of_side(side),
                debate.team_of_side(side.opposite()),
            ) else {
                continue;
            };

            let team = &mut teams[team_idx[id]];
            team.side_history.push(side);
            team.opponents_faced.insert(opponent.to_string());
            team.total_points += result.points_of(side);
            if result.winner == side {
                team.wins += 1;
            }
            team.performance_score =
                team.total_points / team.debates_in_tournament() as f64;
        }

        for judge in &debate.judges {
            let judge = &mut judges[judge_idx[judge]];
            judge.assignments_this_tournament += 1;
            judge.total_debates_judged += 1;
        }
    }

    tracing::debug!("Recorded results of round {round}");

    Ok(())
}
