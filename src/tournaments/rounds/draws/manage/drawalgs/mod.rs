//! Team pairing algorithms. These only decide who debates whom (and on which
//! side); judges are allocated afterwards.

use thiserror::Error;

use crate::tournaments::{
    config::{PairingMethod, TournamentConfig},
    participants::{DuplicateParticipant, Judge, TournamentParticipants},
    teams::Team,
};

pub mod fold;
pub mod swiss;

/// The error messages will be shown to the user, and therefore should be
/// readable.
#[derive(Error, Debug, PartialEq)]
pub enum MakeDrawError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("invalid round number {0} (rounds are numbered from 1)")]
    InvalidRound(u32),
    #[error("team `{0}` appears more than once in the roster")]
    DuplicateTeam(String),
    #[error("judge `{0}` appears more than once in the roster")]
    DuplicateJudge(String),
}

/// Everything needed to draw a single round. Constructing one checks the
/// preconditions of the draw, so the algorithms themselves cannot fail.
#[derive(Clone, Debug)]
pub struct DrawInput {
    pub config: TournamentConfig,
    /// 1-based.
    pub round: u32,
    pub method: PairingMethod,
    pub participants: TournamentParticipants,
}

impl DrawInput {
    pub fn new(
        teams: &[Team],
        judges: &[Judge],
        config: &TournamentConfig,
        round: u32,
        method: PairingMethod,
    ) -> Result<Self, MakeDrawError> {
        config.check().map_err(MakeDrawError::InvalidConfiguration)?;

        if round == 0 {
            return Err(MakeDrawError::InvalidRound(round));
        }

        let participants = TournamentParticipants::index(teams, judges)
            .map_err(|duplicate| match duplicate {
                DuplicateParticipant::Team(id) => {
                    MakeDrawError::DuplicateTeam(id)
                }
                DuplicateParticipant::Judge(id) => {
                    MakeDrawError::DuplicateJudge(id)
                }
            })?;

        Ok(DrawInput {
            config: config.clone(),
            round,
            method,
            participants,
        })
    }
}

/// The output of a pairing algorithm: teams only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TeamsOfRoom {
    Debate {
        proposition: String,
        opposition: String,
    },
    Bye(String),
}

impl TeamsOfRoom {
    /// Puts the team which has spent less time on proposition there. If both
    /// teams are equally balanced, the higher ranked team (`higher`) is
    /// proposition.
    pub fn with_balanced_sides(higher: &Team, lower: &Team) -> Self {
        let (proposition, opposition) =
            if higher.side_imbalance() <= lower.side_imbalance() {
                (higher, lower)
            } else {
                (lower, higher)
            };

        TeamsOfRoom::Debate {
            proposition: proposition.id.clone(),
            opposition: opposition.id.clone(),
        }
    }
}

/// Returns the index of the lowest ranked team for which `eligible` holds,
/// or the lowest ranked team if there is no such team. `ranked` must be
/// non-empty.
pub(crate) fn lowest_ranked_where(
    ranked: &[&Team],
    eligible: impl Fn(&Team) -> bool,
) -> usize {
    ranked
        .iter()
        .rposition(|team| eligible(*team))
        .unwrap_or(ranked.len() - 1)
}
