use serde::{Deserialize, Serialize};

use crate::tournaments::config::{PairingMethod, TournamentConfig};

pub mod draws;
pub mod results;
pub mod side_names;

/// The pairing algorithm actually used to draw a round.
#[derive(Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Debug)]
pub enum DrawMethod {
    #[serde(rename = "fold")]
    Fold,
    #[serde(rename = "swiss")]
    Swiss,
}

impl std::fmt::Display for DrawMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            DrawMethod::Fold => "fold",
            DrawMethod::Swiss => "swiss",
        })
    }
}

/// Picks the pairing algorithm for a (1-based) round.
///
/// An explicit `fold` or `swiss` request is always honoured. Under `auto`,
/// rounds up to and including `config.fold_rounds` are folded and every
/// later round is Swiss paired. This depends only on the round number, not
/// on how many preliminary rounds remain.
pub fn resolve_method(
    round: u32,
    config: &TournamentConfig,
    requested: PairingMethod,
) -> DrawMethod {
    match requested {
        PairingMethod::Fold => DrawMethod::Fold,
        PairingMethod::Swiss => DrawMethod::Swiss,
        PairingMethod::Auto if round <= config.fold_rounds => DrawMethod::Fold,
        PairingMethod::Auto => DrawMethod::Swiss,
    }
}
