//! Draw generation for a single round.
//!
//! The pipeline is: pick the pairing method, pair the teams, allocate
//! judges, then check and score every debate. Nothing here keeps state
//! between calls or modifies the roster it is given.

use serde::{Deserialize, Serialize};

use crate::tournaments::{
    config::{PairingMethod, TournamentConfig},
    participants::{Judge, TournamentParticipants},
    rounds::{
        DrawMethod,
        draws::{
            Pairing, Severity,
            manage::{
                drawalgs::{DrawInput, MakeDrawError, TeamsOfRoom},
                judges::{JudgeLoad, Panel, allocate_judges},
                quality::{BalanceMetrics, average_quality, score_pairing},
                validate::validate_debate,
            },
        },
        resolve_method,
    },
    teams::Team,
};

pub mod drawalgs;
pub mod edit;
pub mod judges;
pub mod quality;
pub mod validate;

pub const BYE_ROOM_NAME: &str = "Bye";

/// A generated round.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct RoundDraw {
    pub round: u32,
    pub method: DrawMethod,
    /// Debates in rank order, followed by the bye (if any).
    pub pairings: Vec<Pairing>,
    /// The judges' assignment counters including this round.
    pub judge_load: JudgeLoad,
}

impl RoundDraw {
    pub fn debates(&self) -> usize {
        self.pairings.iter().filter(|p| !p.is_bye_round).count()
    }

    pub fn byes(&self) -> usize {
        self.pairings.iter().filter(|p| p.is_bye_round).count()
    }

    pub fn conflicts_of_severity(&self, severity: Severity) -> usize {
        self.pairings
            .iter()
            .flat_map(|p| &p.conflicts)
            .filter(|c| c.severity == severity)
            .count()
    }

    pub fn average_quality(&self) -> Option<f64> {
        average_quality(&self.pairings)
    }
}

/// Draws a round.
///
/// Malformed input (see [`DrawInput::new`]) is rejected before any pairing
/// is attempted. Everything else, including rematches, clashes and a short
/// supply of judges, is reported as a conflict on the affected debate.
#[tracing::instrument(skip(teams, judges, config))]
pub fn generate_pairings(
    teams: &[Team],
    judges: &[Judge],
    config: &TournamentConfig,
    round: u32,
    method: PairingMethod,
) -> Result<RoundDraw, MakeDrawError> {
    let input = DrawInput::new(teams, judges, config, round, method)?;
    Ok(do_draw(&input))
}

/// Draws a round from an already checked input.
pub fn do_draw(input: &DrawInput) -> RoundDraw {
    let method = resolve_method(input.round, &input.config, input.method);
    tracing::debug!(
        "Drawing round {} with {} teams and {} judges using {method}",
        input.round,
        input.participants.teams.len(),
        input.participants.judges.len()
    );

    let rooms = match method {
        DrawMethod::Fold => drawalgs::fold::make_draw(input),
        DrawMethod::Swiss => drawalgs::swiss::make_draw(input),
    };

    let (panels, judge_load) = allocate_judges(
        &rooms,
        &input.participants,
        &input.config,
        JudgeLoad::of_judges(input.participants.judges.values()),
    );

    let mut debate_no = 0;
    let pairings = rooms
        .into_iter()
        .zip(panels)
        .map(|(room, panel)| {
            let (room_name, proposition, opposition) = match room {
                TeamsOfRoom::Debate {
                    proposition,
                    opposition,
                } => {
                    debate_no += 1;
                    (
                        input.config.room_name(debate_no - 1),
                        Some(proposition),
                        Some(opposition),
                    )
                }
                TeamsOfRoom::Bye(team) => {
                    (BYE_ROOM_NAME.to_string(), Some(team), None)
                }
            };

            let Panel {
                judges,
                head_judge_id,
            } = panel;

            let mut pairing = Pairing {
                room_name,
                proposition_team_id: proposition,
                opposition_team_id: opposition,
                judges,
                head_judge_id,
                is_bye_round: false,
                conflicts: Vec::new(),
                quality_score: 0.0,
            };
            reassess(&mut pairing, &input.participants, &input.config);
            pairing
        })
        .collect::<Vec<_>>();

    RoundDraw {
        round: input.round,
        method,
        pairings,
        judge_load,
    }
}

/// Recomputes everything about `pairing` which is derived from its teams and
/// judges: whether it is a bye, its conflicts and its quality score.
pub(crate) fn reassess(
    pairing: &mut Pairing,
    participants: &TournamentParticipants,
    config: &TournamentConfig,
) {
    pairing.is_bye_round = pairing.teams().count() == 1;

    pairing.conflicts = validate_debate(
        participants,
        pairing.proposition_team_id.as_deref(),
        pairing.opposition_team_id.as_deref(),
        &pairing.judges,
        config,
    );

    pairing.quality_score = if pairing.is_bye_round {
        100.0
    } else {
        let metrics = BalanceMetrics::of_debate(
            participants,
            pairing.proposition_team_id.as_deref(),
            pairing.opposition_team_id.as_deref(),
            &pairing.judges,
        );
        score_pairing(&pairing.conflicts, &metrics, &config.quality)
    };
}
