//! Scores how good a debate is, from 0 (terrible) to 100 (nothing to
//! complain about).

use crate::tournaments::{
    config::QualityWeights,
    participants::TournamentParticipants,
    rounds::draws::{Conflict, Pairing, Severity},
};

/// Measurements of a debate which are not conflicts in themselves but still
/// make it a worse debate.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BalanceMetrics {
    /// How far beyond one each team's side history would be from balanced
    /// after this debate, summed over both teams.
    pub side_excess: f64,
    /// Difference in strength between the two teams.
    pub strength_gap: f64,
    /// Coefficient of variation of the panel's experience, capped at 1.
    pub experience_spread: f64,
}

impl BalanceMetrics {
    pub fn of_debate(
        participants: &TournamentParticipants,
        proposition: Option<&str>,
        opposition: Option<&str>,
        judge_ids: &[String],
    ) -> Self {
        let prop = proposition.and_then(|id| participants.teams.get(id));
        let opp = opposition.and_then(|id| participants.teams.get(id));

        let excess = |imbalance: i64| (imbalance.abs() - 1).max(0) as f64;
        let side_excess = prop
            .map(|team| excess(team.side_imbalance() + 1))
            .unwrap_or(0.0)
            + opp
                .map(|team| excess(team.side_imbalance() - 1))
                .unwrap_or(0.0);

        let strength_gap = match (prop, opp) {
            (Some(prop), Some(opp)) => (prop.strength() - opp.strength()).abs(),
            _ => 0.0,
        };

        let experience = judge_ids
            .iter()
            .filter_map(|id| participants.judges.get(id))
            .map(|judge| f64::from(judge.experience()))
            .collect::<Vec<_>>();

        BalanceMetrics {
            side_excess,
            strength_gap,
            experience_spread: coefficient_of_variation(&experience)
                .min(1.0),
        }
    }
}

fn coefficient_of_variation(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    if mean <= 0.0 {
        return 0.0;
    }
    let variance =
        values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    variance.sqrt() / mean
}

/// Starts from 100 and subtracts a penalty for every conflict and for each
/// imbalance in `metrics`. The result is clamped to `[0, 100]`.
pub fn score_pairing(
    conflicts: &[Conflict],
    metrics: &BalanceMetrics,
    weights: &QualityWeights,
) -> f64 {
    let conflict_penalty = conflicts
        .iter()
        .map(|conflict| match conflict.severity {
            Severity::Error => weights.error_penalty,
            Severity::Warning => weights.warning_penalty,
        })
        .sum::<f64>();

    let score = 100.0
        - conflict_penalty
        - weights.side_weight * metrics.side_excess
        - (weights.gap_weight * metrics.strength_gap).min(weights.gap_cap)
        - weights.experience_weight * metrics.experience_spread;

    if score.is_nan() {
        0.0
    } else {
        score.clamp(0.0, 100.0)
    }
}

/// The mean quality of the real debates (byes excluded), or `None` if there
/// are none.
pub fn average_quality(pairings: &[Pairing]) -> Option<f64> {
    let scores = pairings
        .iter()
        .filter(|pairing| !pairing.is_bye_round)
        .map(|pairing| pairing.quality_score)
        .collect::<Vec<_>>();

    if scores.is_empty() {
        None
    } else {
        Some(scores.iter().sum::<f64>() / scores.len() as f64)
    }
}
