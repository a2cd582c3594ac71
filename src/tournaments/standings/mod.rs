//! Orders teams for pairing.
//!
//! All of these sorts are stable, so teams which tie on every key stay in
//! roster order and the resulting draw is reproducible.

use itertools::Itertools;

use crate::tournaments::teams::Team;

/// Ranks teams by seeding strength (used before any results are in).
pub fn rank_by_strength<'a>(
    teams: impl IntoIterator<Item = &'a Team>,
) -> Vec<&'a Team> {
    let mut ranked = teams.into_iter().collect::<Vec<_>>();
    ranked.sort_by(|a, b| b.strength().total_cmp(&a.strength()));
    ranked
}

/// Ranks teams by wins, then by total points.
pub fn rank_by_results<'a>(
    teams: impl IntoIterator<Item = &'a Team>,
) -> Vec<&'a Team> {
    let mut ranked = teams.into_iter().collect::<Vec<_>>();
    ranked.sort_by(|a, b| {
        b.wins
            .cmp(&a.wins)
            .then_with(|| b.total_points.total_cmp(&a.total_points))
    });
    ranked
}

/// Splits a list produced by [`rank_by_results`] into score groups (runs of
/// teams on the same number of wins), highest first.
pub fn score_groups<'a>(ranked: &[&'a Team]) -> Vec<Vec<&'a Team>> {
    ranked
        .iter()
        .chunk_by(|team| team.wins)
        .into_iter()
        .map(|(_, group)| group.copied().collect())
        .collect()
}
