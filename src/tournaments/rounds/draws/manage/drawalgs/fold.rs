//! Fold (power) pairing.
//!
//! Teams are ranked, the ranked list is cut in half, and the n-th team of
//! the top half debates the n-th team of the bottom half.

use crate::tournaments::{
    rounds::draws::manage::drawalgs::{
        DrawInput, TeamsOfRoom, lowest_ranked_where,
    },
    standings::{rank_by_results, rank_by_strength},
    teams::{Team, is_rematch},
};

pub fn make_draw(input: &DrawInput) -> Vec<TeamsOfRoom> {
    let teams = input.participants.teams.values();
    let mut ranked = if input.round == 1 {
        rank_by_strength(teams)
    } else {
        rank_by_results(teams)
    };

    if ranked.is_empty() {
        return Vec::new();
    }

    let bye = if ranked.len() % 2 == 1 {
        let previous_round = input.round.checked_sub(1).filter(|r| *r > 0);
        let idx = lowest_ranked_where(&ranked, |team| {
            previous_round.is_none_or(|round| !team.had_bye_in(round))
        });
        let team = ranked.remove(idx);
        tracing::debug!(
            "Team {} receives the bye in round {}",
            team.id,
            input.round
        );
        Some(team)
    } else {
        None
    };

    let half = ranked.len() / 2;
    let (top, bottom) = ranked.split_at_mut(half);

    avoid_rematches(top, bottom, input.round > 1);

    let mut rooms = top
        .iter()
        .zip(bottom.iter())
        .map(|(higher, lower)| {
            if is_rematch(higher, lower) {
                tracing::debug!(
                    "Accepting rematch between {} and {}",
                    higher.id,
                    lower.id
                );
            }
            TeamsOfRoom::with_balanced_sides(higher, lower)
        })
        .collect::<Vec<_>>();

    if let Some(team) = bye {
        rooms.push(TeamsOfRoom::Bye(team.id.clone()));
    }

    rooms
}

/// Swaps teams within the bottom half to break up rematches, trying the
/// nearest positions first. A swap is only made if it does not create a new
/// rematch. When `by_wins` is set, teams may only be swapped with teams on
/// the same number of wins.
fn avoid_rematches(top: &[&Team], bottom: &mut [&Team], by_wins: bool) {
    for i in 0..top.len() {
        if !is_rematch(top[i], bottom[i]) {
            continue;
        }

        let mut candidates =
            (0..bottom.len()).filter(|j| *j != i).collect::<Vec<_>>();
        candidates.sort_by_key(|j| (j.abs_diff(i), *j));

        let swap_with = candidates.into_iter().find(|&j| {
            (!by_wins || bottom[j].wins == bottom[i].wins)
                && !is_rematch(top[i], bottom[j])
                && !is_rematch(top[j], bottom[i])
        });

        if let Some(j) = swap_with {
            tracing::trace!(
                "Swapping {} and {} to avoid a rematch",
                bottom[i].id,
                bottom[j].id
            );
            bottom.swap(i, j);
        }
    }
}
