//! Swiss pairing.
//!
//! Teams are grouped by wins and paired in ranked order within each group,
//! skipping opponents they have already met. A team which cannot be paired
//! in its own group floats down into the next group, where it is paired
//! ahead of that group's own teams. Teams left over at the bottom are paired
//! by exchanging partners with an existing pairing where that removes the
//! rematch; otherwise the rematch is accepted.

use std::collections::HashMap;

use crate::tournaments::{
    rounds::draws::manage::drawalgs::{
        DrawInput, TeamsOfRoom, lowest_ranked_where,
    },
    standings::{rank_by_results, score_groups},
    teams::{Team, is_rematch},
};

pub fn make_draw(input: &DrawInput) -> Vec<TeamsOfRoom> {
    let mut ranked = rank_by_results(input.participants.teams.values());

    if ranked.is_empty() {
        return Vec::new();
    }

    let bye = if ranked.len() % 2 == 1 {
        // If every team has had as many byes as each other, nobody is
        // excluded and the lowest ranked team sits out.
        let most_byes = ranked
            .iter()
            .map(|team| team.bye_rounds.len())
            .max()
            .unwrap_or(0);
        let idx = lowest_ranked_where(&ranked, |team| {
            team.bye_rounds.len() < most_byes
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

    let position = ranked
        .iter()
        .enumerate()
        .map(|(idx, team)| (team.id.as_str(), idx))
        .collect::<HashMap<_, _>>();

    let mut rooms = pair_within_groups(score_groups(&ranked))
        .into_iter()
        .map(|(a, b)| {
            if position[a.id.as_str()] < position[b.id.as_str()] {
                TeamsOfRoom::with_balanced_sides(a, b)
            } else {
                TeamsOfRoom::with_balanced_sides(b, a)
            }
        })
        .collect::<Vec<_>>();

    // Keep rooms in rank order of their highest ranked team.
    rooms.sort_by_key(|room| match room {
        TeamsOfRoom::Debate {
            proposition,
            opposition,
        } => std::cmp::min(
            position[proposition.as_str()],
            position[opposition.as_str()],
        ),
        TeamsOfRoom::Bye(_) => usize::MAX,
    });

    if let Some(team) = bye {
        rooms.push(TeamsOfRoom::Bye(team.id.clone()));
    }

    rooms
}

/// Pairs teams group by group, floating teams down where needed. There must
/// be an even number of teams in total.
fn pair_within_groups<'a>(
    groups: Vec<Vec<&'a Team>>,
) -> Vec<(&'a Team, &'a Team)> {
    let mut pairs = Vec::new();
    let mut floaters: Vec<&Team> = Vec::new();
    let mut leftovers: Vec<&Team> = Vec::new();
    let n_groups = groups.len();

    for (idx, group) in groups.into_iter().enumerate() {
        let is_last = idx + 1 == n_groups;
        let mut pool = floaters.drain(..).chain(group).collect::<Vec<_>>();

        while !pool.is_empty() {
            let team = pool.remove(0);
            match pool.iter().position(|other| !is_rematch(team, other)) {
                Some(partner) => {
                    let partner = pool.remove(partner);
                    pairs.push((team, partner));
                }
                None if is_last => leftovers.push(team),
                None => {
                    tracing::trace!("Floating {} down", team.id);
                    floaters.push(team);
                }
            }
        }
    }

    settle_leftovers(&mut pairs, leftovers);

    pairs
}

/// Pairs the teams which could not be paired without a rematch.
fn settle_leftovers<'a>(
    pairs: &mut Vec<(&'a Team, &'a Team)>,
    mut leftovers: Vec<&'a Team>,
) {
    while leftovers.len() >= 2 {
        let team = leftovers.remove(0);

        if let Some(idx) =
            leftovers.iter().position(|other| !is_rematch(team, other))
        {
            let partner = leftovers.remove(idx);
            pairs.push((team, partner));
            continue;
        }

        let partner = leftovers.remove(0);

        if let Some((idx, first, second)) = find_exchange(pairs, team, partner)
        {
            let (x, y) = pairs[idx];
            tracing::trace!(
                "Exchanging partners with {} and {} to avoid a rematch",
                x.id,
                y.id
            );
            pairs[idx] = first;
            pairs.push(second);
            continue;
        }

        tracing::debug!(
            "Accepting rematch between {} and {}",
            team.id,
            partner.id
        );
        pairs.push((team, partner));
    }
}

type Exchange<'a> = (usize, (&'a Team, &'a Team), (&'a Team, &'a Team));

/// Looks for an existing pair `(x, y)`, starting from the bottom of the
/// draw, which can be split so that both `team` and `partner` get a new
/// opponent.
fn find_exchange<'a>(
    pairs: &[(&'a Team, &'a Team)],
    team: &'a Team,
    partner: &'a Team,
) -> Option<Exchange<'a>> {
    pairs.iter().enumerate().rev().find_map(|(idx, &(x, y))| {
        if !is_rematch(x, team) && !is_rematch(y, partner) {
            Some((idx, (x, team), (y, partner)))
        } else if !is_rematch(x, partner) && !is_rematch(y, team) {
            Some((idx, (x, partner), (y, team)))
        } else {
            None
        }
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::tournaments::config::{PairingMethod, TournamentConfig};

    fn team(id: &str, wins: u32, points: f64) -> Team {
        Team {
            wins,
            total_points: points,
            ..Team::new(id, id)
        }
    }

    fn faced(teams: &mut [Team], a: usize, b: usize) {
        let (a_id, b_id) = (teams[a].id.clone(), teams[b].id.clone());
        teams[a].opponents_faced.insert(b_id);
        teams[b].opponents_faced.insert(a_id);
    }

    fn input(teams: &[Team]) -> DrawInput {
        DrawInput::new(
            teams,
            &[],
            &TournamentConfig::default(),
            6,
            PairingMethod::Swiss,
        )
        .unwrap()
    }

    fn pairs_of(rooms: &[TeamsOfRoom]) -> Vec<(String, String)> {
        rooms
            .iter()
            .filter_map(|room| match room {
                TeamsOfRoom::Debate {
                    proposition,
                    opposition,
                } => Some((proposition.clone(), opposition.clone())),
                TeamsOfRoom::Bye(_) => None,
            })
            .collect()
    }

    #[test]
    fn pairs_within_score_groups() {
        let teams = vec![
            team("a", 3, 300.0),
            team("b", 3, 290.0),
            team("c", 1, 280.0),
            team("d", 1, 270.0),
        ];
        assert_eq!(
            pairs_of(&make_draw(&input(&teams))),
            vec![
                ("a".to_string(), "b".to_string()),
                ("c".to_string(), "d".to_string())
            ]
        );
    }

    #[test]
    fn skips_previous_opponents() {
        let mut teams = vec![
            team("a", 2, 4.0),
            team("b", 2, 3.0),
            team("c", 2, 2.0),
            team("d", 2, 1.0),
        ];
        faced(&mut teams, 0, 1);
        assert_eq!(
            pairs_of(&make_draw(&input(&teams))),
            vec![
                ("a".to_string(), "c".to_string()),
                ("b".to_string(), "d".to_string())
            ]
        );
    }

    #[test]
    fn floats_down_when_group_exhausted() {
        let mut teams = vec![
            team("a", 3, 4.0),
            team("b", 3, 3.0),
            team("c", 1, 2.0),
            team("d", 1, 1.0),
        ];
        faced(&mut teams, 0, 1);
        // a and b met, so both float into the lower group
        let pairs = pairs_of(&make_draw(&input(&teams)));
        assert_eq!(
            pairs,
            vec![
                ("a".to_string(), "c".to_string()),
                ("b".to_string(), "d".to_string())
            ]
        );
    }

    #[test]
    fn exchanges_partners_at_the_bottom() {
        let mut teams = vec![
            team("a", 1, 4.0),
            team("b", 1, 3.0),
            team("c", 1, 2.0),
            team("d", 1, 1.0),
        ];
        // greedy pairs (a, b), leaving c and d, who have met
        faced(&mut teams, 2, 3);
        let pairs = pairs_of(&make_draw(&input(&teams)));
        assert_eq!(pairs.len(), 2);
        for (prop, opp) in &pairs {
            assert!(
                !(prop == "c" && opp == "d" || prop == "d" && opp == "c"),
                "rematch in {pairs:?}"
            );
        }
    }

    #[test]
    fn accepts_rematch_when_nothing_else_works() {
        let mut teams = vec![team("a", 1, 2.0), team("b", 1, 1.0)];
        faced(&mut teams, 0, 1);
        assert_eq!(
            pairs_of(&make_draw(&input(&teams))),
            vec![("a".to_string(), "b".to_string())]
        );
    }

    #[test]
    fn bye_skips_teams_with_the_most_byes() {
        let mut teams = vec![
            team("a", 2, 3.0),
            team("b", 1, 2.0),
            team("c", 0, 1.0),
        ];
        teams[2].bye_rounds.insert(3);
        let rooms = make_draw(&input(&teams));
        assert_eq!(rooms.last(), Some(&TeamsOfRoom::Bye("b".to_string())));
    }

    #[test]
    fn bye_goes_to_lowest_team_not_having_the_most_byes() {
        let mut teams = vec![
            team("top", 5, 3.0),
            team("mid", 3, 2.0),
            team("low", 1, 1.0),
        ];
        teams[1].bye_rounds.insert(2);
        teams[2].bye_rounds.extend([1, 4]);
        let rooms = make_draw(&input(&teams));
        assert_eq!(rooms.last(), Some(&TeamsOfRoom::Bye("mid".to_string())));
        assert_eq!(
            pairs_of(&rooms),
            vec![("top".to_string(), "low".to_string())]
        );
    }

    #[test]
    fn equal_byes_go_to_the_lowest_team() {
        let mut teams = vec![
            team("a", 2, 3.0),
            team("b", 1, 2.0),
            team("c", 0, 1.0),
        ];
        for team in &mut teams {
            team.bye_rounds.insert(1);
        }
        let rooms = make_draw(&input(&teams));
        assert_eq!(rooms.last(), Some(&TeamsOfRoom::Bye("c".to_string())));
    }

    #[test]
    fn every_team_is_drawn_once() {
        let mut teams = (0..11)
            .map(|i| team(&format!("t{i}"), i % 4, i as f64))
            .collect::<Vec<_>>();
        for i in 0..10 {
            faced(&mut teams, i, i + 1);
        }
        let rooms = make_draw(&input(&teams));
        assert_eq!(rooms.len(), 6);

        let mut seen = HashSet::new();
        for room in &rooms {
            match room {
                TeamsOfRoom::Debate {
                    proposition,
                    opposition,
                } => {
                    assert!(seen.insert(proposition.clone()));
                    assert!(seen.insert(opposition.clone()));
                }
                TeamsOfRoom::Bye(team) => assert!(seen.insert(team.clone())),
            }
        }
        assert_eq!(seen.len(), 11);
    }
}
