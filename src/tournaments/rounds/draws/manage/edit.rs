//! Manual changes to a generated draw.
//!
//! Edits never modify the draw they are given. They return a new list of
//! pairings in which every room touched by the edit has been checked and
//! scored again; untouched rooms are returned exactly as they were.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tournaments::rounds::{
    draws::{
        Pairing,
        manage::{drawalgs::DrawInput, reassess},
    },
    side_names::Side,
};

/// Rooms are indexes into the list of pairings (counting from zero).
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum DrawEdit {
    SwapSides {
        room: usize,
    },
    SwapTeams {
        first: String,
        second: String,
    },
    /// Moves a judge to another room, or off the draw if `to_room` is `None`.
    /// Judges who are not yet allocated are added to `to_room`. A judge who
    /// sits in several rooms leaves the first of them.
    MoveJudge {
        judge: String,
        to_room: Option<usize>,
    },
    SwapJudges {
        first: String,
        second: String,
    },
    SetHeadJudge {
        room: usize,
        judge: String,
    },
}

#[derive(Error, Debug, PartialEq)]
pub enum EditError {
    #[error("there is no room {0} in the draw")]
    UnknownRoom(usize),
    #[error("team `{0}` is not in the draw")]
    UnknownTeam(String),
    #[error("judge `{0}` is not on the roster")]
    UnknownJudge(String),
    #[error("{0}")]
    IllegalMove(String),
    #[error("could not parse command: {0}")]
    Parse(String),
}

/// Applies `edit` to `pairings`, which must have been drawn from `input`.
pub fn apply_edit(
    input: &DrawInput,
    pairings: &[Pairing],
    edit: &DrawEdit,
) -> Result<Vec<Pairing>, EditError> {
    let mut draw = pairings.to_vec();

    let mut touched = match edit {
        DrawEdit::SwapSides { room } => {
            let pairing = room_mut(&mut draw, *room)?;
            if pairing.is_bye_round {
                return Err(EditError::IllegalMove(format!(
                    "room {room} is a bye, so it has no sides to swap"
                )));
            }
            std::mem::swap(
                &mut pairing.proposition_team_id,
                &mut pairing.opposition_team_id,
            );
            vec![*room]
        }
        DrawEdit::SwapTeams { first, second } => {
            if first == second {
                return Err(EditError::IllegalMove(format!(
                    "cannot swap team `{first}` with itself"
                )));
            }
            let (first_room, first_side) = locate_team(&draw, first)?;
            let (second_room, second_side) = locate_team(&draw, second)?;

            *draw[first_room].team_of_side_mut(first_side) =
                Some(second.clone());
            *draw[second_room].team_of_side_mut(second_side) =
                Some(first.clone());

            vec![first_room, second_room]
        }
        DrawEdit::MoveJudge { judge, to_room } => {
            check_judge(input, judge)?;
            let from = locate_judge(&draw, judge);

            if let Some(to) = *to_room {
                let target = room_mut(&mut draw, to)?;
                if target.is_bye_round {
                    return Err(EditError::IllegalMove(format!(
                        "room {to} is a bye and cannot be judged"
                    )));
                }
                if target.judges.contains(judge) {
                    return Ok(draw);
                }
                target.judges.push(judge.clone());
            }

            let mut touched = Vec::from_iter(*to_room);
            if let Some((room, idx)) = from {
                draw[room].judges.remove(idx);
                touched.push(room);
            }
            touched
        }
        DrawEdit::SwapJudges { first, second } => {
            check_judge(input, first)?;
            check_judge(input, second)?;
            if first == second {
                return Err(EditError::IllegalMove(format!(
                    "cannot swap judge `{first}` with themselves"
                )));
            }

            let a = locate_judge(&draw, first);
            let b = locate_judge(&draw, second);
            if a.is_none() && b.is_none() {
                return Err(EditError::IllegalMove(format!(
                    "neither `{first}` nor `{second}` is allocated"
                )));
            }

            let mut touched = Vec::new();
            for (place, judge) in [(a, second), (b, first)] {
                if let Some((room, idx)) = place {
                    let pairing = &mut draw[room];
                    let replaced = std::mem::replace(
                        &mut pairing.judges[idx],
                        judge.clone(),
                    );
                    if pairing.head_judge_id.as_ref() == Some(&replaced) {
                        pairing.head_judge_id = Some(judge.clone());
                    }
                    touched.push(room);
                }
            }
            touched
        }
        DrawEdit::SetHeadJudge { room, judge } => {
            check_judge(input, judge)?;
            let pairing = room_mut(&mut draw, *room)?;
            let idx = pairing
                .judges
                .iter()
                .position(|id| id == judge)
                .ok_or_else(|| {
                    EditError::IllegalMove(format!(
                        "judge `{judge}` is not on the panel of room {room}"
                    ))
                })?;
            let head = pairing.judges.remove(idx);
            pairing.judges.insert(0, head);
            pairing.head_judge_id = Some(judge.clone());
            vec![*room]
        }
    };

    touched.sort_unstable();
    touched.dedup();

    for room in touched {
        let pairing = &mut draw[room];
        repair_head_judge(pairing);
        reassess(pairing, &input.participants, &input.config);
        tracing::trace!(
            "Room {} has {} conflicts after edit",
            pairing.room_name,
            pairing.conflicts.len()
        );
    }

    Ok(draw)
}

fn room_mut(
    draw: &mut [Pairing],
    room: usize,
) -> Result<&mut Pairing, EditError> {
    draw.get_mut(room).ok_or(EditError::UnknownRoom(room))
}

fn locate_team(
    draw: &[Pairing],
    team: &str,
) -> Result<(usize, Side), EditError> {
    draw.iter()
        .enumerate()
        .find_map(|(room, pairing)| {
            pairing.side_of_team(team).map(|side| (room, side))
        })
        .ok_or_else(|| EditError::UnknownTeam(team.to_string()))
}

fn locate_judge(draw: &[Pairing], judge: &str) -> Option<(usize, usize)> {
    draw.iter().enumerate().find_map(|(room, pairing)| {
        pairing
            .judges
            .iter()
            .position(|id| id == judge)
            .map(|idx| (room, idx))
    })
}

fn check_judge(input: &DrawInput, judge: &str) -> Result<(), EditError> {
    if input.participants.judges.contains_key(judge) {
        Ok(())
    } else {
        Err(EditError::UnknownJudge(judge.to_string()))
    }
}

/// Keeps the head judge at the front of the panel. If the head judge has
/// left, the next judge on the panel takes over.
fn repair_head_judge(pairing: &mut Pairing) {
    let head = pairing
        .head_judge_id
        .as_ref()
        .and_then(|head| pairing.judges.iter().position(|id| id == head));

    match head {
        Some(idx) => {
            let head = pairing.judges.remove(idx);
            pairing.judges.insert(0, head);
        }
        None => pairing.head_judge_id = pairing.judges.first().cloned(),
    }
}

impl DrawEdit {
    /// Parses an edit command. Rooms are numbered from 1, as they are shown
    /// to the user.
    ///
    /// ```text
    /// sides <room>
    /// teams <team> <team>
    /// move <judge> <room | ->
    /// judges <judge> <judge>
    /// head <room> <judge>
    /// ```
    pub fn parse(input: &str) -> Result<Self, EditError> {
        let words = input.split_whitespace().collect::<Vec<_>>();

        match words.as_slice() {
            ["sides", r] => Ok(DrawEdit::SwapSides { room: parse_room(r)? }),
            ["teams", a, b] => Ok(DrawEdit::SwapTeams {
                first: a.to_string(),
                second: b.to_string(),
            }),
            ["move", judge, "-"] => Ok(DrawEdit::MoveJudge {
                judge: judge.to_string(),
                to_room: None,
            }),
            ["move", judge, r] => Ok(DrawEdit::MoveJudge {
                judge: judge.to_string(),
                to_room: Some(parse_room(r)?),
            }),
            ["judges", a, b] => Ok(DrawEdit::SwapJudges {
                first: a.to_string(),
                second: b.to_string(),
            }),
            ["head", r, judge] => Ok(DrawEdit::SetHeadJudge {
                room: parse_room(r)?,
                judge: judge.to_string(),
            }),
            _ => Err(EditError::Parse(format!(
                "unrecognised command `{input}`"
            ))),
        }
    }
}

fn parse_room(word: &str) -> Result<usize, EditError> {
    match word.parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n - 1),
        _ => Err(EditError::Parse(format!("`{word}` is not a room number"))),
    }
}

impl std::str::FromStr for DrawEdit {
    type Err = EditError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DrawEdit::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tournaments::{
        config::{PairingMethod, TournamentConfig},
        participants::Judge,
        rounds::draws::{ConflictKind, manage::do_draw},
        teams::Team,
    };

    fn setup() -> (DrawInput, Vec<Pairing>) {
        let teams = ["a", "b", "c", "d", "e"]
            .iter()
            .enumerate()
            .map(|(i, id)| Team {
                performance_score: 5.0 - i as f64,
                institution_id: Some(format!("school-{id}")),
                ..Team::new(*id, id.to_uppercase())
            })
            .collect::<Vec<_>>();
        let judges = (1..=4)
            .map(|i| Judge {
                total_debates_judged: 10 * i,
                ..Judge::new(format!("j{i}"), format!("Judge {i}"))
            })
            .collect::<Vec<_>>();
        let config = TournamentConfig {
            judges_per_debate: 1,
            ..Default::default()
        };
        let input =
            DrawInput::new(&teams, &judges, &config, 1, PairingMethod::Auto)
                .unwrap();
        let pairings = do_draw(&input).pairings;
        (input, pairings)
    }

    fn teams_of(pairing: &Pairing) -> (Option<&str>, Option<&str>) {
        (
            pairing.proposition_team_id.as_deref(),
            pairing.opposition_team_id.as_deref(),
        )
    }

    #[test]
    fn setup_draw_is_as_expected() {
        let (_, pairings) = setup();
        assert_eq!(pairings.len(), 3);
        assert_eq!(teams_of(&pairings[0]), (Some("a"), Some("c")));
        assert_eq!(teams_of(&pairings[1]), (Some("b"), Some("d")));
        assert_eq!(teams_of(&pairings[2]), (Some("e"), None));
        assert_eq!(pairings[0].judges, vec!["j4"]);
        assert_eq!(pairings[1].judges, vec!["j3"]);
    }

    #[test]
    fn swapping_sides() {
        let (input, pairings) = setup();
        let edited =
            apply_edit(&input, &pairings, &DrawEdit::SwapSides { room: 1 })
                .unwrap();
        assert_eq!(teams_of(&edited[1]), (Some("d"), Some("b")));
        assert_eq!(edited[0], pairings[0]);
        // the input pairings are untouched
        assert_eq!(teams_of(&pairings[1]), (Some("b"), Some("d")));
    }

    #[test]
    fn byes_have_no_sides() {
        let (input, pairings) = setup();
        assert!(matches!(
            apply_edit(&input, &pairings, &DrawEdit::SwapSides { room: 2 }),
            Err(EditError::IllegalMove(_))
        ));
        assert_eq!(
            apply_edit(&input, &pairings, &DrawEdit::SwapSides { room: 9 }),
            Err(EditError::UnknownRoom(9))
        );
    }

    #[test]
    fn swapping_a_team_out_of_the_bye() {
        let (input, pairings) = setup();
        let edited = apply_edit(
            &input,
            &pairings,
            &DrawEdit::SwapTeams {
                first: "e".to_string(),
                second: "c".to_string(),
            },
        )
        .unwrap();
        assert_eq!(teams_of(&edited[0]), (Some("a"), Some("e")));
        assert_eq!(teams_of(&edited[2]), (Some("c"), None));
        assert!(edited[2].is_bye_round);
        assert!(!edited[0].is_bye_round);
    }

    #[test]
    fn swapping_teams_within_a_room_keeps_both() {
        let (input, pairings) = setup();
        let edited = apply_edit(
            &input,
            &pairings,
            &DrawEdit::SwapTeams {
                first: "a".to_string(),
                second: "c".to_string(),
            },
        )
        .unwrap();
        assert_eq!(teams_of(&edited[0]), (Some("c"), Some("a")));
    }

    #[test]
    fn unknown_team_is_rejected() {
        let (input, pairings) = setup();
        assert_eq!(
            apply_edit(
                &input,
                &pairings,
                &DrawEdit::SwapTeams {
                    first: "a".to_string(),
                    second: "zz".to_string(),
                },
            ),
            Err(EditError::UnknownTeam("zz".to_string()))
        );
    }

    #[test]
    fn moving_a_judge_revalidates_both_rooms() {
        let (input, pairings) = setup();
        let edited = apply_edit(
            &input,
            &pairings,
            &DrawEdit::MoveJudge {
                judge: "j4".to_string(),
                to_room: Some(1),
            },
        )
        .unwrap();

        assert!(edited[0].judges.is_empty());
        assert_eq!(edited[0].head_judge_id, None);
        assert_eq!(
            edited[0].conflicts.iter().map(|c| c.kind).collect::<Vec<_>>(),
            vec![ConflictKind::InsufficientJudges]
        );
        assert!(edited[0].quality_score < pairings[0].quality_score);

        assert_eq!(edited[1].judges, vec!["j3", "j4"]);
        assert_eq!(edited[1].head_judge_id.as_deref(), Some("j3"));
        assert_eq!(
            edited[1].conflicts.iter().map(|c| c.kind).collect::<Vec<_>>(),
            vec![ConflictKind::EvenJudgePanel]
        );
    }

    #[test]
    fn unallocated_judge_can_be_added_and_removed() {
        let (input, pairings) = setup();
        let added = apply_edit(
            &input,
            &pairings,
            &DrawEdit::MoveJudge {
                judge: "j1".to_string(),
                to_room: Some(0),
            },
        )
        .unwrap();
        assert_eq!(added[0].judges, vec!["j4", "j1"]);

        let removed = apply_edit(
            &input,
            &added,
            &DrawEdit::MoveJudge {
                judge: "j4".to_string(),
                to_room: None,
            },
        )
        .unwrap();
        assert_eq!(removed[0].judges, vec!["j1"]);
        assert_eq!(removed[0].head_judge_id.as_deref(), Some("j1"));
        assert!(removed[0].conflicts.is_empty());
    }

    #[test]
    fn moving_a_judge_who_sits_twice() {
        let (input, mut pairings) = setup();
        pairings[1].judges.push("j4".to_string());

        let moved = DrawEdit::MoveJudge {
            judge: "j4".to_string(),
            to_room: Some(1),
        };
        assert_eq!(apply_edit(&input, &pairings, &moved).unwrap(), pairings);

        let removed = apply_edit(
            &input,
            &pairings,
            &DrawEdit::MoveJudge {
                judge: "j4".to_string(),
                to_room: None,
            },
        )
        .unwrap();
        assert!(removed[0].judges.is_empty());
        assert_eq!(removed[1].judges, vec!["j3", "j4"]);
    }

    #[test]
    fn judges_cannot_judge_byes() {
        let (input, pairings) = setup();
        assert!(matches!(
            apply_edit(
                &input,
                &pairings,
                &DrawEdit::MoveJudge {
                    judge: "j1".to_string(),
                    to_room: Some(2),
                },
            ),
            Err(EditError::IllegalMove(_))
        ));
        assert_eq!(
            apply_edit(
                &input,
                &pairings,
                &DrawEdit::MoveJudge {
                    judge: "nobody".to_string(),
                    to_room: Some(0),
                },
            ),
            Err(EditError::UnknownJudge("nobody".to_string()))
        );
    }

    #[test]
    fn swapping_judges_keeps_head_roles() {
        let (input, pairings) = setup();
        let edited = apply_edit(
            &input,
            &pairings,
            &DrawEdit::SwapJudges {
                first: "j4".to_string(),
                second: "j3".to_string(),
            },
        )
        .unwrap();
        assert_eq!(edited[0].judges, vec!["j3"]);
        assert_eq!(edited[0].head_judge_id.as_deref(), Some("j3"));
        assert_eq!(edited[1].judges, vec!["j4"]);
        assert_eq!(edited[1].head_judge_id.as_deref(), Some("j4"));
    }

    #[test]
    fn swapping_in_an_unallocated_judge() {
        let (input, pairings) = setup();
        let edited = apply_edit(
            &input,
            &pairings,
            &DrawEdit::SwapJudges {
                first: "j4".to_string(),
                second: "j1".to_string(),
            },
        )
        .unwrap();
        assert_eq!(edited[0].judges, vec!["j1"]);
        assert_eq!(edited[0].head_judge_id.as_deref(), Some("j1"));
    }

    #[test]
    fn setting_the_head_judge() {
        let (input, pairings) = setup();
        let two_judges = apply_edit(
            &input,
            &pairings,
            &DrawEdit::MoveJudge {
                judge: "j1".to_string(),
                to_room: Some(0),
            },
        )
        .unwrap();
        let edited = apply_edit(
            &input,
            &two_judges,
            &DrawEdit::SetHeadJudge {
                room: 0,
                judge: "j1".to_string(),
            },
        )
        .unwrap();
        assert_eq!(edited[0].judges, vec!["j1", "j4"]);
        assert_eq!(edited[0].head_judge_id.as_deref(), Some("j1"));

        assert!(matches!(
            apply_edit(
                &input,
                &pairings,
                &DrawEdit::SetHeadJudge {
                    room: 1,
                    judge: "j4".to_string(),
                },
            ),
            Err(EditError::IllegalMove(_))
        ));
    }

    #[test]
    fn parsing_commands() {
        assert_eq!(
            "sides 2".parse::<DrawEdit>(),
            Ok(DrawEdit::SwapSides { room: 1 })
        );
        assert_eq!(
            "move j1 -".parse::<DrawEdit>(),
            Ok(DrawEdit::MoveJudge {
                judge: "j1".to_string(),
                to_room: None
            })
        );
        assert_eq!(
            "head 1 j3".parse::<DrawEdit>(),
            Ok(DrawEdit::SetHeadJudge {
                room: 0,
                judge: "j3".to_string()
            })
        );
        assert!(matches!(
            "sides 0".parse::<DrawEdit>(),
            Err(EditError::Parse(_))
        ));
        assert!(matches!(
            "dance".parse::<DrawEdit>(),
            Err(EditError::Parse(_))
        ));
    }

    #[test]
    fn edits_serialise_with_an_action_tag() {
        let edit = DrawEdit::MoveJudge {
            judge: "j1".to_string(),
            to_room: Some(3),
        };
        let value = serde_json::to_value(&edit).unwrap();
        assert_eq!(value["action"], "move_judge");
        assert_eq!(serde_json::from_value::<DrawEdit>(value).unwrap(), edit);
    }
}
