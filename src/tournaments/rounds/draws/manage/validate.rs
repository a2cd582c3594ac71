//! Conflict checks for a single debate.
//!
//! These are run on every generated debate, and again by the caller whenever
//! a debate is edited by hand, so they must depend only on their arguments.
//! The conflicts are always reported in the same order: roster problems,
//! institution clashes, declared clashes, rematches, side imbalance, judge
//! load and finally the size of the panel.

use std::collections::HashSet;

use crate::tournaments::{
    config::TournamentConfig,
    participants::{Judge, TournamentParticipants},
    rounds::{
        draws::{Conflict, ConflictKind},
        side_names::Side,
    },
    teams::{Team, is_rematch},
};

/// Checks one debate against the full roster.
///
/// `proposition` and `opposition` may be `None` (a bye has exactly one team).
/// Ids which are not on the roster are reported as conflicts rather than
/// rejected, since the debate may be the result of a half-finished edit.
pub fn validate_pairing(
    teams: &[Team],
    judges: &[Judge],
    proposition: Option<&str>,
    opposition: Option<&str>,
    judge_ids: &[String],
    config: &TournamentConfig,
) -> Vec<Conflict> {
    let participants = TournamentParticipants::index_lenient(teams, judges);
    validate_debate(&participants, proposition, opposition, judge_ids, config)
}

/// As [`validate_pairing`], against an already indexed roster.
pub fn validate_debate(
    participants: &TournamentParticipants,
    proposition: Option<&str>,
    opposition: Option<&str>,
    judge_ids: &[String],
    config: &TournamentConfig,
) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    let prop = lookup_team(participants, proposition, &mut conflicts);
    let opp = lookup_team(participants, opposition, &mut conflicts);

    if let (Some(p), Some(o)) = (proposition, opposition)
        && p == o
    {
        conflicts.push(Conflict::new(
            ConflictKind::SameTeam,
            format!("Team `{p}` is on both sides of the debate"),
        ));
    }

    let mut seen = HashSet::new();
    let mut panel: Vec<&Judge> = Vec::with_capacity(judge_ids.len());
    for id in judge_ids {
        if !seen.insert(id.as_str()) {
            conflicts.push(Conflict::new(
                ConflictKind::DuplicateJudge,
                format!("Judge `{id}` is on the panel more than once"),
            ));
            continue;
        }
        match participants.judges.get(id) {
            Some(judge) => panel.push(judge),
            None => conflicts.push(Conflict::new(
                ConflictKind::UnknownParticipant,
                format!("Judge `{id}` is not on the roster"),
            )),
        }
    }

    let sides = [(Side::Proposition, prop), (Side::Opposition, opp)];
    let teams = sides
        .iter()
        .filter_map(|(side, team)| team.map(|team| (*side, team)))
        .collect::<Vec<_>>();

    for judge in &panel {
        for (_, team) in &teams {
            if judge.shares_institution_with(team) {
                conflicts.push(Conflict::new(
                    ConflictKind::SchoolConflict,
                    format!(
                        "{} is from the same institution as {}",
                        judge.name, team.name
                    ),
                ));
            }
        }
    }

    for judge in &panel {
        for (_, team) in &teams {
            if judge.declared_conflict_with(team) {
                conflicts.push(Conflict::new(
                    ConflictKind::DeclaredConflict,
                    format!(
                        "{} has declared a conflict with {}",
                        judge.name, team.name
                    ),
                ));
            }
        }
    }

    if let (Some(p), Some(o)) = (prop, opp)
        && p.id != o.id
        && is_rematch(p, o)
    {
        conflicts.push(Conflict::new(
            ConflictKind::RepeatMatchup,
            format!(
                "{} and {} have debated each other before",
                p.name, o.name
            ),
        ));
    }

    // A bye team argues no side, and needs no panel.
    let is_debate = proposition.is_some() && opposition.is_some();

    let threshold = i64::from(config.side_imbalance_threshold);
    for (side, team) in teams.iter().filter(|_| is_debate) {
        let before = team.side_imbalance();
        let after = match side {
            Side::Proposition => before + 1,
            Side::Opposition => before - 1,
        };
        // Only teams already past the threshold are flagged, and only when
        // this debate does not move them back towards balance.
        if before.abs() > threshold && after.abs() >= before.abs() {
            conflicts.push(Conflict::new(
                ConflictKind::SideImbalance,
                format!(
                    "{} would be on {} again (proposition minus opposition \
                     is already {before})",
                    team.name,
                    side.name(false).to_lowercase()
                ),
            ));
        }
    }

    if let Some(cap) = config.max_judge_assignments {
        for judge in &panel {
            if judge.assignments_this_tournament > cap {
                conflicts.push(Conflict::new(
                    ConflictKind::JudgeOverload,
                    format!(
                        "{} has already judged {} debates (limit {cap})",
                        judge.name, judge.assignments_this_tournament
                    ),
                ));
            }
        }
    }

    if is_debate {
        conflicts.extend(panel_size_conflicts(
            judge_ids.len(),
            config.judges_per_debate,
        ));
    }

    tracing::trace!(
        "{} conflicts for {:?} vs {:?}",
        conflicts.len(),
        proposition,
        opposition
    );

    conflicts
}

fn lookup_team<'a>(
    participants: &'a TournamentParticipants,
    id: Option<&str>,
    conflicts: &mut Vec<Conflict>,
) -> Option<&'a Team> {
    let id = id?;
    let team = participants.teams.get(id);
    if team.is_none() {
        conflicts.push(Conflict::new(
            ConflictKind::UnknownParticipant,
            format!("Team `{id}` is not on the roster"),
        ));
    }
    team
}

/// Conflicts which depend only on how many judges were assigned.
fn panel_size_conflicts(
    panel_size: usize,
    judges_per_debate: u32,
) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    if panel_size < judges_per_debate as usize {
        conflicts.push(Conflict::new(
            ConflictKind::InsufficientJudges,
            format!("{panel_size} of {judges_per_debate} judges allocated"),
        ));
    }

    if panel_size > 0 && panel_size % 2 == 0 {
        conflicts.push(Conflict::new(
            ConflictKind::EvenJudgePanel,
            format!("The panel has an even number of judges ({panel_size})"),
        ));
    }

    conflicts
}
