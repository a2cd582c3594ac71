use serde::{Deserialize, Serialize};

use crate::tournaments::rounds::side_names::Side;

pub mod manage;

/// A single debate (or bye) of a drawn round.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Pairing {
    pub room_name: String,
    /// Absent only for a bye.
    pub proposition_team_id: Option<String>,
    /// Absent only for a bye.
    pub opposition_team_id: Option<String>,
    /// The panel, head judge first.
    pub judges: Vec<String>,
    pub head_judge_id: Option<String>,
    pub is_bye_round: bool,
    pub conflicts: Vec<Conflict>,
    pub quality_score: f64,
}

impl Pairing {
    pub fn team_of_side(&self, side: Side) -> Option<&str> {
        match side {
            Side::Proposition => self.proposition_team_id.as_deref(),
            Side::Opposition => self.opposition_team_id.as_deref(),
        }
    }

    pub fn team_of_side_mut(&mut self, side: Side) -> &mut Option<String> {
        match side {
            Side::Proposition => &mut self.proposition_team_id,
            Side::Opposition => &mut self.opposition_team_id,
        }
    }

    pub fn teams(&self) -> impl Iterator<Item = &str> {
        self.proposition_team_id
            .as_deref()
            .into_iter()
            .chain(self.opposition_team_id.as_deref())
    }

    pub fn side_of_team(&self, team: &str) -> Option<Side> {
        [Side::Proposition, Side::Opposition]
            .into_iter()
            .find(|side| self.team_of_side(*side) == Some(team))
    }

    pub fn has_errors(&self) -> bool {
        self.conflicts
            .iter()
            .any(|conflict| conflict.severity == Severity::Error)
    }
}

#[derive(Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum Severity {
    /// Noteworthy, but acceptable.
    #[serde(rename = "warning")]
    Warning,
    /// Should not be accepted without explicit confirmation.
    #[serde(rename = "error")]
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Severity::Warning => "warning",
            Severity::Error => "error",
        })
    }
}

#[derive(Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Debug, Hash)]
pub enum ConflictKind {
    /// A judge belongs to the same institution as one of the teams.
    #[serde(rename = "school_conflict")]
    SchoolConflict,
    /// A judge has declared a conflict with one of the teams.
    #[serde(rename = "declared_conflict")]
    DeclaredConflict,
    #[serde(rename = "repeat_matchup")]
    RepeatMatchup,
    #[serde(rename = "side_imbalance")]
    SideImbalance,
    #[serde(rename = "judge_overload")]
    JudgeOverload,
    #[serde(rename = "insufficient_judges")]
    InsufficientJudges,
    #[serde(rename = "even_judge_panel")]
    EvenJudgePanel,
    /// The same team is on both sides of the debate.
    #[serde(rename = "same_team")]
    SameTeam,
    /// A judge is listed more than once on the panel.
    #[serde(rename = "duplicate_judge")]
    DuplicateJudge,
    /// A team or judge which is not on the roster.
    #[serde(rename = "unknown_participant")]
    UnknownParticipant,
}

impl ConflictKind {
    pub fn severity(self) -> Severity {
        match self {
            ConflictKind::SchoolConflict
            | ConflictKind::DeclaredConflict
            | ConflictKind::InsufficientJudges
            | ConflictKind::SameTeam
            | ConflictKind::DuplicateJudge
            | ConflictKind::UnknownParticipant => Severity::Error,
            ConflictKind::RepeatMatchup
            | ConflictKind::SideImbalance
            | ConflictKind::JudgeOverload
            | ConflictKind::EvenJudgePanel => Severity::Warning,
        }
    }
}

impl std::fmt::Display for ConflictKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ConflictKind::SchoolConflict => "school conflict",
            ConflictKind::DeclaredConflict => "declared conflict",
            ConflictKind::RepeatMatchup => "repeat matchup",
            ConflictKind::SideImbalance => "side imbalance",
            ConflictKind::JudgeOverload => "judge overload",
            ConflictKind::InsufficientJudges => "insufficient judges",
            ConflictKind::EvenJudgePanel => "even judge panel",
            ConflictKind::SameTeam => "same team",
            ConflictKind::DuplicateJudge => "duplicate judge",
            ConflictKind::UnknownParticipant => "unknown participant",
        })
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Conflict {
    #[serde(rename = "type")]
    pub kind: ConflictKind,
    pub description: String,
    pub severity: Severity,
}

impl Conflict {
    pub fn new(kind: ConflictKind, description: impl Into<String>) -> Self {
        Conflict {
            kind,
            description: description.into(),
            severity: kind.severity(),
        }
    }
}

impl std::fmt::Display for Conflict {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.severity, self.kind, self.description)
    }
}

#[cfg(test)]
#[test]
fn test_conflict_serialises_with_type_tag() {
    let conflict =
        Conflict::new(ConflictKind::SchoolConflict, "j1 is from Uni A");
    let value = serde_json::to_value(&conflict).unwrap();
    assert_eq!(value["type"], "school_conflict");
    assert_eq!(value["severity"], "error");

    let back: Conflict = serde_json::from_value(value).unwrap();
    assert_eq!(back, conflict);
}
