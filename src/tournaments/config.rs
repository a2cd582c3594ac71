use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// How the teams of a round should be paired. `Auto` defers to the round
/// number (see [`crate::tournaments::rounds::resolve_method`]).
#[derive(Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum PairingMethod {
    #[serde(rename = "fold")]
    Fold,
    #[serde(rename = "swiss")]
    Swiss,
    #[default]
    #[serde(rename = "auto")]
    Auto,
}

impl fmt::Display for PairingMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PairingMethod::Fold => "fold",
            PairingMethod::Swiss => "swiss",
            PairingMethod::Auto => "auto",
        })
    }
}

impl FromStr for PairingMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "fold" | "power" => Ok(PairingMethod::Fold),
            "swiss" => Ok(PairingMethod::Swiss),
            "auto" => Ok(PairingMethod::Auto),
            other => Err(format!(
                "unknown pairing method `{other}` (expected fold, swiss or auto)"
            )),
        }
    }
}

#[derive(Serialize, Deserialize, Copy, Clone, PartialEq, Eq, Debug, Default)]
pub enum TournamentFormat {
    #[default]
    #[serde(rename = "australs")]
    Australs,
    #[serde(rename = "british_parliamentary")]
    BritishParliamentary,
    #[serde(rename = "world_schools")]
    WorldSchools,
    #[serde(rename = "policy")]
    Policy,
    #[serde(rename = "other")]
    Other,
}

impl fmt::Display for TournamentFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            TournamentFormat::Australs => "Australs",
            TournamentFormat::BritishParliamentary => "British Parliamentary",
            TournamentFormat::WorldSchools => "World Schools",
            TournamentFormat::Policy => "Policy",
            TournamentFormat::Other => "Other",
        })
    }
}

/// Penalties applied when scoring a debate. Scores start at 100 and are
/// clamped to `[0, 100]`.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct QualityWeights {
    pub error_penalty: f64,
    pub warning_penalty: f64,
    /// Per unit of side imbalance beyond one, summed over both teams.
    pub side_weight: f64,
    /// Per unit of strength difference between the two teams.
    pub gap_weight: f64,
    /// Upper bound on the strength gap penalty.
    pub gap_cap: f64,
    /// Scaled by the panel's coefficient of variation in experience (which
    /// is capped at 1).
    pub experience_weight: f64,
}

impl Default for QualityWeights {
    fn default() -> Self {
        QualityWeights {
            error_penalty: 20.0,
            warning_penalty: 5.0,
            side_weight: 2.0,
            gap_weight: 1.0,
            gap_cap: 15.0,
            experience_weight: 5.0,
        }
    }
}

impl QualityWeights {
    fn all(&self) -> [(&'static str, f64); 6] {
        [
            ("error_penalty", self.error_penalty),
            ("warning_penalty", self.warning_penalty),
            ("side_weight", self.side_weight),
            ("gap_weight", self.gap_weight),
            ("gap_cap", self.gap_cap),
            ("experience_weight", self.experience_weight),
        ]
    }
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct TournamentConfig {
    pub team_size: u32,
    pub judges_per_debate: u32,
    pub prelim_rounds: u32,
    pub elimination_rounds: u32,
    pub format: TournamentFormat,
    /// The last round which is paired by folding. Later rounds are Swiss
    /// paired when the method is `auto`.
    pub fold_rounds: u32,
    /// How far a team's side history may drift from balanced before it is
    /// flagged.
    pub side_imbalance_threshold: u32,
    /// Judges who have already judged more than this many debates are
    /// flagged as overloaded.
    pub max_judge_assignments: Option<u32>,
    /// Never allocate a judge to more than one room of a round, even if that
    /// leaves panels short. By default judges who are already sitting are
    /// reused (least loaded first) once nobody else is left.
    pub exclusive_judges: bool,
    pub quality: QualityWeights,
    /// Names given to the rooms of a draw, in order. Rooms beyond the end of
    /// this list are numbered.
    pub rooms: Vec<String>,
}

impl Default for TournamentConfig {
    fn default() -> Self {
        TournamentConfig {
            team_size: 3,
            judges_per_debate: 3,
            prelim_rounds: 8,
            elimination_rounds: 3,
            format: TournamentFormat::default(),
            fold_rounds: 5,
            side_imbalance_threshold: 2,
            max_judge_assignments: None,
            exclusive_judges: false,
            quality: QualityWeights::default(),
            rooms: Vec::new(),
        }
    }
}

impl TournamentConfig {
    /// Checks the configuration before any draw logic runs. The error
    /// message is shown to the user as-is.
    pub fn check(&self) -> Result<(), String> {
        if self.judges_per_debate < 1 {
            return Err(format!(
                "judges_per_debate must be at least 1 (was {})",
                self.judges_per_debate
            ));
        }

        if let Some((name, value)) = self
            .quality
            .all()
            .into_iter()
            .find(|(_, value)| !value.is_finite() || *value < 0.0)
        {
            return Err(format!(
                "quality weight `{name}` must be a non-negative number (was {value})"
            ));
        }

        Ok(())
    }

    pub fn room_name(&self, idx: usize) -> String {
        match self.rooms.get(idx) {
            Some(name) => name.clone(),
            None => format!("Room {}", idx + 1),
        }
    }
}
