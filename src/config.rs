//! Roster files.
//!
//! A roster is everything needed to draw a round: the tournament settings
//! and a snapshot of every team and judge. It can be written as TOML or
//! JSON; the format is picked by the file extension.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tournaments::{
    config::TournamentConfig, participants::Judge, teams::Team,
};

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct Roster {
    pub config: TournamentConfig,
    pub teams: Vec<Team>,
    pub judges: Vec<Judge>,
}

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("could not access `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("could not write TOML: {0}")]
    TomlWrite(#[from] toml::ser::Error),
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error(
        "don't know how to read `{}` (expected a .toml or .json file)",
        .0.display()
    )]
    UnknownFormat(PathBuf),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Format {
    Toml,
    Json,
}

impl Format {
    fn of_path(path: &Path) -> Result<Self, LoadError> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Ok(Format::Toml),
            Some("json") => Ok(Format::Json),
            _ => Err(LoadError::UnknownFormat(path.to_path_buf())),
        }
    }
}

impl Roster {
    pub fn from_toml(s: &str) -> Result<Self, LoadError> {
        Ok(toml::from_str(s)?)
    }

    pub fn to_toml(&self) -> Result<String, LoadError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self, LoadError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn to_json(&self) -> Result<String, LoadError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

pub fn load_roster(path: impl AsRef<Path>) -> Result<Roster, LoadError> {
    let path = path.as_ref();
    let format = Format::of_path(path)?;
    let contents =
        std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let roster = match format {
        Format::Toml => Roster::from_toml(&contents)?,
        Format::Json => Roster::from_json(&contents)?,
    };
    tracing::debug!(
        "Loaded {} teams and {} judges from {}",
        roster.teams.len(),
        roster.judges.len(),
        path.display()
    );
    Ok(roster)
}

pub fn save_roster(
    roster: &Roster,
    path: impl AsRef<Path>,
) -> Result<(), LoadError> {
    let path = path.as_ref();
    let contents = match Format::of_path(path)? {
        Format::Toml => roster.to_toml()?,
        Format::Json => roster.to_json()?,
    };
    std::fs::write(path, contents).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}
