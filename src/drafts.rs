//! Saved drafts of a round's draw.
//!
//! The draw engine itself never saves anything. A draft is what the caller
//! keeps between generating a draw and releasing it, so that it can be
//! edited and compared against a later regeneration.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::tournaments::rounds::draws::Pairing;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Draft {
    pub id: Uuid,
    pub round: u32,
    pub saved_at: DateTime<Utc>,
    pub pairings: Vec<Pairing>,
}

#[derive(Error, Debug)]
pub enum DraftStoreError {
    #[error("could not access draft storage: {0}")]
    Io(#[from] std::io::Error),
    #[error("draft is corrupt: {0}")]
    Json(#[from] serde_json::Error),
}

/// Somewhere drafts are kept, one per round.
pub trait DraftStore {
    fn load_draft(&self, round: u32) -> Result<Option<Draft>, DraftStoreError>;

    /// Replaces any existing draft of `round`.
    fn save_draft(
        &self,
        round: u32,
        pairings: &[Pairing],
    ) -> Result<Draft, DraftStoreError>;

    /// Removes the draft of `round`, if there is one.
    fn clear_draft(&self, round: u32) -> Result<(), DraftStoreError>;
}

/// Keeps each draft as a JSON file (`round-<n>.json`) in a directory.
#[derive(Clone, Debug)]
pub struct JsonFileDraftStore {
    dir: PathBuf,
}

impl JsonFileDraftStore {
    /// Opens the store, creating `dir` if it does not exist yet.
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, DraftStoreError> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(JsonFileDraftStore { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_of(&self, round: u32) -> PathBuf {
        self.dir.join(format!("round-{round}.json"))
    }
}

impl DraftStore for JsonFileDraftStore {
    fn load_draft(&self, round: u32) -> Result<Option<Draft>, DraftStoreError> {
        match std::fs::read(self.path_of(round)) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn save_draft(
        &self,
        round: u32,
        pairings: &[Pairing],
    ) -> Result<Draft, DraftStoreError> {
        let draft = Draft {
            id: Uuid::now_v7(),
            round,
            saved_at: Utc::now(),
            pairings: pairings.to_vec(),
        };

        // Write then rename, so that a reader never sees half a draft.
        let path = self.path_of(round);
        let tmp = path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(&draft)?)?;
        std::fs::rename(&tmp, &path)?;

        tracing::debug!("Saved draft {} of round {round}", draft.id);
        Ok(draft)
    }

    fn clear_draft(&self, round: u32) -> Result<(), DraftStoreError> {
        match std::fs::remove_file(self.path_of(round)) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}
