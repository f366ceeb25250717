//! Raw artifact store
//!
//! One JSON file per source under the raw directory, written after each
//! fetch and read back by the join phase. An explicit process-scoped store
//! rather than module-level caches; `--skip-fetch` re-joins whatever the
//! previous run left here.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use wagemap_common::Result;

pub struct ArtifactStore {
    raw_dir: PathBuf,
}

impl ArtifactStore {
    pub fn new(raw_dir: impl Into<PathBuf>) -> Self {
        Self {
            raw_dir: raw_dir.into(),
        }
    }

    fn path(&self, source: &str) -> PathBuf {
        self.raw_dir.join(format!("{source}.json"))
    }

    /// Persist one source's artifact, replacing any previous run's copy
    pub fn save<T: Serialize>(&self, source: &str, artifact: &T) -> Result<()> {
        crate::publish::writer::write_json(&self.path(source), artifact)
    }

    /// Load one source's artifact; `None` when the source never ran
    pub fn load<T: DeserializeOwned>(&self, source: &str) -> Result<Option<T>> {
        let path = self.path(source);
        if !path.exists() {
            return Ok(None);
        }
        let text = fs::read_to_string(&path)?;
        let artifact = serde_json::from_str(&text)?;
        Ok(Some(artifact))
    }

    /// Whether an artifact exists for the source
    pub fn exists(&self, source: &str) -> bool {
        self.path(source).exists()
    }

    pub fn raw_dir(&self) -> &Path {
        &self.raw_dir
    }
}
