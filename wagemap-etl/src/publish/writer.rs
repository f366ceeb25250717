//! Atomic JSON file writer
//!
//! Every index file is written in one shot: serialize, write to a sibling
//! temp file, rename over the target. A publish that dies mid-write leaves
//! the previous run's file in place rather than a truncated one.

use serde::Serialize;
use std::fs;
use std::path::Path;
use wagemap_common::Result;

/// Serialize `value` and atomically replace `path` with it
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let bytes = serde_json::to_vec(value)?;

    // Rename is atomic only within a filesystem, so the temp file must
    // live next to the target
    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, &bytes)?;
    fs::rename(&tmp, path)?;

    tracing::debug!(path = %path.display(), bytes = bytes.len(), "Index file written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_and_replaces() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/out.json");

        write_json(&path, &serde_json::json!({"v": 1})).unwrap();
        write_json(&path, &serde_json::json!({"v": 2})).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, r#"{"v":2}"#);
        assert!(!path.with_extension("json.tmp").exists());
    }
}
