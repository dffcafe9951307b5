//! File-backed cache of column-title → column-id lookups.
//!
//! # Design
//! The cache is an explicit object owned by the client instance, not ambient
//! process state. Loading tolerates a missing or corrupt file by starting
//! empty (corruption is logged, not raised); persistence is an explicit
//! [`ColumnCache::flush`] that rewrites the whole file. There is no locking
//! and no versioning — concurrent writers race and the last flush wins.
//!
//! A resolved (table-id, title) pair is never re-validated against the
//! server: a remote column rename leaves the entry silently stale until the
//! file is deleted.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, warn};

use crate::error::ApiError;

/// Default backing file, relative to the working directory.
pub const DEFAULT_CACHE_PATH: &str = "column_mapping.json";

/// Two-level mapping `table-id → column-title → column-id`, persisted as a
/// single JSON object.
#[derive(Debug, Clone)]
pub struct ColumnCache {
    path: PathBuf,
    tables: HashMap<String, HashMap<String, String>>,
}

impl ColumnCache {
    /// Load the cache from `path`. A missing or unreadable file and a file
    /// that is not the expected JSON shape both yield an empty cache; this
    /// constructor never fails.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let tables = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str(&raw) {
                Ok(tables) => tables,
                Err(e) => {
                    warn!(
                        "column mapping file {} is corrupt ({e}), starting empty",
                        path.display()
                    );
                    HashMap::new()
                }
            },
            Err(e) => {
                debug!(
                    "column mapping file {} not readable ({e}), starting empty",
                    path.display()
                );
                HashMap::new()
            }
        };
        Self { path, tables }
    }

    /// Look up a cached column id. In-memory only, no I/O.
    pub fn get(&self, table_id: &str, title: &str) -> Option<&str> {
        self.tables
            .get(table_id)
            .and_then(|columns| columns.get(title))
            .map(String::as_str)
    }

    /// Record a resolved column id in memory. Call [`ColumnCache::flush`]
    /// to persist it.
    pub fn insert(&mut self, table_id: &str, title: &str, column_id: &str) {
        self.tables
            .entry(table_id.to_string())
            .or_default()
            .insert(title.to_string(), column_id.to_string());
    }

    /// Rewrite the backing file with the full current mapping.
    pub fn flush(&self) -> Result<(), ApiError> {
        let raw = serde_json::to_string(&self.tables)
            .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        fs::write(&self.path, raw).map_err(|e| {
            ApiError::CacheError(format!("{}: {e}", self.path.display()))
        })?;
        debug!("flushed column mapping to {}", self.path.display());
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ColumnCache::load(dir.path().join("absent.json"));
        assert!(cache.get("tbl1", "Name").is_none());
    }

    #[test]
    fn corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("column_mapping.json");
        fs::write(&path, "{not json").unwrap();
        let cache = ColumnCache::load(&path);
        assert!(cache.get("tbl1", "Name").is_none());
    }

    #[test]
    fn wrong_shape_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("column_mapping.json");
        fs::write(&path, r#"["not", "a", "mapping"]"#).unwrap();
        let cache = ColumnCache::load(&path);
        assert!(cache.get("tbl1", "Name").is_none());
    }

    #[test]
    fn insert_then_get() {
        let dir = tempfile::tempdir().unwrap();
        let mut cache = ColumnCache::load(dir.path().join("column_mapping.json"));
        cache.insert("tbl1", "Name", "c1");
        assert_eq!(cache.get("tbl1", "Name"), Some("c1"));
        assert!(cache.get("tbl1", "name").is_none(), "titles are case-sensitive");
        assert!(cache.get("tbl2", "Name").is_none());
    }

    #[test]
    fn flush_and_reload_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("column_mapping.json");
        let mut cache = ColumnCache::load(&path);
        cache.insert("tbl1", "Name", "c1");
        cache.insert("tbl1", "Age", "c2");
        cache.insert("tbl2", "Name", "c9");
        cache.flush().unwrap();

        let reloaded = ColumnCache::load(&path);
        assert_eq!(reloaded.get("tbl1", "Name"), Some("c1"));
        assert_eq!(reloaded.get("tbl1", "Age"), Some("c2"));
        assert_eq!(reloaded.get("tbl2", "Name"), Some("c9"));
    }

    #[test]
    fn flush_writes_two_level_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("column_mapping.json");
        let mut cache = ColumnCache::load(&path);
        cache.insert("tbl1", "Name", "c1");
        cache.flush().unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let v: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(v, serde_json::json!({"tbl1": {"Name": "c1"}}));
    }

    #[test]
    fn flush_to_unwritable_path_is_cache_error() {
        let dir = tempfile::tempdir().unwrap();
        let cache = ColumnCache::load(dir.path().join("no-such-dir").join("m.json"));
        let err = cache.flush().unwrap_err();
        assert!(matches!(err, ApiError::CacheError(_)));
    }
}
