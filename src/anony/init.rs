//! # Data Directory
//!
//! On the browser the board lives in the origin's local storage. Everywhere
//! else it lives in a directory holding two files:
//!
//! ```text
//! <data dir>/
//!   config.json    # BoardConfig, optional
//!   storage.json   # every store key, see FsBackend
//! ```
//!
//! [`initialize`] resolves that directory in this order:
//!
//! 1. An explicit `data_override` path.
//! 2. The `ANONY_DATA` environment variable (mostly for tests).
//! 3. The OS data directory from the `directories` crate.

use crate::api::BoardApi;
use crate::config::BoardConfig;
use crate::error::{BoardError, Result};
use crate::store::fs::FsBackend;
use directories::ProjectDirs;
use std::path::PathBuf;

pub const DATA_DIR_ENV: &str = "ANONY_DATA";

pub struct BoardContext {
    pub api: BoardApi<FsBackend>,
    pub config: BoardConfig,
    pub data_dir: PathBuf,
}

pub fn resolve_data_dir(data_override: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = data_override {
        return Ok(path);
    }
    if let Some(path) = std::env::var_os(DATA_DIR_ENV) {
        return Ok(PathBuf::from(path));
    }
    ProjectDirs::from("com", "anony", "anony")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .ok_or_else(|| BoardError::Store("Could not determine data dir".to_string()))
}

/// Opens the board in the resolved data directory.
///
/// A malformed `config.json` is an error. A malformed `storage.json` is not:
/// the board opens empty and the file is replaced on the next write.
pub fn initialize(data_override: Option<PathBuf>) -> Result<BoardContext> {
    let data_dir = resolve_data_dir(data_override)?;
    let config = BoardConfig::load(&data_dir)?;
    let store = FsBackend::new(data_dir.clone());
    let api = BoardApi::new(store, config.clone());

    tracing::debug!(data_dir = %data_dir.display(), "board initialized");
    Ok(BoardContext {
        api,
        config,
        data_dir,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;
    use crate::store::KeyValueStore;

    #[test]
    fn test_override_wins() {
        let temp = TempDir::new().unwrap();
        let dir = resolve_data_dir(Some(temp.path().to_path_buf())).unwrap();
        assert_eq!(dir, temp.path());
    }

    #[test]
    fn test_initialize_fresh_dir() {
        let temp = TempDir::new().unwrap();
        let ctx = initialize(Some(temp.path().join("board"))).unwrap();
        assert_eq!(ctx.config, BoardConfig::default());
        assert!(ctx.api.posts().is_empty());
        assert_eq!(ctx.api.store().root(), temp.path().join("board"));
    }

    #[test]
    fn test_initialize_reads_config() {
        let temp = TempDir::new().unwrap();
        let config = BoardConfig {
            storage_key: "other".to_string(),
            ..BoardConfig::default()
        };
        config.save(temp.path()).unwrap();

        let mut ctx = initialize(Some(temp.path().to_path_buf())).unwrap();
        assert_eq!(ctx.api.config().storage_key, "other");
        ctx.api.create_post("t", "d", "").unwrap();
        assert!(ctx.api.store().get("other").unwrap().is_some());
    }

    #[test]
    fn test_malformed_config_fails() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("config.json"), "not json").unwrap();
        assert!(initialize(Some(temp.path().to_path_buf())).is_err());
    }
}
