use crate::error::{BoardError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

const CONFIG_FILENAME: &str = "config.json";
const DEFAULT_STORAGE_KEY: &str = "anony_posts_v1";
const DEFAULT_DEBOUNCE_MS: u64 = 150;
const DEFAULT_HIGHLIGHT_CLASS: &str = "search-hit";

/// Configuration for the board, stored in `<data dir>/config.json`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BoardConfig {
    /// Key the post snapshot is stored under
    #[serde(default = "default_storage_key")]
    pub storage_key: String,

    /// Quiet period before live search input is applied
    #[serde(default = "default_debounce_ms")]
    pub search_debounce_ms: u64,

    /// CSS class on highlighted search hits
    #[serde(default = "default_highlight_class")]
    pub highlight_class: String,
}

fn default_storage_key() -> String {
    DEFAULT_STORAGE_KEY.to_string()
}

fn default_debounce_ms() -> u64 {
    DEFAULT_DEBOUNCE_MS
}

fn default_highlight_class() -> String {
    DEFAULT_HIGHLIGHT_CLASS.to_string()
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            storage_key: default_storage_key(),
            search_debounce_ms: default_debounce_ms(),
            highlight_class: default_highlight_class(),
        }
    }
}

impl BoardConfig {
    /// Reads `config.json` from `dir`. Missing file or missing fields fall
    /// back to defaults; a file that does not parse is an error.
    pub fn load<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let path = dir.as_ref().join(CONFIG_FILENAME);
        let config = match fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw)?,
            Err(err) if err.kind() == ErrorKind::NotFound => Self::default(),
            Err(err) => return Err(BoardError::Io(err)),
        };
        tracing::debug!(path = %path.display(), ?config, "board config loaded");
        Ok(config)
    }

    /// Writes `config.json` into `dir`, creating it as needed.
    pub fn save<P: AsRef<Path>>(&self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        fs::write(dir.join(CONFIG_FILENAME), serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn search_debounce(&self) -> Duration {
        Duration::from_millis(self.search_debounce_ms)
    }
}
