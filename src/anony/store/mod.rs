//! # Storage Layer
//!
//! This module defines the persistence boundary for anony. The [`KeyValueStore`]
//! trait is the whole contract: a synchronous, string-keyed `get`/`set`, with no
//! transactions and no schema. Everything structured (the post snapshot, vote
//! flags, action markers) is layered on top by [`crate::repository`] and
//! [`crate::votes`].
//!
//! ## Surface
//!
//! The trait mirrors browser `localStorage`. Any medium with string keys and
//! values can back the board.
//!
//! ## Implementations
//!
//! - [`memory::MemBackend`]: In-memory map for tests and development
//!   - Can simulate write failures
//!   - Can be cleared, or have single keys removed, to model external clearing
//!
//! - [`fs::FsBackend`]: File-backed map for native use
//!   - All keys live in one `storage.json` object
//!   - Every `set` rewrites the file atomically (tmp file + rename)
//!
//! - `local::LocalStorageBackend` (feature `web`): the browser's `localStorage`
//!
//! ## Interior Mutability
//!
//! All methods take `&self`. The board is single-threaded, so backends use
//! `RefCell` (or the browser's own storage) instead of locks, and several
//! components can hold a shared reference to the same store.
//!
//! ## Key Layout
//!
//! ```text
//! anony_posts_v1          # JSON array of posts (full snapshot)
//! vote_<postId>           # "up" | "down"
//! vote_<postId>_<cmtId>   # "up" | "down"
//! <action>_<postId>       # "true"
//! ```

use crate::error::Result;

pub mod fs;
#[cfg(feature = "web")]
pub mod local;
pub mod memory;

/// Abstract interface for a synchronous string key-value medium.
pub trait KeyValueStore {
    /// Read the value stored under `key`, `None` if the key was never set.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value.
    fn set(&self, key: &str, value: &str) -> Result<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}
