use super::KeyValueStore;
use crate::error::{BoardError, Result};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// In-memory key-value backend for testing and development.
///
/// Uses `RefCell` for interior mutability since the board is single-threaded.
/// Does NOT persist data.
#[derive(Default)]
pub struct MemBackend {
    entries: RefCell<BTreeMap<String, String>>,
    simulate_write_error: Cell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Drop a single key, as if it had been cleared from outside the board.
    pub fn remove(&self, key: &str) -> Option<String> {
        self.entries.borrow_mut().remove(key)
    }

    /// Drop every key.
    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

impl KeyValueStore for MemBackend {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(BoardError::Store("Simulated write error".to_string()));
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }
}

// --- Test Fixtures ---

#[cfg(any(test, feature = "test_utils"))]
pub mod fixtures {
    use super::*;
    use crate::model::{Comment, CommentId, Post, PostId};

    /// Builds a backend pre-seeded with raw entries or a post snapshot.
    pub struct StoreFixture {
        pub store: MemBackend,
    }

    impl Default for StoreFixture {
        fn default() -> Self {
            Self::new()
        }
    }

    impl StoreFixture {
        pub fn new() -> Self {
            Self {
                store: MemBackend::new(),
            }
        }

        pub fn with_raw(self, key: &str, value: &str) -> Self {
            self.store.set(key, value).unwrap();
            self
        }

        pub fn with_posts(self, key: &str, posts: &[Post]) -> Self {
            let blob = crate::repository::encode(posts).unwrap();
            self.with_raw(key, &blob)
        }
    }

    /// A post with fixed ids, handy for asserting on storage keys.
    pub fn post(id: &str, title: &str, comments: Vec<Comment>) -> Post {
        Post {
            id: PostId::from(id),
            title: title.to_string(),
            description: format!("About {}", title),
            tags: Vec::new(),
            score: 0,
            comments,
        }
    }

    pub fn comment(id: &str, text: &str, replies: Vec<Comment>) -> Comment {
        Comment {
            id: CommentId::from(id),
            text: text.to_string(),
            score: 0,
            replies,
        }
    }

    /// A single chain of replies `depth` levels below one top-level comment.
    /// The deepest node carries `leaf_text`, every other node filler text.
    pub fn reply_chain(depth: usize, leaf_text: &str) -> Vec<Comment> {
        let mut current = comment(&format!("c{}", depth), leaf_text, Vec::new());
        for level in (0..depth).rev() {
            current = comment(&format!("c{}", level), "filler", vec![current]);
        }
        vec![current]
    }
}
