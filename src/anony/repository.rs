//! # Post Repository: Snapshot Persistence
//!
//! The repository owns the in-memory list of posts, the single source of truth
//! for the board, and mirrors it into the [`KeyValueStore`] as one JSON blob.
//!
//! ## Snapshot, Never Incremental
//!
//! Every save serializes the entire list and writes it with a single `set`
//! call. There are no partial updates: after any successful mutation the blob
//! equals the in-memory list.
//!
//! ## Corruption Means Empty
//!
//! [`PostRepository::load`] never fails. A missing key, a blob that does not
//! parse, or a store that cannot be read all yield an empty board, with a
//! warning logged for the latter two. The next save overwrites the bad blob.
//!
//! ## All-or-Nothing Handlers
//!
//! [`PostRepository::commit`] runs a mutation and then saves. If either step
//! fails, the pre-mutation list is restored, so a handler either mutates and
//! persists or leaves the board exactly as it was.
//!
//! ## No Vote Checks Here
//!
//! `apply_vote` / `apply_comment_vote` change the score and nothing else.
//! Whether a vote is allowed is the ledger's business (see [`crate::votes`]);
//! the command layer asks the ledger first.

use crate::error::{BoardError, Result};
use crate::model::{parse_tags, Comment, CommentId, Post, PostId, VoteDirection};
use crate::store::KeyValueStore;
use crate::tree;
use serde::{Deserialize, Serialize};

pub struct PostRepository {
    key: String,
    posts: Vec<Post>,
}

impl PostRepository {
    /// An empty repository persisting under `key`.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            posts: Vec::new(),
        }
    }

    /// Load the snapshot stored under `key`.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S, key: impl Into<String>) -> Self {
        let key = key.into();
        let posts = match store.get(&key) {
            Ok(Some(raw)) => decode(&raw).unwrap_or_else(|err| {
                tracing::warn!(%key, %err, "failed to parse posts from storage");
                Vec::new()
            }),
            Ok(None) => Vec::new(),
            Err(err) => {
                tracing::warn!(%key, %err, "failed to read posts from storage");
                Vec::new()
            }
        };
        tracing::debug!(%key, count = posts.len(), "posts loaded");
        Self { key, posts }
    }

    /// Write the full snapshot in one call.
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &S) -> Result<()> {
        let blob = encode(&self.posts).map_err(BoardError::Serialization)?;
        store.set(&self.key, &blob)?;
        tracing::trace!(key = %self.key, count = self.posts.len(), "posts saved");
        Ok(())
    }

    /// Run `mutate`, then save. On any failure the pre-mutation list is restored.
    pub fn commit<S, T, F>(&mut self, store: &S, mutate: F) -> Result<T>
    where
        S: KeyValueStore + ?Sized,
        F: FnOnce(&mut Self) -> Result<T>,
    {
        let checkpoint = self.posts.clone();
        let outcome = mutate(self).and_then(|value| self.save(store).map(|_| value));
        if outcome.is_err() {
            self.posts = checkpoint;
        }
        outcome
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Posts in creation order (oldest first).
    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn post(&self, id: &PostId) -> Option<&Post> {
        self.posts.iter().find(|p| &p.id == id)
    }

    fn post_mut(&mut self, id: &PostId) -> Result<&mut Post> {
        self.posts
            .iter_mut()
            .find(|p| &p.id == id)
            .ok_or_else(|| BoardError::PostNotFound(id.clone()))
    }

    pub fn comment(&self, post_id: &PostId, comment_id: &CommentId) -> Option<&Comment> {
        self.post(post_id).and_then(|p| tree::find(&p.comments, comment_id))
    }

    fn comment_mut(&mut self, post_id: &PostId, comment_id: &CommentId) -> Result<&mut Comment> {
        let post = self.post_mut(post_id)?;
        tree::find_mut(&mut post.comments, comment_id)
            .ok_or_else(|| BoardError::CommentNotFound(post_id.clone(), comment_id.clone()))
    }

    /// Append a new post. Title and description must already be non-empty.
    pub fn create_post(&mut self, title: String, description: String, raw_tags: &str) -> Post {
        let post = Post::new(title, description, parse_tags(raw_tags));
        self.posts.push(post.clone());
        post
    }

    pub fn add_comment(&mut self, post_id: &PostId, text: String) -> Result<Comment> {
        Ok(self.post_mut(post_id)?.add_comment(text))
    }

    pub fn add_reply(
        &mut self,
        post_id: &PostId,
        parent_id: &CommentId,
        text: String,
    ) -> Result<Comment> {
        let reply = Comment::new(text);
        let post = self.post_mut(post_id)?;
        tree::append_reply(&mut post.comments, parent_id, reply.clone())
            .map_err(|_| BoardError::CommentNotFound(post_id.clone(), parent_id.clone()))?;
        Ok(reply)
    }

    /// Returns the new score.
    pub fn apply_vote(&mut self, post_id: &PostId, direction: VoteDirection) -> Result<i64> {
        Ok(self.post_mut(post_id)?.apply_vote(direction))
    }

    /// Returns the new score.
    pub fn apply_comment_vote(
        &mut self,
        post_id: &PostId,
        comment_id: &CommentId,
        direction: VoteDirection,
    ) -> Result<i64> {
        Ok(self.comment_mut(post_id, comment_id)?.apply_vote(direction))
    }
}

/// Serializes a snapshot. Serde recurses once per reply level, so the
/// serializer grows its stack on demand.
pub fn encode(posts: &[Post]) -> serde_json::Result<String> {
    let mut out = Vec::new();
    let mut ser = serde_json::Serializer::new(&mut out);
    posts.serialize(serde_stacker::Serializer::new(&mut ser))?;
    String::from_utf8(out).map_err(<serde_json::Error as serde::ser::Error>::custom)
}

/// Parses a snapshot of any nesting depth. The recursion limit is off and
/// the stack grows on demand instead, so depth alone never reads as corruption.
pub fn decode(raw: &str) -> serde_json::Result<Vec<Post>> {
    let mut de = serde_json::Deserializer::from_str(raw);
    de.disable_recursion_limit();
    let posts = Vec::<Post>::deserialize(serde_stacker::Deserializer::new(&mut de))?;
    de.end()?;
    Ok(posts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::{comment, post, reply_chain, StoreFixture};
    use crate::store::memory::MemBackend;

    const KEY: &str = "anony_posts_v1";

    #[test]
    fn test_load_missing_key_is_empty() {
        let store = MemBackend::new();
        let repo = PostRepository::load(&store, KEY);
        assert!(repo.posts().is_empty());
    }

    #[test]
    fn test_load_malformed_blob_is_empty() {
        let store = StoreFixture::new().with_raw(KEY, "[{not json").store;
        let repo = PostRepository::load(&store, KEY);
        assert!(repo.posts().is_empty());
    }

    #[test]
    fn test_load_wrong_shape_is_empty() {
        let store = StoreFixture::new().with_raw(KEY, r#"{"posts": 1}"#).store;
        assert!(PostRepository::load(&store, KEY).posts().is_empty());
    }

    #[test]
    fn test_load_legacy_blob() {
        // top-level comments used to be written without a score
        let raw = r#"[{"id":"1700","title":"Hi","description":"There","tags":[],"score":2,
            "comments":[{"id":"1701","text":"first","replies":[]}]}]"#;
        let store = StoreFixture::new().with_raw(KEY, raw).store;
        let repo = PostRepository::load(&store, KEY);
        assert_eq!(repo.posts().len(), 1);
        assert_eq!(repo.posts()[0].score, 2);
        assert_eq!(repo.posts()[0].comments[0].score, 0);
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let store = MemBackend::new();
        let mut repo = PostRepository::new(KEY);
        let p = repo.create_post("Title".into(), "Body".into(), "x, y");
        let c = repo.add_comment(&p.id, "top".into()).unwrap();
        let r = repo.add_reply(&p.id, &c.id, "nested".into()).unwrap();
        repo.add_reply(&p.id, &r.id, "deeper".into()).unwrap();
        repo.apply_vote(&p.id, VoteDirection::Down).unwrap();
        repo.apply_comment_vote(&p.id, &r.id, VoteDirection::Up).unwrap();
        repo.save(&store).unwrap();

        let loaded = PostRepository::load(&store, KEY);
        assert_eq!(loaded.posts(), repo.posts());
    }

    #[test]
    fn test_roundtrip_beyond_default_recursion_limit() {
        let store = StoreFixture::new()
            .with_posts(KEY, &[post("1", "Deep", reply_chain(120, "bottom"))])
            .store;
        let repo = PostRepository::load(&store, KEY);
        assert_eq!(repo.posts().len(), 1);
        assert_eq!(tree::count_all(&repo.posts()[0].comments), 121);
    }

    #[test]
    fn test_very_deep_thread_saves_and_loads() {
        let store = StoreFixture::new()
            .with_posts(KEY, &[post("1", "Deep", reply_chain(10_000, "bottom"))])
            .store;
        let mut repo = PostRepository::load(&store, KEY);
        assert_eq!(tree::count_all(&repo.posts()[0].comments), 10_001);

        let leaf = CommentId::from("c10000");
        let reply = repo
            .commit(&store, |r| r.add_reply(&PostId::from("1"), &leaf, "tail".into()))
            .unwrap();
        let reloaded = PostRepository::load(&store, KEY);
        assert!(reloaded.comment(&PostId::from("1"), &reply.id).is_some());
    }

    #[test]
    fn test_truncated_deep_blob_is_empty() {
        let mut raw = String::from(r#"[{"id":"1","title":"t","description":"d","comments":"#);
        for i in 0..10_000 {
            raw.push_str(&format!(r#"[{{"id":"c{}","text":"x","replies":"#, i));
        }
        let store = StoreFixture::new().with_raw(KEY, &raw).store;
        assert!(PostRepository::load(&store, KEY).posts().is_empty());
    }

    #[test]
    fn test_create_post_parses_tags() {
        let mut repo = PostRepository::new(KEY);
        let p = repo.create_post("T".into(), "D".into(), "a, b ,, c");
        assert_eq!(p.tags, vec!["a", "b", "c"]);
        assert_eq!(p.score, 0);
        assert_eq!(repo.posts().len(), 1);
    }

    #[test]
    fn test_add_reply_to_nested_comment() {
        let store = StoreFixture::new()
            .with_posts(
                KEY,
                &[post(
                    "p",
                    "Thread",
                    vec![comment("a", "A", vec![comment("b", "B", vec![])])],
                )],
            )
            .store;
        let mut repo = PostRepository::load(&store, KEY);
        let reply = repo
            .add_reply(&PostId::from("p"), &CommentId::from("b"), "C".into())
            .unwrap();
        assert_eq!(reply.score, 0);
        assert!(reply.replies.is_empty());

        let b = repo
            .comment(&PostId::from("p"), &CommentId::from("b"))
            .unwrap();
        assert_eq!(b.replies.len(), 1);
    }

    #[test]
    fn test_unknown_ids() {
        let mut repo = PostRepository::new(KEY);
        let p = repo.create_post("T".into(), "D".into(), "");
        assert!(matches!(
            repo.add_comment(&PostId::from("missing"), "x".into()),
            Err(BoardError::PostNotFound(_))
        ));
        assert!(matches!(
            repo.add_reply(&p.id, &CommentId::from("missing"), "x".into()),
            Err(BoardError::CommentNotFound(_, _))
        ));
    }

    #[test]
    fn test_commit_rolls_back_on_failed_save() {
        let store = MemBackend::new();
        let mut repo = PostRepository::new(KEY);
        repo.create_post("Keep".into(), "me".into(), "");
        repo.save(&store).unwrap();

        store.set_simulate_write_error(true);
        let result = repo.commit(&store, |r| {
            Ok(r.create_post("Lost".into(), "post".into(), ""))
        });
        assert!(result.is_err());
        assert_eq!(repo.posts().len(), 1);
        assert_eq!(repo.posts()[0].title, "Keep");
    }

    #[test]
    fn test_commit_rolls_back_on_failed_mutation() {
        let store = MemBackend::new();
        let mut repo = PostRepository::new(KEY);
        let p = repo.create_post("T".into(), "D".into(), "");

        let result = repo.commit(&store, |r| {
            r.apply_vote(&p.id, VoteDirection::Up)?;
            r.add_comment(&PostId::from("missing"), "x".into())
        });
        assert!(result.is_err());
        assert_eq!(repo.posts()[0].score, 0);
        assert_eq!(store.get(KEY).unwrap(), None);
    }

    #[test]
    fn test_commit_persists_full_snapshot() {
        let store = MemBackend::new();
        let mut repo = PostRepository::new(KEY);
        repo.commit(&store, |r| Ok(r.create_post("One".into(), "1".into(), "")))
            .unwrap();
        repo.commit(&store, |r| Ok(r.create_post("Two".into(), "2".into(), "")))
            .unwrap();

        let reloaded = PostRepository::load(&store, KEY);
        let titles: Vec<_> = reloaded.posts().iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["One", "Two"]);
    }
}
