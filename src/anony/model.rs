//! # Domain Model: Posts, Comment Trees and Vote Directions
//!
//! This module defines the core data structures for anony: [`Post`], [`Comment`],
//! their identifiers, and [`VoteDirection`].
//!
//! ## Shape
//!
//! ```text
//! Post
//! ├── title, description, tags, score
//! └── comments: Vec<Comment>
//!         └── Comment
//!             ├── text, score
//!             └── replies: Vec<Comment>   (unbounded depth)
//! ```
//!
//! Every comment is owned by exactly one parent through a plain `Vec`, so the
//! thread is a tree by construction: a node can never appear twice and can never
//! be its own ancestor.
//!
//! ## Identifiers
//!
//! Post and comment ids are generated once at creation by [`new_id`] and never
//! change. The format is `<unix-millis>-<8 hex chars>`:
//!
//! - The millisecond prefix keeps ids roughly time-ordered.
//! - The random suffix separates ids created within the same millisecond.
//! - Generated ids never contain `_`, which the vote ledger uses as the
//!   separator of composite keys (see [`crate::votes`]).
//!
//! Ids loaded from older snapshots are kept verbatim, whatever their format.
//!
//! ## Legacy Snapshots
//!
//! Older snapshots stored top-level comments without a `score` field and could
//! omit empty `replies`/`tags`/`comments` arrays. All of these default on load.

use crate::tree;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Generates a fresh id for a post or comment.
pub fn new_id() -> String {
    let millis = Utc::now().timestamp_millis();
    let suffix = Uuid::new_v4().simple().to_string();
    format!("{}-{}", millis, &suffix[..8])
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PostId(String);

impl PostId {
    pub fn generate() -> Self {
        Self(new_id())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PostId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for PostId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommentId(String);

impl CommentId {
    pub fn generate() -> Self {
        Self(new_id())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CommentId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CommentId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// The direction of a one-shot vote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteDirection {
    Up,
    Down,
}

impl VoteDirection {
    /// The score change an accepted vote applies.
    pub fn delta(self) -> i64 {
        match self {
            VoteDirection::Up => 1,
            VoteDirection::Down => -1,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            VoteDirection::Up => "up",
            VoteDirection::Down => "down",
        }
    }
}

impl fmt::Display for VoteDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoteDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "up" => Ok(VoteDirection::Up),
            "down" => Ok(VoteDirection::Down),
            other => Err(format!("Invalid vote direction: {:?}", other)),
        }
    }
}

#[derive(Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: CommentId,
    pub text: String,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub replies: Vec<Comment>,
}

impl Comment {
    pub fn new(text: String) -> Self {
        Self {
            id: CommentId::generate(),
            text,
            score: 0,
            replies: Vec::new(),
        }
    }

    pub fn apply_vote(&mut self, direction: VoteDirection) -> i64 {
        self.score += direction.delta();
        self.score
    }
}

impl Clone for Comment {
    fn clone(&self) -> Self {
        tree::grow_stack(|| Comment {
            id: self.id.clone(),
            text: self.text.clone(),
            score: self.score,
            replies: self.replies.clone(),
        })
    }
}

/// Replies are released from a flat worklist, so dropping a deep thread never
/// recurses once per level.
impl Drop for Comment {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.replies);
        while let Some(mut comment) = pending.pop() {
            pending.append(&mut comment.replies);
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    pub id: PostId,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

impl Post {
    pub fn new(title: String, description: String, tags: Vec<String>) -> Self {
        Self {
            id: PostId::generate(),
            title,
            description,
            tags,
            score: 0,
            comments: Vec::new(),
        }
    }

    /// Appends a fresh top-level comment and returns a copy of it.
    pub fn add_comment(&mut self, text: String) -> Comment {
        let comment = Comment::new(text);
        self.comments.push(comment.clone());
        comment
    }

    pub fn apply_vote(&mut self, direction: VoteDirection) -> i64 {
        self.score += direction.delta();
        self.score
    }
}

/// Parses the comma-separated tag input of the post form.
///
/// Entries are trimmed and empty entries dropped. Order is kept and duplicates
/// are not removed.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tags_trims_and_drops_empties() {
        assert_eq!(parse_tags("a, b ,, c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_parse_tags_keeps_duplicates_and_order() {
        assert_eq!(parse_tags("z,a,z"), vec!["z", "a", "z"]);
    }

    #[test]
    fn test_parse_tags_blank_input() {
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ,").is_empty());
    }

    #[test]
    fn test_new_post_starts_at_zero() {
        let post = Post::new("T".into(), "D".into(), vec![]);
        assert_eq!(post.score, 0);
        assert!(post.comments.is_empty());
    }

    #[test]
    fn test_ids_are_distinct_under_rapid_creation() {
        let ids: std::collections::HashSet<String> = (0..500).map(|_| new_id()).collect();
        assert_eq!(ids.len(), 500);
    }

    #[test]
    fn test_generated_ids_have_no_underscore() {
        for _ in 0..50 {
            assert!(!new_id().contains('_'));
        }
    }

    #[test]
    fn test_vote_direction_parse() {
        assert_eq!("up".parse::<VoteDirection>(), Ok(VoteDirection::Up));
        assert_eq!("down".parse::<VoteDirection>(), Ok(VoteDirection::Down));
        assert!("sideways".parse::<VoteDirection>().is_err());
        assert!("UP".parse::<VoteDirection>().is_err());
    }

    #[test]
    fn test_apply_vote_moves_score_by_one() {
        let mut post = Post::new("T".into(), "D".into(), vec![]);
        assert_eq!(post.apply_vote(VoteDirection::Up), 1);
        assert_eq!(post.apply_vote(VoteDirection::Down), 0);
        assert_eq!(post.apply_vote(VoteDirection::Down), -1);
    }

    #[test]
    fn test_deep_thread_clones_and_drops() {
        let mut top = Comment::new("leaf".into());
        for _ in 0..10_000 {
            let mut parent = Comment::new("node".into());
            parent.replies.push(top);
            top = parent;
        }
        let copy = top.clone();
        assert_eq!(crate::tree::count_all(&copy.replies), 10_000);
        drop(top);
        drop(copy);
    }

    #[test]
    fn test_legacy_comment_without_score_defaults() {
        let json = r#"{"id":"1","text":"hi","replies":[]}"#;
        let comment: Comment = serde_json::from_str(json).unwrap();
        assert_eq!(comment.score, 0);

        let json = r#"{"id":"2","text":"bare"}"#;
        let comment: Comment = serde_json::from_str(json).unwrap();
        assert!(comment.replies.is_empty());
    }

    #[test]
    fn test_ids_serialize_as_plain_strings() {
        let post = Post {
            id: PostId::from("42"),
            title: "t".into(),
            description: "d".into(),
            tags: vec![],
            score: 3,
            comments: vec![],
        };
        let json = serde_json::to_value(&post).unwrap();
        assert_eq!(json["id"], "42");
        assert_eq!(json["score"], 3);
    }
}
