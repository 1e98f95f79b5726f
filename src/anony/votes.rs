//! # Vote Ledger: One-Shot Votes Over a Flat Key-Value Store
//!
//! Every post and every comment can be voted on once, up or down, and the vote
//! can never be changed or retracted. The ledger records those votes as
//! individually-keyed flags in the [`KeyValueStore`], separate from the post
//! snapshot.
//!
//! ## Subject Keys
//!
//! A [`SubjectKey`] names the thing being voted on:
//!
//! | Subject | Storage key | Value |
//! |---|---|---|
//! | `SubjectKey::Post(p)` | `vote_<p>` | `up` / `down` |
//! | `SubjectKey::Comment(p, c)` | `vote_<p>_<c>` | `up` / `down` |
//!
//! Comment keys include the post id, so equal comment ids under different posts
//! never collide. Generated ids contain no `_` (see [`crate::model::new_id`]),
//! which keeps post keys and comment keys disjoint.
//!
//! ## Append-Only
//!
//! Nothing in the ledger removes or rewrites a flag. [`VoteLedger::try_record`]
//! refuses to touch a subject that already carries a value, even one it cannot
//! parse. Flags are never reconciled against the post snapshot: if the snapshot
//! is cleared, its flags stay behind.
//!
//! ## Action Markers
//!
//! Accepted post votes also set a marker `<action>_<postId> = "true"`
//! (`upvote_…` / `downvote_…`). Markers are informational and never read back
//! to gate voting.

use crate::error::Result;
use crate::model::{CommentId, PostId, VoteDirection};
use crate::store::KeyValueStore;
use std::fmt;

const VOTE_PREFIX: &str = "vote";
const MARKER_VALUE: &str = "true";

/// The thing a vote is cast on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SubjectKey {
    Post(PostId),
    Comment(PostId, CommentId),
}

impl SubjectKey {
    pub fn post(post_id: &PostId) -> Self {
        SubjectKey::Post(post_id.clone())
    }

    pub fn comment(post_id: &PostId, comment_id: &CommentId) -> Self {
        SubjectKey::Comment(post_id.clone(), comment_id.clone())
    }

    pub fn storage_key(&self) -> String {
        match self {
            SubjectKey::Post(post) => format!("{}_{}", VOTE_PREFIX, post),
            SubjectKey::Comment(post, comment) => {
                format!("{}_{}_{}", VOTE_PREFIX, post, comment)
            }
        }
    }
}

impl fmt::Display for SubjectKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.storage_key())
    }
}

/// Per-post action markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Upvote,
    Downvote,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Upvote => "upvote",
            Action::Downvote => "downvote",
        }
    }

    pub fn storage_key(self, post_id: &PostId) -> String {
        format!("{}_{}", self.as_str(), post_id)
    }
}

impl From<VoteDirection> for Action {
    fn from(direction: VoteDirection) -> Self {
        match direction {
            VoteDirection::Up => Action::Upvote,
            VoteDirection::Down => Action::Downvote,
        }
    }
}

/// A view of the vote flags held in a store.
pub struct VoteLedger<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> VoteLedger<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// True when any value is stored for the subject.
    ///
    /// An unrecognized value still counts as a vote: the subject stays locked.
    pub fn has_voted(&self, subject: &SubjectKey) -> Result<bool> {
        let raw = self.store.get(&subject.storage_key())?;
        Ok(raw.is_some_and(|v| !v.is_empty()))
    }

    pub fn get_vote(&self, subject: &SubjectKey) -> Result<Option<VoteDirection>> {
        let raw = self.store.get(&subject.storage_key())?;
        Ok(raw.and_then(|v| v.parse().ok()))
    }

    /// Writes the vote flag unconditionally.
    ///
    /// Callers check [`has_voted`](Self::has_voted) first; [`try_record`](Self::try_record)
    /// does both.
    pub fn record_vote(&self, subject: &SubjectKey, direction: VoteDirection) -> Result<()> {
        self.store.set(&subject.storage_key(), direction.as_str())?;
        tracing::debug!(subject = %subject, %direction, "vote recorded");
        Ok(())
    }

    /// Like [`record_vote`](Self::record_vote) for an unparsed direction.
    /// Anything other than `up` / `down` is ignored.
    pub fn record_vote_str(&self, subject: &SubjectKey, raw: &str) -> Result<()> {
        match raw.parse::<VoteDirection>() {
            Ok(direction) => self.record_vote(subject, direction),
            Err(reason) => {
                tracing::debug!(subject = %subject, %reason, "ignoring vote");
                Ok(())
            }
        }
    }

    /// Records the vote unless the subject already has one.
    ///
    /// Returns whether the vote was written.
    pub fn try_record(&self, subject: &SubjectKey, direction: VoteDirection) -> Result<bool> {
        if self.has_voted(subject)? {
            return Ok(false);
        }
        self.record_vote(subject, direction)?;
        Ok(true)
    }

    pub fn has_action(&self, post_id: &PostId, action: Action) -> Result<bool> {
        let raw = self.store.get(&action.storage_key(post_id))?;
        Ok(raw.as_deref() == Some(MARKER_VALUE))
    }

    pub fn set_action(&self, post_id: &PostId, action: Action) -> Result<()> {
        self.store.set(&action.storage_key(post_id), MARKER_VALUE)
    }
}
