//! # Command Layer
//!
//! One module per user action. Each handler:
//!
//! 1. normalizes its input (trims form fields),
//! 2. validates, returning an empty [`CmdResult`] when a required field is blank,
//! 3. consults the vote ledger where the action is a vote,
//! 4. mutates the repository and persists the snapshot through
//!    [`PostRepository::commit`](crate::repository::PostRepository::commit),
//! 5. reports what happened as data: affected items, a [`VoteOutcome`],
//!    user-facing [`CmdMessage`]s.
//!
//! Handlers never print, block or show dialogs. A front-end turns a warning
//! message into whatever notice it uses.

use crate::model::{Comment, Post, VoteDirection};
use crate::view::DisplayPost;

pub mod comment;
pub mod create;
pub mod list;
pub mod vote;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CmdMessage {
    pub level: MessageLevel,
    pub content: String,
}

impl CmdMessage {
    pub fn info(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Info,
            content: content.into(),
        }
    }

    pub fn success(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Success,
            content: content.into(),
        }
    }

    pub fn warning(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Warning,
            content: content.into(),
        }
    }

    pub fn error(content: impl Into<String>) -> Self {
        Self {
            level: MessageLevel::Error,
            content: content.into(),
        }
    }
}

/// What a vote attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteOutcome {
    Accepted { direction: VoteDirection, score: i64 },
    /// The subject was already voted on. Carries the recorded direction when it
    /// is readable. Front-ends should (re)disable both vote controls.
    AlreadyVoted(Option<VoteDirection>),
}

#[derive(Debug, Default)]
pub struct CmdResult {
    pub affected_posts: Vec<Post>,
    pub affected_comments: Vec<Comment>,
    pub listed_posts: Vec<DisplayPost>,
    pub vote: Option<VoteOutcome>,
    pub messages: Vec<CmdMessage>,
}

impl CmdResult {
    pub fn add_message(&mut self, message: CmdMessage) {
        self.messages.push(message);
    }

    pub fn with_affected_posts(mut self, posts: Vec<Post>) -> Self {
        self.affected_posts = posts;
        self
    }

    pub fn with_affected_comments(mut self, comments: Vec<Comment>) -> Self {
        self.affected_comments = comments;
        self
    }

    pub fn with_listed_posts(mut self, posts: Vec<DisplayPost>) -> Self {
        self.listed_posts = posts;
        self
    }

    pub fn with_vote(mut self, outcome: VoteOutcome) -> Self {
        self.vote = Some(outcome);
        self
    }

    /// True when the command had no effect and nothing to report.
    pub fn is_empty(&self) -> bool {
        self.affected_posts.is_empty()
            && self.affected_comments.is_empty()
            && self.listed_posts.is_empty()
            && self.vote.is_none()
            && self.messages.is_empty()
    }
}
