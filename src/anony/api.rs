//! # API Facade
//!
//! [`BoardApi`] is the board's single application-state object and the entry
//! point for every front-end. It owns:
//!
//! - the [`KeyValueStore`],
//! - the [`PostRepository`] (the in-memory source of truth),
//! - the current search [`Query`] and its [`SearchDebounce`],
//! - the set of open reply forms.
//!
//! ## Role and Responsibilities
//!
//! The facade dispatches each user action to its command in `commands/*.rs`
//! and returns the structured [`CmdResult`]. It holds no business logic of its
//! own. After any call a front-end re-renders from [`BoardApi::list`].
//!
//! ## Exclusive Handlers
//!
//! Every mutating method takes `&mut self`. A vote's "has this subject been
//! voted on? then record it" sequence therefore runs with exclusive access to
//! the board, and two handlers can never interleave on the same subject.
//!
//! ## Live Search
//!
//! ```text
//! keystroke ─► search_input(raw, now) ─► debounce restarted
//! timer tick ─► poll_search(now) ─► true once the input has been quiet
//!                                   for the configured delay; the new query
//!                                   is now current and the caller re-renders
//! ```
//!
//! [`BoardApi::set_search`] applies a query immediately, skipping the debounce.

use crate::commands::{self, CmdResult};
use crate::config::BoardConfig;
use crate::debounce::SearchDebounce;
use crate::error::Result;
use crate::model::{CommentId, Post, PostId, VoteDirection};
use crate::repository::PostRepository;
use crate::search::Query;
use crate::store::KeyValueStore;
use crate::view::ReplyForms;
use std::time::Instant;

pub use crate::commands::{CmdMessage, MessageLevel, VoteOutcome};

/// The main API facade for board operations.
///
/// Generic over `KeyValueStore` to allow different storage backends.
pub struct BoardApi<S: KeyValueStore> {
    store: S,
    config: BoardConfig,
    repo: PostRepository,
    search: Query,
    debounce: SearchDebounce,
    reply_forms: ReplyForms,
}

impl<S: KeyValueStore> BoardApi<S> {
    /// Opens the board stored in `store`. A missing or unreadable snapshot
    /// opens as an empty board.
    pub fn new(store: S, config: BoardConfig) -> Self {
        let repo = PostRepository::load(&store, config.storage_key.clone());
        let debounce = SearchDebounce::new(config.search_debounce());
        Self {
            store,
            config,
            repo,
            search: Query::All,
            debounce,
            reply_forms: ReplyForms::new(),
        }
    }

    pub fn create_post(
        &mut self,
        title: &str,
        description: &str,
        tags: &str,
    ) -> Result<CmdResult> {
        commands::create::run(&self.store, &mut self.repo, title, description, tags)
    }

    pub fn add_comment(&mut self, post_id: &PostId, text: &str) -> Result<CmdResult> {
        commands::comment::add(&self.store, &mut self.repo, post_id, text)
    }

    pub fn add_reply(
        &mut self,
        post_id: &PostId,
        parent_id: &CommentId,
        text: &str,
    ) -> Result<CmdResult> {
        commands::comment::reply(
            &self.store,
            &mut self.repo,
            &mut self.reply_forms,
            post_id,
            parent_id,
            text,
        )
    }

    pub fn vote_post(
        &mut self,
        post_id: &PostId,
        direction: VoteDirection,
    ) -> Result<CmdResult> {
        commands::vote::post(&self.store, &mut self.repo, post_id, direction)
    }

    pub fn vote_comment(
        &mut self,
        post_id: &PostId,
        comment_id: &CommentId,
        direction: VoteDirection,
    ) -> Result<CmdResult> {
        commands::vote::comment(&self.store, &mut self.repo, post_id, comment_id, direction)
    }

    /// Opens the reply form of a comment. Returns false if it was already open.
    pub fn open_reply_form(&mut self, post_id: &PostId, comment_id: &CommentId) -> bool {
        self.reply_forms.open(post_id, comment_id)
    }

    pub fn reply_forms(&self) -> &ReplyForms {
        &self.reply_forms
    }

    /// Records a keystroke in the search box, restarting the debounce.
    pub fn search_input(&mut self, raw: &str, now: Instant) {
        self.debounce.schedule(raw, now);
    }

    /// Applies the debounced search input once it is due.
    ///
    /// Returns true when the current query changed hands and the caller should
    /// re-render.
    pub fn poll_search(&mut self, now: Instant) -> Result<bool> {
        match self.debounce.poll(now) {
            Some(raw) => {
                self.set_search(&raw)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Applies a search immediately, dropping any pending debounced input.
    pub fn set_search(&mut self, raw: &str) -> Result<()> {
        self.debounce.cancel();
        self.search = Query::new(raw)?;
        tracing::debug!(query = self.search.as_str(), "search updated");
        Ok(())
    }

    pub fn search(&self) -> &Query {
        &self.search
    }

    pub fn search_pending(&self) -> bool {
        self.debounce.is_pending()
    }

    /// The render model for the current search.
    pub fn list(&self) -> Result<CmdResult> {
        commands::list::run(
            &self.store,
            &self.repo,
            &self.search,
            &self.config.highlight_class,
            &self.reply_forms,
        )
    }

    /// Posts in creation order.
    pub fn posts(&self) -> &[Post] {
        self.repo.posts()
    }

    /// Re-reads the snapshot from the store, discarding in-memory state.
    pub fn reload(&mut self) {
        self.repo = PostRepository::load(&self.store, self.config.storage_key.clone());
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }
}
