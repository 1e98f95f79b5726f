//! # Anony Architecture
//!
//! Anony is a **UI-agnostic anonymous discussion board**. Visitors post
//! discussions, comment on them in threads of any depth, vote once per post or
//! comment, and search everything live. There are no accounts and no server:
//! all state lives in a single key-value store, which in the browser is the
//! origin's `localStorage`.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Front-end (outside this crate)                             │
//! │  - Paints DisplayPosts, forwards clicks and keystrokes      │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - BoardApi: owns the store, posts, query, reply forms      │
//! │  - Thin facade over commands                                │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - create, comment, vote, list                              │
//! │  - Returns CmdResult with messages and render models        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Domain (repository.rs, votes.rs, search.rs, view.rs)       │
//! │  - Post snapshot, vote ledger, matching, render model       │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - KeyValueStore trait                                      │
//! │  - FsBackend, MemBackend, LocalStorageBackend (web)         │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! Nothing in this crate writes to stdout or reads a clock on its own. Time
//! enters through `Instant` arguments (see [`debounce`]) and output leaves as
//! [`commands::CmdResult`]. Diagnostics go through `tracing`; installing a
//! subscriber is the host's job.
//!
//! ## Testing Strategy
//!
//! 1. **Domain and commands**: unit tests against [`store::memory::MemBackend`],
//!    seeded with the fixtures in [`store::memory::fixtures`].
//! 2. **API**: dispatch tests in `api.rs`.
//! 3. **Integration** (`tests/`): whole sessions over [`store::fs::FsBackend`]
//!    in temp dirs, plus property tests for search and tags.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade, entry point for all operations
//! - [`commands`]: Business logic for each user action
//! - [`repository`]: The post list and its persisted snapshot
//! - [`votes`]: One-vote-per-subject ledger
//! - [`search`]: Query matching and highlighting
//! - [`debounce`]: Live search timing
//! - [`view`]: Render model
//! - [`tree`]: Comment tree traversal
//! - [`model`]: Core data types (`Post`, `Comment`, ids)
//! - [`store`]: Storage abstraction and implementations
//! - [`config`]: Configuration management
//! - [`init`]: Data directory resolution
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod debounce;
pub mod error;
pub mod init;
pub mod model;
pub mod repository;
pub mod search;
pub mod store;
pub mod tree;
pub mod view;
pub mod votes;
