use crate::model::{CommentId, PostId};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BoardError {
    #[error("Post not found: {0}")]
    PostNotFound(PostId),

    #[error("Comment {1} not found in post {0}")]
    CommentNotFound(PostId, CommentId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Search error: {0}")]
    Search(#[from] regex::Error),
}

pub type Result<T> = std::result::Result<T, BoardError>;
