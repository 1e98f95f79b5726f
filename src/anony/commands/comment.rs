use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::model::{CommentId, PostId};
use crate::repository::PostRepository;
use crate::store::KeyValueStore;
use crate::view::ReplyForms;

/// Adds a top-level comment to a post.
pub fn add<S: KeyValueStore + ?Sized>(
    store: &S,
    repo: &mut PostRepository,
    post_id: &PostId,
    text: &str,
) -> Result<CmdResult> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(CmdResult::default());
    }

    let comment = repo.commit(store, |r| r.add_comment(post_id, text.to_string()))?;
    tracing::info!(post = %post_id, comment = %comment.id, "comment added");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success("Comment added"));
    Ok(result.with_affected_comments(vec![comment]))
}

/// Adds a reply under any comment of a post and closes that comment's reply form.
pub fn reply<S: KeyValueStore + ?Sized>(
    store: &S,
    repo: &mut PostRepository,
    forms: &mut ReplyForms,
    post_id: &PostId,
    parent_id: &CommentId,
    text: &str,
) -> Result<CmdResult> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(CmdResult::default());
    }

    let reply = repo.commit(store, |r| r.add_reply(post_id, parent_id, text.to_string()))?;
    forms.close(post_id, parent_id);
    tracing::info!(post = %post_id, parent = %parent_id, comment = %reply.id, "reply added");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success("Reply added"));
    Ok(result.with_affected_comments(vec![reply]))
}
