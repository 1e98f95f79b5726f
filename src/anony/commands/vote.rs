//! One-shot voting on posts and comments.
//!
//! The ledger flag is written before the score snapshot. A failure between the
//! two can lose the score change, but a subject can never be counted twice.

use crate::commands::{CmdMessage, CmdResult, VoteOutcome};
use crate::error::{BoardError, Result};
use crate::model::{CommentId, PostId, VoteDirection};
use crate::repository::PostRepository;
use crate::store::KeyValueStore;
use crate::votes::{SubjectKey, VoteLedger};

pub const ALREADY_VOTED_POST: &str = "You have already voted on this discussion.";
pub const ALREADY_VOTED_COMMENT: &str = "You have already voted on this comment.";

pub fn post<S: KeyValueStore + ?Sized>(
    store: &S,
    repo: &mut PostRepository,
    post_id: &PostId,
    direction: VoteDirection,
) -> Result<CmdResult> {
    if repo.post(post_id).is_none() {
        return Err(BoardError::PostNotFound(post_id.clone()));
    }

    let ledger = VoteLedger::new(store);
    let subject = SubjectKey::post(post_id);
    if !ledger.try_record(&subject, direction)? {
        return reject_repeat(&ledger, &subject, ALREADY_VOTED_POST);
    }

    ledger.set_action(post_id, direction.into())?;
    let score = repo.commit(store, |r| r.apply_vote(post_id, direction))?;
    tracing::info!(post = %post_id, %direction, score, "post vote accepted");

    Ok(CmdResult::default().with_vote(VoteOutcome::Accepted { direction, score }))
}

pub fn comment<S: KeyValueStore + ?Sized>(
    store: &S,
    repo: &mut PostRepository,
    post_id: &PostId,
    comment_id: &CommentId,
    direction: VoteDirection,
) -> Result<CmdResult> {
    if repo.comment(post_id, comment_id).is_none() {
        return Err(match repo.post(post_id) {
            None => BoardError::PostNotFound(post_id.clone()),
            Some(_) => BoardError::CommentNotFound(post_id.clone(), comment_id.clone()),
        });
    }

    let ledger = VoteLedger::new(store);
    let subject = SubjectKey::comment(post_id, comment_id);
    if !ledger.try_record(&subject, direction)? {
        return reject_repeat(&ledger, &subject, ALREADY_VOTED_COMMENT);
    }

    let score = repo.commit(store, |r| r.apply_comment_vote(post_id, comment_id, direction))?;
    tracing::info!(
        post = %post_id,
        comment = %comment_id,
        %direction,
        score,
        "comment vote accepted"
    );

    Ok(CmdResult::default().with_vote(VoteOutcome::Accepted { direction, score }))
}

fn reject_repeat<S: KeyValueStore + ?Sized>(
    ledger: &VoteLedger<'_, S>,
    subject: &SubjectKey,
    notice: &str,
) -> Result<CmdResult> {
    let existing = ledger.get_vote(subject)?;
    tracing::debug!(subject = %subject, ?existing, "repeat vote rejected");

    let mut result = CmdResult::default().with_vote(VoteOutcome::AlreadyVoted(existing));
    result.add_message(CmdMessage::warning(notice));
    Ok(result)
}
