//! # Comment Tree Operations
//!
//! Pure functions over `&[Comment]` / `&mut Vec<Comment>`. A post's `comments`
//! field is the forest of top-level comments; each comment's `replies` is a
//! subforest, so every function here works at any level of a thread.
//!
//! ## Traversal Order
//!
//! All traversals are **pre-order**: array order at each level, a parent before
//! any of its children. This is the order comments are displayed and searched
//! in, so it is observable to users and must not change.
//!
//! ```text
//! A            walk order: A, A1, A1a, A2, B
//! ├── A1
//! │   └── A1a
//! └── A2
//! B
//! ```
//!
//! ## Depth
//!
//! Threads have no depth limit. Traversals here keep an explicit stack of
//! iterators instead of recursing. Code that must recurse per level (cloning,
//! building nested render items, serde) runs through [`grow_stack`], which
//! moves onto a fresh heap-allocated segment when the call stack runs low.

use crate::model::{Comment, CommentId};

const RED_ZONE: usize = 64 * 1024;
const STACK_SEGMENT: usize = 2 * 1024 * 1024;

/// Runs `f`, first switching to a new stack segment if less than the red zone
/// is left on the current one.
pub fn grow_stack<R, F: FnOnce() -> R>(f: F) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_SEGMENT, f)
}

/// Total number of comments in the forest, replies at every depth included.
pub fn count_all(comments: &[Comment]) -> usize {
    let mut count = 0;
    walk(comments, |_| count += 1);
    count
}

/// Visits every comment and reply in pre-order.
pub fn walk<'a, F>(comments: &'a [Comment], mut visitor: F)
where
    F: FnMut(&'a Comment),
{
    let mut stack = vec![comments.iter()];
    while let Some(level) = stack.last_mut() {
        match level.next() {
            Some(comment) => {
                visitor(comment);
                if !comment.replies.is_empty() {
                    stack.push(comment.replies.iter());
                }
            }
            None => {
                stack.pop();
            }
        }
    }
}

/// Returns true as soon as `predicate` holds for some comment, in pre-order.
pub fn any<'a, F>(comments: &'a [Comment], mut predicate: F) -> bool
where
    F: FnMut(&'a Comment) -> bool,
{
    let mut stack = vec![comments.iter()];
    while let Some(level) = stack.last_mut() {
        match level.next() {
            Some(comment) => {
                if predicate(comment) {
                    return true;
                }
                if !comment.replies.is_empty() {
                    stack.push(comment.replies.iter());
                }
            }
            None => {
                stack.pop();
            }
        }
    }
    false
}

/// Locates a comment by id at any depth.
pub fn find<'a>(comments: &'a [Comment], id: &CommentId) -> Option<&'a Comment> {
    let mut found = None;
    any(comments, |c| {
        if &c.id == id {
            found = Some(c);
            true
        } else {
            false
        }
    });
    found
}

/// Mutable lookup by id at any depth, in pre-order.
pub fn find_mut<'a>(comments: &'a mut [Comment], id: &CommentId) -> Option<&'a mut Comment> {
    let mut stack = vec![comments.iter_mut()];
    while let Some(level) = stack.last_mut() {
        match level.next() {
            Some(comment) => {
                if &comment.id == id {
                    return Some(comment);
                }
                stack.push(comment.replies.iter_mut());
            }
            None => {
                stack.pop();
            }
        }
    }
    None
}

/// Appends `reply` under the comment `parent_id`, wherever it sits in the tree.
///
/// Hands the reply back as the error value when no such parent exists.
pub fn append_reply(
    comments: &mut [Comment],
    parent_id: &CommentId,
    reply: Comment,
) -> Result<(), Comment> {
    match find_mut(comments, parent_id) {
        Some(parent) => {
            parent.replies.push(reply);
            Ok(())
        }
        None => Err(reply),
    }
}
