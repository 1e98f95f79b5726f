use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::repository::PostRepository;
use crate::store::KeyValueStore;

/// Creates a post from the new-post form.
///
/// Title and description are required; tags are optional and comma-separated.
pub fn run<S: KeyValueStore + ?Sized>(
    store: &S,
    repo: &mut PostRepository,
    title: &str,
    description: &str,
    tags: &str,
) -> Result<CmdResult> {
    let title = title.trim();
    let description = description.trim();
    if title.is_empty() || description.is_empty() {
        tracing::debug!("post form submitted with a blank required field");
        return Ok(CmdResult::default());
    }

    let post = repo.commit(store, |r| {
        Ok(r.create_post(title.to_string(), description.to_string(), tags.trim()))
    })?;
    tracing::info!(post = %post.id, tags = post.tags.len(), "post created");

    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!("Post created: {}", post.title)));
    Ok(result.with_affected_posts(vec![post]))
}
