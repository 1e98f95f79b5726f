use crate::commands::CmdResult;
use crate::error::Result;
use crate::repository::PostRepository;
use crate::search::{self, Query};
use crate::store::KeyValueStore;
use crate::view::{RenderContext, ReplyForms};
use crate::votes::VoteLedger;

/// Builds the render model: posts matching `query`, newest first.
pub fn run<S: KeyValueStore + ?Sized>(
    store: &S,
    repo: &PostRepository,
    query: &Query,
    highlight_class: &str,
    reply_forms: &ReplyForms,
) -> Result<CmdResult> {
    let ctx = RenderContext {
        ledger: VoteLedger::new(store),
        query,
        highlight_class,
        reply_forms,
    };

    let listed = search::filter_posts(repo.posts(), query)
        .into_iter()
        .map(|p| ctx.post(p))
        .collect::<Result<Vec<_>>>()?;
    tracing::trace!(query = query.as_str(), shown = listed.len(), "posts listed");

    Ok(CmdResult::default().with_listed_posts(listed))
}
