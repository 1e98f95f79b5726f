//! # Render Model
//!
//! Front-ends do not walk [`Post`]s themselves. They paint [`DisplayPost`]s,
//! which are derived from three inputs and nothing else:
//!
//! 1. the post list,
//! 2. the current search [`Query`],
//! 3. the vote flags in the store and the set of open reply forms.
//!
//! Rebuilding the model after every event is how the board re-renders: no
//! display state is patched in place.
//!
//! ## Markup Fields
//!
//! Fields ending in `_html` are safe to insert as markup. All user text has been
//! escaped and search hits wrapped in `<mark>` (see [`crate::search`]).
//!
//! ## Vote Controls
//!
//! Each post and comment carries the vote already cast on it, if any, and
//! whether it is locked. A subject is locked whenever the store holds any
//! flag for it, even one that is not a valid direction. Both controls are
//! disabled exactly when the subject is locked, and the one matching `vote`
//! is shown as selected.

use crate::error::Result;
use crate::model::{Comment, CommentId, Post, PostId, VoteDirection};
use crate::search::{self, Query};
use crate::store::KeyValueStore;
use crate::tree;
use crate::votes::{SubjectKey, VoteLedger};
use std::collections::HashSet;

#[derive(Debug, PartialEq, Eq)]
pub struct DisplayComment {
    pub id: CommentId,
    pub text_html: String,
    pub score: i64,
    pub vote: Option<VoteDirection>,
    pub locked: bool,
    pub reply_form_open: bool,
    pub replies: Vec<DisplayComment>,
}

impl DisplayComment {
    pub fn controls_disabled(&self) -> bool {
        self.locked
    }
}

impl Drop for DisplayComment {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.replies);
        while let Some(mut item) = pending.pop() {
            pending.append(&mut item.replies);
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct DisplayPost {
    pub id: PostId,
    pub title_html: String,
    pub description_html: String,
    pub tags_html: String,
    pub score: i64,
    pub comment_count: usize,
    pub vote: Option<VoteDirection>,
    pub locked: bool,
    pub comments: Vec<DisplayComment>,
}

impl DisplayPost {
    pub fn controls_disabled(&self) -> bool {
        self.locked
    }

    /// Footer label, e.g. `3 comments`.
    pub fn comment_count_label(&self) -> String {
        format!("{} comments", self.comment_count)
    }
}

/// Reply forms currently open, at most one per comment.
///
/// Forms are opened lazily on demand and closed when their reply is submitted.
#[derive(Debug, Clone, Default)]
pub struct ReplyForms {
    open: HashSet<(PostId, CommentId)>,
}

impl ReplyForms {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if a form was already open for this comment.
    pub fn open(&mut self, post_id: &PostId, comment_id: &CommentId) -> bool {
        self.open.insert((post_id.clone(), comment_id.clone()))
    }

    pub fn close(&mut self, post_id: &PostId, comment_id: &CommentId) -> bool {
        self.open.remove(&(post_id.clone(), comment_id.clone()))
    }

    pub fn is_open(&self, post_id: &PostId, comment_id: &CommentId) -> bool {
        self.open.contains(&(post_id.clone(), comment_id.clone()))
    }

    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }
}

/// Shared inputs for building display items.
pub struct RenderContext<'a, S: KeyValueStore + ?Sized> {
    pub ledger: VoteLedger<'a, S>,
    pub query: &'a Query,
    pub highlight_class: &'a str,
    pub reply_forms: &'a ReplyForms,
}

impl<'a, S: KeyValueStore + ?Sized> RenderContext<'a, S> {
    fn highlight(&self, text: &str) -> String {
        search::highlight_with_class(text, self.query, self.highlight_class)
    }

    pub fn post(&self, post: &Post) -> Result<DisplayPost> {
        let subject = SubjectKey::post(&post.id);
        Ok(DisplayPost {
            id: post.id.clone(),
            title_html: self.highlight(&post.title),
            description_html: self.highlight(&post.description),
            tags_html: self.highlight(&search::tag_line(&post.tags)),
            score: post.score,
            comment_count: tree::count_all(&post.comments),
            vote: self.ledger.get_vote(&subject)?,
            locked: self.ledger.has_voted(&subject)?,
            comments: self.comments(&post.id, &post.comments)?,
        })
    }

    fn comments(&self, post_id: &PostId, comments: &[Comment]) -> Result<Vec<DisplayComment>> {
        tree::grow_stack(|| {
            comments
                .iter()
                .map(|c| {
                    let subject = SubjectKey::comment(post_id, &c.id);
                    Ok(DisplayComment {
                        id: c.id.clone(),
                        text_html: self.highlight(&c.text),
                        score: c.score,
                        vote: self.ledger.get_vote(&subject)?,
                        locked: self.ledger.has_voted(&subject)?,
                        reply_form_open: self.reply_forms.is_open(post_id, &c.id),
                        replies: self.comments(post_id, &c.replies)?,
                    })
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::fixtures::{comment, post, reply_chain};
    use crate::store::memory::MemBackend;

    fn render(store: &MemBackend, p: &Post, query: &Query, forms: &ReplyForms) -> DisplayPost {
        let ctx = RenderContext {
            ledger: VoteLedger::new(store),
            query,
            highlight_class: search::HIT_CLASS,
            reply_forms: forms,
        };
        ctx.post(p).unwrap()
    }

    fn thread() -> Post {
        let mut p = post(
            "p",
            "Tea & <coffee>",
            vec![
                comment("a", "green tea", vec![comment("b", "black tea", vec![])]),
                comment("c", "water", vec![]),
            ],
        );
        p.tags = vec!["drinks".into()];
        p
    }

    #[test]
    fn test_display_post_fields() {
        let store = MemBackend::new();
        let view = render(&store, &thread(), &Query::All, &ReplyForms::new());

        assert_eq!(view.title_html, "Tea &amp; &lt;coffee&gt;");
        assert_eq!(view.tags_html, "#drinks");
        assert_eq!(view.comment_count, 3);
        assert_eq!(view.comment_count_label(), "3 comments");
        assert_eq!(view.comments.len(), 2);
        assert_eq!(view.comments[0].replies[0].text_html, "black tea");
        assert!(!view.controls_disabled());
    }

    #[test]
    fn test_display_highlights_whole_tree() {
        let store = MemBackend::new();
        let query = Query::new("tea").unwrap();
        let view = render(&store, &thread(), &query, &ReplyForms::new());

        assert!(view.title_html.contains("<mark class=\"search-hit\">Tea</mark>"));
        assert_eq!(
            view.comments[0].replies[0].text_html,
            "black <mark class=\"search-hit\">tea</mark>"
        );
        assert_eq!(view.comments[1].text_html, "water");
    }

    #[test]
    fn test_display_reflects_votes_and_forms() {
        let store = MemBackend::new();
        let ledger = VoteLedger::new(&store);
        let p = thread();
        ledger
            .record_vote(&SubjectKey::post(&p.id), VoteDirection::Up)
            .unwrap();
        ledger
            .record_vote(
                &SubjectKey::comment(&p.id, &CommentId::from("b")),
                VoteDirection::Down,
            )
            .unwrap();

        let mut forms = ReplyForms::new();
        assert!(forms.open(&p.id, &CommentId::from("c")));

        let view = render(&store, &p, &Query::All, &forms);
        assert_eq!(view.vote, Some(VoteDirection::Up));
        assert!(view.controls_disabled());
        assert_eq!(view.comments[0].vote, None);
        assert_eq!(view.comments[0].replies[0].vote, Some(VoteDirection::Down));
        assert!(view.comments[0].replies[0].controls_disabled());
        assert!(view.comments[1].reply_form_open);
        assert!(!view.comments[0].reply_form_open);
    }

    #[test]
    fn test_unrecognized_flag_disables_controls() {
        let store = MemBackend::new();
        let p = thread();
        store.set("vote_p", "maybe").unwrap();
        store.set("vote_p_a", "1").unwrap();

        let view = render(&store, &p, &Query::All, &ReplyForms::new());
        assert_eq!(view.vote, None);
        assert!(view.locked);
        assert!(view.controls_disabled());
        assert_eq!(view.comments[0].vote, None);
        assert!(view.comments[0].controls_disabled());
        assert!(!view.comments[1].controls_disabled());
    }

    #[test]
    fn test_deep_thread_renders() {
        let store = MemBackend::new();
        let p = post("deep", "Deep", reply_chain(10_000, "needle at the bottom"));
        let query = Query::new("needle").unwrap();
        let view = render(&store, &p, &query, &ReplyForms::new());

        assert_eq!(view.comment_count, 10_001);
        let mut item = &view.comments[0];
        while let Some(next) = item.replies.first() {
            item = next;
        }
        assert!(item.text_html.starts_with("<mark class=\"search-hit\">needle</mark>"));
    }

    #[test]
    fn test_reply_forms_one_per_comment() {
        let mut forms = ReplyForms::new();
        let p = PostId::from("p");
        let c = CommentId::from("c");
        assert!(forms.open(&p, &c));
        assert!(!forms.open(&p, &c));
        assert_eq!(forms.len(), 1);
        assert!(forms.close(&p, &c));
        assert!(forms.is_empty());
    }
}
