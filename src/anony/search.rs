//! # Search: Matching and Highlighting
//!
//! A search query filters the board down to the posts that mention it, and the
//! render model marks every occurrence of the query in the text it shows.
//!
//! ## Query Semantics
//!
//! - The raw input is trimmed. A blank query is [`Query::All`]: it filters
//!   nothing and highlights nothing.
//! - Matching is a **literal, case-insensitive substring** test. The query is
//!   passed through [`regex::escape`] before compilation, so characters such as
//!   `.`, `*` or `(` match themselves and never act as pattern syntax.
//!
//! ## What a Post Matches On
//!
//! A post matches when the query occurs in any of:
//!
//! 1. the title
//! 2. the description
//! 3. the tag line: tags prefixed with `#` and joined by spaces (`#rust #web`)
//! 4. the text of any comment or reply, at any depth
//!
//! One hit anywhere in the thread is enough; a reply fifty levels down makes
//! the whole post match.
//!
//! ## Highlighting
//!
//! [`Query::segments`] splits a text into [`MatchSegment::Plain`] and
//! [`MatchSegment::Match`] runs. Concatenating the segments gives back the
//! input exactly, and matched runs keep their original casing. [`highlight`]
//! renders segments as markup:
//!
//! ```text
//! highlight("Hello <World>", "o")
//!   => Hell<mark class="search-hit">o</mark> &lt;W<mark class="search-hit">o</mark>rld&gt;
//! ```
//!
//! Every character of user content is escaped, inside and outside of marks, so
//! neither the content nor the query can inject structure.

use crate::error::Result;
use crate::model::Post;
use crate::tree;
use regex::{Regex, RegexBuilder};

/// CSS class on the `<mark>` wrapping each hit.
pub const HIT_CLASS: &str = "search-hit";

/// Prefix for each tag in the tag line.
pub const TAG_MARKER: &str = "#";

/// Compiled matcher budget. Larger queries become [`Query::Unmatchable`].
const MATCHER_SIZE_LIMIT: usize = 64 * (1 << 20);

/// A segment of text in a search match, either plain text or a matched term.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchSegment {
    Plain(String),
    Match(String),
}

impl MatchSegment {
    pub fn text(&self) -> &str {
        match self {
            MatchSegment::Plain(t) | MatchSegment::Match(t) => t,
        }
    }
}

/// A compiled search query.
#[derive(Debug, Clone, Default)]
pub enum Query {
    #[default]
    All,
    Text {
        raw: String,
        matcher: Regex,
    },
    /// Too large to compile into a matcher; it matches nothing.
    Unmatchable {
        raw: String,
    },
}

impl Query {
    pub fn new(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Ok(Query::All);
        }
        let built = RegexBuilder::new(&regex::escape(trimmed))
            .case_insensitive(true)
            .size_limit(MATCHER_SIZE_LIMIT)
            .build();
        match built {
            Ok(matcher) => Ok(Query::Text {
                raw: trimmed.to_string(),
                matcher,
            }),
            Err(regex::Error::CompiledTooBig(limit)) => {
                tracing::debug!(len = trimmed.len(), limit, "search query too large to match");
                Ok(Query::Unmatchable {
                    raw: trimmed.to_string(),
                })
            }
            Err(err) => Err(err.into()),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Query::All)
    }

    /// The trimmed query text, empty for [`Query::All`].
    pub fn as_str(&self) -> &str {
        match self {
            Query::All => "",
            Query::Text { raw, .. } | Query::Unmatchable { raw } => raw,
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        match self {
            Query::All => true,
            Query::Text { matcher, .. } => matcher.is_match(text),
            Query::Unmatchable { .. } => false,
        }
    }

    /// Splits `text` into plain and matched runs.
    pub fn segments(&self, text: &str) -> Vec<MatchSegment> {
        let matcher = match self {
            Query::Text { matcher, .. } => matcher,
            Query::All | Query::Unmatchable { .. } => {
                if text.is_empty() {
                    return Vec::new();
                }
                return vec![MatchSegment::Plain(text.to_string())];
            }
        };

        let mut segments = Vec::new();
        let mut last_idx = 0;
        for hit in matcher.find_iter(text) {
            if hit.is_empty() {
                continue;
            }
            if hit.start() > last_idx {
                segments.push(MatchSegment::Plain(text[last_idx..hit.start()].to_string()));
            }
            segments.push(MatchSegment::Match(hit.as_str().to_string()));
            last_idx = hit.end();
        }
        if last_idx < text.len() {
            segments.push(MatchSegment::Plain(text[last_idx..].to_string()));
        }
        segments
    }
}

/// The searchable rendering of a post's tags: `#a #b #c`.
pub fn tag_line(tags: &[String]) -> String {
    tags.iter()
        .map(|t| format!("{}{}", TAG_MARKER, t))
        .collect::<Vec<_>>()
        .join(" ")
}

/// True when `query` occurs in the post's title, description, tag line or any
/// comment text at any depth.
pub fn matches_post(post: &Post, query: &Query) -> bool {
    if query.is_all() {
        return true;
    }
    query.is_match(&post.title)
        || query.is_match(&post.description)
        || query.is_match(&tag_line(&post.tags))
        || tree::any(&post.comments, |c| query.is_match(&c.text))
}

/// Posts matching `query`, newest first.
pub fn filter_posts<'a>(posts: &'a [Post], query: &Query) -> Vec<&'a Post> {
    posts
        .iter()
        .rev()
        .filter(|p| matches_post(p, query))
        .collect()
}

/// Escapes `text` so it renders literally inside markup.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#039;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Renders segments as markup, wrapping matches in `<mark class="{class}">`.
pub fn render_segments(segments: &[MatchSegment], class: &str) -> String {
    let mut out = String::new();
    for segment in segments {
        match segment {
            MatchSegment::Plain(t) => out.push_str(&escape_html(t)),
            MatchSegment::Match(t) => {
                out.push_str("<mark class=\"");
                out.push_str(&escape_html(class));
                out.push_str("\">");
                out.push_str(&escape_html(t));
                out.push_str("</mark>");
            }
        }
    }
    out
}

/// Escaped `text` with every hit of `query` marked.
pub fn highlight(text: &str, query: &Query) -> String {
    highlight_with_class(text, query, HIT_CLASS)
}

pub fn highlight_with_class(text: &str, query: &Query, class: &str) -> String {
    render_segments(&query.segments(text), class)
}
