//! Span scanning and splicing for Obsidian link syntax.
//!
//! Every rewrite in this crate is the same two steps: [`find_spans`] locates
//! the matches of a [`LinkPattern`], then [`splice`] rebuilds the text with
//! each span replaced and everything else copied through untouched.

pub mod images;
pub mod internal;

use regex::Regex;
use std::sync::OnceLock;
use thiserror::Error;

pub use images::{image_url, parse_embed, rewrite_images};
pub use internal::rewrite_internal_links;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RewriteError {
    #[error("Malformed image embed: {0}")]
    MalformedEmbed(String),

    #[error("Malformed internal link: {0}")]
    MalformedLink(String),

    #[error("Malformed search shortcode: {0}")]
    MalformedShortcode(String),

    #[error("Search shortcode has no arguments: {0}")]
    EmptyShortcode(String),
}

/// One match of a [`LinkPattern`] inside a specific text.
///
/// `start..end` is a byte range into the scanned text and `text` is the
/// matched slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentLink<'t> {
    pub start: usize,
    pub end: usize,
    pub text: &'t str,
}

/// The link syntaxes the scanner knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkPattern {
    /// `![[name.ext]]` with an image extension
    ImageEmbed,
    /// `[[name]]` not directly preceded by `!`
    InternalLink,
    /// `{{< search args >}}`; the name must be followed by whitespace or `>}}`
    SearchShortcode,
}

static IMAGE_EMBED_REGEX: OnceLock<Regex> = OnceLock::new();
static INTERNAL_LINK_REGEX: OnceLock<Regex> = OnceLock::new();
static SEARCH_SHORTCODE_REGEX: OnceLock<Regex> = OnceLock::new();

impl LinkPattern {
    /// Compiled regex for this pattern.
    ///
    /// Group 1 is always the name (or the argument string for shortcodes);
    /// image embeds carry the extension, dot included, in group 2.
    pub fn regex(self) -> &'static Regex {
        match self {
            LinkPattern::ImageEmbed => IMAGE_EMBED_REGEX.get_or_init(|| {
                Regex::new(r"!\[\[([^\[\]|\n]+?)(\.(?i:png|gif|jpe?g|svg|webp))\]\]").unwrap()
            }),
            LinkPattern::InternalLink => INTERNAL_LINK_REGEX
                .get_or_init(|| Regex::new(r"\[\[([^\[\]\n]+)\]\]").unwrap()),
            LinkPattern::SearchShortcode => SEARCH_SHORTCODE_REGEX
                .get_or_init(|| Regex::new(r"\{\{<\s*search((?:\s.*?)?)\s*>\}\}").unwrap()),
        }
    }

    /// Whether a match starting at `start` is ruled out by the byte before it.
    ///
    /// `![[x.png]]` contains `[[x.png]]`; the internal link pattern must never
    /// claim it.
    fn excluded_at(self, text: &str, start: usize) -> bool {
        match self {
            LinkPattern::InternalLink => start > 0 && text.as_bytes()[start - 1] == b'!',
            LinkPattern::ImageEmbed | LinkPattern::SearchShortcode => false,
        }
    }
}

/// Find all non-overlapping matches of `pattern`, left to right.
///
/// A single forward pass: each search resumes at the end of the previous
/// match, so offsets are always in `text`'s coordinates.
pub fn find_spans(text: &str, pattern: LinkPattern) -> Vec<ContentLink<'_>> {
    let re = pattern.regex();
    let mut spans = Vec::new();
    let mut cursor = 0;

    while cursor <= text.len() {
        let Some(m) = re.find_at(text, cursor) else {
            break;
        };

        if pattern.excluded_at(text, m.start()) {
            cursor = next_boundary(text, m.start());
            continue;
        }

        spans.push(ContentLink {
            start: m.start(),
            end: m.end(),
            text: m.as_str(),
        });

        cursor = if m.end() > m.start() {
            m.end()
        } else {
            next_boundary(text, m.end())
        };
    }

    spans
}

/// Rebuild `text`, replacing each span with the output of `transform`.
///
/// Spans must be ordered and non-overlapping, as [`find_spans`] returns them.
/// Text outside the spans is copied byte for byte.
pub fn splice<E, F>(text: &str, spans: &[ContentLink<'_>], mut transform: F) -> Result<String, E>
where
    F: FnMut(&ContentLink<'_>) -> Result<String, E>,
{
    let mut out = String::with_capacity(text.len());
    let mut cursor = 0;

    for span in spans {
        out.push_str(&text[cursor..span.start]);
        out.push_str(&transform(span)?);
        cursor = span.end;
    }
    out.push_str(&text[cursor..]);

    Ok(out)
}

// Byte index of the char after the one at `idx` (or one past the end).
fn next_boundary(text: &str, idx: usize) -> usize {
    idx + text[idx..].chars().next().map_or(1, char::len_utf8)
}
