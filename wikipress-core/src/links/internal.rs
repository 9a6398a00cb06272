//! Internal links: `[[My Note]]` to `[My Note]({{<ref "My-Note">}})`.

use super::{find_spans, splice, ContentLink, LinkPattern, RewriteError};
use crate::sanitize::sanitize;

fn rewrite_link(link: &ContentLink<'_>) -> Result<String, RewriteError> {
    let name = LinkPattern::InternalLink
        .regex()
        .captures(link.text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| RewriteError::MalformedLink(link.text.to_string()))?;

    // [[target|shown text]]
    let (target, title) = match name.split_once('|') {
        Some((target, shown)) => (target.trim(), shown.trim()),
        None => (name, name),
    };

    Ok(format!("[{}]({{{{<ref \"{}\">}}}})", title, sanitize(target)))
}

/// Rewrite every internal link in `text` into a `ref` shortcode.
pub fn rewrite_internal_links(text: &str) -> Result<String, RewriteError> {
    let spans = find_spans(text, LinkPattern::InternalLink);
    splice(text, &spans, rewrite_link)
}
