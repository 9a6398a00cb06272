//! The `{{< search ... >}}` shortcode.
//!
//! Each shortcode is replaced by an iframe pointing at a page produced by an
//! external search builder. The page name is a hash of the shortcode's
//! arguments, so the same arguments always map to the same file.

use crate::links::{find_spans, splice, LinkPattern, RewriteError};
use crate::models::SearchInvocation;

/// Directory, relative to the output root, holding generated search pages
pub const SEARCH_DIR: &str = "html";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Bare,
    DoubleQuoted,
    SingleQuoted,
}

/// Split a shortcode argument string into arguments.
///
/// Spaces separate arguments except inside `"..."` or `'...'`, where
/// everything is kept verbatim. An unterminated quote runs to the end of the
/// input. Tokens are trimmed, and a token still wrapped in a matching pair of
/// quotes loses one layer of them.
///
/// ```
/// use wikipress_core::tokenize;
///
/// assert_eq!(
///     tokenize(r#"search "a b" c 'd e'"#),
///     vec!["search", "a b", "c", "d e"]
/// );
/// ```
pub fn tokenize(command: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut word = String::new();
    let mut state = State::Bare;

    for c in command.chars() {
        match (state, c) {
            (State::Bare, '"') => state = State::DoubleQuoted,
            (State::Bare, '\'') => state = State::SingleQuoted,
            (State::DoubleQuoted, '"') | (State::SingleQuoted, '\'') => {
                flush(&mut word, &mut tokens);
                state = State::Bare;
            }
            (State::Bare, ' ') => flush(&mut word, &mut tokens),
            (_, c) => word.push(c),
        }
    }
    flush(&mut word, &mut tokens);

    tokens
        .iter()
        .map(|token| strip_quotes(token.trim()).to_string())
        .collect()
}

fn flush(word: &mut String, tokens: &mut Vec<String>) {
    if !word.trim().is_empty() {
        tokens.push(std::mem::take(word));
    } else {
        word.clear();
    }
}

fn strip_quotes(token: &str) -> &str {
    for quote in ['"', '\''] {
        if token.len() >= 2 && token.starts_with(quote) && token.ends_with(quote) {
            return &token[1..token.len() - 1];
        }
    }
    token
}

/// Output path of the search page for `arguments`, relative to the output root
pub fn search_output_file(arguments: &[String]) -> String {
    let hash = blake3::hash(arguments.join("-").as_bytes());
    format!("{SEARCH_DIR}/{}.html", hash.to_hex())
}

/// Replace every search shortcode in `text` with an iframe.
///
/// Returns the new text and one invocation per distinct output file.
pub fn rewrite_search_shortcodes(
    text: &str,
) -> Result<(String, Vec<SearchInvocation>), RewriteError> {
    let spans = find_spans(text, LinkPattern::SearchShortcode);
    let mut searches: Vec<SearchInvocation> = Vec::new();

    let rewritten = splice::<RewriteError, _>(text, &spans, |span| {
        let raw = LinkPattern::SearchShortcode
            .regex()
            .captures(span.text)
            .and_then(|caps| caps.get(1))
            .ok_or_else(|| RewriteError::MalformedShortcode(span.text.to_string()))?;

        let arguments = tokenize(raw.as_str().trim());
        if arguments.is_empty() {
            return Err(RewriteError::EmptyShortcode(span.text.to_string()));
        }

        let output_file = search_output_file(&arguments);
        let markup = format!("{{{{<iframe src=\"{output_file}\">}}}}");
        if !searches.iter().any(|s| s.output_file == output_file) {
            searches.push(SearchInvocation {
                arguments,
                output_file,
            });
        }
        Ok(markup)
    })?;

    Ok((rewritten, searches))
}
