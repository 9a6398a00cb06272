//! File name sanitization for titles and link targets.

/// Convert a title or link target into a path segment
///
/// Rules:
/// - Drop everything except ASCII letters, digits, `-`, `_`, `.` and spaces
/// - Trim surrounding whitespace
/// - Replace each remaining space with a hyphen
///
/// Unlike a slug, case is kept and runs of spaces are not collapsed: the
/// output has to match the names the site generator already knows.
///
/// # Examples
///
/// ```
/// use wikipress_core::sanitize;
///
/// assert_eq!(sanitize("My Post!?.png"), "My-Post.png");
/// assert_eq!(sanitize("  Go Internals  "), "Go-Internals");
/// ```
pub fn sanitize(input: &str) -> String {
    let kept: String = input
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | ' '))
        .collect();

    kept.trim().replace(' ', "-")
}
