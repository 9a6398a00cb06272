//! Front matter: building post headers and re-deriving series index headers.
//!
//! The output is the `---` delimited YAML block the site generator reads.
//! Keys and their order are fixed: `title`, `draft`, `series`, `image`,
//! `seriesdesc`.

use crate::links::{image_url, parse_embed};
use crate::sanitize::sanitize;
use regex::Regex;
use std::sync::OnceLock;

const DELIMITER: &str = "---";

static FRONTMATTER_REGEX: OnceLock<Regex> = OnceLock::new();

fn frontmatter_regex() -> &'static Regex {
    FRONTMATTER_REGEX
        .get_or_init(|| Regex::new(r"(?msR)\A\s*---[ \t]*$(.*?)^---[ \t]*$").unwrap())
}

/// Header fields of an output document
///
/// Empty and absent fields are left out when rendering.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrontMatter {
    pub title: String,
    pub draft: Option<bool>,
    pub series: Option<Vec<String>>,
    pub image: Option<String>,
    pub series_description: Option<Vec<String>>,
}

impl FrontMatter {
    /// Header for a post, draft or series member
    pub fn post(title: &str, draft: bool, series: Option<&str>) -> Self {
        Self {
            title: title.to_string(),
            draft: Some(draft),
            series: series.map(|s| vec![s.to_string()]),
            ..Default::default()
        }
    }

    /// Turn the header of a series `_index.md` into the series description header.
    ///
    /// The title becomes the series name and `seriesdesc` lists it. An
    /// `image:` written as an embed (`![[cover.png]]`) becomes the site path
    /// of the sanitized image; any other value is kept as written.
    pub fn for_series(self, series: &str, image_prefix: &str) -> Self {
        let image = self.image.map(|raw| match parse_embed(&raw) {
            Some((base, ext)) => image_url(image_prefix, &sanitize(&format!("{base}{ext}"))),
            None => raw,
        });

        Self {
            title: series.to_string(),
            image,
            series_description: Some(vec![series.to_string()]),
            ..self
        }
    }

    /// Serialize as a `---` delimited block (no trailing newline)
    pub fn render(&self) -> String {
        let mut lines = Vec::new();

        if !self.title.is_empty() {
            lines.push(format!("title: {}", self.title));
        }
        if let Some(draft) = self.draft {
            lines.push(format!("draft: {draft}"));
        }
        if let Some(series) = self.series.as_deref().filter(|s| !s.is_empty()) {
            lines.push(format!("series: {}", flow_list(series)));
        }
        if let Some(image) = self.image.as_deref().filter(|s| !s.is_empty()) {
            lines.push(format!("image: {image}"));
        }
        if let Some(desc) = self.series_description.as_deref().filter(|s| !s.is_empty()) {
            lines.push(format!("seriesdesc: {}", flow_list(desc)));
        }

        format!("{DELIMITER}\n{}\n{DELIMITER}", lines.join("\n"))
    }
}

fn flow_list(items: &[String]) -> String {
    let quoted: Vec<String> = items
        .iter()
        .map(|item| format!("\"{}\"", item.replace('\\', "\\\\").replace('"', "\\\"")))
        .collect();
    format!("[{}]", quoted.join(", "))
}

/// Header block for a post.
///
/// ```
/// use wikipress_core::build_header;
///
/// let header = build_header("Hello", false, Some("Go Internals"));
/// assert_eq!(header, "---\ntitle: Hello\ndraft: false\nseries: [\"Go Internals\"]\n---");
/// ```
pub fn build_header(title: &str, draft: bool, series: Option<&str>) -> String {
    FrontMatter::post(title, draft, series).render()
}

/// Read `title:` and `image:` from a document.
///
/// Only the leading front matter block is scanned when there is one, the
/// whole text otherwise. Matching is by line prefix, case-sensitive, and the
/// first occurrence of each key wins.
pub fn extract_header(content: &str) -> FrontMatter {
    let scanned = frontmatter_regex()
        .captures(content)
        .and_then(|caps| caps.get(1))
        .map_or(content, |m| m.as_str());

    let mut title = None;
    let mut image = None;

    for line in scanned.lines().map(str::trim) {
        if let Some(value) = line.strip_prefix("title:") {
            title.get_or_insert_with(|| value.trim().to_string());
        } else if let Some(value) = line.strip_prefix("image:") {
            image.get_or_insert_with(|| value.trim().to_string());
        }
    }

    FrontMatter {
        title: title.unwrap_or_default(),
        image: image.filter(|v| !v.is_empty()),
        ..Default::default()
    }
}

/// Everything after the leading front matter block, trimmed.
pub fn extract_body(content: &str) -> String {
    match frontmatter_regex().find(content) {
        Some(m) => content[m.end()..].trim().to_string(),
        None => content.trim().to_string(),
    }
}
