//! Per-document rewriting pipeline
//!
//! Flow: Source → Image embeds → Internal links → [series] Search shortcodes
//!       → Front matter
//!
//! Nothing here touches the filesystem. Copies and search pages a document
//! needs come back as data in [`Rewritten`].

use crate::config::Config;
use crate::frontmatter::{build_header, extract_body, extract_header};
use crate::links::{rewrite_images, rewrite_internal_links, RewriteError};
use crate::models::{Document, Rewritten};
use crate::shortcodes::rewrite_search_shortcodes;

/// Rewrites vault documents into site content
#[derive(Debug, Clone)]
pub struct ContentPipeline {
    image_prefix: String,
}

impl ContentPipeline {
    pub fn new(image_prefix: &str) -> Self {
        Self {
            image_prefix: image_prefix.to_string(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.image_prefix)
    }

    /// Rewrite a post, draft or series member
    pub fn rewrite(&self, doc: &Document<'_>) -> Result<Rewritten, RewriteError> {
        let (body, assets) = rewrite_images(doc.content, &self.image_prefix)?;
        let body = rewrite_internal_links(&body)?;

        let (body, searches) = if doc.kind.series().is_some() {
            rewrite_search_shortcodes(&body)?
        } else {
            (body, Vec::new())
        };

        let header = build_header(doc.title, doc.kind.is_draft(), doc.kind.series());

        Ok(Rewritten {
            text: format!("{header}\n\n{body}"),
            assets,
            searches,
        })
    }

    /// Rewrite a series `_index.md` into the series description page
    pub fn rewrite_series_index(
        &self,
        content: &str,
        series: &str,
    ) -> Result<Rewritten, RewriteError> {
        let header = extract_header(content).for_series(series, &self.image_prefix);

        // Collect from the whole file so the header image is copied too
        let (_, assets) = rewrite_images(content, &self.image_prefix)?;

        let (body, _) = rewrite_images(&extract_body(content), &self.image_prefix)?;
        let body = rewrite_internal_links(&body)?;

        Ok(Rewritten {
            text: format!("{}\n{}", header.render(), body),
            assets,
            searches: Vec::new(),
        })
    }
}

impl Default for ContentPipeline {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
