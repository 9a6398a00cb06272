//! Values passed between the rewriting engine and the site builder.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// How a vault file is published
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentKind {
    Post,
    Draft,
    /// A member of the named series
    Series(String),
}

impl DocumentKind {
    pub fn is_draft(&self) -> bool {
        matches!(self, DocumentKind::Draft)
    }

    pub fn series(&self) -> Option<&str> {
        match self {
            DocumentKind::Series(name) => Some(name),
            DocumentKind::Post | DocumentKind::Draft => None,
        }
    }
}

/// One source document handed to the pipeline
#[derive(Debug, Clone, Copy)]
pub struct Document<'a> {
    /// Logical title, the file name without its extension
    pub title: &'a str,
    pub content: &'a str,
    pub kind: &'a DocumentKind,
}

/// An image that has to be copied from the vault into the site.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetCopyRequest {
    /// File name as written in the embed, relative to the vault root
    pub source_name: String,
    /// Sanitized file name under the image directory
    pub destination_name: String,
}

/// One run of the external search page builder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchInvocation {
    /// Tokenized shortcode arguments
    pub arguments: Vec<String>,
    /// Output path relative to the output root, e.g. `html/<hash>.html`
    pub output_file: String,
}

/// Result of rewriting one document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rewritten {
    pub text: String,
    pub assets: Vec<AssetCopyRequest>,
    pub searches: Vec<SearchInvocation>,
}

/// A file the builder gave up on
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SkippedFile {
    pub path: PathBuf,
    pub reason: String,
}

/// Summary of a build
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BuildReport {
    pub posts: usize,
    pub drafts: usize,
    pub series_members: usize,
    pub series_indexes: usize,
    pub images: usize,
    pub search_pages: usize,
    pub skipped: Vec<SkippedFile>,
}

impl BuildReport {
    /// Number of content files written
    pub fn documents(&self) -> usize {
        self.posts + self.drafts + self.series_members + self.series_indexes
    }
}
