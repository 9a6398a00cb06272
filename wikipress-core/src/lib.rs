//! # wikipress-core
//!
//! Core library for turning an Obsidian-style vault into a content tree for a
//! static site generator.
//!
//! The rewriting engine (`links`, `frontmatter`, `shortcodes`, `pipeline`) is
//! pure: it takes document text and returns rewritten text plus descriptions
//! of the asset copies and search pages the document needs. `builder` walks
//! the vault and performs that I/O.

pub mod builder;
pub mod config;
pub mod frontmatter;
pub mod links;
pub mod models;
pub mod pipeline;
pub mod sanitize;
pub mod shortcodes;

pub use builder::{BuildError, SiteBuilder};
pub use config::Config;
pub use frontmatter::{build_header, extract_body, extract_header, FrontMatter};
pub use links::{find_spans, splice, ContentLink, LinkPattern, RewriteError};
pub use models::{
    AssetCopyRequest, BuildReport, Document, DocumentKind, Rewritten, SearchInvocation,
    SkippedFile,
};
pub use pipeline::ContentPipeline;
pub use sanitize::sanitize;
pub use shortcodes::tokenize;
