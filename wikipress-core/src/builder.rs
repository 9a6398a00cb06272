//! Vault conversion - walks the vault, rewrites documents and writes output.

use crate::{
    config::Config,
    links::RewriteError,
    models::*,
    pipeline::ContentPipeline,
    sanitize::sanitize,
};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};
use std::process::Command;
use tempfile::NamedTempFile;
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing directory: {0:?}")]
    MissingDirectory(PathBuf),

    #[error("Failed to rewrite {path:?}: {source}")]
    Rewrite {
        path: PathBuf,
        #[source]
        source: RewriteError,
    },

    #[error("{first:?} and {second:?} both map to {destination:?}")]
    DuplicateDestination {
        destination: PathBuf,
        first: PathBuf,
        second: PathBuf,
    },

    #[error("Search builder `{program}` failed for {output:?}: {reason}")]
    SearchBuilder {
        program: String,
        output: PathBuf,
        reason: String,
    },
}

/// Output layout under the output directory
const CONTENT_DIR: &str = "content";
const POSTS_DIR: &str = "posts";
const SERIES_DIR: &str = "series";
const SERIES_DESCRIPTIONS_DIR: &str = "series-descriptions";
const IMAGE_DIR: &str = "img";

/// Converts a vault into a content tree
pub struct SiteBuilder {
    config: Config,
    pipeline: ContentPipeline,
}

/// Bookkeeping for one build
#[derive(Default)]
struct BuildState {
    report: BuildReport,
    // destination -> source, for collision detection
    documents: HashMap<PathBuf, PathBuf>,
    images: HashMap<PathBuf, String>,
    searches: HashSet<PathBuf>,
}

impl BuildState {
    fn skip(&mut self, path: &Path, reason: impl std::fmt::Display) {
        tracing::error!("Skipping {:?}: {}", path, reason);
        self.report.skipped.push(SkippedFile {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        });
    }

    fn claim_document(&mut self, destination: &Path, source: &Path) -> Result<(), BuildError> {
        if let Some(first) = self.documents.get(destination) {
            return Err(BuildError::DuplicateDestination {
                destination: destination.to_path_buf(),
                first: first.clone(),
                second: source.to_path_buf(),
            });
        }
        self.documents
            .insert(destination.to_path_buf(), source.to_path_buf());
        Ok(())
    }
}

impl SiteBuilder {
    pub fn new(config: Config) -> Self {
        let pipeline = ContentPipeline::from_config(&config);
        Self { config, pipeline }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Convert the whole vault
    ///
    /// Drafts go first, then the entries of the posts directory in file name
    /// order. Unreadable or unwritable files are skipped and listed in the
    /// report; anything else aborts the build.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let posts_dir = self.config.posts_dir();
        let drafts_dir = self.config.drafts_dir();
        for dir in [&posts_dir, &drafts_dir] {
            if !dir.is_dir() {
                return Err(BuildError::MissingDirectory(dir.clone()));
            }
        }

        let output_dir = self.config.output_dir();
        fs::create_dir_all(&output_dir)?;

        tracing::info!("Converting {:?} into {:?}", posts_dir, output_dir);

        let mut state = BuildState::default();

        for entry in list_dir(&drafts_dir, &mut state) {
            if is_markdown(&entry) {
                self.convert_document(entry.path(), &DocumentKind::Draft, &mut state)?;
            }
        }

        for entry in list_dir(&posts_dir, &mut state) {
            if entry.file_type().is_dir() {
                if entry.file_name() == self.config.layout.drafts_dir.as_str() {
                    continue;
                }
                let series = entry.file_name().to_string_lossy().into_owned();
                self.convert_series(entry.path(), &series, &mut state)?;
            } else if is_markdown(&entry) {
                self.convert_document(entry.path(), &DocumentKind::Post, &mut state)?;
            }
        }

        let report = state.report;
        tracing::info!(
            "Wrote {} documents, {} images, {} search pages",
            report.documents(),
            report.images,
            report.search_pages
        );
        if !report.skipped.is_empty() {
            tracing::warn!("Skipped {} files", report.skipped.len());
        }

        Ok(report)
    }

    fn convert_series(
        &self,
        dir: &Path,
        series: &str,
        state: &mut BuildState,
    ) -> Result<(), BuildError> {
        tracing::debug!("Series: {}", series);
        let kind = DocumentKind::Series(series.to_string());

        for entry in list_dir(dir, state) {
            if entry.file_name() == self.config.layout.series_index.as_str() {
                self.convert_series_index(entry.path(), series, state)?;
            } else if is_markdown(&entry) {
                self.convert_document(entry.path(), &kind, state)?;
            }
        }
        Ok(())
    }

    fn convert_document(
        &self,
        path: &Path,
        kind: &DocumentKind,
        state: &mut BuildState,
    ) -> Result<(), BuildError> {
        tracing::debug!("Converting {:?}", path);

        let title = title_from_path(path);
        let file_name = sanitize(&title);
        if file_name.is_empty() {
            state.skip(path, "title has no usable characters");
            return Ok(());
        }

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                state.skip(path, err);
                return Ok(());
            }
        };

        let doc = Document {
            title: &title,
            content: &content,
            kind,
        };
        let rewritten = self
            .pipeline
            .rewrite(&doc)
            .map_err(|source| BuildError::Rewrite {
                path: path.to_path_buf(),
                source,
            })?;

        let content_dir = self.config.output_dir().join(CONTENT_DIR);
        let dir = match kind {
            DocumentKind::Series(series) => content_dir.join(SERIES_DIR).join(series),
            DocumentKind::Post | DocumentKind::Draft => content_dir.join(POSTS_DIR),
        };
        let destination = dir.join(format!("{file_name}.md"));
        state.claim_document(&destination, path)?;

        self.copy_assets(&rewritten.assets, state)?;
        self.run_searches(&rewritten.searches, state)?;

        if let Err(err) = write_atomic(&destination, &rewritten.text) {
            state.skip(path, err);
            return Ok(());
        }

        match kind {
            DocumentKind::Post => state.report.posts += 1,
            DocumentKind::Draft => state.report.drafts += 1,
            DocumentKind::Series(_) => state.report.series_members += 1,
        }
        Ok(())
    }

    fn convert_series_index(
        &self,
        path: &Path,
        series: &str,
        state: &mut BuildState,
    ) -> Result<(), BuildError> {
        tracing::debug!("Series index {:?}", path);

        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) => {
                state.skip(path, err);
                return Ok(());
            }
        };

        let rewritten = self
            .pipeline
            .rewrite_series_index(&content, series)
            .map_err(|source| BuildError::Rewrite {
                path: path.to_path_buf(),
                source,
            })?;

        let destination = self
            .config
            .output_dir()
            .join(CONTENT_DIR)
            .join(SERIES_DESCRIPTIONS_DIR)
            .join(format!("{series}.md"));
        state.claim_document(&destination, path)?;

        self.copy_assets(&rewritten.assets, state)?;

        if let Err(err) = write_atomic(&destination, &rewritten.text) {
            state.skip(path, err);
            return Ok(());
        }
        state.report.series_indexes += 1;
        Ok(())
    }

    /// Copy referenced images into the image directory.
    ///
    /// An image already copied in this build is not copied again; a different
    /// source landing on the same name is a collision.
    fn copy_assets(
        &self,
        assets: &[AssetCopyRequest],
        state: &mut BuildState,
    ) -> Result<(), BuildError> {
        let vault_dir = self.config.vault_dir();
        let image_dir = self.config.output_dir().join(IMAGE_DIR);

        for asset in assets {
            let destination = image_dir.join(&asset.destination_name);
            let source = vault_dir.join(&asset.source_name);

            if !is_inside_vault(Path::new(&asset.source_name)) {
                state.skip(&source, "image path leaves the vault");
                continue;
            }

            match state.images.get(&destination) {
                Some(first) if first == &asset.source_name => continue,
                Some(first) => {
                    return Err(BuildError::DuplicateDestination {
                        destination,
                        first: vault_dir.join(first),
                        second: source,
                    });
                }
                None => {}
            }
            state
                .images
                .insert(destination.clone(), asset.source_name.clone());

            let copied = fs::create_dir_all(&image_dir).and_then(|_| fs::copy(&source, &destination));
            match copied {
                Ok(_) => {
                    tracing::debug!("Copied image {:?}", asset.destination_name);
                    state.report.images += 1;
                }
                Err(err) => state.skip(&source, err),
            }
        }
        Ok(())
    }

    /// Run the search builder once per output file.
    ///
    /// The builder is called as
    /// `<program> <arg0> <output dir> <arg1..> <output dir>/<output file>`.
    fn run_searches(
        &self,
        searches: &[SearchInvocation],
        state: &mut BuildState,
    ) -> Result<(), BuildError> {
        let output_dir = self.config.output_dir();
        let program = &self.config.search.program;

        for search in searches {
            let output = output_dir.join(&search.output_file);
            if !state.searches.insert(output.clone()) {
                continue;
            }

            let failed = |reason: String| BuildError::SearchBuilder {
                program: program.clone(),
                output: output.clone(),
                reason,
            };

            if let Some(parent) = output.parent() {
                fs::create_dir_all(parent)?;
            }

            let (first, rest) = search
                .arguments
                .split_first()
                .ok_or_else(|| failed("no arguments".to_string()))?;

            tracing::info!("Building search page {:?}", search.output_file);
            let result = Command::new(program)
                .arg(first)
                .arg(&output_dir)
                .args(rest)
                .arg(&output)
                .output()
                .map_err(|err| failed(err.to_string()))?;

            if !result.status.success() {
                let stderr = String::from_utf8_lossy(&result.stderr);
                return Err(failed(format!("{}: {}", result.status, stderr.trim())));
            }
            state.report.search_pages += 1;
        }
        Ok(())
    }
}

/// Direct children of `dir`, sorted by file name.
///
/// Entries that cannot be read are recorded as skipped.
fn list_dir(dir: &Path, state: &mut BuildState) -> Vec<DirEntry> {
    let mut entries = Vec::new();
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name();

    for entry in walker {
        match entry {
            Ok(entry) => entries.push(entry),
            Err(err) => {
                let path = err.path().unwrap_or(dir).to_path_buf();
                state.skip(&path, err);
            }
        }
    }
    entries
}

/// Relative path that stays below the directory it is joined to
fn is_inside_vault(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

fn is_markdown(entry: &DirEntry) -> bool {
    entry.file_type().is_file() && entry.path().extension().is_some_and(|ext| ext == "md")
}

/// Logical title of a document: its file name without extension
fn title_from_path(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Write through a temporary file in the destination directory.
///
/// The temporary is removed on every error path when it is dropped.
fn write_atomic(destination: &Path, contents: &str) -> io::Result<()> {
    let dir = destination
        .parent()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "destination has no parent"))?;
    fs::create_dir_all(dir)?;

    let mut file = NamedTempFile::new_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.persist(destination).map_err(|err| err.error)?;
    Ok(())
}
