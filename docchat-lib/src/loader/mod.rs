//! Document loading from a corpus directory
//!
//! Each supported format is a [`DocumentLoader`]. [`DirectoryLoader`] walks a
//! directory tree and hands every file to the first loader that accepts its
//! extension; files nobody claims are skipped without comment.
//!
//! # Usage
//!
//! ```ignore
//! use docchat_lib::loader::DirectoryLoader;
//!
//! let loader = DirectoryLoader::default(); // .txt and .pdf
//! let report = loader.load("./data".as_ref())?;
//! for failure in &report.failures {
//!     eprintln!("skipped: {failure}");
//! }
//! ```

use std::path::Path;

use walkdir::WalkDir;

use crate::{Error, Result};

/// A unit of ingested content, tagged with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Source identity (the file path)
    pub source: String,
    /// Raw text
    pub text: String,
    /// 1-based page number for page-structured formats
    pub page: Option<u32>,
    /// Name of the loader that produced this document
    pub kind: &'static str,
}

/// A decoder for one file format.
pub trait DocumentLoader: Send + Sync {
    /// Short format name, recorded on every document this loader produces
    fn name(&self) -> &'static str;

    /// Whether this loader decodes files with the given extension (no dot)
    fn can_handle(&self, extension: &str) -> bool;

    /// Decode a file into one or more documents
    fn load(&self, path: &Path) -> Result<Vec<Document>>;
}

/// Outcome of scanning a directory.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Documents decoded successfully, in scan order
    pub documents: Vec<Document>,
    /// Files that a loader claimed but failed to decode
    pub failures: Vec<Error>,
}

/// Recursively loads every supported file below a root directory.
pub struct DirectoryLoader {
    loaders: Vec<Box<dyn DocumentLoader>>,
}

impl DirectoryLoader {
    pub fn new(loaders: Vec<Box<dyn DocumentLoader>>) -> Self {
        Self { loaders }
    }

    fn loader_for(&self, path: &Path) -> Option<&dyn DocumentLoader> {
        let ext = path.extension()?.to_str()?;
        self.loaders
            .iter()
            .find(|l| l.can_handle(ext))
            .map(|l| l.as_ref())
    }

    /// Scan `root` and decode every supported file.
    ///
    /// Per-file decode failures are collected in the report and the scan
    /// continues. Only a missing or unreadable root is an error.
    pub fn load(&self, root: &Path) -> Result<LoadReport> {
        if !root.is_dir() {
            return Err(Error::CorpusAccess {
                path: root.to_path_buf(),
                reason: "not a directory".to_string(),
            });
        }

        let mut report = LoadReport::default();
        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(Error::CorpusAccess {
                        path: root.to_path_buf(),
                        reason: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable corpus entry: {}", e);
                    continue;
                }
            };
            if !entry.file_type().is_file() {
                continue;
            }

            let path = entry.path();
            let Some(loader) = self.loader_for(path) else {
                tracing::trace!("No loader for {}", path.display());
                continue;
            };

            match loader.load(path) {
                Ok(docs) => {
                    tracing::debug!(
                        "Loaded {} document(s) from {} via {}",
                        docs.len(),
                        path.display(),
                        loader.name()
                    );
                    report.documents.extend(docs);
                }
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", path.display(), e);
                    report.failures.push(e);
                }
            }
        }
        Ok(report)
    }
}

impl Default for DirectoryLoader {
    fn default() -> Self {
        Self::new(vec![Box::new(PdfLoader), Box::new(TextLoader)])
    }
}

mod pdf;
mod text;

pub use pdf::*;
pub use text::*;
