//! CSS documents and the text transforms applied to them

pub mod comments;
pub mod imports;
pub mod scan;
pub mod urls;
pub mod whitespace;

pub use comments::{strip_comments, strip_comments_preserving_licenses};
pub use imports::{ImportOptions, resolve_imports};
pub use whitespace::{squeeze_blank_lines, strip_line_breaks};

use crate::error::{PipelineError, PipelineResult};
use indexmap::IndexSet;
use std::path::{Path, PathBuf};

/// A stylesheet being optimized
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CssDocument {
    path: PathBuf,
    text: String,
    /// Canonical paths of every file inlined so far
    inlined: IndexSet<PathBuf>,
}

impl CssDocument {
    pub fn new(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
            inlined: IndexSet::new(),
        }
    }

    /// Build a document from raw file contents, which must be UTF-8
    pub fn decode(path: impl Into<PathBuf>, bytes: Vec<u8>) -> PipelineResult<Self> {
        let path = path.into();
        match String::from_utf8(bytes) {
            Ok(text) => Ok(Self::new(path, text)),
            Err(source) => Err(PipelineError::InvalidEncoding { path, source }),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    pub fn inlined(&self) -> &IndexSet<PathBuf> {
        &self.inlined
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replace the text, keeping path and inlining history
    pub(crate) fn with_text(self, text: String) -> Self {
        Self { text, ..self }
    }
}
