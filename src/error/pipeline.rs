/// Pipeline error types
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    // Configuration errors
    #[error(
        "Invalid optimizeCss mode '{0}' (expected one of: standard, standard.keepLines, \
         standard.keepComments, standard.keepComments.keepLines, none)"
    )]
    InvalidMode(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // File errors
    #[error("Source file not found or unreadable: {}", .path.display())]
    MissingSourceFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(
        "Cannot read @import target '{target}' (resolved to {}) imported from {}",
        .path.display(),
        .importer.display()
    )]
    MissingImportTarget {
        target: String,
        path: PathBuf,
        importer: PathBuf,
    },

    #[error("Stylesheet {} is not valid UTF-8", .path.display())]
    InvalidEncoding {
        path: PathBuf,
        #[source]
        source: std::string::FromUtf8Error,
    },

    #[error("Cyclic @import detected: {}", format_chain(.chain))]
    CyclicImport { chain: Vec<PathBuf> },

    #[error("Cannot write output file {}: {source}", .path.display())]
    UnwritableOutputPath {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Node wiring errors
    #[error("Missing required input '{required}' for node '{node}'")]
    MissingInput { node: String, required: String },

    #[error("Missing required output '{required}' for node '{node}'")]
    MissingOutput { node: String, required: String },

    #[error("Cannot serialize run report: {0}")]
    Report(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for pipeline operations
pub type PipelineResult<T> = Result<T, PipelineError>;

impl PipelineError {
    /// Create an invalid config error
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a missing input error
    pub fn missing_input(node: impl Into<String>, required: impl Into<String>) -> Self {
        Self::MissingInput {
            node: node.into(),
            required: required.into(),
        }
    }

    /// Create a missing output error
    pub fn missing_output(node: impl Into<String>, required: impl Into<String>) -> Self {
        Self::MissingOutput {
            node: node.into(),
            required: required.into(),
        }
    }
}

fn format_chain(chain: &[PathBuf]) -> String {
    chain
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(" -> ")
}
