//! Pipeline configuration

pub mod build_file;
pub mod constants;
pub mod mode;
pub mod variables;

pub use build_file::{BuildFile, ConfigOverrides, ImportIgnore};
pub use mode::OptimizationMode;
pub use variables::BuildVariables;

use std::path::{Path, PathBuf};

/// Fully resolved settings for one pipeline run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    source_path: PathBuf,
    output_path: PathBuf,
    mode: OptimizationMode,
    import_ignore: Vec<String>,
    preserve_license_comments: bool,
}

impl PipelineConfig {
    pub fn new(
        source_path: impl Into<PathBuf>,
        output_path: impl Into<PathBuf>,
        mode: OptimizationMode,
    ) -> Self {
        Self {
            source_path: source_path.into(),
            output_path: output_path.into(),
            mode,
            import_ignore: Vec::new(),
            preserve_license_comments: false,
        }
    }

    /// Import targets that are left as `@import` statements
    pub fn with_import_ignore(mut self, import_ignore: Vec<String>) -> Self {
        self.import_ignore = import_ignore;
        self
    }

    pub fn with_preserve_license_comments(mut self, preserve: bool) -> Self {
        self.preserve_license_comments = preserve;
        self
    }

    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn mode(&self) -> OptimizationMode {
        self.mode
    }

    pub fn import_ignore(&self) -> &[String] {
        &self.import_ignore
    }

    pub fn preserve_license_comments(&self) -> bool {
        self.preserve_license_comments
    }
}
