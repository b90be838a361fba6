//! Loading of r.js style build files
//!
//! A build file is a JSON5 object, optionally wrapped in one pair of
//! parentheses:
//!
//! ```text
//! ({
//!     cssIn: "${project.basedir}/css/styles.css",
//!     out: "${project.build.webapp}/css/styles.min.css",
//!     // standard | standard.keepLines | standard.keepComments | ...
//!     optimizeCss: "standard"
//! })
//! ```

use super::constants::DEFAULT_MODE;
use super::{BuildVariables, OptimizationMode, PipelineConfig};
use crate::error::{PipelineError, PipelineResult};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// `cssImportIgnore` accepts a comma separated string or a list
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum ImportIgnore {
    One(String),
    Many(Vec<String>),
}

impl ImportIgnore {
    pub fn into_list(self) -> Vec<String> {
        let items = match self {
            Self::One(s) => s.split(',').map(str::to_string).collect(),
            Self::Many(v) => v,
        };
        items
            .into_iter()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect()
    }
}

/// Raw build file contents before placeholder substitution and validation
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildFile {
    pub css_in: Option<String>,
    pub out: Option<String>,
    pub optimize_css: Option<String>,
    pub css_import_ignore: Option<ImportIgnore>,
    pub preserve_license_comments: Option<bool>,
    /// Directory relative paths are resolved against
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

/// Command line values that take precedence over the build file
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub css_in: Option<String>,
    pub out: Option<String>,
    pub optimize_css: Option<String>,
}

impl BuildFile {
    /// Read and parse a build file from disk
    pub fn load(path: &Path) -> PipelineResult<Self> {
        debug!("Loading build file: {:?}", path);
        let content = std::fs::read_to_string(path).map_err(|e| {
            PipelineError::invalid_config(format!(
                "Cannot read build file {}: {e}",
                path.display()
            ))
        })?;

        let mut build_file = Self::parse(&content).map_err(|e| match e {
            PipelineError::InvalidConfig(msg) => {
                PipelineError::invalid_config(format!("{}: {msg}", path.display()))
            }
            other => other,
        })?;
        build_file.base_dir = path.parent().map(Path::to_path_buf);
        Ok(build_file)
    }

    /// Parse build file text
    pub fn parse(content: &str) -> PipelineResult<Self> {
        let body = unwrap_parens(content);
        json5::from_str(body)
            .map_err(|e| PipelineError::invalid_config(format!("Malformed build file: {e}")))
    }

    /// Apply overrides, substitute placeholders and validate into a `PipelineConfig`
    ///
    /// The mode is validated before anything else so an invalid mode never
    /// reaches file I/O.
    pub fn resolve(
        self,
        overrides: &ConfigOverrides,
        vars: &BuildVariables,
    ) -> PipelineResult<PipelineConfig> {
        let mode_str = overrides
            .optimize_css
            .as_deref()
            .or(self.optimize_css.as_deref())
            .unwrap_or(DEFAULT_MODE);
        let mode: OptimizationMode = mode_str.parse()?;

        let css_in = overrides
            .css_in
            .as_deref()
            .or(self.css_in.as_deref())
            .ok_or_else(|| PipelineError::invalid_config("Missing required option 'cssIn'"))?;
        let out = overrides
            .out
            .as_deref()
            .or(self.out.as_deref())
            .ok_or_else(|| PipelineError::invalid_config("Missing required option 'out'"))?;

        let source_path = self.resolve_path(&vars.substitute(css_in)?);
        let output_path = self.resolve_path(&vars.substitute(out)?);

        if source_path == output_path {
            return Err(PipelineError::invalid_config(format!(
                "'cssIn' and 'out' point at the same file: {}",
                source_path.display()
            )));
        }

        let import_ignore = self
            .css_import_ignore
            .map(ImportIgnore::into_list)
            .unwrap_or_default();

        Ok(PipelineConfig::new(source_path, output_path, mode)
            .with_import_ignore(import_ignore)
            .with_preserve_license_comments(self.preserve_license_comments.unwrap_or(false)))
    }

    fn resolve_path(&self, value: &str) -> PathBuf {
        let path = PathBuf::from(value);
        match &self.base_dir {
            Some(base) if path.is_relative() => base.join(path),
            _ => path,
        }
    }
}

/// Strip a single pair of wrapping parentheses and a trailing semicolon
fn unwrap_parens(content: &str) -> &str {
    let trimmed = content.trim();
    let trimmed = trimmed.strip_suffix(';').unwrap_or(trimmed).trim_end();
    match trimmed.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
        Some(inner) => inner,
        None => trimmed,
    }
}
