//! CSS optimization pipeline driven by r.js style build files
//!
//! One source stylesheet goes in, one optimized stylesheet comes out. The
//! `optimizeCss` mode decides whether `@import` statements are inlined and
//! whether comments and line breaks are stripped.

pub mod cli;
pub mod config;
pub mod css;
pub mod error;
pub mod logging;
pub mod pipeline;

pub use config::{BuildFile, BuildVariables, ConfigOverrides, OptimizationMode, PipelineConfig};
pub use css::CssDocument;
pub use error::{PipelineError, PipelineResult};
pub use pipeline::{RunReport, run};
