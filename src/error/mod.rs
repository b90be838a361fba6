/// Centralized error handling for cssopt
pub mod pipeline;

pub use pipeline::{PipelineError, PipelineResult};
