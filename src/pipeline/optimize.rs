use super::nodes::{
    BlankLineSqueezerNode, CommentStripperNode, ImportInlinerNode, LineBreakStripperNode,
    OutputWriterNode, SourceReaderNode, Utf8DecoderNode,
};
use super::{BYTES_WRITTEN, CONFIG, DOCUMENT, PipeMap, Pipeline, SOURCE_BYTES};
use crate::config::{OptimizationMode, PipelineConfig};
use crate::error::PipelineResult;
use serde::Serialize;
use std::path::PathBuf;
use tracing::{debug, info};

/// Summary of a finished run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub source: PathBuf,
    pub output: PathBuf,
    pub mode: String,
    pub imports_inlined: Vec<PathBuf>,
    pub bytes_in: usize,
    pub bytes_out: usize,
}

/// Assemble the node chain for `mode`.
///
/// Stages always run in the same order: imports, comments, line breaks.
pub fn build_pipeline(mode: OptimizationMode) -> PipelineResult<Pipeline> {
    let mut pipeline = Pipeline::new("CssOptimizePipeline")
        .with_external_inputs(vec!["config".to_string()])
        .add_node(Box::new(SourceReaderNode))?;

    // `none` copies the source bytes without decoding them
    if mode == OptimizationMode::None {
        return pipeline.add_node(Box::new(OutputWriterNode));
    }
    pipeline = pipeline.add_node(Box::new(Utf8DecoderNode))?;

    if mode.inlines_imports() {
        pipeline = pipeline.add_node(Box::new(ImportInlinerNode))?;
    }

    if mode.strips_comments() {
        pipeline = pipeline.add_node(Box::new(CommentStripperNode))?;
    }

    if mode.strips_line_breaks() {
        pipeline = pipeline.add_node(Box::new(LineBreakStripperNode))?;
    } else if mode.squeezes_blank_lines() {
        pipeline = pipeline.add_node(Box::new(BlankLineSqueezerNode))?;
    }

    pipeline.add_node(Box::new(OutputWriterNode))
}

/// Run the optimization described by `config`, producing exactly one output file
pub fn run(config: PipelineConfig) -> PipelineResult<RunReport> {
    let mode = config.mode();
    debug!("Starting CSS optimization");
    debug!("Source: {:?}", config.source_path());
    debug!("Output: {:?}", config.output_path());
    debug!("Mode: {}", mode);

    let pipeline = build_pipeline(mode)?;
    debug!("Pipeline '{}' nodes: {:?}", pipeline.name(), pipeline.node_names());

    let mut pipe_data = PipeMap::new();
    pipe_data.insert_typed(CONFIG, config.clone());

    let result = pipeline.execute(pipe_data)?;

    let imports_inlined = result
        .get_typed(DOCUMENT)
        .map(|doc| doc.inlined().iter().cloned().collect())
        .unwrap_or_default();

    let report = RunReport {
        source: config.source_path().to_path_buf(),
        output: config.output_path().to_path_buf(),
        mode: mode.to_string(),
        imports_inlined,
        bytes_in: result.get_typed(SOURCE_BYTES).copied().unwrap_or_default(),
        bytes_out: result.get_typed(BYTES_WRITTEN).copied().unwrap_or_default(),
    };

    info!(
        "Optimized {:?} -> {:?} ({}, {} -> {} bytes)",
        report.source, report.output, report.mode, report.bytes_in, report.bytes_out
    );
    Ok(report)
}
