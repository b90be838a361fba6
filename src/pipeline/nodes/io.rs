use crate::config::PipelineConfig;
use crate::css::CssDocument;
use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::{BYTES_WRITTEN, CONFIG, DOCUMENT, PipeMap, PipeNode, SOURCE, SOURCE_BYTES};
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

/// Raw contents of the source stylesheet
#[derive(Debug, Clone)]
pub struct SourceFile {
    /// Canonical path, so the root takes part in cycle detection
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

/// Source reader node - load the stylesheet named by `cssIn`
pub struct SourceReaderNode;

impl PipeNode for SourceReaderNode {
    fn name(&self) -> String {
        "SourceReader".to_string()
    }

    fn input(&self) -> Vec<String> {
        vec!["config".to_string()]
    }

    fn output(&self) -> Vec<String> {
        vec!["source".to_string(), "source_bytes".to_string()]
    }

    fn process(&self, mut data: PipeMap) -> PipelineResult<PipeMap> {
        let config = data
            .get_typed(CONFIG)
            .ok_or_else(|| PipelineError::missing_input(self.name(), "config"))?;
        let source = config.source_path();

        info!("Reading source: {:?}", source);

        let missing = |e: std::io::Error| PipelineError::MissingSourceFile {
            path: source.to_path_buf(),
            source: e,
        };
        let path = source.canonicalize().map_err(missing)?;
        let bytes = std::fs::read(&path).map_err(missing)?;

        debug!("Read {} bytes from {:?}", bytes.len(), path);
        data.insert_typed(SOURCE_BYTES, bytes.len());
        data.insert_typed(SOURCE, SourceFile { path, bytes });
        Ok(data)
    }
}

/// UTF-8 decoder node - turn the raw source into a document for the text transforms
pub struct Utf8DecoderNode;

impl PipeNode for Utf8DecoderNode {
    fn name(&self) -> String {
        "Utf8Decoder".to_string()
    }

    fn input(&self) -> Vec<String> {
        vec!["source".to_string()]
    }

    fn output(&self) -> Vec<String> {
        vec!["document".to_string()]
    }

    fn process(&self, mut data: PipeMap) -> PipelineResult<PipeMap> {
        let source = data
            .take_typed(SOURCE)
            .ok_or_else(|| PipelineError::missing_input(self.name(), "source"))?;

        let document = CssDocument::decode(source.path, source.bytes)?;
        data.insert_typed(DOCUMENT, document);
        Ok(data)
    }
}

/// Output writer node - write the document to `out` atomically.
/// Without a document the raw source is copied unchanged.
pub struct OutputWriterNode;

impl PipeNode for OutputWriterNode {
    fn name(&self) -> String {
        "OutputWriter".to_string()
    }

    fn input(&self) -> Vec<String> {
        vec![
            "config".to_string(),
            "document?".to_string(),
            "source?".to_string(),
        ]
    }

    fn output(&self) -> Vec<String> {
        vec!["bytes_written".to_string()]
    }

    fn process(&self, mut data: PipeMap) -> PipelineResult<PipeMap> {
        let config = data
            .get_typed(CONFIG)
            .ok_or_else(|| PipelineError::missing_input(self.name(), "config"))?;

        let content = match (data.get_typed(DOCUMENT), data.get_typed(SOURCE)) {
            (Some(document), _) => document.text().as_bytes(),
            (None, Some(source)) => source.bytes.as_slice(),
            (None, None) => {
                debug!("Available data: {:?}", data.keys());
                return Err(PipelineError::missing_input(self.name(), "document"));
            }
        };

        let written = write_atomically(config, content)?;
        info!("Wrote {} bytes to {:?}", written, config.output_path());

        data.insert_typed(BYTES_WRITTEN, written);
        Ok(data)
    }
}

/// Write through a temporary file in the destination directory and rename
/// it over the output. The temporary file is removed when any step fails.
fn write_atomically(config: &PipelineConfig, content: &[u8]) -> PipelineResult<usize> {
    let output = config.output_path();
    let unwritable = |e: std::io::Error| PipelineError::UnwritableOutputPath {
        path: output.to_path_buf(),
        source: e,
    };

    let dir = match output.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(unwritable)?;

    let mut temp = NamedTempFile::new_in(dir).map_err(unwritable)?;
    debug!("Writing to temporary file {:?}", temp.path());

    temp.write_all(content).map_err(unwritable)?;
    temp.as_file().sync_all().map_err(unwritable)?;
    temp.persist(output).map_err(|e| unwritable(e.error))?;

    Ok(content.len())
}
