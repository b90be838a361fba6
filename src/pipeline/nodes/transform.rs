use crate::css::{
    self, CssDocument, ImportOptions, squeeze_blank_lines, strip_comments,
    strip_comments_preserving_licenses, strip_line_breaks,
};
use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::{CONFIG, DOCUMENT, PipeMap, PipeNode};
use indexmap::IndexSet;
use std::path::Path;
use tracing::debug;

fn take_document(node: &dyn PipeNode, data: &mut PipeMap) -> PipelineResult<CssDocument> {
    data.take_typed(DOCUMENT)
        .ok_or_else(|| PipelineError::missing_input(node.name(), "document"))
}

/// Import inliner node - replace local `@import` statements with file contents
pub struct ImportInlinerNode;

impl PipeNode for ImportInlinerNode {
    fn name(&self) -> String {
        "ImportInliner".to_string()
    }

    fn input(&self) -> Vec<String> {
        vec!["config".to_string(), "document".to_string()]
    }

    fn output(&self) -> Vec<String> {
        vec!["document".to_string()]
    }

    fn process(&self, mut data: PipeMap) -> PipelineResult<PipeMap> {
        let document = take_document(self, &mut data)?;
        let config = data
            .get_typed(CONFIG)
            .ok_or_else(|| PipelineError::missing_input(self.name(), "config"))?;

        let root_dir = document
            .path()
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_default();
        let options = ImportOptions {
            root_dir: &root_dir,
            ignore: config.import_ignore(),
        };

        let mut visited = IndexSet::new();
        visited.insert(document.path().to_path_buf());

        let document = css::resolve_imports(document, &root_dir, &visited, &options)?;
        debug!("Inlined {} imported files", document.inlined().len());

        data.insert_typed(DOCUMENT, document);
        Ok(data)
    }
}

/// Comment stripper node - remove `/* ... */` blocks
pub struct CommentStripperNode;

impl PipeNode for CommentStripperNode {
    fn name(&self) -> String {
        "CommentStripper".to_string()
    }

    fn input(&self) -> Vec<String> {
        vec!["config".to_string(), "document".to_string()]
    }

    fn output(&self) -> Vec<String> {
        vec!["document".to_string()]
    }

    fn process(&self, mut data: PipeMap) -> PipelineResult<PipeMap> {
        let document = take_document(self, &mut data)?;
        let preserve = data
            .get_typed(CONFIG)
            .is_some_and(|c| c.preserve_license_comments());

        let before = document.len();
        let document = if preserve {
            strip_comments_preserving_licenses(document)
        } else {
            strip_comments(document)
        };
        debug!("Comment stripping: {} -> {} bytes", before, document.len());

        data.insert_typed(DOCUMENT, document);
        Ok(data)
    }
}

/// Line break stripper node - collapse the document onto a single line
pub struct LineBreakStripperNode;

impl PipeNode for LineBreakStripperNode {
    fn name(&self) -> String {
        "LineBreakStripper".to_string()
    }

    fn input(&self) -> Vec<String> {
        vec!["document".to_string()]
    }

    fn output(&self) -> Vec<String> {
        vec!["document".to_string()]
    }

    fn process(&self, mut data: PipeMap) -> PipelineResult<PipeMap> {
        let document = strip_line_breaks(take_document(self, &mut data)?);
        data.insert_typed(DOCUMENT, document);
        Ok(data)
    }
}

/// Blank line squeezer node - used instead of line break stripping when lines are kept
pub struct BlankLineSqueezerNode;

impl PipeNode for BlankLineSqueezerNode {
    fn name(&self) -> String {
        "BlankLineSqueezer".to_string()
    }

    fn input(&self) -> Vec<String> {
        vec!["document".to_string()]
    }

    fn output(&self) -> Vec<String> {
        vec!["document".to_string()]
    }

    fn process(&self, mut data: PipeMap) -> PipelineResult<PipeMap> {
        let document = squeeze_blank_lines(take_document(self, &mut data)?);
        data.insert_typed(DOCUMENT, document);
        Ok(data)
    }
}
