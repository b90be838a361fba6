pub mod io;
pub mod transform;

pub use io::{OutputWriterNode, SourceFile, SourceReaderNode, Utf8DecoderNode};
pub use transform::{BlankLineSqueezerNode, CommentStripperNode, ImportInlinerNode, LineBreakStripperNode};
