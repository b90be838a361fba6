use crate::config::PipelineConfig;
use crate::css::CssDocument;
use crate::pipeline::nodes::SourceFile;
/// Type-safe keys for PipeMap
use std::marker::PhantomData;

/// A type-safe key for PipeMap that enforces compile-time type checking
pub struct TypedKey<T> {
    name: &'static str,
    _phantom: PhantomData<T>,
}

impl<T> TypedKey<T> {
    /// Create a new typed key with a static name
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _phantom: PhantomData,
        }
    }

    /// Get the key name
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for TypedKey<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for TypedKey<T> {}

/// Resolved run configuration
pub const CONFIG: TypedKey<PipelineConfig> = TypedKey::new("config");

/// Source stylesheet exactly as read from disk
pub const SOURCE: TypedKey<SourceFile> = TypedKey::new("source");

/// Stylesheet being transformed
pub const DOCUMENT: TypedKey<CssDocument> = TypedKey::new("document");

/// Size of the source file as read
pub const SOURCE_BYTES: TypedKey<usize> = TypedKey::new("source_bytes");

/// Size of the written output file
pub const BYTES_WRITTEN: TypedKey<usize> = TypedKey::new("bytes_written");
