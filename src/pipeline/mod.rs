// Pipeline module - node executor plus the CSS optimization nodes

pub mod core;
pub mod keys;
pub mod nodes;
pub mod optimize;

pub use core::{PipeNode, Pipeline};
pub use keys::*;
pub use optimize::{RunReport, build_pipeline, run};

use std::any::Any;
use std::collections::HashMap;

/// Pipeline data map for passing data between nodes
pub struct PipeMap {
    data: HashMap<&'static str, Box<dyn Any + Send + Sync>>,
}

impl PipeMap {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
        }
    }

    /// Insert a value with a typed key
    pub fn insert_typed<T: Any + Send + Sync>(&mut self, key: TypedKey<T>, value: T) {
        self.data.insert(key.name(), Box::new(value));
    }

    /// Get a value with a typed key
    pub fn get_typed<T: Any + Send + Sync>(&self, key: TypedKey<T>) -> Option<&T> {
        self.data.get(key.name())?.downcast_ref::<T>()
    }

    /// Move a value out of the map; the key is left absent
    pub fn take_typed<T: Any + Send + Sync>(&mut self, key: TypedKey<T>) -> Option<T> {
        let value = self.data.remove(key.name())?;
        match value.downcast::<T>() {
            Ok(v) => Some(*v),
            Err(other) => {
                // wrong type: put it back untouched
                self.data.insert(key.name(), other);
                None
            }
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    // Get all keys for debugging
    pub fn keys(&self) -> Vec<&'static str> {
        self.data.keys().copied().collect()
    }
}

impl Default for PipeMap {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OptimizationMode, PipelineConfig};
    use crate::css::CssDocument;

    #[test]
    fn test_pipeline_data() {
        let mut data = PipeMap::new();

        data.insert_typed(SOURCE_BYTES, 42usize);
        data.insert_typed(DOCUMENT, CssDocument::new("a.css", "a{}"));

        assert_eq!(data.get_typed(SOURCE_BYTES), Some(&42));
        assert_eq!(data.get_typed(DOCUMENT).map(|d| d.text()), Some("a{}"));
        assert!(data.get_typed(BYTES_WRITTEN).is_none());
        assert!(data.contains_key("document"));

        let mut keys = data.keys();
        keys.sort_unstable();
        assert_eq!(keys, vec!["document", "source_bytes"]);
    }

    #[test]
    fn test_take_typed_removes_value() {
        let mut data = PipeMap::new();
        data.insert_typed(
            CONFIG,
            PipelineConfig::new("a.css", "b.css", OptimizationMode::Standard),
        );

        let config = data.take_typed(CONFIG).unwrap();
        assert_eq!(config.mode(), OptimizationMode::Standard);
        assert!(!data.contains_key("config"));
        assert!(data.take_typed(CONFIG).is_none());
    }

    #[test]
    fn test_take_with_mismatched_type_keeps_value() {
        let mut data = PipeMap::new();
        data.insert_typed(SOURCE_BYTES, 7usize);

        let wrong: TypedKey<String> = TypedKey::new("source_bytes");
        assert!(data.take_typed(wrong).is_none());
        assert_eq!(data.get_typed(SOURCE_BYTES), Some(&7));
    }
}

impl std::fmt::Debug for PipeMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PipeMap")
            .field("keys", &self.keys())
            .finish()
    }
}
