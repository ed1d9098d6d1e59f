use std::sync::Arc;

use crate::language::primary_subtag;
use crate::preprocess::{DefaultNormalizer, Normalizer};

/// Keyed phrase table for offline translation
pub trait Dictionary: Send + Sync {
    /// Exact match of an already normalized `key` in the `source -> target` table
    fn get(&self, source: &str, target: &str, key: &str) -> Option<&str>;

    /// Get dictionary metadata
    fn metadata(&self) -> DictionaryMetadata;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DictionaryMetadata {
    pub name: String,
    pub version: String,
    pub pair_count: usize,
    pub entry_count: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("File not found: {0}")]
    FileNotFound(String),

    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Offline lookup over a [`Dictionary`].
///
/// Never performs I/O. A miss is `None`, not an error.
#[derive(Clone)]
pub struct OfflineResolver {
    dictionary: Arc<dyn Dictionary>,
    normalizer: Arc<dyn Normalizer>,
}

impl OfflineResolver {
    pub fn new(dictionary: Arc<dyn Dictionary>) -> Self {
        Self {
            dictionary,
            normalizer: Arc::new(DefaultNormalizer),
        }
    }

    pub fn lookup(&self, text: &str, source: &str, target: &str) -> Option<String> {
        let key = self.normalizer.normalize(text, source);
        if key.is_empty() {
            return None;
        }

        let region_free = (primary_subtag(source), primary_subtag(target));
        let mut tiers = vec![(source, target)];
        if region_free != (source, target) {
            tiers.push(region_free);
        }

        tiers.into_iter().find_map(|(from, to)| {
            self.dictionary
                .get(from, to, &key)
                .map(|translated| translated.to_string())
        })
    }

    pub fn metadata(&self) -> DictionaryMetadata {
        self.dictionary.metadata()
    }
}
