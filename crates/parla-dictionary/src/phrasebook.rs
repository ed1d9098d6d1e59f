use std::collections::HashMap;
use std::collections::hash_map::Entry;

use parla_core::dictionary::{Dictionary, DictionaryMetadata, LoadError};
use parla_core::preprocess::{DefaultNormalizer, Normalizer};

use crate::types::PhrasebookJson;

type PairKey = (String, String);

/// Phrase tables keyed by language pair, then by normalized phrase
#[derive(Debug)]
pub struct Phrasebook {
    name: String,
    version: String,
    tables: HashMap<PairKey, HashMap<String, String>>,
}

fn pair_key(source: &str, target: &str) -> PairKey {
    (source.to_ascii_lowercase(), target.to_ascii_lowercase())
}

impl Phrasebook {
    pub fn new() -> Self {
        Self {
            name: "phrasebook".to_string(),
            version: String::new(),
            tables: HashMap::new(),
        }
    }

    /// Parse the JSON phrasebook format
    pub fn from_json(json_str: &str) -> Result<Self, LoadError> {
        let data: PhrasebookJson = serde_json::from_str(json_str)?;

        let mut book = Self {
            name: data.name,
            version: data.version,
            tables: HashMap::new(),
        };

        for pair in data.pairs {
            if pair.source.trim().is_empty() || pair.target.trim().is_empty() {
                return Err(LoadError::InvalidFormat(
                    "pair with an empty language tag".to_string(),
                ));
            }

            for (phrase, translation) in &pair.entries {
                book.insert(&pair.source, &pair.target, phrase, translation);
                if pair.symmetric {
                    // Explicit entries in the reverse table win over derived ones
                    book.insert_if_absent(&pair.target, &pair.source, translation, phrase);
                }
            }
        }

        Ok(book)
    }

    /// Add or replace one entry
    pub fn insert(&mut self, source: &str, target: &str, phrase: &str, translation: &str) {
        let key = DefaultNormalizer.normalize(phrase, source);
        if key.is_empty() {
            return;
        }
        self.tables
            .entry(pair_key(source, target))
            .or_default()
            .insert(key, translation.to_string());
    }

    fn insert_if_absent(&mut self, source: &str, target: &str, phrase: &str, translation: &str) {
        let key = DefaultNormalizer.normalize(phrase, source);
        if key.is_empty() {
            return;
        }
        if let Entry::Vacant(slot) = self
            .tables
            .entry(pair_key(source, target))
            .or_default()
            .entry(key)
        {
            slot.insert(translation.to_string());
        }
    }

    pub fn entry_count(&self) -> usize {
        self.tables.values().map(HashMap::len).sum()
    }

    pub fn pair_count(&self) -> usize {
        self.tables.len()
    }

    /// Merge another phrasebook into this one.
    /// Entries from `other` override existing ones with the same key.
    pub fn merge(mut self, other: Phrasebook) -> Self {
        for (pair, entries) in other.tables {
            self.tables.entry(pair).or_default().extend(entries);
        }
        self
    }
}

impl Default for Phrasebook {
    fn default() -> Self {
        Self::new()
    }
}

impl Dictionary for Phrasebook {
    fn get(&self, source: &str, target: &str, key: &str) -> Option<&str> {
        self.tables
            .get(&pair_key(source, target))
            .and_then(|table| table.get(key))
            .map(String::as_str)
    }

    fn metadata(&self) -> DictionaryMetadata {
        DictionaryMetadata {
            name: self.name.clone(),
            version: self.version.clone(),
            pair_count: self.pair_count(),
            entry_count: self.entry_count(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "name": "sample",
        "version": "2",
        "pairs": [
            {
                "source": "pt-BR",
                "target": "en-US",
                "symmetric": true,
                "entries": { "Bom dia": "good morning", "obrigado": "thank you" }
            },
            {
                "source": "en-US",
                "target": "pt-BR",
                "entries": { "thank you": "muito obrigado" }
            }
        ]
    }"#;

    #[test]
    fn keys_are_normalized() {
        let book = Phrasebook::from_json(SAMPLE).unwrap();
        assert_eq!(book.get("pt-BR", "en-US", "bom dia"), Some("good morning"));
        assert_eq!(book.get("PT-br", "EN-us", "bom dia"), Some("good morning"));
        assert_eq!(book.get("pt-BR", "en-US", "Bom dia"), None);
    }

    #[test]
    fn symmetric_pairs_register_inverse() {
        let book = Phrasebook::from_json(SAMPLE).unwrap();
        assert_eq!(book.get("en-US", "pt-BR", "good morning"), Some("Bom dia"));
        // explicit reverse entry is kept over the derived one
        assert_eq!(book.get("en-US", "pt-BR", "thank you"), Some("muito obrigado"));
        assert_eq!(book.pair_count(), 2);
        assert_eq!(book.entry_count(), 4);
    }

    #[test]
    fn metadata_reflects_contents() {
        let meta = Phrasebook::from_json(SAMPLE).unwrap().metadata();
        assert_eq!(meta.name, "sample");
        assert_eq!(meta.version, "2");
        assert_eq!(meta.entry_count, 4);
    }

    #[test]
    fn merge_overrides_existing_entries() {
        let base = Phrasebook::from_json(SAMPLE).unwrap();
        let mut extra = Phrasebook::new();
        extra.insert("pt-BR", "en-US", "bom dia", "morning!");
        extra.insert("pt-BR", "es-ES", "bom dia", "buenos días");

        let merged = base.merge(extra);
        assert_eq!(merged.get("pt-BR", "en-US", "bom dia"), Some("morning!"));
        assert_eq!(merged.get("pt-BR", "es-ES", "bom dia"), Some("buenos días"));
        assert_eq!(merged.get("pt-BR", "en-US", "obrigado"), Some("thank you"));
    }

    #[test]
    fn rejects_bad_input() {
        assert!(matches!(
            Phrasebook::from_json("{ not json"),
            Err(LoadError::ParseError(_))
        ));
        assert!(matches!(
            Phrasebook::from_json(r#"{ "pairs": [ { "source": "", "target": "en", "entries": {} } ] }"#),
            Err(LoadError::InvalidFormat(_))
        ));
    }
}
