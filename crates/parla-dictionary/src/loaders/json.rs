use std::path::Path;

use parla_core::dictionary::LoadError;

use crate::phrasebook::Phrasebook;

pub struct PhrasebookLoader;

impl PhrasebookLoader {
    /// Load the phrasebook bundled with the crate
    pub fn load_embedded() -> Result<Phrasebook, LoadError> {
        let json = include_str!("../../data/phrasebook.json");
        tracing::info!("Loading embedded phrasebook...");
        let book = Phrasebook::from_json(json)?;
        tracing::info!("Loaded {} phrasebook entries", book.entry_count());
        Ok(book)
    }

    /// Load phrasebook from file path
    pub fn load_from_file(path: &Path) -> Result<Phrasebook, LoadError> {
        tracing::info!("Loading phrasebook from file: {}", path.display());
        if !path.exists() {
            return Err(LoadError::FileNotFound(path.display().to_string()));
        }
        let json = std::fs::read_to_string(path)?;
        let book = Phrasebook::from_json(&json)?;
        tracing::info!("Loaded {} phrasebook entries from file", book.entry_count());
        Ok(book)
    }

    /// Merge two phrasebooks (later entries override earlier ones)
    pub fn merge(base: Phrasebook, additional: Phrasebook) -> Phrasebook {
        base.merge(additional)
    }

    /// Embedded phrasebook (when enabled) with every readable file merged over it.
    ///
    /// Broken sources are logged and skipped.
    pub fn load_all(embedded: bool, additional_paths: &[String]) -> Phrasebook {
        let mut book = if embedded {
            Self::load_embedded().unwrap_or_else(|e| {
                tracing::error!("Failed to load embedded phrasebook: {}", e);
                tracing::warn!("Starting with empty phrasebook");
                Phrasebook::new()
            })
        } else {
            Phrasebook::new()
        };

        for path in additional_paths {
            match Self::load_from_file(Path::new(path)) {
                Ok(additional) => {
                    tracing::info!("Merging additional phrasebook from: {}", path);
                    book = Self::merge(book, additional);
                }
                Err(e) => {
                    tracing::warn!("Failed to load phrasebook from {}: {}", path, e);
                }
            }
        }

        book
    }
}
