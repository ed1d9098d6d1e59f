use parla_types::{FailureKind, TranslationResult};

use crate::orchestrator::TranslationFailure;

/// The most recent resolution as seen by playback and clipboard
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Translated {
        result: TranslationResult,
        target_lang: String,
    },
    Failed(FailureKind),
}

impl Outcome {
    pub fn from_resolution(
        resolution: &Result<TranslationResult, TranslationFailure>,
        target_lang: &str,
    ) -> Self {
        match resolution {
            Ok(result) => Outcome::Translated {
                result: result.clone(),
                target_lang: target_lang.to_string(),
            },
            Err(failure) => Outcome::Failed(failure.kind()),
        }
    }

    /// Text that may be spoken or copied.
    ///
    /// Failure messages and placeholders never qualify.
    pub fn actionable_text(&self) -> Option<(&str, &str)> {
        match self {
            Outcome::Translated {
                result,
                target_lang,
            } if !result.translated_text.trim().is_empty() => {
                Some((result.translated_text.as_str(), target_lang.as_str()))
            }
            _ => None,
        }
    }
}
