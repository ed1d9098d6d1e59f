use std::sync::Arc;
use std::time::Duration;

use parla_translator::{TranslateError, Translator};
use parla_types::{FailureKind, TranslationMethod, TranslationRequest, TranslationResult};

use crate::connectivity::Connectivity;
use crate::dictionary::OfflineResolver;
use crate::language;

#[derive(Debug, thiserror::Error)]
pub enum TranslationFailure {
    #[error("nothing to translate")]
    EmptyInput,

    #[error("unknown language code: {0}")]
    UnknownLanguage(String),

    #[error("phrase is not in the offline dictionary")]
    NoLocalMatch,

    #[error("offline and the phrase is not in the offline dictionary")]
    OfflineAndUnreachable,

    #[error("translation service failed: {0}")]
    RemoteError(#[from] TranslateError),
}

impl TranslationFailure {
    pub fn kind(&self) -> FailureKind {
        match self {
            TranslationFailure::EmptyInput => FailureKind::EmptyInput,
            TranslationFailure::UnknownLanguage(_) => FailureKind::UnknownLanguage,
            TranslationFailure::NoLocalMatch => FailureKind::NoLocalMatch,
            TranslationFailure::OfflineAndUnreachable => FailureKind::OfflineAndUnreachable,
            TranslationFailure::RemoteError(_) => FailureKind::RemoteError,
        }
    }
}

/// Offline dictionary first, remote service only on a genuine miss
pub struct Orchestrator {
    resolver: OfflineResolver,
    connectivity: Connectivity,
    translator: Option<Arc<dyn Translator>>,
    timeout: Option<Duration>,
}

impl Orchestrator {
    /// Offline-only orchestrator, misses end in `NoLocalMatch`
    pub fn new(resolver: OfflineResolver, connectivity: Connectivity) -> Self {
        Self {
            resolver,
            connectivity,
            translator: None,
            timeout: None,
        }
    }

    pub fn with_translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Caller-side bound on one remote call, expiry counts as a remote error
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn connectivity(&self) -> &Connectivity {
        &self.connectivity
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    pub async fn resolve(
        &self,
        request: &TranslationRequest,
    ) -> Result<TranslationResult, TranslationFailure> {
        let text = request.text.trim();
        if text.is_empty() {
            return Err(TranslationFailure::EmptyInput);
        }

        let source = language::find(&request.source_lang)
            .ok_or_else(|| TranslationFailure::UnknownLanguage(request.source_lang.clone()))?;
        let target = language::find(&request.target_lang)
            .ok_or_else(|| TranslationFailure::UnknownLanguage(request.target_lang.clone()))?;

        if let Some(translated_text) = self.resolver.lookup(text, source.code, target.code) {
            tracing::debug!("Offline hit {} -> {}", source.code, target.code);
            return Ok(TranslationResult {
                translated_text,
                method: TranslationMethod::Offline,
            });
        }

        let Some(translator) = &self.translator else {
            tracing::debug!("Offline miss, online fallback disabled");
            return Err(TranslationFailure::NoLocalMatch);
        };

        if !self.connectivity.is_online() {
            tracing::debug!("Offline miss while unreachable");
            return Err(TranslationFailure::OfflineAndUnreachable);
        }

        tracing::debug!("Offline miss, asking {}", translator.metadata().name);
        let call = translator.translate(text, source.code.to_string(), target.code.to_string());
        let translation = match self.timeout {
            Some(limit) => match tokio::time::timeout(limit, call).await {
                Ok(result) => result,
                Err(_) => Err(TranslateError::Timeout(limit.as_millis() as u64)),
            },
            None => call.await,
        };

        match translation {
            Ok(translation) => Ok(TranslationResult {
                translated_text: translation.text,
                method: TranslationMethod::Online,
            }),
            Err(e) => {
                tracing::warn!("Online translation failed: {}", e);
                Err(TranslationFailure::RemoteError(e))
            }
        }
    }
}
