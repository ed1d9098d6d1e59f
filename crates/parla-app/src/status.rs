use std::fmt;

use parla_types::{FailureKind, TranslationMethod};

/// Per-process counters of how requests were answered
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TranslationStats {
    pub offline_hits: u64,
    pub online_hits: u64,
    pub unreachable: u64,
    pub remote_errors: u64,
    pub superseded: u64,
}

impl TranslationStats {
    pub fn record_success(&mut self, method: TranslationMethod) {
        match method {
            TranslationMethod::Offline => self.offline_hits += 1,
            TranslationMethod::Online => self.online_hits += 1,
        }
    }

    pub fn record_failure(&mut self, kind: FailureKind) {
        match kind {
            FailureKind::OfflineAndUnreachable => self.unreachable += 1,
            FailureKind::RemoteError => self.remote_errors += 1,
            _ => {}
        }
    }
}

impl fmt::Display for TranslationStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "offline: {}, online: {}, offline misses: {}, remote errors: {}, superseded: {}",
            self.offline_hits, self.online_hits, self.unreachable, self.remote_errors, self.superseded
        )
    }
}
