use std::env;

use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

fn default_provider() -> String {
    "mymemory".to_string()
}

fn default_api_url() -> String {
    "https://api.mymemory.translated.net/get".to_string()
}

fn default_timeout_ms() -> u64 {
    8000
}

/// Online fallback settings
#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TranslatorConfig {
    /// When false an offline miss ends the pipeline
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    #[serde(default = "default_provider")]
    pub provider: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Upper bound for one remote call, 0 leaves it to the transport
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
    /// Contact address sent as `de`, raises the free quota
    #[serde(default)]
    pub email: Option<String>,
}

impl TranslatorConfig {
    pub fn new() -> Self {
        let api_url = env::var("PARLA_API_URL").unwrap_or_else(|_| default_api_url());

        let timeout_ms = env::var("PARLA_TIMEOUT_MS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_timeout_ms);

        let email = env::var("PARLA_EMAIL").ok().filter(|v| !v.is_empty());

        Self {
            enabled: default_enabled(),
            provider: default_provider(),
            api_url,
            timeout_ms,
            email,
        }
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            provider: default_provider(),
            api_url: default_api_url(),
            timeout_ms: default_timeout_ms(),
            email: None,
        }
    }
}
