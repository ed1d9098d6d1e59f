use std::env;

use serde::{Deserialize, Serialize};

fn default_start_online() -> bool {
    true
}

fn default_ws_url() -> String {
    "ws://localhost:8080".to_string()
}

/// Reachability and external text feed settings
#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct NetworkConfig {
    /// Initial reachability before any notification arrives
    #[serde(default = "default_start_online")]
    pub start_online: bool,
    /// Listen to websocket for input text
    #[serde(default)]
    pub listen_to_ws: bool,
    #[serde(default = "default_ws_url")]
    pub ws_url: String,
    /// Translate whatever lands on the clipboard
    #[serde(default)]
    pub watch_clipboard: bool,
}

impl NetworkConfig {
    pub fn new() -> Self {
        let start_online = env::var("PARLA_START_ONLINE")
            .ok()
            .and_then(|v| parse_bool(&v))
            .unwrap_or_else(default_start_online);

        let ws_url = env::var("WS_URL").unwrap_or_else(|_| default_ws_url());

        Self {
            start_online,
            listen_to_ws: false,
            ws_url,
            watch_clipboard: false,
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            start_online: default_start_online(),
            listen_to_ws: false,
            ws_url: default_ws_url(),
            watch_clipboard: false,
        }
    }
}

pub(crate) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
