use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Load the phrasebook bundled with the binary
    #[serde(default = "default_enabled")]
    pub embedded: bool,
    /// Extra phrasebook files merged over the embedded one, in order
    #[serde(default)]
    pub additional_paths: Vec<String>,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            embedded: default_enabled(),
            additional_paths: vec![],
        }
    }
}
