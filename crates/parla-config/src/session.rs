use serde::{Deserialize, Serialize};

fn default_from_lang() -> String {
    "pt-BR".to_string()
}

fn default_to_lang() -> String {
    "en-US".to_string()
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct SessionConfig {
    #[serde(default = "default_from_lang")]
    pub from_lang: String,
    #[serde(default = "default_to_lang")]
    pub to_lang: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            from_lang: default_from_lang(),
            to_lang: default_to_lang(),
        }
    }
}
