use std::env;

use serde::{Deserialize, Serialize};

use self::dictionary::DictionaryConfig;
use self::network::NetworkConfig;
use self::session::SessionConfig;
use self::speech::SpeechConfig;
use self::translator::TranslatorConfig;

pub mod dictionary;
pub mod network;
pub mod session;
pub mod speech;
pub mod translator;

fn default_channel_capacity() -> usize {
    64
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub network: NetworkConfig,
    pub dictionary: DictionaryConfig,
    pub translator: TranslatorConfig,
    pub speech: SpeechConfig,
    pub session: SessionConfig,

    /// Capacity of the app event channels
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
}

impl Config {
    pub fn new() -> Self {
        let channel_capacity = env::var("PARLA_CHANNEL_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or_else(default_channel_capacity);

        Config {
            network: NetworkConfig::new(),
            dictionary: DictionaryConfig::default(),
            translator: TranslatorConfig::new(),
            speech: SpeechConfig::default(),
            session: SessionConfig::default(),

            channel_capacity,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            network: NetworkConfig::default(),
            dictionary: DictionaryConfig::default(),
            translator: TranslatorConfig::default(),
            speech: SpeechConfig::default(),
            session: SessionConfig::default(),
            channel_capacity: default_channel_capacity(),
        }
    }
}
