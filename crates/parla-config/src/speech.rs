use serde::{Deserialize, Serialize};

/// External speech capabilities, run as child processes.
///
/// `{lang}` in any argument is replaced with the language tag.
#[derive(Serialize, Deserialize, Clone, Default)]
#[serde(default)]
pub struct SpeechConfig {
    /// Recognizer printing one transcript line to stdout
    pub capture_command: Option<Vec<String>>,
    /// Synthesizer reading the text from stdin
    pub playback_command: Option<Vec<String>>,
}
