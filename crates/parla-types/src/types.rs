use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

impl TranslationRequest {
    pub fn new(
        text: impl Into<String>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
    ) -> Self {
        Self {
            text: text.into(),
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
        }
    }
}

/// Which path produced a translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationMethod {
    Offline,
    Online,
}

impl TranslationMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranslationMethod::Offline => "offline",
            TranslationMethod::Online => "online",
        }
    }
}

impl fmt::Display for TranslationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationResult {
    pub translated_text: String,
    pub method: TranslationMethod,
}

/// Outward-facing failure categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    EmptyInput,
    UnknownLanguage,
    NoLocalMatch,
    OfflineAndUnreachable,
    RemoteError,
}

impl FailureKind {
    /// Message shown to the user, `None` when the outcome is a silent no-op
    pub fn user_message(&self) -> Option<&'static str> {
        match self {
            FailureKind::EmptyInput => None,
            FailureKind::UnknownLanguage => Some("That language is not supported."),
            FailureKind::NoLocalMatch => {
                Some("This phrase is not in the offline dictionary.")
            }
            FailureKind::OfflineAndUnreachable => Some(
                "You are offline and this phrase is not in the offline dictionary. \
                 Connect to the internet to translate it.",
            ),
            FailureKind::RemoteError => {
                Some("The translation service could not be reached. Please try again.")
            }
        }
    }
}

#[derive(Debug, Clone)]
pub enum AppEvent {
    /// Text to translate with the current session languages
    TextInput(String),
    RawTextInput {
        text: String,
        source: TextSource,
    },
    ClearInput,
    SwapLanguages,
    SetSourceLanguage(String),
    SetTargetLanguage(String),
    /// External reachability notification
    Reachability(bool),
    CopyLast,
    SpeakLast,
    StartListening,
    StopSpeech,
    ListLanguages,
    ShowStats,
    ShowTranslation {
        ticket: u64,
        result: TranslationResult,
        from_lang: String,
        to_lang: String,
    },
    ShowFailure {
        ticket: u64,
        kind: FailureKind,
        detail: String,
    },
    Status(String),
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextSource {
    Console,
    Clipboard,
    Websocket,
    Speech,
}

/// Primary subtag of a language tag: `"pt-BR"` is `"pt"`, `"zh_Hant"` is `"zh"`
pub fn primary_subtag(tag: &str) -> &str {
    tag.split(['-', '_']).next().unwrap_or(tag)
}
