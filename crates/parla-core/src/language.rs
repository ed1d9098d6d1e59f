use serde::Serialize;

pub use parla_types::primary_subtag;

/// Display metadata for a selectable language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LanguageEntry {
    pub code: &'static str,
    pub name: &'static str,
    pub flag: &'static str,
}

const fn entry(code: &'static str, name: &'static str, flag: &'static str) -> LanguageEntry {
    LanguageEntry { code, name, flag }
}

/// Every language offered by the selectors, in display order
static LANGUAGES: &[LanguageEntry] = &[
    entry("pt-BR", "Português (Brasil)", "🇧🇷"),
    entry("en-US", "English (US)", "🇺🇸"),
    entry("es-ES", "Español", "🇪🇸"),
    entry("fr-FR", "Français", "🇫🇷"),
    entry("de-DE", "Deutsch", "🇩🇪"),
    entry("it-IT", "Italiano", "🇮🇹"),
    entry("ja-JP", "日本語", "🇯🇵"),
    entry("ko-KR", "한국어", "🇰🇷"),
    entry("zh-CN", "中文 (简体)", "🇨🇳"),
    entry("ru-RU", "Русский", "🇷🇺"),
    entry("ar-SA", "العربية", "🇸🇦"),
    entry("hi-IN", "हिन्दी", "🇮🇳"),
    entry("tr-TR", "Türkçe", "🇹🇷"),
];

pub fn list_languages() -> &'static [LanguageEntry] {
    LANGUAGES
}

/// Catalog entry for a tag, matched without regard to ASCII case
pub fn find(code: &str) -> Option<&'static LanguageEntry> {
    LANGUAGES
        .iter()
        .find(|entry| entry.code.eq_ignore_ascii_case(code.trim()))
}

pub fn contains(code: &str) -> bool {
    find(code).is_some()
}

/// Source and target tags of one translation direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguagePair {
    pub source: String,
    pub target: String,
}

impl LanguagePair {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// The same pair in the opposite direction
    pub fn swapped(&self) -> Self {
        Self {
            source: self.target.clone(),
            target: self.source.clone(),
        }
    }
}
