use unicode_normalization::UnicodeNormalization;

use crate::language::primary_subtag;

/// Turns raw input into a dictionary key
pub trait Normalizer: Send + Sync {
    fn normalize(&self, text: &str, lang: &str) -> String {
        let text = text.trim();

        if text.is_empty() {
            return String::new();
        }

        // Compatibility forms (fullwidth, ligatures) become their plain equivalents
        let text: String = text.nfkc().collect();

        // Newlines and repeated spaces collapse into single spaces
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");

        fold_case(&text, lang)
    }
}

pub struct DefaultNormalizer;
impl Normalizer for DefaultNormalizer {}

/// Lowercase `text` following the casing rules of `lang`
pub fn fold_case(text: &str, lang: &str) -> String {
    match primary_subtag(lang).to_ascii_lowercase().as_str() {
        // Dotted and dotless i are distinct letters
        "tr" | "az" => text
            .chars()
            .map(|c| match c {
                'I' => 'ı',
                'İ' => 'i',
                c => c,
            })
            .collect::<String>()
            .to_lowercase(),
        _ => text.to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_collapses_and_lowercases() {
        let n = DefaultNormalizer;
        assert_eq!(n.normalize("  Bom   Dia\n", "pt-BR"), "bom dia");
        assert_eq!(n.normalize(" \t\n ", "pt-BR"), "");
    }

    #[test]
    fn compatibility_forms_are_folded() {
        let n = DefaultNormalizer;
        assert_eq!(n.normalize("ＨＥＬＬＯ", "en-US"), "hello");
        // Precomposed and decomposed accents produce the same key
        assert_eq!(
            n.normalize("Obrigado, AVÓ", "pt-BR"),
            n.normalize("Obrigado, AVO\u{301}", "pt-BR")
        );
    }

    #[test]
    fn turkish_dotted_i() {
        assert_eq!(fold_case("İSTANBUL", "tr-TR"), "istanbul");
        assert_eq!(fold_case("ILIK", "tr-TR"), "ılık");
        assert_eq!(fold_case("ILIK", "en-US"), "ilik");
    }
}
