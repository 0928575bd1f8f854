//! The ordered stage list for the normalization pipeline.

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use unicode_segmentation::UnicodeSegmentation;

use crate::types::{NormalizerConfig, UnicodeForm};

use super::{arabic, patterns};

/// One named transformation in the pipeline.
///
/// Stages compose in the fixed order given by [`Stage::ORDER`], regardless
/// of which subset a configuration enables. The order is a contract, not an
/// accident: noise patterns must see intact surface syntax, folding and
/// diacritic handling must see one canonical code-point form, and length
/// filtering must see the final text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    /// Apply the configured Unicode normalization form
    UnicodeCanonicalization,
    /// Strip URLs, emails, mentions, hashtags, HTML tags, timestamps
    NoiseRemoval,
    /// Fold alef/yeh/teh-marbuta variants to canonical letters
    CharacterFolding,
    /// Delete tashkeel marks, optionally keeping shadda
    DiacriticRemoval,
    /// Delete tatweel/kashida elongation
    TatweelRemoval,
    /// Convert digits to ASCII, or delete them
    NumeralHandling,
    /// Delete maximal runs of Latin letters
    LatinRemoval,
    /// Map Arabic and typographic punctuation to ASCII
    PunctuationNormalization,
    /// Collapse runs of identical punctuation
    RepeatedPunctuationCollapse,
    /// Delete characters outside the kept alphabet
    SpecialCharRemoval,
    /// Collapse runs of repeated grapheme clusters
    RepeatedCharCollapse,
    /// Rewrite colloquial spellings through the dialect lexicon
    DialectSpelling,
    /// Collapse whitespace runs and trim
    WhitespaceNormalization,
    /// Enforce the minimum/maximum output length
    LengthFilter,
}

impl Stage {
    /// The composition order.
    pub const ORDER: [Stage; 14] = [
        Stage::UnicodeCanonicalization,
        Stage::NoiseRemoval,
        Stage::CharacterFolding,
        Stage::DiacriticRemoval,
        Stage::TatweelRemoval,
        Stage::NumeralHandling,
        Stage::LatinRemoval,
        Stage::PunctuationNormalization,
        Stage::RepeatedPunctuationCollapse,
        Stage::SpecialCharRemoval,
        Stage::RepeatedCharCollapse,
        Stage::DialectSpelling,
        Stage::WhitespaceNormalization,
        Stage::LengthFilter,
    ];

    /// Stable name for logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Stage::UnicodeCanonicalization => "unicode_canonicalization",
            Stage::NoiseRemoval => "noise_removal",
            Stage::CharacterFolding => "character_folding",
            Stage::DiacriticRemoval => "diacritic_removal",
            Stage::TatweelRemoval => "tatweel_removal",
            Stage::NumeralHandling => "numeral_handling",
            Stage::LatinRemoval => "latin_removal",
            Stage::PunctuationNormalization => "punctuation_normalization",
            Stage::RepeatedPunctuationCollapse => "repeated_punctuation_collapse",
            Stage::SpecialCharRemoval => "special_char_removal",
            Stage::RepeatedCharCollapse => "repeated_char_collapse",
            Stage::DialectSpelling => "dialect_spelling",
            Stage::WhitespaceNormalization => "whitespace_normalization",
            Stage::LengthFilter => "length_filter",
        }
    }

    /// Whether the configuration turns this stage on.
    pub fn is_enabled(&self, config: &NormalizerConfig) -> bool {
        match self {
            Stage::UnicodeCanonicalization => true,
            Stage::NoiseRemoval => {
                config.remove_urls
                    || config.remove_emails
                    || config.remove_mentions
                    || config.remove_hashtags
                    || config.remove_html_tags
                    || config.remove_timestamps
            }
            Stage::CharacterFolding => {
                config.fold_alef || config.fold_yeh || config.fold_teh_marbuta
            }
            Stage::DiacriticRemoval => config.remove_diacritics,
            Stage::TatweelRemoval => config.remove_tatweel,
            Stage::NumeralHandling => config.convert_numerals || config.remove_numerals,
            Stage::LatinRemoval => config.remove_latin,
            Stage::PunctuationNormalization => config.normalize_punctuation,
            Stage::RepeatedPunctuationCollapse => config.collapse_repeated_punctuation,
            Stage::SpecialCharRemoval => config.remove_special_chars,
            Stage::RepeatedCharCollapse => config.collapse_repeated_chars,
            Stage::DialectSpelling => config.normalize_dialect,
            Stage::WhitespaceNormalization => config.normalize_whitespace,
            Stage::LengthFilter => config.min_length > 0 || config.max_length.is_some(),
        }
    }

    /// Apply this stage to the text under the given configuration.
    pub fn apply(&self, text: &str, config: &NormalizerConfig) -> String {
        match self {
            Stage::UnicodeCanonicalization => match config.unicode_form {
                UnicodeForm::Nfc => text.nfc().collect(),
                UnicodeForm::Nfd => text.nfd().collect(),
                UnicodeForm::Nfkc => text.nfkc().collect(),
                UnicodeForm::Nfkd => text.nfkd().collect(),
            },
            Stage::NoiseRemoval => {
                let mut out = text.to_string();
                if config.remove_urls {
                    out = patterns::URL.replace_all(&out, "").into_owned();
                }
                if config.remove_emails {
                    out = patterns::EMAIL.replace_all(&out, "").into_owned();
                }
                if config.remove_mentions {
                    out = patterns::MENTION.replace_all(&out, "").into_owned();
                }
                if config.remove_hashtags {
                    out = patterns::HASHTAG.replace_all(&out, "").into_owned();
                }
                if config.remove_html_tags {
                    out = patterns::HTML_TAG.replace_all(&out, "").into_owned();
                }
                if config.remove_timestamps {
                    out = patterns::remove_timestamps(&out);
                }
                out
            }
            Stage::CharacterFolding => arabic::fold_variants(
                text,
                config.fold_alef,
                config.fold_yeh,
                config.fold_teh_marbuta,
            ),
            Stage::DiacriticRemoval => arabic::remove_diacritics(text, config.keep_shadda),
            Stage::TatweelRemoval => arabic::remove_tatweel(text),
            Stage::NumeralHandling => {
                if config.remove_numerals {
                    arabic::remove_numerals(text)
                } else {
                    arabic::convert_numerals(text)
                }
            }
            Stage::LatinRemoval => patterns::LATIN_RUN.replace_all(text, "").into_owned(),
            Stage::PunctuationNormalization => arabic::normalize_punctuation(text),
            Stage::RepeatedPunctuationCollapse => arabic::collapse_repeated_punctuation(text),
            Stage::SpecialCharRemoval => {
                arabic::remove_special_chars(text, config.preserve_arabic_punctuation)
            }
            Stage::RepeatedCharCollapse => {
                arabic::collapse_repeated_graphemes(text, config.max_char_repeat)
            }
            Stage::DialectSpelling => patterns::apply_dialect_lexicon(text),
            Stage::WhitespaceNormalization => patterns::collapse_whitespace(text),
            Stage::LengthFilter => {
                let trimmed = text.trim();
                let len = trimmed.chars().count();
                if len < config.min_length {
                    return String::new();
                }
                if let Some(max) = config.max_length {
                    if len > max {
                        return truncate_graphemes(trimmed, max).trim_end().to_string();
                    }
                }
                trimmed.to_string()
            }
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Longest prefix holding at most `max_chars` scalar values without
/// splitting a grapheme cluster.
fn truncate_graphemes(text: &str, max_chars: usize) -> &str {
    let mut chars = 0usize;
    let mut end = 0usize;
    for g in text.graphemes(true) {
        let n = g.chars().count();
        if chars + n > max_chars {
            break;
        }
        chars += n;
        end += g.len();
    }
    &text[..end]
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    fn position(stage: Stage) -> usize {
        Stage::ORDER.iter().position(|s| *s == stage).unwrap()
    }

    #[test]
    fn test_order_is_complete_and_unique() {
        assert_eq!(Stage::ORDER.len(), 14);
        let unique: HashSet<_> = Stage::ORDER.iter().collect();
        assert_eq!(unique.len(), Stage::ORDER.len());
        assert_eq!(Stage::ORDER[0], Stage::UnicodeCanonicalization);
        assert_eq!(Stage::ORDER[13], Stage::LengthFilter);
    }

    #[test]
    fn test_order_constraints() {
        // Noise patterns need intact punctuation and digits
        assert!(position(Stage::NoiseRemoval) < position(Stage::PunctuationNormalization));
        assert!(position(Stage::NoiseRemoval) < position(Stage::WhitespaceNormalization));
        // Latin removal must keep already-normalized digits
        assert!(position(Stage::NumeralHandling) < position(Stage::LatinRemoval));
        // Punctuation becomes uniform before runs collapse
        assert!(
            position(Stage::PunctuationNormalization)
                < position(Stage::RepeatedPunctuationCollapse)
        );
        // Length is judged on the final form
        assert!(position(Stage::WhitespaceNormalization) < position(Stage::LengthFilter));
    }

    #[test]
    fn test_stage_names() {
        assert_eq!(Stage::NoiseRemoval.name(), "noise_removal");
        assert_eq!(Stage::LengthFilter.to_string(), "length_filter");
        let json = serde_json::to_string(&Stage::CharacterFolding).unwrap();
        assert_eq!(json, "\"character_folding\"");
    }

    #[test]
    fn test_unicode_canonicalization_forms() {
        let config = NormalizerConfig::default();
        // NFKC folds the lam-alef presentation ligature
        assert_eq!(Stage::UnicodeCanonicalization.apply("\u{FEFB}", &config), "لا");

        // NFC composes alef + combining hamza into the precomposed letter
        let nfc = NormalizerConfig {
            unicode_form: UnicodeForm::Nfc,
            ..Default::default()
        };
        assert_eq!(Stage::UnicodeCanonicalization.apply("ا\u{0654}", &nfc), "أ");
    }

    #[test]
    fn test_numeral_handling_modes() {
        let convert = NormalizerConfig {
            convert_numerals: true,
            ..Default::default()
        };
        assert_eq!(Stage::NumeralHandling.apply("١٢٣", &convert), "123");

        let remove = NormalizerConfig {
            remove_numerals: true,
            ..Default::default()
        };
        assert_eq!(Stage::NumeralHandling.apply("عام ١٢٣", &remove), "عام ");
    }

    #[test]
    fn test_noise_removal_respects_flags() {
        let config = NormalizerConfig {
            remove_urls: true,
            remove_emails: false,
            remove_mentions: false,
            remove_hashtags: false,
            remove_timestamps: false,
            ..Default::default()
        };
        let out = Stage::NoiseRemoval.apply("قبل https://a.io بعد a@b.io @x #y", &config);
        assert_eq!(out, "قبل  بعد a@b.io @x #y");
    }

    #[test]
    fn test_length_filter_rejects_short() {
        let config = NormalizerConfig::default().with_length_bounds(10, None);
        assert_eq!(Stage::LengthFilter.apply("قصير", &config), "");
        assert!(!Stage::LengthFilter.is_enabled(&NormalizerConfig::default()));
    }

    #[test]
    fn test_length_filter_truncates_long() {
        let config = NormalizerConfig::default().with_length_bounds(0, Some(6));
        assert_eq!(Stage::LengthFilter.apply("مرحبا بيك يا زول", &config), "مرحبا");
        // Within bounds passes through trimmed
        let config = NormalizerConfig::default().with_length_bounds(0, Some(30));
        assert_eq!(Stage::LengthFilter.apply(" مرحبا ", &config), "مرحبا");
    }

    #[test]
    fn test_truncation_respects_grapheme_boundaries() {
        // Four flags, eight scalar values; a cut at five chars may not
        // split the third flag
        let text = "🇸🇩🇸🇩🇸🇩🇸🇩";
        assert_eq!(truncate_graphemes(text, 5), "🇸🇩🇸🇩");
        assert_eq!(truncate_graphemes(text, 6), "🇸🇩🇸🇩🇸🇩");
        assert_eq!(truncate_graphemes("مرحبا", 3), "مرح");
    }

    #[test]
    fn test_enabled_matrix() {
        let config = NormalizerConfig::default();
        assert!(Stage::UnicodeCanonicalization.is_enabled(&config));
        assert!(Stage::NoiseRemoval.is_enabled(&config));
        assert!(!Stage::NumeralHandling.is_enabled(&config));
        assert!(!Stage::LatinRemoval.is_enabled(&config));
        assert!(!Stage::DialectSpelling.is_enabled(&config));
        assert!(Stage::WhitespaceNormalization.is_enabled(&config));
    }
}
