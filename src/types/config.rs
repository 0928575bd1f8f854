//! Normalization configuration.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NormalizerError;
use crate::DEFAULT_MAX_CHAR_REPEAT;

/// Canonical Unicode normalization form applied before any other stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnicodeForm {
    /// Canonical decomposition followed by canonical composition
    Nfc,
    /// Canonical decomposition
    Nfd,
    /// Compatibility decomposition followed by canonical composition
    Nfkc,
    /// Compatibility decomposition
    Nfkd,
}

impl std::fmt::Display for UnicodeForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnicodeForm::Nfc => write!(f, "nfc"),
            UnicodeForm::Nfd => write!(f, "nfd"),
            UnicodeForm::Nfkc => write!(f, "nfkc"),
            UnicodeForm::Nfkd => write!(f, "nfkd"),
        }
    }
}

impl FromStr for UnicodeForm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "nfc" => Ok(UnicodeForm::Nfc),
            "nfd" => Ok(UnicodeForm::Nfd),
            "nfkc" => Ok(UnicodeForm::Nfkc),
            "nfkd" => Ok(UnicodeForm::Nfkd),
            other => Err(format!("unknown unicode form: {}", other)),
        }
    }
}

/// Configuration for text normalization.
///
/// All toggles are independent; the stage order they feed is fixed (see
/// [`crate::pipeline::Stage::ORDER`]). A configuration is validated once,
/// when a [`crate::pipeline::Normalizer`] is built from it, and is never
/// mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizerConfig {
    /// Unicode normalization form applied first
    pub unicode_form: UnicodeForm,

    /// Remove Arabic diacritics (tashkeel)
    pub remove_diacritics: bool,

    /// Keep shadda (U+0651) even when removing diacritics
    pub keep_shadda: bool,

    /// Fold all alef variants to bare alef (ا)
    pub fold_alef: bool,

    /// Fold yeh variants to ي; also folds the hamza carriers ئ→ي and ؤ→و
    pub fold_yeh: bool,

    /// Fold teh marbuta (ة) to heh (ه)
    pub fold_teh_marbuta: bool,

    /// Remove tatweel/kashida (U+0640), including decorative runs
    pub remove_tatweel: bool,

    /// Map Arabic and typographic punctuation to ASCII equivalents
    pub normalize_punctuation: bool,

    /// Collapse runs of identical punctuation (!!! -> !)
    pub collapse_repeated_punctuation: bool,

    /// Collapse runs of whitespace to a single space and trim
    pub normalize_whitespace: bool,

    /// Convert Arabic-Indic and Extended Arabic-Indic digits to ASCII
    pub convert_numerals: bool,

    /// Delete all digit characters instead (mutually exclusive with
    /// `convert_numerals`)
    pub remove_numerals: bool,

    /// Remove URLs
    pub remove_urls: bool,

    /// Remove email addresses
    pub remove_emails: bool,

    /// Remove @mentions
    pub remove_mentions: bool,

    /// Remove #hashtags (kept by default)
    pub remove_hashtags: bool,

    /// Remove maximal runs of Latin letters, keeping digits
    pub remove_latin: bool,

    /// Remove timestamps (clock, date, ISO-8601, epoch-like digit runs)
    pub remove_timestamps: bool,

    /// Strip HTML/XML tags
    pub remove_html_tags: bool,

    /// Remove characters outside the kept alphabet (Arabic letters, ASCII
    /// alphanumerics, whitespace, common punctuation)
    pub remove_special_chars: bool,

    /// When removing special characters, keep Arabic punctuation (؟ ، ؛)
    pub preserve_arabic_punctuation: bool,

    /// Rewrite common Sudanese colloquial spellings to canonical forms
    pub normalize_dialect: bool,

    /// Minimum output length in chars; shorter results are rejected as empty
    pub min_length: usize,

    /// Maximum output length in chars; longer results keep only the prefix
    pub max_length: Option<usize>,

    /// Collapse runs of repeated characters
    pub collapse_repeated_chars: bool,

    /// Longest run of one character allowed to survive collapsing
    pub max_char_repeat: usize,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            unicode_form: UnicodeForm::Nfkc,
            remove_diacritics: true,
            keep_shadda: false,
            fold_alef: true,
            fold_yeh: true,
            fold_teh_marbuta: true,
            remove_tatweel: true,
            normalize_punctuation: true,
            collapse_repeated_punctuation: true,
            normalize_whitespace: true,
            convert_numerals: false,
            remove_numerals: false,
            remove_urls: true,
            remove_emails: true,
            remove_mentions: true,
            remove_hashtags: false,
            remove_latin: false,
            remove_timestamps: true,
            remove_html_tags: false,
            remove_special_chars: false,
            preserve_arabic_punctuation: false,
            normalize_dialect: false,
            min_length: 0,
            max_length: None,
            collapse_repeated_chars: true,
            max_char_repeat: DEFAULT_MAX_CHAR_REPEAT,
        }
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl NormalizerConfig {
    /// Load configuration from `SUDANORM_*` environment variables, falling
    /// back to the defaults for anything unset or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            unicode_form: env_parse("SUDANORM_UNICODE_FORM", defaults.unicode_form),
            remove_diacritics: env_parse("SUDANORM_REMOVE_DIACRITICS", defaults.remove_diacritics),
            keep_shadda: env_parse("SUDANORM_KEEP_SHADDA", defaults.keep_shadda),
            fold_alef: env_parse("SUDANORM_FOLD_ALEF", defaults.fold_alef),
            fold_yeh: env_parse("SUDANORM_FOLD_YEH", defaults.fold_yeh),
            fold_teh_marbuta: env_parse("SUDANORM_FOLD_TEH_MARBUTA", defaults.fold_teh_marbuta),
            remove_tatweel: env_parse("SUDANORM_REMOVE_TATWEEL", defaults.remove_tatweel),
            normalize_punctuation: env_parse(
                "SUDANORM_NORMALIZE_PUNCTUATION",
                defaults.normalize_punctuation,
            ),
            collapse_repeated_punctuation: env_parse(
                "SUDANORM_COLLAPSE_REPEATED_PUNCTUATION",
                defaults.collapse_repeated_punctuation,
            ),
            normalize_whitespace: env_parse(
                "SUDANORM_NORMALIZE_WHITESPACE",
                defaults.normalize_whitespace,
            ),
            convert_numerals: env_parse("SUDANORM_CONVERT_NUMERALS", defaults.convert_numerals),
            remove_numerals: env_parse("SUDANORM_REMOVE_NUMERALS", defaults.remove_numerals),
            remove_urls: env_parse("SUDANORM_REMOVE_URLS", defaults.remove_urls),
            remove_emails: env_parse("SUDANORM_REMOVE_EMAILS", defaults.remove_emails),
            remove_mentions: env_parse("SUDANORM_REMOVE_MENTIONS", defaults.remove_mentions),
            remove_hashtags: env_parse("SUDANORM_REMOVE_HASHTAGS", defaults.remove_hashtags),
            remove_latin: env_parse("SUDANORM_REMOVE_LATIN", defaults.remove_latin),
            remove_timestamps: env_parse("SUDANORM_REMOVE_TIMESTAMPS", defaults.remove_timestamps),
            remove_html_tags: env_parse("SUDANORM_REMOVE_HTML_TAGS", defaults.remove_html_tags),
            remove_special_chars: env_parse(
                "SUDANORM_REMOVE_SPECIAL_CHARS",
                defaults.remove_special_chars,
            ),
            preserve_arabic_punctuation: env_parse(
                "SUDANORM_PRESERVE_ARABIC_PUNCTUATION",
                defaults.preserve_arabic_punctuation,
            ),
            normalize_dialect: env_parse("SUDANORM_NORMALIZE_DIALECT", defaults.normalize_dialect),
            min_length: env_parse("SUDANORM_MIN_LENGTH", defaults.min_length),
            max_length: std::env::var("SUDANORM_MAX_LENGTH")
                .ok()
                .and_then(|s| s.parse().ok()),
            collapse_repeated_chars: env_parse(
                "SUDANORM_COLLAPSE_REPEATED_CHARS",
                defaults.collapse_repeated_chars,
            ),
            max_char_repeat: env_parse("SUDANORM_MAX_CHAR_REPEAT", defaults.max_char_repeat),
        }
    }

    /// Set the repeated-character cap.
    pub fn with_max_char_repeat(mut self, cap: usize) -> Self {
        self.max_char_repeat = cap;
        self
    }

    /// Set the output length bounds.
    pub fn with_length_bounds(mut self, min: usize, max: Option<usize>) -> Self {
        self.min_length = min;
        self.max_length = max;
        self
    }

    /// Check the configuration for contradictory or out-of-range options.
    ///
    /// Called once when a pipeline is constructed; no text or file is
    /// processed under a configuration that fails here.
    pub fn validate(&self) -> Result<(), NormalizerError> {
        if self.convert_numerals && self.remove_numerals {
            return Err(NormalizerError::Configuration(
                "convert_numerals and remove_numerals are mutually exclusive".to_string(),
            ));
        }

        if self.max_char_repeat == 0 {
            return Err(NormalizerError::Configuration(
                "max_char_repeat must be at least 1".to_string(),
            ));
        }

        if let Some(max) = self.max_length {
            if max < self.min_length {
                return Err(NormalizerError::Configuration(format!(
                    "max_length ({}) is below min_length ({})",
                    max, self.min_length
                )));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = NormalizerConfig::default();

        assert!(config.validate().is_ok());
        assert_eq!(config.unicode_form, UnicodeForm::Nfkc);
        assert!(config.remove_diacritics);
        assert!(!config.keep_shadda);
        assert!(config.remove_urls);
        assert!(!config.remove_hashtags);
        assert!(!config.convert_numerals);
        assert_eq!(config.max_char_repeat, 2);
        assert_eq!(config.min_length, 0);
        assert_eq!(config.max_length, None);
    }

    #[test]
    fn test_both_numeral_flags_rejected() {
        let config = NormalizerConfig {
            convert_numerals: true,
            remove_numerals: true,
            ..Default::default()
        };

        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("mutually exclusive"));
    }

    #[test]
    fn test_zero_repeat_cap_rejected() {
        let config = NormalizerConfig::default().with_max_char_repeat(0);
        assert!(config.validate().is_err());

        // The cap is out of range even when collapsing is off
        let config = NormalizerConfig {
            collapse_repeated_chars: false,
            max_char_repeat: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_length_bounds() {
        let config = NormalizerConfig::default().with_length_bounds(10, Some(5));
        assert!(config.validate().is_err());

        let config = NormalizerConfig::default().with_length_bounds(5, Some(5));
        assert!(config.validate().is_ok());

        let config = NormalizerConfig::default().with_length_bounds(100, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unicode_form_parsing() {
        assert_eq!("nfc".parse::<UnicodeForm>().unwrap(), UnicodeForm::Nfc);
        assert_eq!("NFKC".parse::<UnicodeForm>().unwrap(), UnicodeForm::Nfkc);
        assert_eq!("Nfd".parse::<UnicodeForm>().unwrap(), UnicodeForm::Nfd);
        assert!("latin-1".parse::<UnicodeForm>().is_err());
        assert_eq!(UnicodeForm::Nfkd.to_string(), "nfkd");
    }

    #[test]
    fn test_config_round_trips_as_json() {
        let config = NormalizerConfig {
            convert_numerals: true,
            remove_hashtags: true,
            max_length: Some(280),
            ..Default::default()
        };

        let json = serde_json::to_string(&config).unwrap();
        let back: NormalizerConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(config, back);
    }
}
