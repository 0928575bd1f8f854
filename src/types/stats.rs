//! Derived statistics for a single normalization pass.

use serde::{Deserialize, Serialize};

/// Before/after measurements for one normalized text.
///
/// Computed once per text and never mutated. Lengths count Unicode scalar
/// values; words are whitespace-separated runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizationStats {
    /// Length of the original text in chars
    pub original_length: usize,

    /// Length of the normalized text in chars
    pub normalized_length: usize,

    /// Fraction of the original removed: `1 - normalized/original`,
    /// 0 when the original is empty
    pub compression_ratio: f64,

    /// Word count of the original text
    pub original_words: usize,

    /// Word count of the normalized text
    pub normalized_words: usize,

    /// Net chars removed; negative when normalization lengthened the text
    /// (e.g. an ellipsis expanding to three dots)
    pub removed_chars: i64,
}

impl NormalizationStats {
    /// Measure a text against its normalized form.
    pub fn from_texts(original: &str, normalized: &str) -> Self {
        let original_length = original.chars().count();
        let normalized_length = normalized.chars().count();

        let compression_ratio = if original_length > 0 {
            1.0 - normalized_length as f64 / original_length as f64
        } else {
            0.0
        };

        Self {
            original_length,
            normalized_length,
            compression_ratio,
            original_words: original.split_whitespace().count(),
            normalized_words: normalized.split_whitespace().count(),
            removed_chars: original_length as i64 - normalized_length as i64,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_measurement() {
        let stats = NormalizationStats::from_texts("مرحبا بيك يا زول", "مرحبا بيك");

        assert_eq!(stats.original_length, 16);
        assert_eq!(stats.normalized_length, 9);
        assert_eq!(stats.original_words, 4);
        assert_eq!(stats.normalized_words, 2);
        assert_eq!(stats.removed_chars, 7);
        assert!((stats.compression_ratio - 7.0 / 16.0).abs() < 1e-9);
    }

    #[test]
    fn test_empty_original() {
        let stats = NormalizationStats::from_texts("", "");

        assert_eq!(stats.original_length, 0);
        assert_eq!(stats.compression_ratio, 0.0);
        assert_eq!(stats.removed_chars, 0);
    }

    #[test]
    fn test_lengthened_text_goes_negative() {
        // An ellipsis can expand to three dots under punctuation mapping
        let stats = NormalizationStats::from_texts("…", "...");

        assert_eq!(stats.removed_chars, -2);
        assert!(stats.compression_ratio < 0.0);
    }
}
