//! The Sudanese Arabic normalization pipeline.

mod arabic;
mod patterns;
mod stages;

pub use arabic::{is_arabic, is_diacritic};
pub use stages::Stage;

use tracing::debug;

use crate::error::NormalizerError;
use crate::types::{NormalizationStats, NormalizerConfig};

/// Applies the configured normalization stages to Sudanese Arabic text.
///
/// A `Normalizer` validates its [`NormalizerConfig`] once at construction
/// and is immutable afterwards, so it can be shared freely across tasks.
/// Normalization itself is pure: the same input and configuration always
/// produce the same output.
#[derive(Debug, Clone)]
pub struct Normalizer {
    config: NormalizerConfig,
}

impl Normalizer {
    /// Build a normalizer, rejecting contradictory configurations.
    pub fn new(config: NormalizerConfig) -> Result<Self, NormalizerError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The validated configuration this normalizer runs.
    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalize a single text through every enabled stage, in order.
    ///
    /// Whitespace-only input short-circuits to the empty string, which is
    /// also the marker for text rejected by the length filter. The output
    /// never carries leading or trailing whitespace.
    pub fn normalize(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }
        let mut current = text.to_string();
        for stage in Stage::ORDER {
            if !stage.is_enabled(&self.config) {
                continue;
            }
            current = stage.apply(&current, &self.config);
            debug!(stage = %stage, chars = current.chars().count(), "Stage applied");
            if current.is_empty() {
                break;
            }
        }
        current.trim().to_string()
    }

    /// Normalize a slice of texts, preserving order.
    pub fn normalize_many<'a, I>(&self, texts: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        texts.into_iter().map(|t| self.normalize(t)).collect()
    }

    /// Normalize a text and report before/after statistics.
    pub fn normalize_with_stats(&self, text: &str) -> (String, NormalizationStats) {
        let normalized = self.normalize(text);
        let stats = NormalizationStats::from_texts(text, &normalized);
        (normalized, stats)
    }
}
