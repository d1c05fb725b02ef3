//! Tunable reference counts and thresholds for scoring and recommendations.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants;
use crate::numbers::pair_count;

/// Errors raised when analysis configuration invariants are violated.
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{field} must be at least {min} (got {value})")]
    MinViolation {
        field: &'static str,
        min: usize,
        value: usize,
    },
    #[error("verdict thresholds must descend: excellent {excellent:.1} > good {good:.1} > moderate {moderate:.1}")]
    VerdictOrder {
        excellent: f64,
        good: f64,
        moderate: f64,
    },
    #[error("sample size thresholds must ascend: minimum {minimum} <= robust {robust} <= ideal {ideal}")]
    SampleSizeOrder {
        minimum: usize,
        robust: usize,
        ideal: usize,
    },
    #[error("{field} must be between 0 and 100 (got {value:.1})")]
    PercentRange { field: &'static str, value: f64 },
    #[error("failed to parse analysis config: {0}")]
    Parse(String),
}

/// Score boundaries for each qualitative verdict.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerdictThresholds {
    #[serde(default = "VerdictThresholds::default_excellent")]
    pub excellent: f64,
    #[serde(default = "VerdictThresholds::default_good")]
    pub good: f64,
    #[serde(default = "VerdictThresholds::default_moderate")]
    pub moderate: f64,
}

impl VerdictThresholds {
    const fn default_excellent() -> f64 {
        constants::VERDICT_EXCELLENT
    }

    const fn default_good() -> f64 {
        constants::VERDICT_GOOD
    }

    const fn default_moderate() -> f64 {
        constants::VERDICT_MODERATE
    }
}

impl Default for VerdictThresholds {
    fn default() -> Self {
        Self {
            excellent: Self::default_excellent(),
            good: Self::default_good(),
            moderate: Self::default_moderate(),
        }
    }
}

/// Reference counts used to normalize sub-scores.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoringConfig {
    /// Number of element tags; coverage is measured against `C(n, 2)` pairs.
    #[serde(default = "ScoringConfig::default_alphabet_size")]
    pub alphabet_size: usize,
    /// Assumed count of distinct complexity levels a healthy dataset spans.
    #[serde(default = "ScoringConfig::default_complexity_levels")]
    pub complexity_levels: usize,
    /// Assumed count of possible status effects.
    #[serde(default = "ScoringConfig::default_status_types")]
    pub status_types: usize,
    #[serde(default)]
    pub verdict: VerdictThresholds,
}

impl ScoringConfig {
    const fn default_alphabet_size() -> usize {
        constants::ELEMENT_ALPHABET_SIZE
    }

    const fn default_complexity_levels() -> usize {
        constants::COMPLEXITY_LEVELS
    }

    const fn default_status_types() -> usize {
        constants::STATUS_TYPES
    }

    /// Number of possible element pairs for the configured alphabet.
    #[must_use]
    pub const fn max_pairs(&self) -> usize {
        pair_count(self.alphabet_size)
    }
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            alphabet_size: Self::default_alphabet_size(),
            complexity_levels: Self::default_complexity_levels(),
            status_types: Self::default_status_types(),
            verdict: VerdictThresholds::default(),
        }
    }
}

/// Thresholds that trigger dataset adequacy recommendations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationConfig {
    #[serde(default = "RecommendationConfig::default_min_samples")]
    pub min_samples: usize,
    #[serde(default = "RecommendationConfig::default_robust_samples")]
    pub robust_samples: usize,
    #[serde(default = "RecommendationConfig::default_ideal_samples")]
    pub ideal_samples: usize,
    #[serde(default = "RecommendationConfig::default_min_samples_per_pair")]
    pub min_samples_per_pair: f64,
    #[serde(default = "RecommendationConfig::default_target_samples_per_pair")]
    pub target_samples_per_pair: (usize, usize),
    #[serde(default = "RecommendationConfig::default_min_evenness")]
    pub min_evenness_percent: f64,
    #[serde(default = "RecommendationConfig::default_min_sequence_diversity")]
    pub min_sequence_diversity_percent: f64,
}

impl RecommendationConfig {
    const fn default_min_samples() -> usize {
        constants::SAMPLE_SIZE_MINIMUM
    }

    const fn default_robust_samples() -> usize {
        constants::SAMPLE_SIZE_ROBUST
    }

    const fn default_ideal_samples() -> usize {
        constants::SAMPLE_SIZE_IDEAL
    }

    const fn default_min_samples_per_pair() -> f64 {
        constants::SAMPLES_PER_PAIR_MINIMUM
    }

    const fn default_target_samples_per_pair() -> (usize, usize) {
        (
            constants::SAMPLES_PER_PAIR_TARGET_LOW,
            constants::SAMPLES_PER_PAIR_TARGET_HIGH,
        )
    }

    const fn default_min_evenness() -> f64 {
        constants::EVENNESS_MINIMUM
    }

    const fn default_min_sequence_diversity() -> f64 {
        constants::SEQUENCE_DIVERSITY_MINIMUM
    }
}

impl Default for RecommendationConfig {
    fn default() -> Self {
        Self {
            min_samples: Self::default_min_samples(),
            robust_samples: Self::default_robust_samples(),
            ideal_samples: Self::default_ideal_samples(),
            min_samples_per_pair: Self::default_min_samples_per_pair(),
            target_samples_per_pair: Self::default_target_samples_per_pair(),
            min_evenness_percent: Self::default_min_evenness(),
            min_sequence_diversity_percent: Self::default_min_sequence_diversity(),
        }
    }
}

/// Complete analysis configuration; every field has a default.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(default)]
    pub recommendations: RecommendationConfig,
}

impl AnalysisConfig {
    /// Parse a JSON configuration document and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self =
            serde_json::from_str(json).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check range and ordering invariants.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scoring = &self.scoring;
        ensure_min("scoring.alphabet_size", 2, scoring.alphabet_size)?;
        ensure_min("scoring.complexity_levels", 2, scoring.complexity_levels)?;
        ensure_min("scoring.status_types", 1, scoring.status_types)?;

        let verdict = &scoring.verdict;
        for (field, value) in [
            ("scoring.verdict.excellent", verdict.excellent),
            ("scoring.verdict.good", verdict.good),
            ("scoring.verdict.moderate", verdict.moderate),
        ] {
            ensure_percent(field, value)?;
        }
        if !(verdict.excellent > verdict.good && verdict.good > verdict.moderate) {
            return Err(ConfigError::VerdictOrder {
                excellent: verdict.excellent,
                good: verdict.good,
                moderate: verdict.moderate,
            });
        }

        let recs = &self.recommendations;
        if !(recs.min_samples <= recs.robust_samples && recs.robust_samples <= recs.ideal_samples) {
            return Err(ConfigError::SampleSizeOrder {
                minimum: recs.min_samples,
                robust: recs.robust_samples,
                ideal: recs.ideal_samples,
            });
        }
        ensure_percent(
            "recommendations.min_evenness_percent",
            recs.min_evenness_percent,
        )?;
        ensure_percent(
            "recommendations.min_sequence_diversity_percent",
            recs.min_sequence_diversity_percent,
        )?;
        Ok(())
    }
}

fn ensure_min(field: &'static str, min: usize, value: usize) -> Result<(), ConfigError> {
    if value < min {
        return Err(ConfigError::MinViolation { field, min, value });
    }
    Ok(())
}

fn ensure_percent(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(ConfigError::PercentRange { field, value });
    }
    Ok(())
}
