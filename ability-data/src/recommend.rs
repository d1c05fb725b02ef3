//! Dataset adequacy findings derived from a diversity report.

use serde::Serialize;

use crate::analysis::{ActionAnalysis, ElementAnalysis};
use crate::config::RecommendationConfig;

/// How far the dataset is from the fine-tuning sample size targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SampleSize {
    TooSmall {
        current: usize,
        minimum: usize,
        robust: usize,
        ideal: usize,
    },
    LowEnd {
        current: usize,
        robust: usize,
    },
    Adequate {
        current: usize,
    },
}

/// One actionable finding.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Recommendation {
    SampleSize(SampleSize),
    ThinElementCoverage {
        avg_samples: f64,
        target_low: usize,
        target_high: usize,
    },
    UnevenElements {
        evenness_percent: f64,
    },
    LowSequenceDiversity {
        diversity_percent: f64,
    },
}

impl Recommendation {
    /// Whether the finding is good news rather than a warning.
    #[must_use]
    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::SampleSize(SampleSize::Adequate { .. }))
    }
}

#[must_use]
pub fn sample_size(total: usize, config: &RecommendationConfig) -> SampleSize {
    if total < config.min_samples {
        SampleSize::TooSmall {
            current: total,
            minimum: config.min_samples,
            robust: config.robust_samples,
            ideal: config.ideal_samples,
        }
    } else if total < config.robust_samples {
        SampleSize::LowEnd {
            current: total,
            robust: config.robust_samples,
        }
    } else {
        SampleSize::Adequate { current: total }
    }
}

/// All findings for a dataset, sample size first.
#[must_use]
pub fn recommendations(
    total: usize,
    elements: &ElementAnalysis,
    actions: &ActionAnalysis,
    config: &RecommendationConfig,
) -> Vec<Recommendation> {
    let mut findings = vec![Recommendation::SampleSize(sample_size(total, config))];

    if elements.avg_samples < config.min_samples_per_pair {
        let (target_low, target_high) = config.target_samples_per_pair;
        findings.push(Recommendation::ThinElementCoverage {
            avg_samples: elements.avg_samples,
            target_low,
            target_high,
        });
    }
    if elements.evenness_percent < config.min_evenness_percent {
        findings.push(Recommendation::UnevenElements {
            evenness_percent: elements.evenness_percent,
        });
    }
    if actions.sequence_diversity_percent < config.min_sequence_diversity_percent {
        findings.push(Recommendation::LowSequenceDiversity {
            diversity_percent: actions.sequence_diversity_percent,
        });
    }
    findings
}
