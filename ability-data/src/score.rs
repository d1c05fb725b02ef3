//! Composite diversity score and its qualitative verdict.

use serde::Serialize;
use std::fmt;

use crate::analysis::{ActionAnalysis, ComplexityAnalysis, ElementAnalysis, StatusAnalysis};
use crate::config::{ScoringConfig, VerdictThresholds};
use crate::numbers::count_to_f64;
use crate::stats::max_entropy;

/// Qualitative reading of the overall score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Excellent,
    Good,
    Moderate,
    Low,
}

impl Verdict {
    #[must_use]
    pub fn from_score(score: f64, thresholds: &VerdictThresholds) -> Self {
        if score >= thresholds.excellent {
            Self::Excellent
        } else if score >= thresholds.good {
            Self::Good
        } else if score >= thresholds.moderate {
            Self::Moderate
        } else {
            Self::Low
        }
    }

    #[must_use]
    pub const fn summary(self) -> &'static str {
        match self {
            Self::Excellent => "High diversity",
            Self::Good => "Acceptable diversity",
            Self::Moderate => "Could use more variety",
            Self::Low => "Needs significant expansion",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Excellent => write!(f, "EXCELLENT"),
            Self::Good => write!(f, "GOOD"),
            Self::Moderate => write!(f, "MODERATE"),
            Self::Low => write!(f, "LOW"),
        }
    }
}

/// The five normalized sub-scores and their mean.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiversityScore {
    pub element_coverage: f64,
    pub element_evenness: f64,
    pub sequence_diversity: f64,
    pub complexity: f64,
    pub status_coverage: f64,
    pub overall: f64,
    pub verdict: Verdict,
}

impl DiversityScore {
    #[must_use]
    pub fn components(&self) -> [(&'static str, f64); 5] {
        [
            ("element coverage", self.element_coverage),
            ("element evenness", self.element_evenness),
            ("sequence diversity", self.sequence_diversity),
            ("complexity variety", self.complexity),
            ("status coverage", self.status_coverage),
        ]
    }
}

/// Combine dimension results into a 0-100 score.
#[must_use]
pub fn overall_score(
    elements: &ElementAnalysis,
    actions: &ActionAnalysis,
    status: &StatusAnalysis,
    complexity: &ComplexityAnalysis,
    config: &ScoringConfig,
) -> DiversityScore {
    let reference_entropy = max_entropy(config.complexity_levels);
    let complexity_score = if reference_entropy > 0.0 {
        (complexity.complexity_entropy / reference_entropy * 100.0).min(100.0)
    } else {
        0.0
    };
    let status_score = if config.status_types == 0 {
        0.0
    } else {
        (count_to_f64(status.unique_statuses) / count_to_f64(config.status_types) * 100.0)
            .min(100.0)
    };

    let components = [
        elements.coverage_percent,
        elements.evenness_percent,
        actions.sequence_diversity_percent,
        complexity_score,
        status_score,
    ];
    let overall = components.iter().sum::<f64>() / count_to_f64(components.len());

    DiversityScore {
        element_coverage: elements.coverage_percent,
        element_evenness: elements.evenness_percent,
        sequence_diversity: actions.sequence_diversity_percent,
        complexity: complexity_score,
        status_coverage: status_score,
        overall,
        verdict: Verdict::from_score(overall, &config.verdict),
    }
}
