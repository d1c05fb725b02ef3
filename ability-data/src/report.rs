//! The complete structured output of one analysis run.

use serde::Serialize;

use crate::analysis::{
    ActionAnalysis, ComplexityAnalysis, ElementAnalysis, MeleeAnalysis, ParameterAnalysis,
    StatusAnalysis, analyze_actions, analyze_complexity, analyze_elements, analyze_melee,
    analyze_parameters, analyze_status_effects,
};
use crate::config::AnalysisConfig;
use crate::model::AbilityRecord;
use crate::recommend::{Recommendation, recommendations};
use crate::score::{DiversityScore, overall_score};

/// Everything a renderer needs; no other data source is consulted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiversityReport {
    pub total_entries: usize,
    pub elements: ElementAnalysis,
    pub actions: ActionAnalysis,
    pub melee: Option<MeleeAnalysis>,
    pub status_effects: StatusAnalysis,
    pub complexity: ComplexityAnalysis,
    pub parameters: ParameterAnalysis,
    pub score: DiversityScore,
    pub recommendations: Vec<Recommendation>,
}

/// Run every analysis over `records`.
#[must_use]
pub fn analyze(records: &[AbilityRecord], config: &AnalysisConfig) -> DiversityReport {
    log::debug!("analyzing {} ability records", records.len());
    let elements = analyze_elements(records, &config.scoring);
    let actions = analyze_actions(records);
    let melee = analyze_melee(records);
    let status_effects = analyze_status_effects(records);
    let complexity = analyze_complexity(records);
    let parameters = analyze_parameters(records);

    let score = overall_score(
        &elements,
        &actions,
        &status_effects,
        &complexity,
        &config.scoring,
    );
    let recommendations = recommendations(
        records.len(),
        &elements,
        &actions,
        &config.recommendations,
    );
    log::info!(
        "diversity score {:.1} ({}) over {} records",
        score.overall,
        score.verdict,
        records.len()
    );

    DiversityReport {
        total_entries: records.len(),
        elements,
        actions,
        melee,
        status_effects,
        complexity,
        parameters,
        score,
        recommendations,
    }
}
