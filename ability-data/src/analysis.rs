//! Per-dimension diversity analyses over a recovered record collection.
//!
//! Every analysis is a pure function of the records; none depends on another
//! so they can run in any order.

use serde::Serialize;

use crate::config::ScoringConfig;
use crate::constants::{ACTION_APPLY_STATUS, ACTION_DAMAGE, ACTION_SPAWN_MELEE};
use crate::model::{AbilityRecord, ElementPair};
use crate::numbers::{mean_of_counts, percent};
use crate::stats::{Distribution, ValueStats};
use crate::walker::{max_depth, walk_record};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ElementAnalysis {
    pub unique_combinations: usize,
    pub max_possible: usize,
    pub coverage_percent: f64,
    pub distribution: Distribution<ElementPair>,
    pub entropy: f64,
    pub max_entropy: f64,
    pub evenness_percent: f64,
    pub min_samples: usize,
    pub max_samples: usize,
    pub avg_samples: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActionAnalysis {
    pub action_distribution: Distribution<String>,
    pub unique_actions: usize,
    pub entropy: f64,
    pub unique_sequences: usize,
    pub sequence_entropy: f64,
    pub sequence_diversity_percent: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MeleeAnalysis {
    pub shapes: Distribution<String>,
    pub movements: Distribution<String>,
    pub shape_movement_combos: Distribution<(String, String)>,
    pub shape_entropy: f64,
    pub movement_entropy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusAnalysis {
    pub distribution: Distribution<String>,
    pub unique_statuses: usize,
    pub entropy: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplexityAnalysis {
    pub avg_scripts_per_ability: f64,
    pub min_scripts: usize,
    pub max_scripts: usize,
    pub avg_nesting_depth: f64,
    pub min_nesting_depth: usize,
    pub max_nesting_depth: usize,
    pub complexity_entropy: f64,
    /// Per-record `(top-level script count, max nesting depth)`, in record order.
    #[serde(skip)]
    pub per_record: Vec<(usize, usize)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterAnalysis {
    pub damage: Option<ValueStats>,
    pub duration: Option<ValueStats>,
    pub cooldown: Option<ValueStats>,
}

impl ParameterAnalysis {
    /// Named collections in report order.
    #[must_use]
    pub fn entries(&self) -> [(&'static str, Option<&ValueStats>); 3] {
        [
            ("damage", self.damage.as_ref()),
            ("duration", self.duration.as_ref()),
            ("cooldown", self.cooldown.as_ref()),
        ]
    }
}

/// Element pair coverage and balance.
#[must_use]
pub fn analyze_elements(records: &[AbilityRecord], scoring: &ScoringConfig) -> ElementAnalysis {
    let distribution: Distribution<ElementPair> = records
        .iter()
        .map(|record| record.ability.element_pair())
        .collect();
    let max_possible = scoring.max_pairs();
    ElementAnalysis {
        unique_combinations: distribution.unique(),
        max_possible,
        coverage_percent: percent(distribution.unique(), max_possible),
        entropy: distribution.entropy(),
        max_entropy: distribution.max_entropy(),
        evenness_percent: distribution.evenness_percent(),
        min_samples: distribution.min_count(),
        max_samples: distribution.max_count(),
        avg_samples: distribution.mean_count(),
        distribution,
    }
}

/// Top-level action tallies and per-record action sequences.
///
/// Only the top level of each effect script is counted; `on_hit` follow-ups
/// are not part of a record's action sequence.
#[must_use]
pub fn analyze_actions(records: &[AbilityRecord]) -> ActionAnalysis {
    let mut actions: Distribution<String> = Distribution::default();
    let mut sequences: Distribution<Vec<String>> = Distribution::default();

    for record in records {
        let sequence: Vec<String> = record
            .ability
            .top_level_nodes()
            .map(|node| node.action.clone())
            .collect();
        for action in &sequence {
            actions.record(action.clone());
        }
        sequences.record(sequence);
    }

    ActionAnalysis {
        unique_actions: actions.unique(),
        entropy: actions.entropy(),
        action_distribution: actions,
        unique_sequences: sequences.unique(),
        sequence_entropy: sequences.entropy(),
        sequence_diversity_percent: percent(sequences.unique(), records.len()),
    }
}

/// Shape and movement variety of top-level melee spawns, `None` without any.
#[must_use]
pub fn analyze_melee(records: &[AbilityRecord]) -> Option<MeleeAnalysis> {
    let mut shapes = Distribution::default();
    let mut movements = Distribution::default();
    let mut combos = Distribution::default();

    let melee_nodes = records
        .iter()
        .flat_map(|record| record.ability.top_level_nodes())
        .filter(|node| node.is(ACTION_SPAWN_MELEE));
    for node in melee_nodes {
        let shape = node.shape().to_string();
        let movement = node.movement().to_string();
        shapes.record(shape.clone());
        movements.record(movement.clone());
        combos.record((shape, movement));
    }

    if shapes.is_empty() {
        return None;
    }
    Some(MeleeAnalysis {
        shape_entropy: shapes.entropy(),
        movement_entropy: movements.entropy(),
        shapes,
        movements,
        shape_movement_combos: combos,
    })
}

/// Status effects applied anywhere in the script trees.
#[must_use]
pub fn analyze_status_effects(records: &[AbilityRecord]) -> StatusAnalysis {
    let distribution: Distribution<String> = records
        .iter()
        .flat_map(walk_record)
        .filter(|step| step.node.is(ACTION_APPLY_STATUS))
        .map(|step| step.node.status().to_string())
        .collect();
    StatusAnalysis {
        unique_statuses: distribution.unique(),
        entropy: distribution.entropy(),
        distribution,
    }
}

/// Script length and `on_hit` nesting per record.
#[must_use]
pub fn analyze_complexity(records: &[AbilityRecord]) -> ComplexityAnalysis {
    let per_record: Vec<(usize, usize)> = records
        .iter()
        .map(|record| (record.ability.top_level_nodes().count(), max_depth(record)))
        .collect();
    let script_counts: Vec<usize> = per_record.iter().map(|&(scripts, _)| scripts).collect();
    let depths: Vec<usize> = per_record.iter().map(|&(_, depth)| depth).collect();
    let distribution: Distribution<usize> = script_counts.iter().copied().collect();

    ComplexityAnalysis {
        avg_scripts_per_ability: mean_of_counts(&script_counts),
        min_scripts: script_counts.iter().copied().min().unwrap_or(0),
        max_scripts: script_counts.iter().copied().max().unwrap_or(0),
        avg_nesting_depth: mean_of_counts(&depths),
        min_nesting_depth: depths.iter().copied().min().unwrap_or(0),
        max_nesting_depth: depths.iter().copied().max().unwrap_or(0),
        complexity_entropy: distribution.entropy(),
        per_record,
    }
}

/// Damage amounts, status durations (full tree) and cooldowns (one per record).
#[must_use]
pub fn analyze_parameters(records: &[AbilityRecord]) -> ParameterAnalysis {
    let mut damage = Vec::new();
    let mut duration = Vec::new();
    let mut cooldown = Vec::with_capacity(records.len());

    for record in records {
        cooldown.push(record.ability.cooldown());
        for step in walk_record(record) {
            if step.node.is(ACTION_DAMAGE) {
                damage.push(step.node.amount());
            }
            if step.node.is(ACTION_APPLY_STATUS) {
                duration.push(step.node.duration());
            }
        }
    }

    ParameterAnalysis {
        damage: ValueStats::from_values(&damage),
        duration: ValueStats::from_values(&duration),
        cooldown: ValueStats::from_values(&cooldown),
    }
}
