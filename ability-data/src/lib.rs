//! Ability Training Data
//!
//! Recovery and diversity analysis for machine-generated ability corpora.
//! This crate holds every rule about what a valid ability looks like and how
//! variety is measured; it performs no terminal output of its own.

pub mod analysis;
pub mod config;
pub mod constants;
pub mod corpus;
pub mod extract;
pub mod model;
pub mod numbers;
pub mod recommend;
pub mod recover;
pub mod report;
pub mod score;
pub mod stats;
pub mod validate;
pub mod walker;

// Re-export commonly used types
pub use analysis::{
    ActionAnalysis, ComplexityAnalysis, ElementAnalysis, MeleeAnalysis, ParameterAnalysis,
    StatusAnalysis,
};
pub use config::{AnalysisConfig, ConfigError, RecommendationConfig, ScoringConfig};
pub use corpus::{
    CorpusError, Dataset, DatasetSource, RepairOutcome, RepairSummary, load_dataset, read_corpus,
    repair, write_records,
};
pub use extract::{CandidateSpan, candidate_spans};
pub use model::{Ability, AbilityRecord, Effect, ElementPair, ScriptNode};
pub use recommend::{Recommendation, SampleSize};
pub use recover::{Recovery, RecoveryError, Rejection, recover};
pub use report::{DiversityReport, analyze};
pub use score::{DiversityScore, Verdict};
pub use stats::{Distribution, ValueStats};
pub use validate::{Gate, ValidationError};
pub use walker::{WalkStep, walk, walk_record};
