//! Centralized vocabulary and policy constants for ability data analysis.
//!
//! Reference counts and thresholds here are policy choices rather than
//! measured quantities. They seed the defaults of [`crate::config`] so a
//! caller can override them without touching the analysis code.

// Action vocabulary ---------------------------------------------------------
pub const ACTION_DAMAGE: &str = "damage";
pub const ACTION_APPLY_STATUS: &str = "apply_status";
pub const ACTION_SPAWN_MELEE: &str = "spawn_melee";
pub const ACTION_UNKNOWN: &str = "unknown";

// Argument keys and defaults -----------------------------------------------
pub const ARG_SHAPE: &str = "shape";
pub const ARG_MOVEMENT: &str = "movement";
pub const ARG_STATUS: &str = "status";
pub const ARG_AMOUNT: &str = "amount";
pub const ARG_DURATION: &str = "duration";
pub const DEFAULT_SHAPE: &str = "unknown";
pub const DEFAULT_MOVEMENT: &str = "stationary";
pub const DEFAULT_STATUS: &str = "unknown";
pub const DEFAULT_NUMERIC_ARG: f64 = 0.0;

// Record schema ------------------------------------------------------------
pub const PRIMITIVES_PER_ABILITY: usize = 2;

// Scoring references -------------------------------------------------------
pub const ELEMENT_ALPHABET_SIZE: usize = 8;
pub const COMPLEXITY_LEVELS: usize = 5;
pub const STATUS_TYPES: usize = 10;
pub const VERDICT_EXCELLENT: f64 = 80.0;
pub const VERDICT_GOOD: f64 = 60.0;
pub const VERDICT_MODERATE: f64 = 40.0;

// Recommendation thresholds ------------------------------------------------
pub const SAMPLE_SIZE_MINIMUM: usize = 500;
pub const SAMPLE_SIZE_ROBUST: usize = 1_000;
pub const SAMPLE_SIZE_IDEAL: usize = 2_000;
pub const SAMPLES_PER_PAIR_MINIMUM: f64 = 20.0;
pub const SAMPLES_PER_PAIR_TARGET_LOW: usize = 30;
pub const SAMPLES_PER_PAIR_TARGET_HIGH: usize = 50;
pub const EVENNESS_MINIMUM: f64 = 70.0;
pub const SEQUENCE_DIVERSITY_MINIMUM: f64 = 80.0;

// Diagnostics --------------------------------------------------------------
pub(crate) const PARSE_ERROR_SUMMARY_LEN: usize = 50;

// Default file names -------------------------------------------------------
pub const DEFAULT_RAW_CORPUS: &str = "ability_data_training.jsonl";
pub const DEFAULT_FIXED_DATASET: &str = "ability_data_training_fixed.json";
