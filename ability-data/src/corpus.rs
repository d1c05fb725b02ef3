//! Reading raw corpora, repairing them, and loading datasets for analysis.

use serde_json::Value;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::model::AbilityRecord;
use crate::numbers::count_to_f64;
use crate::recover::{Recovery, accept_value, recover};
use crate::stats::Distribution;
use crate::validate::Gate;

#[derive(Debug, Error)]
pub enum CorpusError {
    #[error("input file not found: {}", .0.display())]
    Missing(PathBuf),
    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to write {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("{} is not a JSON array of abilities: {source}", path.display())]
    Dataset {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("failed to serialize records: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("no valid ability records found in {}", .0.display())]
    Empty(PathBuf),
}

/// Read a whole UTF-8 file, distinguishing a missing file from other failures.
///
/// # Errors
///
/// Returns [`CorpusError::Missing`] when the file does not exist and
/// [`CorpusError::Read`] for any other I/O or encoding failure.
pub fn read_corpus(path: &Path) -> Result<String, CorpusError> {
    fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            CorpusError::Missing(path.to_path_buf())
        } else {
            CorpusError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

/// Result of repairing a raw corpus with the strict gate.
#[derive(Debug, Clone, PartialEq)]
pub struct RepairOutcome {
    pub recovery: Recovery,
    pub summary: RepairSummary,
}

/// Headline numbers printed after a repair run.
///
/// `invalid` counts only extracted objects that failed the strict gate, so it
/// never exceeds `extracted`. Non-ability objects appear in neither count.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct RepairSummary {
    pub extracted: usize,
    pub valid: usize,
    pub invalid: usize,
    pub parse_failures: usize,
    pub unique_element_pairs: usize,
    pub avg_per_pair: f64,
}

impl RepairSummary {
    #[must_use]
    pub fn from_recovery(recovery: &Recovery) -> Self {
        let pairs: Distribution<_> = recovery
            .records
            .iter()
            .map(|record| record.ability.element_pair())
            .collect();
        let avg_per_pair = if pairs.is_empty() {
            0.0
        } else {
            count_to_f64(recovery.records.len()) / count_to_f64(pairs.unique())
        };
        Self {
            extracted: recovery.extracted,
            valid: recovery.records.len(),
            invalid: recovery.validation_failures().count(),
            parse_failures: recovery.parse_failures().count(),
            unique_element_pairs: pairs.unique(),
            avg_per_pair,
        }
    }
}

/// Recover every strictly valid record from a raw corpus.
///
/// # Errors
///
/// Returns [`CorpusError::Empty`] when nothing valid was recovered; `source`
/// only labels the error.
pub fn repair(text: &str, source: &Path) -> Result<RepairOutcome, CorpusError> {
    let recovery = recover(text, Gate::Strict);
    if recovery.records.is_empty() {
        return Err(CorpusError::Empty(source.to_path_buf()));
    }
    let summary = RepairSummary::from_recovery(&recovery);
    Ok(RepairOutcome { recovery, summary })
}

/// Serialize accepted objects as an indented JSON array.
///
/// Takes the objects as parsed (see [`Recovery::objects`]) rather than typed
/// records, so every key and value of the input is written back unchanged.
///
/// # Errors
///
/// Returns an error if serialization fails.
pub fn records_to_json(objects: &[Value]) -> Result<String, CorpusError> {
    let mut json = serde_json::to_string_pretty(objects)?;
    json.push('\n');
    Ok(json)
}

/// Write accepted objects to `path` as an indented JSON array.
///
/// # Errors
///
/// Returns an error if serialization or the write fails.
pub fn write_records(path: &Path, objects: &[Value]) -> Result<(), CorpusError> {
    let json = records_to_json(objects)?;
    fs::write(path, json).map_err(|source| CorpusError::Write {
        path: path.to_path_buf(),
        source,
    })
}

/// Where a loaded dataset came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// The repaired JSON array.
    Fixed(PathBuf),
    /// Best-effort extraction from the raw corpus.
    RawFallback(PathBuf),
}

impl DatasetSource {
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Fixed(path) | Self::RawFallback(path) => path,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub source: DatasetSource,
    pub records: Vec<AbilityRecord>,
}

/// Load the repaired dataset, falling back to raw extraction when it is missing.
///
/// # Errors
///
/// Returns an error if the fixed file exists but cannot be read or is not a
/// JSON array, if the fallback corpus cannot be read, or if the chosen source
/// yields no records.
pub fn load_dataset(fixed: &Path, raw: &Path) -> Result<Dataset, CorpusError> {
    match read_corpus(fixed) {
        Ok(json) => {
            log::info!("loading {}", fixed.display());
            let records = parse_dataset(&json, fixed)?;
            non_empty(DatasetSource::Fixed(fixed.to_path_buf()), records)
        }
        Err(CorpusError::Missing(_)) => {
            log::warn!(
                "{} not found, falling back to raw extraction from {}",
                fixed.display(),
                raw.display()
            );
            let text = read_corpus(raw)?;
            let recovery = recover(&text, Gate::Loose);
            non_empty(DatasetSource::RawFallback(raw.to_path_buf()), recovery.records)
        }
        Err(err) => Err(err),
    }
}

fn parse_dataset(json: &str, path: &Path) -> Result<Vec<AbilityRecord>, CorpusError> {
    let values: Vec<Value> = serde_json::from_str(json).map_err(|source| CorpusError::Dataset {
        path: path.to_path_buf(),
        source,
    })?;
    let total = values.len();
    let records: Vec<AbilityRecord> = values
        .into_iter()
        .enumerate()
        .filter_map(|(idx, value)| match accept_value(&value, Gate::Loose) {
            Ok(record) => Some(record),
            Err(err) => {
                log::warn!("skipping dataset entry {idx}: {err}");
                None
            }
        })
        .collect();
    if records.len() < total {
        log::warn!("kept {} of {total} dataset entries", records.len());
    }
    Ok(records)
}

fn non_empty(source: DatasetSource, records: Vec<AbilityRecord>) -> Result<Dataset, CorpusError> {
    if records.is_empty() {
        return Err(CorpusError::Empty(source.path().to_path_buf()));
    }
    Ok(Dataset { source, records })
}

#[cfg(test)]
mod tests {
    use super::*;

    const VALID: &str = r#"{"name":"Glacier Spike","description":"d","color":"cyan","ability":{"primitives":["ice","earth"],"effects":[{"script":[{"action":"damage","args":{"amount":12}}]}],"cooldown":6}}"#;

    fn temp_dir(label: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "ability-corpus-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn read_corpus_distinguishes_missing_files() {
        let dir = temp_dir("missing");
        let err = read_corpus(&dir.join("nope.jsonl")).unwrap_err();
        assert!(matches!(err, CorpusError::Missing(_)));
    }

    #[test]
    fn repair_summarizes_outcome() {
        let text = format!("{VALID}{VALID} {{\"name\": broken}}");
        let outcome = repair(&text, Path::new("raw.jsonl")).unwrap();
        assert_eq!(outcome.summary.extracted, 2);
        assert_eq!(outcome.summary.valid, 2);
        assert_eq!(outcome.summary.invalid, 0);
        assert_eq!(outcome.summary.parse_failures, 1);
        assert_eq!(outcome.summary.unique_element_pairs, 1);
        assert!((outcome.summary.avg_per_pair - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn summary_ignores_non_ability_objects() {
        let no_color = VALID.replace(r#""color":"cyan","#, "");
        let text = format!(r#"{{"meta":1}} {{"version":2}} {no_color} {VALID}"#);
        let summary = repair(&text, Path::new("raw.jsonl")).unwrap().summary;
        assert_eq!(summary.extracted, 2);
        assert_eq!(summary.valid, 1);
        assert_eq!(summary.invalid, 1);
        assert!(summary.invalid <= summary.extracted);
    }

    #[test]
    fn summary_counts_truncated_tail_as_unparseable() {
        let text = format!("{VALID} {}", &VALID[..VALID.len() - 2]);
        let summary = repair(&text, Path::new("raw.jsonl")).unwrap().summary;
        assert_eq!(summary.valid, 1);
        assert_eq!(summary.parse_failures, 1);
        assert_eq!(summary.invalid, 0);
    }

    #[test]
    fn repair_of_garbage_is_empty_error() {
        let err = repair("no objects here", Path::new("raw.jsonl")).unwrap_err();
        assert!(matches!(err, CorpusError::Empty(_)));
    }

    #[test]
    fn written_records_reload_identically() {
        let dir = temp_dir("write");
        let outcome = repair(VALID, Path::new("raw.jsonl")).unwrap();
        let path = dir.join("fixed.json");
        write_records(&path, &outcome.recovery.objects).unwrap();
        let written = fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("[\n  {"));
        assert!(written.ends_with("]\n"));

        let dataset = load_dataset(&path, &dir.join("raw.jsonl")).unwrap();
        assert_eq!(dataset.source, DatasetSource::Fixed(path));
        assert_eq!(dataset.records, outcome.recovery.records);
    }

    #[test]
    fn written_objects_keep_nested_unknown_keys() {
        let nested = r#"{"name":"Riptide","description":"d","color":"teal","ability":{"primitives":["water","air"],"effects":[{"trigger":"on_cast","script":[{"action":"damage","args":{"amount":5},"target":"enemy"},{"action":"dash","args":{},"on_hit":[]},{"args":{"speed":2}}]}],"cooldown":2}}"#;
        let dir = temp_dir("nested");
        let path = dir.join("fixed.json");
        let outcome = repair(nested, Path::new("raw.jsonl")).unwrap();
        write_records(&path, &outcome.recovery.objects).unwrap();

        let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        let original: Value = serde_json::from_str(nested).unwrap();
        assert_eq!(written, Value::Array(vec![original]));
        assert!(!fs::read_to_string(&path).unwrap().contains("unknown"));
    }

    #[test]
    fn load_falls_back_to_raw_corpus() {
        let dir = temp_dir("fallback");
        let raw = dir.join("raw.jsonl");
        fs::write(&raw, format!("noise {VALID} {{\"name\":")).unwrap();
        let dataset = load_dataset(&dir.join("fixed.json"), &raw).unwrap();
        assert_eq!(dataset.source, DatasetSource::RawFallback(raw));
        assert_eq!(dataset.records.len(), 1);
    }

    #[test]
    fn load_fails_when_fallback_is_empty() {
        let dir = temp_dir("empty");
        let raw = dir.join("raw.jsonl");
        fs::write(&raw, "{\"unrelated\": true}").unwrap();
        let err = load_dataset(&dir.join("fixed.json"), &raw).unwrap_err();
        assert!(matches!(err, CorpusError::Empty(_)));
    }

    #[test]
    fn load_fails_when_both_sources_missing() {
        let dir = temp_dir("none");
        let err = load_dataset(&dir.join("fixed.json"), &dir.join("raw.jsonl")).unwrap_err();
        assert!(matches!(err, CorpusError::Missing(path) if path.ends_with("raw.jsonl")));
    }

    #[test]
    fn load_skips_untypable_dataset_entries() {
        let dir = temp_dir("skip");
        let fixed = dir.join("fixed.json");
        fs::write(&fixed, format!("[{VALID}, {{\"name\": \"x\"}}]")).unwrap();
        let dataset = load_dataset(&fixed, &dir.join("raw.jsonl")).unwrap();
        assert_eq!(dataset.records.len(), 1);
    }

    #[test]
    fn load_rejects_non_array_dataset() {
        let dir = temp_dir("object");
        let fixed = dir.join("fixed.json");
        fs::write(&fixed, VALID).unwrap();
        let err = load_dataset(&fixed, &dir.join("raw.jsonl")).unwrap_err();
        assert!(matches!(err, CorpusError::Dataset { .. }));
    }
}
