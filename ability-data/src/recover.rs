//! Record recovery: extract candidate spans, parse, gate and type them.
//!
//! Every failure is contained to its own candidate. A malformed span is
//! recorded as a [`Rejection`] and scanning continues with the next one.

use serde_json::Value;
use thiserror::Error;

use crate::constants::PARSE_ERROR_SUMMARY_LEN;
use crate::extract::{CandidateSpan, candidate_spans};
use crate::model::AbilityRecord;
use crate::validate::{Gate, ValidationError, check_loose};

/// Why a candidate span did not become a record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecoveryError {
    #[error("Failed to parse object: {summary}")]
    Parse { summary: String },
    #[error("Unterminated object at end of input")]
    Truncated,
    /// Well-formed JSON without `name` and `ability`; never counted as extracted.
    #[error("Not an ability object: {0}")]
    NotAbility(ValidationError),
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// A candidate span that was excluded from the output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rejection {
    /// Byte offset of the span in the scanned text.
    pub offset: usize,
    /// The candidate's `name`, when it parsed far enough to have one.
    pub name: Option<String>,
    pub error: RecoveryError,
}

impl Rejection {
    #[must_use]
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or("UNKNOWN")
    }
}

/// Outcome of one recovery pass over a raw corpus.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Recovery {
    /// Candidates that parsed and carried both `name` and `ability`.
    pub extracted: usize,
    pub records: Vec<AbilityRecord>,
    /// Accepted objects exactly as parsed, one per entry of `records`.
    pub objects: Vec<Value>,
    pub rejections: Vec<Rejection>,
}

impl Recovery {
    /// Rejections caused by malformed or unterminated JSON.
    pub fn parse_failures(&self) -> impl Iterator<Item = &Rejection> {
        self.rejections.iter().filter(|r| {
            matches!(
                r.error,
                RecoveryError::Parse { .. } | RecoveryError::Truncated
            )
        })
    }

    /// Extracted ability objects that failed the gate or the record schema.
    pub fn validation_failures(&self) -> impl Iterator<Item = &Rejection> {
        self.rejections
            .iter()
            .filter(|r| matches!(r.error, RecoveryError::Invalid(_)))
    }

    /// Well-formed objects that are not abilities at all.
    pub fn skipped(&self) -> impl Iterator<Item = &Rejection> {
        self.rejections
            .iter()
            .filter(|r| matches!(r.error, RecoveryError::NotAbility(_)))
    }
}

/// Scan `text` and keep every candidate that passes `gate`.
#[must_use]
pub fn recover(text: &str, gate: Gate) -> Recovery {
    let mut recovery = Recovery::default();
    let mut spans = candidate_spans(text);
    for span in spans.by_ref() {
        match recover_span(span, gate, &mut recovery.extracted) {
            Ok((record, object)) => {
                log::debug!("extracted ability {:?} at byte {}", record.name, span.offset);
                recovery.records.push(record);
                recovery.objects.push(object);
            }
            Err(rejection) => recovery.rejections.push(rejection),
        }
    }
    if let Some(offset) = spans.unterminated() {
        log::warn!("unterminated object at byte {offset} (skipping rest of input)");
        recovery.rejections.push(Rejection {
            offset,
            name: None,
            error: RecoveryError::Truncated,
        });
    }
    log::info!(
        "recovered {} of {} extracted ability objects ({} rejected)",
        recovery.records.len(),
        recovery.extracted,
        recovery.rejections.len()
    );
    recovery
}

fn recover_span(
    span: CandidateSpan<'_>,
    gate: Gate,
    extracted: &mut usize,
) -> Result<(AbilityRecord, Value), Rejection> {
    let value: Value = serde_json::from_str(span.text).map_err(|err| {
        let summary: String = err.to_string().chars().take(PARSE_ERROR_SUMMARY_LEN).collect();
        log::warn!("failed to parse object at byte {} (skipping): {summary}", span.offset);
        Rejection {
            offset: span.offset,
            name: None,
            error: RecoveryError::Parse { summary },
        }
    })?;
    let name = value.get("name").and_then(Value::as_str).map(str::to_string);

    if let Err(err) = check_loose(&value) {
        log::debug!("ignoring non-ability object at byte {}: {err}", span.offset);
        return Err(Rejection {
            offset: span.offset,
            name,
            error: RecoveryError::NotAbility(err),
        });
    }
    *extracted += 1;

    match accept_value(&value, gate) {
        Ok(record) => Ok((record, value)),
        Err(err) => {
            log::warn!(
                "invalid ability {}: {err}",
                name.as_deref().unwrap_or("UNKNOWN")
            );
            Err(Rejection {
                offset: span.offset,
                name,
                error: err.into(),
            })
        }
    }
}

/// Gate a parsed value and convert it into a typed record.
///
/// # Errors
///
/// Returns the first violated gate constraint, or [`ValidationError::Schema`]
/// when the value passes the gate but cannot be typed.
pub fn accept_value(value: &Value, gate: Gate) -> Result<AbilityRecord, ValidationError> {
    gate.check(value)?;
    AbilityRecord::from_value(value).map_err(|err| ValidationError::Schema(err.to_string()))
}
