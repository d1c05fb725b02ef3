//! Loose and strict gates applied to parsed candidate objects.

use serde_json::Value;
use thiserror::Error;

use crate::constants::PRIMITIVES_PER_ABILITY;

/// First violated constraint of a candidate object.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Not a JSON object")]
    NotAnObject,
    #[error("Missing field: {0}")]
    MissingField(&'static str),
    #[error("Invalid primitives (must have exactly 2)")]
    InvalidPrimitives,
    #[error("Missing effects")]
    MissingEffects,
    #[error("Missing cooldown")]
    MissingCooldown,
    #[error("Malformed record: {0}")]
    Schema(String),
}

/// Which acceptance gate a recovery pass applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Gate {
    /// Only `name` and `ability` must be present.
    #[default]
    Loose,
    /// Every field the training pipeline depends on must be present and well-shaped.
    Strict,
}

impl Gate {
    /// Check `value` against this gate.
    ///
    /// # Errors
    ///
    /// Returns the first constraint the value violates.
    pub fn check(self, value: &Value) -> Result<(), ValidationError> {
        match self {
            Self::Loose => check_loose(value),
            Self::Strict => check_strict(value),
        }
    }
}

/// Minimal gate used while scanning: the value is an object with `name` and `ability`.
///
/// # Errors
///
/// Returns the first missing field, or [`ValidationError::NotAnObject`].
pub fn check_loose(value: &Value) -> Result<(), ValidationError> {
    let object = value.as_object().ok_or(ValidationError::NotAnObject)?;
    for field in ["name", "ability"] {
        if !object.contains_key(field) {
            return Err(ValidationError::MissingField(field));
        }
    }
    Ok(())
}

/// Full gate applied before a record is written to the repaired dataset.
///
/// # Errors
///
/// Returns the first violated constraint, checked in field order: top-level
/// fields, primitives, effects, cooldown.
pub fn check_strict(value: &Value) -> Result<(), ValidationError> {
    let object = value.as_object().ok_or(ValidationError::NotAnObject)?;
    for field in ["name", "description", "color", "ability"] {
        if !object.contains_key(field) {
            return Err(ValidationError::MissingField(field));
        }
    }

    let ability = &object["ability"];
    let primitives_ok = ability
        .get("primitives")
        .and_then(Value::as_array)
        .is_some_and(|items| items.len() == PRIMITIVES_PER_ABILITY);
    if !primitives_ok {
        return Err(ValidationError::InvalidPrimitives);
    }

    let has_effects = ability
        .get("effects")
        .and_then(Value::as_array)
        .is_some_and(|effects| !effects.is_empty());
    if !has_effects {
        return Err(ValidationError::MissingEffects);
    }

    if ability.get("cooldown").is_none() {
        return Err(ValidationError::MissingCooldown);
    }
    Ok(())
}
