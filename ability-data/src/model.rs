//! Typed ability records recovered from the training corpus.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use thiserror::Error;

use crate::constants::{
    ACTION_UNKNOWN, ARG_AMOUNT, ARG_DURATION, ARG_MOVEMENT, ARG_SHAPE, ARG_STATUS,
    DEFAULT_MOVEMENT, DEFAULT_NUMERIC_ARG, DEFAULT_SHAPE, DEFAULT_STATUS, PRIMITIVES_PER_ABILITY,
};

/// Structural invariants an [`Ability`] must hold once typed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("ability must have exactly {expected} primitives (got {found})")]
    PrimitiveCount { expected: usize, found: usize },
    #[error("ability must have at least one effect")]
    NoEffects,
}

/// One action step in an effect script, optionally triggering follow-ups on hit.
///
/// Built leniently from any JSON value: a missing or non-string `action`
/// becomes `"unknown"`, non-object `args` become empty, a non-array `on_hit`
/// has no children, and a node that is not an object at all is an empty
/// `"unknown"` step.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct ScriptNode {
    pub action: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub args: Map<String, Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub on_hit: Vec<ScriptNode>,
}

impl From<Value> for ScriptNode {
    fn from(value: Value) -> Self {
        let Value::Object(mut fields) = value else {
            return Self::new(ACTION_UNKNOWN);
        };
        let action = match fields.remove("action") {
            Some(Value::String(action)) => action,
            _ => ACTION_UNKNOWN.to_string(),
        };
        let args = match fields.remove("args") {
            Some(Value::Object(args)) => args,
            _ => Map::new(),
        };
        Self {
            action,
            args,
            on_hit: node_list(fields.remove("on_hit")),
        }
    }
}

// serde_json's recursion limit bounds how deep this conversion can nest.
fn node_list(value: Option<Value>) -> Vec<ScriptNode> {
    match value {
        Some(Value::Array(nodes)) => nodes.into_iter().map(ScriptNode::from).collect(),
        _ => Vec::new(),
    }
}

/// Strings pass through, `null` is empty, anything else keeps its JSON text.
fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(text_of(Value::deserialize(deserializer)?))
}

fn text_of(value: Value) -> String {
    match value {
        Value::String(text) => text,
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl ScriptNode {
    #[must_use]
    pub fn new(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            args: Map::new(),
            on_hit: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_arg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.args.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn with_on_hit(mut self, child: Self) -> Self {
        self.on_hit.push(child);
        self
    }

    #[must_use]
    pub fn is(&self, action: &str) -> bool {
        self.action == action
    }

    /// Melee hitbox shape, `"unknown"` when absent.
    #[must_use]
    pub fn shape(&self) -> &str {
        self.str_arg(ARG_SHAPE).unwrap_or(DEFAULT_SHAPE)
    }

    /// Melee movement pattern, `"stationary"` when absent.
    #[must_use]
    pub fn movement(&self) -> &str {
        self.str_arg(ARG_MOVEMENT).unwrap_or(DEFAULT_MOVEMENT)
    }

    /// Applied status name, `"unknown"` when absent.
    #[must_use]
    pub fn status(&self) -> &str {
        self.str_arg(ARG_STATUS).unwrap_or(DEFAULT_STATUS)
    }

    /// Damage amount, `0` when absent or not numeric.
    #[must_use]
    pub fn amount(&self) -> f64 {
        self.numeric_arg(ARG_AMOUNT)
    }

    /// Status duration, `0` when absent or not numeric.
    #[must_use]
    pub fn duration(&self) -> f64 {
        self.numeric_arg(ARG_DURATION)
    }

    fn str_arg(&self, key: &str) -> Option<&str> {
        self.args.get(key).and_then(Value::as_str)
    }

    fn numeric_arg(&self, key: &str) -> f64 {
        self.args
            .get(key)
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_NUMERIC_ARG)
    }
}

/// A script attached to an ability. A missing or malformed `script` is empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value")]
pub struct Effect {
    pub script: Vec<ScriptNode>,
}

impl From<Value> for Effect {
    fn from(value: Value) -> Self {
        let script = match value {
            Value::Object(mut fields) => node_list(fields.remove("script")),
            _ => Vec::new(),
        };
        Self { script }
    }
}

/// Element pair, effects and cooldown of one ability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "AbilityFields")]
pub struct Ability {
    pub primitives: [String; PRIMITIVES_PER_ABILITY],
    pub effects: Vec<Effect>,
    /// Raw cooldown value; read it through [`Ability::cooldown`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cooldown: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Deserialize)]
struct AbilityFields {
    primitives: Vec<Value>,
    effects: Vec<Effect>,
    #[serde(default)]
    cooldown: Option<Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl TryFrom<AbilityFields> for Ability {
    type Error = SchemaError;

    fn try_from(fields: AbilityFields) -> Result<Self, Self::Error> {
        let found = fields.primitives.len();
        let primitives: [String; PRIMITIVES_PER_ABILITY] = fields
            .primitives
            .into_iter()
            .map(text_of)
            .collect::<Vec<_>>()
            .try_into()
            .map_err(|_| SchemaError::PrimitiveCount {
                expected: PRIMITIVES_PER_ABILITY,
                found,
            })?;
        if fields.effects.is_empty() {
            return Err(SchemaError::NoEffects);
        }
        Ok(Self {
            primitives,
            effects: fields.effects,
            cooldown: fields.cooldown,
            extra: fields.extra,
        })
    }
}

impl Ability {
    /// Cooldown in seconds, `0` when absent or not numeric.
    #[must_use]
    pub fn cooldown(&self) -> f64 {
        self.cooldown
            .as_ref()
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_NUMERIC_ARG)
    }

    #[must_use]
    pub fn element_pair(&self) -> ElementPair {
        ElementPair::new(&self.primitives[0], &self.primitives[1])
    }

    /// Top-level script nodes of every effect, in declaration order.
    pub fn top_level_nodes(&self) -> impl Iterator<Item = &ScriptNode> {
        self.effects.iter().flat_map(|effect| effect.script.iter())
    }
}

/// A named ability as stored in the training corpus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityRecord {
    #[serde(deserialize_with = "lenient_text")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub description: String,
    #[serde(default, deserialize_with = "lenient_text")]
    pub color: String,
    pub ability: Ability,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AbilityRecord {
    /// Build a typed record from a parsed JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if required fields are missing, have the wrong type, or
    /// the ability violates its structural invariants.
    pub fn from_value(value: &Value) -> Result<Self, serde_json::Error> {
        Self::deserialize(value)
    }
}

/// Order-independent pair of element tags, stored sorted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ElementPair {
    pub first: String,
    pub second: String,
}

impl ElementPair {
    #[must_use]
    pub fn new(a: &str, b: &str) -> Self {
        let (first, second) = if a <= b { (a, b) } else { (b, a) };
        Self {
            first: first.to_string(),
            second: second.to_string(),
        }
    }
}

impl fmt::Display for ElementPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} + {}", self.first, self.second)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_value() -> Value {
        json!({
            "name": "Fireburst",
            "description": "d",
            "color": "red",
            "ability": {
                "primitives": ["water", "fire"],
                "effects": [{"script": [
                    {"action": "damage", "args": {"amount": 10}},
                    {"action": "spawn_melee", "on_hit": [
                        {"action": "apply_status", "args": {"status": "burn", "duration": 2.5}}
                    ]}
                ]}],
                "cooldown": 3,
                "mana": 12
            },
            "tier": "rare"
        })
    }

    #[test]
    fn parses_record_and_preserves_unknown_fields() {
        let record = AbilityRecord::from_value(&sample_value()).unwrap();
        assert_eq!(record.name, "Fireburst");
        assert_eq!(record.extra.get("tier"), Some(&json!("rare")));
        assert_eq!(record.ability.extra.get("mana"), Some(&json!(12)));

        let round = serde_json::to_value(&record).unwrap();
        assert_eq!(round, sample_value());
    }

    #[test]
    fn rejects_wrong_primitive_count() {
        let mut value = sample_value();
        value["ability"]["primitives"] = json!(["fire"]);
        let err = AbilityRecord::from_value(&value).unwrap_err();
        assert!(err.to_string().contains("exactly 2 primitives"));
    }

    #[test]
    fn rejects_empty_effects() {
        let mut value = sample_value();
        value["ability"]["effects"] = json!([]);
        let err = AbilityRecord::from_value(&value).unwrap_err();
        assert!(err.to_string().contains("at least one effect"));
    }

    #[test]
    fn argument_accessors_apply_defaults() {
        let bare = ScriptNode::new("spawn_melee");
        assert_eq!(bare.shape(), "unknown");
        assert_eq!(bare.movement(), "stationary");
        assert_eq!(bare.status(), "unknown");
        assert!(bare.amount().abs() < f64::EPSILON);
        assert!(bare.duration().abs() < f64::EPSILON);

        let typed = ScriptNode::new("damage")
            .with_arg("amount", "lots")
            .with_arg("shape", "arc");
        assert!(typed.amount().abs() < f64::EPSILON);
        assert_eq!(typed.shape(), "arc");
    }

    #[test]
    fn missing_action_defaults_to_unknown() {
        let node: ScriptNode = serde_json::from_value(json!({"args": {}})).unwrap();
        assert_eq!(node.action, "unknown");
    }

    #[test]
    fn cooldown_defaults_to_zero() {
        let mut value = sample_value();
        value["ability"].as_object_mut().unwrap().remove("cooldown");
        let record = AbilityRecord::from_value(&value).unwrap();
        assert!(record.ability.cooldown.is_none());
        assert!(record.ability.cooldown().abs() < f64::EPSILON);
    }

    #[test]
    fn loosely_shaped_fields_still_type() {
        let mut value = sample_value();
        value["ability"]["cooldown"] = json!("3s");
        value["ability"]["primitives"] = json!(["fire", 7]);
        value["ability"]["effects"] = json!([
            {"script": ["damage", {"action": "dash", "args": null, "on_hit": "none"}]},
            "not an effect"
        ]);
        let record = AbilityRecord::from_value(&value).unwrap();

        assert!(record.ability.cooldown().abs() < f64::EPSILON);
        assert_eq!(record.ability.cooldown, Some(json!("3s")));
        assert_eq!(record.ability.primitives, ["fire".to_string(), "7".to_string()]);
        let nodes: Vec<&ScriptNode> = record.ability.top_level_nodes().collect();
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0], &ScriptNode::new("unknown"));
        assert_eq!(nodes[1], &ScriptNode::new("dash"));
        assert!(record.ability.effects[1].script.is_empty());
    }

    #[test]
    fn element_pair_is_sorted() {
        let record = AbilityRecord::from_value(&sample_value()).unwrap();
        let pair = record.ability.element_pair();
        assert_eq!(pair, ElementPair::new("fire", "water"));
        assert_eq!(pair.to_string(), "fire + water");
    }
}
