//! Editing timeline models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::timestamp::{format_mm_ss, is_mm_ss, parse_timestamp};

/// Kind of edit an editing step asks for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum ActionType {
    Zoom,
    Cut,
    Color,
    Audio,
    Text,
    Transition,
}

impl ActionType {
    /// Returns the action type as a string for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Zoom => "zoom",
            Self::Cut => "cut",
            Self::Color => "color",
            Self::Audio => "audio",
            Self::Text => "text",
            Self::Transition => "transition",
        }
    }

    /// Parse an action type, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "zoom" => Some(Self::Zoom),
            "cut" => Some(Self::Cut),
            "color" => Some(Self::Color),
            "audio" => Some(Self::Audio),
            "text" => Some(Self::Text),
            "transition" => Some(Self::Transition),
            _ => None,
        }
    }
}

/// One concrete, timestamped edit instruction.
///
/// Serialized with the `timestamp` / `technical_action` / `reason` names the
/// web client reads; the descriptive names are accepted on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct EditingStep {
    /// Position in `MM:SS` form
    #[serde(rename = "timestamp", alias = "display_timestamp")]
    pub display_timestamp: String,

    /// Position in whole seconds
    pub timestamp_seconds: u32,

    /// Kind of edit
    pub action_type: ActionType,

    /// Precise instruction for the editor
    #[serde(rename = "technical_action", alias = "instruction")]
    pub instruction: String,

    /// Why the edit improves retention
    #[serde(rename = "reason", alias = "rationale")]
    pub rationale: String,
}

impl EditingStep {
    /// Create a step at `seconds`, deriving the `MM:SS` display form.
    pub fn at(
        seconds: u32,
        action_type: ActionType,
        instruction: impl Into<String>,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            display_timestamp: format_mm_ss(seconds),
            timestamp_seconds: seconds,
            action_type,
            instruction: instruction.into(),
            rationale: rationale.into(),
        }
    }

    /// Read a step from loosely-structured JSON, repairing what can be repaired.
    ///
    /// Returns `None` when the element is not an object, has no usable
    /// position, no instruction, or an action type outside the taxonomy.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        let action_type = obj
            .get("action_type")
            .and_then(Value::as_str)
            .and_then(ActionType::parse)?;

        let instruction = text_field(obj, &["technical_action", "instruction"])?;
        let rationale = text_field(obj, &["reason", "rationale"]).unwrap_or_default();

        let display = obj
            .get("timestamp")
            .or_else(|| obj.get("display_timestamp"));
        let display_seconds = display.and_then(seconds_of);
        let seconds = obj
            .get("timestamp_seconds")
            .and_then(seconds_of)
            .or(display_seconds)?;

        let display_timestamp = match display {
            Some(Value::String(s)) if is_mm_ss(s.trim()) => s.trim().to_string(),
            _ => format_mm_ss(seconds),
        };

        Some(Self {
            display_timestamp,
            timestamp_seconds: seconds,
            action_type,
            instruction,
            rationale,
        })
    }

    /// Repair a whole timeline, dropping elements that cannot be read.
    pub fn timeline_from_value(value: &Value) -> Vec<Self> {
        value
            .as_array()
            .map(|items| items.iter().filter_map(Self::from_value).collect())
            .unwrap_or_default()
    }
}

/// First non-empty string among `keys`.
fn text_field(obj: &serde_json::Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| obj.get(*k).and_then(Value::as_str))
        .map(str::trim)
        .find(|s| !s.is_empty())
        .map(str::to_string)
}

/// Whole seconds from a number or a timestamp string.
fn seconds_of(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => n
            .as_u64()
            .map(|v| v.min(u32::MAX as u64) as u32)
            .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u32)),
        Value::String(s) => parse_timestamp(s).ok(),
        _ => None,
    }
}
