//! Repairs raw model output into an [`AnalysisFragment`].
//!
//! The model is asked for a single JSON object but may wrap it in Markdown
//! fences, add prose around it, or drop keys. Normalization never fails:
//! whatever cannot be recovered is left empty and the caller decides how to
//! fill the gap.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::Value;
use tracing::debug;
use vscore_models::{AnalysisFragment, EditingStep};

/// Greedy, newline-spanning match of the outermost `[...]` run.
fn array_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"(?s)\[.*\]").expect("array pattern is valid"))
}

/// Remove Markdown code fences and surrounding whitespace.
pub fn strip_code_fences(raw: &str) -> String {
    raw.trim()
        .replace("```json", "")
        .replace("```", "")
        .trim()
        .to_string()
}

/// First bracket-delimited array in `text`, or `[]`.
pub fn extract_array(text: &str) -> String {
    array_pattern()
        .find(text)
        .map(|m| m.as_str().to_string())
        .unwrap_or_else(|| "[]".to_string())
}

/// Whether `recommendations` holds a non-empty JSON array.
pub fn has_recommendations(recommendations: &str) -> bool {
    matches!(
        serde_json::from_str::<Value>(recommendations),
        Ok(Value::Array(items)) if !items.is_empty()
    )
}

/// Normalize raw model output.
///
/// Recommendations are taken from a parsed `recommendations` array when it is
/// non-empty, otherwise from the first bracketed run in the text. Score,
/// status and timeline are only read when the whole text parsed as JSON.
pub fn normalize(raw: &str) -> AnalysisFragment {
    let cleaned = strip_code_fences(raw);

    let data: Value = match serde_json::from_str(&cleaned) {
        Ok(data) => data,
        Err(e) => {
            debug!("Response is not valid JSON ({}), extracting bracketed array", e);
            return AnalysisFragment {
                recommendations: extract_array(&cleaned),
                retention_score: None,
                final_status: None,
                editing_timeline: Vec::new(),
            };
        }
    };

    let recommendations = match data.get("recommendations") {
        Some(Value::Array(items)) if !items.is_empty() => {
            serde_json::to_string(items).unwrap_or_else(|_| extract_array(&cleaned))
        }
        _ => extract_array(&cleaned),
    };

    AnalysisFragment {
        recommendations,
        retention_score: data.get("retention_score").filter(|v| !v.is_null()).cloned(),
        final_status: data
            .get("final_status")
            .and_then(Value::as_str)
            .map(str::to_string),
        editing_timeline: data
            .get("editing_timeline")
            .map(EditingStep::timeline_from_value)
            .unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const FULL_RESPONSE: &str = r#"```json
{
  "recommendations": [
    {"id": "1", "type": "hook", "title": "Gancho", "description": "Más rápido", "priority": "high", "timestamp": 0},
    {"id": "2", "type": "cta", "title": "CTA", "description": "Más claro", "priority": "low", "timestamp": 30}
  ],
  "retention_score": 88,
  "final_status": "ready",
  "editing_timeline": [
    {"timestamp": "00:00", "timestamp_seconds": 0, "action_type": "cut", "technical_action": "Cortar intro", "reason": "Ritmo"}
  ]
}
```"#;

    #[test]
    fn test_normalize_fenced_json() {
        let fragment = normalize(FULL_RESPONSE);

        let recs: Vec<Value> = serde_json::from_str(&fragment.recommendations).unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[0]["type"], "hook");
        assert_eq!(fragment.retention_score, Some(json!(88)));
        assert_eq!(fragment.final_status.as_deref(), Some("ready"));
        assert_eq!(fragment.editing_timeline.len(), 1);
        assert_eq!(fragment.editing_timeline[0].instruction, "Cortar intro");
    }

    #[test]
    fn test_normalize_reserializes_canonically() {
        let fragment = normalize(r#"{"recommendations": [ {"id" : "a"} ]}"#);
        assert_eq!(fragment.recommendations, r#"[{"id":"a"}]"#);
    }

    #[test]
    fn test_normalize_prose_around_array() {
        let fragment = normalize(
            "Claro, aquí tienes:\n[{\"id\": \"1\", \"type\": \"audio\"}]\nEspero que ayude.",
        );
        assert_eq!(fragment.recommendations, "[{\"id\": \"1\", \"type\": \"audio\"}]");
        assert_eq!(fragment.retention_score, None);
        assert_eq!(fragment.final_status, None);
        assert!(fragment.editing_timeline.is_empty());
    }

    #[test]
    fn test_normalize_empty_recommendations_falls_back_to_extraction() {
        let fragment = normalize(r#"{"recommendations": [], "retention_score": 70}"#);
        // The greedy match picks up the only bracket run, which is the empty list.
        assert_eq!(fragment.recommendations, "[]");
        assert_eq!(fragment.retention_score, Some(json!(70)));
        assert!(!has_recommendations(&fragment.recommendations));
    }

    #[test]
    fn test_normalize_keeps_scalar_fields_when_recommendations_missing() {
        let fragment = normalize(r#"{"retention_score": "81", "final_status": "whatever"}"#);
        assert_eq!(fragment.recommendations, "[]");
        assert_eq!(fragment.retention_score, Some(json!("81")));
        assert_eq!(fragment.final_status.as_deref(), Some("whatever"));
    }

    #[test]
    fn test_normalize_top_level_array() {
        let fragment = normalize(r#"[{"id": "x", "type": "lighting"}]"#);
        assert!(has_recommendations(&fragment.recommendations));
    }

    #[test]
    fn test_normalize_is_total() {
        let inputs = [
            "",
            "   ",
            "```",
            "```json```",
            "null",
            "42",
            "\"texto\"",
            "{",
            "]][[",
            "{\"recommendations\": \"no\"}",
            "{\"editing_timeline\": 5, \"retention_score\": null}",
            "sin json aquí",
        ];
        for input in inputs {
            let fragment = normalize(input);
            assert!(!fragment.recommendations.is_empty(), "input {:?}", input);
        }
        assert_eq!(normalize("").recommendations, "[]");
        assert_eq!(normalize("sin json aquí").recommendations, "[]");
        assert_eq!(normalize("null").retention_score, None);
    }

    #[test]
    fn test_has_recommendations() {
        assert!(has_recommendations(r#"[{"id":"1"}]"#));
        assert!(!has_recommendations("[]"));
        assert!(!has_recommendations("[1, 2"));
        assert!(!has_recommendations(r#"{"id":"1"}"#));
    }
}
