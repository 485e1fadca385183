//! Analysis result models.
//!
//! An analysis starts life as an [`AnalysisFragment`]: whatever the simulated
//! or remote path produced, with the score and status still in their raw,
//! untrusted form. [`AnalysisFragment::into_result`] applies the coercion and
//! status rules and binds the fragment to a video.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::editing::EditingStep;

/// Minimum retention score for a video to be considered ready to publish.
pub const READY_THRESHOLD: u8 = 85;

/// Readiness verdict derived from the retention score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FinalStatus {
    /// Score reached the threshold
    Ready,
    /// Score below the threshold
    ChangesNeeded,
}

impl FinalStatus {
    /// Returns the status as a string for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Ready => "ready",
            Self::ChangesNeeded => "changes_needed",
        }
    }

    /// Parse one of the two valid status names.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ready" => Some(Self::Ready),
            "changes_needed" => Some(Self::ChangesNeeded),
            _ => None,
        }
    }

    /// Derive the verdict from a retention score.
    pub fn from_score(score: u8) -> Self {
        if score >= READY_THRESHOLD {
            Self::Ready
        } else {
            Self::ChangesNeeded
        }
    }
}

/// Coerce a loosely-typed retention score into `0..=100`.
///
/// Integers are taken as-is, floats are truncated, numeric strings are parsed.
/// Anything else (including non-integer strings such as `"78.5"`) yields
/// `None`, which callers treat as an absent score.
pub fn coerce_score(value: &Value) -> Option<u8> {
    let raw: i64 = match value {
        Value::Number(n) => match n.as_i64() {
            Some(i) => i,
            None => match n.as_u64() {
                Some(_) => i64::MAX,
                None => {
                    let f = n.as_f64()?;
                    if !f.is_finite() {
                        return None;
                    }
                    f.trunc() as i64
                }
            },
        },
        Value::String(s) => s.trim().parse().ok()?,
        Value::Bool(b) => i64::from(*b),
        _ => return None,
    };
    Some(raw.clamp(0, 100) as u8)
}

/// Analysis output before score coercion and status derivation.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisFragment {
    /// Recommendations as JSON array text
    pub recommendations: String,
    /// Retention score exactly as produced
    pub retention_score: Option<Value>,
    /// Status exactly as produced
    pub final_status: Option<String>,
    /// Repaired editing timeline
    pub editing_timeline: Vec<EditingStep>,
}

impl AnalysisFragment {
    /// Apply the score/status rules and bind the fragment to `video_id`.
    pub fn into_result(self, video_id: Uuid) -> AnalysisResult {
        let retention_score = self.retention_score.as_ref().and_then(coerce_score);
        let parsed_status = self.final_status.as_deref().and_then(FinalStatus::parse);

        let final_status = match (retention_score, parsed_status) {
            (Some(score), None) => Some(FinalStatus::from_score(score)),
            (_, status) => status,
        };

        AnalysisResult {
            video_id,
            recorded_at: Utc::now(),
            retention_score,
            final_status,
            recommendations: self.recommendations,
            editing_timeline: self.editing_timeline,
        }
    }
}

/// A normalized analysis result, as stored in the analytics log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct AnalysisResult {
    /// Identifier of the submitted video
    pub video_id: Uuid,

    /// When the analysis was recorded
    #[serde(rename = "date")]
    pub recorded_at: DateTime<Utc>,

    /// Retention score (0-100)
    pub retention_score: Option<u8>,

    /// Readiness verdict; `None` only when the score is absent too
    pub final_status: Option<FinalStatus>,

    /// Recommendations as canonical JSON array text
    pub recommendations: String,

    /// Timestamped editing plan
    #[serde(default)]
    pub editing_timeline: Vec<EditingStep>,
}

impl AnalysisResult {
    /// Parse the stored recommendations as a JSON sequence.
    ///
    /// Returns `None` if the stored text is not a JSON array.
    pub fn recommendation_values(&self) -> Option<Vec<Value>> {
        match serde_json::from_str(&self.recommendations) {
            Ok(Value::Array(items)) => Some(items),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fragment(score: Option<Value>, status: Option<&str>) -> AnalysisFragment {
        AnalysisFragment {
            recommendations: "[]".to_string(),
            retention_score: score,
            final_status: status.map(str::to_string),
            editing_timeline: Vec::new(),
        }
    }

    #[test]
    fn test_status_threshold_holds_for_every_score() {
        for score in 0..=100u8 {
            let expected = if score < 85 {
                FinalStatus::ChangesNeeded
            } else {
                FinalStatus::Ready
            };
            assert_eq!(FinalStatus::from_score(score), expected, "score {}", score);

            let result = fragment(Some(json!(score)), None).into_result(Uuid::new_v4());
            assert_eq!(result.final_status, Some(expected));
        }
    }

    #[test]
    fn test_coerce_score() {
        assert_eq!(coerce_score(&json!(78)), Some(78));
        assert_eq!(coerce_score(&json!(91.9)), Some(91));
        assert_eq!(coerce_score(&json!("88")), Some(88));
        assert_eq!(coerce_score(&json!(" 60 ")), Some(60));
        assert_eq!(coerce_score(&json!("78.5")), None);
        assert_eq!(coerce_score(&json!("alto")), None);
        assert_eq!(coerce_score(&json!(null)), None);
        assert_eq!(coerce_score(&json!([80])), None);
        assert_eq!(coerce_score(&json!(150)), Some(100));
        assert_eq!(coerce_score(&json!(-3)), Some(0));
    }

    #[test]
    fn test_invalid_status_is_rederived() {
        let result = fragment(Some(json!(90)), Some("publish")).into_result(Uuid::new_v4());
        assert_eq!(result.final_status, Some(FinalStatus::Ready));
    }

    #[test]
    fn test_valid_status_is_kept() {
        // The provider's verdict wins when it is one of the two valid values.
        let result =
            fragment(Some(json!(90)), Some("changes_needed")).into_result(Uuid::new_v4());
        assert_eq!(result.final_status, Some(FinalStatus::ChangesNeeded));
    }

    #[test]
    fn test_uncoercible_score_is_absent() {
        let result = fragment(Some(json!("n/a")), None).into_result(Uuid::new_v4());
        assert_eq!(result.retention_score, None);
        assert_eq!(result.final_status, None);
    }

    #[test]
    fn test_result_serializes_date_field() {
        let result = fragment(Some(json!(70)), None).into_result(Uuid::new_v4());
        let json = serde_json::to_value(&result).unwrap();
        assert!(json.get("date").is_some());
        assert_eq!(json["final_status"], "changes_needed");
        assert_eq!(json["recommendations"], "[]");
    }

    #[test]
    fn test_recommendation_values() {
        let mut result = fragment(None, None).into_result(Uuid::new_v4());
        result.recommendations = r#"[{"type":"hook"}]"#.to_string();
        assert_eq!(result.recommendation_values().unwrap().len(), 1);

        result.recommendations = r#"{"type":"hook"}"#.to_string();
        assert!(result.recommendation_values().is_none());

        result.recommendations = "not json".to_string();
        assert!(result.recommendation_values().is_none());
    }
}
