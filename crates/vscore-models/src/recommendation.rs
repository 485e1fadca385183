//! Improvement recommendation models.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Improvement area a recommendation targets.
///
/// The taxonomy is fixed; declaration order is also the tie-break order used
/// when ranking categories by improvement.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Hook,
    Lighting,
    Audio,
    Cta,
}

impl Category {
    /// All categories in ranking order.
    pub const ALL: [Category; 4] = [
        Category::Hook,
        Category::Lighting,
        Category::Audio,
        Category::Cta,
    ];

    /// Returns the category as a string for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hook => "hook",
            Self::Lighting => "lighting",
            Self::Audio => "audio",
            Self::Cta => "cta",
        }
    }

    /// Parse a category name, ignoring case and surrounding whitespace.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "hook" => Some(Self::Hook),
            "lighting" => Some(Self::Lighting),
            "audio" => Some(Self::Audio),
            "cta" => Some(Self::Cta),
            _ => None,
        }
    }

    /// Badge label shown when this category leads the improvement ranking.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Hook => "Master del Gancho",
            Self::Lighting => "Master de la Iluminación",
            Self::Audio => "Master del Audio",
            Self::Cta => "Master de Conversión",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Urgency of a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl Priority {
    /// Returns the priority as a string for display.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Medium => "medium",
            Self::Low => "low",
        }
    }

    /// Parse a priority name. Only exact lowercase names are recognised.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "high" => Some(Self::High),
            "medium" => Some(Self::Medium),
            "low" => Some(Self::Low),
            _ => None,
        }
    }

    /// Numeric severity: high=5, medium=3, low=1. Lower is better.
    ///
    /// The same weights are used as the retention penalty of a recommendation.
    pub fn severity(&self) -> u8 {
        match self {
            Self::High => 5,
            Self::Medium => 3,
            Self::Low => 1,
        }
    }

    /// Severity of a raw priority value; anything unrecognised counts as low.
    pub fn severity_of(value: Option<&str>) -> u8 {
        value
            .and_then(Self::parse)
            .map(|p| p.severity())
            .unwrap_or(1)
    }
}

/// A single prioritized improvement recommendation.
///
/// Serialized with the `type` / `timestamp` field names the web client reads;
/// `category` / `timestamp_seconds` are accepted on input as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Recommendation {
    /// Identifier unique within one analysis (e.g. `rec-1`)
    pub id: String,

    /// Improvement area
    #[serde(rename = "type", alias = "category")]
    pub category: Category,

    /// Short title
    pub title: String,

    /// What to change
    pub description: String,

    /// Urgency
    pub priority: Priority,

    /// Offset into the video the recommendation refers to
    #[serde(rename = "timestamp", alias = "timestamp_seconds", default)]
    pub timestamp_seconds: u32,
}

impl Recommendation {
    /// Create a new recommendation.
    pub fn new(
        id: impl Into<String>,
        category: Category,
        title: impl Into<String>,
        description: impl Into<String>,
        priority: Priority,
        timestamp_seconds: u32,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            title: title.into(),
            description: description.into(),
            priority,
            timestamp_seconds,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse_is_case_insensitive() {
        assert_eq!(Category::parse("HOOK"), Some(Category::Hook));
        assert_eq!(Category::parse(" Lighting "), Some(Category::Lighting));
        assert_eq!(Category::parse("cta"), Some(Category::Cta));
        assert_eq!(Category::parse("pacing"), None);
    }

    #[test]
    fn test_category_labels() {
        assert_eq!(Category::Hook.label(), "Master del Gancho");
        assert_eq!(Category::Lighting.label(), "Master de la Iluminación");
        assert_eq!(Category::Audio.label(), "Master del Audio");
        assert_eq!(Category::Cta.label(), "Master de Conversión");
    }

    #[test]
    fn test_priority_severity() {
        assert_eq!(Priority::High.severity(), 5);
        assert_eq!(Priority::Medium.severity(), 3);
        assert_eq!(Priority::Low.severity(), 1);
        assert_eq!(Priority::severity_of(Some("urgent")), 1);
        assert_eq!(Priority::severity_of(None), 1);
        assert_eq!(Priority::severity_of(Some("medium")), 3);
    }

    #[test]
    fn test_recommendation_wire_names() {
        let rec = Recommendation::new(
            "rec-1",
            Category::Hook,
            "Gancho Visual",
            "Falta impacto inicial.",
            Priority::High,
            1,
        );
        let json = serde_json::to_value(&rec).unwrap();
        assert_eq!(json["type"], "hook");
        assert_eq!(json["timestamp"], 1);
        assert_eq!(json["priority"], "high");
        assert!(json.get("category").is_none());
    }

    #[test]
    fn test_recommendation_accepts_alias_names() {
        let rec: Recommendation = serde_json::from_str(
            r#"{"id":"a","category":"audio","title":"t","description":"d","priority":"low","timestamp_seconds":12}"#,
        )
        .unwrap();
        assert_eq!(rec.category, Category::Audio);
        assert_eq!(rec.timestamp_seconds, 12);
    }
}
