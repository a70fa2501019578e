//! Event descriptor types
//!
//! The structured representation of the user's occasion, produced by
//! LLM extraction and confirmed by the user. Field names follow the
//! extraction wire format (camelCase).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The five formality levels used across extraction, confirmation and
/// generation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum DressCode {
    Casual,
    SmartCasual,
    Business,
    Formal,
    BlackTie,
}

impl DressCode {
    pub const ALL: [DressCode; 5] = [
        DressCode::Casual,
        DressCode::SmartCasual,
        DressCode::Business,
        DressCode::Formal,
        DressCode::BlackTie,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Casual => "casual",
            Self::SmartCasual => "smart-casual",
            Self::Business => "business",
            Self::Formal => "formal",
            Self::BlackTie => "black-tie",
        }
    }

    /// Parse a dress code string, case-insensitive, accepting a few
    /// common separator variants ("smart casual", "smart_casual").
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().replace([' ', '_'], "-").as_str() {
            "casual" => Some(Self::Casual),
            "smart-casual" => Some(Self::SmartCasual),
            "business" => Some(Self::Business),
            "formal" => Some(Self::Formal),
            "black-tie" => Some(Self::BlackTie),
            _ => None,
        }
    }

    /// Keyword map used by both the extraction prompt and the
    /// deterministic fallback extractor. Order matters: earlier
    /// entries win on the first keyword hit.
    pub fn keyword_map() -> &'static [(&'static str, DressCode)] {
        &[
            ("black tie", DressCode::BlackTie),
            ("black-tie", DressCode::BlackTie),
            ("gala", DressCode::Formal),
            ("wedding", DressCode::Formal),
            ("ceremony", DressCode::Formal),
            ("interview", DressCode::Business),
            ("board meeting", DressCode::Business),
            ("client meeting", DressCode::Business),
            ("conference", DressCode::SmartCasual),
            ("networking", DressCode::SmartCasual),
            ("dinner", DressCode::SmartCasual),
            ("festival", DressCode::Casual),
            ("beach", DressCode::Casual),
            ("hiking", DressCode::Casual),
            ("picnic", DressCode::Casual),
            ("concert", DressCode::Casual),
        ]
    }
}

impl std::fmt::Display for DressCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-day plan for multi-day events.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyPlan {
    pub day: u32,
    pub activity: String,
    pub dress_code: DressCode,
}

/// Extracted (or user-confirmed) event details.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EventDescriptor {
    pub occasion: String,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    pub duration: u32,
    pub dress_code: DressCode,
    #[serde(default)]
    pub budget: Option<f64>,
    #[serde(default)]
    pub special_requirements: Vec<String>,
    #[serde(default)]
    pub needs_clarification: Vec<String>,
    pub confidence: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub daily_plans: Option<Vec<DailyPlan>>,
}

impl EventDescriptor {
    /// Minimal descriptor used as the base for fallback extraction.
    pub fn minimal(occasion: impl Into<String>) -> Self {
        Self {
            occasion: occasion.into(),
            location: None,
            start_date: None,
            duration: 1,
            dress_code: DressCode::SmartCasual,
            budget: None,
            special_requirements: Vec::new(),
            needs_clarification: Vec::new(),
            confidence: 0.5,
            daily_plans: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dress_code_round_trips_kebab_case() {
        let json = serde_json::to_string(&DressCode::SmartCasual).unwrap();
        assert_eq!(json, "\"smart-casual\"");
        let parsed: DressCode = serde_json::from_str("\"black-tie\"").unwrap();
        assert_eq!(parsed, DressCode::BlackTie);
    }

    #[test]
    fn dress_code_parse_accepts_variants() {
        assert_eq!(DressCode::parse("Smart Casual"), Some(DressCode::SmartCasual));
        assert_eq!(DressCode::parse("BLACK_TIE"), Some(DressCode::BlackTie));
        assert_eq!(DressCode::parse("smart"), None);
    }

    #[test]
    fn descriptor_serializes_camel_case() {
        let mut details = EventDescriptor::minimal("festival");
        details.start_date = NaiveDate::from_ymd_opt(2026, 6, 12);
        let value = serde_json::to_value(&details).unwrap();
        assert_eq!(value["startDate"], "2026-06-12");
        assert_eq!(value["dressCode"], "smart-casual");
        assert!(value.get("dailyPlans").is_none());
    }
}
