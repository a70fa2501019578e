//! Per-session context file
//!
//! The aggregate of user input, extracted/confirmed details, weather
//! context and derived constraints that feeds outfit generation.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::event::{DressCode, EventDescriptor};
use super::session::Stage;
use super::weather::{DataSource, WeatherContext};

/// Meteorological season, northern-hemisphere convention (matches the
/// seasonal fallback keying).
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Season {
    Winter,
    Spring,
    Summer,
    Autumn,
}

impl Season {
    pub fn for_date(date: NaiveDate) -> Self {
        match date.month() {
            12 | 1 | 2 => Self::Winter,
            3..=5 => Self::Spring,
            6..=8 => Self::Summer,
            _ => Self::Autumn,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Winter => "winter",
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
        }
    }
}

/// What the user told us, raw and structured.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserInputContext {
    pub original_message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_details: Option<EventDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_details: Option<EventDescriptor>,
    pub clarifications: Vec<String>,
}

/// Weather and place context gathered for the event window.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct EnvironmentalContext {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weather: Option<WeatherContext>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub season: Option<Season>,
}

/// Hard and soft constraints derived for generation.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContextConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dress_code: Option<DressCode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub budget: Option<f64>,
    pub weather_constraints: Vec<String>,
    pub occasion_constraints: Vec<String>,
}

/// Quality metadata stamped on every mutation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextMetadata {
    pub processing_stage: Stage,
    pub confidence: f64,
    pub completeness: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_source: Option<DataSource>,
    pub updated_at: DateTime<Utc>,
}

/// The full per-session context file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextFile {
    pub session_id: String,
    pub user_input: UserInputContext,
    pub environmental_context: EnvironmentalContext,
    pub constraints: ContextConstraints,
    pub metadata: ContextMetadata,
    pub created_at: DateTime<Utc>,
}

impl ContextFile {
    pub fn new(session_id: String, original_message: String, now: DateTime<Utc>) -> Self {
        Self {
            session_id,
            user_input: UserInputContext {
                original_message,
                ..Default::default()
            },
            environmental_context: EnvironmentalContext::default(),
            constraints: ContextConstraints::default(),
            metadata: ContextMetadata {
                processing_stage: Stage::InputProcessing,
                confidence: 0.0,
                completeness: 0.0,
                data_source: None,
                updated_at: now,
            },
            created_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn season_boundaries() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();
        assert_eq!(Season::for_date(d(2026, 12, 1)), Season::Winter);
        assert_eq!(Season::for_date(d(2026, 2, 28)), Season::Winter);
        assert_eq!(Season::for_date(d(2026, 3, 1)), Season::Spring);
        assert_eq!(Season::for_date(d(2026, 8, 31)), Season::Summer);
        assert_eq!(Season::for_date(d(2026, 11, 30)), Season::Autumn);
    }
}
