//! Weather context types
//!
//! The multi-day weather context attached to a session: normalized
//! per-day forecasts, derived comfort indices, clothing guidance and
//! a range summary. Field names follow the wire format (camelCase).

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// The five normalized condition categories.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WeatherCondition {
    Sunny,
    Cloudy,
    Rainy,
    Snowy,
    Windy,
}

impl WeatherCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sunny => "sunny",
            Self::Cloudy => "cloudy",
            Self::Rainy => "rainy",
            Self::Snowy => "snowy",
            Self::Windy => "windy",
        }
    }
}

impl std::fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Geocoded location.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedLocation {
    pub name: String,
    pub country: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    pub lat: f64,
    pub lon: f64,
}

/// Effective forecast range, clamped to the configured horizon.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub duration: u32,
}

/// Normalized per-day temperatures, always celsius.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Temperature {
    pub min: f64,
    pub max: f64,
    pub average: f64,
    pub feels_like: f64,
    pub unit: TemperatureUnit,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TemperatureUnit {
    #[default]
    Celsius,
}

/// Wind speed in km/h with a 16-point cardinal direction.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Wind {
    pub speed: f64,
    pub direction: String,
}

/// Qualitative comfort tag for a day.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ComfortLevel {
    Hot,
    Cold,
    Humid,
    Comfortable,
}

/// Derived comfort indices. Heat index and wind chill are only
/// present when their applicability thresholds are met.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComfortIndices {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub heat_index: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wind_chill: Option<f64>,
    pub apparent_temperature: f64,
    pub discomfort_index: f64,
    pub discomfort_level: String,
    pub comfort_level: ComfortLevel,
}

/// How much layering a day calls for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
#[serde(rename_all = "lowercase")]
pub enum LayeringTier {
    None,
    Light,
    Moderate,
    Heavy,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Urgency {
    Essential,
    Recommended,
}

/// A yes/no need with an urgency when needed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ProtectionNeed {
    pub needed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub urgency: Option<Urgency>,
}

impl ProtectionNeed {
    pub fn not_needed() -> Self {
        Self { needed: false, urgency: None }
    }

    pub fn needed(urgency: Urgency) -> Self {
        Self { needed: true, urgency: Some(urgency) }
    }
}

/// Warm accessories with the specific items called for.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccessoryNeed {
    pub needed: bool,
    pub items: Vec<String>,
}

/// Paired recommended/avoid lists (footwear, fabrics, colors).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct RecommendAvoid {
    pub recommended: Vec<String>,
    pub avoid: Vec<String>,
}

/// Clothing guidance derived from a day's normalized forecast.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ClothingRecommendations {
    pub layering: LayeringTier,
    pub waterproof: ProtectionNeed,
    pub sun_protection: ProtectionNeed,
    pub warm_accessories: AccessoryNeed,
    pub footwear: RecommendAvoid,
    pub fabrics: RecommendAvoid,
    pub colors: RecommendAvoid,
    pub activity_adjustments: Vec<String>,
    pub comfort_tips: Vec<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum QualityRating {
    Excellent,
    Good,
    Fair,
    Challenging,
    Difficult,
}

impl QualityRating {
    /// Classify a 0-100 score.
    pub fn from_score(score: u32) -> Self {
        match score {
            80..=100 => Self::Excellent,
            60..=79 => Self::Good,
            40..=59 => Self::Fair,
            20..=39 => Self::Challenging,
            _ => Self::Difficult,
        }
    }
}

/// Overall weather quality for a day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherQuality {
    pub score: u32,
    pub rating: QualityRating,
}

/// One normalized forecast day.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DailyForecast {
    pub date: NaiveDate,
    pub temperature: Temperature,
    pub condition: WeatherCondition,
    /// Raw provider condition text, kept for prompt context.
    pub condition_text: String,
    pub precipitation_probability: u8,
    pub wind: Wind,
    pub humidity: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uv_index: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pressure: Option<f64>,
    pub comfort: ComfortIndices,
    pub clothing: ClothingRecommendations,
    pub quality: WeatherQuality,
    /// True for days substituted by the seasonal fallback.
    #[serde(default)]
    pub is_fallback: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum WeatherConcern {
    Rain,
    Cold,
    Heat,
    Wind,
}

/// Min-of-mins / max-of-maxes across the range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TemperatureSpan {
    pub min: f64,
    pub max: f64,
}

/// Range-level summary of the daily forecasts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherSummary {
    pub overall_condition: WeatherCondition,
    pub temperature_range: TemperatureSpan,
    pub significant_change: bool,
    pub primary_concerns: Vec<WeatherConcern>,
}

/// Where the forecast data came from.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum DataSource {
    #[serde(rename = "OpenWeatherMap")]
    Live,
    #[serde(rename = "Seasonal Fallback")]
    SeasonalFallback,
}

/// The full weather context for a session's event window.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WeatherContext {
    pub location: ResolvedLocation,
    pub date_range: DateRange,
    pub daily_forecasts: Vec<DailyForecast>,
    pub summary: WeatherSummary,
    pub data_source: DataSource,
    pub confidence: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quality_rating_thresholds() {
        assert_eq!(QualityRating::from_score(100), QualityRating::Excellent);
        assert_eq!(QualityRating::from_score(80), QualityRating::Excellent);
        assert_eq!(QualityRating::from_score(79), QualityRating::Good);
        assert_eq!(QualityRating::from_score(60), QualityRating::Good);
        assert_eq!(QualityRating::from_score(40), QualityRating::Fair);
        assert_eq!(QualityRating::from_score(20), QualityRating::Challenging);
        assert_eq!(QualityRating::from_score(19), QualityRating::Difficult);
        assert_eq!(QualityRating::from_score(0), QualityRating::Difficult);
    }

    #[test]
    fn data_source_wire_names() {
        assert_eq!(
            serde_json::to_string(&DataSource::SeasonalFallback).unwrap(),
            "\"Seasonal Fallback\""
        );
        assert_eq!(serde_json::to_string(&DataSource::Live).unwrap(), "\"OpenWeatherMap\"");
    }

    #[test]
    fn condition_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&WeatherCondition::Rainy).unwrap(), "\"rainy\"");
    }
}
