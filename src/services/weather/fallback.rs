//! Seasonal fallback
//!
//! Deterministic month-keyed substitute used when the live provider
//! is unusable, or to fill individual days whose fetch failed.

use chrono::NaiveDate;

use super::clothing::{self, DayProfile};
use super::comfort;
use crate::domain::{
    DailyForecast, ResolvedLocation, Season, Temperature, TemperatureUnit, WeatherCondition, Wind,
};

/// Confidence attached to fully seasonal contexts.
pub const FALLBACK_CONFIDENCE: f64 = 0.3;

/// Month-keyed defaults: (min, max, condition).
pub fn seasonal_profile(date: NaiveDate) -> (f64, f64, WeatherCondition) {
    match Season::for_date(date) {
        Season::Winter => (0.0, 10.0, WeatherCondition::Cloudy),
        Season::Spring => (10.0, 20.0, WeatherCondition::Cloudy),
        Season::Summer => (20.0, 30.0, WeatherCondition::Sunny),
        Season::Autumn => (10.0, 20.0, WeatherCondition::Cloudy),
    }
}

/// A fully synthetic day for the given date.
pub fn seasonal_day(date: NaiveDate) -> DailyForecast {
    let (min, max, condition) = seasonal_profile(date);
    let average = (min + max) / 2.0;
    let humidity: u8 = 60;
    let wind_kmh = 10.0;
    let precipitation: u8 = if condition == WeatherCondition::Sunny { 10 } else { 30 };

    let profile = DayProfile {
        temp_min: min,
        temp_max: max,
        temp_avg: average,
        condition,
        precipitation_probability: precipitation,
        humidity,
        wind_kmh,
    };

    DailyForecast {
        date,
        temperature: Temperature {
            min,
            max,
            average,
            feels_like: average,
            unit: TemperatureUnit::Celsius,
        },
        condition,
        condition_text: format!("seasonal average ({})", Season::for_date(date).as_str()),
        precipitation_probability: precipitation,
        wind: Wind {
            speed: wind_kmh,
            direction: "N".to_string(),
        },
        humidity,
        uv_index: None,
        visibility: None,
        pressure: None,
        comfort: comfort::compute(average, humidity as f64, wind_kmh),
        clothing: clothing::recommendations(&profile),
        quality: clothing::quality(&profile),
        is_fallback: true,
    }
}

/// Placeholder location for contexts where geocoding failed or no
/// location was given.
pub fn unresolved_location(query: Option<&str>) -> ResolvedLocation {
    ResolvedLocation {
        name: query.unwrap_or("Unknown location").to_string(),
        country: "Unknown".to_string(),
        state: None,
        lat: 0.0,
        lon: 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(m: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, m, 15).unwrap()
    }

    #[test]
    fn monthly_defaults() {
        assert_eq!(seasonal_profile(d(1)), (0.0, 10.0, WeatherCondition::Cloudy));
        assert_eq!(seasonal_profile(d(4)), (10.0, 20.0, WeatherCondition::Cloudy));
        assert_eq!(seasonal_profile(d(7)), (20.0, 30.0, WeatherCondition::Sunny));
        assert_eq!(seasonal_profile(d(10)), (10.0, 20.0, WeatherCondition::Cloudy));
        assert_eq!(seasonal_profile(d(12)), (0.0, 10.0, WeatherCondition::Cloudy));
    }

    #[test]
    fn seasonal_day_is_marked_and_complete() {
        let day = seasonal_day(d(7));
        assert!(day.is_fallback);
        assert_eq!(day.temperature.min, 20.0);
        assert_eq!(day.temperature.max, 30.0);
        assert_eq!(day.temperature.average, 25.0);
        assert_eq!(day.condition, WeatherCondition::Sunny);
        // Derived blocks are computed the same way as live days
        assert!(day.quality.score > 0);
        assert!(!day.clothing.fabrics.recommended.is_empty());
    }
}
