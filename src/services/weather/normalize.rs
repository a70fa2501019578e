//! Forecast normalization
//!
//! Turns raw provider samples into normalized daily forecasts:
//! condition classification, wind cardinal directions, temperature
//! fill-in, and the derived comfort/clothing/quality blocks.

use chrono::{NaiveDate, Timelike};

use super::clothing::{self, DayProfile};
use super::comfort;
use super::ForecastSample;
use crate::domain::{DailyForecast, Temperature, TemperatureUnit, WeatherCondition, Wind};

/// Exact provider condition names. Checked before the
/// case-insensitive and keyword passes.
const EXACT_CONDITIONS: [(&str, WeatherCondition); 8] = [
    ("Clear", WeatherCondition::Sunny),
    ("Clouds", WeatherCondition::Cloudy),
    ("Rain", WeatherCondition::Rainy),
    ("Drizzle", WeatherCondition::Rainy),
    ("Thunderstorm", WeatherCondition::Rainy),
    ("Snow", WeatherCondition::Snowy),
    ("Sleet", WeatherCondition::Snowy),
    ("Squall", WeatherCondition::Windy),
];

/// Classify a provider condition into one of the five categories:
/// exact match, then case-insensitive match, then keyword substring
/// over the description; `cloudy` when nothing matches.
pub fn classify_condition(main: &str, description: &str) -> WeatherCondition {
    for (name, condition) in EXACT_CONDITIONS {
        if main == name {
            return condition;
        }
    }

    let main_lower = main.to_lowercase();
    for (name, condition) in EXACT_CONDITIONS {
        if main_lower == name.to_lowercase() {
            return condition;
        }
    }

    let haystack = format!("{main_lower} {}", description.to_lowercase());
    for (needle, condition) in [
        ("rain", WeatherCondition::Rainy),
        ("drizzle", WeatherCondition::Rainy),
        ("storm", WeatherCondition::Rainy),
        ("snow", WeatherCondition::Snowy),
        ("sleet", WeatherCondition::Snowy),
        ("clear", WeatherCondition::Sunny),
        ("sun", WeatherCondition::Sunny),
        ("wind", WeatherCondition::Windy),
        ("gust", WeatherCondition::Windy),
    ] {
        if haystack.contains(needle) {
            return condition;
        }
    }

    WeatherCondition::Cloudy
}

const CARDINALS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// 16-point cardinal direction from degrees.
pub fn wind_direction(degrees: f64) -> &'static str {
    let normalized = degrees.rem_euclid(360.0);
    let idx = ((normalized / 22.5).round() as usize) % 16;
    CARDINALS[idx]
}

pub fn ms_to_kmh(speed_ms: f64) -> f64 {
    speed_ms * 3.6
}

/// Pick the sample for a target date: the one closest to midday on
/// that date, else the first sample in the series.
pub fn select_sample_for_date<'a>(
    samples: &'a [ForecastSample],
    date: NaiveDate,
) -> Option<&'a ForecastSample> {
    samples
        .iter()
        .filter(|s| s.timestamp.date_naive() == date)
        .min_by_key(|s| {
            let hour = s.timestamp.time().hour() as i64;
            let minute = s.timestamp.time().minute() as i64;
            ((hour * 60 + minute) - 12 * 60).abs()
        })
        .or_else(|| samples.first())
}

/// Build the normalized day from a raw sample.
pub fn normalize_day(date: NaiveDate, sample: &ForecastSample) -> DailyForecast {
    // Fill missing min/max from the point temperature
    let min = sample.temp_min.unwrap_or(sample.temp).min(sample.temp);
    let max = sample.temp_max.unwrap_or(sample.temp).max(sample.temp);
    let average = (min + max) / 2.0;

    let condition = classify_condition(&sample.condition_main, &sample.condition_description);
    let wind_kmh = ms_to_kmh(sample.wind_speed_ms);
    let precipitation = (sample.pop.clamp(0.0, 1.0) * 100.0).round() as u8;

    let profile = DayProfile {
        temp_min: min,
        temp_max: max,
        temp_avg: average,
        condition,
        precipitation_probability: precipitation,
        humidity: sample.humidity,
        wind_kmh,
    };

    DailyForecast {
        date,
        temperature: Temperature {
            min,
            max,
            average,
            feels_like: sample.feels_like.unwrap_or(sample.temp),
            unit: TemperatureUnit::Celsius,
        },
        condition,
        condition_text: sample.condition_description.clone(),
        precipitation_probability: precipitation,
        wind: Wind {
            speed: wind_kmh,
            direction: wind_direction(sample.wind_deg).to_string(),
        },
        humidity: sample.humidity,
        uv_index: sample.uv_index,
        visibility: sample.visibility,
        pressure: sample.pressure,
        comfort: comfort::compute(average, sample.humidity as f64, wind_kmh),
        clothing: clothing::recommendations(&profile),
        quality: clothing::quality(&profile),
        is_fallback: false,
    }
}
