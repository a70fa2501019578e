//! Comfort index computations
//!
//! Heat index (Steadman/Rothfusz regression), wind chill (JAG/TI
//! metric formula), apparent temperature, and the Thom discomfort
//! index. All temperatures in celsius, wind in km/h, humidity in %.

use crate::domain::{ComfortIndices, ComfortLevel};

/// Heat index applies from 27 degC and 40% relative humidity.
pub const HEAT_INDEX_MIN_TEMP: f64 = 27.0;
pub const HEAT_INDEX_MIN_HUMIDITY: f64 = 40.0;

/// Wind chill applies up to 10 degC and from 4.8 km/h wind.
pub const WIND_CHILL_MAX_TEMP: f64 = 10.0;
pub const WIND_CHILL_MIN_WIND: f64 = 4.8;

fn c_to_f(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

fn f_to_c(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

/// Rothfusz regression, computed in Fahrenheit. Never below the
/// actual temperature.
pub fn heat_index(temp_c: f64, humidity: f64) -> Option<f64> {
    if temp_c < HEAT_INDEX_MIN_TEMP || humidity < HEAT_INDEX_MIN_HUMIDITY {
        return None;
    }

    let t = c_to_f(temp_c);
    let r = humidity;
    let hi_f = -42.379 + 2.049_015_23 * t + 10.143_331_27 * r
        - 0.224_755_41 * t * r
        - 6.837_83e-3 * t * t
        - 5.481_717e-2 * r * r
        + 1.228_74e-3 * t * t * r
        + 8.528_2e-4 * t * r * r
        - 1.99e-6 * t * t * r * r;

    Some(f_to_c(hi_f).max(temp_c))
}

/// JAG/TI wind chill. Never above the actual temperature.
pub fn wind_chill(temp_c: f64, wind_kmh: f64) -> Option<f64> {
    if temp_c > WIND_CHILL_MAX_TEMP || wind_kmh < WIND_CHILL_MIN_WIND {
        return None;
    }

    let v = wind_kmh.powf(0.16);
    let wc = 13.12 + 0.6215 * temp_c - 11.37 * v + 0.3965 * temp_c * v;
    Some(wc.min(temp_c))
}

/// Thom discomfort index.
pub fn discomfort_index(temp_c: f64, humidity: f64) -> f64 {
    temp_c - 0.55 * (1.0 - 0.01 * humidity) * (temp_c - 14.5)
}

/// Qualitative reading of the Thom index.
pub fn discomfort_level(index: f64) -> &'static str {
    if index < 21.0 {
        "comfortable"
    } else if index < 24.0 {
        "mild discomfort"
    } else if index < 27.0 {
        "noticeable discomfort"
    } else if index < 29.0 {
        "significant discomfort"
    } else if index < 32.0 {
        "severe discomfort"
    } else {
        "dangerous"
    }
}

/// Full set of derived indices for one day.
pub fn compute(temp_c: f64, humidity: f64, wind_kmh: f64) -> ComfortIndices {
    let heat = heat_index(temp_c, humidity);
    let chill = wind_chill(temp_c, wind_kmh);
    let apparent = heat.or(chill).unwrap_or(temp_c);
    let discomfort = discomfort_index(temp_c, humidity);

    let comfort_level = if heat.is_some_and(|h| h >= 32.0) {
        ComfortLevel::Hot
    } else if chill.is_some_and(|c| c <= 0.0) {
        ComfortLevel::Cold
    } else if humidity >= 80.0 && temp_c >= 18.0 {
        ComfortLevel::Humid
    } else if temp_c >= 30.0 {
        ComfortLevel::Hot
    } else if temp_c <= 5.0 {
        ComfortLevel::Cold
    } else {
        ComfortLevel::Comfortable
    };

    ComfortIndices {
        heat_index: heat,
        wind_chill: chill,
        apparent_temperature: apparent,
        discomfort_index: discomfort,
        discomfort_level: discomfort_level(discomfort).to_string(),
        comfort_level,
    }
}
