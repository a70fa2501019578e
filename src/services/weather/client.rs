//! Weather provider client
//!
//! OpenWeatherMap-shaped HTTP client covering the two endpoints the
//! pipeline needs: direct geocoding and the 5-day/3-hour forecast.
//! Idempotent reads are retried with exponential backoff.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, instrument, warn};

use super::{ForecastProvider, ForecastSample};
use crate::domain::ResolvedLocation;
use crate::error::{PipelineError, PipelineResult};

const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org";

pub struct OpenWeatherClient {
    http: Client,
    base_url: String,
    api_key: String,
    retry_max: u32,
    retry_base_delay: Duration,
}

impl OpenWeatherClient {
    pub fn new(
        api_key: &str,
        timeout: Duration,
        retry_max: u32,
        retry_base_delay: Duration,
    ) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {e}"))?;

        Ok(Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: api_key.to_string(),
            retry_max: retry_max.max(1),
            retry_base_delay,
        })
    }

    /// GET with retries for transient failures. Delays are
    /// base * 1, 2, 4, ... across at most `retry_max` attempts.
    async fn get_with_retry<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> PipelineResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let mut attempt = 0;

        loop {
            attempt += 1;
            match self.try_get(&url, query).await {
                Ok(value) => return Ok(value),
                Err(e) if attempt < self.retry_max && is_transient(&e) => {
                    let delay = self.retry_base_delay * 2u32.pow(attempt - 1);
                    warn!(
                        url = %url,
                        attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Transient weather provider error, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn try_get<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(&str, String)],
    ) -> PipelineResult<T> {
        let response = self
            .http
            .get(url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    PipelineError::Network(format!("weather request timed out: {e}"))
                } else {
                    PipelineError::Network(format!("weather request failed: {e}"))
                }
            })?;

        let status = response.status();
        if status.is_success() {
            response.json::<T>().await.map_err(|e| {
                error!(error = %e, "Failed to parse weather provider response");
                PipelineError::WeatherApi(format!("invalid response body: {e}"))
            })
        } else {
            match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(PipelineError::AccessDenied),
                StatusCode::TOO_MANY_REQUESTS => Err(PipelineError::RateLimited),
                s if s.is_server_error() => {
                    Err(PipelineError::WeatherApi(format!("provider error: {s}")))
                }
                s => Err(PipelineError::WeatherApi(format!("unexpected status: {s}"))),
            }
        }
    }
}

fn is_transient(error: &PipelineError) -> bool {
    matches!(
        error,
        PipelineError::Network(_) | PipelineError::RateLimited | PipelineError::WeatherApi(_)
    )
}

// Provider wire types

#[derive(Debug, Deserialize)]
struct GeoEntry {
    name: String,
    country: String,
    #[serde(default)]
    state: Option<String>,
    lat: f64,
    lon: f64,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    list: Vec<RawSample>,
}

#[derive(Debug, Deserialize)]
struct RawSample {
    dt: i64,
    main: RawMain,
    #[serde(default)]
    weather: Vec<RawWeather>,
    #[serde(default)]
    wind: RawWind,
    #[serde(default)]
    pop: Option<f64>,
    #[serde(default)]
    visibility: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawMain {
    temp: f64,
    #[serde(default)]
    temp_min: Option<f64>,
    #[serde(default)]
    temp_max: Option<f64>,
    #[serde(default)]
    feels_like: Option<f64>,
    humidity: u8,
    #[serde(default)]
    pressure: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct RawWeather {
    main: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize, Default)]
struct RawWind {
    #[serde(default)]
    speed: f64,
    #[serde(default)]
    deg: f64,
}

impl RawSample {
    fn into_sample(self) -> Option<ForecastSample> {
        let timestamp: DateTime<Utc> = DateTime::from_timestamp(self.dt, 0)?;
        let (condition_main, condition_description) = self
            .weather
            .into_iter()
            .next()
            .map(|w| (w.main, w.description))
            .unwrap_or_default();

        Some(ForecastSample {
            timestamp,
            temp: self.main.temp,
            temp_min: self.main.temp_min,
            temp_max: self.main.temp_max,
            feels_like: self.main.feels_like,
            humidity: self.main.humidity,
            pressure: self.main.pressure,
            visibility: self.visibility,
            uv_index: None,
            wind_speed_ms: self.wind.speed,
            wind_deg: self.wind.deg,
            condition_main,
            condition_description,
            pop: self.pop.unwrap_or(0.0),
        })
    }
}

#[async_trait]
impl ForecastProvider for OpenWeatherClient {
    #[instrument(skip(self))]
    async fn geocode(&self, query: &str) -> PipelineResult<Option<ResolvedLocation>> {
        let entries: Vec<GeoEntry> = self
            .get_with_retry(
                "/geo/1.0/direct",
                &[("q", query.to_string()), ("limit", "1".to_string())],
            )
            .await?;

        debug!(query, resolved = !entries.is_empty(), "Geocoding result");

        Ok(entries.into_iter().next().map(|e| ResolvedLocation {
            name: e.name,
            country: e.country,
            state: e.state,
            lat: e.lat,
            lon: e.lon,
        }))
    }

    #[instrument(skip(self))]
    async fn forecast(&self, lat: f64, lon: f64) -> PipelineResult<Vec<ForecastSample>> {
        let response: ForecastResponse = self
            .get_with_retry(
                "/data/2.5/forecast",
                &[
                    ("lat", lat.to_string()),
                    ("lon", lon.to_string()),
                    ("units", "metric".to_string()),
                ],
            )
            .await?;

        let samples: Vec<ForecastSample> = response
            .list
            .into_iter()
            .filter_map(RawSample::into_sample)
            .collect();

        debug!(lat, lon, samples = samples.len(), "Forecast series fetched");
        Ok(samples)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_sample_conversion() {
        let raw: RawSample = serde_json::from_value(serde_json::json!({
            "dt": 1770465600i64,
            "main": {"temp": 14.2, "temp_min": 12.0, "temp_max": 16.0, "feels_like": 13.0, "humidity": 70, "pressure": 1012.0},
            "weather": [{"main": "Rain", "description": "light rain"}],
            "wind": {"speed": 4.2, "deg": 200.0},
            "pop": 0.65
        }))
        .unwrap();
        let sample = raw.into_sample().unwrap();
        assert_eq!(sample.temp, 14.2);
        assert_eq!(sample.condition_main, "Rain");
        assert_eq!(sample.pop, 0.65);
    }

    #[test]
    fn raw_sample_tolerates_missing_fields() {
        let raw: RawSample = serde_json::from_value(serde_json::json!({
            "dt": 1770465600i64,
            "main": {"temp": 20.0, "humidity": 50}
        }))
        .unwrap();
        let sample = raw.into_sample().unwrap();
        assert_eq!(sample.temp_min, None);
        assert_eq!(sample.condition_main, "");
        assert_eq!(sample.pop, 0.0);
    }

    #[test]
    fn transient_classification() {
        assert!(is_transient(&PipelineError::RateLimited));
        assert!(is_transient(&PipelineError::Network("reset".into())));
        assert!(!is_transient(&PipelineError::AccessDenied));
    }
}
