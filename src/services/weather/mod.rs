//! Weather context builder
//!
//! Produces the multi-day weather context for a `(location, start,
//! duration)` tuple: geocoding, cached per-day forecasts, normalized
//! conditions, comfort indices, clothing guidance and a range
//! summary. Unrecoverable provider failures degrade to the seasonal
//! fallback instead of failing the pipeline.

pub mod cache;
pub mod client;
pub mod clothing;
pub mod comfort;
pub mod fallback;
pub mod normalize;

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, Utc};
use tracing::{debug, instrument, warn};

use crate::domain::{
    DailyForecast, DataSource, DateRange, ResolvedLocation, TemperatureSpan, WeatherCondition,
    WeatherConcern, WeatherContext, WeatherSummary,
};
use crate::error::PipelineResult;

pub use cache::WeatherCache;
pub use client::OpenWeatherClient;

/// One raw provider sample (a point-in-time forecast entry).
#[derive(Debug, Clone)]
pub struct ForecastSample {
    pub timestamp: DateTime<Utc>,
    pub temp: f64,
    pub temp_min: Option<f64>,
    pub temp_max: Option<f64>,
    pub feels_like: Option<f64>,
    pub humidity: u8,
    pub pressure: Option<f64>,
    pub visibility: Option<f64>,
    pub uv_index: Option<f64>,
    pub wind_speed_ms: f64,
    pub wind_deg: f64,
    pub condition_main: String,
    pub condition_description: String,
    /// Precipitation probability in [0,1].
    pub pop: f64,
}

/// The weather provider seam. Tests substitute in-memory doubles.
#[async_trait]
pub trait ForecastProvider: Send + Sync {
    async fn geocode(&self, query: &str) -> PipelineResult<Option<ResolvedLocation>>;
    async fn forecast(&self, lat: f64, lon: f64) -> PipelineResult<Vec<ForecastSample>>;
}

pub struct WeatherContextBuilder {
    provider: Arc<dyn ForecastProvider>,
    cache: WeatherCache,
    max_days: u32,
}

impl WeatherContextBuilder {
    pub fn new(provider: Arc<dyn ForecastProvider>, cache_ttl: Duration, max_days: u32) -> Self {
        Self {
            provider,
            cache: WeatherCache::new(cache_ttl),
            max_days: max_days.max(1),
        }
    }

    /// Build the weather context for the event window. Never fails:
    /// any unrecoverable provider problem yields the seasonal
    /// fallback with reduced confidence.
    #[instrument(skip(self))]
    pub async fn build(
        &self,
        location: Option<&str>,
        start_date: Option<NaiveDate>,
        duration: u32,
        today: NaiveDate,
    ) -> WeatherContext {
        let (start, end) = self.effective_range(start_date, duration, today);
        let dates: Vec<NaiveDate> = itinerary(start, end);

        let resolved = match location {
            Some(query) => match self.provider.geocode(query).await {
                Ok(Some(resolved)) => Some(resolved),
                Ok(None) => {
                    warn!(query, "Location not found, using seasonal fallback");
                    None
                }
                Err(e) => {
                    warn!(query, error = %e, "Geocoding failed, using seasonal fallback");
                    None
                }
            },
            None => {
                debug!("No location given, using seasonal fallback");
                None
            }
        };

        let Some(resolved) = resolved else {
            let days: Vec<DailyForecast> = dates.iter().map(|&d| fallback::seasonal_day(d)).collect();
            return self.assemble(fallback::unresolved_location(location), start, end, days);
        };

        // Per-day read-through: cache, then the (memoized) live
        // series, then the seasonal substitute for that day.
        let mut series: Option<Option<Vec<ForecastSample>>> = None;
        let mut days = Vec::with_capacity(dates.len());

        for &date in &dates {
            if let Some(day) = self.cache.get(resolved.lat, resolved.lon, date) {
                days.push(day);
                continue;
            }

            let samples = match &series {
                Some(cached) => cached.as_deref(),
                None => {
                    let fetched = match self.provider.forecast(resolved.lat, resolved.lon).await {
                        Ok(samples) => Some(samples),
                        Err(e) => {
                            warn!(error = %e, "Forecast fetch failed, filling days seasonally");
                            None
                        }
                    };
                    series = Some(fetched);
                    series.as_ref().unwrap().as_deref()
                }
            };

            let day = samples
                .and_then(|s| normalize::select_sample_for_date(s, date))
                .map(|sample| normalize::normalize_day(date, sample));

            match day {
                Some(day) => {
                    self.cache.insert(resolved.lat, resolved.lon, date, day.clone());
                    days.push(day);
                }
                None => days.push(fallback::seasonal_day(date)),
            }
        }

        self.assemble(resolved, start, end, days)
    }

    /// Clamp the requested window to the forecast horizon.
    fn effective_range(
        &self,
        start_date: Option<NaiveDate>,
        duration: u32,
        today: NaiveDate,
    ) -> (NaiveDate, NaiveDate) {
        let start = start_date.unwrap_or(today);
        let requested_end = start
            .checked_add_days(Days::new(duration.saturating_sub(1) as u64))
            .unwrap_or(start);
        let horizon = today
            .checked_add_days(Days::new(self.max_days.saturating_sub(1) as u64))
            .unwrap_or(today);

        let end = requested_end.min(horizon);
        if end < requested_end {
            warn!(
                requested_end = %requested_end,
                clamped_end = %end,
                "Forecast range clamped to horizon"
            );
        }
        // A start beyond the horizon collapses to a single day
        if end < start {
            (start, start)
        } else {
            (start, end)
        }
    }

    fn assemble(
        &self,
        location: ResolvedLocation,
        start: NaiveDate,
        end: NaiveDate,
        days: Vec<DailyForecast>,
    ) -> WeatherContext {
        let total = days.len().max(1);
        let live = days.iter().filter(|d| !d.is_fallback).count();
        let confidence = fallback::FALLBACK_CONFIDENCE
            + (1.0 - fallback::FALLBACK_CONFIDENCE) * (live as f64 / total as f64);
        let data_source = if live > 0 {
            DataSource::Live
        } else {
            DataSource::SeasonalFallback
        };

        let summary = summarize(&days);
        WeatherContext {
            location,
            date_range: DateRange {
                start,
                end,
                duration: days.len() as u32,
            },
            daily_forecasts: days,
            summary,
            data_source,
            confidence,
        }
    }
}

fn itinerary(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();
    let mut current = start;
    while current <= end {
        dates.push(current);
        match current.succ_opt() {
            Some(next) => current = next,
            None => break,
        }
    }
    dates
}

/// Range summary: modal condition (ties broken by last occurrence),
/// min-of-mins/max-of-maxes, significant-change flag, concern list.
pub fn summarize(days: &[DailyForecast]) -> WeatherSummary {
    let mut tallies: HashMap<WeatherCondition, (usize, usize)> = HashMap::new();
    for (idx, day) in days.iter().enumerate() {
        let entry = tallies.entry(day.condition).or_insert((0, 0));
        entry.0 += 1;
        entry.1 = idx;
    }
    let overall_condition = tallies
        .into_iter()
        .max_by_key(|&(_, (count, last_idx))| (count, last_idx))
        .map(|(condition, _)| condition)
        .unwrap_or(WeatherCondition::Cloudy);

    let min = days
        .iter()
        .map(|d| d.temperature.min)
        .fold(f64::INFINITY, f64::min);
    let max = days
        .iter()
        .map(|d| d.temperature.max)
        .fold(f64::NEG_INFINITY, f64::max);

    let significant_change = days.windows(2).any(|pair| {
        let delta = (pair[0].temperature.average - pair[1].temperature.average).abs();
        let swap = matches!(
            (pair[0].condition, pair[1].condition),
            (WeatherCondition::Sunny, WeatherCondition::Rainy)
                | (WeatherCondition::Rainy, WeatherCondition::Sunny)
        );
        delta > 10.0 || swap
    });

    let mut primary_concerns = Vec::new();
    if days
        .iter()
        .any(|d| d.condition == WeatherCondition::Rainy || d.precipitation_probability >= 50)
    {
        primary_concerns.push(WeatherConcern::Rain);
    }
    if days.iter().any(|d| d.temperature.min <= 5.0) {
        primary_concerns.push(WeatherConcern::Cold);
    }
    if days.iter().any(|d| d.temperature.max >= 30.0) {
        primary_concerns.push(WeatherConcern::Heat);
    }
    if days.iter().any(|d| d.wind.speed >= 25.0) {
        primary_concerns.push(WeatherConcern::Wind);
    }

    WeatherSummary {
        overall_condition,
        temperature_range: TemperatureSpan {
            min: if min.is_finite() { min } else { 0.0 },
            max: if max.is_finite() { max } else { 0.0 },
        },
        significant_change,
        primary_concerns,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use parking_lot::Mutex;

    struct MockProvider {
        location: Option<ResolvedLocation>,
        samples: Vec<ForecastSample>,
        geocode_calls: Mutex<u32>,
        forecast_calls: Mutex<u32>,
        fail_forecast: bool,
    }

    impl MockProvider {
        fn resolving(samples: Vec<ForecastSample>) -> Self {
            Self {
                location: Some(ResolvedLocation {
                    name: "London".into(),
                    country: "GB".into(),
                    state: None,
                    lat: 51.5072,
                    lon: -0.1276,
                }),
                samples,
                geocode_calls: Mutex::new(0),
                forecast_calls: Mutex::new(0),
                fail_forecast: false,
            }
        }

        fn unresolving() -> Self {
            Self {
                location: None,
                samples: Vec::new(),
                geocode_calls: Mutex::new(0),
                forecast_calls: Mutex::new(0),
                fail_forecast: false,
            }
        }
    }

    #[async_trait]
    impl ForecastProvider for MockProvider {
        async fn geocode(&self, _query: &str) -> PipelineResult<Option<ResolvedLocation>> {
            *self.geocode_calls.lock() += 1;
            Ok(self.location.clone())
        }

        async fn forecast(&self, _lat: f64, _lon: f64) -> PipelineResult<Vec<ForecastSample>> {
            *self.forecast_calls.lock() += 1;
            if self.fail_forecast {
                return Err(crate::error::PipelineError::WeatherApi("boom".into()));
            }
            Ok(self.samples.clone())
        }
    }

    fn sample_at(date: NaiveDate, hour: u32, temp: f64, main: &str) -> ForecastSample {
        let timestamp = Utc
            .with_ymd_and_hms(
                chrono::Datelike::year(&date),
                chrono::Datelike::month(&date),
                chrono::Datelike::day(&date),
                hour,
                0,
                0,
            )
            .unwrap();
        ForecastSample {
            timestamp,
            temp,
            temp_min: Some(temp - 2.0),
            temp_max: Some(temp + 2.0),
            feels_like: Some(temp),
            humidity: 55,
            pressure: None,
            visibility: None,
            uv_index: None,
            wind_speed_ms: 3.0,
            wind_deg: 180.0,
            condition_main: main.to_string(),
            condition_description: main.to_lowercase(),
            pop: 0.1,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 10).unwrap()
    }

    fn builder(provider: MockProvider) -> WeatherContextBuilder {
        WeatherContextBuilder::new(Arc::new(provider), Duration::from_secs(3600), 14)
    }

    #[tokio::test]
    async fn live_forecast_for_covered_days() {
        let samples = (0..3)
            .map(|i| {
                sample_at(
                    today().checked_add_days(Days::new(i)).unwrap(),
                    12,
                    18.0,
                    "Clear",
                )
            })
            .collect();
        let builder = builder(MockProvider::resolving(samples));
        let context = builder.build(Some("London"), Some(today()), 3, today()).await;

        assert_eq!(context.data_source, DataSource::Live);
        assert_eq!(context.date_range.duration, 3);
        assert!((context.confidence - 1.0).abs() < 1e-9);
        assert!(context.daily_forecasts.iter().all(|d| !d.is_fallback));
        assert_eq!(context.summary.overall_condition, WeatherCondition::Sunny);
    }

    #[tokio::test]
    async fn geocode_failure_yields_seasonal_context() {
        let builder = builder(MockProvider::unresolving());
        let context = builder
            .build(Some("Nowhereville"), Some(today()), 3, today())
            .await;

        assert_eq!(context.data_source, DataSource::SeasonalFallback);
        assert!((context.confidence - 0.3).abs() < 1e-9);
        assert!(context.daily_forecasts.iter().all(|d| d.is_fallback));
        assert_eq!(context.location.name, "Nowhereville");
        // June: summer defaults
        assert_eq!(context.daily_forecasts[0].temperature.min, 20.0);
        assert_eq!(context.daily_forecasts[0].temperature.max, 30.0);
    }

    #[tokio::test]
    async fn duration_fifteen_clamps_to_fourteen() {
        let builder = builder(MockProvider::resolving(vec![sample_at(today(), 12, 18.0, "Clouds")]));
        let context = builder.build(Some("London"), Some(today()), 15, today()).await;
        assert_eq!(context.date_range.duration, 14);

        // Duration 14 starting today needs no clamping
        let context = builder.build(Some("London"), Some(today()), 14, today()).await;
        assert_eq!(context.date_range.duration, 14);
    }

    #[tokio::test]
    async fn forecast_failure_fills_days_seasonally() {
        let mut provider = MockProvider::resolving(Vec::new());
        provider.fail_forecast = true;
        let builder = builder(provider);
        let context = builder.build(Some("London"), Some(today()), 2, today()).await;

        assert!(context.daily_forecasts.iter().all(|d| d.is_fallback));
        assert_eq!(context.data_source, DataSource::SeasonalFallback);
        assert!((context.confidence - 0.3).abs() < 1e-9);
        // Geocoding succeeded, so the real location is kept
        assert_eq!(context.location.name, "London");
    }

    #[tokio::test]
    async fn second_build_hits_cache() {
        let samples = vec![sample_at(today(), 12, 18.0, "Clear")];
        let provider = Arc::new(MockProvider::resolving(samples));
        let builder = WeatherContextBuilder::new(
            Arc::clone(&provider) as Arc<dyn ForecastProvider>,
            Duration::from_secs(3600),
            14,
        );

        builder.build(Some("London"), Some(today()), 1, today()).await;
        builder.build(Some("London"), Some(today()), 1, today()).await;

        // The cached day spares the second forecast fetch
        assert_eq!(*provider.forecast_calls.lock(), 1);
        assert_eq!(*provider.geocode_calls.lock(), 2);
    }

    #[test]
    fn summary_tie_broken_by_last_occurrence() {
        let d = |i: u64| today().checked_add_days(Days::new(i)).unwrap();
        let mut days: Vec<DailyForecast> = vec![
            fallback::seasonal_day(d(0)),
            fallback::seasonal_day(d(1)),
            fallback::seasonal_day(d(2)),
            fallback::seasonal_day(d(3)),
        ];
        // Two sunny (June seasonal default), then override the last
        // two to rainy: tie of 2 vs 2, rainy occurs last.
        days[2].condition = WeatherCondition::Rainy;
        days[3].condition = WeatherCondition::Rainy;
        let summary = summarize(&days);
        assert_eq!(summary.overall_condition, WeatherCondition::Rainy);
        // Sunny followed by rainy counts as a significant change
        assert!(summary.significant_change);
        assert!(summary.primary_concerns.contains(&WeatherConcern::Rain));
    }

    #[test]
    fn summary_temperature_span_and_concerns() {
        let d = |i: u64| today().checked_add_days(Days::new(i)).unwrap();
        let mut days = vec![fallback::seasonal_day(d(0)), fallback::seasonal_day(d(1))];
        days[0].temperature.min = 2.0;
        days[0].temperature.average = 8.0;
        days[1].temperature.max = 31.0;
        days[1].temperature.average = 24.0;
        days[1].wind.speed = 30.0;
        let summary = summarize(&days);
        assert_eq!(summary.temperature_range.min, 2.0);
        assert_eq!(summary.temperature_range.max, 31.0);
        assert!(summary.significant_change);
        for concern in [WeatherConcern::Cold, WeatherConcern::Heat, WeatherConcern::Wind] {
            assert!(summary.primary_concerns.contains(&concern));
        }
    }
}
