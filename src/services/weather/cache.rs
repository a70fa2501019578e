//! Weather forecast cache
//!
//! In-process cache of normalized forecast days keyed by
//! `(lat, lon, date)` with coordinates quantized to 1e-4 degrees.
//! Entries are immutable after write and evicted lazily on read.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use parking_lot::Mutex;
use tracing::debug;

use crate::domain::DailyForecast;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct CacheKey {
    lat_e4: i64,
    lon_e4: i64,
    date: NaiveDate,
}

impl CacheKey {
    fn new(lat: f64, lon: f64, date: NaiveDate) -> Self {
        Self {
            lat_e4: (lat * 1e4).round() as i64,
            lon_e4: (lon * 1e4).round() as i64,
            date,
        }
    }
}

struct CacheEntry {
    day: DailyForecast,
    inserted_at: Instant,
}

pub struct WeatherCache {
    ttl: Duration,
    entries: Mutex<HashMap<CacheKey, CacheEntry>>,
}

impl WeatherCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, lat: f64, lon: f64, date: NaiveDate) -> Option<DailyForecast> {
        let key = CacheKey::new(lat, lon, date);
        let mut entries = self.entries.lock();
        match entries.get(&key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => {
                debug!(%date, "Weather cache hit");
                Some(entry.day.clone())
            }
            Some(_) => {
                // Lazy eviction of the expired entry
                entries.remove(&key);
                debug!(%date, "Weather cache entry expired");
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, lat: f64, lon: f64, date: NaiveDate, day: DailyForecast) {
        let key = CacheKey::new(lat, lon, date);
        self.entries.lock().insert(
            key,
            CacheEntry {
                day,
                inserted_at: Instant::now(),
            },
        );
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::weather::fallback::seasonal_day;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 10).unwrap()
    }

    #[test]
    fn hit_within_ttl() {
        let cache = WeatherCache::new(Duration::from_secs(3600));
        cache.insert(51.5072, -0.1276, date(), seasonal_day(date()));
        assert!(cache.get(51.5072, -0.1276, date()).is_some());
        // Coordinates quantized to 1e-4: a sub-precision wobble still hits
        assert!(cache.get(51.50722, -0.12761, date()).is_some());
    }

    #[test]
    fn different_day_misses() {
        let cache = WeatherCache::new(Duration::from_secs(3600));
        cache.insert(51.5072, -0.1276, date(), seasonal_day(date()));
        let other = date().succ_opt().unwrap();
        assert!(cache.get(51.5072, -0.1276, other).is_none());
    }

    #[test]
    fn expired_entry_is_evicted_on_read() {
        let cache = WeatherCache::new(Duration::ZERO);
        cache.insert(51.5072, -0.1276, date(), seasonal_day(date()));
        assert_eq!(cache.len(), 1);
        assert!(cache.get(51.5072, -0.1276, date()).is_none());
        assert_eq!(cache.len(), 0);
    }
}
