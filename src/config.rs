use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Dev,
    Staging,
    Prod,
}

impl Environment {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "prod" | "production" => Self::Prod,
            "staging" => Self::Staging,
            _ => Self::Dev,
        }
    }

    pub fn is_dev(&self) -> bool {
        matches!(self, Self::Dev)
    }
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub env: Environment,
    pub server_addr: String,
    pub cors_allow_origins: Vec<String>,

    // LLM endpoint
    pub llm_region: String,
    pub llm_model_id: String,
    pub llm_access_key: String,
    pub llm_secret: String,
    pub llm_timeout: Duration,

    // Weather provider
    pub weather_api_key: String,
    pub weather_timeout: Duration,
    pub forecast_max_days: u32,
    pub retry_max: u32,
    pub retry_base_delay: Duration,

    // Catalog
    pub catalog_path: String,

    // Cache TTLs
    pub cache_ttl_weather: Duration,
    pub cache_ttl_catalog: Duration,

    // Session store
    pub session_ttl: Duration,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    env::var(key).ok().and_then(|s| s.parse().ok()).unwrap_or(default)
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        let env = Environment::from_str(&env::var("ENV").unwrap_or_else(|_| "dev".to_string()));
        let server_addr = env::var("SERVER_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let cors_allow_origins: Vec<String> = env::var("CORS_ALLOW_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        // LLM endpoint
        let llm_region = env::var("LLM_REGION").unwrap_or_else(|_| "us-east-1".to_string());
        let llm_model_id =
            env::var("LLM_MODEL_ID").unwrap_or_else(|_| "us.amazon.nova-lite-v1:0".to_string());
        let llm_access_key = env::var("LLM_ACCESS_KEY").context("LLM_ACCESS_KEY must be set")?;
        let llm_secret = env::var("LLM_SECRET").context("LLM_SECRET must be set")?;
        let llm_timeout = Duration::from_millis(env_or("LLM_TIMEOUT_MS", 30_000u64));

        // Weather provider
        let weather_api_key = env::var("WEATHER_API_KEY").context("WEATHER_API_KEY must be set")?;
        let weather_timeout = Duration::from_millis(env_or("WEATHER_TIMEOUT_MS", 15_000u64));
        let forecast_max_days = env_or("FORECAST_MAX_DAYS", 14u32);
        let retry_max = env_or("RETRY_MAX", 3u32);
        let retry_base_delay = Duration::from_millis(env_or("RETRY_BASE_DELAY_MS", 1_000u64));

        // Catalog
        let catalog_path =
            env::var("CATALOG_PATH").unwrap_or_else(|_| "data/catalog.csv".to_string());

        // Cache TTLs
        let cache_ttl_weather = Duration::from_secs(env_or("CACHE_TTL_WEATHER", 3_600u64));
        let cache_ttl_catalog = Duration::from_secs(env_or("CACHE_TTL_CATALOG", 900u64));

        // Session store
        let session_ttl = Duration::from_secs(env_or("SESSION_TTL_SECONDS", 3_600u64));

        Ok(Settings {
            env,
            server_addr,
            cors_allow_origins,
            llm_region,
            llm_model_id,
            llm_access_key,
            llm_secret,
            llm_timeout,
            weather_api_key,
            weather_timeout,
            forecast_max_days,
            retry_max,
            retry_base_delay,
            catalog_path,
            cache_ttl_weather,
            cache_ttl_catalog,
            session_ttl,
        })
    }
}
