//! Context accumulator
//!
//! In-process store of per-session context files. Each pipeline stage
//! deposits what it learned; generation reads the whole file back as
//! a deterministic prompt block. Completeness is a weighted score of
//! what has been gathered so far.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tracing::debug;

use crate::domain::{
    ContextFile, EventDescriptor, Season, Stage, WeatherConcern, WeatherContext,
};
use crate::error::{PipelineError, PipelineResult};

const WEIGHT_CONFIRMED: f64 = 0.4;
const WEIGHT_WEATHER: f64 = 0.3;
const WEIGHT_CONSTRAINTS: f64 = 0.2;
const WEIGHT_CLARIFICATIONS: f64 = 0.1;

#[derive(Default)]
pub struct ContextAccumulator {
    files: RwLock<HashMap<String, ContextFile>>,
}

impl ContextAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn initialize(&self, session_id: &str, original_message: &str, now: DateTime<Utc>) {
        let file = ContextFile::new(session_id.to_string(), original_message.to_string(), now);
        self.files.write().insert(session_id.to_string(), file);
        debug!(session_id, "Context file initialized");
    }

    pub fn add_extracted_details(
        &self,
        session_id: &str,
        details: &EventDescriptor,
        now: DateTime<Utc>,
    ) -> PipelineResult<()> {
        self.update(session_id, now, |file| {
            file.user_input.clarifications = details.needs_clarification.clone();
            file.user_input.extracted_details = Some(details.clone());
            file.metadata.confidence = details.confidence;
            file.metadata.processing_stage = Stage::InputProcessing;
        })
    }

    pub fn add_confirmed_details(
        &self,
        session_id: &str,
        details: &EventDescriptor,
        now: DateTime<Utc>,
    ) -> PipelineResult<()> {
        self.update(session_id, now, |file| {
            file.constraints.dress_code = Some(details.dress_code);
            file.constraints.budget = details.budget;
            file.constraints.occasion_constraints = details.special_requirements.clone();
            file.environmental_context.location = details.location.clone();
            if let Some(start) = details.start_date {
                file.environmental_context.season = Some(Season::for_date(start));
            }
            // Confirmation resolves the open clarifications
            file.user_input.clarifications.clear();
            file.user_input.confirmed_details = Some(details.clone());
            file.metadata.confidence = details.confidence;
            file.metadata.processing_stage = Stage::ContextGathering;
        })
    }

    pub fn add_weather_context(
        &self,
        session_id: &str,
        weather: &WeatherContext,
        now: DateTime<Utc>,
    ) -> PipelineResult<()> {
        self.update(session_id, now, |file| {
            file.constraints.weather_constraints = weather_constraints(weather);
            file.environmental_context.season = Some(Season::for_date(weather.date_range.start));
            file.environmental_context.weather = Some(weather.clone());
            file.metadata.data_source = Some(weather.data_source);
            file.metadata.processing_stage = Stage::ContextGathering;
        })
    }

    pub fn mark_stage(
        &self,
        session_id: &str,
        stage: Stage,
        now: DateTime<Utc>,
    ) -> PipelineResult<()> {
        self.update(session_id, now, |file| {
            file.metadata.processing_stage = stage;
        })
    }

    /// A context file is usable for generation once details are
    /// confirmed and weather has been gathered.
    pub fn validate_for_generation(&self, session_id: &str) -> PipelineResult<()> {
        let files = self.files.read();
        let file = files
            .get(session_id)
            .ok_or_else(|| PipelineError::ContextFileMissing(session_id.to_string()))?;
        if file.user_input.confirmed_details.is_none() {
            return Err(PipelineError::ContextFileMissing(session_id.to_string()));
        }
        if file.environmental_context.weather.is_none() {
            return Err(PipelineError::ContextFileMissing(session_id.to_string()));
        }
        Ok(())
    }

    pub fn get(&self, session_id: &str) -> PipelineResult<ContextFile> {
        self.files
            .read()
            .get(session_id)
            .cloned()
            .ok_or_else(|| PipelineError::ContextFileMissing(session_id.to_string()))
    }

    pub fn reset(&self, session_id: &str) {
        self.files.write().remove(session_id);
        debug!(session_id, "Context file dropped");
    }

    fn update(
        &self,
        session_id: &str,
        now: DateTime<Utc>,
        apply: impl FnOnce(&mut ContextFile),
    ) -> PipelineResult<()> {
        let mut files = self.files.write();
        let file = files
            .get_mut(session_id)
            .ok_or_else(|| PipelineError::ContextFileMissing(session_id.to_string()))?;
        apply(file);
        file.metadata.completeness = completeness(file);
        file.metadata.updated_at = now;
        Ok(())
    }
}

/// Weighted completeness of a context file in [0,1].
fn completeness(file: &ContextFile) -> f64 {
    let mut score = 0.0;
    if file.user_input.confirmed_details.is_some() {
        score += WEIGHT_CONFIRMED;
    }
    if file.environmental_context.weather.is_some() {
        score += WEIGHT_WEATHER;
    }
    if file.constraints.dress_code.is_some() {
        score += WEIGHT_CONSTRAINTS;
    }
    if file.user_input.clarifications.is_empty() {
        score += WEIGHT_CLARIFICATIONS;
    }
    score
}

fn weather_constraints(weather: &WeatherContext) -> Vec<String> {
    let mut constraints = Vec::new();
    for concern in &weather.summary.primary_concerns {
        constraints.push(
            match concern {
                WeatherConcern::Rain => "rain protection required",
                WeatherConcern::Cold => "warm layers required",
                WeatherConcern::Heat => "breathable, light fabrics required",
                WeatherConcern::Wind => "wind-resistant outer layer recommended",
            }
            .to_string(),
        );
    }
    if weather.summary.significant_change {
        constraints.push("conditions change notably across the trip".to_string());
    }
    constraints
}

/// One-paragraph human-readable summary of what the pipeline knows,
/// surfaced to the client alongside generation results.
pub fn generate_summary(file: &ContextFile) -> String {
    let mut parts: Vec<String> = Vec::new();

    if let Some(details) = &file.user_input.confirmed_details {
        let mut sentence = format!("{}-day {}", details.duration, details.occasion);
        if let Some(location) = &details.location {
            sentence.push_str(&format!(" in {location}"));
        }
        if let Some(start) = details.start_date {
            sentence.push_str(&format!(" starting {start}"));
        }
        sentence.push_str(&format!(", {} dress code", details.dress_code));
        parts.push(sentence);
    }

    if let Some(weather) = &file.environmental_context.weather {
        parts.push(format!(
            "mostly {} weather, {:.0}\u{b0}C to {:.0}\u{b0}C",
            weather.summary.overall_condition,
            weather.summary.temperature_range.min,
            weather.summary.temperature_range.max
        ));
    }

    if !file.constraints.weather_constraints.is_empty() {
        parts.push(file.constraints.weather_constraints.join(", "));
    }

    if parts.is_empty() {
        "No event details gathered yet".to_string()
    } else {
        let mut summary = parts.join("; ");
        summary.push('.');
        summary
    }
}

/// Render a context file as the generation prompt block. Fixed
/// headings, fixed ordering: the same file always renders the same
/// text.
pub fn format_for_ai(file: &ContextFile) -> String {
    let mut out = String::new();

    out.push_str("Event Details:\n");
    if let Some(details) = &file.user_input.confirmed_details {
        out.push_str(&format!("- Occasion: {}\n", details.occasion));
        out.push_str(&format!("- Duration: {} day(s)\n", details.duration));
        if let Some(location) = &details.location {
            out.push_str(&format!("- Location: {location}\n"));
        }
        if let Some(start) = details.start_date {
            out.push_str(&format!("- Start date: {start}\n"));
        }
    } else {
        out.push_str("- Not yet confirmed\n");
    }

    out.push_str("\nStyle Requirements:\n");
    if let Some(code) = file.constraints.dress_code {
        out.push_str(&format!("- Dress code: {code}\n"));
    }
    if let Some(budget) = file.constraints.budget {
        out.push_str(&format!("- Budget: ${budget:.0}\n"));
    }
    for constraint in &file.constraints.occasion_constraints {
        out.push_str(&format!("- {constraint}\n"));
    }

    out.push_str("\nWeather:\n");
    if let Some(weather) = &file.environmental_context.weather {
        out.push_str(&format!(
            "- {} ({}), {:.0}\u{b0}C to {:.0}\u{b0}C overall, mostly {}\n",
            weather.location.name,
            match weather.data_source {
                crate::domain::DataSource::Live => "live forecast",
                crate::domain::DataSource::SeasonalFallback => "seasonal estimate",
            },
            weather.summary.temperature_range.min,
            weather.summary.temperature_range.max,
            weather.summary.overall_condition,
        ));
        for day in &weather.daily_forecasts {
            out.push_str(&format!(
                "- {}: {}, {:.0}\u{b0}C to {:.0}\u{b0}C, {}% rain chance\n",
                day.date,
                day.condition,
                day.temperature.min,
                day.temperature.max,
                day.precipitation_probability,
            ));
        }
    } else {
        out.push_str("- Not yet gathered\n");
    }

    out.push_str("\nKey Considerations:\n");
    if file.constraints.weather_constraints.is_empty() {
        out.push_str("- No special weather constraints\n");
    }
    for constraint in &file.constraints.weather_constraints {
        out.push_str(&format!("- {constraint}\n"));
    }

    out.push_str(&format!(
        "\nContext Quality:\n- Confidence {:.2}, completeness {:.2}\n",
        file.metadata.confidence, file.metadata.completeness
    ));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{
        DataSource, DateRange, ResolvedLocation, TemperatureSpan, WeatherCondition,
        WeatherSummary,
    };
    use crate::services::weather::fallback::seasonal_day;
    use chrono::NaiveDate;

    fn now() -> DateTime<Utc> {
        DateTime::from_timestamp(1_780_000_000, 0).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 12).unwrap()
    }

    fn weather() -> WeatherContext {
        WeatherContext {
            location: ResolvedLocation {
                name: "Leeds".into(),
                country: "GB".into(),
                state: None,
                lat: 53.8,
                lon: -1.55,
            },
            date_range: DateRange {
                start: date(),
                end: date(),
                duration: 1,
            },
            daily_forecasts: vec![seasonal_day(date())],
            summary: WeatherSummary {
                overall_condition: WeatherCondition::Rainy,
                temperature_range: TemperatureSpan { min: 8.0, max: 16.0 },
                significant_change: false,
                primary_concerns: vec![WeatherConcern::Rain, WeatherConcern::Cold],
            },
            data_source: DataSource::Live,
            confidence: 1.0,
        }
    }

    fn accumulator_with_session() -> ContextAccumulator {
        let acc = ContextAccumulator::new();
        acc.initialize("s1", "3-day festival in the UK", now());
        acc
    }

    #[test]
    fn completeness_accumulates_by_weight() {
        let acc = accumulator_with_session();
        assert!((acc.get("s1").unwrap().metadata.completeness - 0.0).abs() < f64::EPSILON);

        let mut details = EventDescriptor::minimal("festival");
        details.needs_clarification = vec!["start date".into()];
        acc.add_extracted_details("s1", &details, now()).unwrap();
        // Extraction alone only earns the constraint weight once
        // details are confirmed; unresolved clarifications hold back
        // the final tenth.
        let extracted = acc.get("s1").unwrap();
        assert!(extracted.metadata.completeness < 0.4);

        acc.add_confirmed_details("s1", &details, now()).unwrap();
        let confirmed = acc.get("s1").unwrap();
        // confirmed (0.4) + dress code constraint (0.2) + resolved
        // clarifications (0.1)
        assert!((confirmed.metadata.completeness - 0.7).abs() < 1e-9);

        acc.add_weather_context("s1", &weather(), now()).unwrap();
        let complete = acc.get("s1").unwrap();
        assert!((complete.metadata.completeness - 1.0).abs() < 1e-9);
    }

    #[test]
    fn validate_for_generation_requires_confirmation_and_weather() {
        let acc = accumulator_with_session();
        assert!(acc.validate_for_generation("s1").is_err());

        let details = EventDescriptor::minimal("festival");
        acc.add_confirmed_details("s1", &details, now()).unwrap();
        assert!(acc.validate_for_generation("s1").is_err());

        acc.add_weather_context("s1", &weather(), now()).unwrap();
        assert!(acc.validate_for_generation("s1").is_ok());
    }

    #[test]
    fn missing_session_is_context_file_missing() {
        let acc = ContextAccumulator::new();
        let err = acc.get("nope").unwrap_err();
        assert_eq!(err.code(), "CONTEXT_FILE_MISSING");
    }

    #[test]
    fn reset_drops_the_file() {
        let acc = accumulator_with_session();
        acc.reset("s1");
        assert!(acc.get("s1").is_err());
    }

    #[test]
    fn summary_reads_as_one_sentence() {
        let acc = accumulator_with_session();
        assert_eq!(
            generate_summary(&acc.get("s1").unwrap()),
            "No event details gathered yet"
        );

        let mut details = EventDescriptor::minimal("festival");
        details.duration = 3;
        details.location = Some("Leeds".into());
        acc.add_confirmed_details("s1", &details, now()).unwrap();
        acc.add_weather_context("s1", &weather(), now()).unwrap();

        let summary = generate_summary(&acc.get("s1").unwrap());
        assert!(summary.starts_with("3-day festival in Leeds"));
        assert!(summary.contains("rainy weather"));
        assert!(summary.ends_with('.'));
    }

    #[test]
    fn format_is_deterministic_with_fixed_headings() {
        let acc = accumulator_with_session();
        let mut details = EventDescriptor::minimal("festival");
        details.location = Some("Leeds".into());
        details.start_date = Some(date());
        acc.add_confirmed_details("s1", &details, now()).unwrap();
        acc.add_weather_context("s1", &weather(), now()).unwrap();

        let file = acc.get("s1").unwrap();
        let a = format_for_ai(&file);
        let b = format_for_ai(&file);
        assert_eq!(a, b);
        for heading in [
            "Event Details:",
            "Style Requirements:",
            "Weather:",
            "Key Considerations:",
            "Context Quality:",
        ] {
            assert!(a.contains(heading), "missing heading {heading}");
        }
        assert!(a.contains("rain protection required"));
        assert!(a.contains("warm layers required"));
    }
}
