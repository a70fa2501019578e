//! Event descriptor schema
//!
//! Validation of the extraction envelope `{success, data}`, the
//! single-pass repair of common model deviations, and the
//! confirmed-details rules applied by the orchestrator.

use chrono::NaiveDate;
use serde_json::{json, Value};

use super::SchemaViolation;
use crate::domain::{DressCode, EventDescriptor};

/// Maximum raw duration accepted at extraction time. The pipeline
/// clamps forecasts separately.
pub const MAX_RAW_DURATION: i64 = 365;

/// Validate an extraction envelope and produce the typed descriptor.
pub fn validate(payload: &Value) -> Result<EventDescriptor, Vec<SchemaViolation>> {
    let mut errors = Vec::new();

    if payload.get("success").and_then(Value::as_bool) != Some(true) {
        errors.push(SchemaViolation::new("success", "must be boolean true"));
    }

    let data = match payload.get("data") {
        Some(Value::Object(_)) => &payload["data"],
        _ => {
            errors.push(SchemaViolation::new("data", "must be an object"));
            return Err(errors);
        }
    };

    match data.get("occasion").and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => {}
        _ => errors.push(SchemaViolation::new("data.occasion", "must be a non-empty string")),
    }

    if let Some(v) = data.get("location") {
        if !v.is_null() && !v.is_string() {
            errors.push(SchemaViolation::new("data.location", "must be a string or null"));
        }
    }

    if let Some(v) = data.get("startDate") {
        match v {
            Value::Null => {}
            Value::String(s) => {
                if NaiveDate::parse_from_str(s, "%Y-%m-%d").is_err() {
                    errors.push(SchemaViolation::new("data.startDate", "must be YYYY-MM-DD"));
                }
            }
            _ => errors.push(SchemaViolation::new("data.startDate", "must be a string or null")),
        }
    }

    let duration = data.get("duration").and_then(Value::as_i64);
    match duration {
        Some(d) if (1..=MAX_RAW_DURATION).contains(&d) => {}
        _ => errors.push(SchemaViolation::new(
            "data.duration",
            "must be an integer between 1 and 365",
        )),
    }

    let dress_code = data
        .get("dressCode")
        .and_then(Value::as_str)
        .and_then(DressCode::parse);
    if dress_code.is_none() {
        errors.push(SchemaViolation::new("data.dressCode", "must be a known dress code"));
    }

    if let Some(v) = data.get("budget") {
        match v {
            Value::Null => {}
            Value::Number(n) if n.as_f64().is_some_and(|b| b >= 0.0) => {}
            _ => errors.push(SchemaViolation::new("data.budget", "must be a non-negative number or null")),
        }
    }

    for field in ["specialRequirements", "needsClarification"] {
        match data.get(field) {
            None | Some(Value::Null) | Some(Value::Array(_)) => {}
            _ => errors.push(SchemaViolation::new(format!("data.{field}"), "must be an array")),
        }
        if let Some(Value::Array(items)) = data.get(field) {
            if items.iter().any(|i| !i.is_string()) {
                errors.push(SchemaViolation::new(
                    format!("data.{field}"),
                    "entries must be strings",
                ));
            }
        }
    }

    match data.get("confidence").and_then(Value::as_f64) {
        Some(c) if (0.0..=1.0).contains(&c) => {}
        _ => errors.push(SchemaViolation::new("data.confidence", "must be a number in [0,1]")),
    }

    if let Some(plans) = data.get("dailyPlans") {
        match plans {
            Value::Null => {}
            Value::Array(entries) => {
                let duration = duration.unwrap_or(i64::MAX);
                let mut previous_day = 0i64;
                for (idx, entry) in entries.iter().enumerate() {
                    let path = format!("data.dailyPlans[{idx}]");
                    let Some(obj) = entry.as_object() else {
                        errors.push(SchemaViolation::new(path, "must be an object"));
                        continue;
                    };
                    match obj.get("day").and_then(Value::as_i64) {
                        Some(day) if day >= 1 && day <= duration && day > previous_day => {
                            previous_day = day;
                        }
                        _ => errors.push(SchemaViolation::new(
                            format!("{path}.day"),
                            "days must be 1..duration, strictly increasing",
                        )),
                    }
                    if !obj.get("activity").is_some_and(Value::is_string) {
                        errors.push(SchemaViolation::new(format!("{path}.activity"), "must be a string"));
                    }
                    let entry_code = obj
                        .get("dressCode")
                        .and_then(Value::as_str)
                        .and_then(DressCode::parse);
                    if entry_code.is_none() {
                        errors.push(SchemaViolation::new(
                            format!("{path}.dressCode"),
                            "must be a known dress code",
                        ));
                    }
                }
            }
            _ => errors.push(SchemaViolation::new("data.dailyPlans", "must be an array")),
        }
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    serde_json::from_value(data.clone())
        .map_err(|e| vec![SchemaViolation::new("data", format!("deserialization failed: {e}"))])
}

/// Single-pass repair of common model deviations. Applying it twice
/// yields the same value as applying it once.
pub fn repair(payload: &Value) -> Value {
    let data = payload.get("data").and_then(Value::as_object).cloned().unwrap_or_default();
    let mut repaired = serde_json::Map::new();

    // occasion: fall back to a generic label
    let occasion = data
        .get("occasion")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("general event");
    repaired.insert("occasion".into(), json!(occasion));

    // location / startDate: non-strings become absent
    match data.get("location") {
        Some(Value::String(s)) => {
            repaired.insert("location".into(), json!(s));
        }
        _ => {
            repaired.insert("location".into(), Value::Null);
        }
    }
    match data.get("startDate") {
        Some(Value::String(s)) => {
            repaired.insert("startDate".into(), json!(s));
        }
        _ => {
            repaired.insert("startDate".into(), Value::Null);
        }
    }

    // duration: non-integers and sub-1 values collapse to 1
    let duration = match data.get("duration").and_then(Value::as_i64) {
        Some(d) if d >= 1 => d,
        _ => 1,
    };
    repaired.insert("duration".into(), json!(duration));

    // dressCode: unknown values become smart-casual
    let dress_code = data
        .get("dressCode")
        .and_then(Value::as_str)
        .and_then(DressCode::parse)
        .unwrap_or(DressCode::SmartCasual);
    repaired.insert("dressCode".into(), json!(dress_code.as_str()));

    match data.get("budget") {
        Some(Value::Number(n)) if n.as_f64().is_some_and(|b| b >= 0.0) => {
            repaired.insert("budget".into(), json!(n));
        }
        _ => {
            repaired.insert("budget".into(), Value::Null);
        }
    }

    for field in ["specialRequirements", "needsClarification"] {
        let items: Vec<Value> = match data.get(field) {
            Some(Value::Array(items)) => items.iter().filter(|i| i.is_string()).cloned().collect(),
            _ => Vec::new(),
        };
        repaired.insert(field.into(), Value::Array(items));
    }

    // confidence: out-of-range values become 0.7
    let confidence = match data.get("confidence").and_then(Value::as_f64) {
        Some(c) if (0.0..=1.0).contains(&c) => c,
        _ => 0.7,
    };
    repaired.insert("confidence".into(), json!(confidence));

    // dailyPlans: absent stays absent; per-entry day defaults to the
    // ordinal position and dressCode falls back to the overall one
    match data.get("dailyPlans") {
        None | Some(Value::Null) => {}
        Some(Value::Array(entries)) => {
            let plans: Vec<Value> = entries
                .iter()
                .enumerate()
                .map(|(idx, entry)| {
                    let obj = entry.as_object().cloned().unwrap_or_default();
                    let day = match obj.get("day").and_then(Value::as_i64) {
                        Some(d) if d >= 1 => d,
                        _ => idx as i64 + 1,
                    };
                    let activity = obj
                        .get("activity")
                        .and_then(Value::as_str)
                        .unwrap_or(occasion);
                    let entry_code = obj
                        .get("dressCode")
                        .and_then(Value::as_str)
                        .and_then(DressCode::parse)
                        .unwrap_or(dress_code);
                    json!({
                        "day": day,
                        "activity": activity,
                        "dressCode": entry_code.as_str(),
                    })
                })
                .collect();
            repaired.insert("dailyPlans".into(), Value::Array(plans));
        }
        Some(_) => {
            repaired.insert("dailyPlans".into(), Value::Array(Vec::new()));
        }
    }

    json!({ "success": true, "data": Value::Object(repaired) })
}

/// Rules applied to user-confirmed details before the pipeline moves
/// to context gathering.
pub fn validate_confirmed(details: &EventDescriptor) -> Result<(), Vec<SchemaViolation>> {
    let mut errors = Vec::new();

    if details.occasion.trim().is_empty() {
        errors.push(SchemaViolation::new("occasion", "must be a non-empty string"));
    }
    if !(1..=MAX_RAW_DURATION as u32).contains(&details.duration) {
        errors.push(SchemaViolation::new("duration", "must be between 1 and 365 days"));
    }
    if let Some(budget) = details.budget {
        if budget < 0.0 || !budget.is_finite() {
            errors.push(SchemaViolation::new("budget", "must be a non-negative number"));
        }
    }
    if !(0.0..=1.0).contains(&details.confidence) {
        errors.push(SchemaViolation::new("confidence", "must be in [0,1]"));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
