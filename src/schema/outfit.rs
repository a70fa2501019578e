//! Outfit plan schema
//!
//! Structural validation of the generation wire format. There is no
//! repair pass here: a schema failure surfaces as
//! `AI_RESPONSE_INVALID`.

use serde_json::Value;

use super::SchemaViolation;
use crate::domain::{DressCode, OutfitPlan};

/// Validate a generated outfit plan payload. `expected_duration`
/// comes from the confirmed details; the number of daily outfits must
/// match it.
pub fn validate(payload: &Value, expected_duration: u32) -> Result<OutfitPlan, Vec<SchemaViolation>> {
    let mut errors = Vec::new();

    let trip = payload.get("tripDetails");
    match trip.and_then(Value::as_object) {
        Some(obj) => {
            match obj.get("occasion").and_then(Value::as_str) {
                Some(s) if !s.trim().is_empty() => {}
                _ => errors.push(SchemaViolation::new(
                    "tripDetails.occasion",
                    "must be a non-empty string",
                )),
            }
            match obj.get("duration").and_then(Value::as_i64) {
                Some(d) if d >= 1 => {}
                _ => errors.push(SchemaViolation::new("tripDetails.duration", "must be an integer >= 1")),
            }
            let code = obj
                .get("dressCode")
                .and_then(Value::as_str)
                .and_then(DressCode::parse);
            if code.is_none() {
                errors.push(SchemaViolation::new(
                    "tripDetails.dressCode",
                    "must be a known dress code",
                ));
            }
        }
        None => errors.push(SchemaViolation::new("tripDetails", "must be an object")),
    }

    match payload.get("dailyOutfits").and_then(Value::as_array) {
        Some(days) => {
            if days.len() as u32 != expected_duration {
                errors.push(SchemaViolation::new(
                    "dailyOutfits",
                    format!("expected {} entries, got {}", expected_duration, days.len()),
                ));
            }
            for (idx, day) in days.iter().enumerate() {
                validate_daily_outfit(day, idx, expected_duration, &mut errors);
            }
        }
        None => errors.push(SchemaViolation::new("dailyOutfits", "must be an array")),
    }

    if !errors.is_empty() {
        return Err(errors);
    }

    serde_json::from_value(payload.clone())
        .map_err(|e| vec![SchemaViolation::new("$", format!("deserialization failed: {e}"))])
}

fn validate_daily_outfit(
    day: &Value,
    idx: usize,
    expected_duration: u32,
    errors: &mut Vec<SchemaViolation>,
) {
    let path = format!("dailyOutfits[{idx}]");
    let Some(obj) = day.as_object() else {
        errors.push(SchemaViolation::new(path, "must be an object"));
        return;
    };

    let day_number = obj.get("day").and_then(Value::as_i64);
    if day_number.map_or(true, |d| d < 1 || d > i64::from(expected_duration)) {
        errors.push(SchemaViolation::new(
            format!("{path}.day"),
            format!("must be an integer in 1..={expected_duration}"),
        ));
    }

    match obj.get("outfit").and_then(Value::as_object) {
        Some(outfit) => {
            for slot in ["topwear", "bottomwear", "footwear"] {
                match outfit.get(slot) {
                    Some(item) if item.is_object() => {
                        check_sku(item, &format!("{path}.outfit.{slot}"), errors);
                    }
                    _ => errors.push(SchemaViolation::new(
                        format!("{path}.outfit.{slot}"),
                        "required slot must be an item object",
                    )),
                }
            }
            // outerwear is nullable but must carry a SKU when present
            if let Some(outer) = outfit.get("outerwear") {
                if !outer.is_null() {
                    if outer.is_object() {
                        check_sku(outer, &format!("{path}.outfit.outerwear"), errors);
                    } else {
                        errors.push(SchemaViolation::new(
                            format!("{path}.outfit.outerwear"),
                            "must be an item object or null",
                        ));
                    }
                }
            }
            match outfit.get("accessories") {
                None | Some(Value::Array(_)) => {
                    if let Some(Value::Array(items)) = outfit.get("accessories") {
                        for (aidx, item) in items.iter().enumerate() {
                            check_sku(item, &format!("{path}.outfit.accessories[{aidx}]"), errors);
                        }
                    }
                }
                _ => errors.push(SchemaViolation::new(
                    format!("{path}.outfit.accessories"),
                    "must be an array",
                )),
            }
        }
        None => errors.push(SchemaViolation::new(format!("{path}.outfit"), "must be an object")),
    }

    match obj.get("styling").and_then(Value::as_object) {
        Some(styling) => {
            for field in ["rationale", "weatherConsiderations", "dresscodeCompliance"] {
                match styling.get(field).and_then(Value::as_str) {
                    Some(s) if !s.trim().is_empty() => {}
                    _ => errors.push(SchemaViolation::new(
                        format!("{path}.styling.{field}"),
                        "must be a non-empty string",
                    )),
                }
            }
        }
        None => errors.push(SchemaViolation::new(format!("{path}.styling"), "must be an object")),
    }
}

fn check_sku(item: &Value, path: &str, errors: &mut Vec<SchemaViolation>) {
    match item.get("sku").and_then(Value::as_str) {
        Some(s) if !s.trim().is_empty() => {}
        _ => errors.push(SchemaViolation::new(format!("{path}.sku"), "must be a non-empty string")),
    }
}
