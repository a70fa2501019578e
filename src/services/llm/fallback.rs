//! Deterministic fallback extraction
//!
//! Pattern-matched event details for when the model is unreachable or
//! its output cannot be repaired. Confidence is fixed at 0.5 and the
//! start date always lands in `needsClarification`, so the user is
//! asked before anything downstream trusts the guess.

use regex::Regex;

use crate::domain::{DailyPlan, DressCode, EventDescriptor};

const FALLBACK_CONFIDENCE: f64 = 0.5;

const OCCASION_KEYWORDS: &[&str] = &[
    "wedding",
    "music festival",
    "festival",
    "conference",
    "job interview",
    "interview",
    "gala",
    "concert",
    "business trip",
    "beach trip",
    "hiking trip",
    "dinner",
    "party",
    "meeting",
];

// Capitalized words after "in" that are calendar terms, not places.
const NOT_LOCATIONS: &[&str] = &[
    "January", "February", "March", "April", "May", "June", "July", "August", "September",
    "October", "November", "December", "Monday", "Tuesday", "Wednesday", "Thursday", "Friday",
    "Saturday", "Sunday",
];

pub fn extract(message: &str) -> EventDescriptor {
    let lower = message.to_lowercase();

    let occasion = OCCASION_KEYWORDS
        .iter()
        .find(|k| lower.contains(*k))
        .copied()
        .unwrap_or("general event");

    let mut details = EventDescriptor::minimal(occasion);
    details.duration = duration_from(&lower);
    details.location = location_from(message);

    if let Some((_, code)) = DressCode::keyword_map().iter().find(|(k, _)| lower.contains(k)) {
        details.dress_code = *code;
    }

    if details.duration > 1 {
        details.daily_plans = Some(
            (1..=details.duration)
                .map(|day| DailyPlan {
                    day,
                    activity: occasion.to_string(),
                    dress_code: details.dress_code,
                })
                .collect(),
        );
    }

    details.needs_clarification.push("start date".to_string());
    if details.location.is_none() {
        details.needs_clarification.push("location".to_string());
    }
    details.confidence = FALLBACK_CONFIDENCE;
    details
}

fn duration_from(lower: &str) -> u32 {
    if let Some(days) = Regex::new(r"(\d{1,3})\s*-?\s*day")
        .ok()
        .and_then(|re| re.captures(lower))
        .and_then(|caps| caps[1].parse::<u32>().ok())
    {
        return days.max(1);
    }
    if lower.contains("weekend") {
        return 2;
    }
    if Regex::new(r"\bweek\b").ok().is_some_and(|re| re.is_match(lower)) {
        return 7;
    }
    1
}

fn location_from(message: &str) -> Option<String> {
    let re = Regex::new(r"\bin\s+(?:the\s+)?([A-Z][A-Za-z'\-]*(?:\s+[A-Z][A-Za-z'\-]*)*)").ok()?;
    let captured = re.captures(message)?.get(1)?.as_str();
    if NOT_LOCATIONS.contains(&captured) {
        return None;
    }
    Some(
        match captured {
            "UK" => "United Kingdom",
            "US" | "USA" => "United States",
            "UAE" => "United Arab Emirates",
            other => other,
        }
        .to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn festival_message_yields_casual_multi_day() {
        let details = extract("I need outfits for a 3-day music festival in the UK");
        assert_eq!(details.occasion, "music festival");
        assert_eq!(details.duration, 3);
        assert_eq!(details.location.as_deref(), Some("United Kingdom"));
        assert_eq!(details.dress_code, DressCode::Casual);
        assert_eq!(details.daily_plans.as_ref().map(Vec::len), Some(3));
        assert!((details.confidence - 0.5).abs() < f64::EPSILON);
        assert_eq!(details.needs_clarification, vec!["start date"]);
    }

    #[test]
    fn interview_is_single_day_business() {
        let details = extract("Job interview in London");
        assert_eq!(details.occasion, "job interview");
        assert_eq!(details.duration, 1);
        assert_eq!(details.location.as_deref(), Some("London"));
        assert_eq!(details.dress_code, DressCode::Business);
        assert!(details.daily_plans.is_none());
    }

    #[test]
    fn weekend_means_two_days() {
        assert_eq!(extract("something for the weekend").duration, 2);
        assert_eq!(extract("a week in Spain").duration, 7);
    }

    #[test]
    fn unrecognized_message_asks_for_everything() {
        let details = extract("help me out");
        assert_eq!(details.occasion, "general event");
        assert_eq!(details.location, None);
        assert_eq!(details.dress_code, DressCode::SmartCasual);
        assert_eq!(
            details.needs_clarification,
            vec!["start date".to_string(), "location".to_string()]
        );
    }

    #[test]
    fn month_after_in_is_not_a_location() {
        let details = extract("a wedding in June");
        assert_eq!(details.location, None);
        assert!(details
            .needs_clarification
            .contains(&"location".to_string()));
    }

    #[test]
    fn multi_word_location_is_captured() {
        let details = extract("conference in New York City");
        assert_eq!(details.location.as_deref(), Some("New York City"));
    }
}
