//! Extraction flow
//!
//! Model completion -> cleaned JSON -> schema validation, with one
//! repair pass in between and the deterministic fallback extractor
//! behind everything. The operation itself never fails: the worst
//! outcome is a low-confidence descriptor asking for clarification.

use std::time::Duration;

use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, warn};

use super::{fallback, prompts, CompletionModel, EXTRACTION_MAX_TOKENS, EXTRACTION_TEMPERATURE};
use crate::domain::EventDescriptor;
use crate::error::{PipelineError, PipelineResult};
use crate::schema::{self, event};

/// Cut the response down to the outermost JSON object, dropping
/// markdown fences and any prose around it.
pub fn clean_response(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&raw[start..=end])
}

pub async fn run(
    model: &dyn CompletionModel,
    timeout: Duration,
    user_message: &str,
    today: NaiveDate,
) -> PipelineResult<EventDescriptor> {
    // The pattern fallback needs words to work with; without any the
    // operation has genuinely failed.
    if !user_message.chars().any(char::is_alphabetic) {
        return Err(PipelineError::Extraction(
            "message contains no recognizable text".to_string(),
        ));
    }

    let prompt = prompts::extraction(user_message, today);

    let completion = match tokio::time::timeout(
        timeout,
        model.complete(&prompt, EXTRACTION_TEMPERATURE, EXTRACTION_MAX_TOKENS),
    )
    .await
    {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => {
            warn!(error = %e, "Extraction completion failed, using fallback");
            return Ok(fallback::extract(user_message));
        }
        Err(_) => {
            warn!("Extraction completion timed out, using fallback");
            return Ok(fallback::extract(user_message));
        }
    };

    let Some(cleaned) = clean_response(&completion) else {
        warn!("Extraction response held no JSON object, using fallback");
        return Ok(fallback::extract(user_message));
    };

    let payload: Value = match serde_json::from_str(cleaned) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "Extraction response was not valid JSON, using fallback");
            return Ok(fallback::extract(user_message));
        }
    };

    match event::validate(&payload) {
        Ok(details) => {
            debug!(confidence = details.confidence, "Extraction validated");
            Ok(details)
        }
        Err(violations) => {
            debug!(
                violations = %schema::describe(&violations),
                "Extraction failed validation, attempting repair"
            );
            match event::validate(&event::repair(&payload)) {
                Ok(details) => {
                    debug!(confidence = details.confidence, "Repaired extraction validated");
                    Ok(details)
                }
                Err(violations) => {
                    warn!(
                        violations = %schema::describe(&violations),
                        "Repair did not converge, using fallback"
                    );
                    Ok(fallback::extract(user_message))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;

    struct CannedModel {
        response: String,
    }

    #[async_trait]
    impl CompletionModel for CannedModel {
        async fn complete(&self, _: &str, _: f32, _: u32) -> PipelineResult<String> {
            Ok(self.response.clone())
        }
    }

    struct FailingModel;

    #[async_trait]
    impl CompletionModel for FailingModel {
        async fn complete(&self, _: &str, _: f32, _: u32) -> PipelineResult<String> {
            Err(crate::error::PipelineError::Network("refused".into()))
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 10).unwrap()
    }

    #[test]
    fn clean_strips_fences_and_prose() {
        assert_eq!(
            clean_response("```json\n{\"a\": 1}\n```"),
            Some("{\"a\": 1}")
        );
        assert_eq!(
            clean_response("Here you go: {\"a\": 1} hope that helps"),
            Some("{\"a\": 1}")
        );
        assert_eq!(clean_response("no json here"), None);
        assert_eq!(clean_response("} {"), None);
    }

    #[tokio::test]
    async fn valid_completion_passes_through() {
        let model = CannedModel {
            response: json!({
                "success": true,
                "data": {
                    "occasion": "music festival",
                    "location": "United Kingdom",
                    "startDate": null,
                    "duration": 3,
                    "dressCode": "casual",
                    "budget": null,
                    "specialRequirements": [],
                    "needsClarification": ["start date"],
                    "confidence": 0.85
                }
            })
            .to_string(),
        };
        let details = run(&model, Duration::from_secs(5), "3-day festival in the UK", today())
            .await
            .unwrap();
        assert_eq!(details.occasion, "music festival");
        assert_eq!(details.duration, 3);
        assert!((details.confidence - 0.85).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn deviant_completion_is_repaired() {
        let model = CannedModel {
            response: format!(
                "```json\n{}\n```",
                json!({
                    "success": true,
                    "data": {
                        "occasion": "gala",
                        "duration": "two",
                        "dressCode": "fancy",
                        "confidence": 0.9
                    }
                })
            ),
        };
        let details = run(&model, Duration::from_secs(5), "a gala", today())
            .await
            .unwrap();
        assert_eq!(details.occasion, "gala");
        assert_eq!(details.duration, 1);
        assert_eq!(details.dress_code, crate::domain::DressCode::SmartCasual);
    }

    #[tokio::test]
    async fn model_failure_degrades_to_fallback() {
        let details = run(
            &FailingModel,
            Duration::from_secs(5),
            "2-day wedding in Paris",
            today(),
        )
        .await
        .unwrap();
        assert!((details.confidence - 0.5).abs() < f64::EPSILON);
        assert!(details.needs_clarification.contains(&"start date".to_string()));
    }

    #[tokio::test]
    async fn wordless_message_is_an_extraction_error() {
        let model = CannedModel {
            response: String::new(),
        };
        let err = run(&model, Duration::from_secs(5), "??? !!! 123", today())
            .await
            .unwrap_err();
        assert_eq!(err.code(), "EXTRACTION_ERROR");
    }

    #[tokio::test]
    async fn non_json_completion_degrades_to_fallback() {
        let model = CannedModel {
            response: "Sorry, I can't help with that.".into(),
        };
        let details = run(&model, Duration::from_secs(5), "beach trip", today())
            .await
            .unwrap();
        assert!((details.confidence - 0.5).abs() < f64::EPSILON);
    }
}
