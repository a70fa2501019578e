//! Generation flow
//!
//! Unlike extraction there is no fallback: an outfit plan that fails
//! the schema surfaces as `AI_RESPONSE_INVALID` and a missed deadline
//! as `GENERATION_TIMEOUT`.

use std::time::Duration;

use serde_json::Value;
use tracing::debug;

use super::{extract, prompts, CompletionModel, GENERATION_MAX_TOKENS, GENERATION_TEMPERATURE};
use crate::domain::{EventDescriptor, OutfitPlan};
use crate::error::{PipelineError, PipelineResult};
use crate::schema::{self, outfit};

pub async fn run(
    model: &dyn CompletionModel,
    timeout: Duration,
    details: &EventDescriptor,
    catalog_text: &str,
    context_summary: &str,
) -> PipelineResult<OutfitPlan> {
    let prompt = prompts::generation(details, catalog_text, context_summary);

    let completion = tokio::time::timeout(
        timeout,
        model.complete(&prompt, GENERATION_TEMPERATURE, GENERATION_MAX_TOKENS),
    )
    .await
    .map_err(|_| PipelineError::GenerationTimeout)??;

    let cleaned = extract::clean_response(&completion).ok_or_else(|| {
        PipelineError::AiResponseInvalid("response held no JSON object".to_string())
    })?;

    let payload: Value = serde_json::from_str(cleaned)
        .map_err(|e| PipelineError::AiResponseInvalid(format!("invalid JSON: {e}")))?;

    let plan = outfit::validate(&payload, details.duration)
        .map_err(|violations| PipelineError::AiResponseInvalid(schema::describe(&violations)))?;

    debug!(days = plan.daily_outfits.len(), "Outfit plan validated");
    Ok(plan)
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

    struct SlowModel;

    #[async_trait]
    impl CompletionModel for SlowModel {
        async fn complete(&self, _: &str, _: f32, _: u32) -> PipelineResult<String> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(String::new())
        }
    }

    fn valid_plan() -> Value {
        json!({
            "tripDetails": {"occasion": "festival", "duration": 1, "dressCode": "casual"},
            "dailyOutfits": [{
                "day": 1,
                "activity": "festival day",
                "outfit": {
                    "topwear": {"sku": "SKU001", "name": "Tee"},
                    "bottomwear": {"sku": "SKU010", "name": "Jeans"},
                    "footwear": {"sku": "SKU020", "name": "Sneakers"},
                    "outerwear": null,
                    "accessories": []
                },
                "styling": {
                    "rationale": "Easy and comfortable",
                    "weatherConsiderations": "Mild and dry",
                    "dresscodeCompliance": "Fits the casual code"
                }
            }]
        })
    }

    #[tokio::test]
    async fn valid_plan_passes() {
        let model = CannedModel {
            response: format!("```json\n{}\n```", valid_plan()),
        };
        let details = EventDescriptor::minimal("festival");
        let plan = run(&model, Duration::from_secs(5), &details, "catalog", "context")
            .await
            .unwrap();
        assert_eq!(plan.daily_outfits.len(), 1);
    }

    #[tokio::test]
    async fn wrong_day_count_is_invalid() {
        let model = CannedModel {
            response: valid_plan().to_string(),
        };
        let mut details = EventDescriptor::minimal("festival");
        details.duration = 3;
        let err = run(&model, Duration::from_secs(5), &details, "catalog", "context")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "AI_RESPONSE_INVALID");
    }

    #[tokio::test(start_paused = true)]
    async fn deadline_miss_is_a_timeout() {
        let details = EventDescriptor::minimal("festival");
        let err = run(&SlowModel, Duration::from_secs(1), &details, "catalog", "context")
            .await
            .unwrap_err();
        assert_eq!(err.code(), "GENERATION_TIMEOUT");
    }
}
