//! LLM adapter
//!
//! Wraps the text-completion endpoint behind two operations: event
//! extraction and outfit-plan generation. Prompt construction is
//! pure, responses are cleaned, schema-validated, repaired once where
//! possible, and extraction degrades to a deterministic fallback.

pub mod client;
pub mod extract;
pub mod fallback;
pub mod generate;
pub mod prompts;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{EventDescriptor, OutfitPlan};
use crate::error::PipelineResult;

pub use client::BedrockClient;

/// Model parameters for extraction: deterministic-leaning.
pub const EXTRACTION_TEMPERATURE: f32 = 0.2;
pub const EXTRACTION_MAX_TOKENS: u32 = 1_000;

/// Model parameters for generation.
pub const GENERATION_TEMPERATURE: f32 = 0.3;
pub const GENERATION_MAX_TOKENS: u32 = 4_000;

/// The completion endpoint seam. Tests substitute in-memory doubles.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(
        &self,
        prompt: &str,
        temperature: f32,
        max_tokens: u32,
    ) -> PipelineResult<String>;
}

/// The two AI operations used by the orchestrator.
pub struct LlmAdapter {
    model: Arc<dyn CompletionModel>,
    timeout: Duration,
}

impl LlmAdapter {
    pub fn new(model: Arc<dyn CompletionModel>, timeout: Duration) -> Self {
        Self { model, timeout }
    }

    /// Extract structured event details from free-form user text.
    /// Never fails: unusable model output degrades to the
    /// deterministic fallback extractor.
    pub async fn extract_event(
        &self,
        user_message: &str,
        today: NaiveDate,
    ) -> PipelineResult<EventDescriptor> {
        extract::run(self.model.as_ref(), self.timeout, user_message, today).await
    }

    /// Generate the outfit plan. No fallback: schema failures surface
    /// as `AI_RESPONSE_INVALID`, deadline misses as
    /// `GENERATION_TIMEOUT`.
    pub async fn generate_outfit_plan(
        &self,
        details: &EventDescriptor,
        catalog_text: &str,
        context_summary: &str,
    ) -> PipelineResult<OutfitPlan> {
        generate::run(
            self.model.as_ref(),
            self.timeout,
            details,
            catalog_text,
            context_summary,
        )
        .await
    }
}
