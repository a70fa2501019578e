//! Pipeline orchestrator
//!
//! The single owner of stage transitions. Every operation checks the
//! session's current stage before mutating anything: a rejected
//! transition leaves the session exactly as it was. Failures during
//! generation are recorded on the session and move it to the terminal
//! error stage; a reset starts the pipeline over under the same id.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use tracing::{info, instrument, warn};

use super::{analyzer, SessionStore};
use crate::domain::{EventDescriptor, OutfitPlan, Session, SessionError, Stage, WeatherContext};
use crate::error::{PipelineError, PipelineResult};
use crate::schema;
use crate::services::catalog::CatalogLoader;
use crate::services::context::{self, ContextAccumulator};
use crate::services::llm::LlmAdapter;
use crate::services::weather::WeatherContextBuilder;

/// Stage snapshot surfaced by the stage endpoint.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StageInfo {
    pub stage: Stage,
    pub label: &'static str,
    pub allowed_next: Vec<Stage>,
    pub terminal: bool,
}

/// Outcome of confirming event details: the updated session plus the
/// weather context gathered for its event window, so a client sees a
/// seasonal fallback (data source, confidence) right away.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Confirmation {
    #[serde(flatten)]
    pub session: Session,
    pub weather: WeatherContext,
}

pub struct Orchestrator {
    sessions: SessionStore,
    contexts: ContextAccumulator,
    llm: LlmAdapter,
    weather: WeatherContextBuilder,
    catalog: Arc<CatalogLoader>,
}

impl Orchestrator {
    pub fn new(
        llm: LlmAdapter,
        weather: WeatherContextBuilder,
        catalog: Arc<CatalogLoader>,
        session_ttl_seconds: u64,
    ) -> Self {
        Self {
            sessions: SessionStore::new(session_ttl_seconds),
            contexts: ContextAccumulator::new(),
            llm,
            weather,
            catalog,
        }
    }

    fn now(&self) -> (DateTime<Utc>, NaiveDate) {
        let now = Utc::now();
        (now, now.date_naive())
    }

    /// Process a user message: extract event details (or accept
    /// prefilled ones) and move to confirmation. With a session id of
    /// a session awaiting confirmation, this is the re-edit path and
    /// replaces the earlier extraction.
    #[instrument(skip(self, message, prefilled))]
    pub async fn process_user_input(
        &self,
        session_id: Option<&str>,
        message: &str,
        prefilled: Option<EventDescriptor>,
    ) -> PipelineResult<Session> {
        let (now, today) = self.now();

        if message.trim().is_empty() && prefilled.is_none() {
            return Err(PipelineError::Validation("message must not be empty".to_string()));
        }

        let session = match session_id {
            Some(id) => {
                let session = self.sessions.get(id, now)?;
                match session.stage {
                    Stage::InputProcessing => session,
                    Stage::ConfirmationPending => {
                        info!(session_id = id, "Re-editing pending confirmation");
                        self.sessions.update(id, now, |s| {
                            s.stage = Stage::InputProcessing;
                            s.extracted_details = None;
                        })?
                    }
                    from => {
                        return Err(PipelineError::InvalidTransition {
                            from,
                            to: Stage::InputProcessing,
                        })
                    }
                }
            }
            None => self.sessions.create(now),
        };
        // A fresh context file on both the first pass and a re-edit
        self.contexts.initialize(&session.id, message, now);

        let details = match prefilled {
            Some(details) => {
                schema::event::validate_confirmed(&details)
                    .map_err(|v| PipelineError::Validation(schema::describe(&v)))?;
                info!(session_id = %session.id, "Using prefilled details, skipping extraction");
                details
            }
            None => self.llm.extract_event(message, today).await?,
        };

        self.contexts.add_extracted_details(&session.id, &details, now)?;
        self.sessions.update(&session.id, now, |s| {
            s.extracted_details = Some(details);
            s.error = None;
            s.stage = Stage::ConfirmationPending;
        })
    }

    /// Accept user-confirmed details and gather environmental context
    /// for the event window. Returns the session together with the
    /// weather result.
    #[instrument(skip(self, details))]
    pub async fn confirm_event_details(
        &self,
        session_id: &str,
        details: EventDescriptor,
    ) -> PipelineResult<Confirmation> {
        let (now, today) = self.now();
        let session = self.sessions.get(session_id, now)?;

        if !session.stage.can_transition_to(Stage::ContextGathering) {
            return Err(PipelineError::InvalidTransition {
                from: session.stage,
                to: Stage::ContextGathering,
            });
        }
        schema::event::validate_confirmed(&details)
            .map_err(|v| PipelineError::Validation(schema::describe(&v)))?;
        // An explicitly given location must at least name something
        if let Some(location) = &details.location {
            if location.trim().is_empty() {
                return Err(PipelineError::LocationNotFound(location.clone()));
            }
        }

        self.contexts.add_confirmed_details(session_id, &details, now)?;
        let session = self.sessions.update(session_id, now, |s| {
            s.confirmed_details = Some(details.clone());
            s.stage = Stage::ContextGathering;
        })?;

        let weather = self
            .weather
            .build(details.location.as_deref(), details.start_date, details.duration, today)
            .await;
        info!(
            session_id,
            data_source = ?weather.data_source,
            confidence = weather.confidence,
            "Weather context gathered"
        );
        self.contexts.add_weather_context(session_id, &weather, now)?;

        Ok(Confirmation { session, weather })
    }

    /// Close out context gathering and arm generation.
    #[instrument(skip(self))]
    pub async fn complete_context_gathering(&self, session_id: &str) -> PipelineResult<Session> {
        let (now, _) = self.now();
        let session = self.sessions.get(session_id, now)?;

        if !session.stage.can_transition_to(Stage::Generation) {
            return Err(PipelineError::InvalidTransition {
                from: session.stage,
                to: Stage::Generation,
            });
        }
        self.contexts.validate_for_generation(session_id)?;

        self.sessions.update(session_id, now, |s| s.stage = Stage::Generation)
    }

    /// Generate the outfit plan. Failures here are terminal for the
    /// session: the error is recorded and the stage moves to the
    /// error state until a reset.
    #[instrument(skip(self))]
    pub async fn generate_outfits(&self, session_id: &str) -> PipelineResult<Session> {
        let (now, _) = self.now();
        let session = self.sessions.get(session_id, now)?;

        if !session.stage.can_transition_to(Stage::Complete) {
            return Err(PipelineError::InvalidTransition {
                from: session.stage,
                to: Stage::Complete,
            });
        }
        let details = session
            .confirmed_details
            .clone()
            .ok_or_else(|| PipelineError::ContextFileMissing(session_id.to_string()))?;

        match self.run_generation(session_id, &details).await {
            Ok(plan) => {
                let session = self.sessions.update(session_id, now, |s| {
                    s.outfit_plan = Some(plan.clone());
                    s.stage = Stage::Complete;
                })?;
                self.contexts.mark_stage(session_id, Stage::Complete, now)?;
                info!(session_id, days = plan.daily_outfits.len(), "Pipeline complete");
                Ok(session)
            }
            Err(e) => {
                warn!(session_id, error = %e, "Generation failed, session moved to error stage");
                let record = SessionError {
                    code: e.code().to_string(),
                    message: e.public_message(),
                };
                // Best effort: the original failure is what surfaces
                let _ = self.sessions.update(session_id, now, |s| {
                    s.stage = Stage::Error;
                    s.error = Some(record.clone());
                });
                Err(e)
            }
        }
    }

    async fn run_generation(
        &self,
        session_id: &str,
        details: &EventDescriptor,
    ) -> PipelineResult<OutfitPlan> {
        let snapshot = self.catalog.snapshot().await?;
        let file = self.contexts.get(session_id)?;
        let context_text = context::format_for_ai(&file);

        let mut plan = self
            .llm
            .generate_outfit_plan(details, &snapshot.format_for_prompt(), &context_text)
            .await?;

        // Every SKU must come from the snapshot the prompt was built from
        for daily in &plan.daily_outfits {
            for item in daily.outfit.items() {
                if snapshot.lookup(&item.sku).is_none() {
                    return Err(PipelineError::AiResponseInvalid(format!(
                        "day {} references unknown sku {}",
                        daily.day, item.sku
                    )));
                }
            }
        }

        plan.reusability_analysis = Some(analyzer::analyze(&plan.daily_outfits));
        Ok(plan)
    }

    /// Start the pipeline over for this session id.
    #[instrument(skip(self))]
    pub async fn reset_pipeline(&self, session_id: &str) -> PipelineResult<Session> {
        let (now, _) = self.now();
        self.contexts.reset(session_id);
        self.sessions.update(session_id, now, |s| {
            s.stage = Stage::InputProcessing;
            s.extracted_details = None;
            s.confirmed_details = None;
            s.outfit_plan = None;
            s.error = None;
        })
    }

    /// Human-readable summary of the gathered context, surfaced with
    /// generation results.
    pub fn get_context_summary(&self, session_id: &str) -> PipelineResult<String> {
        Ok(context::generate_summary(&self.contexts.get(session_id)?))
    }

    pub fn get_session_state(&self, session_id: &str) -> PipelineResult<Session> {
        let (now, _) = self.now();
        self.sessions.get(session_id, now)
    }

    pub fn get_stage_info(&self, session_id: &str) -> PipelineResult<StageInfo> {
        let session = self.get_session_state(session_id)?;
        Ok(StageInfo {
            stage: session.stage,
            label: session.stage.label(),
            allowed_next: session.stage.successors().to_vec(),
            terminal: session.stage.is_terminal(),
        })
    }
}
