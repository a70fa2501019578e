//! Pipeline session types
//!
//! A session is an isolated run of the pipeline for a single end-user
//! request. Its stage is the single source of truth for what the
//! orchestrator will accept next.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::event::EventDescriptor;
use super::outfit::OutfitPlan;

/// Pipeline stages. Transitions are validated by
/// [`Stage::can_transition_to`]; any stage may move to `Error`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    InputProcessing,
    ConfirmationPending,
    ContextGathering,
    Generation,
    Complete,
    Error,
}

impl Stage {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InputProcessing => "INPUT_PROCESSING",
            Self::ConfirmationPending => "CONFIRMATION_PENDING",
            Self::ContextGathering => "CONTEXT_GATHERING",
            Self::Generation => "GENERATION",
            Self::Complete => "COMPLETE",
            Self::Error => "ERROR",
        }
    }

    /// Human-readable label surfaced to the UI.
    pub fn label(&self) -> &'static str {
        match self {
            Self::InputProcessing => "Understanding your event",
            Self::ConfirmationPending => "Waiting for your confirmation",
            Self::ContextGathering => "Gathering weather and context",
            Self::Generation => "Generating outfits",
            Self::Complete => "Done",
            Self::Error => "Something went wrong",
        }
    }

    /// Allowed successor stages. `Error` is always reachable and is
    /// not listed here.
    pub fn successors(&self) -> &'static [Stage] {
        match self {
            // Re-edit path: the UI wires a "Back to Edit" affordance.
            Self::InputProcessing => &[Stage::ConfirmationPending],
            Self::ConfirmationPending => &[Stage::InputProcessing, Stage::ContextGathering],
            Self::ContextGathering => &[Stage::Generation],
            Self::Generation => &[Stage::Complete],
            // Terminal stages; leaving them requires a reset.
            Self::Complete => &[],
            Self::Error => &[],
        }
    }

    pub fn can_transition_to(&self, target: Stage) -> bool {
        target == Stage::Error || self.successors().contains(&target)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Complete | Self::Error)
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Last error recorded on a session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionError {
    pub code: String,
    pub message: String,
}

/// Per-session pipeline state. Mutated only through orchestrator
/// operations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: String,
    pub stage: Stage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_details: Option<EventDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_details: Option<EventDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub outfit_plan: Option<OutfitPlan>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<SessionError>,
    pub created_at: DateTime<Utc>,
    pub last_activity: DateTime<Utc>,
}

impl Session {
    pub fn new(id: String, now: DateTime<Utc>) -> Self {
        Self {
            id,
            stage: Stage::InputProcessing,
            extracted_details: None,
            confirmed_details: None,
            outfit_plan: None,
            error: None,
            created_at: now,
            last_activity: now,
        }
    }

    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_activity = now;
    }
}
