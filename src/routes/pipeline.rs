//! Pipeline API endpoints
//!
//! Thin HTTP shims over the orchestrator: deserialize the request,
//! call the operation, wrap the session snapshot. Stage rules live in
//! the orchestrator, not here.

use axum::{
    extract::{Path, State},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::api::DataResponse;
use crate::app::AppState;
use crate::domain::{EventDescriptor, Session};
use crate::error::PipelineResult;
use crate::pipeline::{Confirmation, StageInfo};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub message: String,
    /// Confirmed-shaped details that skip extraction entirely.
    #[serde(default)]
    pub prefilled_details: Option<EventDescriptor>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmRequest {
    pub session_id: String,
    pub details: EventDescriptor,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRequest {
    pub session_id: String,
}

/// POST /chat/message
pub async fn process_message(
    State(state): State<Arc<AppState>>,
    Json(req): Json<MessageRequest>,
) -> PipelineResult<DataResponse<Session>> {
    let session = state
        .orchestrator
        .process_user_input(req.session_id.as_deref(), &req.message, req.prefilled_details)
        .await?;
    Ok(DataResponse::new(session))
}

/// POST /chat/confirm
///
/// Returns the session plus the gathered weather context, so the
/// client can surface a seasonal fallback immediately.
pub async fn confirm_details(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ConfirmRequest>,
) -> PipelineResult<DataResponse<Confirmation>> {
    let confirmation = state
        .orchestrator
        .confirm_event_details(&req.session_id, req.details)
        .await?;
    Ok(DataResponse::new(confirmation))
}

/// POST /chat/context/complete
pub async fn complete_context(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SessionRequest>,
) -> PipelineResult<DataResponse<Session>> {
    let session = state
        .orchestrator
        .complete_context_gathering(&req.session_id)
        .await?;
    Ok(DataResponse::new(session))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(flatten)]
    pub session: Session,
    pub context_summary: String,
}

/// POST /chat/generate
pub async fn generate_outfits(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SessionRequest>,
) -> PipelineResult<DataResponse<GenerateResponse>> {
    let session = state.orchestrator.generate_outfits(&req.session_id).await?;
    let context_summary = state.orchestrator.get_context_summary(&req.session_id)?;
    Ok(DataResponse::new(GenerateResponse {
        session,
        context_summary,
    }))
}

/// POST /chat/reset
pub async fn reset(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SessionRequest>,
) -> PipelineResult<DataResponse<Session>> {
    let session = state.orchestrator.reset_pipeline(&req.session_id).await?;
    Ok(DataResponse::new(session))
}

/// GET /chat/sessions/:session_id
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> PipelineResult<DataResponse<Session>> {
    Ok(DataResponse::new(state.orchestrator.get_session_state(&session_id)?))
}

/// GET /chat/sessions/:session_id/stage
pub async fn get_stage(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> PipelineResult<DataResponse<StageInfo>> {
    Ok(DataResponse::new(state.orchestrator.get_stage_info(&session_id)?))
}
