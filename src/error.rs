//! Unified pipeline error handling
//!
//! One error taxonomy for the whole pipeline, mapped to consistent
//! HTTP responses with stable machine codes and a small set of
//! user-facing messages.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::domain::Stage;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid transition from {from} to {to}")]
    InvalidTransition { from: Stage, to: Stage },

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("event extraction failed: {0}")]
    Extraction(String),

    #[error("model response failed schema validation: {0}")]
    AiResponseInvalid(String),

    #[error("outfit generation timed out")]
    GenerationTimeout,

    #[error("catalog not found at {0}")]
    CatalogNotFound(String),

    #[error("catalog malformed: {0}")]
    CatalogMalformed(String),

    #[error("location not found: {0}")]
    LocationNotFound(String),

    #[error("weather provider error: {0}")]
    WeatherApi(String),

    #[error("no context file for session {0}")]
    ContextFileMissing(String),

    #[error("session not found: {0}")]
    SessionNotFound(String),

    #[error("network error: {0}")]
    Network(String),

    #[error("rate limited by upstream provider")]
    RateLimited,

    #[error("access denied by upstream provider")]
    AccessDenied,

    #[error("internal error")]
    Unknown(#[from] anyhow::Error),
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl PipelineError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidTransition { .. } => StatusCode::CONFLICT,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::SessionNotFound(_) | Self::LocationNotFound(_) | Self::CatalogNotFound(_) => {
                StatusCode::NOT_FOUND
            }
            Self::ContextFileMissing(_) => StatusCode::CONFLICT,
            Self::GenerationTimeout => StatusCode::GATEWAY_TIMEOUT,
            Self::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            Self::AccessDenied => StatusCode::BAD_GATEWAY,
            Self::Extraction(_)
            | Self::AiResponseInvalid(_)
            | Self::WeatherApi(_)
            | Self::Network(_) => StatusCode::BAD_GATEWAY,
            Self::CatalogMalformed(_) | Self::Unknown(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Extraction(_) => "EXTRACTION_ERROR",
            Self::AiResponseInvalid(_) => "AI_RESPONSE_INVALID",
            Self::GenerationTimeout => "GENERATION_TIMEOUT",
            Self::CatalogNotFound(_) => "CATALOG_NOT_FOUND",
            Self::CatalogMalformed(_) => "CATALOG_MALFORMED",
            Self::LocationNotFound(_) => "LOCATION_NOT_FOUND",
            Self::WeatherApi(_) => "WEATHER_API_ERROR",
            Self::ContextFileMissing(_) => "CONTEXT_FILE_MISSING",
            Self::SessionNotFound(_) => "SESSION_NOT_FOUND",
            Self::Network(_) => "NETWORK_ERROR",
            Self::RateLimited => "RATE_LIMITED",
            Self::AccessDenied => "ACCESS_DENIED",
            Self::Unknown(_) => "UNKNOWN_ERROR",
        }
    }

    /// The small, stable set of user-visible messages. Internal detail
    /// never leaks here.
    pub fn public_message(&self) -> String {
        match self {
            Self::InvalidTransition { from, .. } => {
                format!("That action is not available at the current step ({from})")
            }
            Self::Validation(msg) => msg.clone(),
            Self::Extraction(_) => "We couldn't understand your event. Please try again".to_string(),
            Self::AiResponseInvalid(_) => "Outfit generation failed. Please try again".to_string(),
            Self::GenerationTimeout => "The request was too slow. Please try again".to_string(),
            Self::CatalogNotFound(_) | Self::CatalogMalformed(_) => {
                "The clothing catalog is unavailable".to_string()
            }
            Self::LocationNotFound(loc) => format!("We couldn't find \"{loc}\""),
            Self::WeatherApi(_) => "Weather data is temporarily unavailable".to_string(),
            Self::ContextFileMissing(_) => "Session context is missing. Please start over".to_string(),
            Self::SessionNotFound(_) => "Session not found or expired".to_string(),
            Self::Network(_) => "Connection failed. Please try again".to_string(),
            Self::RateLimited => "Too many requests. Please wait a moment".to_string(),
            Self::AccessDenied => "Access denied".to_string(),
            Self::Unknown(_) => "An internal error occurred".to_string(),
        }
    }
}

impl IntoResponse for PipelineError {
    fn into_response(self) -> Response {
        // Log internal errors with detail; expected ones at warn
        match &self {
            Self::Unknown(e) => {
                tracing::error!(error = ?e, "Internal pipeline error");
            }
            Self::Network(_) | Self::WeatherApi(_) | Self::AiResponseInvalid(_) => {
                tracing::error!(error = %self, "Upstream failure");
            }
            _ => {
                tracing::warn!(error = %self, "Pipeline error");
            }
        }

        let status = self.status_code();
        let body = ErrorResponse {
            code: self.code().to_string(),
            message: self.public_message(),
        };

        (status, Json(body)).into_response()
    }
}

pub type PipelineResult<T> = Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_stable() {
        let err = PipelineError::InvalidTransition {
            from: Stage::ConfirmationPending,
            to: Stage::Complete,
        };
        assert_eq!(err.code(), "INVALID_TRANSITION");
        assert_eq!(PipelineError::GenerationTimeout.code(), "GENERATION_TIMEOUT");
        assert_eq!(
            PipelineError::ContextFileMissing("abc".into()).code(),
            "CONTEXT_FILE_MISSING"
        );
    }
}
