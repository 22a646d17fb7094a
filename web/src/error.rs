//! HTTP error handling and response bodies.

use availability::{BookingRejection, CalendarError, ResolveError, WireError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error body returned by every endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    InvalidSettings(String),
    #[error("online booking is disabled")]
    BookingDisabled,
    #[error(transparent)]
    Rejected(BookingRejection),
    #[error("{0}")]
    Internal(String),
}

impl From<WireError> for AppError {
    fn from(err: WireError) -> Self {
        match err {
            WireError::InvalidDate(_) | WireError::InvalidTimestamp(_) => {
                AppError::BadRequest(err.to_string())
            }
            WireError::MissingDay(_) | WireError::UnknownDay(_) | WireError::Day { .. } => {
                AppError::InvalidSettings(err.to_string())
            }
        }
    }
}

impl From<CalendarError> for AppError {
    fn from(err: CalendarError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<ResolveError> for AppError {
    fn from(err: ResolveError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<BookingRejection> for AppError {
    fn from(rejection: BookingRejection) -> Self {
        match rejection {
            BookingRejection::Resolve(err) => err.into(),
            other => AppError::Rejected(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ApiError::new("BAD_REQUEST", msg)),
            AppError::InvalidSettings(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::new("INVALID_SETTINGS", msg),
            ),
            AppError::BookingDisabled => (
                StatusCode::CONFLICT,
                ApiError::new("BOOKING_DISABLED", self.to_string()),
            ),
            AppError::Rejected(rejection) => (
                StatusCode::CONFLICT,
                ApiError::new(rejection.code(), rejection.to_string()),
            ),
            AppError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiError::new("INTERNAL_ERROR", "An internal error occurred").with_details(msg),
                )
            }
        };

        (status, Json(error)).into_response()
    }
}
