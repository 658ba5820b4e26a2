//! Error responses.
//!
//! Every failure leaves the API as `{"error": "<CODE>", "message": "<text>"}`.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use orderdesk_core::DomainError;
use orderdesk_shared::AppError;
use serde_json::json;
use validator::ValidationErrors;

/// Result type of handlers.
pub type ApiResult<T> = Result<T, ApiError>;

/// An application error rendered as JSON.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl ApiError {
    /// Shorthand for a 400 response.
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self(AppError::Validation(message.into()))
    }

    /// Shorthand for a 401 response.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self(AppError::Unauthorized(message.into()))
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err.into())
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .iter()
            .map(|(field, errs)| {
                let reason = errs
                    .iter()
                    .find_map(|e| e.message.as_ref().map(ToString::to_string))
                    .unwrap_or_else(|| "is invalid".to_string());
                format!("{field} {reason}")
            })
            .collect();
        fields.sort();
        Self::bad_request(fields.join(", "))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        let message = if self.0.is_internal() {
            tracing::error!(error = %self.0, "request failed");
            "An error occurred".to_string()
        } else {
            detail(&self.0)
        };

        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": message,
            })),
        )
            .into_response()
    }
}

fn detail(err: &AppError) -> String {
    match err {
        AppError::Unauthorized(msg)
        | AppError::NotFound(msg)
        | AppError::Validation(msg)
        | AppError::Conflict(msg)
        | AppError::Database(msg)
        | AppError::BusinessRule { message: msg, .. } => msg.clone(),
    }
}
