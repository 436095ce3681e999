use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use modkit::{ApiError, ApiErrorResponse};

use crate::domain::error::DomainError;

/// Helper to create an ApiErrorResponse with less boilerplate
pub fn from_parts(
    status: StatusCode,
    code: &str,
    message: impl Into<String>,
    instance: &str,
) -> ApiErrorResponse {
    ApiError::new(status, code, message)
        .with_instance(instance)
        .into()
}

/// Map domain error to the JSON error response
pub fn map_domain_error(e: &DomainError, instance: &str) -> ApiErrorResponse {
    match e {
        DomainError::Validation { message } => {
            from_parts(StatusCode::BAD_REQUEST, "VALIDATION", message, instance)
        }
        DomainError::Conflict { message } => {
            from_parts(StatusCode::BAD_REQUEST, "CONFLICT", message, instance)
        }
        DomainError::InvalidCredentials => from_parts(
            StatusCode::UNAUTHORIZED,
            "INVALID_CREDENTIALS",
            e.to_string(),
            instance,
        ),
        DomainError::UserNotFound { .. } => {
            from_parts(StatusCode::NOT_FOUND, "USER_NOT_FOUND", "User not found", instance)
        }
        DomainError::NoJobs => from_parts(StatusCode::NOT_FOUND, "NO_JOBS", e.to_string(), instance),
        DomainError::Database { .. } | DomainError::Internal { .. } => {
            // Log the internal error details but don't expose them to the client
            tracing::error!(error = ?e, "Internal error occurred");
            from_parts(
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL",
                "An internal error occurred",
                instance,
            )
        }
    }
}

/// Map a rejected JSON body (bad syntax, wrong types, wrong content type).
/// Bodies over the size limit keep their 413.
pub fn map_json_rejection(rejection: &JsonRejection, instance: &str) -> ApiErrorResponse {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return from_parts(
            StatusCode::PAYLOAD_TOO_LARGE,
            "PAYLOAD_TOO_LARGE",
            "Request body is too large",
            instance,
        );
    }
    from_parts(
        StatusCode::BAD_REQUEST,
        "INVALID_BODY",
        format!("Invalid request body: {}", rejection.body_text()),
        instance,
    )
}
