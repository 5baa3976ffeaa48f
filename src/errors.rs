use actix_web::http::header;
use actix_web::{HttpResponse, ResponseError};
use serde::Serialize;
use std::fmt;
use tracing::error;
use utoipa::ToSchema;

use crate::store::StoreError;

#[derive(Debug)]
pub enum AppError {
    ValidationError(String),
    Unauthorized(String),
    /// Carries the single method the route accepts, echoed in the `Allow` header.
    MethodNotAllowed(&'static str),
    ConfigurationError(String),
    /// The remote store rejected a call; the message is the store's own.
    UpstreamError(String),
    InternalError(String),
}

/// Standard error response format
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error type code (e.g., "VALIDATION_ERROR", "UPSTREAM_ERROR")
    #[schema(example = "VALIDATION_ERROR")]
    pub error: String,
    /// Human-readable error message
    #[schema(example = "Missing or invalid month (YYYY-MM)")]
    pub message: String,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            AppError::MethodNotAllowed(allowed) => {
                write!(f, "Method not allowed (expected {allowed})")
            }
            AppError::ConfigurationError(msg) => write!(f, "Configuration error: {msg}"),
            AppError::UpstreamError(msg) => write!(f, "Upstream error: {msg}"),
            AppError::InternalError(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl ResponseError for AppError {
    fn error_response(&self) -> HttpResponse {
        let (status, error_type, message) = match self {
            AppError::ValidationError(msg) => (
                actix_web::http::StatusCode::BAD_REQUEST,
                "VALIDATION_ERROR",
                msg.clone(),
            ),
            AppError::Unauthorized(msg) => (
                actix_web::http::StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                msg.clone(),
            ),
            AppError::MethodNotAllowed(_) => (
                actix_web::http::StatusCode::METHOD_NOT_ALLOWED,
                "METHOD_NOT_ALLOWED",
                "Method not allowed".to_string(),
            ),
            AppError::ConfigurationError(msg) => {
                error!("Configuration error: {msg}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "CONFIGURATION_ERROR",
                    msg.clone(),
                )
            }
            AppError::UpstreamError(msg) => {
                error!("Record store call failed: {msg}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "UPSTREAM_ERROR",
                    msg.clone(),
                )
            }
            AppError::InternalError(msg) => {
                // Log the actual error for debugging, but don't expose to client
                error!("Internal error: {msg}");
                (
                    actix_web::http::StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let mut builder = HttpResponse::build(status);
        if let AppError::MethodNotAllowed(allowed) = self {
            builder.insert_header((header::ALLOW, *allowed));
        }

        builder.json(ErrorResponse {
            error: error_type.to_string(),
            message,
        })
    }
}

// Every store failure aborts the request and surfaces the store's message
impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Remote { message, .. } => AppError::UpstreamError(message),
            other => AppError::UpstreamError(other.to_string()),
        }
    }
}
