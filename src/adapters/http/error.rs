//! Error responses.
//!
//! Every handler error funnels through here, so status codes and body
//! shapes are decided in one place.

use std::sync::atomic::{AtomicBool, Ordering};

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::json;

use crate::application::{AppError, FieldError};
use crate::domain::billing::WebhookError;
use crate::domain::foundation::AuthError;

static EXPOSE_ERROR_DETAIL: AtomicBool = AtomicBool::new(false);

/// Include internal error text in 500 bodies. Off in production.
pub fn expose_error_detail(enabled: bool) {
    EXPOSE_ERROR_DETAIL.store(enabled, Ordering::Relaxed);
}

#[derive(Debug, Serialize)]
pub struct MessageBody {
    pub msg: String,
}

impl MessageBody {
    pub fn new(msg: impl Into<String>) -> Self {
        Self { msg: msg.into() }
    }
}

#[derive(Debug, Serialize)]
struct ErrorItem {
    msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<String>,
}

impl From<FieldError> for ErrorItem {
    fn from(err: FieldError) -> Self {
        Self {
            msg: err.msg,
            field: Some(err.field),
        }
    }
}

fn message(status: StatusCode, msg: impl Into<String>) -> Response {
    (status, Json(MessageBody::new(msg))).into_response()
}

fn errors_envelope(status: StatusCode, msg: impl Into<String>) -> Response {
    let errors = vec![ErrorItem {
        msg: msg.into(),
        field: None,
    }];
    (status, Json(json!({ "errors": errors }))).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Validation(errors) => {
                let errors: Vec<ErrorItem> = errors.into_iter().map(ErrorItem::from).collect();
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({ "msg": "Validation failed", "errors": errors })),
                )
                    .into_response()
            }
            AppError::BadRequest(msg) => message(StatusCode::BAD_REQUEST, msg),
            AppError::Conflict(msg) => errors_envelope(StatusCode::BAD_REQUEST, msg),
            AppError::Unauthenticated(msg) => message(StatusCode::UNAUTHORIZED, msg),
            AppError::Forbidden(msg) => message(StatusCode::FORBIDDEN, msg),
            AppError::NotFound(msg) => message(StatusCode::NOT_FOUND, msg),
            AppError::ConcurrentModification(msg) => message(StatusCode::CONFLICT, msg),
            AppError::Upstream {
                status,
                msg,
                details,
            } => {
                let status = StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY);
                (status, Json(json!({ "msg": msg, "details": details }))).into_response()
            }
            AppError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                let body = if EXPOSE_ERROR_DETAIL.load(Ordering::Relaxed) {
                    json!({ "msg": "Internal server error", "error": detail })
                } else {
                    json!({ "msg": "Internal server error" })
                };
                (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        match self {
            AuthError::ServiceUnavailable(detail) => AppError::Internal(detail).into_response(),
            other => message(StatusCode::UNAUTHORIZED, other.to_string()),
        }
    }
}

impl IntoResponse for WebhookError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_success() {
            tracing::info!(reason = %self, "Webhook acknowledged without changes");
            return (status, Json(json!({ "received": true }))).into_response();
        }
        if status.is_server_error() {
            tracing::error!(error = %self, "Webhook processing failed");
            return message(status, self.client_message());
        }
        tracing::warn!(error = %self, "Webhook rejected");
        errors_envelope(status, self.client_message())
    }
}
