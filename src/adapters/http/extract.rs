//! Request extraction shared by every route module.

use std::str::FromStr;

use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::application::AppError;
use crate::domain::foundation::PageRequest;

pub const INVALID_ID: &str = "Invalid ID format";

/// JSON body whose rejection is reported in the API's own error shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match axum::Json::<T>::from_request(req, state).await {
            Ok(axum::Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(json_rejection(rejection)),
        }
    }
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    tracing::debug!(error = %rejection.body_text(), "Rejected request body");
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            AppError::bad_request("Expected request with `Content-Type: application/json`")
        }
        other => AppError::bad_request(format!("Invalid request body: {}", other.body_text())),
    }
}

/// Parses a path segment into a typed id.
pub fn parse_id<T: FromStr>(raw: &str) -> Result<T, AppError> {
    raw.trim().parse().map_err(|_| AppError::bad_request(INVALID_ID))
}

/// `?page=&limit=`. Unparseable values fall back to the defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageParams {
    pub fn to_request(&self) -> PageRequest {
        let number = |v: &Option<String>| v.as_deref().and_then(|s| s.trim().parse::<u32>().ok());
        PageRequest::new(number(&self.page), number(&self.limit))
    }
}
