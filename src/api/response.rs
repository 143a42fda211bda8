use serde::Serialize;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use tracing::{info, warn};

use crate::error::AppError;

/// Envelope for every JSON response: `data` on success, `meta.message` on error.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
    pub meta: ResponseMeta,
}

#[derive(Serialize)]
pub struct ResponseMeta {
    pub status: &'static str,
    pub status_code: u16,
    pub timestamp: String,
    pub message: Option<String>,
}

impl ResponseMeta {
    fn new(status: StatusCode, message: Option<String>) -> Self {
        ResponseMeta {
            status: if status.is_success() { "success" } else { "error" },
            status_code: status.as_u16(),
            timestamp: Utc::now().to_rfc3339(),
            message,
        }
    }
}

pub fn success<T: Serialize>(data: T) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        StatusCode::OK,
        Json(ApiResponse {
            data: Some(data),
            meta: ResponseMeta::new(StatusCode::OK, None),
        }),
    )
}

pub fn error<T>(status: StatusCode, message: String) -> (StatusCode, Json<ApiResponse<T>>) {
    (
        status,
        Json(ApiResponse {
            data: None,
            meta: ResponseMeta::new(status, Some(message)),
        }),
    )
}

/// Renders an action outcome, logging failures at the boundary.
pub fn from_result<T, D>(action: &str, result: Result<D, AppError>) -> Response
where
    T: Serialize + From<D>,
{
    match result {
        Ok(data) => {
            info!(action, "Action succeeded");
            success(T::from(data)).into_response()
        }
        Err(err) => {
            warn!(action, status = err.status_code().as_u16(), error = %err, "Action failed");
            err.into_response()
        }
    }
}
