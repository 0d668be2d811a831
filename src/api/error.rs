use axum::{
    response::{IntoResponse, Response},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::services::token::HolderError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Holders(#[from] HolderError),
    #[error("Too many requests")]
    RateLimited,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    hint: Option<&'static str>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, hint) = match &self {
            ApiError::Holders(e) if e.is_invalid_input() => (StatusCode::BAD_REQUEST, None),
            ApiError::Holders(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.hint()),
            ApiError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, None),
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
            hint,
        });

        (status, body).into_response()
    }
}
