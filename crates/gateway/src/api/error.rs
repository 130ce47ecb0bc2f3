use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::api::response::FunctionResponse;

/// A core failure surfaced over HTTP as 500 with a JSON `error` body.
#[derive(Debug)]
pub struct ApiError(pub af_domain::error::Error);

impl From<af_domain::error::Error> for ApiError {
    fn from(e: af_domain::error::Error) -> Self {
        Self(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "handler failed");
        FunctionResponse::error(StatusCode::INTERNAL_SERVER_ERROR, &self.0).into_response()
    }
}
