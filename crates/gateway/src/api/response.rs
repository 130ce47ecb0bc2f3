//! Transport-neutral handler responses.
//!
//! Both the HTTP router and the serverless adapter render a
//! [`FunctionResponse`], so every response carries the same fixed header
//! set that lets browser clients on any origin call the API.

use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

pub const CONTENT_TYPE_JSON: &str = "application/json; charset=UTF-8";

pub const ALLOW_HEADERS: &str = "Content-Type,X-Amz-Date,X-Amz-Security-Token,Authorization,\
X-Api-Key,X-Requested-With,Accept,Access-Control-Allow-Methods,Access-Control-Allow-Origin,\
Access-Control-Allow-Headers";

/// Headers attached to every handler response.
pub fn fixed_headers() -> [(&'static str, &'static str); 5] {
    [
        ("Content-Type", CONTENT_TYPE_JSON),
        ("Access-Control-Allow-Headers", ALLOW_HEADERS),
        ("Access-Control-Allow-Origin", "*"),
        ("Access-Control-Allow-Methods", "*"),
        ("X-Requested-With", "*"),
    ]
}

/// Status plus body. The body is sent as-is; the reset acknowledgement is
/// plain text even though the content type says JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionResponse {
    pub status: StatusCode,
    pub body: String,
}

impl FunctionResponse {
    pub fn ok(body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::OK,
            body: body.into(),
        }
    }

    /// 200 with `value` serialized as JSON. Non-ASCII text is not escaped.
    pub fn json<T: Serialize>(value: &T) -> af_domain::error::Result<Self> {
        Ok(Self::ok(serde_json::to_string(value)?))
    }

    pub fn error(status: StatusCode, message: impl std::fmt::Display) -> Self {
        Self {
            status,
            body: serde_json::json!({ "error": message.to_string() }).to_string(),
        }
    }

    pub fn bad_request(message: impl std::fmt::Display) -> Self {
        Self::error(StatusCode::BAD_REQUEST, message)
    }
}

impl IntoResponse for FunctionResponse {
    fn into_response(self) -> Response {
        let mut resp = (self.status, self.body).into_response();
        let headers = resp.headers_mut();
        for (name, value) in fixed_headers() {
            // from_bytes lowercases the canonical spelling.
            if let Ok(name) = HeaderName::from_bytes(name.as_bytes()) {
                headers.insert(name, HeaderValue::from_static(value));
            }
        }
        resp
    }
}
