//! Preflight handling.
//!
//! `server.cors.allowed_origins` only decides which origins get a positive
//! answer to an `OPTIONS` preflight. Handler responses always carry the
//! fixed `Access-Control-Allow-Origin: *` from [`super::response`], so a
//! simple `GET` from any origin is readable regardless of this list.

use axum::http::{header, HeaderValue, Method};
use tower_http::cors::{AllowOrigin, CorsLayer};

use af_domain::config::CorsConfig;

/// Build a [`CorsLayer`] from the configured allowed origins.
///
/// A lone `"*"` allows every origin. Entries ending in `:*` match any port
/// on that host (`http://localhost:*`).
pub fn build_cors_layer(cors: &CorsConfig) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::OPTIONS];
    let headers = [
        header::CONTENT_TYPE,
        header::AUTHORIZATION,
        header::ACCEPT,
        header::HeaderName::from_static("x-api-key"),
        header::HeaderName::from_static("x-requested-with"),
    ];

    if cors.allowed_origins.len() == 1 && cors.allowed_origins[0] == "*" {
        return CorsLayer::new()
            .allow_origin(tower_http::cors::Any)
            .allow_methods(methods)
            .allow_headers(headers);
    }

    let mut exact: Vec<HeaderValue> = Vec::new();
    let mut wildcard_prefixes: Vec<String> = Vec::new();

    for origin in &cors.allowed_origins {
        if origin.ends_with(":*") {
            wildcard_prefixes.push(origin.trim_end_matches('*').to_owned());
        } else if let Ok(hv) = origin.parse::<HeaderValue>() {
            exact.push(hv);
        } else {
            tracing::warn!(origin = %origin, "invalid CORS origin, skipping");
        }
    }

    let allow_origin = if wildcard_prefixes.is_empty() {
        AllowOrigin::list(exact)
    } else {
        AllowOrigin::predicate(move |origin, _| {
            if exact.iter().any(|e| e.as_bytes() == origin.as_bytes()) {
                return true;
            }
            let origin = origin.to_str().unwrap_or("");
            wildcard_prefixes.iter().any(|prefix| {
                origin
                    .strip_prefix(prefix.as_str())
                    .is_some_and(|port| !port.is_empty() && port.chars().all(|c| c.is_ascii_digit()))
            })
        })
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods(methods)
        .allow_headers(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use tower::ServiceExt;

    use crate::api::response::FunctionResponse;

    fn app(origins: &[&str]) -> Router {
        let cors = CorsConfig {
            allowed_origins: origins.iter().map(|o| o.to_string()).collect(),
        };
        Router::new()
            .route("/api/lambda-chat", get(|| async { FunctionResponse::ok("{}") }))
            .layer(build_cors_layer(&cors))
    }

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/lambda-chat")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "GET")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn preflight_follows_the_origin_list() {
        let app = app(&["http://localhost:*", "https://friend.example"]);

        let resp = app.clone().oneshot(preflight("http://localhost:5173")).await.unwrap();
        assert_eq!(
            resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "http://localhost:5173"
        );

        let resp = app.clone().oneshot(preflight("https://friend.example")).await.unwrap();
        assert_eq!(
            resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://friend.example"
        );

        let resp = app.oneshot(preflight("https://other.example")).await.unwrap();
        assert!(resp.headers().get(header::ACCESS_CONTROL_ALLOW_ORIGIN).is_none());
    }

    #[tokio::test]
    async fn simple_get_keeps_the_fixed_wildcard() {
        let app = app(&["https://friend.example"]);
        let req = Request::get("/api/lambda-chat")
            .header(header::ORIGIN, "https://other.example")
            .body(Body::empty())
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }

    #[tokio::test]
    async fn lone_wildcard_allows_any_preflight() {
        let resp = app(&["*"]).oneshot(preflight("https://anyone.example")).await.unwrap();
        assert_eq!(resp.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
    }
}
