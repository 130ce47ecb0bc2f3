pub mod assets;
pub mod cors;
pub mod error;
pub mod functions;
pub mod lambda;
pub mod response;

use std::collections::HashMap;

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Json};
use axum::routing::get;
use axum::Router;

use crate::api::error::ApiError;
use crate::api::functions::Function;
use crate::api::response::FunctionResponse;
use crate::state::AppState;

/// Build the full HTTP router.
///
/// The four handler routes live under `server.base_path`; health and the
/// asset routes are mounted at the root.
pub fn router(state: AppState) -> Router<AppState> {
    let functions = Router::new()
        .route(Function::Chat.route(), get(chat))
        .route(Function::Summary.route(), get(summary))
        .route(Function::InfoUpdate.route(), get(info_update))
        .route(Function::ImageGenerate.route(), get(image_generate));

    let root = Router::new()
        .route("/health", get(health))
        .route("/data/:object", get(assets::data_object))
        .route("/info/:object", get(assets::info_object))
        .route("/html/:object", get(assets::html_object));

    let base = state.config.server.base_path.trim_matches('/');
    if base.is_empty() {
        root.merge(functions)
    } else {
        root.nest(&format!("/{base}"), functions)
    }
}

async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "store": state.store.backend(),
        "model": state.llm.model(),
        "regions": state.llm.regions(),
    }))
}

async fn dispatch(
    state: &AppState,
    function: Function,
    params: &HashMap<String, String>,
) -> Result<FunctionResponse, ApiError> {
    Ok(functions::call(state, function, params).await?)
}

async fn chat(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<FunctionResponse, ApiError> {
    dispatch(&state, Function::Chat, &params).await
}

async fn summary(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<FunctionResponse, ApiError> {
    dispatch(&state, Function::Summary, &params).await
}

async fn info_update(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<FunctionResponse, ApiError> {
    dispatch(&state, Function::InfoUpdate, &params).await
}

async fn image_generate(
    State(state): State<AppState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<FunctionResponse, ApiError> {
    dispatch(&state, Function::ImageGenerate, &params).await
}
