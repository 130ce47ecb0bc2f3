//! Read-only routes serving stored blobs to the web client.
//!
//! `/data/:object` and `/info/:object` map onto the configured prefixes;
//! `/html/:object` serves pages stored under `html/`.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};

use af_blobstore::content_type_for;

use crate::api::error::ApiError;
use crate::state::AppState;

pub async fn data_object(
    State(state): State<AppState>,
    Path(object): Path<String>,
) -> Result<Response, ApiError> {
    let key = state.keys.data_key(&object);
    serve(&state, &key).await
}

pub async fn info_object(
    State(state): State<AppState>,
    Path(object): Path<String>,
) -> Result<Response, ApiError> {
    let key = state.keys.info_key(&object);
    serve(&state, &key).await
}

pub async fn html_object(
    State(state): State<AppState>,
    Path(object): Path<String>,
) -> Result<Response, ApiError> {
    serve(&state, &format!("html/{object}")).await
}

async fn serve(state: &AppState, key: &str) -> Result<Response, ApiError> {
    match state.store.get(key).await? {
        Some(body) => Ok((
            [(header::CONTENT_TYPE, content_type_for(key))],
            body,
        )
            .into_response()),
        None => Ok((StatusCode::NOT_FOUND, "not found").into_response()),
    }
}
