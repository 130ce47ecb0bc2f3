//! The four request handlers, independent of how the request arrived.
//!
//! Parameters come in as a flat string map (HTTP query string or the
//! proxy event's `queryStringParameters`). A missing required parameter is
//! answered with 400 here; every other failure is returned as `Err` for the
//! transport to render.

use std::collections::HashMap;

use serde_json::json;

use af_domain::error::Result;

use crate::api::response::FunctionResponse;
use crate::runtime::{self, TurnInput, TurnOutcome};
use crate::state::AppState;

/// Body returned for a history reset.
pub const RESET_ACK: &str = "DELETE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum Function {
    Chat,
    Summary,
    InfoUpdate,
    ImageGenerate,
}

impl Function {
    /// Route segment under the base path.
    pub fn route(self) -> &'static str {
        match self {
            Function::Chat => "/lambda-chat",
            Function::Summary => "/lambda-summary",
            Function::InfoUpdate => "/lambda-info-update",
            Function::ImageGenerate => "/lambda-image-generate",
        }
    }
}

fn required<'a>(params: &'a HashMap<String, String>, name: &str) -> Option<&'a str> {
    params.get(name).map(String::as_str)
}

/// Dispatch one call.
pub async fn call(
    state: &AppState,
    function: Function,
    params: &HashMap<String, String>,
) -> Result<FunctionResponse> {
    let Some(id) = required(params, "id") else {
        return Ok(FunctionResponse::bad_request("missing parameter: id"));
    };

    match function {
        Function::Chat => {
            let Some(query) = required(params, "query") else {
                return Ok(FunctionResponse::bad_request("missing parameter: query"));
            };
            let outcome = runtime::run_turn(
                state,
                TurnInput {
                    id: id.to_owned(),
                    query: query.to_owned(),
                },
            )
            .await?;
            match outcome {
                TurnOutcome::Reset => Ok(FunctionResponse::ok(RESET_ACK)),
                TurnOutcome::Answered { answer, query } => {
                    FunctionResponse::json(&json!({ "answer": answer, "query": query }))
                }
            }
        }
        Function::Summary => {
            let answer = runtime::introduce(state, id).await?;
            FunctionResponse::json(&json!({ "answer": answer }))
        }
        Function::InfoUpdate => {
            let profile = runtime::update_profile(state, id, params).await?;
            FunctionResponse::json(&profile)
        }
        Function::ImageGenerate => {
            let Some(prompt) = required(params, "prompt") else {
                return Ok(FunctionResponse::bad_request("missing parameter: prompt"));
            };
            let portrait = runtime::generate_portrait(state, id, prompt).await?;
            FunctionResponse::json(&portrait)
        }
    }
}
