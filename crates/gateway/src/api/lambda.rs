//! Serverless proxy-event adapter.
//!
//! Accepts the API-gateway proxy event shape and returns the proxy
//! response shape, so the same handlers can be deployed as functions.
//! Only `queryStringParameters` is read; everything else in the event is
//! ignored.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use af_domain::error::Result;

use crate::api::functions::{self, Function};
use crate::api::response::{fixed_headers, FunctionResponse};
use crate::state::AppState;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProxyEvent {
    #[serde(rename = "queryStringParameters", default)]
    pub query_string_parameters: Option<HashMap<String, String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyResponse {
    #[serde(rename = "statusCode")]
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl From<FunctionResponse> for ProxyResponse {
    fn from(resp: FunctionResponse) -> Self {
        Self {
            status_code: resp.status.as_u16(),
            headers: fixed_headers()
                .into_iter()
                .map(|(k, v)| (k.to_owned(), v.to_owned()))
                .collect(),
            body: resp.body,
        }
    }
}

/// Handle one proxy event. A core fault is returned as `Err` so the
/// function runtime records an invocation failure.
pub async fn handle(state: &AppState, function: Function, event: ProxyEvent) -> Result<ProxyResponse> {
    let params = event.query_string_parameters.unwrap_or_default();
    let resp = functions::call(state, function, &params).await?;
    Ok(resp.into())
}
