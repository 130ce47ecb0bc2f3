//! End-to-end handler tests: the real router over an in-memory store with
//! scripted model backends.

use std::collections::HashMap;
use std::sync::Arc;

use af_blobstore::{BlobStore, MemoryBlobStore};
use af_domain::config::Config;
use af_domain::error::{Error, Result};
use af_gateway::api::functions::Function;
use af_gateway::api::lambda::{self, ProxyEvent};
use af_gateway::api::router;
use af_gateway::state::AppState;
use af_providers::{
    Completion, CompletionRequest, FixedRegionSelector, GeneratedImage, ImageProvider,
    ImageRequest, LlmProvider,
};
use axum::body::Body;
use axum::http::{Request, Response, StatusCode};
use axum::Router;
use parking_lot::Mutex;
use serde_json::Value;
use tower::ServiceExt;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Scripted backends
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Answers `"answer to <query block>"`, or fails when `fail` is set.
/// Every request is recorded.
#[derive(Default)]
struct ScriptedLlm {
    seen: Mutex<Vec<CompletionRequest>>,
    fail: bool,
    /// When set, every call waits here before answering.
    gate: Option<tokio::sync::Barrier>,
}

impl ScriptedLlm {
    fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    fn gated(parties: usize) -> Self {
        Self {
            gate: Some(tokio::sync::Barrier::new(parties)),
            ..Self::default()
        }
    }

    fn calls(&self) -> usize {
        self.seen.lock().len()
    }
}

/// The query block sits between `<query>` and `</query>`.
fn query_of(prompt: &str) -> String {
    prompt
        .split("<query>\n")
        .nth(1)
        .and_then(|rest| rest.split("\n</query>").next())
        .unwrap_or("")
        .to_owned()
}

#[async_trait::async_trait]
impl LlmProvider for ScriptedLlm {
    async fn complete(&self, req: CompletionRequest) -> Result<Completion> {
        self.seen.lock().push(req.clone());
        if let Some(gate) = &self.gate {
            gate.wait().await;
        }
        if self.fail {
            return Err(Error::Provider {
                provider: "scripted".into(),
                message: "HTTP 429 - ThrottlingException".into(),
            });
        }
        Ok(Completion {
            content: format!("answer to {}", query_of(&req.prompt)),
            usage: None,
            model: "scripted-model".into(),
            stop_reason: Some("end_turn".into()),
        })
    }

    fn provider_id(&self) -> &str {
        "scripted"
    }

    fn model(&self) -> &str {
        "scripted-model"
    }
}

const PNG: &[u8] = b"\x89PNG\r\n\x1a\nfake";

#[derive(Default)]
struct ScriptedImages {
    seen: Mutex<Vec<ImageRequest>>,
}

#[async_trait::async_trait]
impl ImageProvider for ScriptedImages {
    async fn generate(&self, req: ImageRequest) -> Result<GeneratedImage> {
        let seed = req.seed;
        self.seen.lock().push(req);
        Ok(GeneratedImage {
            png: PNG.to_vec(),
            model: "scripted-sdxl".into(),
            seed: Some(seed),
        })
    }

    fn provider_id(&self) -> &str {
        "scripted-images"
    }
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Harness
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

struct Harness {
    store: MemoryBlobStore,
    llm: Arc<ScriptedLlm>,
    images: Arc<ScriptedImages>,
    state: AppState,
    app: Router,
}

impl Harness {
    fn new() -> Self {
        Self::with_llm(ScriptedLlm::default())
    }

    fn with_llm(llm: ScriptedLlm) -> Self {
        let store = MemoryBlobStore::new();
        let llm = Arc::new(llm);
        let images = Arc::new(ScriptedImages::default());
        let state = AppState::new(
            Arc::new(Config::default()),
            Arc::new(store.clone()),
            llm.clone(),
            images.clone(),
        )
        .with_region_selector(Arc::new(FixedRegionSelector::new(1)));
        let app = router(state.clone()).with_state(state.clone());
        Self {
            store,
            llm,
            images,
            state,
            app,
        }
    }

    async fn get(&self, uri: &str) -> Response<Body> {
        self.app
            .clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn blob(&self, key: &str) -> Option<String> {
        self.store
            .get(key)
            .await
            .unwrap()
            .map(|b| String::from_utf8(b).unwrap())
    }

    async fn put(&self, key: &str, body: &str) {
        self.store.put(key, body.as_bytes().to_vec()).await.unwrap();
    }
}

fn encode(s: &str) -> String {
    s.bytes()
        .map(|b| {
            if b.is_ascii_alphanumeric() || b"-_.~".contains(&b) {
                (b as char).to_string()
            } else {
                format!("%{b:02X}")
            }
        })
        .collect()
}

async fn body_bytes(resp: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_text(resp: Response<Body>) -> String {
    String::from_utf8(body_bytes(resp).await).unwrap()
}

fn assert_fixed_headers(resp: &Response<Body>) {
    let h = resp.headers();
    assert_eq!(h["content-type"], "application/json; charset=UTF-8");
    assert_eq!(h["access-control-allow-origin"], "*");
    assert_eq!(h["access-control-allow-methods"], "*");
    assert_eq!(h["x-requested-with"], "*");
    assert!(h["access-control-allow-headers"]
        .to_str()
        .unwrap()
        .starts_with("Content-Type,X-Amz-Date"));
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Chat
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn first_turn_answers_and_records_history() {
    let h = Harness::new();

    let resp = h
        .get(&format!("/api/lambda-chat?id=u1&query={}", encode("안녕")))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_fixed_headers(&resp);

    let body: Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(body["answer"], "answer to 안녕");
    assert_eq!(body["query"], "안녕");

    assert_eq!(
        h.blob("info/u1_history.txt").await.as_deref(),
        Some("Human: 안녕\nAI: answer to 안녕\n")
    );
    // The profile is only read.
    assert!(h.blob("info/u1_info.json").await.is_none());

    let seen = h.llm.seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].region, "us-east-1");
    assert_eq!(seen[0].params.temperature, 1.0);
    assert_eq!(seen[0].params.top_k, 250);
    assert!(seen[0].prompt.contains("이름: , 성격: , 생긴모습: "));
}

#[tokio::test]
async fn second_turn_sees_prior_history_in_prompt() {
    let h = Harness::new();
    h.put("info/u1_info.json", r#"{"ai-name":"토리","my-name":"민지"}"#)
        .await;

    h.get("/api/lambda-chat?id=u1&query=hello").await;
    h.get("/api/lambda-chat?id=u1&query=again").await;

    let seen = h.llm.seen.lock();
    assert_eq!(seen.len(), 2);
    assert!(!seen[0].prompt.contains("Human: hello"));
    assert!(seen[1].prompt.contains("Human: hello\nAI: answer to hello\n"));
    assert!(seen[1].prompt.contains("이름: 토리"));
    assert!(seen[1].prompt.contains("이름: 민지"));
    drop(seen);

    assert_eq!(
        h.blob("info/u1_history.txt").await.as_deref(),
        Some("Human: hello\nAI: answer to hello\nHuman: again\nAI: answer to again\n")
    );
}

#[tokio::test]
async fn reset_clears_history_without_calling_the_model() {
    let h = Harness::new();
    let profile = r#"{"ai-name":"토리"}"#;
    h.put("info/u2_info.json", profile).await;
    h.put("info/u2_history.txt", "Human: a\nAI: b\n").await;

    let resp = h
        .get(&format!("/api/lambda-chat?id=u2&query={}", encode("  DELETE HISTORY ")))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_fixed_headers(&resp);
    assert_eq!(body_text(resp).await, "DELETE");

    assert_eq!(h.blob("info/u2_history.txt").await.as_deref(), Some(""));
    assert_eq!(h.blob("info/u2_info.json").await.as_deref(), Some(profile));
    assert_eq!(h.llm.calls(), 0);
}

#[tokio::test]
async fn reset_command_is_case_sensitive() {
    let h = Harness::new();
    let resp = h
        .get(&format!("/api/lambda-chat?id=u2&query={}", encode("delete history")))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(h.llm.calls(), 1);
    assert_eq!(
        h.blob("info/u2_history.txt").await.as_deref(),
        Some("Human: delete history\nAI: answer to delete history\n")
    );
}

#[tokio::test]
async fn missing_parameters_are_rejected() {
    let h = Harness::new();

    let resp = h.get("/api/lambda-chat?id=u1").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_fixed_headers(&resp);
    let body: Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(body["error"], "missing parameter: query");

    let resp = h.get("/api/lambda-summary").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let resp = h.get("/api/lambda-image-generate?id=u1").await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    assert_eq!(h.llm.calls(), 0);
    assert!(h.store.is_empty());
}

#[tokio::test]
async fn model_failure_is_a_500_and_writes_nothing() {
    let h = Harness::with_llm(ScriptedLlm::failing());
    h.put("info/u1_history.txt", "Human: a\nAI: b\n").await;

    let resp = h.get("/api/lambda-chat?id=u1&query=hi").await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_fixed_headers(&resp);
    let body: Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert!(body["error"].as_str().unwrap().contains("ThrottlingException"));

    assert_eq!(h.llm.calls(), 1);
    assert_eq!(
        h.blob("info/u1_history.txt").await.as_deref(),
        Some("Human: a\nAI: b\n")
    );
}

#[tokio::test]
async fn concurrent_turns_keep_exactly_one_append() {
    let h = Harness::with_llm(ScriptedLlm::gated(2));

    // Both turns read the empty history before either answer returns.
    let (a, b) = tokio::join!(
        h.get("/api/lambda-chat?id=race&query=first"),
        h.get("/api/lambda-chat?id=race&query=second"),
    );
    assert_eq!(a.status(), StatusCode::OK);
    assert_eq!(b.status(), StatusCode::OK);

    let history = h.blob("info/race_history.txt").await.unwrap();
    let first = "Human: first\nAI: answer to first\n";
    let second = "Human: second\nAI: answer to second\n";
    assert!(
        history == first || history == second,
        "unexpected history: {history:?}"
    );
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Summary, profile update, image
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn summary_uses_recent_history_and_leaves_it_alone() {
    let h = Harness::new();
    h.put("info/u1_info.json", r#"{"ai-name":"토리","my-name":"민지"}"#)
        .await;
    let history: String = (0..8)
        .map(|i| format!("Human: q{i}\nAI: a{i}\n"))
        .collect();
    h.put("info/u1_history.txt", &history).await;

    let resp = h.get("/api/lambda-summary?id=u1").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_fixed_headers(&resp);
    let body: Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert!(body["answer"].as_str().unwrap().starts_with("answer to"));

    let seen = h.llm.seen.lock();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].params.temperature, 0.8);
    assert_eq!(seen[0].params.top_k, 125);
    let prompt = &seen[0].prompt;
    assert!(prompt.contains("<history>"));
    // Window of 10 lines: the last five turns.
    assert!(prompt.contains("Human: q3\n"));
    assert!(!prompt.contains("Human: q2\n"));
    assert!(!prompt.contains("<query>"));
    drop(seen);

    assert_eq!(h.blob("info/u1_history.txt").await, Some(history));
}

#[tokio::test]
async fn info_update_merges_fields_and_returns_the_profile() {
    let h = Harness::new();
    h.put(
        "info/u1_info.json",
        r#"{"ai-image":"/default/data/u1_image.png","my-age":"7"}"#,
    )
    .await;

    let uri = format!(
        "/api/lambda-info-update?id=u1&ai-name={}&my-age=%20%20&my-hobby={}",
        encode(" 토리 "),
        encode("그림 그리기"),
    );
    let resp = h.get(&uri).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_fixed_headers(&resp);
    let body: Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(body["ai-name"], "토리");
    assert_eq!(body["my-age"], "7");
    assert_eq!(body["my-hobby"], "그림 그리기");
    assert_eq!(body["ai-image"], "/default/data/u1_image.png");
    assert!(body.get("id").is_none());

    let stored: Value =
        serde_json::from_str(&h.blob("info/u1_info.json").await.unwrap()).unwrap();
    assert_eq!(stored, body);
}

#[tokio::test]
async fn image_generation_stores_png_and_links_it_from_the_profile() {
    let h = Harness::new();
    h.put("info/u1_info.json", r#"{"ai-name":"토리"}"#).await;

    let resp = h
        .get(&format!(
            "/api/lambda-image-generate?id=u1&prompt={}",
            encode("a friendly robot")
        ))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_fixed_headers(&resp);
    let body: Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(body["url"], "/default/data/u1_image.png");
    assert_eq!(body["prompt"], "a friendly robot");

    let seen = h.images.seen.lock().clone();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].cfg_scale, 8.0);
    assert_eq!(seen[0].steps, 50);
    assert_eq!(seen[0].seed, 0);

    assert_eq!(h.store.get("data/u1_image.png").await.unwrap(), Some(PNG.to_vec()));
    let profile: Value =
        serde_json::from_str(&h.blob("info/u1_info.json").await.unwrap()).unwrap();
    assert_eq!(profile["ai-name"], "토리");
    assert_eq!(profile["ai-prompt"], "a friendly robot");
    assert_eq!(profile["ai-image"], "/default/data/u1_image.png");

    // The stored portrait is served back with an image content type.
    let resp = h.get("/data/u1_image.png").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["content-type"], "image/png");
    assert_eq!(body_bytes(resp).await, PNG);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Assets, health
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[tokio::test]
async fn asset_routes_serve_blobs_or_404() {
    let h = Harness::new();
    h.put("html/index.html", "<html></html>").await;
    h.put("info/u1_info.json", "{}").await;

    let resp = h.get("/html/index.html").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["content-type"], "text/html; charset=UTF-8");

    let resp = h.get("/info/u1_info.json").await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_text(resp).await, "{}");

    let resp = h.get("/data/nobody_image.png").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_reports_backends() {
    let h = Harness::new();
    let resp = h.get("/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_text(resp).await).unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["store"], "memory");
    assert_eq!(body["regions"].as_array().unwrap().len(), 4);
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Serverless adapter
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

fn event(pairs: &[(&str, &str)]) -> ProxyEvent {
    ProxyEvent {
        query_string_parameters: Some(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<HashMap<_, _>>(),
        ),
    }
}

#[tokio::test]
async fn proxy_event_runs_the_same_turn() {
    let h = Harness::new();

    let resp = lambda::handle(&h.state, Function::Chat, event(&[("id", "u1"), ("query", "안녕")]))
        .await
        .unwrap();
    assert_eq!(resp.status_code, 200);
    assert_eq!(resp.headers["Access-Control-Allow-Origin"], "*");
    assert_eq!(resp.headers["Content-Type"], "application/json; charset=UTF-8");
    let body: Value = serde_json::from_str(&resp.body).unwrap();
    assert_eq!(body["answer"], "answer to 안녕");
    assert_eq!(
        h.blob("info/u1_history.txt").await.as_deref(),
        Some("Human: 안녕\nAI: answer to 안녕\n")
    );

    let resp = lambda::handle(
        &h.state,
        Function::Chat,
        event(&[("id", "u1"), ("query", "DELETE HISTORY")]),
    )
    .await
    .unwrap();
    assert_eq!(resp.body, "DELETE");
    assert_eq!(h.blob("info/u1_history.txt").await.as_deref(), Some(""));
}

#[tokio::test]
async fn proxy_event_without_parameters_is_400() {
    let h = Harness::new();
    let resp = lambda::handle(&h.state, Function::Summary, ProxyEvent::default())
        .await
        .unwrap();
    assert_eq!(resp.status_code, 400);
    assert_eq!(h.llm.calls(), 0);
}

#[tokio::test]
async fn proxy_event_propagates_core_faults() {
    let h = Harness::with_llm(ScriptedLlm::failing());
    let err = lambda::handle(&h.state, Function::Summary, event(&[("id", "u1")]))
        .await
        .unwrap_err();
    assert!(matches!(err, Error::Provider { .. }));
}
