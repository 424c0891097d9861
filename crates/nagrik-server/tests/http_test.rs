use async_trait::async_trait;
use nagrik_core::Catalog;
use nagrik_core::config::{MindMapConfig, PortalConfig};
use nagrik_portal::{SchemeService, Transport, TransportResponse};
use nagrik_server::{AppState, build_router};
use serde_json::Value;
use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Counts requests and fails each one, like an unreachable portal.
#[derive(Default)]
struct DownPortal {
    calls: AtomicUsize,
}

#[async_trait]
impl Transport for DownPortal {
    async fn get(&self, url: &str, _accept: &str) -> nagrik_portal::Result<TransportResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(nagrik_portal::Error::Transport(format!("unreachable: {url}")))
    }
}

async fn spawn_app(transport: Arc<dyn Transport>) -> SocketAddr {
    let schemes = SchemeService::new(transport, PortalConfig::default()).expect("scheme service");
    let state = AppState::new(
        Catalog::builtin().expect("catalog"),
        schemes,
        MindMapConfig::default(),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind listener");
    let addr = listener.local_addr().expect("local addr");
    let app = build_router(state);
    tokio::spawn(async move { axum::serve(listener, app).await.expect("serve app") });
    addr
}

async fn offline_app() -> SocketAddr {
    spawn_app(Arc::new(DownPortal::default())).await
}

async fn get(addr: SocketAddr, path: &str) -> (u16, String) {
    let response = reqwest::get(format!("http://{addr}{path}"))
        .await
        .expect("request");
    let status = response.status().as_u16();
    (status, response.text().await.expect("body"))
}

async fn post(addr: SocketAddr, path: &str, body: &str) -> (u16, Value) {
    let response = reqwest::Client::new()
        .post(format!("http://{addr}{path}"))
        .header("content-type", "application/json")
        .body(body.to_string())
        .send()
        .await
        .expect("request");
    let status = response.status().as_u16();
    let text = response.text().await.expect("body");
    (status, serde_json::from_str(&text).expect("json body"))
}

#[tokio::test]
async fn schemes_fall_back_when_the_portal_is_down() {
    let portal = Arc::new(DownPortal::default());
    let addr = spawn_app(portal.clone()).await;

    let (status, body) = get(addr, "/api/schemes").await;
    assert_eq!(status, 200);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["source"], "fallback");
    assert!(!json["schemes"].as_array().unwrap().is_empty());
    assert_eq!(json["schemes"][0]["sourceUrl"], "https://www.myscheme.gov.in");
    // Four API guesses and three pages.
    assert_eq!(portal.calls.load(Ordering::SeqCst), 7);

    let (status, json) = post(addr, "/api/schemes", "{not json").await;
    assert_eq!(status, 200);
    assert_eq!(json["source"], "fallback");
}

#[tokio::test]
async fn simplify_statuses() {
    let addr = offline_app().await;

    let (status, json) = post(addr, "/api/simplify-scheme", r#"{"input": ""}"#).await;
    assert_eq!(status, 400);
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Please provide scheme text or URL.");
    assert!(json.get("result").is_none());

    let (status, json) = post(addr, "/api/simplify-scheme", r#"{"input": 42}"#).await;
    assert_eq!(status, 400);
    assert_eq!(json["success"], false);

    for body in ["null", "[]", "\"pension\""] {
        let (status, json) = post(addr, "/api/simplify-scheme", body).await;
        assert_eq!(status, 400, "{body}");
        assert_eq!(json["message"], "Please provide scheme text or URL.");
    }

    let (status, json) = post(addr, "/api/simplify-scheme", "{broken").await;
    assert_eq!(status, 500);
    assert_eq!(json["message"], "Failed to simplify scheme.");

    let (status, json) = post(
        addr,
        "/api/simplify-scheme",
        r#"{"input": "Old age pension for senior citizens"}"#,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(json["success"], true);
    assert!(json["result"]["flowchart"].as_str().unwrap().starts_with("flowchart"));
    assert!(!json["result"]["bulletPoints"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn chapters_and_mind_maps() {
    let addr = offline_app().await;

    let (status, body) = get(addr, "/api/chapters").await;
    assert_eq!(status, 200);
    let chapters: Value = serde_json::from_str(&body).unwrap();
    let chapters = chapters.as_array().unwrap();
    assert_eq!(chapters.len(), 5);
    let first = chapters[0]["id"].as_str().unwrap().to_string();
    assert!(chapters[0]["displayTitle"].is_string());

    let (status, svg) = get(addr, &format!("/api/chapters/{first}/mindmap")).await;
    assert_eq!(status, 200);
    assert!(svg.starts_with("<svg "));

    let (status, body) = get(addr, &format!("/api/chapters/{first}/layout?width=1200&height=900")).await;
    assert_eq!(status, 200);
    let snapshot: Value = serde_json::from_str(&body).unwrap();
    assert!(snapshot["contentWidth"].as_f64().unwrap() >= 1200.0);
    assert!(snapshot["contentHeight"].as_f64().unwrap() >= 900.0);
    assert_eq!(
        svg.matches("<path d=\"M ").count(),
        snapshot["connectors"].as_array().unwrap().len()
    );

    let (status, body) = get(addr, "/api/chapters/nope/layout").await;
    assert_eq!(status, 404);
    let json: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn responses_carry_a_request_id() {
    let addr = offline_app().await;
    let response = reqwest::get(format!("http://{addr}/healthz")).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    let id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert_eq!(id.len(), 36);

    let (status, body) = get(addr, "/api/languages").await;
    assert_eq!(status, 200);
    let langs: Value = serde_json::from_str(&body).unwrap();
    assert_eq!(langs.as_array().unwrap().len(), 6);
    assert_eq!(langs[0]["code"], "en");
}
