//! REST endpoint tests driving the real router in-process.

#![allow(clippy::panic)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use rps_livefeed::api::build_app;
use rps_livefeed::app_state::AppState;
use rps_livefeed::domain::{EventBus, LiveGames};
use rps_livefeed::persistence::SqliteStore;
use rps_livefeed::service::{GameService, HistorySyncer};
use rps_livefeed::upstream::HistoryClient;

async fn app(with_store: bool) -> Router {
    let store = if with_store {
        let Ok(store) = SqliteStore::in_memory().await else {
            panic!("in-memory database should open");
        };
        Some(store)
    } else {
        None
    };
    let service = GameService::new(Arc::new(LiveGames::new()), EventBus::new(64), store);
    build_app(AppState::new(service, None), Duration::from_secs(5))
}

async fn call(app: &Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let Ok(response) = app.clone().oneshot(request).await else {
        panic!("router should respond");
    };
    let status = response.status();
    let Ok(bytes) = axum::body::to_bytes(response.into_body(), usize::MAX).await else {
        panic!("body should be readable");
    };
    let value = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, value)
}

fn get(uri: &str) -> Request<Body> {
    let Ok(request) = Request::builder().uri(uri).body(Body::empty()) else {
        panic!("request should build");
    };
    request
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    let Ok(request) = Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
    else {
        panic!("request should build");
    };
    request
}

const BEGIN: &str = r#"{"type":"GAME_BEGIN","gameId":"g1","playerA":{"name":"Ada"},"playerB":{"name":"Bo"}}"#;
const RESULT: &str = r#"{"type":"GAME_RESULT","gameId":"g1","t":1700000000000,
    "playerA":{"name":"Ada","played":"ROCK"},"playerB":{"name":"Bo","played":"SCISSORS"}}"#;

#[tokio::test]
async fn health_reports_counters() {
    let app = app(true).await;
    let (status, body) = call(&app, get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["live_games"], 0);
    assert_eq!(body["persistence"], true);
}

#[tokio::test]
async fn ingest_begin_then_result() {
    let app = app(true).await;

    let (status, body) = call(&app, post_json("/api/v1/ingest", BEGIN)).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["event"], "game_begin");

    let (_, live) = call(&app, get("/api/v1/live")).await;
    assert_eq!(live["count"], 1);
    assert_eq!(live["data"][0]["gameId"], "g1");
    assert_eq!(live["data"][0]["player1"]["name"], "Ada");

    let (status, _) = call(&app, post_json("/api/v1/ingest", BEGIN)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, body) = call(&app, post_json("/api/v1/ingest", RESULT)).await;
    assert_eq!(status, StatusCode::ACCEPTED);
    assert_eq!(body["event"], "game_result");

    let (_, live) = call(&app, get("/api/v1/live")).await;
    assert_eq!(live["count"], 0);

    let (status, history) = call(&app, get("/api/v1/history?page=1&per_page=10")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history["pagination"]["total"], 1);
    assert_eq!(history["data"][0]["player1"]["result"], "WIN");
    assert_eq!(history["data"][0]["player2"]["played"], "SCISSORS");
}

#[tokio::test]
async fn invalid_play_is_bad_request() {
    let app = app(true).await;
    let body = RESULT.replace("SCISSORS", "LIZARD");
    let (status, error) = call(&app, post_json("/api/v1/ingest", &body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error["error"]["code"], 1002);
}

#[tokio::test]
async fn player_search_and_profile() {
    let app = app(true).await;
    let _ = call(&app, post_json("/api/v1/ingest", RESULT)).await;

    let (status, found) = call(&app, get("/api/v1/players?name=ad")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found["data"][0]["name"], "Ada");

    let Some(pid) = found["data"][0]["pid"].as_str() else {
        panic!("player id should be a string");
    };
    let (status, profile) = call(&app, get(&format!("/api/v1/players/{pid}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["stats"]["wins"], 1);
    assert_eq!(profile["stats"]["most_played"], "ROCK");

    let missing = uuid::Uuid::new_v4();
    let (status, _) = call(&app, get(&format!("/api/v1/players/{missing}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn stored_endpoints_need_persistence() {
    let app = app(false).await;
    let (status, error) = call(&app, get("/api/v1/history")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(error["error"]["code"], 3002);

    // Live tracking still works without a database.
    let (status, _) = call(&app, post_json("/api/v1/ingest", BEGIN)).await;
    assert_eq!(status, StatusCode::ACCEPTED);
}

#[tokio::test]
async fn sync_without_upstream_is_rejected() {
    let app = app(true).await;
    let (status, _) = call(&app, post_json("/api/v1/history/sync", "{}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn second_sync_conflicts_while_first_is_running() {
    // Upstream that accepts connections and never answers.
    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("listener should bind");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("listener should have an address");
    };
    let (accepted_tx, accepted_rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        let mut held = Vec::new();
        let mut accepted_tx = Some(accepted_tx);
        while let Ok((stream, _)) = listener.accept().await {
            held.push(stream);
            if let Some(tx) = accepted_tx.take() {
                let _ = tx.send(());
            }
        }
    });

    let Ok(store) = SqliteStore::in_memory().await else {
        panic!("in-memory database should open");
    };
    let Ok(client) = HistoryClient::new(&format!("http://{addr}/rps")) else {
        panic!("history client should build");
    };
    let service = GameService::new(Arc::new(LiveGames::new()), EventBus::new(64), Some(store));
    let state = AppState::new(service, Some(HistorySyncer::new(client, 0)));
    let app = build_app(state, Duration::from_secs(5));

    let first = tokio::spawn({
        let app = app.clone();
        async move { call(&app, post_json("/api/v1/history/sync", "{}")).await }
    });
    let Ok(()) = accepted_rx.await else {
        panic!("first sync should reach the upstream");
    };

    let (status, error) = call(&app, post_json("/api/v1/history/sync", "{}")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error["error"]["code"], 2004);

    first.abort();
}
