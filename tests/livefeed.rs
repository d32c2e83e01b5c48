//! End-to-end livefeed test: a real server, a WebSocket subscriber and
//! games ingested over HTTP.

#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use rps_livefeed::api::build_app;
use rps_livefeed::app_state::AppState;
use rps_livefeed::client::{FeedEvent, FeedHandler, LiveGamesView, LivefeedSubscriber};
use rps_livefeed::domain::{EventBus, GameId, LiveGames};
use rps_livefeed::service::GameService;
use rps_livefeed::upstream::models::{ApiGameBegin, ApiPlayer};

async fn start_server(state: AppState) -> SocketAddr {
    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("should bind an ephemeral port");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("listener should have an address");
    };
    let app = build_app(state, Duration::from_secs(5));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

async fn next(subscriber: &mut LivefeedSubscriber) -> FeedEvent {
    match tokio::time::timeout(Duration::from_secs(5), subscriber.next_event()).await {
        Ok(Ok(Some(event))) => event,
        other => panic!("expected a livefeed event, got {other:?}"),
    }
}

async fn ingest(http: &reqwest::Client, addr: SocketAddr, body: serde_json::Value) {
    let Ok(response) = http
        .post(format!("http://{addr}/api/v1/ingest"))
        .json(&body)
        .send()
        .await
    else {
        panic!("ingest request should be sent");
    };
    assert_eq!(response.status(), reqwest::StatusCode::ACCEPTED);
}

#[tokio::test]
async fn subscriber_tracks_games_until_the_list_is_empty() {
    let service = GameService::new(Arc::new(LiveGames::new()), EventBus::new(64), None);

    // A game already running before the subscriber connects.
    let running = ApiGameBegin {
        game_id: GameId::from("g0"),
        player_a: ApiPlayer {
            name: "Cy".to_string(),
        },
        player_b: ApiPlayer {
            name: "Dee".to_string(),
        },
    };
    let Ok(_) = service.begin_game(&running).await else {
        panic!("seed game should begin");
    };

    let addr = start_server(AppState::new(service, None)).await;
    let Ok(mut subscriber) = LivefeedSubscriber::connect(&format!("ws://{addr}/livefeed")).await
    else {
        panic!("subscriber should connect");
    };

    let handler = FeedHandler;
    let mut view = LiveGamesView::new();

    let greeting = next(&mut subscriber).await;
    assert!(matches!(&greeting, FeedEvent::Connected { live_games } if live_games.len() == 1));
    handler.handle(&greeting, &mut view);
    assert_eq!(view.render(), "- Cy vs Dee\n");

    let http = reqwest::Client::new();
    ingest(
        &http,
        addr,
        serde_json::json!({
            "type": "GAME_BEGIN",
            "gameId": "g1",
            "playerA": {"name": "Ada"},
            "playerB": {"name": "Bo"}
        }),
    )
    .await;

    let begin = next(&mut subscriber).await;
    let FeedEvent::GameBegin(info) = &begin else {
        panic!("expected game_begin, got {begin:?}");
    };
    assert_eq!(info.game_id.as_str(), "g1");
    assert!(handler.handle(&begin, &mut view));
    assert_eq!(view.items().len(), 2);

    for (game_id, a, b) in [("g1", "Ada", "Bo"), ("g0", "Cy", "Dee")] {
        ingest(
            &http,
            addr,
            serde_json::json!({
                "type": "GAME_RESULT",
                "gameId": game_id,
                "t": 1_700_000_000_000_i64,
                "playerA": {"name": a, "played": "PAPER"},
                "playerB": {"name": b, "played": "ROCK"}
            }),
        )
        .await;

        let result = next(&mut subscriber).await;
        assert_eq!(result, FeedEvent::GameResult(GameId::from(game_id)));
        assert!(handler.handle(&result, &mut view));
    }

    assert!(view.items().is_empty());
    assert!(view.placeholder_visible());
}

#[tokio::test]
async fn every_subscriber_sees_the_same_events() {
    let service = GameService::new(Arc::new(LiveGames::new()), EventBus::new(64), None);
    let game_service_addr = start_server(AppState::new(service, None)).await;
    let url = format!("ws://{game_service_addr}/livefeed");

    let (Ok(mut first), Ok(mut second)) = (
        LivefeedSubscriber::connect(&url).await,
        LivefeedSubscriber::connect(&url).await,
    ) else {
        panic!("both subscribers should connect");
    };
    assert!(matches!(next(&mut first).await, FeedEvent::Connected { .. }));
    assert!(matches!(next(&mut second).await, FeedEvent::Connected { .. }));

    let http = reqwest::Client::new();
    ingest(
        &http,
        game_service_addr,
        serde_json::json!({
            "type": "GAME_BEGIN",
            "gameId": "shared",
            "playerA": {"name": "Ada"},
            "playerB": {"name": "Bo"}
        }),
    )
    .await;

    let a = next(&mut first).await;
    let b = next(&mut second).await;
    assert_eq!(a, b);

    let Ok(()) = first.close().await else {
        panic!("close should be sent");
    };
}
