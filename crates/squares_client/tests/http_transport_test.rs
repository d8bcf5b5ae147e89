//! Tests for the HTTP binding against a local axum stub.

use axum::{Json, Router, http::StatusCode, routing::post};
use squares_board::{BoardSnapshot, BoardState, Color, Position};
use squares_client::{HttpTransport, Outcome, Transport, TransportErrorKind};
use std::sync::{Arc, Mutex};

/// Serves `router` on an ephemeral port and returns the API base URL.
async fn spawn_stub(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{}/api/squares", addr)
}

fn snapshot() -> BoardSnapshot {
    let mut board = BoardState::new(3).unwrap();
    board.place(Position::new(0, 0), Color::White).unwrap();
    board.snapshot(Color::Black)
}

fn canned(code: StatusCode, body: &'static str) -> Router {
    let reply = move || async move { (code, body) };
    Router::new()
        .route("/api/squares/gameStatus", post(reply))
        .route("/api/squares/nextMove", post(reply))
}

#[tokio::test]
async fn test_game_status_posts_snapshot_json() {
    let seen: Arc<Mutex<Option<BoardSnapshot>>> = Arc::default();
    let recorder = Arc::clone(&seen);
    let router = Router::new().route(
        "/api/squares/gameStatus",
        post(move |Json(body): Json<BoardSnapshot>| async move {
            *recorder.lock().unwrap() = Some(body);
            Json(serde_json::json!({"status": 0, "message": "keep going"}))
        }),
    );
    let transport = HttpTransport::new(spawn_stub(router).await);

    let result = transport.game_status(&snapshot()).await.unwrap();

    assert_eq!(*result.outcome(), Outcome::Ongoing);
    assert_eq!(result.message(), "keep going");
    assert_eq!(seen.lock().unwrap().clone(), Some(snapshot()));
}

#[tokio::test]
async fn test_trailing_slash_in_base_url_is_ignored() {
    let base = spawn_stub(canned(StatusCode::OK, r#"{"status":2}"#)).await;
    let transport = HttpTransport::new(format!("{}/", base));

    let result = transport.game_status(&snapshot()).await.unwrap();

    assert_eq!(*result.outcome(), Outcome::Draw);
    assert_eq!(transport.base_url(), base);
}

#[tokio::test]
async fn test_win_carries_winner() {
    let body = r#"{"status":1,"color":"w","message":"w wins"}"#;
    let transport = HttpTransport::new(spawn_stub(canned(StatusCode::OK, body)).await);

    let result = transport.game_status(&snapshot()).await.unwrap();

    assert_eq!(*result.outcome(), Outcome::Win(Color::White));
}

#[tokio::test]
async fn test_unknown_status_code_is_malformed() {
    let body = r#"{"status":-1,"message":"Board size must be > 2"}"#;
    let transport = HttpTransport::new(spawn_stub(canned(StatusCode::OK, body)).await);

    let error = transport.game_status(&snapshot()).await.unwrap_err();

    assert!(error.is_malformed());
}

#[tokio::test]
async fn test_empty_game_status_is_a_fault() {
    let transport = HttpTransport::new(spawn_stub(canned(StatusCode::NO_CONTENT, "")).await);

    let error = transport.game_status(&snapshot()).await.unwrap_err();

    assert_eq!(error.kind, TransportErrorKind::EmptyStatus);
}

#[tokio::test]
async fn test_next_move_maps_x_to_column() {
    let body = r#"{"x":2,"y":1,"color":"b"}"#;
    let transport = HttpTransport::new(spawn_stub(canned(StatusCode::OK, body)).await);

    let mv = transport.next_move(&snapshot()).await.unwrap().unwrap();

    assert_eq!(*mv.position(), Position::new(1, 2));
    assert_eq!(*mv.color(), Color::Black);
}

#[tokio::test]
async fn test_next_move_no_content_declines() {
    let transport = HttpTransport::new(spawn_stub(canned(StatusCode::NO_CONTENT, "")).await);

    assert_eq!(transport.next_move(&snapshot()).await.unwrap(), None);
}

#[tokio::test]
async fn test_next_move_null_body_declines() {
    let transport = HttpTransport::new(spawn_stub(canned(StatusCode::OK, "null")).await);

    assert_eq!(transport.next_move(&snapshot()).await.unwrap(), None);
}

#[tokio::test]
async fn test_error_body_detail_is_surfaced() {
    let body = r#"{"error":"Board size must be > 2"}"#;
    let transport =
        HttpTransport::new(spawn_stub(canned(StatusCode::INTERNAL_SERVER_ERROR, body)).await);

    let error = transport.next_move(&snapshot()).await.unwrap_err();

    assert_eq!(
        error.kind,
        TransportErrorKind::Status {
            code: 500,
            detail: "Board size must be > 2".to_string(),
        }
    );
    assert!(error.user_message().starts_with("Network error"));
}

#[tokio::test]
async fn test_garbage_body_is_malformed() {
    let transport = HttpTransport::new(spawn_stub(canned(StatusCode::OK, "<html>")).await);

    let error = transport.next_move(&snapshot()).await.unwrap_err();

    assert!(error.is_malformed());
    assert!(error.user_message().starts_with("Bad response from server"));
}

#[tokio::test]
async fn test_negative_coordinate_is_malformed() {
    let body = r#"{"x":-1,"y":0,"color":"b"}"#;
    let transport = HttpTransport::new(spawn_stub(canned(StatusCode::OK, body)).await);

    let error = transport.next_move(&snapshot()).await.unwrap_err();

    assert!(error.is_malformed());
}

#[tokio::test]
async fn test_unreachable_service_is_connection_error() {
    // Bind then drop to get a port nobody listens on
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let transport = HttpTransport::new(format!("http://{}/api/squares", addr));

    let error = transport.game_status(&snapshot()).await.unwrap_err();

    assert!(matches!(error.kind, TransportErrorKind::Connection(_)));
}
