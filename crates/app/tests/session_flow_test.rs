//! Login, restore and logout through the wired binary components.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::{Json, Router};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tempfile::tempdir;
use tokio::net::TcpListener;

use resumatch::{App, CliError, Command};
use resumatch_application::{ClientConfig, RetryPolicy, SessionConfig};
use resumatch_domain::LoginCredentials;
use resumatch_infrastructure::AppConfig;

const USER: &str = r#"{"id": "u1", "name": "Ada", "email": "ada@example.com"}"#;

fn authorized(headers: &HeaderMap) -> bool {
    headers.get("authorization").and_then(|v| v.to_str().ok()) == Some("Bearer T1")
}

fn stub(logouts: Arc<AtomicUsize>) -> Router {
    let user: Value = serde_json::from_str(USER).unwrap();
    let profile_user = user.clone();

    let api = Router::new()
        .route(
            "/auth/login",
            post(move |Json(body): Json<Value>| {
                let user = user.clone();
                async move {
                    if body["password"] != "secret1" {
                        return (
                            StatusCode::UNAUTHORIZED,
                            Json(json!({"success": false, "message": "Invalid credentials"})),
                        );
                    }
                    (
                        StatusCode::OK,
                        Json(json!({"success": true, "data": {"user": user, "token": "T1"}})),
                    )
                }
            }),
        )
        .route(
            "/auth/profile",
            get(move |headers: HeaderMap| {
                let user = profile_user.clone();
                async move {
                    if authorized(&headers) {
                        (StatusCode::OK, Json(json!({"success": true, "data": user})))
                    } else {
                        (
                            StatusCode::UNAUTHORIZED,
                            Json(json!({"success": false, "message": "Token expired"})),
                        )
                    }
                }
            }),
        )
        .route(
            "/auth/logout",
            post(move || {
                logouts.fetch_add(1, Ordering::SeqCst);
                async { Json(json!({"success": true})) }
            }),
        )
        .route(
            "/analysis/history",
            get(|headers: HeaderMap| async move {
                if !authorized(&headers) {
                    return (StatusCode::UNAUTHORIZED, Json(json!({"success": false})));
                }
                (
                    StatusCode::OK,
                    Json(json!({
                        "success": true,
                        "data": [{
                            "id": "a1",
                            "fileName": "cv.pdf",
                            "jobTitle": "Rust engineer",
                            "matchScore": 82.0,
                            "createdAt": "2026-01-01T00:00:00Z"
                        }],
                        "meta": {"page": 1, "limit": 10, "total": 1, "totalPages": 1}
                    })),
                )
            }),
        );

    Router::new().nest("/api", api)
}

async fn serve(logouts: Arc<AtomicUsize>) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, stub(logouts)).await.unwrap();
    });
    addr
}

fn app(addr: SocketAddr, session_file: &Path) -> App {
    App::new(AppConfig {
        client: ClientConfig::new(&format!("http://{addr}/api")),
        session: SessionConfig::default(),
        retry: RetryPolicy::default(),
        session_file: session_file.to_path_buf(),
    })
    .unwrap()
}

fn stored(session_file: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(session_file).unwrap()).unwrap()
}

#[tokio::test]
async fn test_login_restore_logout() {
    let logouts = Arc::new(AtomicUsize::new(0));
    let addr = serve(logouts.clone()).await;
    let dir = tempdir().unwrap();
    let session_file = dir.path().join("session.json");

    let first = app(addr, &session_file);
    let greeting = first
        .login_with(LoginCredentials::new("ada@example.com", "secret1"))
        .await
        .unwrap();
    assert_eq!(greeting, "Welcome, Ada");
    assert_eq!(stored(&session_file)["authToken"], "T1");

    // A fresh process picks the session up from disk.
    let second = app(addr, &session_file);
    let status = second.run(Command::Status).await.unwrap();
    assert_eq!(status, "Logged in as Ada <ada@example.com> (theme: system)");

    let history = second.run(Command::History { page: 1 }).await.unwrap();
    assert_eq!(history, "a1  Rust engineer  82%\npage 1/1 (1 total)");

    let out = second.run(Command::Logout).await.unwrap();
    assert_eq!(out, "Logged out");
    assert_eq!(logouts.load(Ordering::SeqCst), 1);
    assert!(stored(&session_file).get("authToken").is_none());

    let third = app(addr, &session_file);
    assert_eq!(third.run(Command::Status).await.unwrap(), "Not logged in");
}

#[tokio::test]
async fn test_rejected_login_leaves_no_session() {
    let addr = serve(Arc::new(AtomicUsize::new(0))).await;
    let dir = tempdir().unwrap();
    let session_file = dir.path().join("session.json");

    let app = app(addr, &session_file);
    let error = app
        .login_with(LoginCredentials::new("ada@example.com", "wrong"))
        .await
        .unwrap_err();

    assert!(matches!(error, CliError::Rejected(ref m) if m == "Invalid credentials"));
    assert!(!app.session.is_authenticated());
    assert!(!session_file.exists());
}

#[tokio::test]
async fn test_stale_token_is_dropped_on_restore() {
    let addr = serve(Arc::new(AtomicUsize::new(0))).await;
    let dir = tempdir().unwrap();
    let session_file = dir.path().join("session.json");
    std::fs::write(
        &session_file,
        json!({"authToken": "OLD", "user": USER}).to_string(),
    )
    .unwrap();

    let app = app(addr, &session_file);
    assert_eq!(app.run(Command::Status).await.unwrap(), "Not logged in");
    assert!(stored(&session_file).get("user").is_none());
}
