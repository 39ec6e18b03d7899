use std::collections::HashMap;
use std::path::Path;

use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use chama_cli::cli::Cli;
use chama_cli::config::Config;
use chama_cli::build_context;
use chama_core::AppContext;
use clap::Parser;
use serde_json::{json, Value};
use tempfile::tempdir;

const TOKEN: &str = "tok-amina";

async fn login(Json(body): Json<Value>) -> impl IntoResponse {
    if body["password"] == "correct horse" {
        (
            StatusCode::OK,
            Json(json!({
                "user": {"id": 7, "username": "amina", "email": "amina@example.com"},
                "access_token": TOKEN
            })),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Invalid email or password"})),
        )
    }
}

async fn profile(headers: HeaderMap) -> impl IntoResponse {
    let authorized = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", TOKEN))
        .unwrap_or(false);
    if authorized {
        (
            StatusCode::OK,
            Json(json!({"id": 7, "username": "amina", "email": "amina@example.com"})),
        )
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({"error": "Token has expired"})),
        )
    }
}

async fn groups() -> impl IntoResponse {
    Json(json!({"groups": []}))
}

async fn spawn_server() -> String {
    let app = Router::new()
        .route("/api/auth/login", post(login))
        .route("/api/auth/profile", get(profile))
        .route("/api/groups/", get(groups));
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn config(api_url: &str, token_file: &Path) -> Config {
    let vars: HashMap<&str, String> = HashMap::from([
        ("CHAMA_API_URL", api_url.to_string()),
        ("CHAMA_TOKEN_FILE", token_file.display().to_string()),
        ("CHAMA_REQUEST_TIMEOUT_MS", "5000".to_string()),
    ]);
    Config::from_lookup(|key| vars.get(key).cloned()).unwrap()
}

async fn restored(config: &Config) -> AppContext {
    let ctx = build_context(config);
    ctx.session.initialize().await.unwrap();
    ctx
}

async fn run(ctx: &AppContext, args: &[&str]) -> anyhow::Result<()> {
    let cli = Cli::try_parse_from(std::iter::once("chama").chain(args.iter().copied())).unwrap();
    cli.command.run(ctx).await
}

#[tokio::test]
async fn login_persists_and_restores_the_session() {
    let url = spawn_server().await;
    let dir = tempdir().unwrap();
    let token_file = dir.path().join("session.json");
    let config = config(&url, &token_file);

    let ctx = restored(&config).await;
    assert!(!ctx.session.is_authenticated());

    run(
        &ctx,
        &["auth", "login", "--email", "amina@example.com", "--password", "correct horse"],
    )
    .await
    .unwrap();
    assert!(token_file.exists());

    // A fresh process picks the session up from the token file.
    let next = restored(&config).await;
    assert_eq!(next.session.current_user().unwrap().username, "amina");
    run(&next, &["groups", "list"]).await.unwrap();

    run(&next, &["auth", "logout"]).await.unwrap();
    let after_logout = restored(&config).await;
    assert!(!after_logout.session.is_authenticated());
}

#[tokio::test]
async fn failed_login_reports_server_message() {
    let url = spawn_server().await;
    let dir = tempdir().unwrap();
    let token_file = dir.path().join("session.json");
    let ctx = restored(&config(&url, &token_file)).await;

    let err = run(
        &ctx,
        &["auth", "login", "--email", "amina@example.com", "--password", "wrong"],
    )
    .await
    .unwrap_err();
    assert_eq!(err.to_string(), "Invalid email or password");
    assert!(!ctx.session.is_authenticated());
    assert_eq!(
        ctx.session.error().as_deref(),
        Some("Invalid email or password")
    );
}

#[tokio::test]
async fn rejected_token_is_forgotten() {
    let url = spawn_server().await;
    let dir = tempdir().unwrap();
    let token_file = dir.path().join("session.json");
    std::fs::write(
        &token_file,
        r#"{"version": 1, "secrets": {"chama_token": "stale"}}"#,
    )
    .unwrap();

    let ctx = restored(&config(&url, &token_file)).await;
    assert!(!ctx.session.is_authenticated());

    let raw = std::fs::read_to_string(&token_file).unwrap();
    assert!(!raw.contains("stale"));
}
