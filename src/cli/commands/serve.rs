//! HTTP API server for integration with other systems.
//!
//! Exposes the agent tools as REST endpoints.

use crate::cli::Output;
use crate::config::Settings;
use crate::error::GleanerError;
use crate::tools::{parse_tool_call, tool_definitions, ToolContext};
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;

/// Shared application state.
struct AppState {
    context: ToolContext,
}

/// Run the HTTP API server.
pub async fn run_serve(host: &str, port: u16, settings: Settings) -> anyhow::Result<()> {
    let state = Arc::new(AppState {
        context: ToolContext::new(settings),
    });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        .route("/health", get(health))
        .route("/tools", get(list_tools))
        .route("/tools/{name}", post(call_tool))
        .layer(cors)
        .with_state(state);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    Output::header("Gleaner API Server");
    println!();
    Output::success(&format!("Listening on http://{}", addr));
    println!();
    println!("Endpoints:");
    Output::kv("Health", "GET  /health");
    Output::kv("List tools", "GET  /tools");
    Output::kv("Call tool", "POST /tools/:name");
    println!();
    Output::info("Press Ctrl+C to stop the server.");

    axum::serve(listener, app).await?;

    Ok(())
}

#[derive(Serialize)]
struct ToolResponse {
    result: Value,
}

#[derive(Serialize)]
struct ErrorResponse {
    error: String,
}

async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn list_tools() -> impl IntoResponse {
    Json(tool_definitions())
}

async fn call_tool(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
    Json(arguments): Json<Value>,
) -> impl IntoResponse {
    let tool = match parse_tool_call(&name, arguments) {
        Ok(tool) => tool,
        Err(e) => {
            let status = match e {
                GleanerError::Tool(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::BAD_REQUEST,
            };
            return (status, Json(ErrorResponse { error: e.to_string() })).into_response();
        }
    };

    match state.context.execute(&tool).await {
        Ok(result) => Json(ToolResponse { result }).into_response(),
        Err(e) => {
            warn!("Tool {} failed: {}", name, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}
