//! HTTP bridge between the embedded chat panel and the copilot core.
//!
//! The host panel posts one message at a time and blocks on the reply;
//! the session mutex reproduces that single-interaction model, so
//! concurrent posts queue instead of interleaving.

use axum::extract::State;
use axum::routing::{get, post};
use axum::{Json, Router};
use cadpilot_core::assistant::ChatSession;
use cadpilot_core_types::{PanelRequest, PanelResponse};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;

#[derive(Clone)]
pub struct AppState {
    session: Arc<Mutex<ChatSession>>,
}

impl AppState {
    pub fn new(session: ChatSession) -> Self {
        Self {
            session: Arc::new(Mutex::new(session)),
        }
    }
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/panel/message", post(panel_message))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}

async fn panel_message(
    State(state): State<AppState>,
    Json(request): Json<PanelRequest>,
) -> Json<PanelResponse> {
    let mut session = state.session.lock().await;
    Json(session.handle_message(request).await)
}
