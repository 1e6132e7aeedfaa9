//! HTTP endpoint the bot connector posts activities to.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::{base::activity::Activity, service::chat::ChatClient};

use super::{handler::ActivityHandler, turn::handle_activity};

#[derive(Clone)]
struct EndpointState {
    bot: Arc<dyn ActivityHandler>,
    chat: ChatClient,
    shutdown: CancellationToken,
}

/// Builds the router serving `POST /api/messages` and `GET /health`.
///
/// Activities are acknowledged immediately and handled in the background; each turn gets a
/// child of `shutdown` as its cancellation token.
pub fn router(bot: Arc<dyn ActivityHandler>, chat: ChatClient, shutdown: CancellationToken) -> Router {
    Router::new()
        .route("/api/messages", post(receive_activity))
        .route("/health", get(health_check))
        .with_state(EndpointState { bot, chat, shutdown })
}

async fn receive_activity(State(state): State<EndpointState>, Json(activity): Json<Activity>) -> impl IntoResponse {
    debug!("Received `{:?}` activity.", activity.activity_type);

    handle_activity(activity, state.bot.clone(), state.chat.clone(), state.shutdown.child_token());

    StatusCode::OK
}

async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}
