use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, warn};
use utoipa::OpenApi;

use touchpoint_core::problemdetails::Problem;

use crate::services::HeartbeatService;
use crate::types::{BotStatusResponse, HeartbeatError, HeartbeatRequest, HeartbeatResponse};

pub struct AppState {
    pub heartbeat_service: Arc<HeartbeatService>,
}

impl From<HeartbeatError> for Problem {
    fn from(err: HeartbeatError) -> Self {
        match err {
            HeartbeatError::InvalidInput(msg) => {
                warn!("Rejected heartbeat request: {}", msg);
                touchpoint_core::error_builder::bad_request()
                    .detail(msg)
                    .build()
            }
            err => {
                error!("Heartbeat operation failed: {}", err);
                touchpoint_core::error_builder::internal_server_error()
                    .detail(err.to_string())
                    .build()
            }
        }
    }
}

/// Record a liveness ping from a bot
#[utoipa::path(
    post,
    path = "/bot-heartbeat",
    tag = "Bots",
    request_body = HeartbeatRequest,
    responses(
        (status = 200, description = "Heartbeat recorded", body = HeartbeatResponse),
        (status = 400, description = "Missing or empty bot_id"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn bot_heartbeat(
    State(state): State<Arc<AppState>>,
    Json(request): Json<HeartbeatRequest>,
) -> Result<Json<HeartbeatResponse>, Problem> {
    state
        .heartbeat_service
        .record_heartbeat(request.bot_id)
        .await?;

    Ok(Json(HeartbeatResponse {
        status: "ok".to_string(),
    }))
}

/// Check whether a bot is currently active
#[utoipa::path(
    get,
    path = "/bot-status/{bot_id}",
    tag = "Bots",
    responses(
        (status = 200, description = "Liveness verdict for the bot", body = BotStatusResponse),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("bot_id" = String, Path, description = "Bot identifier")
    )
)]
pub async fn bot_status(
    State(state): State<Arc<AppState>>,
    Path(bot_id): Path<String>,
) -> Result<Json<BotStatusResponse>, Problem> {
    let status = state.heartbeat_service.bot_status(&bot_id).await?;
    Ok(Json(status))
}

pub fn configure_routes() -> Router<Arc<AppState>> {
    // Monitoring dashboards poll bot status from other origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/bot-heartbeat", post(bot_heartbeat))
        .route("/bot-status/{bot_id}", get(bot_status))
        .layer(cors)
}

#[derive(OpenApi)]
#[openapi(
    paths(bot_heartbeat, bot_status),
    components(schemas(HeartbeatRequest, HeartbeatResponse, BotStatusResponse)),
    tags(
        (name = "Bots", description = "Bot liveness reporting and status checks")
    )
)]
pub struct HeartbeatsApiDoc;
