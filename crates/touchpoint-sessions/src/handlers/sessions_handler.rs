use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Path, State},
    http::HeaderMap,
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tracing::{error, warn};
use utoipa::OpenApi;

use touchpoint_core::problemdetails::Problem;

use crate::services::SessionService;
use crate::types::{
    CreateSessionRequest, CreateSessionResponse, ServerData, SessionError, SessionResponse,
    TrackingData,
};

pub struct AppState {
    pub session_service: Arc<SessionService>,
}

impl From<SessionError> for Problem {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::NotFound => touchpoint_core::error_builder::not_found()
                .detail("Session not found")
                .build(),
            SessionError::InvalidInput(msg) => {
                warn!("Rejected session request: {}", msg);
                touchpoint_core::error_builder::bad_request()
                    .detail(msg)
                    .build()
            }
            err => {
                error!("Session operation failed: {}", err);
                touchpoint_core::error_builder::internal_server_error()
                    .detail(err.to_string())
                    .build()
            }
        }
    }
}

/// Create a new visit session
#[utoipa::path(
    post,
    path = "/create-session",
    tag = "Sessions",
    request_body = CreateSessionRequest,
    responses(
        (status = 200, description = "Session created", body = CreateSessionResponse),
        (status = 400, description = "Missing fullUrl or browserData"),
        (status = 500, description = "Internal server error")
    )
)]
pub async fn create_session(
    State(state): State<Arc<AppState>>,
    ConnectInfo(remote_addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    Json(request): Json<CreateSessionRequest>,
) -> Result<Json<CreateSessionResponse>, Problem> {
    let forwarded_for = headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok());

    let session_id = state
        .session_service
        .create_session(
            request.full_url,
            request.browser_data,
            &remote_addr.ip().to_string(),
            forwarded_for,
        )
        .await?;

    Ok(Json(CreateSessionResponse { session_id }))
}

/// Get a stored session by id
#[utoipa::path(
    get,
    path = "/get-session/{session_id}",
    tag = "Sessions",
    responses(
        (status = 200, description = "The stored session", body = SessionResponse),
        (status = 404, description = "Session not found"),
        (status = 500, description = "Internal server error")
    ),
    params(
        ("session_id" = String, Path, description = "Session identifier")
    )
)]
pub async fn get_session(
    State(state): State<Arc<AppState>>,
    Path(session_id): Path<String>,
) -> Result<Json<SessionResponse>, Problem> {
    let session = state.session_service.get_session(&session_id).await?;
    Ok(Json(session))
}

pub fn configure_routes() -> Router<Arc<AppState>> {
    // Tracking snippets post from marketing sites on other origins
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/create-session", post(create_session))
        .route("/get-session/{session_id}", get(get_session))
        .layer(cors)
}

#[derive(OpenApi)]
#[openapi(
    paths(create_session, get_session),
    components(schemas(
        CreateSessionRequest,
        CreateSessionResponse,
        SessionResponse,
        ServerData,
        TrackingData
    )),
    tags(
        (name = "Sessions", description = "Visit session capture and retrieval")
    )
)]
pub struct SessionsApiDoc;
