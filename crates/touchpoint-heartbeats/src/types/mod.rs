use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Error, Debug)]
pub enum HeartbeatError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Liveness ping posted by a bot worker.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HeartbeatRequest {
    /// Identifier of the reporting bot, required and non-empty
    pub bot_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HeartbeatResponse {
    pub status: String,
}

/// Liveness verdict for a bot, derived from its most recent heartbeat.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BotStatusResponse {
    pub active: bool,
    /// Time of the last recorded heartbeat, absent for unregistered bots
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<String>, format = "date-time")]
    pub last_heartbeat: Option<touchpoint_core::DateTime>,
    /// Only set when the bot has never reported a heartbeat
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
