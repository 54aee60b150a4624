use std::sync::Arc;

use chrono::{Duration, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, Set};
use tracing::{info, warn};

use touchpoint_entities::bot_heartbeats;

use crate::types::{BotStatusResponse, HeartbeatError};

/// Window after the last heartbeat during which a bot counts as active.
pub const DEFAULT_HEARTBEAT_WINDOW_SECS: u64 = 360;

/// Records bot liveness pings and answers status queries.
pub struct HeartbeatService {
    db: Arc<DatabaseConnection>,
    window: Duration,
}

impl HeartbeatService {
    pub fn new(db: Arc<DatabaseConnection>, window_secs: u64) -> Self {
        // Windows beyond chrono's range saturate to the maximum duration
        let secs = i64::try_from(window_secs).unwrap_or(i64::MAX);
        Self {
            db,
            window: Duration::try_seconds(secs).unwrap_or(Duration::MAX),
        }
    }

    /// Stores the current time as the bot's latest heartbeat.
    ///
    /// A bot reporting for the first time is registered implicitly; repeat
    /// reports overwrite the stored timestamp in place.
    pub async fn record_heartbeat(&self, bot_id: Option<String>) -> Result<(), HeartbeatError> {
        let bot_id = bot_id
            .filter(|id| !id.is_empty())
            .ok_or_else(|| HeartbeatError::InvalidInput("bot_id is required".to_string()))?;

        let heartbeat = bot_heartbeats::ActiveModel {
            bot_id: Set(bot_id.clone()),
            last_heartbeat: Set(Utc::now()),
        };

        bot_heartbeats::Entity::insert(heartbeat)
            .on_conflict(
                OnConflict::column(bot_heartbeats::Column::BotId)
                    .update_columns([bot_heartbeats::Column::LastHeartbeat])
                    .to_owned(),
            )
            .exec(self.db.as_ref())
            .await?;

        info!("Heartbeat received from bot: {}", bot_id);
        Ok(())
    }

    /// Reports whether a bot's most recent heartbeat falls inside the
    /// liveness window. Unknown bots are reported as inactive rather than
    /// as an error.
    pub async fn bot_status(&self, bot_id: &str) -> Result<BotStatusResponse, HeartbeatError> {
        let heartbeat = bot_heartbeats::Entity::find_by_id(bot_id)
            .one(self.db.as_ref())
            .await?;

        let Some(heartbeat) = heartbeat else {
            warn!("Status check for unregistered bot: {}", bot_id);
            return Ok(BotStatusResponse {
                active: false,
                last_heartbeat: None,
                message: Some("Bot not registered".to_string()),
            });
        };

        let elapsed = Utc::now().signed_duration_since(heartbeat.last_heartbeat);
        let active = elapsed < self.window;
        info!(
            "Bot status for {}: active={} (last heartbeat: {})",
            bot_id,
            active,
            heartbeat.last_heartbeat.to_rfc3339()
        );
        Ok(BotStatusResponse {
            active,
            last_heartbeat: Some(heartbeat.last_heartbeat.into()),
            message: None,
        })
    }
}
