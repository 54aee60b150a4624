use std::sync::Arc;

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set, SqlErr};
use tracing::{info, warn};
use uuid::Uuid;

use touchpoint_entities::sessions;

use crate::services::tracking::{extract_tracking_data, resolve_client_ip};
use crate::types::{ServerData, SessionError, SessionResponse, TrackingData};

/// Captures visit sessions and serves them back by id.
pub struct SessionService {
    db: Arc<DatabaseConnection>,
}

impl SessionService {
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    /// Records a new visit session and returns its generated id.
    ///
    /// `full_url` and `browser_data` come straight from the request body;
    /// either being absent is a validation error. An empty browser data
    /// mapping is accepted.
    pub async fn create_session(
        &self,
        full_url: Option<String>,
        browser_data: Option<serde_json::Map<String, serde_json::Value>>,
        remote_addr: &str,
        forwarded_for: Option<&str>,
    ) -> Result<String, SessionError> {
        let full_url = full_url
            .ok_or_else(|| SessionError::InvalidInput("fullUrl is required".to_string()))?;
        let browser_data = browser_data
            .ok_or_else(|| SessionError::InvalidInput("browserData is required".to_string()))?;

        let ip_address = resolve_client_ip(remote_addr, forwarded_for);
        let tracking_data = extract_tracking_data(&full_url, &browser_data);
        let server_data = ServerData {
            ip_address: ip_address.clone(),
            timestamp: Utc::now().into(),
        };

        let session_id = Uuid::new_v4().to_string();
        let session = sessions::ActiveModel {
            session_id: Set(session_id.clone()),
            full_url: Set(full_url),
            browser_data: Set(serde_json::to_string(&browser_data)?),
            server_data: Set(serde_json::to_string(&server_data)?),
            tracking_data: Set(serde_json::to_string(&tracking_data)?),
        };

        if let Err(e) = session.insert(self.db.as_ref()).await {
            return Err(match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(_)) => {
                    SessionError::DuplicateIdentifier(session_id)
                }
                _ => SessionError::Database(e),
            });
        }

        info!(
            "Session created: {} from IP: {} with tracking data: {}",
            session_id,
            ip_address,
            serde_json::Value::Object(tracking_data.non_null_fields())
        );

        Ok(session_id)
    }

    /// Loads a stored session by id.
    pub async fn get_session(&self, session_id: &str) -> Result<SessionResponse, SessionError> {
        let session = sessions::Entity::find_by_id(session_id)
            .one(self.db.as_ref())
            .await?;

        let Some(session) = session else {
            warn!("Session not found: {}", session_id);
            return Err(SessionError::NotFound);
        };

        let browser_data = serde_json::from_str(&session.browser_data)
            .map_err(|e| SessionError::Corrupted(format!("session {}: browserData: {}", session_id, e)))?;
        let server_data: ServerData = serde_json::from_str(&session.server_data)
            .map_err(|e| SessionError::Corrupted(format!("session {}: serverData: {}", session_id, e)))?;
        let tracking_data: TrackingData = serde_json::from_str(&session.tracking_data)
            .map_err(|e| SessionError::Corrupted(format!("session {}: trackingData: {}", session_id, e)))?;

        info!("Session retrieved: {}", session_id);

        Ok(SessionResponse {
            full_url: session.full_url,
            browser_data,
            server_data,
            tracking_data,
        })
    }
}
