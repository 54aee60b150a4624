use sea_orm::DbErr;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    #[error("Session not found")]
    NotFound,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Duplicate session id: {0}")]
    DuplicateIdentifier(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Stored session data is corrupted: {0}")]
    Corrupted(String),
}

/// Payload posted by the tracking snippet when a visit lands.
///
/// Both fields are required. They are optional here so that a missing key
/// reaches validation and is rejected as a bad request rather than a
/// deserialization failure.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSessionRequest {
    /// Full landing URL including the query string
    pub full_url: Option<String>,
    /// Browser fingerprint captured client-side, stored verbatim
    #[schema(value_type = Object)]
    pub browser_data: Option<serde_json::Map<String, serde_json::Value>>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreateSessionResponse {
    /// Identifier of the newly created session
    pub session_id: String,
}

/// A stored session as returned to API consumers.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub full_url: String,
    #[schema(value_type = Object)]
    pub browser_data: serde_json::Map<String, serde_json::Value>,
    pub server_data: ServerData,
    pub tracking_data: TrackingData,
}

/// Server-side capture context recorded at session creation.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ServerData {
    /// Client IP after X-Forwarded-For resolution
    pub ip_address: String,
    #[schema(value_type = String, format = "date-time")]
    pub timestamp: touchpoint_core::DateTime,
}

/// Attribution parameters extracted from the landing URL and browser
/// cookies. Every field is serialized, absent values as explicit nulls.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TrackingData {
    pub utm_source: Option<String>,
    pub utm_medium: Option<String>,
    pub utm_campaign: Option<String>,
    pub utm_content: Option<String>,
    pub utm_term: Option<String>,
    pub fbclid: Option<String>,
    pub gclid: Option<String>,
    pub ttclid: Option<String>,
    pub fbp: Option<String>,
    pub fbc: Option<String>,
}

impl TrackingData {
    /// Returns only the populated fields, keyed by parameter name. Used
    /// for audit logging.
    pub fn non_null_fields(&self) -> serde_json::Map<String, serde_json::Value> {
        let entries = [
            ("utm_source", &self.utm_source),
            ("utm_medium", &self.utm_medium),
            ("utm_campaign", &self.utm_campaign),
            ("utm_content", &self.utm_content),
            ("utm_term", &self.utm_term),
            ("fbclid", &self.fbclid),
            ("gclid", &self.gclid),
            ("ttclid", &self.ttclid),
            ("fbp", &self.fbp),
            ("fbc", &self.fbc),
        ];

        let mut fields = serde_json::Map::new();
        for (key, value) in entries {
            if let Some(value) = value {
                fields.insert(key.to_string(), serde_json::Value::String(value.clone()));
            }
        }
        fields
    }
}
