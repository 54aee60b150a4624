//! `SeaORM` Entity for captured visit sessions

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "sessions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub session_id: String,
    pub full_url: String,
    /// Browser fingerprint payload as submitted by the client, JSON text
    pub browser_data: String,
    /// Server-derived metadata (ip address, capture timestamp), JSON text
    pub server_data: String,
    /// Extracted attribution parameters, JSON text
    pub tracking_data: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
