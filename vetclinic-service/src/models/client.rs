//! Client (pet owner) model for vetclinic-service.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Pet owner record, linked 1:1 to a client-role principal. This is the
/// root every ownership chain resolves to.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Client {
    pub id: Uuid,
    pub principal_id: Uuid,
    pub full_name: String,
    pub phone: String,
    pub created_utc: DateTime<Utc>,
}

/// Mutable client profile fields.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateClient {
    pub full_name: String,
    #[serde(default)]
    pub phone: String,
}
