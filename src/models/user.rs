//! User domain models

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Registered principal. Owned exclusively by the credential store.
///
/// Not `Serialize`; the password hash never reaches a response body.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
