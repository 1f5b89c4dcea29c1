//! Repository layer
//!
//! Credential and submission storage behind async traits, so the services can be
//! composed with Postgres in production and in-memory fakes in tests.

pub mod fallback;
pub mod memory;
pub mod submission_repo;
pub mod user_repo;

pub use fallback::FallbackSink;
pub use memory::InMemoryCredentialStore;
pub use submission_repo::{PgSubmissionStore, SubmissionStore};
pub use user_repo::PgCredentialStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::models::user::User;

/// Storage errors
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique constraint on username violated
    #[error("username already exists: {0}")]
    Conflict(String),

    #[error("record not found")]
    NotFound,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistent mapping from username to credentials.
///
/// `create` must be atomic with respect to username uniqueness: of two concurrent
/// calls for the same username exactly one succeeds and the other gets `Conflict`.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Exact, case-sensitive lookup
    async fn find_by_username(&self, username: &str) -> StoreResult<Option<User>>;

    /// Insert a new user
    async fn create(&self, username: &str, password_hash: &str) -> StoreResult<User>;

    /// Bump `updated_at` (credential rotation)
    async fn touch_updated(&self, id: Uuid) -> StoreResult<()>;
}
