//! Contact / quotation submission storage (primary store)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::StoreResult;
use crate::models::contact::{
    ContactMessage, Quotation, StoredSubmission, Submission, SubmissionKind,
};

/// Primary durable store for form submissions
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Persist a submission and return its store-assigned id
    async fn insert(&self, submission: &Submission) -> StoreResult<String>;

    /// All submissions of one kind, newest first
    async fn list(&self, kind: SubmissionKind) -> StoreResult<Vec<StoredSubmission>>;
}

#[derive(sqlx::FromRow)]
struct QuotationRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    address: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl From<QuotationRow> for StoredSubmission {
    fn from(row: QuotationRow) -> Self {
        Self {
            id: row.id.to_string(),
            created_at: row.created_at,
            submission: Submission::Quotation(Quotation {
                first_name: row.first_name,
                last_name: row.last_name,
                email: row.email,
                phone: row.phone,
                address: row.address,
                role: row.role,
            }),
        }
    }
}

#[derive(sqlx::FromRow)]
struct ContactMessageRow {
    id: Uuid,
    first_name: String,
    last_name: String,
    email: String,
    phone: String,
    message: String,
    created_at: DateTime<Utc>,
}

impl From<ContactMessageRow> for StoredSubmission {
    fn from(row: ContactMessageRow) -> Self {
        Self {
            id: row.id.to_string(),
            created_at: row.created_at,
            submission: Submission::ContactMessage(ContactMessage {
                first_name: row.first_name,
                last_name: row.last_name,
                email: row.email,
                phone: row.phone,
                message: row.message,
            }),
        }
    }
}

#[derive(Clone)]
pub struct PgSubmissionStore {
    db: PgPool,
}

impl PgSubmissionStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SubmissionStore for PgSubmissionStore {
    async fn insert(&self, submission: &Submission) -> StoreResult<String> {
        let id: Uuid = match submission {
            Submission::Quotation(q) => {
                sqlx::query_scalar(
                    r#"
                    INSERT INTO quotations (first_name, last_name, email, phone, address, role)
                    VALUES ($1, $2, $3, $4, $5, $6)
                    RETURNING id
                    "#,
                )
                .bind(&q.first_name)
                .bind(&q.last_name)
                .bind(&q.email)
                .bind(&q.phone)
                .bind(&q.address)
                .bind(&q.role)
                .fetch_one(&self.db)
                .await?
            }
            Submission::ContactMessage(m) => {
                sqlx::query_scalar(
                    r#"
                    INSERT INTO contact_messages (first_name, last_name, email, phone, message)
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING id
                    "#,
                )
                .bind(&m.first_name)
                .bind(&m.last_name)
                .bind(&m.email)
                .bind(&m.phone)
                .bind(&m.message)
                .fetch_one(&self.db)
                .await?
            }
        };

        Ok(id.to_string())
    }

    async fn list(&self, kind: SubmissionKind) -> StoreResult<Vec<StoredSubmission>> {
        let records: Vec<StoredSubmission> = match kind {
            SubmissionKind::Quotation => sqlx::query_as::<_, QuotationRow>(
                r#"
                SELECT id, first_name, last_name, email, phone, address, role, created_at
                FROM quotations
                ORDER BY created_at DESC
                "#,
            )
            .fetch_all(&self.db)
            .await?
            .into_iter()
            .map(StoredSubmission::from)
            .collect(),
            SubmissionKind::ContactMessage => sqlx::query_as::<_, ContactMessageRow>(
                r#"
                SELECT id, first_name, last_name, email, phone, message, created_at
                FROM contact_messages
                ORDER BY created_at DESC
                "#,
            )
            .fetch_all(&self.db)
            .await?
            .into_iter()
            .map(StoredSubmission::from)
            .collect(),
        };

        Ok(records)
    }
}
