//! 测试公共模块
//! 提供测试配置、内存状态、模拟存储与邮件实现

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Request},
    Router,
};
use http_body_util::BodyExt;
use secrecy::Secret;
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Mutex,
};
use storefront_api::{
    config::{
        AppConfig, AppSection, DatabaseConfig, EmailConfig, LoggingConfig, SecurityConfig,
        ServerConfig, StorageBackend, StorageConfig, DEFAULT_CORS_ORIGINS,
    },
    email::{MailError, Mailer},
    middleware::AppState,
    models::contact::{StoredSubmission, Submission, SubmissionKind},
    repository::{InMemoryCredentialStore, StoreError, StoreResult, SubmissionStore},
    routes,
};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test-secret-key-for-testing-only-min-32-chars";

/// 创建测试配置（内存后端、低成本哈希参数）
pub fn create_test_config() -> AppConfig {
    let fallback_path = std::env::temp_dir()
        .join(format!("storefront-test-{}.jsonl", uuid::Uuid::new_v4()))
        .to_string_lossy()
        .into_owned();

    AppConfig {
        app: AppSection {
            environment: "production".to_string(),
        },
        server: ServerConfig {
            addr: "127.0.0.1:0".to_string(),
            graceful_shutdown_timeout_secs: 5,
            cors_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
            body_limit_bytes: 64 * 1024,
        },
        database: DatabaseConfig {
            url: std::env::var("TEST_DATABASE_URL").ok().map(Secret::new),
            max_connections: 5,
            min_connections: 1,
            acquire_timeout_secs: 5,
            idle_timeout_secs: 300,
            max_lifetime_secs: 1800,
        },
        storage: StorageConfig {
            backend: StorageBackend::Memory,
            fallback_path,
        },
        logging: LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        },
        security: SecurityConfig {
            jwt_secret: Secret::new(TEST_SECRET.to_string()),
            token_ttl_secs: 604800,
            hash_memory_kib: 1024,
            hash_iterations: 1,
            hash_parallelism: 1,
        },
        email: EmailConfig {
            resend_api_key: None,
            api_base: "http://127.0.0.1:9".to_string(),
            from: "Formulario Web <onboarding@resend.dev>".to_string(),
            to: None,
        },
    }
}

/// 记录发送次数的邮件实现，可配置为总是失败
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: AtomicUsize,
    pub fail: bool,
}

impl RecordingMailer {
    pub fn failing() -> Self {
        Self {
            sent: AtomicUsize::new(0),
            fail: true,
        }
    }

    pub fn sent(&self) -> usize {
        self.sent.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, _submission: &Submission) -> Result<(), MailError> {
        self.sent.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            Err(MailError::NotConfigured)
        } else {
            Ok(())
        }
    }
}

/// 内存中的主存储
#[derive(Default)]
pub struct MemorySubmissionStore {
    pub rows: Mutex<Vec<StoredSubmission>>,
}

impl MemorySubmissionStore {
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap().len()
    }
}

#[async_trait]
impl SubmissionStore for MemorySubmissionStore {
    async fn insert(&self, submission: &Submission) -> StoreResult<String> {
        let id = uuid::Uuid::new_v4().to_string();
        self.rows.lock().unwrap().push(StoredSubmission {
            id: id.clone(),
            created_at: chrono::Utc::now(),
            submission: submission.clone(),
        });
        Ok(id)
    }

    async fn list(&self, kind: SubmissionKind) -> StoreResult<Vec<StoredSubmission>> {
        let mut records: Vec<StoredSubmission> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.submission.submission_kind() == kind)
            .cloned()
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(records)
    }
}

/// 模拟主存储不可用
pub struct UnavailableSubmissionStore;

#[async_trait]
impl SubmissionStore for UnavailableSubmissionStore {
    async fn insert(&self, _submission: &Submission) -> StoreResult<String> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }

    async fn list(&self, _kind: SubmissionKind) -> StoreResult<Vec<StoredSubmission>> {
        Err(StoreError::Unavailable("connection refused".to_string()))
    }
}

/// 测试应用：状态 + 可检查的协作者
pub struct TestApp {
    pub config: AppConfig,
    pub state: Arc<AppState>,
    pub store: InMemoryCredentialStore,
    pub mailer: Arc<RecordingMailer>,
}

impl TestApp {
    pub fn router(&self) -> Router {
        routes::create_router(self.state.clone())
    }

    /// 由应用自身的 JwtService 签发的 Authorization 头
    pub fn bearer(&self) -> String {
        let token = self
            .state
            .jwt_service
            .issue(&uuid::Uuid::new_v4(), "admin")
            .expect("Failed to issue test token");
        format!("Bearer {}", token)
    }
}

/// 创建使用内存存储的测试应用
pub fn create_test_app(
    submissions: Option<Arc<dyn SubmissionStore>>,
    mailer: Arc<RecordingMailer>,
) -> TestApp {
    let config = create_test_config();
    let store = InMemoryCredentialStore::new();

    let state = Arc::new(
        AppState::new(
            config.clone(),
            None,
            Arc::new(store.clone()),
            submissions,
            mailer.clone(),
        )
        .expect("Failed to build test app state"),
    );

    TestApp {
        config,
        state,
        store,
        mailer,
    }
}

/// 默认测试应用：只有备份存储、邮件成功
pub fn default_test_app() -> TestApp {
    create_test_app(None, Arc::new(RecordingMailer::default()))
}

/// 发送 JSON POST 请求，返回状态码和响应体
pub async fn post_json(
    app: Router,
    uri: &str,
    body: serde_json::Value,
) -> (axum::http::StatusCode, serde_json::Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(uri)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// 发送 GET 请求（可选 Authorization 头）
pub async fn get(
    app: Router,
    uri: &str,
    authorization: Option<&str>,
) -> (axum::http::StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(value) = authorization {
        builder = builder.header(header::AUTHORIZATION, value);
    }

    let response = app.oneshot(builder.body(Body::empty()).unwrap()).await.unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

/// 连接 TEST_DATABASE_URL 指向的测试库并运行迁移
pub async fn setup_test_db(config: &AppConfig) -> sqlx::PgPool {
    let pool = storefront_api::db::create_pool(&config.database)
        .await
        .expect("Failed to create test database pool (is TEST_DATABASE_URL set?)");

    storefront_api::db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    // 清理测试数据
    sqlx::query("TRUNCATE TABLE users, quotations, contact_messages")
        .execute(&pool)
        .await
        .ok();

    pool
}

/// 邮件在后台任务中发送：等待发送次数达到预期（最多约 2 秒）
pub async fn wait_for_sent(mailer: &RecordingMailer, expected: usize) -> usize {
    for _ in 0..200 {
        if mailer.sent() >= expected {
            break;
        }
        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
    }
    mailer.sent()
}

/// 延迟很久才返回的邮件实现，用于验证响应不等待邮件
pub struct SlowMailer;

#[async_trait]
impl Mailer for SlowMailer {
    async fn send(&self, _submission: &Submission) -> Result<(), MailError> {
        tokio::time::sleep(std::time::Duration::from_secs(30)).await;
        Ok(())
    }
}
