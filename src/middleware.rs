//! 应用状态与 HTTP 中间件
//! 请求追踪（trace_id / request_id、指标、访问日志）

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::Instrument;
use uuid::Uuid;

use crate::{
    auth::{jwt::JwtService, password::PasswordHasher},
    config::AppConfig,
    email::Mailer,
    error::AppError,
    repository::{CredentialStore, FallbackSink, SubmissionStore},
    services::{AuthService, ContactService},
};

/// 应用状态
///
/// 存储客户端在启动时创建一次并注入；服务本身不持有可变状态。
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    /// postgres 后端时的连接池（用于就绪探针）
    pub db: Option<sqlx::PgPool>,
    pub auth_service: Arc<AuthService>,
    pub contact_service: Arc<ContactService>,
    pub jwt_service: Arc<JwtService>,
}

impl AppState {
    /// 组装所有服务。JWT 密钥或哈希参数无效时直接失败。
    pub fn new(
        config: AppConfig,
        db: Option<sqlx::PgPool>,
        credentials: Arc<dyn CredentialStore>,
        submissions: Option<Arc<dyn SubmissionStore>>,
        mailer: Arc<dyn Mailer>,
    ) -> Result<Self, AppError> {
        let jwt_service = Arc::new(JwtService::from_config(&config.security)?);
        let hasher = Arc::new(PasswordHasher::from_config(&config.security)?);
        let fallback = Arc::new(FallbackSink::new(&config.storage.fallback_path));

        let auth_service = Arc::new(AuthService::new(credentials, hasher, jwt_service.clone()));
        let contact_service = Arc::new(ContactService::new(submissions, fallback, mailer));

        Ok(Self {
            config,
            db,
            auth_service,
            contact_service,
            jwt_service,
        })
    }
}

tokio::task_local! {
    /// 当前请求的 request_id，错误响应体与 x-request-id 头保持一致
    static REQUEST_ID: String;
}

/// 在请求处理范围内返回中间件分配的 request_id
pub fn current_request_id() -> Option<String> {
    REQUEST_ID.try_with(|id| id.clone()).ok()
}

/// 请求追踪中间件
/// 为每个请求生成 trace_id 和 request_id，并记录指标
pub async fn request_tracking_middleware(req: Request, next: Next) -> Response {
    // 生成或提取 trace_id/request_id
    let trace_id = extract_or_generate_trace_id(req.headers());
    let request_id = Uuid::new_v4().to_string();

    let method = req.method().clone();
    let path = req.uri().path().to_string();

    // 创建 span
    let span = tracing::info_span!(
        "http_request",
        trace_id = %trace_id,
        request_id = %request_id,
        method = %method,
        path = %path,
    );

    async move {
        let start = Instant::now();

        // 继续处理请求
        let mut response = REQUEST_ID.scope(request_id.clone(), next.run(req)).await;

        let elapsed = start.elapsed();

        // 记录指标 - 使用静态字符串
        let status = response.status().as_u16();
        let method_name = match method.as_str() {
            "GET" => "GET",
            "POST" => "POST",
            "OPTIONS" => "OPTIONS",
            _ => "OTHER",
        };
        let status_code = match status {
            200 => "200",
            201 => "201",
            400 => "400",
            401 => "401",
            404 => "404",
            409 => "409",
            500 => "500",
            _ => "other",
        };

        metrics::counter!("http_requests_total", "method" => method_name, "status" => status_code)
            .increment(1);
        metrics::histogram!("http_request_duration_seconds").record(elapsed.as_secs_f64());

        // 记录日志
        tracing::info!(
            method = %method,
            path = %path,
            status = status,
            elapsed_ms = elapsed.as_millis(),
            "Request completed"
        );

        // 在响应头中添加 trace_id
        if let Ok(value) = HeaderValue::from_str(&trace_id) {
            response.headers_mut().insert("x-trace-id", value);
        }
        if let Ok(value) = HeaderValue::from_str(&request_id) {
            response.headers_mut().insert("x-request-id", value);
        }

        response
    }
    .instrument(span)
    .await
}

/// 从请求头中提取或生成 trace_id
fn extract_or_generate_trace_id(headers: &HeaderMap) -> String {
    headers
        .get("x-trace-id")
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
        .unwrap_or_else(|| Uuid::new_v4().to_string())
}
