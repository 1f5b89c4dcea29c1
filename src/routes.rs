//! 路由注册
//! 创建所有 API 路由并应用中间件

use axum::{
    extract::DefaultBodyLimit,
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

use crate::{handlers, middleware::AppState};

/// 创建应用路由
pub fn create_router(state: Arc<AppState>) -> Router {
    // 公开端点（健康检查）
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/ready", get(handlers::health::readiness_check));

    // 认证路由（无需认证）
    let auth_routes = Router::new()
        .route("/api/register", post(handlers::auth::register))
        .route("/api/login", post(handlers::auth::login));

    // 联系表单（无需认证）
    let contact_routes = Router::new()
        .route("/api/contact", post(handlers::contact::submit_quotation))
        .route("/api/contact-footer", post(handlers::contact::submit_contact_message));

    // 需要认证的路由
    let authenticated_routes = Router::new()
        .route("/api/me", get(handlers::auth::get_current_user))
        .route("/api/contactos", get(handlers::contact::list_quotations))
        .route("/api/mensajes", get(handlers::contact::list_contact_messages))
        .route("/api/almacenamiento", get(handlers::contact::storage_summary))
        .layer(axum::middleware::from_fn_with_state(
            state.jwt_service.clone(),
            crate::auth::middleware::jwt_auth_middleware,
        ));

    // 组合所有路由
    Router::new()
        .merge(public_routes)
        .merge(auth_routes)
        .merge(contact_routes)
        .merge(authenticated_routes)
        // 超限由 Json 提取器以 JsonRejection 报告，统一走 AppError 的 JSON 响应
        .layer(DefaultBodyLimit::max(state.config.server.body_limit_bytes))
        .layer(cors_layer(&state.config.server.cors_origins))
        .layer(axum::middleware::from_fn(crate::middleware::request_tracking_middleware))
        .with_state(state)
}

/// 跨域配置（来源列表在配置加载时已校验）
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
