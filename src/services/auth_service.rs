//! 认证服务：注册、登录
//!
//! 无状态编排：凭据存储 + 密码哈希 + 会话令牌，每个请求单次线性执行，不重试。

use crate::{
    auth::{jwt::JwtService, password::PasswordHasher},
    error::AppError,
    models::{auth::*, messages, user::User},
    repository::{CredentialStore, StoreError},
};
use std::sync::Arc;

pub struct AuthService {
    store: Arc<dyn CredentialStore>,
    hasher: Arc<PasswordHasher>,
    jwt_service: Arc<JwtService>,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn CredentialStore>,
        hasher: Arc<PasswordHasher>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        Self {
            store,
            hasher,
            jwt_service,
        }
    }

    /// 用户注册（不签发令牌）
    pub async fn register(&self, req: RegisterRequest) -> Result<RegisterResponse, AppError> {
        let (username, password) = require_credentials(req.username, req.password)?;

        // 检查用户名是否已存在
        if self.store.find_by_username(&username).await?.is_some() {
            tracing::info!(%username, "Registration rejected: user exists");
            metrics::counter!("auth_register_total", "outcome" => "conflict").increment(1);
            return Err(AppError::Conflict(messages::USER_EXISTS.to_string()));
        }

        // 哈希密码
        let password_hash = self.hash_password(password).await?;

        // 持久化；并发注册同名用户时由存储层唯一约束兜底
        let user = match self.store.create(&username, &password_hash).await {
            Ok(user) => user,
            Err(StoreError::Conflict(_)) => {
                tracing::info!(%username, "Registration lost race on username");
                metrics::counter!("auth_register_total", "outcome" => "conflict").increment(1);
                return Err(AppError::Conflict(messages::USER_EXISTS.to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");
        metrics::counter!("auth_register_total", "outcome" => "success").increment(1);

        Ok(RegisterResponse {
            message: messages::REGISTER_SUCCESS.to_string(),
            user_id: user.id,
            username: user.username,
        })
    }

    /// 用户登录
    pub async fn login(&self, req: LoginRequest) -> Result<LoginResponse, AppError> {
        let (username, password) = require_credentials(req.username, req.password)?;

        // 获取用户
        let user: User = match self.store.find_by_username(&username).await? {
            Some(user) => user,
            None => {
                tracing::info!(%username, reason = "user_not_found", "Login failed");
                metrics::counter!("auth_login_total", "outcome" => "failure").increment(1);
                return Err(AppError::unauthorized(messages::INVALID_CREDENTIALS));
            }
        };

        // 验证密码
        if !self.verify_password(password, user.password_hash.clone()).await? {
            tracing::info!(%username, reason = "invalid_password", "Login failed");
            metrics::counter!("auth_login_total", "outcome" => "failure").increment(1);
            return Err(AppError::unauthorized(messages::INVALID_CREDENTIALS));
        }

        // 生成令牌
        let token = self.jwt_service.issue(&user.id, &user.username)?;

        tracing::info!(user_id = %user.id, username = %user.username, "Login succeeded");
        metrics::counter!("auth_login_total", "outcome" => "success").increment(1);

        Ok(LoginResponse {
            message: messages::LOGIN_SUCCESS.to_string(),
            user_id: user.id,
            username: user.username,
            token,
        })
    }

    /// Argon2 是 CPU 密集型操作，放到阻塞线程池执行
    async fn hash_password(&self, password: String) -> Result<String, AppError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.hash(&password))
            .await
            .map_err(|e| AppError::Internal(format!("Password hashing task failed: {}", e)))?
    }

    async fn verify_password(&self, password: String, hash: String) -> Result<bool, AppError> {
        let hasher = self.hasher.clone();
        tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
            .await
            .map_err(|e| AppError::Internal(format!("Password verification task failed: {}", e)))
    }
}

/// 两个字段都必须存在；用户名不能是空白，密码只要求非空（空格也是合法密码）
fn require_credentials(
    username: Option<String>,
    password: Option<String>,
) -> Result<(String, String), AppError> {
    match (username, password) {
        (Some(u), Some(p)) if !u.trim().is_empty() && !p.is_empty() => Ok((u, p)),
        _ => Err(AppError::bad_request(messages::CREDENTIALS_REQUIRED)),
    }
}
