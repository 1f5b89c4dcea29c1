//! 店铺后端主入口

use std::sync::Arc;
use storefront_api::{
    config::{AppConfig, StorageBackend},
    db, email, error,
    handlers::health,
    middleware::AppState,
    repository::{CredentialStore, InMemoryCredentialStore, PgCredentialStore, PgSubmissionStore, SubmissionStore},
    routes, telemetry,
};
use tokio::net::TcpListener;
use tokio::signal;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ===== CLI 参数处理 =====
    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "--version" => {
                println!("storefront-api {}", env!("CARGO_PKG_VERSION"));
                return Ok(());
            }
            "--help" => {
                print_help();
                return Ok(());
            }
            _ => {
                eprintln!("未知参数: {}", args[1]);
                print_help();
                std::process::exit(1);
            }
        }
    }

    // 加载 .env 文件（开发环境）
    // 按优先级加载：.env.local > .env.development > .env
    if let Ok(path) = std::env::var("STOREFRONT_ENV") {
        dotenv::from_filename(format!(".env.{}", path)).ok();
    } else {
        dotenv::from_filename(".env.local").ok();
        dotenv::from_filename(".env.development").ok();
        dotenv::dotenv().ok();
    }

    // 设置应用启动时间
    health::set_start_time();

    // 1. 加载配置（缺少 JWT 密钥时拒绝启动）
    let config = AppConfig::from_env().map_err(|e| {
        eprintln!("Configuration error: {}", e);
        anyhow::anyhow!("Failed to load configuration: {}", e)
    })?;

    // 2. 初始化日志
    telemetry::init_telemetry(&config);
    error::expose_error_details(config.app.is_development());

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Storefront API starting...");

    // 3. 存储后端
    let (db_pool, credentials, submissions): (
        Option<sqlx::PgPool>,
        Arc<dyn CredentialStore>,
        Option<Arc<dyn SubmissionStore>>,
    ) = match config.storage.backend {
        StorageBackend::Postgres => {
            let pool = db::create_pool(&config.database).await?;
            db::run_migrations(&pool).await?;
            tracing::info!("Database initialized");
            (
                Some(pool.clone()),
                Arc::new(PgCredentialStore::new(pool.clone())) as Arc<dyn CredentialStore>,
                Some(Arc::new(PgSubmissionStore::new(pool)) as Arc<dyn SubmissionStore>),
            )
        }
        StorageBackend::Memory => {
            tracing::warn!(
                fallback_path = %config.storage.fallback_path,
                "Using in-memory credential store; users are lost on restart"
            );
            (
                None,
                Arc::new(InMemoryCredentialStore::new()) as Arc<dyn CredentialStore>,
                None,
            )
        }
    };

    // 4. 邮件通知
    let mailer: Arc<dyn email::Mailer> = Arc::from(email::mailer_from_config(&config.email)?);

    // 5. 构建应用状态
    let app_state = Arc::new(AppState::new(
        config.clone(),
        db_pool,
        credentials,
        submissions,
        mailer,
    )?);

    // 6. 构建路由
    let app = routes::create_router(app_state);

    // 7. 启动服务器
    let addr = &config.server.addr;
    let listener = TcpListener::bind(addr).await?;

    tracing::info!(addr = %addr, "Server listening");

    // 8. 优雅关闭
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(config.server.graceful_shutdown_timeout_secs))
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// 优雅关闭信号处理
async fn shutdown_signal(timeout_secs: u64) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Ctrl+C received, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Terminate signal received, starting graceful shutdown");
        },
    }

    // 超时后强制退出，避免挂起的连接阻塞关闭
    tokio::spawn(async move {
        tokio::time::sleep(tokio::time::Duration::from_secs(timeout_secs)).await;
        tracing::warn!("Graceful shutdown timeout reached, forcing exit");
        std::process::exit(1);
    });
}

/// 打印帮助信息
fn print_help() {
    println!("storefront-api {}", env!("CARGO_PKG_VERSION"));
    println!();
    println!("用法: storefront-api [选项]");
    println!();
    println!("选项:");
    println!("  --version     打印版本信息并退出");
    println!("  --help        打印此帮助信息并退出");
    println!();
    println!("环境变量:");
    println!("  所有配置通过 STOREFRONT_ 前缀的环境变量完成");
    println!("  STOREFRONT_SECURITY__JWT_SECRET 为必填项");
    println!("  可用选项请参考 .env.example");
}
