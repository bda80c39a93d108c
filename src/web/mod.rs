pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod ui;

use crate::models::ServiceState;
use crate::utils::error::DetectError;
use crate::{Config, Result};
use axum::{
    extract::State,
    middleware::from_fn,
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::json;
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, limit::RequestBodyLimitLayer, timeout::TimeoutLayer};

pub async fn serve(config: Config) -> Result<()> {
    // 启动时加载模型和参考表，失败直接终止进程，不进入监听循环
    let state = ServiceState::init(config.clone())?;

    // 构建应用路由
    let app = create_app(state);

    // 解析绑定地址
    let addr: SocketAddr = config.bind_addr.parse().map_err(|e| {
        DetectError::Config(format!("Invalid bind address {}: {}", config.bind_addr, e))
    })?;

    tracing::info!("Server starting on http://{}", addr);
    tracing::info!("API endpoints:");
    tracing::info!("  POST /predict        - JSON base64 upload");
    tracing::info!("  POST /predict/upload - Multipart file upload");
    tracing::info!("  GET  /               - Web UI");
    tracing::info!("  GET  /health         - Health check");
    tracing::info!("  GET  /api/info       - Service information");

    // 启动服务器
    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        DetectError::Internal(format!("Failed to bind to address {}: {}", addr, e))
    })?;

    axum::serve(listener, app)
        .await
        .map_err(|e| DetectError::Internal(format!("Server failed to start: {}", e)))?;

    Ok(())
}

fn create_app(state: ServiceState) -> Router {
    let max_request_size = state.config().server_config.max_request_size;
    let request_timeout = state.config().server_config.request_timeout;

    Router::new()
        // 预测API路由
        .route("/predict", post(handlers::predict_json_handler))
        .route("/predict/upload", post(handlers::predict_upload_handler))
        // Web UI路由
        .route("/", get(ui::index_handler))
        // 系统路由
        .route("/health", get(health_handler))
        .route("/api/info", get(info_handler))
        // 中间件 - 使用分层模式避免复杂类型嵌套
        .layer(from_fn(middleware::request_logging))
        .layer(from_fn(middleware::security_headers))
        .layer(RequestBodyLimitLayer::new(max_request_size))
        .layer(TimeoutLayer::new(Duration::from_secs(request_timeout)))
        .layer(CorsLayer::permissive())
        // 注入服务状态
        .with_state(state)
}

/// 健康检查端点
async fn health_handler(State(state): State<ServiceState>) -> Result<Json<serde_json::Value>> {
    state.health_check()?;

    Ok(Json(json!({
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "version": env!("CARGO_PKG_VERSION")
    })))
}

/// 服务信息端点
async fn info_handler(State(state): State<ServiceState>) -> Result<Json<serde_json::Value>> {
    let stats = state.stats();

    Ok(Json(json!({
        "service": "Paddy Disease Detection Service",
        "version": env!("CARGO_PKG_VERSION"),
        "description": env!("CARGO_PKG_DESCRIPTION"),
        "model": stats,
        "features": {
            "dual_upload_modes": true,
            "per_class_scores": true,
            "disease_reference_lookup": true
        }
    })))
}
