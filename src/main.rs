// ==========================================
// 学生档案管理 - HTTP 服务主入口
// ==========================================
// 技术栈: axum + Rust + SQLite
// ==========================================

use std::sync::Arc;

use anyhow::Context;
use student_records::app::{configure_routes, get_bind_address, get_default_db_path, AppState};
use student_records::config::ImportConfigReader;
use student_records::{i18n, logging};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", student_records::APP_NAME);
    tracing::info!("系统版本: {}", student_records::VERSION);
    tracing::info!("==================================================");

    // 获取数据库路径
    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);

    // 创建AppState
    let app_state = Arc::new(AppState::new(db_path).map_err(anyhow::Error::msg)?);

    // 用户消息语言
    let locale = app_state.config_manager.get_locale().await?;
    i18n::set_locale(&locale);
    tracing::info!("用户消息语言: {}", i18n::current_locale());

    let app = configure_routes(app_state);

    let bind_address = get_bind_address();
    let listener = tokio::net::TcpListener::bind(&bind_address)
        .await
        .with_context(|| format!("无法监听地址: {}", bind_address))?;
    tracing::info!("HTTP 服务已启动: http://{}", bind_address);

    axum::serve(listener, app).await?;
    Ok(())
}
