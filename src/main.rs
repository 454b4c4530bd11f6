// ==========================================
// 校园服务聚合网关 - HTTP 服务主入口
// ==========================================

use actix_web::middleware::from_fn;
use actix_web::{web, App, HttpServer};
use anyhow::Context;

use campus_gateway::app::{access_log, configure, get_default_db_path, AppState};
use campus_gateway::config::AppConfig;
use campus_gateway::logging;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // 初始化日志系统
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("{}", campus_gateway::APP_NAME);
    tracing::info!("系统版本: {}", campus_gateway::VERSION);
    tracing::info!("==================================================");

    let config = AppConfig::load().context("无法加载配置")?;
    let bind_addr = config.bind_addr.clone();

    // 获取数据库路径
    let db_path = get_default_db_path(&config);
    tracing::info!("使用数据库: {}", db_path);

    // 创建AppState
    let state = web::Data::new(AppState::new(config, db_path).context("无法初始化AppState")?);

    tracing::info!("监听地址: {}", bind_addr);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(from_fn(access_log))
            .configure(configure)
    })
    .bind(&bind_addr)
    .with_context(|| format!("无法监听 {}", bind_addr))?
    .run()
    .await
    .context("HTTP 服务异常退出")?;

    tracing::info!("HTTP 服务已退出");
    Ok(())
}
