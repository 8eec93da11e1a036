//! 汇率门户服务
//!
//! 为前端提供汇率历史（表格 + 折线图 + 分页）与货币换算的 RESTful API
//! 数据来源：汇率门户后端（立陶宛央行 / 欧洲央行汇率）

mod config;   // 配置
mod error;    // 错误类型
mod handlers; // HTTP 请求处理器
mod models;   // 数据模型定义
mod services; // 业务逻辑服务

use std::sync::Arc;

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use crate::config::AppConfig;
use crate::handlers::AppState;
use crate::services::controller::{LogObserver, QueryController};
use crate::services::fx_client::FxRateClient;
use crate::services::indicator::LoadingCounter;

/// 应用程序入口
///
/// 启动 HTTP 服务器，监听地址来自配置（默认 0.0.0.0:8080）
#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let (config, warnings) = AppConfig::load();

    // 初始化日志系统，RUST_LOG 优先，否则使用配置中的级别
    env_logger::init_from_env(Env::default().default_filter_or(config.log.level.as_str()));

    for warning in &warnings {
        log::warn!("{}", warning);
    }
    match &config.loaded_from {
        Some(path) => log::info!("从 {} 加载配置成功", path.display()),
        None => log::info!("使用默认配置"),
    }

    let source = Arc::new(FxRateClient::new(&config.upstream)?);
    let indicator = Arc::new(LoadingCounter::new());
    let controller = Arc::new(QueryController::new(
        source.clone(),
        indicator.clone(),
        config.paging.page_size,
    ));
    controller.subscribe(Arc::new(LogObserver));

    let bind_addr = config.bind_addr();
    let workers = config.server.workers;
    log::info!("启动汇率门户服务 {}，上游 {}", bind_addr, config.upstream.base_url);

    let state = web::Data::new(AppState {
        controller,
        source,
        indicator,
        config,
    });

    // 创建并启动 HTTP 服务器
    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default()) // 添加请求日志中间件
            .app_data(state.clone())
            .configure(handlers::config) // 配置路由
    });
    if workers > 0 {
        server = server.workers(workers);
    }

    server.bind(bind_addr)?.run().await?;
    Ok(())
}
