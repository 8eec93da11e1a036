use actix_web::{web, HttpResponse, Result};
use serde::Serialize;

use super::AppState;
use crate::models::ApiResponse;
use crate::services::controller::QueryStatus;

#[derive(Serialize)]
struct HealthStatus {
    status: &'static str,
    loading: bool,
    /// 未完成的上游请求数
    pending_requests: usize,
    /// 当前查询序号
    latest_query: u64,
    query_status: QueryStatus,
    /// 当前汇率序列的有效数据点数
    series_points: usize,
}

pub async fn health_check(state: web::Data<AppState>) -> Result<HttpResponse> {
    let response = ApiResponse::success(HealthStatus {
        status: "Service is healthy",
        loading: state.indicator.is_loading(),
        pending_requests: state.indicator.pending(),
        latest_query: state.controller.latest_ticket(),
        query_status: state.controller.status(),
        series_points: state.controller.series_len(),
    });
    Ok(HttpResponse::Ok().json(response))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
