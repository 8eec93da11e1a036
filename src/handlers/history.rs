//! 汇率历史接口处理器
//!
//! ## API 列表
//! - POST /history/query - 提交查询（日期区间 + 货币），返回第一页与图表
//! - GET /history - 当前视图
//! - GET /history/page?page_index=0&page_size=10 - 翻页
//! - GET /history/chart - 图表序列

use actix_web::{web, HttpResponse, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{fetch_error_response, status_for, validate_currency, validation_response, AppState};
use crate::config::AppConfig;
use crate::error::ValidationError;
use crate::models::{
    get_vilnius_time, AnnotatedRow, ApiResponse, ChartSeries, PageCursor, PageState, QueryParams,
};
use crate::services::controller::{HistorySnapshot, QueryStatus};

/// 查询表单，未填写的字段使用配置中的默认值
#[derive(Debug, Default, Deserialize)]
pub struct HistoryQueryForm {
    pub from_date: Option<NaiveDate>,
    pub to_date: Option<NaiveDate>,
    pub currency: Option<String>,
}

impl HistoryQueryForm {
    /// 补全默认值并校验
    pub fn into_query(self, config: &AppConfig, today: NaiveDate) -> Result<QueryParams, ValidationError> {
        let from_date = self.from_date.unwrap_or(config.history.default_from_date);
        let to_date = self.to_date.unwrap_or(today);
        let currency = validate_currency(
            self.currency
                .as_deref()
                .unwrap_or(&config.history.default_currency),
        )?;

        if from_date > to_date {
            return Err(ValidationError::InvertedRange {
                from: from_date.to_string(),
                to: to_date.to_string(),
            });
        }

        Ok(QueryParams::new(from_date, to_date, currency))
    }
}

/// 翻页参数
#[derive(Debug, Deserialize)]
pub struct PageQuery {
    pub page_index: Option<usize>,
    pub page_size: Option<usize>,
}

/// 表格行展示格式
#[derive(Debug, Serialize)]
pub struct TableRow {
    pub date: String,
    pub proportion: f64,
    /// 涨跌额 / 涨跌幅，四位小数
    pub change: String,
}

impl From<&AnnotatedRow> for TableRow {
    fn from(row: &AnnotatedRow) -> Self {
        Self {
            date: row.date.clone(),
            proportion: row.value,
            change: row.change_label(),
        }
    }
}

/// 汇率历史页面视图
#[derive(Debug, Serialize)]
pub struct HistoryView {
    pub status: QueryStatus,
    pub query: Option<QueryParams>,
    pub rows: Vec<TableRow>,
    pub page: PageState,
    pub chart: ChartSeries,
    /// 错误提示
    pub error: Option<String>,
    /// 本次提交已被更新的查询取代，视图属于更新的查询
    pub superseded: bool,
}

impl From<HistorySnapshot> for HistoryView {
    fn from(snapshot: HistorySnapshot) -> Self {
        Self {
            status: snapshot.status,
            query: snapshot.query,
            rows: snapshot.rows.iter().map(TableRow::from).collect(),
            page: snapshot.page,
            chart: snapshot.chart,
            error: snapshot.error.map(|e| e.user_message().to_string()),
            superseded: false,
        }
    }
}

/// 提交汇率历史查询
///
/// POST /api/v1/history/query
pub async fn submit_query(
    state: web::Data<AppState>,
    form: web::Json<HistoryQueryForm>,
) -> Result<HttpResponse> {
    let today = get_vilnius_time().date_naive();
    let query = match form.into_inner().into_query(&state.config, today) {
        Ok(query) => query,
        Err(e) => return Ok(validation_response::<HistoryView>(e)),
    };

    // 在独立任务中执行，客户端断开时本轮查询仍会完成
    let controller = state.controller.clone();
    let outcome = match tokio::spawn(async move { controller.submit(query).await }).await {
        Ok(outcome) => outcome,
        Err(e) => {
            log::error!("查询任务异常退出: {}", e);
            let error = crate::error::FetchError::Transport(e.to_string());
            return Ok(fetch_error_response::<HistoryView>(&error));
        }
    };

    // 响应以返回的快照为准，快照可能已属于更新的查询
    let snapshot = state.controller.snapshot();
    let superseded = snapshot.ticket != outcome.ticket();
    if superseded {
        log::debug!("查询 #{} 已被 #{} 取代", outcome.ticket(), snapshot.ticket);
    }

    let error = match snapshot.status {
        QueryStatus::Failed => snapshot.error.clone(),
        _ => None,
    };
    let mut view = HistoryView::from(snapshot);
    view.superseded = superseded;

    match error {
        Some(error) => Ok(HttpResponse::build(status_for(error.kind())).json(
            ApiResponse::failure_with(error.kind(), error.user_message().to_string(), view),
        )),
        None => Ok(HttpResponse::Ok().json(ApiResponse::success(view))),
    }
}

/// 获取当前视图
///
/// GET /api/v1/history
pub async fn get_history(state: web::Data<AppState>) -> Result<HttpResponse> {
    let view = HistoryView::from(state.controller.snapshot());
    Ok(HttpResponse::Ok().json(ApiResponse::success(view)))
}

/// 翻页，只重新截取当前页
///
/// GET /api/v1/history/page?page_index=1&page_size=20
pub async fn change_page(
    state: web::Data<AppState>,
    query: web::Query<PageQuery>,
) -> Result<HttpResponse> {
    let current = state.controller.snapshot().page;
    let page_size = query.page_size.unwrap_or(current.page_size);
    let max = state.config.paging.max_page_size;

    if page_size == 0 || page_size > max {
        return Ok(validation_response::<HistoryView>(ValidationError::InvalidPageSize {
            actual: page_size,
            max,
        }));
    }

    state.controller.set_page(PageCursor {
        page_index: query.page_index.unwrap_or(0),
        page_size,
    });

    let view = HistoryView::from(state.controller.snapshot());
    Ok(HttpResponse::Ok().json(ApiResponse::success(view)))
}

/// 获取图表序列
///
/// GET /api/v1/history/chart
pub async fn get_chart(state: web::Data<AppState>) -> Result<HttpResponse> {
    Ok(HttpResponse::Ok().json(ApiResponse::success(state.controller.chart())))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/history")
            .route("", web::get().to(get_history))
            .route("/query", web::post().to(submit_query))
            .route("/page", web::get().to(change_page))
            .route("/chart", web::get().to(get_chart)),
    );
}
