//! 汇率历史查询控制器
//!
//! 负责一次完整的"请求-重建"周期：
//! - 提交查询时清空派生数据并通知观察者
//! - 请求上游汇率历史
//! - 成功后依次计算涨跌、图表序列和第一页表格
//! - 失败时清空全部派生数据并给出错误分类
//!
//! 每次提交都会领取一个递增的序号，响应到达时只有序号仍是最新的才会生效，
//! 较早提交、较晚返回的响应直接丢弃。

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock};

use serde::Serialize;

use super::annotator::annotate;
use super::chart::project;
use super::fx_client::RateSource;
use super::indicator::{LoadingGuard, LoadingIndicator};
use super::pagination::{windowed, PageView};
use crate::error::FetchError;
use crate::models::{
    AnnotatedRow, ChartSeries, PageCursor, PageState, QueryParams, RateSeries, RawRatePoint,
};

/// 查询状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryStatus {
    Idle,
    Loading,
    Ready,
    Failed,
}

/// 一次提交的结果
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// 数据已更新
    Ready { ticket: u64 },
    /// 请求失败，派生数据已清空
    Failed { ticket: u64, error: FetchError },
    /// 已有更新的查询，本次响应被丢弃
    Superseded { ticket: u64 },
}

impl QueryOutcome {
    pub fn ticket(&self) -> u64 {
        match self {
            Self::Ready { ticket } | Self::Failed { ticket, .. } | Self::Superseded { ticket } => *ticket,
        }
    }
}

/// 视图观察者
///
/// 回调在控制器持有状态锁时执行，实现中不能再调用控制器
pub trait ViewObserver: Send + Sync {
    /// 图表序列更新
    fn on_chart(&self, _chart: &ChartSeries) {}
    /// 表格当前页或总条数更新
    fn on_table(&self, _page: &PageView<'_>) {}
    /// 查询失败
    fn on_error(&self, _error: &FetchError) {}
}

/// 将视图变化写入日志的观察者
pub struct LogObserver;

impl ViewObserver for LogObserver {
    fn on_chart(&self, chart: &ChartSeries) {
        if chart.is_empty() {
            log::debug!("图表已清空");
            return;
        }
        log::info!(
            "📊 图表更新: {} 个点 ({} ~ {})",
            chart.labels.len(),
            chart.labels[0],
            chart.labels[chart.labels.len() - 1]
        );
    }

    fn on_table(&self, page: &PageView<'_>) {
        log::debug!("表格更新: 当前页 {} 行，共 {} 行", page.rows.len(), page.total_length);
    }

    fn on_error(&self, error: &FetchError) {
        log::warn!("❌ 汇率查询失败: {} ({})", error.user_message(), error);
    }
}

/// 当前视图快照
#[derive(Debug, Clone, PartialEq)]
pub struct HistorySnapshot {
    /// 当前视图所属查询的序号，0 表示尚未查询
    pub ticket: u64,
    pub status: QueryStatus,
    pub query: Option<QueryParams>,
    /// 当前页的行
    pub rows: Vec<AnnotatedRow>,
    pub page: PageState,
    pub chart: ChartSeries,
    pub error: Option<FetchError>,
}

/// 控制器独占的状态
struct HistoryState {
    ticket: u64,
    status: QueryStatus,
    query: Option<QueryParams>,
    series: RateSeries,
    rows: Vec<AnnotatedRow>,
    chart: ChartSeries,
    page: PageState,
    error: Option<FetchError>,
}

impl HistoryState {
    fn new(page_size: usize) -> Self {
        Self {
            ticket: 0,
            status: QueryStatus::Idle,
            query: None,
            series: RateSeries::default(),
            rows: Vec::new(),
            chart: ChartSeries::default(),
            page: PageState::empty(page_size),
            error: None,
        }
    }

    /// 清空全部派生数据，保留每页条数
    fn clear(&mut self) {
        self.series = RateSeries::default();
        self.rows.clear();
        self.chart = ChartSeries::default();
        self.page = PageState::empty(self.page.page_size);
        self.error = None;
    }

    /// 由原始数据重建序列、表格行、图表和第一页
    fn rebuild(&mut self, raw: &[RawRatePoint]) {
        let series = RateSeries::from_raw(raw);
        let rows = annotate(&series);
        let chart = project(&rows);

        self.page = PageState {
            page_index: 0,
            page_size: self.page.page_size,
            total_length: rows.len(),
        };
        self.series = series;
        self.rows = rows;
        self.chart = chart;
        self.error = None;
    }

    fn page_view(&self) -> PageView<'_> {
        windowed(&self.rows, self.page.cursor())
    }
}

/// 汇率历史查询控制器
pub struct QueryController {
    source: Arc<dyn RateSource>,
    indicator: Arc<dyn LoadingIndicator>,
    observers: RwLock<Vec<Arc<dyn ViewObserver>>>,
    /// 最近一次提交的序号
    latest_ticket: AtomicU64,
    state: Mutex<HistoryState>,
}

impl QueryController {
    pub fn new(
        source: Arc<dyn RateSource>,
        indicator: Arc<dyn LoadingIndicator>,
        page_size: usize,
    ) -> Self {
        Self {
            source,
            indicator,
            observers: RwLock::new(Vec::new()),
            latest_ticket: AtomicU64::new(0),
            state: Mutex::new(HistoryState::new(page_size.max(1))),
        }
    }

    /// 注册视图观察者
    pub fn subscribe(&self, observer: Arc<dyn ViewObserver>) {
        self.observers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(observer);
    }

    /// 提交新查询并等待本轮结果
    pub async fn submit(&self, query: QueryParams) -> QueryOutcome {
        let ticket = self.begin(&query);
        let _loading = LoadingGuard::new(self.indicator.clone());

        log::info!(
            "🔍 提交汇率查询 #{}: {} {} ~ {}",
            ticket,
            query.currency,
            query.from_date,
            query.to_date
        );

        let result = self.source.fetch_history(&query).await;
        self.complete(ticket, result)
    }

    /// 移动分页游标，只重新截取当前页，不会重新请求
    pub fn set_page(&self, cursor: PageCursor) -> PageState {
        let mut state = self.lock_state();
        state.page.page_index = cursor.page_index;
        state.page.page_size = cursor.page_size.max(1);
        self.notify_table(&state);
        state.page
    }

    /// 当前视图快照
    pub fn snapshot(&self) -> HistorySnapshot {
        let state = self.lock_state();
        HistorySnapshot {
            ticket: state.ticket,
            status: state.status,
            query: state.query.clone(),
            rows: state.page_view().rows.to_vec(),
            page: state.page,
            chart: state.chart.clone(),
            error: state.error.clone(),
        }
    }

    pub fn chart(&self) -> ChartSeries {
        self.lock_state().chart.clone()
    }

    pub fn status(&self) -> QueryStatus {
        self.lock_state().status
    }

    /// 完整汇率序列中的观测点数
    pub fn series_len(&self) -> usize {
        self.lock_state().series.len()
    }

    pub fn latest_ticket(&self) -> u64 {
        self.latest_ticket.load(Ordering::SeqCst)
    }

    /// 进入 Loading：领取序号并清空派生数据
    fn begin(&self, query: &QueryParams) -> u64 {
        let mut state = self.lock_state();
        let ticket = self.latest_ticket.fetch_add(1, Ordering::SeqCst) + 1;

        state.clear();
        state.ticket = ticket;
        state.status = QueryStatus::Loading;
        state.query = Some(query.clone());

        self.notify_chart(&state);
        self.notify_table(&state);
        ticket
    }

    /// 处理响应：序号过期则丢弃，否则进入 Ready 或 Failed
    fn complete(
        &self,
        ticket: u64,
        result: Result<Vec<RawRatePoint>, FetchError>,
    ) -> QueryOutcome {
        let mut state = self.lock_state();

        let latest = self.latest_ticket();
        if ticket != latest {
            log::debug!("丢弃过期的查询响应 #{}（最新 #{}）", ticket, latest);
            return QueryOutcome::Superseded { ticket };
        }

        match result {
            Ok(raw) => {
                state.rebuild(&raw);
                state.status = QueryStatus::Ready;
                if state.series.is_empty() {
                    log::warn!("查询 #{} 没有有效的汇率数据", ticket);
                }
                log::info!(
                    "✅ 查询 #{} 完成: 原始 {} 条，有效 {} 条",
                    ticket,
                    raw.len(),
                    state.rows.len()
                );

                self.notify_chart(&state);
                self.notify_table(&state);
                QueryOutcome::Ready { ticket }
            }
            Err(error) => {
                state.clear();
                state.status = QueryStatus::Failed;
                state.error = Some(error.clone());

                self.notify_chart(&state);
                self.notify_table(&state);
                for observer in self.observers().iter() {
                    observer.on_error(&error);
                }
                QueryOutcome::Failed { ticket, error }
            }
        }
    }

    fn notify_chart(&self, state: &HistoryState) {
        for observer in self.observers().iter() {
            observer.on_chart(&state.chart);
        }
    }

    fn notify_table(&self, state: &HistoryState) {
        let page = state.page_view();
        for observer in self.observers().iter() {
            observer.on_table(&page);
        }
    }

    fn observers(&self) -> std::sync::RwLockReadGuard<'_, Vec<Arc<dyn ViewObserver>>> {
        self.observers.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn lock_state(&self) -> MutexGuard<'_, HistoryState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
