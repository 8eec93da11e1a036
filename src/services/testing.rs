//! 测试用的脚本化数据源与记录器

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;
use futures::future::BoxFuture;
use tokio::sync::Notify;

use super::controller::ViewObserver;
use super::fx_client::RateSource;
use super::indicator::LoadingIndicator;
use super::pagination::PageView;
use crate::error::{ErrorKind, FetchError};
use crate::models::{
    ChartSeries, CurrencyInfo, CurrentRateEntry, ExchangeRateType, QueryParams, RawRatePoint,
};

pub fn raw_points(points: &[(&str, f64)]) -> Vec<RawRatePoint> {
    points
        .iter()
        .map(|(date, rate)| RawRatePoint {
            date: Some(date.to_string()),
            rate: Some(*rate),
        })
        .collect()
}

pub fn query(currency: &str) -> QueryParams {
    QueryParams::new(
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
        currency,
    )
}

/// 按货币代码返回预设结果的数据源，可为某个货币设置闸门以控制返回时机
#[derive(Default)]
pub struct ScriptedSource {
    history: HashMap<String, Result<Vec<RawRatePoint>, FetchError>>,
    gates: HashMap<String, Arc<Notify>>,
    current_rates: Option<Result<Vec<CurrentRateEntry>, FetchError>>,
    currencies: Vec<CurrencyInfo>,
    cross_rates: HashMap<(String, String), f64>,
    history_calls: AtomicUsize,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_history(
        mut self,
        currency: &str,
        result: Result<Vec<RawRatePoint>, FetchError>,
    ) -> Self {
        self.history.insert(currency.to_string(), result);
        self
    }

    pub fn with_gate(mut self, currency: &str, gate: Arc<Notify>) -> Self {
        self.gates.insert(currency.to_string(), gate);
        self
    }

    pub fn with_current_rates(mut self, result: Result<Vec<CurrentRateEntry>, FetchError>) -> Self {
        self.current_rates = Some(result);
        self
    }

    pub fn with_currencies(mut self, codes: &[&str]) -> Self {
        self.currencies = codes
            .iter()
            .map(|code| CurrencyInfo {
                currency_code: code.to_string(),
                currency_name: None,
                currency_number: None,
                minor_units: None,
            })
            .collect();
        self
    }

    pub fn with_cross_rate(mut self, from: &str, to: &str, rate: f64) -> Self {
        self.cross_rates.insert((from.to_string(), to.to_string()), rate);
        self
    }

    pub fn history_calls(&self) -> usize {
        self.history_calls.load(Ordering::SeqCst)
    }
}

impl RateSource for ScriptedSource {
    fn fetch_history<'a>(
        &'a self,
        query: &'a QueryParams,
    ) -> BoxFuture<'a, Result<Vec<RawRatePoint>, FetchError>> {
        Box::pin(async move {
            self.history_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = self.gates.get(&query.currency) {
                gate.notified().await;
            }
            self.history
                .get(&query.currency)
                .cloned()
                .unwrap_or_else(|| Err(FetchError::NotFound(query.currency.clone())))
        })
    }

    fn fetch_current_rates(
        &self,
        _rate_type: ExchangeRateType,
    ) -> BoxFuture<'_, Result<Vec<CurrentRateEntry>, FetchError>> {
        Box::pin(async move { self.current_rates.clone().unwrap_or_else(|| Ok(Vec::new())) })
    }

    fn fetch_currency_list(&self) -> BoxFuture<'_, Result<Vec<CurrencyInfo>, FetchError>> {
        Box::pin(async move { Ok(self.currencies.clone()) })
    }

    fn fetch_cross_rate<'a>(
        &'a self,
        from: &'a str,
        to: &'a str,
    ) -> BoxFuture<'a, Result<f64, FetchError>> {
        Box::pin(async move {
            self.cross_rates
                .get(&(from.to_string(), to.to_string()))
                .copied()
                .ok_or_else(|| FetchError::NotFound(format!("{}/{}", from, to)))
        })
    }
}

/// 记录 show/hide 次数
#[derive(Default)]
pub struct RecordingIndicator {
    shown: AtomicUsize,
    hidden: AtomicUsize,
}

impl RecordingIndicator {
    pub fn counts(&self) -> (usize, usize) {
        (self.shown.load(Ordering::SeqCst), self.hidden.load(Ordering::SeqCst))
    }
}

impl LoadingIndicator for RecordingIndicator {
    fn show(&self) {
        self.shown.fetch_add(1, Ordering::SeqCst);
    }

    fn hide(&self) {
        self.hidden.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ViewEvent {
    /// 图表点数
    Chart(usize),
    /// 当前页行数与总行数
    Table(usize, usize),
    Error(ErrorKind),
}

#[derive(Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<ViewEvent>>,
}

impl RecordingObserver {
    pub fn events(&self) -> Vec<ViewEvent> {
        self.events.lock().unwrap().clone()
    }
}

impl ViewObserver for RecordingObserver {
    fn on_chart(&self, chart: &ChartSeries) {
        self.events.lock().unwrap().push(ViewEvent::Chart(chart.labels.len()));
    }

    fn on_table(&self, page: &PageView<'_>) {
        self.events
            .lock()
            .unwrap()
            .push(ViewEvent::Table(page.rows.len(), page.total_length));
    }

    fn on_error(&self, error: &FetchError) {
        self.events.lock().unwrap().push(ViewEvent::Error(error.kind()));
    }
}
