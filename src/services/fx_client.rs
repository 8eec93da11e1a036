//! 上游汇率服务客户端
//!
//! 对接汇率门户后端的 REST 接口（Spring HATEOAS 格式，数据位于 `_embedded` 下）
//!
//! ## 接口
//! - /api/fx-rate/exchange-rates/{type}/{currency}/{from}/{to} - 汇率历史
//! - /api/fx-rate/current-exchange-rates/{type} - 当前汇率
//! - /api/fx-rate/available-currency-list - 可选货币列表
//! - /api/fx-rate/cross-rate/{from}/{to} - 交叉汇率

use std::time::Duration;

use futures::future::BoxFuture;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use url::Url;

use crate::config::UpstreamConfig;
use crate::error::FetchError;
use crate::models::{
    CurrencyInfo, CurrentRateEntry, ExchangeRateType, QueryParams, RawRatePoint, DATE_FORMAT,
};

/// 汇率数据列表在 `_embedded` 中的字段名
const FX_RATE_LIST_KEY: &str = "fxRateDTOList";
/// 货币列表在 `_embedded` 中的字段名
const CURRENCY_LIST_KEY: &str = "ccyDTOList";

/// 汇率数据源
///
/// 控制器和计算器只依赖该 trait，测试中可替换为脚本化的实现
pub trait RateSource: Send + Sync {
    /// 获取指定货币在日期区间内的汇率历史
    fn fetch_history<'a>(
        &'a self,
        query: &'a QueryParams,
    ) -> BoxFuture<'a, Result<Vec<RawRatePoint>, FetchError>>;

    /// 获取当前汇率
    fn fetch_current_rates(
        &self,
        rate_type: ExchangeRateType,
    ) -> BoxFuture<'_, Result<Vec<CurrentRateEntry>, FetchError>>;

    /// 获取可选货币列表
    fn fetch_currency_list(&self) -> BoxFuture<'_, Result<Vec<CurrencyInfo>, FetchError>>;

    /// 获取交叉汇率
    fn fetch_cross_rate<'a>(
        &'a self,
        from: &'a str,
        to: &'a str,
    ) -> BoxFuture<'a, Result<f64, FetchError>>;
}

/// 基于 reqwest 的上游客户端
pub struct FxRateClient {
    /// HTTP 客户端
    client: Client,
    /// 上游服务根地址
    base_url: Url,
    /// 历史查询使用的汇率类型
    history_rate_type: ExchangeRateType,
}

impl FxRateClient {
    /// 按配置创建客户端
    pub fn new(config: &UpstreamConfig) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()?;

        Ok(Self {
            client,
            base_url: Url::parse(&config.base_url)?,
            history_rate_type: config.history_rate_type,
        })
    }

    /// 拼接 `/api/fx-rate/...` 地址，每一段都会被转义
    fn endpoint(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::Transport(format!("上游地址不能作为根路径: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["api", "fx-rate"])
            .extend(segments);
        Ok(url)
    }

    /// 发送 GET 请求并返回 JSON，204 返回 `None`
    async fn get_json(&self, url: Url) -> Result<Option<Value>, FetchError> {
        log::debug!("📡 请求上游 URL: {}", url);

        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();

        if status == StatusCode::NO_CONTENT {
            return Ok(None);
        }

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            log::warn!("上游请求失败 {}: {}", status, url);
            return Err(FetchError::from_status(status.as_u16(), error_message(&body, status)));
        }

        let text = response.text().await?;
        if text.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&text)?))
    }
}

impl RateSource for FxRateClient {
    fn fetch_history<'a>(
        &'a self,
        query: &'a QueryParams,
    ) -> BoxFuture<'a, Result<Vec<RawRatePoint>, FetchError>> {
        Box::pin(async move {
            let from = query.from_date.format(DATE_FORMAT).to_string();
            let to = query.to_date.format(DATE_FORMAT).to_string();
            let url = self.endpoint(&[
                "exchange-rates",
                self.history_rate_type.as_str(),
                &query.currency,
                &from,
                &to,
            ])?;

            let points = match self.get_json(url).await? {
                Some(body) => parse_history(&body),
                None => Vec::new(),
            };
            log::info!("📈 {} {}~{} 获取到 {} 条汇率", query.currency, from, to, points.len());
            Ok(points)
        })
    }

    fn fetch_current_rates(
        &self,
        rate_type: ExchangeRateType,
    ) -> BoxFuture<'_, Result<Vec<CurrentRateEntry>, FetchError>> {
        Box::pin(async move {
            let url = self.endpoint(&["current-exchange-rates", rate_type.as_str()])?;
            match self.get_json(url).await? {
                Some(body) => parse_current_rates(&body),
                None => Ok(Vec::new()),
            }
        })
    }

    fn fetch_currency_list(&self) -> BoxFuture<'_, Result<Vec<CurrencyInfo>, FetchError>> {
        Box::pin(async move {
            let url = self.endpoint(&["available-currency-list"])?;
            match self.get_json(url).await? {
                Some(body) => parse_currency_list(&body),
                None => Ok(Vec::new()),
            }
        })
    }

    fn fetch_cross_rate<'a>(
        &'a self,
        from: &'a str,
        to: &'a str,
    ) -> BoxFuture<'a, Result<f64, FetchError>> {
        Box::pin(async move {
            let url = self.endpoint(&["cross-rate", from, to])?;
            let body = self
                .get_json(url)
                .await?
                .ok_or_else(|| FetchError::NotFound(format!("{}/{} 无交叉汇率", from, to)))?;
            value_as_f64(&body)
                .ok_or_else(|| FetchError::Decode(format!("交叉汇率格式错误: {}", body)))
        })
    }
}

/// 取出 `_embedded.<key>` 数组，缺失时视为空列表
fn embedded_list<'a>(body: &'a Value, key: &str) -> &'a [Value] {
    body.get("_embedded")
        .and_then(|e| e.get(key))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// 数值字段兼容 JSON 数字与数字字符串
fn value_as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// 从错误响应体中提取 message 字段
fn error_message(body: &str, status: StatusCode) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .unwrap_or_else(|| status.to_string())
}

/// 解析汇率历史，字段缺失的条目保留为 `None`，由管线丢弃
pub fn parse_history(body: &Value) -> Vec<RawRatePoint> {
    embedded_list(body, FX_RATE_LIST_KEY)
        .iter()
        .map(|item| RawRatePoint {
            date: item.get("date").and_then(Value::as_str).map(str::to_string),
            rate: item.get("rate").and_then(value_as_f64),
        })
        .collect()
}

/// 解析当前汇率
pub fn parse_current_rates(body: &Value) -> Result<Vec<CurrentRateEntry>, FetchError> {
    embedded_list(body, FX_RATE_LIST_KEY)
        .iter()
        .map(|item| Ok(serde_json::from_value(item.clone())?))
        .collect()
}

/// 解析可选货币列表
pub fn parse_currency_list(body: &Value) -> Result<Vec<CurrencyInfo>, FetchError> {
    embedded_list(body, CURRENCY_LIST_KEY)
        .iter()
        .map(|item| Ok(serde_json::from_value(item.clone())?))
        .collect()
}
