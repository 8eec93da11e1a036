//! 汇率时间序列数据模型
//!
//! 定义汇率历史管线中流转的数据结构：
//! - 原始观测点与汇率序列
//! - 带涨跌幅的表格行
//! - 图表序列、分页游标与分页状态
//! - 查询参数

use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Serialize};

/// 日期展示格式（ISO 8601）
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// 上游返回的未校验汇率条目
///
/// 日期或汇率缺失的条目在构建 `RateSeries` 时丢弃
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRatePoint {
    /// 日期字符串（yyyy-MM-dd 或 RFC 3339）
    pub date: Option<String>,
    /// 汇率
    pub rate: Option<f64>,
}

/// 单个日期的汇率观测点
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatePoint {
    pub date: NaiveDate,
    pub rate: f64,
}

/// 汇率序列
///
/// 保持上游返回的顺序（按日期升序），涨跌计算依赖相邻下标而非日期比较
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RateSeries {
    points: Vec<RatePoint>,
}

impl RateSeries {
    pub fn new(points: Vec<RatePoint>) -> Self {
        Self { points }
    }

    /// 由上游原始条目构建序列，丢弃字段缺失或日期无法解析的条目
    pub fn from_raw(raw: &[RawRatePoint]) -> Self {
        let mut points = Vec::with_capacity(raw.len());

        for (index, item) in raw.iter().enumerate() {
            let date = item.date.as_deref().and_then(parse_rate_date);
            match (date, item.rate) {
                (Some(date), Some(rate)) => points.push(RatePoint { date, rate }),
                _ => log::debug!("丢弃第 {} 条不完整的汇率数据: {:?}", index, item),
            }
        }

        Self::new(points)
    }

    pub fn points(&self) -> &[RatePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// 解析上游日期，兼容纯日期与带时间的 RFC 3339 格式
pub fn parse_rate_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, DATE_FORMAT)
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive()))
}

/// 汇率表格行
///
/// 相对前一条记录的涨跌额和涨跌幅（百分比），保留完整精度，
/// 四位小数格式化只在展示时进行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnotatedRow {
    /// 日期（yyyy-MM-dd）
    pub date: String,
    /// 汇率
    pub value: f64,
    /// 涨跌额
    pub absolute_change: f64,
    /// 涨跌幅（百分比），前值为 0 时为 inf/NaN
    pub percent_change: f64,
}

impl AnnotatedRow {
    /// 表格中的涨跌展示文本，如 `0.0200 / 1.8182 %`
    pub fn change_label(&self) -> String {
        format_change(self.absolute_change, self.percent_change)
    }
}

/// 涨跌额/涨跌幅保留四位小数
pub fn format_change(absolute: f64, percent: f64) -> String {
    format!("{:.4} / {:.4} %", absolute, percent)
}

/// 折线图序列，与表格行一一对应
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl ChartSeries {
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// 分页游标
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageCursor {
    /// 页码（从 0 开始）
    pub page_index: usize,
    /// 每页条数
    pub page_size: usize,
}

/// 分页器状态
///
/// `total_length` 始终是完整表格行数，而不是当前页的行数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageState {
    pub page_index: usize,
    pub page_size: usize,
    pub total_length: usize,
}

impl PageState {
    pub fn empty(page_size: usize) -> Self {
        Self {
            page_index: 0,
            page_size,
            total_length: 0,
        }
    }

    pub fn cursor(&self) -> PageCursor {
        PageCursor {
            page_index: self.page_index,
            page_size: self.page_size,
        }
    }
}

/// 汇率历史查询参数
///
/// `from_date <= to_date` 由表单层保证，管线本身不校验
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryParams {
    /// 开始日期
    pub from_date: NaiveDate,
    /// 结束日期
    pub to_date: NaiveDate,
    /// 货币代码（如 USD）
    pub currency: String,
}

impl QueryParams {
    pub fn new(from_date: NaiveDate, to_date: NaiveDate, currency: impl Into<String>) -> Self {
        Self {
            from_date,
            to_date,
            currency: currency.into(),
        }
    }
}
