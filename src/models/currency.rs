//! 货币与当前汇率数据模型
//!
//! 对应上游 `CcyDTO` / `FxRateDTO` / `CcyAmtDTO`，以及计算器的结果

use serde::{Deserialize, Serialize};
use std::fmt;

/// 汇率发布类型
///
/// - LT：立陶宛央行汇率
/// - EU：欧洲央行参考汇率
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExchangeRateType {
    LT,
    EU,
}

impl ExchangeRateType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExchangeRateType::LT => "LT",
            ExchangeRateType::EU => "EU",
        }
    }
}

impl fmt::Display for ExchangeRateType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 可选货币信息
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyInfo {
    /// 货币代码（ISO 4217）
    pub currency_code: String,
    /// 货币名称
    #[serde(default)]
    pub currency_name: Option<String>,
    /// 货币数字代码
    #[serde(default)]
    pub currency_number: Option<u32>,
    /// 小数位数
    #[serde(default)]
    pub minor_units: Option<String>,
}

/// 目标货币金额
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyAmount {
    pub target_currency: String,
    pub amount: Option<f64>,
}

/// 当前汇率条目
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentRateEntry {
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub base_currency: Option<String>,
    #[serde(default)]
    pub rate: Option<f64>,
    #[serde(default)]
    pub currency_amounts: Vec<CurrencyAmount>,
}

/// 首页热门货币汇率
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopularRate {
    pub name: String,
    pub rate: Option<f64>,
}

/// 货币换算结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Conversion {
    pub from: String,
    pub to: String,
    pub amount: f64,
    pub cross_rate: f64,
    pub result: f64,
    /// 保留五位小数的展示值
    pub display: String,
}

/// 换算查询参数
#[derive(Debug, Deserialize)]
pub struct ConvertQuery {
    pub from: String,
    pub to: String,
    pub amount: Option<f64>,
}
