//! 货币换算与首页热门汇率

use crate::error::FetchError;
use crate::models::{Conversion, CurrentRateEntry, PopularRate};

use super::fx_client::RateSource;

/// 首页展示的热门货币
pub const POPULAR_CURRENCIES: [&str; 7] = ["USD", "JPY", "GBP", "AUD", "CAD", "CHF", "CNY"];

/// 按交叉汇率换算金额
pub fn convert(cross_rate: f64, amount: f64) -> f64 {
    cross_rate * amount
}

/// 换算结果保留五位小数
pub fn format_amount(value: f64) -> String {
    format!("{:.5}", value)
}

/// 查询交叉汇率并换算金额
pub async fn convert_amount(
    source: &dyn RateSource,
    from: &str,
    to: &str,
    amount: f64,
) -> Result<Conversion, FetchError> {
    let cross_rate = source.fetch_cross_rate(from, to).await?;
    let result = convert(cross_rate, amount);
    log::info!("💱 {} {} -> {} {} (汇率 {})", amount, from, result, to, cross_rate);

    Ok(Conversion {
        from: from.to_string(),
        to: to.to_string(),
        amount,
        cross_rate,
        result,
        display: format_amount(result),
    })
}

/// 从当前汇率中挑出热门货币
///
/// 取第一个包含该目标货币的条目的 `rate`，条目缺少 `rate` 时退回该货币的金额，
/// 找不到条目时为 `None`
pub fn popular_rates(entries: &[CurrentRateEntry]) -> Vec<PopularRate> {
    POPULAR_CURRENCIES
        .iter()
        .map(|code| {
            let amount_of = |entry: &CurrentRateEntry| {
                entry
                    .currency_amounts
                    .iter()
                    .find(|amount| amount.target_currency == *code)
                    .map(|amount| amount.amount)
            };
            let rate = entries
                .iter()
                .find_map(|entry| amount_of(entry).map(|amount| entry.rate.or(amount)))
                .flatten();

            PopularRate { name: code.to_string(), rate }
        })
        .collect()
}
