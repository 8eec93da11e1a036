//! 涨跌计算
//!
//! 将汇率序列转换为带日涨跌额、涨跌幅的表格行

use crate::models::{AnnotatedRow, RateSeries, DATE_FORMAT};

/// 计算每条记录相对前一条记录的涨跌
///
/// 第一条记录没有前值，涨跌均为 0。前值为 0 时涨跌幅保留浮点除法结果（inf/NaN）。
/// 输出长度与输入相同。
pub fn annotate(series: &RateSeries) -> Vec<AnnotatedRow> {
    let points = series.points();
    let mut rows = Vec::with_capacity(points.len());

    for (index, point) in points.iter().enumerate() {
        let (absolute_change, percent_change) = if index > 0 {
            let previous = points[index - 1].rate;
            let change = point.rate - previous;
            (change, change / previous * 100.0)
        } else {
            (0.0, 0.0)
        };

        rows.push(AnnotatedRow {
            date: point.date.format(DATE_FORMAT).to_string(),
            value: point.rate,
            absolute_change,
            percent_change,
        });
    }

    rows
}
