//! 折线图序列投影

use crate::models::{AnnotatedRow, ChartSeries};

/// 将表格行投影为折线图的标签与数值，下标一一对应
pub fn project(rows: &[AnnotatedRow]) -> ChartSeries {
    let (labels, values) = rows.iter().map(|row| (row.date.clone(), row.value)).unzip();
    ChartSeries { labels, values }
}
