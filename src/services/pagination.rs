//! 表格分页窗口

use serde::Serialize;

use crate::models::{AnnotatedRow, PageCursor};

/// 当前页视图
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageView<'a> {
    /// 当前页可见的行
    pub rows: &'a [AnnotatedRow],
    /// 完整表格行数，供分页器计算页数
    pub total_length: usize,
}

/// 按游标截取当前页
///
/// 越界时返回空切片而不是报错；`total_length` 与切片无关，始终为 `rows.len()`
pub fn windowed(rows: &[AnnotatedRow], cursor: PageCursor) -> PageView<'_> {
    let total_length = rows.len();
    let start = cursor.page_index.saturating_mul(cursor.page_size).min(total_length);
    let end = start.saturating_add(cursor.page_size).min(total_length);

    PageView {
        rows: &rows[start..end],
        total_length,
    }
}
