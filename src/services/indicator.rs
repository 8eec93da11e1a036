//! 加载状态指示

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 加载指示器，每次上游请求前后各调用一次 `show` / `hide`
pub trait LoadingIndicator: Send + Sync {
    fn show(&self);
    fn hide(&self);
}

/// 按未完成请求数计数的加载指示器
///
/// 历史查询与货币列表请求可能同时进行，计数归零才算加载结束
#[derive(Debug, Default)]
pub struct LoadingCounter {
    pending: AtomicUsize,
}

impl LoadingCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.pending.load(Ordering::SeqCst) > 0
    }

    pub fn pending(&self) -> usize {
        self.pending.load(Ordering::SeqCst)
    }
}

impl LoadingIndicator for LoadingCounter {
    fn show(&self) {
        self.pending.fetch_add(1, Ordering::SeqCst);
    }

    fn hide(&self) {
        // 不允许减到负数
        let _ = self
            .pending
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
    }
}

/// 作用域守卫：创建时 `show`，析构时 `hide`
///
/// 请求 future 被中途丢弃时也能保证 `hide` 被调用
pub struct LoadingGuard {
    indicator: Arc<dyn LoadingIndicator>,
}

impl LoadingGuard {
    pub fn new(indicator: Arc<dyn LoadingIndicator>) -> Self {
        indicator.show();
        Self { indicator }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.indicator.hide();
    }
}
