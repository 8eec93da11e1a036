//! 业务逻辑服务模块
//!
//! 汇率历史管线、上游客户端与换算计算器

pub mod annotator;   // 涨跌计算
pub mod calculator;  // 货币换算
pub mod chart;       // 图表序列
pub mod controller;  // 查询控制器
pub mod fx_client;   // 上游汇率服务
pub mod indicator;   // 加载状态
pub mod pagination;  // 表格分页

#[cfg(test)]
pub mod testing;
