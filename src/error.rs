//! 错误类型
//!
//! - `FetchError`：上游汇率服务调用失败，在控制器/计算器处被拦截并分类
//! - `ValidationError`：表单层参数校验失败，不进入数据管线

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 错误分类，用于前端错误提示
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// 表单参数不合法
    Validation,
    /// 上游返回 404
    NotFound,
    /// 上游返回 400
    BadRequest,
    /// 网络或未知错误
    Transport,
}

/// 上游汇率服务调用错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FetchError {
    #[error("汇率数据不存在: {0}")]
    NotFound(String),

    #[error("请求参数错误: {0}")]
    BadRequest(String),

    #[error("上游服务返回 {status}: {message}")]
    Status { status: u16, message: String },

    #[error("网络请求失败: {0}")]
    Transport(String),

    #[error("响应解析失败: {0}")]
    Decode(String),
}

impl FetchError {
    /// 根据 HTTP 状态码构造错误
    pub fn from_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            404 => FetchError::NotFound(message),
            400 => FetchError::BadRequest(message),
            _ => FetchError::Status { status, message },
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            FetchError::NotFound(_) => ErrorKind::NotFound,
            FetchError::BadRequest(_) => ErrorKind::BadRequest,
            FetchError::Status { .. } | FetchError::Transport(_) | FetchError::Decode(_) => {
                ErrorKind::Transport
            }
        }
    }

    /// 展示给用户的错误提示
    pub fn user_message(&self) -> &'static str {
        match self.kind() {
            ErrorKind::NotFound => "Currency data not found.",
            ErrorKind::BadRequest => "Bad request: fields are not filled correctly.",
            _ => "Unknown error.",
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        match e.status() {
            Some(status) => FetchError::from_status(status.as_u16(), e.to_string()),
            None if e.is_decode() => FetchError::Decode(e.to_string()),
            None => FetchError::Transport(e.to_string()),
        }
    }
}

impl From<serde_json::Error> for FetchError {
    fn from(e: serde_json::Error) -> Self {
        FetchError::Decode(e.to_string())
    }
}

/// 表单参数校验错误
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("无效的货币代码: {0}")]
    InvalidCurrency(String),

    #[error("开始日期 {from} 晚于结束日期 {to}")]
    InvertedRange { from: String, to: String },

    #[error("每页条数必须在 1 到 {max} 之间，当前为 {actual}")]
    InvalidPageSize { actual: usize, max: usize },

    #[error("无效的金额: {0}")]
    InvalidAmount(f64),
}
