//! 通用 API 响应模型
//!
//! 定义统一的 API 响应格式

use chrono::Utc;
use chrono_tz::Europe::Vilnius;
use serde::{Deserialize, Serialize};

use crate::error::ErrorKind;

/// 获取维尔纽斯当地时间（汇率发布时区）
pub fn get_vilnius_time() -> chrono::DateTime<chrono_tz::Tz> {
    Utc::now().with_timezone(&Vilnius)
}

/// 统一 API 响应结构
///
/// 所有接口返回统一格式，包含：
/// - success: 请求是否成功
/// - data: 响应数据（失败时也可能携带已清空的视图）
/// - message: 响应消息
/// - error_kind: 错误分类（成功时为空）
/// - timestamp: 响应时间戳（维尔纽斯时间，RFC 3339）
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: String,
    #[serde(default)]
    pub error_kind: Option<ErrorKind>,
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: "Success".to_string(),
            error_kind: None,
            timestamp: get_vilnius_time().to_rfc3339(),
        }
    }

    /// 创建错误响应
    pub fn error(kind: ErrorKind, message: String) -> Self {
        Self {
            success: false,
            data: None,
            message,
            error_kind: Some(kind),
            timestamp: get_vilnius_time().to_rfc3339(),
        }
    }

    /// 创建带数据的错误响应
    ///
    /// 查询失败时仍返回已清空的视图，前端据此清空表格和图表
    pub fn failure_with(kind: ErrorKind, message: String, data: T) -> Self {
        Self {
            data: Some(data),
            ..Self::error(kind, message)
        }
    }
}
