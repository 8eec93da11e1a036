pub mod calculator;
pub mod health;
pub mod history;

use std::sync::{Arc, OnceLock};

use actix_web::{http::StatusCode, web, HttpResponse};
use regex::Regex;
use serde::Serialize;

use crate::config::AppConfig;
use crate::error::{ErrorKind, FetchError, ValidationError};
use crate::models::ApiResponse;
use crate::services::controller::QueryController;
use crate::services::fx_client::RateSource;
use crate::services::indicator::LoadingCounter;

/// 各 worker 共享的应用状态
pub struct AppState {
    pub controller: Arc<QueryController>,
    pub source: Arc<dyn RateSource>,
    pub indicator: Arc<LoadingCounter>,
    pub config: AppConfig,
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::config)
            .configure(history::config)
            .configure(calculator::config),
    );
}

/// 校验并规范化货币代码（三位大写字母）
pub fn validate_currency(code: &str) -> Result<String, ValidationError> {
    static CURRENCY_RE: OnceLock<Regex> = OnceLock::new();
    let re = CURRENCY_RE.get_or_init(|| Regex::new(r"^[A-Z]{3}$").expect("货币代码正则无效"));

    let code = code.trim().to_uppercase();
    if re.is_match(&code) {
        Ok(code)
    } else {
        Err(ValidationError::InvalidCurrency(code))
    }
}

/// 错误分类对应的 HTTP 状态码
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::Validation | ErrorKind::BadRequest => StatusCode::BAD_REQUEST,
        ErrorKind::NotFound => StatusCode::NOT_FOUND,
        ErrorKind::Transport => StatusCode::BAD_GATEWAY,
    }
}

/// 表单校验失败
pub fn validation_response<T: Serialize>(e: ValidationError) -> HttpResponse {
    HttpResponse::BadRequest().json(ApiResponse::<T>::error(ErrorKind::Validation, e.to_string()))
}

/// 上游调用失败
pub fn fetch_error_response<T: Serialize>(e: &FetchError) -> HttpResponse {
    HttpResponse::build(status_for(e.kind()))
        .json(ApiResponse::<T>::error(e.kind(), e.user_message().to_string()))
}
