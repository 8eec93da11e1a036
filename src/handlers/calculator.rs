//! 首页接口处理器
//!
//! ## API 列表
//! - GET /currencies - 可选货币列表
//! - GET /rates/popular - 热门货币当前汇率
//! - GET /convert?from=EUR&to=USD&amount=100 - 货币换算

use std::sync::Arc;

use actix_web::{web, HttpResponse, Result};

use super::{fetch_error_response, validate_currency, validation_response, AppState};
use crate::error::ValidationError;
use crate::models::{ApiResponse, Conversion, ConvertQuery, CurrencyInfo, PopularRate};
use crate::services::calculator::{convert_amount, popular_rates};
use crate::services::indicator::{LoadingGuard, LoadingIndicator};

/// 换算表单的默认金额
const DEFAULT_AMOUNT: f64 = 100.0;

fn loading(state: &AppState) -> LoadingGuard {
    let indicator: Arc<dyn LoadingIndicator> = state.indicator.clone();
    LoadingGuard::new(indicator)
}

/// 获取可选货币列表
///
/// GET /api/v1/currencies
pub async fn list_currencies(state: web::Data<AppState>) -> Result<HttpResponse> {
    let _loading = loading(&state);

    match state.source.fetch_currency_list().await {
        Ok(currencies) => Ok(HttpResponse::Ok().json(ApiResponse::success(currencies))),
        Err(e) => {
            log::error!("加载货币列表失败: {}", e);
            Ok(fetch_error_response::<Vec<CurrencyInfo>>(&e))
        }
    }
}

/// 获取热门货币当前汇率
///
/// GET /api/v1/rates/popular
pub async fn get_popular_rates(state: web::Data<AppState>) -> Result<HttpResponse> {
    let _loading = loading(&state);
    let rate_type = state.config.upstream.current_rate_type;

    match state.source.fetch_current_rates(rate_type).await {
        Ok(entries) => Ok(HttpResponse::Ok().json(ApiResponse::success(popular_rates(&entries)))),
        Err(e) => {
            log::error!("获取 {} 当前汇率失败: {}", rate_type, e);
            Ok(fetch_error_response::<Vec<PopularRate>>(&e))
        }
    }
}

/// 货币换算
///
/// GET /api/v1/convert?from=EUR&to=USD&amount=100
pub async fn convert(
    state: web::Data<AppState>,
    query: web::Query<ConvertQuery>,
) -> Result<HttpResponse> {
    let (from, to) = match (validate_currency(&query.from), validate_currency(&query.to)) {
        (Ok(from), Ok(to)) => (from, to),
        (Err(e), _) | (_, Err(e)) => return Ok(validation_response::<Conversion>(e)),
    };

    let amount = query.amount.unwrap_or(DEFAULT_AMOUNT);
    if !amount.is_finite() || amount < 0.0 {
        return Ok(validation_response::<Conversion>(ValidationError::InvalidAmount(amount)));
    }

    let _loading = loading(&state);
    match convert_amount(state.source.as_ref(), &from, &to, amount).await {
        Ok(conversion) => Ok(HttpResponse::Ok().json(ApiResponse::success(conversion))),
        Err(e) => {
            log::error!("换算 {} -> {} 失败: {}", from, to, e);
            Ok(fetch_error_response::<Conversion>(&e))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/currencies", web::get().to(list_currencies))
        .route("/rates/popular", web::get().to(get_popular_rates))
        .route("/convert", web::get().to(convert));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::error::FetchError;
    use crate::handlers::config as routes;
    use crate::models::{CurrencyAmount, CurrentRateEntry};
    use crate::services::controller::QueryController;
    use crate::services::indicator::LoadingCounter;
    use crate::services::testing::ScriptedSource;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use serde_json::Value;

    fn app_state(source: ScriptedSource) -> web::Data<AppState> {
        let source = Arc::new(source);
        let indicator = Arc::new(LoadingCounter::new());
        let controller = Arc::new(QueryController::new(source.clone(), indicator.clone(), 10));
        web::Data::new(AppState {
            controller,
            source,
            indicator,
            config: AppConfig::default(),
        })
    }

    #[actix_web::test]
    async fn test_convert() {
        let state = app_state(ScriptedSource::new().with_cross_rate("EUR", "USD", 1.0701));
        let app = test::init_service(App::new().app_data(state.clone()).configure(routes)).await;

        let req = test::TestRequest::get().uri("/api/v1/convert?from=EUR&to=USD").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["data"]["display"], "107.01000");
        assert_eq!(body["data"]["amount"], 100.0);
        assert!(!state.indicator.is_loading());
    }

    #[actix_web::test]
    async fn test_convert_unknown_pair() {
        let app = test::init_service(
            App::new().app_data(app_state(ScriptedSource::new())).configure(routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/v1/convert?from=EUR&to=XXX&amount=5")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["message"], "Currency data not found.");
    }

    #[actix_web::test]
    async fn test_convert_rejects_negative_amount() {
        let app = test::init_service(
            App::new().app_data(app_state(ScriptedSource::new())).configure(routes),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/api/v1/convert?from=EUR&to=USD&amount=-1")
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_popular_rates_and_currencies() {
        let source = ScriptedSource::new()
            .with_currencies(&["USD", "GBP"])
            .with_current_rates(Ok(vec![CurrentRateEntry {
                currency_amounts: vec![CurrencyAmount {
                    target_currency: "USD".into(),
                    amount: Some(1.0701),
                }],
                ..CurrentRateEntry::default()
            }]));
        let app = test::init_service(App::new().app_data(app_state(source)).configure(routes)).await;

        let req = test::TestRequest::get().uri("/api/v1/rates/popular").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"][0]["name"], "USD");
        assert_eq!(body["data"][0]["rate"], 1.0701);
        assert_eq!(body["data"][1]["rate"], Value::Null);

        let req = test::TestRequest::get().uri("/api/v1/currencies").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["data"][1]["currencyCode"], "GBP");
    }

    #[actix_web::test]
    async fn test_popular_rates_upstream_failure() {
        let source = ScriptedSource::new()
            .with_current_rates(Err(FetchError::Transport("connection refused".into())));
        let app = test::init_service(App::new().app_data(app_state(source)).configure(routes)).await;

        let req = test::TestRequest::get().uri("/api/v1/rates/popular").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    }
}
