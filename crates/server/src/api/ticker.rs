use std::collections::BTreeMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use crate::app::AppState;
use crate::error::ApiResult;

async fn forward_pe(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> ApiResult<Json<Option<f64>>> {
    Ok(Json(state.ticker_service.forward_pe(&ticker).await?))
}

async fn market_cap(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> ApiResult<Json<Option<f64>>> {
    Ok(Json(state.ticker_service.market_cap(&ticker).await?))
}

async fn last_dividend_value(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> ApiResult<Json<Option<f64>>> {
    Ok(Json(
        state.ticker_service.last_dividend_value(&ticker).await?,
    ))
}

async fn dividends(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> ApiResult<Json<BTreeMap<String, f64>>> {
    Ok(Json(state.ticker_service.dividends(&ticker).await?))
}

#[derive(Deserialize)]
struct HighLowQuery {
    /// Lookback window in the upstream range notation, e.g. "1mo", "1y".
    period: String,
}

async fn high_low(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
    Query(q): Query<HighLowQuery>,
) -> ApiResult<Json<BTreeMap<String, (f64, f64)>>> {
    Ok(Json(state.ticker_service.high_low(&ticker, &q.period).await?))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ticker/{ticker}/price-to-earnings", get(forward_pe))
        .route("/ticker/{ticker}/market-cap", get(market_cap))
        .route("/ticker/{ticker}/last-dividend-value", get(last_dividend_value))
        .route("/ticker/{ticker}/dividends", get(dividends))
        .route("/ticker/{ticker}/high-low", get(high_low))
}
