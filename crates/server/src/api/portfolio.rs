use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{delete, get, post};
use axum::{Json, Router};

use fintech_core::models::filter::TickerFilter;

use crate::app::AppState;
use crate::error::ApiResult;

/// List saved tickers, optionally narrowed by market-cap range,
/// country, sector and exchange predicates.
async fn list_tickers(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<TickerFilter>,
) -> ApiResult<Json<Vec<String>>> {
    let saved = state.portfolio_service.list_tickers()?;

    // No predicates — skip the per-ticker gateway round trips
    if filter.is_empty() {
        return Ok(Json(saved));
    }

    let selected = state.filter_service.select(&saved, &filter).await?;
    Ok(Json(selected))
}

async fn add_ticker(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> ApiResult<Json<String>> {
    let added = state.portfolio_service.add_ticker(&ticker).await?;
    Ok(Json(added))
}

async fn delete_ticker(
    State(state): State<Arc<AppState>>,
    Path(ticker): Path<String>,
) -> ApiResult<Json<String>> {
    let removed = state.portfolio_service.remove_ticker(&ticker)?;
    Ok(Json(removed))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/portfolio/tickers", get(list_tickers))
        .route("/portfolio/tickers/{ticker}", post(add_ticker))
        .route("/portfolio/tickers/{ticker}", delete(delete_ticker))
}
