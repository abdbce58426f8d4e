use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;

use fintech_core::{validation, CoreError};

use crate::app::AppState;
use crate::error::ApiResult;

#[derive(Deserialize)]
struct HistoryQuery {
    start: String,
    /// Defaults to today when omitted.
    end: Option<String>,
}

#[derive(Deserialize)]
struct SendGraphQuery {
    email: String,
    start: String,
    end: Option<String>,
}

/// Validate the request, drop requested tickers that are not saved in
/// the portfolio, and render the chart for whatever remains.
///
/// The soft-skip is deliberate: a five-ticker request where one symbol
/// was never saved still yields a four-ticker chart. Only when nothing
/// remains does the request fail.
async fn render_chart(
    state: &AppState,
    ticker_list: &str,
    start: &str,
    end: Option<&str>,
) -> Result<PathBuf, CoreError> {
    let requested = validation::parse_ticker_list(ticker_list)?;
    let (start, end) = validation::parse_date_range(start, end)?;

    let tracked = state.portfolio_service.retain_tracked(&requested)?;
    state.chart_service.render_history(&tracked, start, end).await
}

async fn history_graph(
    State(state): State<Arc<AppState>>,
    Path(ticker_list): Path<String>,
    Query(q): Query<HistoryQuery>,
) -> ApiResult<impl IntoResponse> {
    let path = render_chart(&state, &ticker_list, &q.start, q.end.as_deref()).await?;

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|e| CoreError::Render(format!("cannot read rendered chart: {e}")))?;
    Ok(([(header::CONTENT_TYPE, "image/png")], bytes))
}

async fn send_graph(
    State(state): State<Arc<AppState>>,
    Path(ticker_list): Path<String>,
    Query(q): Query<SendGraphQuery>,
) -> ApiResult<Json<String>> {
    validation::validate_email(&q.email)?;

    let notifier = state
        .notifier
        .as_ref()
        .ok_or_else(|| CoreError::Mail("mail sender is not configured".to_string()))?;

    let path = render_chart(&state, &ticker_list, &q.start, q.end.as_deref()).await?;

    notifier
        .send(
            &q.email,
            "Your ticker history graph",
            "Here's the history graph for your tickers. Enjoy!",
            &path,
        )
        .await?;

    Ok(Json("Email sent successfully.".to_string()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/graphs/tickers/{ticker_list}/history", get(history_graph))
        .route(
            "/graphs/tickers/{ticker_list}/history/send_graph",
            post(send_graph),
        )
}
