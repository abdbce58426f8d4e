use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::CoreError;
use crate::models::history::{DailyRange, Dividend, PricePoint};
use crate::models::profile::TickerProfile;

/// Trait abstraction for the market data gateway.
///
/// Everything the rest of the crate knows about a ticker comes through
/// this seam: the filter engine, the info lookups and the chart
/// renderer all take a `&dyn MarketDataProvider`. If the upstream API
/// changes or goes away, only the one implementation is replaced —
/// tests swap in an in-memory mock.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Fetch the descriptive/financial record for a symbol.
    ///
    /// Unknown symbols are not an error at this level: the gateway
    /// returns a profile with the fields it has, which may be none.
    /// Network and upstream failures surface as `Api`/`Network` errors.
    async fn profile(&self, symbol: &str) -> Result<TickerProfile, CoreError>;

    /// Daily close prices between two dates (inclusive), sorted by date.
    async fn close_history(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError>;

    /// Daily high/low spans for a lookback range expressed the way the
    /// upstream API expects it (e.g., "1mo", "1y").
    async fn daily_high_low(
        &self,
        symbol: &str,
        range: &str,
    ) -> Result<Vec<DailyRange>, CoreError>;

    /// Full dividend payout history for a symbol, sorted by date.
    async fn dividend_history(&self, symbol: &str) -> Result<Vec<Dividend>, CoreError>;
}
