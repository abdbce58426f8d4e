use std::collections::BTreeMap;
use std::sync::Arc;

use crate::errors::CoreError;
use crate::models::profile::TickerProfile;
use crate::providers::traits::MarketDataProvider;
use crate::storage::portfolio_file::PortfolioFile;

/// Per-ticker attribute lookups for symbols already saved in the
/// portfolio. Querying a symbol that is not saved is `SymbolNotFound`,
/// regardless of whether the gateway knows it.
pub struct TickerService {
    store: Arc<PortfolioFile>,
    gateway: Arc<dyn MarketDataProvider>,
}

impl TickerService {
    pub fn new(store: Arc<PortfolioFile>, gateway: Arc<dyn MarketDataProvider>) -> Self {
        Self { store, gateway }
    }

    /// Forward price-to-earnings ratio, if the instrument reports one.
    pub async fn forward_pe(&self, symbol: &str) -> Result<Option<f64>, CoreError> {
        Ok(self.tracked_profile(symbol).await?.forward_pe)
    }

    /// Market capitalization, if the instrument reports one.
    pub async fn market_cap(&self, symbol: &str) -> Result<Option<f64>, CoreError> {
        Ok(self.tracked_profile(symbol).await?.market_cap)
    }

    /// Most recent dividend amount, if the instrument pays one.
    pub async fn last_dividend_value(&self, symbol: &str) -> Result<Option<f64>, CoreError> {
        Ok(self.tracked_profile(symbol).await?.last_dividend_value)
    }

    /// Full dividend history as an ISO-date → amount map
    /// (chronological by construction).
    pub async fn dividends(&self, symbol: &str) -> Result<BTreeMap<String, f64>, CoreError> {
        let normalized = self.require_tracked(symbol)?;
        let payouts = self.gateway.dividend_history(&normalized).await?;

        Ok(payouts
            .into_iter()
            .map(|d| (d.date.format("%Y-%m-%d").to_string(), d.amount))
            .collect())
    }

    /// Daily (low, high) spans over a lookback period (e.g., "1mo",
    /// "1y") as an ISO-date → (low, high) map.
    pub async fn high_low(
        &self,
        symbol: &str,
        period: &str,
    ) -> Result<BTreeMap<String, (f64, f64)>, CoreError> {
        let normalized = self.require_tracked(symbol)?;
        let spans = self.gateway.daily_high_low(&normalized, period).await?;

        Ok(spans
            .into_iter()
            .map(|s| (s.date.format("%Y-%m-%d").to_string(), (s.low, s.high)))
            .collect())
    }

    async fn tracked_profile(&self, symbol: &str) -> Result<TickerProfile, CoreError> {
        let normalized = self.require_tracked(symbol)?;
        self.gateway.profile(&normalized).await
    }

    fn require_tracked(&self, symbol: &str) -> Result<String, CoreError> {
        let normalized = symbol.trim().to_uppercase();
        if !self.store.contains(&normalized)? {
            return Err(CoreError::SymbolNotFound(normalized));
        }
        Ok(normalized)
    }
}
