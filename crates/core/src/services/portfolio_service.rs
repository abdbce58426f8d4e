use std::sync::Arc;

use crate::errors::CoreError;
use crate::providers::traits::MarketDataProvider;
use crate::storage::portfolio_file::PortfolioFile;

/// Manages portfolio membership: add, delete, enumerate.
///
/// Symbol validity is checked lazily against the gateway when adding —
/// a symbol counts as real iff its record carries a market-cap field.
/// Deletion and listing never touch the gateway.
pub struct PortfolioService {
    store: Arc<PortfolioFile>,
    gateway: Arc<dyn MarketDataProvider>,
}

impl PortfolioService {
    pub fn new(store: Arc<PortfolioFile>, gateway: Arc<dyn MarketDataProvider>) -> Self {
        Self { store, gateway }
    }

    /// Validate the symbol against the gateway and append it to the
    /// store. Returns the normalized (uppercase) symbol.
    pub async fn add_ticker(&self, symbol: &str) -> Result<String, CoreError> {
        let normalized = symbol.trim().to_uppercase();

        let profile = self.gateway.profile(&normalized).await?;
        if profile.market_cap.is_none() {
            tracing::warn!(ticker = %normalized, "add rejected: no market cap reported upstream");
            return Err(CoreError::UnknownTicker(normalized));
        }

        self.store.add(&normalized)?;
        tracing::info!(ticker = %normalized, "ticker added to portfolio");
        Ok(normalized)
    }

    /// Remove a symbol from the store. Returns the normalized symbol.
    pub fn remove_ticker(&self, symbol: &str) -> Result<String, CoreError> {
        let normalized = symbol.trim().to_uppercase();
        self.store.remove(&normalized)?;
        tracing::info!(ticker = %normalized, "ticker removed from portfolio");
        Ok(normalized)
    }

    /// All saved symbols in storage order.
    pub fn list_tickers(&self) -> Result<Vec<String>, CoreError> {
        self.store.list()
    }

    /// Keep only the symbols currently saved in the portfolio,
    /// preserving order. Symbols that were never saved are dropped
    /// silently; only when nothing remains does the request fail with
    /// `NoTrackedTickers`.
    pub fn retain_tracked(&self, symbols: &[String]) -> Result<Vec<String>, CoreError> {
        let mut tracked = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            if self.store.contains(symbol)? {
                tracked.push(symbol.clone());
            } else {
                tracing::debug!(ticker = %symbol, "dropping unsaved ticker from request");
            }
        }
        if tracked.is_empty() {
            return Err(CoreError::NoTrackedTickers);
        }
        Ok(tracked)
    }
}
