use std::sync::Arc;

use crate::errors::CoreError;
use crate::models::filter::TickerFilter;
use crate::models::profile::TickerProfile;
use crate::providers::traits::MarketDataProvider;

/// The filter engine: selects the subset of saved tickers whose market
/// data record satisfies every supplied predicate.
///
/// One gateway call per ticker, in store order, no caching. Known
/// performance limitation for large portfolios; acceptable for the
/// handful of symbols a personal portfolio holds.
pub struct FilterService {
    gateway: Arc<dyn MarketDataProvider>,
}

impl FilterService {
    pub fn new(gateway: Arc<dyn MarketDataProvider>) -> Self {
        Self { gateway }
    }

    /// Evaluate the filter over `symbols`, preserving their order.
    ///
    /// Gateway failures are terminal for the whole selection — a
    /// half-filtered answer would be worse than an error.
    pub async fn select(
        &self,
        symbols: &[String],
        filter: &TickerFilter,
    ) -> Result<Vec<String>, CoreError> {
        let filter = normalize(filter);
        let mut selected = Vec::with_capacity(symbols.len());

        for symbol in symbols {
            let profile = self.gateway.profile(symbol).await?;
            if matches(&profile, &filter) {
                selected.push(symbol.clone());
            }
        }

        Ok(selected)
    }
}

/// Trim trailing whitespace left over from percent-encoded query values
/// and uppercase the exchange code (exchange codes are uppercase
/// upstream, so lowercase input is accepted as a convenience).
fn normalize(filter: &TickerFilter) -> TickerFilter {
    TickerFilter {
        market_cap_min: filter.market_cap_min,
        market_cap_max: filter.market_cap_max,
        country: filter.country.as_ref().map(|c| c.trim_end().to_string()),
        sector: filter.sector.as_ref().map(|s| s.trim_end().to_string()),
        exchange: filter
            .exchange
            .as_ref()
            .map(|e| e.trim_end().to_uppercase()),
    }
}

/// Evaluate all predicates against one profile, short-circuiting on the
/// first failure. Evaluation order: country → sector → market-cap-min →
/// market-cap-max → exchange.
///
/// Two distinct missing-field rules apply and must not be merged:
/// - country/sector/exchange: a predicate is satisfied when the record
///   lacks the field (soft-pass);
/// - market cap: when the record has no market cap, BOTH cap predicates
///   are skipped — the ticker is neither rejected nor compared.
pub fn matches(profile: &TickerProfile, filter: &TickerFilter) -> bool {
    // country filter (case-sensitive)
    if let (Some(wanted), Some(country)) = (&filter.country, &profile.country) {
        if country != wanted {
            return false;
        }
    }

    // sector filter (case-sensitive)
    if let (Some(wanted), Some(sector)) = (&filter.sector, &profile.sector) {
        if sector != wanted {
            return false;
        }
    }

    // market cap filter — skipped entirely when the record has no cap
    if let Some(cap) = profile.market_cap {
        if let Some(min) = filter.market_cap_min {
            if cap < min {
                return false;
            }
            // min passed; an upper bound narrows the window further
            if let Some(max) = filter.market_cap_max {
                if cap > max {
                    return false;
                }
            }
        } else if let Some(max) = filter.market_cap_max {
            // no lower bound given, only the ceiling matters
            if cap > max {
                return false;
            }
        }
    }

    // exchange filter (uppercased on both sides by normalize())
    if let (Some(wanted), Some(exchange)) = (&filter.exchange, &profile.exchange) {
        if exchange != wanted {
            return false;
        }
    }

    true
}
