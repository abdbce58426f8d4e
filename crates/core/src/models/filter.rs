use serde::Deserialize;

/// The optional predicate set used when listing portfolio tickers.
///
/// Each constraint is independently optional; an empty filter matches
/// everything. Deserializes straight from an HTTP query string, so the
/// field names are part of the public API surface.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TickerFilter {
    pub market_cap_min: Option<f64>,
    pub market_cap_max: Option<f64>,
    pub country: Option<String>,
    pub sector: Option<String>,
    pub exchange: Option<String>,
}

impl TickerFilter {
    /// True when no constraint is set at all.
    pub fn is_empty(&self) -> bool {
        self.market_cap_min.is_none()
            && self.market_cap_max.is_none()
            && self.country.is_none()
            && self.sector.is_none()
            && self.exchange.is_none()
    }
}
