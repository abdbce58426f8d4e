use serde::{Deserialize, Serialize};

/// Descriptive/financial attributes of a single ticker, as reported by
/// the market data provider.
///
/// Every field is optional: not every instrument exposes every
/// attribute (an index has no sector, a young company pays no
/// dividend). A missing field is a valid state, never an error — the
/// filtering rules in `services::filter_service` depend on being able
/// to tell "absent" apart from "present".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TickerProfile {
    /// Country of the issuer (e.g., "United States")
    pub country: Option<String>,

    /// Sector name (e.g., "Technology")
    pub sector: Option<String>,

    /// Exchange code, uppercase (e.g., "NMS", "NYQ")
    pub exchange: Option<String>,

    /// Market capitalization in the instrument's native currency.
    /// A ticker with no market cap is considered unknown/invalid when
    /// adding it to the portfolio.
    pub market_cap: Option<f64>,

    /// Forward price-to-earnings ratio
    pub forward_pe: Option<f64>,

    /// Most recent dividend amount per share
    pub last_dividend_value: Option<f64>,
}
