use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A single close-price data point (date → close).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// The low/high span of one trading day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyRange {
    pub date: NaiveDate,
    pub low: f64,
    pub high: f64,
}

/// A single dividend payout (ex-date → amount per share).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dividend {
    pub date: NaiveDate,
    pub amount: f64,
}
