pub mod traits;

// Market data gateway implementations
pub mod yahoo_finance;
