pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;
pub mod validation;

pub use errors::CoreError;
pub use validation::MAX_GRAPH_TICKERS;
