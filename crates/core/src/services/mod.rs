pub mod chart_service;
pub mod filter_service;
pub mod mail_service;
pub mod portfolio_service;
pub mod ticker_service;
