use std::sync::Arc;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use fintech_core::providers::traits::MarketDataProvider;
use fintech_core::providers::yahoo_finance::YahooMarketData;
use fintech_core::services::chart_service::ChartService;
use fintech_core::services::filter_service::FilterService;
use fintech_core::services::mail_service::{Notifier, SmtpNotifier};
use fintech_core::services::portfolio_service::PortfolioService;
use fintech_core::services::ticker_service::TickerService;
use fintech_core::storage::portfolio_file::PortfolioFile;

use crate::config::Config;

pub struct AppState {
    pub portfolio_service: PortfolioService,
    pub filter_service: FilterService,
    pub ticker_service: TickerService,
    pub chart_service: ChartService,
    /// Absent when SMTP is not configured; the send_graph endpoint
    /// then reports the sender as unavailable.
    pub notifier: Option<Arc<dyn Notifier>>,
}

pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(true))
        .init();
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let store = Arc::new(PortfolioFile::open(&config.portfolio_file));
    store.ensure_exists()?;
    tracing::info!("Portfolio file in use: {}", config.portfolio_file);

    let gateway: Arc<dyn MarketDataProvider> = Arc::new(YahooMarketData::new()?);

    let notifier: Option<Arc<dyn Notifier>> = match &config.mail {
        Some(mail) => Some(Arc::new(SmtpNotifier::new(mail.clone())?)),
        None => {
            tracing::warn!("SMTP not configured; send_graph will be unavailable");
            None
        }
    };

    Ok(Arc::new(AppState {
        portfolio_service: PortfolioService::new(store.clone(), gateway.clone()),
        filter_service: FilterService::new(gateway.clone()),
        ticker_service: TickerService::new(store, gateway.clone()),
        chart_service: ChartService::new(gateway, &config.graphs_dir),
        notifier,
    }))
}
