use thiserror::Error;

/// Unified error type for the entire fintech-core library.
/// Every public function returns `Result<T, CoreError>`.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Portfolio store ─────────────────────────────────────────────
    /// The backing portfolio file is absent or unreadable. This is an
    /// infrastructure fault, not a business outcome.
    #[error("Portfolio store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Ticker {0} already exists in the portfolio")]
    DuplicateSymbol(String),

    #[error("Ticker {0} not found in the portfolio")]
    SymbolNotFound(String),

    // ── Input validation ────────────────────────────────────────────
    /// The market data provider has no market-cap field for the symbol,
    /// so it is treated as a symbol that does not exist upstream.
    #[error("Unknown ticker: {0}")]
    UnknownTicker(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid range: start date {start} is after end date {end}")]
    InvalidDateRange { start: String, end: String },

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Expected between 1 and 5 tickers, got {0}")]
    InvalidTickerCount(usize),

    #[error("None of the given tickers is saved in the portfolio")]
    NoTrackedTickers,

    // ── API / Network ───────────────────────────────────────────────
    #[error("API error ({provider}): {message}")]
    Api {
        provider: String,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    // ── Rendering / Dispatch ────────────────────────────────────────
    #[error("Chart rendering failed: {0}")]
    Render(String),

    #[error("Email dispatch failed: {0}")]
    Mail(String),
}

impl CoreError {
    /// Whether this error is an expected caller/business outcome (4xx
    /// territory) as opposed to an infrastructure fault.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            CoreError::DuplicateSymbol(_)
                | CoreError::SymbolNotFound(_)
                | CoreError::UnknownTicker(_)
                | CoreError::InvalidDate(_)
                | CoreError::InvalidDateRange { .. }
                | CoreError::InvalidEmail(_)
                | CoreError::InvalidTickerCount(_)
                | CoreError::NoTrackedTickers
        )
    }
}

// ── Conversion helpers (From impls) ─────────────────────────────────

impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::StoreUnavailable(e.to_string())
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(e: reqwest::Error) -> Self {
        // Sanitize error message: strip query parameters from URLs so
        // crumb/cookie material never ends up in logs.
        let msg = e.to_string();
        let sanitized = if let Some(idx) = msg.find('?') {
            format!("{}?<query redacted>", &msg[..idx])
        } else {
            msg
        };
        CoreError::Network(sanitized)
    }
}
