use async_trait::async_trait;
use chrono::{Datelike, NaiveDate};
use reqwest::{header, Client};
use serde::Deserialize;
use std::time::Duration;
use time::OffsetDateTime;
use tokio::sync::RwLock;

use super::traits::MarketDataProvider;
use crate::errors::CoreError;
use crate::models::history::{DailyRange, Dividend, PricePoint};
use crate::models::profile::TickerProfile;

const QUOTE_SUMMARY_URL: &str = "https://query1.finance.yahoo.com/v10/finance/quoteSummary";
const CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";

/// Yahoo Finance gateway.
///
/// - **Free**: No API key required.
/// - **Coverage**: Global equities, ETFs, indices, mutual funds.
///
/// Two upstream surfaces are involved:
/// - the `quoteSummary` JSON endpoint for the descriptive profile
///   (country, sector, exchange, market cap, forward P/E, dividends),
///   which requires a session cookie + crumb token;
/// - the chart endpoints wrapped by the `yahoo_finance_api` crate for
///   price/dividend history.
///
/// The crumb is cached per provider instance and refreshed once on an
/// authorization failure. It lives inside the instance rather than in
/// process-global state so two providers never share a session.
pub struct YahooMarketData {
    connector: yahoo_finance_api::YahooConnector,
    client: Client,
    crumb: RwLock<Option<CrumbSession>>,
}

#[derive(Clone)]
struct CrumbSession {
    cookie: String,
    crumb: String,
}

// ── quoteSummary response types ─────────────────────────────────────

#[derive(Deserialize)]
struct QuoteSummaryEnvelope {
    #[serde(rename = "quoteSummary")]
    quote_summary: QuoteSummaryBody,
}

#[derive(Deserialize)]
struct QuoteSummaryBody {
    result: Option<Vec<QuoteSummaryNode>>,
}

#[derive(Deserialize)]
struct QuoteSummaryNode {
    #[serde(rename = "summaryProfile")]
    summary_profile: Option<SummaryProfile>,
    price: Option<PriceModule>,
    #[serde(rename = "summaryDetail")]
    summary_detail: Option<SummaryDetail>,
    #[serde(rename = "defaultKeyStatistics")]
    key_statistics: Option<KeyStatistics>,
}

#[derive(Deserialize)]
struct SummaryProfile {
    country: Option<String>,
    sector: Option<String>,
}

#[derive(Deserialize)]
struct PriceModule {
    exchange: Option<String>,
    #[serde(rename = "marketCap")]
    market_cap: Option<RawValue>,
}

#[derive(Deserialize)]
struct SummaryDetail {
    #[serde(rename = "forwardPE")]
    forward_pe: Option<RawValue>,
}

#[derive(Deserialize)]
struct KeyStatistics {
    #[serde(rename = "lastDividendValue")]
    last_dividend_value: Option<RawValue>,
}

/// Yahoo wraps every numeric field as `{ "raw": ..., "fmt": ... }`,
/// and sometimes sends an empty object instead.
#[derive(Deserialize)]
struct RawValue {
    raw: Option<f64>,
}

impl RawValue {
    fn raw(v: Option<Self>) -> Option<f64> {
        v.and_then(|r| r.raw)
    }
}

impl YahooMarketData {
    pub fn new() -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new().map_err(|e| CoreError::Api {
            provider: "Yahoo Finance".into(),
            message: format!("Failed to create connector: {e}"),
        })?;
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Ok(Self {
            connector,
            client,
            crumb: RwLock::new(None),
        })
    }

    fn api_error(&self, message: String) -> CoreError {
        CoreError::Api {
            provider: "Yahoo Finance".into(),
            message,
        }
    }

    /// Obtain a fresh session cookie and crumb token.
    async fn fetch_crumb(&self) -> Result<CrumbSession, CoreError> {
        let response = self.client.get(COOKIE_URL).send().await?;
        let cookie = response
            .headers()
            .get(header::SET_COOKIE)
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.split_once(';').map(|(value, _)| value))
            .ok_or_else(|| self.api_error("No session cookie in crumb handshake".into()))?
            .to_string();

        let crumb = self
            .client
            .get(CRUMB_URL)
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &cookie)
            .send()
            .await?
            .text()
            .await?;

        if crumb.is_empty() || crumb.contains('{') {
            return Err(self.api_error("Crumb handshake returned no token".into()));
        }

        Ok(CrumbSession { cookie, crumb })
    }

    /// Return the cached session, fetching one on first use.
    async fn session(&self) -> Result<CrumbSession, CoreError> {
        if let Some(session) = self.crumb.read().await.as_ref() {
            return Ok(session.clone());
        }
        let fresh = self.fetch_crumb().await?;
        *self.crumb.write().await = Some(fresh.clone());
        Ok(fresh)
    }

    async fn quote_summary(
        &self,
        symbol: &str,
        session: &CrumbSession,
    ) -> Result<reqwest::Response, CoreError> {
        let url = format!("{QUOTE_SUMMARY_URL}/{symbol}");
        let resp = self
            .client
            .get(url)
            .query(&[
                (
                    "modules",
                    "summaryProfile,price,summaryDetail,defaultKeyStatistics",
                ),
                ("crumb", session.crumb.as_str()),
            ])
            .header(header::USER_AGENT, USER_AGENT)
            .header(header::COOKIE, &session.cookie)
            .send()
            .await?;
        Ok(resp)
    }

    /// Convert a `chrono::NaiveDate` to `time::OffsetDateTime` (midnight UTC),
    /// the timestamp type the `yahoo_finance_api` crate expects.
    fn to_offset_datetime(date: NaiveDate) -> Result<OffsetDateTime, CoreError> {
        let month = time::Month::try_from(date.month() as u8).map_err(|e| CoreError::Api {
            provider: "Yahoo Finance".into(),
            message: format!("Invalid month in {date}: {e}"),
        })?;

        let odt = time::Date::from_calendar_date(date.year(), month, date.day() as u8)
            .map_err(|e| CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Invalid date {date}: {e}"),
            })?
            .with_hms(0, 0, 0)
            .map_err(|e| CoreError::Api {
                provider: "Yahoo Finance".into(),
                message: format!("Invalid time for {date}: {e}"),
            })?
            .assume_utc();
        Ok(odt)
    }

    /// Convert a unix timestamp (seconds) to `chrono::NaiveDate`.
    fn timestamp_to_naive_date(ts: i64) -> Option<NaiveDate> {
        chrono::DateTime::from_timestamp(ts, 0).map(|dt| dt.date_naive())
    }
}

#[async_trait]
impl MarketDataProvider for YahooMarketData {
    fn name(&self) -> &str {
        "Yahoo Finance"
    }

    async fn profile(&self, symbol: &str) -> Result<TickerProfile, CoreError> {
        let mut session = self.session().await?;
        let mut resp = self.quote_summary(symbol, &session).await?;

        // A stale crumb comes back as 401/403; re-handshake once.
        if resp.status() == reqwest::StatusCode::UNAUTHORIZED
            || resp.status() == reqwest::StatusCode::FORBIDDEN
        {
            session = self.fetch_crumb().await?;
            *self.crumb.write().await = Some(session.clone());
            resp = self.quote_summary(symbol, &session).await?;
        }

        // Yahoo answers 404 for symbols it has never heard of; that is
        // an empty profile, not a fault.
        if resp.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(TickerProfile::default());
        }
        if !resp.status().is_success() {
            return Err(self.api_error(format!(
                "quoteSummary for {symbol} failed with status {}",
                resp.status()
            )));
        }

        let envelope: QuoteSummaryEnvelope = resp
            .json()
            .await
            .map_err(|e| self.api_error(format!("Failed to parse quoteSummary for {symbol}: {e}")))?;

        let node = match envelope.quote_summary.result.and_then(|mut r| {
            if r.is_empty() {
                None
            } else {
                Some(r.remove(0))
            }
        }) {
            Some(node) => node,
            None => return Ok(TickerProfile::default()),
        };

        let (country, sector) = node
            .summary_profile
            .map(|p| (p.country, p.sector))
            .unwrap_or((None, None));
        let (exchange, market_cap) = node
            .price
            .map(|p| (p.exchange, RawValue::raw(p.market_cap)))
            .unwrap_or((None, None));

        Ok(TickerProfile {
            country,
            sector,
            exchange,
            market_cap,
            forward_pe: node
                .summary_detail
                .and_then(|d| RawValue::raw(d.forward_pe)),
            last_dividend_value: node
                .key_statistics
                .and_then(|k| RawValue::raw(k.last_dividend_value)),
        })
    }

    async fn close_history(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError> {
        let start = Self::to_offset_datetime(from)?;
        let end = Self::to_offset_datetime(to + chrono::Duration::days(1))?; // inclusive end

        let resp = self
            .connector
            .get_quote_history(symbol, start, end)
            .await
            .map_err(|e| {
                self.api_error(format!("Failed to fetch history range for {symbol}: {e}"))
            })?;

        let quotes = resp
            .quotes()
            .map_err(|e| self.api_error(format!("Failed to parse quotes for {symbol}: {e}")))?;

        let points: Vec<PricePoint> = quotes
            .iter()
            .filter_map(|q| {
                let date = Self::timestamp_to_naive_date(q.timestamp)?;
                if date >= from && date <= to {
                    Some(PricePoint {
                        date,
                        close: q.close,
                    })
                } else {
                    None
                }
            })
            .collect();

        Ok(points)
    }

    async fn daily_high_low(
        &self,
        symbol: &str,
        range: &str,
    ) -> Result<Vec<DailyRange>, CoreError> {
        let resp = self
            .connector
            .get_quote_range(symbol, "1d", range)
            .await
            .map_err(|e| {
                self.api_error(format!(
                    "Failed to fetch {range} high/low history for {symbol}: {e}"
                ))
            })?;

        let quotes = resp
            .quotes()
            .map_err(|e| self.api_error(format!("Failed to parse quotes for {symbol}: {e}")))?;

        let spans: Vec<DailyRange> = quotes
            .iter()
            .filter_map(|q| {
                let date = Self::timestamp_to_naive_date(q.timestamp)?;
                Some(DailyRange {
                    date,
                    low: q.low,
                    high: q.high,
                })
            })
            .collect();

        Ok(spans)
    }

    async fn dividend_history(&self, symbol: &str) -> Result<Vec<Dividend>, CoreError> {
        let resp = self
            .connector
            .get_quote_range(symbol, "1d", "max")
            .await
            .map_err(|e| {
                self.api_error(format!("Failed to fetch dividend history for {symbol}: {e}"))
            })?;

        let dividends = resp
            .dividends()
            .map_err(|e| self.api_error(format!("Failed to parse dividends for {symbol}: {e}")))?;

        let mut payouts: Vec<Dividend> = dividends
            .iter()
            .filter_map(|d| {
                let date = Self::timestamp_to_naive_date(d.date as i64)?;
                Some(Dividend {
                    date,
                    amount: d.amount,
                })
            })
            .collect();

        payouts.sort_by_key(|d| d.date);
        Ok(payouts)
    }
}
