use chrono::{NaiveDate, Utc};
use regex::Regex;
use std::sync::OnceLock;

use crate::errors::CoreError;

/// Maximum number of tickers a single history graph may cover.
pub const MAX_GRAPH_TICKERS: usize = 5;

/// Simple `local@domain.tld` shape check. ASCII only; internationalized
/// addresses are not supported.
const EMAIL_PATTERN: &str = r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9-.]+$";

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(EMAIL_PATTERN).expect("email pattern is valid"))
}

/// Parse an ISO-8601 date range.
///
/// A missing end date defaults to today. Fails with `InvalidDate` when
/// either string does not parse and `InvalidDateRange` when the end
/// precedes the start.
pub fn parse_date_range(
    start: &str,
    end: Option<&str>,
) -> Result<(NaiveDate, NaiveDate), CoreError> {
    let start_date = parse_iso_date(start)?;
    let end_date = match end {
        Some(raw) => parse_iso_date(raw)?,
        None => Utc::now().date_naive(),
    };

    if end_date < start_date {
        return Err(CoreError::InvalidDateRange {
            start: start_date.to_string(),
            end: end_date.to_string(),
        });
    }

    Ok((start_date, end_date))
}

fn parse_iso_date(raw: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|e| CoreError::InvalidDate(format!("{raw}: {e}")))
}

/// Validate a recipient email address against the documented
/// `local@domain.tld` contract.
pub fn validate_email(address: &str) -> Result<(), CoreError> {
    if email_regex().is_match(address) {
        Ok(())
    } else {
        Err(CoreError::InvalidEmail(address.to_string()))
    }
}

/// Split a whitespace-delimited ticker list into 1–5 uppercase symbols.
/// The input arrives percent-decoded from the router.
pub fn parse_ticker_list(raw: &str) -> Result<Vec<String>, CoreError> {
    let symbols: Vec<String> = raw
        .split_whitespace()
        .map(|s| s.to_uppercase())
        .collect();

    if symbols.is_empty() || symbols.len() > MAX_GRAPH_TICKERS {
        return Err(CoreError::InvalidTickerCount(symbols.len()));
    }

    Ok(symbols)
}
