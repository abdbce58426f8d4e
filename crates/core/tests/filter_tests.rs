// ═══════════════════════════════════════════════════════════════════
// Filter Engine Tests — predicate evaluation and selection over a
// mocked market data gateway
// ═══════════════════════════════════════════════════════════════════

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::HashMap;
use std::sync::Arc;

use fintech_core::errors::CoreError;
use fintech_core::models::filter::TickerFilter;
use fintech_core::models::history::{DailyRange, Dividend, PricePoint};
use fintech_core::models::profile::TickerProfile;
use fintech_core::providers::traits::MarketDataProvider;
use fintech_core::services::filter_service::{matches, FilterService};

// ═══════════════════════════════════════════════════════════════════
// Mock gateway
// ═══════════════════════════════════════════════════════════════════

struct MockMarketData {
    profiles: HashMap<String, TickerProfile>,
}

impl MockMarketData {
    fn new(profiles: &[(&str, TickerProfile)]) -> Self {
        Self {
            profiles: profiles
                .iter()
                .map(|(s, p)| (s.to_string(), p.clone()))
                .collect(),
        }
    }
}

#[async_trait]
impl MarketDataProvider for MockMarketData {
    fn name(&self) -> &str {
        "MockMarketData"
    }

    async fn profile(&self, symbol: &str) -> Result<TickerProfile, CoreError> {
        Ok(self.profiles.get(symbol).cloned().unwrap_or_default())
    }

    async fn close_history(
        &self,
        _symbol: &str,
        _from: NaiveDate,
        _to: NaiveDate,
    ) -> Result<Vec<PricePoint>, CoreError> {
        Ok(vec![])
    }

    async fn daily_high_low(
        &self,
        _symbol: &str,
        _range: &str,
    ) -> Result<Vec<DailyRange>, CoreError> {
        Ok(vec![])
    }

    async fn dividend_history(&self, _symbol: &str) -> Result<Vec<Dividend>, CoreError> {
        Ok(vec![])
    }
}

fn tesla() -> TickerProfile {
    TickerProfile {
        country: Some("United States".into()),
        sector: Some("Consumer Cyclical".into()),
        exchange: Some("NMS".into()),
        market_cap: Some(6e11),
        forward_pe: Some(55.0),
        last_dividend_value: None,
    }
}

fn apple() -> TickerProfile {
    TickerProfile {
        country: Some("United States".into()),
        sector: Some("Technology".into()),
        exchange: Some("NMS".into()),
        market_cap: Some(2e12),
        forward_pe: Some(28.0),
        last_dividend_value: Some(0.24),
    }
}

fn filter() -> TickerFilter {
    TickerFilter::default()
}

// ═══════════════════════════════════════════════════════════════════
// matches — per-predicate rules
// ═══════════════════════════════════════════════════════════════════

mod predicate_rules {
    use super::*;

    #[test]
    fn empty_filter_matches_everything() {
        assert!(matches(&tesla(), &filter()));
        assert!(matches(&TickerProfile::default(), &filter()));
    }

    #[test]
    fn country_must_match_exactly() {
        let f = TickerFilter {
            country: Some("United States".into()),
            ..filter()
        };
        assert!(matches(&tesla(), &f));

        let f = TickerFilter {
            country: Some("Germany".into()),
            ..filter()
        };
        assert!(!matches(&tesla(), &f));
    }

    #[test]
    fn country_is_case_sensitive() {
        let f = TickerFilter {
            country: Some("united states".into()),
            ..filter()
        };
        assert!(!matches(&tesla(), &f));
    }

    #[test]
    fn missing_country_soft_passes() {
        let mut profile = tesla();
        profile.country = None;
        let f = TickerFilter {
            country: Some("Germany".into()),
            ..filter()
        };
        assert!(matches(&profile, &f));
    }

    #[test]
    fn sector_must_match_exactly() {
        let f = TickerFilter {
            sector: Some("Technology".into()),
            ..filter()
        };
        assert!(matches(&apple(), &f));
        assert!(!matches(&tesla(), &f));
    }

    #[test]
    fn missing_sector_soft_passes() {
        let mut profile = apple();
        profile.sector = None;
        let f = TickerFilter {
            sector: Some("Technology".into()),
            ..filter()
        };
        assert!(matches(&profile, &f));
    }

    #[test]
    fn exchange_must_match_the_record_code_exactly() {
        let f = TickerFilter {
            exchange: Some("NMS".into()),
            ..filter()
        };
        assert!(matches(&tesla(), &f));

        let f = TickerFilter {
            exchange: Some("NYQ".into()),
            ..filter()
        };
        assert!(!matches(&tesla(), &f));
    }

    #[test]
    fn missing_exchange_soft_passes() {
        let mut profile = tesla();
        profile.exchange = None;
        let f = TickerFilter {
            exchange: Some("NYQ".into()),
            ..filter()
        };
        assert!(matches(&profile, &f));
    }
}

// ═══════════════════════════════════════════════════════════════════
// matches — market cap precedence
// ═══════════════════════════════════════════════════════════════════

mod market_cap_rules {
    use super::*;

    #[test]
    fn min_only_rejects_below() {
        let f = TickerFilter {
            market_cap_min: Some(1e12),
            ..filter()
        };
        assert!(!matches(&tesla(), &f)); // 6e11 < 1e12
        assert!(matches(&apple(), &f)); // 2e12 ≥ 1e12
    }

    #[test]
    fn max_only_rejects_above() {
        let f = TickerFilter {
            market_cap_max: Some(1e12),
            ..filter()
        };
        assert!(matches(&tesla(), &f));
        assert!(!matches(&apple(), &f));
    }

    #[test]
    fn min_and_max_form_a_window() {
        let f = TickerFilter {
            market_cap_min: Some(1e11),
            market_cap_max: Some(1e12),
            ..filter()
        };
        assert!(matches(&tesla(), &f)); // inside
        assert!(!matches(&apple(), &f)); // above
    }

    #[test]
    fn boundary_values_are_inclusive() {
        let f = TickerFilter {
            market_cap_min: Some(6e11),
            market_cap_max: Some(6e11),
            ..filter()
        };
        assert!(matches(&tesla(), &f));
    }

    #[test]
    fn missing_cap_skips_cap_predicates_entirely() {
        // A record with no market cap is NOT rejected by cap filters —
        // this differs from the soft-pass rule and must stay that way.
        let mut profile = tesla();
        profile.market_cap = None;

        let f = TickerFilter {
            market_cap_min: Some(1e12),
            ..filter()
        };
        assert!(matches(&profile, &f));

        let f = TickerFilter {
            market_cap_min: Some(1e11),
            market_cap_max: Some(1e12),
            ..filter()
        };
        assert!(matches(&profile, &f));
    }
}

// ═══════════════════════════════════════════════════════════════════
// select — end to end over the mock gateway
// ═══════════════════════════════════════════════════════════════════

mod select {
    use super::*;

    fn service() -> FilterService {
        FilterService::new(Arc::new(MockMarketData::new(&[
            ("TSLA", tesla()),
            ("AAPL", apple()),
        ])))
    }

    fn store() -> Vec<String> {
        vec!["TSLA".to_string(), "AAPL".to_string()]
    }

    #[tokio::test]
    async fn min_cap_keeps_both_large_caps() {
        let f = TickerFilter {
            market_cap_min: Some(1e11),
            ..filter()
        };
        let selected = service().select(&store(), &f).await.unwrap();
        assert_eq!(selected, vec!["TSLA", "AAPL"]);
    }

    #[tokio::test]
    async fn low_max_cap_empties_the_selection() {
        let f = TickerFilter {
            market_cap_max: Some(1e11),
            ..filter()
        };
        let selected = service().select(&store(), &f).await.unwrap();
        assert!(selected.is_empty());
    }

    #[tokio::test]
    async fn selection_preserves_store_order() {
        let f = TickerFilter {
            country: Some("United States".into()),
            ..filter()
        };
        let symbols = vec!["AAPL".to_string(), "TSLA".to_string()];
        let selected = service().select(&symbols, &f).await.unwrap();
        assert_eq!(selected, vec!["AAPL", "TSLA"]);
    }

    #[tokio::test]
    async fn trailing_whitespace_in_predicates_is_trimmed() {
        let f = TickerFilter {
            country: Some("United States ".into()),
            ..filter()
        };
        let selected = service().select(&store(), &f).await.unwrap();
        assert_eq!(selected, vec!["TSLA", "AAPL"]);
    }

    #[tokio::test]
    async fn lowercase_exchange_predicate_is_accepted() {
        let f = TickerFilter {
            exchange: Some("nms".into()),
            ..filter()
        };
        let selected = service().select(&store(), &f).await.unwrap();
        assert_eq!(selected, vec!["TSLA", "AAPL"]);
    }

    #[tokio::test]
    async fn sector_predicate_narrows_the_selection() {
        let f = TickerFilter {
            sector: Some("Technology".into()),
            ..filter()
        };
        let selected = service().select(&store(), &f).await.unwrap();
        assert_eq!(selected, vec!["AAPL"]);
    }

    #[tokio::test]
    async fn unknown_symbol_gets_an_empty_profile_and_soft_passes() {
        // The mock returns a default (all-None) profile for symbols it
        // does not know, mirroring the gateway contract.
        let f = TickerFilter {
            country: Some("Germany".into()),
            ..filter()
        };
        let symbols = vec!["NOPE".to_string()];
        let selected = service().select(&symbols, &f).await.unwrap();
        assert_eq!(selected, vec!["NOPE"]);
    }
}
