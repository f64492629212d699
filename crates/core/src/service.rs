use crate::analysis::engine::evaluate;
use crate::analysis::error::SignalError;
use crate::analysis::moving_average::MovingAverageSet;
use crate::domain::recommendation::Recommendation;
use crate::domain::series::PriceSeries;
use crate::provider::live::{LiveQuote, LivePriceChain};
use crate::provider::PriceHistoryProvider;
use crate::time::lookback::Lookback;
use anyhow::Result;

/// Everything the presentation layer needs for one symbol.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub symbol: String,
    pub lookback: Lookback,
    pub live: Option<LiveQuote>,
    pub series: PriceSeries,
    pub averages: MovingAverageSet,
    /// `Err(DataInsufficient)` is kept here rather than failing the whole
    /// analysis, so charts and tables can still be shown.
    pub outcome: Result<Recommendation, SignalError>,
}

impl Analysis {
    pub fn current_price(&self) -> Option<f64> {
        self.live.map(|q| q.price)
    }

    pub fn recommendation(&self) -> Option<&Recommendation> {
        self.outcome.as_ref().ok()
    }
}

/// `known_quote` is a live price the caller already holds (for instance from
/// symbol resolution); without one the chain is asked.
pub async fn analyze_symbol(
    symbol: &str,
    lookback: Lookback,
    history: &dyn PriceHistoryProvider,
    live: &LivePriceChain,
    known_quote: Option<LiveQuote>,
) -> Result<Analysis> {
    let quote = match known_quote {
        Some(quote) => Some(quote),
        None => live.quote(symbol).await,
    };
    if quote.is_none() {
        tracing::info!(symbol, "no live price from any source; continuing with history only");
    }

    let provider = history.provider_name();
    let series = history
        .fetch_history(symbol, lookback)
        .await?
        .ok_or_else(|| anyhow::anyhow!("no price history available for {symbol} ({lookback}) from {provider}"))?;
    tracing::debug!(symbol, provider, points = series.len(), "price history loaded");

    Ok(build_analysis(symbol, lookback, series, quote)?)
}

pub fn build_analysis(
    symbol: &str,
    lookback: Lookback,
    series: PriceSeries,
    live: Option<LiveQuote>,
) -> Result<Analysis, SignalError> {
    let averages = MovingAverageSet::standard(&series)?;
    let outcome = evaluate(&averages, live.map(|q| q.price));

    match &outcome {
        Ok(rec) => tracing::info!(symbol, signal = %rec.signal, reasons = rec.reasons.len(), "signal evaluated"),
        Err(err) => tracing::info!(symbol, error = %err, "signal not available"),
    }

    Ok(Analysis {
        symbol: symbol.to_string(),
        lookback,
        live,
        series,
        averages,
        outcome,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::recommendation::Signal;
    use crate::domain::series::PricePoint;
    use crate::provider::live::fakes::FixedPrices;
    use chrono::{Duration, NaiveDate};
    use std::sync::Arc;

    struct FixedHistory(Option<PriceSeries>);

    #[async_trait::async_trait]
    impl PriceHistoryProvider for FixedHistory {
        fn provider_name(&self) -> &'static str {
            "fixed"
        }

        async fn fetch_history(&self, _symbol: &str, _lookback: Lookback) -> Result<Option<PriceSeries>> {
            Ok(self.0.clone())
        }
    }

    fn falling(n: i64) -> PriceSeries {
        let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let points = (0..n)
            .map(|i| PricePoint {
                date: start + Duration::days(i),
                close: 300.0 - i as f64,
            })
            .collect();
        PriceSeries::new("DOWN", points).unwrap()
    }

    #[tokio::test]
    async fn analysis_combines_live_price_and_history() {
        let history = FixedHistory(Some(falling(120)));
        let live = LivePriceChain::new().with_source(Arc::new(FixedPrices::new("t", &[("DOWN", 150.0)])));
        let analysis = analyze_symbol("DOWN", Lookback::OneYear, &history, &live, None).await.unwrap();
        assert_eq!(analysis.current_price(), Some(150.0));
        assert_eq!(analysis.averages.len(), 120);
        assert_eq!(analysis.recommendation().unwrap().signal, Signal::Sell);
    }

    #[tokio::test]
    async fn short_history_keeps_data_insufficient_outcome() {
        let history = FixedHistory(Some(falling(30)));
        let live = LivePriceChain::new();
        let analysis = analyze_symbol("DOWN", Lookback::OneYear, &history, &live, None).await.unwrap();
        assert!(matches!(analysis.outcome, Err(SignalError::DataInsufficient { .. })));
        assert!(analysis.recommendation().is_none());
    }

    #[tokio::test]
    async fn missing_history_is_an_error() {
        let history = FixedHistory(None);
        let live = LivePriceChain::new();
        let err = analyze_symbol("NONE", Lookback::OneYear, &history, &live, None).await.unwrap_err();
        assert!(err.to_string().contains("no price history"), "{err}");
        assert!(err.to_string().contains("fixed"), "{err}");
    }

    #[tokio::test]
    async fn known_quote_is_used_without_asking_the_chain() {
        let history = FixedHistory(Some(falling(120)));
        let live = LivePriceChain::new().with_source(Arc::new(FixedPrices::new("t", &[("DOWN", 150.0)])));
        let known = LiveQuote {
            price: 90.0,
            source: "resolver",
        };
        let analysis = analyze_symbol("DOWN", Lookback::OneYear, &history, &live, Some(known))
            .await
            .unwrap();
        assert_eq!(analysis.live, Some(known));
        assert_eq!(analysis.current_price(), Some(90.0));
    }
}
