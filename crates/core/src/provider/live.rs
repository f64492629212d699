use crate::provider::LivePriceSource;
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiveQuote {
    pub price: f64,
    pub source: &'static str,
}

/// Ordered fallback over several live price sources: the first source that
/// yields a price wins; errors and empty answers fall through.
#[derive(Clone, Default)]
pub struct LivePriceChain {
    sources: Vec<Arc<dyn LivePriceSource>>,
}

impl LivePriceChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: Arc<dyn LivePriceSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub async fn quote(&self, symbol: &str) -> Option<LiveQuote> {
        for source in &self.sources {
            match source.current_price(symbol).await {
                Ok(Some(price)) => {
                    tracing::debug!(symbol, source = source.provider_name(), price, "live price resolved");
                    return Some(LiveQuote {
                        price,
                        source: source.provider_name(),
                    });
                }
                Ok(None) => {
                    tracing::debug!(symbol, source = source.provider_name(), "no live price; trying next source");
                }
                Err(err) => {
                    tracing::warn!(symbol, source = source.provider_name(), error = %err, "live price fetch failed; trying next source");
                }
            }
        }
        None
    }
}

#[cfg(test)]
pub(crate) mod fakes {
    use super::*;
    use anyhow::Result;
    use std::collections::HashMap;

    pub struct FixedPrices {
        pub name: &'static str,
        pub prices: HashMap<String, f64>,
    }

    impl FixedPrices {
        pub fn new(name: &'static str, prices: &[(&str, f64)]) -> Self {
            Self {
                name,
                prices: prices.iter().map(|(s, p)| (s.to_string(), *p)).collect(),
            }
        }
    }

    #[async_trait::async_trait]
    impl LivePriceSource for FixedPrices {
        fn provider_name(&self) -> &'static str {
            self.name
        }

        async fn current_price(&self, symbol: &str) -> Result<Option<f64>> {
            Ok(self.prices.get(symbol).copied())
        }
    }

    pub struct Failing;

    #[async_trait::async_trait]
    impl LivePriceSource for Failing {
        fn provider_name(&self) -> &'static str {
            "failing"
        }

        async fn current_price(&self, _symbol: &str) -> Result<Option<f64>> {
            anyhow::bail!("connection refused")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fakes::{Failing, FixedPrices};
    use super::*;

    #[tokio::test]
    async fn primary_source_wins_when_available() {
        let chain = LivePriceChain::new()
            .with_source(Arc::new(FixedPrices::new("primary", &[("AAPL", 200.0)])))
            .with_source(Arc::new(FixedPrices::new("secondary", &[("AAPL", 199.0)])));
        let quote = chain.quote("AAPL").await.unwrap();
        assert_eq!(quote.price, 200.0);
        assert_eq!(quote.source, "primary");
    }

    #[tokio::test]
    async fn falls_back_on_error_or_absence() {
        let chain = LivePriceChain::new()
            .with_source(Arc::new(Failing))
            .with_source(Arc::new(FixedPrices::new("primary", &[])))
            .with_source(Arc::new(FixedPrices::new("secondary", &[("MSFT", 410.0)])));
        let quote = chain.quote("MSFT").await.unwrap();
        assert_eq!(quote.source, "secondary");
        assert_eq!(quote.price, 410.0);
    }

    #[tokio::test]
    async fn exhausted_chain_is_unavailable() {
        let chain = LivePriceChain::new().with_source(Arc::new(Failing));
        assert!(chain.quote("AAPL").await.is_none());
        assert!(LivePriceChain::new().quote("AAPL").await.is_none());
    }
}
