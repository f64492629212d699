//! External data collaborators: price history, live quotes, company data.

pub mod finnhub;
pub mod http;
pub mod live;
pub mod types;
pub mod yahoo;

use crate::domain::series::PriceSeries;
use crate::time::lookback::Lookback;
use anyhow::Result;
use types::{AnnualRevenue, CompanyProfile, KeyMetrics, SymbolMatch};

pub use finnhub::FinnhubClient;
pub use live::LivePriceChain;
pub use yahoo::YahooClient;

#[async_trait::async_trait]
pub trait PriceHistoryProvider: Send + Sync {
    fn provider_name(&self) -> &'static str;

    /// Daily closes over `lookback`; `None` when the provider has no data.
    async fn fetch_history(&self, symbol: &str, lookback: Lookback) -> Result<Option<PriceSeries>>;
}

#[async_trait::async_trait]
pub trait LivePriceSource: Send + Sync {
    fn provider_name(&self) -> &'static str;

    async fn current_price(&self, symbol: &str) -> Result<Option<f64>>;
}

#[async_trait::async_trait]
pub trait CompanyDirectory: Send + Sync {
    async fn profile(&self, symbol: &str) -> Result<Option<CompanyProfile>>;

    async fn search(&self, query: &str) -> Result<Vec<SymbolMatch>>;

    async fn metrics(&self, symbol: &str) -> Result<Option<KeyMetrics>>;
}

#[async_trait::async_trait]
pub trait FundamentalsProvider: Send + Sync {
    /// Annual total revenue, oldest fiscal period first.
    async fn annual_revenue(&self, symbol: &str) -> Result<Vec<AnnualRevenue>>;
}
