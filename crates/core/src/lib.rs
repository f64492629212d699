pub mod analysis;
pub mod compare;
pub mod domain;
pub mod export;
pub mod provider;
pub mod report;
pub mod service;
pub mod symbol;
pub mod time;

pub const DISCLAIMER: &str = "This assistant is a simplified demonstration based purely on two \
simple moving averages and the current price. It does NOT consider company fundamentals, market \
news, volume, volatility or other technical indicators. Stock investments carry inherent risk and \
past performance is not indicative of future results. This output is for educational purposes \
only and is NOT financial advice. Always do your own research and consult a qualified financial \
advisor before making investment decisions.";

pub mod config {
    use anyhow::Context;
    use std::path::PathBuf;

    const DEFAULT_FINNHUB_BASE_URL: &str = "https://finnhub.io/api/v1";
    const DEFAULT_YAHOO_BASE_URL: &str = "https://query2.finance.yahoo.com";
    const DEFAULT_TIMEOUT_SECS: u64 = 30;
    const DEFAULT_RETRIES: u32 = 3;

    #[derive(Debug, Clone)]
    pub struct Settings {
        pub finnhub_api_key: Option<String>,
        pub finnhub_base_url: String,
        pub yahoo_base_url: String,
        pub provider_timeout_secs: u64,
        pub provider_retries: u32,
        pub output_dir: PathBuf,
        pub sentry_dsn: Option<String>,
    }

    impl Settings {
        pub fn from_env() -> anyhow::Result<Self> {
            let provider_timeout_secs = match std::env::var("PROVIDER_TIMEOUT_SECS") {
                Ok(s) => s
                    .trim()
                    .parse::<u64>()
                    .with_context(|| format!("PROVIDER_TIMEOUT_SECS is not a number: {s}"))?,
                Err(_) => DEFAULT_TIMEOUT_SECS,
            };

            let provider_retries = match std::env::var("PROVIDER_RETRIES") {
                Ok(s) => s
                    .trim()
                    .parse::<u32>()
                    .with_context(|| format!("PROVIDER_RETRIES is not a number: {s}"))?,
                Err(_) => DEFAULT_RETRIES,
            };
            anyhow::ensure!(provider_retries >= 1, "PROVIDER_RETRIES must be >= 1");

            Ok(Self {
                finnhub_api_key: non_empty_var("FINNHUB_API_KEY"),
                finnhub_base_url: non_empty_var("FINNHUB_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_FINNHUB_BASE_URL.to_string()),
                yahoo_base_url: non_empty_var("YAHOO_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_YAHOO_BASE_URL.to_string()),
                provider_timeout_secs,
                provider_retries,
                output_dir: non_empty_var("STOCKLENS_OUTPUT_DIR")
                    .map(PathBuf::from)
                    .unwrap_or_else(|| PathBuf::from(".")),
                sentry_dsn: non_empty_var("SENTRY_DSN"),
            })
        }

        pub fn require_finnhub_api_key(&self) -> anyhow::Result<&str> {
            self.finnhub_api_key
                .as_deref()
                .context("FINNHUB_API_KEY is required")
        }

        pub fn output_path(&self, file_name: &str) -> PathBuf {
            self.output_dir.join(file_name)
        }
    }

    fn non_empty_var(key: &str) -> Option<String> {
        std::env::var(key)
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }
}
