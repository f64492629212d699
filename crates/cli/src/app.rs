use anyhow::Context;
use std::path::PathBuf;
use std::sync::Arc;
use stocklens_core::config::Settings;
use stocklens_core::export::write_file;
use stocklens_core::provider::live::LiveQuote;
use stocklens_core::provider::{FinnhubClient, LivePriceChain, YahooClient};
use stocklens_core::symbol::{choose, resolve_symbol, Resolution};

/// A ticker picked for a query. `quote` is set when the query was itself a
/// live ticker.
#[derive(Debug, Clone)]
pub struct Resolved {
    pub symbol: String,
    pub quote: Option<LiveQuote>,
}

pub struct App {
    pub settings: Settings,
    pub finnhub: Arc<FinnhubClient>,
    pub yahoo: Arc<YahooClient>,
    pub live: LivePriceChain,
}

impl App {
    pub fn from_settings(settings: Settings) -> anyhow::Result<Self> {
        let finnhub = Arc::new(FinnhubClient::from_settings(&settings)?);
        let yahoo = Arc::new(YahooClient::from_settings(&settings)?);

        // Finnhub is real-time; Yahoo is near-real-time and needs no key.
        let mut live = LivePriceChain::new();
        if finnhub.has_api_key() {
            live = live.with_source(finnhub.clone());
        } else {
            tracing::info!("FINNHUB_API_KEY not set; live prices come from Yahoo only");
        }
        live = live.with_source(yahoo.clone());

        Ok(Self {
            settings,
            finnhub,
            yahoo,
            live,
        })
    }

    /// Turns a ticker or company name into a single ticker symbol.
    pub async fn resolve(&self, query: &str, pick: Option<usize>) -> anyhow::Result<Resolved> {
        println!("Resolving '{}'...", query.trim());
        let resolution = resolve_symbol(query, &self.live, self.finnhub.as_ref()).await?;

        let candidates = match resolution {
            Resolution::Direct { symbol, quote } => {
                println!("'{symbol}' recognised as a ticker with live data.");
                return Ok(Resolved {
                    symbol,
                    quote: Some(quote),
                });
            }
            Resolution::Candidates(c) => c,
        };

        if candidates.is_empty() {
            if !self.finnhub.has_api_key() {
                anyhow::bail!(
                    "'{}' is not a ticker with live data and symbol search needs FINNHUB_API_KEY",
                    query.trim()
                );
            }
            anyhow::bail!(
                "no stock ticker symbols found for '{}'; try a different query or check the spelling",
                query.trim()
            );
        }

        if let Some(chosen) = choose(&candidates, pick) {
            println!("Using {} ({}).", chosen.symbol, chosen.description);
            return Ok(Resolved {
                symbol: chosen.symbol.clone(),
                quote: None,
            });
        }

        crate::console::print_candidates(&candidates);
        match pick {
            Some(n) => anyhow::bail!("--pick {n} is out of range (1..={})", candidates.len()),
            None => anyhow::bail!("'{}' matches several tickers; re-run with --pick N", query.trim()),
        }
    }

    pub fn write_output(&self, file_name: &str, bytes: &[u8]) -> anyhow::Result<PathBuf> {
        let path = self.settings.output_path(file_name);
        write_file(&path, bytes).with_context(|| format!("failed to save {file_name}"))?;
        Ok(path)
    }
}
