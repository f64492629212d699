use crate::analysis::error::SignalError;
use crate::provider::types::SymbolMatch;
use crate::provider::live::{LiveQuote, LivePriceChain};
use crate::provider::CompanyDirectory;
use anyhow::Result;

const LISTED_KINDS: [&str; 4] = ["Common Stock", "ADRC", "ETP", "Equity"];

#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    /// The query itself is a ticker with live data; the quote that proved it
    /// is kept so callers need not ask again.
    Direct { symbol: String, quote: LiveQuote },
    /// Search results for a name or partial ticker, possibly empty.
    Candidates(Vec<SymbolMatch>),
}

pub fn normalize(query: &str) -> Result<String, SignalError> {
    let symbol = query.trim().to_ascii_uppercase();
    if symbol.is_empty() {
        return Err(SignalError::InvalidInput("symbol query is empty".to_string()));
    }
    Ok(symbol)
}

pub async fn resolve_symbol(
    query: &str,
    live: &LivePriceChain,
    directory: &dyn CompanyDirectory,
) -> Result<Resolution> {
    let symbol = normalize(query)?;

    if let Some(quote) = live.quote(&symbol).await {
        tracing::debug!(%symbol, source = quote.source, "query recognised as a ticker with live data");
        return Ok(Resolution::Direct { symbol, quote });
    }

    let results = directory.search(query.trim()).await?;
    let total = results.len();
    let candidates = listed_equities(results);
    tracing::debug!(query = query.trim(), total, kept = candidates.len(), "symbol search finished");
    Ok(Resolution::Candidates(candidates))
}

/// Keeps listed stock-like instruments that carry a symbol.
pub fn listed_equities(results: Vec<SymbolMatch>) -> Vec<SymbolMatch> {
    results
        .into_iter()
        .filter(|m| !m.symbol.trim().is_empty() && LISTED_KINDS.contains(&m.kind.as_str()))
        .collect()
}

/// Picks a candidate by 1-based position, or the only one when `pick` is absent.
pub fn choose(candidates: &[SymbolMatch], pick: Option<usize>) -> Option<&SymbolMatch> {
    match pick {
        Some(n) if n >= 1 => candidates.get(n - 1),
        Some(_) => None,
        None if candidates.len() == 1 => candidates.first(),
        None => None,
    }
}
