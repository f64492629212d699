use crate::domain::series::PriceSeries;
use crate::provider::live::LivePriceChain;
use crate::provider::{CompanyDirectory, PriceHistoryProvider};
use crate::symbol::normalize;
use crate::time::lookback::Lookback;
use anyhow::Result;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    pub symbol: String,
    pub price: Option<f64>,
    pub market_cap_millions: Option<f64>,
    pub industry: Option<String>,
    pub pe_ratio: Option<f64>,
    pub dividend_yield_pct: Option<f64>,
}

/// Close prices rebased to 1.0 on the first common date.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedSeries {
    pub symbol: String,
    pub points: Vec<(NaiveDate, f64)>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Comparison {
    pub rows: Vec<ComparisonRow>,
    pub performance: Vec<NormalizedSeries>,
    /// Symbols left out of the performance chart for lack of history.
    pub missing_history: Vec<String>,
}

/// Parses `AAPL, msft,GOOG` into upper-cased, de-duplicated symbols.
pub fn parse_symbol_list(input: &str) -> Result<Vec<String>> {
    let mut seen = BTreeSet::new();
    let mut out = Vec::new();
    for part in input.split(',').filter(|p| !p.trim().is_empty()) {
        let symbol = normalize(part)?;
        if seen.insert(symbol.clone()) {
            out.push(symbol);
        }
    }
    anyhow::ensure!(
        out.len() >= 2,
        "at least two distinct ticker symbols are needed for a comparison (got {})",
        out.len()
    );
    Ok(out)
}

pub async fn compare_symbols(
    symbols: &[String],
    lookback: Lookback,
    live: &LivePriceChain,
    directory: &dyn CompanyDirectory,
    history: &dyn PriceHistoryProvider,
) -> Result<Comparison> {
    anyhow::ensure!(symbols.len() >= 2, "at least two symbols are needed for a comparison");

    let mut rows = Vec::with_capacity(symbols.len());
    let mut histories = Vec::new();
    let mut missing_history = Vec::new();

    for symbol in symbols {
        let price = live.quote(symbol).await.map(|q| q.price);

        let profile = directory.profile(symbol).await.unwrap_or_else(|err| {
            tracing::warn!(%symbol, error = %err, "profile fetch failed");
            None
        });
        let metrics = directory.metrics(symbol).await.unwrap_or_else(|err| {
            tracing::warn!(%symbol, error = %err, "metrics fetch failed");
            None
        });

        rows.push(ComparisonRow {
            symbol: symbol.clone(),
            price,
            market_cap_millions: profile.as_ref().and_then(|p| p.market_cap_millions),
            industry: profile.and_then(|p| p.industry),
            pe_ratio: metrics.as_ref().and_then(|m| m.pe_ratio),
            dividend_yield_pct: metrics.and_then(|m| m.dividend_yield_pct),
        });

        match history.fetch_history(symbol, lookback).await {
            Ok(Some(series)) => histories.push(series),
            Ok(None) => missing_history.push(symbol.clone()),
            Err(err) => {
                tracing::warn!(%symbol, error = %err, "history fetch failed; excluded from chart");
                missing_history.push(symbol.clone());
            }
        }
    }

    Ok(Comparison {
        rows,
        performance: normalized_performance(&histories),
        missing_history,
    })
}

/// Restricts every series to the dates all of them share and rebases each to
/// 1.0 on the first shared date. Empty when there is no overlap.
pub fn normalized_performance(series: &[PriceSeries]) -> Vec<NormalizedSeries> {
    let Some(first) = series.first() else {
        return Vec::new();
    };

    let mut common: BTreeSet<NaiveDate> = first.dates().into_iter().collect();
    for s in &series[1..] {
        let dates: BTreeSet<NaiveDate> = s.dates().into_iter().collect();
        common = common.intersection(&dates).copied().collect();
    }
    if common.is_empty() {
        return Vec::new();
    }

    series
        .iter()
        .filter_map(|s| {
            let points: Vec<_> = s
                .points()
                .iter()
                .filter(|p| common.contains(&p.date))
                .collect();
            let base = points.first()?.close;
            Some(NormalizedSeries {
                symbol: s.symbol().to_string(),
                points: points.iter().map(|p| (p.date, p.close / base)).collect(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::series::PricePoint;

    fn series(symbol: &str, rows: &[(u32, f64)]) -> PriceSeries {
        let points = rows
            .iter()
            .map(|(day, close)| PricePoint {
                date: NaiveDate::from_ymd_opt(2026, 2, *day).unwrap(),
                close: *close,
            })
            .collect();
        PriceSeries::new(symbol, points).unwrap()
    }

    #[test]
    fn symbol_list_is_normalised_and_deduplicated() {
        let symbols = parse_symbol_list(" aapl, MSFT,,aapl ,goog").unwrap();
        assert_eq!(symbols, vec!["AAPL", "MSFT", "GOOG"]);
    }

    #[test]
    fn symbol_list_needs_two_symbols() {
        assert!(parse_symbol_list("AAPL").is_err());
        assert!(parse_symbol_list("AAPL, aapl").is_err());
        assert!(parse_symbol_list(" , ").is_err());
    }

    #[test]
    fn performance_rebases_on_first_common_date() {
        let a = series("A", &[(2, 10.0), (3, 11.0), (4, 12.0), (5, 15.0)]);
        let b = series("B", &[(3, 50.0), (4, 40.0), (5, 60.0), (6, 70.0)]);
        let perf = normalized_performance(&[a, b]);

        assert_eq!(perf.len(), 2);
        assert_eq!(perf[0].symbol, "A");
        assert_eq!(perf[0].points.len(), 3);
        assert_eq!(perf[0].points[0].1, 1.0);
        assert_eq!(perf[0].points[2].1, 15.0 / 11.0);
        assert_eq!(perf[1].points[0].1, 1.0);
        assert_eq!(perf[1].points[1].1, 0.8);
        assert_eq!(perf[1].points[2].0, NaiveDate::from_ymd_opt(2026, 2, 5).unwrap());
    }

    #[test]
    fn disjoint_histories_produce_no_chart() {
        let a = series("A", &[(2, 10.0), (3, 11.0)]);
        let b = series("B", &[(9, 50.0), (10, 40.0)]);
        assert!(normalized_performance(&[a, b]).is_empty());
        assert!(normalized_performance(&[]).is_empty());
    }
}
