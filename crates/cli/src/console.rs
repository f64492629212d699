//! Plain stdout rendering shared by the subcommands.

use stocklens_core::analysis::SignalError;
use stocklens_core::domain::recommendation::Recommendation;
use stocklens_core::provider::types::SymbolMatch;
use stocklens_core::report::money;
use stocklens_core::service::Analysis;
use stocklens_core::DISCLAIMER;

const TAIL_ROWS: usize = 5;

pub fn print_candidates(candidates: &[SymbolMatch]) {
    println!("Candidates:");
    for (i, c) in candidates.iter().enumerate() {
        println!("  {:>2}. {:<12} {} ({})", i + 1, c.symbol, c.description, c.kind);
    }
}

pub fn print_recommendation(rec: &Recommendation) {
    println!("Recommendation: {}", rec.signal);
    println!("Reasoning:");
    for reason in &rec.reasons {
        println!("  - {reason}");
    }
}

pub fn print_outcome(analysis: &Analysis) {
    match &analysis.outcome {
        Ok(rec) => print_recommendation(rec),
        Err(SignalError::DataInsufficient { available, required }) => println!(
            "Not enough historical data to calculate moving averages for a recommendation \
             ({available} trading days, {required} needed)."
        ),
        Err(err) => println!("Could not provide a recommendation: {err}"),
    }
}

/// Last few closes with their moving averages.
pub fn print_recent_rows(analysis: &Analysis) {
    let averages = &analysis.averages;
    let points = analysis.series.points();
    let start = points.len().saturating_sub(TAIL_ROWS);
    let cell = |v: Option<f64>| v.map(|v| format!("{v:.2}")).unwrap_or_else(|| "-".to_string());

    println!(
        "{:<12} {:>12} {:>12} {:>12}",
        "Date",
        "Close",
        format!("SMA{}", averages.short_window),
        format!("SMA{}", averages.long_window)
    );
    for (i, point) in points.iter().enumerate().skip(start) {
        println!(
            "{:<12} {:>12.2} {:>12} {:>12}",
            point.date.format("%Y-%m-%d"),
            point.close,
            cell(averages.short.get(i).copied().flatten()),
            cell(averages.long.get(i).copied().flatten())
        );
    }
}

pub fn print_price(analysis: &Analysis) {
    match analysis.live {
        Some(quote) => println!(
            "Current price of {}: {} (source: {})",
            analysis.symbol,
            money(quote.price, 2),
            quote.source
        ),
        None => println!("Current price of {} could not be retrieved.", analysis.symbol),
    }
}

pub fn print_disclaimer() {
    println!();
    println!("Disclaimer: {DISCLAIMER}");
}
