use crate::app::App;
use crate::console;
use stocklens_core::compare::{compare_symbols, parse_symbol_list, ComparisonRow};
use stocklens_core::export::chart::comparison_chart_html;
use stocklens_core::report::money;
use stocklens_core::time::lookback::Lookback;

pub async fn run(app: &App, symbols: &str, lookback: Lookback, chart: bool) -> anyhow::Result<()> {
    let symbols = parse_symbol_list(symbols)?;
    if !app.finnhub.has_api_key() {
        tracing::warn!("FINNHUB_API_KEY not set; market cap, industry, P/E and yield will be N/A");
    }

    let comparison = compare_symbols(
        &symbols,
        lookback,
        &app.live,
        app.finnhub.as_ref(),
        app.yahoo.as_ref(),
    )
    .await?;

    println!();
    println!(
        "{:<10} {:>12} {:>20} {:>8} {:>8}  {}",
        "Symbol", "Price", "Market Cap (M)", "P/E", "Yield %", "Industry"
    );
    for row in &comparison.rows {
        print_row(row);
    }

    if !comparison.missing_history.is_empty() {
        println!();
        println!(
            "No price history for: {}",
            comparison.missing_history.join(", ")
        );
    }

    if chart {
        if comparison.performance.is_empty() {
            println!("Not enough overlapping price history to chart normalised performance.");
        } else {
            let html = comparison_chart_html(&comparison.performance, lookback.describe());
            let path = app.write_output("comparison_chart.html", html.as_bytes())?;
            println!();
            println!("Comparison chart saved to {}", path.display());
        }
    }

    console::print_disclaimer();
    Ok(())
}

fn print_row(row: &ComparisonRow) {
    let na = || "N/A".to_string();
    println!(
        "{:<10} {:>12} {:>20} {:>8} {:>8}  {}",
        row.symbol,
        row.price.map(|p| money(p, 2)).unwrap_or_else(na),
        row.market_cap_millions.map(|m| money(m, 2)).unwrap_or_else(na),
        row.pe_ratio.map(|v| format!("{v:.2}")).unwrap_or_else(na),
        row.dividend_yield_pct.map(|v| format!("{v:.2}")).unwrap_or_else(na),
        row.industry.as_deref().unwrap_or("N/A"),
    );
}
