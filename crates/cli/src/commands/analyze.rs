use crate::app::App;
use crate::console;
use anyhow::Context;
use stocklens_core::export::chart::price_chart_html;
use stocklens_core::export::file_stem;
use stocklens_core::service::analyze_symbol;
use stocklens_core::time::lookback::Lookback;

pub async fn run(app: &App, query: &str, lookback: Lookback, chart: bool, pick: Option<usize>) -> anyhow::Result<()> {
    let resolved = app.resolve(query, pick).await?;
    let symbol = resolved.symbol;
    tracing::info!(%symbol, %lookback, "analyzing");

    let analysis = analyze_symbol(&symbol, lookback, app.yahoo.as_ref(), &app.live, resolved.quote)
        .await
        .with_context(|| format!("analysis of {symbol} failed"))?;

    println!();
    println!("--- {symbol} ({}) ---", lookback.describe());
    console::print_price(&analysis);
    println!();
    console::print_recent_rows(&analysis);

    if chart {
        let html = price_chart_html(&analysis.series, &analysis.averages, lookback.describe());
        let path = app.write_output(&format!("{}_chart.html", file_stem(&symbol)), html.as_bytes())?;
        println!();
        println!("Chart saved to {}", path.display());
    }

    println!();
    console::print_outcome(&analysis);
    console::print_disclaimer();
    Ok(())
}

/// Like `run`, but refuses to advise without a live price.
pub async fn recommend(app: &App, query: &str, pick: Option<usize>, json: bool) -> anyhow::Result<()> {
    let resolved = app.resolve(query, pick).await?;
    let symbol = resolved.symbol;

    let quote = match resolved.quote {
        Some(quote) => Some(quote),
        None => app.live.quote(&symbol).await,
    };
    let Some(quote) = quote else {
        println!("Could not fetch the current price for {symbol}; cannot provide a recommendation.");
        console::print_disclaimer();
        return Ok(());
    };

    let analysis = analyze_symbol(&symbol, Lookback::OneYear, app.yahoo.as_ref(), &app.live, Some(quote))
        .await
        .with_context(|| format!("analysis of {symbol} failed"))?;

    if json {
        let body = serde_json::json!({
            "symbol": symbol,
            "price": quote.price,
            "source": quote.source,
            "recommendation": analysis.recommendation(),
            "error": analysis.outcome.as_ref().err().map(|e| e.to_string()),
            "disclaimer": stocklens_core::DISCLAIMER,
        });
        println!("{}", serde_json::to_string_pretty(&body)?);
        return Ok(());
    }

    println!();
    console::print_price(&analysis);
    console::print_outcome(&analysis);
    console::print_disclaimer();
    Ok(())
}
