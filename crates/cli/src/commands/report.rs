use crate::app::App;
use stocklens_core::provider::{CompanyDirectory, FundamentalsProvider};
use stocklens_core::report::{build_stock_report, pdf, pdf_file_name, text, text_file_name, ReportInput};
use stocklens_core::service::analyze_symbol;
use stocklens_core::time::lookback::Lookback;

pub async fn run(app: &App, query: &str, pick: Option<usize>) -> anyhow::Result<()> {
    let resolved = app.resolve(query, pick).await?;
    let symbol = resolved.symbol;
    println!("Generating report for {symbol}...");

    // Each section degrades on its own; the report is written regardless.
    let profile = app.finnhub.profile(&symbol).await.unwrap_or_else(|err| {
        tracing::warn!(%symbol, error = %err, "profile unavailable for report");
        None
    });
    let analysis = analyze_symbol(
        &symbol,
        Lookback::OneYear,
        app.yahoo.as_ref(),
        &app.live,
        resolved.quote,
    )
    .await
    .map_err(|err| tracing::warn!(%symbol, error = %err, "analysis unavailable for report"))
    .ok();
    let revenue = app.yahoo.annual_revenue(&symbol).await.unwrap_or_else(|err| {
        tracing::warn!(%symbol, error = %err, "revenue unavailable for report");
        Vec::new()
    });

    let doc = build_stock_report(&ReportInput {
        symbol: &symbol,
        generated_at: chrono::Local::now(),
        profile: profile.as_ref(),
        analysis: analysis.as_ref(),
        revenue: &revenue,
    });

    let txt = app.write_output(&text_file_name(&symbol), text::render(&doc).as_bytes())?;
    println!("Text report saved to {}", txt.display());
    let pdf_path = app.write_output(&pdf_file_name(&symbol), &pdf::render(&doc))?;
    println!("PDF report saved to {}", pdf_path.display());
    Ok(())
}
