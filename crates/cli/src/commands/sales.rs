use crate::app::App;
use stocklens_core::export::xlsx::{recent_revenue, sales_file_name, sales_workbook};
use stocklens_core::provider::FundamentalsProvider;
use stocklens_core::report::money;

pub async fn run(app: &App, query: &str, years: usize, pick: Option<usize>) -> anyhow::Result<()> {
    anyhow::ensure!(years >= 1, "number of years must be at least 1");
    let symbol = app.resolve(query, pick).await?.symbol;

    let revenue = app.yahoo.annual_revenue(&symbol).await?;
    if revenue.is_empty() {
        println!("No annual sales data found for {symbol}.");
        return Ok(());
    }

    let (rows, short) = recent_revenue(&revenue, years);
    if short {
        tracing::warn!(%symbol, requested = years, available = rows.len(), "fewer fiscal years than requested");
        println!(
            "Only {} years of sales data available for {symbol}; exporting all of them.",
            rows.len()
        );
    }

    println!();
    println!("{:<12} {:>24}", "Period End", "Sales");
    for row in &rows {
        println!("{:<12} {:>24}", row.period_end.format("%Y-%m-%d"), money(row.revenue, 0));
    }

    let bytes = sales_workbook(&rows)?;
    let path = app.write_output(&sales_file_name(&symbol, years), &bytes)?;
    println!();
    println!("Sales data saved to {}", path.display());
    Ok(())
}
