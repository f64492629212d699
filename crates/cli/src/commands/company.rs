use crate::app::App;
use crate::console;
use stocklens_core::provider::CompanyDirectory;
use stocklens_core::report::profile_rows;
use stocklens_core::symbol::listed_equities;

pub async fn profile(app: &App, query: &str, pick: Option<usize>) -> anyhow::Result<()> {
    app.settings.require_finnhub_api_key()?;
    let symbol = app.resolve(query, pick).await?.symbol;

    let Some(profile) = app.finnhub.profile(&symbol).await? else {
        println!("No company profile found for {symbol}.");
        return Ok(());
    };

    let rows = profile_rows(&profile);
    let width = rows.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
    println!();
    println!("--- Company Profile: {symbol} ---");
    for (key, value) in rows {
        println!("{key:<width$}  {value}");
    }
    Ok(())
}

pub async fn search(app: &App, query: &str) -> anyhow::Result<()> {
    app.settings.require_finnhub_api_key()?;
    let query = query.trim();
    anyhow::ensure!(!query.is_empty(), "search query is empty");

    let candidates = listed_equities(app.finnhub.search(query).await?);
    if candidates.is_empty() {
        println!("No stock ticker symbols found for '{query}'.");
        return Ok(());
    }
    console::print_candidates(&candidates);
    Ok(())
}
