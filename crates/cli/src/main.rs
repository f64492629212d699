use clap::{Parser, Subcommand};
use stocklens_core::time::lookback::Lookback;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod commands;
mod console;

#[derive(Debug, Parser)]
#[command(name = "stocklens", about = "Quick technical snapshots for listed stocks")]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Price, 20/50-day moving averages, chart and a general signal.
    Analyze {
        /// Ticker (AAPL, RELIANCE.NS) or company name.
        query: String,
        #[arg(long, default_value = "1y")]
        lookback: Lookback,
        /// Skip writing the HTML chart.
        #[arg(long)]
        no_chart: bool,
        /// 1-based pick among search results when the query is a name.
        #[arg(long)]
        pick: Option<usize>,
    },

    /// Company profile.
    Profile {
        query: String,
        #[arg(long)]
        pick: Option<usize>,
    },

    /// Direct buy/sell/hold recommendation (needs a live price).
    Recommend {
        query: String,
        #[arg(long)]
        pick: Option<usize>,
        /// Print the recommendation as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Export annual sales (total revenue) to an Excel workbook.
    Sales {
        query: String,
        /// Number of most recent fiscal years.
        #[arg(long, default_value_t = 5, value_parser = clap::value_parser!(u16).range(1..))]
        years: u16,
        #[arg(long)]
        pick: Option<usize>,
    },

    /// Compare several tickers side by side.
    Compare {
        /// Comma separated, e.g. AAPL,MSFT,GOOG
        symbols: String,
        #[arg(long, default_value = "1y")]
        lookback: Lookback,
        #[arg(long)]
        no_chart: bool,
    },

    /// Write a text and PDF report.
    Report {
        query: String,
        #[arg(long)]
        pick: Option<usize>,
    },

    /// List ticker candidates for a company name.
    Search { query: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let settings = stocklens_core::config::Settings::from_env()?;
    let _sentry_guard = init_sentry(&settings);

    tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(sentry_tracing::layer())
        .init();

    let args = Args::parse();
    let app = app::App::from_settings(settings)?;

    let res = match args.command {
        Command::Analyze {
            query,
            lookback,
            no_chart,
            pick,
        } => commands::analyze::run(&app, &query, lookback, !no_chart, pick).await,
        Command::Profile { query, pick } => commands::company::profile(&app, &query, pick).await,
        Command::Recommend { query, pick, json } => {
            commands::analyze::recommend(&app, &query, pick, json).await
        }
        Command::Sales { query, years, pick } => {
            commands::sales::run(&app, &query, usize::from(years), pick).await
        }
        Command::Compare {
            symbols,
            lookback,
            no_chart,
        } => commands::compare::run(&app, &symbols, lookback, !no_chart).await,
        Command::Report { query, pick } => commands::report::run(&app, &query, pick).await,
        Command::Search { query } => commands::company::search(&app, &query).await,
    };

    if let Err(err) = &res {
        sentry_anyhow::capture_anyhow(err);
        tracing::error!(error = %err, "command failed");
    }
    res
}

fn init_sentry(settings: &stocklens_core::config::Settings) -> Option<sentry::ClientInitGuard> {
    let dsn = settings.sentry_dsn.as_deref()?;
    Some(sentry::init((
        dsn,
        sentry::ClientOptions {
            release: sentry::release_name!(),
            ..Default::default()
        },
    )))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn analyze_defaults_to_one_year_with_chart() {
        let args = Args::try_parse_from(["stocklens", "analyze", "apple"]).unwrap();
        match args.command {
            Command::Analyze {
                query,
                lookback,
                no_chart,
                pick,
            } => {
                assert_eq!(query, "apple");
                assert_eq!(lookback, Lookback::OneYear);
                assert!(!no_chart);
                assert_eq!(pick, None);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn sales_rejects_zero_years() {
        assert!(Args::try_parse_from(["stocklens", "sales", "AAPL", "--years", "0"]).is_err());
        let args = Args::try_parse_from(["stocklens", "sales", "AAPL", "--years", "3"]).unwrap();
        assert!(matches!(args.command, Command::Sales { years: 3, .. }));
    }

    #[test]
    fn lookback_is_validated() {
        assert!(Args::try_parse_from(["stocklens", "compare", "AAPL,MSFT", "--lookback", "7d"]).is_err());
        let args =
            Args::try_parse_from(["stocklens", "compare", "AAPL,MSFT", "--lookback", "5y"]).unwrap();
        assert!(matches!(
            args.command,
            Command::Compare {
                lookback: Lookback::FiveYears,
                ..
            }
        ));
    }
}
