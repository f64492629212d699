//! Yahoo Finance: v8 chart API for daily closes and the near-real-time
//! market price, fundamentals-timeseries for annual revenue.

use crate::analysis::error::SignalError;
use crate::config::Settings;
use crate::domain::series::{PricePoint, PriceSeries};
use crate::provider::http::JsonHttp;
use crate::provider::types::AnnualRevenue;
use crate::provider::{FundamentalsProvider, LivePriceSource, PriceHistoryProvider};
use crate::time::lookback::Lookback;
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::collections::BTreeMap;

const REVENUE_SERIES: &str = "annualTotalRevenue";
// Earliest period Yahoo serves fundamentals for (1985-08-23).
const FUNDAMENTALS_PERIOD_START: i64 = 493_590_046;

#[derive(Debug, Clone)]
pub struct YahooClient {
    http: JsonHttp,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartEnvelope,
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    #[serde(default)]
    result: Option<Vec<ChartData>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    #[serde(default, rename = "regularMarketPrice")]
    regular_market_price: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<QuoteData>,
}

#[derive(Debug, Default, Deserialize)]
struct QuoteData {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

impl YahooClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self::new(
            JsonHttp::from_settings(settings)?,
            settings.yahoo_base_url.clone(),
        ))
    }

    pub fn new(http: JsonHttp, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }

    fn chart_url(&self, symbol: &str) -> String {
        format!(
            "{}/v8/finance/chart/{}",
            self.base_url.trim_end_matches('/'),
            symbol
        )
    }

    async fn chart(&self, symbol: &str, range: &str) -> Result<Option<ChartData>> {
        let (status, body) = self
            .http
            .get_json_allow_not_found(&self.chart_url(symbol), &[("range", range), ("interval", "1d")])
            .await?;
        if status == StatusCode::NOT_FOUND {
            tracing::debug!(symbol, "Yahoo chart: symbol not found");
            return Ok(None);
        }
        parse_chart(symbol, body)
    }
}

#[async_trait::async_trait]
impl PriceHistoryProvider for YahooClient {
    fn provider_name(&self) -> &'static str {
        "yahoo"
    }

    async fn fetch_history(&self, symbol: &str, lookback: Lookback) -> Result<Option<PriceSeries>> {
        let Some(data) = self.chart(symbol, lookback.as_range()).await? else {
            return Ok(None);
        };
        let series = chart_to_series(symbol, &data)?;
        tracing::debug!(symbol, %lookback, points = series.len(), "fetched Yahoo price history");
        Ok((!series.is_empty()).then_some(series))
    }
}

#[async_trait::async_trait]
impl LivePriceSource for YahooClient {
    fn provider_name(&self) -> &'static str {
        "yahoo"
    }

    async fn current_price(&self, symbol: &str) -> Result<Option<f64>> {
        let Some(data) = self.chart(symbol, "1d").await? else {
            return Ok(None);
        };
        Ok(data
            .meta
            .regular_market_price
            .filter(|p| p.is_finite() && *p > 0.0))
    }
}

#[async_trait::async_trait]
impl FundamentalsProvider for YahooClient {
    async fn annual_revenue(&self, symbol: &str) -> Result<Vec<AnnualRevenue>> {
        let url = format!(
            "{}/ws/fundamentals-timeseries/v1/finance/timeseries/{}",
            self.base_url.trim_end_matches('/'),
            symbol
        );
        let period1 = FUNDAMENTALS_PERIOD_START.to_string();
        let period2 = Utc::now().timestamp().to_string();
        let body = self
            .http
            .get_json(
                &url,
                &[
                    ("type", REVENUE_SERIES),
                    ("period1", period1.as_str()),
                    ("period2", period2.as_str()),
                ],
            )
            .await?;
        parse_revenue(body)
    }
}

fn parse_chart(symbol: &str, body: Value) -> Result<Option<ChartData>> {
    let parsed: ChartResponse =
        serde_json::from_value(body).context("failed to parse Yahoo chart response")?;

    if let Some(err) = parsed.chart.error {
        if err.code == "Not Found" {
            tracing::debug!(symbol, "Yahoo chart: symbol not found");
            return Ok(None);
        }
        anyhow::bail!("Yahoo chart error for {symbol}: {}: {}", err.code, err.description);
    }

    Ok(parsed.chart.result.and_then(|r| r.into_iter().next()))
}

/// Null closes (halted or partial days) are skipped; a repeated date keeps
/// the later bar.
fn chart_to_series(symbol: &str, data: &ChartData) -> Result<PriceSeries, SignalError> {
    let closes = data
        .indicators
        .quote
        .first()
        .map(|q| q.close.as_slice())
        .unwrap_or_default();

    let mut by_date = BTreeMap::<NaiveDate, f64>::new();
    for (idx, ts) in data.timestamp.iter().enumerate() {
        let Some(close) = closes.get(idx).copied().flatten() else {
            continue;
        };
        let Some(date) = DateTime::from_timestamp(*ts, 0).map(|dt| dt.date_naive()) else {
            continue;
        };
        by_date.insert(date, close);
    }

    let points = by_date
        .into_iter()
        .map(|(date, close)| PricePoint { date, close })
        .collect();
    PriceSeries::new(symbol, points)
}

fn parse_revenue(body: Value) -> Result<Vec<AnnualRevenue>> {
    let results = body
        .pointer("/timeseries/result")
        .and_then(Value::as_array)
        .context("Yahoo timeseries response has no result array")?;

    let mut out = Vec::new();
    for result in results {
        let Some(entries) = result.get(REVENUE_SERIES).and_then(Value::as_array) else {
            continue;
        };
        for entry in entries {
            let Some(date) = entry
                .get("asOfDate")
                .and_then(Value::as_str)
                .and_then(|s| NaiveDate::parse_from_str(s, "%Y-%m-%d").ok())
            else {
                continue;
            };
            let Some(revenue) = entry.pointer("/reportedValue/raw").and_then(Value::as_f64) else {
                continue;
            };
            out.push(AnnualRevenue {
                period_end: date,
                revenue,
                currency: entry
                    .get("currencyCode")
                    .and_then(Value::as_str)
                    .map(str::to_string),
            });
        }
    }

    out.sort_by_key(|r| r.period_end);
    out.dedup_by_key(|r| r.period_end);
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::http::canned::CannedServer;
    use serde_json::json;
    use std::time::Duration;

    const NOT_FOUND_BODY: &str = r#"{"chart":{"result":null,"error":{"code":"Not Found","description":"No data found, symbol may be delisted"}}}"#;

    fn client_for(server: &CannedServer) -> YahooClient {
        let http = JsonHttp::new(Duration::from_secs(5), 3, Duration::from_millis(1)).unwrap();
        YahooClient::new(http, server.base_url.clone())
    }

    fn chart_body() -> Value {
        // 2026-03-02, 03, 04 (UTC 14:30), with a null close and a repeated day.
        json!({
            "chart": {
                "result": [{
                    "meta": {"symbol": "AAPL", "regularMarketPrice": 262.5, "currency": "USD"},
                    "timestamp": [1772461800, 1772548200, 1772634600, 1772638200],
                    "indicators": {
                        "quote": [{
                            "open": [1.0, 1.0, 1.0, 1.0],
                            "close": [260.1, null, 261.0, 261.4],
                            "volume": [1, 1, 1, 1]
                        }]
                    }
                }],
                "error": null
            }
        })
    }

    #[test]
    fn chart_closes_become_ascending_series() {
        let data = parse_chart("AAPL", chart_body()).unwrap().unwrap();
        let series = chart_to_series("AAPL", &data).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.points()[0].date, NaiveDate::from_ymd_opt(2026, 3, 2).unwrap());
        assert_eq!(series.points()[1].date, NaiveDate::from_ymd_opt(2026, 3, 4).unwrap());
        assert_eq!(series.points()[1].close, 261.4);
        assert_eq!(data.meta.regular_market_price, Some(262.5));
    }

    #[test]
    fn not_found_is_unavailable() {
        let body = json!({
            "chart": {"result": null, "error": {"code": "Not Found", "description": "No data found, symbol may be delisted"}}
        });
        assert!(parse_chart("NOPE", body).unwrap().is_none());
    }

    #[test]
    fn other_chart_errors_fail() {
        let body = json!({
            "chart": {"result": null, "error": {"code": "Bad Request", "description": "Invalid input - interval=1x is not supported"}}
        });
        assert!(parse_chart("AAPL", body).is_err());
    }

    #[test]
    fn revenue_is_sorted_and_skips_nulls() {
        let body = json!({
            "timeseries": {
                "result": [{
                    "meta": {"symbol": ["AAPL"], "type": ["annualTotalRevenue"]},
                    "timestamp": [1632960000, 1664496000, 1695945600],
                    "annualTotalRevenue": [
                        {"asOfDate": "2023-09-30", "periodType": "12M", "currencyCode": "USD", "reportedValue": {"raw": 383285000000.0, "fmt": "383.29B"}},
                        null,
                        {"asOfDate": "2021-09-30", "periodType": "12M", "currencyCode": "USD", "reportedValue": {"raw": 365817000000.0, "fmt": "365.82B"}}
                    ]
                }],
                "error": null
            }
        });
        let rows = parse_revenue(body).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].period_end, NaiveDate::from_ymd_opt(2021, 9, 30).unwrap());
        assert_eq!(rows[1].revenue, 383285000000.0);
        assert_eq!(rows[1].currency.as_deref(), Some("USD"));
    }

    #[test]
    fn revenue_without_result_array_is_an_error() {
        assert!(parse_revenue(json!({"timeseries": {"error": "boom"}})).is_err());
    }

    #[tokio::test]
    async fn unknown_symbol_over_http_is_unavailable() {
        let server = CannedServer::start(vec![(404, NOT_FOUND_BODY)]);
        let yahoo = client_for(&server);

        assert!(yahoo.fetch_history("NOPE", Lookback::OneYear).await.unwrap().is_none());
        assert_eq!(yahoo.current_price("NOPE").await.unwrap(), None);
        assert_eq!(server.hits(), 2);
    }

    #[tokio::test]
    async fn history_is_fetched_over_http() {
        let body: &'static str = Box::leak(chart_body().to_string().into_boxed_str());
        let server = CannedServer::start(vec![(200, body)]);
        let series = client_for(&server)
            .fetch_history("AAPL", Lookback::OneMonth)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(series.symbol(), "AAPL");
        assert_eq!(series.len(), 2);
    }
}
