use crate::config::Settings;
use crate::provider::http::JsonHttp;
use crate::provider::types::{CompanyProfile, KeyMetrics, SymbolMatch};
use crate::provider::{CompanyDirectory, LivePriceSource};
use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::Value;

/// Finnhub REST client. Without an API key every call reports "unavailable"
/// instead of failing, so Yahoo-only workflows keep working.
#[derive(Debug, Clone)]
pub struct FinnhubClient {
    http: JsonHttp,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct QuoteResponse {
    #[serde(default)]
    c: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    result: Vec<SymbolMatch>,
}

#[derive(Debug, Deserialize)]
struct MetricResponse {
    #[serde(default)]
    metric: Option<serde_json::Map<String, Value>>,
}

impl FinnhubClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        Ok(Self {
            http: JsonHttp::from_settings(settings)?,
            base_url: settings.finnhub_base_url.clone(),
            api_key: settings.finnhub_api_key.clone(),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    async fn get(&self, path: &str, params: &[(&str, &str)]) -> Result<Option<Value>> {
        let Some(token) = self.api_key.as_deref() else {
            tracing::debug!(path, "FINNHUB_API_KEY not set; skipping Finnhub request");
            return Ok(None);
        };

        let mut query: Vec<(&str, &str)> = params.to_vec();
        query.push(("token", token));
        let body = self.http.get_json(&self.url(path), &query).await?;
        Ok(Some(body))
    }
}

#[async_trait::async_trait]
impl LivePriceSource for FinnhubClient {
    fn provider_name(&self) -> &'static str {
        "finnhub"
    }

    async fn current_price(&self, symbol: &str) -> Result<Option<f64>> {
        match self.get("/quote", &[("symbol", symbol)]).await? {
            Some(body) => parse_quote(body),
            None => Ok(None),
        }
    }
}

#[async_trait::async_trait]
impl CompanyDirectory for FinnhubClient {
    async fn profile(&self, symbol: &str) -> Result<Option<CompanyProfile>> {
        match self.get("/stock/profile2", &[("symbol", symbol)]).await? {
            Some(body) => parse_profile(body),
            None => Ok(None),
        }
    }

    async fn search(&self, query: &str) -> Result<Vec<SymbolMatch>> {
        match self.get("/search", &[("q", query)]).await? {
            Some(body) => parse_search(body),
            None => Ok(Vec::new()),
        }
    }

    async fn metrics(&self, symbol: &str) -> Result<Option<KeyMetrics>> {
        match self
            .get("/stock/metric", &[("symbol", symbol), ("metric", "all")])
            .await?
        {
            Some(body) => parse_metrics(body),
            None => Ok(None),
        }
    }
}

fn api_error(body: &Value) -> Option<&str> {
    body.get("error").and_then(Value::as_str)
}

/// `c == 0` is how Finnhub reports an unknown symbol.
fn parse_quote(body: Value) -> Result<Option<f64>> {
    if let Some(err) = api_error(&body) {
        tracing::debug!(error = err, "Finnhub quote error");
        return Ok(None);
    }
    let quote: QuoteResponse =
        serde_json::from_value(body).context("failed to parse Finnhub quote response")?;
    Ok(quote.c.filter(|c| c.is_finite() && *c > 0.0))
}

fn parse_profile(body: Value) -> Result<Option<CompanyProfile>> {
    if api_error(&body).is_some() {
        return Ok(None);
    }
    match body.as_object() {
        Some(obj) if obj.is_empty() => Ok(None),
        Some(_) => serde_json::from_value(body)
            .map(Some)
            .context("failed to parse Finnhub profile response"),
        None => Ok(None),
    }
}

fn parse_search(body: Value) -> Result<Vec<SymbolMatch>> {
    if api_error(&body).is_some() {
        return Ok(Vec::new());
    }
    let parsed: SearchResponse =
        serde_json::from_value(body).context("failed to parse Finnhub search response")?;
    Ok(parsed.result)
}

fn parse_metrics(body: Value) -> Result<Option<KeyMetrics>> {
    if api_error(&body).is_some() {
        return Ok(None);
    }
    let parsed: MetricResponse =
        serde_json::from_value(body).context("failed to parse Finnhub metric response")?;
    let Some(metric) = parsed.metric.filter(|m| !m.is_empty()) else {
        return Ok(None);
    };

    let first_of = |keys: &[&str]| {
        keys.iter()
            .find_map(|k| metric.get(*k).and_then(Value::as_f64))
            .filter(|v| v.is_finite())
    };

    Ok(Some(KeyMetrics {
        pe_ratio: first_of(&["peTTM", "peBasicExclExtraTTM", "peExclExtraTTM"]),
        dividend_yield_pct: first_of(&["currentDividendYieldTTM", "dividendYieldIndicatedAnnual"])
            .filter(|v| *v > 0.0),
    }))
}
