use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Finnhub `/stock/profile2` payload. Every field is optional on the free tier.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    #[serde(default)]
    pub ticker: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub exchange: Option<String>,
    #[serde(default, rename = "finnhubIndustry")]
    pub industry: Option<String>,
    #[serde(default, rename = "gsector")]
    pub sector: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub ipo: Option<String>,
    /// Millions, in `currency`.
    #[serde(default, rename = "marketCapitalization")]
    pub market_cap_millions: Option<f64>,
    /// Millions of shares.
    #[serde(default, rename = "shareOutstanding")]
    pub shares_outstanding_millions: Option<f64>,
    #[serde(default, rename = "weburl")]
    pub website: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default, rename = "employeeTotal")]
    pub employee_total: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolMatch {
    #[serde(default)]
    pub symbol: String,
    #[serde(default, rename = "displaySymbol")]
    pub display_symbol: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default, rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct KeyMetrics {
    pub pe_ratio: Option<f64>,
    /// Percent, e.g. `0.45` for 0.45%.
    pub dividend_yield_pct: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnualRevenue {
    pub period_end: NaiveDate,
    pub revenue: f64,
    pub currency: Option<String>,
}
