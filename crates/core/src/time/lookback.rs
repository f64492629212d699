use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Lookback {
    OneMonth,
    ThreeMonths,
    SixMonths,
    #[default]
    OneYear,
    TwoYears,
    FiveYears,
    Max,
}

impl Lookback {
    /// Yahoo chart `range` parameter.
    pub fn as_range(self) -> &'static str {
        match self {
            Lookback::OneMonth => "1mo",
            Lookback::ThreeMonths => "3mo",
            Lookback::SixMonths => "6mo",
            Lookback::OneYear => "1y",
            Lookback::TwoYears => "2y",
            Lookback::FiveYears => "5y",
            Lookback::Max => "max",
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            Lookback::OneMonth => "1 Month",
            Lookback::ThreeMonths => "3 Months",
            Lookback::SixMonths => "6 Months",
            Lookback::OneYear => "1 Year",
            Lookback::TwoYears => "2 Years",
            Lookback::FiveYears => "5 Years",
            Lookback::Max => "Max",
        }
    }
}

impl fmt::Display for Lookback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_range())
    }
}

impl FromStr for Lookback {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "1mo" => Ok(Lookback::OneMonth),
            "3mo" => Ok(Lookback::ThreeMonths),
            "6mo" => Ok(Lookback::SixMonths),
            "1y" => Ok(Lookback::OneYear),
            "2y" => Ok(Lookback::TwoYears),
            "5y" => Ok(Lookback::FiveYears),
            "max" => Ok(Lookback::Max),
            other => anyhow::bail!("unsupported lookback '{other}' (expected 1mo, 3mo, 6mo, 1y, 2y, 5y or max)"),
        }
    }
}
