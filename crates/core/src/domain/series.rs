use crate::analysis::error::SignalError;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Daily closes for one symbol, strictly ascending by date.
///
/// Construction validates the ordering and price invariants, so every
/// `PriceSeries` in circulation is safe to feed into the averages.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    symbol: String,
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(symbol: impl Into<String>, points: Vec<PricePoint>) -> Result<Self, SignalError> {
        let symbol = symbol.into();

        for (idx, point) in points.iter().enumerate() {
            if !point.close.is_finite() || point.close <= 0.0 {
                return Err(SignalError::InvalidInput(format!(
                    "{symbol}: close on {} must be a positive finite number (got {})",
                    point.date, point.close
                )));
            }
            if idx > 0 && points[idx - 1].date >= point.date {
                return Err(SignalError::InvalidInput(format!(
                    "{symbol}: dates must be strictly ascending ({} followed by {})",
                    points[idx - 1].date,
                    point.date
                )));
            }
        }

        Ok(Self { symbol, points })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.close).collect()
    }

    pub fn dates(&self) -> Vec<NaiveDate> {
        self.points.iter().map(|p| p.date).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 3, day).unwrap()
    }

    #[test]
    fn accepts_ascending_positive_closes() {
        let series = PriceSeries::new(
            "AAPL",
            vec![
                PricePoint { date: d(2), close: 10.0 },
                PricePoint { date: d(3), close: 10.5 },
            ],
        )
        .unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![10.0, 10.5]);
        assert_eq!(series.symbol(), "AAPL");
    }

    #[test]
    fn rejects_duplicate_or_descending_dates() {
        let dup = PriceSeries::new(
            "AAPL",
            vec![
                PricePoint { date: d(2), close: 10.0 },
                PricePoint { date: d(2), close: 10.5 },
            ],
        );
        assert!(matches!(dup, Err(SignalError::InvalidInput(_))));

        let desc = PriceSeries::new(
            "AAPL",
            vec![
                PricePoint { date: d(3), close: 10.0 },
                PricePoint { date: d(2), close: 10.5 },
            ],
        );
        assert!(matches!(desc, Err(SignalError::InvalidInput(_))));
    }

    #[test]
    fn rejects_non_positive_and_nan_closes() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let res = PriceSeries::new("AAPL", vec![PricePoint { date: d(2), close: bad }]);
            assert!(matches!(res, Err(SignalError::InvalidInput(_))), "accepted {bad}");
        }
    }
}
