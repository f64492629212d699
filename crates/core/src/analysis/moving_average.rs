use crate::analysis::error::SignalError;
use crate::domain::series::PriceSeries;
use serde::Serialize;

pub const SHORT_WINDOW: usize = 20;
pub const LONG_WINDOW: usize = 50;

/// Trailing simple moving average aligned with `closes`.
///
/// Entry `i` is the mean of `closes[i + 1 - window..=i]`, or `None` while the
/// window is not yet full. Only prices at or before `i` are used.
pub fn simple_moving_average(closes: &[f64], window: usize) -> Result<Vec<Option<f64>>, SignalError> {
    if window == 0 {
        return Err(SignalError::InvalidInput(
            "moving average window must be >= 1".to_string(),
        ));
    }

    let out = (0..closes.len())
        .map(|i| {
            if i + 1 < window {
                return None;
            }
            let slice = &closes[i + 1 - window..=i];
            Some(slice.iter().sum::<f64>() / window as f64)
        })
        .collect();

    Ok(out)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MovingAverageSet {
    pub short_window: usize,
    pub long_window: usize,
    pub short: Vec<Option<f64>>,
    pub long: Vec<Option<f64>>,
}

impl MovingAverageSet {
    pub fn compute(
        series: &PriceSeries,
        short_window: usize,
        long_window: usize,
    ) -> Result<Self, SignalError> {
        if short_window >= long_window {
            return Err(SignalError::InvalidInput(format!(
                "short window ({short_window}) must be smaller than long window ({long_window})"
            )));
        }

        let closes = series.closes();
        Ok(Self {
            short_window,
            long_window,
            short: simple_moving_average(&closes, short_window)?,
            long: simple_moving_average(&closes, long_window)?,
        })
    }

    /// 20/50-day averages.
    pub fn standard(series: &PriceSeries) -> Result<Self, SignalError> {
        Self::compute(series, SHORT_WINDOW, LONG_WINDOW)
    }

    pub fn len(&self) -> usize {
        self.short.len()
    }

    pub fn is_empty(&self) -> bool {
        self.short.is_empty()
    }

    pub fn latest(&self) -> (Option<f64>, Option<f64>) {
        (
            self.short.last().copied().flatten(),
            self.long.last().copied().flatten(),
        )
    }
}
