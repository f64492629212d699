//! Moving-average crossover signal.
//!
//! Pure functions only: the same averages and live price always yield the
//! same [`Recommendation`].

use crate::analysis::error::SignalError;
use crate::analysis::moving_average::MovingAverageSet;
use crate::domain::recommendation::{Recommendation, Signal};
use crate::domain::series::PriceSeries;
use std::cmp::Ordering;

/// Computes the standard 20/50 averages for `series` and evaluates them.
pub fn recommend(
    series: &PriceSeries,
    current_price: Option<f64>,
) -> Result<Recommendation, SignalError> {
    let averages = MovingAverageSet::standard(series)?;
    evaluate(&averages, current_price)
}

pub fn evaluate(
    averages: &MovingAverageSet,
    current_price: Option<f64>,
) -> Result<Recommendation, SignalError> {
    let (short, long) = (&averages.short, &averages.long);
    if short.len() != long.len() {
        return Err(SignalError::InvalidInput(format!(
            "average sequences are misaligned ({} vs {})",
            short.len(),
            long.len()
        )));
    }
    if let Some(price) = current_price {
        if !price.is_finite() || price <= 0.0 {
            return Err(SignalError::InvalidInput(format!(
                "current price must be a positive finite number (got {price})"
            )));
        }
    }

    let insufficient = || SignalError::DataInsufficient {
        available: short.len(),
        required: averages.long_window.max(averages.short_window),
    };
    let n = short.len();
    let s0 = short.last().copied().flatten().ok_or_else(insufficient)?;
    let l0 = long.last().copied().flatten().ok_or_else(insufficient)?;

    let prior = if n >= 2 {
        short[n - 2].zip(long[n - 2])
    } else {
        None
    };

    let short_label = format!("{}-Day SMA", averages.short_window);
    let long_label = format!("{}-Day SMA", averages.long_window);

    let mut reasons = Vec::new();
    let mut signal = Signal::Hold;

    match prior {
        Some((s1, l1)) if s0 > l0 && s1 <= l1 => {
            signal = Signal::Buy;
            reasons.push(format!(
                "The {short_label} has just crossed above the {long_label} (a 'Golden Cross'), \
                 a bullish crossover pointing to upward momentum."
            ));
        }
        Some((s1, l1)) if s0 < l0 && s1 >= l1 => {
            signal = Signal::Sell;
            reasons.push(format!(
                "The {short_label} has just crossed below the {long_label} (a 'Death Cross'), \
                 a bearish crossover pointing to downward momentum."
            ));
        }
        Some(_) => reasons.push(ordering_reason(s0, l0, &short_label, &long_label)),
        None => {
            reasons.push(
                "Not enough previous average data to check for a recent crossover; \
                 relying on the current positions of the averages."
                    .to_string(),
            );
            reasons.push(ordering_reason(s0, l0, &short_label, &long_label));
        }
    }

    match current_price {
        Some(price) => {
            let above_both = price > s0 && price > l0;
            let below_both = price < s0 && price < l0;

            if above_both {
                match signal {
                    Signal::Buy => {
                        signal = Signal::StrongBuy;
                        reasons.push(format!(
                            "The current price (${price:.2}) is trading above both averages, \
                             reinforcing the bullish outlook."
                        ));
                    }
                    Signal::Hold => {
                        signal = Signal::Buy;
                        reasons.push(format!(
                            "The current price (${price:.2}) is trading above both the \
                             {short_label} and the {long_label}, which supports an upward trend."
                        ));
                    }
                    _ => {}
                }
            } else if below_both {
                match signal {
                    Signal::Sell => {
                        signal = Signal::StrongSell;
                        reasons.push(format!(
                            "The current price (${price:.2}) is trading below both averages, \
                             reinforcing the bearish outlook."
                        ));
                    }
                    Signal::Hold => {
                        signal = Signal::Sell;
                        reasons.push(format!(
                            "The current price (${price:.2}) is trading below both the \
                             {short_label} and the {long_label}, which supports a downward trend."
                        ));
                    }
                    _ => {}
                }
            } else if signal == Signal::Hold {
                reasons.push(format!(
                    "The current price (${price:.2}) is hovering between the averages, \
                     suggesting a mixed or indecisive short-term market."
                ));
            } else {
                reasons.push(format!(
                    "Note: the current price (${price:.2}) sits between the averages, \
                     showing some short-term indecision despite the crossover."
                ));
            }
        }
        None => reasons.push(
            "Live price data could not be obtained, so this analysis relies purely on \
             historical moving averages."
                .to_string(),
        ),
    }

    Ok(Recommendation { signal, reasons })
}

fn ordering_reason(s0: f64, l0: f64, short_label: &str, long_label: &str) -> String {
    match s0.partial_cmp(&l0) {
        Some(Ordering::Greater) => format!(
            "The {short_label} is currently above the {long_label}, suggesting a positive \
             short-term trend relative to the medium term."
        ),
        Some(Ordering::Less) => format!(
            "The {short_label} is currently below the {long_label}, suggesting a negative \
             short-term trend relative to the medium term."
        ),
        _ => format!(
            "The {short_label} and {long_label} are equal, indicating a period of \
             consolidation or indecision."
        ),
    }
}
