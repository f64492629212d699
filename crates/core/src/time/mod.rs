pub mod lookback;
