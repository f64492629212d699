pub mod engine;
pub mod error;
pub mod moving_average;

pub use engine::{evaluate, recommend};
pub use error::SignalError;
pub use moving_average::{simple_moving_average, MovingAverageSet, LONG_WINDOW, SHORT_WINDOW};
