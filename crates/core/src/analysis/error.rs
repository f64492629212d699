use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalError {
    /// The latest short or long average is undefined.
    #[error(
        "insufficient history: {available} closes available, {required} needed for the latest averages"
    )]
    DataInsufficient { available: usize, required: usize },

    #[error("invalid input: {0}")]
    InvalidInput(String),
}
