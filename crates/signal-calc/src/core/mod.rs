//! Expression core: errors, number formatting, parsing and evaluation
//!
//! Everything here operates on plain data. Keystroke bookkeeping lives in
//! [`crate::engine`].

pub mod evaluator;
pub mod history;
mod operations;
pub mod parser;

pub use operations::{is_operator_token, Operation};

use thiserror::Error;

/// Result type for expression operations
pub type CalcResult<T> = Result<T, CalcError>;

/// Literal shown on the display after a failed evaluation
pub const ERROR_DISPLAY: &str = "Error";

/// Display value of a fresh or cleared engine
pub const DEFAULT_DISPLAY: &str = "0";

/// Why an expression could not be turned into a number
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    /// The translated expression contains characters outside the arithmetic whitelist
    #[error("Invalid expression: {expression:?}")]
    InvalidExpression {
        /// The translated expression that was rejected
        expression: String,
    },
    /// The arithmetic grammar rejected the token sequence
    #[error("Syntax error: {0}")]
    Parse(String),
    /// Nothing to evaluate
    #[error("Empty expression")]
    EmptyExpression,
    /// An operation produced NaN or infinity
    #[error("Result is not a finite number")]
    NonFinite,
}

impl CalcError {
    /// Creates a parse error
    #[must_use]
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// The message surfaced to the user through the engine's error field
    #[must_use]
    pub const fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidExpression { .. } => "Invalid expression",
            Self::Parse(_) | Self::EmptyExpression | Self::NonFinite => ERROR_DISPLAY,
        }
    }
}

/// Formats a number as a plain decimal string
///
/// Uses the shortest representation that round-trips, never exponent
/// notation, and prints negative zero as `"0"`. Infinity and NaN have no
/// display form and are rejected with [`CalcError::NonFinite`].
pub fn format_number(value: f64) -> CalcResult<String> {
    if !value.is_finite() {
        return Err(CalcError::NonFinite);
    }
    if value == 0.0 {
        return Ok(DEFAULT_DISPLAY.to_string());
    }
    Ok(format!("{value}"))
}

/// Parses a display string, treating anything unparsable as zero
#[must_use]
pub fn parse_display(display: &str) -> f64 {
    display.parse::<f64>().unwrap_or(0.0)
}
