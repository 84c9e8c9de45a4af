//! Arithmetic operators and checked application

use crate::core::{CalcError, CalcResult};

/// Binary operators understood by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    /// Addition (+)
    Add,
    /// Subtraction (-)
    Subtract,
    /// Multiplication (×)
    Multiply,
    /// Division (÷)
    Divide,
    /// Exponentiation (^)
    Power,
}

impl Operation {
    /// All operators, in keypad order
    pub const ALL: [Self; 5] = [
        Self::Divide,
        Self::Multiply,
        Self::Subtract,
        Self::Add,
        Self::Power,
    ];

    /// Glyph shown on the keypad and stored in the token stream
    #[must_use]
    pub const fn glyph(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "×",
            Self::Divide => "÷",
            Self::Power => "^",
        }
    }

    /// Symbol used in the evaluable expression text
    #[must_use]
    pub const fn symbol(&self) -> &'static str {
        match self {
            Self::Add => "+",
            Self::Subtract => "-",
            Self::Multiply => "*",
            Self::Divide => "/",
            Self::Power => "**",
        }
    }

    /// Looks up an operator by glyph or evaluable symbol
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "+" => Some(Self::Add),
            "-" => Some(Self::Subtract),
            "×" | "*" => Some(Self::Multiply),
            "÷" | "/" => Some(Self::Divide),
            "^" | "**" => Some(Self::Power),
            _ => None,
        }
    }

    /// Binding strength (higher binds tighter)
    #[must_use]
    pub const fn precedence(&self) -> u8 {
        match self {
            Self::Add | Self::Subtract => 1,
            Self::Multiply | Self::Divide => 2,
            Self::Power => 3,
        }
    }

    /// Returns true if this operation groups left to right
    #[must_use]
    pub const fn is_left_associative(&self) -> bool {
        !matches!(self, Self::Power)
    }

    /// Applies the operator, rejecting NaN and infinite results
    pub fn apply(&self, a: f64, b: f64) -> CalcResult<f64> {
        let result = match self {
            Self::Add => a + b,
            Self::Subtract => a - b,
            Self::Multiply => a * b,
            Self::Divide => a / b,
            Self::Power => a.powf(b),
        };
        check_finite(result)
    }
}

/// Returns true if a committed token is an operator
#[must_use]
pub fn is_operator_token(token: &str) -> bool {
    Operation::from_token(token).is_some()
}

pub(crate) fn check_finite(value: f64) -> CalcResult<f64> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::NonFinite)
    }
}
