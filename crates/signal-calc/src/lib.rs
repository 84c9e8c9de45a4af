//! Signal Calculator engine
//!
//! The expression-building and evaluation core behind a calculator keypad:
//! keystrokes become committed tokens, tokens are evaluated with ordinary
//! arithmetic precedence, and the engine keeps the display, a memory
//! register, the last answer and a short history.
//!
//! Evaluation never executes text. Committed tokens are translated, checked
//! against an arithmetic-only character set, lexed and parsed into an AST,
//! and the AST is walked with finite-value checks at every step.
//!
//! # Example
//!
//! ```rust
//! use signal_calc::prelude::*;
//!
//! let mut calc = Calculator::new();
//! calc.append_digit('5');
//! calc.percent();
//! calc.toggle_sign();
//! assert_eq!(calc.display(), "-0.05");
//!
//! calc.clear();
//! calc.append_digit('5');
//! calc.choose_operator("÷");
//! calc.append_digit('0');
//! assert_eq!(calc.perform_operation(), "Error");
//! assert_eq!(calc.error(), Some("Error"));
//! ```

#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::panic,
        clippy::float_cmp
    )
)]
#![deny(missing_docs)]
#![deny(missing_debug_implementations)]

pub mod config;
pub mod core;
pub mod engine;
pub mod feedback;
pub mod keypad;

pub use config::EngineConfig;
pub use crate::core::{CalcError, CalcResult};
pub use engine::{CalcState, Calculator, StateSnapshot};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::config::EngineConfig;
    pub use crate::core::evaluator::Evaluator;
    pub use crate::core::history::{History, HistoryEntry};
    pub use crate::core::parser::{AstNode, Parser, Token, Tokenizer};
    pub use crate::core::{format_number, CalcError, CalcResult, Operation};
    pub use crate::engine::{CalcState, Calculator, StateSnapshot};
    pub use crate::feedback::{Feedback, FeedbackError, FeedbackKind, NoFeedback, RecordingFeedback};
    pub use crate::keypad::{press, Keypad, KeypadAction, KeypadButton, Press};
}
