//! Calculator engine: keypad state and its transitions
//!
//! [`CalcState`] is an explicit value. Every action is a method that consumes
//! the current state and returns the next one, so each transition can be
//! tested without any UI. [`Calculator`] owns one state for the lifetime of a
//! screen session and exposes the same actions through `&mut self`.
//!
//! # Example
//!
//! ```rust
//! use signal_calc::Calculator;
//!
//! let mut calc = Calculator::new();
//! calc.append_digit('4');
//! calc.choose_operator("+");
//! calc.append_digit('6');
//! assert_eq!(calc.perform_operation(), "10");
//! assert_eq!(calc.history().latest().unwrap().expression, "4 + 6");
//! ```

use crate::config::EngineConfig;
use crate::core::evaluator::Evaluator;
use crate::core::history::{History, HistoryEntry};
use crate::core::{
    format_number, is_operator_token, parse_display, CalcError, DEFAULT_DISPLAY, ERROR_DISPLAY,
};
use serde::Serialize;

/// Label shown for an empty memory register
pub const EMPTY_MEMORY_LABEL: &str = "—";

/// Complete calculator state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CalcState {
    display: String,
    tokens: Vec<String>,
    history: History,
    memory: Option<f64>,
    last_result: Option<String>,
    error: Option<String>,
    /// The display holds an operand the user produced, as opposed to the
    /// initial "0" or the error marker.
    #[serde(skip)]
    entering: bool,
}

impl Default for CalcState {
    fn default() -> Self {
        Self::new()
    }
}

impl CalcState {
    /// Creates a fresh state with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&EngineConfig::default())
    }

    /// Creates a fresh state
    #[must_use]
    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            display: DEFAULT_DISPLAY.to_string(),
            tokens: Vec::new(),
            history: History::with_limit(config.history_limit),
            memory: None,
            last_result: None,
            error: None,
            entering: false,
        }
    }

    // ===== Read side =====

    /// The value being typed or the last result
    #[must_use]
    pub fn display(&self) -> &str {
        &self.display
    }

    /// Committed expression tokens
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// Completed evaluations, most recent first
    #[must_use]
    pub fn history(&self) -> &History {
        &self.history
    }

    /// The memory register
    #[must_use]
    pub fn memory(&self) -> Option<f64> {
        self.memory
    }

    /// The most recent successful result
    #[must_use]
    pub fn last_result(&self) -> Option<&str> {
        self.last_result.as_deref()
    }

    /// Message describing the last failure
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Returns true if the display holds an operand that will be committed
    #[must_use]
    pub fn holds_operand(&self) -> bool {
        self.entering
    }

    /// The tokens an evaluation would see right now
    #[must_use]
    pub fn working_tokens(&self) -> Vec<String> {
        let mut working = self.tokens.clone();
        if self.entering {
            working.push(self.display.clone());
        }
        working
    }

    /// True when the working expression is non-empty and does not end in an operator
    #[must_use]
    pub fn can_evaluate(&self) -> bool {
        if self.entering {
            return true;
        }
        self.tokens
            .last()
            .is_some_and(|last| !is_operator_token(last))
    }

    /// Tokens followed by the display, as shown above the result line
    #[must_use]
    pub fn expression_preview(&self) -> String {
        self.tokens
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(self.display.as_str()))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// The error message if one is set, otherwise the display
    #[must_use]
    pub fn shown_text(&self) -> &str {
        self.error.as_deref().unwrap_or(&self.display)
    }

    /// Memory as shown in the memory line
    #[must_use]
    pub fn memory_label(&self) -> String {
        self.memory
            .and_then(|value| format_number(value).ok())
            .unwrap_or_else(|| EMPTY_MEMORY_LABEL.to_string())
    }

    /// Serializable copy of the consumer-facing fields
    #[must_use]
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            display: self.display.clone(),
            tokens: self.tokens.clone(),
            history: self.history.to_vec(),
            memory: self.memory,
            last_result: self.last_result.clone(),
            error: self.error.clone(),
            can_evaluate: self.can_evaluate(),
        }
    }

    // ===== Transitions =====

    /// Appends a digit or decimal point to the display
    #[must_use]
    pub fn append_digit(mut self, digit: char) -> Self {
        if !(digit.is_ascii_digit() || digit == '.') {
            tracing::debug!(%digit, "ignoring non-digit keystroke");
            return self;
        }
        self.leave_error();
        if digit == '.' {
            if !self.display.contains('.') {
                self.display.push('.');
            }
        } else if self.display == DEFAULT_DISPLAY {
            self.display = digit.to_string();
        } else {
            self.display.push(digit);
        }
        self.entering = true;
        self
    }

    /// Removes the last character of the display
    #[must_use]
    pub fn backspace(mut self) -> Self {
        self.leave_error();
        self.display.pop();
        if self.display.is_empty() || self.display == "-" {
            self.display = DEFAULT_DISPLAY.to_string();
        }
        self.entering = self.display != DEFAULT_DISPLAY;
        self
    }

    /// Resets the display and discards pending tokens
    #[must_use]
    pub fn clear(mut self) -> Self {
        self.display = DEFAULT_DISPLAY.to_string();
        self.tokens.clear();
        self.error = None;
        self.entering = false;
        self
    }

    /// Clears input, history, memory and the last result
    #[must_use]
    pub fn clear_all(self) -> Self {
        let mut next = self.clear();
        next.history.clear();
        next.memory = None;
        next.last_result = None;
        next
    }

    /// Flips the sign of the display value
    #[must_use]
    pub fn toggle_sign(mut self) -> Self {
        self.leave_error();
        if self.display == DEFAULT_DISPLAY {
            return self;
        }
        self.display = match self.display.strip_prefix('-') {
            Some(unsigned) => unsigned.to_string(),
            None => format!("-{}", self.display),
        };
        self.entering = true;
        self
    }

    /// Divides the display value by 100
    #[must_use]
    pub fn percent(mut self) -> Self {
        self.leave_error();
        match format_number(parse_display(&self.display) / 100.0) {
            Ok(display) => {
                self.display = display;
                self.entering = self.entering || self.display != DEFAULT_DISPLAY;
            }
            Err(err) => self.fail(&err),
        }
        self
    }

    /// Opens or closes a parenthesised group
    ///
    /// `(` goes straight into the token stream. `)` first commits the
    /// operand on the display.
    #[must_use]
    pub fn append_parenthesis(mut self, paren: char) -> Self {
        match paren {
            '(' => {
                self.leave_error();
                self.tokens.push(paren.to_string());
            }
            ')' => {
                self.leave_error();
                self.commit_operand();
                self.tokens.push(paren.to_string());
            }
            other => tracing::debug!(%other, "ignoring non-parenthesis keystroke"),
        }
        self
    }

    /// Commits the display and appends an operator
    ///
    /// A trailing operator is replaced rather than followed. On an empty
    /// stream the last result, or zero, becomes the left operand.
    #[must_use]
    pub fn choose_operator(mut self, op: &str) -> Self {
        self.leave_error();
        self.commit_operand();
        let trailing_operator = self.tokens.last().is_some_and(|t| is_operator_token(t));
        if trailing_operator {
            self.tokens.pop();
        } else if self.tokens.is_empty() {
            let lead = self
                .last_result
                .clone()
                .unwrap_or_else(|| DEFAULT_DISPLAY.to_string());
            self.tokens.push(lead);
        }
        self.tokens.push(op.to_string());
        self
    }

    /// Evaluates the working expression
    ///
    /// Failures leave tokens, history, memory and the last result untouched;
    /// only the display and the error field change.
    #[must_use]
    pub fn perform_operation(mut self) -> Self {
        self.leave_error();
        let working = self.working_tokens();
        if working.is_empty() {
            return self;
        }
        let expression = working.join(" ");

        match Evaluator::new()
            .evaluate_tokens(&working)
            .and_then(format_number)
        {
            Ok(result) => {
                tracing::debug!(%expression, %result, "evaluated expression");
                self.history.record(expression, result.clone());
                self.last_result = Some(result.clone());
                self.display = result;
                self.tokens.clear();
                self.entering = true;
            }
            Err(err) => {
                tracing::warn!(%expression, %err, "evaluation failed");
                self.fail(&err);
            }
        }
        self
    }

    /// Puts the last result on the display
    #[must_use]
    pub fn recall_answer(mut self) -> Self {
        if let Some(result) = self.last_result.clone() {
            self.leave_error();
            self.display = result;
            self.entering = true;
        }
        self
    }

    /// Empties the memory register
    #[must_use]
    pub fn memory_clear(mut self) -> Self {
        self.memory = None;
        self
    }

    /// Puts the memory value on the display
    #[must_use]
    pub fn memory_recall(mut self) -> Self {
        if let Some(Ok(text)) = self.memory.map(format_number) {
            self.leave_error();
            self.display = text;
            self.entering = true;
        }
        self
    }

    /// Adds the display value to memory
    #[must_use]
    pub fn memory_add(self) -> Self {
        let operand = parse_display(&self.display);
        self.adjust_memory(operand)
    }

    /// Subtracts the display value from memory
    #[must_use]
    pub fn memory_subtract(self) -> Self {
        let operand = parse_display(&self.display);
        self.adjust_memory(-operand)
    }

    fn adjust_memory(mut self, delta: f64) -> Self {
        let next = self.memory.unwrap_or(0.0) + delta;
        if next.is_finite() {
            self.memory = Some(next);
        } else {
            tracing::warn!(delta, "memory update overflowed; keeping previous value");
        }
        self
    }

    /// Moves an operand on the display into the token stream
    fn commit_operand(&mut self) {
        if self.entering {
            let operand = std::mem::replace(&mut self.display, DEFAULT_DISPLAY.to_string());
            tracing::debug!(%operand, "committed operand");
            self.tokens.push(operand);
            self.entering = false;
        }
    }

    /// Enters the error state; tokens, history, memory and answer are kept
    fn fail(&mut self, err: &CalcError) {
        self.error = Some(err.user_message().to_string());
        self.display = ERROR_DISPLAY.to_string();
        self.entering = false;
    }

    fn leave_error(&mut self) {
        self.error = None;
        if self.display == ERROR_DISPLAY {
            self.display = DEFAULT_DISPLAY.to_string();
            self.entering = false;
        }
    }
}

/// Consumer-facing view of a [`CalcState`]
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StateSnapshot {
    /// Display string
    pub display: String,
    /// Committed tokens
    pub tokens: Vec<String>,
    /// History, most recent first
    pub history: Vec<HistoryEntry>,
    /// Memory register (`null` when empty)
    pub memory: Option<f64>,
    /// Last result (`null` when none)
    pub last_result: Option<String>,
    /// Error message (`null` when none)
    pub error: Option<String>,
    /// Whether "=" is enabled
    pub can_evaluate: bool,
}

/// Owner of one [`CalcState`] for a screen session
#[derive(Debug, Clone, Default)]
pub struct Calculator {
    state: CalcState,
}

impl Calculator {
    /// Creates an engine with the default configuration
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an engine with a custom configuration
    #[must_use]
    pub fn with_config(config: &EngineConfig) -> Self {
        Self {
            state: CalcState::with_config(config),
        }
    }

    /// The current state
    #[must_use]
    pub fn state(&self) -> &CalcState {
        &self.state
    }

    fn apply(&mut self, transition: impl FnOnce(CalcState) -> CalcState) {
        let state = std::mem::take(&mut self.state);
        self.state = transition(state);
    }

    /// See [`CalcState::display`]
    #[must_use]
    pub fn display(&self) -> &str {
        self.state.display()
    }

    /// See [`CalcState::tokens`]
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        self.state.tokens()
    }

    /// See [`CalcState::history`]
    #[must_use]
    pub fn history(&self) -> &History {
        self.state.history()
    }

    /// See [`CalcState::memory`]
    #[must_use]
    pub fn memory(&self) -> Option<f64> {
        self.state.memory()
    }

    /// See [`CalcState::last_result`]
    #[must_use]
    pub fn last_result(&self) -> Option<&str> {
        self.state.last_result()
    }

    /// See [`CalcState::error`]
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.state.error()
    }

    /// See [`CalcState::can_evaluate`]
    #[must_use]
    pub fn can_evaluate(&self) -> bool {
        self.state.can_evaluate()
    }

    /// See [`CalcState::append_digit`]
    pub fn append_digit(&mut self, digit: char) {
        self.apply(|s| s.append_digit(digit));
    }

    /// See [`CalcState::backspace`]
    pub fn backspace(&mut self) {
        self.apply(CalcState::backspace);
    }

    /// See [`CalcState::clear`]
    pub fn clear(&mut self) {
        self.apply(CalcState::clear);
    }

    /// See [`CalcState::clear_all`]
    pub fn clear_all(&mut self) {
        self.apply(CalcState::clear_all);
    }

    /// See [`CalcState::toggle_sign`]
    pub fn toggle_sign(&mut self) {
        self.apply(CalcState::toggle_sign);
    }

    /// See [`CalcState::percent`]
    pub fn percent(&mut self) {
        self.apply(CalcState::percent);
    }

    /// See [`CalcState::append_parenthesis`]
    pub fn append_parenthesis(&mut self, paren: char) {
        self.apply(|s| s.append_parenthesis(paren));
    }

    /// See [`CalcState::choose_operator`]
    pub fn choose_operator(&mut self, op: &str) {
        self.apply(|s| s.choose_operator(op));
    }

    /// Evaluates and returns the new display string
    pub fn perform_operation(&mut self) -> String {
        self.apply(CalcState::perform_operation);
        self.state.display().to_string()
    }

    /// See [`CalcState::recall_answer`]
    pub fn recall_answer(&mut self) {
        self.apply(CalcState::recall_answer);
    }

    /// See [`CalcState::memory_clear`]
    pub fn memory_clear(&mut self) {
        self.apply(CalcState::memory_clear);
    }

    /// See [`CalcState::memory_recall`]
    pub fn memory_recall(&mut self) {
        self.apply(CalcState::memory_recall);
    }

    /// See [`CalcState::memory_add`]
    pub fn memory_add(&mut self) {
        self.apply(CalcState::memory_add);
    }

    /// See [`CalcState::memory_subtract`]
    pub fn memory_subtract(&mut self) {
        self.apply(CalcState::memory_subtract);
    }
}
