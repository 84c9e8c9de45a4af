//! On-screen keypad layout and key dispatch
//!
//! Layout:
//! ```text
//! [ MC  ] [ MR ] [ M+ ] [ M- ]
//! [ C   ] [ ⌫  ] [ (  ] [ )  ]
//! [ 7   ] [ 8  ] [ 9  ] [ ÷  ]
//! [ 4   ] [ 5  ] [ 6  ] [ ×  ]
//! [ 1   ] [ 2  ] [ 3  ] [ -  ]
//! [ ±   ] [ 0  ] [ .  ] [ +  ]
//! [ Ans ] [ %  ] [    =     ]
//! ```

use crate::core::Operation;
use crate::engine::Calculator;
use crate::feedback::{fire_and_forget, Feedback, FeedbackKind};

/// What a key does when tapped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeypadAction {
    /// Insert a digit (0-9)
    Digit(u8),
    /// Insert a decimal point
    Decimal,
    /// Choose an operator
    Operator(Operation),
    /// Open a parenthesised group
    OpenParen,
    /// Close a parenthesised group
    CloseParen,
    /// Evaluate the expression
    Equals,
    /// Clear input, history, memory and answer
    ClearAll,
    /// Clear the pending input only (long press on backspace)
    Clear,
    /// Delete the last character (long press clears the input)
    Backspace,
    /// Flip the sign of the display
    ToggleSign,
    /// Divide the display by 100
    Percent,
    /// Recall the last answer
    RecallAnswer,
    /// Empty the memory register
    MemoryClear,
    /// Recall the memory register
    MemoryRecall,
    /// Add the display to memory
    MemoryAdd,
    /// Subtract the display from memory
    MemorySubtract,
}

impl KeypadAction {
    /// Returns the key label
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Digit(d) => d.to_string(),
            Self::Decimal => ".".to_string(),
            Self::Operator(op) => op.glyph().to_string(),
            Self::OpenParen => "(".to_string(),
            Self::CloseParen => ")".to_string(),
            Self::Equals => "=".to_string(),
            Self::ClearAll => "C".to_string(),
            Self::Clear => "CE".to_string(),
            Self::Backspace => "⌫".to_string(),
            Self::ToggleSign => "±".to_string(),
            Self::Percent => "%".to_string(),
            Self::RecallAnswer => "Ans".to_string(),
            Self::MemoryClear => "MC".to_string(),
            Self::MemoryRecall => "MR".to_string(),
            Self::MemoryAdd => "M+".to_string(),
            Self::MemorySubtract => "M-".to_string(),
        }
    }

    /// Looks up a key by label, accepting ASCII spellings of the glyph keys
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        let action = match label {
            "." => Self::Decimal,
            "(" => Self::OpenParen,
            ")" => Self::CloseParen,
            "=" => Self::Equals,
            "C" | "c" | "AC" => Self::ClearAll,
            "CE" | "ce" => Self::Clear,
            "⌫" | "<-" | "DEL" | "del" => Self::Backspace,
            "±" | "+/-" | "neg" => Self::ToggleSign,
            "%" => Self::Percent,
            "Ans" | "ans" | "ANS" => Self::RecallAnswer,
            "MC" | "mc" => Self::MemoryClear,
            "MR" | "mr" => Self::MemoryRecall,
            "M+" | "m+" => Self::MemoryAdd,
            "M-" | "m-" => Self::MemorySubtract,
            _ => {
                if let Some(op) = Operation::from_token(label) {
                    Self::Operator(op)
                } else {
                    let mut chars = label.chars();
                    match (chars.next().and_then(|c| c.to_digit(10)), chars.next()) {
                        (Some(d), None) => Self::Digit(d as u8),
                        _ => return None,
                    }
                }
            }
        };
        Some(action)
    }

    /// The action a long press runs, if the key has one
    #[must_use]
    pub const fn long_press(&self) -> Option<KeypadAction> {
        match self {
            Self::Backspace => Some(Self::Clear),
            _ => None,
        }
    }
}

/// How a key was pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Press {
    /// Ordinary tap
    #[default]
    Tap,
    /// Press and hold
    LongPress,
}

/// A key at a grid position
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeypadButton {
    /// The action this key performs
    pub action: KeypadAction,
    /// Grid row (0-indexed)
    pub row: usize,
    /// Grid column (0-indexed)
    pub col: usize,
    /// Number of columns the key spans
    pub span: usize,
}

impl KeypadButton {
    /// Creates a single-column key
    #[must_use]
    pub const fn new(action: KeypadAction, row: usize, col: usize) -> Self {
        Self {
            action,
            row,
            col,
            span: 1,
        }
    }

    /// Creates a key spanning several columns
    #[must_use]
    pub const fn wide(action: KeypadAction, row: usize, col: usize, span: usize) -> Self {
        Self {
            action,
            row,
            col,
            span,
        }
    }

    /// Returns the key label
    #[must_use]
    pub fn label(&self) -> String {
        self.action.label()
    }

    /// Returns true if the key is currently disabled
    #[must_use]
    pub fn is_disabled(&self, calc: &Calculator) -> bool {
        is_disabled(self.action, calc)
    }
}

/// The calculator keypad
#[derive(Debug, Clone)]
pub struct Keypad {
    buttons: Vec<KeypadButton>,
}

impl Default for Keypad {
    fn default() -> Self {
        Self::standard()
    }
}

impl Keypad {
    /// Number of columns in the grid
    pub const COLS: usize = 4;

    /// The standard seven-row layout
    #[must_use]
    pub fn standard() -> Self {
        use KeypadAction as A;
        let grid: [[KeypadAction; Self::COLS]; 6] = [
            [A::MemoryClear, A::MemoryRecall, A::MemoryAdd, A::MemorySubtract],
            [A::ClearAll, A::Backspace, A::OpenParen, A::CloseParen],
            [A::Digit(7), A::Digit(8), A::Digit(9), A::Operator(Operation::Divide)],
            [A::Digit(4), A::Digit(5), A::Digit(6), A::Operator(Operation::Multiply)],
            [A::Digit(1), A::Digit(2), A::Digit(3), A::Operator(Operation::Subtract)],
            [A::ToggleSign, A::Digit(0), A::Decimal, A::Operator(Operation::Add)],
        ];

        let mut buttons: Vec<KeypadButton> = grid
            .iter()
            .enumerate()
            .flat_map(|(row, keys)| {
                keys.iter()
                    .enumerate()
                    .map(move |(col, action)| KeypadButton::new(*action, row, col))
            })
            .collect();
        buttons.push(KeypadButton::new(A::RecallAnswer, 6, 0));
        buttons.push(KeypadButton::new(A::Percent, 6, 1));
        buttons.push(KeypadButton::wide(A::Equals, 6, 2, 2));

        Self { buttons }
    }

    /// All keys in row-major order
    #[must_use]
    pub fn buttons(&self) -> &[KeypadButton] {
        &self.buttons
    }

    /// Number of rows
    #[must_use]
    pub fn rows(&self) -> usize {
        self.buttons.iter().map(|b| b.row + 1).max().unwrap_or(0)
    }

    /// The key covering a grid cell
    #[must_use]
    pub fn button_at(&self, row: usize, col: usize) -> Option<&KeypadButton> {
        self.buttons
            .iter()
            .find(|b| b.row == row && col >= b.col && col < b.col + b.span)
    }

    /// The key for a label
    #[must_use]
    pub fn find(&self, label: &str) -> Option<&KeypadButton> {
        let action = KeypadAction::from_label(label)?;
        self.buttons.iter().find(|b| b.action == action)
    }
}

/// Returns true if the key cannot be pressed in the current state
#[must_use]
pub fn is_disabled(action: KeypadAction, calc: &Calculator) -> bool {
    action == KeypadAction::Equals && !calc.can_evaluate()
}

/// Presses a key
///
/// Disabled keys do nothing. Otherwise feedback fires first and then the
/// action runs; a long press runs the key's long-press action, if any.
/// Returns true if an action ran.
pub fn press(
    calc: &mut Calculator,
    action: KeypadAction,
    how: Press,
    feedback: &mut dyn Feedback,
) -> bool {
    if is_disabled(action, calc) {
        tracing::debug!(key = %action.label(), "key disabled");
        return false;
    }
    match how {
        Press::Tap => {
            fire_and_forget(feedback, FeedbackKind::Selection);
            run(calc, action);
            true
        }
        Press::LongPress => {
            fire_and_forget(feedback, FeedbackKind::LightImpact);
            match action.long_press() {
                Some(long) => {
                    run(calc, long);
                    true
                }
                None => false,
            }
        }
    }
}

fn run(calc: &mut Calculator, action: KeypadAction) {
    match action {
        KeypadAction::Digit(d) => {
            if let Some(ch) = char::from_digit(u32::from(d), 10) {
                calc.append_digit(ch);
            }
        }
        KeypadAction::Decimal => calc.append_digit('.'),
        KeypadAction::Operator(op) => calc.choose_operator(op.glyph()),
        KeypadAction::OpenParen => calc.append_parenthesis('('),
        KeypadAction::CloseParen => calc.append_parenthesis(')'),
        KeypadAction::Equals => {
            calc.perform_operation();
        }
        KeypadAction::ClearAll => calc.clear_all(),
        KeypadAction::Clear => calc.clear(),
        KeypadAction::Backspace => calc.backspace(),
        KeypadAction::ToggleSign => calc.toggle_sign(),
        KeypadAction::Percent => calc.percent(),
        KeypadAction::RecallAnswer => calc.recall_answer(),
        KeypadAction::MemoryClear => calc.memory_clear(),
        KeypadAction::MemoryRecall => calc.memory_recall(),
        KeypadAction::MemoryAdd => calc.memory_add(),
        KeypadAction::MemorySubtract => calc.memory_subtract(),
    }
}
