//! Property-based tests for the calculator engine
//!
//! Sequences of keypad actions are generated at random and the engine's
//! invariants are checked after every step.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use signal_calc::core::{is_operator_token, DEFAULT_DISPLAY, ERROR_DISPLAY};
use signal_calc::keypad::{press, KeypadAction, Press};
use signal_calc::prelude::*;

// ===== Strategy definitions =====

fn digit_strategy() -> impl Strategy<Value = char> {
    (0u32..=9).prop_map(|d| char::from_digit(d, 10).unwrap())
}

fn operator_strategy() -> impl Strategy<Value = Operation> {
    prop::sample::select(Operation::ALL.to_vec())
}

fn action_strategy() -> impl Strategy<Value = KeypadAction> {
    prop_oneof![
        4 => (0u8..=9).prop_map(KeypadAction::Digit),
        1 => Just(KeypadAction::Decimal),
        2 => operator_strategy().prop_map(KeypadAction::Operator),
        1 => Just(KeypadAction::OpenParen),
        1 => Just(KeypadAction::CloseParen),
        2 => Just(KeypadAction::Equals),
        1 => Just(KeypadAction::ClearAll),
        1 => Just(KeypadAction::Clear),
        1 => Just(KeypadAction::Backspace),
        1 => Just(KeypadAction::ToggleSign),
        1 => Just(KeypadAction::Percent),
        1 => Just(KeypadAction::RecallAnswer),
        1 => Just(KeypadAction::MemoryClear),
        1 => Just(KeypadAction::MemoryRecall),
        1 => Just(KeypadAction::MemoryAdd),
        1 => Just(KeypadAction::MemorySubtract),
    ]
}

fn run_actions(actions: &[KeypadAction]) -> Calculator {
    let mut calc = Calculator::new();
    for action in actions {
        press(&mut calc, *action, Press::Tap, &mut NoFeedback);
    }
    calc
}

// ===== Digit entry =====

proptest! {
    /// Typing digits concatenates them, with the leading zero replaced
    #[test]
    fn prop_digits_concatenate(digits in prop::collection::vec(digit_strategy(), 1..12)) {
        let mut calc = Calculator::new();
        for d in &digits {
            calc.append_digit(*d);
        }
        let typed: String = digits.iter().collect();
        let expected = typed.trim_start_matches('0');
        let expected = if expected.is_empty() { "0" } else { expected };
        prop_assert_eq!(calc.display(), expected);
    }

    /// The display never holds more than one decimal point
    #[test]
    fn prop_single_decimal_point(keys in prop::collection::vec(prop_oneof![digit_strategy(), Just('.')], 0..16)) {
        let mut calc = Calculator::new();
        for key in keys {
            calc.append_digit(key);
        }
        prop_assert!(calc.display().matches('.').count() <= 1);
        prop_assert!(calc.display().parse::<f64>().is_ok());
    }
}

// ===== Engine invariants =====

proptest! {
    /// No action sequence produces two operators in a row, an empty display,
    /// an unparsable display or an oversized history
    #[test]
    fn prop_invariants_hold(actions in prop::collection::vec(action_strategy(), 0..60)) {
        let mut calc = Calculator::new();
        for action in actions {
            press(&mut calc, action, Press::Tap, &mut NoFeedback);

            let tokens = calc.tokens();
            for pair in tokens.windows(2) {
                prop_assert!(
                    !(is_operator_token(&pair[0]) && is_operator_token(&pair[1])),
                    "consecutive operators in {:?}", tokens
                );
            }
            let display = calc.display();
            prop_assert!(!display.is_empty());
            prop_assert!(display == ERROR_DISPLAY || display.parse::<f64>().is_ok(), "bad display {}", display);
            prop_assert!(display.matches('.').count() <= 1);
            prop_assert!(calc.history().len() <= 5);
            prop_assert_eq!(calc.error().is_some(), display == ERROR_DISPLAY);
        }
    }

    /// Clearing everything always returns to the initial state
    #[test]
    fn prop_clear_all_resets(actions in prop::collection::vec(action_strategy(), 0..40)) {
        let mut calc = run_actions(&actions);
        calc.clear_all();
        prop_assert_eq!(calc.display(), DEFAULT_DISPLAY);
        prop_assert!(calc.tokens().is_empty());
        prop_assert!(calc.history().is_empty());
        prop_assert_eq!(calc.memory(), None);
        prop_assert_eq!(calc.last_result(), None);
        prop_assert_eq!(calc.error(), None);
        prop_assert_eq!(calc.state(), &CalcState::new());
    }

    /// Failed evaluations leave tokens, history and the last answer alone
    #[test]
    fn prop_failure_preserves_state(actions in prop::collection::vec(action_strategy(), 0..40)) {
        let mut calc = run_actions(&actions);
        let tokens = calc.tokens().to_vec();
        let history = calc.history().clone();
        let last = calc.last_result().map(str::to_string);
        let memory = calc.memory();

        let display = calc.perform_operation();
        if calc.error().is_some() {
            prop_assert_eq!(display, ERROR_DISPLAY);
            prop_assert_eq!(calc.tokens(), tokens.as_slice());
            prop_assert_eq!(calc.history(), &history);
            prop_assert_eq!(calc.last_result().map(str::to_string), last);
        }
        prop_assert_eq!(calc.memory(), memory);
    }

    /// A simple binary expression evaluates to its f64 result
    #[test]
    fn prop_binary_expression(a in 1u32..1000, b in 1u32..1000, op in operator_strategy()) {
        prop_assume!(op != Operation::Power);
        let mut calc = Calculator::new();
        for d in a.to_string().chars() {
            calc.append_digit(d);
        }
        calc.choose_operator(op.glyph());
        for d in b.to_string().chars() {
            calc.append_digit(d);
        }
        let expected = op.apply(f64::from(a), f64::from(b)).unwrap();
        prop_assert_eq!(calc.perform_operation(), format_number(expected).unwrap());
        prop_assert_eq!(
            calc.history().latest().unwrap().expression.clone(),
            format!("{a} {} {b}", op.glyph())
        );
    }

    /// History holds the most recent five results, newest first
    #[test]
    fn prop_history_bounded(values in prop::collection::vec(1u32..100, 1..12)) {
        let mut calc = Calculator::new();
        for v in &values {
            calc.clear();
            for d in v.to_string().chars() {
                calc.append_digit(d);
            }
            calc.perform_operation();
        }
        let expected: Vec<String> = values.iter().rev().take(5).map(ToString::to_string).collect();
        let actual: Vec<String> = calc.history().iter().map(|e| e.result.clone()).collect();
        prop_assert_eq!(actual, expected);
    }
}
