//! AST evaluator and the committed-token evaluation pipeline

use crate::core::operations::check_finite;
use crate::core::parser::{lex_committed, translate_tokens, validate_expression, AstNode, Parser};
use crate::core::CalcResult;

/// Evaluator for AST expressions
#[derive(Debug, Clone, Copy, Default)]
pub struct Evaluator;

impl Evaluator {
    /// Creates a new evaluator
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Evaluates an AST node
    ///
    /// Every intermediate result must be finite, so division by zero fails
    /// even when a later operation would bring the value back into range.
    pub fn evaluate(&self, node: &AstNode) -> CalcResult<f64> {
        match node {
            AstNode::Number(n) => check_finite(*n),
            AstNode::Negate(inner) => Ok(-self.evaluate(inner)?),
            AstNode::BinaryOp { left, op, right } => {
                let left_val = self.evaluate(left)?;
                let right_val = self.evaluate(right)?;
                op.apply(left_val, right_val)
            }
        }
    }

    /// Evaluates expression text written with evaluable symbols
    pub fn evaluate_str(&self, input: &str) -> CalcResult<f64> {
        validate_expression(input)?;
        let ast = Parser::parse_str(input)?;
        self.evaluate(&ast)
    }

    /// Evaluates a committed token stream
    ///
    /// Glyphs are translated, the joined text is checked against the
    /// arithmetic character set, and only then is anything parsed.
    pub fn evaluate_tokens(&self, tokens: &[String]) -> CalcResult<f64> {
        let translated = translate_tokens(tokens);
        validate_expression(&translated.join(" "))?;
        let ast = Parser::new(lex_committed(&translated)?).parse()?;
        self.evaluate(&ast)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{CalcError, Operation};

    fn strings(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| (*t).to_string()).collect()
    }

    #[test]
    fn test_evaluate_nodes() {
        let eval = Evaluator::new();
        let ast = AstNode::binary(
            AstNode::binary(AstNode::number(2.0), Operation::Add, AstNode::number(3.0)),
            Operation::Multiply,
            AstNode::negate(AstNode::number(4.0)),
        );
        assert_eq!(eval.evaluate(&ast), Ok(-20.0));
    }

    #[test]
    fn test_evaluate_str_precedence() {
        let eval = Evaluator::new();
        assert_eq!(eval.evaluate_str("2 + 3 * 4"), Ok(14.0));
        assert_eq!(eval.evaluate_str("(2 + 3) * 4"), Ok(20.0));
        assert_eq!(eval.evaluate_str("2 * 3 ** 2"), Ok(18.0));
        assert_eq!(eval.evaluate_str("2 ** 3 ** 2"), Ok(512.0));
        assert_eq!(eval.evaluate_str("-2 ** 2"), Ok(-4.0));
        assert_eq!(eval.evaluate_str("10 - 4 - 3"), Ok(3.0));
        assert_eq!(eval.evaluate_str("64 / 4 / 2"), Ok(8.0));
    }

    #[test]
    fn test_evaluate_str_rejects_unsafe_text() {
        let eval = Evaluator::new();
        assert!(matches!(
            eval.evaluate_str("process.exit(1)"),
            Err(CalcError::InvalidExpression { .. })
        ));
    }

    #[test]
    fn test_evaluate_tokens_with_glyphs() {
        let eval = Evaluator::new();
        assert_eq!(eval.evaluate_tokens(&strings(&["4", "+", "6"])), Ok(10.0));
        assert_eq!(
            eval.evaluate_tokens(&strings(&["9", "÷", "3", "×", "2", "^", "2"])),
            Ok(12.0)
        );
    }

    #[test]
    fn test_evaluate_tokens_signed_literal() {
        let eval = Evaluator::new();
        assert_eq!(eval.evaluate_tokens(&strings(&["-5", "^", "2"])), Ok(25.0));
        assert_eq!(eval.evaluate_tokens(&strings(&["3", "-", "-5"])), Ok(8.0));
    }

    #[test]
    fn test_evaluate_tokens_parentheses() {
        let eval = Evaluator::new();
        let tokens = strings(&["(", "1", "+", "2", ")", "×", "3"]);
        assert_eq!(eval.evaluate_tokens(&tokens), Ok(9.0));
    }

    #[test]
    fn test_evaluate_tokens_division_by_zero() {
        let eval = Evaluator::new();
        assert_eq!(
            eval.evaluate_tokens(&strings(&["5", "/", "0"])),
            Err(CalcError::NonFinite)
        );
        assert_eq!(
            eval.evaluate_tokens(&strings(&["1", "÷", "(", "1", "÷", "0", ")"])),
            Err(CalcError::NonFinite)
        );
    }

    #[test]
    fn test_evaluate_tokens_invalid_operator() {
        let eval = Evaluator::new();
        assert_eq!(
            eval.evaluate_tokens(&strings(&["7", "%", "2"])),
            Err(CalcError::InvalidExpression {
                expression: "7 % 2".into()
            })
        );
    }

    #[test]
    fn test_evaluate_tokens_unbalanced() {
        let eval = Evaluator::new();
        assert!(matches!(
            eval.evaluate_tokens(&strings(&["(", "1", "+", "2"])),
            Err(CalcError::Parse(_))
        ));
        assert!(matches!(
            eval.evaluate_tokens(&strings(&["3", "+"])),
            Err(CalcError::Parse(_))
        ));
    }
}
