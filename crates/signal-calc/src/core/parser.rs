//! Expression tokenizer and recursive descent parser
//!
//! The token stream committed by the engine holds display glyphs (`×`, `÷`,
//! `^`). Before parsing, glyphs are translated to their evaluable symbols and
//! the joined text is checked against an arithmetic-only character set.

use crate::core::{CalcError, CalcResult, Operation};

/// Maximum nesting of parentheses and unary signs
pub const MAX_DEPTH: usize = 256;

/// Lexical tokens
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Numeric literal
    Number(f64),
    /// Operator (binary, or a unary sign in prefix position)
    Operator(Operation),
    /// Left parenthesis
    LeftParen,
    /// Right parenthesis
    RightParen,
}

/// Abstract Syntax Tree node
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode {
    /// Numeric literal
    Number(f64),
    /// Binary operation
    BinaryOp {
        /// Left operand
        left: Box<AstNode>,
        /// Operator
        op: Operation,
        /// Right operand
        right: Box<AstNode>,
    },
    /// Unary negation
    Negate(Box<AstNode>),
}

impl AstNode {
    /// Creates a new number node
    #[must_use]
    pub fn number(value: f64) -> Self {
        Self::Number(value)
    }

    /// Creates a new binary operation node
    #[must_use]
    pub fn binary(left: AstNode, op: Operation, right: AstNode) -> Self {
        Self::BinaryOp {
            left: Box::new(left),
            op,
            right: Box::new(right),
        }
    }

    /// Creates a new negation node
    #[must_use]
    pub fn negate(inner: AstNode) -> Self {
        Self::Negate(Box::new(inner))
    }
}

/// Maps display glyphs to evaluable symbols, leaving other tokens untouched
#[must_use]
pub fn translate_tokens(tokens: &[String]) -> Vec<String> {
    tokens
        .iter()
        .map(|token| match Operation::from_token(token) {
            Some(op) => op.symbol().to_string(),
            None => token.clone(),
        })
        .collect()
}

/// Rejects anything other than digits, `.`, parentheses, whitespace and `+ - * /`
pub fn validate_expression(expression: &str) -> CalcResult<()> {
    let allowed = |ch: char| {
        ch.is_ascii_digit() || ch.is_whitespace() || matches!(ch, '.' | '+' | '-' | '*' | '/' | '(' | ')')
    };
    if expression.trim().is_empty() {
        return Err(CalcError::EmptyExpression);
    }
    if expression.chars().all(allowed) {
        Ok(())
    } else {
        Err(CalcError::InvalidExpression {
            expression: expression.to_string(),
        })
    }
}

/// Returns true for a committed operand such as `12`, `0.5` or `-3.`
#[must_use]
pub fn is_literal(token: &str) -> bool {
    let digits = token.strip_prefix('-').unwrap_or(token);
    !digits.is_empty()
        && digits.chars().all(|ch| ch.is_ascii_digit() || ch == '.')
        && digits.parse::<f64>().is_ok()
}

/// Lexes committed tokens
///
/// A committed literal always becomes one number token, sign included, so a
/// negated display value stays a single operand. Any other token is lexed
/// character by character.
pub fn lex_committed(tokens: &[String]) -> CalcResult<Vec<Token>> {
    let mut lexed = Vec::with_capacity(tokens.len());
    for token in tokens {
        if is_literal(token) {
            let value = token
                .parse::<f64>()
                .map_err(|_| CalcError::parse(format!("Invalid number: '{token}'")))?;
            lexed.push(Token::Number(value));
        } else {
            lexed.extend(Tokenizer::new(token).tokenize()?);
        }
    }
    Ok(lexed)
}

/// Tokenizer for converting expression text to tokens
#[derive(Debug)]
pub struct Tokenizer<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Tokenizer<'a> {
    /// Creates a new tokenizer for the given input
    #[must_use]
    pub fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    /// Tokenizes the entire input
    pub fn tokenize(&mut self) -> CalcResult<Vec<Token>> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    /// Returns the next token, or None at end of input
    pub fn next_token(&mut self) -> CalcResult<Option<Token>> {
        self.skip_whitespace();

        let Some(ch) = self.current_char() else {
            return Ok(None);
        };

        let token = match ch {
            '0'..='9' | '.' => self.read_number()?,
            '+' => self.single(Token::Operator(Operation::Add)),
            '-' => self.single(Token::Operator(Operation::Subtract)),
            '*' => {
                self.advance();
                if self.current_char() == Some('*') {
                    self.advance();
                    Token::Operator(Operation::Power)
                } else {
                    Token::Operator(Operation::Multiply)
                }
            }
            '/' => self.single(Token::Operator(Operation::Divide)),
            '(' => self.single(Token::LeftParen),
            ')' => self.single(Token::RightParen),
            _ => {
                return Err(CalcError::parse(format!("Unexpected character: '{ch}'")));
            }
        };

        Ok(Some(token))
    }

    fn single(&mut self, token: Token) -> Token {
        self.advance();
        token
    }

    fn current_char(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn advance(&mut self) {
        if let Some(ch) = self.current_char() {
            self.pos += ch.len_utf8();
        }
    }

    fn skip_whitespace(&mut self) {
        while self.current_char().is_some_and(char::is_whitespace) {
            self.advance();
        }
    }

    fn read_number(&mut self) -> CalcResult<Token> {
        let start = self.pos;
        while self
            .current_char()
            .is_some_and(|ch| ch.is_ascii_digit() || ch == '.')
        {
            self.advance();
        }

        let text = &self.input[start..self.pos];
        let value: f64 = text
            .parse()
            .map_err(|_| CalcError::parse(format!("Invalid number: '{text}'")))?;
        Ok(Token::Number(value))
    }
}

/// Recursive descent parser
///
/// Grammar:
/// ```text
/// expression ::= term (('+' | '-') term)*
/// term       ::= unary (('*' | '/') unary)*
/// unary      ::= ('-' | '+') unary | power
/// power      ::= primary ('**' unary)?    // right associative
/// primary    ::= NUMBER | '(' expression ')'
/// ```
#[derive(Debug)]
pub struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
}

impl Parser {
    /// Creates a new parser from tokens
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            pos: 0,
            depth: 0,
        }
    }

    /// Parses expression text into an AST
    pub fn parse_str(input: &str) -> CalcResult<AstNode> {
        let tokens = Tokenizer::new(input).tokenize()?;
        Self::new(tokens).parse()
    }

    /// Parses all tokens into an AST, rejecting trailing input
    pub fn parse(&mut self) -> CalcResult<AstNode> {
        if self.tokens.is_empty() {
            return Err(CalcError::EmptyExpression);
        }
        let ast = self.parse_expression()?;
        if let Some(token) = self.current() {
            return Err(CalcError::parse(format!(
                "Unexpected {token:?} at position {}",
                self.pos
            )));
        }
        Ok(ast)
    }

    fn current(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn descend(&mut self) -> CalcResult<()> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(CalcError::parse("Expression nested too deeply"));
        }
        Ok(())
    }

    fn parse_expression(&mut self) -> CalcResult<AstNode> {
        let mut left = self.parse_term()?;

        while let Some(Token::Operator(op @ (Operation::Add | Operation::Subtract))) =
            self.current().cloned()
        {
            self.advance();
            let right = self.parse_term()?;
            left = AstNode::binary(left, op, right);
        }

        Ok(left)
    }

    fn parse_term(&mut self) -> CalcResult<AstNode> {
        let mut left = self.parse_unary()?;

        while let Some(Token::Operator(op @ (Operation::Multiply | Operation::Divide))) =
            self.current().cloned()
        {
            self.advance();
            let right = self.parse_unary()?;
            left = AstNode::binary(left, op, right);
        }

        Ok(left)
    }

    fn parse_unary(&mut self) -> CalcResult<AstNode> {
        match self.current() {
            Some(Token::Operator(Operation::Subtract)) => {
                self.advance();
                self.descend()?;
                let inner = self.parse_unary()?;
                self.depth -= 1;
                Ok(AstNode::negate(inner))
            }
            Some(Token::Operator(Operation::Add)) => {
                self.advance();
                self.descend()?;
                let inner = self.parse_unary()?;
                self.depth -= 1;
                Ok(inner)
            }
            _ => self.parse_power(),
        }
    }

    fn parse_power(&mut self) -> CalcResult<AstNode> {
        let base = self.parse_primary()?;

        if matches!(self.current(), Some(Token::Operator(Operation::Power))) {
            self.advance();
            self.descend()?;
            let exponent = self.parse_unary()?;
            self.depth -= 1;
            return Ok(AstNode::binary(base, Operation::Power, exponent));
        }

        Ok(base)
    }

    fn parse_primary(&mut self) -> CalcResult<AstNode> {
        let token = self
            .advance()
            .ok_or_else(|| CalcError::parse("Unexpected end of expression"))?;

        match token {
            Token::Number(n) => Ok(AstNode::number(n)),
            Token::LeftParen => {
                self.descend()?;
                let expr = self.parse_expression()?;
                self.depth -= 1;
                match self.advance() {
                    Some(Token::RightParen) => Ok(expr),
                    Some(t) => Err(CalcError::parse(format!("Expected ')' but found {t:?}"))),
                    None => Err(CalcError::parse("Unclosed parenthesis")),
                }
            }
            other => Err(CalcError::parse(format!("Unexpected token: {other:?}"))),
        }
    }
}
