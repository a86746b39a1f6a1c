//! Calculator tool: evaluates arithmetic expressions.
//!
//! Supports `+`, `-`, `*`, `/`, `%`, parentheses, unary signs and decimal
//! numbers. Uses a recursive-descent parser; nothing else is accepted, so
//! model output can never reach a general-purpose evaluator.

use async_trait::async_trait;
use patternlab_core::error::ToolError;
use patternlab_core::tool::Tool;
use std::iter::Peekable;
use std::str::CharIndices;
use thiserror::Error;

pub struct CalculatorTool;

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        "calculator"
    }

    fn description(&self) -> &str {
        "Performs basic mathematical calculations. Input should be a mathematical expression (e.g., '2 + 2', '10 * 5', '100 / 4')"
    }

    async fn execute(&self, input: &str) -> Result<String, ToolError> {
        let expr = input.trim();
        if expr.is_empty() {
            return Err(ToolError::InvalidInput("Missing expression".into()));
        }

        let value = evaluate(expr).map_err(|e| ToolError::ExecutionFailed {
            tool_name: self.name().into(),
            reason: e.to_string(),
        })?;

        Ok(format!("{expr} = {}", format_number(value)))
    }
}

/// Drop the trailing `.0` for integral values.
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{value}")
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("Invalid expression: unexpected character '{ch}' at {at}. Only numbers and operators (+, -, *, /, %, parentheses) are allowed")]
    UnexpectedChar { ch: char, at: usize },

    #[error("Invalid number: {0}")]
    InvalidNumber(String),

    #[error("Unexpected {0}")]
    UnexpectedToken(String),

    #[error("Unexpected end of expression")]
    UnexpectedEnd,

    #[error("Expected closing parenthesis")]
    UnclosedParen,

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Modulo by zero")]
    ModuloByZero,

    #[error("Result is not a finite number")]
    NotFinite,

    #[error("Expression nests deeper than {MAX_DEPTH} levels")]
    TooDeep,
}

/// Nesting bound for parentheses and unary signs combined.
pub const MAX_DEPTH: usize = 256;

/// Evaluate an arithmetic expression.
pub fn evaluate(expr: &str) -> Result<f64, CalcError> {
    let mut parser = Parser {
        tokens: tokenize(expr)?.into_iter().peekable(),
        depth: 0,
    };
    let value = parser.expr()?;
    if let Some(extra) = parser.tokens.next() {
        return Err(CalcError::UnexpectedToken(extra.describe()));
    }
    if !value.is_finite() {
        return Err(CalcError::NotFinite);
    }
    Ok(value)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Op(char),
    Open,
    Close,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Self::Number(n) => format!("number {}", format_number(*n)),
            Self::Op(op) => format!("operator '{op}'"),
            Self::Open => "'('".into(),
            Self::Close => "')'".into(),
        }
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>, CalcError> {
    let mut chars: Peekable<CharIndices<'_>> = input.char_indices().peekable();
    let mut tokens = Vec::new();

    while let Some((at, ch)) = chars.next() {
        let token = match ch {
            c if c.is_whitespace() => continue,
            '+' | '-' | '*' | '/' | '%' => Token::Op(ch),
            '(' => Token::Open,
            ')' => Token::Close,
            c if c.is_ascii_digit() || c == '.' => {
                let mut end = at + c.len_utf8();
                while let Some(&(i, d)) = chars.peek() {
                    if !(d.is_ascii_digit() || d == '.') {
                        break;
                    }
                    end = i + d.len_utf8();
                    chars.next();
                }
                let text = &input[at..end];
                Token::Number(
                    text.parse()
                        .map_err(|_| CalcError::InvalidNumber(text.to_string()))?,
                )
            }
            _ => return Err(CalcError::UnexpectedChar { ch, at }),
        };
        tokens.push(token);
    }

    Ok(tokens)
}

struct Parser<I: Iterator<Item = Token>> {
    tokens: Peekable<I>,
    depth: usize,
}

impl<I: Iterator<Item = Token>> Parser<I> {
    /// Run `rule` one nesting level down, refusing to pass [`MAX_DEPTH`].
    fn nested(
        &mut self,
        rule: fn(&mut Self) -> Result<f64, CalcError>,
    ) -> Result<f64, CalcError> {
        if self.depth >= MAX_DEPTH {
            return Err(CalcError::TooDeep);
        }
        self.depth += 1;
        let value = rule(self);
        self.depth -= 1;
        value
    }

    /// Consume the next token if it is one of `ops`.
    fn take_op(&mut self, ops: &[char]) -> Option<char> {
        match self.tokens.peek() {
            Some(Token::Op(op)) if ops.contains(op) => {
                let op = *op;
                self.tokens.next();
                Some(op)
            }
            _ => None,
        }
    }

    // expr = term (('+' | '-') term)*
    fn expr(&mut self) -> Result<f64, CalcError> {
        let mut acc = self.term()?;
        while let Some(op) = self.take_op(&['+', '-']) {
            let rhs = self.term()?;
            acc = if op == '+' { acc + rhs } else { acc - rhs };
        }
        Ok(acc)
    }

    // term = unary (('*' | '/' | '%') unary)*
    fn term(&mut self) -> Result<f64, CalcError> {
        let mut acc = self.unary()?;
        while let Some(op) = self.take_op(&['*', '/', '%']) {
            let rhs = self.unary()?;
            acc = match op {
                '*' => acc * rhs,
                '/' if rhs == 0.0 => return Err(CalcError::DivisionByZero),
                '/' => acc / rhs,
                _ if rhs == 0.0 => return Err(CalcError::ModuloByZero),
                // floored: the result takes the sign of the divisor
                _ => acc - rhs * (acc / rhs).floor(),
            };
        }
        Ok(acc)
    }

    // unary = ('-' | '+') unary | primary
    fn unary(&mut self) -> Result<f64, CalcError> {
        match self.take_op(&['-', '+']) {
            Some('-') => Ok(-self.nested(Self::unary)?),
            Some(_) => self.nested(Self::unary),
            None => self.primary(),
        }
    }

    // primary = NUMBER | '(' expr ')'
    fn primary(&mut self) -> Result<f64, CalcError> {
        match self.tokens.next() {
            Some(Token::Number(n)) => Ok(n),
            Some(Token::Open) => {
                let value = self.nested(Self::expr)?;
                match self.tokens.next() {
                    Some(Token::Close) => Ok(value),
                    _ => Err(CalcError::UnclosedParen),
                }
            }
            Some(tok) => Err(CalcError::UnexpectedToken(tok.describe())),
            None => Err(CalcError::UnexpectedEnd),
        }
    }
}
