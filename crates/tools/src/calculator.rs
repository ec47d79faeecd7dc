//! Calculator tool — evaluates mathematical expressions.
//!
//! Supports `+`, `-`, `*`, `/`, parentheses, unary negation, and
//! decimal numbers via a small recursive-descent parser. No
//! dependencies beyond std.

use async_trait::async_trait;
use cogito_core::error::ToolError;
use cogito_core::tool::{Tool, ToolOutput, ToolParams};

pub struct CalculatorTool;

#[async_trait]
impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        "calculator"
    }

    fn description(&self) -> &str {
        "Evaluate a mathematical expression. Supports +, -, *, /, parentheses, and decimal numbers. Parameters: {\"expression\": string}"
    }

    async fn invoke(&self, params: ToolParams) -> Result<ToolOutput, ToolError> {
        let expression = params
            .get("expression")
            .and_then(|v| v.as_str())
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'expression' parameter".into()))?;

        let value = evaluate(expression).map_err(|reason| ToolError::ExecutionFailed {
            tool_name: "calculator".into(),
            reason,
        })?;

        Ok(ToolOutput::number(value))
    }
}

// ── Expression evaluation ─────────────────────────────────────────────────

/// Evaluate a mathematical expression string.
pub fn evaluate(expression: &str) -> Result<f64, String> {
    let tokens = lex(expression)?;
    if tokens.is_empty() {
        return Err("Empty expression".into());
    }
    let mut cursor = Cursor { tokens, pos: 0 };
    let value = cursor.sum()?;
    match cursor.peek() {
        None => Ok(value),
        Some(tok) => Err(format!("Unexpected trailing token: {tok:?}")),
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Tok {
    Num(f64),
    Add,
    Sub,
    Mul,
    Div,
    Open,
    Close,
}

fn lex(input: &str) -> Result<Vec<Tok>, String> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '+' => {
                chars.next();
                tokens.push(Tok::Add);
            }
            '-' => {
                chars.next();
                tokens.push(Tok::Sub);
            }
            '*' => {
                chars.next();
                tokens.push(Tok::Mul);
            }
            '/' => {
                chars.next();
                tokens.push(Tok::Div);
            }
            '(' => {
                chars.next();
                tokens.push(Tok::Open);
            }
            ')' => {
                chars.next();
                tokens.push(Tok::Close);
            }
            c if c.is_ascii_digit() || c == '.' => {
                let mut literal = String::new();
                while let Some(&d) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        literal.push(d);
                        chars.next();
                    } else {
                        break;
                    }
                }
                let value: f64 = literal
                    .parse()
                    .map_err(|_| format!("Invalid number: {literal}"))?;
                tokens.push(Tok::Num(value));
            }
            other => return Err(format!("Unexpected character: '{other}'")),
        }
    }

    Ok(tokens)
}

struct Cursor {
    tokens: Vec<Tok>,
    pos: usize,
}

impl Cursor {
    fn peek(&self) -> Option<Tok> {
        self.tokens.get(self.pos).copied()
    }

    fn advance(&mut self) -> Option<Tok> {
        let tok = self.peek();
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    // sum = product (('+' | '-') product)*
    fn sum(&mut self) -> Result<f64, String> {
        let mut acc = self.product()?;
        while let Some(op) = self.peek() {
            match op {
                Tok::Add => {
                    self.advance();
                    acc += self.product()?;
                }
                Tok::Sub => {
                    self.advance();
                    acc -= self.product()?;
                }
                _ => break,
            }
        }
        Ok(acc)
    }

    // product = signed (('*' | '/') signed)*
    fn product(&mut self) -> Result<f64, String> {
        let mut acc = self.signed()?;
        while let Some(op) = self.peek() {
            match op {
                Tok::Mul => {
                    self.advance();
                    acc *= self.signed()?;
                }
                Tok::Div => {
                    self.advance();
                    let divisor = self.signed()?;
                    if divisor == 0.0 {
                        return Err("Division by zero".into());
                    }
                    acc /= divisor;
                }
                _ => break,
            }
        }
        Ok(acc)
    }

    // signed = '-' signed | atom
    fn signed(&mut self) -> Result<f64, String> {
        if self.peek() == Some(Tok::Sub) {
            self.advance();
            return Ok(-self.signed()?);
        }
        self.atom()
    }

    // atom = NUMBER | '(' sum ')'
    fn atom(&mut self) -> Result<f64, String> {
        match self.advance() {
            Some(Tok::Num(n)) => Ok(n),
            Some(Tok::Open) => {
                let value = self.sum()?;
                match self.advance() {
                    Some(Tok::Close) => Ok(value),
                    _ => Err("Expected closing parenthesis".into()),
                }
            }
            Some(tok) => Err(format!("Unexpected token: {tok:?}")),
            None => Err("Unexpected end of expression".into()),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────
