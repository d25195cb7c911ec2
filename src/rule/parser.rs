//! Rule string parser
//!
//! Recursive descent over a cursor into the token slice. Precedence, from
//! loosest to tightest: `OR`, `AND`, comparisons. Parentheses group, so a
//! fully parenthesized binary rule yields exactly one operator node per pair.
//!
//! Only parentheses make the parser recurse further; their nesting is capped
//! at [`MAX_DEPTH`].

use crate::config::ParseMode;
use crate::error::{Result, RuleError};
use crate::rule::ast::{Node, Operator};
use crate::rule::tokenizer::tokenize;

/// Deepest parenthesis nesting accepted by the parser
pub const MAX_DEPTH: usize = 64;

/// Parse a rule string into an AST using lenient mode
///
/// Returns `Ok(None)` for a rule with no tokens.
pub fn parse(rule: &str) -> Result<Option<Node>> {
    parse_with(rule, ParseMode::Lenient)
}

/// Parse a rule string into an AST
pub fn parse_with(rule: &str, mode: ParseMode) -> Result<Option<Node>> {
    let tokens = tokenize(rule);
    parse_expression(&tokens, mode)
}

/// Parse one expression from the front of a token slice.
///
/// Each token is consumed once, front to back. In lenient mode anything left
/// after the first complete expression is ignored.
pub fn parse_expression(tokens: &[&str], mode: ParseMode) -> Result<Option<Node>> {
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        mode,
    };

    if parser.peek().is_none() {
        return Ok(None);
    }

    let node = parser.parse_binary(1)?;

    if mode == ParseMode::Strict {
        if let Some(token) = parser.peek() {
            return Err(RuleError::UnexpectedToken(token.to_string()));
        }
    }

    Ok(Some(node))
}

struct Parser<'t, 'a> {
    tokens: &'t [&'a str],
    pos: usize,
    depth: usize,
    mode: ParseMode,
}

impl<'t, 'a> Parser<'t, 'a> {
    fn peek(&self) -> Option<&'a str> {
        self.tokens.get(self.pos).copied()
    }

    fn next_token(&mut self) -> Option<&'a str> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    /// Left-associative chain of operators binding at least `min_prec`
    fn parse_binary(&mut self, min_prec: u8) -> Result<Node> {
        let mut left = self.parse_primary()?;

        while let Some(token) = self.peek() {
            if token == ")" {
                break;
            }

            let op = Operator::from_symbol(token);
            if !op.is_known() && self.mode == ParseMode::Strict {
                return Err(RuleError::UnknownOperator(token.to_string()));
            }

            let prec = op.precedence();
            if prec < min_prec {
                break;
            }

            self.pos += 1;
            let right = self.parse_binary(prec + 1)?;
            left = Node::operator(op, left, right);
        }

        Ok(left)
    }

    fn parse_primary(&mut self) -> Result<Node> {
        let token = self.next_token().ok_or(RuleError::UnexpectedEnd)?;

        if token != "(" {
            return parse_operand(token);
        }

        if self.depth == MAX_DEPTH {
            return Err(RuleError::TooDeep(MAX_DEPTH));
        }
        self.depth += 1;
        let inner = self.parse_binary(1)?;
        self.depth -= 1;

        match self.next_token() {
            Some(")") => Ok(inner),
            Some(other) => Err(RuleError::UnexpectedToken(other.to_string())),
            None => Err(RuleError::UnexpectedEnd),
        }
    }
}

/// Classify a single non-parenthesis token as an operand
fn parse_operand(token: &str) -> Result<Node> {
    if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
        return token
            .parse::<i64>()
            .map(Node::integer)
            .map_err(|_| RuleError::Syntax(token.to_string()));
    }

    if token.starts_with('\'') && token.ends_with('\'') {
        return Ok(Node::text(token.trim_matches('\'')));
    }

    if !token.is_empty() && token.chars().all(char::is_alphabetic) {
        return Ok(Node::field(token));
    }

    Err(RuleError::Syntax(token.to_string()))
}
