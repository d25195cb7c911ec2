//! Rule string tokenizer

use smallvec::SmallVec;

/// Token buffer; typical rules fit inline
pub type Tokens<'a> = SmallVec<[&'a str; 32]>;

/// Split a rule string into tokens.
///
/// Every `(` and `)` is its own token; everything else is split on
/// whitespace. No validation happens here.
pub fn tokenize(rule: &str) -> Tokens<'_> {
    let mut tokens = Tokens::new();
    let mut start: Option<usize> = None;

    for (i, c) in rule.char_indices() {
        match c {
            '(' | ')' => {
                if let Some(s) = start.take() {
                    tokens.push(&rule[s..i]);
                }
                tokens.push(&rule[i..i + 1]);
            }
            c if c.is_whitespace() => {
                if let Some(s) = start.take() {
                    tokens.push(&rule[s..i]);
                }
            }
            _ => {
                if start.is_none() {
                    start = Some(i);
                }
            }
        }
    }

    if let Some(s) = start {
        tokens.push(&rule[s..]);
    }

    tokens
}
