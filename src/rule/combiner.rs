//! Combine independently parsed rules into a single AND chain

use crate::config::ParseMode;
use crate::error::{Result, RuleError};
use crate::rule::ast::Node;
use crate::rule::parser::parse_with;

/// Parse each rule string and AND them together left to right (lenient mode)
pub fn combine<S: AsRef<str>>(rules: &[S]) -> Result<Option<Node>> {
    combine_with(rules, ParseMode::Lenient)
}

/// Parse each rule string and AND them together left to right.
///
/// An empty list yields `Ok(None)`. A rule string with no tokens is rejected
/// with [`RuleError::EmptyRule`] carrying its index.
pub fn combine_with<S: AsRef<str>>(rules: &[S], mode: ParseMode) -> Result<Option<Node>> {
    combine_by(rules, |rule| parse_with(rule, mode))
}

/// Turn each item into a tree with `to_tree` and AND the trees together.
///
/// Stops at the first error; an item that yields no tree is
/// [`RuleError::EmptyRule`] carrying its index.
pub fn combine_by<S, F>(items: &[S], mut to_tree: F) -> Result<Option<Node>>
where
    S: AsRef<str>,
    F: FnMut(&str) -> Result<Option<Node>>,
{
    let nodes = items
        .iter()
        .enumerate()
        .map(|(i, item)| to_tree(item.as_ref())?.ok_or(RuleError::EmptyRule(i)))
        .collect::<Result<Vec<_>>>()?;

    Ok(combine_nodes(nodes))
}

/// Fold already parsed trees into `((a AND b) AND c) ...`
pub fn combine_nodes<I>(nodes: I) -> Option<Node>
where
    I: IntoIterator<Item = Node>,
{
    nodes.into_iter().reduce(Node::and)
}
