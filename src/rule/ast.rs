//! Abstract Syntax Tree for eligibility rules

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::mem;

/// AST node for rule expressions
///
/// Operator nodes own exactly two children; operand nodes own none.
///
/// Combined rules form left spines as long as the number of rules, so
/// cloning, comparing, rendering and dropping walk the tree with an explicit
/// stack rather than recursing.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Node {
    /// Binary operation like `age > 30` or `a AND b`
    Operator {
        op: Operator,
        left: Box<Node>,
        right: Box<Node>,
    },
    /// Leaf holding a literal or a field reference
    Operand { value: Literal },
}

impl Node {
    pub fn operator(op: Operator, left: Node, right: Node) -> Self {
        Node::Operator {
            op,
            left: Box::new(left),
            right: Box::new(right),
        }
    }

    pub fn and(left: Node, right: Node) -> Self {
        Self::operator(Operator::And, left, right)
    }

    pub fn integer(value: i64) -> Self {
        Node::Operand {
            value: Literal::Integer(value),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        Node::Operand {
            value: Literal::Text(value.into()),
        }
    }

    pub fn field(name: impl Into<String>) -> Self {
        Node::Operand {
            value: Literal::Field(name.into()),
        }
    }

    pub fn is_operand(&self) -> bool {
        matches!(self, Node::Operand { .. })
    }

    /// Post-order fold: both children are folded, left first, before their
    /// operator is applied. The first error stops the walk.
    pub fn fold<T, E>(
        &self,
        mut leaf: impl FnMut(&Literal) -> Result<T, E>,
        mut branch: impl FnMut(&Operator, T, T) -> Result<T, E>,
    ) -> Result<T, E> {
        struct Pending<'n, T> {
            op: &'n Operator,
            right: &'n Node,
            left: Option<T>,
        }

        let mut pending: Vec<Pending<'_, T>> = Vec::new();
        let mut node = self;

        loop {
            // down the left spine to the first unvisited operand
            let mut value = loop {
                match node {
                    Node::Operator { op, left, right } => {
                        pending.push(Pending {
                            op,
                            right: &**right,
                            left: None,
                        });
                        node = &**left;
                    }
                    Node::Operand { value } => break leaf(value)?,
                }
            };

            // back up until an operator still needs its right side
            loop {
                match pending.pop() {
                    None => return Ok(value),
                    Some(Pending {
                        op,
                        left: Some(left),
                        ..
                    }) => value = branch(op, left, value)?,
                    Some(Pending {
                        op,
                        right,
                        left: None,
                    }) => {
                        pending.push(Pending {
                            op,
                            right,
                            left: Some(value),
                        });
                        node = right;
                        break;
                    }
                }
            }
        }
    }

    /// Move operator children out into `into`, leaving operands in their place
    fn detach_children(&mut self, into: &mut Vec<Node>) {
        if let Node::Operator { left, right, .. } = self {
            for child in [left, right] {
                if !child.is_operand() {
                    into.push(mem::replace(&mut **child, Node::integer(0)));
                }
            }
        }
    }
}

impl Clone for Node {
    fn clone(&self) -> Self {
        let cloned = self.fold(
            |value| Ok::<_, Infallible>(Node::Operand { value: value.clone() }),
            |op, left, right| Ok(Node::operator(op.clone(), left, right)),
        );
        match cloned {
            Ok(node) => node,
            Err(never) => match never {},
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        let mut pending = vec![(self, other)];

        while let Some(pair) = pending.pop() {
            match pair {
                (Node::Operand { value: a }, Node::Operand { value: b }) => {
                    if a != b {
                        return false;
                    }
                }
                (
                    Node::Operator {
                        op: a,
                        left: a_left,
                        right: a_right,
                    },
                    Node::Operator {
                        op: b,
                        left: b_left,
                        right: b_right,
                    },
                ) => {
                    if a != b {
                        return false;
                    }
                    pending.push((&**a_right, &**b_right));
                    pending.push((&**a_left, &**b_left));
                }
                _ => return false,
            }
        }

        true
    }
}

impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = Vec::new();
        self.detach_children(&mut pending);
        while let Some(mut node) = pending.pop() {
            node.detach_children(&mut pending);
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        enum Piece<'n> {
            Node(&'n Node),
            Op(&'n Operator),
            Close,
        }

        let mut pending = vec![Piece::Node(self)];
        while let Some(piece) = pending.pop() {
            match piece {
                Piece::Node(Node::Operand { value }) => write!(f, "{}", value)?,
                Piece::Node(Node::Operator { op, left, right }) => {
                    f.write_str("(")?;
                    pending.push(Piece::Close);
                    pending.push(Piece::Node(right));
                    pending.push(Piece::Op(op));
                    pending.push(Piece::Node(left));
                }
                Piece::Op(op) => write!(f, " {} ", op)?,
                Piece::Close => f.write_str(")")?,
            }
        }
        Ok(())
    }
}

/// Operand literal, typed at parse time
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Literal {
    Integer(i64),
    Text(String),
    /// Bare identifier, resolved against the context at evaluation time
    Field(String),
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Integer(i) => write!(f, "{}", i),
            Literal::Text(s) => write!(f, "'{}'", s),
            Literal::Field(name) => write!(f, "{}", name),
        }
    }
}

/// Binary operators
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    /// Logical/bitwise and (AND)
    And,
    /// Logical/bitwise or (OR)
    Or,
    /// Greater than (>)
    Greater,
    /// Less than (<)
    Less,
    /// Equal (=)
    Equal,
    /// Any other symbol; rejected when evaluated
    Other(String),
}

impl Operator {
    pub fn from_symbol(symbol: &str) -> Self {
        match symbol {
            "AND" => Operator::And,
            "OR" => Operator::Or,
            ">" => Operator::Greater,
            "<" => Operator::Less,
            "=" => Operator::Equal,
            other => Operator::Other(other.to_string()),
        }
    }

    pub fn symbol(&self) -> &str {
        match self {
            Operator::And => "AND",
            Operator::Or => "OR",
            Operator::Greater => ">",
            Operator::Less => "<",
            Operator::Equal => "=",
            Operator::Other(symbol) => symbol,
        }
    }

    /// Binding strength: OR < AND < comparisons
    pub fn precedence(&self) -> u8 {
        match self {
            Operator::Or => 1,
            Operator::And => 2,
            Operator::Greater | Operator::Less | Operator::Equal | Operator::Other(_) => 3,
        }
    }

    pub fn is_known(&self) -> bool {
        !matches!(self, Operator::Other(_))
    }
}

impl From<String> for Operator {
    fn from(symbol: String) -> Self {
        Operator::from_symbol(&symbol)
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.symbol().to_string()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_nested() {
        let node = Node::and(
            Node::operator(Operator::Greater, Node::field("age"), Node::integer(30)),
            Node::operator(Operator::Equal, Node::field("department"), Node::text("Sales")),
        );
        assert_eq!(
            node.to_string(),
            "((age > 30) AND (department = 'Sales'))"
        );
    }

    #[test]
    fn test_operator_symbols() {
        for symbol in ["AND", "OR", ">", "<", "="] {
            let op = Operator::from_symbol(symbol);
            assert!(op.is_known());
            assert_eq!(op.symbol(), symbol);
        }

        let xor = Operator::from_symbol("XOR");
        assert_eq!(xor, Operator::Other("XOR".to_string()));
        assert!(!xor.is_known());
    }

    #[test]
    fn test_symbols_are_case_sensitive() {
        assert_eq!(Operator::from_symbol("and"), Operator::Other("and".to_string()));
    }

    #[test]
    fn test_precedence_order() {
        assert!(Operator::Or.precedence() < Operator::And.precedence());
        assert!(Operator::And.precedence() < Operator::Greater.precedence());
        assert_eq!(Operator::Less.precedence(), Operator::Equal.precedence());
    }

    #[test]
    fn test_serde_shape() {
        let node = Node::operator(Operator::Greater, Node::field("age"), Node::integer(30));
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "operator");
        assert_eq!(json["op"], ">");
        assert_eq!(json["left"]["value"]["kind"], "field");
        assert_eq!(json["right"]["value"]["value"], 30);

        let back: Node = serde_json::from_value(json).unwrap();
        assert_eq!(back, node);
    }

    fn and_chain(len: usize) -> Node {
        (0..len)
            .map(|i| Node::operator(Operator::Equal, Node::field("a"), Node::integer(i as i64)))
            .reduce(Node::and)
            .unwrap()
    }

    #[test]
    fn test_fold_visits_left_before_right() {
        let node = Node::operator(
            Operator::Or,
            Node::and(Node::field("a"), Node::field("b")),
            Node::field("c"),
        );
        let mut seen = Vec::new();
        let rendered = node
            .fold(
                |value| {
                    seen.push(value.to_string());
                    Ok::<_, ()>(value.to_string())
                },
                |op, left, right| Ok(format!("[{} {} {}]", left, op, right)),
            )
            .unwrap();

        assert_eq!(seen, vec!["a", "b", "c"]);
        assert_eq!(rendered, "[[a AND b] OR c]");
    }

    #[test]
    fn test_fold_stops_at_first_error() {
        let node = Node::and(Node::field("bad"), Node::field("worse"));
        let err = node
            .fold(
                |value| Err::<(), _>(value.to_string()),
                |_, _, _| Ok(()),
            )
            .unwrap_err();
        assert_eq!(err, "bad");
    }

    #[test]
    fn test_long_chain_clone_compare_render_drop() {
        let chain = and_chain(50_000);
        let copy = chain.clone();
        assert!(copy == chain);
        assert!(copy != and_chain(49_999));

        let rendered = chain.to_string();
        assert!(rendered.starts_with("(((("));
        assert!(rendered.ends_with("AND (a = 49999))"));

        drop(copy);
        drop(chain);
    }

    #[test]
    fn test_operand_and_operator_differ() {
        let leaf = Node::field("a");
        let branch = Node::and(Node::field("a"), Node::field("a"));
        assert!(leaf.is_operand());
        assert!(!branch.is_operand());
        assert_ne!(leaf, branch);
    }
}
