//! Eligibility Rules - boolean rule engine
//!
//! Parses rule strings such as
//! `"(age > 30 AND department = 'Sales') AND (salary > 50000)"` into an AST,
//! combines several rules with `AND`, and evaluates the result against a
//! record of field values. Python bindings are available behind the
//! `python` feature.
//!
//! ```
//! use eligibility_rules::{Context, RuleEngine};
//!
//! let engine = RuleEngine::new();
//! let ast = engine.create_rule("(age > 30)").unwrap();
//! let ctx = Context::new().with("age", 35);
//! assert!(engine.check_rule(ast.as_ref(), &ctx).unwrap());
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod rule;
pub mod store;

#[cfg(feature = "python")]
mod python;

pub use config::{EngineConfig, FieldLookup, ParseMode};
pub use engine::RuleEngine;
pub use error::{Result, RuleError};
pub use rule::{combine, evaluate, parse, tokenize, Context, Literal, Node, Operator, RuleCache, Value};
pub use store::{InMemoryRuleStore, RuleRecord, RuleRepository};

// ============================================================================
// Python Module Definition
// ============================================================================

#[cfg(feature = "python")]
use pyo3::prelude::*;

/// Python module definition
#[cfg(feature = "python")]
#[pymodule]
fn eligibility_rules(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<python::PyRuleEngine>()?;
    Ok(())
}
