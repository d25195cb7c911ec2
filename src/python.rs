//! Python bindings via PyO3

use crate::config::{EngineConfig, FieldLookup, ParseMode};
use crate::engine::RuleEngine;
use crate::rule::{Context, Value};
use pyo3::prelude::*;
use pyo3::types::{PyBool, PyDict};

/// Convert a Python dict of field values into an evaluation context.
/// `bool` is checked before `int` since Python bools are ints.
fn extract_context(data: &Bound<'_, PyDict>) -> PyResult<Context> {
    let mut ctx = Context::new();
    for (key, value) in data.iter() {
        let name: String = key.extract()?;
        let value = if value.is_instance_of::<PyBool>() {
            Value::Bool(value.extract()?)
        } else if let Ok(i) = value.extract::<i64>() {
            Value::Integer(i)
        } else {
            Value::Text(value.extract()?)
        };
        ctx.insert(name, value);
    }
    Ok(ctx)
}

/// Rule engine exposed to Python; rule trees are returned in their
/// parenthesized text form
#[pyclass(name = "RuleEngine")]
pub struct PyRuleEngine {
    inner: RuleEngine,
}

#[pymethods]
impl PyRuleEngine {
    #[new]
    #[pyo3(signature = (strict_parse=false, strict_fields=false))]
    fn new(strict_parse: bool, strict_fields: bool) -> Self {
        let config = EngineConfig {
            parse_mode: if strict_parse {
                ParseMode::Strict
            } else {
                ParseMode::Lenient
            },
            field_lookup: if strict_fields {
                FieldLookup::Strict
            } else {
                FieldLookup::Permissive
            },
            ..Default::default()
        };
        Self {
            inner: RuleEngine::with_config(config),
        }
    }

    /// Parse a rule and return its AST rendering
    fn create_rule(&self, rule: &str) -> PyResult<Option<String>> {
        Ok(self.inner.create_rule(rule)?.map(|ast| ast.to_string()))
    }

    fn combine_rules(&self, rules: Vec<String>) -> PyResult<Option<String>> {
        Ok(self.inner.combine_rules(&rules)?.map(|ast| ast.to_string()))
    }

    fn save_rule(&self, rule_id: &str, rule: &str) -> PyResult<()> {
        self.inner.create_and_save(rule_id, rule)?;
        Ok(())
    }

    /// Returns `(rule_text, ast)` or None
    fn get_rule(&self, rule_id: &str) -> Option<(String, Option<String>)> {
        self.inner
            .get_rule(rule_id)
            .map(|record| (record.rule_text, record.ast.map(|ast| ast.to_string())))
    }

    fn delete_rule(&self, rule_id: &str) -> bool {
        self.inner.delete_rule(rule_id).is_ok()
    }

    fn rule_ids(&self) -> Vec<String> {
        self.inner.rule_ids()
    }

    /// Check a rule string against a dict of field values
    fn evaluate(&self, rule: &str, data: &Bound<'_, PyDict>) -> PyResult<bool> {
        let ctx = extract_context(data)?;
        let ast = self.inner.create_rule(rule)?;
        Ok(self.inner.check_rule(ast.as_ref(), &ctx)?)
    }

    /// Check a saved rule against a dict of field values
    fn evaluate_saved(&self, rule_id: &str, data: &Bound<'_, PyDict>) -> PyResult<bool> {
        let ctx = extract_context(data)?;
        Ok(self.inner.evaluate_saved(rule_id, &ctx)?)
    }
}
