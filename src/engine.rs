//! Rule engine facade
//!
//! Ties parsing, combining, evaluation and storage together under one
//! [`EngineConfig`].

use crate::config::EngineConfig;
use crate::error::{Result, RuleError};
use crate::rule::{self, Context, Node, RuleCache, Value};
use crate::store::{InMemoryRuleStore, RuleRecord, RuleRepository};
use tracing::{debug, instrument, warn};

/// Main rule engine
pub struct RuleEngine<R: RuleRepository = InMemoryRuleStore> {
    config: EngineConfig,
    store: R,
    cache: RuleCache,
}

impl RuleEngine {
    pub fn new() -> Self {
        Self::with_config(EngineConfig::default())
    }

    pub fn with_config(config: EngineConfig) -> Self {
        Self::with_store(config, InMemoryRuleStore::new())
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RuleRepository> RuleEngine<R> {
    pub fn with_store(config: EngineConfig, store: R) -> Self {
        let cache = RuleCache::new(config.cache_capacity);
        Self {
            config,
            store,
            cache,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn store(&self) -> &R {
        &self.store
    }

    pub fn cache(&self) -> &RuleCache {
        &self.cache
    }

    /// Parse a rule string into an AST
    pub fn create_rule(&self, rule_text: &str) -> Result<Option<Node>> {
        if self.config.cache_parsed {
            self.cache.get_or_parse(rule_text, self.config.parse_mode)
        } else {
            rule::parse_with(rule_text, self.config.parse_mode)
        }
    }

    /// Parse several rule strings and AND them together left to right
    #[instrument(skip(self, rules), fields(count = rules.len()))]
    pub fn combine_rules<S: AsRef<str>>(&self, rules: &[S]) -> Result<Option<Node>> {
        let combined = rule::combine_by(rules, |text| self.create_rule(text))?;
        debug!("combined {} rules", rules.len());
        Ok(combined)
    }

    /// Evaluate an AST, returning the raw result of the root node
    pub fn evaluate_rule<'n>(
        &self,
        ast: impl Into<Option<&'n Node>>,
        ctx: &Context,
    ) -> Result<Value> {
        rule::evaluate_with(ast, ctx, self.config.field_lookup)
    }

    /// Evaluate an AST and reduce the result to an eligibility decision
    pub fn check_rule<'n>(&self, ast: impl Into<Option<&'n Node>>, ctx: &Context) -> Result<bool> {
        rule::check_with(ast, ctx, self.config.field_lookup)
    }

    /// Store a rule's text and AST under `rule_id`, replacing any previous entry
    pub fn save_rule(
        &self,
        rule_id: impl Into<String>,
        rule_text: impl Into<String>,
        ast: Option<Node>,
    ) -> Option<RuleRecord> {
        self.store.put(RuleRecord::new(rule_id, rule_text, ast))
    }

    /// Parse a rule and store it; nothing is stored if parsing fails
    pub fn create_and_save(&self, rule_id: impl Into<String>, rule_text: &str) -> Result<Option<Node>> {
        let ast = self.create_rule(rule_text)?;
        self.save_rule(rule_id, rule_text, ast.clone());
        Ok(ast)
    }

    pub fn get_rule(&self, rule_id: &str) -> Option<RuleRecord> {
        self.store.get(rule_id)
    }

    pub fn delete_rule(&self, rule_id: &str) -> Result<RuleRecord> {
        self.store.remove(rule_id).ok_or_else(|| {
            warn!(rule_id = %rule_id, "delete of unknown rule");
            RuleError::RuleNotFound(rule_id.to_string())
        })
    }

    pub fn rule_ids(&self) -> Vec<String> {
        self.store.ids()
    }

    /// Check a saved rule against a context
    pub fn evaluate_saved(&self, rule_id: &str, ctx: &Context) -> Result<bool> {
        let record = self
            .store
            .get(rule_id)
            .ok_or_else(|| RuleError::RuleNotFound(rule_id.to_string()))?;
        self.check_rule(record.ast.as_ref(), ctx)
    }

    /// AND together saved rules, in the given order
    pub fn combine_saved<S: AsRef<str>>(&self, rule_ids: &[S]) -> Result<Option<Node>> {
        rule::combine_by(rule_ids, |id| {
            self.store
                .get(id)
                .map(|record| record.ast)
                .ok_or_else(|| RuleError::RuleNotFound(id.to_string()))
        })
    }
}
