//! Rule storage
//!
//! Saved rules keep their original text next to the parsed tree. The
//! [`RuleRepository`] trait is the seam for other backends; the in-memory
//! store is thread-safe and can be shared behind an `Arc`.

use crate::rule::Node;
use ahash::AHashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// A saved rule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleRecord {
    pub id: String,
    pub rule_text: String,
    /// `None` for a rule with no tokens
    pub ast: Option<Node>,
}

impl RuleRecord {
    pub fn new(id: impl Into<String>, rule_text: impl Into<String>, ast: Option<Node>) -> Self {
        Self {
            id: id.into(),
            rule_text: rule_text.into(),
            ast,
        }
    }
}

/// Keyed storage for saved rules
pub trait RuleRepository: Send + Sync {
    /// Insert or replace the record stored under `record.id`
    fn put(&self, record: RuleRecord) -> Option<RuleRecord>;

    fn get(&self, rule_id: &str) -> Option<RuleRecord>;

    fn remove(&self, rule_id: &str) -> Option<RuleRecord>;

    fn contains(&self, rule_id: &str) -> bool {
        self.get(rule_id).is_some()
    }

    /// All stored ids, sorted
    fn ids(&self) -> Vec<String>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// In-memory rule store
#[derive(Debug, Default)]
pub struct InMemoryRuleStore {
    rules: RwLock<AHashMap<String, RuleRecord>>,
}

impl InMemoryRuleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove every stored rule
    #[instrument(skip(self))]
    pub fn clear(&self) {
        let mut rules = self.rules.write();
        debug!(count = rules.len(), "clearing rule store");
        rules.clear();
    }
}

impl RuleRepository for InMemoryRuleStore {
    #[instrument(skip(self, record), fields(rule_id = %record.id))]
    fn put(&self, record: RuleRecord) -> Option<RuleRecord> {
        let previous = self.rules.write().insert(record.id.clone(), record);
        debug!(replaced = previous.is_some(), "rule stored");
        previous
    }

    fn get(&self, rule_id: &str) -> Option<RuleRecord> {
        self.rules.read().get(rule_id).cloned()
    }

    #[instrument(skip(self))]
    fn remove(&self, rule_id: &str) -> Option<RuleRecord> {
        let removed = self.rules.write().remove(rule_id);
        debug!(found = removed.is_some(), "rule removed");
        removed
    }

    fn contains(&self, rule_id: &str) -> bool {
        self.rules.read().contains_key(rule_id)
    }

    fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.rules.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    fn len(&self) -> usize {
        self.rules.read().len()
    }
}
