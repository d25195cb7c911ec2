//! Rule parsing cache with fast hashing
//!
//! Cached trees are keyed by rule text, one map per parse mode. A cache holds
//! at most `capacity` trees; inserting into a full cache clears it first.

use crate::config::ParseMode;
use crate::error::Result;
use crate::rule::ast::Node;
use crate::rule::evaluator;
use crate::rule::parser;
use crate::rule::value::Context;
use ahash::AHashMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use tracing::debug;

/// Capacity of the process-wide cache
pub const DEFAULT_CACHE_CAPACITY: usize = 1024;

/// Global rule cache used by [`get_or_parse`]
static RULE_CACHE: Lazy<RuleCache> = Lazy::new(|| RuleCache::new(DEFAULT_CACHE_CAPACITY));

#[derive(Debug, Default)]
struct ModeMaps {
    lenient: AHashMap<String, Option<Node>>,
    strict: AHashMap<String, Option<Node>>,
}

impl ModeMaps {
    fn get(&self, mode: ParseMode) -> &AHashMap<String, Option<Node>> {
        match mode {
            ParseMode::Lenient => &self.lenient,
            ParseMode::Strict => &self.strict,
        }
    }

    fn get_mut(&mut self, mode: ParseMode) -> &mut AHashMap<String, Option<Node>> {
        match mode {
            ParseMode::Lenient => &mut self.lenient,
            ParseMode::Strict => &mut self.strict,
        }
    }

    fn len(&self) -> usize {
        self.lenient.len() + self.strict.len()
    }

    fn clear(&mut self) {
        self.lenient.clear();
        self.strict.clear();
    }
}

/// Bounded cache of parsed rules
#[derive(Debug)]
pub struct RuleCache {
    capacity: usize,
    maps: RwLock<ModeMaps>,
}

impl RuleCache {
    /// A cache holding at most `capacity` trees; zero disables caching
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            maps: RwLock::new(ModeMaps::default()),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Get or parse a rule string, reusing the tree for repeated rules.
    ///
    /// Parse errors are not cached.
    pub fn get_or_parse(&self, rule: &str, mode: ParseMode) -> Result<Option<Node>> {
        // Fast path: read lock only
        {
            let maps = self.maps.read();
            if let Some(ast) = maps.get(mode).get(rule) {
                return Ok(ast.clone());
            }
        }

        let ast = parser::parse_with(rule, mode)?;
        if self.capacity == 0 {
            return Ok(ast);
        }

        let mut maps = self.maps.write();
        if maps.len() >= self.capacity && !maps.get(mode).contains_key(rule) {
            debug!(entries = maps.len(), "rule cache full, clearing");
            maps.clear();
        }
        maps.get_mut(mode).insert(rule.to_string(), ast.clone());

        Ok(ast)
    }

    pub fn contains(&self, rule: &str, mode: ParseMode) -> bool {
        self.maps.read().get(mode).contains_key(rule)
    }

    pub fn clear(&self) {
        self.maps.write().clear();
    }

    /// Number of cached trees across both parse modes
    pub fn len(&self) -> usize {
        self.maps.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Default for RuleCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

/// Get or parse a rule string through the global cache
pub fn get_or_parse(rule: &str, mode: ParseMode) -> Result<Option<Node>> {
    RULE_CACHE.get_or_parse(rule, mode)
}

/// Parse (through the cache) and check a rule string against a context
pub fn check_rule_text(rule: &str, ctx: &Context) -> Result<bool> {
    let ast = get_or_parse(rule, ParseMode::Lenient)?;
    evaluator::check(ast.as_ref(), ctx)
}

/// Clear the global rule cache
pub fn clear_cache() {
    RULE_CACHE.clear();
}

/// Number of rule strings in the global cache
pub fn cache_size() -> usize {
    RULE_CACHE.len()
}
