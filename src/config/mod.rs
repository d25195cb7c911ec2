//! Engine configuration
//!
//! Controls how strictly rule strings are parsed and how field references
//! that are missing from the evaluation context are resolved.

use crate::error::Result;
use crate::rule::cache::DEFAULT_CACHE_CAPACITY;
use serde::{Deserialize, Serialize};

/// How the parser treats input the rule grammar does not cover
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParseMode {
    /// Unknown operator words are kept in the tree and rejected at evaluation;
    /// tokens after the first complete expression are ignored.
    #[default]
    Lenient,
    /// Unknown operators and trailing tokens are parse errors.
    Strict,
}

/// What happens when a field reference is not present in the context
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldLookup {
    /// The identifier evaluates to its own name as text.
    #[default]
    Permissive,
    /// Missing fields are an error.
    Strict,
}

/// Rule engine configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub parse_mode: ParseMode,
    pub field_lookup: FieldLookup,
    /// Route `create_rule` through the engine's parse cache
    pub cache_parsed: bool,
    /// Most parsed rules the engine keeps; a full cache is cleared
    pub cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parse_mode: ParseMode::Lenient,
            field_lookup: FieldLookup::Permissive,
            cache_parsed: true,
            cache_capacity: DEFAULT_CACHE_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Both parsing and field lookup in strict mode
    pub fn strict() -> Self {
        Self {
            parse_mode: ParseMode::Strict,
            field_lookup: FieldLookup::Strict,
            ..Default::default()
        }
    }

    /// Load configuration from a JSON object; missing keys take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
