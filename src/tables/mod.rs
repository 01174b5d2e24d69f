//! # Option Tables
//!
//! Read-only lookup tables consumed by the matcher. Each namespace carries an
//! exact-key map from option key to [`Metadata`] and an optional compiled
//! prefix pattern for options whose key length is variable (`-Xmx4G`).
//!
//! Tables are built once and shared by reference. Nothing in this crate
//! mutates a table after construction, so a single [`OptionTables`] can back
//! any number of matchers on any number of threads.
//!
//! ## Prefix Patterns
//!
//! The prefix pattern of a namespace is derived from its `suppressed_value`
//! entries: `^(-Xmx|-Xms|-Xss)`. Alternatives are ordered longest first so the
//! longest registered prefix wins, and every match is guaranteed to resolve in
//! the exact-key map. A namespace without such entries has no prefix pattern.

mod loader;

use std::collections::HashMap;
use std::path::PathBuf;

use log::debug;
use regex::Regex;

use crate::types::{Metadata, ValueType};

pub use loader::{EntryConfig, TablesFile};

/// Errors that can occur while loading or building option tables
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("Failed to read tables file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse tables: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Empty option key in namespace '{namespace}' (entry '{entry}')")]
    EmptyKey { namespace: String, entry: String },

    #[error("Invalid prefix pattern for namespace '{namespace}': {source}")]
    Regex {
        namespace: String,
        #[source]
        source: regex::Error,
    },
}

/// The two lookups the matcher needs from a table provider, keyed by namespace
pub trait TableFinder {
    /// Exact-key table for `namespace`
    fn map_finder(&self, namespace: &str) -> Option<&HashMap<String, Metadata>>;

    /// Compiled prefix pattern for `namespace`, if it has one
    fn regexp_finder(&self, namespace: &str) -> Option<&Regex>;
}

/// Lookup tables for a single namespace
#[derive(Debug, Clone)]
pub struct NamespaceTable {
    options: HashMap<String, Metadata>,
    prefix: Option<Regex>,
}

impl NamespaceTable {
    /// Build a namespace table, validating keys and deriving the prefix pattern
    pub fn build(namespace: &str, options: HashMap<String, Metadata>) -> Result<Self, TableError> {
        for (entry, meta) in &options {
            if entry.is_empty() || meta.key.is_empty() {
                return Err(TableError::EmptyKey {
                    namespace: namespace.to_string(),
                    entry: entry.clone(),
                });
            }
        }

        let prefix = prefix_pattern(&options)
            .map(|pattern| {
                debug!("Prefix pattern for {}: {}", namespace, pattern);
                Regex::new(&pattern).map_err(|source| TableError::Regex {
                    namespace: namespace.to_string(),
                    source,
                })
            })
            .transpose()?;

        Ok(Self { options, prefix })
    }

    pub fn options(&self) -> &HashMap<String, Metadata> {
        &self.options
    }

    pub fn prefix(&self) -> Option<&Regex> {
        self.prefix.as_ref()
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

/// Build `^(a|b|...)` from the suppressed-value entries, longest key first
fn prefix_pattern(options: &HashMap<String, Metadata>) -> Option<String> {
    let mut prefixes: Vec<&str> = options
        .iter()
        .filter(|(_, meta)| meta.value_type == ValueType::SuppressedValue)
        .map(|(entry, _)| entry.as_str())
        .collect();

    if prefixes.is_empty() {
        return None;
    }

    prefixes.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    let alternatives: Vec<String> = prefixes.into_iter().map(regex::escape).collect();

    Some(format!("^({})", alternatives.join("|")))
}

/// Immutable set of namespace tables
#[derive(Debug, Clone, Default)]
pub struct OptionTables {
    namespaces: HashMap<String, NamespaceTable>,
}

impl OptionTables {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a namespace, replacing any previous table of the same name
    pub fn with_namespace(mut self, namespace: impl Into<String>, table: NamespaceTable) -> Self {
        self.namespaces.insert(namespace.into(), table);
        self
    }

    pub fn namespace(&self, namespace: &str) -> Option<&NamespaceTable> {
        self.namespaces.get(namespace)
    }

    /// Namespace identifiers in sorted order
    pub fn namespace_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.namespaces.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl TableFinder for OptionTables {
    fn map_finder(&self, namespace: &str) -> Option<&HashMap<String, Metadata>> {
        self.namespace(namespace).map(NamespaceTable::options)
    }

    fn regexp_finder(&self, namespace: &str) -> Option<&Regex> {
        self.namespace(namespace).and_then(NamespaceTable::prefix)
    }
}
