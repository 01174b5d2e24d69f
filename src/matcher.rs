//! # Option Matcher
//!
//! Resolves a raw JVM command-line token against the tables of one namespace.
//!
//! Resolution is two-tiered and prefix-first:
//!
//! 1. **Prefix phase**: the namespace prefix pattern is run against the token.
//!    The matched span is the lookup key and everything after it is the value,
//!    accepted as-is (`-Xmx4G` → `-Xmx`, `4G`).
//! 2. **Split phase**: otherwise the token is split on its first `=` and the
//!    left side is looked up in the exact-key table. Boolean options without a
//!    value are taken as `true`; boolean values are normalized to
//!    `"true"`/`"false"`; other values pass through unchanged.
//!
//! [`MetadataMatcher::resolve`] reports every outcome explicitly.
//! [`MetadataMatcher::parse`] flattens it into the `(key, value, default)`
//! triple where an empty key means the token should be kept verbatim as an
//! additional JVM option.

use std::collections::HashMap;

use log::{debug, warn};
use regex::Regex;

use crate::tables::TableFinder;
use crate::types::{parse_bool, Metadata};

/// Errors raised when constructing a matcher
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatcherError {
    #[error("No option tables for namespace '{0}'")]
    UnknownNamespace(String),
}

/// Translate a file-style name into a namespace identifier.
///
/// Namespaces are named with dashes where file names use dots.
///
/// # Examples
/// ```
/// use jvm_options::matcher::namespace_for;
///
/// assert_eq!(namespace_for("jvm11-server.options"), "jvm11-server-options");
/// assert_eq!(namespace_for("cassandra.options"), "cassandra-options");
/// ```
pub fn namespace_for(name: &str) -> String {
    name.replace('.', "-")
}

/// A token resolved to a known option
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedOption<'a> {
    pub metadata: &'a Metadata,
    pub value: String,
}

impl<'a> ParsedOption<'a> {
    pub fn key(&self) -> &'a str {
        &self.metadata.key
    }

    pub fn default_value(&self) -> &'a str {
        &self.metadata.default_value
    }
}

/// Outcome of resolving a single token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// Known option with a usable value
    Found(ParsedOption<'a>),
    /// Known non-boolean option given without `=value`
    MissingValue(&'a Metadata),
    /// Not a prefix match and not in the exact-key table
    UnknownKey,
    /// Known boolean option whose value is not a boolean literal
    InvalidValue { metadata: &'a Metadata, value: String },
    /// The prefix pattern matched a key the exact-key table does not have
    UnmappedPrefix { prefix: String, value: String },
}

impl Resolution<'_> {
    pub fn is_found(&self) -> bool {
        matches!(self, Resolution::Found(_))
    }

    /// Flatten into `(key, value, default)`.
    ///
    /// Unknown keys, invalid boolean values and unmapped prefixes all map to
    /// `("", "", "")`. A missing value keeps the key with an empty value.
    pub fn into_triple(self) -> (String, String, String) {
        match self {
            Resolution::Found(parsed) => (
                parsed.metadata.key.clone(),
                parsed.value,
                parsed.metadata.default_value.clone(),
            ),
            Resolution::MissingValue(metadata) => (
                metadata.key.clone(),
                String::new(),
                metadata.default_value.clone(),
            ),
            Resolution::UnknownKey
            | Resolution::InvalidValue { .. }
            | Resolution::UnmappedPrefix { .. } => (String::new(), String::new(), String::new()),
        }
    }
}

/// Matcher bound to the tables of a single namespace
#[derive(Debug, Clone)]
pub struct MetadataMatcher<'a> {
    namespace: String,
    meta_map: &'a HashMap<String, Metadata>,
    prefix_matcher: Option<&'a Regex>,
}

impl<'a> MetadataMatcher<'a> {
    /// Create a matcher for the namespace derived from `name` (see [`namespace_for`])
    pub fn new<F>(finder: &'a F, name: &str) -> Result<Self, MatcherError>
    where
        F: TableFinder + ?Sized,
    {
        let namespace = namespace_for(name);
        let meta_map = finder
            .map_finder(&namespace)
            .ok_or_else(|| MatcherError::UnknownNamespace(namespace.clone()))?;
        let prefix_matcher = finder.regexp_finder(&namespace);

        debug!(
            "Matcher for {}: {} options, prefix pattern: {}",
            namespace,
            meta_map.len(),
            prefix_matcher.map_or("none", Regex::as_str)
        );

        Ok(Self {
            namespace,
            meta_map,
            prefix_matcher,
        })
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Parse a token into `(key, value, default)`; an empty key means unknown or invalid
    pub fn parse(&self, input: &str) -> (String, String, String) {
        self.resolve(input).into_triple()
    }

    /// Resolve a token against the prefix pattern, then the exact-key table
    pub fn resolve(&self, input: &str) -> Resolution<'a> {
        if let Some(resolution) = self.prefix_parse(input) {
            return resolution;
        }

        let (key, value) = match input.split_once('=') {
            Some((key, value)) => (key, Some(value)),
            None => (input, None),
        };

        let Some(metadata) = self.meta_map.get(key) else {
            debug!("{}: unknown option {}", self.namespace, key);
            return Resolution::UnknownKey;
        };

        match value {
            // Existence implies inclusion
            None if metadata.is_boolean() => Resolution::Found(ParsedOption {
                metadata,
                value: "true".to_string(),
            }),
            None => Resolution::MissingValue(metadata),
            Some(raw) if metadata.is_boolean() => match parse_bool(raw) {
                Some(b) => Resolution::Found(ParsedOption {
                    metadata,
                    value: b.to_string(),
                }),
                None => {
                    warn!("{}: invalid boolean value '{}' for {}", self.namespace, raw, key);
                    Resolution::InvalidValue {
                        metadata,
                        value: raw.to_string(),
                    }
                }
            },
            Some(raw) => Resolution::Found(ParsedOption {
                metadata,
                value: raw.to_string(),
            }),
        }
    }

    /// Metadata whose output key is `key`
    pub fn find_by_key(&self, key: &str) -> Option<&'a Metadata> {
        match self.meta_map.get(key) {
            Some(metadata) if metadata.key == key => Some(metadata),
            _ => self.meta_map.values().find(|metadata| metadata.key == key),
        }
    }

    fn prefix_parse(&self, input: &str) -> Option<Resolution<'a>> {
        let captures = self.prefix_matcher?.captures(input)?;
        let span = captures.get(0)?;
        let prefix = span.as_str();
        let value = &input[span.end()..];

        match self.meta_map.get(prefix) {
            Some(metadata) => Some(Resolution::Found(ParsedOption {
                metadata,
                value: value.to_string(),
            })),
            None => {
                warn!(
                    "{}: prefix '{}' matched but has no table entry",
                    self.namespace, prefix
                );
                Some(Resolution::UnmappedPrefix {
                    prefix: prefix.to_string(),
                    value: value.to_string(),
                })
            }
        }
    }
}
