//! Typed option values and the boolean literal rule shared by parsing and rendering.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Errors raised when a raw option value cannot be coerced to its builder type
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueError {
    #[error("Invalid boolean value '{value}' for {key}")]
    InvalidBoolean { key: String, value: String },

    #[error("Invalid integer value '{value}' for {key}")]
    InvalidInteger { key: String, value: String },

    #[error("Missing value for {key}")]
    Missing { key: String },
}

/// A structured option value, as it lands in a YAML document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Number(i64),
    String(String),
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::Bool(b) => write!(f, "{}", b),
            OptionValue::Number(n) => write!(f, "{}", n),
            OptionValue::String(s) => f.write_str(s),
        }
    }
}

/// Parse a boolean literal.
///
/// Accepts `1`, `t`, `T`, `TRUE`, `true`, `True` and `0`, `f`, `F`, `FALSE`,
/// `false`, `False`. Mixed-case spellings such as `tRuE` are rejected.
///
/// # Examples
/// ```
/// use jvm_options::types::parse_bool;
///
/// assert_eq!(parse_bool("TRUE"), Some(true));
/// assert_eq!(parse_bool("0"), Some(false));
/// assert_eq!(parse_bool("yes"), None);
/// ```
pub fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}
