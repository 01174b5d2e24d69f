//! Per-option metadata and the reverse rendering into JVM flag syntax.
//!
//! Rendering rules follow the cass-config-definitions conventions:
//!
//! | `ValueType`        | value    | output            |
//! |--------------------|----------|-------------------|
//! | `StaticConstant`   | `true`   | `-server`         |
//! | `StaticConstant`   | `false`  | (omitted)         |
//! | `StringValue`      | `true`   | `-Dkey=true`      |
//! | `SuppressedValue`  | `4G`     | `-Xmx4G`          |
//! | `TemplateValue`    | any      | (omitted)         |

use serde::{Deserialize, Serialize};

use super::value::{parse_bool, OptionValue, ValueError};

/// How a raw string value is coerced and validated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BuilderType {
    Boolean,
    String,
    #[serde(alias = "int")]
    Integer,
}

/// Textual shape of the rendered flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Bare flag, present only when the value is true
    StaticConstant,
    /// `key=value`
    StringValue,
    /// `keyvalue`, used by size flags such as `-Xmx`
    SuppressedValue,
    /// Not representable yet
    TemplateValue,
}

/// Metadata for one known option
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Metadata {
    pub key: String,
    pub builder_type: BuilderType,
    pub value_type: ValueType,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub default_value: String,
}

impl Metadata {
    pub fn new(key: impl Into<String>, builder_type: BuilderType, value_type: ValueType) -> Self {
        Self {
            key: key.into(),
            builder_type,
            value_type,
            default_value: String::new(),
        }
    }

    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = default_value.into();
        self
    }

    pub fn is_boolean(&self) -> bool {
        self.builder_type == BuilderType::Boolean
    }

    /// Render `value` back into JVM flag syntax.
    ///
    /// An empty string means no flag is produced. That is the normal outcome
    /// for a false `StaticConstant` and for every `TemplateValue`.
    ///
    /// # Examples
    /// ```
    /// use jvm_options::types::{BuilderType, Metadata, ValueType};
    ///
    /// let xmx = Metadata::new("-Xmx", BuilderType::String, ValueType::SuppressedValue);
    /// assert_eq!(xmx.output("4G"), "-Xmx4G");
    ///
    /// let server = Metadata::new("-server", BuilderType::Boolean, ValueType::StaticConstant);
    /// assert_eq!(server.output("true"), "-server");
    /// assert_eq!(server.output("false"), "");
    /// ```
    pub fn output(&self, value: &str) -> String {
        match self.value_type {
            ValueType::StaticConstant => match parse_bool(value) {
                Some(true) => self.key.clone(),
                Some(false) | None => String::new(),
            },
            ValueType::StringValue => format!("{}={}", self.key, value),
            ValueType::SuppressedValue => format!("{}{}", self.key, value),
            ValueType::TemplateValue => String::new(),
        }
    }

    /// Coerce a parsed string value into a typed value according to the builder type.
    ///
    /// Integers become numbers only when their text is canonical, so that
    /// rendering the typed value reproduces the original token.
    pub fn coerce(&self, value: &str) -> Result<OptionValue, ValueError> {
        match self.builder_type {
            BuilderType::Boolean => parse_bool(value)
                .map(OptionValue::Bool)
                .ok_or_else(|| ValueError::InvalidBoolean {
                    key: self.key.clone(),
                    value: value.to_string(),
                }),
            BuilderType::Integer => match value.parse::<i64>() {
                Ok(n) if n.to_string() == value => Ok(OptionValue::Number(n)),
                // Non-canonical spellings such as 007 or +5 keep their text
                Ok(_) => Ok(OptionValue::String(value.to_string())),
                Err(_) => Err(ValueError::InvalidInteger {
                    key: self.key.clone(),
                    value: value.to_string(),
                }),
            },
            BuilderType::String => Ok(OptionValue::String(value.to_string())),
        }
    }
}
