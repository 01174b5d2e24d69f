//! Structured options documents.
//!
//! An [`OptionsDocument`] is the YAML-facing view of a list of JVM tokens:
//! recognized options become typed key/value pairs and everything else is
//! carried verbatim under `additional-jvm-options`.

use std::collections::BTreeMap;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::matcher::{MetadataMatcher, Resolution};
use crate::types::{OptionValue, ValueError, ValueType};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionsDocument {
    #[serde(flatten)]
    pub options: BTreeMap<String, OptionValue>,
    #[serde(
        rename = "additional-jvm-options",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub additional_jvm_options: Vec<String>,
}

impl OptionsDocument {
    /// Resolve every token; the last occurrence of an option wins
    pub fn from_tokens<'t, I>(matcher: &MetadataMatcher<'_>, tokens: I) -> Self
    where
        I: IntoIterator<Item = &'t str>,
    {
        let mut document = Self::default();

        for token in tokens {
            match matcher.resolve(token) {
                // Template options cannot be rendered back, keep them verbatim
                Resolution::Found(parsed) if parsed.metadata.value_type == ValueType::TemplateValue => {
                    debug!("{} has no structured form; keeping '{}' verbatim", parsed.key(), token);
                    document.additional_jvm_options.push(token.to_string());
                }
                Resolution::Found(parsed) => match parsed.metadata.coerce(&parsed.value) {
                    Ok(value) => {
                        if let Some(previous) = document.options.insert(parsed.key().to_string(), value) {
                            debug!("{} overrides previous value {}", token, previous);
                        }
                    }
                    Err(e) => {
                        warn!("{}; keeping '{}' verbatim", e, token);
                        document.additional_jvm_options.push(token.to_string());
                    }
                },
                Resolution::MissingValue(metadata) => {
                    let e = ValueError::Missing {
                        key: metadata.key.clone(),
                    };
                    warn!("{}; keeping '{}' verbatim", e, token);
                    document.additional_jvm_options.push(token.to_string());
                }
                Resolution::UnknownKey
                | Resolution::InvalidValue { .. }
                | Resolution::UnmappedPrefix { .. } => {
                    document.additional_jvm_options.push(token.to_string());
                }
            }
        }

        document
    }

    /// Render back into JVM tokens, known options first
    pub fn to_tokens(&self, matcher: &MetadataMatcher<'_>) -> Vec<String> {
        let mut tokens: Vec<String> = self
            .options
            .iter()
            .filter_map(|(key, value)| match matcher.find_by_key(key) {
                Some(metadata) => {
                    let rendered = metadata.output(&value.to_string());
                    if rendered.is_empty() {
                        debug!("{} with value {} renders to nothing", key, value);
                    }
                    (!rendered.is_empty()).then_some(rendered)
                }
                None => {
                    warn!("{}: no option named {}", matcher.namespace(), key);
                    None
                }
            })
            .collect();

        tokens.extend(self.additional_jvm_options.iter().cloned());
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::OptionTables;

    fn tables() -> OptionTables {
        OptionTables::builtin().unwrap()
    }

    #[test]
    fn test_from_tokens() {
        let tables = tables();
        let matcher = MetadataMatcher::new(&tables, "jvm-server.options").unwrap();

        let document = OptionsDocument::from_tokens(
            &matcher,
            [
                "-Xmx4G",
                "-Xms1G",
                "-server",
                "-Djava.net.preferIPv4Stack=True",
                "-Dcassandra.ring_delay_ms=5000",
                "-Dcassandra.available_processors=many",
                "-Dcassandra.config",
                "-XX:+UseG1GC",
                "-Xmx8G",
            ],
        );

        assert_eq!(document.options["-Xmx"], OptionValue::String("8G".to_string()));
        assert_eq!(document.options["-Xms"], OptionValue::String("1G".to_string()));
        assert_eq!(document.options["-server"], OptionValue::Bool(true));
        assert_eq!(document.options["-Djava.net.preferIPv4Stack"], OptionValue::Bool(true));
        assert_eq!(document.options["-Dcassandra.ring_delay_ms"], OptionValue::Number(5000));
        assert_eq!(
            document.additional_jvm_options,
            vec![
                "-Dcassandra.available_processors=many",
                "-Dcassandra.config",
                "-XX:+UseG1GC",
            ]
        );
    }

    #[test]
    fn test_template_option_survives_round_trip() {
        let tables = tables();
        let matcher = MetadataMatcher::new(&tables, "jvm-server.options").unwrap();

        let document = OptionsDocument::from_tokens(
            &matcher,
            ["-XX:OnOutOfMemoryError=kill -9 %p", "-Dcassandra.ring_delay_ms=007"],
        );
        assert!(!document.options.contains_key("-XX:OnOutOfMemoryError"));
        assert_eq!(
            document.additional_jvm_options,
            vec!["-XX:OnOutOfMemoryError=kill -9 %p"]
        );

        let yaml = serde_yaml::to_string(&document).unwrap();
        let reloaded: OptionsDocument = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(
            reloaded.to_tokens(&matcher),
            vec![
                "-Dcassandra.ring_delay_ms=007",
                "-XX:OnOutOfMemoryError=kill -9 %p",
            ]
        );
    }

    #[test]
    fn test_yaml_shape() {
        let tables = tables();
        let matcher = MetadataMatcher::new(&tables, "jvm-server.options").unwrap();
        let document = OptionsDocument::from_tokens(&matcher, ["-Xss512k", "-ea", "-verbose:gc"]);

        let yaml = serde_yaml::to_string(&document).unwrap();
        assert_eq!(
            yaml,
            "-Xss: 512k\n-ea: true\nadditional-jvm-options:\n- -verbose:gc\n"
        );

        let parsed: OptionsDocument = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, document);
    }

    #[test]
    fn test_to_tokens() {
        let tables = tables();
        let matcher = MetadataMatcher::new(&tables, "jvm-server.options").unwrap();

        let yaml = r#"
-Xmx: 4G
-server: true
-ea: false
-Djava.net.preferIPv4Stack: true
-Dcassandra.ring_delay_ms: 5000
-XX:OnOutOfMemoryError: "kill -9 %p"
-Dnot.registered: 1
additional-jvm-options:
  - -verbose:gc
"#;
        let document: OptionsDocument = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(
            document.to_tokens(&matcher),
            vec![
                "-Dcassandra.ring_delay_ms=5000",
                "-Djava.net.preferIPv4Stack=true",
                "-Xmx4G",
                "-server",
                "-verbose:gc",
            ]
        );
    }
}
