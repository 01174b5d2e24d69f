//! Loading option tables from YAML documents.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use super::{NamespaceTable, OptionTables, TableError};
use crate::types::{BuilderType, Metadata, OptionValue, ValueType};

/// Tables bundled with the crate
const BUILTIN_TABLES: &str = include_str!("builtin.yaml");

/// On-disk tables document
#[derive(Debug, Serialize, Deserialize)]
pub struct TablesFile {
    pub namespaces: BTreeMap<String, BTreeMap<String, EntryConfig>>,
}

/// One option entry, keyed by its lookup key in the enclosing map
#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EntryConfig {
    /// Canonical output key; defaults to the lookup key
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub builder_type: BuilderType,
    pub value_type: ValueType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_value: Option<OptionValue>,
}

impl EntryConfig {
    fn into_metadata(self, entry: &str) -> Metadata {
        let meta = Metadata::new(
            self.key.unwrap_or_else(|| entry.to_string()),
            self.builder_type,
            self.value_type,
        );
        match self.default_value {
            Some(default) => meta.with_default(default.to_string()),
            None => meta,
        }
    }
}

impl TablesFile {
    /// Validate every namespace and build the immutable tables
    pub fn build(self) -> Result<OptionTables, TableError> {
        let mut tables = OptionTables::new();

        for (namespace, entries) in self.namespaces {
            // Lookup keys double as output keys unless overridden
            let options: HashMap<String, Metadata> = entries
                .into_iter()
                .map(|(entry, config)| {
                    let meta = config.into_metadata(&entry);
                    (entry, meta)
                })
                .collect();

            let table = NamespaceTable::build(&namespace, options)?;
            debug!("Namespace {}: {} options", namespace, table.len());
            tables = tables.with_namespace(namespace, table);
        }

        Ok(tables)
    }
}

impl OptionTables {
    /// Parse tables from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, TableError> {
        let file: TablesFile = serde_yaml::from_str(yaml)?;
        file.build()
    }

    /// Load tables from a YAML file
    pub fn from_yaml_file(path: &Path) -> Result<Self, TableError> {
        info!("Loading option tables from: {:?}", path);

        // Open the tables file
        let file = File::open(path).map_err(|source| TableError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        // Parse the YAML content
        let tables: TablesFile = serde_yaml::from_reader(file)?;

        // Validate and compile the prefix patterns
        tables.build()
    }

    /// Tables bundled with the crate for the jvm, jvm8 and jvm11 server options
    pub fn builtin() -> Result<Self, TableError> {
        Self::from_yaml_str(BUILTIN_TABLES)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tables::TableFinder;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_from_yaml_str() {
        let yaml = r#"
namespaces:
  test-options:
    "-Xmx":
      builder_type: string
      value_type: suppressed_value
    "-Djava.net.preferIPv4Stack":
      builder_type: boolean
      value_type: string_value
      default_value: true
    "-Dcassandra.ring_delay_ms":
      key: "-Dcassandra.ring_delay_ms"
      builder_type: int
      value_type: string_value
      default_value: 30000
"#;
        let tables = OptionTables::from_yaml_str(yaml).unwrap();
        let options = tables.map_finder("test-options").unwrap();

        assert_eq!(options.len(), 3);
        assert_eq!(options["-Xmx"].key, "-Xmx");
        assert_eq!(options["-Xmx"].default_value, "");
        assert_eq!(options["-Djava.net.preferIPv4Stack"].default_value, "true");
        assert_eq!(options["-Dcassandra.ring_delay_ms"].builder_type, BuilderType::Integer);
        assert_eq!(options["-Dcassandra.ring_delay_ms"].default_value, "30000");
        assert!(tables.regexp_finder("test-options").is_some());
    }

    #[test]
    fn test_unknown_field_rejected() {
        let yaml = r#"
namespaces:
  test-options:
    "-Xmx":
      builder_type: string
      value_type: suppressed_value
      suppress_equal_sign: true
"#;
        assert!(matches!(
            OptionTables::from_yaml_str(yaml),
            Err(TableError::Yaml(_))
        ));
    }

    #[test]
    fn test_empty_output_key_rejected() {
        let yaml = r#"
namespaces:
  test-options:
    "-server":
      key: ""
      builder_type: boolean
      value_type: static_constant
"#;
        assert!(matches!(
            OptionTables::from_yaml_str(yaml),
            Err(TableError::EmptyKey { .. })
        ));
    }

    #[test]
    fn test_from_yaml_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(
            file,
            "namespaces:\n  test-options:\n    \"-server\":\n      builder_type: boolean\n      value_type: static_constant\n"
        )
        .unwrap();

        let tables = OptionTables::from_yaml_file(file.path()).unwrap();
        assert_eq!(tables.namespace_names(), vec!["test-options"]);
        assert!(tables.regexp_finder("test-options").is_none());
    }

    #[test]
    fn test_missing_file() {
        let err = OptionTables::from_yaml_file(Path::new("/nonexistent/tables.yaml")).unwrap_err();
        assert!(matches!(err, TableError::Io { .. }));
    }

    #[test]
    fn test_builtin_tables() {
        let tables = OptionTables::builtin().unwrap();
        assert_eq!(
            tables.namespace_names(),
            vec!["jvm-server-options", "jvm11-server-options", "jvm8-server-options"]
        );

        let server = tables.map_finder("jvm-server-options").unwrap();
        assert_eq!(server["-Xmx"].value_type, ValueType::SuppressedValue);
        assert_eq!(server["-server"].value_type, ValueType::StaticConstant);
        assert!(tables.regexp_finder("jvm-server-options").is_some());
    }
}
