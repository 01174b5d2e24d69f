//! # jvm-options - JVM option tokens to structured values and back
//!
//! This library translates between raw JVM command-line tokens such as
//! `-Xmx4G` or `-Djava.net.preferIPv4Stack=true` and structured key/value
//! pairs that can be moved into and out of a YAML configuration document.
//!
//! ## Architecture
//!
//! - `types`: option metadata (`BuilderType`, `ValueType`) and rendering back
//!   into flag syntax
//! - `tables`: immutable per-namespace lookup tables (exact keys plus a prefix
//!   pattern) and their YAML loader
//! - `matcher`: resolution of a raw token against one namespace
//! - `document`: YAML-facing collection of resolved options
//!
//! ## Example Usage
//!
//! ```rust
//! use jvm_options::{matcher::MetadataMatcher, tables::OptionTables};
//!
//! let tables = OptionTables::builtin()?;
//! let matcher = MetadataMatcher::new(&tables, "jvm-server.options")?;
//!
//! let (key, value, _default) = matcher.parse("-Xmx4G");
//! assert_eq!((key.as_str(), value.as_str()), ("-Xmx", "4G"));
//!
//! let meta = matcher.find_by_key("-Xmx").expect("-Xmx is a bundled option");
//! assert_eq!(meta.output("8G"), "-Xmx8G");
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Error Handling
//!
//! Token resolution never fails: unknown or invalid tokens are reported
//! through [`matcher::Resolution`]. Building tables and matchers returns
//! `thiserror` errors (`TableError`, `MatcherError`).

pub mod document;
pub mod matcher;
pub mod tables;
pub mod types;

pub use document::OptionsDocument;
pub use matcher::{namespace_for, MatcherError, MetadataMatcher, ParsedOption, Resolution};
pub use tables::{NamespaceTable, OptionTables, TableError, TableFinder};
pub use types::{BuilderType, Metadata, OptionValue, ValueType};
