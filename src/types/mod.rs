//! Option metadata, rendering rules and typed values.

pub mod metadata;
pub mod value;

pub use metadata::{BuilderType, Metadata, ValueType};
pub use value::{parse_bool, OptionValue, ValueError};
