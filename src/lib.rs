//! Schema Cast
//!
//! Schema-driven type normalization for JSON records.
//!
//! This library walks a record against its JSON Schema and coerces scalar
//! values toward the types the schema declares: numeric strings become
//! numbers, numbers declared as strings become strings, and so on. Values
//! that cannot be converted are left exactly as they were; a transform pass
//! never fails because of malformed data.
//!
//! # Example
//!
//! ```
//! use schema_cast::{TransformConfig, TypeTransformer};
//! use serde_json::json;
//!
//! let schema = json!({
//!     "type": "object",
//!     "definitions": {
//!         "point": {
//!             "type": "object",
//!             "properties": {
//!                 "x": { "type": "number" },
//!                 "y": { "type": "number" }
//!             }
//!         }
//!     },
//!     "properties": {
//!         "id": { "type": "integer" },
//!         "origin": { "$ref": "#/definitions/point" }
//!     }
//! });
//!
//! let transformer = TypeTransformer::new(TransformConfig::DEFAULT_SCHEMA_NORMALIZATION)?;
//! let mut record = json!({ "id": "7", "origin": { "x": "1.5", "y": 2 } });
//! transformer.transform(&mut record, &schema);
//!
//! assert_eq!(record, json!({ "id": 7, "origin": { "x": 1.5, "y": 2.0 } }));
//! # Ok::<(), schema_cast::ConfigError>(())
//! ```
//!
//! # Coercion Rules
//!
//! | Target | Converted sources | Examples |
//! |-----------|--------------------------------|----------|
//! | `string` | any non-null value | `12` → `"12"`, `[1,2,3]` → `"[1,2,3]"` |
//! | `number` | number, numeric string, boolean | `"2"` → `2.0`, `true` → `1.0` |
//! | `integer` | whole number, double, integral string, boolean | `4.7` → `4`, `"12"` → `12` |
//! | `boolean` | boolean, number, string | `0` → `false`, `"false"` → `false`, `"yes"` → `true` |
//!
//! A field declaring more than one non-null type is ambiguous and never
//! coerced, and a null value always stays null, whatever the declared type.
//!
//! # Configuration
//!
//! [`TransformConfig`] selects the behavior: `DEFAULT_SCHEMA_NORMALIZATION`
//! for the coercion rules above, `CUSTOM_SCHEMA_NORMALIZATION` to run a
//! caller-registered hook at every schema node (after default coercion when
//! both are enabled), and `NO_TRANSFORM` to disable everything. The first
//! two combine; `NO_TRANSFORM` combines with nothing.

mod coerce;
mod error;
mod linter;
mod loader;
mod resolver;
mod transformer;
mod types;

pub use coerce::coerce_value;
pub use error::{ConfigError, LoadError};
pub use linter::{lint, lint_file, Diagnostic, FileResult, FileStatus, LintResult, Severity};
pub use loader::{is_url, load_json, load_json_auto, load_json_str, read_text};
pub use resolver::{definitions, resolve_node};
pub use transformer::{CustomTransform, TypeTransformer};
pub use types::{
    coercion_target, declared_types, is_object_schema, json_type_name, SchemaType, TransformConfig,
};

#[cfg(feature = "remote")]
pub use loader::load_json_url;
