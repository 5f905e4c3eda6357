//! Core types for schema-driven normalization.

use serde_json::Value;

/// Returns the JSON type name for diagnostics.
pub fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A JSON Schema `type` keyword as seen by the normalizer.
///
/// The set is closed: anything outside the seven standard keywords maps to
/// [`SchemaType::Unknown`], which occupies a slot in the declared-type count
/// but is never a coercion target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaType {
    String,
    Number,
    Integer,
    Boolean,
    Object,
    Array,
    Unknown,
}

impl SchemaType {
    /// Parse a single `type` keyword.
    pub fn from_keyword(s: &str) -> Self {
        match s {
            "string" => SchemaType::String,
            "number" => SchemaType::Number,
            "integer" => SchemaType::Integer,
            "boolean" => SchemaType::Boolean,
            "object" => SchemaType::Object,
            "array" => SchemaType::Array,
            _ => SchemaType::Unknown,
        }
    }

    /// Returns the schema keyword for this type.
    pub fn as_keyword(&self) -> &'static str {
        match self {
            SchemaType::String => "string",
            SchemaType::Number => "number",
            SchemaType::Integer => "integer",
            SchemaType::Boolean => "boolean",
            SchemaType::Object => "object",
            SchemaType::Array => "array",
            SchemaType::Unknown => "unknown",
        }
    }
}

/// Extracts the declared types of a schema node, with `"null"` stripped.
///
/// A bare keyword counts as a one-element list. Entries that are not
/// recognized keywords (or not strings at all) become [`SchemaType::Unknown`]
/// and still count toward ambiguity.
pub fn declared_types(node: &Value) -> Vec<SchemaType> {
    match node.get("type") {
        Some(Value::String(s)) if s == "null" => Vec::new(),
        Some(Value::String(s)) => vec![SchemaType::from_keyword(s)],
        Some(Value::Array(entries)) => entries
            .iter()
            .filter(|entry| entry.as_str() != Some("null"))
            .map(|entry| match entry.as_str() {
                Some(keyword) => SchemaType::from_keyword(keyword),
                None => SchemaType::Unknown,
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Returns the single type a value at this node should be coerced toward.
///
/// `None` when the node declares no type, only `"null"`, or more than one
/// non-null type (ambiguous unions are deliberately left alone).
pub fn coercion_target(node: &Value) -> Option<SchemaType> {
    let mut types = declared_types(node);
    if types.len() == 1 {
        types.pop()
    } else {
        None
    }
}

/// Structural test for an object schema: declares `object` among its types
/// or carries a `properties` map.
pub fn is_object_schema(node: &Value) -> bool {
    declared_types(node).contains(&SchemaType::Object)
        || matches!(node.get("properties"), Some(Value::Object(_)))
}

bitflags::bitflags! {
    /// Behavior flags for [`TypeTransformer`](crate::TypeTransformer).
    ///
    /// `NO_TRANSFORM` cannot be combined with the other flags; the
    /// transformer's constructor rejects such a set.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct TransformConfig: u8 {
        /// Leave every record untouched.
        const NO_TRANSFORM = 0b001;
        /// Coerce values toward the schema's declared types.
        const DEFAULT_SCHEMA_NORMALIZATION = 0b010;
        /// Invoke a caller-registered hook at every schema node.
        const CUSTOM_SCHEMA_NORMALIZATION = 0b100;
    }
}

impl TransformConfig {
    /// Whether default (schema-declared) coercion is enabled.
    pub fn default_normalization(&self) -> bool {
        self.contains(TransformConfig::DEFAULT_SCHEMA_NORMALIZATION)
    }

    /// Whether the custom hook path is enabled.
    pub fn custom_normalization(&self) -> bool {
        self.contains(TransformConfig::CUSTOM_SCHEMA_NORMALIZATION)
    }
}
