//! Record normalization against a schema's declared types.

use std::fmt;

use serde_json::{Map, Value};
use tracing::warn;

use crate::coerce::coerce_value;
use crate::error::ConfigError;
use crate::resolver::{definitions, resolve_node};
use crate::types::{coercion_target, is_object_schema, json_type_name, TransformConfig};

/// Caller-supplied normalization hook.
///
/// Receives the current value (after default coercion, when that is enabled)
/// and the resolved schema node it was paired with, and returns the
/// replacement value.
pub type CustomTransform = dyn Fn(Value, &Value) -> Value + Send + Sync;

/// Normalizes records in place so their values match the types their schema
/// declares.
///
/// Conversion problems never surface as errors: a value that cannot be
/// converted stays as it was and the pass continues. The only fallible
/// operations are construction and hook registration.
///
/// ```
/// use schema_cast::{TransformConfig, TypeTransformer};
/// use serde_json::json;
///
/// let transformer = TypeTransformer::new(TransformConfig::DEFAULT_SCHEMA_NORMALIZATION)?;
/// let schema = json!({
///     "type": "object",
///     "properties": {"value": {"type": "string"}}
/// });
/// let mut record = json!({"value": 12});
/// transformer.transform(&mut record, &schema);
/// assert_eq!(record, json!({"value": "12"}));
/// # Ok::<(), schema_cast::ConfigError>(())
/// ```
pub struct TypeTransformer {
    config: TransformConfig,
    custom: Option<Box<CustomTransform>>,
}

impl TypeTransformer {
    /// Create a transformer with the given behavior flags.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ConflictingFlags` when `NO_TRANSFORM` is
    /// combined with any other flag.
    pub fn new(config: TransformConfig) -> Result<Self, ConfigError> {
        if config.contains(TransformConfig::NO_TRANSFORM) && config != TransformConfig::NO_TRANSFORM
        {
            return Err(ConfigError::ConflictingFlags);
        }
        Ok(Self {
            config,
            custom: None,
        })
    }

    /// The flags this transformer was built with.
    pub fn config(&self) -> TransformConfig {
        self.config
    }

    /// Register the custom normalization hook.
    ///
    /// At most one hook is held; registering again replaces the previous one.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::CustomNormalizationDisabled` unless the
    /// transformer was built with `CUSTOM_SCHEMA_NORMALIZATION`.
    pub fn register_custom_transform<F>(&mut self, hook: F) -> Result<(), ConfigError>
    where
        F: Fn(Value, &Value) -> Value + Send + Sync + 'static,
    {
        if !self.config.custom_normalization() {
            return Err(ConfigError::CustomNormalizationDisabled);
        }
        self.custom = Some(Box::new(hook));
        Ok(())
    }

    /// Normalize `record` in place against `schema`.
    ///
    /// The walk only starts when the (resolved) root schema is an object
    /// schema; otherwise the record is left untouched. The record root
    /// itself is never coerced and never handed to the hook, only the
    /// values reached through `properties` and `items` are.
    pub fn transform(&self, record: &mut Value, schema: &Value) {
        if !self.config.default_normalization() && self.custom.is_none() {
            return;
        }

        let defs = definitions(schema);
        let root = resolve_node(schema, defs);
        if !is_object_schema(root) {
            return;
        }

        let Some(props) = root.get("properties").and_then(Value::as_object) else {
            return;
        };
        let Some(fields) = record.as_object_mut() else {
            return;
        };
        for (key, subschema) in props {
            if let Some(field) = fields.get_mut(key) {
                self.walk(field, subschema, defs, &format!("/{}", key));
            }
        }
    }

    /// One step of the recursion: resolve the node, descend into structured
    /// children, coerce scalar leaves, then run the hook on the result.
    fn walk(&self, value: &mut Value, node: &Value, defs: Option<&Map<String, Value>>, path: &str) {
        let node = resolve_node(node, defs);
        let props = node.get("properties").and_then(Value::as_object);

        if let (Some(props), Some(fields)) = (props, value.as_object_mut()) {
            for (key, subschema) in props {
                if let Some(field) = fields.get_mut(key) {
                    self.walk(field, subschema, defs, &format!("{}/{}", path, key));
                }
            }
        } else if let (Some(items), Some(elements)) = (node.get("items"), value.as_array_mut()) {
            for (index, element) in elements.iter_mut().enumerate() {
                self.walk(element, items, defs, &format!("{}/{}", path, index));
            }
        } else if !value.is_null() {
            // Leaf: nullability always wins, so null was already excluded.
            self.coerce_leaf(value, node, path);
        }

        if let Some(hook) = &self.custom {
            let current = std::mem::take(value);
            *value = hook(current, node);
        }
    }

    fn coerce_leaf(&self, value: &mut Value, node: &Value, path: &str) {
        if !self.config.default_normalization() {
            return;
        }
        let Some(target) = coercion_target(node) else {
            return;
        };
        match coerce_value(value, target) {
            Some(coerced) => *value = coerced,
            None => warn!(
                path,
                from = json_type_name(value),
                to = target.as_keyword(),
                "value not convertible, left unchanged"
            ),
        }
    }
}

impl fmt::Debug for TypeTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypeTransformer")
            .field("config", &self.config)
            .field("custom", &self.custom.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn no_transform_cannot_be_combined() {
        let result = TypeTransformer::new(
            TransformConfig::NO_TRANSFORM | TransformConfig::DEFAULT_SCHEMA_NORMALIZATION,
        );
        assert!(matches!(result, Err(ConfigError::ConflictingFlags)));

        let result = TypeTransformer::new(
            TransformConfig::NO_TRANSFORM | TransformConfig::CUSTOM_SCHEMA_NORMALIZATION,
        );
        assert!(matches!(result, Err(ConfigError::ConflictingFlags)));
    }

    #[test]
    fn no_transform_alone_is_valid_and_inert() {
        let transformer = TypeTransformer::new(TransformConfig::NO_TRANSFORM).unwrap();
        let schema = json!({
            "type": "object",
            "properties": {"value": {"type": "string"}}
        });
        let mut record = json!({"value": 12});
        transformer.transform(&mut record, &schema);
        assert_eq!(record, json!({"value": 12}));
    }

    #[test]
    fn hook_registration_requires_custom_flag() {
        let mut transformer =
            TypeTransformer::new(TransformConfig::DEFAULT_SCHEMA_NORMALIZATION).unwrap();
        let result = transformer.register_custom_transform(|value, _| value);
        assert!(matches!(
            result,
            Err(ConfigError::CustomNormalizationDisabled)
        ));
    }

    #[test]
    fn hook_reregistration_overwrites() {
        let mut transformer =
            TypeTransformer::new(TransformConfig::CUSTOM_SCHEMA_NORMALIZATION).unwrap();
        transformer
            .register_custom_transform(|_, _| json!("first"))
            .unwrap();
        transformer
            .register_custom_transform(|_, _| json!("second"))
            .unwrap();

        let schema = json!({
            "type": "object",
            "properties": {"value": {"type": "string"}}
        });
        let mut record = json!({"value": 1});
        transformer.transform(&mut record, &schema);
        assert_eq!(record, json!({"value": "second"}));
    }

    #[test]
    fn scalar_fields_coerce_toward_declared_types() {
        let transformer =
            TypeTransformer::new(TransformConfig::DEFAULT_SCHEMA_NORMALIZATION).unwrap();
        let schema = json!({
            "type": "object",
            "properties": {
                "name": {"type": "string"},
                "count": {"type": "integer"},
                "ratio": {"type": "number"},
                "active": {"type": "boolean"}
            }
        });
        let mut record = json!({
            "name": 12,
            "count": "3",
            "ratio": "0.5",
            "active": 1
        });
        transformer.transform(&mut record, &schema);
        assert_eq!(
            record,
            json!({"name": "12", "count": 3, "ratio": 0.5, "active": true})
        );
    }

    #[test]
    fn null_values_stay_null() {
        let transformer =
            TypeTransformer::new(TransformConfig::DEFAULT_SCHEMA_NORMALIZATION).unwrap();
        let schema = json!({
            "type": "object",
            "properties": {
                "a": {"type": "string"},
                "b": {"type": ["null", "integer"]}
            }
        });
        let mut record = json!({"a": null, "b": null});
        transformer.transform(&mut record, &schema);
        assert_eq!(record, json!({"a": null, "b": null}));
    }

    #[test]
    fn non_object_root_is_a_no_op() {
        let transformer =
            TypeTransformer::new(TransformConfig::DEFAULT_SCHEMA_NORMALIZATION).unwrap();
        let schema = json!({"type": "string"});
        let mut record = json!({"value": 12});
        transformer.transform(&mut record, &schema);
        assert_eq!(record, json!({"value": 12}));
    }

    #[test]
    fn unconvertible_value_left_in_place() {
        let transformer =
            TypeTransformer::new(TransformConfig::DEFAULT_SCHEMA_NORMALIZATION).unwrap();
        let schema = json!({
            "type": "object",
            "properties": {
                "bad": {"type": "number"},
                "good": {"type": "number"}
            }
        });
        let mut record = json!({"bad": "aa12", "good": "7"});
        transformer.transform(&mut record, &schema);
        assert_eq!(record, json!({"bad": "aa12", "good": 7.0}));
    }

    #[test]
    fn transformer_is_shareable_across_threads() {
        let transformer =
            TypeTransformer::new(TransformConfig::DEFAULT_SCHEMA_NORMALIZATION).unwrap();
        let transformer = std::sync::Arc::new(transformer);
        let schema = std::sync::Arc::new(json!({
            "type": "object",
            "properties": {"n": {"type": "integer"}}
        }));

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let transformer = transformer.clone();
                let schema = schema.clone();
                std::thread::spawn(move || {
                    let mut record = json!({"n": i.to_string()});
                    transformer.transform(&mut record, &schema);
                    record
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), json!({"n": i}));
        }
    }

    #[test]
    fn debug_does_not_expose_the_hook() {
        let mut transformer =
            TypeTransformer::new(TransformConfig::CUSTOM_SCHEMA_NORMALIZATION).unwrap();
        transformer.register_custom_transform(|value, _| value).unwrap();
        let rendered = format!("{:?}", transformer);
        assert!(rendered.contains("custom: true"));
    }
}
