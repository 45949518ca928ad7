//! JSON Schema generation without runtime reflection.
//!
//! Rust has no struct-tag reflection, so response types declare their own
//! shape by implementing [`Described`]. [`SchemaBuilder`] gives response
//! types a small, typo-resistant vocabulary for building that shape instead
//! of hand-assembling `serde_json::Value` object literals everywhere.

use serde_json::{json, Value};

/// A type that can describe its own JSON Schema.
///
/// Every built-in synapse response type implements this; callers supplying
/// their own `Convert`/`Extraction` target type must do the same.
pub trait Described {
    /// Returns this type's JSON Schema as a `serde_json::Value`.
    fn describe() -> Value;

    /// Returns this type's JSON Schema serialized to a compact string, for
    /// embedding in a [`Prompt`](crate::prompt::Prompt)'s `schema` field.
    fn schema_string() -> String {
        Self::describe().to_string()
    }
}

/// Incrementally builds a JSON Schema `object` shape.
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    properties: serde_json::Map<String, Value>,
    required: Vec<String>,
}

impl SchemaBuilder {
    /// Start a new object schema with no properties.
    pub fn object() -> Self {
        Self {
            properties: serde_json::Map::new(),
            required: Vec::new(),
        }
    }

    /// Add a required property with the given sub-schema.
    pub fn required_property(mut self, name: &str, schema: Value) -> Self {
        self.properties.insert(name.to_string(), schema);
        self.required.push(name.to_string());
        self
    }

    /// Add an optional property with the given sub-schema.
    pub fn optional_property(mut self, name: &str, schema: Value) -> Self {
        self.properties.insert(name.to_string(), schema);
        self
    }

    /// Finish building, producing the full object schema.
    pub fn build(self) -> Value {
        json!({
            "type": "object",
            "properties": Value::Object(self.properties),
            "required": self.required,
            "additionalProperties": false,
        })
    }
}

impl Default for SchemaBuilder {
    fn default() -> Self {
        Self::object()
    }
}

/// `{"type": "string"}`.
pub fn string() -> Value {
    json!({"type": "string"})
}

/// `{"type": "string", "enum": [...]}`.
pub fn string_enum(variants: &[&str]) -> Value {
    json!({"type": "string", "enum": variants})
}

/// `{"type": "boolean"}`.
pub fn boolean() -> Value {
    json!({"type": "boolean"})
}

/// `{"type": "number"}`.
pub fn number() -> Value {
    json!({"type": "number"})
}

/// `{"type": "integer"}`.
pub fn integer() -> Value {
    json!({"type": "integer"})
}

/// `{"type": "array", "items": <item_schema>}`.
pub fn array(item_schema: Value) -> Value {
    json!({"type": "array", "items": item_schema})
}
