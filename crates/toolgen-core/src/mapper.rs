//! Type mapper: intermediate types to JSON-schema fragments

use crate::error::{ToolgenError, ToolgenResult};
use crate::ir::{FieldDef, IntermediateType, PrimitiveKind, TypeRegistry};
use serde_json::{json, Map, Value};

/// How many times a recursive type reference is unfolded before the mapper
/// cuts the cycle with a placeholder.
pub const DEFAULT_MAX_DEPTH: usize = 1;

/// Maps [`IntermediateType`] nodes to JSON-schema fragments against a
/// read-only [`TypeRegistry`].
///
/// Recursion is bounded by counting each type name along the current
/// reference path; once a name has been unfolded `max_depth` times the next
/// occurrence becomes `{"type": "object", "$comment": ...}`. Sibling uses of
/// the same type sit on different paths and are unaffected.
pub struct TypeMapper<'a> {
    registry: &'a TypeRegistry,
    max_depth: usize,
}

impl<'a> TypeMapper<'a> {
    /// Create a mapper over `registry` with the given unfolding budget
    pub fn new(registry: &'a TypeRegistry, max_depth: usize) -> Self {
        Self {
            registry,
            max_depth,
        }
    }

    /// Map a type to its JSON-schema fragment.
    pub fn map_type(&self, ty: &IntermediateType) -> ToolgenResult<Value> {
        let mut path = Vec::new();
        self.map_inner(ty, &mut path)
    }

    fn map_inner(&self, ty: &IntermediateType, path: &mut Vec<String>) -> ToolgenResult<Value> {
        match ty {
            IntermediateType::Scalar(kind) => Ok(scalar_schema(*kind)),
            IntermediateType::Enum { values } => Ok(json!({
                "type": "string",
                "enum": values,
            })),
            IntermediateType::Object { fields } => self.map_object(fields, path),
            IntermediateType::List(item) => {
                let items = self.map_inner(item, path)?;
                Ok(json!({
                    "type": "array",
                    "items": items,
                }))
            }
            // Optional marks presence for the parent's `required` list; the
            // fragment is the inner type's.
            IntermediateType::Optional(inner) => self.map_inner(inner, path),
            IntermediateType::Map(value) => {
                let value_schema = self.map_inner(value, path)?;
                Ok(json!({
                    "type": "object",
                    "additionalProperties": value_schema,
                }))
            }
            IntermediateType::Reference(name) => self.map_reference(name, path),
        }
    }

    fn map_object(&self, fields: &[FieldDef], path: &mut Vec<String>) -> ToolgenResult<Value> {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for field in fields {
            let mut schema = self.map_inner(&field.ty, path)?;
            if let Some(description) = &field.description {
                if let Some(fragment) = schema.as_object_mut() {
                    fragment.insert("description".to_string(), json!(description));
                }
            }
            properties.insert(field.name.clone(), schema);
            if field.is_required() {
                required.push(Value::String(field.name.clone()));
            }
        }

        let mut object = Map::new();
        object.insert("type".to_string(), json!("object"));
        object.insert("properties".to_string(), Value::Object(properties));
        // An empty `required` array is omitted, not emitted.
        if !required.is_empty() {
            object.insert("required".to_string(), Value::Array(required));
        }
        Ok(Value::Object(object))
    }

    fn map_reference(&self, name: &str, path: &mut Vec<String>) -> ToolgenResult<Value> {
        let unfolded = path.iter().filter(|seen| seen.as_str() == name).count();
        if unfolded >= self.max_depth {
            return Ok(json!({
                "type": "object",
                "$comment": format!(
                    "truncated recursive reference to {name} (max depth {})",
                    self.max_depth
                ),
            }));
        }

        let ty = self
            .registry
            .resolve(name)
            .ok_or_else(|| ToolgenError::parse(format!("unresolved type reference `{name}`")))?;

        path.push(name.to_string());
        let schema = self.map_inner(ty, path);
        path.pop();
        schema
    }
}

/// The scalar table. Each kind maps to exactly one fragment.
fn scalar_schema(kind: PrimitiveKind) -> Value {
    match kind {
        PrimitiveKind::String => json!({ "type": "string" }),
        PrimitiveKind::Int => json!({ "type": "integer" }),
        PrimitiveKind::Float => json!({ "type": "number" }),
        PrimitiveKind::Bool => json!({ "type": "boolean" }),
        PrimitiveKind::Bytes => json!({ "type": "string", "format": "byte" }),
    }
}
