//! GraphQL introspection-JSON loading
//!
//! Accepts either a full response body (`{"data": {"__schema": ...}}`) or a
//! bare `{"__schema": ...}` document, deserializes it into a typed model,
//! and lowers that into the shared intermediate representation.

use crate::error::{ToolgenError, ToolgenResult};
use crate::ir::{FieldDef, IntermediateType, NonInputKind, Operation, Parameter, TypeRegistry};
use crate::loader::{LoadOptions, LoadedSchema};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{scalar_kind, DEFAULT_MUTATION_ROOT, DEFAULT_QUERY_ROOT};

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntrospectionSchema {
    query_type: Option<RootTypeRef>,
    mutation_type: Option<RootTypeRef>,
    types: Vec<IntrospectionType>,
}

#[derive(Debug, Clone, Deserialize)]
struct RootTypeRef {
    name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IntrospectionType {
    kind: TypeKind,
    name: Option<String>,
    description: Option<String>,
    #[serde(default)]
    fields: Option<Vec<IntrospectionField>>,
    #[serde(default)]
    input_fields: Option<Vec<IntrospectionInputValue>>,
    #[serde(default)]
    enum_values: Option<Vec<IntrospectionEnumValue>>,
}

#[derive(Debug, Clone, Deserialize)]
struct IntrospectionField {
    name: String,
    description: Option<String>,
    #[serde(default)]
    args: Vec<IntrospectionInputValue>,
    /// Return type; optional because minimal dumps omit it
    #[serde(rename = "type")]
    type_ref: Option<TypeRef>,
}

#[derive(Debug, Clone, Deserialize)]
struct IntrospectionInputValue {
    name: String,
    description: Option<String>,
    #[serde(rename = "type")]
    type_ref: TypeRef,
}

#[derive(Debug, Clone, Deserialize)]
struct IntrospectionEnumValue {
    name: String,
}

/// `__Type` kinds, as a closed set instead of string matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
enum TypeKind {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
    List,
    NonNull,
}

/// Nested `kind`/`name`/`ofType` type reference.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TypeRef {
    kind: TypeKind,
    name: Option<String>,
    of_type: Option<Box<TypeRef>>,
}

impl TypeRef {
    /// Lower to the intermediate representation. Top-level nullability
    /// becomes an `Optional` wrapper; `NON_NULL` strips it.
    fn lower(&self) -> ToolgenResult<IntermediateType> {
        match self.kind {
            TypeKind::NonNull => self.inner()?.lower_bare(),
            _ => Ok(IntermediateType::Optional(Box::new(self.lower_bare()?))),
        }
    }

    fn lower_bare(&self) -> ToolgenResult<IntermediateType> {
        match self.kind {
            TypeKind::NonNull => self.inner()?.lower_bare(),
            TypeKind::List => Ok(IntermediateType::List(Box::new(self.inner()?.lower()?))),
            _ => {
                let name = self.name.clone().ok_or_else(|| {
                    ToolgenError::parse("type reference without a name in introspection JSON")
                })?;
                Ok(IntermediateType::Reference(name))
            }
        }
    }

    fn inner(&self) -> ToolgenResult<&TypeRef> {
        self.of_type.as_deref().ok_or_else(|| {
            ToolgenError::parse(format!(
                "{:?} type reference without ofType; introspection nesting too shallow",
                self.kind
            ))
        })
    }

    /// Innermost named type, for return-type validation.
    fn named_root(&self) -> Option<String> {
        match &self.of_type {
            Some(inner) => inner.named_root(),
            None => self.name.clone(),
        }
    }
}

/// Parse introspection JSON into the shared intermediate representation.
pub fn load(value: &Value, options: &LoadOptions) -> ToolgenResult<LoadedSchema> {
    let schema_value = value
        .get("data")
        .and_then(|data| data.get("__schema"))
        .or_else(|| value.get("__schema"))
        .ok_or_else(|| ToolgenError::parse("introspection JSON carries no `__schema` object"))?;

    let schema: IntrospectionSchema =
        serde_path_to_error::deserialize(schema_value).map_err(|e| {
            ToolgenError::parse(format!(
                "invalid introspection JSON at {}: {}",
                e.path(),
                e.inner()
            ))
        })?;

    let query_root = schema
        .query_type
        .as_ref()
        .map_or(DEFAULT_QUERY_ROOT, |root| root.name.as_str());
    let mutation_root = schema
        .mutation_type
        .as_ref()
        .map_or(DEFAULT_MUTATION_ROOT, |root| root.name.as_str());

    let mut registry = TypeRegistry::new();
    for ty in &schema.types {
        let Some(name) = &ty.name else { continue };
        if name.starts_with("__") {
            continue; // introspection meta types
        }
        if registry.is_declared(name) {
            return Err(ToolgenError::parse(format!(
                "duplicate type definition `{name}`"
            )));
        }
        match ty.kind {
            TypeKind::Scalar => {
                registry.insert(name.clone(), IntermediateType::Scalar(scalar_kind(name)));
            }
            TypeKind::Enum => {
                let values = ty
                    .enum_values
                    .iter()
                    .flatten()
                    .map(|value| value.name.clone())
                    .collect();
                registry.insert(name.clone(), IntermediateType::Enum { values });
            }
            TypeKind::InputObject => {
                let mut fields = Vec::new();
                for input in ty.input_fields.iter().flatten() {
                    fields.push(FieldDef {
                        name: input.name.clone(),
                        ty: input.type_ref.lower()?,
                        description: input.description.clone(),
                    });
                }
                registry.insert(name.clone(), IntermediateType::Object { fields });
            }
            TypeKind::Object => {
                registry.insert_non_input(name.clone(), NonInputKind::OutputObject, None);
            }
            TypeKind::Interface => {
                registry.insert_non_input(name.clone(), NonInputKind::Interface, None);
            }
            TypeKind::Union => {
                registry.insert_non_input(name.clone(), NonInputKind::Union, None);
            }
            TypeKind::List | TypeKind::NonNull => {
                // wrapper kinds never appear as named declarations
            }
        }
    }

    let mut operations = Vec::new();
    let mut roots = vec![mutation_root];
    if !options.only_mutations && query_root != mutation_root {
        roots.push(query_root);
    }
    for root in roots {
        let Some(root_type) = schema
            .types
            .iter()
            .find(|ty| ty.name.as_deref() == Some(root))
        else {
            continue;
        };
        for field in root_type.fields.iter().flatten() {
            let mut parameters = Vec::new();
            for arg in &field.args {
                parameters.push(Parameter {
                    name: arg.name.clone(),
                    ty: arg.type_ref.lower()?,
                    description: arg.description.clone(),
                });
            }
            operations.push(Operation {
                name: field.name.clone(),
                description: field.description.clone(),
                parameters,
                return_type: field.type_ref.as_ref().and_then(TypeRef::named_root),
            });
        }
    }

    debug!(
        types = registry.len(),
        operations = operations.len(),
        "loaded GraphQL introspection schema"
    );
    Ok(LoadedSchema {
        registry,
        operations,
    })
}
