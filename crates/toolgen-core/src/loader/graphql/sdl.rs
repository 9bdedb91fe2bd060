//! GraphQL SDL loading

use crate::error::{ToolgenError, ToolgenResult};
use crate::ir::{FieldDef, IntermediateType, NonInputKind, Operation, Parameter, TypeRegistry};
use crate::loader::{LoadOptions, LoadedSchema};
use graphql_parser::schema::{Definition, ObjectType, Type, TypeDefinition};
use graphql_parser::Pos;
use indexmap::IndexMap;
use tracing::debug;

use super::{scalar_kind, DEFAULT_MUTATION_ROOT, DEFAULT_QUERY_ROOT};

/// Built-in scalars every GraphQL schema carries implicitly.
const BUILTIN_SCALARS: [&str; 5] = ["String", "Int", "Float", "Boolean", "ID"];

/// Parse SDL text into the shared intermediate representation.
///
/// Root operation type names default to `Query`/`Mutation` and follow an
/// explicit `schema { ... }` definition when present. Mutation operations
/// come first in the result; subscriptions are ignored.
pub fn load(text: &str, options: &LoadOptions) -> ToolgenResult<LoadedSchema> {
    let document = graphql_parser::schema::parse_schema::<String>(text)
        .map_err(|e| ToolgenError::parse(e.to_string()))?;

    let mut registry = TypeRegistry::new();
    for name in BUILTIN_SCALARS {
        registry.insert(name, IntermediateType::Scalar(scalar_kind(name)));
    }

    let mut query_root = DEFAULT_QUERY_ROOT.to_string();
    let mut mutation_root = DEFAULT_MUTATION_ROOT.to_string();
    let mut object_types: IndexMap<&str, &ObjectType<'_, String>> = IndexMap::new();

    for definition in &document.definitions {
        match definition {
            Definition::SchemaDefinition(schema_def) => {
                if let Some(query) = &schema_def.query {
                    query_root = query.clone();
                }
                if let Some(mutation) = &schema_def.mutation {
                    mutation_root = mutation.clone();
                }
                // subscription root has no tool-spec counterpart
            }
            Definition::TypeDefinition(type_def) => match type_def {
                TypeDefinition::Scalar(scalar) => {
                    ensure_undeclared(&registry, &scalar.name, scalar.position)?;
                    registry.insert(
                        scalar.name.clone(),
                        IntermediateType::Scalar(scalar_kind(&scalar.name)),
                    );
                }
                TypeDefinition::Enum(enum_type) => {
                    ensure_undeclared(&registry, &enum_type.name, enum_type.position)?;
                    let values = enum_type
                        .values
                        .iter()
                        .map(|value| value.name.clone())
                        .collect();
                    registry.insert(enum_type.name.clone(), IntermediateType::Enum { values });
                }
                TypeDefinition::InputObject(input) => {
                    ensure_undeclared(&registry, &input.name, input.position)?;
                    let fields = input
                        .fields
                        .iter()
                        .map(|field| FieldDef {
                            name: field.name.clone(),
                            ty: lower_type(&field.value_type),
                            description: field.description.clone(),
                        })
                        .collect();
                    registry.insert(input.name.clone(), IntermediateType::Object { fields });
                }
                TypeDefinition::Object(object) => {
                    ensure_undeclared(&registry, &object.name, object.position)?;
                    registry.insert_non_input(
                        object.name.clone(),
                        NonInputKind::OutputObject,
                        Some(object.position.line),
                    );
                    object_types.insert(object.name.as_str(), object);
                }
                TypeDefinition::Interface(interface) => {
                    ensure_undeclared(&registry, &interface.name, interface.position)?;
                    registry.insert_non_input(
                        interface.name.clone(),
                        NonInputKind::Interface,
                        Some(interface.position.line),
                    );
                }
                TypeDefinition::Union(union_type) => {
                    ensure_undeclared(&registry, &union_type.name, union_type.position)?;
                    registry.insert_non_input(
                        union_type.name.clone(),
                        NonInputKind::Union,
                        Some(union_type.position.line),
                    );
                }
            },
            Definition::TypeExtension(_) | Definition::DirectiveDefinition(_) => {
                // no tool-spec impact
            }
        }
    }

    let mut operations = Vec::new();
    let mut roots = vec![mutation_root.as_str()];
    if !options.only_mutations && query_root != mutation_root {
        roots.push(query_root.as_str());
    }
    for root in roots {
        let Some(object) = object_types.get(root) else {
            continue;
        };
        for field in &object.fields {
            let parameters = field
                .arguments
                .iter()
                .map(|argument| Parameter {
                    name: argument.name.clone(),
                    ty: lower_type(&argument.value_type),
                    description: argument.description.clone(),
                })
                .collect();
            operations.push(Operation {
                name: field.name.clone(),
                description: field.description.clone(),
                parameters,
                return_type: Some(named_root(&field.field_type)),
            });
        }
    }

    debug!(
        types = registry.len(),
        operations = operations.len(),
        "loaded GraphQL SDL schema"
    );
    Ok(LoadedSchema {
        registry,
        operations,
    })
}

fn ensure_undeclared(registry: &TypeRegistry, name: &str, position: Pos) -> ToolgenResult<()> {
    if registry.is_declared(name) {
        return Err(ToolgenError::parse_at(
            format!("duplicate type definition `{name}`"),
            position.line,
            position.column,
        ));
    }
    Ok(())
}

/// `T` is optional, `T!` strips the wrapper, `[T]` nests.
fn lower_type(ty: &Type<'_, String>) -> IntermediateType {
    match ty {
        Type::NonNullType(inner) => lower_bare(inner),
        _ => IntermediateType::Optional(Box::new(lower_bare(ty))),
    }
}

fn lower_bare(ty: &Type<'_, String>) -> IntermediateType {
    match ty {
        Type::NamedType(name) => IntermediateType::Reference(name.clone()),
        Type::ListType(inner) => IntermediateType::List(Box::new(lower_type(inner))),
        Type::NonNullType(inner) => lower_bare(inner),
    }
}

/// Innermost named type, for return-type validation.
fn named_root(ty: &Type<'_, String>) -> String {
    match ty {
        Type::NamedType(name) => name.clone(),
        Type::ListType(inner) | Type::NonNullType(inner) => named_root(inner),
    }
}
