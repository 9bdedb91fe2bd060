//! Schema loading: raw input to a type registry plus operations
//!
//! Each loader lowers its source format into the shared intermediate
//! representation; validation then runs once over the result, collecting
//! every unsupported construct before failing.

pub mod graphql;
pub mod grpc;

pub use graphql::fetch::{FetchOptions, DEFAULT_FETCH_TIMEOUT_SECS};

use crate::error::{ToolgenError, ToolgenResult, UnsupportedConstruct};
use crate::ir::{IntermediateType, Operation, TypeRegistry};
use serde_json::Value;
use std::path::PathBuf;
use tracing::debug;

/// Input schema family declared by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// GraphQL SDL, introspection JSON, or endpoint URL
    Graphql,
    /// Compiled protobuf descriptor set
    Grpc,
}

/// Where the raw schema bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaLocation {
    Path(PathBuf),
    Url(String),
}

impl SchemaLocation {
    /// URLs are recognized by scheme; everything else is a filesystem path.
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            SchemaLocation::Url(raw.to_string())
        } else {
            SchemaLocation::Path(PathBuf::from(raw))
        }
    }
}

/// Raw schema input, read but not yet parsed.
#[derive(Debug, Clone)]
pub enum SchemaInput {
    /// GraphQL schema definition language text
    GraphqlSdl(String),
    /// GraphQL introspection JSON, either a response body or a bare
    /// `__schema` document
    GraphqlIntrospection(Value),
    /// Serialized protobuf `FileDescriptorSet`
    GrpcDescriptorSet(Vec<u8>),
}

/// Options that narrow which operations a loader extracts.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// GraphQL: walk only the mutation root
    pub only_mutations: bool,
    /// gRPC: restrict to these service names (unqualified); `None` keeps all
    pub services: Option<Vec<String>>,
}

/// A parsed schema: the registry plus operations in declaration order.
#[derive(Debug, Clone)]
pub struct LoadedSchema {
    pub registry: TypeRegistry,
    pub operations: Vec<Operation>,
}

/// Read raw schema input from a path or URL. A GraphQL URL triggers one
/// introspection request; a GraphQL file is sniffed as JSON or SDL; a gRPC
/// input must be a local descriptor-set file.
pub async fn read_schema(
    location: &SchemaLocation,
    kind: SourceKind,
    fetch: &FetchOptions,
) -> ToolgenResult<SchemaInput> {
    match (kind, location) {
        (SourceKind::Graphql, SchemaLocation::Url(url)) => {
            let body = graphql::fetch::fetch_introspection(url, fetch).await?;
            Ok(SchemaInput::GraphqlIntrospection(body))
        }
        (SourceKind::Graphql, SchemaLocation::Path(path)) => {
            let text = tokio::fs::read_to_string(path).await.map_err(|e| {
                ToolgenError::fetch(format!("failed to read {}: {e}", path.display()))
            })?;
            sniff_graphql(text)
        }
        (SourceKind::Grpc, SchemaLocation::Path(path)) => {
            let bytes = tokio::fs::read(path).await.map_err(|e| {
                ToolgenError::fetch(format!("failed to read {}: {e}", path.display()))
            })?;
            Ok(SchemaInput::GrpcDescriptorSet(bytes))
        }
        (SourceKind::Grpc, SchemaLocation::Url(url)) => Err(ToolgenError::invalid_input(format!(
            "gRPC descriptor sets must be local files, got URL `{url}`"
        ))),
    }
}

/// A GraphQL document starting with `{` is introspection JSON, anything else
/// is SDL.
fn sniff_graphql(text: String) -> ToolgenResult<SchemaInput> {
    if text.trim_start().starts_with('{') {
        let value: Value = serde_json::from_str(&text)
            .map_err(|e| ToolgenError::parse(format!("invalid introspection JSON: {e}")))?;
        Ok(SchemaInput::GraphqlIntrospection(value))
    } else {
        Ok(SchemaInput::GraphqlSdl(text))
    }
}

/// Parse raw input into the intermediate representation and validate it:
/// every reference must resolve, and every parameter type must be
/// input-mappable. Unsupported constructs are collected across the whole
/// schema before failing.
pub fn load(input: &SchemaInput, options: &LoadOptions) -> ToolgenResult<LoadedSchema> {
    let mut findings = Vec::new();
    let loaded = match input {
        SchemaInput::GraphqlSdl(text) => graphql::sdl::load(text, options)?,
        SchemaInput::GraphqlIntrospection(value) => graphql::introspection::load(value, options)?,
        SchemaInput::GrpcDescriptorSet(bytes) => grpc::load(bytes, options, &mut findings)?,
    };
    validate(&loaded, &mut findings)?;
    if !findings.is_empty() {
        return Err(ToolgenError::UnsupportedConstructs(findings));
    }
    debug!(
        types = loaded.registry.len(),
        operations = loaded.operations.len(),
        "schema loaded"
    );
    Ok(loaded)
}

fn validate(loaded: &LoadedSchema, findings: &mut Vec<UnsupportedConstruct>) -> ToolgenResult<()> {
    let registry = &loaded.registry;
    let mut unresolved: Vec<String> = Vec::new();

    // Every reference held by a registered type must at least be declared.
    for (name, ty) in registry.iter() {
        check_references(ty, &format!("type `{name}`"), registry, &mut unresolved);
    }

    // Operation parameters must be transitively input-mappable.
    for operation in &loaded.operations {
        for parameter in &operation.parameters {
            let context = format!(
                "parameter `{}` of operation `{}`",
                parameter.name, operation.name
            );
            let mut path = Vec::new();
            walk_input(
                &parameter.ty,
                &context,
                registry,
                findings,
                &mut unresolved,
                &mut path,
            );
        }
        if let Some(return_type) = &operation.return_type {
            if !registry.is_declared(return_type) {
                unresolved.push(format!(
                    "`{return_type}` as return type of operation `{}`",
                    operation.name
                ));
            }
        }
    }

    if !unresolved.is_empty() {
        unresolved.sort();
        unresolved.dedup();
        return Err(ToolgenError::parse(format!(
            "unresolved type references: {}",
            unresolved.join("; ")
        )));
    }
    Ok(())
}

fn check_references(
    ty: &IntermediateType,
    context: &str,
    registry: &TypeRegistry,
    unresolved: &mut Vec<String>,
) {
    match ty {
        IntermediateType::Scalar(_) | IntermediateType::Enum { .. } => {}
        IntermediateType::List(inner)
        | IntermediateType::Optional(inner)
        | IntermediateType::Map(inner) => check_references(inner, context, registry, unresolved),
        IntermediateType::Object { fields } => {
            for field in fields {
                check_references(&field.ty, context, registry, unresolved);
            }
        }
        IntermediateType::Reference(name) => {
            if !registry.is_declared(name) {
                unresolved.push(format!("`{name}` in {context}"));
            }
        }
    }
}

/// Walk a parameter type transitively, recording every reference to a
/// non-input type. `path` guards against reference cycles; the context names
/// the parameter that pulled the type in.
fn walk_input(
    ty: &IntermediateType,
    context: &str,
    registry: &TypeRegistry,
    findings: &mut Vec<UnsupportedConstruct>,
    unresolved: &mut Vec<String>,
    path: &mut Vec<String>,
) {
    match ty {
        IntermediateType::Scalar(_) | IntermediateType::Enum { .. } => {}
        IntermediateType::List(inner)
        | IntermediateType::Optional(inner)
        | IntermediateType::Map(inner) => {
            walk_input(inner, context, registry, findings, unresolved, path)
        }
        IntermediateType::Object { fields } => {
            for field in fields {
                walk_input(&field.ty, context, registry, findings, unresolved, path);
            }
        }
        IntermediateType::Reference(name) => {
            if let Some(entry) = registry.non_input_entry(name) {
                findings.push(UnsupportedConstruct {
                    construct: entry.kind.as_str().to_string(),
                    type_name: name.clone(),
                    context: context.to_string(),
                    line: entry.line,
                });
                return;
            }
            match registry.resolve(name) {
                None => unresolved.push(format!("`{name}` in {context}")),
                Some(inner) => {
                    if path.iter().any(|seen| seen == name) {
                        return; // already walked on this path
                    }
                    path.push(name.clone());
                    walk_input(inner, context, registry, findings, unresolved, path);
                    path.pop();
                }
            }
        }
    }
}
