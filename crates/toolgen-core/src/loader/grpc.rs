//! gRPC descriptor-set loading
//!
//! Reads a serialized `FileDescriptorSet` (as produced by
//! `protoc --descriptor_set_out --include_imports`) through `prost-reflect`
//! and lowers messages, enums, and service methods into the shared
//! intermediate representation. Types are keyed by fully-qualified name.

use crate::error::{ToolgenError, ToolgenResult, UnsupportedConstruct};
use crate::ir::{
    FieldDef, IntermediateType, Operation, Parameter, PrimitiveKind, TypeRegistry,
};
use crate::loader::{LoadOptions, LoadedSchema};
use prost_reflect::{
    Cardinality, DescriptorPool, EnumDescriptor, FieldDescriptor, Kind, MessageDescriptor,
};
use prost_types::field_descriptor_proto::Type as ProtoFieldType;
use prost_types::FileDescriptorProto;
use tracing::debug;

/// Parse descriptor-set bytes into the shared intermediate representation.
///
/// Unsupported field shapes (non-string map keys, proto2 groups) are pushed
/// onto `findings` and the offending field gets a placeholder type, so one
/// pass can report every occurrence.
pub fn load(
    bytes: &[u8],
    options: &LoadOptions,
    findings: &mut Vec<UnsupportedConstruct>,
) -> ToolgenResult<LoadedSchema> {
    let pool = DescriptorPool::decode(bytes)
        .map_err(|e| ToolgenError::parse(format!("invalid descriptor set: {e}")))?;

    let mut registry = TypeRegistry::new();
    for file in pool.files() {
        for message in file.messages() {
            register_message(&message, &mut registry, findings);
        }
        for enum_type in file.enums() {
            register_enum(&enum_type, &mut registry);
        }
    }

    let mut operations = Vec::new();
    for file in pool.files() {
        let file_proto = file.file_descriptor_proto();
        for (service_index, service) in file.services().enumerate() {
            if let Some(services) = &options.services {
                if !services.iter().any(|name| name == service.name()) {
                    debug!(service = service.name(), "service not in filter, skipped");
                    continue;
                }
            }
            for (method_index, method) in service.methods().enumerate() {
                let input_name = method.input().full_name().to_string();
                let parameters = match registry.resolve(&input_name) {
                    Some(IntermediateType::Object { fields }) => fields
                        .iter()
                        .map(|field| Parameter {
                            name: field.name.clone(),
                            ty: field.ty.clone(),
                            description: field.description.clone(),
                        })
                        .collect(),
                    _ => {
                        return Err(ToolgenError::parse(format!(
                            "input type `{input_name}` of method `{}` is not a message in the set",
                            method.full_name()
                        )));
                    }
                };
                operations.push(Operation {
                    name: method.name().to_string(),
                    description: method_leading_comment(file_proto, service_index, method_index),
                    parameters,
                    return_type: Some(method.output().full_name().to_string()),
                });
            }
        }
    }

    debug!(
        types = registry.len(),
        operations = operations.len(),
        "loaded gRPC descriptor set"
    );
    Ok(LoadedSchema {
        registry,
        operations,
    })
}

/// Register a message and its nested declarations. Synthetic map-entry
/// messages are folded into `Map` types instead.
fn register_message(
    message: &MessageDescriptor,
    registry: &mut TypeRegistry,
    findings: &mut Vec<UnsupportedConstruct>,
) {
    if message.is_map_entry() {
        return;
    }
    let object = message_to_object(message, findings);
    registry.insert(message.full_name().to_string(), object);
    for child in message.child_messages() {
        register_message(&child, registry, findings);
    }
    for child in message.child_enums() {
        register_enum(&child, registry);
    }
}

fn register_enum(enum_type: &EnumDescriptor, registry: &mut TypeRegistry) {
    let values = enum_type
        .values()
        .map(|value| value.name().to_string())
        .collect();
    registry.insert(
        enum_type.full_name().to_string(),
        IntermediateType::Enum { values },
    );
}

fn message_to_object(
    message: &MessageDescriptor,
    findings: &mut Vec<UnsupportedConstruct>,
) -> IntermediateType {
    let fields = declared_fields(message)
        .iter()
        .map(|field| FieldDef {
            // json_name is the camelCase form protobuf JSON serialization uses
            name: field.json_name().to_string(),
            ty: field_type(field, message, findings),
            description: None,
        })
        .collect();
    IntermediateType::Object { fields }
}

/// Fields in declaration order. `MessageDescriptor::fields` iterates in
/// field-number order, which differs when numbers were assigned out of
/// sequence, so the raw descriptor proto is the source of truth.
fn declared_fields(message: &MessageDescriptor) -> Vec<FieldDescriptor> {
    message
        .descriptor_proto()
        .field
        .iter()
        .filter_map(|proto| message.get_field_by_name(proto.name()))
        .collect()
}

fn field_type(
    field: &FieldDescriptor,
    message: &MessageDescriptor,
    findings: &mut Vec<UnsupportedConstruct>,
) -> IntermediateType {
    if is_group(field) {
        findings.push(UnsupportedConstruct {
            construct: "group field".to_string(),
            type_name: field.full_name().to_string(),
            context: format!("message `{}`", message.full_name()),
            line: None,
        });
        return placeholder();
    }

    if field.is_map() {
        let value_type = match field.kind() {
            Kind::Message(entry) => {
                let key = entry.map_entry_key_field();
                if !matches!(key.kind(), Kind::String) {
                    findings.push(UnsupportedConstruct {
                        construct: "map with non-string key".to_string(),
                        type_name: kind_label(&key.kind()),
                        context: format!(
                            "field `{}` of message `{}`",
                            field.name(),
                            message.full_name()
                        ),
                        line: None,
                    });
                    return placeholder();
                }
                base_type(&entry.map_entry_value_field().kind())
            }
            _ => base_type(&field.kind()),
        };
        // proto3 maps have no presence, so they are never required
        return IntermediateType::Optional(Box::new(IntermediateType::Map(Box::new(value_type))));
    }

    let base = base_type(&field.kind());
    match field.cardinality() {
        Cardinality::Required => base,
        Cardinality::Repeated => {
            IntermediateType::Optional(Box::new(IntermediateType::List(Box::new(base))))
        }
        Cardinality::Optional => IntermediateType::Optional(Box::new(base)),
    }
}

fn base_type(kind: &Kind) -> IntermediateType {
    match kind {
        Kind::Double | Kind::Float => IntermediateType::Scalar(PrimitiveKind::Float),
        Kind::Int32
        | Kind::Int64
        | Kind::Uint32
        | Kind::Uint64
        | Kind::Sint32
        | Kind::Sint64
        | Kind::Fixed32
        | Kind::Fixed64
        | Kind::Sfixed32
        | Kind::Sfixed64 => IntermediateType::Scalar(PrimitiveKind::Int),
        Kind::Bool => IntermediateType::Scalar(PrimitiveKind::Bool),
        Kind::String => IntermediateType::Scalar(PrimitiveKind::String),
        Kind::Bytes => IntermediateType::Scalar(PrimitiveKind::Bytes),
        Kind::Message(message) => IntermediateType::Reference(message.full_name().to_string()),
        Kind::Enum(enum_type) => IntermediateType::Reference(enum_type.full_name().to_string()),
    }
}

/// Stand-in type for fields already reported as unsupported; the conversion
/// fails before it could be emitted.
fn placeholder() -> IntermediateType {
    IntermediateType::Optional(Box::new(IntermediateType::Scalar(PrimitiveKind::String)))
}

fn is_group(field: &FieldDescriptor) -> bool {
    field.field_descriptor_proto().r#type() == ProtoFieldType::Group
}

fn kind_label(kind: &Kind) -> String {
    match kind {
        Kind::Message(message) => message.full_name().to_string(),
        Kind::Enum(enum_type) => enum_type.full_name().to_string(),
        other => format!("{other:?}").to_lowercase(),
    }
}

/// Leading comment of the method at `[6, service_index, 2, method_index]` in
/// the file's source info, when the set was built with
/// `--include_source_info`.
fn method_leading_comment(
    file: &FileDescriptorProto,
    service_index: usize,
    method_index: usize,
) -> Option<String> {
    let info = file.source_code_info.as_ref()?;
    let path = [6, service_index as i32, 2, method_index as i32];
    info.location
        .iter()
        .find(|location| location.path == path)
        .and_then(|location| location.leading_comments.as_deref())
        .map(str::trim)
        .filter(|comment| !comment.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_kinds_collapse_to_one_scalar() {
        for kind in [
            Kind::Int32,
            Kind::Int64,
            Kind::Uint32,
            Kind::Uint64,
            Kind::Sint32,
            Kind::Sint64,
            Kind::Fixed32,
            Kind::Fixed64,
            Kind::Sfixed32,
            Kind::Sfixed64,
        ] {
            assert_eq!(
                base_type(&kind),
                IntermediateType::Scalar(PrimitiveKind::Int)
            );
        }
    }

    #[test]
    fn test_floating_and_byte_kinds() {
        assert_eq!(
            base_type(&Kind::Double),
            IntermediateType::Scalar(PrimitiveKind::Float)
        );
        assert_eq!(
            base_type(&Kind::Bytes),
            IntermediateType::Scalar(PrimitiveKind::Bytes)
        );
        assert_eq!(kind_label(&Kind::Sint64), "sint64");
    }
}
