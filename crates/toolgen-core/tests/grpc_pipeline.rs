//! End-to-end conversions from gRPC descriptor sets to tool-spec documents
//!
//! Descriptor sets are assembled in-process with prost-types, mirroring what
//! `protoc --descriptor_set_out` produces.

use prost::Message;
use prost_types::field_descriptor_proto::{Label, Type};
use prost_types::source_code_info::Location;
use prost_types::{
    DescriptorProto, EnumDescriptorProto, EnumValueDescriptorProto, FieldDescriptorProto,
    FileDescriptorProto, FileDescriptorSet, MessageOptions, MethodDescriptorProto,
    OneofDescriptorProto, ServiceDescriptorProto, SourceCodeInfo,
};
use serde_json::json;
use toolgen_core::{convert, ConvertOptions, Conversion, Dialect, SchemaInput, ToolgenError};

fn scalar_field(name: &str, number: i32, ty: Type) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(ty as i32),
        json_name: Some(name.to_string()),
        ..Default::default()
    }
}

fn message_field(name: &str, number: i32, type_name: &str) -> FieldDescriptorProto {
    FieldDescriptorProto {
        name: Some(name.to_string()),
        number: Some(number),
        label: Some(Label::Optional as i32),
        r#type: Some(Type::Message as i32),
        type_name: Some(type_name.to_string()),
        json_name: Some(name.to_string()),
        ..Default::default()
    }
}

fn message(name: &str, fields: Vec<FieldDescriptorProto>) -> DescriptorProto {
    DescriptorProto {
        name: Some(name.to_string()),
        field: fields,
        ..Default::default()
    }
}

fn unary_method(name: &str, input: &str, output: &str) -> MethodDescriptorProto {
    MethodDescriptorProto {
        name: Some(name.to_string()),
        input_type: Some(input.to_string()),
        output_type: Some(output.to_string()),
        ..Default::default()
    }
}

fn service(name: &str, methods: Vec<MethodDescriptorProto>) -> ServiceDescriptorProto {
    ServiceDescriptorProto {
        name: Some(name.to_string()),
        method: methods,
        ..Default::default()
    }
}

fn proto3_file(
    name: &str,
    messages: Vec<DescriptorProto>,
    services: Vec<ServiceDescriptorProto>,
) -> FileDescriptorProto {
    FileDescriptorProto {
        name: Some(name.to_string()),
        package: Some("test.v1".to_string()),
        syntax: Some("proto3".to_string()),
        message_type: messages,
        service: services,
        ..Default::default()
    }
}

fn descriptor_bytes(files: Vec<FileDescriptorProto>) -> Vec<u8> {
    FileDescriptorSet { file: files }.encode_to_vec()
}

fn convert_set(bytes: Vec<u8>, options: &ConvertOptions) -> Conversion {
    convert(&SchemaInput::GrpcDescriptorSet(bytes), options).unwrap()
}

fn echo_set() -> Vec<u8> {
    descriptor_bytes(vec![proto3_file(
        "echo.proto",
        vec![
            message("EchoRequest", vec![scalar_field("message", 1, Type::String)]),
            message("EchoResponse", vec![scalar_field("echo", 1, Type::String)]),
        ],
        vec![service(
            "EchoService",
            vec![unary_method(
                "EchoMessage",
                ".test.v1.EchoRequest",
                ".test.v1.EchoResponse",
            )],
        )],
    )])
}

#[test]
fn test_method_names_are_snake_cased() {
    let conversion = convert_set(echo_set(), &ConvertOptions::default());
    assert_eq!(conversion.tools.len(), 1);
    assert_eq!(conversion.tools[0]["function"]["name"], "echo_message");
}

#[test]
fn test_missing_comments_fall_back_to_a_deterministic_stub() {
    let conversion = convert_set(echo_set(), &ConvertOptions::default());
    assert_eq!(
        conversion.tools[0]["function"]["description"],
        "Executes EchoMessage with arguments: message"
    );
}

#[test]
fn test_proto3_singular_fields_are_not_required() {
    let conversion = convert_set(echo_set(), &ConvertOptions::default());
    let parameters = &conversion.tools[0]["function"]["parameters"];
    assert_eq!(
        parameters,
        &json!({
            "type": "object",
            "properties": {
                "message": { "type": "string" },
            },
        })
    );
}

#[test]
fn test_proto2_required_fields_are_required() {
    let mut field = scalar_field("id", 1, Type::String);
    field.label = Some(Label::Required as i32);
    let mut file = proto3_file(
        "legacy.proto",
        vec![
            message("GetRequest", vec![field]),
            message("GetResponse", vec![]),
        ],
        vec![service(
            "LegacyService",
            vec![unary_method(
                "Get",
                ".test.v1.GetRequest",
                ".test.v1.GetResponse",
            )],
        )],
    );
    file.syntax = Some("proto2".to_string());
    let conversion = convert_set(descriptor_bytes(vec![file]), &ConvertOptions::default());
    let parameters = &conversion.tools[0]["function"]["parameters"];
    assert_eq!(parameters["required"], json!(["id"]));
}

#[test]
fn test_scalar_kinds_map_to_json_schema_types() {
    let set = descriptor_bytes(vec![proto3_file(
        "scalars.proto",
        vec![
            message(
                "ScalarRequest",
                vec![
                    scalar_field("count", 1, Type::Int64),
                    scalar_field("ratio", 2, Type::Double),
                    scalar_field("enabled", 3, Type::Bool),
                    scalar_field("payload", 4, Type::Bytes),
                    scalar_field("checksum", 5, Type::Fixed32),
                ],
            ),
            message("ScalarResponse", vec![]),
        ],
        vec![service(
            "ScalarService",
            vec![unary_method(
                "Send",
                ".test.v1.ScalarRequest",
                ".test.v1.ScalarResponse",
            )],
        )],
    )]);
    let conversion = convert_set(set, &ConvertOptions::default());
    let properties = &conversion.tools[0]["function"]["parameters"]["properties"];
    assert_eq!(properties["count"], json!({ "type": "integer" }));
    assert_eq!(properties["ratio"], json!({ "type": "number" }));
    assert_eq!(properties["enabled"], json!({ "type": "boolean" }));
    assert_eq!(
        properties["payload"],
        json!({ "type": "string", "format": "byte" })
    );
    assert_eq!(properties["checksum"], json!({ "type": "integer" }));
}

#[test]
fn test_repeated_fields_become_arrays() {
    let mut tags = scalar_field("tags", 1, Type::String);
    tags.label = Some(Label::Repeated as i32);
    let set = descriptor_bytes(vec![proto3_file(
        "tags.proto",
        vec![
            message("TagRequest", vec![tags]),
            message("TagResponse", vec![]),
        ],
        vec![service(
            "TagService",
            vec![unary_method(
                "Tag",
                ".test.v1.TagRequest",
                ".test.v1.TagResponse",
            )],
        )],
    )]);
    let conversion = convert_set(set, &ConvertOptions::default());
    let parameters = &conversion.tools[0]["function"]["parameters"];
    assert_eq!(
        parameters["properties"]["tags"],
        json!({ "type": "array", "items": { "type": "string" } })
    );
    assert!(parameters.get("required").is_none());
}

#[test]
fn test_enum_fields_inline_their_values_in_declaration_order() {
    let status_enum = EnumDescriptorProto {
        name: Some("Status".to_string()),
        value: vec![
            EnumValueDescriptorProto {
                name: Some("ACTIVE".to_string()),
                number: Some(0),
                ..Default::default()
            },
            EnumValueDescriptorProto {
                name: Some("SUSPENDED".to_string()),
                number: Some(1),
                ..Default::default()
            },
        ],
        ..Default::default()
    };
    let mut status_field = scalar_field("status", 1, Type::Enum);
    status_field.type_name = Some(".test.v1.Status".to_string());
    let mut file = proto3_file(
        "status.proto",
        vec![
            message("StatusRequest", vec![status_field]),
            message("StatusResponse", vec![]),
        ],
        vec![service(
            "StatusService",
            vec![unary_method(
                "SetStatus",
                ".test.v1.StatusRequest",
                ".test.v1.StatusResponse",
            )],
        )],
    );
    file.enum_type = vec![status_enum];
    let conversion = convert_set(descriptor_bytes(vec![file]), &ConvertOptions::default());
    assert_eq!(
        conversion.tools[0]["function"]["parameters"]["properties"]["status"],
        json!({ "type": "string", "enum": ["ACTIVE", "SUSPENDED"] })
    );
}

#[test]
fn test_nested_message_fields_unfold_to_object_schemas() {
    let set = descriptor_bytes(vec![proto3_file(
        "nested.proto",
        vec![
            message("Meta", vec![scalar_field("trace", 1, Type::String)]),
            message(
                "NestedRequest",
                vec![message_field("meta", 1, ".test.v1.Meta")],
            ),
            message("NestedResponse", vec![]),
        ],
        vec![service(
            "NestedService",
            vec![unary_method(
                "Send",
                ".test.v1.NestedRequest",
                ".test.v1.NestedResponse",
            )],
        )],
    )]);
    let conversion = convert_set(set, &ConvertOptions::default());
    assert_eq!(
        conversion.tools[0]["function"]["parameters"]["properties"]["meta"],
        json!({
            "type": "object",
            "properties": {
                "trace": { "type": "string" },
            },
        })
    );
}

fn map_request(key_type: Type) -> DescriptorProto {
    let mut entry = message(
        "LabelsEntry",
        vec![
            scalar_field("key", 1, key_type),
            scalar_field("value", 2, Type::String),
        ],
    );
    entry.options = Some(MessageOptions {
        map_entry: Some(true),
        ..Default::default()
    });
    let mut labels = message_field("labels", 1, ".test.v1.MapRequest.LabelsEntry");
    labels.label = Some(Label::Repeated as i32);
    let mut request = message("MapRequest", vec![labels]);
    request.nested_type = vec![entry];
    request
}

fn map_set(key_type: Type) -> Vec<u8> {
    descriptor_bytes(vec![proto3_file(
        "maps.proto",
        vec![map_request(key_type), message("MapResponse", vec![])],
        vec![service(
            "MapService",
            vec![unary_method(
                "PutLabels",
                ".test.v1.MapRequest",
                ".test.v1.MapResponse",
            )],
        )],
    )])
}

#[test]
fn test_string_keyed_maps_become_additional_properties() {
    let conversion = convert_set(map_set(Type::String), &ConvertOptions::default());
    let parameters = &conversion.tools[0]["function"]["parameters"];
    assert_eq!(
        parameters["properties"]["labels"],
        json!({
            "type": "object",
            "additionalProperties": { "type": "string" },
        })
    );
    assert!(parameters.get("required").is_none());
}

#[test]
fn test_non_string_map_keys_are_unsupported() {
    let input = SchemaInput::GrpcDescriptorSet(map_set(Type::Int32));
    let error = convert(&input, &ConvertOptions::default()).unwrap_err();
    match error {
        ToolgenError::UnsupportedConstructs(findings) => {
            assert_eq!(findings.len(), 1);
            assert_eq!(findings[0].construct, "map with non-string key");
            assert_eq!(findings[0].type_name, "int32");
            assert!(findings[0].context.contains("labels"));
        }
        other => panic!("expected unsupported constructs, got {other:?}"),
    }
}

#[test]
fn test_oneof_members_are_all_optional() {
    let mut email = scalar_field("email", 1, Type::String);
    email.oneof_index = Some(0);
    let mut phone = scalar_field("phone", 2, Type::String);
    phone.oneof_index = Some(0);
    let mut contact = message("ContactRequest", vec![email, phone]);
    contact.oneof_decl = vec![OneofDescriptorProto {
        name: Some("contact".to_string()),
        ..Default::default()
    }];
    let set = descriptor_bytes(vec![proto3_file(
        "contact.proto",
        vec![contact, message("ContactResponse", vec![])],
        vec![service(
            "ContactService",
            vec![unary_method(
                "SetContact",
                ".test.v1.ContactRequest",
                ".test.v1.ContactResponse",
            )],
        )],
    )]);
    let conversion = convert_set(set, &ConvertOptions::default());
    let parameters = &conversion.tools[0]["function"]["parameters"];
    assert_eq!(parameters["properties"]["email"], json!({ "type": "string" }));
    assert_eq!(parameters["properties"]["phone"], json!({ "type": "string" }));
    assert!(parameters.get("required").is_none());
}

#[test]
fn test_service_filter_limits_extracted_operations() {
    let set = descriptor_bytes(vec![proto3_file(
        "multi.proto",
        vec![
            message("PingRequest", vec![]),
            message("PingResponse", vec![]),
        ],
        vec![
            service(
                "UserService",
                vec![unary_method(
                    "GetUser",
                    ".test.v1.PingRequest",
                    ".test.v1.PingResponse",
                )],
            ),
            service(
                "SearchService",
                vec![unary_method(
                    "Search",
                    ".test.v1.PingRequest",
                    ".test.v1.PingResponse",
                )],
            ),
        ],
    )]);
    let options = ConvertOptions {
        services: Some(vec!["SearchService".to_string()]),
        ..Default::default()
    };
    let conversion = convert_set(set, &options);
    assert_eq!(conversion.tools.len(), 1);
    assert_eq!(conversion.tools[0]["function"]["name"], "search");
}

#[test]
fn test_leading_comments_become_descriptions() {
    let mut file = proto3_file(
        "commented.proto",
        vec![
            message("EchoRequest", vec![scalar_field("message", 1, Type::String)]),
            message("EchoResponse", vec![]),
        ],
        vec![service(
            "EchoService",
            vec![unary_method(
                "EchoMessage",
                ".test.v1.EchoRequest",
                ".test.v1.EchoResponse",
            )],
        )],
    );
    file.source_code_info = Some(SourceCodeInfo {
        location: vec![Location {
            path: vec![6, 0, 2, 0],
            leading_comments: Some(" Echoes the message back.\n".to_string()),
            ..Default::default()
        }],
    });
    let conversion = convert_set(descriptor_bytes(vec![file]), &ConvertOptions::default());
    assert_eq!(
        conversion.tools[0]["function"]["description"],
        "Echoes the message back."
    );
}

#[test]
fn test_json_names_are_used_for_parameters() {
    let mut user_id = scalar_field("user_id", 1, Type::String);
    user_id.json_name = Some("userId".to_string());
    let set = descriptor_bytes(vec![proto3_file(
        "users.proto",
        vec![
            message("UserRequest", vec![user_id]),
            message("UserResponse", vec![]),
        ],
        vec![service(
            "UserService",
            vec![unary_method(
                "GetUser",
                ".test.v1.UserRequest",
                ".test.v1.UserResponse",
            )],
        )],
    )]);
    let conversion = convert_set(set, &ConvertOptions::default());
    let properties = &conversion.tools[0]["function"]["parameters"]["properties"];
    assert!(properties.get("userId").is_some());
    assert!(properties.get("user_id").is_none());
}

#[test]
fn test_cross_file_references_resolve() {
    let user_file = FileDescriptorProto {
        name: Some("user.proto".to_string()),
        package: Some("test.v1".to_string()),
        syntax: Some("proto3".to_string()),
        message_type: vec![message("User", vec![scalar_field("name", 1, Type::String)])],
        ..Default::default()
    };
    let mut api_file = proto3_file(
        "api.proto",
        vec![
            message(
                "SaveRequest",
                vec![message_field("user", 1, ".test.v1.User")],
            ),
            message("SaveResponse", vec![]),
        ],
        vec![service(
            "UserService",
            vec![unary_method(
                "SaveUser",
                ".test.v1.SaveRequest",
                ".test.v1.SaveResponse",
            )],
        )],
    );
    api_file.dependency = vec!["user.proto".to_string()];
    let conversion = convert_set(
        descriptor_bytes(vec![user_file, api_file]),
        &ConvertOptions::default(),
    );
    assert_eq!(
        conversion.tools[0]["function"]["parameters"]["properties"]["user"]["properties"]["name"],
        json!({ "type": "string" })
    );
}

#[test]
fn test_claude_dialect_wraps_grpc_operations_too() {
    let options = ConvertOptions {
        dialect: Dialect::Claude,
        ..Default::default()
    };
    let conversion = convert_set(echo_set(), &options);
    assert_eq!(
        conversion.tools,
        vec![json!({
            "name": "echo_message",
            "description": "Executes EchoMessage with arguments: message",
            "input_schema": {
                "type": "object",
                "properties": {
                    "message": { "type": "string" },
                },
            },
        })]
    );
}

#[test]
fn test_malformed_descriptor_bytes_are_parse_errors() {
    let input = SchemaInput::GrpcDescriptorSet(vec![0xFF, 0x00, 0x12, 0x34]);
    let error = convert(&input, &ConvertOptions::default()).unwrap_err();
    assert!(matches!(error, ToolgenError::SchemaParse(_)));
}
