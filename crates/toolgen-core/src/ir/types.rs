//! Core types of the intermediate representation

use serde::{Deserialize, Serialize};

/// Primitive scalar kinds understood by the mapper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrimitiveKind {
    String,
    Int,
    Float,
    Bool,
    Bytes,
}

/// A schema type, reduced to what tool-call parameter schemas can express.
///
/// Named types are connected through [`Reference`](IntermediateType::Reference)
/// and resolved against the [`TypeRegistry`](crate::ir::TypeRegistry) rather
/// than linked directly, so recursion stays an explicit path check in the
/// mapper instead of an ownership puzzle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IntermediateType {
    /// A primitive scalar
    Scalar(PrimitiveKind),
    /// A closed value set, values in declaration order
    Enum { values: Vec<String> },
    /// Named fields in declaration order
    Object { fields: Vec<FieldDef> },
    /// Homogeneous sequence
    List(Box<IntermediateType>),
    /// A value that may be absent. Drives the parent's `required` list and is
    /// never emitted as a wrapper itself.
    Optional(Box<IntermediateType>),
    /// String-keyed map with homogeneous values (protobuf `map<string, V>`)
    Map(Box<IntermediateType>),
    /// Name to resolve through the registry
    Reference(String),
}

impl IntermediateType {
    /// Whether a field of this type belongs in its parent's `required` list.
    pub fn is_required(&self) -> bool {
        !matches!(self, IntermediateType::Optional(_))
    }
}

/// A named field of an [`IntermediateType::Object`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    pub name: String,
    pub ty: IntermediateType,
    /// Schema-level documentation, forwarded into the mapped fragment
    pub description: Option<String>,
}

impl FieldDef {
    /// Create a field without documentation
    pub fn new(name: impl Into<String>, ty: IntermediateType) -> Self {
        Self {
            name: name.into(),
            ty,
            description: None,
        }
    }

    /// Attach schema-level documentation
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Required iff the field type is not `Optional`.
    pub fn is_required(&self) -> bool {
        self.ty.is_required()
    }
}

/// One parameter of an [`Operation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub name: String,
    pub ty: IntermediateType,
    /// Schema-level documentation, forwarded into the mapped fragment
    pub description: Option<String>,
}

impl Parameter {
    /// Required iff the parameter type is not `Optional`.
    pub fn is_required(&self) -> bool {
        self.ty.is_required()
    }
}

/// A callable schema operation: a GraphQL root field or a gRPC method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Operation {
    /// Name as declared in the schema, before sanitization
    pub name: String,
    /// Schema-level documentation, if any
    pub description: Option<String>,
    /// Parameters in declaration order
    pub parameters: Vec<Parameter>,
    /// Named return type when the input carries one. Validated to resolve at
    /// load time, never part of the emitted spec.
    pub return_type: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_is_derived_from_the_optional_wrapper() {
        let required = FieldDef::new("term", IntermediateType::Scalar(PrimitiveKind::String));
        let optional = FieldDef::new(
            "limit",
            IntermediateType::Optional(Box::new(IntermediateType::Scalar(PrimitiveKind::Int))),
        );
        assert!(required.is_required());
        assert!(!optional.is_required());
    }

    #[test]
    fn test_nested_optional_only_counts_at_the_top() {
        // A required list of optional items is still a required field.
        let ty = IntermediateType::List(Box::new(IntermediateType::Optional(Box::new(
            IntermediateType::Scalar(PrimitiveKind::String),
        ))));
        assert!(ty.is_required());
    }
}
