//! Name-keyed type registry built by the loader

use crate::ir::types::IntermediateType;
use indexmap::IndexMap;

/// Kinds of declared types that are legal in return position but cannot be
/// used as tool parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NonInputKind {
    /// GraphQL interface
    Interface,
    /// GraphQL union
    Union,
    /// GraphQL output object type
    OutputObject,
}

impl NonInputKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NonInputKind::Interface => "interface",
            NonInputKind::Union => "union",
            NonInputKind::OutputObject => "output object",
        }
    }
}

/// Registry entry for a declared non-input type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NonInputEntry {
    pub kind: NonInputKind,
    /// Declaration line, when the input format carries positions
    pub line: Option<usize>,
}

/// Mapping from type name to [`IntermediateType`], owned by one conversion
/// and read-only after loading.
///
/// Insertion order is declaration order, which keeps walks and diagnostics
/// deterministic.
#[derive(Debug, Clone, Default)]
pub struct TypeRegistry {
    types: IndexMap<String, IntermediateType>,
    non_input: IndexMap<String, NonInputEntry>,
}

impl TypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a mappable type. Returns the previous entry when the name was
    /// already taken, which loaders treat as a duplicate definition.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        ty: IntermediateType,
    ) -> Option<IntermediateType> {
        self.types.insert(name.into(), ty)
    }

    /// Record a declared type that only resolves in return position
    pub fn insert_non_input(
        &mut self,
        name: impl Into<String>,
        kind: NonInputKind,
        line: Option<usize>,
    ) -> Option<NonInputEntry> {
        self.non_input.insert(name.into(), NonInputEntry { kind, line })
    }

    /// Look up a mappable type by name
    pub fn resolve(&self, name: &str) -> Option<&IntermediateType> {
        self.types.get(name)
    }

    /// Entry for a declared non-input type, if `name` is one
    pub fn non_input_entry(&self, name: &str) -> Option<&NonInputEntry> {
        self.non_input.get(name)
    }

    /// Whether `name` is declared at all, mappable or not
    pub fn is_declared(&self, name: &str) -> bool {
        self.types.contains_key(name) || self.non_input.contains_key(name)
    }

    /// Iterate mappable types in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &IntermediateType)> {
        self.types.iter().map(|(name, ty)| (name.as_str(), ty))
    }

    /// Number of mappable types
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether no mappable types are registered
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
