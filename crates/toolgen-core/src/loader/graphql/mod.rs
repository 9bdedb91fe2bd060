//! GraphQL loading: SDL text, introspection JSON, and the remote fetch

pub mod fetch;
pub mod introspection;
pub mod sdl;

use crate::ir::PrimitiveKind;
use tracing::debug;

pub(crate) const DEFAULT_QUERY_ROOT: &str = "Query";
pub(crate) const DEFAULT_MUTATION_ROOT: &str = "Mutation";

/// Map a GraphQL scalar name to a primitive kind. `ID` is a string on the
/// wire; custom scalars serialize as strings and degrade accordingly.
pub(crate) fn scalar_kind(name: &str) -> PrimitiveKind {
    match name {
        "Int" => PrimitiveKind::Int,
        "Float" => PrimitiveKind::Float,
        "Boolean" => PrimitiveKind::Bool,
        "String" | "ID" => PrimitiveKind::String,
        custom => {
            debug!(scalar = custom, "custom scalar degrades to string");
            PrimitiveKind::String
        }
    }
}
