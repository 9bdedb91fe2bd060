//! Intermediate schema representation
//!
//! The dialect-agnostic model every loader produces and every downstream
//! stage consumes.

pub mod registry;
pub mod types;

pub use registry::{NonInputEntry, NonInputKind, TypeRegistry};
pub use types::{FieldDef, IntermediateType, Operation, Parameter, PrimitiveKind};
