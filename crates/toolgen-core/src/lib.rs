//! Toolgen core library
//!
//! Converts GraphQL and gRPC schema definitions into LLM tool-call specs in
//! the OpenAI function-calling or Claude tool-use shape. A conversion is one
//! sequential pass over the input (load, extract, emit) with no state shared
//! between calls; equal inputs produce byte-identical output documents.
//!
//! ```no_run
//! use toolgen_core::{convert, ConvertOptions, SchemaInput};
//!
//! let sdl = "type Query { search(term: String!): String }";
//! let input = SchemaInput::GraphqlSdl(sdl.to_string());
//! let conversion = convert(&input, &ConvertOptions::default())?;
//! println!("{}", conversion.to_json_pretty()?);
//! # Ok::<(), toolgen_core::ToolgenError>(())
//! ```

pub mod convert;
pub mod dialect;
pub mod emitter;
pub mod error;
pub mod extractor;
pub mod ir;
pub mod loader;
pub mod mapper;
pub mod toolspec;
pub mod warning;

pub use convert::{convert, Conversion, ConvertOptions};
pub use dialect::Dialect;
pub use error::{ToolgenError, ToolgenResult, UnsupportedConstruct};
pub use ir::{FieldDef, IntermediateType, Operation, Parameter, PrimitiveKind, TypeRegistry};
pub use loader::{
    FetchOptions, LoadOptions, LoadedSchema, SchemaInput, SchemaLocation, SourceKind,
    DEFAULT_FETCH_TIMEOUT_SECS,
};
pub use toolspec::ToolSpec;
pub use warning::Warning;
