//! One-call conversion facade

use crate::dialect::Dialect;
use crate::emitter::SpecEmitter;
use crate::error::ToolgenResult;
use crate::extractor::OperationExtractor;
use crate::loader::{self, LoadOptions, SchemaInput};
use crate::mapper::DEFAULT_MAX_DEPTH;
use crate::warning::Warning;
use serde_json::Value;
use tracing::debug;

/// Options for one conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Target tool-spec dialect
    pub dialect: Dialect,
    /// How many times a recursive type reference is unfolded
    pub max_depth: usize,
    /// GraphQL: extract only mutation operations
    pub only_mutations: bool,
    /// gRPC: restrict to these service names
    pub services: Option<Vec<String>>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            dialect: Dialect::OpenAi,
            max_depth: DEFAULT_MAX_DEPTH,
            only_mutations: false,
            services: None,
        }
    }
}

/// Outcome of one conversion: dialect-shaped entries plus non-fatal warnings.
#[derive(Debug, Clone)]
pub struct Conversion {
    /// One entry per operation, in declaration order
    pub tools: Vec<Value>,
    /// Collision and truncation findings
    pub warnings: Vec<Warning>,
}

impl Conversion {
    /// Serialize the output document: a pretty-printed JSON array with a
    /// trailing newline. Key order is insertion order throughout, so equal
    /// inputs produce byte-identical documents.
    pub fn to_json_pretty(&self) -> ToolgenResult<String> {
        let mut document = serde_json::to_string_pretty(&self.tools)?;
        document.push('\n');
        Ok(document)
    }
}

/// Run one conversion: load and validate the schema, extract tool specs,
/// emit dialect entries. Stateless; nothing is shared between calls.
pub fn convert(input: &SchemaInput, options: &ConvertOptions) -> ToolgenResult<Conversion> {
    let loaded = loader::load(
        input,
        &LoadOptions {
            only_mutations: options.only_mutations,
            services: options.services.clone(),
        },
    )?;

    let extractor = OperationExtractor::new(&loaded.registry, options.dialect, options.max_depth);
    let (specs, mut warnings) = extractor.extract(&loaded.operations)?;

    let emitter = SpecEmitter::new(options.dialect);
    let (tools, emit_warnings) = emitter.emit(&specs)?;
    warnings.extend(emit_warnings);

    debug!(
        tools = tools.len(),
        warnings = warnings.len(),
        dialect = %options.dialect,
        "conversion complete"
    );
    Ok(Conversion { tools, warnings })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_schema_yields_an_empty_array() {
        let input = SchemaInput::GraphqlSdl("type Query { ping: String }".to_string());
        let options = ConvertOptions {
            only_mutations: true,
            ..Default::default()
        };
        let conversion = convert(&input, &options).unwrap();
        assert!(conversion.tools.is_empty());
        assert_eq!(conversion.to_json_pretty().unwrap(), "[]\n");
    }

    #[test]
    fn test_document_ends_with_exactly_one_newline() {
        let input = SchemaInput::GraphqlSdl("type Query { ping: String }".to_string());
        let conversion = convert(&input, &ConvertOptions::default()).unwrap();
        let document = conversion.to_json_pretty().unwrap();
        assert!(document.ends_with('\n'));
        assert!(!document.ends_with("\n\n"));
    }
}
