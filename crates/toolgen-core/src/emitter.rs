//! Spec emitter: tool specs to dialect-shaped JSON entries

use crate::dialect::Dialect;
use crate::error::{ToolgenError, ToolgenResult};
use crate::toolspec::ToolSpec;
use crate::warning::Warning;
use serde_json::{json, Value};

/// Serializes tool specs into one dialect's array-of-entries shape.
pub struct SpecEmitter {
    dialect: Dialect,
}

impl SpecEmitter {
    /// Create an emitter for one dialect
    pub fn new(dialect: Dialect) -> Self {
        Self { dialect }
    }

    /// Emit one JSON entry per spec, in input order, returning truncation
    /// warnings alongside.
    pub fn emit(&self, specs: &[ToolSpec]) -> ToolgenResult<(Vec<Value>, Vec<Warning>)> {
        let mut entries = Vec::with_capacity(specs.len());
        let mut warnings = Vec::new();

        for spec in specs {
            self.check_name(&spec.name)?;
            let description = self.bounded_description(spec, &mut warnings);
            let entry = match self.dialect {
                Dialect::OpenAi => json!({
                    "type": "function",
                    "function": {
                        "name": spec.name,
                        "description": description,
                        "parameters": spec.parameters,
                    }
                }),
                Dialect::Claude => json!({
                    "name": spec.name,
                    "description": description,
                    "input_schema": spec.parameters,
                }),
            };
            entries.push(entry);
        }

        Ok((entries, warnings))
    }

    /// Deterministic truncation: cut at the character limit, no word-boundary
    /// heuristics.
    fn bounded_description(&self, spec: &ToolSpec, warnings: &mut Vec<Warning>) -> String {
        let limit = self.dialect.description_max_len();
        let length = spec.description.chars().count();
        if length <= limit {
            return spec.description.clone();
        }
        warnings.push(Warning::DescriptionTruncated {
            tool: spec.name.clone(),
            limit,
            original_len: length,
        });
        spec.description.chars().take(limit).collect()
    }

    /// Names from the extractor are already sanitized; this re-checks
    /// hand-built `ToolSpec`s against the dialect identifier rules.
    fn check_name(&self, name: &str) -> ToolgenResult<()> {
        let max_len = self.dialect.name_max_len();
        if name.is_empty() || name.chars().count() > max_len {
            return Err(ToolgenError::emit(format!(
                "tool name `{name}` violates the {} length bounds (1..={max_len})",
                self.dialect
            )));
        }
        if !name
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
        {
            return Err(ToolgenError::emit(format!(
                "tool name `{name}` contains characters outside [a-z0-9_]"
            )));
        }
        Ok(())
    }
}
