//! Operation extractor: schema operations to tool specs

use crate::dialect::Dialect;
use crate::error::{ToolgenError, ToolgenResult};
use crate::ir::{FieldDef, IntermediateType, Operation, TypeRegistry};
use crate::mapper::TypeMapper;
use crate::toolspec::ToolSpec;
use crate::warning::Warning;
use std::collections::HashSet;
use tracing::debug;

/// Builds one [`ToolSpec`] per [`Operation`], preserving input order.
pub struct OperationExtractor<'a> {
    registry: &'a TypeRegistry,
    dialect: Dialect,
    max_depth: usize,
}

impl<'a> OperationExtractor<'a> {
    /// Create an extractor for one dialect over a loaded registry
    pub fn new(registry: &'a TypeRegistry, dialect: Dialect, max_depth: usize) -> Self {
        Self {
            registry,
            dialect,
            max_depth,
        }
    }

    /// Extract tool specs for `operations`, in order, returning name-collision
    /// warnings alongside.
    pub fn extract(&self, operations: &[Operation]) -> ToolgenResult<(Vec<ToolSpec>, Vec<Warning>)> {
        let mapper = TypeMapper::new(self.registry, self.max_depth);
        let max_len = self.dialect.name_max_len();
        let mut used: HashSet<String> = HashSet::new();
        let mut specs = Vec::with_capacity(operations.len());
        let mut warnings = Vec::new();

        for operation in operations {
            let sanitized = sanitize_name(&operation.name, max_len);
            let name = if used.contains(&sanitized) {
                let renamed = disambiguate(&sanitized, &used, max_len)?;
                warnings.push(Warning::NameCollision {
                    operation: operation.name.clone(),
                    sanitized,
                    renamed: renamed.clone(),
                });
                renamed
            } else {
                sanitized
            };
            used.insert(name.clone());

            // Parameters map as one synthetic object whose fields are the
            // operation's parameters in declared order.
            let fields: Vec<FieldDef> = operation
                .parameters
                .iter()
                .map(|parameter| FieldDef {
                    name: parameter.name.clone(),
                    ty: parameter.ty.clone(),
                    description: parameter.description.clone(),
                })
                .collect();
            let parameters = mapper
                .map_type(&IntermediateType::Object { fields })
                .map_err(|source| ToolgenError::extraction(&operation.name, source))?;

            let description = operation
                .description
                .as_deref()
                .map(str::trim)
                .filter(|text| !text.is_empty())
                .map(str::to_string)
                .unwrap_or_else(|| fallback_description(operation));

            debug!(operation = %operation.name, tool = %name, "extracted tool spec");
            specs.push(ToolSpec::new(name, description, parameters));
        }

        Ok((specs, warnings))
    }
}

/// Sanitize an operation name into a dialect-safe identifier: an underscore
/// at every camel-case boundary, lowercased, every other character replaced
/// with `_`, runs collapsed, edges trimmed, cut to `max_len`.
///
/// The rule is intentionally aggressive so that spellings like `GetData`,
/// `Get-Data` and `get_data` all land on the same identifier and collide
/// visibly instead of silently diverging per dialect.
pub fn sanitize_name(raw: &str, max_len: usize) -> String {
    let mut rewritten = String::with_capacity(raw.len() + 4);
    for (index, c) in raw.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if index > 0 {
                rewritten.push('_');
            }
            rewritten.push(c.to_ascii_lowercase());
        } else if c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' {
            rewritten.push(c);
        } else {
            rewritten.push('_');
        }
    }

    let mut collapsed = String::with_capacity(rewritten.len());
    let mut previous_was_underscore = false;
    for c in rewritten.chars() {
        if c == '_' {
            if !previous_was_underscore {
                collapsed.push('_');
            }
            previous_was_underscore = true;
        } else {
            collapsed.push(c);
            previous_was_underscore = false;
        }
    }

    let trimmed = collapsed.trim_matches('_');
    let name = if trimmed.is_empty() { "operation" } else { trimmed };
    name.chars().take(max_len).collect()
}

/// Find the lowest numeric suffix that frees `base` from `used`, truncating
/// the base so the suffixed name still fits `max_len`.
fn disambiguate(base: &str, used: &HashSet<String>, max_len: usize) -> ToolgenResult<String> {
    let mut counter = 2usize;
    loop {
        let suffix = format!("_{counter}");
        if suffix.len() >= max_len {
            return Err(ToolgenError::emit(format!(
                "cannot disambiguate tool name `{base}` within {max_len} characters"
            )));
        }
        let budget = max_len - suffix.len();
        let head: String = base.chars().take(budget).collect();
        let candidate = format!("{head}{suffix}");
        if !used.contains(&candidate) {
            return Ok(candidate);
        }
        counter += 1;
    }
}

/// Deterministic description used when the schema carries none.
fn fallback_description(operation: &Operation) -> String {
    if operation.parameters.is_empty() {
        format!("Executes {}", operation.name)
    } else {
        let names: Vec<&str> = operation
            .parameters
            .iter()
            .map(|parameter| parameter.name.as_str())
            .collect();
        format!(
            "Executes {} with arguments: {}",
            operation.name,
            names.join(", ")
        )
    }
}
