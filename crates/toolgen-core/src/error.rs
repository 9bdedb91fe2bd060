//! Error types for toolgen

use thiserror::Error;

/// Result type alias for toolgen operations
pub type ToolgenResult<T> = Result<T, ToolgenError>;

/// One use of a schema construct that has no tool-spec analog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedConstruct {
    /// What kind of construct was hit, e.g. "interface" or "map with non-string key"
    pub construct: String,
    /// Name of the offending type
    pub type_name: String,
    /// Where it was used, e.g. "parameter `filter` of operation `search`"
    pub context: String,
    /// Source line of the declaration, when the input format carries positions
    pub line: Option<usize>,
}

impl std::fmt::Display for UnsupportedConstruct {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} `{}` ({})", self.construct, self.type_name, self.context)?;
        if let Some(line) = self.line {
            write!(f, " declared at line {line}")?;
        }
        Ok(())
    }
}

/// Main error type for toolgen
#[derive(Error, Debug, Clone)]
pub enum ToolgenError {
    /// Network or filesystem failure while obtaining a schema
    #[error("Schema fetch error: {0}")]
    SchemaFetch(String),

    /// Malformed schema input
    #[error("Schema parse error: {0}")]
    SchemaParse(String),

    /// Schema constructs with no tool-spec analog, collected across the whole input
    #[error("Unsupported schema constructs:{}", format_constructs(.0))]
    UnsupportedConstructs(Vec<UnsupportedConstruct>),

    /// A parameter whose type could not be mapped
    #[error("Operation extraction error in `{operation}`: {source}")]
    OperationExtraction {
        operation: String,
        #[source]
        source: Box<ToolgenError>,
    },

    /// Dialect constraint violated during emission
    #[error("Spec emit error: {0}")]
    SpecEmit(String),

    /// Invalid input errors
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(String),

    /// Generic error with context
    #[error("Error: {0}")]
    Other(String),
}

fn format_constructs(constructs: &[UnsupportedConstruct]) -> String {
    constructs.iter().map(|c| format!("\n  - {c}")).collect()
}

impl ToolgenError {
    /// Create a new schema fetch error
    pub fn fetch(message: impl Into<String>) -> Self {
        Self::SchemaFetch(message.into())
    }

    /// Create a new schema parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::SchemaParse(message.into())
    }

    /// Create a schema parse error pinned to a source position
    pub fn parse_at(message: impl Into<String>, line: usize, column: usize) -> Self {
        Self::SchemaParse(format!("{} at line {line} column {column}", message.into()))
    }

    /// Create a new spec emit error
    pub fn emit(message: impl Into<String>) -> Self {
        Self::SpecEmit(message.into())
    }

    /// Create a new invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }

    /// Wrap a mapping failure with the operation it occurred in
    pub fn extraction(operation: impl Into<String>, source: ToolgenError) -> Self {
        Self::OperationExtraction {
            operation: operation.into(),
            source: Box::new(source),
        }
    }
}

impl From<std::io::Error> for ToolgenError {
    fn from(error: std::io::Error) -> Self {
        Self::Io(error.to_string())
    }
}

impl From<serde_json::Error> for ToolgenError {
    fn from(error: serde_json::Error) -> Self {
        Self::Json(error.to_string())
    }
}

impl From<reqwest::Error> for ToolgenError {
    fn from(error: reqwest::Error) -> Self {
        Self::SchemaFetch(error.to_string())
    }
}

impl From<anyhow::Error> for ToolgenError {
    fn from(error: anyhow::Error) -> Self {
        Self::Other(error.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_constructs_display_lists_every_occurrence() {
        let error = ToolgenError::UnsupportedConstructs(vec![
            UnsupportedConstruct {
                construct: "interface".to_string(),
                type_name: "Node".to_string(),
                context: "parameter `filter` of operation `search`".to_string(),
                line: Some(3),
            },
            UnsupportedConstruct {
                construct: "union".to_string(),
                type_name: "Entity".to_string(),
                context: "parameter `target` of operation `resolve`".to_string(),
                line: None,
            },
        ]);
        let message = error.to_string();
        assert!(message.contains("interface `Node`"));
        assert!(message.contains("declared at line 3"));
        assert!(message.contains("union `Entity`"));
    }

    #[test]
    fn test_extraction_error_names_the_operation() {
        let error = ToolgenError::extraction("search", ToolgenError::parse("unresolved type"));
        assert!(error.to_string().contains("`search`"));
        assert!(error.to_string().contains("unresolved type"));
    }
}
