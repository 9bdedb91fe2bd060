//! Non-fatal findings produced during a conversion
//!
//! Warnings are returned as data so library callers decide how to surface
//! them. The CLI logs each one to standard error and still exits zero.

use std::fmt;

/// A non-fatal finding attached to an otherwise successful conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Warning {
    /// Two operations sanitized to the same tool name; the later one was renamed
    NameCollision {
        /// Operation name as declared in the schema
        operation: String,
        /// Identifier both operations sanitized to
        sanitized: String,
        /// Disambiguated name assigned to this operation
        renamed: String,
    },
    /// A tool description exceeded the dialect limit and was cut
    DescriptionTruncated {
        /// Tool whose description was truncated
        tool: String,
        /// Dialect limit in characters
        limit: usize,
        /// Description length before truncation
        original_len: usize,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::NameCollision {
                operation,
                sanitized,
                renamed,
            } => write!(
                f,
                "operation `{operation}` sanitizes to `{sanitized}`, which is already taken; renamed to `{renamed}`"
            ),
            Warning::DescriptionTruncated {
                tool,
                limit,
                original_len,
            } => write!(
                f,
                "description of `{tool}` truncated from {original_len} to {limit} characters"
            ),
        }
    }
}
