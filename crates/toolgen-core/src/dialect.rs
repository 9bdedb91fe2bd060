//! Target tool-spec dialects and their constraints

use crate::error::ToolgenError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Maximum tool name length, shared by both dialects.
const NAME_MAX_LEN: usize = 64;

/// Maximum tool description length in characters.
const DESCRIPTION_MAX_LEN: usize = 1024;

/// A target tool-spec JSON shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    /// OpenAI function-calling entries: `{"type": "function", "function": {...}}`
    OpenAi,
    /// Claude tool-use entries: `{"name", "description", "input_schema"}`
    Claude,
}

impl Dialect {
    /// Dialect tag as written on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Dialect::OpenAi => "openai",
            Dialect::Claude => "claude",
        }
    }

    /// Maximum tool name length for this dialect
    pub fn name_max_len(&self) -> usize {
        match self {
            Dialect::OpenAi | Dialect::Claude => NAME_MAX_LEN,
        }
    }

    /// Maximum tool description length, in characters, for this dialect
    pub fn description_max_len(&self) -> usize {
        match self {
            Dialect::OpenAi | Dialect::Claude => DESCRIPTION_MAX_LEN,
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Dialect {
    type Err = ToolgenError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openai" => Ok(Dialect::OpenAi),
            "claude" => Ok(Dialect::Claude),
            other => Err(ToolgenError::invalid_input(format!(
                "unknown dialect `{other}`, expected `openai` or `claude`"
            ))),
        }
    }
}
