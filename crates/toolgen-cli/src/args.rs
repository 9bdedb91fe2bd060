//! Command-line argument definitions

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use toolgen_core::{Dialect, SourceKind, DEFAULT_FETCH_TIMEOUT_SECS};

/// Generate LLM tool-call specs from GraphQL and gRPC schemas
#[derive(Debug, Parser)]
#[command(name = "toolgen")]
#[command(version)]
#[command(about = "Generate LLM tool-call specs from GraphQL and gRPC schemas")]
pub struct Cli {
    /// Schema to convert: a GraphQL SDL or introspection JSON file, a GraphQL
    /// endpoint URL, or a protobuf descriptor-set file
    #[arg(long, value_name = "PATH_OR_URL")]
    pub schema: String,

    /// Kind of schema being read
    #[arg(long, value_enum, default_value_t = SourceArg::Graphql)]
    pub source: SourceArg,

    /// Target tool-spec dialect
    #[arg(long, value_enum, default_value_t = DialectArg::Openai)]
    pub dialect: DialectArg,

    /// How many times a recursive type reference is unfolded before the
    /// cycle is cut with a placeholder
    #[arg(long, value_name = "N", default_value_t = 1)]
    pub max_depth: usize,

    /// Write the JSON document to this file instead of standard output
    #[arg(long, value_name = "PATH")]
    pub out: Option<PathBuf>,

    /// Extra HTTP header for the introspection fetch, as "Name: Value";
    /// repeatable
    #[arg(long = "header", value_name = "HEADER")]
    pub headers: Vec<String>,

    /// Bearer token for the introspection fetch
    #[arg(long, env = "TOOLGEN_AUTH_TOKEN", hide_env_values = true)]
    pub auth_token: Option<String>,

    /// Seconds to wait for a remote introspection response
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_FETCH_TIMEOUT_SECS)]
    pub timeout: u64,

    /// GraphQL: include only mutation operations
    #[arg(long)]
    pub only_mutations: bool,

    /// gRPC: comma-separated service names to include (all when omitted)
    #[arg(long, value_delimiter = ',', value_name = "NAMES")]
    pub services: Option<Vec<String>>,
}

/// Dialect tag as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DialectArg {
    /// OpenAI function-calling entries
    Openai,
    /// Claude tool-use entries
    Claude,
}

impl From<DialectArg> for Dialect {
    fn from(arg: DialectArg) -> Self {
        match arg {
            DialectArg::Openai => Dialect::OpenAi,
            DialectArg::Claude => Dialect::Claude,
        }
    }
}

/// Source tag as spelled on the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SourceArg {
    /// GraphQL SDL, introspection JSON, or endpoint URL
    Graphql,
    /// Compiled protobuf descriptor set
    Grpc,
}

impl From<SourceArg> for SourceKind {
    fn from(arg: SourceArg) -> Self {
        match arg {
            SourceArg::Graphql => SourceKind::Graphql,
            SourceArg::Grpc => SourceKind::Grpc,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::parse_from(["toolgen", "--schema", "api.graphql"]);
        assert_eq!(cli.source, SourceArg::Graphql);
        assert_eq!(cli.dialect, DialectArg::Openai);
        assert_eq!(cli.max_depth, 1);
        assert_eq!(cli.timeout, 30);
        assert!(!cli.only_mutations);
        assert!(cli.services.is_none());
    }

    #[test]
    fn test_services_split_on_commas() {
        let cli = Cli::parse_from([
            "toolgen",
            "--schema",
            "api.pb",
            "--source",
            "grpc",
            "--services",
            "UserService,SearchService",
        ]);
        assert_eq!(
            cli.services,
            Some(vec![
                "UserService".to_string(),
                "SearchService".to_string()
            ])
        );
    }

    #[test]
    fn test_dialect_and_source_values() {
        let cli = Cli::parse_from([
            "toolgen",
            "--schema",
            "api.graphql",
            "--dialect",
            "claude",
            "--only-mutations",
        ]);
        assert_eq!(cli.dialect, DialectArg::Claude);
        assert!(cli.only_mutations);
    }
}
