//! Remote introspection fetch
//!
//! One POST of the introspection query with a hard timeout. There is no
//! retry: a failed fetch fails the conversion and the caller decides whether
//! to run again.

use crate::error::{ToolgenError, ToolgenResult};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::debug;

/// Default seconds to wait for the introspection response.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Introspection query sent to remote endpoints. Requests root operation
/// names, descriptions (deprecated members included), and `TypeRef` nesting
/// deep enough for seven levels of list/non-null wrapping.
pub const INTROSPECTION_QUERY: &str = r#"
query IntrospectionQuery {
  __schema {
    queryType { name }
    mutationType { name }
    types {
      kind
      name
      description
      fields(includeDeprecated: true) {
        name
        description
        args {
          name
          description
          type { ...TypeRef }
        }
        type { ...TypeRef }
      }
      inputFields {
        name
        description
        type { ...TypeRef }
      }
      enumValues(includeDeprecated: true) {
        name
      }
    }
  }
}

fragment TypeRef on __Type {
  kind
  name
  ofType {
    kind
    name
    ofType {
      kind
      name
      ofType {
        kind
        name
        ofType {
          kind
          name
          ofType {
            kind
            name
            ofType {
              kind
              name
              ofType {
                kind
                name
              }
            }
          }
        }
      }
    }
  }
}
"#;

/// Options for the introspection fetch.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Hard timeout for the single request
    pub timeout: Duration,
    /// Extra HTTP headers as (name, value) pairs
    pub headers: Vec<(String, String)>,
    /// Token sent as `Authorization: Bearer ...`
    pub bearer_token: Option<String>,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            headers: Vec::new(),
            bearer_token: None,
        }
    }
}

/// POST the introspection query to `url` and return the response body.
///
/// Fails with a fetch error on timeout, connection failure, a non-success
/// status, or a body without introspection data.
pub async fn fetch_introspection(url: &str, options: &FetchOptions) -> ToolgenResult<Value> {
    let client = reqwest::Client::builder()
        .timeout(options.timeout)
        .build()
        .map_err(|e| ToolgenError::fetch(format!("failed to build HTTP client: {e}")))?;

    let mut request = client.post(url).json(&json!({ "query": INTROSPECTION_QUERY }));
    for (name, value) in &options.headers {
        request = request.header(name.as_str(), value.as_str());
    }
    if let Some(token) = &options.bearer_token {
        request = request.bearer_auth(token);
    }

    debug!(url, timeout_secs = options.timeout.as_secs(), "fetching introspection");
    let response = request.send().await.map_err(|e| {
        if e.is_timeout() {
            ToolgenError::fetch(format!(
                "introspection request to {url} timed out after {}s",
                options.timeout.as_secs()
            ))
        } else {
            ToolgenError::fetch(format!("introspection request to {url} failed: {e}"))
        }
    })?;

    let status = response.status();
    if !status.is_success() {
        return Err(ToolgenError::fetch(format!(
            "introspection request to {url} returned {status}"
        )));
    }

    let body: Value = response.json().await.map_err(|e| {
        ToolgenError::fetch(format!("invalid introspection response from {url}: {e}"))
    })?;

    if body.get("data").is_none_or(Value::is_null) {
        return Err(ToolgenError::fetch(format!(
            "introspection response from {url} carries no data"
        )));
    }
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_options_use_the_documented_timeout() {
        let options = FetchOptions::default();
        assert_eq!(options.timeout, Duration::from_secs(30));
        assert!(options.headers.is_empty());
        assert!(options.bearer_token.is_none());
    }

    #[test]
    fn test_introspection_query_covers_both_roots() {
        assert!(INTROSPECTION_QUERY.contains("queryType"));
        assert!(INTROSPECTION_QUERY.contains("mutationType"));
        assert!(INTROSPECTION_QUERY.contains("inputFields"));
    }
}
