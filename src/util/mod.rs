//! Utility functions shared across the application.

mod secret;

pub use secret::SecretString;

use std::fmt::Display;

/// Builder for URL query parameters.
///
/// Provides a fluent API for constructing query strings with proper URL
/// encoding. Parameters are emitted in insertion order, and `None` values
/// are omitted entirely rather than serialized as empty strings.
///
/// # Example
/// ```ignore
/// let query = QueryBuilder::new()
///     .param("page", "1")
///     .optional("state", Some("open"))
///     .optional("labels", None::<&str>)
///     .build();
/// // Returns "?page=1&state=open"
/// ```
#[derive(Default)]
pub struct QueryBuilder {
    params: Vec<(String, String)>,
}

impl QueryBuilder {
    /// Create a new empty query builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a required parameter (always included).
    pub fn param(mut self, key: &str, value: impl Display) -> Self {
        self.params.push((
            key.to_string(),
            urlencoding::encode(&value.to_string()).into_owned(),
        ));
        self
    }

    /// Add an optional parameter (only included if Some).
    pub fn optional<T: Display>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(v) => self.param(key, v),
            None => self,
        }
    }

    /// Build the query string.
    ///
    /// Returns an empty string if no parameters were added,
    /// otherwise returns "?key1=value1&key2=value2...".
    pub fn build(self) -> String {
        if self.params.is_empty() {
            String::new()
        } else {
            format!(
                "?{}",
                self.params
                    .into_iter()
                    .map(|(k, v)| format!("{k}={v}"))
                    .collect::<Vec<_>>()
                    .join("&")
            )
        }
    }
}

/// Percent-encode a path identifier segment by segment.
///
/// GitLab accepts either a numeric project/group id or a namespaced path
/// like `group/subgroup/project`. The path form must be encoded so that
/// `/` becomes `%2F`, but an already-encoded id must not be double-encoded,
/// so each `/`-separated segment is encoded independently.
pub fn encode_path(id: &str) -> String {
    id.split('/')
        .map(|segment| urlencoding::encode(segment).into_owned())
        .collect::<Vec<_>>()
        .join("%2F")
}
