use crate::error::LibraryError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

static NAMESPACE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9_.\-]+$").expect("namespace pattern is valid"));
static PATH_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9_.\-/]+$").expect("path pattern is valid"));

/// A namespaced key of the form `namespace:path`.
///
/// Shards, shard types and shard sources are all addressed by identifiers.
/// Ordering is by namespace, then path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Identifier {
    namespace: String,
    path: String,
}

impl Identifier {
    pub fn new(
        namespace: impl Into<String>,
        path: impl Into<String>,
    ) -> Result<Self, LibraryError> {
        let namespace = namespace.into();
        let path = path.into();

        if !NAMESPACE_PATTERN.is_match(&namespace) {
            return Err(LibraryError::MalformedIdentifier {
                input: format!("{namespace}:{path}"),
                reason: "namespace must be non-empty and use only [a-z0-9_.-]".to_string(),
            });
        }
        if !PATH_PATTERN.is_match(&path) {
            return Err(LibraryError::MalformedIdentifier {
                input: format!("{namespace}:{path}"),
                reason: "path must be non-empty and use only [a-z0-9_.-/]".to_string(),
            });
        }

        Ok(Self { namespace, path })
    }

    /// Whether `s` could serve as a namespace (also the rule for owner tokens)
    pub fn is_valid_namespace(s: &str) -> bool {
        NAMESPACE_PATTERN.is_match(s)
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn path(&self) -> &str {
        &self.path
    }
}

impl FromStr for Identifier {
    type Err = LibraryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (namespace, path) =
            s.split_once(':')
                .ok_or_else(|| LibraryError::MalformedIdentifier {
                    input: s.to_string(),
                    reason: "expected 'namespace:path'".to_string(),
                })?;
        Self::new(namespace, path)
    }
}

impl TryFrom<String> for Identifier {
    type Error = LibraryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Identifier> for String {
    fn from(id: Identifier) -> Self {
        id.to_string()
    }
}

impl fmt::Display for Identifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}
