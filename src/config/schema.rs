//! Configuration schema definitions.
//!
//! These are the raw, deserialized shapes. Rule shapes are not enforced here;
//! see [`crate::config::validation`] and [`crate::routing::Rule`].

use std::collections::HashSet;
use std::fmt;
use std::ops::Deref;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Root configuration: the manifest plus the ordered rule list.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Known servable path-keys.
    #[serde(deserialize_with = "null_as_default")]
    pub manifest: Manifest,

    /// Routing rules, evaluated in order.
    #[serde(rename = "rules", alias = "routes", deserialize_with = "null_as_default")]
    pub routes: Vec<RouteConfig>,
}

/// An explicit `null` reads the same as an absent field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Set of known servable paths. Membership is an exact string comparison.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(transparent)]
pub struct Manifest(HashSet<String>);

impl Manifest {
    /// Returns true if `path` is a known servable key.
    pub fn contains(&self, path: &str) -> bool {
        self.0.contains(path)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for Manifest {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// A response header attached by a pattern rule.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Header {
    pub key: String,
    pub value: String,

    /// Replace an existing header of the same name instead of appending.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overwrite: Option<bool>,
}

impl Header {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            overwrite: None,
        }
    }

    /// Both key and value must be non-empty.
    pub fn is_valid(&self) -> bool {
        !self.key.is_empty() && !self.value.is_empty()
    }
}

/// One routing rule as it appears in the configuration source.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteConfig {
    /// Serve the request path as-is when it is in the manifest.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub use_filesystem: Option<bool>,

    /// Pattern searched for in the request path.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<Pattern>,

    /// Substitution template applied when `source` matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u32>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub headers: Option<Vec<Header>>,
}

impl RouteConfig {
    /// A rule that serves manifest hits unchanged.
    pub fn filesystem() -> Self {
        Self {
            use_filesystem: Some(true),
            ..Self::default()
        }
    }

    /// A rewrite rule from `source` to `destination`.
    pub fn pattern(source: Pattern, destination: impl Into<String>) -> Self {
        Self {
            source: Some(source),
            destination: Some(destination.into()),
            ..Self::default()
        }
    }

    pub fn with_status(mut self, status_code: u32) -> Self {
        self.status_code = Some(status_code);
        self
    }

    pub fn with_header(mut self, header: Header) -> Self {
        self.headers.get_or_insert_with(Vec::new).push(header);
        self
    }

    pub fn is_filesystem(&self) -> bool {
        self.use_filesystem.unwrap_or(false)
    }
}

/// A compiled regular expression that round-trips through its source text.
#[derive(Clone)]
pub struct Pattern(Regex);

impl Pattern {
    pub fn new(source: &str) -> Result<Self, regex::Error> {
        Regex::new(source).map(Self)
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Deref for Pattern {
    type Target = Regex;

    fn deref(&self) -> &Regex {
        &self.0
    }
}

impl fmt::Debug for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Pattern").field(&self.as_str()).finish()
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Pattern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Pattern {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let source = String::deserialize(deserializer)?;
        Pattern::new(&source).map_err(|e| {
            serde::de::Error::custom(format!("invalid source pattern {:?}: {}", source, e))
        })
    }
}
