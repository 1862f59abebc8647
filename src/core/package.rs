use serde::Serialize;

/// Canonical package identity as reported by the introspection tool
/// (lowercase distribution key, stable across records).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct PackageKey(String);

impl PackageKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// One installed package and its direct dependencies.
#[derive(Debug, Clone)]
pub struct PackageRecord {
    pub key: PackageKey,
    /// Display name; may differ from the key in case or formatting
    /// and is not guaranteed unique.
    pub name: String,
    pub dependencies: Vec<DependencyRef>,
}

/// Reference from a package to one of its direct dependencies.
#[derive(Debug, Clone)]
pub struct DependencyRef {
    pub key: PackageKey,
}
