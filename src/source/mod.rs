use std::path::Path;
use std::process::Command;

use anyhow::Context;
use serde::Deserialize;

use crate::core::{DependencyRef, PackageKey, PackageRecord};
use crate::error::{PipgraphError, Result};

pub const DEFAULT_TOOL: &str = "pipdeptree";

const TOOL_ARGS: &[&str] = &["--warn", "silence", "--json"];

#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default)]
    package: RawPackage,
    #[serde(default)]
    dependencies: Vec<RawDependency>,
}

#[derive(Debug, Default, Deserialize)]
struct RawPackage {
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    package_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawDependency {
    #[serde(default)]
    key: Option<String>,
}

/// Runs the dependency-introspection tool and parses its JSON output.
pub fn load_from_tool(program: &str) -> Result<Vec<PackageRecord>> {
    let output = Command::new(program)
        .args(TOOL_ARGS)
        .output()
        .with_context(|| format!("failed to run {}", program))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PipgraphError::Tool(format!(
            "{} exited with {}: {}",
            program,
            output.status,
            stderr.trim()
        )));
    }

    parse_records(&output.stdout)
}

/// Reads previously captured tool output from a file.
pub fn load_from_file(path: &Path) -> Result<Vec<PackageRecord>> {
    let contents = std::fs::read(path)?;
    parse_records(&contents)
}

/// Parses the tool's JSON schema: a top-level array of entries, each with a
/// `package` object (`key`, `package_name`) and a `dependencies` array of
/// objects carrying at least a `key`. Extra fields are ignored.
pub fn parse_records(raw: &[u8]) -> Result<Vec<PackageRecord>> {
    let entries: Vec<RawEntry> = serde_json::from_slice(raw)?;
    entries.into_iter().map(validate_entry).collect()
}

fn validate_entry(entry: RawEntry) -> Result<PackageRecord> {
    let key = entry
        .package
        .key
        .filter(|key| !key.is_empty())
        .ok_or_else(|| PipgraphError::MalformedRecord("package entry missing key".to_string()))?;
    let name = entry
        .package
        .package_name
        .filter(|name| !name.is_empty())
        .ok_or_else(|| {
            PipgraphError::MalformedRecord(format!("package {} missing package_name", key))
        })?;

    let mut dependencies = Vec::with_capacity(entry.dependencies.len());
    for dep in entry.dependencies {
        let dep_key = dep.key.filter(|key| !key.is_empty()).ok_or_else(|| {
            PipgraphError::MalformedRecord(format!("dependency of {} missing key", key))
        })?;
        dependencies.push(DependencyRef {
            key: PackageKey::new(dep_key),
        });
    }

    Ok(PackageRecord {
        key: PackageKey::new(key),
        name,
        dependencies,
    })
}
