//! Marketplace and plugin manifest checks
//!
//! The marketplace manifest lists plugins by `name` and `source`, where
//! `source` is a directory under the plugins directory holding
//! `.claude-plugin/plugin.json`.

use crate::error::{BazaarError, Result};
use crate::io::RepoLayout;
use crate::validate::{Finding, Report};
use regex::Regex;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::LazyLock;

pub const MARKETPLACE_REQUIRED: &[&str] = &["name", "owner", "metadata", "plugins"];
pub const PLUGIN_REQUIRED: &[&str] = &["name", "version", "description", "author", "license"];

/// Read and decode the marketplace manifest.
///
/// A missing or malformed manifest is fatal for the manifest check, so it is
/// an error rather than a finding.
pub fn load_marketplace(path: &Path) -> Result<Value> {
    if !path.is_file() {
        return Err(BazaarError::manifest(path, "not found"));
    }
    let content = std::fs::read_to_string(path)?;
    serde_json::from_str(&content)
        .map_err(|e| BazaarError::manifest(path, format!("is not valid JSON: {}", e)))
}

/// Plugin names declared in a marketplace manifest, in file order
pub fn plugin_names(marketplace: &Value) -> Vec<String> {
    plugin_entries(marketplace)
        .iter()
        .filter_map(|p| p.get("name").and_then(Value::as_str))
        .map(str::to_string)
        .collect()
}

fn plugin_entries(marketplace: &Value) -> &[Value] {
    marketplace
        .get("plugins")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default()
}

/// JSON truthiness: null, false, 0, "" and empty containers are unset
fn is_set(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => *b,
        Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Array(a)) => !a.is_empty(),
        Some(Value::Object(o)) => !o.is_empty(),
    }
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn missing_keys(object: &Map<String, Value>, required: &[&str]) -> Vec<String> {
    let mut missing: Vec<String> = required
        .iter()
        .filter(|key| !object.contains_key(**key))
        .map(|key| key.to_string())
        .collect();
    missing.sort();
    missing
}

static SEMVER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d+\.\d+\.\d+$").unwrap());

/// Plain `X.Y.Z`, no pre-release or build suffix
pub fn is_semver(version: &str) -> bool {
    SEMVER.is_match(version)
}

/// Top-level structure of the marketplace manifest
pub fn validate_marketplace(data: &Value) -> Vec<Finding> {
    let Some(object) = data.as_object() else {
        return vec![Finding::error("marketplace.json must be a JSON object")];
    };

    let mut findings = Vec::new();
    let missing = missing_keys(object, MARKETPLACE_REQUIRED);
    if !missing.is_empty() {
        findings.push(Finding::error(format!(
            "marketplace.json missing required fields: {}",
            missing.join(", ")
        )));
    }
    if object.get("plugins").is_some_and(|p| !p.is_array()) {
        findings.push(Finding::error("marketplace.json 'plugins' must be an array"));
    }
    if object.get("metadata").is_some_and(|m| !m.is_object()) {
        findings.push(Finding::error("marketplace.json 'metadata' must be an object"));
    }
    findings
}

/// One marketplace entry and the plugin manifest it points at
pub fn validate_plugin_entry(layout: &RepoLayout, entry: &Value, index: usize) -> Vec<Finding> {
    let mut findings = Vec::new();
    let name = entry
        .get("name")
        .filter(|n| is_set(Some(*n)))
        .map(text)
        .unwrap_or_else(|| "<unnamed>".to_string());
    let prefix = format!("plugins[{}] ({})", index, name);

    if !is_set(entry.get("name")) {
        findings.push(Finding::error(format!("plugins[{}]: missing 'name'", index)));
    }
    let source = match entry.get("source") {
        Some(s) if is_set(Some(s)) => text(s),
        _ => {
            findings.push(Finding::error(format!("plugins[{}]: missing 'source'", index)));
            return findings;
        }
    };

    let plugin_dir = layout.plugins_dir().join(&source);
    if !plugin_dir.is_dir() {
        findings.push(Finding::error(format!(
            "{}: source directory '{}' does not exist",
            prefix,
            layout.display_path(&plugin_dir)
        )));
        return findings;
    }

    let manifest_path = plugin_dir.join(".claude-plugin").join("plugin.json");
    let shown = layout.display_path(&manifest_path);
    if !manifest_path.is_file() {
        findings.push(Finding::error(format!("{}: missing {}", prefix, shown)));
        return findings;
    }

    let manifest: Value = match std::fs::read_to_string(&manifest_path)
        .map_err(|e| e.to_string())
        .and_then(|c| serde_json::from_str(&c).map_err(|e| e.to_string()))
    {
        Ok(v) => v,
        Err(e) => {
            findings.push(Finding::error(format!(
                "{}: invalid JSON in {}: {}",
                prefix, shown, e
            )));
            return findings;
        }
    };
    let Some(manifest) = manifest.as_object() else {
        findings.push(Finding::error(format!(
            "{}: {} must be a JSON object",
            prefix, shown
        )));
        return findings;
    };

    let missing = missing_keys(manifest, PLUGIN_REQUIRED);
    if !missing.is_empty() {
        findings.push(Finding::error(format!(
            "{}: {} missing required fields: {}",
            prefix,
            shown,
            missing.join(", ")
        )));
    }

    if let Some(manifest_name) = manifest.get("name").filter(|n| is_set(Some(*n))) {
        let manifest_name = text(manifest_name);
        if manifest_name != source {
            findings.push(Finding::error(format!(
                "{}: plugin.json name '{}' does not match directory name '{}'",
                prefix, manifest_name, source
            )));
        }
    }

    if let Some(version) = manifest.get("version").filter(|v| is_set(Some(*v))) {
        let version = text(version);
        if !is_semver(&version) {
            findings.push(Finding::error(format!(
                "{}: version '{}' is not valid semver (expected X.Y.Z)",
                prefix, version
            )));
        }
    }

    findings
}

/// Outcome of a manifest check run
#[derive(Debug, Clone, Default)]
pub struct ManifestCheck {
    pub plugin_count: usize,
    pub report: Report,
}

/// Validate the marketplace manifest and every plugin it lists
pub fn check_manifests(layout: &RepoLayout) -> Result<ManifestCheck> {
    let data = load_marketplace(&layout.marketplace_path())?;

    let mut report = Report::new();
    report.extend("", validate_marketplace(&data));

    let entries = plugin_entries(&data);
    for (i, entry) in entries.iter().enumerate() {
        log::debug!("checking plugin entry {}", i);
        report.extend("", validate_plugin_entry(layout, entry, i));
    }

    Ok(ManifestCheck {
        plugin_count: entries.len(),
        report,
    })
}
