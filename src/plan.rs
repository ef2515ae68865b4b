//! Plan loading: declared resources from TOML or JSON files
//!
//! A plan is a list of declared resources. TOML plans use `[[resource]]`
//! tables; JSON plans use a top-level `resource` array. A directory is
//! scanned recursively and its plan files are loaded in path order.

use anyhow::{Context, Result, bail};
use reconcile::{DeclaredResource, ResourceKind};
use serde::Deserialize;
use serde_json::Value;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

#[derive(Debug, Deserialize)]
struct PlanFile {
    #[serde(default, rename = "resource")]
    resources: Vec<PlanEntry>,
}

#[derive(Debug, Deserialize)]
struct PlanEntry {
    kind: ResourceKind,
    name: String,
    ensure: String,
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    api_version: Option<u32>,
    #[serde(default)]
    variant: Option<String>,
}

impl From<PlanEntry> for DeclaredResource {
    fn from(entry: PlanEntry) -> Self {
        DeclaredResource {
            kind: entry.kind,
            name: entry.name,
            ensure: entry.ensure,
            attributes: entry.data,
            api_version: entry.api_version,
            variant: entry.variant,
        }
    }
}

/// Load declared resources from a plan file or a directory of plan files.
pub fn load(path: &Path) -> Result<Vec<DeclaredResource>> {
    if path.is_dir() {
        load_dir(path)
    } else {
        load_file(path)
    }
}

fn load_file(path: &Path) -> Result<Vec<DeclaredResource>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Could not read {}", path.display()))?;
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    let file: PlanFile = match extension {
        "toml" => toml::from_str(&content)
            .with_context(|| format!("Invalid TOML plan in {}", path.display()))?,
        "json" => serde_json::from_str(&content)
            .with_context(|| format!("Invalid JSON plan in {}", path.display()))?,
        other => bail!(
            "unsupported plan format '.{other}' for {} (expected .toml or .json)",
            path.display()
        ),
    };
    Ok(file.resources.into_iter().map(Into::into).collect())
}

fn load_dir(dir: &Path) -> Result<Vec<DeclaredResource>> {
    let mut declared = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Could not scan {}", dir.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let extension = entry.path().extension().and_then(|e| e.to_str());
        if matches!(extension, Some("toml" | "json")) {
            declared.extend(load_file(entry.path())?);
        }
    }
    Ok(declared)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    const TOML_PLAN: &str = r#"
        [[resource]]
        kind = "datacenter"
        name = "dc1"
        ensure = "present"

        [resource.data]
        name = "DC1"
        width = 5000
        depth = 5000

        [[resource]]
        kind = "san_manager"
        name = "san"
        ensure = "found"
        api_version = 300
        variant = "Synergy"

        [resource.data]
        providerDisplayName = "Brocade Network Advisor"
    "#;

    const JSON_PLAN: &str = r#"{
        "resource": [
            {
                "kind": "datacenter",
                "name": "dc1",
                "ensure": "present",
                "data": { "name": "DC1", "width": 5000, "depth": 5000 }
            },
            {
                "kind": "san_manager",
                "name": "san",
                "ensure": "found",
                "api_version": 300,
                "variant": "Synergy",
                "data": { "providerDisplayName": "Brocade Network Advisor" }
            }
        ]
    }"#;

    fn write_plan(dir: &Path, name: &str, content: &str) -> std::path::PathBuf {
        let path = dir.join(name);
        let mut file = fs::File::create(&path).unwrap();
        file.write_all(content.as_bytes()).unwrap();
        path
    }

    #[test]
    fn test_toml_and_json_plans_are_equivalent() {
        let dir = tempfile::tempdir().unwrap();
        let toml_path = write_plan(dir.path(), "plan.toml", TOML_PLAN);
        let json_path = write_plan(dir.path(), "plan.json", JSON_PLAN);

        let from_toml = load(&toml_path).unwrap();
        let from_json = load(&json_path).unwrap();

        assert_eq!(from_toml.len(), 2);
        assert_eq!(from_json.len(), 2);
        for (a, b) in from_toml.iter().zip(&from_json) {
            assert_eq!(a.kind, b.kind);
            assert_eq!(a.ensure, b.ensure);
            assert_eq!(a.attributes, b.attributes);
            assert_eq!(a.api_version, b.api_version);
            assert_eq!(a.variant, b.variant);
        }

        let first = &from_toml[0];
        assert_eq!(first.kind, ResourceKind::Datacenter);
        assert_eq!(
            first.attributes,
            Some(json!({ "name": "DC1", "width": 5000, "depth": 5000 }))
        );
    }

    #[test]
    fn test_directory_scan_collects_every_plan_file() {
        let dir = tempfile::tempdir().unwrap();
        write_plan(dir.path(), "10-datacenters.toml", TOML_PLAN);
        fs::create_dir(dir.path().join("nested")).unwrap();
        write_plan(&dir.path().join("nested"), "20-more.json", JSON_PLAN);
        write_plan(dir.path(), "README.md", "not a plan");

        let declared = load(dir.path()).unwrap();
        assert_eq!(declared.len(), 4);
    }

    #[test]
    fn test_unsupported_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_plan(dir.path(), "plan.yaml", "resource: []");
        let err = load(&path).unwrap_err();
        assert!(err.to_string().contains("unsupported plan format"));
    }

    #[test]
    fn test_missing_file_reports_the_path() {
        let err = load(Path::new("/nonexistent/plan.toml")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/plan.toml"));
    }

    #[test]
    fn test_entry_without_data_stays_attribute_free() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_plan(
            dir.path(),
            "plan.toml",
            r#"
            [[resource]]
            kind = "server_profile"
            name = "targets"
            ensure = "get_available_targets"
            "#,
        );
        let declared = load(&path).unwrap();
        assert_eq!(declared.len(), 1);
        assert!(declared[0].attributes.is_none());
    }
}
