//! Batch manifests and writing generated classes to disk.
//!
//! A manifest is a JSON document listing the classes to generate:
//!
//! ```json
//! {
//!   "package": "org.example.dummy",
//!   "exception": "java.lang.IllegalStateException",
//!   "requests": [
//!     { "interface": "org.example.CatalogEntry" },
//!     { "interface": "org.example.Other", "name": "org.example.gen.DummyOther" }
//!   ]
//! }
//! ```
//!
//! Requests without a `name` are named after their interface inside `package`; requests
//! without an `exception` use the manifest's, then the configured default.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use stubgen_core::{
    dummy_class_name, DummyClassGenerator, ErrorKind, GeneratedClass, GenerationRequest,
};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchManifest {
    /// Package for requests that leave out `name`.
    pub package: Option<String>,
    /// Exception for requests that leave out `exception`.
    pub exception: Option<String>,
    pub requests: Vec<GenerationRequest>,
}

impl BatchManifest {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest: {}", path.display()))?;
        Self::from_json(&text).with_context(|| format!("invalid manifest: {}", path.display()))
    }

    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Requests with manifest-level defaults applied. Fields that are still missing are left
    /// for the generator to reject.
    pub fn resolved_requests(&self, default_exception: &str) -> Vec<GenerationRequest> {
        let package = non_empty(self.package.as_deref());
        let exception = non_empty(self.exception.as_deref()).unwrap_or(default_exception);

        self.requests
            .iter()
            .map(|request| {
                let name = non_empty(request.name.as_deref())
                    .map(str::to_string)
                    .or_else(|| {
                        let interface = non_empty(request.interface.as_deref())?;
                        package.map(|package| dummy_class_name(package, interface))
                    });
                GenerationRequest {
                    interface: request.interface.clone(),
                    name,
                    exception: Some(
                        non_empty(request.exception.as_deref())
                            .unwrap_or(exception)
                            .to_string(),
                    ),
                }
            })
            .collect()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Result of one batch request.
#[derive(Debug, Clone, Serialize)]
pub struct ClassOutcome {
    pub interface: Option<String>,
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    pub methods: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchReport {
    pub out_dir: String,
    pub generated: usize,
    pub failed: usize,
    pub classes: Vec<ClassOutcome>,
}

impl BatchReport {
    pub fn is_success(&self) -> bool {
        self.failed == 0
    }
}

/// Write `class` under `out_dir` at its package path. Returns the written file.
pub fn write_class(out_dir: &Path, class: &GeneratedClass) -> Result<PathBuf> {
    let file_path = out_dir.join(class.relative_path());
    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    fs::write(&file_path, class.bytes())
        .with_context(|| format!("failed to write class file: {}", file_path.display()))?;
    debug!(class = class.name(), path = %file_path.display(), "wrote class file");
    Ok(file_path)
}

/// Generate every request and write the results under `out_dir`.
///
/// A request that fails to generate is recorded in the report and the batch continues; a
/// failure to write is returned immediately.
pub fn emit_dummy_classes(
    generator: &DummyClassGenerator<'_>,
    requests: &[GenerationRequest],
    out_dir: &Path,
) -> Result<BatchReport> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create output directory: {}", out_dir.display()))?;

    let mut report = BatchReport {
        out_dir: out_dir.display().to_string(),
        ..Default::default()
    };

    for request in requests {
        let mut outcome = ClassOutcome {
            interface: request.interface.clone(),
            name: request.name.clone(),
            path: None,
            methods: 0,
            error: None,
            kind: None,
        };
        match generator.generate(request) {
            Ok(class) => {
                let path = write_class(out_dir, &class)?;
                outcome.path = Some(path.display().to_string());
                outcome.methods = class.method_count();
                report.generated += 1;
            }
            Err(e) => {
                warn!(
                    interface = request.interface.as_deref().unwrap_or("<none>"),
                    error = %e,
                    "failed to generate dummy class"
                );
                outcome.kind = Some(e.kind());
                outcome.error = Some(e.to_string());
                report.failed += 1;
            }
        }
        report.classes.push(outcome);
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_applied() {
        let manifest = BatchManifest::from_json(
            r#"{
                "package": "org.example.dummy",
                "requests": [
                    {"interface": "org.example.Foo"},
                    {"interface": "org.example.Bar", "name": "x.Y", "exception": "java.lang.IllegalStateException"},
                    {"name": "x.Z"}
                ]
            }"#,
        )
        .unwrap();

        let requests = manifest.resolved_requests("java.lang.UnsupportedOperationException");
        assert_eq!(requests.len(), 3);
        assert_eq!(
            requests[0].name.as_deref(),
            Some("org.example.dummy.Dummy_org_example_Foo")
        );
        assert_eq!(
            requests[0].exception.as_deref(),
            Some("java.lang.UnsupportedOperationException")
        );
        assert_eq!(requests[1].name.as_deref(), Some("x.Y"));
        assert_eq!(
            requests[1].exception.as_deref(),
            Some("java.lang.IllegalStateException")
        );
        assert!(requests[2].interface.is_none());
    }

    #[test]
    fn test_manifest_exception_overrides_default() {
        let manifest = BatchManifest {
            package: None,
            exception: Some("java.lang.IllegalStateException".to_string()),
            requests: vec![GenerationRequest {
                interface: Some("a.I".to_string()),
                ..Default::default()
            }],
        };
        let requests = manifest.resolved_requests("java.lang.UnsupportedOperationException");
        // no package, so no name can be derived
        assert!(requests[0].name.is_none());
        assert_eq!(
            requests[0].exception.as_deref(),
            Some("java.lang.IllegalStateException")
        );
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        assert!(BatchManifest::from_json("{\"requests\": 3}").is_err());
        assert!(BatchManifest::load(Path::new("/nonexistent/manifest.json")).is_err());
    }
}
