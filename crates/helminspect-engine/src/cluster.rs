//! Cluster-facing collaborators backed by the `helm` and `kubectl` CLIs.

#![allow(clippy::result_large_err)]

use helminspect_core::errors::{DriftError, ExErrorKind, Result};
use helminspect_core::model::{Resource, ResourceKind};
use helminspect_core::source::{LiveSource, ManifestSource};
use serde::Deserialize;
use serde_json::Value;
use std::process::Command;

/// Programs the runner is allowed to execute
pub const ALLOWED_PROGRAMS: &[&str] = &["helm", "kubectl"];

/// Cluster name used when the kube context cannot be read
pub const UNKNOWN_CLUSTER: &str = "unknown_cluster";

/// Runs an external program and returns its stdout.
pub trait CommandRunner {
    /// # Errors
    ///
    /// Returns `ExErrorKind::InvalidInput` for programs outside
    /// [`ALLOWED_PROGRAMS`] and `ExErrorKind::FetchFailed` when the program
    /// cannot be spawned or exits unsuccessfully.
    fn run(&self, program: &str, args: &[&str]) -> Result<String>;
}

impl<F> CommandRunner for F
where
    F: Fn(&str, &[&str]) -> Result<String>,
{
    fn run(&self, program: &str, args: &[&str]) -> Result<String> {
        self(program, args)
    }
}

/// Runner that spawns real processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<String> {
        run_command(program, args)
    }
}

/// Run an allow-listed program synchronously
///
/// # Errors
///
/// See [`CommandRunner::run`].
pub fn run_command(program: &str, args: &[&str]) -> Result<String> {
    if !ALLOWED_PROGRAMS.contains(&program) {
        return Err(DriftError::CommandNotAllowed {
            program: program.to_string(),
        }
        .into());
    }

    let rendered = std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ");
    tracing::debug!(command = %rendered, "running command");

    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| DriftError::CommandFailed {
            command: rendered.clone(),
            stderr: e.to_string(),
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        tracing::warn!(command = %rendered, stderr = %stderr, "Error running command");
        return Err(DriftError::CommandFailed {
            command: rendered,
            stderr,
        }
        .into());
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Ensure `helm` and `kubectl` are on `PATH`
///
/// # Errors
///
/// Returns `ExErrorKind::MissingPrerequisite` naming every missing tool.
pub fn check_prerequisites() -> Result<()> {
    check_tools(ALLOWED_PROGRAMS)
}

/// Ensure every tool in `tools` resolves on `PATH`
///
/// # Errors
///
/// Returns `ExErrorKind::MissingPrerequisite` naming every missing tool.
pub fn check_tools(tools: &[&str]) -> Result<()> {
    let missing: Vec<String> = tools
        .iter()
        .filter(|tool| which::which(tool).is_err())
        .map(|tool| tool.to_string())
        .collect();

    if missing.is_empty() {
        return Ok(());
    }
    for tool in &missing {
        tracing::error!("   - {tool} is not installed or not in PATH.");
    }
    Err(DriftError::MissingPrerequisites { tools: missing }.into())
}

/// Name of the cluster in the current kube context
pub fn cluster_name(runner: &dyn CommandRunner) -> String {
    runner
        .run(
            "kubectl",
            &["config", "view", "--minify", "-o", "jsonpath={.clusters[0].name}"],
        )
        .map(|out| out.trim().to_string())
        .ok()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_CLUSTER.to_string())
}

/// Parse a multi-document YAML manifest stream into resources
///
/// Empty documents are skipped.
///
/// # Errors
///
/// Returns [`DriftError::ManifestParse`] if any document is not valid YAML.
pub fn parse_manifest(text: &str) -> std::result::Result<Vec<Resource>, DriftError> {
    let mut resources = Vec::new();
    for document in serde_yaml::Deserializer::from_str(text) {
        let value = Value::deserialize(document).map_err(|e| DriftError::ManifestParse {
            reason: e.to_string(),
        })?;
        resources.extend(Resource::from_document(value));
    }
    Ok(resources)
}

/// Parse a `kubectl -o json` document for `(kind, name)`
///
/// Empty output and empty objects are absence.
///
/// # Errors
///
/// Returns [`DriftError::LiveParse`] if the output is not valid JSON.
pub fn parse_live(
    kind: &ResourceKind,
    name: &str,
    text: &str,
) -> std::result::Result<Option<Resource>, DriftError> {
    if text.trim().is_empty() {
        return Ok(None);
    }
    let value: Value = serde_json::from_str(text).map_err(|e| DriftError::LiveParse {
        kind: kind.to_string(),
        name: name.to_string(),
        reason: e.to_string(),
    })?;
    Ok(Resource::from_document(value).map(|doc| Resource::new(kind.clone(), name, doc.body)))
}

/// Declared state from `helm get manifest`
#[derive(Debug, Clone, Default)]
pub struct HelmManifestSource<R = SystemRunner> {
    runner: R,
}

impl<R: CommandRunner> HelmManifestSource<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> ManifestSource for HelmManifestSource<R> {
    fn fetch_declared(&self, release: &str, namespace: &str) -> Result<Vec<Resource>> {
        let output = match self
            .runner
            .run("helm", &["get", "manifest", release, "-n", namespace])
        {
            Ok(output) => output,
            Err(err) if err.kind() == ExErrorKind::FetchFailed => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };
        parse_manifest(&output).map_err(|e| {
            tracing::error!("Failed to parse Helm manifest YAML.");
            e.into()
        })
    }
}

/// Live state from `kubectl get <kind> <name> -o json`
#[derive(Debug, Clone, Default)]
pub struct KubectlLiveSource<R = SystemRunner> {
    runner: R,
}

impl<R: CommandRunner> KubectlLiveSource<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }
}

impl<R: CommandRunner> LiveSource for KubectlLiveSource<R> {
    fn fetch_live(
        &self,
        kind: &ResourceKind,
        name: &str,
        namespace: &str,
    ) -> Result<Option<Resource>> {
        let resource_type = kind.as_platform().to_lowercase();
        let output = match self.runner.run(
            "kubectl",
            &["get", &resource_type, name, "-n", namespace, "-o", "json"],
        ) {
            Ok(output) => output,
            Err(err) if err.kind() == ExErrorKind::FetchFailed => return Ok(None),
            Err(err) => return Err(err),
        };
        parse_live(kind, name, &output).map_err(|e| {
            tracing::error!(resource_kind = %kind, resource_name = name, "Failed to parse {kind} `{name}` JSON.");
            e.into()
        })
    }
}
