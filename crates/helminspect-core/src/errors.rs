use thiserror::Error;

/// Result type alias using the canonical structured error
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing and log assertions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Input/Configuration
    InvalidInput,
    ConfigConflict,

    // Parsing
    /// Declared manifest or live resource could not be parsed
    InvalidManifest,
    /// Persisted calibration snapshot could not be parsed
    InvalidSnapshot,

    // Retrieval
    NotFound,
    FetchFailed,
    MissingPrerequisite,

    // Integration/IO
    Io,
    Serialization,
    Persistence,
    ExternalService,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::ConfigConflict => "ERR_CONFIG_CONFLICT",
            ExErrorKind::InvalidManifest => "ERR_INVALID_MANIFEST",
            ExErrorKind::InvalidSnapshot => "ERR_INVALID_SNAPSHOT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::FetchFailed => "ERR_FETCH_FAILED",
            ExErrorKind::MissingPrerequisite => "ERR_MISSING_PREREQUISITE",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus the resource
/// context (kind, name, path) needed to act on the failure.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    resource_kind: Option<String>,
    resource_name: Option<String>,
    path: Option<String>,
    message: String,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            resource_kind: None,
            resource_name: None,
            path: None,
            message: String::new(),
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add resource kind context
    pub fn with_resource_kind(mut self, kind: impl Into<String>) -> Self {
        self.resource_kind = Some(kind.into());
        self
    }

    /// Add resource name context
    pub fn with_resource_name(mut self, name: impl Into<String>) -> Self {
        self.resource_name = Some(name.into());
        self
    }

    /// Add tree path context
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the resource kind, if any
    pub fn resource_kind(&self) -> Option<&str> {
        self.resource_kind.as_deref()
    }

    /// Get the resource name, if any
    pub fn resource_name(&self) -> Option<&str> {
        self.resource_name.as_deref()
    }

    /// Get the path, if any
    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    /// Get the message
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(kind) = &self.resource_kind {
            write!(f, " (kind: {})", kind)?;
        }
        if let Some(name) = &self.resource_name {
            write!(f, " (name: {})", name)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Domain failures raised by the drift pipeline and its collaborators
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DriftError {
    // ===== Configuration =====
    /// Two mutually exclusive options were both set
    #[error("Cannot use --{first} with --{second}. Please use only one of these flags.")]
    ConflictingFlags { first: String, second: String },

    /// Only one half of the notification settings is present
    #[error("Both a Slack channel and a Slack token are required for notifications (missing {missing})")]
    IncompleteNotifyConfig { missing: String },

    // ===== External commands =====
    /// Required command-line tools are not on PATH
    #[error("Missing prerequisites: {} not installed or not in PATH", tools.join(", "))]
    MissingPrerequisites { tools: Vec<String> },

    /// A program outside the allow-list was requested
    #[error("Invalid command: {program}")]
    CommandNotAllowed { program: String },

    /// A command could not be spawned or exited unsuccessfully
    #[error("Error running command `{command}`: {stderr}")]
    CommandFailed { command: String, stderr: String },

    // ===== Parsing =====
    /// The declared manifest stream is not valid YAML
    #[error("Failed to parse Helm manifest YAML: {reason}")]
    ManifestParse { reason: String },

    /// A live resource document is not valid JSON
    #[error("Failed to parse {kind} `{name}` JSON: {reason}")]
    LiveParse {
        kind: String,
        name: String,
        reason: String,
    },

    /// An ignore rule string does not have the expected `Kind;...` shape
    #[error("Invalid ignore rule: {entry}")]
    InvalidIgnoreRule { entry: String },

    // ===== Generic =====
    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },
}

impl From<DriftError> for ExError {
    fn from(err: DriftError) -> Self {
        let message = err.to_string();
        match err {
            DriftError::ConflictingFlags { .. } | DriftError::IncompleteNotifyConfig { .. } => {
                ExError::new(ExErrorKind::ConfigConflict)
                    .with_op("validate_config")
                    .with_message(message)
            }

            DriftError::MissingPrerequisites { .. } => {
                ExError::new(ExErrorKind::MissingPrerequisite)
                    .with_op("check_prerequisites")
                    .with_message(message)
            }

            DriftError::CommandNotAllowed { .. } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("run_command")
                .with_message(message),

            DriftError::CommandFailed { .. } => ExError::new(ExErrorKind::FetchFailed)
                .with_op("run_command")
                .with_message(message),

            DriftError::ManifestParse { .. } => ExError::new(ExErrorKind::InvalidManifest)
                .with_op("parse_manifest")
                .with_message(message),

            DriftError::LiveParse { kind, name, .. } => {
                ExError::new(ExErrorKind::InvalidManifest)
                    .with_op("parse_live_resource")
                    .with_resource_kind(kind)
                    .with_resource_name(name)
                    .with_message(message)
            }

            DriftError::InvalidIgnoreRule { .. } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("parse_ignore_rule")
                .with_message(message),

            DriftError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_unique() {
        let kinds = [
            ExErrorKind::InvalidInput,
            ExErrorKind::ConfigConflict,
            ExErrorKind::InvalidManifest,
            ExErrorKind::InvalidSnapshot,
            ExErrorKind::NotFound,
            ExErrorKind::FetchFailed,
            ExErrorKind::MissingPrerequisite,
            ExErrorKind::Io,
            ExErrorKind::Serialization,
            ExErrorKind::Persistence,
            ExErrorKind::ExternalService,
            ExErrorKind::Internal,
        ];
        let mut codes: Vec<&str> = kinds.iter().map(|k| k.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn test_display_includes_resource_context() {
        let err = ExError::new(ExErrorKind::FetchFailed)
            .with_op("fetch_live")
            .with_resource_kind("Deployment")
            .with_resource_name("web")
            .with_path("spec.replicas")
            .with_message("kubectl exited with status 1");
        let rendered = err.to_string();
        assert!(rendered.starts_with("[ERR_FETCH_FAILED] in operation 'fetch_live'"));
        assert!(rendered.contains("(kind: Deployment)"));
        assert!(rendered.contains("(name: web)"));
        assert!(rendered.contains("(path: spec.replicas)"));
    }

    #[test]
    fn test_conflicting_flags_maps_to_config_conflict() {
        let err: ExError = DriftError::ConflictingFlags {
            first: "no-ignore".to_string(),
            second: "calibrate".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ExErrorKind::ConfigConflict);
        assert!(err.message().contains("--no-ignore"));
    }

    #[test]
    fn test_live_parse_carries_identity() {
        let err: ExError = DriftError::LiveParse {
            kind: "Service".to_string(),
            name: "api".to_string(),
            reason: "EOF".to_string(),
        }
        .into();
        assert_eq!(err.kind(), ExErrorKind::InvalidManifest);
        assert_eq!(err.resource_kind(), Some("Service"));
        assert_eq!(err.resource_name(), Some("api"));
    }
}
