use std::path::{Path, PathBuf};

/// Result type alias using ExError
pub type Result<T> = std::result::Result<T, ExError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code that can be used for programmatic
/// error handling, testing, and log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Preconditions
    /// A required source file is absent
    NotFound,
    /// Revert was asked for a file that has no backup
    BackupMissing,
    /// Backup was asked for a file that already has one (policy `fail`)
    BackupAlreadyExists,

    // Inputs
    /// A bundled or overridden template could not be loaded
    TemplateMissing,
    /// A descriptor or template is not well-formed, or lacks a required element
    MalformedXml,
    /// A path expression could not be parsed
    InvalidPath,

    // Dispatch
    /// The command exists but its availability predicate is false
    CommandUnavailable,
    /// No command with the given name
    UnknownCommand,

    // Integration/IO
    Io,
    Config,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::BackupMissing => "ERR_BACKUP_MISSING",
            ExErrorKind::BackupAlreadyExists => "ERR_BACKUP_ALREADY_EXISTS",
            ExErrorKind::TemplateMissing => "ERR_TEMPLATE_MISSING",
            ExErrorKind::MalformedXml => "ERR_MALFORMED_XML",
            ExErrorKind::InvalidPath => "ERR_INVALID_PATH",
            ExErrorKind::CommandUnavailable => "ERR_COMMAND_UNAVAILABLE",
            ExErrorKind::UnknownCommand => "ERR_UNKNOWN_COMMAND",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::Config => "ERR_CONFIG",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification kind for programmatic handling plus the file or
/// template involved, so a surfaced message always says what failed.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    path: Option<PathBuf>,
    template: Option<String>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            path: None,
            template: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the file involved
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Add the template involved
    pub fn with_template(mut self, name: impl Into<String>) -> Self {
        self.template = Some(name.into());
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
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

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the file context, if any
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Get the template context, if any
    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
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
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }
        if let Some(template) = &self.template {
            write!(f, " (template: {})", template)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== Constructors ==========

/// A required file does not exist
pub fn not_found(op: &str, path: &Path) -> ExError {
    ExError::new(ExErrorKind::NotFound)
        .with_op(op)
        .with_path(path)
        .with_message("file does not exist")
}

/// A template could not be loaded
pub fn template_missing(name: &str) -> ExError {
    ExError::new(ExErrorKind::TemplateMissing)
        .with_op("load_template")
        .with_template(name)
        .with_message(format!("template '{}' is not available", name))
}

/// A descriptor could not be parsed or lacks a required element
pub fn malformed_xml(op: &str, reason: impl Into<String>) -> ExError {
    ExError::new(ExErrorKind::MalformedXml)
        .with_op(op)
        .with_message(reason)
}

/// Wrap a std::io::Error
pub fn io_error(op: &str, path: &Path, err: std::io::Error) -> ExError {
    ExError::new(ExErrorKind::Io)
        .with_op(op)
        .with_path(path)
        .with_message(err.to_string())
}

/// Revert without a backup
pub fn backup_missing(backup: &Path) -> ExError {
    ExError::new(ExErrorKind::BackupMissing)
        .with_op("revert")
        .with_path(backup)
        .with_message("no backup to restore from")
}

/// Backup over an existing backup (policy `fail`)
pub fn backup_already_exists(backup: &Path) -> ExError {
    ExError::new(ExErrorKind::BackupAlreadyExists)
        .with_op("backup")
        .with_path(backup)
        .with_message("a backup already exists; disable the capability before enabling it again")
}

/// A malformed path expression
pub fn invalid_path(expr: &str, reason: &str) -> ExError {
    ExError::new(ExErrorKind::InvalidPath)
        .with_op("parse_path")
        .with_message(format!("invalid path expression '{}': {}", expr, reason))
}

/// Command refused by its availability predicate
pub fn command_unavailable(command: &str) -> ExError {
    ExError::new(ExErrorKind::CommandUnavailable)
        .with_op("dispatch")
        .with_message(format!("command '{}' is not available in the current project state", command))
}

/// Command name not registered
pub fn unknown_command(command: &str) -> ExError {
    ExError::new(ExErrorKind::UnknownCommand)
        .with_op("dispatch")
        .with_message(format!("unknown command '{}'", command))
}
