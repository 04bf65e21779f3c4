use livraria_core_types::RequestId;
use thiserror::Error;

/// Result type alias using CatalogError
pub type Result<T> = std::result::Result<T, CatalogError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Every error that crosses a crate boundary is classified into one of these
/// kinds. Each kind maps to a stable code used by the CLI and by tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    /// Domain validation failed (empty title, negative price, bad retention limit)
    InvalidInput,
    /// A CSV row or an interactive answer could not be parsed
    MalformedInput,
    NotFound,

    /// The live database file is missing or unreadable when a snapshot is requested
    SourceUnavailable,
    /// A copy, delete, write or directory creation failed
    StorageIo,
    /// SQLite reported an error
    Persistence,

    /// An internal invariant broke (e.g. a snapshot evicted by its own prune)
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::MalformedInput => "ERR_MALFORMED_INPUT",
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::SourceUnavailable => "ERR_SOURCE_UNAVAILABLE",
            ExErrorKind::StorageIo => "ERR_STORAGE_IO",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }
}

/// Canonical structured error type
///
/// Carries a classification for programmatic handling plus optional context
/// (operation, subject, path, CSV line) for the message shown to the user.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    subject: Option<String>,
    path: Option<String>,
    line: Option<u64>,
    request_id: Option<RequestId>,
    message: String,
    source: Option<Box<ExError>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            subject: None,
            path: None,
            line: None,
            request_id: None,
            message: String::new(),
            source: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add the subject the operation was about (a title, an author, a snapshot name)
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Add filesystem path context
    pub fn with_path(mut self, path: impl AsRef<std::path::Path>) -> Self {
        self.path = Some(path.as_ref().display().to_string());
        self
    }

    /// Add 1-based input line context
    pub fn with_line(mut self, line: u64) -> Self {
        self.line = Some(line);
        self
    }

    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
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

    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    pub fn path(&self) -> Option<&str> {
        self.path.as_deref()
    }

    pub fn line(&self) -> Option<u64> {
        self.line
    }

    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

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
        if let Some(subject) = &self.subject {
            write!(f, " (subject: {})", subject)?;
        }
        if let Some(path) = &self.path {
            write!(f, " (path: {})", path)?;
        }
        if let Some(line) = self.line {
            write!(f, " (line: {})", line)?;
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

// ========== End Error Facility ==========

/// Domain validation errors raised by the pure catalog model
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CatalogError {
    /// Title is empty or whitespace-only
    #[error("Book title cannot be empty")]
    EmptyTitle,

    /// Author is empty or whitespace-only
    #[error("Book author cannot be empty")]
    EmptyAuthor,

    /// Price below zero
    #[error("Book price cannot be negative: {price}")]
    NegativePrice { price: f64 },

    /// Price is NaN or infinite
    #[error("Book price must be a finite number")]
    NonFinitePrice,

    /// Retention must keep at least one snapshot
    #[error("Retention limit must be at least 1, got {limit}")]
    InvalidRetentionLimit { limit: usize },

    /// A file name that does not follow the snapshot naming scheme
    #[error("Not a snapshot name: {name}")]
    MalformedSnapshotName { name: String },
}

impl From<CatalogError> for ExError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::EmptyTitle => ExError::new(ExErrorKind::InvalidInput)
                .with_op("validate_book")
                .with_message("Book title cannot be empty"),

            CatalogError::EmptyAuthor => ExError::new(ExErrorKind::InvalidInput)
                .with_op("validate_book")
                .with_message("Book author cannot be empty"),

            CatalogError::NegativePrice { price } => ExError::new(ExErrorKind::InvalidInput)
                .with_op("validate_book")
                .with_message(format!("Book price cannot be negative: {}", price)),

            CatalogError::NonFinitePrice => ExError::new(ExErrorKind::InvalidInput)
                .with_op("validate_book")
                .with_message("Book price must be a finite number"),

            CatalogError::InvalidRetentionLimit { limit } => {
                ExError::new(ExErrorKind::InvalidInput)
                    .with_op("validate_config")
                    .with_message(format!("Retention limit must be at least 1, got {}", limit))
            }

            CatalogError::MalformedSnapshotName { name } => {
                ExError::new(ExErrorKind::MalformedInput)
                    .with_op("parse_snapshot_name")
                    .with_subject(name)
                    .with_message("Not a snapshot name")
            }
        }
    }
}
