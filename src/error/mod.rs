use thiserror::Error;

/// Application-level errors
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Case service error: {0}")]
    Service(#[from] ServiceError),

    #[error("{0}")]
    Workflow(#[from] WorkflowError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

/// Durable key-value storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database connection failed: {message}")]
    Connection { message: String },

    #[error("Query failed: {message}")]
    Query { message: String },

    #[error("Migration failed: {message}")]
    Migration { message: String },

    #[error("SQLx error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// Remote case service errors
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The service answered with a non-success status.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    #[error("Request timeout after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    #[error("Failed to read document {name}: {message}")]
    Document { name: String, message: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl ServiceError {
    /// True when the request never produced a response.
    pub fn is_transport(&self) -> bool {
        matches!(self, ServiceError::Timeout { .. } | ServiceError::Http(_))
    }
}

/// Orchestrator and session errors.
///
/// Display output is the text shown to the user next to the control
/// that triggered the operation.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// Client-side precondition failed; no request was sent.
    #[error("{message}")]
    Validation { message: String },

    /// A request for this operation is already in flight.
    #[error("{operation} is already in progress.")]
    Busy { operation: String },

    /// The remote call failed. `message` is the user-facing text.
    #[error("{message}")]
    Service {
        message: String,
        #[source]
        source: ServiceError,
    },
}

impl WorkflowError {
    /// Create a validation error
    pub fn validation(message: impl Into<String>) -> Self {
        WorkflowError::Validation {
            message: message.into(),
        }
    }

    /// Create a busy error for the named operation
    pub fn busy(operation: impl Into<String>) -> Self {
        WorkflowError::Busy {
            operation: operation.into(),
        }
    }
}

/// Transcript export errors
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("Failed to write transcript to {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Result type alias for application errors
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Result type alias for case service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Result type alias for orchestrator and session operations
pub type WorkflowResult<T> = Result<T, WorkflowError>;

/// Result type alias for export operations
pub type ExportResult<T> = Result<T, ExportError>;
