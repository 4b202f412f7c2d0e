use std::path::PathBuf;

/// Errors raised by the registries, the ledger and the store.
///
/// None of these are fatal: callers re-prompt on `Validation`/`Format`,
/// abort the operation on `Precondition`/`NotFound`, and fall back to an
/// empty store when a `Persistence` error means the file is unreadable.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Bad user-supplied shape (empty name, non-numeric interval, ...)
    #[error("{0}")]
    Validation(String),

    /// Operation attempted in a state that does not allow it
    #[error("{0}")]
    Precondition(String),

    /// Date string did not match the expected format
    #[error("{0}")]
    Format(String),

    /// Lookup by handle, name or index failed
    #[error("Not found: {0}")]
    NotFound(String),

    /// Storage unreadable, unwritable or structurally invalid
    #[error("Storage error ({}): {message}", path.display())]
    Persistence { path: PathBuf, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Precondition,
    Format,
    NotFound,
    Persistence,
}

impl Error {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn precondition(msg: impl Into<String>) -> Self {
        Self::Precondition(msg.into())
    }

    pub fn format(msg: impl Into<String>) -> Self {
        Self::Format(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn persistence(path: impl Into<PathBuf>, cause: impl std::fmt::Display) -> Self {
        Self::Persistence {
            path: path.into(),
            message: cause.to_string(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::Precondition(_) => ErrorKind::Precondition,
            Self::Format(_) => ErrorKind::Format,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Persistence { .. } => ErrorKind::Persistence,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
