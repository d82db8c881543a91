//! Error types for bindcheck.
//!
//! Uses `thiserror` for ergonomic error definition with rich context.
//!
//! Errors are reserved for failures of the tool itself (unreadable snapshots,
//! inconsistent unit graphs, facts attached to foreign declarations). Problems
//! found in the analyzed program are never errors; they are
//! [`Diagnostic`](crate::Diagnostic)s.

use std::fmt;

use thiserror::Error;

/// The main error type for bindcheck operations.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// The kind of error that occurred.
    pub kind: ErrorKind,
    /// Optional context about where the error occurred.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// Creates a new error with the given kind.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Adds context to this error.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a foreign fact error.
    #[must_use]
    pub fn foreign_fact(
        symbol: impl Into<String>,
        owner: impl Into<String>,
        unit: impl Into<String>,
    ) -> Self {
        Self::new(ErrorKind::ForeignFact {
            symbol: symbol.into(),
            owner: owner.into(),
            unit: unit.into(),
        })
    }

    /// Creates an unknown unit error.
    #[must_use]
    pub fn unknown_unit(module: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnknownUnit(module.into()))
    }

    /// Creates a dependency cycle error from the modules forming the cycle.
    #[must_use]
    pub fn dependency_cycle(modules: &[String]) -> Self {
        Self::new(ErrorKind::DependencyCycle(modules.join(" -> ")))
    }

    /// Creates a snapshot encoding/decoding error.
    #[must_use]
    pub fn snapshot(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Snapshot(message.into()))
    }

    /// Creates an I/O error for the given path.
    #[must_use]
    pub fn io(path: impl Into<String>, source: &std::io::Error) -> Self {
        Self::new(ErrorKind::Io {
            path: path.into(),
            message: source.to_string(),
        })
    }

    /// Creates an invalid argument error.
    #[must_use]
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::InvalidArgument(message.into()))
    }
}

/// Categorized error kinds for pattern matching.
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// A fact was attached to a declaration owned by a different unit.
    #[error("cannot export a fact for {symbol}: it belongs to {owner}, not to the analyzed unit {unit}")]
    ForeignFact {
        /// The declaration the fact was meant for.
        symbol: String,
        /// The module that owns the declaration.
        owner: String,
        /// The module being analyzed.
        unit: String,
    },

    /// A unit referenced a dependency that is not part of the program.
    #[error("unknown unit: {0}")]
    UnknownUnit(String),

    /// The unit dependency graph contains a cycle.
    #[error("dependency cycle: {0}")]
    DependencyCycle(String),

    /// A program snapshot could not be encoded or decoded.
    #[error("snapshot error: {0}")]
    Snapshot(String),

    /// A file could not be read or written.
    #[error("i/o error on {path}: {message}")]
    Io {
        /// The path involved.
        path: String,
        /// The underlying error message.
        message: String,
    },

    /// Invalid command-line or API argument.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Internal error (should not happen).
    #[error("internal error: {0}")]
    Internal(String),
}

/// Context about where an error occurred.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Source file or snapshot path.
    pub source: Option<String>,
    /// Module being processed.
    pub module: Option<String>,
}

impl ErrorContext {
    /// Creates a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the source location.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Sets the module being processed.
    #[must_use]
    pub fn with_module(mut self, module: impl Into<String>) -> Self {
        self.module = Some(module.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "at {source}")?;
        }
        if let Some(module) = &self.module {
            if self.source.is_some() {
                write!(f, " ")?;
            }
            write!(f, "in module {module}")?;
        }
        Ok(())
    }
}
