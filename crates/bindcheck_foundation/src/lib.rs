//! Errors, spans, diagnostics, and configuration for bindcheck.
//!
//! This crate provides:
//! - [`Error`] - Rich error types with context
//! - [`Span`] / [`Position`] - Source locations
//! - [`Diagnostic`] - Findings handed to a [`DiagnosticSink`]
//! - [`AnalysisConfig`] - Run-wide flags, fixed before any traversal begins

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod diagnostic;
pub mod error;
pub mod span;

pub use config::AnalysisConfig;
pub use diagnostic::{Category, Diagnostic, DiagnosticSink, ordinal};
pub use error::{Error, ErrorContext, ErrorKind};
pub use span::{Position, Span};

/// Result type alias using bindcheck's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
