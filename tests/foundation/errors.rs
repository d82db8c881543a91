//! Integration tests for Error types
//!
//! Tests error construction, display, context, and error kinds.

use bindcheck_foundation::{Error, ErrorContext, ErrorKind};

// =============================================================================
// Error Construction
// =============================================================================

#[test]
fn error_foreign_fact() {
    let err = Error::foreign_fact("shared.Greet", "example.com/shared", "example.com/app");
    assert!(matches!(err.kind, ErrorKind::ForeignFact { .. }));
    let msg = format!("{err}");
    assert!(msg.contains("shared.Greet"));
    assert!(msg.contains("example.com/app"));
}

#[test]
fn error_unknown_unit() {
    let err = Error::unknown_unit("example.com/missing");
    assert!(matches!(err.kind, ErrorKind::UnknownUnit(_)));
    assert_eq!(format!("{err}"), "unknown unit: example.com/missing");
}

#[test]
fn error_snapshot() {
    let err = Error::snapshot("unexpected end of input");
    assert!(matches!(err.kind, ErrorKind::Snapshot(_)));
    assert!(format!("{err}").contains("unexpected end of input"));
}

#[test]
fn error_invalid_argument() {
    let err = Error::invalid_argument("module a appears more than once");
    assert!(matches!(err.kind, ErrorKind::InvalidArgument(_)));
}

// =============================================================================
// Error Context
// =============================================================================

#[test]
fn context_is_optional() {
    let err = Error::new(ErrorKind::Internal("boom".to_string()));
    assert!(err.context.is_none());
    assert_eq!(format!("{err}"), "internal error: boom");
}

#[test]
fn context_with_module_only() {
    let ctx = ErrorContext::new().with_module("example.com/app");
    assert_eq!(ctx.to_string(), "in module example.com/app");
}

#[test]
fn context_with_source_only() {
    let ctx = ErrorContext::new().with_source("program.json");
    assert_eq!(ctx.to_string(), "at program.json");
}

#[test]
fn error_is_std_error() {
    fn assert_error<E: std::error::Error>(_: &E) {}
    assert_error(&Error::unknown_unit("x"));
}
