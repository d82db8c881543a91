//! bindcheck - Static checker for workflow/activity bindings
//!
//! This crate re-exports all layers of the bindcheck system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: bindcheck_runtime     — Snapshots, multi-unit driver, CLI
//! Layer 2: bindcheck_analysis    — Registry builder, correlator, checkers
//! Layer 1: bindcheck_program     — Types, declarations, syntax trees, scopes
//! Layer 0: bindcheck_foundation  — Errors, spans, diagnostics, configuration
//! ```

pub use bindcheck_analysis as analysis;
pub use bindcheck_foundation as foundation;
pub use bindcheck_program as program;
pub use bindcheck_runtime as runtime;
