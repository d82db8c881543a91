//! Registry building, call-site correlation, and binding checks for bindcheck.
//!
//! This crate provides:
//! - [`RegistryBuilder`] - Finds worker registrations and records them in a [`Registry`]
//! - [`Correlator`] - Recognizes invocation sites and resolves their callees
//! - [`SignatureChecker`] - Argument count and type checks
//! - [`SerializabilityChecker`] - Transportability of argument types
//! - [`BindingValidator`] - Turns all of the above into diagnostics
//! - [`Analyzer`] - One complete pass over one unit

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod conventions;
pub mod correlate;
pub mod facts;
pub mod pipeline;
pub mod registry;
pub mod serializable;
pub mod signature;
pub mod validator;

pub use conventions::{Conventions, InvocationForm, Receiver, RegistrationForm, Role};
pub use correlate::{
    CallArgument, Correlation, Correlator, InvocationSite, Resolution, UnresolvedReason,
};
pub use facts::{FactSet, RoleFact};
pub use pipeline::{Analyzer, UnitAnalysis};
pub use registry::{Registration, Registry, RegistryBuilder, RegistryOutcome};
pub use serializable::{Reason, Serializability, SerializabilityChecker, Violation};
pub use signature::{SignatureChecker, SignatureFinding};
pub use validator::{BindingValidator, ValidationSummary};
