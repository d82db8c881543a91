//! Diagnostics produced by the analysis.
//!
//! A diagnostic is a position plus an already-formatted message. Nothing that
//! is reported here ever stops the analysis.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::span::Position;

/// What kind of finding a diagnostic describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Category {
    /// Wrong number of arguments for the resolved declaration.
    ArgumentCount,
    /// An argument's type does not match the declared parameter.
    ArgumentType,
    /// An argument cannot cross the serialization boundary intact.
    Serialization,
    /// The callee of an invocation could not be resolved.
    Unresolved,
    /// A registration or invocation does not follow its own grammar.
    Malformed,
    /// Internal trace output, only produced in debug mode.
    Trace,
}

impl Category {
    /// Returns true if this category describes a problem in the analyzed program.
    #[must_use]
    pub const fn is_finding(self) -> bool {
        !matches!(self, Self::Trace)
    }

    /// Short stable name, used in machine-readable output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ArgumentCount => "argument-count",
            Self::ArgumentType => "argument-type",
            Self::Serialization => "serialization",
            Self::Unresolved => "unresolved",
            Self::Malformed => "malformed",
            Self::Trace => "trace",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding, ready to be shown to a user.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Diagnostic {
    /// Where the finding applies.
    pub position: Position,
    /// What kind of finding this is.
    pub category: Category,
    /// The formatted message.
    pub message: String,
}

impl Diagnostic {
    /// Creates a new diagnostic.
    #[must_use]
    pub fn new(position: Position, category: Category, message: impl Into<String>) -> Self {
        Self {
            position,
            category,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.position, self.message)
    }
}

/// The reporting collaborator that accepts diagnostics.
pub trait DiagnosticSink {
    /// Accepts one diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// Renders a 1-based position as an English ordinal (`1st`, `2nd`, `11th`, ...).
#[must_use]
pub fn ordinal(n: usize) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let suffix = match (n % 10, n % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    };
    format!("{n}{suffix}")
}
