//! Configuration for an analysis run.

/// Flags that shape an analysis run.
///
/// Built once before any traversal starts and passed by reference into every
/// component; nothing mutates it while units are being analyzed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct AnalysisConfig {
    /// Emit trace diagnostics (registry counts, resolved callees).
    pub debug: bool,

    /// Report callees that cannot be resolved instead of silently skipping them.
    pub report_unresolved: bool,

    /// Require pointer and value types to match exactly.
    pub strict_pointer_match: bool,
}

impl AnalysisConfig {
    /// Creates the default configuration: all flags off.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the strictest configuration: every check reported, no relaxations.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            debug: false,
            report_unresolved: true,
            strict_pointer_match: true,
        }
    }

    /// Builder method to enable/disable trace diagnostics.
    #[must_use]
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Builder method to enable/disable unresolved-callee reporting.
    #[must_use]
    pub fn with_report_unresolved(mut self, report: bool) -> Self {
        self.report_unresolved = report;
        self
    }

    /// Builder method to enable/disable strict pointer matching.
    #[must_use]
    pub fn with_strict_pointer_match(mut self, strict: bool) -> Self {
        self.strict_pointer_match = strict;
        self
    }
}
