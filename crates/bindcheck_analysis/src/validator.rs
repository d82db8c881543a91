//! Turning invocation sites into diagnostics.
//!
//! For every site: unresolved callees are reported when configured to, every
//! argument is checked for transportability, and resolved callees get their
//! argument count and types checked.

use bindcheck_foundation::{AnalysisConfig, Category, Diagnostic, DiagnosticSink, Position, ordinal};
use bindcheck_program::{Declaration, Unit, Universe};
use tracing::debug;

use crate::conventions::Conventions;
use crate::correlate::{Correlation, Correlator, InvocationSite, Resolution};
use crate::registry::Registry;
use crate::serializable::{Serializability, SerializabilityChecker};
use crate::signature::{SignatureChecker, SignatureFinding};

/// Counts from one validation run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ValidationSummary {
    /// Invocation sites checked.
    pub sites: usize,
    /// Sites whose callee resolved.
    pub resolved: usize,
    /// Sites whose callee did not resolve.
    pub unresolved: usize,
    /// Malformed invocations and zero-parameter callees.
    pub malformed: usize,
    /// Diagnostics emitted, trace output excluded.
    pub findings: usize,
}

/// Checks every invocation site of a unit against the registries.
#[derive(Debug)]
pub struct BindingValidator<'a> {
    universe: &'a Universe,
    unit: &'a Unit,
    registry: &'a Registry,
    dependencies: &'a [&'a Registry],
    conventions: &'a Conventions,
    config: &'a AnalysisConfig,
}

impl<'a> BindingValidator<'a> {
    /// Creates a validator for `unit`.
    #[must_use]
    pub fn new(
        universe: &'a Universe,
        unit: &'a Unit,
        registry: &'a Registry,
        dependencies: &'a [&'a Registry],
        conventions: &'a Conventions,
        config: &'a AnalysisConfig,
    ) -> Self {
        Self {
            universe,
            unit,
            registry,
            dependencies,
            conventions,
            config,
        }
    }

    /// Validates the unit, reporting into `sink`.
    pub fn validate(&self, sink: &mut dyn DiagnosticSink) -> ValidationSummary {
        let correlator = Correlator::new(
            self.universe,
            self.unit,
            self.registry,
            self.dependencies,
            self.conventions,
        );
        let mut out = Reporter {
            sink,
            summary: ValidationSummary::default(),
        };

        for correlation in correlator.correlate() {
            match correlation {
                Correlation::Malformed {
                    position,
                    form,
                    supplied,
                } => {
                    out.summary.malformed += 1;
                    out.report(
                        position,
                        Category::Malformed,
                        format!(
                            "Malformed call to `{form}` - expected at least {} arguments, got {supplied}",
                            form.min_args()
                        ),
                    );
                }
                Correlation::Site(site) => self.validate_site(&site, &mut out),
            }
        }

        if self.config.debug {
            let position = unit_position(self.unit);
            out.trace(
                position,
                format!(
                    "{} calls to workflows/activities checked",
                    out.summary.sites
                ),
            );
        }
        debug!(module = %self.unit.module, summary = ?out.summary, "validation finished");
        out.summary
    }

    fn validate_site(&self, site: &InvocationSite<'_>, out: &mut Reporter<'_>) {
        out.summary.sites += 1;
        let callee = site.callee_name();

        match &site.resolution {
            Resolution::Resolved(_) => out.summary.resolved += 1,
            Resolution::Unresolved(reason) => {
                out.summary.unresolved += 1;
                if self.config.report_unresolved {
                    out.report(
                        site.position.clone(),
                        Category::Unresolved,
                        format!(
                            "Could not resolve the type of the workflow/activity `{callee}`: {reason}"
                        ),
                    );
                }
            }
        }

        self.check_serializable(site, &callee, out);

        if let Resolution::Resolved(decl) = &site.resolution {
            if self.config.debug {
                out.trace(
                    site.position.clone(),
                    format!("Call to {} at {}", decl.qualified_name(), site.position),
                );
            }
            self.check_signature(site, decl, out);
        }
    }

    fn check_serializable(&self, site: &InvocationSite<'_>, callee: &str, out: &mut Reporter<'_>) {
        let checker = SerializabilityChecker::new(&self.universe.types, self.conventions);
        for (index, argument) in site.arguments.iter().enumerate() {
            let Some(ty) = argument.ty else {
                continue;
            };
            if let Serializability::NotSerializable(violation) = checker.check(ty) {
                out.report(
                    site.position.clone(),
                    Category::Serialization,
                    format!(
                        "{} argument to `{callee}` is not serializable: {violation} - this value \
                         will not be visible on the receiving end and will assume a default",
                        ordinal(index + 1)
                    ),
                );
            }
        }
    }

    fn check_signature(&self, site: &InvocationSite<'_>, decl: &Declaration, out: &mut Reporter<'_>) {
        if decl.params().is_empty() {
            out.summary.malformed += 1;
            out.report(
                site.position.clone(),
                Category::Malformed,
                format!(
                    "`{}` takes no parameters - a workflow/activity must take a context first",
                    decl.name
                ),
            );
            return;
        }

        let types = &self.universe.types;
        let checker = SignatureChecker::new(types, self.config);
        let args = site.argument_types();
        for finding in checker.check(decl, &args, site.spread) {
            let (category, message) = match finding {
                SignatureFinding::TooMany { expected, supplied } => (
                    Category::ArgumentCount,
                    format!(
                        "Too many arguments to `{}` - expected {expected}, got {supplied}",
                        decl.name
                    ),
                ),
                SignatureFinding::TooFew {
                    expected,
                    supplied,
                    at_least,
                } => (
                    Category::ArgumentCount,
                    format!(
                        "Too few arguments to `{}` - expected {}{expected}, got {supplied}",
                        decl.name,
                        if at_least { "at least " } else { "" }
                    ),
                ),
                SignatureFinding::Mismatch {
                    index,
                    expected,
                    actual,
                } => (
                    Category::ArgumentType,
                    format!(
                        "Type of {} argument to `{}` does not match the type of the \
                         workflow/activity: expected {}, got {}",
                        ordinal(index + 1),
                        decl.name,
                        types.display(expected),
                        types.display(actual)
                    ),
                ),
            };
            out.report(site.position.clone(), category, message);
        }
    }
}

/// Position used for unit-wide trace output.
pub(crate) fn unit_position(unit: &Unit) -> Position {
    Position {
        file: unit.first_file_name().to_string(),
        line: 1,
        column: 1,
    }
}

struct Reporter<'s> {
    sink: &'s mut dyn DiagnosticSink,
    summary: ValidationSummary,
}

impl Reporter<'_> {
    fn report(&mut self, position: Position, category: Category, message: String) {
        if category.is_finding() {
            self.summary.findings += 1;
        }
        self.sink.report(Diagnostic::new(position, category, message));
    }

    fn trace(&mut self, position: Position, message: String) {
        self.report(position, Category::Trace, message);
    }
}
