//! One analysis pass over one unit.
//!
//! The pass builds the unit's registry, then validates every invocation site
//! against it and the registries of the unit's dependencies.

use bindcheck_foundation::{AnalysisConfig, Category, Diagnostic, DiagnosticSink};
use bindcheck_program::{Unit, Universe};
use tracing::{debug, info_span};

use crate::conventions::Conventions;
use crate::facts::FactSet;
use crate::registry::{Registration, Registry, RegistryBuilder};
use crate::validator::{BindingValidator, ValidationSummary, unit_position};

/// What one pass produced for a unit.
#[derive(Clone, Debug)]
pub struct UnitAnalysis {
    /// Module path of the unit.
    pub module: String,
    /// Declarations registered by the unit.
    pub registry: Registry,
    /// Role facts exported by the unit.
    pub facts: FactSet,
    /// Every registration call seen, in source order.
    pub registrations: Vec<Registration>,
    /// Validation counts.
    pub summary: ValidationSummary,
}

/// Runs registry building and validation with a fixed configuration.
#[derive(Clone, Debug, Default)]
pub struct Analyzer {
    conventions: Conventions,
    config: AnalysisConfig,
}

impl Analyzer {
    /// Creates an analyzer using the Temporal conventions.
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            conventions: Conventions::default(),
            config,
        }
    }

    /// Replaces the framework conventions.
    #[must_use]
    pub fn with_conventions(mut self, conventions: Conventions) -> Self {
        self.conventions = conventions;
        self
    }

    /// Returns the conventions in use.
    #[must_use]
    pub fn conventions(&self) -> &Conventions {
        &self.conventions
    }

    /// Returns the configuration in use.
    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Analyzes `unit`.
    ///
    /// `dependencies` are the registries of the units `unit` imports, already
    /// analyzed. Findings go to `sink`; nothing here fails.
    pub fn analyze(
        &self,
        universe: &Universe,
        unit: &Unit,
        dependencies: &[&Registry],
        sink: &mut dyn DiagnosticSink,
    ) -> UnitAnalysis {
        let _span = info_span!("analyze", module = %unit.module).entered();

        let outcome = RegistryBuilder::new(universe, unit, &self.conventions, &self.config).build();
        if self.config.debug {
            sink.report(Diagnostic::new(
                unit_position(unit),
                Category::Trace,
                format!(
                    "{} workflows, {} activities, {} aliases registered",
                    outcome.registry.workflows().len(),
                    outcome.registry.activities().len(),
                    outcome.registry.alias_count()
                ),
            ));
        }

        let summary = BindingValidator::new(
            universe,
            unit,
            &outcome.registry,
            dependencies,
            &self.conventions,
            &self.config,
        )
        .validate(sink);

        debug!(
            registered = outcome.registry.len(),
            sites = summary.sites,
            findings = summary.findings,
            "unit analyzed"
        );

        UnitAnalysis {
            module: unit.module.clone(),
            registry: outcome.registry,
            facts: outcome.facts,
            registrations: outcome.registrations,
            summary,
        }
    }
}
