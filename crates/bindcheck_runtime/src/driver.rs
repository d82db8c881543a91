//! Multi-unit driver.
//!
//! Units are analyzed in dependency order. Each unit sees the registries of
//! every unit it depends on, directly or not, nearest first.

use std::collections::{HashMap, HashSet, VecDeque};

use bindcheck_analysis::{Analyzer, Conventions, Registry, UnitAnalysis};
use bindcheck_foundation::{AnalysisConfig, Diagnostic, Error, ErrorContext, Result};
use bindcheck_program::Unit;
use tracing::info;

use crate::snapshot::ProgramSnapshot;

/// Everything produced for one snapshot.
#[derive(Clone, Debug, Default)]
pub struct DriverReport {
    /// Per-unit results, in analysis order.
    pub units: Vec<UnitAnalysis>,
    /// Every diagnostic, in the order it was reported.
    pub diagnostics: Vec<Diagnostic>,
}

impl DriverReport {
    /// Diagnostics that describe problems, trace output excluded.
    pub fn findings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.category.is_finding())
    }

    /// Returns true if any finding was reported.
    #[must_use]
    pub fn has_findings(&self) -> bool {
        self.findings().next().is_some()
    }

    /// Looks up the result for a module.
    #[must_use]
    pub fn unit(&self, module: &str) -> Option<&UnitAnalysis> {
        self.units.iter().find(|u| u.module == module)
    }
}

/// Runs the analyzer over every unit of a snapshot.
#[derive(Clone, Debug, Default)]
pub struct Driver {
    analyzer: Analyzer,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Done,
}

impl Driver {
    /// Creates a driver with the default conventions.
    #[must_use]
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            analyzer: Analyzer::new(config),
        }
    }

    /// Replaces the framework conventions.
    #[must_use]
    pub fn with_conventions(mut self, conventions: Conventions) -> Self {
        self.analyzer = self.analyzer.with_conventions(conventions);
        self
    }

    /// Analyzes every unit in `snapshot`.
    ///
    /// # Errors
    ///
    /// Returns an error if two units share a module path, a unit depends on a
    /// module that is not in the snapshot, or the dependencies form a cycle.
    pub fn run(&self, snapshot: &ProgramSnapshot) -> Result<DriverReport> {
        let units = &snapshot.units;
        let index = module_index(units)?;
        let order = analysis_order(units, &index)?;

        let mut analyses: Vec<Option<UnitAnalysis>> = vec![None; units.len()];
        let mut diagnostics = Vec::new();
        for &i in &order {
            let upstream = transitive_dependencies(units, &index, i);
            let analysis = {
                let registries: Vec<&Registry> = upstream
                    .iter()
                    .filter_map(|&j| analyses[j].as_ref().map(|a| &a.registry))
                    .collect();
                self.analyzer
                    .analyze(&snapshot.universe, &units[i], &registries, &mut diagnostics)
            };
            analyses[i] = Some(analysis);
        }

        let report = DriverReport {
            units: order.iter().filter_map(|&i| analyses[i].take()).collect(),
            diagnostics,
        };
        info!(
            units = report.units.len(),
            findings = report.findings().count(),
            "snapshot analyzed"
        );
        Ok(report)
    }
}

fn module_index(units: &[Unit]) -> Result<HashMap<&str, usize>> {
    let mut index = HashMap::with_capacity(units.len());
    for (i, unit) in units.iter().enumerate() {
        if index.insert(unit.module.as_str(), i).is_some() {
            return Err(Error::invalid_argument(format!(
                "module {} appears more than once",
                unit.module
            )));
        }
    }
    Ok(index)
}

/// Orders units so that every unit comes after its dependencies.
///
/// Ties keep the snapshot's order.
///
/// # Errors
///
/// Returns an error on an unknown dependency or a cycle.
pub fn dependency_order(units: &[Unit]) -> Result<Vec<usize>> {
    let index = module_index(units)?;
    analysis_order(units, &index)
}

fn analysis_order(units: &[Unit], index: &HashMap<&str, usize>) -> Result<Vec<usize>> {
    let mut marks = vec![Mark::Unvisited; units.len()];
    let mut stack = Vec::new();
    let mut order = Vec::with_capacity(units.len());
    for i in 0..units.len() {
        visit(i, units, index, &mut marks, &mut stack, &mut order)?;
    }
    Ok(order)
}

fn visit(
    i: usize,
    units: &[Unit],
    index: &HashMap<&str, usize>,
    marks: &mut [Mark],
    stack: &mut Vec<usize>,
    order: &mut Vec<usize>,
) -> Result<()> {
    match marks[i] {
        Mark::Done => return Ok(()),
        Mark::Visiting => {
            let start = stack.iter().position(|&s| s == i).unwrap_or(0);
            let mut cycle: Vec<String> = stack[start..]
                .iter()
                .map(|&s| units[s].module.clone())
                .collect();
            cycle.push(units[i].module.clone());
            return Err(Error::dependency_cycle(&cycle));
        }
        Mark::Unvisited => {}
    }

    marks[i] = Mark::Visiting;
    stack.push(i);
    for dep in &units[i].dependencies {
        let &j = index.get(dep.as_str()).ok_or_else(|| {
            Error::unknown_unit(dep.clone())
                .with_context(ErrorContext::new().with_module(units[i].module.clone()))
        })?;
        visit(j, units, index, marks, stack, order)?;
    }
    stack.pop();
    marks[i] = Mark::Done;
    order.push(i);
    Ok(())
}

/// Dependencies of unit `i`, breadth first, each once.
fn transitive_dependencies(units: &[Unit], index: &HashMap<&str, usize>, i: usize) -> Vec<usize> {
    let mut seen = HashSet::from([i]);
    let mut queue = VecDeque::from([i]);
    let mut out = Vec::new();
    while let Some(current) = queue.pop_front() {
        for dep in &units[current].dependencies {
            if let Some(&j) = index.get(dep.as_str()) {
                if seen.insert(j) {
                    out.push(j);
                    queue.push_back(j);
                }
            }
        }
    }
    out
}
