//! Discovery of registered workflows and activities.
//!
//! The [`RegistryBuilder`] walks a unit once and records every call of a
//! registration method on a worker value. The resulting [`Registry`] is
//! read-only and cheap to clone, so it can be handed to dependent units.

use std::sync::Arc;

use bindcheck_foundation::{AnalysisConfig, Position};
use bindcheck_program::{
    CallCollector, Declaration, Expr, ExprKind, SourceFile, UnaryOp, Unit, Universe, is_exported,
};
use tracing::{debug, trace, warn};

use crate::conventions::{Conventions, RegistrationForm, Role};
use crate::facts::FactSet;

// =============================================================================
// Registration
// =============================================================================

/// One registration call, resolved to its target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Registration {
    /// The registration method used.
    pub form: RegistrationForm,
    /// The role the target is registered under.
    pub role: Role,
    /// The registered declaration.
    pub target: Arc<Declaration>,
    /// Additional name the target is registered under, from the options value.
    pub alias: Option<String>,
    /// Where the registration call is.
    pub position: Position,
}

// =============================================================================
// Registry
// =============================================================================

/// Registered declarations of one unit, by role, plus the alias table.
///
/// Lists keep registration order. Aliased declarations appear in their
/// role's list under the alias name as well as under their own.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Registry {
    module: String,
    workflows: im::Vector<Arc<Declaration>>,
    activities: im::Vector<Arc<Declaration>>,
    aliases: im::HashMap<String, Arc<Declaration>>,
}

impl Registry {
    /// Creates an empty registry for the unit `module`.
    #[must_use]
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            ..Self::default()
        }
    }

    /// The module whose registrations this holds.
    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Registered workflows, in registration order.
    #[must_use]
    pub fn workflows(&self) -> &im::Vector<Arc<Declaration>> {
        &self.workflows
    }

    /// Registered activities, in registration order.
    #[must_use]
    pub fn activities(&self) -> &im::Vector<Arc<Declaration>> {
        &self.activities
    }

    /// Registered declarations of one role.
    #[must_use]
    pub fn declarations(&self, role: Role) -> &im::Vector<Arc<Declaration>> {
        match role {
            Role::Workflow => &self.workflows,
            Role::Activity => &self.activities,
        }
    }

    /// Looks up an alias.
    #[must_use]
    pub fn alias(&self, name: &str) -> Option<&Arc<Declaration>> {
        self.aliases.get(name)
    }

    /// Returns the number of aliases.
    #[must_use]
    pub fn alias_count(&self) -> usize {
        self.aliases.len()
    }

    /// Returns the total number of registered declarations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.workflows.len() + self.activities.len()
    }

    /// Returns true if nothing was registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Records `decl` under `role`. Registering the same name twice is a no-op.
    pub fn register(&mut self, role: Role, decl: Arc<Declaration>) {
        let list = match role {
            Role::Workflow => &mut self.workflows,
            Role::Activity => &mut self.activities,
        };
        if !list.iter().any(|d| d.id == decl.id && d.name == decl.name) {
            list.push_back(decl);
        }
    }

    /// Records `decl` under `role` and binds it in the alias table.
    ///
    /// `decl` is expected to already carry the alias as its name.
    pub fn register_alias(&mut self, role: Role, decl: Arc<Declaration>) {
        self.aliases.insert(decl.name.clone(), Arc::clone(&decl));
        self.register(role, decl);
    }

    /// Finds a declaration by the name it was registered under.
    ///
    /// The alias table is consulted first, then the declarations of `role`
    /// in registration order.
    #[must_use]
    pub fn lookup(&self, role: Role, name: &str) -> Option<&Arc<Declaration>> {
        self.alias(name)
            .or_else(|| self.declarations(role).iter().find(|d| d.name == name))
    }
}

// =============================================================================
// RegistryBuilder
// =============================================================================

/// Everything the builder produces for one unit.
#[derive(Clone, Debug, Default)]
pub struct RegistryOutcome {
    /// Registered declarations and aliases.
    pub registry: Registry,
    /// Role facts exported for the unit's own declarations.
    pub facts: FactSet,
    /// Every accepted registration call, in source order.
    pub registrations: Vec<Registration>,
}

/// Walks a unit and collects its registrations.
///
/// Never emits diagnostics: targets that cannot be resolved are logged and
/// skipped.
#[derive(Debug)]
pub struct RegistryBuilder<'a> {
    universe: &'a Universe,
    unit: &'a Unit,
    conventions: &'a Conventions,
    config: &'a AnalysisConfig,
}

impl<'a> RegistryBuilder<'a> {
    /// Creates a builder for `unit`.
    #[must_use]
    pub fn new(
        universe: &'a Universe,
        unit: &'a Unit,
        conventions: &'a Conventions,
        config: &'a AnalysisConfig,
    ) -> Self {
        Self {
            universe,
            unit,
            conventions,
            config,
        }
    }

    /// Walks every file and builds the registry.
    #[must_use]
    pub fn build(&self) -> RegistryOutcome {
        let mut outcome = RegistryOutcome {
            registry: Registry::new(self.unit.module.clone()),
            facts: FactSet::new(self.unit.module.clone()),
            registrations: Vec::new(),
        };

        for file in &self.unit.files {
            for expr in CallCollector::collect_file(file) {
                if let Some(form) = self.classify(expr) {
                    self.register_call(file, expr, form, &mut outcome);
                }
            }
        }

        debug!(
            module = %self.unit.module,
            workflows = outcome.registry.workflows().len(),
            activities = outcome.registry.activities().len(),
            aliases = outcome.registry.alias_count(),
            "registry built"
        );
        outcome
    }

    /// Returns the registration form of a call on a worker value.
    #[must_use]
    pub fn classify(&self, expr: &Expr) -> Option<RegistrationForm> {
        let call = expr.as_call()?;
        let (base, selected) = call.callee.as_selector()?;
        let form = RegistrationForm::from_selector(selected.ident_name()?)?;
        let base_ty = self.unit.info.type_of(base)?;
        if self
            .universe
            .types
            .is_named_or_pointer_to(base_ty, &self.conventions.worker_type)
        {
            trace!(call = %expr, form = %form, "registration call");
            Some(form)
        } else {
            None
        }
    }

    fn register_call(
        &self,
        file: &SourceFile,
        expr: &Expr,
        form: RegistrationForm,
        outcome: &mut RegistryOutcome,
    ) {
        let Some(call) = expr.as_call() else {
            return;
        };
        let position = expr.span.in_file(file.name.clone());
        let Some(target) = call.args.first() else {
            warn!(%position, form = %form, "registration without a target, skipping");
            return;
        };
        let role = form.role();
        let alias = if form.has_options() {
            call.args.get(1).and_then(|opts| self.alias_name(form, opts))
        } else {
            None
        };

        let targets = self.resolve_targets(target);
        if targets.is_empty() {
            warn!(
                %position,
                target = %target,
                "cannot determine the function being registered, skipping"
            );
            return;
        }
        let from_struct = !self.is_direct_reference(target);

        for decl in targets {
            // Options on a struct registration name a prefix for each method.
            let alias = alias.as_ref().map(|name| {
                if from_struct {
                    format!("{name}{}", decl.name)
                } else {
                    name.clone()
                }
            });

            if self.config.debug {
                debug!(
                    %position,
                    role = %role,
                    target = %decl.qualified_name(),
                    alias = alias.as_deref().unwrap_or(""),
                    "registered"
                );
            }

            if let Err(e) = outcome.facts.export(&decl, role) {
                warn!(%position, error = %e, "fact export failed");
            }

            outcome.registry.register(role, Arc::clone(&decl));
            if let Some(name) = &alias {
                outcome
                    .registry
                    .register_alias(role, Arc::new(decl.renamed(name.clone())));
            }
            outcome.registrations.push(Registration {
                form,
                role,
                target: decl,
                alias,
                position: position.clone(),
            });
        }
    }

    fn is_direct_reference(&self, target: &Expr) -> bool {
        self.unit.referenced_decl(target).is_some()
    }

    /// Resolves the registered argument to one declaration, or to the
    /// exported methods of a struct value.
    fn resolve_targets(&self, target: &Expr) -> Vec<Arc<Declaration>> {
        if target.is_func_lit() {
            return Vec::new();
        }
        if let Some(id) = self.unit.referenced_decl(target) {
            return self.universe.decl(id).cloned().into_iter().collect();
        }
        let Some(ty) = self.unit.info.type_of(target) else {
            return Vec::new();
        };
        self.universe
            .types
            .methods(ty)
            .iter()
            .filter(|m| is_exported(&m.name))
            .filter_map(|m| m.decl)
            .filter_map(|id| self.universe.decl(id).cloned())
            .collect()
    }

    /// Extracts the registration name from an options value, if it is a
    /// literal of the expected options type with a non-empty name.
    fn alias_name(&self, form: RegistrationForm, opts: &Expr) -> Option<String> {
        let expected = self.conventions.options_type(form)?;
        let types = &self.universe.types;
        let ty = self.unit.info.type_of(opts)?;
        if !types.is_named_or_pointer_to(ty, expected) {
            trace!(options = %opts, expected, "options value has an unexpected type");
            return None;
        }
        let field = &self.conventions.alias_field;
        types.field(ty, field)?;

        let mut literal = opts.unparen();
        if let ExprKind::Unary {
            op: UnaryOp::Addr,
            operand,
        } = &literal.kind
        {
            literal = operand.unparen();
        }
        let ExprKind::Composite { elements, .. } = &literal.kind else {
            debug!(options = %opts, "options value is not a literal, no alias");
            return None;
        };
        let name = elements
            .iter()
            .find(|e| e.key.as_ref().and_then(Expr::ident_name) == Some(field.as_str()))
            .and_then(|e| e.value.string_literal())
            .filter(|name| !name.is_empty());
        if name.is_none() {
            debug!(options = %opts, "options literal has no name, no alias");
        }
        name.map(str::to_string)
    }
}
