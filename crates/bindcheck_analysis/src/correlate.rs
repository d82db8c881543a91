//! Invocation sites and the declarations they target.
//!
//! The [`Correlator`] finds calls that start a workflow or schedule an
//! activity, and resolves each callee to a registered [`Declaration`]. The
//! result is a [`Resolution`]: resolution is best-effort and the unresolved
//! case carries its reason instead of failing.

use std::fmt;
use std::sync::Arc;

use bindcheck_foundation::Position;
use bindcheck_program::{CallCollector, Declaration, Expr, Object, TypeId, Unit, Universe};
use tracing::{debug, trace};

use crate::conventions::{Conventions, InvocationForm, Receiver};
use crate::registry::Registry;

// =============================================================================
// Resolution
// =============================================================================

/// Why a callee could not be resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UnresolvedReason {
    /// A literal name that no registry knows.
    UnknownName(String),
    /// The callee is computed at run time (a variable, a closure, an expression).
    NotStatic,
    /// The loader recorded no object for the callee.
    UnknownObject,
}

impl fmt::Display for UnresolvedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownName(name) => write!(f, "no workflow or activity is registered as {name:?}"),
            Self::NotStatic => f.write_str("the callee is not a static reference"),
            Self::UnknownObject => f.write_str("the callee's declaration is unknown"),
        }
    }
}

/// The declaration an invocation targets, if it can be determined.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// The callee resolved to this declaration.
    Resolved(Arc<Declaration>),
    /// The callee could not be resolved.
    Unresolved(UnresolvedReason),
}

impl Resolution {
    /// Returns true for resolved callees.
    #[must_use]
    pub const fn is_resolved(&self) -> bool {
        matches!(self, Self::Resolved(_))
    }

    /// Returns the resolved declaration.
    #[must_use]
    pub fn declaration(&self) -> Option<&Arc<Declaration>> {
        match self {
            Self::Resolved(decl) => Some(decl),
            Self::Unresolved(_) => None,
        }
    }
}

// =============================================================================
// Invocation Sites
// =============================================================================

/// An argument forwarded to the callee.
#[derive(Clone, Debug)]
pub struct CallArgument<'a> {
    /// The argument expression.
    pub expr: &'a Expr,
    /// Its static type, if known.
    pub ty: Option<TypeId>,
}

/// A call that invokes a workflow or activity.
#[derive(Clone, Debug)]
pub struct InvocationSite<'a> {
    /// Where the call is.
    pub position: Position,
    /// How the callee is invoked.
    pub form: InvocationForm,
    /// The callee expression as written.
    pub callee: &'a Expr,
    /// The declaration the callee resolves to.
    pub resolution: Resolution,
    /// Arguments forwarded to the callee.
    pub arguments: Vec<CallArgument<'a>>,
    /// Whether the last argument is spread.
    pub spread: bool,
}

impl InvocationSite<'_> {
    /// Name used for the callee in diagnostics.
    #[must_use]
    pub fn callee_name(&self) -> String {
        match &self.resolution {
            Resolution::Resolved(decl) => decl.name.clone(),
            Resolution::Unresolved(_) => self.callee.to_string(),
        }
    }

    /// Static types of the forwarded arguments.
    #[must_use]
    pub fn argument_types(&self) -> Vec<Option<TypeId>> {
        self.arguments.iter().map(|a| a.ty).collect()
    }
}

/// A call recognized as an invocation.
#[derive(Clone, Debug)]
pub enum Correlation<'a> {
    /// A well-formed invocation.
    Site(InvocationSite<'a>),
    /// An invocation with too few arguments to contain a callee.
    Malformed {
        /// Where the call is.
        position: Position,
        /// The invocation form.
        form: InvocationForm,
        /// Number of arguments the call has.
        supplied: usize,
    },
}

// =============================================================================
// Correlator
// =============================================================================

/// Finds invocation sites in a unit and resolves their callees.
#[derive(Debug)]
pub struct Correlator<'a> {
    universe: &'a Universe,
    unit: &'a Unit,
    registry: &'a Registry,
    dependencies: &'a [&'a Registry],
    conventions: &'a Conventions,
}

impl<'a> Correlator<'a> {
    /// Creates a correlator for `unit`.
    ///
    /// `registry` is the unit's own registry; `dependencies` are the
    /// registries of the units it imports, searched in order.
    #[must_use]
    pub fn new(
        universe: &'a Universe,
        unit: &'a Unit,
        registry: &'a Registry,
        dependencies: &'a [&'a Registry],
        conventions: &'a Conventions,
    ) -> Self {
        Self {
            universe,
            unit,
            registry,
            dependencies,
            conventions,
        }
    }

    /// Finds every invocation in the unit, in source order.
    #[must_use]
    pub fn correlate(&self) -> Vec<Correlation<'a>> {
        let unit: &'a Unit = self.unit;
        let mut out = Vec::new();
        for file in &unit.files {
            for expr in CallCollector::collect_file(file) {
                if let Some(correlation) = self.correlate_call(&file.name, expr) {
                    out.push(correlation);
                }
            }
        }
        out
    }

    /// Recognizes one call as an invocation.
    #[must_use]
    pub fn correlate_call(&self, file: &str, expr: &'a Expr) -> Option<Correlation<'a>> {
        let form = self.classify(expr)?;
        let call = expr.as_call()?;
        let position = expr.span.in_file(file);

        if call.args.len() < form.min_args() {
            return Some(Correlation::Malformed {
                position,
                form,
                supplied: call.args.len(),
            });
        }

        let callee = &call.args[form.callee_index()];
        let resolution = self.resolve_callee(form, callee);
        match &resolution {
            Resolution::Resolved(decl) => {
                debug!(%position, callee = %decl.qualified_name(), "resolved invocation");
            }
            Resolution::Unresolved(reason) => {
                debug!(%position, callee = %callee, %reason, "unresolved invocation");
            }
        }

        let arguments = call.args[form.first_arg_index()..]
            .iter()
            .map(|arg| CallArgument {
                expr: arg,
                ty: self.unit.info.type_of(arg),
            })
            .collect();

        Some(Correlation::Site(InvocationSite {
            position,
            form,
            callee,
            resolution,
            arguments,
            spread: call.spread,
        }))
    }

    /// Returns the invocation form of a call, if it is one.
    #[must_use]
    pub fn classify(&self, expr: &Expr) -> Option<InvocationForm> {
        let call = expr.as_call()?;
        let (base, selected) = call.callee.as_selector()?;
        let form = InvocationForm::from_selector(selected.ident_name()?)?;

        let matched = match form.receiver() {
            Receiver::Client => self.unit.info.type_of(base).is_some_and(|ty| {
                self.universe
                    .types
                    .is_named_or_pointer_to(ty, &self.conventions.client_type)
            }),
            Receiver::WorkflowModule => base.ident_name().is_some()
                && self
                    .unit
                    .resolve_in_scope(base)
                    .and_then(Object::module_path)
                    == Some(self.conventions.workflow_module.as_str()),
        };
        if matched {
            trace!(call = %expr, form = %form, "invocation call");
        }
        matched.then_some(form)
    }

    /// Resolves a callee expression to a declaration.
    #[must_use]
    pub fn resolve_callee(&self, form: InvocationForm, callee: &Expr) -> Resolution {
        if let Some(name) = callee.string_literal() {
            return self
                .lookup_name(form, name)
                .map_or_else(
                    || Resolution::Unresolved(UnresolvedReason::UnknownName(name.to_string())),
                    Resolution::Resolved,
                );
        }
        if callee.is_func_lit() {
            return Resolution::Unresolved(UnresolvedReason::NotStatic);
        }
        let Some(ident) = callee.identifier() else {
            return Resolution::Unresolved(UnresolvedReason::NotStatic);
        };
        match self.unit.info.object_of(ident) {
            Some(Object::Func(id)) => self.universe.decl(*id).map_or(
                Resolution::Unresolved(UnresolvedReason::UnknownObject),
                |decl| Resolution::Resolved(Arc::clone(decl)),
            ),
            Some(_) => Resolution::Unresolved(UnresolvedReason::NotStatic),
            None => Resolution::Unresolved(UnresolvedReason::UnknownObject),
        }
    }

    /// Looks a literal name up in this unit's registry, then in each dependency's.
    fn lookup_name(&self, form: InvocationForm, name: &str) -> Option<Arc<Declaration>> {
        let role = form.role();
        std::iter::once(self.registry)
            .chain(self.dependencies.iter().copied())
            .find_map(|registry| registry.lookup(role, name))
            .cloned()
    }
}
