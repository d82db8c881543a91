//! Program-wide and per-unit tables.
//!
//! The [`Universe`] holds what every unit shares (types and declarations);
//! a [`Unit`] holds one module's files and the loader's per-expression
//! resolution results.

use std::collections::HashMap;
use std::sync::Arc;

use bindcheck_foundation::Span;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ast::{Expr, ExprId, SourceFile};
use crate::decl::{DeclId, Declaration};
use crate::scope::{Object, ScopeId, ScopeTree};
use crate::types::{Method, Signature, TypeId, TypeTable};

// =============================================================================
// Universe
// =============================================================================

/// Types and declarations of the whole program load.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Universe {
    /// All types.
    pub types: TypeTable,
    decls: Vec<Arc<Declaration>>,
}

impl Universe {
    /// Creates a universe holding only the predeclared types.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a declaration.
    #[must_use]
    pub fn decl(&self, id: DeclId) -> Option<&Arc<Declaration>> {
        self.decls.get(id.0 as usize)
    }

    /// Iterates over all declarations.
    pub fn decls(&self) -> impl Iterator<Item = &Arc<Declaration>> {
        self.decls.iter()
    }

    /// Declares a function.
    pub fn add_func(
        &mut self,
        module: impl Into<String>,
        name: impl Into<String>,
        signature: Signature,
    ) -> DeclId {
        self.add_decl(module.into(), name.into(), None, signature, Span::default())
    }

    /// Declares a method on the named type `receiver` and attaches it to the type.
    pub fn add_method(
        &mut self,
        receiver: TypeId,
        pointer_receiver: bool,
        name: impl Into<String>,
        signature: Signature,
    ) -> DeclId {
        let name = name.into();
        let module = self
            .types
            .as_named(receiver)
            .map(|n| n.module.clone())
            .unwrap_or_default();
        let recv_ty = if pointer_receiver {
            self.types.pointer(receiver)
        } else {
            receiver
        };
        let id = self.add_decl(
            module,
            name.clone(),
            Some(recv_ty),
            signature,
            Span::default(),
        );
        self.types.add_method(
            receiver,
            Method {
                name,
                pointer_receiver,
                decl: Some(id),
            },
        );
        id
    }

    /// Sets where a declaration is defined.
    pub fn set_decl_span(&mut self, id: DeclId, span: Span) {
        if let Some(decl) = self.decls.get_mut(id.0 as usize) {
            Arc::make_mut(decl).span = span;
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn add_decl(
        &mut self,
        module: String,
        name: String,
        receiver: Option<TypeId>,
        signature: Signature,
        span: Span,
    ) -> DeclId {
        let id = DeclId(self.decls.len() as u32);
        let ty = self.types.signature(signature.clone());
        self.decls.push(Arc::new(Declaration {
            id,
            name,
            module,
            receiver,
            signature,
            ty,
            span,
        }));
        id
    }
}

// =============================================================================
// TypeInfo
// =============================================================================

/// The loader's resolution results for one unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TypeInfo {
    /// Static type of each typed expression.
    pub types: HashMap<ExprId, TypeId>,
    /// Object each identifier refers to.
    pub uses: HashMap<ExprId, Object>,
    /// Innermost scope enclosing each identifier.
    pub scopes: HashMap<ExprId, ScopeId>,
}

impl TypeInfo {
    /// Returns the static type of an expression, if known.
    #[must_use]
    pub fn type_of(&self, expr: &Expr) -> Option<TypeId> {
        self.types.get(&expr.id).copied()
    }

    /// Returns the object an identifier refers to, if known.
    #[must_use]
    pub fn object_of(&self, expr: &Expr) -> Option<&Object> {
        self.uses.get(&expr.id)
    }

    /// Returns the innermost scope enclosing an identifier, if known.
    #[must_use]
    pub fn scope_of(&self, expr: &Expr) -> Option<ScopeId> {
        self.scopes.get(&expr.id).copied()
    }
}

// =============================================================================
// Unit
// =============================================================================

/// One compilation unit.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Unit {
    /// Module path of this unit.
    pub module: String,
    /// Source files, in load order.
    pub files: Vec<SourceFile>,
    /// Resolution results.
    pub info: TypeInfo,
    /// Lexical scopes.
    pub scopes: ScopeTree,
    /// Module paths of the units this one imports.
    pub dependencies: Vec<String>,
}

impl Unit {
    /// Creates an empty unit.
    #[must_use]
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            ..Self::default()
        }
    }

    /// Resolves an identifier through its enclosing scope chain.
    ///
    /// Falls back to the recorded object when the loader did not record a
    /// scope for the identifier.
    #[must_use]
    pub fn resolve_in_scope(&self, ident: &Expr) -> Option<&Object> {
        let name = ident.ident_name()?;
        match self.info.scope_of(ident) {
            Some(scope) => self.scopes.lookup(scope, name).map(|(_, object)| object),
            None => self.info.object_of(ident),
        }
    }

    /// Returns the declaration an expression names, if it names a function.
    #[must_use]
    pub fn referenced_decl(&self, expr: &Expr) -> Option<DeclId> {
        let ident = expr.identifier()?;
        self.info.object_of(ident).and_then(Object::as_func)
    }

    /// Returns the name of the first file, used to place unit-wide diagnostics.
    #[must_use]
    pub fn first_file_name(&self) -> &str {
        self.files.first().map_or(self.module.as_str(), |f| f.name.as_str())
    }
}
