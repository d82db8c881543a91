//! Programmatic construction of units.
//!
//! [`UnitBuilder`] plays the part of the loader: it allocates expression ids,
//! tracks lexical scopes, and records the type and object of every node it
//! creates, resolving identifiers and selectors against the [`Universe`] the
//! same way the host type checker would. Front-ends that already have this
//! information can fill a [`Unit`] directly instead.

use bindcheck_foundation::Span;

use crate::ast::{
    CallExpr, Element, Expr, ExprId, ExprKind, FuncItem, Import, LitKind, Literal, SourceFile,
    Stmt, UnaryOp,
};
use crate::decl::DeclId;
use crate::scope::{Object, ScopeId};
use crate::types::{BasicKind, TypeId, TypeKind};
use crate::unit::{Unit, Universe};

/// Builds one [`Unit`] against a [`Universe`].
#[derive(Debug)]
pub struct UnitBuilder<'u> {
    universe: &'u Universe,
    unit: Unit,
    file: SourceFile,
    file_scope: ScopeId,
    package_scope: ScopeId,
    scope_stack: Vec<ScopeId>,
    next_expr: u32,
    span: Span,
}

impl<'u> UnitBuilder<'u> {
    /// Starts a unit for `module` whose first file is `file_name`.
    ///
    /// The package scope binds every function and named type the universe
    /// declares for `module`.
    #[must_use]
    pub fn new(universe: &'u Universe, module: impl Into<String>, file_name: impl Into<String>) -> Self {
        let mut unit = Unit::new(module);
        let package_scope = unit.scopes.add(None);

        for decl in universe.decls().filter(|d| d.module == unit.module && !d.is_method()) {
            unit.scopes
                .insert(package_scope, decl.name.clone(), Object::Func(decl.id));
        }
        for (id, kind) in universe.types.iter() {
            if let TypeKind::Named(named) = kind {
                if named.module == unit.module {
                    unit.scopes
                        .insert(package_scope, named.name.clone(), Object::TypeName(id));
                }
            }
        }

        let file_scope = unit.scopes.add(Some(package_scope));
        Self {
            universe,
            unit,
            file: SourceFile {
                name: file_name.into(),
                imports: Vec::new(),
                functions: Vec::new(),
            },
            file_scope,
            package_scope,
            scope_stack: vec![file_scope],
            next_expr: 0,
            span: Span::at_start(),
        }
    }

    /// Closes the current file and starts another.
    pub fn file(&mut self, name: impl Into<String>) -> &mut Self {
        let next = SourceFile {
            name: name.into(),
            imports: Vec::new(),
            functions: Vec::new(),
        };
        let done = std::mem::replace(&mut self.file, next);
        self.unit.files.push(done);
        self.file_scope = self.unit.scopes.add(Some(self.package_scope));
        self.scope_stack = vec![self.file_scope];
        self
    }

    /// Sets the position of the nodes created next.
    pub fn at(&mut self, line: u32, column: u32) -> &mut Self {
        self.span = Span::at(line, column);
        self
    }

    /// Imports a module under its default name.
    pub fn import(&mut self, path: impl Into<String>) -> &mut Self {
        self.add_import(None, path.into())
    }

    /// Imports a module under an explicit local name.
    pub fn import_as(&mut self, alias: impl Into<String>, path: impl Into<String>) -> &mut Self {
        self.add_import(Some(alias.into()), path.into())
    }

    fn add_import(&mut self, alias: Option<String>, path: String) -> &mut Self {
        let import = Import {
            alias,
            path,
            span: self.span,
        };
        let name = import.local_name().to_string();
        self.unit.scopes.insert(
            self.file_scope,
            name.clone(),
            Object::Module {
                name,
                path: import.path.clone(),
            },
        );
        self.file.imports.push(import);
        self
    }

    /// Records that this unit depends on the unit for `module`.
    pub fn depends_on(&mut self, module: impl Into<String>) -> &mut Self {
        self.unit.dependencies.push(module.into());
        self
    }

    // -------------------------------------------------------------------------
    // Scopes
    // -------------------------------------------------------------------------

    /// Opens a nested scope.
    pub fn push_scope(&mut self) -> ScopeId {
        let parent = self.current_scope();
        let scope = self.unit.scopes.add(Some(parent));
        self.scope_stack.push(scope);
        scope
    }

    /// Closes the innermost scope. The file scope is never closed.
    pub fn pop_scope(&mut self) -> &mut Self {
        if self.scope_stack.len() > 1 {
            self.scope_stack.pop();
        }
        self
    }

    /// Declares a variable in the innermost scope.
    pub fn var(&mut self, name: impl Into<String>, ty: TypeId) -> &mut Self {
        let name = name.into();
        let scope = self.current_scope();
        self.unit
            .scopes
            .insert(scope, name.clone(), Object::Var { name, ty });
        self
    }

    /// Binds an arbitrary object in the innermost scope.
    pub fn bind(&mut self, name: impl Into<String>, object: Object) -> &mut Self {
        let scope = self.current_scope();
        self.unit.scopes.insert(scope, name, object);
        self
    }

    fn current_scope(&self) -> ScopeId {
        self.scope_stack.last().copied().unwrap_or(self.file_scope)
    }

    // -------------------------------------------------------------------------
    // Expressions
    // -------------------------------------------------------------------------

    fn node(&mut self, kind: ExprKind) -> Expr {
        let id = ExprId(self.next_expr);
        self.next_expr += 1;
        Expr {
            id,
            span: self.span,
            kind,
        }
    }

    fn record_type(&mut self, expr: &Expr, ty: Option<TypeId>) {
        if let Some(ty) = ty {
            self.unit.info.types.insert(expr.id, ty);
        }
    }

    fn type_of_object(&self, object: &Object) -> Option<TypeId> {
        match object {
            Object::Func(decl) => self.universe.decl(*decl).map(|d| d.ty),
            Object::Var { ty, .. } | Object::TypeName(ty) => Some(*ty),
            Object::Module { .. } => None,
        }
    }

    fn resolved(&mut self, name: &str, object: Option<Object>) -> Expr {
        let expr = self.node(ExprKind::Ident(name.to_string()));
        let scope = self.current_scope();
        self.unit.info.scopes.insert(expr.id, scope);
        if let Some(object) = object {
            let ty = self.type_of_object(&object);
            self.record_type(&expr, ty);
            self.unit.info.uses.insert(expr.id, object);
        }
        expr
    }

    /// An identifier, resolved through the current scope chain.
    pub fn ident(&mut self, name: &str) -> Expr {
        let object = self
            .unit
            .scopes
            .lookup(self.current_scope(), name)
            .map(|(_, object)| object.clone());
        self.resolved(name, object)
    }

    /// An identifier the loader could not resolve.
    pub fn unresolved_ident(&mut self, name: &str) -> Expr {
        self.resolved(name, None)
    }

    /// An identifier naming a specific function declaration.
    pub fn func_ref(&mut self, decl: DeclId) -> Expr {
        let name = self
            .universe
            .decl(decl)
            .map_or_else(String::new, |d| d.name.clone());
        self.resolved(&name, Some(Object::Func(decl)))
    }

    /// `base.name`, resolved as a module member, method, or field.
    pub fn selector(&mut self, base: Expr, name: &str) -> Expr {
        let object = self.select(&base, name);
        let selected = self.node(ExprKind::Ident(name.to_string()));
        let ty = object.as_ref().and_then(|o| self.type_of_object(o));
        self.record_type(&selected, ty);
        if let Some(object) = object {
            self.unit.info.uses.insert(selected.id, object);
        }
        let expr = self.node(ExprKind::Selector {
            base: Box::new(base),
            selected: Box::new(selected),
        });
        self.record_type(&expr, ty);
        expr
    }

    fn select(&self, base: &Expr, name: &str) -> Option<Object> {
        if let Some(path) = self
            .unit
            .info
            .object_of(base)
            .and_then(Object::module_path)
        {
            let func = self
                .universe
                .decls()
                .find(|d| d.module == path && d.name == name && !d.is_method());
            if let Some(func) = func {
                return Some(Object::Func(func.id));
            }
            return self.universe.types.iter().find_map(|(id, kind)| match kind {
                TypeKind::Named(n) if n.module == path && n.name == name => {
                    Some(Object::TypeName(id))
                }
                _ => None,
            });
        }

        let ty = self.unit.info.type_of(base)?;
        let types = &self.universe.types;
        if let Some(decl) = types
            .methods(ty)
            .iter()
            .find(|m| m.name == name)
            .and_then(|m| m.decl)
        {
            return Some(Object::Func(decl));
        }
        types.field(ty, name).map(|field| Object::Var {
            name: field.name.clone(),
            ty: field.ty,
        })
    }

    /// Overrides the recorded type of an expression.
    pub fn typed(&mut self, expr: Expr, ty: TypeId) -> Expr {
        self.record_type(&expr, Some(ty));
        expr
    }

    /// `callee(args...)`
    pub fn call(&mut self, callee: Expr, args: Vec<Expr>) -> Expr {
        self.make_call(callee, args, false)
    }

    /// `callee(args...)` with the last argument spread.
    pub fn spread_call(&mut self, callee: Expr, args: Vec<Expr>) -> Expr {
        self.make_call(callee, args, true)
    }

    fn make_call(&mut self, callee: Expr, args: Vec<Expr>, spread: bool) -> Expr {
        let result = self
            .unit
            .info
            .type_of(&callee)
            .and_then(|ty| match self.universe.types.get(ty) {
                Some(TypeKind::Signature(sig)) if sig.results.len() == 1 => Some(sig.results[0]),
                _ => None,
            });
        let expr = self.node(ExprKind::Call(CallExpr {
            callee: Box::new(callee),
            args,
            spread,
        }));
        self.record_type(&expr, result);
        expr
    }

    fn literal(&mut self, kind: LitKind, value: &str, ty: BasicKind) -> Expr {
        let expr = self.node(ExprKind::Literal(Literal {
            kind,
            value: value.to_string(),
        }));
        let ty = self.universe.types.basic(ty);
        self.record_type(&expr, Some(ty));
        expr
    }

    /// A string literal holding `value`.
    pub fn string(&mut self, value: &str) -> Expr {
        self.literal(LitKind::String, value, BasicKind::String)
    }

    /// An integer literal.
    pub fn int(&mut self, value: i64) -> Expr {
        self.literal(LitKind::Int, &value.to_string(), BasicKind::Int)
    }

    /// A floating-point literal, written as `text`.
    pub fn float(&mut self, text: &str) -> Expr {
        self.literal(LitKind::Float, text, BasicKind::Float64)
    }

    /// The untyped `nil`.
    pub fn nil(&mut self) -> Expr {
        let expr = self.node(ExprKind::Ident("nil".to_string()));
        let ty = self.universe.types.basic(BasicKind::UntypedNil);
        self.record_type(&expr, Some(ty));
        expr
    }

    /// `T{elements...}` of type `ty`; `ty_expr` is the written type, if any.
    pub fn composite(&mut self, ty_expr: Option<Expr>, ty: TypeId, elements: Vec<Element>) -> Expr {
        let expr = self.node(ExprKind::Composite {
            ty: ty_expr.map(Box::new),
            elements,
        });
        self.record_type(&expr, Some(ty));
        expr
    }

    /// A `key: value` element of a composite literal.
    pub fn keyed(&mut self, key: &str, value: Expr) -> Element {
        let key = self.node(ExprKind::Ident(key.to_string()));
        Element {
            key: Some(key),
            value,
        }
    }

    /// `&operand`
    ///
    /// Typed only when the universe already holds the pointer type.
    pub fn addr(&mut self, operand: Expr) -> Expr {
        let ty = self
            .unit
            .info
            .type_of(&operand)
            .and_then(|t| self.universe.types.find(&TypeKind::Pointer(t)));
        let expr = self.node(ExprKind::Unary {
            op: UnaryOp::Addr,
            operand: Box::new(operand),
        });
        self.record_type(&expr, ty);
        expr
    }

    /// `*inner`, as a dereference.
    pub fn star(&mut self, inner: Expr) -> Expr {
        let ty = self
            .unit
            .info
            .type_of(&inner)
            .and_then(|t| self.universe.types.pointee(t));
        let expr = self.node(ExprKind::Star(Box::new(inner)));
        self.record_type(&expr, ty);
        expr
    }

    /// `(inner)`
    pub fn paren(&mut self, inner: Expr) -> Expr {
        let ty = self.unit.info.type_of(&inner);
        let expr = self.node(ExprKind::Paren(Box::new(inner)));
        self.record_type(&expr, ty);
        expr
    }

    /// An inline function literal.
    pub fn func_lit(&mut self, body: Vec<Stmt>) -> Expr {
        self.node(ExprKind::FuncLit(body))
    }

    // -------------------------------------------------------------------------
    // Items
    // -------------------------------------------------------------------------

    /// Adds a function body to the current file.
    pub fn function(&mut self, name: &str, decl: Option<DeclId>, body: Vec<Stmt>) -> &mut Self {
        self.file.functions.push(FuncItem {
            name: name.to_string(),
            decl,
            body,
            span: self.span,
        });
        self
    }

    /// Finishes the unit.
    #[must_use]
    pub fn finish(mut self) -> Unit {
        self.unit.files.push(self.file);
        self.unit
    }
}
