//! Read-only traversal of syntax trees.
//!
//! Implement the `visit_*`/`enter_*` hooks of interest on [`ProgramVisitor`]
//! and drive them with [`walk_unit`], [`walk_file`], [`walk_stmt`] or
//! [`walk_expr`]. Traversal is depth-first in source order and descends into
//! function literals.
//!
//! # Example
//!
//! ```
//! use bindcheck_program::builder::UnitBuilder;
//! use bindcheck_program::visitor::{CallCollector, NodeCounter, walk_unit};
//! use bindcheck_program::{Stmt, Universe};
//!
//! let universe = Universe::new();
//! let mut b = UnitBuilder::new(&universe, "example.com/app", "main.go");
//! let f = b.unresolved_ident("f");
//! let call = b.call(f, vec![]);
//! b.function("main", None, vec![Stmt::Expr(call)]);
//! let unit = b.finish();
//!
//! let mut counter = NodeCounter::default();
//! walk_unit(&mut counter, &unit);
//! assert_eq!(counter.calls, 1);
//! assert_eq!(CallCollector::collect(&unit).len(), 1);
//! ```

use crate::ast::{CallExpr, Expr, ExprKind, FuncItem, SourceFile, Stmt};
use crate::unit::Unit;

// =============================================================================
// Visitor
// =============================================================================

/// Read-only visitor over a unit's syntax trees.
///
/// Hooks receive references that live as long as the tree, so a visitor may
/// keep the nodes it is handed. All hooks default to doing nothing.
#[allow(unused_variables)]
pub trait ProgramVisitor<'a> {
    /// Called before a file's functions are walked.
    fn enter_file(&mut self, file: &'a SourceFile) {}

    /// Called after a file's functions are walked.
    fn leave_file(&mut self, file: &'a SourceFile) {}

    /// Called before a function body is walked.
    fn enter_function(&mut self, func: &'a FuncItem) {}

    /// Called after a function body is walked.
    fn leave_function(&mut self, func: &'a FuncItem) {}

    /// Called for every expression, before its children.
    fn enter_expr(&mut self, expr: &'a Expr) {}

    /// Called for every expression, after its children.
    fn leave_expr(&mut self, expr: &'a Expr) {}

    /// Called for every call, after `enter_expr` and before the callee and arguments.
    fn visit_call(&mut self, expr: &'a Expr, call: &'a CallExpr) {}
}

/// Walks every file of a unit.
pub fn walk_unit<'a, V: ProgramVisitor<'a> + ?Sized>(visitor: &mut V, unit: &'a Unit) {
    for file in &unit.files {
        walk_file(visitor, file);
    }
}

/// Walks every function of a file.
pub fn walk_file<'a, V: ProgramVisitor<'a> + ?Sized>(visitor: &mut V, file: &'a SourceFile) {
    visitor.enter_file(file);
    for func in &file.functions {
        visitor.enter_function(func);
        walk_stmts(visitor, &func.body);
        visitor.leave_function(func);
    }
    visitor.leave_file(file);
}

/// Walks a statement list in order.
pub fn walk_stmts<'a, V: ProgramVisitor<'a> + ?Sized>(visitor: &mut V, stmts: &'a [Stmt]) {
    for stmt in stmts {
        walk_stmt(visitor, stmt);
    }
}

/// Walks one statement.
pub fn walk_stmt<'a, V: ProgramVisitor<'a> + ?Sized>(visitor: &mut V, stmt: &'a Stmt) {
    match stmt {
        Stmt::Expr(expr) => walk_expr(visitor, expr),
        Stmt::Assign { lhs, rhs } => {
            for expr in lhs.iter().chain(rhs) {
                walk_expr(visitor, expr);
            }
        }
        Stmt::Return(values) => {
            for expr in values {
                walk_expr(visitor, expr);
            }
        }
        Stmt::Block(stmts) => walk_stmts(visitor, stmts),
        Stmt::If {
            cond,
            then,
            otherwise,
        } => {
            walk_expr(visitor, cond);
            walk_stmts(visitor, then);
            walk_stmts(visitor, otherwise);
        }
    }
}

/// Walks an expression and its children.
pub fn walk_expr<'a, V: ProgramVisitor<'a> + ?Sized>(visitor: &mut V, expr: &'a Expr) {
    visitor.enter_expr(expr);

    match &expr.kind {
        ExprKind::Ident(_) | ExprKind::Literal(_) => {}
        ExprKind::Selector { base, selected } => {
            walk_expr(visitor, base);
            walk_expr(visitor, selected);
        }
        ExprKind::Call(call) => {
            visitor.visit_call(expr, call);
            walk_expr(visitor, &call.callee);
            for arg in &call.args {
                walk_expr(visitor, arg);
            }
        }
        ExprKind::Composite { ty, elements } => {
            if let Some(ty) = ty {
                walk_expr(visitor, ty);
            }
            for element in elements {
                if let Some(key) = &element.key {
                    walk_expr(visitor, key);
                }
                walk_expr(visitor, &element.value);
            }
        }
        ExprKind::Unary { operand: inner, .. }
        | ExprKind::Star(inner)
        | ExprKind::Paren(inner) => walk_expr(visitor, inner),
        ExprKind::FuncLit(body) => walk_stmts(visitor, body),
    }

    visitor.leave_expr(expr);
}

// =============================================================================
// Utility Visitors
// =============================================================================

/// Collects every call expression in traversal order.
#[derive(Debug, Default, Clone)]
pub struct CallCollector<'a> {
    calls: Vec<&'a Expr>,
}

impl<'a> CallCollector<'a> {
    /// Collects the calls of a whole unit.
    #[must_use]
    pub fn collect(unit: &'a Unit) -> Vec<&'a Expr> {
        let mut collector = Self::default();
        walk_unit(&mut collector, unit);
        collector.calls
    }

    /// Collects the calls of one file.
    #[must_use]
    pub fn collect_file(file: &'a SourceFile) -> Vec<&'a Expr> {
        let mut collector = Self::default();
        walk_file(&mut collector, file);
        collector.calls
    }
}

impl<'a> ProgramVisitor<'a> for CallCollector<'a> {
    fn visit_call(&mut self, expr: &'a Expr, _call: &'a CallExpr) {
        self.calls.push(expr);
    }
}

/// Counts nodes by category.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NodeCounter {
    /// Functions walked.
    pub functions: usize,
    /// Expressions walked.
    pub exprs: usize,
    /// Calls walked.
    pub calls: usize,
    /// Function literals walked.
    pub closures: usize,
}

impl<'a> ProgramVisitor<'a> for NodeCounter {
    fn enter_function(&mut self, _func: &'a FuncItem) {
        self.functions += 1;
    }

    fn enter_expr(&mut self, expr: &'a Expr) {
        self.exprs += 1;
        if matches!(expr.kind, ExprKind::FuncLit(_)) {
            self.closures += 1;
        }
    }

    fn visit_call(&mut self, _expr: &'a Expr, _call: &'a CallExpr) {
        self.calls += 1;
    }
}
