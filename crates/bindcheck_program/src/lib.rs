//! Program model for bindcheck.
//!
//! This crate describes what the host program loader hands over:
//! - [`TypeTable`] / [`TypeId`] - Arena of nominal and structural types
//! - [`Declaration`] - Functions and methods with their signatures
//! - [`Expr`] / [`Stmt`] / [`SourceFile`] - Syntax trees keyed by [`ExprId`]
//! - [`ScopeTree`] / [`Object`] - Lexical scopes and what names refer to
//! - [`Universe`] / [`Unit`] - The whole load and one compilation unit
//!
//! [`builder::UnitBuilder`] constructs units in code, and [`visitor`]
//! traverses them.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod ast;
pub mod builder;
pub mod decl;
pub mod scope;
pub mod types;
pub mod unit;
pub mod visitor;

pub use ast::{
    CallExpr, Element, Expr, ExprId, ExprKind, FuncItem, Import, LitKind, Literal, SourceFile,
    Stmt, UnaryOp,
};
pub use builder::UnitBuilder;
pub use decl::{DeclId, Declaration};
pub use scope::{Object, Scope, ScopeId, ScopeTree};
pub use types::{
    BasicKind, Field, Method, NamedType, Signature, TypeDisplay, TypeId, TypeKind, TypeShape,
    TypeTable, is_exported, lookup_tag,
};
pub use unit::{TypeInfo, Unit, Universe};
pub use visitor::{CallCollector, NodeCounter, ProgramVisitor, walk_expr, walk_file, walk_unit};
