//! Syntax trees handed over by the program loader.
//!
//! Only the node kinds the analysis needs to walk through are modeled. Every
//! expression carries an [`ExprId`] that keys the loader's type, object, and
//! scope tables.

use std::fmt;

use bindcheck_foundation::Span;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::decl::DeclId;

/// Identifier of an expression node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct ExprId(pub(crate) u32);

impl ExprId {
    /// Returns the raw index of this expression.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ExprId({})", self.0)
    }
}

/// An expression node.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Expr {
    /// Node identity.
    pub id: ExprId,
    /// Source location.
    pub span: Span,
    /// What the node is.
    pub kind: ExprKind,
}

/// Expression kinds.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ExprKind {
    /// `name`
    Ident(String),
    /// `base.selected`; `selected` is always an identifier.
    Selector {
        /// The expression being selected from.
        base: Box<Expr>,
        /// The selected identifier.
        selected: Box<Expr>,
    },
    /// A call.
    Call(CallExpr),
    /// A basic literal.
    Literal(Literal),
    /// `T{k: v, ...}`
    Composite {
        /// The literal's type expression, if written.
        ty: Option<Box<Expr>>,
        /// Elements in source order.
        elements: Vec<Element>,
    },
    /// A unary operation.
    Unary {
        /// The operator.
        op: UnaryOp,
        /// The operand.
        operand: Box<Expr>,
    },
    /// `*x`, as a dereference or a pointer type.
    Star(Box<Expr>),
    /// `(x)`
    Paren(Box<Expr>),
    /// An inline function literal.
    FuncLit(Vec<Stmt>),
}

/// A call expression.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CallExpr {
    /// The called expression.
    pub callee: Box<Expr>,
    /// Arguments in source order.
    pub args: Vec<Expr>,
    /// Whether the last argument is spread (`f(xs...)`).
    pub spread: bool,
}

/// Kinds of basic literals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum LitKind {
    /// Integer literal.
    Int,
    /// Floating-point literal.
    Float,
    /// Imaginary literal.
    Imag,
    /// Character literal.
    Char,
    /// String literal.
    String,
}

/// A basic literal.
///
/// String literals hold their decoded contents, without quotes.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Literal {
    /// Literal kind.
    pub kind: LitKind,
    /// Literal text; decoded contents for strings.
    pub value: String,
}

/// An element of a composite literal.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Element {
    /// Key expression, for `key: value` elements.
    pub key: Option<Expr>,
    /// Value expression.
    pub value: Expr,
}

/// Unary operators.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum UnaryOp {
    /// `&x`
    Addr,
    /// `-x`
    Neg,
    /// `!x`
    Not,
    /// `<-x`
    Recv,
}

impl UnaryOp {
    /// Returns the operator's source spelling.
    #[must_use]
    pub const fn symbol(self) -> &'static str {
        match self {
            Self::Addr => "&",
            Self::Neg => "-",
            Self::Not => "!",
            Self::Recv => "<-",
        }
    }
}

/// A statement.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Stmt {
    /// An expression statement.
    Expr(Expr),
    /// `lhs... = rhs...` or `lhs... := rhs...`
    Assign {
        /// Assigned expressions.
        lhs: Vec<Expr>,
        /// Assigned values.
        rhs: Vec<Expr>,
    },
    /// `return values...`
    Return(Vec<Expr>),
    /// `{ ... }`
    Block(Vec<Stmt>),
    /// `if cond { then } else { otherwise }`
    If {
        /// Condition.
        cond: Expr,
        /// Statements when true.
        then: Vec<Stmt>,
        /// Statements when false.
        otherwise: Vec<Stmt>,
    },
}

/// An import of another module.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Import {
    /// Local alias, when one is written.
    pub alias: Option<String>,
    /// Imported module path.
    pub path: String,
    /// Source location.
    pub span: Span,
}

impl Import {
    /// Returns the name the import is bound to in the file scope.
    #[must_use]
    pub fn local_name(&self) -> &str {
        self.alias
            .as_deref()
            .unwrap_or_else(|| self.path.rsplit('/').next().unwrap_or(&self.path))
    }
}

/// A function or method body.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FuncItem {
    /// Function name.
    pub name: String,
    /// The declaration this body belongs to.
    pub decl: Option<DeclId>,
    /// Body statements.
    pub body: Vec<Stmt>,
    /// Source location.
    pub span: Span,
}

/// One source file of a compilation unit.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SourceFile {
    /// File name as reported in diagnostics.
    pub name: String,
    /// Imports in source order.
    pub imports: Vec<Import>,
    /// Functions in source order.
    pub functions: Vec<FuncItem>,
}

impl Expr {
    /// Returns the call behind this expression.
    #[must_use]
    pub fn as_call(&self) -> Option<&CallExpr> {
        match &self.kind {
            ExprKind::Call(call) => Some(call),
            _ => None,
        }
    }

    /// Returns `(base, selected)` for selector expressions.
    #[must_use]
    pub fn as_selector(&self) -> Option<(&Expr, &Expr)> {
        match &self.kind {
            ExprKind::Selector { base, selected } => Some((base, selected)),
            _ => None,
        }
    }

    /// Returns the name of an identifier expression.
    #[must_use]
    pub fn ident_name(&self) -> Option<&str> {
        match &self.kind {
            ExprKind::Ident(name) => Some(name),
            _ => None,
        }
    }

    /// Returns the decoded contents of a string literal.
    #[must_use]
    pub fn string_literal(&self) -> Option<&str> {
        match &self.unparen().kind {
            ExprKind::Literal(Literal {
                kind: LitKind::String,
                value,
            }) => Some(value),
            _ => None,
        }
    }

    /// Strips any number of enclosing parentheses.
    #[must_use]
    pub fn unparen(&self) -> &Expr {
        let mut current = self;
        while let ExprKind::Paren(inner) = &current.kind {
            current = &**inner;
        }
        current
    }

    /// Returns the identifier that names what this expression refers to.
    ///
    /// `pkg.Func` yields `Func`, `&T{}` yields `T`, `f()` yields `f`, and so
    /// on. Expressions that name nothing (literals, function literals) yield
    /// `None`.
    #[must_use]
    pub fn identifier(&self) -> Option<&Expr> {
        match &self.kind {
            ExprKind::Ident(_) => Some(self),
            ExprKind::Selector { selected, .. } => selected.identifier(),
            ExprKind::Star(inner) | ExprKind::Paren(inner) => inner.identifier(),
            ExprKind::Unary { operand, .. } => operand.identifier(),
            ExprKind::Call(call) => call.callee.identifier(),
            ExprKind::Composite { ty, .. } => ty.as_deref().and_then(Expr::identifier),
            ExprKind::Literal(_) | ExprKind::FuncLit(_) => None,
        }
    }

    /// Returns true for inline function literals, looking through parentheses.
    #[must_use]
    pub fn is_func_lit(&self) -> bool {
        matches!(self.unparen().kind, ExprKind::FuncLit(_))
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            ExprKind::Ident(name) => f.write_str(name),
            ExprKind::Selector { base, selected } => write!(f, "{base}.{selected}"),
            ExprKind::Call(call) => {
                write!(f, "{}(", call.callee)?;
                for (i, arg) in call.args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                if call.spread {
                    f.write_str("...")?;
                }
                f.write_str(")")
            }
            ExprKind::Literal(lit) => match lit.kind {
                LitKind::String => write!(f, "{:?}", lit.value),
                _ => f.write_str(&lit.value),
            },
            ExprKind::Composite { ty, elements } => {
                if let Some(ty) = ty {
                    write!(f, "{ty}")?;
                }
                f.write_str("{")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    if let Some(key) = &element.key {
                        write!(f, "{key}: ")?;
                    }
                    write!(f, "{}", element.value)?;
                }
                f.write_str("}")
            }
            ExprKind::Unary { op, operand } => write!(f, "{}{operand}", op.symbol()),
            ExprKind::Star(inner) => write!(f, "*{inner}"),
            ExprKind::Paren(inner) => write!(f, "({inner})"),
            ExprKind::FuncLit(_) => f.write_str("func literal"),
        }
    }
}
