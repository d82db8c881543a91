//! Callable declarations.

use std::fmt;

use bindcheck_foundation::Span;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::types::{Signature, TypeId, TypeTable, is_exported};

/// Identifier of a declaration, unique per definition site.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct DeclId(pub(crate) u32);

impl DeclId {
    /// Returns the raw index of this declaration.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for DeclId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "DeclId({})", self.0)
    }
}

/// A function or method declaration.
///
/// The first parameter is, by convention, the context carrier; it is never
/// supplied at invocation sites.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Declaration {
    /// Identity of the definition site.
    pub id: DeclId,
    /// Name the declaration is known by.
    pub name: String,
    /// Path of the owning module.
    pub module: String,
    /// Receiver type, for methods.
    pub receiver: Option<TypeId>,
    /// Parameter and result types.
    pub signature: Signature,
    /// The signature as a type in the table.
    pub ty: TypeId,
    /// Where the declaration is defined.
    pub span: Span,
}

impl Declaration {
    /// Declared parameter types, context carrier included.
    #[must_use]
    pub fn params(&self) -> &[TypeId] {
        &self.signature.params
    }

    /// Declared result types.
    #[must_use]
    pub fn results(&self) -> &[TypeId] {
        &self.signature.results
    }

    /// Returns true if the last parameter is variadic.
    #[must_use]
    pub fn is_variadic(&self) -> bool {
        self.signature.variadic
    }

    /// Returns true if this is a method.
    #[must_use]
    pub fn is_method(&self) -> bool {
        self.receiver.is_some()
    }

    /// Returns true if the declaration is visible outside its module.
    #[must_use]
    pub fn is_exported(&self) -> bool {
        is_exported(&self.name)
    }

    /// Returns the element type of the variadic parameter.
    #[must_use]
    pub fn variadic_elem(&self, types: &TypeTable) -> Option<TypeId> {
        if !self.is_variadic() {
            return None;
        }
        self.params().last().and_then(|p| types.slice_elem(*p))
    }

    /// Returns a copy of this declaration known under another name.
    ///
    /// The copy keeps the identity, module, and signature of the original.
    #[must_use]
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Returns `module.name`.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        if self.module.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.module, self.name)
        }
    }
}

impl fmt::Display for Declaration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.qualified_name())
    }
}
