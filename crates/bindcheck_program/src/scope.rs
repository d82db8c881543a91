//! Lexical scopes and the objects they bind.
//!
//! Scopes form a tree: package scope, one file scope per file (holding the
//! file's imports), then nested function and block scopes. Name resolution
//! walks from the innermost scope outwards.

use std::collections::HashMap;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::decl::DeclId;
use crate::types::TypeId;

// =============================================================================
// Objects
// =============================================================================

/// What an identifier refers to.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Object {
    /// A function or method declaration.
    Func(DeclId),
    /// A variable, parameter, or struct field.
    Var {
        /// Variable name.
        name: String,
        /// Variable type.
        ty: TypeId,
    },
    /// An imported module.
    Module {
        /// Name bound in the file scope.
        name: String,
        /// Imported module path.
        path: String,
    },
    /// A type name.
    TypeName(TypeId),
}

impl Object {
    /// Returns the declaration of a function object.
    #[must_use]
    pub const fn as_func(&self) -> Option<DeclId> {
        match self {
            Self::Func(id) => Some(*id),
            _ => None,
        }
    }

    /// Returns the import path of a module object.
    #[must_use]
    pub fn module_path(&self) -> Option<&str> {
        match self {
            Self::Module { path, .. } => Some(path),
            _ => None,
        }
    }
}

// =============================================================================
// Scopes
// =============================================================================

/// Identifier of a scope in a [`ScopeTree`].
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(transparent))]
pub struct ScopeId(pub(crate) u32);

impl ScopeId {
    /// Returns the raw index of this scope.
    #[must_use]
    pub const fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for ScopeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ScopeId({})", self.0)
    }
}

/// One lexical scope.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Scope {
    /// The enclosing scope.
    pub parent: Option<ScopeId>,
    /// Names bound directly in this scope.
    pub names: HashMap<String, Object>,
}

/// Arena of the scopes of one unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ScopeTree {
    scopes: Vec<Scope>,
}

impl ScopeTree {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of scopes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.scopes.len()
    }

    /// Returns true if the tree has no scopes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    /// Adds a scope nested in `parent`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn add(&mut self, parent: Option<ScopeId>) -> ScopeId {
        let id = ScopeId(self.scopes.len() as u32);
        self.scopes.push(Scope {
            parent,
            names: HashMap::new(),
        });
        id
    }

    /// Binds `name` in `scope`. Returns false if the scope does not exist.
    pub fn insert(&mut self, scope: ScopeId, name: impl Into<String>, object: Object) -> bool {
        match self.scopes.get_mut(scope.0 as usize) {
            Some(s) => {
                s.names.insert(name.into(), object);
                true
            }
            None => false,
        }
    }

    /// Looks up a scope.
    #[must_use]
    pub fn get(&self, scope: ScopeId) -> Option<&Scope> {
        self.scopes.get(scope.0 as usize)
    }

    /// Resolves `name` starting at `scope` and walking outwards.
    ///
    /// Returns the scope that binds the name together with the object.
    #[must_use]
    pub fn lookup(&self, scope: ScopeId, name: &str) -> Option<(ScopeId, &Object)> {
        let mut current = Some(scope);
        // A malformed snapshot could link scopes into a loop; never walk more
        // steps than there are scopes.
        for _ in 0..self.scopes.len() {
            let id = current?;
            let s = self.get(id)?;
            if let Some(object) = s.names.get(name) {
                return Some((id, object));
            }
            current = s.parent;
        }
        None
    }
}
