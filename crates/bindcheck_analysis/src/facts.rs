//! Role facts exported for downstream units.
//!
//! A fact may only be attached to a declaration owned by the unit under
//! analysis; attaching one to a foreign declaration is an error the caller is
//! expected to log and move past.

use bindcheck_foundation::{Error, Result};
use bindcheck_program::{DeclId, Declaration};

use crate::conventions::Role;

/// A role label attached to a declaration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoleFact {
    /// The labeled declaration.
    pub decl: DeclId,
    /// Name the declaration was registered under.
    pub name: String,
    /// The registration's role.
    pub role: Role,
}

/// Facts exported by one unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FactSet {
    module: String,
    facts: im::Vector<RoleFact>,
}

impl FactSet {
    /// Creates an empty fact set for the unit `module`.
    #[must_use]
    pub fn new(module: impl Into<String>) -> Self {
        Self {
            module: module.into(),
            facts: im::Vector::new(),
        }
    }

    /// The module that owns these facts.
    #[must_use]
    pub fn module(&self) -> &str {
        &self.module
    }

    /// Labels `decl` with `role`.
    ///
    /// Exporting the same label twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::ForeignFact`](bindcheck_foundation::ErrorKind::ForeignFact)
    /// if `decl` belongs to another module.
    pub fn export(&mut self, decl: &Declaration, role: Role) -> Result<()> {
        if decl.module != self.module {
            return Err(Error::foreign_fact(
                decl.qualified_name(),
                decl.module.clone(),
                self.module.clone(),
            ));
        }
        let fact = RoleFact {
            decl: decl.id,
            name: decl.name.clone(),
            role,
        };
        if !self.facts.iter().any(|f| *f == fact) {
            self.facts.push_back(fact);
        }
        Ok(())
    }

    /// Returns the roles `decl` was labeled with, in export order.
    pub fn roles_of(&self, decl: DeclId) -> impl Iterator<Item = Role> + '_ {
        self.facts.iter().filter(move |f| f.decl == decl).map(|f| f.role)
    }

    /// Iterates over all facts in export order.
    pub fn iter(&self) -> impl Iterator<Item = &RoleFact> {
        self.facts.iter()
    }

    /// Returns the number of facts.
    #[must_use]
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Returns true if no facts were exported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}
