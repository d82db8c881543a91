//! Transportability of argument types.
//!
//! A value crosses the boundary through a field-by-field encoding. Whatever
//! the encoding cannot see (unexported fields, fields tagged out) or cannot
//! represent (channels, functions, unsafe pointers) arrives as its default.

use std::collections::HashSet;
use std::fmt;

use bindcheck_program::{BasicKind, TypeId, TypeShape, TypeTable};

use crate::conventions::Conventions;

// =============================================================================
// Verdicts
// =============================================================================

/// Why a type cannot be transported.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Reason {
    /// The field is excluded by its struct tag.
    SkippedByTag {
        /// The tag key that excluded it.
        key: String,
        /// The excluding value.
        value: String,
    },
    /// The field is not exported and carries no tag.
    Unexported,
    /// The type has a shape the encoding cannot represent.
    Unsupported(&'static str),
}

impl fmt::Display for Reason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SkippedByTag { key, value } => write!(f, "is excluded by its `{key}:\"{value}\"` tag"),
            Self::Unexported => f.write_str("is not exported"),
            Self::Unsupported(kind) => {
                let article = if kind.starts_with(['a', 'e', 'i', 'o', 'u']) {
                    "an"
                } else {
                    "a"
                };
                write!(f, "is {article} {kind}, which cannot be serialized")
            }
        }
    }
}

/// The first offending spot found inside a type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Violation {
    /// Field names from the argument down to the offending field; empty when
    /// the argument itself is the problem.
    pub path: Vec<String>,
    /// Source rendering of the offending type.
    pub type_text: String,
    /// What is wrong with it.
    pub reason: Reason,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "type `{}` {}", self.type_text, self.reason)
        } else {
            write!(
                f,
                "field `{}` of type `{}` {}",
                self.path.join("."),
                self.type_text,
                self.reason
            )
        }
    }
}

/// Verdict of the transportability check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Serializability {
    /// Every part of the value survives the boundary.
    Serializable,
    /// Some part of the value does not.
    NotSerializable(Violation),
}

impl Serializability {
    /// Returns true for [`Serializability::Serializable`].
    #[must_use]
    pub const fn is_serializable(&self) -> bool {
        matches!(self, Self::Serializable)
    }

    /// Returns the violation, if any.
    #[must_use]
    pub fn violation(&self) -> Option<&Violation> {
        match self {
            Self::Serializable => None,
            Self::NotSerializable(v) => Some(v),
        }
    }
}

// =============================================================================
// Checker
// =============================================================================

/// Decides whether types can be transported.
#[derive(Clone, Copy, Debug)]
pub struct SerializabilityChecker<'a> {
    types: &'a TypeTable,
    conventions: &'a Conventions,
}

impl<'a> SerializabilityChecker<'a> {
    /// Creates a checker over `types`.
    #[must_use]
    pub fn new(types: &'a TypeTable, conventions: &'a Conventions) -> Self {
        Self { types, conventions }
    }

    /// Checks one type.
    ///
    /// Types that refer back to themselves are assumed serializable at the
    /// point of recursion.
    #[must_use]
    pub fn check(&self, ty: TypeId) -> Serializability {
        let mut path = Vec::new();
        let mut visiting = HashSet::new();
        match self.walk(ty, &mut path, &mut visiting) {
            Ok(()) => Serializability::Serializable,
            Err(violation) => Serializability::NotSerializable(violation),
        }
    }

    fn violation(&self, ty: TypeId, path: &[String], reason: Reason) -> Violation {
        Violation {
            path: path.to_vec(),
            type_text: self.types.display(ty).to_string(),
            reason,
        }
    }

    fn walk(
        &self,
        ty: TypeId,
        path: &mut Vec<String>,
        visiting: &mut HashSet<TypeId>,
    ) -> Result<(), Violation> {
        if !visiting.insert(ty) {
            return Ok(());
        }
        let result = self.walk_shape(ty, path, visiting);
        visiting.remove(&ty);
        result
    }

    fn walk_shape(
        &self,
        ty: TypeId,
        path: &mut Vec<String>,
        visiting: &mut HashSet<TypeId>,
    ) -> Result<(), Violation> {
        let shape = self
            .types
            .shape(ty, |method| self.conventions.is_codec_method(method));
        match shape {
            // Unknown shapes are skipped rather than reported.
            TypeShape::CustomCodec | TypeShape::Interface | TypeShape::Unknown => Ok(()),
            TypeShape::Basic(BasicKind::UnsafePointer) => {
                Err(self.violation(ty, path, Reason::Unsupported("unsafe pointer")))
            }
            TypeShape::Basic(_) => Ok(()),
            TypeShape::Pointer(elem) | TypeShape::Sequence(elem) | TypeShape::Array(elem, _) => {
                self.walk(elem, path, visiting)
            }
            TypeShape::Mapping(key, value) => {
                self.walk(key, path, visiting)?;
                self.walk(value, path, visiting)
            }
            TypeShape::Struct(fields) => {
                let key = &self.conventions.skip_tag_key;
                let skip = &self.conventions.skip_tag_value;
                for field in fields {
                    path.push(field.name.clone());
                    let tag = field.tag_value(key);
                    if tag.as_deref() == Some(skip.as_str()) {
                        let reason = Reason::SkippedByTag {
                            key: key.clone(),
                            value: skip.clone(),
                        };
                        return Err(self.violation(field.ty, path, reason));
                    }
                    if tag.is_none_or(|t| t.is_empty()) && !field.is_exported() {
                        return Err(self.violation(field.ty, path, Reason::Unexported));
                    }
                    self.walk(field.ty, path, visiting)?;
                    path.pop();
                }
                Ok(())
            }
            TypeShape::Unsupported(kind) => Err(self.violation(ty, path, Reason::Unsupported(kind))),
        }
    }
}
