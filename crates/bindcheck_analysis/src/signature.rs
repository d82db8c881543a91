//! Argument count and type compatibility against a declared signature.
//!
//! The first declared parameter is the context carrier and is never passed at
//! an invocation site, so call argument `i` lines up with parameter `i + 1`.

use bindcheck_foundation::AnalysisConfig;
use bindcheck_program::{Declaration, TypeId, TypeTable};

/// A mismatch between an invocation and the declaration it targets.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SignatureFinding {
    /// More arguments than parameters.
    TooMany {
        /// Parameters after the context carrier.
        expected: usize,
        /// Arguments supplied.
        supplied: usize,
    },
    /// Fewer arguments than parameters.
    TooFew {
        /// Parameters after the context carrier (the minimum, for variadic callees).
        expected: usize,
        /// Arguments supplied.
        supplied: usize,
        /// Whether `expected` is a lower bound.
        at_least: bool,
    },
    /// An argument whose type does not fit its parameter.
    Mismatch {
        /// Zero-based argument index.
        index: usize,
        /// Declared type.
        expected: TypeId,
        /// Supplied type.
        actual: TypeId,
    },
}

/// Checks invocation arguments against declared parameters.
#[derive(Clone, Copy, Debug)]
pub struct SignatureChecker<'a> {
    types: &'a TypeTable,
    config: &'a AnalysisConfig,
}

impl<'a> SignatureChecker<'a> {
    /// Creates a checker over `types`.
    #[must_use]
    pub fn new(types: &'a TypeTable, config: &'a AnalysisConfig) -> Self {
        Self { types, config }
    }

    /// Checks `args` against `decl`.
    ///
    /// `decl` must have at least one parameter. Count and type findings are
    /// independent; a call can produce both.
    #[must_use]
    pub fn check(
        &self,
        decl: &Declaration,
        args: &[Option<TypeId>],
        spread: bool,
    ) -> Vec<SignatureFinding> {
        let mut findings = Vec::new();
        if let Some(finding) = Self::check_count(decl, args.len(), spread) {
            findings.push(finding);
        }
        findings.extend(self.check_types(decl, args, spread));
        findings
    }

    /// Checks the argument count alone.
    #[must_use]
    pub fn check_count(decl: &Declaration, supplied: usize, spread: bool) -> Option<SignatureFinding> {
        let expected = decl.params().len().saturating_sub(1);
        if !decl.is_variadic() || spread {
            // A spread argument fills the variadic slot by itself.
            return match supplied.cmp(&expected) {
                std::cmp::Ordering::Greater => Some(SignatureFinding::TooMany { expected, supplied }),
                std::cmp::Ordering::Less => Some(SignatureFinding::TooFew {
                    expected,
                    supplied,
                    at_least: false,
                }),
                std::cmp::Ordering::Equal => None,
            };
        }
        let minimum = expected.saturating_sub(1);
        (supplied < minimum).then_some(SignatureFinding::TooFew {
            expected: minimum,
            supplied,
            at_least: true,
        })
    }

    /// Checks each argument's type against its parameter, left to right.
    ///
    /// Positions where either type is unknown are skipped.
    #[must_use]
    pub fn check_types(
        &self,
        decl: &Declaration,
        args: &[Option<TypeId>],
        spread: bool,
    ) -> Vec<SignatureFinding> {
        let params = decl.params();
        let expected_count = params.len().saturating_sub(1);
        let variadic_slot = decl.is_variadic().then(|| expected_count.saturating_sub(1));
        let variadic_elem = decl.variadic_elem(self.types);

        let mut findings = Vec::new();
        for index in 0..expected_count.max(args.len()) {
            let expected = match variadic_slot {
                Some(slot) if index >= slot => {
                    if spread && index == slot && index + 1 == args.len() {
                        params.get(index + 1).copied()
                    } else {
                        variadic_elem
                    }
                }
                _ => params.get(index + 1).copied(),
            };
            let actual = args.get(index).copied().flatten();
            let (Some(expected), Some(actual)) = (expected, actual) else {
                continue;
            };
            if !self.compatible(expected, actual) {
                findings.push(SignatureFinding::Mismatch {
                    index,
                    expected,
                    actual,
                });
            }
        }
        findings
    }

    /// Reports whether an argument of type `actual` fits a parameter of type `expected`.
    ///
    /// Identical types fit. Unless pointer matching is strict, a pointer fits
    /// its exact pointee and vice versa. The untyped nil fits any struct or
    /// pointer-to-struct parameter.
    #[must_use]
    pub fn compatible(&self, expected: TypeId, actual: TypeId) -> bool {
        let types = self.types;
        if types.identical(expected, actual) {
            return true;
        }
        if !self.config.strict_pointer_match {
            let boxed = types
                .pointee(expected)
                .is_some_and(|elem| types.identical(elem, actual));
            let unboxed = types
                .pointee(actual)
                .is_some_and(|elem| types.identical(elem, expected));
            if boxed || unboxed {
                return true;
            }
        }
        types.is_untyped_nil(actual) && types.is_struct_or_pointer_to_struct(expected)
    }
}
