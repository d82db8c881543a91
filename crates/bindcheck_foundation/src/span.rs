//! Source location tracking.
//!
//! `Span` tracks where an AST node sits in its file; `Position` is the
//! resolved, file-qualified form attached to diagnostics.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Where a node starts in its file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Span {
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
}

impl Span {
    /// Creates a span at the given line and column.
    #[must_use]
    pub const fn at(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Creates a span at the start of a file.
    #[must_use]
    pub const fn at_start() -> Self {
        Self::at(1, 1)
    }

    /// Qualifies this span with the file it belongs to.
    #[must_use]
    pub fn in_file(self, file: impl Into<String>) -> Position {
        Position {
            file: file.into(),
            line: self.line,
            column: self.column,
        }
    }
}

/// A file-qualified source position.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Position {
    /// File name as reported by the program loader.
    pub file: String,
    /// 1-based line number.
    pub line: u32,
    /// 1-based column number.
    pub column: u32,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}
