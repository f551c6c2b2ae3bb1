//! Calculator error representation.
//!
//! - **`CalcErrorKind`** : the closed set of error categories
//! - **`CalcError`**     : kind + short human message
//!
//! Every fallible engine operation returns `CalcResult<T>` and
//! propagates with the `?` operator.

use std::fmt;
use thiserror::Error;

/// All recognised error categories.
///
/// Names are CamelCase while `Display` renders the user-facing form
/// (`TypeError`, `RangeError`, …).
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum CalcErrorKind {
    /// An operand kind was rejected by an operation.
    Type,
    /// A domain violation: division by a zero polynomial, index out of
    /// bounds, argument out of range, precision too large, …
    Range,
    /// Parsing failure or unknown directive.
    Syntax,
    /// Identifier not bound.
    Reference,
}

impl fmt::Display for CalcErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Type => "TypeError",
            Self::Range => "RangeError",
            Self::Syntax => "SyntaxError",
            Self::Reference => "ReferenceError",
        })
    }
}

/// The single error struct the whole workspace passes around.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Error)]
#[error("{kind}: {message}")]
pub struct CalcError {
    pub kind: CalcErrorKind,
    pub message: String,
}

pub type CalcResult<T> = Result<T, CalcError>;

impl CalcError {
    pub fn new(kind: CalcErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn ty(message: impl Into<String>) -> Self {
        Self::new(CalcErrorKind::Type, message)
    }

    pub fn range(message: impl Into<String>) -> Self {
        Self::new(CalcErrorKind::Range, message)
    }

    pub fn syntax(message: impl Into<String>) -> Self {
        Self::new(CalcErrorKind::Syntax, message)
    }

    pub fn reference(message: impl Into<String>) -> Self {
        Self::new(CalcErrorKind::Reference, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_matches_user_facing_format() {
        let e = CalcError::range("division by zero");
        assert_eq!(e.to_string(), "RangeError: division by zero");
        let e = CalcError::reference("undefined variable 'a'");
        assert_eq!(e.to_string(), "ReferenceError: undefined variable 'a'");
    }
}
