//! Diagnostic types for the Prow front-end.

use thiserror::Error;

use crate::parser::token::SourcePosition;

/// A single diagnostic produced while parsing.
///
/// The parser never aborts on malformed input: it appends `Diagnostic`
/// records to a caller-owned `Vec<Diagnostic>` and keeps going where it
/// can.  Each record carries the source position of the token the parser
/// was looking at and a message that ends with that token's text, e.g.
/// `"invalid expression after +"`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{pos}: {msg}")]
pub struct Diagnostic {
    /// Source position the diagnostic refers to.
    pub pos: SourcePosition,
    /// Human-readable description of what went wrong.
    pub msg: String,
}

impl Diagnostic {
    /// Create a diagnostic at `pos` with message `msg`.
    pub fn new(pos: SourcePosition, msg: impl Into<String>) -> Self {
        Self {
            pos,
            msg: msg.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::new(SourcePosition::new(7, 12), "missing semicolon at end of declaration at x");
        assert_eq!(d.to_string(), "(7,12): missing semicolon at end of declaration at x");
    }
}
