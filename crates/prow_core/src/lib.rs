//! `prow_core` — the foundational library for the Prow Cpp2 front-end.
//!
//! Prow parses the experimental "Cpp2" alternate surface syntax for C++.
//! This crate holds the parser core: given a token stream produced by an
//! upstream lexer, it builds a typed parse tree for a translation unit,
//! appends positional diagnostics to a caller-owned list, and exposes a
//! pre-order visitor protocol for downstream tooling.
//!
//! # Crate layout
//!
//! - [`error`] — the [`error::Diagnostic`] record appended during parsing.
//! - [`parser`] — token definitions, the parse-tree node catalog, the
//!   recursive-descent parser, and the tree-printing reference visitor.

/// Diagnostic record type.
pub mod error;
/// Parser infrastructure: tokens, parse tree, parser, printing visitor.
pub mod parser;
