//! Reference visitor that dumps a parse tree as an indented outline.
//!
//! Each node contributes one line with its grammar category, indented two
//! spaces per depth level; tokens print their raw text.  A
//! selection-statement adds an `is_constexpr:` line, a
//! parameter-declaration adds its passing style (and modifier, when one
//! was written), and an expression inside an expression-list is prefixed
//! with an `out` line when the call site passed it `out`.

use std::collections::VecDeque;
use std::fmt::Write;

use crate::parser::ast::{
    BinaryCategory, BinaryExpressionNode, CompoundStatementNode, DeclarationNode,
    ExpressionListNode, ExpressionNode, ExpressionStatementNode, IdExpressionNode, Node,
    ParameterDeclarationListNode, ParameterDeclarationNode, PassingStyle, PostfixExpressionNode,
    PrefixExpressionNode, PrimaryExpressionNode, QualifiedIdNode, SelectionStatementNode,
    StatementNode, TranslationUnitNode, UnqualifiedIdNode, Visitor,
};
use crate::parser::token::Token;

/// Writes an indented parse-tree outline to `out`.
///
/// # Example
///
/// ```
/// use prow_core::parser::parse::Parser;
/// use prow_core::parser::print::ParseTreePrinter;
/// use prow_core::parser::token::{SourcePosition, Token, TokenKind};
///
/// let tokens = vec![
///     Token::new(TokenKind::Identifier, "y", SourcePosition::new(1, 1)),
///     Token::new(TokenKind::Colon, ":", SourcePosition::new(1, 3)),
///     Token::new(TokenKind::Keyword, "int", SourcePosition::new(1, 5)),
///     Token::new(TokenKind::Semicolon, ";", SourcePosition::new(1, 8)),
/// ];
/// let mut errors = Vec::new();
/// let mut parser = Parser::new();
/// parser.parse(&tokens, &mut errors);
///
/// let mut printer = ParseTreePrinter::new(String::new());
/// parser.visit(&mut printer);
/// assert!(printer.into_inner().starts_with("translation-unit\n  declaration\n"));
/// ```
pub struct ParseTreePrinter<W> {
    out: W,
    /// Spaces per depth level.
    indent_spaces: usize,
    /// Passing styles of each expression-list currently being walked,
    /// innermost last, consumed one per child expression.
    list_passes: Vec<VecDeque<PassingStyle>>,
}

impl<W: Write> ParseTreePrinter<W> {
    /// Create a printer writing to `out` with the default two-space indent.
    pub fn new(out: W) -> Self {
        Self {
            out,
            indent_spaces: 2,
            list_passes: Vec::new(),
        }
    }

    /// Consume the printer and hand back the output sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, depth: usize, text: &str) {
        let width = depth * self.indent_spaces;
        let _ = writeln!(self.out, "{:width$}{text}", "");
    }
}

impl<W: Write> Visitor for ParseTreePrinter<W> {
    fn start_token(&mut self, tok: &Token, depth: usize) {
        self.line(depth, &tok.text);
    }

    fn start_primary_expression(&mut self, _n: &PrimaryExpressionNode<'_>, depth: usize) {
        self.line(depth, "primary-expression");
    }

    fn start_postfix_expression(&mut self, _n: &PostfixExpressionNode<'_>, depth: usize) {
        self.line(depth, "postfix-expression");
    }

    fn start_prefix_expression(&mut self, _n: &PrefixExpressionNode<'_>, depth: usize) {
        self.line(depth, "prefix-expression");
    }

    fn start_binary_expression<K: BinaryCategory, Term: Node>(
        &mut self,
        _n: &BinaryExpressionNode<'_, K, Term>,
        depth: usize,
    ) {
        let category = format!("{}-expression", K::NAME);
        self.line(depth, &category);
    }

    fn start_expression(&mut self, _n: &ExpressionNode<'_>, depth: usize) {
        self.line(depth, "expression");
        // Inside an expression-list, each child expression consumes the
        // passing style of its term.
        if let Some(passes) = self.list_passes.last_mut() {
            if passes.pop_front() == Some(PassingStyle::Out) {
                self.line(depth + 1, "out");
            }
        }
    }

    fn start_expression_list(&mut self, n: &ExpressionListNode<'_>, depth: usize) {
        self.list_passes
            .push(n.expressions.iter().map(|term| term.pass).collect());
        self.line(depth, "expression-list");
    }

    fn end_expression_list(&mut self, _n: &ExpressionListNode<'_>, _depth: usize) {
        // A malformed list (`f(a,)`) has terms with no expression; their
        // unconsumed entries are dropped with the queue.
        self.list_passes.pop();
    }

    fn start_unqualified_id(&mut self, _n: &UnqualifiedIdNode<'_>, depth: usize) {
        self.line(depth, "unqualified-id");
    }

    fn start_qualified_id(&mut self, _n: &QualifiedIdNode<'_>, depth: usize) {
        self.line(depth, "qualified-id");
    }

    fn start_id_expression(&mut self, _n: &IdExpressionNode<'_>, depth: usize) {
        self.line(depth, "id-expression");
    }

    fn start_expression_statement(&mut self, _n: &ExpressionStatementNode<'_>, depth: usize) {
        self.line(depth, "expression-statement");
    }

    fn start_compound_statement(&mut self, _n: &CompoundStatementNode<'_>, depth: usize) {
        self.line(depth, "compound-statement");
    }

    fn start_selection_statement(&mut self, n: &SelectionStatementNode<'_>, depth: usize) {
        self.line(depth, "selection-statement");
        let constexpr_line = format!("is_constexpr: {}", n.is_constexpr);
        self.line(depth + 1, &constexpr_line);
    }

    fn start_statement(&mut self, _n: &StatementNode<'_>, depth: usize) {
        self.line(depth, "statement");
    }

    fn start_parameter_declaration(&mut self, n: &ParameterDeclarationNode<'_>, depth: usize) {
        self.line(depth, "parameter-declaration");
        self.line(depth + 1, n.pass.as_str());
        if let Some(modifier) = n.modifier.as_str() {
            self.line(depth + 1, modifier);
        }
    }

    fn start_parameter_declaration_list(
        &mut self,
        _n: &ParameterDeclarationListNode<'_>,
        depth: usize,
    ) {
        self.line(depth, "parameter-declaration-list");
    }

    fn start_declaration(&mut self, _n: &DeclarationNode<'_>, depth: usize) {
        self.line(depth, "declaration");
    }

    fn start_translation_unit(&mut self, _n: &TranslationUnitNode<'_>, depth: usize) {
        self.line(depth, "translation-unit");
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse::Parser;
    use crate::parser::testing::lex;

    fn print_source(src: &str) -> String {
        let tokens = lex(src);
        let mut errors = Vec::new();
        let mut parser = Parser::new();
        assert!(parser.parse(&tokens, &mut errors), "errors: {errors:?}");
        let mut printer = ParseTreePrinter::new(String::new());
        parser.visit(&mut printer);
        printer.into_inner()
    }

    /// Lines as `(indent, trimmed text)` pairs.
    fn outline(output: &str) -> Vec<(usize, &str)> {
        output
            .lines()
            .map(|l| (l.len() - l.trim_start().len(), l.trim_start()))
            .collect()
    }

    #[test]
    fn test_print_simple_declaration() {
        let expected: String = [
            (0, "translation-unit"),
            (1, "declaration"),
            (2, "unqualified-id"),
            (3, "x"),
            (2, "id-expression"),
            (3, "unqualified-id"),
            (4, "int"),
            (2, "statement"),
            (3, "expression-statement"),
            (4, "expression"),
            (5, "assignment-expression"),
            (6, "logical-or-expression"),
            (7, "logical-and-expression"),
            (8, "equality-expression"),
            (9, "relational-expression"),
            (10, "compare-expression"),
            (11, "shift-expression"),
            (12, "additive-expression"),
            (13, "multiplicative-expression"),
            (14, "is-as-expression"),
            (15, "prefix-expression"),
            (16, "postfix-expression"),
            (17, "primary-expression"),
            (18, "0"),
        ]
        .iter()
        .map(|(depth, text)| format!("{:width$}{text}\n", "", width = depth * 2))
        .collect();

        assert_eq!(print_source("x : int = 0;"), expected);
    }

    #[test]
    fn test_print_selection_statement_constexpr_line() {
        let output = print_source("main : () = { if constexpr x { } else { } }");
        let lines = outline(&output);
        let i = lines
            .iter()
            .position(|(_, t)| *t == "selection-statement")
            .expect("selection-statement line missing");
        assert_eq!(lines[i + 1].1, "is_constexpr: true");
        assert_eq!(lines[i + 1].0, lines[i].0 + 2);
        // The `if` token prints right after the flag line.
        assert_eq!(lines[i + 2].1, "if");
    }

    #[test]
    fn test_print_marks_out_arguments() {
        let output = print_source("main : () = { f(out x); }");
        let lines = outline(&output);
        let i = lines
            .iter()
            .position(|(_, t)| *t == "expression-list")
            .expect("expression-list line missing");
        assert_eq!(lines[i + 1].1, "expression");
        assert_eq!(lines[i + 2].1, "out");
        assert_eq!(lines[i + 2].0, lines[i + 1].0 + 2);
    }

    #[test]
    fn test_print_nested_expression_lists_keep_out_markers() {
        let output = print_source("main : () = { f((a), out b); }");
        let out_lines = outline(&output)
            .iter()
            .filter(|(_, t)| *t == "out")
            .count();
        assert_eq!(out_lines, 1);
    }

    #[test]
    fn test_print_parameter_declaration_detail() {
        let output = print_source("f : (inout a: int, implicit b: int);");
        let lines = outline(&output);
        let params: Vec<usize> = lines
            .iter()
            .enumerate()
            .filter(|(_, (_, t))| *t == "parameter-declaration")
            .map(|(i, _)| i)
            .collect();
        assert_eq!(params.len(), 2);
        // First parameter: explicit `inout`, no modifier line.
        assert_eq!(lines[params[0] + 1].1, "inout");
        assert_eq!(lines[params[0] + 2].1, "declaration");
        // Second parameter: default `in` plus the `implicit` modifier.
        assert_eq!(lines[params[1] + 1].1, "in");
        assert_eq!(lines[params[1] + 2].1, "implicit");
    }

    #[test]
    fn test_print_qualified_id() {
        let output = print_source("x : a::b;");
        let lines = outline(&output);
        let i = lines
            .iter()
            .position(|(_, t)| *t == "qualified-id")
            .expect("qualified-id line missing");
        assert_eq!(lines[i + 1].1, "unqualified-id");
        assert_eq!(lines[i + 2].1, "a");
        assert_eq!(lines[i + 3].1, "unqualified-id");
        assert_eq!(lines[i + 4].1, "b");
    }

    #[test]
    fn test_print_is_deterministic() {
        let tokens = lex("x : int = 1 + 2 * 3;");
        let mut errors = Vec::new();
        let mut parser = Parser::new();
        assert!(parser.parse(&tokens, &mut errors));

        let mut first = ParseTreePrinter::new(String::new());
        parser.visit(&mut first);
        let mut second = ParseTreePrinter::new(String::new());
        parser.visit(&mut second);
        assert_eq!(first.into_inner(), second.into_inner());
    }
}
