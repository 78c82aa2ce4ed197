//! Recursive-descent parser for Cpp2 token streams.
//!
//! [`Parser`] consumes caller-owned token slices and accumulates a
//! [`TranslationUnitNode`]: each [`Parser::parse`] call parses one code
//! section and splices its declarations onto the running unit, so a file
//! whose Cpp2 sections arrive one at a time still yields a single tree.
//!
//! # Failure model
//!
//! Parse functions return `None` when their alternative simply does not
//! apply; that is not an error.  Once a function has committed (consumed
//! tokens past a decision point), failure appends a [`Diagnostic`] to the
//! caller's error list and returns `None` or a best-effort partial node,
//! occasionally skipping a single token so loops always make progress.
//! Backtracking happens at exactly two points — the speculative `out` at
//! the start of an expression-list, and the `identifier :` head of a
//! declaration — and restores the cursor without emitting anything.

use smallvec::SmallVec;

use crate::error::Diagnostic;
use crate::parser::ast::{
    BinaryCategory, BinaryExpressionNode, BinaryTerm, CompoundStatementNode, DeclarationNode,
    DeclarationType, ExpressionListNode, ExpressionListTerm, ExpressionNode,
    ExpressionStatementNode, IdExpressionNode, IsAsExpressionNode, LogicalAndExpressionNode,
    LogicalOrExpressionNode, Node, ParameterDeclarationListNode, ParameterDeclarationNode,
    ParameterModifier, PassingStyle, PostfixExpressionNode, PostfixTerm, PrefixExpressionNode,
    PrimaryExpressionNode, QualifiedIdNode, SelectionStatementNode, StatementNode,
    TranslationUnitNode, UnqualifiedIdNode, Visitor,
};
use crate::parser::ast::{
    AdditiveExpressionNode, AssignmentExpressionNode, CompareExpressionNode,
    EqualityExpressionNode, MultiplicativeExpressionNode, RelationalExpressionNode,
    ShiftExpressionNode,
};
use crate::parser::token::{SourcePosition, Token, TokenKind};

// ─────────────────────────────────────────────────────────────────────────────
// Operator classification
// ─────────────────────────────────────────────────────────────────────────────

/// Returns `true` for prefix operators: `!`.
pub fn is_prefix_operator(kind: TokenKind) -> bool {
    matches!(kind, TokenKind::Not)
}

/// Returns `true` for the unary postfix operators: `++` `--` `^` `&` `~` `$`.
pub fn is_postfix_operator(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::PlusPlus
            | TokenKind::MinusMinus
            | TokenKind::Caret
            | TokenKind::Ampersand
            | TokenKind::Tilde
            | TokenKind::Dollar
    )
}

/// Returns `true` for assignment operators:
/// `=` `*=` `/=` `%=` `+=` `-=` `>>=` `<<=`.
///
/// `&=`, `^=`, and `|=` are deliberately not in the set — the bitwise
/// operators have no precedence layer.
pub fn is_assignment_operator(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Assignment
            | TokenKind::MultiplyEq
            | TokenKind::SlashEq
            | TokenKind::ModuloEq
            | TokenKind::PlusEq
            | TokenKind::MinusEq
            | TokenKind::RightShiftEq
            | TokenKind::LeftShiftEq
    )
}

// ─────────────────────────────────────────────────────────────────────────────
// Token cursor
// ─────────────────────────────────────────────────────────────────────────────

/// Index-based view over one `parse` call's token slice.
///
/// Nothing else reads or writes the position: speculative parses save it
/// with [`Cursor::mark`] and put it back with [`Cursor::rewind`], which is
/// the entire backtracking mechanism.
#[derive(Debug, Clone, Copy)]
struct Cursor<'t> {
    tokens: &'t [Token],
    pos: usize,
}

impl<'t> Cursor<'t> {
    fn new(tokens: &'t [Token]) -> Self {
        Self { tokens, pos: 0 }
    }

    /// The token `k` places from the cursor, or `None` outside the slice.
    /// Negative `k` looks backwards, which diagnostics referring to
    /// "after `x`" need.
    fn lookahead(&self, k: isize) -> Option<&'t Token> {
        let idx = self.pos as isize + k;
        if idx >= 0 {
            self.tokens.get(idx as usize)
        } else {
            None
        }
    }

    /// Move forward `n` tokens, saturating at the end of the slice.
    fn advance(&mut self, n: usize) {
        self.pos = (self.pos + n).min(self.tokens.len());
    }

    /// `true` once every token has been consumed.
    fn at_end(&self) -> bool {
        self.pos == self.tokens.len()
    }

    /// Save the position for a speculative parse.
    fn mark(&self) -> usize {
        self.pos
    }

    /// Restore a position previously returned by [`Cursor::mark`].
    fn rewind(&mut self, mark: usize) {
        debug_assert!(mark <= self.tokens.len());
        self.pos = mark;
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Parser
// ─────────────────────────────────────────────────────────────────────────────

/// Accumulating parser for Cpp2 code sections.
///
/// The parser owns only the growing parse tree; tokens stay in the caller's
/// vector (every slice handed to [`Parser::parse`] must live for `'t`) and
/// diagnostics go to the caller's list.
///
/// # Example
///
/// ```
/// use prow_core::parser::parse::Parser;
/// use prow_core::parser::token::{SourcePosition, Token, TokenKind};
///
/// // y : int ;
/// let tokens = vec![
///     Token::new(TokenKind::Identifier, "y", SourcePosition::new(1, 1)),
///     Token::new(TokenKind::Colon, ":", SourcePosition::new(1, 3)),
///     Token::new(TokenKind::Keyword, "int", SourcePosition::new(1, 5)),
///     Token::new(TokenKind::Semicolon, ";", SourcePosition::new(1, 8)),
/// ];
/// let mut errors = Vec::new();
/// let mut parser = Parser::new();
/// assert!(parser.parse(&tokens, &mut errors));
/// assert_eq!(parser.parse_tree().declarations.len(), 1);
/// assert!(errors.is_empty());
/// ```
#[derive(Debug, Default)]
pub struct Parser<'t> {
    parse_tree: TranslationUnitNode<'t>,
}

impl<'t> Parser<'t> {
    /// Create a parser with an empty translation unit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse one code section's worth of tokens and splice the resulting
    /// declarations onto the accumulated translation unit.
    ///
    /// Returns `true` iff the whole slice was consumed and no diagnostic
    /// was appended during this call.  On failure the partial tree remains
    /// observable through [`Parser::parse_tree`].
    pub fn parse(&mut self, tokens: &'t [Token], errors: &mut Vec<Diagnostic>) -> bool {
        let errors_before = errors.len();
        let mut run = ParseRun {
            cursor: Cursor::new(tokens),
            errors: &mut *errors,
        };

        let mut unit = run.translation_unit();
        self.parse_tree.declarations.append(&mut unit.declarations);

        if !run.cursor.at_end() {
            run.error("unexpected text at end of Cpp2 code section");
            return false;
        }
        errors.len() == errors_before
    }

    /// The translation unit accumulated across all `parse` calls so far.
    pub fn parse_tree(&self) -> &TranslationUnitNode<'t> {
        &self.parse_tree
    }

    /// Walk the accumulated tree with `v`, starting at depth 0.
    pub fn visit<V: Visitor>(&self, v: &mut V) {
        self.parse_tree.visit(v, 0);
    }
}

/// Mutable state for the duration of a single [`Parser::parse`] call: the
/// cursor over this call's slice plus the caller's diagnostic sink.
struct ParseRun<'t, 'e> {
    cursor: Cursor<'t>,
    errors: &'e mut Vec<Diagnostic>,
}

impl<'t> ParseRun<'t, '_> {
    // ── Diagnostics ───────────────────────────────────────────────────────

    /// Append a diagnostic anchored to the current token (or, at the end of
    /// input, the last one), with the token's text after the message.
    fn error(&mut self, msg: impl AsRef<str>) {
        let msg = msg.as_ref();
        match self.peek(0).or_else(|| self.peek(-1)) {
            Some(tok) => self
                .errors
                .push(Diagnostic::new(tok.pos, format!("{msg} at {tok}"))),
            None => self
                .errors
                .push(Diagnostic::new(SourcePosition::SYNTHETIC, msg.to_string())),
        }
    }

    // ── Token access ──────────────────────────────────────────────────────

    fn peek(&self, k: isize) -> Option<&'t Token> {
        self.cursor.lookahead(k)
    }

    fn curr_is(&self, kind: TokenKind) -> bool {
        self.peek(0).is_some_and(|t| t.kind == kind)
    }

    fn curr_is_keyword(&self, text: &str) -> bool {
        self.peek(0).is_some_and(|t| t.is_keyword(text))
    }

    fn curr_is_identifier(&self, text: &str) -> bool {
        self.peek(0).is_some_and(|t| t.is_identifier(text))
    }

    // ── Unary expression strata ───────────────────────────────────────────

    /// ```text
    /// primary-expression:
    ///     literal
    ///     ( expression-list )
    /// ```
    fn primary_expression(&mut self) -> Option<PrimaryExpressionNode<'t>> {
        let tok = self.peek(0)?;
        match tok.kind {
            TokenKind::Identifier
            | TokenKind::Keyword
            | TokenKind::DecimalLiteral
            | TokenKind::FloatLiteral
            | TokenKind::StringLiteral
            | TokenKind::CharacterLiteral
            | TokenKind::BinaryLiteral
            | TokenKind::HexadecimalLiteral => {
                self.cursor.advance(1);
                Some(PrimaryExpressionNode::Identifier(tok))
            }
            TokenKind::LeftParen => {
                self.cursor.advance(1);
                let Some(list) = self.expression_list() else {
                    self.error("unexpected text - ( is not followed by an expression-list");
                    self.cursor.advance(1);
                    return None;
                };
                if !self.curr_is(TokenKind::RightParen) {
                    self.error("unexpected text - expression-list is not terminated by )");
                    self.cursor.advance(1);
                    return None;
                }
                self.cursor.advance(1);
                Some(PrimaryExpressionNode::ExpressionList(list))
            }
            _ => None,
        }
    }

    /// ```text
    /// postfix-expression:
    ///     primary-expression
    ///     postfix-expression postfix-operator
    ///     postfix-expression [ expression-list ]
    ///     postfix-expression ( expression-list? )
    /// ```
    fn postfix_expression(&mut self) -> Option<PostfixExpressionNode<'t>> {
        let expr = self.primary_expression()?;
        let mut n = PostfixExpressionNode {
            expr,
            ops: Vec::new(),
        };

        while let Some(op) = self.peek(0) {
            if !is_postfix_operator(op.kind)
                && !matches!(
                    op.kind,
                    TokenKind::LeftBracket | TokenKind::LeftParen | TokenKind::Dot
                )
            {
                break;
            }
            self.cursor.advance(1);

            let mut expr_list = None;
            match op.kind {
                TokenKind::LeftBracket => {
                    expr_list = self.expression_list();
                    if expr_list.is_none() {
                        self.error("subscript expression [ ] must not be empty");
                    }
                    if !self.curr_is(TokenKind::RightBracket) {
                        self.error("unexpected text - [ is not properly matched by ]");
                    }
                    self.cursor.advance(1);
                }
                TokenKind::LeftParen => {
                    expr_list = self.expression_list();
                    if !self.curr_is(TokenKind::RightParen) {
                        self.error("unexpected text - ( is not properly matched by )");
                    }
                    self.cursor.advance(1);
                }
                // TODO: `.` needs a member-access production (`. id-expression`);
                // until then the term is recorded with no operand.
                _ => {}
            }

            n.ops.push(PostfixTerm { op, expr_list });
        }
        Some(n)
    }

    /// ```text
    /// prefix-expression:
    ///     postfix-expression
    ///     prefix-operator prefix-expression
    /// ```
    ///
    /// If no postfix expression follows, the whole prefix is rejected —
    /// the operator tokens stay consumed.
    fn prefix_expression(&mut self) -> Option<PrefixExpressionNode<'t>> {
        let mut ops = SmallVec::new();
        while let Some(tok) = self.peek(0) {
            if !is_prefix_operator(tok.kind) {
                break;
            }
            ops.push(tok);
            self.cursor.advance(1);
        }
        let expr = self.postfix_expression()?;
        Some(PrefixExpressionNode { ops, expr })
    }

    // ── The binary precedence ladder ──────────────────────────────────────

    /// The shared shape of every ladder layer:
    ///
    /// ```text
    /// binary-expression:
    ///     term-expression { layer-operator term-expression }*
    /// ```
    ///
    /// A missing right operand after an operator diagnoses
    /// `invalid expression after <op>` and returns what was built so far.
    fn binary_expression<K, Term>(
        &mut self,
        is_valid_op: impl Fn(&Token) -> bool,
        term: impl Fn(&mut Self) -> Option<Term>,
    ) -> Option<BinaryExpressionNode<'t, K, Term>>
    where
        K: BinaryCategory,
        Term: Node,
    {
        let head = term(self)?;
        let mut n = BinaryExpressionNode::new(Box::new(head));
        while let Some(op) = self.peek(0) {
            if !is_valid_op(op) {
                break;
            }
            self.cursor.advance(1);

            match term(self) {
                Some(rhs) => n.terms.push(BinaryTerm {
                    op,
                    expr: Box::new(rhs),
                }),
                None => {
                    let prev = self.peek(-1).map(ToString::to_string).unwrap_or_default();
                    self.error(format!("invalid expression after {prev}"));
                    return Some(n);
                }
            }
        }
        Some(n)
    }

    fn is_as_expression(&mut self) -> Option<IsAsExpressionNode<'t>> {
        self.binary_expression(
            |t| t.is_keyword("is") || t.is_keyword("as"),
            Self::prefix_expression,
        )
    }

    fn multiplicative_expression(&mut self) -> Option<MultiplicativeExpressionNode<'t>> {
        self.binary_expression(
            |t| {
                matches!(
                    t.kind,
                    TokenKind::Multiply | TokenKind::Slash | TokenKind::Modulo
                )
            },
            Self::is_as_expression,
        )
    }

    fn additive_expression(&mut self) -> Option<AdditiveExpressionNode<'t>> {
        self.binary_expression(
            |t| matches!(t.kind, TokenKind::Plus | TokenKind::Minus),
            Self::multiplicative_expression,
        )
    }

    fn shift_expression(&mut self) -> Option<ShiftExpressionNode<'t>> {
        self.binary_expression(
            |t| matches!(t.kind, TokenKind::LeftShift | TokenKind::RightShift),
            Self::additive_expression,
        )
    }

    fn compare_expression(&mut self) -> Option<CompareExpressionNode<'t>> {
        self.binary_expression(|t| t.kind == TokenKind::Spaceship, Self::shift_expression)
    }

    fn relational_expression(&mut self) -> Option<RelationalExpressionNode<'t>> {
        self.binary_expression(
            |t| {
                matches!(
                    t.kind,
                    TokenKind::Less | TokenKind::LessEq | TokenKind::Greater | TokenKind::GreaterEq
                )
            },
            Self::compare_expression,
        )
    }

    fn equality_expression(&mut self) -> Option<EqualityExpressionNode<'t>> {
        self.binary_expression(
            |t| {
                matches!(
                    t.kind,
                    TokenKind::EqualComparison | TokenKind::NotEqualComparison
                )
            },
            Self::relational_expression,
        )
    }

    // Bitwise & ^ | layers would slot in here; they are not part of the
    // grammar.

    fn logical_and_expression(&mut self) -> Option<LogicalAndExpressionNode<'t>> {
        self.binary_expression(
            |t| t.kind == TokenKind::LogicalAnd,
            Self::equality_expression,
        )
    }

    fn logical_or_expression(&mut self) -> Option<LogicalOrExpressionNode<'t>> {
        self.binary_expression(
            |t| t.kind == TokenKind::LogicalOr,
            Self::logical_and_expression,
        )
    }

    fn assignment_expression(&mut self) -> Option<AssignmentExpressionNode<'t>> {
        self.binary_expression(
            |t| is_assignment_operator(t.kind),
            Self::logical_or_expression,
        )
    }

    // ── Expressions and expression lists ──────────────────────────────────

    /// ```text
    /// expression:
    ///     assignment-expression
    /// ```
    fn expression(&mut self) -> Option<ExpressionNode<'t>> {
        Some(ExpressionNode {
            expr: self.assignment_expression()?,
        })
    }

    /// ```text
    /// expression-list:
    ///     out? expression
    ///     expression-list , out? expression
    /// ```
    ///
    /// Backtracking point: if no first expression follows (even after a
    /// speculative `out`), the cursor is restored and `None` returned.
    fn expression_list(&mut self) -> Option<ExpressionListNode<'t>> {
        let start = self.cursor.mark();

        let mut pass = PassingStyle::In;
        if self.curr_is_identifier("out") {
            pass = PassingStyle::Out;
            self.cursor.advance(1);
        }
        let Some(first) = self.expression() else {
            self.cursor.rewind(start);
            return None;
        };

        let mut n = ExpressionListNode::default();
        n.expressions.push(ExpressionListTerm {
            pass,
            expr: Some(first),
        });

        while self.curr_is(TokenKind::Comma) {
            self.cursor.advance(1);
            let mut pass = PassingStyle::In;
            if self.curr_is_identifier("out") {
                pass = PassingStyle::Out;
                self.cursor.advance(1);
            }
            // A missing expression after the comma is recorded as a hole
            // for a later pass to diagnose.
            let expr = self.expression();
            n.expressions.push(ExpressionListTerm { pass, expr });
        }
        Some(n)
    }

    // ── Identifiers ───────────────────────────────────────────────────────

    /// ```text
    /// unqualified-id:
    ///     identifier
    /// ```
    ///
    /// Keywords are accepted too, so fundamental type names like `int`
    /// work as type references.
    fn unqualified_id(&mut self) -> Option<UnqualifiedIdNode<'t>> {
        let tok = self.peek(0)?;
        if tok.kind != TokenKind::Identifier && tok.kind != TokenKind::Keyword {
            return None;
        }
        self.cursor.advance(1);
        Some(UnqualifiedIdNode { identifier: tok })
    }

    /// ```text
    /// qualified-id:
    ///     unqualified-id { :: unqualified-id }+
    /// ```
    fn qualified_id(&mut self) -> Option<QualifiedIdNode<'t>> {
        let start = self.cursor.mark();

        let Some(first) = self.unqualified_id() else {
            self.cursor.rewind(start);
            return None;
        };
        if !self.curr_is(TokenKind::Scope) {
            self.cursor.rewind(start);
            return None;
        }

        let mut n = QualifiedIdNode::default();
        n.ids.push(first);
        while self.curr_is(TokenKind::Scope) {
            self.cursor.advance(1);
            let Some(id) = self.unqualified_id() else {
                self.error("invalid text, :: should be followed by a nested name");
                return None;
            };
            n.ids.push(id);
        }
        Some(n)
    }

    /// ```text
    /// id-expression:
    ///     qualified-id
    ///     unqualified-id
    /// ```
    fn id_expression(&mut self) -> Option<IdExpressionNode<'t>> {
        if let Some(q) = self.qualified_id() {
            return Some(IdExpressionNode::Qualified(q));
        }
        if let Some(u) = self.unqualified_id() {
            return Some(IdExpressionNode::Unqualified(u));
        }
        None
    }

    // ── Statements ────────────────────────────────────────────────────────

    /// ```text
    /// expression-statement:
    ///     expression ;
    ///     expression
    /// ```
    fn expression_statement(
        &mut self,
        semicolon_required: bool,
    ) -> Option<ExpressionStatementNode<'t>> {
        let expr = self.expression()?;
        if semicolon_required && !self.curr_is(TokenKind::Semicolon) {
            self.error("expression-statement does not end with semicolon");
            return None;
        }
        if self.curr_is(TokenKind::Semicolon) {
            self.cursor.advance(1);
        }
        Some(ExpressionStatementNode { expr })
    }

    /// ```text
    /// selection-statement:
    ///     if constexpr? expression compound-statement
    ///     if constexpr? expression compound-statement else compound-statement
    /// ```
    fn selection_statement(&mut self) -> Option<SelectionStatementNode<'t>> {
        let identifier = match self.peek(0) {
            Some(t) if t.is_keyword("if") => t,
            _ => return None,
        };
        self.cursor.advance(1);

        let mut is_constexpr = false;
        if self.curr_is_keyword("constexpr") {
            is_constexpr = true;
            self.cursor.advance(1);
        }

        let Some(expression) = self.expression() else {
            self.error("invalid if condition");
            return None;
        };

        let Some(true_branch) = self.compound_statement() else {
            self.error("invalid if branch body");
            return None;
        };

        let false_branch = if self.curr_is_keyword("else") {
            self.cursor.advance(1);
            match self.compound_statement() {
                Some(branch) => branch,
                None => {
                    self.error("invalid else branch body");
                    return None;
                }
            }
        } else {
            // An empty branch simplifies downstream passes; position (0,0)
            // marks it as implicit.
            CompoundStatementNode::synthetic()
        };

        Some(SelectionStatementNode {
            is_constexpr,
            identifier,
            expression,
            true_branch,
            false_branch,
        })
    }

    /// ```text
    /// compound-statement:
    ///     { statement* }
    /// ```
    fn compound_statement(&mut self) -> Option<CompoundStatementNode<'t>> {
        let open = match self.peek(0) {
            Some(t) if t.kind == TokenKind::LeftBrace => t,
            _ => return None,
        };
        let mut n = CompoundStatementNode {
            pos: open.pos,
            statements: Vec::new(),
        };
        self.cursor.advance(1);

        while !self.curr_is(TokenKind::RightBrace) {
            let Some(stmt) = self.statement(true) else {
                self.error("invalid statement in compound-statement");
                return None;
            };
            n.statements.push(stmt);
        }
        self.cursor.advance(1);
        Some(n)
    }

    /// ```text
    /// statement:
    ///     selection-statement
    ///     compound-statement
    ///     declaration
    ///     expression-statement
    /// ```
    ///
    /// Alternatives are tried in that order; the first success wins.
    fn statement(&mut self, semicolon_required: bool) -> Option<StatementNode<'t>> {
        if let Some(s) = self.selection_statement() {
            return Some(StatementNode::Selection(Box::new(s)));
        }
        if let Some(s) = self.compound_statement() {
            return Some(StatementNode::Compound(s));
        }
        if let Some(s) = self.declaration(true) {
            return Some(StatementNode::Declaration(Box::new(s)));
        }
        if let Some(s) = self.expression_statement(semicolon_required) {
            return Some(StatementNode::Expression(s));
        }
        None
    }

    // ── Declarations ──────────────────────────────────────────────────────

    /// ```text
    /// parameter-declaration:
    ///     parameter-direction? this-specifier? declaration
    ///
    /// parameter-direction: one of
    ///     in inout out move forward
    ///
    /// this-specifier: one of
    ///     implicit virtual override final
    /// ```
    fn parameter_declaration(&mut self) -> Option<ParameterDeclarationNode<'t>> {
        let pos = self.peek(0)?.pos;

        let mut pass = PassingStyle::In;
        if let Some(tok) = self.peek(0) {
            if tok.kind == TokenKind::Identifier {
                let style = match tok.text.as_str() {
                    "in" => Some(PassingStyle::In),
                    "inout" => Some(PassingStyle::Inout),
                    "out" => Some(PassingStyle::Out),
                    "move" => Some(PassingStyle::Move),
                    "forward" => Some(PassingStyle::Forward),
                    _ => None,
                };
                if let Some(style) = style {
                    pass = style;
                    self.cursor.advance(1);
                }
            }
        }

        let mut modifier = ParameterModifier::None;
        if let Some(tok) = self.peek(0) {
            if tok.kind == TokenKind::Identifier {
                let m = match tok.text.as_str() {
                    "implicit" => Some(ParameterModifier::Implicit),
                    "virtual" => Some(ParameterModifier::Virtual),
                    "override" => Some(ParameterModifier::Override),
                    "final" => Some(ParameterModifier::Final),
                    _ => None,
                };
                if let Some(m) = m {
                    modifier = m;
                    self.cursor.advance(1);
                }
            }
        }

        let declaration = self.declaration(false)?;
        Some(ParameterDeclarationNode {
            pos,
            pass,
            modifier,
            declaration,
        })
    }

    /// ```text
    /// parameter-declaration-list:
    ///     ( parameter-declaration? { , parameter-declaration }* )
    /// ```
    fn parameter_declaration_list(&mut self) -> Option<ParameterDeclarationListNode<'t>> {
        let open = match self.peek(0) {
            Some(t) if t.kind == TokenKind::LeftParen => t,
            _ => return None,
        };
        let pos_open_paren = open.pos;
        self.cursor.advance(1);

        let mut parameters = Vec::new();
        while let Some(param) = self.parameter_declaration() {
            parameters.push(param);
            if self.curr_is(TokenKind::RightParen) {
                break;
            }
            if !self.curr_is(TokenKind::Comma) {
                self.error("expected , in parameter list");
                return None;
            }
            self.cursor.advance(1);
        }

        let close = match self.peek(0) {
            Some(t) if t.kind == TokenKind::RightParen => t,
            _ => {
                self.error("invalid parameter list");
                self.cursor.advance(1);
                return None;
            }
        };
        let pos_close_paren = close.pos;
        self.cursor.advance(1);

        Some(ParameterDeclarationListNode {
            pos_open_paren,
            pos_close_paren,
            parameters,
        })
    }

    /// ```text
    /// declaration:
    ///     identifier : parameter-declaration-list = statement
    ///     identifier : id-expression? = statement
    ///     identifier : id-expression
    /// ```
    ///
    /// Backtracking point: a name not followed by `:` restores the cursor
    /// and returns `None` so another alternative can try the same tokens.
    fn declaration(&mut self, semicolon_required: bool) -> Option<DeclarationNode<'t>> {
        if self.cursor.at_end() {
            return None;
        }
        let start = self.cursor.mark();

        let identifier = self.unqualified_id()?;
        if !self.curr_is(TokenKind::Colon) {
            self.cursor.rewind(start);
            return None;
        }
        self.cursor.advance(1);

        // The type is optional: function form, object form, or elided.
        let ty = if let Some(list) = self.parameter_declaration_list() {
            DeclarationType::Function(list)
        } else if let Some(id) = self.id_expression() {
            DeclarationType::Object(id)
        } else {
            DeclarationType::Object(IdExpressionNode::Empty)
        };

        if !self.curr_is(TokenKind::Assignment) {
            if self.curr_is(TokenKind::Semicolon) {
                self.cursor.advance(1);
            } else if semicolon_required {
                self.error("missing semicolon at end of declaration");
                return None;
            }
            return Some(DeclarationNode {
                identifier,
                ty,
                initializer: None,
            });
        }
        self.cursor.advance(1);

        let Some(init) = self.statement(semicolon_required) else {
            self.error("ill-formed initializer");
            self.cursor.advance(1);
            return None;
        };

        Some(DeclarationNode {
            identifier,
            ty,
            initializer: Some(Box::new(init)),
        })
    }

    /// ```text
    /// translation-unit:
    ///     declaration*
    /// ```
    fn translation_unit(&mut self) -> TranslationUnitNode<'t> {
        let mut n = TranslationUnitNode::default();
        while let Some(decl) = self.declaration(true) {
            n.declarations.push(decl);
        }
        n
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
