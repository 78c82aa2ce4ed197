//! Cpp2 parse-tree node definitions and the traversal protocol.
//!
//! Every node either stores its own [`SourcePosition`] or derives one from
//! its leftmost token, and the tree structure *is* the precedence: an outer
//! binary layer never holds an operator belonging to an inner layer.
//!
//! # Structure
//!
//! - [`TranslationUnitNode`] — root node, a sequence of declarations.
//! - Expression strata: [`PrimaryExpressionNode`], [`PostfixExpressionNode`],
//!   [`PrefixExpressionNode`], then the [`BinaryExpressionNode`] ladder up to
//!   [`AssignmentExpressionNode`] and [`ExpressionNode`].
//! - Identifiers: [`UnqualifiedIdNode`], [`QualifiedIdNode`],
//!   [`IdExpressionNode`].
//! - Statements: [`StatementNode`] over expression / compound / selection /
//!   declaration alternatives.
//! - Declarations: [`DeclarationNode`], [`ParameterDeclarationNode`],
//!   [`ParameterDeclarationListNode`].
//!
//! # Ownership
//!
//! The tree owns its shape; tokens are borrowed from the caller's token
//! vector (`&'t Token`), which therefore must outlive the tree.  Nodes are
//! neither copied nor shared — each child has exactly one owner.
//!
//! # Traversal
//!
//! [`Node::visit`] performs a pre-order walk: the visitor's `start_*` hook,
//! the children at `depth + 1` in source order (tokens that appear directly
//! inside a node are reported through [`Visitor::start_token`]), then the
//! `end_*` hook.  [`Visitor`] provides default no-op hooks for every node
//! kind, so an implementation only writes the ones it observes.

use std::marker::PhantomData;

use smallvec::SmallVec;

use crate::parser::token::{SourcePosition, Token};

// ─────────────────────────────────────────────────────────────────────────────
// Passing styles and parameter modifiers
// ─────────────────────────────────────────────────────────────────────────────

/// Direction qualifier for a parameter or call argument.
///
/// All five styles may appear on a parameter declaration; inside an
/// expression-list only `out` is recognizable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PassingStyle {
    /// Read-only input (the default).
    #[default]
    In,
    /// Read-write.
    Inout,
    /// Write-only output.
    Out,
    /// Transfer of ownership into the callee.
    Move,
    /// Perfect forwarding.
    Forward,
}

impl PassingStyle {
    /// The Cpp2 spelling of this style.
    pub fn as_str(self) -> &'static str {
        match self {
            PassingStyle::In => "in",
            PassingStyle::Inout => "inout",
            PassingStyle::Out => "out",
            PassingStyle::Move => "move",
            PassingStyle::Forward => "forward",
        }
    }
}

impl std::fmt::Display for PassingStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `this`-style specifier on a parameter declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParameterModifier {
    /// No modifier was written.
    #[default]
    None,
    /// `implicit`
    Implicit,
    /// `virtual`
    Virtual,
    /// `override`
    Override,
    /// `final`
    Final,
}

impl ParameterModifier {
    /// The Cpp2 spelling, or `None` when no modifier was written.
    pub fn as_str(self) -> Option<&'static str> {
        match self {
            ParameterModifier::None => None,
            ParameterModifier::Implicit => Some("implicit"),
            ParameterModifier::Virtual => Some("virtual"),
            ParameterModifier::Override => Some("override"),
            ParameterModifier::Final => Some("final"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Traversal contract
// ─────────────────────────────────────────────────────────────────────────────

/// Uniform interface every parse-tree node implements.
pub trait Node {
    /// The position of the node's leftmost token.  Synthetic nodes (and the
    /// empty alternatives of variant nodes) report [`SourcePosition::SYNTHETIC`].
    fn position(&self) -> SourcePosition;

    /// Pre-order walk: `start` hook, children at `depth + 1` in source
    /// order, `end` hook.
    fn visit<V: Visitor>(&self, v: &mut V, depth: usize);
}

// ─────────────────────────────────────────────────────────────────────────────
// Identifiers
// ─────────────────────────────────────────────────────────────────────────────

/// A single identifier or keyword used as a name.
///
/// Keywords are admitted so fundamental type names spelled as keywords
/// (`int`, `bool`, …) can appear wherever a type reference is expected.
#[derive(Debug)]
pub struct UnqualifiedIdNode<'t> {
    /// The identifier or keyword token.
    pub identifier: &'t Token,
}

impl<'t> Node for UnqualifiedIdNode<'t> {
    fn position(&self) -> SourcePosition {
        self.identifier.pos
    }

    fn visit<V: Visitor>(&self, v: &mut V, depth: usize) {
        v.start_unqualified_id(self, depth);
        v.start_token(self.identifier, depth + 1);
        v.end_unqualified_id(self, depth);
    }
}

/// A `::`-separated chain of [`UnqualifiedIdNode`]s, e.g. `a::b::c`.
///
/// Always non-empty once constructed.
#[derive(Debug, Default)]
pub struct QualifiedIdNode<'t> {
    /// The name segments in source order.
    pub ids: SmallVec<[UnqualifiedIdNode<'t>; 2]>,
}

impl<'t> Node for QualifiedIdNode<'t> {
    fn position(&self) -> SourcePosition {
        debug_assert!(!self.ids.is_empty());
        match self.ids.first() {
            Some(id) => id.position(),
            None => SourcePosition::SYNTHETIC,
        }
    }

    fn visit<V: Visitor>(&self, v: &mut V, depth: usize) {
        v.start_qualified_id(self, depth);
        for id in &self.ids {
            id.visit(v, depth + 1);
        }
        v.end_qualified_id(self, depth);
    }
}

/// Either form of name reference, or the empty placeholder for an elided
/// object type in a declaration.
#[derive(Debug, Default)]
pub enum IdExpressionNode<'t> {
    /// No name; used for declarations whose type is elided.
    #[default]
    Empty,
    /// A `::`-qualified name.
    Qualified(QualifiedIdNode<'t>),
    /// A plain name.
    Unqualified(UnqualifiedIdNode<'t>),
}

impl<'t> IdExpressionNode<'t> {
    /// Returns `true` for the empty (elided) alternative.
    pub fn is_empty(&self) -> bool {
        matches!(self, IdExpressionNode::Empty)
    }
}

impl<'t> Node for IdExpressionNode<'t> {
    fn position(&self) -> SourcePosition {
        match self {
            IdExpressionNode::Empty => SourcePosition::SYNTHETIC,
            IdExpressionNode::Qualified(q) => q.position(),
            IdExpressionNode::Unqualified(u) => u.position(),
        }
    }

    fn visit<V: Visitor>(&self, v: &mut V, depth: usize) {
        v.start_id_expression(self, depth);
        match self {
            IdExpressionNode::Empty => {}
            IdExpressionNode::Qualified(q) => q.visit(v, depth + 1),
            IdExpressionNode::Unqualified(u) => u.visit(v, depth + 1),
        }
        v.end_id_expression(self, depth);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Unary expression strata
// ─────────────────────────────────────────────────────────────────────────────

/// The innermost expression stratum.
#[derive(Debug, Default)]
pub enum PrimaryExpressionNode<'t> {
    /// Unconstructed / failed alternative.
    #[default]
    Empty,
    /// A single identifier, keyword, or literal token.
    Identifier(&'t Token),
    /// A parenthesized group `( expression-list )`.  The list is never
    /// empty: an empty pair of parentheses fails to parse as a primary.
    ExpressionList(ExpressionListNode<'t>),
}

impl<'t> Node for PrimaryExpressionNode<'t> {
    fn position(&self) -> SourcePosition {
        match self {
            PrimaryExpressionNode::Empty => SourcePosition::SYNTHETIC,
            PrimaryExpressionNode::Identifier(tok) => tok.pos,
            PrimaryExpressionNode::ExpressionList(list) => list.position(),
        }
    }

    fn visit<V: Visitor>(&self, v: &mut V, depth: usize) {
        v.start_primary_expression(self, depth);
        match self {
            PrimaryExpressionNode::Empty => {}
            PrimaryExpressionNode::Identifier(tok) => v.start_token(tok, depth + 1),
            PrimaryExpressionNode::ExpressionList(list) => list.visit(v, depth + 1),
        }
        v.end_primary_expression(self, depth);
    }
}

/// One applied postfix term: the operator token plus its operand list where
/// the operator takes one.
#[derive(Debug)]
pub struct PostfixTerm<'t> {
    /// The postfix operator token (`++`, `--`, `^`, `&`, `~`, `$`, `[`,
    /// `(`, or `.`).
    pub op: &'t Token,
    /// Operand list for `[` (required non-empty) and `(` (absent for an
    /// empty call `f()`); always `None` for the unary postfix operators.
    pub expr_list: Option<ExpressionListNode<'t>>,
}

/// A primary expression with a sequence of postfix terms applied
/// left-to-right, e.g. `f(x)[i]++`.
#[derive(Debug)]
pub struct PostfixExpressionNode<'t> {
    /// The primary operand.
    pub expr: PrimaryExpressionNode<'t>,
    /// The postfix terms in application order.
    pub ops: Vec<PostfixTerm<'t>>,
}

impl<'t> Node for PostfixExpressionNode<'t> {
    fn position(&self) -> SourcePosition {
        self.expr.position()
    }

    fn visit<V: Visitor>(&self, v: &mut V, depth: usize) {
        v.start_postfix_expression(self, depth);
        self.expr.visit(v, depth + 1);
        for term in &self.ops {
            v.start_token(term.op, depth + 1);
            if let Some(list) = &term.expr_list {
                list.visit(v, depth + 1);
            }
        }
        v.end_postfix_expression(self, depth);
    }
}

/// Zero or more prefix operators wrapping a postfix expression.
///
/// The operators apply left-to-right outermost-first; `!` is currently the
/// only prefix operator.
#[derive(Debug)]
pub struct PrefixExpressionNode<'t> {
    /// The prefix operator tokens, outermost first.
    pub ops: SmallVec<[&'t Token; 2]>,
    /// The wrapped operand.
    pub expr: PostfixExpressionNode<'t>,
}

impl<'t> Node for PrefixExpressionNode<'t> {
    fn position(&self) -> SourcePosition {
        match self.ops.first() {
            Some(op) => op.pos,
            None => self.expr.position(),
        }
    }

    fn visit<V: Visitor>(&self, v: &mut V, depth: usize) {
        v.start_prefix_expression(self, depth);
        for op in &self.ops {
            v.start_token(op, depth + 1);
        }
        self.expr.visit(v, depth + 1);
        v.end_prefix_expression(self, depth);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// The binary precedence ladder
// ─────────────────────────────────────────────────────────────────────────────

/// Compile-time tag naming one layer of the binary precedence ladder.
///
/// The tag exists only so visitors can display the layer's grammar
/// category; it carries no data.
pub trait BinaryCategory {
    /// Category name as shown by visitors, e.g. `"additive"`.
    const NAME: &'static str;
}

macro_rules! binary_category {
    ($(#[$doc:meta])* $marker:ident, $name:literal) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy)]
        pub struct $marker;

        impl BinaryCategory for $marker {
            const NAME: &'static str = $name;
        }
    };
}

binary_category!(
    /// `is` / `as` type queries.
    IsAs, "is-as"
);
binary_category!(
    /// `*`, `/`, `%`.
    Multiplicative, "multiplicative"
);
binary_category!(
    /// `+`, `-`.
    Additive, "additive"
);
binary_category!(
    /// `<<`, `>>`.
    Shift, "shift"
);
binary_category!(
    /// `<=>`.
    Compare, "compare"
);
binary_category!(
    /// `<`, `>`, `<=`, `>=`.
    Relational, "relational"
);
binary_category!(
    /// `==`, `!=`.
    Equality, "equality"
);
binary_category!(
    /// `&&`.
    LogicalAnd, "logical-and"
);
binary_category!(
    /// `||`.
    LogicalOr, "logical-or"
);
binary_category!(
    /// `=` and the compound assignment operators.
    Assignment, "assignment"
);

/// One `(operator, right-operand)` pair in a binary expression.
#[derive(Debug)]
pub struct BinaryTerm<'t, Term> {
    /// The operator token.
    pub op: &'t Token,
    /// The right operand.
    pub expr: Box<Term>,
}

/// One layer of the left-associative binary precedence ladder: a head
/// operand of the next-inner layer plus a sequence of
/// ([`BinaryTerm::op`], [`BinaryTerm::expr`]) pairs at this layer's
/// precedence.
///
/// The layers chain by type, outermost first:
/// [`AssignmentExpressionNode`] → [`LogicalOrExpressionNode`] →
/// [`LogicalAndExpressionNode`] → [`EqualityExpressionNode`] →
/// [`RelationalExpressionNode`] → [`CompareExpressionNode`] →
/// [`ShiftExpressionNode`] → [`AdditiveExpressionNode`] →
/// [`MultiplicativeExpressionNode`] → [`IsAsExpressionNode`] →
/// [`PrefixExpressionNode`].  Bitwise `&`, `^`, and `|` have no layer.
#[derive(Debug)]
pub struct BinaryExpressionNode<'t, K, Term> {
    /// The leftmost operand.
    pub expr: Box<Term>,
    /// Subsequent operands, each preceded by an operator of this layer.
    pub terms: Vec<BinaryTerm<'t, Term>>,
    category: PhantomData<K>,
}

impl<'t, K: BinaryCategory, Term> BinaryExpressionNode<'t, K, Term> {
    /// Create a layer holding just a head operand.
    pub fn new(expr: Box<Term>) -> Self {
        Self {
            expr,
            terms: Vec::new(),
            category: PhantomData,
        }
    }
}

impl<'t, K: BinaryCategory, Term: Node> Node for BinaryExpressionNode<'t, K, Term> {
    fn position(&self) -> SourcePosition {
        self.expr.position()
    }

    fn visit<V: Visitor>(&self, v: &mut V, depth: usize) {
        v.start_binary_expression(self, depth);
        self.expr.visit(v, depth + 1);
        for term in &self.terms {
            v.start_token(term.op, depth + 1);
            term.expr.visit(v, depth + 1);
        }
        v.end_binary_expression(self, depth);
    }
}

/// `prefix-expression (is|as prefix-expression)*`
pub type IsAsExpressionNode<'t> = BinaryExpressionNode<'t, IsAs, PrefixExpressionNode<'t>>;
/// `is-as-expression ((*|/|%) is-as-expression)*`
pub type MultiplicativeExpressionNode<'t> =
    BinaryExpressionNode<'t, Multiplicative, IsAsExpressionNode<'t>>;
/// `multiplicative-expression ((+|-) multiplicative-expression)*`
pub type AdditiveExpressionNode<'t> =
    BinaryExpressionNode<'t, Additive, MultiplicativeExpressionNode<'t>>;
/// `additive-expression ((<<|>>) additive-expression)*`
pub type ShiftExpressionNode<'t> = BinaryExpressionNode<'t, Shift, AdditiveExpressionNode<'t>>;
/// `shift-expression (<=> shift-expression)*`
pub type CompareExpressionNode<'t> = BinaryExpressionNode<'t, Compare, ShiftExpressionNode<'t>>;
/// `compare-expression ((<|>|<=|>=) compare-expression)*`
pub type RelationalExpressionNode<'t> =
    BinaryExpressionNode<'t, Relational, CompareExpressionNode<'t>>;
/// `relational-expression ((==|!=) relational-expression)*`
pub type EqualityExpressionNode<'t> =
    BinaryExpressionNode<'t, Equality, RelationalExpressionNode<'t>>;
/// `equality-expression (&& equality-expression)*`
pub type LogicalAndExpressionNode<'t> =
    BinaryExpressionNode<'t, LogicalAnd, EqualityExpressionNode<'t>>;
/// `logical-and-expression (|| logical-and-expression)*`
pub type LogicalOrExpressionNode<'t> =
    BinaryExpressionNode<'t, LogicalOr, LogicalAndExpressionNode<'t>>;
/// `logical-or-expression (assignment-operator logical-or-expression)*`
pub type AssignmentExpressionNode<'t> =
    BinaryExpressionNode<'t, Assignment, LogicalOrExpressionNode<'t>>;

// ─────────────────────────────────────────────────────────────────────────────
// Expressions and expression lists
// ─────────────────────────────────────────────────────────────────────────────

/// A complete expression: the outermost (assignment) ladder layer.
#[derive(Debug)]
pub struct ExpressionNode<'t> {
    /// The owned assignment-expression.
    pub expr: AssignmentExpressionNode<'t>,
}

impl<'t> Node for ExpressionNode<'t> {
    fn position(&self) -> SourcePosition {
        self.expr.position()
    }

    fn visit<V: Visitor>(&self, v: &mut V, depth: usize) {
        v.start_expression(self, depth);
        self.expr.visit(v, depth + 1);
        v.end_expression(self, depth);
    }
}

/// One term of an [`ExpressionListNode`].
#[derive(Debug)]
pub struct ExpressionListTerm<'t> {
    /// How the argument is passed.  Only `out` is recognizable inside an
    /// expression-list; every other term is `in`.
    pub pass: PassingStyle,
    /// The argument expression.  `None` when the source had a comma with no
    /// expression after it; the parser records the hole as-is so a later
    /// pass can diagnose it.
    pub expr: Option<ExpressionNode<'t>>,
}

/// A comma-separated sequence of (passing style, expression) terms, as
/// found in parentheses and subscripts.
///
/// Never empty once constructed: the parser backtracks instead of building
/// an empty list.
#[derive(Debug, Default)]
pub struct ExpressionListNode<'t> {
    /// The terms in source order.
    pub expressions: Vec<ExpressionListTerm<'t>>,
}

impl<'t> Node for ExpressionListNode<'t> {
    fn position(&self) -> SourcePosition {
        debug_assert!(!self.expressions.is_empty());
        match self.expressions.first().and_then(|t| t.expr.as_ref()) {
            Some(expr) => expr.position(),
            None => SourcePosition::SYNTHETIC,
        }
    }

    fn visit<V: Visitor>(&self, v: &mut V, depth: usize) {
        v.start_expression_list(self, depth);
        for term in &self.expressions {
            if let Some(expr) = &term.expr {
                expr.visit(v, depth + 1);
            }
        }
        v.end_expression_list(self, depth);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Statements
// ─────────────────────────────────────────────────────────────────────────────

/// An expression used as a statement, e.g. `f(x);`.
#[derive(Debug)]
pub struct ExpressionStatementNode<'t> {
    /// The expression.
    pub expr: ExpressionNode<'t>,
}

impl<'t> Node for ExpressionStatementNode<'t> {
    fn position(&self) -> SourcePosition {
        self.expr.position()
    }

    fn visit<V: Visitor>(&self, v: &mut V, depth: usize) {
        v.start_expression_statement(self, depth);
        self.expr.visit(v, depth + 1);
        v.end_expression_statement(self, depth);
    }
}

/// A braced sequence of statements `{ … }`.
#[derive(Debug)]
pub struct CompoundStatementNode<'t> {
    /// Position of the opening `{`, or [`SourcePosition::SYNTHETIC`] for
    /// the implicit empty `else` branch.
    pub pos: SourcePosition,
    /// The statements in source order.
    pub statements: Vec<StatementNode<'t>>,
}

impl<'t> CompoundStatementNode<'t> {
    /// The empty compound statement the parser attaches when an `if` has no
    /// `else` in the source.
    pub fn synthetic() -> Self {
        Self {
            pos: SourcePosition::SYNTHETIC,
            statements: Vec::new(),
        }
    }
}

impl<'t> Node for CompoundStatementNode<'t> {
    fn position(&self) -> SourcePosition {
        self.pos
    }

    fn visit<V: Visitor>(&self, v: &mut V, depth: usize) {
        v.start_compound_statement(self, depth);
        for stmt in &self.statements {
            stmt.visit(v, depth + 1);
        }
        v.end_compound_statement(self, depth);
    }
}

/// `if constexpr? expression compound-statement (else compound-statement)?`
///
/// The false branch is always present: when the source has no `else`, the
/// parser attaches [`CompoundStatementNode::synthetic`] so downstream
/// passes never special-case a missing branch.
#[derive(Debug)]
pub struct SelectionStatementNode<'t> {
    /// `true` when `if constexpr` was written.
    pub is_constexpr: bool,
    /// The `if` keyword token.
    pub identifier: &'t Token,
    /// The condition.
    pub expression: ExpressionNode<'t>,
    /// The branch taken when the condition holds.
    pub true_branch: CompoundStatementNode<'t>,
    /// The branch taken otherwise; synthetic when no `else` was written.
    pub false_branch: CompoundStatementNode<'t>,
}

impl<'t> Node for SelectionStatementNode<'t> {
    fn position(&self) -> SourcePosition {
        self.identifier.pos
    }

    fn visit<V: Visitor>(&self, v: &mut V, depth: usize) {
        v.start_selection_statement(self, depth);
        v.start_token(self.identifier, depth + 1);
        self.expression.visit(v, depth + 1);
        self.true_branch.visit(v, depth + 1);
        self.false_branch.visit(v, depth + 1);
        v.end_selection_statement(self, depth);
    }
}

/// Any statement alternative.
#[derive(Debug)]
pub enum StatementNode<'t> {
    /// An expression statement.
    Expression(ExpressionStatementNode<'t>),
    /// A braced block.
    Compound(CompoundStatementNode<'t>),
    /// An `if` statement.
    Selection(Box<SelectionStatementNode<'t>>),
    /// A nested declaration.
    Declaration(Box<DeclarationNode<'t>>),
}

impl<'t> Node for StatementNode<'t> {
    fn position(&self) -> SourcePosition {
        match self {
            StatementNode::Expression(s) => s.position(),
            StatementNode::Compound(s) => s.position(),
            StatementNode::Selection(s) => s.position(),
            StatementNode::Declaration(s) => s.position(),
        }
    }

    fn visit<V: Visitor>(&self, v: &mut V, depth: usize) {
        v.start_statement(self, depth);
        match self {
            StatementNode::Expression(s) => s.visit(v, depth + 1),
            StatementNode::Compound(s) => s.visit(v, depth + 1),
            StatementNode::Selection(s) => s.visit(v, depth + 1),
            StatementNode::Declaration(s) => s.visit(v, depth + 1),
        }
        v.end_statement(self, depth);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Declarations
// ─────────────────────────────────────────────────────────────────────────────

/// `parameter-direction? this-specifier? declaration` inside a parameter
/// list.
#[derive(Debug)]
pub struct ParameterDeclarationNode<'t> {
    /// Position of the parameter's first token.
    pub pos: SourcePosition,
    /// The passing style; `in` when none was written.
    pub pass: PassingStyle,
    /// The `this`-specifier; [`ParameterModifier::None`] when absent.
    pub modifier: ParameterModifier,
    /// The parameter's own declaration (name, type, optional initializer).
    pub declaration: DeclarationNode<'t>,
}

impl<'t> Node for ParameterDeclarationNode<'t> {
    fn position(&self) -> SourcePosition {
        self.pos
    }

    fn visit<V: Visitor>(&self, v: &mut V, depth: usize) {
        v.start_parameter_declaration(self, depth);
        self.declaration.visit(v, depth + 1);
        v.end_parameter_declaration(self, depth);
    }
}

/// A parenthesized, comma-separated parameter list.
#[derive(Debug)]
pub struct ParameterDeclarationListNode<'t> {
    /// Position of the opening `(`.
    pub pos_open_paren: SourcePosition,
    /// Position of the closing `)`.
    pub pos_close_paren: SourcePosition,
    /// The parameters in source order; may be empty (`()`).
    pub parameters: Vec<ParameterDeclarationNode<'t>>,
}

impl<'t> Node for ParameterDeclarationListNode<'t> {
    fn position(&self) -> SourcePosition {
        self.pos_open_paren
    }

    fn visit<V: Visitor>(&self, v: &mut V, depth: usize) {
        v.start_parameter_declaration_list(self, depth);
        for param in &self.parameters {
            param.visit(v, depth + 1);
        }
        v.end_parameter_declaration_list(self, depth);
    }
}

/// The type alternative of a [`DeclarationNode`].
#[derive(Debug)]
pub enum DeclarationType<'t> {
    /// A function: the declared name is followed by a parameter list.
    Function(ParameterDeclarationListNode<'t>),
    /// An object: the declared name is followed by a type name, possibly
    /// elided ([`IdExpressionNode::Empty`]).
    Object(IdExpressionNode<'t>),
}

/// `identifier : type? (= statement)?` — the single declaration form of the
/// Cpp2 grammar, covering objects and functions alike.
#[derive(Debug)]
pub struct DeclarationNode<'t> {
    /// The declared name.
    pub identifier: UnqualifiedIdNode<'t>,
    /// Function or object type.
    pub ty: DeclarationType<'t>,
    /// The initializer after `=`, when present.
    pub initializer: Option<Box<StatementNode<'t>>>,
}

impl<'t> DeclarationNode<'t> {
    /// Returns `true` when this declares a function.
    pub fn is_function(&self) -> bool {
        matches!(self.ty, DeclarationType::Function(_))
    }

    /// Returns `true` when this declares an object.
    pub fn is_object(&self) -> bool {
        matches!(self.ty, DeclarationType::Object(_))
    }
}

impl<'t> Node for DeclarationNode<'t> {
    fn position(&self) -> SourcePosition {
        self.identifier.position()
    }

    fn visit<V: Visitor>(&self, v: &mut V, depth: usize) {
        v.start_declaration(self, depth);
        self.identifier.visit(v, depth + 1);
        match &self.ty {
            DeclarationType::Function(list) => list.visit(v, depth + 1),
            DeclarationType::Object(id) => id.visit(v, depth + 1),
        }
        if let Some(init) = &self.initializer {
            init.visit(v, depth + 1);
        }
        v.end_declaration(self, depth);
    }
}

/// The root node: every declaration parsed so far, across all `parse`
/// calls fed to the same parser.
#[derive(Debug, Default)]
pub struct TranslationUnitNode<'t> {
    /// The declarations in the order they were parsed.
    pub declarations: Vec<DeclarationNode<'t>>,
}

impl<'t> Node for TranslationUnitNode<'t> {
    fn position(&self) -> SourcePosition {
        match self.declarations.first() {
            Some(decl) => decl.position(),
            None => SourcePosition::SYNTHETIC,
        }
    }

    fn visit<V: Visitor>(&self, v: &mut V, depth: usize) {
        v.start_translation_unit(self, depth);
        for decl in &self.declarations {
            decl.visit(v, depth + 1);
        }
        v.end_translation_unit(self, depth);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Visitor
// ─────────────────────────────────────────────────────────────────────────────

/// Receiver of pre-order traversal events.
///
/// Every hook has a no-op default, so a visitor implements only the node
/// kinds it cares about.  Tokens that appear directly inside a node
/// (operator tokens, identifiers, the leading `if`) are reported through
/// [`Visitor::start_token`] between the owning node's `start`/`end` pair;
/// tokens have no `end` event.
///
/// The binary-ladder hooks are generic over the layer: implement them once
/// and use [`BinaryCategory::NAME`] to tell layers apart.
#[allow(unused_variables)]
pub trait Visitor {
    /// A token visited in place.
    fn start_token(&mut self, tok: &Token, depth: usize) {}

    fn start_primary_expression(&mut self, n: &PrimaryExpressionNode<'_>, depth: usize) {}
    fn end_primary_expression(&mut self, n: &PrimaryExpressionNode<'_>, depth: usize) {}

    fn start_postfix_expression(&mut self, n: &PostfixExpressionNode<'_>, depth: usize) {}
    fn end_postfix_expression(&mut self, n: &PostfixExpressionNode<'_>, depth: usize) {}

    fn start_prefix_expression(&mut self, n: &PrefixExpressionNode<'_>, depth: usize) {}
    fn end_prefix_expression(&mut self, n: &PrefixExpressionNode<'_>, depth: usize) {}

    fn start_binary_expression<K: BinaryCategory, Term: Node>(
        &mut self,
        n: &BinaryExpressionNode<'_, K, Term>,
        depth: usize,
    ) {
    }
    fn end_binary_expression<K: BinaryCategory, Term: Node>(
        &mut self,
        n: &BinaryExpressionNode<'_, K, Term>,
        depth: usize,
    ) {
    }

    fn start_expression(&mut self, n: &ExpressionNode<'_>, depth: usize) {}
    fn end_expression(&mut self, n: &ExpressionNode<'_>, depth: usize) {}

    fn start_expression_list(&mut self, n: &ExpressionListNode<'_>, depth: usize) {}
    fn end_expression_list(&mut self, n: &ExpressionListNode<'_>, depth: usize) {}

    fn start_unqualified_id(&mut self, n: &UnqualifiedIdNode<'_>, depth: usize) {}
    fn end_unqualified_id(&mut self, n: &UnqualifiedIdNode<'_>, depth: usize) {}

    fn start_qualified_id(&mut self, n: &QualifiedIdNode<'_>, depth: usize) {}
    fn end_qualified_id(&mut self, n: &QualifiedIdNode<'_>, depth: usize) {}

    fn start_id_expression(&mut self, n: &IdExpressionNode<'_>, depth: usize) {}
    fn end_id_expression(&mut self, n: &IdExpressionNode<'_>, depth: usize) {}

    fn start_expression_statement(&mut self, n: &ExpressionStatementNode<'_>, depth: usize) {}
    fn end_expression_statement(&mut self, n: &ExpressionStatementNode<'_>, depth: usize) {}

    fn start_compound_statement(&mut self, n: &CompoundStatementNode<'_>, depth: usize) {}
    fn end_compound_statement(&mut self, n: &CompoundStatementNode<'_>, depth: usize) {}

    fn start_selection_statement(&mut self, n: &SelectionStatementNode<'_>, depth: usize) {}
    fn end_selection_statement(&mut self, n: &SelectionStatementNode<'_>, depth: usize) {}

    fn start_statement(&mut self, n: &StatementNode<'_>, depth: usize) {}
    fn end_statement(&mut self, n: &StatementNode<'_>, depth: usize) {}

    fn start_parameter_declaration(&mut self, n: &ParameterDeclarationNode<'_>, depth: usize) {}
    fn end_parameter_declaration(&mut self, n: &ParameterDeclarationNode<'_>, depth: usize) {}

    fn start_parameter_declaration_list(
        &mut self,
        n: &ParameterDeclarationListNode<'_>,
        depth: usize,
    ) {
    }
    fn end_parameter_declaration_list(
        &mut self,
        n: &ParameterDeclarationListNode<'_>,
        depth: usize,
    ) {
    }

    fn start_declaration(&mut self, n: &DeclarationNode<'_>, depth: usize) {}
    fn end_declaration(&mut self, n: &DeclarationNode<'_>, depth: usize) {}

    fn start_translation_unit(&mut self, n: &TranslationUnitNode<'_>, depth: usize) {}
    fn end_translation_unit(&mut self, n: &TranslationUnitNode<'_>, depth: usize) {}
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::token::TokenKind;

    fn tok(kind: TokenKind, text: &str, line: u32, column: u32) -> Token {
        Token::new(kind, text, SourcePosition::new(line, column))
    }

    // ── Positions ─────────────────────────────────────────────────────────

    #[test]
    fn test_unqualified_id_position_is_its_token() {
        let t = tok(TokenKind::Identifier, "x", 4, 9);
        let id = UnqualifiedIdNode { identifier: &t };
        assert_eq!(id.position(), SourcePosition::new(4, 9));
    }

    #[test]
    fn test_prefix_position_prefers_first_operator() {
        let bang = tok(TokenKind::Not, "!", 1, 1);
        let x = tok(TokenKind::Identifier, "x", 1, 2);
        let mut ops = SmallVec::new();
        ops.push(&bang);
        let n = PrefixExpressionNode {
            ops,
            expr: PostfixExpressionNode {
                expr: PrimaryExpressionNode::Identifier(&x),
                ops: Vec::new(),
            },
        };
        assert_eq!(n.position(), SourcePosition::new(1, 1));
    }

    #[test]
    fn test_prefix_position_falls_through_to_operand() {
        let x = tok(TokenKind::Identifier, "x", 2, 5);
        let n = PrefixExpressionNode {
            ops: SmallVec::new(),
            expr: PostfixExpressionNode {
                expr: PrimaryExpressionNode::Identifier(&x),
                ops: Vec::new(),
            },
        };
        assert_eq!(n.position(), SourcePosition::new(2, 5));
    }

    #[test]
    fn test_synthetic_nodes_report_zero_position() {
        assert_eq!(
            PrimaryExpressionNode::Empty.position(),
            SourcePosition::SYNTHETIC
        );
        assert_eq!(
            IdExpressionNode::Empty.position(),
            SourcePosition::SYNTHETIC
        );
        assert_eq!(
            CompoundStatementNode::synthetic().position(),
            SourcePosition::SYNTHETIC
        );
        assert_eq!(
            TranslationUnitNode::default().position(),
            SourcePosition::SYNTHETIC
        );
    }

    // ── Tag queries ───────────────────────────────────────────────────────

    #[test]
    fn test_declaration_kind_queries_are_total() {
        let name = tok(TokenKind::Identifier, "f", 1, 1);
        let func = DeclarationNode {
            identifier: UnqualifiedIdNode { identifier: &name },
            ty: DeclarationType::Function(ParameterDeclarationListNode {
                pos_open_paren: SourcePosition::new(1, 4),
                pos_close_paren: SourcePosition::new(1, 5),
                parameters: Vec::new(),
            }),
            initializer: None,
        };
        assert!(func.is_function());
        assert!(!func.is_object());

        let obj = DeclarationNode {
            identifier: UnqualifiedIdNode { identifier: &name },
            ty: DeclarationType::Object(IdExpressionNode::Empty),
            initializer: None,
        };
        assert!(obj.is_object());
        assert!(!obj.is_function());
    }

    // ── Visit bracketing ──────────────────────────────────────────────────

    /// Records every event as `(label, depth)` so orderings can be asserted.
    #[derive(Default)]
    struct EventLog {
        events: Vec<(String, usize)>,
    }

    impl Visitor for EventLog {
        fn start_token(&mut self, tok: &Token, depth: usize) {
            self.events.push((format!("tok:{tok}"), depth));
        }
        fn start_qualified_id(&mut self, _n: &QualifiedIdNode<'_>, depth: usize) {
            self.events.push(("start:qualified-id".into(), depth));
        }
        fn end_qualified_id(&mut self, _n: &QualifiedIdNode<'_>, depth: usize) {
            self.events.push(("end:qualified-id".into(), depth));
        }
        fn start_unqualified_id(&mut self, _n: &UnqualifiedIdNode<'_>, depth: usize) {
            self.events.push(("start:unqualified-id".into(), depth));
        }
        fn end_unqualified_id(&mut self, _n: &UnqualifiedIdNode<'_>, depth: usize) {
            self.events.push(("end:unqualified-id".into(), depth));
        }
    }

    #[test]
    fn test_qualified_id_visits_segments_in_source_order() {
        let a = tok(TokenKind::Identifier, "a", 1, 1);
        let b = tok(TokenKind::Identifier, "b", 1, 4);
        let mut ids = SmallVec::new();
        ids.push(UnqualifiedIdNode { identifier: &a });
        ids.push(UnqualifiedIdNode { identifier: &b });
        let q = QualifiedIdNode { ids };

        let mut log = EventLog::default();
        q.visit(&mut log, 0);
        let labels: Vec<&str> = log.events.iter().map(|(l, _)| l.as_str()).collect();
        assert_eq!(
            labels,
            [
                "start:qualified-id",
                "start:unqualified-id",
                "tok:a",
                "end:unqualified-id",
                "start:unqualified-id",
                "tok:b",
                "end:unqualified-id",
                "end:qualified-id",
            ]
        );
        // Children sit one level below their parent, tokens one below the id.
        assert_eq!(log.events[0].1, 0);
        assert_eq!(log.events[1].1, 1);
        assert_eq!(log.events[2].1, 2);
    }

    #[test]
    fn test_traversal_is_deterministic() {
        let a = tok(TokenKind::Identifier, "a", 1, 1);
        let mut ids = SmallVec::new();
        ids.push(UnqualifiedIdNode { identifier: &a });
        let q = QualifiedIdNode { ids };

        let mut first = EventLog::default();
        let mut second = EventLog::default();
        q.visit(&mut first, 0);
        q.visit(&mut second, 0);
        assert_eq!(first.events, second.events);
    }
}
