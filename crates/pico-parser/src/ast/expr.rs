//! Typed AST nodes for expressions.
//!
//! Covers all Pico expression forms: integer literals, name references,
//! binary operators, dereference/address-of, allocation, input, calls,
//! field access, record literals, and parenthesized grouping.

use pico_common::span::Span;

use crate::ast::{ast_node, child_node, child_token, AstNode};
use crate::syntax_kind::SyntaxKind;
use crate::{SyntaxNode, SyntaxToken};

// ── Expr enum ────────────────────────────────────────────────────────────

/// Any expression node.
#[derive(Debug, Clone)]
pub enum Expr {
    Literal(Literal),
    NameRef(NameRef),
    Binary(BinaryExpr),
    Unary(UnaryExpr),
    Alloc(AllocExpr),
    Input(InputExpr),
    Call(CallExpr),
    FieldAccess(FieldAccess),
    Record(RecordLiteral),
    Paren(ParenExpr),
}

impl Expr {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::LITERAL => Some(Expr::Literal(Literal { syntax: node })),
            SyntaxKind::NAME_REF => Some(Expr::NameRef(NameRef { syntax: node })),
            SyntaxKind::BINARY_EXPR => Some(Expr::Binary(BinaryExpr { syntax: node })),
            SyntaxKind::UNARY_EXPR => Some(Expr::Unary(UnaryExpr { syntax: node })),
            SyntaxKind::ALLOC_EXPR => Some(Expr::Alloc(AllocExpr { syntax: node })),
            SyntaxKind::INPUT_EXPR => Some(Expr::Input(InputExpr { syntax: node })),
            SyntaxKind::CALL_EXPR => Some(Expr::Call(CallExpr { syntax: node })),
            SyntaxKind::FIELD_ACCESS => Some(Expr::FieldAccess(FieldAccess { syntax: node })),
            SyntaxKind::RECORD_LITERAL => Some(Expr::Record(RecordLiteral { syntax: node })),
            SyntaxKind::PAREN_EXPR => Some(Expr::Paren(ParenExpr { syntax: node })),
            _ => None,
        }
    }

    /// Access the underlying syntax node regardless of variant.
    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Expr::Literal(n) => &n.syntax,
            Expr::NameRef(n) => &n.syntax,
            Expr::Binary(n) => &n.syntax,
            Expr::Unary(n) => &n.syntax,
            Expr::Alloc(n) => &n.syntax,
            Expr::Input(n) => &n.syntax,
            Expr::Call(n) => &n.syntax,
            Expr::FieldAccess(n) => &n.syntax,
            Expr::Record(n) => &n.syntax,
            Expr::Paren(n) => &n.syntax,
        }
    }

    /// The expression's byte range in the original source.
    pub fn span(&self) -> Span {
        let range = self.syntax().text_range();
        Span::new(range.start().into(), range.end().into())
    }
}

// ── Literal ──────────────────────────────────────────────────────────────

ast_node!(Literal, LITERAL);

impl Literal {
    /// The INT_LITERAL token.
    pub fn token(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::INT_LITERAL)
    }

    /// The literal's numeric value, if it fits in an i64.
    pub fn value(&self) -> Option<i64> {
        self.token()?.text().parse().ok()
    }
}

// ── Name Reference ───────────────────────────────────────────────────────

ast_node!(NameRef, NAME_REF);

impl NameRef {
    /// The identifier text.
    pub fn text(&self) -> Option<String> {
        child_token(&self.syntax, SyntaxKind::IDENT).map(|t| t.text().to_string())
    }
}

// ── Binary Expression ────────────────────────────────────────────────────

ast_node!(BinaryExpr, BINARY_EXPR);

impl BinaryExpr {
    /// The left-hand side expression.
    pub fn lhs(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    /// The right-hand side expression.
    pub fn rhs(&self) -> Option<Expr> {
        self.syntax.children().filter_map(Expr::cast).nth(1)
    }

    /// The operator token.
    pub fn op(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| {
                matches!(
                    t.kind(),
                    SyntaxKind::PLUS
                        | SyntaxKind::MINUS
                        | SyntaxKind::STAR
                        | SyntaxKind::SLASH
                        | SyntaxKind::GT
                        | SyntaxKind::LT
                        | SyntaxKind::GT_EQ
                        | SyntaxKind::LT_EQ
                        | SyntaxKind::EQ_EQ
                        | SyntaxKind::NOT_EQ
                )
            })
    }
}

// ── Unary Expression (dereference, address-of) ───────────────────────────

ast_node!(UnaryExpr, UNARY_EXPR);

impl UnaryExpr {
    /// The operator token: `*` (dereference) or `&` (address-of).
    pub fn op(&self) -> Option<SyntaxToken> {
        self.syntax
            .children_with_tokens()
            .filter_map(|it| it.into_token())
            .find(|t| matches!(t.kind(), SyntaxKind::STAR | SyntaxKind::AMP))
    }

    /// The operand expression.
    pub fn operand(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}

// ── Allocation ───────────────────────────────────────────────────────────

ast_node!(AllocExpr, ALLOC_EXPR);

impl AllocExpr {
    /// The initializer expression.
    pub fn operand(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}

// ── Input ────────────────────────────────────────────────────────────────

ast_node!(InputExpr, INPUT_EXPR);

// ── Call Expression ──────────────────────────────────────────────────────

ast_node!(CallExpr, CALL_EXPR);

impl CallExpr {
    /// The callee expression (function being called).
    pub fn callee(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    /// The argument list.
    pub fn arg_list(&self) -> Option<ArgList> {
        child_node(&self.syntax)
    }
}

ast_node!(ArgList, ARG_LIST);

impl ArgList {
    /// All argument expressions.
    pub fn args(&self) -> impl Iterator<Item = Expr> + '_ {
        self.syntax.children().filter_map(Expr::cast)
    }
}

// ── Field Access ─────────────────────────────────────────────────────────

ast_node!(FieldAccess, FIELD_ACCESS);

impl FieldAccess {
    /// The record-valued expression being accessed.
    pub fn base(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    /// The accessed field's identifier token.
    pub fn field_token(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::IDENT)
    }

    /// The accessed field's name.
    pub fn field_name(&self) -> Option<String> {
        self.field_token().map(|t| t.text().to_string())
    }
}

// ── Record Literal ───────────────────────────────────────────────────────

ast_node!(RecordLiteral, RECORD_LITERAL);

impl RecordLiteral {
    /// All fields, in declared order.
    pub fn fields(&self) -> impl Iterator<Item = RecordField> + '_ {
        self.syntax.children().filter_map(RecordField::cast)
    }
}

ast_node!(RecordField, RECORD_FIELD);

impl RecordField {
    /// The field's name.
    pub fn name(&self) -> Option<String> {
        child_token(&self.syntax, SyntaxKind::IDENT).map(|t| t.text().to_string())
    }

    /// The field's value expression.
    pub fn value(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}

// ── Parenthesized Expression ─────────────────────────────────────────────

ast_node!(ParenExpr, PAREN_EXPR);

impl ParenExpr {
    /// The grouped inner expression.
    pub fn inner(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}
