//! Typed AST nodes for statements.
//!
//! Covers: blocks, local declarations, assignments, output, return,
//! if/else, and while.

use pico_common::span::Span;

use crate::ast::expr::Expr;
use crate::ast::item::Name;
use crate::ast::{ast_node, child_node, child_nodes, AstNode};
use crate::syntax_kind::SyntaxKind;
use crate::SyntaxNode;

// ── Stmt enum ────────────────────────────────────────────────────────────

/// Any statement node.
#[derive(Debug, Clone)]
pub enum Stmt {
    VarDecl(VarDeclStmt),
    Assign(AssignStmt),
    Output(OutputStmt),
    Return(ReturnStmt),
    If(IfStmt),
    While(WhileStmt),
    Block(Block),
}

impl Stmt {
    pub fn cast(node: SyntaxNode) -> Option<Self> {
        match node.kind() {
            SyntaxKind::VAR_DECL_STMT => Some(Stmt::VarDecl(VarDeclStmt { syntax: node })),
            SyntaxKind::ASSIGN_STMT => Some(Stmt::Assign(AssignStmt { syntax: node })),
            SyntaxKind::OUTPUT_STMT => Some(Stmt::Output(OutputStmt { syntax: node })),
            SyntaxKind::RETURN_STMT => Some(Stmt::Return(ReturnStmt { syntax: node })),
            SyntaxKind::IF_STMT => Some(Stmt::If(IfStmt { syntax: node })),
            SyntaxKind::WHILE_STMT => Some(Stmt::While(WhileStmt { syntax: node })),
            SyntaxKind::BLOCK => Some(Stmt::Block(Block { syntax: node })),
            _ => None,
        }
    }

    /// Access the underlying syntax node regardless of variant.
    pub fn syntax(&self) -> &SyntaxNode {
        match self {
            Stmt::VarDecl(n) => &n.syntax,
            Stmt::Assign(n) => &n.syntax,
            Stmt::Output(n) => &n.syntax,
            Stmt::Return(n) => &n.syntax,
            Stmt::If(n) => &n.syntax,
            Stmt::While(n) => &n.syntax,
            Stmt::Block(n) => &n.syntax,
        }
    }

    /// The statement's byte range in the original source.
    pub fn span(&self) -> Span {
        let range = self.syntax().text_range();
        Span::new(range.start().into(), range.end().into())
    }
}

// ── Block ────────────────────────────────────────────────────────────────

ast_node!(Block, BLOCK);

impl Block {
    /// All statements in the block, in order.
    pub fn stmts(&self) -> impl Iterator<Item = Stmt> + '_ {
        self.syntax.children().filter_map(Stmt::cast)
    }
}

// ── Local Declaration ────────────────────────────────────────────────────

ast_node!(VarDeclStmt, VAR_DECL_STMT);

impl VarDeclStmt {
    /// The declared names: `var x, y, z;` yields `x`, `y`, `z`.
    pub fn names(&self) -> impl Iterator<Item = Name> + '_ {
        child_nodes(&self.syntax)
    }
}

// ── Assignment ───────────────────────────────────────────────────────────

ast_node!(AssignStmt, ASSIGN_STMT);

impl AssignStmt {
    /// The left-hand side expression (identifier, dereference, or field
    /// access).
    pub fn lhs(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    /// The right-hand side expression.
    pub fn rhs(&self) -> Option<Expr> {
        self.syntax.children().filter_map(Expr::cast).nth(1)
    }
}

// ── Output ───────────────────────────────────────────────────────────────

ast_node!(OutputStmt, OUTPUT_STMT);

impl OutputStmt {
    /// The expression whose value is printed.
    pub fn expr(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}

// ── Return ───────────────────────────────────────────────────────────────

ast_node!(ReturnStmt, RETURN_STMT);

impl ReturnStmt {
    /// The returned expression.
    pub fn expr(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }
}

// ── If ───────────────────────────────────────────────────────────────────

ast_node!(IfStmt, IF_STMT);

impl IfStmt {
    /// The condition expression.
    pub fn condition(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    /// The statement executed when the condition is nonzero.
    pub fn then_branch(&self) -> Option<Stmt> {
        self.syntax.children().find_map(Stmt::cast)
    }

    /// The statement under `else`, if present.
    pub fn else_branch(&self) -> Option<Stmt> {
        let branch: ElseBranch = child_node(&self.syntax)?;
        branch.syntax.children().find_map(Stmt::cast)
    }
}

ast_node!(ElseBranch, ELSE_BRANCH);

// ── While ────────────────────────────────────────────────────────────────

ast_node!(WhileStmt, WHILE_STMT);

impl WhileStmt {
    /// The loop condition expression.
    pub fn condition(&self) -> Option<Expr> {
        self.syntax.children().find_map(Expr::cast)
    }

    /// The loop body statement.
    pub fn body(&self) -> Option<Stmt> {
        self.syntax.children().find_map(Stmt::cast)
    }
}
