//! SyntaxKind enum for the Pico CST.
//!
//! A superset of `TokenKind` (mapped to SCREAMING_SNAKE_CASE) plus composite
//! node kinds for CST nodes produced by the parser.

use pico_common::token::TokenKind;

/// Every kind of syntax element in the Pico CST.
///
/// Token kinds (leaves) are mapped 1:1 from [`TokenKind`]. Composite node
/// kinds represent parser-produced tree nodes. The first two values are
/// sentinels used by the event-based parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
#[allow(non_camel_case_types)]
pub enum SyntaxKind {
    // ── Sentinels ──────────────────────────────────────────────────────
    /// Placeholder kind for incomplete/unfinished parser events.
    TOMBSTONE = 0,
    /// Wrapper for tokens/nodes that couldn't be parsed.
    ERROR_NODE = 1,

    // ── Keywords (8) ───────────────────────────────────────────────────
    VAR_KW,
    IF_KW,
    ELSE_KW,
    WHILE_KW,
    RETURN_KW,
    OUTPUT_KW,
    INPUT_KW,
    ALLOC_KW,

    // ── Operators (13) ─────────────────────────────────────────────────
    PLUS,
    MINUS,
    STAR,
    SLASH,
    GT,
    LT,
    GT_EQ,
    LT_EQ,
    EQ_EQ,
    NOT_EQ,
    EQ,
    AMP,
    DOT,

    // ── Delimiters (4) ─────────────────────────────────────────────────
    L_PAREN,
    R_PAREN,
    L_BRACE,
    R_BRACE,

    // ── Punctuation (3) ────────────────────────────────────────────────
    COMMA,
    SEMICOLON,
    COLON,

    // ── Literals, identifiers, trivia (5) ──────────────────────────────
    INT_LITERAL,
    IDENT,
    COMMENT,
    /// Lexer error token.
    ERROR,
    EOF,

    // ── Composite node kinds ───────────────────────────────────────────
    /// Root node of a parsed source file.
    SOURCE_FILE,
    /// Function definition: `name(params) { ... }`
    FN_DEF,
    /// Name in a definition position (function, parameter, local).
    NAME,
    /// Parameter list: `(a, b, c)`
    PARAM_LIST,
    /// Statement block: `{ ... }`
    BLOCK,
    /// Local declaration: `var x, y;`
    VAR_DECL_STMT,
    /// Assignment: `lhs = rhs;`
    ASSIGN_STMT,
    /// Output statement: `output expr;`
    OUTPUT_STMT,
    /// Return statement: `return expr;`
    RETURN_STMT,
    /// Conditional: `if (cond) stmt [else stmt]`
    IF_STMT,
    /// Else branch of a conditional.
    ELSE_BRANCH,
    /// Loop: `while (cond) stmt`
    WHILE_STMT,
    /// Integer literal expression.
    LITERAL,
    /// Identifier used as an expression.
    NAME_REF,
    /// Binary expression: `a + b`, `a == b`, ...
    BINARY_EXPR,
    /// Prefix expression: `*e` (dereference), `&x` (address-of).
    UNARY_EXPR,
    /// Allocation: `alloc expr`
    ALLOC_EXPR,
    /// Input expression: `input`
    INPUT_EXPR,
    /// Function call: `f(args)`
    CALL_EXPR,
    /// Argument list: `(a, b, c)`
    ARG_LIST,
    /// Field access: `expr.field`
    FIELD_ACCESS,
    /// Record literal: `{f: 1, g: 2}`
    RECORD_LITERAL,
    /// Single field in a record literal.
    RECORD_FIELD,
    /// Parenthesized expression: `(expr)`
    PAREN_EXPR,
}

impl SyntaxKind {
    /// Whether this kind is trivia (invisible to parser lookahead).
    pub fn is_trivia(self) -> bool {
        matches!(self, SyntaxKind::COMMENT)
    }

    /// The raw `u16` rowan stores for this kind.
    pub fn into_raw(self) -> u16 {
        self as u16
    }

    /// Recover a kind from rowan's raw representation.
    ///
    /// Discriminants run contiguously from `TOMBSTONE` (0) up to
    /// `PAREN_EXPR`, so every in-range `u16` names a variant. A Pico tree
    /// only contains kinds produced by [`SyntaxKind::into_raw`]; the
    /// assertion catches a tree built with some other language's kinds.
    pub fn from_raw(raw: u16) -> SyntaxKind {
        assert!(
            raw <= SyntaxKind::PAREN_EXPR as u16,
            "raw syntax kind {raw} out of range"
        );
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw) }
    }
}

impl From<TokenKind> for SyntaxKind {
    fn from(kind: TokenKind) -> Self {
        match kind {
            TokenKind::Var => SyntaxKind::VAR_KW,
            TokenKind::If => SyntaxKind::IF_KW,
            TokenKind::Else => SyntaxKind::ELSE_KW,
            TokenKind::While => SyntaxKind::WHILE_KW,
            TokenKind::Return => SyntaxKind::RETURN_KW,
            TokenKind::Output => SyntaxKind::OUTPUT_KW,
            TokenKind::Input => SyntaxKind::INPUT_KW,
            TokenKind::Alloc => SyntaxKind::ALLOC_KW,
            TokenKind::Plus => SyntaxKind::PLUS,
            TokenKind::Minus => SyntaxKind::MINUS,
            TokenKind::Star => SyntaxKind::STAR,
            TokenKind::Slash => SyntaxKind::SLASH,
            TokenKind::Gt => SyntaxKind::GT,
            TokenKind::Lt => SyntaxKind::LT,
            TokenKind::GtEq => SyntaxKind::GT_EQ,
            TokenKind::LtEq => SyntaxKind::LT_EQ,
            TokenKind::EqEq => SyntaxKind::EQ_EQ,
            TokenKind::NotEq => SyntaxKind::NOT_EQ,
            TokenKind::Eq => SyntaxKind::EQ,
            TokenKind::Amp => SyntaxKind::AMP,
            TokenKind::Dot => SyntaxKind::DOT,
            TokenKind::LParen => SyntaxKind::L_PAREN,
            TokenKind::RParen => SyntaxKind::R_PAREN,
            TokenKind::LBrace => SyntaxKind::L_BRACE,
            TokenKind::RBrace => SyntaxKind::R_BRACE,
            TokenKind::Comma => SyntaxKind::COMMA,
            TokenKind::Semicolon => SyntaxKind::SEMICOLON,
            TokenKind::Colon => SyntaxKind::COLON,
            TokenKind::IntLiteral => SyntaxKind::INT_LITERAL,
            TokenKind::Ident => SyntaxKind::IDENT,
            TokenKind::Comment => SyntaxKind::COMMENT,
            TokenKind::Error => SyntaxKind::ERROR,
            TokenKind::Eof => SyntaxKind::EOF,
        }
    }
}
