//! Pico parser: recursive descent parser producing a rowan-based CST.
//!
//! This crate transforms the token stream from `pico-lexer` into a lossless
//! concrete syntax tree (CST) using the `rowan` library, then exposes a
//! typed AST layer over it. The CST preserves comment tokens, and every
//! node carries its byte range in the original source -- the node identity
//! the type checker uses to anchor type variables.

pub mod ast;
pub mod error;
mod parser;
pub mod syntax_kind;

pub use error::ParseError;
pub use syntax_kind::SyntaxKind;

use ast::item::SourceFile;
use ast::AstNode;

/// Hook for rowan's generic tree machinery.
///
/// Rowan stores node kinds as bare `u16`s and asks the language to convert
/// back and forth. Both directions go through [`SyntaxKind::into_raw`] and
/// [`SyntaxKind::from_raw`], which own the range invariant -- a tree can
/// only hand back kinds this parser put into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PicoLanguage {}

impl rowan::Language for PicoLanguage {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> SyntaxKind {
        SyntaxKind::from_raw(raw.0)
    }

    fn kind_to_raw(kind: SyntaxKind) -> rowan::SyntaxKind {
        rowan::SyntaxKind(kind.into_raw())
    }
}

/// A node in the Pico syntax tree.
pub type SyntaxNode = rowan::SyntaxNode<PicoLanguage>;

/// A token (leaf with text) in the Pico syntax tree.
pub type SyntaxToken = rowan::SyntaxToken<PicoLanguage>;

/// Either a node or a token.
pub type SyntaxElement = rowan::SyntaxElement<PicoLanguage>;

/// Result of parsing a Pico source file.
///
/// Contains the green tree (the immutable, cheap-to-clone CST) and any
/// parse errors encountered. With the current first-error-only strategy,
/// `errors` contains at most one error.
pub struct Parse {
    green: rowan::GreenNode,
    errors: Vec<ParseError>,
}

impl Parse {
    /// Build the syntax tree root from the green node.
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.green.clone())
    }

    /// The typed AST root.
    pub fn tree(&self) -> SourceFile {
        SourceFile::cast(self.syntax()).expect("root node is always SOURCE_FILE")
    }

    /// Parse errors encountered during parsing.
    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    /// Whether parsing completed without errors.
    pub fn ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Parse a Pico source file into a CST.
///
/// This is the main entry point for the parser. It lexes the source,
/// parses the token stream, and returns a [`Parse`] result containing
/// the syntax tree and any errors.
pub fn parse(source: &str) -> Parse {
    let tokens = pico_lexer::Lexer::tokenize(source);
    let mut parser = parser::Parser::new(tokens, source);
    parser::parse_source_file(&mut parser);
    let (green, errors) = parser.build_tree();
    Parse { green, errors }
}
