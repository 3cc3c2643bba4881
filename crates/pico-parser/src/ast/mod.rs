//! Typed AST layer over the raw syntax tree.
//!
//! Each wrapper is a newtype around [`SyntaxNode`] whose accessors walk
//! the tree by kind; casting is a single check against the wrapper's
//! [`AstNode::KIND`]. The wrappers carry no state of their own, so a
//! typed view is free to construct and to throw away.

pub mod expr;
pub mod item;
pub mod stmt;

use pico_common::span::Span;

use crate::syntax_kind::SyntaxKind;
use crate::{SyntaxNode, SyntaxToken};

/// A typed view of one kind of syntax node.
pub trait AstNode: Sized {
    /// The node kind this wrapper accepts.
    const KIND: SyntaxKind;

    /// View `node` through this wrapper; `None` on a kind mismatch.
    fn cast(node: SyntaxNode) -> Option<Self>;

    /// The wrapped syntax node.
    fn syntax(&self) -> &SyntaxNode;

    /// The node's byte range in the original source -- the identity the
    /// type checker anchors variables to.
    fn span(&self) -> Span {
        let range = self.syntax().text_range();
        Span::new(range.start().into(), range.end().into())
    }
}

/// Define a typed wrapper for one [`SyntaxKind`].
macro_rules! ast_node {
    ($name:ident, $kind:ident) => {
        #[derive(Debug, Clone)]
        pub struct $name {
            pub(crate) syntax: SyntaxNode,
        }

        impl AstNode for $name {
            const KIND: SyntaxKind = SyntaxKind::$kind;

            fn cast(node: SyntaxNode) -> Option<Self> {
                (node.kind() == Self::KIND).then(|| Self { syntax: node })
            }

            fn syntax(&self) -> &SyntaxNode {
                &self.syntax
            }
        }
    };
}

pub(crate) use ast_node;

/// All children viewable as `N`, in tree order.
pub fn child_nodes<'p, N: AstNode + 'p>(
    parent: &'p SyntaxNode,
) -> impl Iterator<Item = N> + 'p {
    parent.children().filter_map(N::cast)
}

/// The first child viewable as `N`.
pub fn child_node<'p, N: AstNode + 'p>(parent: &'p SyntaxNode) -> Option<N> {
    child_nodes(parent).next()
}

/// The first child token of the given kind.
pub fn child_token(parent: &SyntaxNode, kind: SyntaxKind) -> Option<SyntaxToken> {
    parent
        .children_with_tokens()
        .filter_map(rowan::NodeOrToken::into_token)
        .find(|token| token.kind() == kind)
}
