//! Typed AST nodes for the program structure: source file, function
//! definitions, names, and parameter lists.

use crate::ast::stmt::Block;
use crate::ast::{ast_node, child_node, child_nodes, child_token, AstNode};
use crate::syntax_kind::SyntaxKind;
use crate::{SyntaxNode, SyntaxToken};

// ── Source File ──────────────────────────────────────────────────────────

ast_node!(SourceFile, SOURCE_FILE);

impl SourceFile {
    /// All top-level function definitions.
    pub fn fn_defs(&self) -> impl Iterator<Item = FnDef> + '_ {
        child_nodes(&self.syntax)
    }

    /// Find a function definition by name.
    pub fn find_fn(&self, name: &str) -> Option<FnDef> {
        self.fn_defs()
            .find(|f| f.name().and_then(|n| n.text()).as_deref() == Some(name))
    }
}

// ── Function Definition ──────────────────────────────────────────────────

ast_node!(FnDef, FN_DEF);

impl FnDef {
    /// The defining name. Its syntax node is the stable identity that
    /// anchors the function's type variable.
    pub fn name(&self) -> Option<Name> {
        child_node(&self.syntax)
    }

    /// The parameter list.
    pub fn param_list(&self) -> Option<ParamList> {
        child_node(&self.syntax)
    }

    /// The function body block.
    pub fn body(&self) -> Option<Block> {
        child_node(&self.syntax)
    }
}

// ── Name (definition position) ───────────────────────────────────────────

ast_node!(Name, NAME);

impl Name {
    /// The identifier token.
    pub fn token(&self) -> Option<SyntaxToken> {
        child_token(&self.syntax, SyntaxKind::IDENT)
    }

    /// The identifier text.
    pub fn text(&self) -> Option<String> {
        self.token().map(|t| t.text().to_string())
    }
}

// ── Parameter List ───────────────────────────────────────────────────────

ast_node!(ParamList, PARAM_LIST);

impl ParamList {
    /// All parameter names, in declaration order.
    pub fn params(&self) -> impl Iterator<Item = Name> + '_ {
        child_nodes(&self.syntax)
    }
}
