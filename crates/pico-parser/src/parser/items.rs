//! Parsers for function definitions, blocks, and statements.

use crate::syntax_kind::SyntaxKind;

use super::{expressions, Parser};

/// Parse a function definition: `name(params) { ... }`.
pub(crate) fn parse_fn_def(p: &mut Parser) {
    let m = p.open();
    parse_name(p);
    if !p.has_error() {
        parse_param_list(p);
    }
    if !p.has_error() {
        parse_block(p);
    }
    p.close(m, SyntaxKind::FN_DEF);
}

/// Parse a defining name (function, parameter, or local).
fn parse_name(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::IDENT);
    p.close(m, SyntaxKind::NAME);
}

/// Parse a parameter list: `(a, b, c)`.
fn parse_param_list(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::L_PAREN);
    if !p.at(SyntaxKind::R_PAREN) && !p.at(SyntaxKind::EOF) {
        parse_name(p);
        while p.eat(SyntaxKind::COMMA) {
            parse_name(p);
        }
    }
    p.expect(SyntaxKind::R_PAREN);
    p.close(m, SyntaxKind::PARAM_LIST);
}

/// Parse a statement block: `{ stmt* }`.
pub(crate) fn parse_block(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::L_BRACE);
    while !p.at(SyntaxKind::R_BRACE) && !p.at(SyntaxKind::EOF) && !p.has_error() {
        parse_stmt(p);
    }
    p.expect(SyntaxKind::R_BRACE);
    p.close(m, SyntaxKind::BLOCK);
}

/// Parse a single statement.
pub(crate) fn parse_stmt(p: &mut Parser) {
    match p.current() {
        SyntaxKind::VAR_KW => parse_var_decl(p),
        SyntaxKind::RETURN_KW => parse_return_stmt(p),
        SyntaxKind::OUTPUT_KW => parse_output_stmt(p),
        SyntaxKind::IF_KW => parse_if_stmt(p),
        SyntaxKind::WHILE_KW => parse_while_stmt(p),
        SyntaxKind::L_BRACE => parse_block(p),
        _ => parse_assign_stmt(p),
    }
}

/// `var x, y, z;`
fn parse_var_decl(p: &mut Parser) {
    let m = p.open();
    p.advance(); // var
    parse_name(p);
    while p.eat(SyntaxKind::COMMA) {
        parse_name(p);
    }
    p.expect(SyntaxKind::SEMICOLON);
    p.close(m, SyntaxKind::VAR_DECL_STMT);
}

/// `return expr;`
fn parse_return_stmt(p: &mut Parser) {
    let m = p.open();
    p.advance(); // return
    expressions::expr(p);
    p.expect(SyntaxKind::SEMICOLON);
    p.close(m, SyntaxKind::RETURN_STMT);
}

/// `output expr;`
fn parse_output_stmt(p: &mut Parser) {
    let m = p.open();
    p.advance(); // output
    expressions::expr(p);
    p.expect(SyntaxKind::SEMICOLON);
    p.close(m, SyntaxKind::OUTPUT_STMT);
}

/// `if (cond) stmt [else stmt]`
fn parse_if_stmt(p: &mut Parser) {
    let m = p.open();
    p.advance(); // if
    p.expect(SyntaxKind::L_PAREN);
    expressions::expr(p);
    p.expect(SyntaxKind::R_PAREN);
    parse_stmt(p);
    if p.at(SyntaxKind::ELSE_KW) {
        let e = p.open();
        p.advance(); // else
        parse_stmt(p);
        p.close(e, SyntaxKind::ELSE_BRANCH);
    }
    p.close(m, SyntaxKind::IF_STMT);
}

/// `while (cond) stmt`
fn parse_while_stmt(p: &mut Parser) {
    let m = p.open();
    p.advance(); // while
    p.expect(SyntaxKind::L_PAREN);
    expressions::expr(p);
    p.expect(SyntaxKind::R_PAREN);
    parse_stmt(p);
    p.close(m, SyntaxKind::WHILE_STMT);
}

/// `lhs = rhs;` where lhs is an expression (identifier, dereference,
/// field access).
fn parse_assign_stmt(p: &mut Parser) {
    let m = p.open();
    expressions::expr(p);
    p.expect(SyntaxKind::EQ);
    expressions::expr(p);
    p.expect(SyntaxKind::SEMICOLON);
    p.close(m, SyntaxKind::ASSIGN_STMT);
}
