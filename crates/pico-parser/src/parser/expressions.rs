//! Pratt expression parser for Pico.
//!
//! Implements operator precedence parsing using binding power tables.
//! Handles all Pico expression forms: integer literals, identifiers,
//! binary operators, dereference and address-of, allocation, input,
//! record literals, field access, calls, and grouping.

use crate::syntax_kind::SyntaxKind;

use super::{MarkClosed, Parser};

// ── Binding Power Tables ───────────────────────────────────────────────

/// Returns (left_bp, right_bp) for infix operators.
///
/// Left < right means left-associative (the usual case).
/// Returns `None` if the token is not an infix operator.
fn infix_binding_power(op: SyntaxKind) -> Option<(u8, u8)> {
    match op {
        // Equality: left-associative
        SyntaxKind::EQ_EQ | SyntaxKind::NOT_EQ => Some((5, 6)),

        // Comparison: left-associative
        SyntaxKind::GT | SyntaxKind::LT | SyntaxKind::GT_EQ | SyntaxKind::LT_EQ => Some((7, 8)),

        // Additive: left-associative
        SyntaxKind::PLUS | SyntaxKind::MINUS => Some((9, 10)),

        // Multiplicative: left-associative
        SyntaxKind::STAR | SyntaxKind::SLASH => Some((11, 12)),

        _ => None,
    }
}

/// Right binding power for prefix operators (`*`, `&`, `alloc`).
const PREFIX_BP: u8 = 15;

/// Postfix operations (call, field access) bind tighter than all prefix
/// and infix operators.
const POSTFIX_BP: u8 = 17;

// ── Expression Entry Point ─────────────────────────────────────────────

/// Parse an expression at the default (lowest) binding power.
pub(crate) fn expr(p: &mut Parser) {
    expr_bp(p, 0);
}

/// Parse an expression with the given minimum binding power.
///
/// The core Pratt loop: parse an atom or prefix expression (the LHS), then
/// loop over postfix and infix operators, consuming them as long as their
/// binding power exceeds `min_bp`.
fn expr_bp(p: &mut Parser, min_bp: u8) -> Option<MarkClosed> {
    let mut lhs = lhs(p)?;

    loop {
        if p.has_error() {
            break;
        }

        let current = p.current();

        // ── Postfix: function call ──
        if current == SyntaxKind::L_PAREN && POSTFIX_BP >= min_bp {
            let m = p.open_before(lhs);
            parse_arg_list(p);
            lhs = p.close(m, SyntaxKind::CALL_EXPR);
            continue;
        }

        // ── Postfix: field access ──
        if current == SyntaxKind::DOT && POSTFIX_BP >= min_bp {
            let m = p.open_before(lhs);
            p.advance(); // .
            p.expect(SyntaxKind::IDENT);
            lhs = p.close(m, SyntaxKind::FIELD_ACCESS);
            continue;
        }

        // ── Infix operators ──
        if let Some((l_bp, r_bp)) = infix_binding_power(current) {
            if l_bp < min_bp {
                break;
            }
            let m = p.open_before(lhs);
            p.advance(); // operator
            expr_bp(p, r_bp);
            lhs = p.close(m, SyntaxKind::BINARY_EXPR);
            continue;
        }

        break;
    }

    Some(lhs)
}

// ── Atom / Prefix Parsing (LHS) ───────────────────────────────────────

/// Parse the left-hand side of an expression: an atom or a prefix operator.
fn lhs(p: &mut Parser) -> Option<MarkClosed> {
    match p.current() {
        // ── Prefix: dereference and address-of ──
        SyntaxKind::STAR | SyntaxKind::AMP => {
            let m = p.open();
            p.advance(); // operator
            expr_bp(p, PREFIX_BP);
            Some(p.close(m, SyntaxKind::UNARY_EXPR))
        }

        // ── Prefix: allocation ──
        SyntaxKind::ALLOC_KW => {
            let m = p.open();
            p.advance(); // alloc
            expr_bp(p, PREFIX_BP);
            Some(p.close(m, SyntaxKind::ALLOC_EXPR))
        }

        // ── Atoms ──
        SyntaxKind::INT_LITERAL => {
            let m = p.open();
            p.advance();
            Some(p.close(m, SyntaxKind::LITERAL))
        }

        SyntaxKind::IDENT => {
            let m = p.open();
            p.advance();
            Some(p.close(m, SyntaxKind::NAME_REF))
        }

        SyntaxKind::INPUT_KW => {
            let m = p.open();
            p.advance();
            Some(p.close(m, SyntaxKind::INPUT_EXPR))
        }

        // Grouped expression
        SyntaxKind::L_PAREN => {
            let m = p.open();
            p.advance(); // (
            expr_bp(p, 0);
            p.expect(SyntaxKind::R_PAREN);
            Some(p.close(m, SyntaxKind::PAREN_EXPR))
        }

        // Record literal
        SyntaxKind::L_BRACE => Some(parse_record_literal(p)),

        _ => {
            p.error("expected expression");
            None
        }
    }
}

// ── Record Literal ─────────────────────────────────────────────────────

/// Parse a record literal: `{f: e1, g: e2}`.
fn parse_record_literal(p: &mut Parser) -> MarkClosed {
    let m = p.open();
    p.advance(); // {

    if !p.at(SyntaxKind::R_BRACE) && !p.at(SyntaxKind::EOF) {
        parse_record_field(p);
        while p.eat(SyntaxKind::COMMA) {
            parse_record_field(p);
        }
    }

    p.expect(SyntaxKind::R_BRACE);
    p.close(m, SyntaxKind::RECORD_LITERAL)
}

/// Parse a single `name: expr` field.
fn parse_record_field(p: &mut Parser) {
    let m = p.open();
    p.expect(SyntaxKind::IDENT);
    p.expect(SyntaxKind::COLON);
    expr_bp(p, 0);
    p.close(m, SyntaxKind::RECORD_FIELD);
}

// ── Argument List ──────────────────────────────────────────────────────

/// Parse an argument list: `(expr, expr, ...)`.
fn parse_arg_list(p: &mut Parser) {
    let m = p.open();
    p.advance(); // (

    if !p.at(SyntaxKind::R_PAREN) && !p.at(SyntaxKind::EOF) {
        expr_bp(p, 0);
        while p.eat(SyntaxKind::COMMA) {
            expr_bp(p, 0);
        }
    }

    p.expect(SyntaxKind::R_PAREN);
    p.close(m, SyntaxKind::ARG_LIST);
}
