//! Integration tests for the Pico lexer.

use pico_common::error::LexErrorKind;
use pico_common::token::TokenKind;
use pico_lexer::Lexer;

/// Collect just the token kinds, dropping the trailing Eof.
fn kinds(source: &str) -> Vec<TokenKind> {
    let mut kinds: Vec<TokenKind> = Lexer::tokenize(source).into_iter().map(|t| t.kind).collect();
    assert_eq!(kinds.pop(), Some(TokenKind::Eof));
    kinds
}

#[test]
fn empty_source_is_just_eof() {
    let tokens = Lexer::tokenize("");
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, TokenKind::Eof);
}

#[test]
fn keywords_and_identifiers() {
    assert_eq!(
        kinds("var x; return input;"),
        vec![
            TokenKind::Var,
            TokenKind::Ident,
            TokenKind::Semicolon,
            TokenKind::Return,
            TokenKind::Input,
            TokenKind::Semicolon,
        ]
    );
}

#[test]
fn keyword_prefix_is_still_identifier() {
    // `allocate` starts with the keyword `alloc` but must lex as one Ident.
    assert_eq!(kinds("allocate"), vec![TokenKind::Ident]);
    assert_eq!(kinds("inputs"), vec![TokenKind::Ident]);
}

#[test]
fn operators() {
    assert_eq!(
        kinds("a == b != c <= d >= e < f > g = h"),
        vec![
            TokenKind::Ident,
            TokenKind::EqEq,
            TokenKind::Ident,
            TokenKind::NotEq,
            TokenKind::Ident,
            TokenKind::LtEq,
            TokenKind::Ident,
            TokenKind::GtEq,
            TokenKind::Ident,
            TokenKind::Lt,
            TokenKind::Ident,
            TokenKind::Gt,
            TokenKind::Ident,
            TokenKind::Eq,
            TokenKind::Ident,
        ]
    );
}

#[test]
fn arithmetic_pointer_and_record_tokens() {
    assert_eq!(
        kinds("*p + &x - {f: 1}.f / 2"),
        vec![
            TokenKind::Star,
            TokenKind::Ident,
            TokenKind::Plus,
            TokenKind::Amp,
            TokenKind::Ident,
            TokenKind::Minus,
            TokenKind::LBrace,
            TokenKind::Ident,
            TokenKind::Colon,
            TokenKind::IntLiteral,
            TokenKind::RBrace,
            TokenKind::Dot,
            TokenKind::Ident,
            TokenKind::Slash,
            TokenKind::IntLiteral,
        ]
    );
}

#[test]
fn line_comment_is_trivia_token() {
    assert_eq!(
        kinds("x // trailing\ny"),
        vec![TokenKind::Ident, TokenKind::Comment, TokenKind::Ident]
    );
}

#[test]
fn block_comment_spans_lines() {
    assert_eq!(
        kinds("x /* one\ntwo */ y"),
        vec![TokenKind::Ident, TokenKind::Comment, TokenKind::Ident]
    );
}

#[test]
fn unterminated_block_comment_reports_error() {
    let (tokens, errors) = Lexer::tokenize_with_errors("f /* oops");
    assert!(tokens.iter().any(|t| t.kind == TokenKind::Comment));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, LexErrorKind::UnterminatedBlockComment);
}

#[test]
fn unexpected_character_becomes_error_token() {
    let (tokens, errors) = Lexer::tokenize_with_errors("x @ y");
    assert!(tokens.iter().any(|t| t.kind == TokenKind::Error));
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].kind, LexErrorKind::UnexpectedCharacter('@'));
}

#[test]
fn spans_are_byte_offsets() {
    let tokens = Lexer::tokenize("id(a)");
    assert_eq!(tokens[0].span.start, 0);
    assert_eq!(tokens[0].span.end, 2);
    assert_eq!(tokens[1].span.start, 2);
    assert_eq!(tokens[2].span.end, 4);
}

#[test]
fn whole_function_lexes() {
    let kinds = kinds("rec() { return rec(); }");
    assert_eq!(
        kinds,
        vec![
            TokenKind::Ident,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::LBrace,
            TokenKind::Return,
            TokenKind::Ident,
            TokenKind::LParen,
            TokenKind::RParen,
            TokenKind::Semicolon,
            TokenKind::RBrace,
        ]
    );
}
