// Pico lexer -- tokenizer for the Pico programming language.

mod cursor;

use cursor::Cursor;
use pico_common::error::{LexError, LexErrorKind};
use pico_common::span::Span;
use pico_common::token::{keyword_from_str, Token, TokenKind};

/// The Pico lexer. Converts source text into a stream of tokens.
///
/// Wraps a [`Cursor`] for byte-level iteration and implements
/// `Iterator<Item = Token>` so callers can consume tokens lazily or
/// collect them into a `Vec`. Whitespace (including newlines) is
/// skipped; comments are emitted as trivia tokens so the parser can
/// keep them in the lossless syntax tree.
pub struct Lexer<'src> {
    cursor: Cursor<'src>,
    /// Whether we have already emitted the `Eof` token.
    emitted_eof: bool,
    /// Lexing problems encountered so far.
    errors: Vec<LexError>,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            cursor: Cursor::new(source),
            emitted_eof: false,
            errors: Vec::new(),
        }
    }

    /// Convenience: tokenize the entire source into a `Vec<Token>`.
    ///
    /// The returned vector includes the final `Eof` token. Unrecognized
    /// characters appear as `Error` tokens.
    pub fn tokenize(source: &str) -> Vec<Token> {
        Lexer::new(source).collect()
    }

    /// Tokenize and also return the collected lexer errors.
    pub fn tokenize_with_errors(source: &str) -> (Vec<Token>, Vec<LexError>) {
        let mut lexer = Lexer::new(source);
        let tokens: Vec<Token> = (&mut lexer).collect();
        (tokens, lexer.errors)
    }

    /// Produce the next token.
    fn produce_token(&mut self) -> Token {
        self.skip_whitespace();

        let start = self.cursor.pos();

        let Some(c) = self.cursor.peek() else {
            return Token::new(TokenKind::Eof, start, start);
        };

        match c {
            // ── Delimiters and punctuation ──────────────────────────────
            '(' => self.single_char_token(TokenKind::LParen, start),
            ')' => self.single_char_token(TokenKind::RParen, start),
            '{' => self.single_char_token(TokenKind::LBrace, start),
            '}' => self.single_char_token(TokenKind::RBrace, start),
            ',' => self.single_char_token(TokenKind::Comma, start),
            ';' => self.single_char_token(TokenKind::Semicolon, start),
            ':' => self.single_char_token(TokenKind::Colon, start),
            '.' => self.single_char_token(TokenKind::Dot, start),
            '&' => self.single_char_token(TokenKind::Amp, start),

            // ── Operators ───────────────────────────────────────────────
            '+' => self.single_char_token(TokenKind::Plus, start),
            '-' => self.single_char_token(TokenKind::Minus, start),
            '*' => self.single_char_token(TokenKind::Star, start),
            '=' => self.lex_eq(start),
            '!' => self.lex_bang(start),
            '<' => self.lex_lt(start),
            '>' => self.lex_gt(start),

            // ── Comments or division ────────────────────────────────────
            '/' => self.lex_slash(start),

            // ── Number literals ─────────────────────────────────────────
            '0'..='9' => self.lex_number(start),

            // ── Identifiers and keywords ────────────────────────────────
            c if is_ident_start(c) => self.lex_ident(start),

            // ── Unknown character (error recovery) ──────────────────────
            other => {
                self.cursor.advance();
                self.errors.push(LexError::new(
                    LexErrorKind::UnexpectedCharacter(other),
                    Span::new(start, self.cursor.pos()),
                ));
                Token::new(TokenKind::Error, start, self.cursor.pos())
            }
        }
    }

    // ── Helpers ────────────────────────────────────────────────────────

    /// Skip whitespace characters. Newlines are insignificant in Pico.
    fn skip_whitespace(&mut self) {
        self.cursor.eat_while(|c| c.is_ascii_whitespace());
    }

    /// Consume one character and return a token of the given kind.
    fn single_char_token(&mut self, kind: TokenKind, start: u32) -> Token {
        self.cursor.advance();
        Token::new(kind, start, self.cursor.pos())
    }

    /// `=` -> `Eq`, `==` -> `EqEq`
    fn lex_eq(&mut self, start: u32) -> Token {
        self.cursor.advance(); // consume '='
        if self.cursor.peek() == Some('=') {
            self.cursor.advance();
            Token::new(TokenKind::EqEq, start, self.cursor.pos())
        } else {
            Token::new(TokenKind::Eq, start, self.cursor.pos())
        }
    }

    /// `!=` -> `NotEq`, bare `!` -> `Error`
    fn lex_bang(&mut self, start: u32) -> Token {
        self.cursor.advance(); // consume '!'
        if self.cursor.peek() == Some('=') {
            self.cursor.advance();
            Token::new(TokenKind::NotEq, start, self.cursor.pos())
        } else {
            self.errors.push(LexError::new(
                LexErrorKind::UnexpectedCharacter('!'),
                Span::new(start, self.cursor.pos()),
            ));
            Token::new(TokenKind::Error, start, self.cursor.pos())
        }
    }

    /// `<` -> `Lt`, `<=` -> `LtEq`
    fn lex_lt(&mut self, start: u32) -> Token {
        self.cursor.advance(); // consume '<'
        if self.cursor.peek() == Some('=') {
            self.cursor.advance();
            Token::new(TokenKind::LtEq, start, self.cursor.pos())
        } else {
            Token::new(TokenKind::Lt, start, self.cursor.pos())
        }
    }

    /// `>` -> `Gt`, `>=` -> `GtEq`
    fn lex_gt(&mut self, start: u32) -> Token {
        self.cursor.advance(); // consume '>'
        if self.cursor.peek() == Some('=') {
            self.cursor.advance();
            Token::new(TokenKind::GtEq, start, self.cursor.pos())
        } else {
            Token::new(TokenKind::Gt, start, self.cursor.pos())
        }
    }

    /// `//` line comment, `/* */` block comment, or `/` division.
    fn lex_slash(&mut self, start: u32) -> Token {
        match self.cursor.peek_next() {
            Some('/') => {
                self.cursor.eat_while(|c| c != '\n');
                Token::new(TokenKind::Comment, start, self.cursor.pos())
            }
            Some('*') => {
                self.cursor.advance(); // '/'
                self.cursor.advance(); // '*'
                loop {
                    match self.cursor.peek() {
                        Some('*') if self.cursor.peek_next() == Some('/') => {
                            self.cursor.advance();
                            self.cursor.advance();
                            break;
                        }
                        Some(_) => {
                            self.cursor.advance();
                        }
                        None => {
                            self.errors.push(LexError::new(
                                LexErrorKind::UnterminatedBlockComment,
                                Span::new(start, self.cursor.pos()),
                            ));
                            break;
                        }
                    }
                }
                Token::new(TokenKind::Comment, start, self.cursor.pos())
            }
            _ => self.single_char_token(TokenKind::Slash, start),
        }
    }

    /// A run of ASCII digits.
    fn lex_number(&mut self, start: u32) -> Token {
        self.cursor.eat_while(|c| c.is_ascii_digit());
        Token::new(TokenKind::IntLiteral, start, self.cursor.pos())
    }

    /// An identifier or keyword.
    fn lex_ident(&mut self, start: u32) -> Token {
        self.cursor.eat_while(is_ident_continue);
        let text = self.cursor.slice(start, self.cursor.pos());
        let kind = keyword_from_str(text).unwrap_or(TokenKind::Ident);
        Token::new(kind, start, self.cursor.pos())
    }
}

impl Iterator for Lexer<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.emitted_eof {
            return None;
        }
        let token = self.produce_token();
        if token.kind == TokenKind::Eof {
            self.emitted_eof = true;
        }
        Some(token)
    }
}

/// Whether a character can start an identifier.
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

/// Whether a character can continue an identifier.
fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}
