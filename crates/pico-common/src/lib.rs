//! Shared leaf types for the Pico compiler.
//!
//! Everything downstream of the lexer speaks in terms of these types:
//! byte-offset [`span::Span`]s, [`token::Token`]s, and lexer errors.

pub mod error;
pub mod span;
pub mod token;
