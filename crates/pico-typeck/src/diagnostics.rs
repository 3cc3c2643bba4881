//! Ariadne-based diagnostic rendering.
//!
//! Renders checking failures into formatted, labeled error messages.
//! Output is colorless so it is stable in tests and logs.

use std::ops::Range;

use ariadne::{Config, Label, Report, ReportKind, Source};

use pico_common::span::Span;

use crate::error::{CheckError, SymbolError, TypeError};

/// Assign a stable error code to each failure kind.
fn error_code(err: &CheckError) -> &'static str {
    match err {
        CheckError::Type(TypeError::HeadMismatch { .. }) => "E0001",
        CheckError::Type(TypeError::ArityMismatch { .. }) => "E0002",
        CheckError::Type(TypeError::FieldSetMismatch { .. }) => "E0003",
        CheckError::Symbol(SymbolError::UnknownName { .. }) => "E0004",
        CheckError::Symbol(SymbolError::DuplicateFunction { .. }) => "E0005",
        CheckError::Symbol(SymbolError::DuplicateLocal { .. }) => "E0006",
    }
}

/// Clamp a span to valid, non-empty bounds within the source.
fn clamp(span: Span, source_len: usize) -> Range<usize> {
    let start = (span.start as usize).min(source_len);
    let end = (span.end as usize).min(source_len).max(start);
    if start == end {
        start..end.saturating_add(1).min(source_len)
    } else {
        start..end
    }
}

/// Render a checking failure into a formatted diagnostic string.
pub fn render_diagnostic(err: &CheckError, source: &str, _filename: &str) -> String {
    let config = Config::default().with_color(false);
    let span = match err {
        CheckError::Type(type_err) => type_err.span(),
        CheckError::Symbol(sym_err) => sym_err.span(),
    };
    let range = clamp(span, source.len());

    let label_message = match err {
        CheckError::Type(TypeError::HeadMismatch { .. }) => "conflicting constraint here",
        CheckError::Type(TypeError::ArityMismatch { .. }) => "wrong number of arguments",
        CheckError::Type(TypeError::FieldSetMismatch { .. }) => "record shapes disagree",
        CheckError::Symbol(SymbolError::UnknownName { .. }) => "not found in this scope",
        CheckError::Symbol(SymbolError::DuplicateFunction { .. })
        | CheckError::Symbol(SymbolError::DuplicateLocal { .. }) => "second definition here",
    };

    let report = Report::build(ReportKind::Error, range.clone())
        .with_code(error_code(err))
        .with_message(err.to_string())
        .with_config(config)
        .with_label(Label::new(range).with_message(label_message))
        .finish();

    let mut buf = Vec::new();
    let cache = Source::from(source);
    report
        .write(cache, &mut buf)
        .expect("failed to write diagnostic");
    String::from_utf8(buf).expect("diagnostic output should be valid UTF-8")
}
