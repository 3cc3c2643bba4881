//! `picoc` -- parse a Pico source file, run type inference, and print the
//! inferred types of every function and local.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use pico_common::span::LineIndex;

/// Type checker for the Pico language.
#[derive(Parser)]
#[command(name = "picoc", version, about)]
struct Cli {
    /// Source file to check.
    file: PathBuf,

    /// Emit inferred types as JSON instead of text.
    #[arg(long)]
    json: bool,

    /// Only check; do not print inferred types.
    #[arg(long)]
    quiet: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let source = match std::fs::read_to_string(&cli.file) {
        Ok(source) => source,
        Err(err) => {
            eprintln!("error: cannot read {}: {}", cli.file.display(), err);
            return ExitCode::FAILURE;
        }
    };
    let filename = cli.file.display().to_string();

    let parse = pico_parser::parse(&source);
    if !parse.ok() {
        let lines = LineIndex::new(&source);
        for err in parse.errors() {
            let (line, col) = lines.line_col(err.span.start);
            eprintln!("{}:{}:{}: error: {}", filename, line, col, err);
        }
        return ExitCode::FAILURE;
    }

    let mut infer = match pico_typeck::check(&parse) {
        Ok(infer) => infer,
        Err(err) => {
            eprint!(
                "{}",
                pico_typeck::diagnostics::render_diagnostic(&err, &source, &filename)
            );
            return ExitCode::FAILURE;
        }
    };

    if cli.quiet {
        return ExitCode::SUCCESS;
    }

    if cli.json {
        let summary = infer.summary();
        match serde_json::to_string_pretty(&summary) {
            Ok(json) => println!("{}", json),
            Err(err) => {
                eprintln!("error: cannot serialize results: {}", err);
                return ExitCode::FAILURE;
            }
        }
    } else {
        let mut out = String::new();
        if infer.print(&mut out).is_ok() {
            print!("{}", out);
        }
    }

    ExitCode::SUCCESS
}
