//! Pico type checker: interprocedural type inference.
//!
//! This crate assigns a type to every function and every parameter/local
//! declaration of a parsed Pico program. Inference generates equality
//! constraints from the AST and solves them by first-order unification
//! over a term DAG, with a let-polymorphism scheme that keeps distinct
//! callsites of a non-recursive function independent:
//!
//! - Functions involved in recursion (directly, mutually, or reachable
//!   from a recursive group) are solved monomorphically.
//! - Every other function is solved callees-first; each callsite copies
//!   the callee's inferred scheme with fresh variables.
//!
//! Recursive types through pointers are supported (`α = &α` solves and
//! reifies); there is no occurs check.
//!
//! # Architecture
//!
//! - [`ty`]: type term representation (Ty, TyVar, VarOrigin)
//! - [`constraint`]: term equality constraints
//! - [`symbols`]: symbol table and name resolution
//! - [`collect`]: constraint collection over function bodies
//! - [`callgraph`]: recursion detection and inverse topological order
//! - [`unify`]: the union-find unifier with both solving modes
//! - [`infer`]: the driver tying the pipeline together
//! - [`error`] / [`diagnostics`]: failures and their rendering

pub mod callgraph;
pub mod collect;
pub mod constraint;
pub mod diagnostics;
pub mod error;
pub mod infer;
pub mod symbols;
pub mod ty;
pub mod unify;

pub use error::{CheckError, SymbolError, TypeError};
pub use infer::{TypeInference, TypeSummary};
pub use symbols::{DeclInfo, SymbolTable};

/// Type-check a parsed Pico program.
///
/// Builds the symbol table and runs the full inference pipeline. This is
/// the main entry point for callers that do not need to hold on to the
/// symbol table themselves.
pub fn check(parse: &pico_parser::Parse) -> Result<TypeInference, CheckError> {
    let file = parse.tree();
    let symbols = SymbolTable::build(&file)?;
    TypeInference::check(&file, &symbols).map_err(CheckError::from)
}
