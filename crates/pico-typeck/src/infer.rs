//! The inference driver: orchestrates call-graph analysis, constraint
//! collection, and the two solving modes.
//!
//! Order of operations:
//!
//! 1. Build the call-graph analyzer and compute the recursive closure.
//! 2. Collect constraints from every function in the closure and solve
//!    them monomorphically in one batch. This pins every recursive type
//!    (and rejects polymorphic recursion).
//! 3. Visit the remaining groups in inverse topological order; collect
//!    each function's constraints in isolation and solve them
//!    polymorphically. Callees are pinned before their callers, so each
//!    callsite instantiates a finished scheme.
//!
//! Recursive functions cannot be generalized -- their callsites reference
//! themselves -- so they are solved in place. Non-recursive callees are
//! generalized by instantiation-on-use: `id` applied at `int` and at
//! `{f:int}` does not force the two argument types together.

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;

use pico_parser::ast::item::{FnDef, SourceFile};

use crate::callgraph::CallGraphAnalyzer;
use crate::collect::ConstraintCollector;
use crate::error::TypeError;
use crate::symbols::{DeclInfo, SymbolTable};
use crate::ty::Ty;
use crate::unify::Unifier;

/// The result of type inference: the solved unifier plus the symbol table
/// and recursion verdicts needed to answer queries.
pub struct TypeInference {
    symbols: SymbolTable,
    unifier: Unifier,
    recursive: FxHashSet<String>,
}

impl TypeInference {
    /// Run the full inference pipeline over a program.
    ///
    /// Fails with the first unification error; no partial results are
    /// produced.
    pub fn check(
        file: &SourceFile,
        symbols: &SymbolTable,
    ) -> Result<TypeInference, TypeError> {
        let analyzer = CallGraphAnalyzer::build(file, symbols);
        let closure = analyzer.recursive_closure();
        let mut unifier = Unifier::new();

        let defs_by_name: FxHashMap<String, FnDef> = file
            .fn_defs()
            .filter_map(|def| {
                def.name()
                    .and_then(|n| n.text())
                    .map(|name| (name, def.clone()))
            })
            .collect();

        // 1. The recursive closure, monomorphically, in one batch.
        let mut batch = Vec::new();
        for (idx, function) in symbols.functions().iter().enumerate() {
            if !closure.contains(&idx) {
                continue;
            }
            let Some(def) = defs_by_name.get(&function.decl.name) else {
                continue;
            };
            let mut collector = ConstraintCollector::new(&mut unifier, symbols);
            collector.collect_fn(def);
            batch.extend(collector.finish());
        }
        unifier.solve(&batch)?;

        // 2. Declaration variables of the functions eligible for
        // per-callsite instantiation.
        let mut instantiable = FxHashSet::default();
        for (idx, function) in symbols.functions().iter().enumerate() {
            if !closure.contains(&idx) {
                instantiable.insert(unifier.var_for_decl(&function.decl));
            }
        }

        // 3. Non-recursive groups, callees first.
        for group in analyzer.inverse_topological_order() {
            if group.functions.iter().any(|f| closure.contains(f)) {
                continue;
            }
            for &idx in &group.functions {
                let function = &symbols.functions()[idx];
                let Some(def) = defs_by_name.get(&function.decl.name) else {
                    continue;
                };
                // A function's own definition constraints stay
                // monomorphic; only its callees are instantiated.
                let fn_var = unifier.var_for_decl(&function.decl);
                let mut eligible = instantiable.clone();
                eligible.remove(&fn_var);

                let mut collector = ConstraintCollector::new(&mut unifier, symbols);
                collector.collect_fn(def);
                let constraints = collector.finish();
                unifier.solve_polymorphic(&constraints, &eligible)?;
            }
        }

        let recursive = symbols
            .functions()
            .iter()
            .enumerate()
            .filter(|(idx, _)| analyzer.is_recursive(*idx))
            .map(|(_, f)| f.decl.name.clone())
            .collect();

        Ok(TypeInference {
            symbols: symbols.clone(),
            unifier,
            recursive,
        })
    }

    // ── Queries ────────────────────────────────────────────────────────

    /// The inferred type of a declaration, fully resolved, with cycles cut
    /// at class representatives. Stable across calls.
    pub fn get_inferred_type(&mut self, decl: &DeclInfo) -> Ty {
        let var = self.unifier.var_for_decl(decl);
        self.unifier.inferred(var)
    }

    /// The inferred type of a declaration, rendered for humans
    /// (`int`, `&int`, `{f:int}`, `(α<a>) -> α<a>`).
    pub fn type_display(&mut self, decl: &DeclInfo) -> String {
        let ty = self.get_inferred_type(decl);
        self.unifier.render(&ty)
    }

    /// Whether the named function was classified recursive by the
    /// call-graph analysis. Unknown names are not recursive.
    pub fn is_recursive(&self, name: &str) -> bool {
        self.recursive.contains(name)
    }

    /// The symbol table inference ran against.
    pub fn symbols(&self) -> &SymbolTable {
        &self.symbols
    }

    /// The underlying unifier (constraint log, renderer).
    pub fn unifier_mut(&mut self) -> &mut Unifier {
        &mut self.unifier
    }

    // ── Reporting ──────────────────────────────────────────────────────

    /// Write a human-readable dump of every function and local type.
    ///
    /// The format is for humans only, not a stable interface.
    pub fn print(&mut self, out: &mut impl fmt::Write) -> fmt::Result {
        let functions = self.symbols.functions().to_vec();

        writeln!(out, "functions: {{")?;
        for (i, function) in functions.iter().enumerate() {
            let ty = self.type_display(&function.decl);
            let sep = if i + 1 == functions.len() { "" } else { "," };
            writeln!(out, "  {}: {}{}", function.decl.name, ty, sep)?;
        }
        writeln!(out, "}}")?;

        for function in &functions {
            writeln!(out)?;
            writeln!(out, "locals for {}: {{", function.decl.name)?;
            let decls: Vec<&DeclInfo> =
                function.params.iter().chain(function.locals.iter()).collect();
            for (i, decl) in decls.iter().enumerate() {
                let ty = self.type_display(decl);
                let sep = if i + 1 == decls.len() { "" } else { "," };
                writeln!(out, "  {}: {}{}", decl.name, ty, sep)?;
            }
            writeln!(out, "}}")?;
        }
        Ok(())
    }

    /// A serializable summary of every inferred type.
    pub fn summary(&mut self) -> TypeSummary {
        let functions = self.symbols.functions().to_vec();
        let mut out = Vec::with_capacity(functions.len());
        for function in &functions {
            let ty = self.type_display(&function.decl);
            let recursive = self.is_recursive(&function.decl.name);
            let locals = function
                .params
                .iter()
                .chain(function.locals.iter())
                .map(|decl| LocalType {
                    name: decl.name.clone(),
                    ty: self.type_display(decl),
                })
                .collect();
            out.push(FunctionTypes {
                name: function.decl.name.clone(),
                ty,
                recursive,
                locals,
            });
        }
        TypeSummary { functions: out }
    }
}

/// Serializable inference results for the whole program.
#[derive(Debug, Serialize)]
pub struct TypeSummary {
    pub functions: Vec<FunctionTypes>,
}

/// One function's inferred signature and local types.
#[derive(Debug, Serialize)]
pub struct FunctionTypes {
    pub name: String,
    pub ty: String,
    pub recursive: bool,
    pub locals: Vec<LocalType>,
}

/// A parameter or local and its rendered type.
#[derive(Debug, Serialize)]
pub struct LocalType {
    pub name: String,
    pub ty: String,
}
