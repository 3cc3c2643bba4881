//! Union-find unification over Pico type terms.
//!
//! The [`Unifier`] owns the unification table, the anchored-variable store,
//! and the list of every constraint it has observed. It solves constraint
//! batches in two modes:
//!
//! - [`Unifier::solve`] -- monomorphic, unify-in-place. Used for the
//!   recursive closure of the call graph, whose types cannot be
//!   generalized.
//! - [`Unifier::solve_polymorphic`] -- per-callsite instantiation. A
//!   constraint side that is a non-recursive function's declaration
//!   variable, already resolved to a function term, is replaced by a fresh
//!   copy of that term before unifying. Copying the scheme instead of
//!   introducing quantifiers is what gives let-polymorphism: two callsites
//!   of `id` get two copies and never constrain each other.
//!
//! There is no occurs check. Recursive types through pointers (`α = &α`)
//! are legal; termination on cyclic terms comes from unioning classes
//! *before* recursing into their bound terms, and reification memoizes on
//! class representatives.

use ena::unify::InPlaceUnificationTable;
use rustc_hash::{FxHashMap, FxHashSet};

use pico_common::span::Span;

use crate::constraint::Constraint;
use crate::error::TypeError;
use crate::symbols::DeclInfo;
use crate::ty::{Ty, TyValue, TyVar, VarOrigin};

/// Where an anchored variable lives: at a declaration or at an expression.
///
/// The two namespaces are kept apart so a declaration and an expression
/// can never collide on a span.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum Anchor {
    Decl(Span),
    Expr(Span),
}

/// The unification engine.
pub struct Unifier {
    /// The union-find table (ena).
    table: InPlaceUnificationTable<TyVar>,
    /// Origin of each variable, indexed by `TyVar.0`.
    origins: Vec<VarOrigin>,
    /// AST-anchored variables: one per declaration / expression node.
    anchors: FxHashMap<Anchor, TyVar>,
    /// Every constraint handed to `solve` / `solve_polymorphic`.
    constraints: Vec<Constraint>,
}

impl Unifier {
    /// Create an empty unifier.
    pub fn new() -> Self {
        Unifier {
            table: InPlaceUnificationTable::new(),
            origins: Vec::new(),
            anchors: FxHashMap::default(),
            constraints: Vec::new(),
        }
    }

    // ── Variable creation ──────────────────────────────────────────────

    fn new_var(&mut self, origin: VarOrigin) -> TyVar {
        let var = self.table.new_key(TyValue(None));
        debug_assert_eq!(var.0 as usize, self.origins.len());
        self.origins.push(origin);
        var
    }

    /// Mint a fresh (synthetic) variable.
    pub fn fresh_var(&mut self) -> TyVar {
        let id = self.origins.len() as u32;
        self.new_var(VarOrigin::Fresh { id })
    }

    /// The variable anchored at a declaration, minting it on first use.
    pub fn var_for_decl(&mut self, decl: &DeclInfo) -> TyVar {
        let anchor = Anchor::Decl(decl.span);
        if let Some(&var) = self.anchors.get(&anchor) {
            return var;
        }
        let var = self.new_var(VarOrigin::Decl {
            name: decl.name.clone(),
            span: decl.span,
        });
        self.anchors.insert(anchor, var);
        var
    }

    /// The variable anchored at an expression, minting it on first use.
    pub fn var_for_expr(&mut self, label: &str, span: Span) -> TyVar {
        let anchor = Anchor::Expr(span);
        if let Some(&var) = self.anchors.get(&anchor) {
            return var;
        }
        let var = self.new_var(VarOrigin::Expr {
            label: label.to_string(),
            span,
        });
        self.anchors.insert(anchor, var);
        var
    }

    /// The representative of a variable's equivalence class.
    pub fn find(&mut self, var: TyVar) -> TyVar {
        self.table.find(var)
    }

    fn probe(&mut self, var: TyVar) -> Option<Ty> {
        self.table.probe_value(var).0
    }

    // ── Unification ────────────────────────────────────────────────────

    /// Unify two terms, making them equal.
    pub fn unify(&mut self, a: &Ty, b: &Ty, span: Span) -> Result<(), TypeError> {
        match (a, b) {
            (Ty::Var(v1), Ty::Var(v2)) => {
                let r1 = self.table.find(*v1);
                let r2 = self.table.find(*v2);
                if r1 == r2 {
                    return Ok(());
                }
                let b1 = self.probe(r1);
                let b2 = self.probe(r2);
                // Union before recursing: revisiting this pair of classes
                // short-circuits at the equal-roots check above, which is
                // what terminates unification of cyclic terms.
                self.table
                    .unify_var_var(r1, r2)
                    .expect("value merge is infallible");
                if let (Some(t1), Some(t2)) = (b1, b2) {
                    self.unify(&t1, &t2, span)?;
                }
                Ok(())
            }

            (Ty::Var(v), t) | (t, Ty::Var(v)) => {
                let root = self.table.find(*v);
                match self.probe(root) {
                    Some(bound) => self.unify(&bound, t, span),
                    None => {
                        self.table
                            .unify_var_value(root, TyValue(Some(t.clone())))
                            .expect("value merge is infallible");
                        Ok(())
                    }
                }
            }

            (Ty::Int, Ty::Int) | (Ty::Absent, Ty::Absent) => Ok(()),

            (Ty::Ref(a1), Ty::Ref(b1)) => self.unify(a1, b1, span),

            (Ty::Fun(p1, r1), Ty::Fun(p2, r2)) => {
                if p1.len() != p2.len() {
                    return Err(TypeError::ArityMismatch {
                        expected: p1.len(),
                        found: p2.len(),
                        span,
                    });
                }
                for (x, y) in p1.iter().zip(p2.iter()) {
                    self.unify(x, y, span)?;
                }
                self.unify(r1, r2, span)
            }

            (Ty::Record(f1), Ty::Record(f2)) => {
                let names_match = f1.len() == f2.len()
                    && f1
                        .iter()
                        .zip(f2.iter())
                        .all(|((n1, _), (n2, _))| n1 == n2);
                if !names_match {
                    return Err(TypeError::FieldSetMismatch {
                        left: a.clone(),
                        right: b.clone(),
                        span,
                    });
                }
                for ((_, x), (_, y)) in f1.iter().zip(f2.iter()) {
                    self.unify(x, y, span)?;
                }
                Ok(())
            }

            _ => Err(TypeError::HeadMismatch {
                left: a.clone(),
                right: b.clone(),
                span,
            }),
        }
    }

    // ── Solving ────────────────────────────────────────────────────────

    /// Solve a batch of constraints monomorphically, in order.
    ///
    /// The first failure aborts the whole batch.
    pub fn solve(&mut self, constraints: &[Constraint]) -> Result<(), TypeError> {
        for c in constraints {
            self.constraints.push(c.clone());
            self.unify(&c.left, &c.right, c.span)?;
        }
        Ok(())
    }

    /// Solve one function body's constraints with per-callsite
    /// instantiation of the functions in `instantiable`.
    ///
    /// Each constraint gets its own instantiation, so two callsites of the
    /// same function never share a copy.
    pub fn solve_polymorphic(
        &mut self,
        constraints: &[Constraint],
        instantiable: &FxHashSet<TyVar>,
    ) -> Result<(), TypeError> {
        for c in constraints {
            self.constraints.push(c.clone());
            let left = self.instantiate_if_scheme(&c.left, instantiable);
            let right = self.instantiate_if_scheme(&c.right, instantiable);
            self.unify(&left, &right, c.span)?;
        }
        Ok(())
    }

    // ── Instantiation ──────────────────────────────────────────────────

    /// If `term` is the declaration variable of an instantiable function
    /// whose class has resolved to a function term, return a fresh copy of
    /// that scheme; otherwise return the term unchanged.
    ///
    /// The collector only ever mentions function declaration variables at
    /// the top of a term (occurrences get their own anchored variable), so
    /// a top-level check is complete.
    fn instantiate_if_scheme(&mut self, term: &Ty, instantiable: &FxHashSet<TyVar>) -> Ty {
        if let Ty::Var(v) = term {
            if instantiable.contains(v) {
                let root = self.table.find(*v);
                if matches!(self.probe(root), Some(Ty::Fun(..))) {
                    let mut memo = FxHashMap::default();
                    return self.instantiate_class(root, &mut memo);
                }
            }
        }
        term.clone()
    }

    /// Copy the type reachable from a class, freshening free variable
    /// classes and sharing bound-to-ground structure. Memoized per class so
    /// sharing inside one instantiation is preserved (`(α, α) -> α` copies
    /// to `(β, β) -> β`, one β).
    fn instantiate_class(&mut self, var: TyVar, memo: &mut FxHashMap<TyVar, Ty>) -> Ty {
        let root = self.table.find(var);
        if let Some(t) = memo.get(&root) {
            return t.clone();
        }
        match self.probe(root) {
            None => {
                let fresh = Ty::Var(self.fresh_var());
                memo.insert(root, fresh.clone());
                fresh
            }
            Some(term) => {
                // Cyclic classes are shared, not copied: the back-edge
                // resolves to the original representative.
                memo.insert(root, Ty::Var(root));
                let copy = self.instantiate_term(&term, memo);
                memo.insert(root, copy.clone());
                copy
            }
        }
    }

    fn instantiate_term(&mut self, term: &Ty, memo: &mut FxHashMap<TyVar, Ty>) -> Ty {
        match term {
            Ty::Var(v) => self.instantiate_class(*v, memo),
            Ty::Int | Ty::Absent => term.clone(),
            Ty::Ref(inner) => Ty::Ref(Box::new(self.instantiate_term(inner, memo))),
            Ty::Record(fields) => Ty::Record(
                fields
                    .iter()
                    .map(|(name, ty)| (name.clone(), self.instantiate_term(ty, memo)))
                    .collect(),
            ),
            Ty::Fun(params, ret) => {
                let params = params
                    .iter()
                    .map(|p| self.instantiate_term(p, memo))
                    .collect();
                let ret = Box::new(self.instantiate_term(ret, memo));
                Ty::Fun(params, ret)
            }
        }
    }

    // ── Reification ────────────────────────────────────────────────────

    /// The inferred type of a variable: its class fully resolved through
    /// the table, with cycles cut at the class representative.
    ///
    /// Stable: repeated calls return structurally equal terms.
    pub fn inferred(&mut self, var: TyVar) -> Ty {
        let mut memo = FxHashMap::default();
        self.resolve_var(var, &mut memo)
    }

    /// Resolve an arbitrary term the same way.
    pub fn resolve(&mut self, term: &Ty) -> Ty {
        let mut memo = FxHashMap::default();
        self.resolve_term(term, &mut memo)
    }

    fn resolve_var(&mut self, var: TyVar, memo: &mut FxHashMap<TyVar, Option<Ty>>) -> Ty {
        let root = self.table.find(var);
        match memo.get(&root) {
            // Already resolved.
            Some(Some(t)) => return t.clone(),
            // In progress: a cycle. Cut it at the representative.
            Some(None) => return Ty::Var(root),
            None => {}
        }
        match self.probe(root) {
            None => Ty::Var(root),
            Some(term) => {
                memo.insert(root, None);
                let resolved = self.resolve_term(&term, memo);
                memo.insert(root, Some(resolved.clone()));
                resolved
            }
        }
    }

    fn resolve_term(&mut self, term: &Ty, memo: &mut FxHashMap<TyVar, Option<Ty>>) -> Ty {
        match term {
            Ty::Var(v) => self.resolve_var(*v, memo),
            Ty::Int | Ty::Absent => term.clone(),
            Ty::Ref(inner) => Ty::Ref(Box::new(self.resolve_term(inner, memo))),
            Ty::Record(fields) => Ty::Record(
                fields
                    .iter()
                    .map(|(name, ty)| (name.clone(), self.resolve_term(ty, memo)))
                    .collect(),
            ),
            Ty::Fun(params, ret) => {
                let params = params
                    .iter()
                    .map(|p| self.resolve_term(p, memo))
                    .collect();
                let ret = Box::new(self.resolve_term(ret, memo));
                Ty::Fun(params, ret)
            }
        }
    }

    // ── Rendering ──────────────────────────────────────────────────────

    /// Render a term for humans: free variables print as `α<origin>`,
    /// everything else follows the textual type representation (`int`,
    /// `&T`, `{f:T}`, `(A, B) -> R`).
    pub fn render(&mut self, term: &Ty) -> String {
        let resolved = self.resolve(term);
        let mut out = String::new();
        self.render_into(&resolved, &mut out);
        out
    }

    fn render_into(&mut self, term: &Ty, out: &mut String) {
        match term {
            Ty::Var(v) => {
                let root = self.table.find(*v);
                let label = self.class_label(root);
                out.push_str("\u{03b1}<");
                out.push_str(&label);
                out.push('>');
            }
            Ty::Int => out.push_str("int"),
            Ty::Absent => out.push('\u{25c7}'),
            Ty::Ref(inner) => {
                out.push('&');
                self.render_into(inner, out);
            }
            Ty::Record(fields) => {
                out.push('{');
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        out.push(',');
                    }
                    out.push_str(name);
                    out.push(':');
                    self.render_into(ty, out);
                }
                out.push('}');
            }
            Ty::Fun(params, ret) => {
                out.push('(');
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        out.push_str(", ");
                    }
                    self.render_into(p, out);
                }
                out.push_str(") -> ");
                self.render_into(ret, out);
            }
        }
    }

    /// The display label for a free class.
    ///
    /// The class representative ena picks is arbitrary, so scan the class
    /// for its best-anchored member: a declaration if one exists (the
    /// class of `a` in `(α<a>) -> α<a>` also contains every occurrence of
    /// `a`), otherwise the lowest-numbered member.
    fn class_label(&mut self, root: TyVar) -> String {
        let count = self.origins.len() as u32;
        let mut fallback: Option<u32> = None;
        for i in 0..count {
            if self.table.find(TyVar(i)) != root {
                continue;
            }
            if matches!(self.origins[i as usize], VarOrigin::Decl { .. }) {
                return self.origins[i as usize].label();
            }
            if fallback.is_none() {
                fallback = Some(i);
            }
        }
        match fallback {
            Some(i) => self.origins[i as usize].label(),
            None => self.origins[root.0 as usize].label(),
        }
    }

    // ── Observed constraints ───────────────────────────────────────────

    /// Every constraint handed to the solver so far.
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }
}

impl Default for Unifier {
    fn default() -> Self {
        Self::new()
    }
}
