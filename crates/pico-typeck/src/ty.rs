//! Type term representation for Pico inference.
//!
//! Defines the core `Ty` term grammar, inference variables (`TyVar`), and
//! their `ena` union-find integration. Terms form a DAG through the
//! unification table: a `Ty::Var` stands for whatever its equivalence
//! class has been unified with, and classes may be cyclic (`α = &α` is a
//! legal recursive pointer type).

use std::fmt;

use ena::unify::{NoError, UnifyKey, UnifyValue};
use pico_common::span::Span;

/// A type variable, identified by a `u32` index into the unification table.
///
/// Variables are either anchored at an AST node (a declaration or an
/// expression -- see [`VarOrigin`]) or minted fresh during polymorphic
/// instantiation. The `ena` crate handles the union-find mechanics.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct TyVar(pub u32);

/// A Pico type term.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Ty {
    /// An inference variable (resolved through the unification table).
    Var(TyVar),
    /// The integer type.
    Int,
    /// A pointer: `&T` (from `alloc` and address-of).
    Ref(Box<Ty>),
    /// A structural record with an ordered field list.
    ///
    /// Every record term carries the program's full field universe, so two
    /// record terms always agree on field-name sequences; fields a record
    /// does not define are [`Ty::Absent`].
    Record(Vec<(String, Ty)>),
    /// A function type: `(params) -> ret`.
    Fun(Vec<Ty>, Box<Ty>),
    /// The "no such field" marker used by the field-universe encoding of
    /// record types.
    Absent,
}

impl Ty {
    /// Create a pointer type.
    pub fn reference(inner: Ty) -> Ty {
        Ty::Ref(Box::new(inner))
    }

    /// Create a function type.
    pub fn fun(params: Vec<Ty>, ret: Ty) -> Ty {
        Ty::Fun(params, Box::new(ret))
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Ty::Var(v) => write!(f, "?{}", v.0),
            Ty::Int => write!(f, "int"),
            Ty::Ref(inner) => write!(f, "&{}", inner),
            Ty::Record(fields) => {
                write!(f, "{{")?;
                for (i, (name, ty)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ",")?;
                    }
                    write!(f, "{}:{}", name, ty)?;
                }
                write!(f, "}}")
            }
            Ty::Fun(params, ret) => {
                write!(f, "(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", p)?;
                }
                write!(f, ") -> {}", ret)
            }
            Ty::Absent => write!(f, "\u{25c7}"),
        }
    }
}

/// Where a type variable comes from.
///
/// Anchored variables give inference results their names: a free variable
/// renders as `α<origin>` where the origin is the declaration name or the
/// source form of the expression it is anchored at.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum VarOrigin {
    /// Anchored at a declaration (function, parameter, or local).
    Decl { name: String, span: Span },
    /// Anchored at an expression.
    Expr { label: String, span: Span },
    /// Minted by the unifier during polymorphic instantiation.
    Fresh { id: u32 },
}

impl VarOrigin {
    /// The text shown inside `α<...>` for a free variable.
    pub fn label(&self) -> String {
        match self {
            VarOrigin::Decl { name, .. } => name.clone(),
            VarOrigin::Expr { label, .. } => label.clone(),
            VarOrigin::Fresh { id } => format!("?{}", id),
        }
    }
}

// ── ena trait implementations ──────────────────────────────────────────

impl UnifyKey for TyVar {
    type Value = TyValue;

    fn index(&self) -> u32 {
        self.0
    }

    fn from_index(u: u32) -> Self {
        TyVar(u)
    }

    fn tag() -> &'static str {
        "TyVar"
    }
}

/// The binding of an equivalence class: `None` while the class is a free
/// variable, `Some(term)` once it has been unified with a constructor.
#[derive(Clone, Debug, PartialEq)]
pub struct TyValue(pub Option<Ty>);

impl UnifyValue for TyValue {
    type Error = NoError;

    /// Prefer the bound side when classes merge. When both sides are bound
    /// the unifier re-unifies the two terms itself, after the union -- the
    /// union-before-recursion order is what makes cyclic terms terminate.
    fn unify_values(a: &Self, b: &Self) -> Result<Self, NoError> {
        Ok(match (&a.0, &b.0) {
            (Some(t), _) => TyValue(Some(t.clone())),
            (None, other) => TyValue(other.clone()),
        })
    }
}
