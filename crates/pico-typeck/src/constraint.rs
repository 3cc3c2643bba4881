//! Type equality constraints.

use std::fmt;

use pico_common::span::Span;

use crate::ty::Ty;

/// An equality constraint between two type terms: "left must equal right".
///
/// The span records where in the source the constraint was generated, for
/// diagnostics only.
#[derive(Clone, Debug)]
pub struct Constraint {
    pub left: Ty,
    pub right: Ty,
    pub span: Span,
}

impl Constraint {
    /// Create a new constraint.
    pub fn new(left: Ty, right: Ty, span: Span) -> Self {
        Self { left, right, span }
    }
}

impl PartialEq for Constraint {
    fn eq(&self, other: &Self) -> bool {
        // Term-wise comparison; the span intentionally does not participate.
        self.left == other.left && self.right == other.right
    }
}

impl Eq for Constraint {}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} = {}", self.left, self.right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ty::TyVar;

    #[test]
    fn constraints_are_compared_term_wise() {
        let fun = Ty::fun(vec![Ty::Int], Ty::Int);
        let a = Constraint::new(fun.clone(), fun.clone(), Span::new(0, 1));
        let b = Constraint::new(fun.clone(), fun, Span::new(5, 9));
        assert_eq!(a, b);
        assert!(!(a != b));
    }

    #[test]
    fn display_is_an_equation() {
        let c = Constraint::new(
            Ty::Var(TyVar(0)),
            Ty::fun(vec![Ty::Int], Ty::Int),
            Span::new(0, 1),
        );
        let rendered = c.to_string();
        // "<term> = <term>"
        let (left, right) = rendered.split_once(" = ").expect("equation shape");
        assert!(!left.is_empty());
        assert!(!right.is_empty());
        assert_eq!(rendered, "?0 = (int) -> int");
    }
}
