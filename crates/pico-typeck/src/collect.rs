//! Constraint collection: the post-order AST walk that turns one function
//! body into a batch of type equality constraints.
//!
//! Collector state is reset per function (the driver creates a fresh
//! collector for every batch), but all anchored variables are minted
//! through one shared [`Unifier`], so batches meet in the same variable
//! store.
//!
//! `[[e]]` below denotes the variable anchored at expression `e`, and
//! `[[d]]` the variable anchored at declaration `d`.

use pico_parser::ast::expr::Expr;
use pico_parser::ast::item::FnDef;
use pico_parser::ast::stmt::Stmt;
use pico_parser::ast::AstNode;
use pico_parser::SyntaxKind;

use crate::constraint::Constraint;
use crate::symbols::{Resolution, SymbolTable};
use crate::ty::{Ty, TyVar};
use crate::unify::Unifier;

/// Per-function context: the function's own declaration variable and its
/// parameter variables, used by `return` statements.
struct FnCtx {
    fn_var: TyVar,
    params: Vec<TyVar>,
}

/// Collects equality constraints from one function body at a time.
pub struct ConstraintCollector<'a> {
    unifier: &'a mut Unifier,
    symbols: &'a SymbolTable,
    constraints: Vec<Constraint>,
}

impl<'a> ConstraintCollector<'a> {
    /// Create a collector that mints variables through `unifier`.
    pub fn new(unifier: &'a mut Unifier, symbols: &'a SymbolTable) -> Self {
        ConstraintCollector {
            unifier,
            symbols,
            constraints: Vec::new(),
        }
    }

    /// The collected constraints, in emission order.
    pub fn finish(self) -> Vec<Constraint> {
        self.constraints
    }

    /// Walk one function and emit its constraints.
    pub fn collect_fn(&mut self, fn_def: &FnDef) {
        let symbols = self.symbols;
        let Some(name) = fn_def.name() else { return };
        let Some(fn_name) = name.text() else { return };
        let Some(function) = symbols.function(&fn_name) else {
            return;
        };

        let fn_var = self.unifier.var_for_decl(&function.decl);
        let params: Vec<TyVar> = function
            .params
            .iter()
            .map(|p| self.unifier.var_for_decl(p))
            .collect();
        // Anchor every local up front so unused locals still answer
        // inferred-type queries.
        for local in &function.locals {
            self.unifier.var_for_decl(local);
        }

        let ctx = FnCtx { fn_var, params };
        let Some(body) = fn_def.body() else { return };
        for stmt in body.stmts() {
            self.visit_stmt(&stmt, &ctx);
        }
    }

    fn push(&mut self, left: Ty, right: Ty, span: pico_common::span::Span) {
        self.constraints.push(Constraint::new(left, right, span));
    }

    // ── Statements ─────────────────────────────────────────────────────

    fn visit_stmt(&mut self, stmt: &Stmt, ctx: &FnCtx) {
        let span = stmt.span();
        match stmt {
            // Locals are anchored in collect_fn; the declaration itself
            // emits nothing.
            Stmt::VarDecl(_) => {}

            // lhs = rhs  =>  [[lhs]] = [[rhs]]
            Stmt::Assign(assign) => {
                let (Some(lhs), Some(rhs)) = (assign.lhs(), assign.rhs()) else {
                    return;
                };
                let lhs_ty = self.visit_expr(&lhs);
                let rhs_ty = self.visit_expr(&rhs);
                self.push(lhs_ty, rhs_ty, span);
            }

            // output e  =>  [[e]] = int
            Stmt::Output(output) => {
                if let Some(expr) = output.expr() {
                    let ty = self.visit_expr(&expr);
                    self.push(ty, Ty::Int, span);
                }
            }

            // return r  =>  [[f]] = ([[p1]], ..., [[pn]]) -> [[r]]
            Stmt::Return(ret) => {
                if let Some(expr) = ret.expr() {
                    let ret_ty = self.visit_expr(&expr);
                    let params = ctx.params.iter().map(|&p| Ty::Var(p)).collect();
                    self.push(
                        Ty::Var(ctx.fn_var),
                        Ty::Fun(params, Box::new(ret_ty)),
                        span,
                    );
                }
            }

            // if (c) ...  =>  [[c]] = int
            Stmt::If(if_stmt) => {
                if let Some(cond) = if_stmt.condition() {
                    let ty = self.visit_expr(&cond);
                    self.push(ty, Ty::Int, cond.span());
                }
                if let Some(then) = if_stmt.then_branch() {
                    self.visit_stmt(&then, ctx);
                }
                if let Some(alt) = if_stmt.else_branch() {
                    self.visit_stmt(&alt, ctx);
                }
            }

            // while (c) ...  =>  [[c]] = int
            Stmt::While(while_stmt) => {
                if let Some(cond) = while_stmt.condition() {
                    let ty = self.visit_expr(&cond);
                    self.push(ty, Ty::Int, cond.span());
                }
                if let Some(body) = while_stmt.body() {
                    self.visit_stmt(&body, ctx);
                }
            }

            Stmt::Block(block) => {
                for inner in block.stmts() {
                    self.visit_stmt(&inner, ctx);
                }
            }
        }
    }

    // ── Expressions ────────────────────────────────────────────────────

    fn visit_expr(&mut self, expr: &Expr) -> Ty {
        let symbols = self.symbols;
        let span = expr.span();
        match expr {
            // n  =>  [[n]] = int
            Expr::Literal(_) => {
                let var = self.expr_var(expr);
                self.push(Ty::Var(var), Ty::Int, span);
                Ty::Var(var)
            }

            // x  =>  [[x-occurrence]] = [[x-decl]]
            Expr::NameRef(_) => {
                let var = self.expr_var(expr);
                if let Some(resolution) = symbols.resolve(span) {
                    let decl_var = self.unifier.var_for_decl(resolution.decl());
                    self.push(Ty::Var(var), Ty::Var(decl_var), span);
                }
                Ty::Var(var)
            }

            // a (+ - * /) b  =>  [[a]] = int, [[b]] = int, [[expr]] = int
            // a (cmp) b      =>  [[a]] = [[b]], [[expr]] = int
            Expr::Binary(binary) => {
                let lhs_ty = match binary.lhs() {
                    Some(lhs) => self.visit_expr(&lhs),
                    None => return Ty::Var(self.expr_var(expr)),
                };
                let rhs_ty = match binary.rhs() {
                    Some(rhs) => self.visit_expr(&rhs),
                    None => return Ty::Var(self.expr_var(expr)),
                };
                let var = self.expr_var(expr);
                match binary.op().map(|t| t.kind()) {
                    Some(
                        SyntaxKind::PLUS
                        | SyntaxKind::MINUS
                        | SyntaxKind::STAR
                        | SyntaxKind::SLASH,
                    ) => {
                        self.push(lhs_ty, Ty::Int, span);
                        self.push(rhs_ty, Ty::Int, span);
                        self.push(Ty::Var(var), Ty::Int, span);
                    }
                    Some(
                        SyntaxKind::GT
                        | SyntaxKind::LT
                        | SyntaxKind::GT_EQ
                        | SyntaxKind::LT_EQ
                        | SyntaxKind::EQ_EQ
                        | SyntaxKind::NOT_EQ,
                    ) => {
                        self.push(lhs_ty, rhs_ty, span);
                        self.push(Ty::Var(var), Ty::Int, span);
                    }
                    _ => {}
                }
                Ty::Var(var)
            }

            // *e  =>  [[e]] = &[[expr]]        (dereference)
            // &x  =>  [[expr]] = &[[x]]        (address-of)
            Expr::Unary(unary) => {
                let operand_ty = match unary.operand() {
                    Some(operand) => self.visit_expr(&operand),
                    None => return Ty::Var(self.expr_var(expr)),
                };
                let var = self.expr_var(expr);
                match unary.op().map(|t| t.kind()) {
                    Some(SyntaxKind::STAR) => {
                        self.push(operand_ty, Ty::reference(Ty::Var(var)), span);
                    }
                    Some(SyntaxKind::AMP) => {
                        self.push(Ty::Var(var), Ty::reference(operand_ty), span);
                    }
                    _ => {}
                }
                Ty::Var(var)
            }

            // alloc e  =>  [[expr]] = &[[e]]
            Expr::Alloc(alloc) => {
                let operand_ty = match alloc.operand() {
                    Some(operand) => self.visit_expr(&operand),
                    None => return Ty::Var(self.expr_var(expr)),
                };
                let var = self.expr_var(expr);
                self.push(Ty::Var(var), Ty::reference(operand_ty), span);
                Ty::Var(var)
            }

            // input  =>  [[expr]] = int
            Expr::Input(_) => {
                let var = self.expr_var(expr);
                self.push(Ty::Var(var), Ty::Int, span);
                Ty::Var(var)
            }

            // g(a1, ..., an) with g a static function name:
            //     [[g-decl]] = ([[a1]], ..., [[an]]) -> [[expr]]
            // e(a1, ..., an) otherwise:
            //     [[e]] = ([[a1]], ..., [[an]]) -> [[expr]]
            Expr::Call(call) => {
                let args: Vec<Ty> = match call.arg_list() {
                    Some(list) => list.args().map(|arg| self.visit_expr(&arg)).collect(),
                    None => Vec::new(),
                };
                let var = self.expr_var(expr);
                let callee = call.callee();
                if let Some(Expr::NameRef(name_ref)) = &callee {
                    let occurrence = name_ref.span();
                    if let Some(Resolution::Function(decl)) = symbols.resolve(occurrence) {
                        let fn_var = self.unifier.var_for_decl(decl);
                        self.push(
                            Ty::Var(fn_var),
                            Ty::Fun(args, Box::new(Ty::Var(var))),
                            span,
                        );
                        return Ty::Var(var);
                    }
                }
                if let Some(callee) = callee {
                    let callee_ty = self.visit_expr(&callee);
                    self.push(callee_ty, Ty::Fun(args, Box::new(Ty::Var(var))), span);
                }
                Ty::Var(var)
            }

            // e.f  =>  [[e]] = { ..., f: [[expr]], ... } over the field
            // universe, with a fresh variable for every other field.
            Expr::FieldAccess(access) => {
                let base_ty = match access.base() {
                    Some(base) => self.visit_expr(&base),
                    None => return Ty::Var(self.expr_var(expr)),
                };
                let var = self.expr_var(expr);
                let field = access.field_name().unwrap_or_default();
                let fields: Vec<(String, Ty)> = symbols
                    .record_fields()
                    .iter()
                    .map(|name| {
                        if *name == field {
                            (name.clone(), Ty::Var(var))
                        } else {
                            (name.clone(), Ty::Var(self.unifier.fresh_var()))
                        }
                    })
                    .collect();
                self.push(base_ty, Ty::Record(fields), span);
                Ty::Var(var)
            }

            // {f1: e1, ...}  =>  [[expr]] = {f1: [[e1]], ...} over the
            // field universe, with absent markers for missing fields.
            Expr::Record(record) => {
                let mut present: Vec<(String, Ty)> = Vec::new();
                for field in record.fields() {
                    let Some(name) = field.name() else { continue };
                    let Some(value) = field.value() else { continue };
                    let ty = self.visit_expr(&value);
                    present.push((name, ty));
                }
                let var = self.expr_var(expr);
                let fields: Vec<(String, Ty)> = symbols
                    .record_fields()
                    .iter()
                    .map(|name| {
                        match present.iter().find(|(n, _)| n == name) {
                            Some((_, ty)) => (name.clone(), ty.clone()),
                            None => (name.clone(), Ty::Absent),
                        }
                    })
                    .collect();
                self.push(Ty::Var(var), Ty::Record(fields), span);
                Ty::Var(var)
            }

            // Grouping is transparent: no anchor of its own.
            Expr::Paren(paren) => match paren.inner() {
                Some(inner) => self.visit_expr(&inner),
                None => Ty::Var(self.expr_var(expr)),
            },
        }
    }

    /// The variable anchored at an expression node, labeled by its source
    /// form.
    fn expr_var(&mut self, expr: &Expr) -> TyVar {
        let label = expr.syntax().text().to_string();
        self.unifier.var_for_expr(&label, expr.span())
    }
}
