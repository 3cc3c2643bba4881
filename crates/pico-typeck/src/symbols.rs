//! Symbol resolution for Pico programs.
//!
//! Builds the table the inference core consumes: one entry per function
//! with its parameter and local declarations, a map from every name
//! occurrence to the declaration it denotes, and the program-wide record
//! field universe. Declarations are identified by the span of their
//! defining `NAME` node -- the stable identity that anchors type
//! variables.

use rustc_hash::FxHashMap;

use pico_common::span::Span;
use pico_parser::ast::expr::Expr;
use pico_parser::ast::item::{FnDef, Name, SourceFile};
use pico_parser::ast::stmt::Stmt;
use pico_parser::ast::AstNode;

use crate::error::SymbolError;

/// A declaration: its name plus the span of the defining `NAME` node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct DeclInfo {
    pub name: String,
    pub span: Span,
}

impl DeclInfo {
    fn from_name(name: &Name) -> Self {
        DeclInfo {
            name: name.text().unwrap_or_default(),
            span: name.span(),
        }
    }
}

/// What a name occurrence refers to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// A parameter or local of the enclosing function.
    Local(DeclInfo),
    /// A top-level function.
    Function(DeclInfo),
}

impl Resolution {
    /// The declaration this occurrence denotes.
    pub fn decl(&self) -> &DeclInfo {
        match self {
            Resolution::Local(decl) | Resolution::Function(decl) => decl,
        }
    }
}

/// Per-function symbol information.
#[derive(Clone, Debug)]
pub struct FunctionSymbols {
    /// The function's own declaration.
    pub decl: DeclInfo,
    /// Parameter declarations, in order.
    pub params: Vec<DeclInfo>,
    /// `var` declarations, in order of appearance. Locals are
    /// function-scoped regardless of where the declaration sits in the
    /// body.
    pub locals: Vec<DeclInfo>,
}

/// Resolved program symbols.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    functions: Vec<FunctionSymbols>,
    fn_index: FxHashMap<String, usize>,
    resolutions: FxHashMap<Span, Resolution>,
    record_fields: Vec<String>,
}

impl SymbolTable {
    /// Build the symbol table for a parsed program.
    ///
    /// Fails on duplicate definitions and on name occurrences that resolve
    /// to neither a local of the enclosing function nor a top-level
    /// function.
    pub fn build(file: &SourceFile) -> Result<SymbolTable, SymbolError> {
        let mut table = SymbolTable::default();

        // First pass: register every function so bodies can call forward.
        for fn_def in file.fn_defs() {
            let Some(name) = fn_def.name() else { continue };
            let decl = DeclInfo::from_name(&name);
            if table.fn_index.contains_key(&decl.name) {
                return Err(SymbolError::DuplicateFunction {
                    name: decl.name,
                    span: decl.span,
                });
            }
            table.fn_index.insert(decl.name.clone(), table.functions.len());
            table.functions.push(FunctionSymbols {
                decl,
                params: Vec::new(),
                locals: Vec::new(),
            });
        }

        // Second pass: per-function scopes and occurrence resolution.
        for fn_def in file.fn_defs() {
            let Some(name) = fn_def.name() else { continue };
            let Some(fn_name) = name.text() else { continue };
            let Some(&idx) = table.fn_index.get(&fn_name) else {
                continue;
            };
            table.build_function(idx, &fn_def)?;
        }

        Ok(table)
    }

    fn build_function(&mut self, idx: usize, fn_def: &FnDef) -> Result<(), SymbolError> {
        let mut scope: FxHashMap<String, DeclInfo> = FxHashMap::default();

        if let Some(params) = fn_def.param_list() {
            for param in params.params() {
                let decl = DeclInfo::from_name(&param);
                if scope.contains_key(&decl.name) {
                    return Err(SymbolError::DuplicateLocal {
                        name: decl.name,
                        span: decl.span,
                    });
                }
                scope.insert(decl.name.clone(), decl.clone());
                self.functions[idx].params.push(decl);
            }
        }

        // Collect `var` declarations first: locals are function-scoped.
        let Some(body) = fn_def.body() else {
            return Ok(());
        };
        for stmt in body.stmts() {
            self.collect_locals(idx, &stmt, &mut scope)?;
        }

        // Resolve every name occurrence in the body.
        for stmt in body.stmts() {
            self.resolve_stmt(&stmt, &scope)?;
        }

        Ok(())
    }

    fn collect_locals(
        &mut self,
        idx: usize,
        stmt: &Stmt,
        scope: &mut FxHashMap<String, DeclInfo>,
    ) -> Result<(), SymbolError> {
        match stmt {
            Stmt::VarDecl(decl_stmt) => {
                for name in decl_stmt.names() {
                    let decl = DeclInfo::from_name(&name);
                    if scope.contains_key(&decl.name) {
                        return Err(SymbolError::DuplicateLocal {
                            name: decl.name,
                            span: decl.span,
                        });
                    }
                    scope.insert(decl.name.clone(), decl.clone());
                    self.functions[idx].locals.push(decl);
                }
            }
            Stmt::If(if_stmt) => {
                if let Some(then) = if_stmt.then_branch() {
                    self.collect_locals(idx, &then, scope)?;
                }
                if let Some(alt) = if_stmt.else_branch() {
                    self.collect_locals(idx, &alt, scope)?;
                }
            }
            Stmt::While(while_stmt) => {
                if let Some(body) = while_stmt.body() {
                    self.collect_locals(idx, &body, scope)?;
                }
            }
            Stmt::Block(block) => {
                for inner in block.stmts() {
                    self.collect_locals(idx, &inner, scope)?;
                }
            }
            Stmt::Assign(_) | Stmt::Output(_) | Stmt::Return(_) => {}
        }
        Ok(())
    }

    fn resolve_stmt(
        &mut self,
        stmt: &Stmt,
        scope: &FxHashMap<String, DeclInfo>,
    ) -> Result<(), SymbolError> {
        match stmt {
            Stmt::VarDecl(_) => {}
            Stmt::Assign(assign) => {
                if let Some(lhs) = assign.lhs() {
                    self.resolve_expr(&lhs, scope)?;
                }
                if let Some(rhs) = assign.rhs() {
                    self.resolve_expr(&rhs, scope)?;
                }
            }
            Stmt::Output(output) => {
                if let Some(expr) = output.expr() {
                    self.resolve_expr(&expr, scope)?;
                }
            }
            Stmt::Return(ret) => {
                if let Some(expr) = ret.expr() {
                    self.resolve_expr(&expr, scope)?;
                }
            }
            Stmt::If(if_stmt) => {
                if let Some(cond) = if_stmt.condition() {
                    self.resolve_expr(&cond, scope)?;
                }
                if let Some(then) = if_stmt.then_branch() {
                    self.resolve_stmt(&then, scope)?;
                }
                if let Some(alt) = if_stmt.else_branch() {
                    self.resolve_stmt(&alt, scope)?;
                }
            }
            Stmt::While(while_stmt) => {
                if let Some(cond) = while_stmt.condition() {
                    self.resolve_expr(&cond, scope)?;
                }
                if let Some(body) = while_stmt.body() {
                    self.resolve_stmt(&body, scope)?;
                }
            }
            Stmt::Block(block) => {
                for inner in block.stmts() {
                    self.resolve_stmt(&inner, scope)?;
                }
            }
        }
        Ok(())
    }

    fn resolve_expr(
        &mut self,
        expr: &Expr,
        scope: &FxHashMap<String, DeclInfo>,
    ) -> Result<(), SymbolError> {
        match expr {
            Expr::Literal(_) | Expr::Input(_) => {}
            Expr::NameRef(name_ref) => {
                let span = name_ref.span();
                let Some(name) = name_ref.text() else {
                    return Ok(());
                };
                if let Some(decl) = scope.get(&name) {
                    self.resolutions.insert(span, Resolution::Local(decl.clone()));
                } else if let Some(&idx) = self.fn_index.get(&name) {
                    let decl = self.functions[idx].decl.clone();
                    self.resolutions.insert(span, Resolution::Function(decl));
                } else {
                    return Err(SymbolError::UnknownName { name, span });
                }
            }
            Expr::Binary(binary) => {
                if let Some(lhs) = binary.lhs() {
                    self.resolve_expr(&lhs, scope)?;
                }
                if let Some(rhs) = binary.rhs() {
                    self.resolve_expr(&rhs, scope)?;
                }
            }
            Expr::Unary(unary) => {
                if let Some(operand) = unary.operand() {
                    self.resolve_expr(&operand, scope)?;
                }
            }
            Expr::Alloc(alloc) => {
                if let Some(operand) = alloc.operand() {
                    self.resolve_expr(&operand, scope)?;
                }
            }
            Expr::Call(call) => {
                if let Some(callee) = call.callee() {
                    self.resolve_expr(&callee, scope)?;
                }
                if let Some(args) = call.arg_list() {
                    for arg in args.args() {
                        self.resolve_expr(&arg, scope)?;
                    }
                }
            }
            Expr::FieldAccess(access) => {
                if let Some(field) = access.field_name() {
                    self.add_record_field(field);
                }
                if let Some(base) = access.base() {
                    self.resolve_expr(&base, scope)?;
                }
            }
            Expr::Record(record) => {
                for field in record.fields() {
                    if let Some(name) = field.name() {
                        self.add_record_field(name);
                    }
                    if let Some(value) = field.value() {
                        self.resolve_expr(&value, scope)?;
                    }
                }
            }
            Expr::Paren(paren) => {
                if let Some(inner) = paren.inner() {
                    self.resolve_expr(&inner, scope)?;
                }
            }
        }
        Ok(())
    }

    fn add_record_field(&mut self, name: String) {
        if !self.record_fields.contains(&name) {
            self.record_fields.push(name);
        }
    }

    // ── Queries ────────────────────────────────────────────────────────

    /// All functions, in source order.
    pub fn functions(&self) -> &[FunctionSymbols] {
        &self.functions
    }

    /// Look up a function by name.
    pub fn function(&self, name: &str) -> Option<&FunctionSymbols> {
        self.fn_index.get(name).map(|&idx| &self.functions[idx])
    }

    /// Whether `name` names a top-level function.
    pub fn is_function(&self, name: &str) -> bool {
        self.fn_index.contains_key(name)
    }

    /// Resolve a name occurrence (keyed by the span of its `NAME_REF`
    /// node) to the declaration it denotes.
    pub fn resolve(&self, span: Span) -> Option<&Resolution> {
        self.resolutions.get(&span)
    }

    /// A parameter or local of `fn_name`, by name.
    pub fn local(&self, fn_name: &str, name: &str) -> Option<&DeclInfo> {
        let function = self.function(fn_name)?;
        function
            .params
            .iter()
            .chain(function.locals.iter())
            .find(|decl| decl.name == name)
    }

    /// The program-wide record field universe, in order of first
    /// appearance.
    pub fn record_fields(&self) -> &[String] {
        &self.record_fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(src: &str) -> SymbolTable {
        let parse = pico_parser::parse(src);
        assert!(parse.ok(), "parse errors: {:?}", parse.errors());
        SymbolTable::build(&parse.tree()).expect("symbols")
    }

    #[test]
    fn functions_params_and_locals() {
        let table = build("f(a, b) { var x, y; return a; } g() { return 0; }");
        assert_eq!(table.functions().len(), 2);
        let f = table.function("f").unwrap();
        let params: Vec<&str> = f.params.iter().map(|d| d.name.as_str()).collect();
        let locals: Vec<&str> = f.locals.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(params, vec!["a", "b"]);
        assert_eq!(locals, vec!["x", "y"]);
        assert!(table.is_function("g"));
        assert!(!table.is_function("x"));
    }

    #[test]
    fn locals_are_function_scoped() {
        // A var declared inside a nested block is visible to the whole
        // function, including statements before the declaration.
        let table = build("f() { x = 1; if (1 > 0) { var x; } return x; }");
        assert!(table.local("f", "x").is_some());
    }

    #[test]
    fn occurrences_resolve_to_their_declarations() {
        let src = "f(a) { return a; }";
        let table = build(src);
        let param = table.local("f", "a").unwrap().clone();
        // The `a` in `return a;` sits at byte 14.
        assert_eq!(&src[14..15], "a");
        let resolution = table.resolve(Span::new(14, 15)).expect("resolved");
        assert_eq!(resolution, &Resolution::Local(param));
    }

    #[test]
    fn function_names_resolve_when_not_shadowed() {
        let src = "g() { return 0; } f(g) { return g; } h() { return g; }";
        let table = build(src);
        // In f, `g` is the parameter; in h, the function.
        let f_occurrence = src.find("return g; } h").unwrap() + 7;
        let span = Span::new(f_occurrence as u32, f_occurrence as u32 + 1);
        assert!(matches!(table.resolve(span), Some(Resolution::Local(_))));
    }

    #[test]
    fn unknown_name_fails() {
        let parse = pico_parser::parse("f() { return missing; }");
        assert!(parse.ok());
        let err = SymbolTable::build(&parse.tree()).expect_err("unknown");
        assert!(matches!(err, SymbolError::UnknownName { .. }));
    }

    #[test]
    fn duplicate_function_fails() {
        let parse = pico_parser::parse("f() { return 0; } f() { return 1; }");
        assert!(parse.ok());
        let err = SymbolTable::build(&parse.tree()).expect_err("duplicate");
        assert!(matches!(err, SymbolError::DuplicateFunction { .. }));
    }

    #[test]
    fn duplicate_local_fails() {
        let parse = pico_parser::parse("f(x) { var x; return x; }");
        assert!(parse.ok());
        let err = SymbolTable::build(&parse.tree()).expect_err("duplicate");
        assert!(matches!(err, SymbolError::DuplicateLocal { .. }));
    }

    #[test]
    fn record_field_universe_in_first_appearance_order() {
        let table = build("f() { var r; r = {b: 1, a: 2}; return r.c; }");
        let fields: Vec<&str> = table.record_fields().iter().map(String::as_str).collect();
        assert_eq!(fields, vec!["b", "a", "c"]);
    }
}
