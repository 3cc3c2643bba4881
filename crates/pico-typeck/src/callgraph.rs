//! Call-graph analysis: recursion detection and solving order.
//!
//! Builds the static call graph (an edge per callsite whose callee is a
//! bare function name not shadowed by a local), condenses it into
//! strongly connected groups, and answers the three questions the
//! inference driver asks:
//!
//! - is a function recursive? (member of an SCC with more than one
//!   function, or with a self-edge)
//! - which functions form the *recursive closure*? (recursive groups plus
//!   everything reachable from them -- the set that must be solved
//!   monomorphically, because polymorphic duplication cannot generalize
//!   over a recursive call)
//! - what is the inverse topological order of the condensation?
//!   (callees before callers, so every callee's type is pinned before its
//!   callsites are instantiated)
//!
//! Calls through locals holding a function value do not produce edges, so
//! `rec() { var x; x = rec; return x(); }` is not classified recursive.
//! This mirrors the behavior of the checker this module models.

use std::collections::VecDeque;

use rustc_hash::{FxHashMap, FxHashSet};

use pico_parser::ast::expr::Expr;
use pico_parser::ast::item::{FnDef, SourceFile};
use pico_parser::ast::stmt::Stmt;

use crate::symbols::SymbolTable;

/// A condensed group of mutually reachable functions (one strongly
/// connected component of the call graph).
#[derive(Clone, Debug)]
pub struct FunctionGroup {
    /// Member function indices, ascending.
    pub functions: Vec<usize>,
    /// Whether the group is recursive: more than one member, or a
    /// self-edge on its single member.
    pub recursive: bool,
    /// Callee groups (excluding this group), sorted.
    calls: Vec<usize>,
    /// Caller groups (excluding this group), sorted.
    callers: Vec<usize>,
}

impl FunctionGroup {
    /// Groups this group calls.
    pub fn calls(&self) -> &[usize] {
        &self.calls
    }
}

/// The call-graph analyzer. Built once per program; queryable repeatedly.
pub struct CallGraphAnalyzer {
    names: Vec<String>,
    edges: Vec<Vec<usize>>,
    groups: Vec<FunctionGroup>,
    group_of: Vec<usize>,
}

impl CallGraphAnalyzer {
    /// Build the call graph for a program.
    pub fn build(file: &SourceFile, symbols: &SymbolTable) -> CallGraphAnalyzer {
        let names: Vec<String> = symbols
            .functions()
            .iter()
            .map(|f| f.decl.name.clone())
            .collect();
        let fn_index: FxHashMap<&str, usize> = names
            .iter()
            .enumerate()
            .map(|(i, n)| (n.as_str(), i))
            .collect();

        // Function-level call edges.
        let mut edges: Vec<Vec<usize>> = vec![Vec::new(); names.len()];
        for fn_def in file.fn_defs() {
            let Some(fn_name) = fn_def.name().and_then(|n| n.text()) else {
                continue;
            };
            let Some(&caller) = fn_index.get(fn_name.as_str()) else {
                continue;
            };
            // Names bound by the function itself shadow top-level
            // functions at callsites.
            let function = &symbols.functions()[caller];
            let locals: FxHashSet<&str> = function
                .params
                .iter()
                .chain(function.locals.iter())
                .map(|d| d.name.as_str())
                .collect();

            let mut callees = Vec::new();
            collect_calls(&fn_def, &mut |callee: &str| {
                if !locals.contains(callee) {
                    if let Some(&target) = fn_index.get(callee) {
                        callees.push(target);
                    }
                }
            });
            callees.sort_unstable();
            callees.dedup();
            edges[caller] = callees;
        }

        let (groups, group_of) = condense(&edges);

        CallGraphAnalyzer {
            names,
            edges,
            groups,
            group_of,
        }
    }

    // ── Queries ────────────────────────────────────────────────────────

    /// The index of a function, by name.
    pub fn function_index(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// The name of a function, by index.
    pub fn function_name(&self, idx: usize) -> &str {
        &self.names[idx]
    }

    /// Whether a function sits in a recursive group.
    pub fn is_recursive(&self, function: usize) -> bool {
        self.groups[self.group_of[function]].recursive
    }

    /// All condensed groups.
    pub fn groups(&self) -> &[FunctionGroup] {
        &self.groups
    }

    /// Every function in a recursive group, plus every function reachable
    /// from one along call edges. This is the set the driver solves
    /// monomorphically.
    pub fn recursive_closure(&self) -> FxHashSet<usize> {
        let mut group_seen: Vec<bool> = vec![false; self.groups.len()];
        let mut stack: Vec<usize> = (0..self.groups.len())
            .filter(|&g| self.groups[g].recursive)
            .collect();
        for &g in &stack {
            group_seen[g] = true;
        }
        while let Some(g) = stack.pop() {
            for &callee in &self.groups[g].calls {
                if !group_seen[callee] {
                    group_seen[callee] = true;
                    stack.push(callee);
                }
            }
        }

        let mut closure = FxHashSet::default();
        for (g, seen) in group_seen.iter().enumerate() {
            if *seen {
                closure.extend(self.groups[g].functions.iter().copied());
            }
        }
        closure
    }

    /// The groups in inverse topological order: every callee group before
    /// all of its callers. Sibling order is deterministic but otherwise
    /// unspecified.
    ///
    /// Runs Kahn's algorithm on a private caller-count vector, so the
    /// analyzer can be queried again afterwards.
    pub fn inverse_topological_order(&self) -> Vec<&FunctionGroup> {
        let mut caller_count: Vec<usize> =
            self.groups.iter().map(|g| g.callers.len()).collect();
        let mut queue: VecDeque<usize> = (0..self.groups.len())
            .filter(|&g| caller_count[g] == 0)
            .collect();

        let mut order = Vec::with_capacity(self.groups.len());
        while let Some(g) = queue.pop_front() {
            order.push(g);
            for &callee in &self.groups[g].calls {
                caller_count[callee] -= 1;
                if caller_count[callee] == 0 {
                    queue.push_back(callee);
                }
            }
        }

        // Callers were visited first; reverse to put callees first.
        order.reverse();
        order.into_iter().map(|g| &self.groups[g]).collect()
    }

    /// Raw call edges, for tests.
    pub fn edges(&self, function: usize) -> &[usize] {
        &self.edges[function]
    }
}

// ── Edge collection ────────────────────────────────────────────────────

/// Invoke `on_call` with the callee name of every call expression whose
/// callee is a bare identifier.
fn collect_calls(fn_def: &FnDef, on_call: &mut dyn FnMut(&str)) {
    let Some(body) = fn_def.body() else { return };
    for stmt in body.stmts() {
        walk_stmt(&stmt, on_call);
    }
}

fn walk_stmt(stmt: &Stmt, on_call: &mut dyn FnMut(&str)) {
    match stmt {
        Stmt::VarDecl(_) => {}
        Stmt::Assign(assign) => {
            if let Some(lhs) = assign.lhs() {
                walk_expr(&lhs, on_call);
            }
            if let Some(rhs) = assign.rhs() {
                walk_expr(&rhs, on_call);
            }
        }
        Stmt::Output(output) => {
            if let Some(expr) = output.expr() {
                walk_expr(&expr, on_call);
            }
        }
        Stmt::Return(ret) => {
            if let Some(expr) = ret.expr() {
                walk_expr(&expr, on_call);
            }
        }
        Stmt::If(if_stmt) => {
            if let Some(cond) = if_stmt.condition() {
                walk_expr(&cond, on_call);
            }
            if let Some(then) = if_stmt.then_branch() {
                walk_stmt(&then, on_call);
            }
            if let Some(alt) = if_stmt.else_branch() {
                walk_stmt(&alt, on_call);
            }
        }
        Stmt::While(while_stmt) => {
            if let Some(cond) = while_stmt.condition() {
                walk_expr(&cond, on_call);
            }
            if let Some(body) = while_stmt.body() {
                walk_stmt(&body, on_call);
            }
        }
        Stmt::Block(block) => {
            for inner in block.stmts() {
                walk_stmt(&inner, on_call);
            }
        }
    }
}

fn walk_expr(expr: &Expr, on_call: &mut dyn FnMut(&str)) {
    match expr {
        Expr::Literal(_) | Expr::Input(_) | Expr::NameRef(_) => {}
        Expr::Binary(binary) => {
            if let Some(lhs) = binary.lhs() {
                walk_expr(&lhs, on_call);
            }
            if let Some(rhs) = binary.rhs() {
                walk_expr(&rhs, on_call);
            }
        }
        Expr::Unary(unary) => {
            if let Some(operand) = unary.operand() {
                walk_expr(&operand, on_call);
            }
        }
        Expr::Alloc(alloc) => {
            if let Some(operand) = alloc.operand() {
                walk_expr(&operand, on_call);
            }
        }
        Expr::Call(call) => {
            match call.callee() {
                // A bare identifier callee is a candidate static call; it
                // is not walked as an expression.
                Some(Expr::NameRef(name_ref)) => {
                    if let Some(name) = name_ref.text() {
                        on_call(&name);
                    }
                }
                // Calls through arbitrary expressions produce no edge.
                Some(other) => walk_expr(&other, on_call),
                None => {}
            }
            if let Some(args) = call.arg_list() {
                for arg in args.args() {
                    walk_expr(&arg, on_call);
                }
            }
        }
        Expr::FieldAccess(access) => {
            if let Some(base) = access.base() {
                walk_expr(&base, on_call);
            }
        }
        Expr::Record(record) => {
            for field in record.fields() {
                if let Some(value) = field.value() {
                    walk_expr(&value, on_call);
                }
            }
        }
        Expr::Paren(paren) => {
            if let Some(inner) = paren.inner() {
                walk_expr(&inner, on_call);
            }
        }
    }
}

// ── Condensation (Kosaraju) ────────────────────────────────────────────

/// Condense a directed graph into strongly connected components using
/// Kosaraju's two-pass DFS (iterative). Returns the groups and a map from
/// node to group index.
fn condense(edges: &[Vec<usize>]) -> (Vec<FunctionGroup>, Vec<usize>) {
    let n = edges.len();

    // Pass 1: DFS post-order on the graph.
    let mut visited = vec![false; n];
    let mut postorder = Vec::with_capacity(n);
    for start in 0..n {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        let mut stack: Vec<(usize, usize)> = vec![(start, 0)];
        while !stack.is_empty() {
            let top = stack.len() - 1;
            let (node, child) = stack[top];
            if child < edges[node].len() {
                stack[top].1 += 1;
                let next = edges[node][child];
                if !visited[next] {
                    visited[next] = true;
                    stack.push((next, 0));
                }
            } else {
                postorder.push(node);
                stack.pop();
            }
        }
    }

    // Pass 2: DFS on the transpose, in reverse post-order.
    let mut reverse_edges: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (from, outs) in edges.iter().enumerate() {
        for &to in outs {
            reverse_edges[to].push(from);
        }
    }

    let mut group_of = vec![usize::MAX; n];
    let mut members: Vec<Vec<usize>> = Vec::new();
    for &start in postorder.iter().rev() {
        if group_of[start] != usize::MAX {
            continue;
        }
        let group = members.len();
        members.push(Vec::new());
        group_of[start] = group;
        let mut stack = vec![start];
        while let Some(node) = stack.pop() {
            members[group].push(node);
            for &prev in &reverse_edges[node] {
                if group_of[prev] == usize::MAX {
                    group_of[prev] = group;
                    stack.push(prev);
                }
            }
        }
    }

    // Group-level adjacency and recursion flags.
    let mut groups: Vec<FunctionGroup> = members
        .into_iter()
        .map(|mut functions| {
            functions.sort_unstable();
            FunctionGroup {
                functions,
                recursive: false,
                calls: Vec::new(),
                callers: Vec::new(),
            }
        })
        .collect();

    for (from, outs) in edges.iter().enumerate() {
        let from_group = group_of[from];
        for &to in outs {
            let to_group = group_of[to];
            if from_group == to_group {
                // An intra-group edge is a (mutual) recursion witness.
                groups[from_group].recursive = true;
            } else {
                groups[from_group].calls.push(to_group);
                groups[to_group].callers.push(from_group);
            }
        }
    }
    for group in &mut groups {
        group.recursive |= group.functions.len() > 1;
        group.calls.sort_unstable();
        group.calls.dedup();
        group.callers.sort_unstable();
        group.callers.dedup();
    }

    (groups, group_of)
}
