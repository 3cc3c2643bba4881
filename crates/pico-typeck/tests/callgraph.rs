//! Call-graph analysis tests: recursion detection, the recursive
//! closure, and the inverse topological traversal.

use pico_typeck::callgraph::CallGraphAnalyzer;
use pico_typeck::symbols::SymbolTable;
use rustc_hash::FxHashSet;

fn analyze(src: &str) -> (CallGraphAnalyzer, SymbolTable) {
    let parse = pico_parser::parse(src);
    assert!(parse.ok(), "parse errors: {:?}", parse.errors());
    let file = parse.tree();
    let symbols = SymbolTable::build(&file).expect("symbols");
    let analyzer = CallGraphAnalyzer::build(&file, &symbols);
    (analyzer, symbols)
}

fn closure_names(analyzer: &CallGraphAnalyzer) -> FxHashSet<String> {
    analyzer
        .recursive_closure()
        .into_iter()
        .map(|f| analyzer.function_name(f).to_string())
        .collect()
}

fn order_names(analyzer: &CallGraphAnalyzer) -> Vec<String> {
    analyzer
        .inverse_topological_order()
        .into_iter()
        .flat_map(|group| {
            group
                .functions
                .iter()
                .map(|&f| analyzer.function_name(f).to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}

#[test]
fn self_call_is_recursive() {
    let (analyzer, _) = analyze("rec() { return rec(); } nonRec() { return 0; }");
    let rec = analyzer.function_index("rec").unwrap();
    let non_rec = analyzer.function_index("nonRec").unwrap();
    assert!(analyzer.is_recursive(rec));
    assert!(!analyzer.is_recursive(non_rec));
    assert_eq!(closure_names(&analyzer), FxHashSet::from_iter(["rec".to_string()]));
}

#[test]
fn mutual_recursion_is_detected() {
    let (analyzer, _) = analyze("rec1() { return rec2(); } rec2() { return rec1(); }");
    let rec1 = analyzer.function_index("rec1").unwrap();
    let rec2 = analyzer.function_index("rec2").unwrap();
    assert!(analyzer.is_recursive(rec1));
    assert!(analyzer.is_recursive(rec2));
}

#[test]
fn recursion_through_an_if_branch() {
    let (analyzer, _) = analyze("rec(x) { if (x != 0) { x = rec(x - 1); } return x; }");
    let rec = analyzer.function_index("rec").unwrap();
    assert!(analyzer.is_recursive(rec));
}

#[test]
fn closure_includes_functions_reachable_from_a_cycle() {
    // b and c call each other; b also calls d. a calls into the cycle but
    // is not reachable *from* it.
    let (analyzer, _) = analyze(
        "d() { return 0; } b() { var x; x = d(); return c(); } c() { return b(); } a() { return b(); }",
    );
    let names = closure_names(&analyzer);
    assert!(names.contains("b"));
    assert!(names.contains("c"));
    assert!(names.contains("d"));
    assert!(!names.contains("a"));

    // d itself is not recursive, it is only called from a cycle.
    let d = analyzer.function_index("d").unwrap();
    assert!(!analyzer.is_recursive(d));
}

#[test]
fn callee_called_by_a_recursive_function_joins_the_closure() {
    let (analyzer, _) =
        analyze("nonRec() { return 0; } rec() { var x; x = nonRec(); return rec(); }");
    let names = closure_names(&analyzer);
    assert!(names.contains("rec"));
    assert!(names.contains("nonRec"));

    // Closure membership does not change the recursion verdict itself.
    let non_rec = analyzer.function_index("nonRec").unwrap();
    assert!(!analyzer.is_recursive(non_rec));
}

#[test]
fn inverse_topological_order_is_callees_first() {
    let (analyzer, _) =
        analyze("c() { return 0; } b() { return c(); } a() { return b(); }");
    assert_eq!(order_names(&analyzer), vec!["c", "b", "a"]);
}

#[test]
fn sibling_order_is_a_partial_order() {
    let (analyzer, _) = analyze(
        "d() { return 0; } c() { return d(); } b() { return d(); } a() { var x; x = b(); return c(); }",
    );
    let order = order_names(&analyzer);
    assert_eq!(order.len(), 4);
    assert_eq!(order.first().map(String::as_str), Some("d"));
    assert_eq!(order.last().map(String::as_str), Some("a"));
    assert!(order[1] == "b" || order[1] == "c");
    assert!(order[2] == "b" || order[2] == "c");
    assert_ne!(order[1], order[2]);
}

#[test]
fn analyzer_is_queryable_repeatedly() {
    // The traversal must not corrupt the analyzer's own state.
    let (analyzer, _) =
        analyze("c() { return 0; } b() { return c(); } a() { return b(); }");
    let first = order_names(&analyzer);
    let second = order_names(&analyzer);
    assert_eq!(first, second);
}

#[test]
fn classification_is_a_fixpoint_of_the_call_graph() {
    // Recursion verdicts depend only on the call graph, so rebuilding the
    // analyzer gives identical answers.
    let src = "f() { return g(); } g() { return f(); } h() { return 0; }";
    let (first, _) = analyze(src);
    let (second, _) = analyze(src);
    for name in ["f", "g", "h"] {
        let a = first.function_index(name).unwrap();
        let b = second.function_index(name).unwrap();
        assert_eq!(first.is_recursive(a), second.is_recursive(b));
    }
}

#[test]
fn call_through_a_local_produces_no_edge() {
    // Known limitation: a function value flowing through a local is not a
    // call edge, so this self-call is not classified recursive.
    let (analyzer, _) = analyze("rec() { var x; x = rec; return x(); }");
    let rec = analyzer.function_index("rec").unwrap();
    assert!(!analyzer.is_recursive(rec));
    assert!(analyzer.edges(rec).is_empty());
}

#[test]
fn locals_shadow_function_names_at_callsites() {
    let (analyzer, _) =
        analyze("g() { return 0; } f(g) { return g(); } h() { return g(); }");
    let f = analyzer.function_index("f").unwrap();
    let h = analyzer.function_index("h").unwrap();
    let g = analyzer.function_index("g").unwrap();
    // f's parameter g shadows the function; h's call resolves statically.
    assert!(analyzer.edges(f).is_empty());
    assert_eq!(analyzer.edges(h).to_vec(), vec![g]);
}

#[test]
fn calls_in_nested_expressions_are_edges() {
    let (analyzer, _) = analyze(
        "leaf() { return 1; } f() { var r; r = {a: leaf()}; return r.a + leaf(); }",
    );
    let f = analyzer.function_index("f").unwrap();
    let leaf = analyzer.function_index("leaf").unwrap();
    assert_eq!(analyzer.edges(f).to_vec(), vec![leaf]);
}
