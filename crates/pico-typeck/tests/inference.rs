//! End-to-end inference tests: whole programs through the lexer, parser,
//! symbol table, and inference pipeline.

use pico_typeck::{CheckError, TypeError, TypeInference};

// ── Helpers ────────────────────────────────────────────────────────────

/// Parse Pico source and run the type checker, expecting success.
fn check_source(src: &str) -> TypeInference {
    let parse = pico_parser::parse(src);
    assert!(parse.ok(), "parse errors: {:?}", parse.errors());
    match pico_typeck::check(&parse) {
        Ok(infer) => infer,
        Err(err) => panic!("expected inference to succeed, got: {err}"),
    }
}

/// Parse Pico source and run the type checker, expecting failure.
fn check_fails(src: &str) -> CheckError {
    let parse = pico_parser::parse(src);
    assert!(parse.ok(), "parse errors: {:?}", parse.errors());
    match pico_typeck::check(&parse) {
        Ok(_) => panic!("expected inference to fail"),
        Err(err) => err,
    }
}

/// The rendered type of a function.
fn fn_type(infer: &mut TypeInference, name: &str) -> String {
    let decl = infer
        .symbols()
        .function(name)
        .unwrap_or_else(|| panic!("no function `{name}`"))
        .decl
        .clone();
    infer.type_display(&decl)
}

/// The rendered type of a parameter or local.
fn local_type(infer: &mut TypeInference, fn_name: &str, name: &str) -> String {
    let decl = infer
        .symbols()
        .local(fn_name, name)
        .unwrap_or_else(|| panic!("no local `{name}` in `{fn_name}`"))
        .clone();
    infer.type_display(&decl)
}

// ── Basics ─────────────────────────────────────────────────────────────

#[test]
fn constant_function() {
    let mut infer = check_source("f() { return 0; }");
    assert_eq!(fn_type(&mut infer, "f"), "() -> int");
}

#[test]
fn arithmetic_pins_parameters_to_int() {
    let mut infer = check_source("f(a, b) { return a + b * 2; }");
    assert_eq!(fn_type(&mut infer, "f"), "(int, int) -> int");
    assert_eq!(local_type(&mut infer, "f", "a"), "int");
}

#[test]
fn comparison_equates_operands_and_yields_int() {
    let mut infer = check_source("f(p, q) { var r; r = p == q; return r; }");
    assert_eq!(local_type(&mut infer, "f", "r"), "int");
    // p and q are forced equal but stay free.
    let p = local_type(&mut infer, "f", "p");
    let q = local_type(&mut infer, "f", "q");
    assert_eq!(p, q);
    assert!(p.starts_with("\u{03b1}<"), "got {p}");
}

#[test]
fn input_output_and_while_force_int() {
    let mut infer = check_source(
        "f(n) { var sum; sum = 0; while (n > 0) { sum = sum + input; n = n - 1; } output sum; return sum; }",
    );
    assert_eq!(fn_type(&mut infer, "f"), "(int) -> int");
    assert_eq!(local_type(&mut infer, "f", "sum"), "int");
}

#[test]
fn alloc_and_deref_are_inverse() {
    let mut infer = check_source("f() { var p; p = alloc 7; return *p; }");
    assert_eq!(local_type(&mut infer, "f", "p"), "&int");
    assert_eq!(fn_type(&mut infer, "f"), "() -> int");
}

#[test]
fn address_of_builds_a_pointer() {
    let mut infer = check_source("f() { var x, p; x = 3; p = &x; return *p; }");
    assert_eq!(local_type(&mut infer, "f", "p"), "&int");
    assert_eq!(fn_type(&mut infer, "f"), "() -> int");
}

#[test]
fn record_literal_and_field_access() {
    let mut infer = check_source("f() { var r; r = {x: 1, y: 2}; return r.x; }");
    assert_eq!(local_type(&mut infer, "f", "r"), "{x:int,y:int}");
    assert_eq!(fn_type(&mut infer, "f"), "() -> int");
}

#[test]
fn assignment_through_deref() {
    let mut infer = check_source("f() { var p; p = alloc 0; *p = 9; return *p; }");
    assert_eq!(local_type(&mut infer, "f", "p"), "&int");
}

#[test]
fn unused_local_stays_free() {
    let mut infer = check_source("f() { var x; return 0; }");
    assert_eq!(local_type(&mut infer, "f", "x"), "\u{03b1}<x>");
}

// ── Recursion scenarios ────────────────────────────────────────────────

#[test]
fn pure_recursion() {
    let mut infer = check_source("rec() { return rec(); } nonRec() { return 0; }");
    assert!(infer.is_recursive("rec"));
    assert!(!infer.is_recursive("nonRec"));
    assert_eq!(fn_type(&mut infer, "nonRec"), "() -> int");
}

#[test]
fn mutual_recursion() {
    let infer = check_source("rec1() { return rec2(); } rec2() { return rec1(); }");
    assert!(infer.is_recursive("rec1"));
    assert!(infer.is_recursive("rec2"));
}

#[test]
fn recursive_countdown_is_int() {
    let mut infer =
        check_source("rec(x) { if (x != 0) { x = rec(x - 1); } return x; }");
    assert!(infer.is_recursive("rec"));
    assert_eq!(fn_type(&mut infer, "rec"), "(int) -> int");
}

#[test]
fn call_chain_infers_every_function() {
    let mut infer =
        check_source("c() { return 0; } b() { return c(); } a() { return b(); }");
    for name in ["a", "b", "c"] {
        assert_eq!(fn_type(&mut infer, name), "() -> int");
        assert!(!infer.is_recursive(name));
    }
}

#[test]
fn recursive_group_mixed_with_base_case() {
    let mut infer = check_source(
        "base() { return 0; } r1(y) { var x; if (y == 0) { x = base(); } else { x = r1(x - 1); } return x; }",
    );
    assert_eq!(fn_type(&mut infer, "base"), "() -> int");
    assert_eq!(fn_type(&mut infer, "r1"), "(int) -> int");
}

// ── Polymorphic recursion is unsupported ───────────────────────────────

#[test]
fn polymorphic_recursion_is_rejected() {
    let err = check_fails(
        "swapper(a, b) { var p; p = swapper(b, a); return a; } x() { return swapper(1, alloc 3); }",
    );
    assert!(matches!(
        err,
        CheckError::Type(TypeError::HeadMismatch { .. })
    ));
}

// ── Flow polymorphism is rejected ──────────────────────────────────────

#[test]
fn flow_polymorphism_is_rejected() {
    let err = check_fails(
        "poly(x) { var y; if (y == 0) { x = 0; } else { x = {d: 1}; } return x; }",
    );
    assert!(matches!(
        err,
        CheckError::Type(TypeError::HeadMismatch { .. })
    ));
}

// ── Recursive pointer types ────────────────────────────────────────────

#[test]
fn recursive_pointer_type_reifies() {
    let mut infer = check_source(
        "f(p) { return *p; } g() { var q; q = alloc q; return f(q); }",
    );
    // q = alloc q forces q = &q; reification must terminate and be
    // stable.
    let first = local_type(&mut infer, "g", "q");
    let second = local_type(&mut infer, "g", "q");
    assert_eq!(first, second);
    assert!(first.starts_with('&'), "got {first}");
}

#[test]
fn self_referential_pointer_directly() {
    let mut infer = check_source("f() { var p; p = alloc p; return 0; }");
    let ty = local_type(&mut infer, "f", "p");
    assert!(ty.starts_with('&'), "got {ty}");
}

// ── Known limitations (preserved behavior) ─────────────────────────────

#[test]
fn call_through_local_is_not_recursion() {
    let infer = check_source("rec() { var x; x = rec; return x(); }");
    assert!(!infer.is_recursive("rec"));
}

#[test]
fn function_valued_parameter_stays_free_when_unused() {
    let mut infer = check_source(
        "pick(g) { return 1; } inc(x) { return x + 1; } main() { return pick(inc); }",
    );
    assert_eq!(fn_type(&mut infer, "pick"), "(\u{03b1}<g>) -> int");
    assert_eq!(local_type(&mut infer, "pick", "g"), "\u{03b1}<g>");
}

// ── Result stability & reporting ───────────────────────────────────────

#[test]
fn inferred_types_are_stable() {
    let mut infer = check_source("id(a) { return a; } f() { return id(7); }");
    let decl = infer.symbols().function("id").unwrap().decl.clone();
    let first = infer.get_inferred_type(&decl);
    let second = infer.get_inferred_type(&decl);
    assert_eq!(first, second);
}

#[test]
fn print_lists_functions_and_locals() {
    let mut infer = check_source("f() { var x; x = 1; return x; }");
    let mut out = String::new();
    infer.print(&mut out).unwrap();
    assert!(out.contains("functions: {"), "got:\n{out}");
    assert!(out.contains("f: () -> int"), "got:\n{out}");
    assert!(out.contains("locals for f: {"), "got:\n{out}");
    assert!(out.contains("x: int"), "got:\n{out}");
}

#[test]
fn summary_reports_recursion_and_types() {
    let mut infer = check_source("rec() { return rec(); } f() { return 1; }");
    let summary = infer.summary();
    assert_eq!(summary.functions.len(), 2);
    let rec = summary
        .functions
        .iter()
        .find(|f| f.name == "rec")
        .expect("rec entry");
    assert!(rec.recursive);
    let f = summary.functions.iter().find(|f| f.name == "f").unwrap();
    assert!(!f.recursive);
    assert_eq!(f.ty, "() -> int");
}

// ── Symbol errors ──────────────────────────────────────────────────────

#[test]
fn unknown_name_is_a_symbol_error() {
    let err = check_fails("f() { return y; }");
    assert!(matches!(err, CheckError::Symbol(_)));
}

#[test]
fn duplicate_function_is_a_symbol_error() {
    let err = check_fails("f() { return 0; } f() { return 1; }");
    assert!(matches!(err, CheckError::Symbol(_)));
}

#[test]
fn type_error_constraints_are_observable() {
    // The unifier records every constraint it saw, even for programs that
    // fail; the driver surfaces only the error.
    let err = check_fails("f() { var x; x = 1; x = alloc 2; return x; }");
    let CheckError::Type(type_err) = err else {
        panic!("expected type error");
    };
    assert!(type_err.to_string().contains("cannot unify"));
}
