//! Let-polymorphism tests: per-callsite instantiation of non-recursive
//! callees, and the monomorphic treatment of recursive ones.

use pico_typeck::TypeInference;

fn check_source(src: &str) -> TypeInference {
    let parse = pico_parser::parse(src);
    assert!(parse.ok(), "parse errors: {:?}", parse.errors());
    match pico_typeck::check(&parse) {
        Ok(infer) => infer,
        Err(err) => panic!("expected inference to succeed, got: {err}"),
    }
}

fn fn_type(infer: &mut TypeInference, name: &str) -> String {
    let decl = infer.symbols().function(name).expect("function").decl.clone();
    infer.type_display(&decl)
}

fn local_type(infer: &mut TypeInference, fn_name: &str, name: &str) -> String {
    let decl = infer
        .symbols()
        .local(fn_name, name)
        .expect("local")
        .clone();
    infer.type_display(&decl)
}

#[test]
fn identity_scheme_stays_general() {
    let mut infer = check_source("id(a) { return a; }");
    assert_eq!(fn_type(&mut infer, "id"), "(\u{03b1}<a>) -> \u{03b1}<a>");
}

#[test]
fn identity_applied_at_two_types() {
    // The classic: id used at int and at a record. Monomorphic treatment
    // would force int = {f:int}.
    let mut infer = check_source(
        "id(a) { return a; } f2() { var x, z; x = id(0); z = {f: 1}; z = id(z); return 0; }",
    );
    assert_eq!(fn_type(&mut infer, "id"), "(\u{03b1}<a>) -> \u{03b1}<a>");
    assert_eq!(local_type(&mut infer, "f2", "x"), "int");
    assert_eq!(local_type(&mut infer, "f2", "z"), "{f:int}");
    assert_eq!(fn_type(&mut infer, "f2"), "() -> int");
}

#[test]
fn instantiation_does_not_leak_into_the_scheme() {
    // Using id at int in one caller must not pin the scheme for another.
    let mut infer = check_source(
        "id(a) { return a; } useInt() { return id(1); } usePtr() { var p; p = id(alloc 2); return 0; }",
    );
    assert_eq!(fn_type(&mut infer, "id"), "(\u{03b1}<a>) -> \u{03b1}<a>");
    assert_eq!(fn_type(&mut infer, "useInt"), "() -> int");
    assert_eq!(local_type(&mut infer, "usePtr", "p"), "&int");
}

#[test]
fn recursive_identity_is_monomorphic() {
    // A self-call keeps the function in the recursive closure: its
    // callsites share one copy, so the second parameter pins to int while
    // the first stays the (single) free variable.
    let mut infer =
        check_source("id(a, x) { if (x != 0) { a = id(a, x - 1); } return a; }");
    assert!(infer.is_recursive("id"));
    assert_eq!(
        fn_type(&mut infer, "id"),
        "(\u{03b1}<a>, int) -> \u{03b1}<a>"
    );
}

#[test]
fn callee_of_a_recursive_caller_is_monomorphic() {
    // id is reachable from the recursive group, so it joins the closure
    // and its single copy gets pinned by rec's callsite.
    let mut infer = check_source(
        "id(a) { return a; } rec(x) { x = id(x); if (x != 0) { x = rec(x - 1); } return x; }",
    );
    assert!(!infer.is_recursive("id"));
    assert_eq!(fn_type(&mut infer, "id"), "(int) -> int");
    assert_eq!(fn_type(&mut infer, "rec"), "(int) -> int");
}

#[test]
fn recursive_callee_is_not_instantiated() {
    // ret is recursive, so id's call to it unifies against the original
    // monomorphic type; id itself still generalizes.
    let mut infer = check_source(
        "ret(n) { if (n == 0) { n = ret(n - 1); } return n; } id(a) { var b; b = ret(1); return a; } f2() { var x, z; x = id(0); z = {f: 1}; z = id(z); return 0; }",
    );
    assert_eq!(fn_type(&mut infer, "ret"), "(int) -> int");
    assert_eq!(fn_type(&mut infer, "id"), "(\u{03b1}<a>) -> \u{03b1}<a>");
    assert_eq!(local_type(&mut infer, "f2", "x"), "int");
    assert_eq!(local_type(&mut infer, "f2", "z"), "{f:int}");
}

#[test]
fn shared_helper_used_at_two_record_shapes() {
    // Both callers pass records with different (disjointly absent) fields;
    // copying keeps them apart.
    let mut infer = check_source(
        "id(a) { return a; } f() { var u; u = id({x: 1}); return 0; } g() { var v; v = id({y: 2}); return 0; }",
    );
    assert_eq!(local_type(&mut infer, "f", "u"), "{x:int,y:\u{25c7}}");
    assert_eq!(local_type(&mut infer, "g", "v"), "{x:\u{25c7},y:int}");
}

#[test]
fn chain_of_polymorphic_calls() {
    // wrap is polymorphic over its argument; both uses go through two
    // levels of instantiation.
    let mut infer = check_source(
        "id(a) { return a; } twice(b) { return id(id(b)); } f() { var n, r; n = twice(3); r = twice(alloc 4); return n; }",
    );
    assert_eq!(fn_type(&mut infer, "twice"), "(\u{03b1}<b>) -> \u{03b1}<b>");
    assert_eq!(local_type(&mut infer, "f", "n"), "int");
    assert_eq!(local_type(&mut infer, "f", "r"), "&int");
}

#[test]
fn constraint_log_survives_solving() {
    let mut infer = check_source("id(a) { return a; } f() { return id(0); }");
    let constraints = infer.unifier_mut().constraints();
    assert!(!constraints.is_empty());
    // Every recorded constraint stringifies as an equation.
    for c in constraints {
        let rendered = c.to_string();
        assert!(
            rendered.split_once(" = ").is_some(),
            "not an equation: {rendered}"
        );
    }
}
