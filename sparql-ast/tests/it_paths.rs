//! Property path construction and compilation through the factory.

mod support;

use sparql_ast::ast::{RepeatKind, MAX_BOUND};
use sparql_ast::{AstError, AstQuery, CompileOptions, Expression, Oper, PathEvaluation, PathSpec};
use support::{query, query_with};

fn p(q: &mut AstQuery) -> Expression {
    q.create_qname("ex:knows").unwrap().into()
}

/// Attach `regex` to a triple and return its compiled path.
fn compile_path(q: &mut AstQuery, regex: Expression) -> PathSpec {
    let s = q.create_variable("s");
    let o = q.create_variable("o");
    let atom = q.create_path_atom(regex);
    let id = q.create_triple(s, atom, o).unwrap();
    q.arena().triple(id).unwrap().path.clone().unwrap()
}

#[test]
fn repetition_bounds() {
    let mut q = query();

    let knows = p(&mut q);
    let star = q.create_operator("*", knows).unwrap();
    let spec = compile_path(&mut q, star);
    assert_eq!((spec.bounds.min, spec.bounds.max), (0, MAX_BOUND));

    let knows = p(&mut q);
    let plus = q.create_operator("+", knows).unwrap();
    let spec = compile_path(&mut q, plus);
    assert_eq!((spec.bounds.min, spec.bounds.max), (1, MAX_BOUND));
    assert!(spec.bounds.is_plus());

    let knows = p(&mut q);
    let opt = q.create_operator("?", knows).unwrap();
    let spec = compile_path(&mut q, opt);
    assert_eq!(spec.bounds.kind, RepeatKind::ZeroOrOne);
    assert_eq!(spec.regex.as_term().unwrap().oper(), Oper::ZeroOrOne);
}

#[test]
fn counted_bounds() {
    let cases: [(Option<&str>, Option<&str>, u32, u32); 3] = [
        (Some("2"), Some("5"), 2, 5),
        (None, Some("5"), 0, 5),
        (Some("2"), None, 2, MAX_BOUND),
    ];
    for (min, max, lo, hi) in cases {
        let mut q = query();
        let knows = p(&mut q);
        let counted = q.create_bounded_operator(min, max, knows).unwrap();
        let spec = compile_path(&mut q, counted);
        assert_eq!((spec.bounds.min, spec.bounds.max), (lo, hi));
        assert!(spec.bounds.is_count());
    }
}

#[test]
fn malformed_bounds_fail_the_call() {
    let mut q = query();
    let knows = p(&mut q);
    let err = q
        .create_bounded_operator(Some("two"), None, knows.clone())
        .unwrap_err();
    assert!(matches!(err, AstError::InvalidPathBound { .. }));

    let err = q
        .create_bounded_operator(Some("5"), Some("2"), knows)
        .unwrap_err();
    assert!(matches!(err, AstError::InvertedPathBound { min: 5, max: 2 }));
}

#[test]
fn mode_string_follows_nesting() {
    let mut q = query();

    let knows = p(&mut q);
    let short = q.create_operator("short", knows).unwrap();
    let inv_short = q.create_operator("^", short).unwrap();
    assert_eq!(compile_path(&mut q, inv_short).mode, "is");

    let knows = p(&mut q);
    let inv = q.create_operator("^", knows).unwrap();
    let short_inv = q.create_operator("short", inv).unwrap();
    assert_eq!(compile_path(&mut q, short_inv).mode, "si");
}

#[test]
fn legacy_evaluation_keeps_inverse_in_mode_only() {
    let mut q = query_with(CompileOptions::default().with_path_evaluation(PathEvaluation::Legacy));
    let knows = p(&mut q);
    let star = q.create_operator("*", knows).unwrap();
    let inv = q.create_operator("^", star).unwrap();
    let spec = compile_path(&mut q, inv);
    assert_eq!(spec.mode, "i");
    assert!(spec.is_inverse());
    assert_eq!(spec.regex.as_term().unwrap().oper(), Oper::Star);
}

#[test]
fn sequence_and_alternative() {
    let mut q = query();
    let a = p(&mut q);
    let b = p(&mut q);
    let seq = q.create_path_binary("/", a.clone(), b.clone()).unwrap();
    let alt = q.create_path_binary("|", seq, b).unwrap();
    let spec = compile_path(&mut q, alt);
    let top = spec.regex.as_term().unwrap();
    assert_eq!(top.oper(), Oper::Alternative);
    assert_eq!(top.args()[0].as_term().unwrap().oper(), Oper::Sequence);

    assert!(matches!(
        q.create_path_binary("&", a.clone(), a),
        Err(AstError::UnknownPathOperator { .. })
    ));
}

#[test]
fn path_triples_are_registered_separately() {
    let mut q = query();
    let knows = p(&mut q);
    let star = q.create_operator("*", knows).unwrap();
    compile_path(&mut q, star);
    support::var_triple(&mut q, "s", "ex:name", "n");

    assert_eq!(q.triples().len(), 2);
    assert_eq!(q.paths().len(), 1);
    let preds: Vec<&str> = q.predicates().iter().map(|c| c.label()).collect();
    assert_eq!(preds, vec!["http://example.org/name"]);
}

#[test]
fn path_variable_is_not_a_binding() {
    let mut q = query();
    let knows = p(&mut q);
    let plus = q.create_operator("+", knows).unwrap();
    let s = q.create_variable("s");
    let o = q.create_variable("o");
    let atom = q.create_path_atom(plus);
    let t = q.create_triple(s, atom, o).unwrap();
    let body = q.create_bgp(vec![t]);
    q.set_body(body).unwrap();
    q.set_select_all(true);
    assert!(support::compile_and_validate(&mut q));
    let names: Vec<&str> = q.select_vars().iter().map(|v| v.name()).collect();
    assert_eq!(names, vec!["s", "o"]);
}
