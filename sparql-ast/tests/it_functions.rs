//! User-defined and external functions across the compile pipeline.

mod support;

use sparql_ast::{DiagCode, Expression, ExternalRegistry, Oper};
use support::{codes, compile_and_validate, query, var_triple};

/// `?s ex:p ?o . BIND(name(?o) AS ?r)`, returning the BIND's call.
fn query_calling(name: &str, argc: usize) -> sparql_ast::AstQuery {
    let mut q = query();
    let t = var_triple(&mut q, "s", "ex:p", "o");
    let args: Vec<Expression> = (0..argc).map(|_| q.create_variable("o").into()).collect();
    let call = q.create_function(name, args).unwrap();
    let bind = q.create_bind(call, q.create_variable("r"));
    let body = q.create_bgp(vec![t, bind]);
    q.set_body(body).unwrap();
    q.set_select_all(true);
    q
}

fn bind_call_oper(q: &sparql_ast::AstQuery) -> Oper {
    let body = q.arena().bgp(q.body().unwrap()).unwrap();
    match q.exp(body[1]).unwrap() {
        sparql_ast::Exp::Bind { expr, .. } => expr.as_term().unwrap().oper(),
        other => panic!("expected BIND, found {}", other.kind()),
    }
}

#[test]
fn forward_reference_resolves_at_compile() {
    let mut q = query_calling("ex:twice", 1);
    assert_eq!(bind_call_oper(&q), Oper::Undef);

    let x = q.create_variable("x");
    let body = q.create_variable("x").into();
    q.define_function("ex:twice", vec![x], body).unwrap();

    assert!(compile_and_validate(&mut q));
    assert_eq!(bind_call_oper(&q), Oper::Function);
    assert_eq!(q.undefined_symbols().count(), 0);
    let def = q.function("http://example.org/twice").unwrap();
    assert_eq!(def.params[0].scope(), sparql_ast::ast::VarScope::Local);
}

#[test]
fn backward_reference_resolves_immediately() {
    let mut q = query();
    let x = q.create_variable("x");
    let body = q.create_variable("x").into();
    q.define_function("ex:twice", vec![x], body).unwrap();

    let arg: Expression = q.create_variable("o").into();
    let call = q.create_function("ex:twice", vec![arg]).unwrap();
    assert_eq!(call.as_term().unwrap().oper(), Oper::Function);
}

#[test]
fn user_function_arity_is_checked() {
    let mut q = query_calling("ex:twice", 2);
    let x = q.create_variable("x");
    let body = q.create_variable("x").into();
    q.define_function("ex:twice", vec![x], body).unwrap();

    assert!(!compile_and_validate(&mut q));
    assert_eq!(codes(&q), vec![DiagCode::FunctionArity]);
}

#[test]
fn missing_definition_is_undefined_function() {
    let mut q = query_calling("ex:nowhere", 1);
    assert!(!compile_and_validate(&mut q));
    assert_eq!(codes(&q), vec![DiagCode::UndefinedFunction]);
    assert_eq!(
        q.errors()[0].subject.as_deref(),
        Some("http://example.org/nowhere")
    );
}

#[test]
fn external_call_resolves_through_registry() {
    let q = query_calling("<function://text.util.shout>", 1);
    let body = q.arena().bgp(q.body().unwrap()).unwrap();
    let sparql_ast::Exp::Bind { expr, .. } = q.exp(body[1]).unwrap() else {
        panic!("expected BIND");
    };
    let target = expr.as_term().unwrap().external().unwrap();

    let mut registry: ExternalRegistry<fn(&str) -> String> = ExternalRegistry::new();
    registry.register("text.util", "shout", |s: &str| s.to_uppercase());
    let f = registry.resolve(target).unwrap();
    assert_eq!(f("hi"), "HI");
}

#[test]
fn malformed_external_target() {
    let mut q = query();
    let arg: Expression = q.create_variable("x").into();
    q.create_function("<function://nomember>", vec![arg]).unwrap();
    assert_eq!(codes(&q), vec![DiagCode::MalformedExternalCall]);
}
