//! Shared helpers for sparql-ast integration tests.

// Each integration test crate uses a different subset of these helpers.
#![allow(dead_code)]

pub mod span_capture;

use sparql_ast::{Atom, AstQuery, CompileOptions, DiagCode, ExpId, PrefixMap};
use std::sync::Arc;

pub const EX: &str = "http://example.org/";

/// Standard prefixes plus `ex:`.
pub fn prefixes() -> PrefixMap {
    PrefixMap::new().with_prefix("ex", EX)
}

pub fn query() -> AstQuery {
    AstQuery::new().with_namespaces(Arc::new(prefixes()))
}

pub fn query_with(options: CompileOptions) -> AstQuery {
    AstQuery::with_options(options).with_namespaces(Arc::new(prefixes()))
}

/// `?s <qname> ?o` with both ends as variables.
pub fn var_triple(q: &mut AstQuery, s: &str, p: &str, o: &str) -> ExpId {
    let s = q.create_variable(s);
    let p = q.create_qname(p).expect("predicate");
    let o = q.create_variable(o);
    q.create_triple(s, Atom::new(p), o).expect("triple")
}

/// Codes of every recorded diagnostic, in order.
pub fn codes(q: &AstQuery) -> Vec<DiagCode> {
    q.errors().iter().map(|d| d.code).collect()
}

/// Count of diagnostics with the given code.
pub fn count_code(q: &AstQuery, code: DiagCode) -> usize {
    q.errors().iter().filter(|d| d.code == code).count()
}

/// Compile then validate, returning the correctness flag.
pub fn compile_and_validate(q: &mut AstQuery) -> bool {
    q.compile().expect("compile");
    q.validate().expect("validate")
}
