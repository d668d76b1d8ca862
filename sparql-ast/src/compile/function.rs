//! Function call compilation.
//!
//! Runs on every call as it is created. The operator code is resolved by
//! the caller; this pass rewrites the few special forms and checks arity:
//!
//! - CAST: `xsd:integer(?x)` becomes `(?x, <xsd:integer>, "integer")`
//! - HASH: the algorithm becomes the call modality (`sha256` -> `SHA-256`)
//! - REGEX / REPLACE: literal patterns are compiled once
//! - EXTERNAL: the target is split into module path and member
//! - UNDEF: recorded in the undefined-symbol table for later resolution

use crate::ast::expr::{CompiledRegex, Constant, Expression, ExternalTarget, Term};
use crate::ast::pattern::Exp;
use crate::ast::query::AstQuery;
use crate::diag::{DiagCode, Diagnostic};
use crate::error::Result;
use crate::oper::{self, Oper};
use regex::RegexBuilder;
use sparql_vocab::{ns, rdf, xsd};
use std::collections::HashMap;
use std::sync::Arc;

impl AstQuery {
    /// Compile a freshly built call term in place.
    pub(crate) fn compile_term(&mut self, term: &mut Term) -> Result<()> {
        self.check_arity(term)?;
        match term.oper {
            Oper::Cast => rewrite_cast(term),
            Oper::Hash => {
                let name = term.long_name.as_deref().unwrap_or(&term.name);
                term.modality = oper::hash_algorithm(name).map(Arc::from);
            }
            Oper::Regex => self.precompile_regex(term, 1, 2, true)?,
            Oper::StrReplace => self.precompile_regex(term, 1, 3, false)?,
            Oper::External => self.bind_external(term)?,
            Oper::Undef => self.defer_call(term)?,
            _ => {}
        }
        Ok(())
    }

    fn check_arity(&mut self, term: &Term) -> Result<()> {
        let n = term.args.len();
        if term.oper.is_aggregate() {
            let ok = if term.oper == Oper::Count { n <= 1 } else { n == 1 };
            if !ok {
                let expected = if term.oper == Oper::Count {
                    "at most one argument"
                } else {
                    "exactly one argument"
                };
                self.record(
                    Diagnostic::error(
                        DiagCode::AggregateArity,
                        format!("Aggregate {} takes {}, found {}", term.name, expected, n),
                    )
                    .with_subject(term.name.as_ref()),
                )?;
            }
            if term.args.iter().any(Expression::contains_aggregate) {
                self.record(
                    Diagnostic::error(
                        DiagCode::NestedAggregate,
                        format!("Aggregate {} contains another aggregate", term.name),
                    )
                    .with_subject(term.name.as_ref()),
                )?;
            }
            return Ok(());
        }

        // a cast is written with a single value; the 3-argument form is ours
        let arity = match term.oper {
            Oper::Cast => Some(oper::Arity::exactly(1)),
            other => other.arity(),
        };
        if let Some(arity) = arity {
            if !arity.accepts(n) {
                self.record(
                    Diagnostic::error(
                        DiagCode::FunctionArity,
                        format!(
                            "Function {} takes {} argument(s), found {}",
                            term.name, arity, n
                        ),
                    )
                    .with_subject(term.name.as_ref()),
                )?;
            }
        }
        Ok(())
    }

    /// Compile a literal pattern argument. Variable patterns or flags are
    /// left for evaluation time.
    fn precompile_regex(
        &mut self,
        term: &mut Term,
        pattern_at: usize,
        flags_at: usize,
        anchor: bool,
    ) -> Result<()> {
        if !self.options.precompile_regex {
            return Ok(());
        }
        let pattern = match term.args.get(pattern_at) {
            Some(Expression::Constant(c)) if c.is_literal() => c.label().to_string(),
            _ => return Ok(()),
        };
        let flags = match term.args.get(flags_at) {
            None => String::new(),
            Some(Expression::Constant(c)) if c.is_literal() => c.label().to_string(),
            Some(_) => return Ok(()),
        };
        let source = if anchor {
            anchor_pattern(&pattern)
        } else {
            pattern.clone()
        };
        match build_regex(&source, &flags) {
            Ok(regex) => {
                tracing::trace!(pattern = %source, flags = %flags, "precompiled regex");
                term.regex = Some(CompiledRegex {
                    source,
                    flags,
                    regex,
                });
            }
            Err(message) => {
                self.record(
                    Diagnostic::error(DiagCode::InvalidRegex, message)
                        .with_subject(pattern)
                        .with_note("Flags are any of s, m, i, x"),
                )?;
            }
        }
        Ok(())
    }

    fn bind_external(&mut self, term: &mut Term) -> Result<()> {
        let name = term.long_name.as_deref().unwrap_or(&term.name).to_string();
        match split_external(&name) {
            Some(target) => {
                tracing::trace!(external = %target, "external call");
                term.external = Some(target);
            }
            None => {
                self.record(
                    Diagnostic::error(
                        DiagCode::MalformedExternalCall,
                        format!("External function {} has no module.member target", name),
                    )
                    .with_subject(name)
                    .with_help("Write the call as <function://module.path.member>(...)"),
                )?;
            }
        }
        Ok(())
    }

    fn defer_call(&mut self, term: &mut Term) -> Result<()> {
        let key = call_key(term);
        if let Some(def) = self.functions.get(&key) {
            let expected = def.params.len();
            term.oper = Oper::Function;
            return self.check_user_arity(&key, expected, term.args.len());
        }
        tracing::trace!(function = %key, arity = term.args.len(), "deferred call");
        self.undefined
            .entry(key)
            .or_default()
            .push(term.args.len());
        Ok(())
    }

    fn check_user_arity(&mut self, name: &str, expected: usize, found: usize) -> Result<()> {
        if expected == found {
            return Ok(());
        }
        self.record(
            Diagnostic::error(
                DiagCode::FunctionArity,
                format!(
                    "Function {} takes {} argument(s), found {}",
                    name, expected, found
                ),
            )
            .with_subject(name),
        )
    }

    /// Resolve calls recorded as undefined against the function definitions,
    /// whatever order they were declared in. Names left over are errors.
    pub(crate) fn resolve_deferred_calls(&mut self) -> Result<()> {
        if self.undefined.is_empty() {
            return Ok(());
        }
        let arities: HashMap<Arc<str>, usize> = self
            .functions
            .iter()
            .map(|(name, def)| (Arc::clone(name), def.params.len()))
            .collect();

        let mut visit = |term: &mut Term| {
            if term.oper == Oper::Undef && arities.contains_key(&call_key(term)) {
                term.oper = Oper::Function;
            }
        };
        for exp in self.arena.iter_mut() {
            match exp {
                Exp::Filter(expr) | Exp::Bind { expr, .. } => walk_terms_mut(expr, &mut visit),
                _ => {}
            }
        }
        for item in &mut self.select {
            if let Some(expr) = &mut item.expr {
                walk_terms_mut(expr, &mut visit);
            }
        }
        for expr in self.group_by.iter_mut().chain(self.having.iter_mut()) {
            walk_terms_mut(expr, &mut visit);
        }
        for cond in &mut self.order_by {
            walk_terms_mut(&mut cond.expr, &mut visit);
        }
        for def in self.functions.values_mut() {
            walk_terms_mut(&mut def.body, &mut visit);
        }

        let pending = std::mem::take(&mut self.undefined);
        for (name, calls) in pending {
            match arities.get(&name) {
                Some(&expected) => {
                    tracing::debug!(function = %name, calls = calls.len(), "resolved forward function reference");
                    for found in calls {
                        self.check_user_arity(&name, expected, found)?;
                    }
                }
                None => {
                    self.record(
                        Diagnostic::error(
                            DiagCode::UndefinedFunction,
                            format!("Undefined function {}", name),
                        )
                        .with_subject(name.as_ref()),
                    )?;
                    self.undefined.insert(name, calls);
                }
            }
        }
        Ok(())
    }
}

/// Key under which a call is matched against function definitions.
fn call_key(term: &Term) -> Arc<str> {
    term.long_name
        .clone()
        .unwrap_or_else(|| Arc::clone(&term.name))
}

/// Apply `f` to every term in `expr`, innermost first.
pub(crate) fn walk_terms_mut(expr: &mut Expression, f: &mut dyn FnMut(&mut Term)) {
    if let Expression::Term(term) = expr {
        for arg in &mut term.args {
            walk_terms_mut(arg, f);
        }
        f(term);
    }
}

/// Rewrite `dt(value)` to `(value, <dt>, marker)`.
fn rewrite_cast(term: &mut Term) {
    if term.args.len() != 1 {
        return;
    }
    let datatype = term
        .long_name
        .clone()
        .unwrap_or_else(|| Arc::clone(&term.name));
    let marker = cast_marker(&datatype);
    term.args.push(Constant::iri(&datatype).into());
    term.args
        .push(Constant::literal(marker, xsd::STRING, None).into());
}

/// Implementation-type marker for a cast target datatype.
pub fn cast_marker(datatype: &str) -> &'static str {
    if xsd::is_integer_family(datatype) {
        "integer"
    } else if datatype == xsd::DECIMAL {
        "decimal"
    } else if datatype == xsd::DOUBLE || datatype == xsd::FLOAT {
        "double"
    } else if datatype == xsd::BOOLEAN {
        "boolean"
    } else if xsd::is_temporal(datatype) {
        "datetime"
    } else if datatype == xsd::ANY_URI {
        "uri"
    } else if datatype == rdf::XML_LITERAL {
        "xml"
    } else if xsd::is_string_like(datatype) {
        "string"
    } else {
        "literal"
    }
}

/// Wrap a pattern in `.*` on each side it is not already anchored on.
pub fn anchor_pattern(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() + 4);
    if !pattern.starts_with('^') && !pattern.starts_with(".*") {
        out.push_str(".*");
    }
    out.push_str(pattern);
    let escaped_dollar = pattern.ends_with("\\$");
    if (!pattern.ends_with('$') || escaped_dollar) && !pattern.ends_with(".*") {
        out.push_str(".*");
    }
    out
}

/// Build a regex honouring SPARQL flag characters.
pub fn build_regex(pattern: &str, flags: &str) -> std::result::Result<regex::Regex, String> {
    let mut builder = RegexBuilder::new(pattern);
    for flag in flags.chars() {
        match flag {
            'i' => {
                builder.case_insensitive(true);
            }
            'm' => {
                builder.multi_line(true);
            }
            's' => {
                builder.dot_matches_new_line(true);
            }
            'x' => {
                builder.ignore_whitespace(true);
            }
            c => return Err(format!("Unknown regex flag: '{}'", c)),
        }
    }
    builder
        .build()
        .map_err(|e| format!("Invalid regex: {}", e))
}

/// Split `function://module.path.member` at the last `.`.
pub fn split_external(name: &str) -> Option<ExternalTarget> {
    let head = name.get(..ns::EXTENSION.len())?;
    if !head.eq_ignore_ascii_case(ns::EXTENSION) {
        return None;
    }
    let target = &name[ns::EXTENSION.len()..];
    let (module, member) = target.rsplit_once('.')?;
    if module.is_empty() || member.is_empty() {
        return None;
    }
    Some(ExternalTarget {
        module: Arc::from(module),
        member: Arc::from(member),
    })
}
