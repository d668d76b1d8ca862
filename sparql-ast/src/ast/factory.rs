//! Factory operations called by the grammar front end.
//!
//! These are the only way to build nodes. Calls and property paths are
//! compiled as they are created; malformed low-level input (a non-numeric
//! path bound, a bad number) fails the call, while semantic problems are
//! recorded as diagnostics on the query.

use super::expr::{Constant, Expression, Term, VarScope, Variable};
use super::path::{PathBounds, MAX_BOUND};
use super::pattern::{Atom, Exp, ExpId, RdfList, Triple, ValuesTable};
use super::query::{
    AstQuery, FunctionDef, OrderCondition, ResultForm, SelectItem, UpdateData,
};
use crate::diag::{DiagCode, Diagnostic};
use crate::error::{AstError, Result};
use crate::namespace::split_qname;
use crate::oper::{self, Oper};
use sparql_vocab::{rdf, xsd};
use std::sync::Arc;

impl AstQuery {
    // =========================================================================
    // Variables and blank nodes
    // =========================================================================

    /// `?name` or `$name`.
    pub fn create_variable(&self, name: &str) -> Variable {
        Variable::new(name)
    }

    /// A fresh variable. `#` is not a SPARQL name character, so the name
    /// cannot clash with a user variable.
    pub fn new_variable(&mut self) -> Variable {
        let n = self.counters.variable;
        self.counters.variable += 1;
        Variable::new(&format!("_v#{}", n))
    }

    /// A blank-node placeholder: `_:label`, or a fresh one for `[]`.
    pub fn create_blank_node(&mut self, label: Option<&str>) -> Variable {
        match label {
            Some(label) => Variable::blank(label),
            None => {
                let n = self.counters.blank;
                self.counters.blank += 1;
                Variable::blank(&format!("_b#{}", n))
            }
        }
    }

    /// A blank-node identifier constant.
    pub fn create_blank_constant(&mut self, label: Option<&str>) -> Constant {
        match label {
            Some(label) => Constant::blank_node(label),
            None => {
                let n = self.counters.blank;
                self.counters.blank += 1;
                Constant::blank_node(&format!("_b#{}", n))
            }
        }
    }

    // =========================================================================
    // Constants
    // =========================================================================

    /// An IRI written in full, resolved against the base.
    pub fn create_iri(&self, iri: &str) -> Constant {
        let iri = iri
            .strip_prefix('<')
            .and_then(|s| s.strip_suffix('>'))
            .unwrap_or(iri);
        Constant::iri(&self.ns.resolve_relative(iri))
    }

    /// A prefixed name. An undeclared prefix is recorded and the name is
    /// kept unexpanded.
    pub fn create_qname(&mut self, qname: &str) -> Result<Constant> {
        let iri = self.expand_name(qname)?;
        Ok(Constant::iri(&iri).with_qname(qname))
    }

    /// A literal. `datatype` may be a prefixed name or a full IRI; a
    /// language tag implies `rdf:langString`; no datatype means `xsd:string`.
    pub fn create_constant(
        &mut self,
        lexical: &str,
        datatype: Option<&str>,
        lang: Option<&str>,
    ) -> Result<Constant> {
        if let Some(lang) = lang {
            return Ok(Constant::literal(lexical, rdf::LANG_STRING, Some(lang)));
        }
        let datatype = match datatype {
            Some(dt) => self.expand_name(dt)?,
            None => xsd::STRING.to_string(),
        };
        Ok(Constant::literal(lexical, &datatype, None))
    }

    /// An unquoted numeric literal: integer, decimal or double by shape.
    pub fn create_number(&self, lexical: &str) -> Result<Constant> {
        let datatype = numeric_datatype(lexical).ok_or_else(|| AstError::invalid_numeric(lexical))?;
        Ok(Constant::literal(lexical, datatype, None))
    }

    pub fn create_boolean(&self, value: bool) -> Constant {
        Constant::literal(if value { "true" } else { "false" }, xsd::BOOLEAN, None)
    }

    /// Expand a prefixed name or strip `<>` from a full IRI.
    fn expand_name(&mut self, name: &str) -> Result<String> {
        if let Some(iri) = name.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
            return Ok(self.ns.resolve_relative(iri));
        }
        let Some((prefix, local)) = split_qname(name) else {
            return Ok(name.to_string());
        };
        match self.ns.expand(prefix, local) {
            Some(iri) => Ok(iri),
            None => {
                self.record(
                    Diagnostic::error(
                        DiagCode::UndefinedPrefix,
                        format!("Undefined prefix '{}'", prefix),
                    )
                    .with_subject(name)
                    .with_help(format!("Declare it with PREFIX {}: <...>", prefix)),
                )?;
                Ok(name.to_string())
            }
        }
    }

    /// Function name as written, plus its expanded IRI when it has one.
    fn function_name(&mut self, name: &str) -> Result<(String, Option<String>)> {
        if let Some(iri) = name.strip_prefix('<').and_then(|s| s.strip_suffix('>')) {
            return Ok((iri.to_string(), Some(self.ns.resolve_relative(iri))));
        }
        if name.contains("://") {
            return Ok((name.to_string(), Some(name.to_string())));
        }
        if split_qname(name).is_some() {
            let iri = self.expand_name(name)?;
            return Ok((name.to_string(), Some(iri)));
        }
        Ok((name.to_string(), None))
    }

    // =========================================================================
    // Calls
    // =========================================================================

    /// A function or operator call (`strlen(?x)`, `+`, `xsd:integer(?y)`,
    /// `<function://m.f>(...)`). The call is compiled immediately.
    pub fn create_function(&mut self, name: &str, args: Vec<Expression>) -> Result<Expression> {
        let term = self.build_call(name, args, |_| {})?;
        Ok(term.into())
    }

    /// An aggregate call with its DISTINCT flag and, for `group_concat`, the
    /// separator.
    pub fn create_aggregate(
        &mut self,
        name: &str,
        args: Vec<Expression>,
        distinct: bool,
        separator: Option<&str>,
    ) -> Result<Expression> {
        let term = self.build_call(name, args, |term| {
            term.distinct = distinct;
            term.modality = separator.map(Arc::from);
        })?;
        Ok(term.into())
    }

    /// `EXISTS { pattern }` or `NOT EXISTS { pattern }`.
    pub fn create_exists(&mut self, pattern: ExpId, negated: bool) -> Result<Expression> {
        self.arena.get(pattern)?;
        let (name, oper) = if negated {
            ("not exists", Oper::NotExist)
        } else {
            ("exists", Oper::Exist)
        };
        let mut term = Term::new(name, oper, Vec::new());
        term.pattern = Some(pattern);
        Ok(term.into())
    }

    fn build_call(
        &mut self,
        name: &str,
        args: Vec<Expression>,
        decorate: impl FnOnce(&mut Term),
    ) -> Result<Term> {
        let (surface, long_name) = self.function_name(name)?;
        let oper = oper::resolve(long_name.as_deref().unwrap_or(&surface));
        let mut term = Term::new(&surface, oper, args);
        term.long_name = long_name.map(Arc::from);
        decorate(&mut term);
        self.compile_term(&mut term)?;
        Ok(term)
    }

    // =========================================================================
    // Property paths
    // =========================================================================

    /// A unary path operator or modifier: `*`, `+`, `?`, `^`, `!`, `short`,
    /// `shortall`, `all`, `distinct`, `depth`, `breadth`.
    pub fn create_operator(&mut self, symbol: &str, operand: Expression) -> Result<Expression> {
        let oper = oper::path_operator(symbol)
            .filter(|op| !matches!(op, Oper::Sequence | Oper::Alternative))
            .ok_or_else(|| AstError::unknown_path_operator(symbol))?;
        Ok(Term::new(symbol, oper, vec![operand]).into())
    }

    /// `operand{min,max}`. A missing bound defaults to 0 / unbounded.
    pub fn create_bounded_operator(
        &mut self,
        min: Option<&str>,
        max: Option<&str>,
        operand: Expression,
    ) -> Result<Expression> {
        let min = parse_bound(min, 0)?;
        let max = parse_bound(max, MAX_BOUND)?;
        if min > max {
            return Err(AstError::InvertedPathBound { min, max });
        }
        let mut term = Term::new("{}", Oper::Counted, vec![operand]);
        term.bounds = Some(PathBounds::counted(min, max));
        Ok(term.into())
    }

    /// `left / right` or `left | right`.
    pub fn create_path_binary(
        &mut self,
        symbol: &str,
        left: Expression,
        right: Expression,
    ) -> Result<Expression> {
        let oper = match symbol {
            "/" => Oper::Sequence,
            "|" => Oper::Alternative,
            _ => return Err(AstError::unknown_path_operator(symbol)),
        };
        Ok(Term::new(symbol, oper, vec![left, right]).into())
    }

    /// Predicate slot carrying a property path, with a fresh path variable
    /// as its node.
    pub fn create_path_atom(&mut self, regex: Expression) -> Atom {
        let n = self.counters.path;
        self.counters.path += 1;
        let mut var = Variable::new(&format!("_path#{}", n));
        var.path = true;
        Atom {
            node: var.into(),
            regex: Some(regex),
        }
    }

    // =========================================================================
    // Graph patterns
    // =========================================================================

    /// A triple pattern. A predicate carrying a path is compiled by the path
    /// compiler. The triple is registered unless submission is suppressed.
    pub fn create_triple(
        &mut self,
        subject: impl Into<Expression>,
        mut predicate: Atom,
        object: impl Into<Expression>,
    ) -> Result<ExpId> {
        let path = match predicate.regex.take() {
            Some(regex) => Some(self.compile_path(regex)?),
            None => None,
        };
        let number = self.counters.triple;
        self.counters.triple += 1;

        let constant_predicate = predicate.node.as_constant().cloned();
        let is_path = path.is_some();
        let id = self.arena.alloc(Exp::Triple(Triple {
            number,
            subject: subject.into(),
            predicate,
            object: object.into(),
            path,
        }));

        if self.submit_triples {
            self.triples.push(id);
            if is_path {
                self.paths.push(id);
            } else if let Some(c) = constant_predicate {
                if !self.predicates.contains(&c) {
                    self.predicates.push(c);
                }
            }
        }
        Ok(id)
    }

    /// Suppress (or resume) registration of created triples.
    pub fn set_submit_triples(&mut self, submit: bool) {
        self.submit_triples = submit;
    }

    pub fn create_bgp(&mut self, children: Vec<ExpId>) -> ExpId {
        self.arena.alloc(Exp::Bgp(children))
    }

    /// Append to a basic graph pattern.
    pub fn bgp_add(&mut self, bgp: ExpId, child: ExpId) -> Result<()> {
        self.arena.get(child)?;
        match self.arena.get_mut(bgp)? {
            Exp::Bgp(children) => {
                children.push(child);
                Ok(())
            }
            _ => Err(AstError::NotAPattern {
                id: bgp,
                expected: "basic graph pattern",
            }),
        }
    }

    pub fn create_union(&mut self, left: ExpId, right: ExpId) -> Result<ExpId> {
        self.arena.get(left)?;
        self.arena.get(right)?;
        Ok(self.arena.alloc(Exp::Union(left, right)))
    }

    pub fn create_optional(&mut self, body: ExpId) -> Result<ExpId> {
        self.arena.get(body)?;
        Ok(self.arena.alloc(Exp::Optional(body)))
    }

    pub fn create_minus(&mut self, body: ExpId) -> Result<ExpId> {
        self.arena.get(body)?;
        Ok(self.arena.alloc(Exp::Minus(body)))
    }

    pub fn create_filter(&mut self, expr: Expression) -> ExpId {
        self.arena.alloc(Exp::Filter(expr))
    }

    /// `BIND(expr AS ?var)`.
    pub fn create_bind(&mut self, expr: Expression, var: Variable) -> ExpId {
        self.arena.alloc(Exp::Bind { expr, var })
    }

    /// Inline `VALUES` block.
    pub fn create_values(&mut self, values: ValuesTable) -> ExpId {
        self.arena.alloc(Exp::Values(values))
    }

    pub fn create_service(
        &mut self,
        endpoint: Expression,
        silent: bool,
        body: ExpId,
    ) -> Result<ExpId> {
        self.arena.get(body)?;
        Ok(self.arena.alloc(Exp::Service {
            endpoint,
            silent,
            body,
        }))
    }

    /// `GRAPH name { body }`.
    pub fn create_graph(&mut self, name: Expression, body: ExpId) -> Result<ExpId> {
        self.arena.get(body)?;
        Ok(self.arena.alloc(Exp::Graph { name, body }))
    }

    /// Wrap a subquery built with [`AstQuery::sub_query`].
    pub fn create_query_exp(&mut self, query: AstQuery) -> ExpId {
        self.arena.alloc(Exp::Query(Box::new(query)))
    }

    /// An RDF collection `( a b c )`: fresh list cells chained with
    /// `rdf:first`/`rdf:rest` and terminated by `rdf:nil`.
    pub fn create_list(&mut self, items: Vec<Expression>) -> Result<ExpId> {
        let nil = Expression::from(Constant::iri(rdf::NIL));
        if items.is_empty() {
            return Ok(self.arena.alloc(Exp::RdfList(RdfList {
                head: nil,
                triples: Vec::new(),
            })));
        }

        let cells: Vec<Expression> = items
            .iter()
            .map(|_| self.create_blank_node(None).into())
            .collect();
        let mut triples = Vec::with_capacity(items.len() * 2);
        for (i, item) in items.into_iter().enumerate() {
            let rest = cells.get(i + 1).cloned().unwrap_or_else(|| nil.clone());
            let first = self.create_triple(
                cells[i].clone(),
                Atom::new(Constant::iri(rdf::FIRST)),
                item,
            )?;
            let next = self.create_triple(cells[i].clone(), Atom::new(Constant::iri(rdf::REST)), rest)?;
            triples.push(first);
            triples.push(next);
        }
        Ok(self.arena.alloc(Exp::RdfList(RdfList {
            head: cells[0].clone(),
            triples,
        })))
    }

    /// Head term of an RDF collection, for use as a subject or object.
    pub fn list_head(&self, list: ExpId) -> Result<Expression> {
        match self.arena.get(list)? {
            Exp::RdfList(l) => Ok(l.head.clone()),
            _ => Err(AstError::NotAPattern {
                id: list,
                expected: "list",
            }),
        }
    }

    // =========================================================================
    // Query clauses
    // =========================================================================

    pub fn set_result_form(&mut self, form: ResultForm) {
        self.result_form = form;
    }

    pub fn set_update_data(&mut self, data: UpdateData) {
        self.update_data = data;
        if data != UpdateData::None {
            self.result_form = ResultForm::Update;
        }
    }

    /// Attach the WHERE pattern.
    pub fn set_body(&mut self, body: ExpId) -> Result<()> {
        self.arena.get(body)?;
        self.body = Some(body);
        Ok(())
    }

    pub fn set_construct(&mut self, template: ExpId) -> Result<()> {
        self.arena.get(template)?;
        self.construct = Some(template);
        Ok(())
    }

    pub fn set_insert(&mut self, template: ExpId) -> Result<()> {
        self.arena.get(template)?;
        self.insert = Some(template);
        Ok(())
    }

    pub fn set_delete(&mut self, template: ExpId) -> Result<()> {
        self.arena.get(template)?;
        self.delete = Some(template);
        Ok(())
    }

    /// Project a variable, optionally bound to an expression. Repeated
    /// bindings are kept so validation can report them.
    pub fn set_select(&mut self, var: Variable, expr: Option<Expression>) {
        if expr.is_none() && self.select.iter().any(|item| item.var == var) {
            return;
        }
        self.select.push(SelectItem { var, expr });
    }

    /// `SELECT *` (or `DESCRIBE *`).
    pub fn set_select_all(&mut self, all: bool) {
        self.select_all = all;
    }

    pub fn set_distinct(&mut self, distinct: bool) {
        self.distinct = distinct;
    }

    pub fn set_reduced(&mut self, reduced: bool) {
        self.reduced = reduced;
    }

    pub fn set_group(&mut self, expr: Expression) {
        self.group_by.push(expr);
    }

    pub fn set_sort(&mut self, expr: Expression, descending: bool) {
        self.order_by.push(OrderCondition { expr, descending });
    }

    pub fn set_having(&mut self, expr: Expression) {
        self.having.push(expr);
    }

    pub fn set_limit(&mut self, limit: usize) {
        self.max_result = limit;
    }

    pub fn set_offset(&mut self, offset: usize) {
        self.offset = offset;
    }

    /// Name a term to DESCRIBE. Variables are not projected by this call.
    pub fn set_describe(&mut self, term: Expression) {
        if !self.describe.contains(&term) {
            self.describe.push(term);
        }
    }

    /// Trailing `VALUES` clause.
    pub fn set_values(&mut self, values: ValuesTable) {
        self.values = Some(values);
    }

    /// Register `function name(?params) { body }`. Calls made before or after
    /// this definition are resolved by [`AstQuery::compile`].
    pub fn define_function(
        &mut self,
        name: &str,
        params: Vec<Variable>,
        body: Expression,
    ) -> Result<()> {
        let (surface, long_name) = self.function_name(name)?;
        let key: Arc<str> = Arc::from(long_name.unwrap_or(surface));
        let params = params
            .into_iter()
            .map(|mut p| {
                p.scope = VarScope::Local;
                p
            })
            .collect();
        tracing::debug!(function = %key, "defined function");
        self.functions.insert(
            Arc::clone(&key),
            FunctionDef {
                name: key,
                params,
                body,
            },
        );
        Ok(())
    }
}

fn parse_bound(bound: Option<&str>, default: u32) -> Result<u32> {
    match bound.map(str::trim) {
        None | Some("") => Ok(default),
        Some(s) => s.parse::<u32>().map_err(|_| AstError::invalid_path_bound(s)),
    }
}

/// Datatype of an unquoted numeric literal, by its lexical shape.
fn numeric_datatype(lexical: &str) -> Option<&'static str> {
    let body = lexical
        .strip_prefix('+')
        .or_else(|| lexical.strip_prefix('-'))
        .unwrap_or(lexical);
    if body.is_empty() {
        return None;
    }
    if body.contains(['e', 'E']) {
        return lexical.parse::<f64>().ok().map(|_| xsd::DOUBLE);
    }
    let (int_part, frac_part) = match body.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (body, None),
    };
    let digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    match frac_part {
        None if digits(int_part) => Some(xsd::INTEGER),
        Some(frac) if digits(int_part) && digits(frac) && !frac.is_empty() => {
            Some(xsd::DECIMAL)
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::PrefixMap;
    use crate::options::CompileOptions;

    fn query() -> AstQuery {
        AstQuery::new().with_namespaces(Arc::new(
            PrefixMap::new().with_prefix("ex", "http://example.org/"),
        ))
    }

    #[test]
    fn test_numeric_datatypes() {
        assert_eq!(numeric_datatype("42"), Some(xsd::INTEGER));
        assert_eq!(numeric_datatype("-7"), Some(xsd::INTEGER));
        assert_eq!(numeric_datatype("3.14"), Some(xsd::DECIMAL));
        assert_eq!(numeric_datatype(".5"), Some(xsd::DECIMAL));
        assert_eq!(numeric_datatype("1e10"), Some(xsd::DOUBLE));
        assert_eq!(numeric_datatype("1.5E-3"), Some(xsd::DOUBLE));
        assert_eq!(numeric_datatype("abc"), None);
        assert_eq!(numeric_datatype("."), None);
        assert_eq!(numeric_datatype("1."), None);
        assert_eq!(numeric_datatype("-1.0"), Some(xsd::DECIMAL));
        assert_eq!(numeric_datatype("-"), None);
    }

    #[test]
    fn test_create_number_rejects_garbage() {
        let q = query();
        assert!(q.create_number("12").unwrap().is_numeric());
        assert!(matches!(
            q.create_number("1x"),
            Err(AstError::InvalidNumericLiteral { .. })
        ));
    }

    #[test]
    fn test_constant_datatype_inference() {
        let mut q = query();
        let plain = q.create_constant("hello", None, None).unwrap();
        assert_eq!(plain.datatype(), Some(xsd::STRING));

        let tagged = q.create_constant("chat", None, Some("fr")).unwrap();
        assert_eq!(tagged.datatype(), Some(rdf::LANG_STRING));
        assert_eq!(tagged.lang(), Some("fr"));

        let typed = q.create_constant("5", Some("xsd:integer"), None).unwrap();
        assert_eq!(typed.datatype(), Some(xsd::INTEGER));
        assert!(q.is_correct());
    }

    #[test]
    fn test_undefined_prefix_is_recorded() {
        let mut q = query();
        let c = q.create_qname("nope:thing").unwrap();
        assert_eq!(c.label(), "nope:thing");
        assert!(!q.is_correct());
        assert_eq!(q.errors()[0].code, DiagCode::UndefinedPrefix);

        let mut strict = AstQuery::with_options(CompileOptions::strict());
        assert!(matches!(
            strict.create_qname("nope:thing"),
            Err(AstError::Strict(_))
        ));
    }

    #[test]
    fn test_qname_expansion() {
        let mut q = query();
        let c = q.create_qname("ex:alice").unwrap();
        assert_eq!(c.label(), "http://example.org/alice");
        assert_eq!(c.qname(), Some("ex:alice"));
    }

    #[test]
    fn test_blank_nodes() {
        let mut q = query();
        let a = q.create_blank_node(None);
        let b = q.create_blank_node(None);
        assert_ne!(a, b);
        assert!(a.is_blank_node());
        assert_eq!(q.create_blank_node(Some("x")), q.create_blank_node(Some("_:x")));
    }

    #[test]
    fn test_bounded_operator() {
        let mut q = query();
        let p: Expression = q.create_qname("ex:p").unwrap().into();

        let e = q
            .create_bounded_operator(Some("2"), Some("5"), p.clone())
            .unwrap();
        assert_eq!(e.bounds(), Some(PathBounds::counted(2, 5)));

        let e = q.create_bounded_operator(None, Some("5"), p.clone()).unwrap();
        assert_eq!(e.bounds(), Some(PathBounds::counted(0, 5)));

        let e = q.create_bounded_operator(Some("2"), None, p.clone()).unwrap();
        assert_eq!(e.bounds(), Some(PathBounds::counted(2, MAX_BOUND)));

        assert!(matches!(
            q.create_bounded_operator(Some("two"), None, p.clone()),
            Err(AstError::InvalidPathBound { .. })
        ));
        assert!(matches!(
            q.create_bounded_operator(Some("5"), Some("2"), p),
            Err(AstError::InvertedPathBound { min: 5, max: 2 })
        ));
    }

    #[test]
    fn test_unknown_operator_symbol() {
        let mut q = query();
        let p: Expression = q.create_qname("ex:p").unwrap().into();
        assert!(matches!(
            q.create_operator("%", p.clone()),
            Err(AstError::UnknownPathOperator { .. })
        ));
        assert!(q.create_operator("/", p).is_err());
    }

    #[test]
    fn test_triple_registration() {
        let mut q = query();
        let s = q.create_variable("s");
        let o = q.create_variable("o");
        let p = q.create_qname("ex:p").unwrap();
        q.create_triple(s.clone(), Atom::new(p.clone()), o.clone())
            .unwrap();

        let star = q.create_operator("*", p.clone().into()).unwrap();
        let atom = q.create_path_atom(star);
        let path_triple = q.create_triple(s.clone(), atom, o.clone()).unwrap();

        q.set_submit_triples(false);
        q.create_triple(s, Atom::new(p.clone()), o).unwrap();

        assert_eq!(q.triples().len(), 2);
        assert_eq!(q.paths(), &[path_triple]);
        assert_eq!(q.predicates(), &[p]);

        let triple = q.arena().triple(path_triple).unwrap();
        assert!(triple.predicate.node.is_path());
        assert_eq!(triple.path.as_ref().unwrap().bounds, PathBounds::star());
    }

    #[test]
    fn test_bgp_add_checks_kind() {
        let mut q = query();
        let filter = q.create_filter(q.create_boolean(true).into());
        let bgp = q.create_bgp(Vec::new());
        q.bgp_add(bgp, filter).unwrap();
        assert_eq!(q.arena().bgp(bgp).unwrap(), &[filter]);
        assert!(matches!(
            q.bgp_add(filter, bgp),
            Err(AstError::NotAPattern { .. })
        ));
    }

    #[test]
    fn test_create_list() {
        let mut q = query();
        let one: Expression = q.create_number("1").unwrap().into();
        let two: Expression = q.create_number("2").unwrap().into();
        let list = q.create_list(vec![one, two]).unwrap();
        let head = q.list_head(list).unwrap();
        assert!(head.is_blank_node());

        let Exp::RdfList(l) = q.exp(list).unwrap() else {
            panic!("expected a list");
        };
        assert_eq!(l.triples.len(), 4);
        let last = q.arena().triple(l.triples[3]).unwrap();
        assert_eq!(last.predicate.node.long_name(), Some(rdf::REST));
        assert_eq!(last.object.long_name(), Some(rdf::NIL));

        let empty = q.create_list(Vec::new()).unwrap();
        assert_eq!(q.list_head(empty).unwrap().long_name(), Some(rdf::NIL));
    }

    #[test]
    fn test_define_function_marks_params_local() {
        let mut q = query();
        let x = q.create_variable("x");
        q.define_function("ex:double", vec![x.clone()], x.into())
            .unwrap();
        let def = q.function("http://example.org/double").unwrap();
        assert_eq!(def.params[0].scope(), VarScope::Local);
    }

    #[test]
    fn test_select_dedups_plain_vars_only() {
        let mut q = query();
        let x = q.create_variable("x");
        q.set_select(x.clone(), None);
        q.set_select(x.clone(), None);
        assert_eq!(q.select().len(), 1);
        let one: Expression = q.create_number("1").unwrap().into();
        q.set_select(x.clone(), Some(one.clone()));
        q.set_select(x, Some(one));
        assert_eq!(q.select().len(), 3);
    }
}
