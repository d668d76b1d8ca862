//! Scope and blank-node validation.
//!
//! Runs after [`AstQuery::compile`] and reports problems as diagnostics on
//! the query without transforming the body.
//!
//! ## Responsibilities
//!
//! - Variable scoping: duplicate `SELECT (expr AS ?v)` and `BIND` targets
//! - Blank-node scoping: a label belongs to exactly one basic graph pattern
//!   across the body, subqueries and update templates (INSERT DATA excepted)
//! - Ground data for INSERT DATA / DELETE DATA
//! - VALUES row arity
//! - Grouping: projected variables of a grouped query are group keys
//! - `SELECT *` expansion
//!
//! Groups that do not leak bindings upward (OPTIONAL, UNION branches, MINUS,
//! EXISTS) are validated against a snapshot of the scope stack.
//!
//! [`AstQuery::compile`]: crate::AstQuery::compile

use crate::ast::expr::{Expression, Variable};
use crate::ast::pattern::{Exp, ExpId, Triple, ValuesTable};
use crate::ast::query::{AstQuery, ResultForm, SelectItem, UpdateData};
use crate::diag::{DiagCode, Diagnostic};
use crate::error::Result;
use std::collections::HashSet;
use std::sync::Arc;

impl AstQuery {
    /// Validate scoping rules. Returns [`AstQuery::is_correct`].
    ///
    /// Problems are collected, never thrown, unless strict mode is on.
    /// A second call returns the first result.
    pub fn validate(&mut self) -> Result<bool> {
        let span = tracing::debug_span!("sparql_validate", form = %self.result_form);
        let _guard = span.enter();

        if self.validated {
            return Ok(self.correct);
        }
        self.scope.clear();
        self.blank_scope.clear();

        if let Some(body) = self.body {
            self.validate_exp(body)?;
        }
        self.validate_ground_data()?;
        self.validate_templates()?;
        self.validate_select()?;
        self.validate_grouping()?;

        self.validated = true;
        tracing::debug!(correct = self.correct, errors = self.errors.len(), "validated query");
        Ok(self.correct)
    }

    fn in_scope(&self, var: &Variable) -> bool {
        self.scope.contains(var)
    }

    fn bind(&mut self, var: &Variable) {
        if !var.is_path() && !self.in_scope(var) {
            self.scope.push(var.clone());
        }
    }

    /// Validate a group whose bindings stay inside it.
    fn validate_nested(&mut self, id: ExpId) -> Result<()> {
        let mark = self.scope.len();
        let result = self.validate_exp(id);
        self.scope.truncate(mark);
        result
    }

    fn validate_exp(&mut self, id: ExpId) -> Result<()> {
        if matches!(self.arena.get(id)?, Exp::Query(_)) {
            return self.validate_sub_query(id);
        }
        match self.arena.get(id)?.clone() {
            Exp::Triple(triple) => self.validate_triple(&triple, id)?,
            Exp::Bgp(children) => {
                for child in children {
                    match self.arena.get(child)? {
                        Exp::Triple(triple) => {
                            let triple = triple.clone();
                            self.validate_triple(&triple, id)?;
                        }
                        Exp::RdfList(list) => {
                            let triples = list.triples.clone();
                            self.validate_list_triples(&triples, id)?;
                        }
                        _ => self.validate_exp(child)?,
                    }
                }
            }
            Exp::RdfList(list) => self.validate_list_triples(&list.triples, id)?,
            Exp::Union(left, right) => {
                self.validate_nested(left)?;
                self.validate_nested(right)?;
            }
            Exp::Optional(body) | Exp::Minus(body) => self.validate_nested(body)?,
            Exp::Filter(expr) => self.validate_expression(&expr)?,
            Exp::Bind { expr, var } => {
                self.validate_expression(&expr)?;
                if self.in_scope(&var) {
                    self.record(
                        Diagnostic::error(
                            DiagCode::BindScope,
                            format!("BIND target {} is already bound", var),
                        )
                        .with_subject(var.to_string())
                        .with_help("Choose a variable not used earlier in the group"),
                    )?;
                }
                self.bind(&var);
            }
            Exp::Values(values) => self.validate_values(&values)?,
            Exp::Service { endpoint, body, .. } => {
                if let Some(var) = endpoint.as_variable() {
                    self.bind(var);
                }
                self.validate_exp(body)?;
            }
            Exp::Graph { name, body } => {
                if let Some(var) = name.as_variable() {
                    self.bind(var);
                }
                self.validate_exp(body)?;
            }
            Exp::Query(_) => {}
        }
        Ok(())
    }

    fn validate_list_triples(&mut self, triples: &[ExpId], bgp: ExpId) -> Result<()> {
        for &id in triples {
            let triple = self.arena.triple(id)?.clone();
            self.validate_triple(&triple, bgp)?;
        }
        Ok(())
    }

    /// Bind the triple's variables and check its blank labels belong to `bgp`.
    fn validate_triple(&mut self, triple: &Triple, bgp: ExpId) -> Result<()> {
        for var in triple.variables() {
            self.bind(&var);
        }
        for node in [&triple.subject, &triple.object] {
            if let Some(label) = blank_label(node) {
                self.check_blank_label(label, bgp)?;
            }
        }
        Ok(())
    }

    fn check_blank_label(&mut self, label: Arc<str>, bgp: ExpId) -> Result<()> {
        match self.blank_scope.get(&label) {
            None => {
                self.blank_scope.insert(label, bgp);
            }
            Some(&owner) if owner == bgp => {}
            Some(_) => {
                if self.update_data == UpdateData::InsertData {
                    return Ok(());
                }
                let reported = self.errors.iter().any(|d| {
                    d.code == DiagCode::BlankNodeScope && d.subject.as_deref() == Some(&*label)
                });
                if !reported {
                    self.record(
                        Diagnostic::error(
                            DiagCode::BlankNodeScope,
                            format!(
                                "Blank node {} is used in more than one basic graph pattern",
                                label
                            ),
                        )
                        .with_subject(label.as_ref())
                        .with_help("Use a variable to join across graph patterns"),
                    )?;
                }
            }
        }
        Ok(())
    }

    fn validate_values(&mut self, values: &ValuesTable) -> Result<()> {
        let width = values.vars.len();
        for (n, row) in values.rows.iter().enumerate() {
            if row.len() != width {
                self.record(
                    Diagnostic::error(
                        DiagCode::ValuesArity,
                        format!(
                            "VALUES row {} has {} value(s) for {} variable(s)",
                            n + 1,
                            row.len(),
                            width
                        ),
                    )
                    .with_note("Use UNDEF for a missing value"),
                )?;
            }
        }
        for var in &values.vars {
            self.bind(var);
        }
        Ok(())
    }

    /// EXISTS patterns inside an expression see the current scope but do not
    /// extend it.
    fn validate_expression(&mut self, expr: &Expression) -> Result<()> {
        let mut patterns = Vec::new();
        expr.collect_exists(&mut patterns);
        for id in patterns {
            self.validate_nested(id)?;
        }
        Ok(())
    }

    fn validate_sub_query(&mut self, id: ExpId) -> Result<()> {
        let Exp::Query(slot) = self.arena.get_mut(id)? else {
            return Ok(());
        };
        let mut sub = std::mem::take(slot.as_mut());
        let result = sub.validate();
        let projected: Vec<Variable> = sub.select_vars().into_iter().cloned().collect();
        let diagnostics = sub.errors.clone();
        let labels: Vec<Arc<str>> = sub.blank_scope.keys().cloned().collect();
        if let Exp::Query(slot) = self.arena.get_mut(id)? {
            **slot = sub;
        }
        result?;

        for diag in diagnostics {
            self.record(diag)?;
        }
        // the subquery owns its labels as one unit in this query's table
        for label in labels {
            self.check_blank_label(label, id)?;
        }
        for var in &projected {
            self.bind(var);
        }
        Ok(())
    }

    fn validate_ground_data(&mut self) -> Result<()> {
        let (template, context) = match self.update_data {
            UpdateData::None => return Ok(()),
            UpdateData::InsertData => (self.insert, "INSERT DATA"),
            UpdateData::DeleteData => (self.delete, "DELETE DATA"),
        };
        let Some(template) = template else {
            return Ok(());
        };
        for id in self.arena.triples_under(template)? {
            let triple = self.arena.triple(id)?.clone();
            for node in triple.nodes() {
                if node.is_blank_node() {
                    if self.update_data == UpdateData::DeleteData {
                        self.record(
                            Diagnostic::error(
                                DiagCode::BlankNodeInDeleteData,
                                format!("Blank node {} not allowed in DELETE DATA", node),
                            )
                            .with_subject(node.to_string())
                            .with_note("Blank nodes in DELETE DATA cannot match existing data"),
                        )?;
                    }
                } else if let Some(var) = node.as_variable() {
                    self.record(
                        Diagnostic::error(
                            DiagCode::VariableInGroundData,
                            format!("Variable {} not allowed in {}", var, context),
                        )
                        .with_subject(var.to_string())
                        .with_help(format!(
                            "{} requires ground triples (IRIs, literals, blank nodes) with no variables.",
                            context
                        ))
                        .with_note(
                            "Use DELETE WHERE or INSERT/DELETE with WHERE clause for patterns with variables.",
                        ),
                    )?;
                }
            }
        }
        Ok(())
    }

    /// Apply the blank-node law to the INSERT and DELETE templates.
    ///
    /// Triples shared with the body (DELETE WHERE, CONSTRUCT WHERE) were
    /// already checked there.
    fn validate_templates(&mut self) -> Result<()> {
        let checked: HashSet<ExpId> = match self.body {
            Some(body) => self.arena.triples_under(body)?.into_iter().collect(),
            None => HashSet::new(),
        };
        for template in [self.insert, self.delete].into_iter().flatten() {
            self.validate_template(template, template, &checked)?;
        }
        Ok(())
    }

    fn validate_template(
        &mut self,
        id: ExpId,
        owner: ExpId,
        checked: &HashSet<ExpId>,
    ) -> Result<()> {
        let exp = self.arena.get(id)?;
        if let Some(triple) = exp.as_triple() {
            if checked.contains(&id) {
                return Ok(());
            }
            let labels: Vec<Arc<str>> = [&triple.subject, &triple.object]
                .into_iter()
                .filter_map(blank_label)
                .collect();
            for label in labels {
                self.check_blank_label(label, owner)?;
            }
            return Ok(());
        }
        let owner = if exp.is_bgp() { id } else { owner };
        for child in exp.children() {
            self.validate_template(child, owner, checked)?;
        }
        Ok(())
    }

    fn validate_select(&mut self) -> Result<()> {
        let mut body_vars = match self.body {
            Some(body) => self.pattern_variables(body)?,
            None => Vec::new(),
        };
        if let Some(values) = self.values.clone() {
            self.validate_values(&values)?;
            for var in values.vars {
                if !body_vars.contains(&var) {
                    body_vars.push(var);
                }
            }
        }

        let items = self.select.clone();
        for item in &items {
            match &item.expr {
                Some(expr) => {
                    self.validate_expression(expr)?;
                    if self.in_scope(&item.var) {
                        self.record(
                            Diagnostic::error(
                                DiagCode::DuplicateSelectBinding,
                                format!("SELECT binds {} which is already bound", item.var),
                            )
                            .with_subject(item.var.to_string())
                            .with_help("Project the expression under a new variable name"),
                        )?;
                    }
                    self.bind(&item.var);
                }
                None => {
                    let bound = body_vars.contains(&item.var) || self.in_scope(&item.var);
                    if !bound && !self.select_all {
                        self.record(
                            Diagnostic::warning(
                                DiagCode::UnboundSelectVariable,
                                format!("{} is selected but never bound", item.var),
                            )
                            .with_subject(item.var.to_string()),
                        )?;
                    }
                }
            }
        }

        if self.select_all && self.result_form != ResultForm::Describe {
            let mut added = 0usize;
            for var in body_vars {
                if !self.select.iter().any(|item| item.var == var) {
                    self.select.push(SelectItem { var, expr: None });
                    added += 1;
                }
            }
            tracing::debug!(added, "SELECT * expanded");
        }
        Ok(())
    }

    fn validate_grouping(&mut self) -> Result<()> {
        let aggregated = self
            .select
            .iter()
            .filter_map(|item| item.expr.as_ref())
            .any(Expression::contains_aggregate);
        if self.group_by.is_empty() && !aggregated {
            return Ok(());
        }
        let keys: Vec<&Variable> = self
            .group_by
            .iter()
            .filter_map(Expression::as_variable)
            .collect();
        let mut mentioned = Vec::new();
        for item in &self.select {
            match &item.expr {
                Some(expr) => expr.collect_unaggregated(&mut mentioned),
                None if !mentioned.contains(&item.var) => mentioned.push(item.var.clone()),
                None => {}
            }
        }
        let offending: Vec<Variable> = mentioned
            .into_iter()
            .filter(|var| !keys.contains(&var))
            .collect();
        for var in offending {
            self.record(
                Diagnostic::error(
                    DiagCode::NonGroupKeyVariable,
                    format!("{} is selected but is not a GROUP BY key", var),
                )
                .with_subject(var.to_string())
                .with_help(format!(
                    "Add {} to GROUP BY or wrap it in an aggregate such as SAMPLE({})",
                    var, var
                )),
            )?;
        }
        Ok(())
    }
}

/// Blank-node label of a triple position, if it is a blank node.
fn blank_label(node: &Expression) -> Option<Arc<str>> {
    match node {
        Expression::Variable(v) if v.is_blank_node() => Some(Arc::clone(&v.name)),
        Expression::Constant(c) if c.is_blank_node() => Some(Arc::from(c.to_string())),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::pattern::Atom;
    use crate::namespace::PrefixMap;
    use crate::options::CompileOptions;
    use crate::AstError;

    fn query() -> AstQuery {
        AstQuery::new().with_namespaces(Arc::new(
            PrefixMap::new().with_prefix("ex", "http://example.org/"),
        ))
    }

    fn codes(q: &AstQuery) -> Vec<DiagCode> {
        q.errors().iter().map(|d| d.code).collect()
    }

    fn var_triple(q: &mut AstQuery, s: &str, p: &str, o: &str) -> ExpId {
        let s = q.create_variable(s);
        let p = q.create_qname(p).unwrap();
        let o = q.create_variable(o);
        q.create_triple(s, Atom::new(p), o).unwrap()
    }

    #[test]
    fn test_bind_of_bound_variable() {
        let mut q = query();
        let t = var_triple(&mut q, "s", "ex:p", "o");
        let one: Expression = q.create_number("1").unwrap().into();
        let bind = q.create_bind(one, q.create_variable("o"));
        let body = q.create_bgp(vec![t, bind]);
        q.set_body(body).unwrap();
        q.set_select_all(true);
        q.compile().unwrap();
        assert!(!q.validate().unwrap());
        assert_eq!(codes(&q), vec![DiagCode::BindScope]);
    }

    #[test]
    fn test_optional_bindings_do_not_leak() {
        let mut q = query();
        let t = var_triple(&mut q, "s", "ex:p", "o");
        let t2 = var_triple(&mut q, "s", "ex:q", "z");
        let opt_body = q.create_bgp(vec![t2]);
        let opt = q.create_optional(opt_body).unwrap();
        let one: Expression = q.create_number("1").unwrap().into();
        let bind = q.create_bind(one, q.create_variable("z"));
        let body = q.create_bgp(vec![t, opt, bind]);
        q.set_body(body).unwrap();
        q.set_select_all(true);
        q.compile().unwrap();
        assert!(q.validate().unwrap());
    }

    #[test]
    fn test_values_row_arity() {
        let mut q = query();
        let a = q.create_variable("a");
        let b = q.create_variable("b");
        let one: Expression = q.create_number("1").unwrap().into();
        let values = q.create_values(ValuesTable {
            vars: vec![a.clone(), b],
            rows: vec![vec![Some(one.clone()), None], vec![Some(one)]],
        });
        let body = q.create_bgp(vec![values]);
        q.set_body(body).unwrap();
        q.set_select(a, None);
        q.compile().unwrap();
        assert!(!q.validate().unwrap());
        assert_eq!(codes(&q), vec![DiagCode::ValuesArity]);
    }

    #[test]
    fn test_select_star_includes_values_vars() {
        let mut q = query();
        let t = var_triple(&mut q, "s", "ex:p", "o");
        let body = q.create_bgp(vec![t]);
        q.set_body(body).unwrap();
        let k = q.create_variable("k");
        q.set_values(ValuesTable {
            vars: vec![k],
            rows: vec![vec![None]],
        });
        q.set_select_all(true);
        q.compile().unwrap();
        assert!(q.validate().unwrap());
        let names: Vec<&str> = q.select_vars().iter().map(|v| v.name()).collect();
        assert_eq!(names, vec!["s", "o", "k"]);
    }

    #[test]
    fn test_select_star_keeps_explicit_items() {
        let mut q = query();
        let t = var_triple(&mut q, "s", "ex:p", "o");
        let body = q.create_bgp(vec![t]);
        q.set_body(body).unwrap();
        q.set_select(q.create_variable("o"), None);
        q.set_select_all(true);
        q.compile().unwrap();
        q.validate().unwrap();
        let names: Vec<&str> = q.select_vars().iter().map(|v| v.name()).collect();
        assert_eq!(names, vec!["o", "s"]);
    }

    #[test]
    fn test_unbound_select_variable_warns() {
        let mut q = query();
        let t = var_triple(&mut q, "s", "ex:p", "o");
        let body = q.create_bgp(vec![t]);
        q.set_body(body).unwrap();
        q.set_select(q.create_variable("nope"), None);
        q.compile().unwrap();
        assert!(q.validate().unwrap());
        assert_eq!(codes(&q), vec![DiagCode::UnboundSelectVariable]);
    }

    #[test]
    fn test_group_key_check() {
        let mut q = query();
        let t = var_triple(&mut q, "s", "ex:p", "o");
        let body = q.create_bgp(vec![t]);
        q.set_body(body).unwrap();
        let o: Expression = q.create_variable("o").into();
        let count = q.create_aggregate("count", vec![o], false, None).unwrap();
        q.set_select(q.create_variable("s"), None);
        q.set_select(q.create_variable("o"), None);
        q.set_select(q.create_variable("n"), Some(count));
        q.set_group(q.create_variable("s").into());
        q.compile().unwrap();
        assert!(!q.validate().unwrap());
        let errors: Vec<_> = q
            .errors()
            .iter()
            .filter(|d| d.code == DiagCode::NonGroupKeyVariable)
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].subject.as_deref(), Some("?o"));
    }

    #[test]
    fn test_unaggregated_variable_in_select_expression() {
        let mut q = query();
        let t = var_triple(&mut q, "x", "ex:p", "y");
        let body = q.create_bgp(vec![t]);
        q.set_body(body).unwrap();
        let y: Expression = q.create_variable("y").into();
        let sum = q.create_aggregate("sum", vec![y], false, None).unwrap();
        let x: Expression = q.create_variable("x").into();
        let total = q.create_function("+", vec![x, sum]).unwrap();
        q.set_select(q.create_variable("z"), Some(total));
        q.compile().unwrap();
        assert!(!q.validate().unwrap());
        let errors: Vec<_> = q
            .errors()
            .iter()
            .filter(|d| d.code == DiagCode::NonGroupKeyVariable)
            .collect();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].subject.as_deref(), Some("?x"));
    }

    #[test]
    fn test_group_key_inside_select_expression() {
        let mut q = query();
        let t = var_triple(&mut q, "x", "ex:p", "y");
        let body = q.create_bgp(vec![t]);
        q.set_body(body).unwrap();
        let y: Expression = q.create_variable("y").into();
        let sum = q.create_aggregate("sum", vec![y], false, None).unwrap();
        let x: Expression = q.create_variable("x").into();
        let total = q.create_function("+", vec![x, sum]).unwrap();
        q.set_select(q.create_variable("z"), Some(total));
        q.set_group(q.create_variable("x").into());
        q.compile().unwrap();
        assert!(q.validate().unwrap());
    }

    #[test]
    fn test_delete_data_ground_checks() {
        let mut q = query();
        let s = q.create_blank_node(Some("b"));
        let p = q.create_qname("ex:p").unwrap();
        let o = q.create_variable("o");
        let t = q.create_triple(s, Atom::new(p), o).unwrap();
        let data = q.create_bgp(vec![t]);
        q.set_update_data(UpdateData::DeleteData);
        q.set_delete(data).unwrap();
        q.compile().unwrap();
        assert!(!q.validate().unwrap());
        assert_eq!(
            codes(&q),
            vec![DiagCode::BlankNodeInDeleteData, DiagCode::VariableInGroundData]
        );
    }

    #[test]
    fn test_exists_pattern_is_validated() {
        let mut q = query();
        let t = var_triple(&mut q, "s", "ex:p", "o");
        let one: Expression = q.create_number("1").unwrap().into();
        let bind = q.create_bind(one, q.create_variable("s"));
        let inner = q.create_bgp(vec![bind]);
        let exists = q.create_exists(inner, false).unwrap();
        let filter = q.create_filter(exists);
        let body = q.create_bgp(vec![t, filter]);
        q.set_body(body).unwrap();
        q.set_select_all(true);
        q.compile().unwrap();
        assert!(!q.validate().unwrap());
        assert_eq!(codes(&q), vec![DiagCode::BindScope]);
    }

    #[test]
    fn test_sub_query_projection_is_bound() {
        let mut q = query();
        let mut sub = q.sub_query();
        let t = var_triple(&mut sub, "s", "ex:p", "o");
        let sub_body = sub.create_bgp(vec![t]);
        sub.set_body(sub_body).unwrap();
        sub.set_select(sub.create_variable("s"), None);

        let sub_exp = q.create_query_exp(sub);
        let one: Expression = q.create_number("1").unwrap().into();
        let bind = q.create_bind(one.clone(), q.create_variable("s"));
        let ok_bind = q.create_bind(one, q.create_variable("o"));
        let body = q.create_bgp(vec![sub_exp, bind, ok_bind]);
        q.set_body(body).unwrap();
        q.set_select_all(true);
        q.compile().unwrap();
        assert!(!q.validate().unwrap());
        assert_eq!(codes(&q), vec![DiagCode::BindScope]);
    }

    fn blank_triple(q: &mut AstQuery, label: &str, p: &str, o: &str) -> ExpId {
        let b = q.create_blank_node(Some(label));
        let p = q.create_qname(p).unwrap();
        let o = q.create_variable(o);
        q.create_triple(b, Atom::new(p), o).unwrap()
    }

    #[test]
    fn test_blank_label_shared_with_sub_query() {
        let mut q = query();
        let mut sub = q.sub_query();
        let inner = blank_triple(&mut sub, "b", "ex:p", "o");
        let sub_body = sub.create_bgp(vec![inner]);
        sub.set_body(sub_body).unwrap();
        sub.set_select(sub.create_variable("o"), None);
        let sub_exp = q.create_query_exp(sub);

        let outer = blank_triple(&mut q, "b", "ex:q", "z");
        let outer_bgp = q.create_bgp(vec![outer]);
        let body = q.create_bgp(vec![outer_bgp, sub_exp]);
        q.set_body(body).unwrap();
        q.set_select_all(true);
        q.compile().unwrap();
        assert!(!q.validate().unwrap());
        assert_eq!(codes(&q), vec![DiagCode::BlankNodeScope]);
        assert_eq!(q.errors()[0].subject.as_deref(), Some("_:b"));
    }

    #[test]
    fn test_sub_query_blank_label_used_once() {
        let mut q = query();
        let mut sub = q.sub_query();
        let inner = blank_triple(&mut sub, "b", "ex:p", "o");
        let sub_body = sub.create_bgp(vec![inner]);
        sub.set_body(sub_body).unwrap();
        sub.set_select(sub.create_variable("o"), None);
        let sub_exp = q.create_query_exp(sub);

        let outer = blank_triple(&mut q, "c", "ex:q", "z");
        let outer_bgp = q.create_bgp(vec![outer]);
        let body = q.create_bgp(vec![sub_exp, outer_bgp]);
        q.set_body(body).unwrap();
        q.set_select_all(true);
        q.compile().unwrap();
        assert!(q.validate().unwrap());
    }

    #[test]
    fn test_strict_validation_fails_fast() {
        let mut q = AstQuery::with_options(CompileOptions::strict()).with_namespaces(Arc::new(
            PrefixMap::new().with_prefix("ex", "http://example.org/"),
        ));
        let one: Expression = q.create_number("1").unwrap().into();
        let two: Expression = q.create_number("2").unwrap().into();
        let x = q.create_variable("x");
        q.set_select(x.clone(), Some(one));
        q.set_select(x, Some(two));
        q.compile().unwrap();
        let err = q.validate().unwrap_err();
        assert!(matches!(err, AstError::Strict(ref d) if d.code == DiagCode::DuplicateSelectBinding));
    }
}
