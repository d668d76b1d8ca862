//! Query shape compilation.
//!
//! Rewrites the high-level result forms into canonical graph-pattern form:
//! ASK is bounded to one result, CONSTRUCT/INSERT/DELETE adopt or derive
//! their template, and DESCRIBE becomes a CONSTRUCT over symmetric
//! description patterns.

use crate::ast::expr::{Expression, Variable};
use crate::ast::pattern::{Atom, Exp, ExpId};
use crate::ast::query::{AstQuery, ResultForm};
use crate::error::{AstError, Result};

impl AstQuery {
    /// Compile the query once its body and templates are attached.
    ///
    /// Resolves deferred function calls, compiles nested subqueries and
    /// applies the rewrite for the result form. A second call is a no-op.
    pub fn compile(&mut self) -> Result<()> {
        let span = tracing::debug_span!("sparql_compile", form = %self.result_form);
        let _guard = span.enter();

        if self.compiled {
            tracing::trace!("query already compiled");
            return Ok(());
        }

        self.compile_sub_queries()?;
        self.resolve_deferred_calls()?;

        match self.result_form {
            ResultForm::Ask => self.compile_ask(),
            ResultForm::Construct => self.compile_construct()?,
            ResultForm::Describe => self.compile_describe()?,
            ResultForm::Delete => self.compile_delete()?,
            ResultForm::Update => self.compile_update()?,
            ResultForm::Select => {}
        }

        self.compiled = true;
        tracing::debug!(correct = self.correct, errors = self.errors.len(), "compiled query");
        Ok(())
    }

    fn compile_sub_queries(&mut self) -> Result<()> {
        let functions = self.functions.clone();
        let mut failure = None;
        for exp in self.arena.iter_mut() {
            if let Exp::Query(sub) = exp {
                for (name, def) in &functions {
                    sub.functions
                        .entry(name.clone())
                        .or_insert_with(|| def.clone());
                }
                if let Err(err) = sub.compile() {
                    failure = Some(err);
                    break;
                }
            }
        }
        match failure {
            // a strict failure inside the subquery also fails this query
            Some(AstError::Strict(diag)) => {
                self.record(diag.clone())?;
                Err(AstError::Strict(diag))
            }
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn compile_ask(&mut self) {
        self.max_result = 1;
    }

    fn compile_construct(&mut self) -> Result<()> {
        if self.construct.is_some() {
            return Ok(());
        }
        if let Some(insert) = self.insert {
            tracing::debug!("CONSTRUCT adopts the insert template");
            self.construct = Some(insert);
            return Ok(());
        }
        if let Some(body) = self.body {
            let template = self.template_from(body)?;
            tracing::debug!("CONSTRUCT WHERE shorthand: body triples become the template");
            self.construct = Some(template);
        }
        Ok(())
    }

    fn compile_delete(&mut self) -> Result<()> {
        if self.delete.is_none() {
            if let Some(body) = self.body {
                let template = self.template_from(body)?;
                tracing::debug!("DELETE WHERE shorthand: body triples become the template");
                self.delete = Some(template);
            }
        }
        Ok(())
    }

    fn compile_update(&mut self) -> Result<()> {
        if self.construct.is_none() {
            self.construct = self.insert;
        }
        Ok(())
    }

    /// Fresh BGP holding every triple of `root`.
    fn template_from(&mut self, root: ExpId) -> Result<ExpId> {
        let triples = self.arena.triples_under(root)?;
        Ok(self.create_bgp(triples))
    }

    /// For each described term `d`, append
    /// `OPTIONAL { { d ?p1 ?v1 } UNION { ?v2 ?p2 d } }` to the body and use
    /// the unions as the construct template.
    fn compile_describe(&mut self) -> Result<()> {
        let body_vars = match self.body {
            Some(body) => self.pattern_variables(body)?,
            None => Vec::new(),
        };
        if self.select_all {
            if self.describe.is_empty() {
                for var in &body_vars {
                    self.describe.push(var.clone().into());
                }
            }
            for var in &body_vars {
                self.set_select(var.clone(), None);
            }
        }

        let targets: Vec<Expression> = self
            .describe
            .iter()
            .filter(|term| match term.as_variable() {
                Some(var) => {
                    let selected = self.select.iter().any(|item| &item.var == var);
                    if !selected {
                        tracing::trace!(var = %var, "DESCRIBE variable not selected, skipped");
                    }
                    selected
                }
                None => true,
            })
            .cloned()
            .collect();

        let mut unions = Vec::with_capacity(targets.len());
        let mut optionals = Vec::with_capacity(targets.len());
        for term in targets {
            let (p1, v1) = (self.new_variable(), self.new_variable());
            let (p2, v2) = (self.new_variable(), self.new_variable());
            let outgoing = self.create_triple(term.clone(), Atom::new(p1), v1)?;
            let incoming = self.create_triple(v2, Atom::new(p2), term)?;
            let left = self.create_bgp(vec![outgoing]);
            let right = self.create_bgp(vec![incoming]);
            let union = self.create_union(left, right)?;
            optionals.push(self.create_optional(union)?);
            unions.push(union);
        }

        for term in &mut self.describe {
            if let Expression::Variable(var) = term {
                var.visited = true;
            }
        }

        let mut children = match self.body {
            Some(body) => match self.arena.get(body)? {
                Exp::Bgp(children) => children.clone(),
                _ => vec![body],
            },
            None => Vec::new(),
        };
        children.extend(optionals);
        let body = self.create_bgp(children);
        self.body = Some(body);

        let template = self.create_bgp(unions);
        self.construct = Some(template);
        tracing::debug!(
            described = self.describe.len(),
            "DESCRIBE expanded into construct template"
        );
        Ok(())
    }

    /// Variables that matching `root` can bind, in first-seen order.
    ///
    /// MINUS, FILTER and EXISTS bind nothing; blank placeholders and path
    /// variables are not reported.
    pub(crate) fn pattern_variables(&self, root: ExpId) -> Result<Vec<Variable>> {
        let mut out = Vec::new();
        self.collect_pattern_variables(root, &mut out)?;
        Ok(out)
    }

    fn collect_pattern_variables(&self, id: ExpId, out: &mut Vec<Variable>) -> Result<()> {
        fn push(var: &Variable, out: &mut Vec<Variable>) {
            if !var.is_blank_node() && !var.is_path() && !out.contains(var) {
                out.push(var.clone());
            }
        }
        match self.arena.get(id)? {
            Exp::Triple(triple) => {
                for var in triple.variables() {
                    push(&var, out);
                }
            }
            Exp::Bind { var, .. } => push(var, out),
            Exp::Values(values) => {
                for var in &values.vars {
                    push(var, out);
                }
            }
            Exp::Graph { name, body } => {
                if let Some(var) = name.as_variable() {
                    push(var, out);
                }
                self.collect_pattern_variables(*body, out)?;
            }
            Exp::Query(sub) => {
                for var in sub.select_vars() {
                    push(var, out);
                }
            }
            Exp::Minus(_) | Exp::Filter(_) => {}
            exp @ (Exp::Bgp(_)
            | Exp::Union(..)
            | Exp::Optional(_)
            | Exp::Service { .. }
            | Exp::RdfList(_)) => {
                for child in exp.children() {
                    self.collect_pattern_variables(child, out)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::query::UpdateData;
    use crate::namespace::PrefixMap;
    use std::sync::Arc;

    fn query() -> AstQuery {
        AstQuery::new().with_namespaces(Arc::new(
            PrefixMap::new().with_prefix("ex", "http://example.org/"),
        ))
    }

    fn triple(q: &mut AstQuery, s: &str, p: &str, o: &str) -> ExpId {
        let s = q.create_variable(s);
        let p = q.create_qname(p).unwrap();
        let o = q.create_variable(o);
        q.create_triple(s, Atom::new(p), o).unwrap()
    }

    #[test]
    fn test_ask_limits_to_one_and_is_idempotent() {
        let mut q = query();
        q.set_result_form(ResultForm::Ask);
        q.set_limit(10);
        q.compile().unwrap();
        assert_eq!(q.max_result(), 1);
        q.compile().unwrap();
        assert_eq!(q.max_result(), 1);
    }

    #[test]
    fn test_construct_explicit_template_kept() {
        let mut q = query();
        let t = triple(&mut q, "s", "ex:p", "o");
        let body = q.create_bgp(vec![t]);
        let t2 = triple(&mut q, "s", "ex:q", "o");
        let template = q.create_bgp(vec![t2]);
        q.set_body(body).unwrap();
        q.set_construct(template).unwrap();
        q.set_result_form(ResultForm::Construct);
        q.compile().unwrap();
        assert_eq!(q.construct(), Some(template));
    }

    #[test]
    fn test_construct_adopts_insert_template() {
        let mut q = query();
        let t = triple(&mut q, "s", "ex:p", "o");
        let insert = q.create_bgp(vec![t]);
        q.set_insert(insert).unwrap();
        q.set_result_form(ResultForm::Construct);
        q.compile().unwrap();
        assert_eq!(q.construct(), Some(insert));
    }

    #[test]
    fn test_construct_where_collects_body_triples() {
        let mut q = query();
        let t1 = triple(&mut q, "s", "ex:p", "o");
        let t2 = triple(&mut q, "o", "ex:q", "z");
        let inner = q.create_bgp(vec![t2]);
        let opt = q.create_optional(inner).unwrap();
        let body = q.create_bgp(vec![t1, opt]);
        q.set_body(body).unwrap();
        q.set_result_form(ResultForm::Construct);
        q.compile().unwrap();

        let template = q.construct().unwrap();
        assert_ne!(template, body);
        assert_eq!(q.arena().bgp(template).unwrap(), &[t1, t2]);
    }

    #[test]
    fn test_delete_where_collects_body_triples() {
        let mut q = query();
        let t1 = triple(&mut q, "s", "ex:p", "o");
        let body = q.create_bgp(vec![t1]);
        q.set_body(body).unwrap();
        q.set_result_form(ResultForm::Delete);
        q.compile().unwrap();
        let template = q.delete().unwrap();
        assert_eq!(q.arena().bgp(template).unwrap(), &[t1]);
    }

    #[test]
    fn test_insert_where_becomes_construct() {
        let mut q = query();
        let t1 = triple(&mut q, "s", "ex:p", "o");
        let insert = q.create_bgp(vec![t1]);
        q.set_insert(insert).unwrap();
        q.set_result_form(ResultForm::Update);
        q.compile().unwrap();
        assert_eq!(q.construct(), Some(insert));
        assert_eq!(q.update_data(), UpdateData::None);
    }

    #[test]
    fn test_describe_unselected_variable_skipped() {
        let mut q = query();
        let t = triple(&mut q, "x", "ex:p", "o");
        let body = q.create_bgp(vec![t]);
        q.set_body(body).unwrap();
        q.set_result_form(ResultForm::Describe);
        let x = q.create_variable("x");
        q.set_describe(x.into());
        q.compile().unwrap();

        let template = q.construct().unwrap();
        assert!(q.arena().bgp(template).unwrap().is_empty());
        assert!(q.is_construct_shaped());
        assert!(q.is_describe());
    }

    #[test]
    fn test_describe_selected_variable_expanded() {
        let mut q = query();
        let t = triple(&mut q, "x", "ex:p", "o");
        let body = q.create_bgp(vec![t]);
        q.set_body(body).unwrap();
        q.set_result_form(ResultForm::Describe);
        let x = q.create_variable("x");
        q.set_select(x.clone(), None);
        q.set_describe(x.into());
        q.compile().unwrap();

        let new_body = q.arena().bgp(q.body().unwrap()).unwrap();
        assert_eq!(new_body.len(), 2);
        assert_eq!(new_body[0], t);
        assert!(matches!(q.exp(new_body[1]).unwrap(), Exp::Optional(_)));
        assert!(q.describe()[0].as_variable().unwrap().is_visited());
    }

    #[test]
    fn test_describe_star_describes_body_variables() {
        let mut q = query();
        let t = triple(&mut q, "x", "ex:p", "o");
        let body = q.create_bgp(vec![t]);
        q.set_body(body).unwrap();
        q.set_result_form(ResultForm::Describe);
        q.set_select_all(true);
        q.compile().unwrap();

        assert_eq!(q.describe().len(), 2);
        let template = q.construct().unwrap();
        assert_eq!(q.arena().bgp(template).unwrap().len(), 2);
    }

    #[test]
    fn test_pattern_variables_skip_minus_and_blanks() {
        let mut q = query();
        let t1 = triple(&mut q, "s", "ex:p", "o");
        let t2 = triple(&mut q, "z", "ex:p", "o");
        let blank = q.create_blank_node(Some("b"));
        let p = q.create_qname("ex:q").unwrap();
        let o = q.create_variable("w");
        let t3 = q.create_triple(blank, Atom::new(p), o).unwrap();
        let minus_body = q.create_bgp(vec![t2]);
        let minus = q.create_minus(minus_body).unwrap();
        let body = q.create_bgp(vec![t1, minus, t3]);

        let vars = q.pattern_variables(body).unwrap();
        let names: Vec<&str> = vars.iter().map(|v| v.name()).collect();
        assert_eq!(names, vec!["s", "o", "w"]);
    }
}
