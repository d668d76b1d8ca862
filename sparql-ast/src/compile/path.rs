//! Property path algebra compiler.
//!
//! Turns the path expression attached to a predicate slot into a
//! [`PathSpec`]: outer modifiers (`^`, short, all, distinct, depth/breadth
//! first) are peeled off one per step and recorded in a mode string, then
//! repetition operators in the remaining core get their `{min,max}` bounds.
//!
//! `^short(p)` gives mode `"is"` and `short(^p)` gives `"si"`: characters
//! accumulate in outer-to-inner order.
//!
//! Under [`PathEvaluation::Algebra`] a peeled inverse is also re-applied as
//! an explicit `^` around the core, since only legacy evaluation reads the
//! mode string.

use crate::ast::expr::{Expression, Term};
use crate::ast::path::{PathBounds, PathSpec};
use crate::ast::query::AstQuery;
use crate::diag::{DiagCode, Diagnostic};
use crate::error::Result;
use crate::oper::Oper;
use crate::options::PathEvaluation;

/// Compiles one path expression.
#[derive(Debug)]
pub struct PathCompiler {
    evaluation: PathEvaluation,
    diagnostics: Vec<Diagnostic>,
}

impl PathCompiler {
    pub fn new(evaluation: PathEvaluation) -> Self {
        Self {
            evaluation,
            diagnostics: Vec::new(),
        }
    }

    /// Problems found in path steps so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    /// Compile a path expression.
    pub fn compile(&mut self, regex: Expression) -> PathSpec {
        let mut mode = String::new();
        let mut inverse = false;
        let mut distinct = false;
        let mut core = regex;

        loop {
            let oper = match &core {
                Expression::Term(t) if t.oper.is_path_modifier() && t.args.len() == 1 => t.oper,
                _ => break,
            };
            match oper {
                Oper::Inverse => {
                    mode.push('i');
                    inverse = !inverse;
                }
                Oper::Short => mode.push('s'),
                Oper::ShortAll => mode.push_str("sa"),
                Oper::All => mode.push('a'),
                Oper::DepthFirst => mode.push('d'),
                Oper::BreadthFirst => mode.push('b'),
                Oper::PathDistinct => distinct = true,
                _ => {}
            }
            core = operand(core);
        }

        self.normalize(&mut core);
        let bounds = core.bounds().unwrap_or(PathBounds::once());

        if inverse && self.evaluation == PathEvaluation::Algebra {
            core = Term::new("^", Oper::Inverse, vec![core]).into();
        }

        tracing::trace!(mode = %mode, bounds = %bounds, distinct, "compiled path");
        PathSpec {
            regex: core,
            mode,
            bounds,
            distinct,
        }
    }

    /// Give every repetition its bounds and check the path steps.
    fn normalize(&mut self, expr: &mut Expression) {
        match expr {
            Expression::Term(t) if t.oper.is_path() => {
                if t.bounds.is_none() {
                    t.bounds = match t.oper {
                        Oper::Star => Some(PathBounds::star()),
                        Oper::Plus => Some(PathBounds::plus()),
                        Oper::ZeroOrOne => Some(PathBounds::zero_or_one()),
                        _ => None,
                    };
                }
                for arg in &mut t.args {
                    self.normalize(arg);
                }
            }
            Expression::Term(t) => {
                self.diagnostics.push(
                    Diagnostic::error(
                        DiagCode::InvalidPathStep,
                        format!("Function call {} used as a property path step", t.name),
                    )
                    .with_subject(t.name.as_ref()),
                );
            }
            Expression::Constant(c) if !c.is_iri() => {
                self.diagnostics.push(
                    Diagnostic::error(
                        DiagCode::InvalidPathStep,
                        format!("{} used as a property path step", c),
                    )
                    .with_subject(c.to_string())
                    .with_help("Path steps are IRIs, variables or path operators"),
                );
            }
            Expression::Constant(_) | Expression::Variable(_) => {}
        }
    }
}

/// The single operand of a modifier term; anything else is returned as is.
fn operand(expr: Expression) -> Expression {
    match expr {
        Expression::Term(mut t) if t.args.len() == 1 => t.args.swap_remove(0),
        other => other,
    }
}

impl AstQuery {
    /// Compile a path with this query's evaluation mode, recording step errors.
    pub(crate) fn compile_path(&mut self, regex: Expression) -> Result<PathSpec> {
        let mut compiler = PathCompiler::new(self.options.path_evaluation);
        let spec = compiler.compile(regex);
        for diag in compiler.into_diagnostics() {
            self.record(diag)?;
        }
        Ok(spec)
    }
}
