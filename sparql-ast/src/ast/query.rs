//! The query root.
//!
//! [`AstQuery`] owns every node of one query: the pattern arena, the body
//! root, templates, the SELECT list and solution modifiers, plus the state
//! used while compiling and validating (scope stack, blank-node table,
//! undefined symbols, diagnostics, counters).

use super::expr::{Constant, Expression, Variable};
use super::pattern::{Exp, ExpArena, ExpId, ValuesTable};
use crate::diag::Diagnostic;
use crate::error::{AstError, Result};
use crate::namespace::{NamespaceManager, PrefixMap};
use crate::options::CompileOptions;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

/// Query result form.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResultForm {
    #[default]
    Select,
    Ask,
    Construct,
    Describe,
    Delete,
    Update,
}

impl std::fmt::Display for ResultForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ResultForm::Select => "SELECT",
            ResultForm::Ask => "ASK",
            ResultForm::Construct => "CONSTRUCT",
            ResultForm::Describe => "DESCRIBE",
            ResultForm::Delete => "DELETE",
            ResultForm::Update => "UPDATE",
        };
        write!(f, "{}", s)
    }
}

/// Ground-data update kind.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UpdateData {
    #[default]
    None,
    InsertData,
    DeleteData,
}

/// One projected variable, with its `(expr AS ?var)` binding if any.
#[derive(Clone, Debug, PartialEq)]
pub struct SelectItem {
    pub var: Variable,
    pub expr: Option<Expression>,
}

/// ORDER BY condition.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderCondition {
    pub expr: Expression,
    pub descending: bool,
}

/// A `function name(?params) { body }` definition.
#[derive(Clone, Debug, PartialEq)]
pub struct FunctionDef {
    pub name: Arc<str>,
    pub params: Vec<Variable>,
    pub body: Expression,
}

#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Counters {
    pub blank: usize,
    pub variable: usize,
    pub triple: usize,
    pub path: usize,
}

/// Root of a query AST.
#[derive(Clone, Debug)]
pub struct AstQuery {
    pub(crate) arena: ExpArena,
    pub(crate) body: Option<ExpId>,
    pub(crate) construct: Option<ExpId>,
    pub(crate) insert: Option<ExpId>,
    pub(crate) delete: Option<ExpId>,
    pub(crate) result_form: ResultForm,
    pub(crate) update_data: UpdateData,

    pub(crate) select: Vec<SelectItem>,
    pub(crate) select_all: bool,
    pub(crate) distinct: bool,
    pub(crate) reduced: bool,
    pub(crate) group_by: Vec<Expression>,
    pub(crate) order_by: Vec<OrderCondition>,
    pub(crate) having: Vec<Expression>,
    pub(crate) max_result: usize,
    pub(crate) offset: usize,
    pub(crate) describe: Vec<Expression>,
    pub(crate) values: Option<ValuesTable>,

    pub(crate) scope: Vec<Variable>,
    pub(crate) blank_scope: HashMap<Arc<str>, ExpId>,
    pub(crate) errors: Vec<Diagnostic>,
    pub(crate) correct: bool,
    /// Calls to names with no operator code: name -> argument counts seen
    pub(crate) undefined: BTreeMap<Arc<str>, Vec<usize>>,
    pub(crate) functions: HashMap<Arc<str>, FunctionDef>,
    pub(crate) counters: Counters,

    pub(crate) predicates: Vec<Constant>,
    pub(crate) triples: Vec<ExpId>,
    pub(crate) paths: Vec<ExpId>,
    pub(crate) submit_triples: bool,

    pub(crate) options: CompileOptions,
    pub(crate) ns: Arc<dyn NamespaceManager>,
    pub(crate) compiled: bool,
    pub(crate) validated: bool,
}

impl Default for AstQuery {
    fn default() -> Self {
        Self::new()
    }
}

impl AstQuery {
    /// Create an empty SELECT query with default options and the standard
    /// prefixes.
    pub fn new() -> Self {
        Self {
            arena: ExpArena::new(),
            body: None,
            construct: None,
            insert: None,
            delete: None,
            result_form: ResultForm::Select,
            update_data: UpdateData::None,
            select: Vec::new(),
            select_all: false,
            distinct: false,
            reduced: false,
            group_by: Vec::new(),
            order_by: Vec::new(),
            having: Vec::new(),
            max_result: usize::MAX,
            offset: 0,
            describe: Vec::new(),
            values: None,
            scope: Vec::new(),
            blank_scope: HashMap::new(),
            errors: Vec::new(),
            correct: true,
            undefined: BTreeMap::new(),
            functions: HashMap::new(),
            counters: Counters::default(),
            predicates: Vec::new(),
            triples: Vec::new(),
            paths: Vec::new(),
            submit_triples: true,
            options: CompileOptions::default(),
            ns: Arc::new(PrefixMap::default()),
            compiled: false,
            validated: false,
        }
    }

    /// Create an empty query with the given options.
    pub fn with_options(options: CompileOptions) -> Self {
        Self {
            options,
            ..Self::new()
        }
    }

    /// Replace the namespace collaborator.
    pub fn with_namespaces(mut self, ns: Arc<dyn NamespaceManager>) -> Self {
        self.ns = ns;
        self
    }

    /// Create an empty nested query sharing this query's options and
    /// namespaces.
    pub fn sub_query(&self) -> AstQuery {
        Self::with_options(self.options.clone()).with_namespaces(Arc::clone(&self.ns))
    }

    /// Record a diagnostic.
    ///
    /// Error-severity diagnostics clear the correctness flag; in strict mode
    /// the first one is returned as [`AstError::Strict`].
    pub(crate) fn record(&mut self, diag: Diagnostic) -> Result<()> {
        tracing::debug!(
            code = diag.code.code(),
            severity = %diag.severity,
            subject = diag.subject.as_deref().unwrap_or(""),
            "{}",
            diag.message
        );
        if diag.is_error() {
            self.correct = false;
            if self.options.strict {
                self.errors.push(diag.clone());
                return Err(AstError::Strict(diag));
            }
        }
        self.errors.push(diag);
        Ok(())
    }

    // =========================================================================
    // Read-only accessors for the execution engine
    // =========================================================================

    pub fn body(&self) -> Option<ExpId> {
        self.body
    }

    /// CONSTRUCT template (also set for DESCRIBE and INSERT after compile).
    pub fn construct(&self) -> Option<ExpId> {
        self.construct
    }

    pub fn insert(&self) -> Option<ExpId> {
        self.insert
    }

    pub fn delete(&self) -> Option<ExpId> {
        self.delete
    }

    pub fn exp(&self, id: ExpId) -> Result<&Exp> {
        self.arena.get(id)
    }

    pub fn arena(&self) -> &ExpArena {
        &self.arena
    }

    pub fn result_form(&self) -> ResultForm {
        self.result_form
    }

    pub fn update_data(&self) -> UpdateData {
        self.update_data
    }

    pub fn is_select(&self) -> bool {
        self.result_form == ResultForm::Select
    }

    pub fn is_ask(&self) -> bool {
        self.result_form == ResultForm::Ask
    }

    pub fn is_describe(&self) -> bool {
        self.result_form == ResultForm::Describe
    }

    /// Check if results are produced by instantiating the construct template.
    ///
    /// True for CONSTRUCT and for compiled DESCRIBE queries.
    pub fn is_construct_shaped(&self) -> bool {
        match self.result_form {
            ResultForm::Construct => true,
            ResultForm::Describe => self.compiled && self.construct.is_some(),
            _ => false,
        }
    }

    pub fn select(&self) -> &[SelectItem] {
        &self.select
    }

    /// Projected variables, in order.
    pub fn select_vars(&self) -> Vec<&Variable> {
        self.select.iter().map(|item| &item.var).collect()
    }

    /// The `(expr AS ?var)` binding of a projected variable.
    pub fn select_expr(&self, var: &Variable) -> Option<&Expression> {
        self.select
            .iter()
            .find(|item| &item.var == var)
            .and_then(|item| item.expr.as_ref())
    }

    pub fn is_select_all(&self) -> bool {
        self.select_all
    }

    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn is_reduced(&self) -> bool {
        self.reduced
    }

    pub fn group_by(&self) -> &[Expression] {
        &self.group_by
    }

    pub fn order_by(&self) -> &[OrderCondition] {
        &self.order_by
    }

    pub fn having(&self) -> &[Expression] {
        &self.having
    }

    /// LIMIT, or `usize::MAX` when unbounded.
    pub fn max_result(&self) -> usize {
        self.max_result
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Terms named by DESCRIBE.
    pub fn describe(&self) -> &[Expression] {
        &self.describe
    }

    /// Trailing VALUES clause.
    pub fn values(&self) -> Option<&ValuesTable> {
        self.values.as_ref()
    }

    pub fn function(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(name)
    }

    /// Names still unresolved: no operator code and no definition (yet).
    pub fn undefined_symbols(&self) -> impl Iterator<Item = &str> {
        self.undefined.keys().map(|name| name.as_ref())
    }

    /// Constant predicates of submitted triples.
    pub fn predicates(&self) -> &[Constant] {
        &self.predicates
    }

    /// Submitted triples, in creation order.
    pub fn triples(&self) -> &[ExpId] {
        &self.triples
    }

    /// Submitted triples whose predicate is a property path.
    pub fn paths(&self) -> &[ExpId] {
        &self.paths
    }

    pub fn options(&self) -> &CompileOptions {
        &self.options
    }

    pub fn namespaces(&self) -> &dyn NamespaceManager {
        self.ns.as_ref()
    }

    pub fn is_compiled(&self) -> bool {
        self.compiled
    }

    /// False iff an error-severity diagnostic was recorded.
    pub fn is_correct(&self) -> bool {
        self.correct
    }

    /// Every recorded diagnostic, warnings included, in order.
    pub fn errors(&self) -> &[Diagnostic] {
        &self.errors
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.errors.iter().filter(|d| d.is_warning())
    }
}
