//! Graph pattern nodes and the arena that owns them.
//!
//! Patterns are stored in an [`ExpArena`] owned by the query and refer to one
//! another by [`ExpId`]. Compilation passes never splice lists in place: they
//! allocate new nodes and swap the query's body root.

use super::expr::{Expression, Variable};
use super::path::PathSpec;
use super::query::AstQuery;
use crate::error::{AstError, Result};

/// Index of a graph pattern in its query's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ExpId(u32);

impl ExpId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for ExpId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The predicate slot of a triple: a predicate node plus the property path
/// attached to it, if any.
#[derive(Clone, Debug, PartialEq)]
pub struct Atom {
    pub node: Expression,
    pub regex: Option<Expression>,
}

impl Atom {
    /// A plain predicate with no path.
    pub fn new(node: impl Into<Expression>) -> Self {
        Self {
            node: node.into(),
            regex: None,
        }
    }

    pub fn has_path(&self) -> bool {
        self.regex.is_some()
    }
}

impl From<Expression> for Atom {
    fn from(node: Expression) -> Self {
        Self::new(node)
    }
}

/// A triple pattern.
#[derive(Clone, Debug, PartialEq)]
pub struct Triple {
    /// Per-query triple number
    pub number: usize,
    pub subject: Expression,
    pub predicate: Atom,
    pub object: Expression,
    /// Set when the predicate is a property path
    pub path: Option<PathSpec>,
}

impl Triple {
    pub fn is_path(&self) -> bool {
        self.path.is_some()
    }

    /// Subject, predicate and object, in that order.
    pub fn nodes(&self) -> [&Expression; 3] {
        [&self.subject, &self.predicate.node, &self.object]
    }

    /// Variables bound by matching this triple (path variables excluded).
    pub fn variables(&self) -> Vec<Variable> {
        let mut out = Vec::new();
        for node in self.nodes() {
            if let Expression::Variable(v) = node {
                if !v.is_path() && !out.contains(v) {
                    out.push(v.clone());
                }
            }
        }
        out
    }
}

impl std::fmt::Display for Triple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.path {
            Some(path) => write!(f, "{} {} {}", self.subject, path.regex, self.object),
            None => write!(f, "{} {} {}", self.subject, self.predicate.node, self.object),
        }
    }
}

/// Inline data: `VALUES (?a ?b) { (1 2) (UNDEF 3) }`.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct ValuesTable {
    pub vars: Vec<Variable>,
    /// One cell per declared variable; `None` is UNDEF
    pub rows: Vec<Vec<Option<Expression>>>,
}

/// An RDF collection: list cells chained by `rdf:first`/`rdf:rest`.
#[derive(Clone, Debug, PartialEq)]
pub struct RdfList {
    /// Head cell, or `rdf:nil` for the empty list
    pub head: Expression,
    pub triples: Vec<ExpId>,
}

/// A graph pattern node.
#[derive(Clone, Debug)]
pub enum Exp {
    Triple(Triple),
    /// Basic graph pattern: conjunction of its children, one blank-node scope
    Bgp(Vec<ExpId>),
    Union(ExpId, ExpId),
    Optional(ExpId),
    Minus(ExpId),
    Filter(Expression),
    Bind { expr: Expression, var: Variable },
    Values(ValuesTable),
    RdfList(RdfList),
    Service {
        endpoint: Expression,
        silent: bool,
        body: ExpId,
    },
    Graph { name: Expression, body: ExpId },
    /// Nested subquery
    Query(Box<AstQuery>),
}

impl Exp {
    /// Node kind, for messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Exp::Triple(_) => "triple",
            Exp::Bgp(_) => "basic graph pattern",
            Exp::Union(..) => "union",
            Exp::Optional(_) => "optional",
            Exp::Minus(_) => "minus",
            Exp::Filter(_) => "filter",
            Exp::Bind { .. } => "bind",
            Exp::Values(_) => "values",
            Exp::RdfList(_) => "list",
            Exp::Service { .. } => "service",
            Exp::Graph { .. } => "graph",
            Exp::Query(_) => "subquery",
        }
    }

    pub fn is_triple(&self) -> bool {
        matches!(self, Exp::Triple(_))
    }

    pub fn is_bgp(&self) -> bool {
        matches!(self, Exp::Bgp(_))
    }

    pub fn as_triple(&self) -> Option<&Triple> {
        match self {
            Exp::Triple(t) => Some(t),
            _ => None,
        }
    }

    /// Child pattern ids, in order.
    pub fn children(&self) -> Vec<ExpId> {
        match self {
            Exp::Bgp(children) => children.clone(),
            Exp::Union(left, right) => vec![*left, *right],
            Exp::Optional(body) | Exp::Minus(body) => vec![*body],
            Exp::Service { body, .. } | Exp::Graph { body, .. } => vec![*body],
            Exp::RdfList(list) => list.triples.clone(),
            Exp::Triple(_)
            | Exp::Filter(_)
            | Exp::Bind { .. }
            | Exp::Values(_)
            | Exp::Query(_) => Vec::new(),
        }
    }
}

/// Owner of every graph pattern node of one query.
#[derive(Clone, Debug, Default)]
pub struct ExpArena {
    nodes: Vec<Exp>,
}

impl ExpArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, exp: Exp) -> ExpId {
        let id = ExpId(self.nodes.len() as u32);
        self.nodes.push(exp);
        id
    }

    pub fn get(&self, id: ExpId) -> Result<&Exp> {
        self.nodes.get(id.index()).ok_or(AstError::UnknownExp(id))
    }

    pub(crate) fn get_mut(&mut self, id: ExpId) -> Result<&mut Exp> {
        self.nodes.get_mut(id.index()).ok_or(AstError::UnknownExp(id))
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Exp> {
        self.nodes.iter_mut()
    }

    pub fn triple(&self, id: ExpId) -> Result<&Triple> {
        match self.get(id)? {
            Exp::Triple(t) => Ok(t),
            _ => Err(AstError::NotAPattern {
                id,
                expected: "triple",
            }),
        }
    }

    pub fn bgp(&self, id: ExpId) -> Result<&[ExpId]> {
        match self.get(id)? {
            Exp::Bgp(children) => Ok(children),
            _ => Err(AstError::NotAPattern {
                id,
                expected: "basic graph pattern",
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Every triple reachable from `root` through group patterns, in order.
    ///
    /// Filters, EXISTS patterns and subqueries are not entered.
    pub fn triples_under(&self, root: ExpId) -> Result<Vec<ExpId>> {
        let mut out = Vec::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let exp = self.get(id)?;
            if exp.is_triple() {
                out.push(id);
                continue;
            }
            // reverse so children pop in order
            stack.extend(exp.children().into_iter().rev());
        }
        Ok(out)
    }
}
