//! Expression nodes: variables, constants and function terms.
//!
//! These appear in triple positions, FILTER/BIND expressions, SELECT
//! bindings, solution modifiers and property paths. Property path operators
//! are ordinary [`Term`]s distinguished by their operator code and optional
//! [`PathBounds`].

use super::path::PathBounds;
use super::pattern::ExpId;
use crate::oper::{Oper, OperKind};
use serde::{Deserialize, Serialize};
use sparql_vocab::xsd;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Scope of a variable.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VarScope {
    /// Bound by the query body
    #[default]
    Global,
    /// Parameter of a function definition
    Local,
    /// Not yet classified
    Undef,
}

/// A variable (`?x`) or a blank-node placeholder (`_:b`).
///
/// Identity is the name: two variables are equal iff their names are equal,
/// whatever their flags.
#[derive(Clone, Debug)]
pub struct Variable {
    pub(crate) name: Arc<str>,
    pub(crate) blank: bool,
    pub(crate) path: bool,
    pub(crate) visited: bool,
    pub(crate) scope: VarScope,
}

impl Variable {
    pub(crate) fn new(name: &str) -> Self {
        let name = name
            .strip_prefix('?')
            .or_else(|| name.strip_prefix('$'))
            .unwrap_or(name);
        Self {
            name: Arc::from(name),
            blank: false,
            path: false,
            visited: false,
            scope: VarScope::Global,
        }
    }

    pub(crate) fn blank(label: &str) -> Self {
        let label = label.strip_prefix("_:").unwrap_or(label);
        Self {
            name: Arc::from(format!("_:{}", label)),
            blank: true,
            ..Self::new("")
        }
    }

    /// Name without the `?` (blank placeholders keep their `_:`).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_blank_node(&self) -> bool {
        self.blank
    }

    /// Check if this variable stands for a property path in a predicate slot.
    pub fn is_path(&self) -> bool {
        self.path
    }

    pub fn is_visited(&self) -> bool {
        self.visited
    }

    pub fn scope(&self) -> VarScope {
        self.scope
    }
}

impl PartialEq for Variable {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for Variable {}

impl Hash for Variable {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.blank {
            write!(f, "{}", self.name)
        } else {
            write!(f, "?{}", self.name)
        }
    }
}

/// Kind of RDF constant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConstantKind {
    Iri,
    Literal,
    BlankNode,
}

/// An IRI, literal or blank-node identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Constant {
    pub(crate) kind: ConstantKind,
    /// Full IRI, lexical form, or blank label
    pub(crate) label: Arc<str>,
    /// Surface prefixed name, when created from one
    pub(crate) qname: Option<Arc<str>>,
    pub(crate) datatype: Option<Arc<str>>,
    pub(crate) lang: Option<Arc<str>>,
}

impl Constant {
    pub(crate) fn iri(iri: &str) -> Self {
        Self {
            kind: ConstantKind::Iri,
            label: Arc::from(iri),
            qname: None,
            datatype: None,
            lang: None,
        }
    }

    pub(crate) fn literal(lexical: &str, datatype: &str, lang: Option<&str>) -> Self {
        Self {
            kind: ConstantKind::Literal,
            label: Arc::from(lexical),
            qname: None,
            datatype: Some(Arc::from(datatype)),
            lang: lang.map(Arc::from),
        }
    }

    pub(crate) fn blank_node(label: &str) -> Self {
        Self {
            kind: ConstantKind::BlankNode,
            label: Arc::from(label.strip_prefix("_:").unwrap_or(label)),
            qname: None,
            datatype: None,
            lang: None,
        }
    }

    pub(crate) fn with_qname(mut self, qname: &str) -> Self {
        self.qname = Some(Arc::from(qname));
        self
    }

    pub fn kind(&self) -> ConstantKind {
        self.kind
    }

    /// The full IRI, the lexical form, or the blank label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// The prefixed name this IRI was written as, if any.
    pub fn qname(&self) -> Option<&str> {
        self.qname.as_deref()
    }

    pub fn datatype(&self) -> Option<&str> {
        self.datatype.as_deref()
    }

    pub fn lang(&self) -> Option<&str> {
        self.lang.as_deref()
    }

    pub fn is_iri(&self) -> bool {
        self.kind == ConstantKind::Iri
    }

    pub fn is_literal(&self) -> bool {
        self.kind == ConstantKind::Literal
    }

    pub fn is_blank_node(&self) -> bool {
        self.kind == ConstantKind::BlankNode
    }

    /// Check if this is a literal with a numeric XSD datatype.
    pub fn is_numeric(&self) -> bool {
        self.datatype().map_or(false, xsd::is_numeric_datatype)
    }

    /// Check if this is a plain `xsd:string` literal.
    pub fn is_string(&self) -> bool {
        self.is_literal() && self.datatype() == Some(xsd::STRING)
    }
}

impl std::fmt::Display for Constant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            ConstantKind::Iri => write!(f, "<{}>", self.label),
            ConstantKind::BlankNode => write!(f, "_:{}", self.label),
            ConstantKind::Literal => {
                write!(f, "\"{}\"", self.label.replace('"', "\\\""))?;
                if let Some(lang) = &self.lang {
                    write!(f, "@{}", lang)
                } else {
                    match self.datatype() {
                        Some(dt) if dt != xsd::STRING => write!(f, "^^<{}>", dt),
                        _ => Ok(()),
                    }
                }
            }
        }
    }
}

/// A regex pattern compiled when its call was created.
#[derive(Clone, Debug)]
pub struct CompiledRegex {
    /// Effective pattern, after implicit `.*` wrapping
    pub source: String,
    /// Flag characters as written
    pub flags: String,
    pub regex: regex::Regex,
}

impl PartialEq for CompiledRegex {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source && self.flags == other.flags
    }
}

/// Module path and member of an externally bound function.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ExternalTarget {
    pub module: Arc<str>,
    pub member: Arc<str>,
}

impl std::fmt::Display for ExternalTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.module, self.member)
    }
}

/// A function application: built-in call, operator, aggregate, cast,
/// external or user-defined call, or property path operator.
#[derive(Clone, Debug, PartialEq)]
pub struct Term {
    pub(crate) name: Arc<str>,
    pub(crate) long_name: Option<Arc<str>>,
    pub(crate) oper: Oper,
    pub(crate) args: Vec<Expression>,
    pub(crate) distinct: bool,
    pub(crate) bounds: Option<PathBounds>,
    pub(crate) modality: Option<Arc<str>>,
    pub(crate) regex: Option<CompiledRegex>,
    pub(crate) external: Option<ExternalTarget>,
    pub(crate) pattern: Option<ExpId>,
}

impl Term {
    pub(crate) fn new(name: &str, oper: Oper, args: Vec<Expression>) -> Self {
        Self {
            name: Arc::from(name),
            long_name: None,
            oper,
            args,
            distinct: false,
            bounds: None,
            modality: None,
            regex: None,
            external: None,
            pattern: None,
        }
    }

    /// Surface name or operator symbol.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Expanded IRI of the function name, when written as a prefixed name.
    pub fn long_name(&self) -> Option<&str> {
        self.long_name.as_deref()
    }

    pub fn oper(&self) -> Oper {
        self.oper
    }

    pub fn args(&self) -> &[Expression] {
        &self.args
    }

    pub fn arg(&self, n: usize) -> Option<&Expression> {
        self.args.get(n)
    }

    /// `DISTINCT` inside an aggregate call.
    pub fn is_distinct(&self) -> bool {
        self.distinct
    }

    pub fn bounds(&self) -> Option<PathBounds> {
        self.bounds
    }

    /// Call modality: digest algorithm for hash functions, separator for
    /// `group_concat`.
    pub fn modality(&self) -> Option<&str> {
        self.modality.as_deref()
    }

    /// Precompiled literal regex pattern (REGEX and REPLACE).
    pub fn compiled_regex(&self) -> Option<&CompiledRegex> {
        self.regex.as_ref()
    }

    pub fn external(&self) -> Option<&ExternalTarget> {
        self.external.as_ref()
    }

    /// Graph pattern of an EXISTS / NOT EXISTS call.
    pub fn pattern(&self) -> Option<ExpId> {
        self.pattern
    }

    pub fn is_aggregate(&self) -> bool {
        self.oper.is_aggregate()
    }

    pub fn is_path(&self) -> bool {
        self.oper.is_path()
    }

    fn infix_symbol(&self) -> Option<&'static str> {
        let symbol = match self.oper {
            Oper::And => "&&",
            Oper::Or => "||",
            Oper::Eq => "=",
            Oper::Ne => "!=",
            Oper::Lt => "<",
            Oper::Le => "<=",
            Oper::Gt => ">",
            Oper::Ge => ">=",
            Oper::Add => "+",
            Oper::Sub => "-",
            Oper::Mult => "*",
            Oper::Div => "/",
            _ => return None,
        };
        Some(symbol)
    }
}

impl std::fmt::Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let args = &self.args;
        match self.oper {
            Oper::Star | Oper::Plus | Oper::ZeroOrOne | Oper::Counted if args.len() == 1 => {
                let bounds = self.bounds.map(|b| b.to_string()).unwrap_or_default();
                write!(f, "{}{}", args[0], bounds)
            }
            Oper::Sequence | Oper::Alternative => {
                let sep = if self.oper == Oper::Sequence { "/" } else { "|" };
                write!(f, "(")?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, "{}", sep)?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
            Oper::Inverse if args.len() == 1 => write!(f, "^{}", args[0]),
            Oper::Negation if args.len() == 1 => write!(f, "!{}", args[0]),
            Oper::Not if args.len() == 1 => write!(f, "!{}", args[0]),
            Oper::Sub if args.len() == 1 => write!(f, "-{}", args[0]),
            Oper::Exist | Oper::NotExist => match self.pattern {
                Some(id) => write!(f, "{} {{ #{} }}", self.name, id),
                None => write!(f, "{}", self.name),
            },
            Oper::Count if args.is_empty() => {
                write!(f, "count({}*)", if self.distinct { "distinct " } else { "" })
            }
            Oper::Cast if !args.is_empty() => write!(f, "<{}>({})", self.name, args[0]),
            _ => {
                if let (Some(symbol), [left, right]) = (self.infix_symbol(), args.as_slice()) {
                    return write!(f, "({} {} {})", left, symbol, right);
                }
                write!(f, "{}(", self.name)?;
                if self.distinct {
                    write!(f, "distinct ")?;
                }
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// Any expression node.
#[derive(Clone, Debug, PartialEq)]
pub enum Expression {
    Variable(Variable),
    Constant(Constant),
    Term(Box<Term>),
}

impl Expression {
    pub fn is_variable(&self) -> bool {
        matches!(self, Expression::Variable(_))
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, Expression::Constant(_))
    }

    /// Check if this is a blank node (placeholder variable or constant).
    pub fn is_blank_node(&self) -> bool {
        match self {
            Expression::Variable(v) => v.is_blank_node(),
            Expression::Constant(c) => c.is_blank_node(),
            Expression::Term(_) => false,
        }
    }

    /// Check if this is a function application other than a path operator.
    pub fn is_function(&self) -> bool {
        matches!(self, Expression::Term(t) if !t.is_path())
    }

    /// Check if this is a path operator or a path variable.
    pub fn is_path(&self) -> bool {
        match self {
            Expression::Term(t) => t.is_path(),
            Expression::Variable(v) => v.is_path(),
            Expression::Constant(_) => false,
        }
    }

    pub fn is_aggregate(&self) -> bool {
        matches!(self, Expression::Term(t) if t.is_aggregate())
    }

    /// Surface name: variable name, constant label, or function name.
    pub fn name(&self) -> &str {
        match self {
            Expression::Variable(v) => v.name(),
            Expression::Constant(c) => c.qname().unwrap_or_else(|| c.label()),
            Expression::Term(t) => t.name(),
        }
    }

    /// Resolved namespace IRI, for IRI constants and prefixed function names.
    pub fn long_name(&self) -> Option<&str> {
        match self {
            Expression::Variable(_) => None,
            Expression::Constant(c) if c.is_iri() => Some(c.label()),
            Expression::Constant(_) => None,
            Expression::Term(t) => t.long_name(),
        }
    }

    /// Path bounds, only ever set on path operators.
    pub fn bounds(&self) -> Option<PathBounds> {
        match self {
            Expression::Term(t) => t.bounds(),
            _ => None,
        }
    }

    pub fn as_variable(&self) -> Option<&Variable> {
        match self {
            Expression::Variable(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_constant(&self) -> Option<&Constant> {
        match self {
            Expression::Constant(c) => Some(c),
            _ => None,
        }
    }

    pub fn as_term(&self) -> Option<&Term> {
        match self {
            Expression::Term(t) => Some(t),
            _ => None,
        }
    }

    /// Collect every variable mentioned by this expression, in order, without
    /// duplicates.
    pub fn variables(&self) -> Vec<Variable> {
        let mut out = Vec::new();
        self.collect_variables(&mut out);
        out
    }

    pub(crate) fn collect_variables(&self, out: &mut Vec<Variable>) {
        match self {
            Expression::Variable(v) => {
                if !out.contains(v) {
                    out.push(v.clone());
                }
            }
            Expression::Constant(_) => {}
            Expression::Term(t) => {
                for arg in &t.args {
                    arg.collect_variables(out);
                }
            }
        }
    }

    /// Check whether an aggregate call appears anywhere in this expression.
    pub fn contains_aggregate(&self) -> bool {
        match self {
            Expression::Term(t) => t.is_aggregate() || t.args.iter().any(|a| a.contains_aggregate()),
            _ => false,
        }
    }

    /// Variables referenced outside of any aggregate call.
    pub(crate) fn collect_unaggregated(&self, out: &mut Vec<Variable>) {
        match self {
            Expression::Variable(v) => {
                if !out.contains(v) {
                    out.push(v.clone());
                }
            }
            Expression::Constant(_) => {}
            Expression::Term(t) if t.is_aggregate() => {}
            Expression::Term(t) => {
                for arg in &t.args {
                    arg.collect_unaggregated(out);
                }
            }
        }
    }

    /// EXISTS patterns reachable from this expression.
    pub(crate) fn collect_exists(&self, out: &mut Vec<ExpId>) {
        if let Expression::Term(t) = self {
            if let Some(id) = t.pattern {
                out.push(id);
            }
            for arg in &t.args {
                arg.collect_exists(out);
            }
        }
    }

    /// Operator family, for terms.
    pub fn oper_kind(&self) -> Option<OperKind> {
        self.as_term().map(|t| t.oper.kind())
    }
}

impl From<Variable> for Expression {
    fn from(v: Variable) -> Self {
        Expression::Variable(v)
    }
}

impl From<Constant> for Expression {
    fn from(c: Constant) -> Self {
        Expression::Constant(c)
    }
}

impl From<Term> for Expression {
    fn from(t: Term) -> Self {
        Expression::Term(Box::new(t))
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Expression::Variable(v) => write!(f, "{}", v),
            Expression::Constant(c) => write!(f, "{}", c),
            Expression::Term(t) => write!(f, "{}", t),
        }
    }
}
