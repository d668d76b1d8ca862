//! Operator codes and the built-in name table.
//!
//! Every built-in function, operator and aggregate resolves to an [`Oper`]:
//! a small numeric code that identifies its evaluation semantics
//! independently of its surface spelling (`isIRI` and `isURI` share a code,
//! all hash functions share [`Oper::Hash`]).
//!
//! The name table is built once, on first use, and is read-only afterwards.
//! Lookups are case-insensitive.
//!
//! ## Fallback
//!
//! | Name | Code |
//! |------|------|
//! | in the table (any case) | table entry |
//! | `xt:` local name in the table | table entry |
//! | under the XSD or RDF namespace | [`Oper::Cast`] |
//! | under `function://` | [`Oper::External`] |
//! | anything else | [`Oper::Undef`] |

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use sparql_vocab::ns;
use std::collections::HashMap;

/// Operator code.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u16)]
pub enum Oper {
    /// Not (yet) resolved
    Undef = 0,

    // Boolean and comparison
    And = 1,
    Or = 2,
    Not = 3,
    Eq = 4,
    Ne = 5,
    Lt = 6,
    Le = 7,
    Gt = 8,
    Ge = 9,
    In = 10,
    NotIn = 11,

    // Arithmetic
    Add = 20,
    Sub = 21,
    Mult = 22,
    Div = 23,

    // RDF term functions
    Bound = 30,
    IsIri = 31,
    IsBlank = 32,
    IsLiteral = 33,
    IsNumeric = 34,
    Str = 35,
    Lang = 36,
    Datatype = 37,
    Iri = 38,
    BNode = 39,
    StrDt = 40,
    StrLang = 41,
    LangMatches = 42,
    SameTerm = 43,
    If = 44,
    Coalesce = 45,
    Uuid = 46,
    StrUuid = 47,
    Exist = 48,
    NotExist = 49,

    // String functions
    Strlen = 60,
    Substr = 61,
    Ucase = 62,
    Lcase = 63,
    StrStarts = 64,
    StrEnds = 65,
    Contains = 66,
    StrBefore = 67,
    StrAfter = 68,
    EncodeForUri = 69,
    Concat = 70,
    Regex = 71,
    StrReplace = 72,

    // Numeric functions
    Abs = 80,
    Round = 81,
    Ceil = 82,
    Floor = 83,
    Rand = 84,

    // Date/time functions
    Now = 90,
    Year = 91,
    Month = 92,
    Day = 93,
    Hours = 94,
    Minutes = 95,
    Seconds = 96,
    Timezone = 97,
    Tz = 98,

    /// md5, sha1, sha256, sha384, sha512 (algorithm carried as modality)
    Hash = 110,

    // Aggregates
    Count = 120,
    Sum = 121,
    Avg = 122,
    Min = 123,
    Max = 124,
    Sample = 125,
    GroupConcat = 126,

    // Path, graph and introspection built-ins
    PathLength = 140,
    Depth = 141,
    Index = 142,
    Similarity = 143,
    Graph = 144,
    Skolem = 145,
    IsSkolem = 146,

    // Template and pretty-print built-ins
    ApplyTemplates = 160,
    CallTemplate = 161,
    Turtle = 162,
    Format = 163,
    Nl = 164,
    Indent = 165,
    Display = 166,

    /// Datatype cast (`xsd:integer(?x)`)
    Cast = 200,
    /// Externally bound function (`<function://module.member>(...)`)
    External = 201,
    /// Call to a function defined in the query
    Function = 202,

    // Property path operators
    Star = 220,
    Plus = 221,
    ZeroOrOne = 222,
    Counted = 223,
    Sequence = 224,
    Alternative = 225,
    Inverse = 226,
    Negation = 227,
    Short = 228,
    ShortAll = 229,
    All = 230,
    PathDistinct = 231,
    DepthFirst = 232,
    BreadthFirst = 233,
}

/// Broad family of an operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperKind {
    Undefined,
    Boolean,
    Comparison,
    Arithmetic,
    Term,
    String,
    Numeric,
    Date,
    Hash,
    Aggregate,
    Introspection,
    Template,
    Cast,
    External,
    Function,
    Path,
}

/// Accepted argument count range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Arity {
    /// Minimum number of arguments
    pub min: usize,
    /// Maximum number of arguments (`None` for variadic)
    pub max: Option<usize>,
}

impl Arity {
    /// Exactly `n` arguments.
    pub const fn exactly(n: usize) -> Self {
        Self {
            min: n,
            max: Some(n),
        }
    }

    /// Between `min` and `max` arguments inclusive.
    pub const fn range(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    /// At least `min` arguments.
    pub const fn at_least(min: usize) -> Self {
        Self { min, max: None }
    }

    /// Check an argument count.
    pub fn accepts(&self, n: usize) -> bool {
        n >= self.min && self.max.map_or(true, |max| n <= max)
    }
}

impl std::fmt::Display for Arity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "{}", max),
            Some(max) => write!(f, "{} to {}", self.min, max),
            None => write!(f, "at least {}", self.min),
        }
    }
}

impl Oper {
    /// The numeric operator code.
    pub fn code(self) -> u16 {
        self as u16
    }

    /// Whether this code has been resolved.
    pub fn is_defined(self) -> bool {
        self != Oper::Undef
    }

    /// The operator family.
    pub fn kind(self) -> OperKind {
        use Oper::*;
        match self {
            Undef => OperKind::Undefined,
            And | Or | Not => OperKind::Boolean,
            Eq | Ne | Lt | Le | Gt | Ge | In | NotIn => OperKind::Comparison,
            Add | Sub | Mult | Div => OperKind::Arithmetic,
            Bound | IsIri | IsBlank | IsLiteral | IsNumeric | Str | Lang | Datatype | Iri
            | BNode | StrDt | StrLang | LangMatches | SameTerm | If | Coalesce | Uuid
            | StrUuid | Exist | NotExist => OperKind::Term,
            Strlen | Substr | Ucase | Lcase | StrStarts | StrEnds | Contains | StrBefore
            | StrAfter | EncodeForUri | Concat | Regex | StrReplace => OperKind::String,
            Abs | Round | Ceil | Floor | Rand => OperKind::Numeric,
            Now | Year | Month | Day | Hours | Minutes | Seconds | Timezone | Tz => OperKind::Date,
            Hash => OperKind::Hash,
            Count | Sum | Avg | Min | Max | Sample | GroupConcat => OperKind::Aggregate,
            PathLength | Depth | Index | Similarity | Graph | Skolem | IsSkolem => {
                OperKind::Introspection
            }
            ApplyTemplates | CallTemplate | Turtle | Format | Nl | Indent | Display => {
                OperKind::Template
            }
            Cast => OperKind::Cast,
            External => OperKind::External,
            Function => OperKind::Function,
            Star | Plus | ZeroOrOne | Counted | Sequence | Alternative | Inverse | Negation
            | Short | ShortAll | All | PathDistinct | DepthFirst | BreadthFirst => OperKind::Path,
        }
    }

    /// Check if this is an aggregate.
    pub fn is_aggregate(self) -> bool {
        self.kind() == OperKind::Aggregate
    }

    /// Check if this is a property path operator.
    pub fn is_path(self) -> bool {
        self.kind() == OperKind::Path
    }

    /// Check if this is a path modifier peeled off by the path compiler.
    pub fn is_path_modifier(self) -> bool {
        matches!(
            self,
            Oper::Inverse
                | Oper::Short
                | Oper::ShortAll
                | Oper::All
                | Oper::PathDistinct
                | Oper::DepthFirst
                | Oper::BreadthFirst
        )
    }

    /// Check if this is a path repetition (`*`, `+`, `?`, `{m,n}`).
    pub fn is_repetition(self) -> bool {
        matches!(
            self,
            Oper::Star | Oper::Plus | Oper::ZeroOrOne | Oper::Counted
        )
    }

    /// Accepted argument counts, or `None` when the call shape decides
    /// (undefined, external and user-defined functions).
    pub fn arity(self) -> Option<Arity> {
        use Oper::*;
        let arity = match self {
            Undef | External | Function => return None,
            And | Or | Eq | Ne | Lt | Le | Gt | Ge | Mult | Div => Arity::exactly(2),
            Add | Sub => Arity::range(1, 2),
            Not => Arity::exactly(1),
            In | NotIn => Arity::at_least(1),
            Bound | IsIri | IsBlank | IsLiteral | IsNumeric | Str | Lang | Datatype | Iri => {
                Arity::exactly(1)
            }
            BNode => Arity::range(0, 1),
            StrDt | StrLang | LangMatches | SameTerm => Arity::exactly(2),
            If => Arity::exactly(3),
            Coalesce => Arity::at_least(0),
            Uuid | StrUuid | Exist | NotExist => Arity::exactly(0),
            Strlen | Ucase | Lcase | EncodeForUri => Arity::exactly(1),
            Substr => Arity::range(2, 3),
            StrStarts | StrEnds | Contains | StrBefore | StrAfter => Arity::exactly(2),
            Concat => Arity::at_least(0),
            Regex => Arity::range(2, 3),
            StrReplace => Arity::range(3, 4),
            Abs | Round | Ceil | Floor => Arity::exactly(1),
            Rand | Now => Arity::exactly(0),
            Year | Month | Day | Hours | Minutes | Seconds | Timezone | Tz => Arity::exactly(1),
            Hash => Arity::exactly(1),
            Count => Arity::range(0, 1),
            Sum | Avg | Min | Max | Sample | GroupConcat => Arity::exactly(1),
            PathLength | Depth | Index | Skolem | IsSkolem => Arity::exactly(1),
            Similarity => Arity::range(0, 2),
            Graph => Arity::exactly(0),
            ApplyTemplates => Arity::at_least(0),
            CallTemplate | Format => Arity::at_least(1),
            Turtle | Indent | Display => Arity::exactly(1),
            Nl => Arity::range(0, 1),
            // written by the cast rewrite: (value, datatype, marker)
            Cast => Arity::exactly(3),
            Star | Plus | ZeroOrOne | Counted | Inverse | Negation | Short | ShortAll | All
            | PathDistinct | DepthFirst | BreadthFirst => Arity::at_least(1),
            Sequence | Alternative => Arity::at_least(2),
        };
        Some(arity)
    }
}

impl std::fmt::Display for Oper {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}({})", self, self.code())
    }
}

static TABLE: Lazy<HashMap<&'static str, Oper>> = Lazy::new(|| {
    use Oper::*;
    let entries: &[(&'static str, Oper)] = &[
        // boolean and comparison
        ("&&", And),
        ("and", And),
        ("||", Or),
        ("or", Or),
        ("!", Not),
        ("not", Not),
        ("=", Eq),
        ("!=", Ne),
        ("<", Lt),
        ("<=", Le),
        (">", Gt),
        (">=", Ge),
        ("in", In),
        ("not in", NotIn),
        ("notin", NotIn),
        // arithmetic
        ("+", Add),
        ("-", Sub),
        ("*", Mult),
        ("/", Div),
        // term
        ("bound", Bound),
        ("isiri", IsIri),
        ("isuri", IsIri),
        ("isblank", IsBlank),
        ("isliteral", IsLiteral),
        ("isnumeric", IsNumeric),
        ("str", Str),
        ("lang", Lang),
        ("datatype", Datatype),
        ("iri", Iri),
        ("uri", Iri),
        ("bnode", BNode),
        ("strdt", StrDt),
        ("strlang", StrLang),
        ("langmatches", LangMatches),
        ("sameterm", SameTerm),
        ("if", If),
        ("coalesce", Coalesce),
        ("uuid", Uuid),
        ("struuid", StrUuid),
        ("exists", Exist),
        ("not exists", NotExist),
        // string
        ("strlen", Strlen),
        ("substr", Substr),
        ("ucase", Ucase),
        ("lcase", Lcase),
        ("strstarts", StrStarts),
        ("strends", StrEnds),
        ("contains", Contains),
        ("strbefore", StrBefore),
        ("strafter", StrAfter),
        ("encode_for_uri", EncodeForUri),
        ("concat", Concat),
        ("regex", Regex),
        ("replace", StrReplace),
        // numeric
        ("abs", Abs),
        ("round", Round),
        ("ceil", Ceil),
        ("floor", Floor),
        ("rand", Rand),
        // date/time
        ("now", Now),
        ("year", Year),
        ("month", Month),
        ("day", Day),
        ("hours", Hours),
        ("minutes", Minutes),
        ("seconds", Seconds),
        ("timezone", Timezone),
        ("tz", Tz),
        // hash
        ("md5", Hash),
        ("sha1", Hash),
        ("sha256", Hash),
        ("sha384", Hash),
        ("sha512", Hash),
        // aggregates
        ("count", Count),
        ("sum", Sum),
        ("avg", Avg),
        ("min", Min),
        ("max", Max),
        ("sample", Sample),
        ("group_concat", GroupConcat),
        // path, graph, introspection
        ("pathlength", PathLength),
        ("depth", Depth),
        ("index", Index),
        ("similarity", Similarity),
        ("graph", Graph),
        ("skolem", Skolem),
        ("isskolem", IsSkolem),
        // templates and pretty-printing
        ("apply-templates", ApplyTemplates),
        ("call-template", CallTemplate),
        ("turtle", Turtle),
        ("format", Format),
        ("nl", Nl),
        ("indent", Indent),
        ("display", Display),
    ];
    entries.iter().copied().collect()
});

/// Look up a name in the built-in table (case-insensitive, no fallback).
pub fn lookup(name: &str) -> Option<Oper> {
    TABLE.get(name.to_lowercase().as_str()).copied()
}

/// Resolve a function or operator name to its code.
///
/// Never fails: names that match nothing resolve to [`Oper::Undef`].
pub fn resolve(name: &str) -> Oper {
    if let Some(oper) = lookup(name) {
        return oper;
    }
    if let Some(local) = strip_prefix_ignore_case(name, ns::FUNCTION) {
        if let Some(oper) = lookup(local) {
            return oper;
        }
    }
    if starts_with_ignore_case(name, ns::XSD) || starts_with_ignore_case(name, ns::RDF) {
        return Oper::Cast;
    }
    if starts_with_ignore_case(name, ns::EXTENSION) {
        return Oper::External;
    }
    Oper::Undef
}

/// Digest algorithm name for a hash function name (`sha256` -> `SHA-256`).
pub fn hash_algorithm(name: &str) -> Option<&'static str> {
    let local = strip_prefix_ignore_case(name, ns::FUNCTION).unwrap_or(name);
    match local.to_lowercase().as_str() {
        "md5" => Some("MD5"),
        "sha1" => Some("SHA-1"),
        "sha256" => Some("SHA-256"),
        "sha384" => Some("SHA-384"),
        "sha512" => Some("SHA-512"),
        _ => None,
    }
}

/// Property path operator for a surface symbol or modifier keyword.
pub fn path_operator(symbol: &str) -> Option<Oper> {
    let oper = match symbol.to_lowercase().as_str() {
        "*" => Oper::Star,
        "+" => Oper::Plus,
        "?" => Oper::ZeroOrOne,
        "/" => Oper::Sequence,
        "|" => Oper::Alternative,
        "^" => Oper::Inverse,
        "!" => Oper::Negation,
        "short" => Oper::Short,
        "shortall" => Oper::ShortAll,
        "all" => Oper::All,
        "distinct" => Oper::PathDistinct,
        "depth" => Oper::DepthFirst,
        "breadth" => Oper::BreadthFirst,
        _ => return None,
    };
    Some(oper)
}

fn starts_with_ignore_case(name: &str, prefix: &str) -> bool {
    strip_prefix_ignore_case(name, prefix).is_some()
}

fn strip_prefix_ignore_case<'a>(name: &'a str, prefix: &str) -> Option<&'a str> {
    let head = name.get(..prefix.len())?;
    if head.eq_ignore_ascii_case(prefix) {
        name.get(prefix.len()..)
    } else {
        None
    }
}
