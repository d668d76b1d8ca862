//! Query node model.
//!
//! ## Module Structure
//!
//! - [`expr`]: variables, constants and function terms
//! - [`path`]: repetition bounds and compiled property paths
//! - [`pattern`]: graph patterns and the arena that owns them
//! - [`query`]: the query root, SELECT list and solution modifiers
//!
//! Nodes are built through the factory methods on [`AstQuery`].

pub mod expr;
mod factory;
pub mod path;
pub mod pattern;
pub mod query;

pub use expr::{
    CompiledRegex, Constant, ConstantKind, Expression, ExternalTarget, Term, VarScope, Variable,
};
pub use path::{PathBounds, PathSpec, RepeatKind, MAX_BOUND};
pub use pattern::{Atom, Exp, ExpArena, ExpId, RdfList, Triple, ValuesTable};
pub use query::{AstQuery, FunctionDef, OrderCondition, ResultForm, SelectItem, UpdateData};
