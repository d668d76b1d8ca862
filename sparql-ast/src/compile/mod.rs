//! Compilation passes.
//!
//! - [`function`]: per-call compilation, run as calls are created
//! - [`path`]: property path algebra, run as path triples are created
//! - `shape`: whole-query rewriting, run by [`AstQuery::compile`]
//!
//! [`AstQuery::compile`]: crate::AstQuery::compile

pub mod function;
pub mod path;
mod shape;

pub use function::{anchor_pattern, build_regex, cast_marker, split_external};
pub use path::PathCompiler;
