//! # SPARQL AST
//!
//! The typed middle layer between a SPARQL 1.1 grammar and an execution
//! engine:
//! - Factory operations that build variables, constants, calls, property
//!   paths and graph patterns
//! - Operator resolution from surface names to stable [`Oper`] codes
//! - Per-call compilation (arity, CAST rewrite, regex precompilation)
//! - Property path algebra with `{min,max}` bounds and traversal modes
//! - Whole-query shape compilation for ASK, CONSTRUCT, DESCRIBE and updates
//! - Scope and blank-node validation with collected [`Diagnostic`]s
//!
//! ## Pipeline
//!
//! 1. **Build**: the grammar calls `create_*` / `set_*` on an [`AstQuery`]
//! 2. **Compile**: [`AstQuery::compile`] rewrites the query shape and resolves
//!    calls to user-defined functions
//! 3. **Validate**: [`AstQuery::validate`] checks scoping rules
//!
//! Correctness problems never abort a pass; they land in
//! [`AstQuery::errors`] and clear [`AstQuery::is_correct`]. With
//! [`CompileOptions::strict`] the first one is returned as
//! [`AstError::Strict`] instead.
//!
//! ## Quick Start
//!
//! ```
//! use sparql_ast::{Atom, AstQuery, ResultForm};
//!
//! let mut q = AstQuery::new();
//! q.set_result_form(ResultForm::Ask);
//! let s = q.create_variable("s");
//! let p = q.create_iri("<http://example.org/p>");
//! let o = q.create_variable("o");
//! let t = q.create_triple(s, Atom::new(p), o).unwrap();
//! let body = q.create_bgp(vec![t]);
//! q.set_body(body).unwrap();
//!
//! q.compile().unwrap();
//! assert!(q.validate().unwrap());
//! assert_eq!(q.max_result(), 1);
//! ```

pub mod ast;
pub mod compile;
pub mod diag;
pub mod error;
pub mod external;
pub mod namespace;
pub mod oper;
pub mod options;
pub mod validate;

// Re-exports
pub use ast::{
    Atom, AstQuery, Constant, Exp, ExpId, Expression, PathBounds, PathSpec, ResultForm, Term,
    UpdateData, ValuesTable, Variable,
};
pub use diag::{DiagCode, Diagnostic, Severity};
pub use error::{AstError, Result};
pub use external::ExternalRegistry;
pub use namespace::{NamespaceManager, PrefixMap};
pub use oper::Oper;
pub use options::{CompileOptions, PathEvaluation};
