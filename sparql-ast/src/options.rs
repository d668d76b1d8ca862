//! Compilation options.

use serde::{Deserialize, Serialize};

/// How the execution engine evaluates property paths.
///
/// Controls what the path compiler does with an inverse modifier peeled off
/// the outside of a path expression.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathEvaluation {
    /// Path algebra evaluation: the peeled inverse is also re-applied as an
    /// explicit `^` wrapper around the core path.
    #[default]
    Algebra,
    /// Legacy evaluation driven by the triple's mode string only.
    Legacy,
}

/// Options for building and compiling one query.
///
/// Subqueries inherit the options of the query they are created from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompileOptions {
    /// Fail on the first correctness error instead of collecting them
    pub strict: bool,
    /// Property path evaluation strategy
    pub path_evaluation: PathEvaluation,
    /// Compile literal regex/replace patterns when the call is created
    pub precompile_regex: bool,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            strict: false,
            path_evaluation: PathEvaluation::Algebra,
            precompile_regex: true,
        }
    }
}

impl CompileOptions {
    /// Options that fail fast on the first correctness error.
    pub fn strict() -> Self {
        Self {
            strict: true,
            ..Self::default()
        }
    }

    /// Set the path evaluation strategy.
    pub fn with_path_evaluation(mut self, mode: PathEvaluation) -> Self {
        self.path_evaluation = mode;
        self
    }
}
