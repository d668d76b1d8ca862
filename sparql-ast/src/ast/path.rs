//! Property path bounds and compiled path descriptors.
//!
//! | Syntax | Bounds | Flag |
//! |--------|--------|------|
//! | `p*` | `{0, MAX}` | |
//! | `p+` | `{1, MAX}` | plus |
//! | `p?` | `{0, 1}` | |
//! | `p{m,n}` | `{m, n}` | count |
//! | `p{,n}` | `{0, n}` | count |
//! | `p{m,}` | `{m, MAX}` | count |
//! | `p` | `{1, 1}` | |

use super::expr::Expression;
use serde::{Deserialize, Serialize};

/// Unbounded repetition.
pub const MAX_BOUND: u32 = u32::MAX;

/// Which syntactic repetition produced a set of bounds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RepeatKind {
    /// No repetition: exactly one hop
    Once,
    /// `*`
    Star,
    /// `+`: at least one hop, loop-checked
    Plus,
    /// `?`: optional single hop
    ZeroOrOne,
    /// `{m,n}`: explicit counting semantics
    Counted,
}

/// Resolved `{min, max}` bounds of a path step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathBounds {
    pub min: u32,
    pub max: u32,
    pub kind: RepeatKind,
}

impl PathBounds {
    /// Exactly one hop.
    pub const fn once() -> Self {
        Self {
            min: 1,
            max: 1,
            kind: RepeatKind::Once,
        }
    }

    /// `*`
    pub const fn star() -> Self {
        Self {
            min: 0,
            max: MAX_BOUND,
            kind: RepeatKind::Star,
        }
    }

    /// `+`
    pub const fn plus() -> Self {
        Self {
            min: 1,
            max: MAX_BOUND,
            kind: RepeatKind::Plus,
        }
    }

    /// `?`
    pub const fn zero_or_one() -> Self {
        Self {
            min: 0,
            max: 1,
            kind: RepeatKind::ZeroOrOne,
        }
    }

    /// `{min,max}`. Caller guarantees `min <= max`.
    pub const fn counted(min: u32, max: u32) -> Self {
        Self {
            min,
            max,
            kind: RepeatKind::Counted,
        }
    }

    /// The `+` flag: at least one edge must be traversed.
    pub fn is_plus(&self) -> bool {
        self.kind == RepeatKind::Plus
    }

    /// The count flag: bounds came from an explicit `{m,n}`.
    pub fn is_count(&self) -> bool {
        self.kind == RepeatKind::Counted
    }

    pub fn is_unbounded(&self) -> bool {
        self.max == MAX_BOUND
    }
}

impl std::fmt::Display for PathBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.kind {
            RepeatKind::Once => Ok(()),
            RepeatKind::Star => write!(f, "*"),
            RepeatKind::Plus => write!(f, "+"),
            RepeatKind::ZeroOrOne => write!(f, "?"),
            RepeatKind::Counted if self.is_unbounded() => write!(f, "{{{},}}", self.min),
            RepeatKind::Counted => write!(f, "{{{},{}}}", self.min, self.max),
        }
    }
}

/// Path state attached to a triple whose predicate is a property path.
#[derive(Clone, Debug, PartialEq)]
pub struct PathSpec {
    /// Normalized path expression with modifiers peeled off
    pub regex: Expression,
    /// Accumulated modifier characters, outer to inner
    /// (`i` inverse, `s` short, `sa` short-all, `a` all, `d` depth-first,
    /// `b` breadth-first)
    pub mode: String,
    /// Bounds of the core path step
    pub bounds: PathBounds,
    /// A `distinct` modifier was peeled
    pub distinct: bool,
}

impl PathSpec {
    /// Check whether the mode string records an inverse modifier.
    pub fn is_inverse(&self) -> bool {
        self.mode.contains('i')
    }

    pub fn is_short(&self) -> bool {
        self.mode.contains('s')
    }
}
