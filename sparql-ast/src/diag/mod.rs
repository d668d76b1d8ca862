//! Diagnostic types for AST compilation and validation.
//!
//! Correctness problems found while building, compiling or validating a
//! query never abort the pass. They are collected as [`Diagnostic`]s on the
//! owning [`AstQuery`](crate::AstQuery) so that a single pass reports all of
//! them. Each diagnostic carries:
//! - a stable error code for programmatic handling
//! - the subject it concerns (a variable, a blank-node label, a function name)
//! - optional help text and notes
//! - JSON serialization for API responses

use serde::{Deserialize, Serialize};

/// Diagnostic severity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// The query must not be executed
    Error,
    /// The query can execute but may not do what was intended
    Warning,
    /// Informational note
    Note,
}

impl Severity {
    /// Check if this severity is an error.
    pub fn is_error(self) -> bool {
        matches!(self, Severity::Error)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Note => write!(f, "note"),
        }
    }
}

/// Stable codes for diagnostics.
///
/// Organized by category:
/// - `Q0xx`: query scope and shape errors
/// - `F0xx`: function compilation errors
/// - `P0xx`: property path errors
/// - `W0xx`: warnings
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[non_exhaustive]
pub enum DiagCode {
    // =========================================================================
    // Scope and shape (Q001-Q099)
    // =========================================================================
    /// `SELECT (expr AS ?v)` where `?v` is already bound
    #[serde(rename = "Q001")]
    DuplicateSelectBinding,

    /// Blank node label shared by two basic graph patterns
    #[serde(rename = "Q002")]
    BlankNodeScope,

    /// `BIND(expr AS ?v)` where `?v` is already bound in the group
    #[serde(rename = "Q003")]
    BindScope,

    /// Plain SELECT variable that is not a GROUP BY key in a grouped query
    #[serde(rename = "Q006")]
    NonGroupKeyVariable,

    /// VALUES row with the wrong number of cells
    #[serde(rename = "Q008")]
    ValuesArity,

    /// Prefixed name whose prefix is not declared
    #[serde(rename = "Q009")]
    UndefinedPrefix,

    /// Variable inside INSERT DATA / DELETE DATA
    #[serde(rename = "Q010")]
    VariableInGroundData,

    /// Blank node inside DELETE DATA
    #[serde(rename = "Q011")]
    BlankNodeInDeleteData,

    // =========================================================================
    // Function compilation (F001-F099)
    // =========================================================================
    /// Function name with no built-in operator and no definition
    #[serde(rename = "F001")]
    UndefinedFunction,

    /// Aggregate called with the wrong number of arguments
    #[serde(rename = "F002")]
    AggregateArity,

    /// Built-in or user function called with the wrong number of arguments
    #[serde(rename = "F003")]
    FunctionArity,

    /// Aggregate nested inside another aggregate
    #[serde(rename = "F004")]
    NestedAggregate,

    /// Literal regex pattern or flags that do not compile
    #[serde(rename = "F005")]
    InvalidRegex,

    /// External function name without a `module.member` shape
    #[serde(rename = "F006")]
    MalformedExternalCall,

    // =========================================================================
    // Property paths (P001-P099)
    // =========================================================================
    /// Path step that is neither an IRI nor a path operator
    #[serde(rename = "P001")]
    InvalidPathStep,

    // =========================================================================
    // Warnings (W001-W099)
    // =========================================================================
    /// Projected variable never bound by the query body
    #[serde(rename = "W001")]
    UnboundSelectVariable,
}

impl DiagCode {
    /// Get the string code (e.g., "Q001", "F002").
    pub fn code(&self) -> &'static str {
        match self {
            Self::DuplicateSelectBinding => "Q001",
            Self::BlankNodeScope => "Q002",
            Self::BindScope => "Q003",
            Self::NonGroupKeyVariable => "Q006",
            Self::ValuesArity => "Q008",
            Self::UndefinedPrefix => "Q009",
            Self::VariableInGroundData => "Q010",
            Self::BlankNodeInDeleteData => "Q011",
            Self::UndefinedFunction => "F001",
            Self::AggregateArity => "F002",
            Self::FunctionArity => "F003",
            Self::NestedAggregate => "F004",
            Self::InvalidRegex => "F005",
            Self::MalformedExternalCall => "F006",
            Self::InvalidPathStep => "P001",
            Self::UnboundSelectVariable => "W001",
        }
    }

    /// Get the default severity for this code.
    pub fn default_severity(&self) -> Severity {
        match self {
            Self::UnboundSelectVariable => Severity::Warning,
            _ => Severity::Error,
        }
    }
}

impl std::fmt::Display for DiagCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// A diagnostic message produced while compiling or validating a query.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable error code
    pub code: DiagCode,

    /// Severity level
    pub severity: Severity,

    /// Primary message (one sentence)
    pub message: String,

    /// What the diagnostic is about, in surface syntax (`?x`, `_:b`, `count`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,

    /// Suggested fix or rewrite
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,

    /// Additional context or explanation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic with the code's default severity.
    pub fn new(code: DiagCode, message: impl Into<String>) -> Self {
        Self {
            severity: code.default_severity(),
            code,
            message: message.into(),
            subject: None,
            help: None,
            note: None,
        }
    }

    /// Create an error diagnostic.
    pub fn error(code: DiagCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            ..Self::new(code, message)
        }
    }

    /// Create a warning diagnostic.
    pub fn warning(code: DiagCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::new(code, message)
        }
    }

    /// Set the subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Add help text.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Add a note.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Check if this diagnostic is an error.
    pub fn is_error(&self) -> bool {
        self.severity.is_error()
    }

    /// Check if this diagnostic is a warning.
    pub fn is_warning(&self) -> bool {
        matches!(self.severity, Severity::Warning)
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.code, self.message)?;
        if let Some(help) = &self.help {
            write!(f, " (help: {})", help)?;
        }
        Ok(())
    }
}
