//! Namespace resolution collaborator.
//!
//! The compiler never expands prefixed names itself. Every prefixed name
//! goes through a [`NamespaceManager`] injected when the query is created.
//! [`PrefixMap`] is the bundled implementation: a PREFIX/BASE style table
//! preloaded with the standard vocabularies.

use sparql_vocab::ns;
use std::collections::HashMap;

/// Expands prefixed names to full IRIs.
pub trait NamespaceManager: Send + Sync + std::fmt::Debug {
    /// Expand `prefix:local`, or `None` if the prefix is not declared.
    fn expand(&self, prefix: &str, local: &str) -> Option<String>;

    /// Resolve a relative IRI against the base, if one is declared.
    fn resolve_relative(&self, iri: &str) -> String {
        iri.to_string()
    }
}

/// Prefix declarations plus an optional base IRI.
#[derive(Clone, Debug)]
pub struct PrefixMap {
    base: Option<String>,
    prefixes: HashMap<String, String>,
}

impl Default for PrefixMap {
    fn default() -> Self {
        let prefixes = ns::DEFAULT_PREFIXES
            .iter()
            .map(|(p, iri)| (p.to_string(), iri.to_string()))
            .collect();
        Self {
            base: None,
            prefixes,
        }
    }
}

impl PrefixMap {
    /// Create a prefix map with the standard prefixes.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a prefix map with no declarations at all.
    pub fn empty() -> Self {
        Self {
            base: None,
            prefixes: HashMap::new(),
        }
    }

    /// Declare (or redeclare) a prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>, iri: impl Into<String>) -> Self {
        self.prefixes.insert(prefix.into(), iri.into());
        self
    }

    /// Declare the base IRI.
    pub fn with_base(mut self, base: impl Into<String>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Look up a prefix namespace.
    pub fn get_prefix(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(String::as_str)
    }
}

impl NamespaceManager for PrefixMap {
    fn expand(&self, prefix: &str, local: &str) -> Option<String> {
        self.get_prefix(prefix).map(|ns| format!("{}{}", ns, local))
    }

    fn resolve_relative(&self, iri: &str) -> String {
        match &self.base {
            Some(base) if !iri.contains(':') => format!("{}{}", base, iri),
            _ => iri.to_string(),
        }
    }
}

/// Split a prefixed name into `(prefix, local)`.
///
/// Returns `None` for full IRIs (anything containing `://`) and for names
/// with no colon.
pub fn split_qname(name: &str) -> Option<(&str, &str)> {
    if name.contains("://") {
        return None;
    }
    name.split_once(':')
}
