//! External function registry.
//!
//! Calls written as `<function://module.path.member>(...)` compile to
//! [`Oper::External`](crate::Oper::External) with an [`ExternalTarget`]
//! attached to the term. The compiler never looks the target up; an
//! execution engine registers its callables here and resolves each target
//! when it evaluates the call.

use crate::ast::expr::ExternalTarget;
use std::collections::HashMap;
use std::sync::Arc;

/// Table of externally bound functions keyed by `(module path, member)`.
///
/// `F` is whatever callable shape the engine evaluates with, typically a
/// boxed closure or function pointer.
#[derive(Debug)]
pub struct ExternalRegistry<F> {
    functions: HashMap<(Arc<str>, Arc<str>), F>,
}

impl<F> Default for ExternalRegistry<F> {
    fn default() -> Self {
        Self {
            functions: HashMap::new(),
        }
    }
}

impl<F> ExternalRegistry<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `f` as `module.member`, returning the callable it replaces.
    pub fn register(&mut self, module: &str, member: &str, f: F) -> Option<F> {
        tracing::trace!(module, member, "registered external function");
        self.functions
            .insert((Arc::from(module), Arc::from(member)), f)
    }

    /// Look up the callable for a compiled external call.
    pub fn resolve(&self, target: &ExternalTarget) -> Option<&F> {
        self.functions
            .get(&(Arc::clone(&target.module), Arc::clone(&target.member)))
    }

    pub fn contains(&self, target: &ExternalTarget) -> bool {
        self.resolve(target).is_some()
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}
