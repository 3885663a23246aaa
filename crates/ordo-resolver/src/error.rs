//! Structured resolution failures.

use miette::Diagnostic;
use ordo_core::source::HookError;
use thiserror::Error;

/// Why a call to [`crate::Resolver::resolve`] failed.
#[derive(Debug, Error, Diagnostic)]
pub enum ResolveError {
    /// Inserting a dependency edge would have closed a cycle.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Cyclic(#[from] CyclicDependencyError),

    /// Strict mode and at least one dependency had no provider.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Unresolved(#[from] UnresolvedDependencyError),

    /// A source's capability hook returned an error.
    #[error("Capability hook failed for `{source_name}`")]
    #[diagnostic(help("The source rejected the dependencies it was resolved with"))]
    Hook {
        source_name: String,
        #[source]
        cause: HookError,
    },
}

/// A chain of sources that depend on each other in a loop.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("Cyclic dependency: {}", .chain.join(" --> "))]
#[diagnostic(help("Remove one of the dependencies along the chain"))]
pub struct CyclicDependencyError {
    chain: Vec<String>,
}

impl CyclicDependencyError {
    /// `chain` starts and ends with the same source.
    pub fn new(chain: Vec<String>) -> Self {
        Self { chain }
    }

    /// Source names along the cycle; the first name is repeated at the end.
    pub fn chain(&self) -> &[String] {
        &self.chain
    }

    pub fn involves(&self, name: &str) -> bool {
        self.chain.iter().any(|n| n == name)
    }
}

/// A source and the dependencies of it that nothing satisfied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnresolvedEntry {
    /// Registration slot of the source, unique even when names repeat.
    pub slot: usize,
    pub source_name: String,
    pub dependencies: Vec<String>,
}

/// Every source with at least one dependency no other source satisfies.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
#[error("{}", render_unresolved(.entries))]
#[diagnostic(help(
    "Add a source that satisfies each dependency, or enable warn-on-missing-dependencies"
))]
pub struct UnresolvedDependencyError {
    entries: Vec<UnresolvedEntry>,
}

impl UnresolvedDependencyError {
    pub fn new(entries: Vec<UnresolvedEntry>) -> Self {
        Self { entries }
    }

    /// Affected sources, in registration order.
    pub fn entries(&self) -> &[UnresolvedEntry] {
        &self.entries
    }

    /// Total number of missing dependencies across all sources.
    pub fn count(&self) -> usize {
        self.entries.iter().map(|e| e.dependencies.len()).sum()
    }

    /// Missing dependency descriptions for the source registered in `slot`.
    pub fn missing_at(&self, slot: usize) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|e| e.slot == slot)
            .map(|e| e.dependencies.as_slice())
    }

    /// Missing dependency descriptions for the first source named `source_name`.
    ///
    /// Names need not be unique; use [`Self::missing_at`] to tell apart
    /// sources that share one.
    pub fn missing_for(&self, source_name: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|e| e.source_name == source_name)
            .map(|e| e.dependencies.as_slice())
    }
}

fn render_unresolved(entries: &[UnresolvedEntry]) -> String {
    let count: usize = entries.iter().map(|e| e.dependencies.len()).sum();
    let noun = if count == 1 {
        "dependency"
    } else {
        "dependencies"
    };
    let mut out = format!("Found {count} unresolved {noun}:");
    for entry in entries {
        out.push_str(&format!(
            "\n  {}: {}",
            entry.source_name,
            entry.dependencies.join(", ")
        ));
    }
    out
}
