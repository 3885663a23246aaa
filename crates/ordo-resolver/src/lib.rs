//! Dependency resolution engine: orders a set of sources so every source
//! comes after the sources it depends on, detects cycles, and reports
//! dependencies nothing in the set satisfies.

pub mod error;
mod graph;
pub mod resolution;
pub mod resolver;

pub use error::{CyclicDependencyError, ResolveError, UnresolvedDependencyError, UnresolvedEntry};
pub use ordo_core::source::{Dependency, HookError, Source};
pub use resolution::Resolution;
pub use resolver::Resolver;
