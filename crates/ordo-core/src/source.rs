//! The capability contract between the resolver and the units it orders.

use std::fmt;

/// Error type returned by caller-supplied capability hooks.
pub type HookError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// A requirement one source places on some other source in the same set.
///
/// The `Display` impl is the human-readable description used when the
/// dependency cannot be satisfied.
pub trait Dependency<S: ?Sized>: fmt::Display {
    /// Whether `candidate` satisfies this dependency.
    ///
    /// The resolver never offers the owning source as a candidate.
    fn satisfied_by(&self, candidate: &S) -> bool;
}

/// A unit participating in dependency resolution.
///
/// The resolver treats sources as opaque beyond their declared dependencies.
/// Each registered source is a distinct graph vertex even when two sources
/// compare equal. The `Display` impl names the source in error messages.
///
/// The two hook methods are optional capabilities: the defaults do nothing,
/// so a source opts in by overriding them.
pub trait Source: fmt::Display + Sized {
    /// The dependency descriptor type this source declares.
    type Dep: Dependency<Self>;

    /// Dependencies this source requires some other source to satisfy.
    fn dependencies(&self) -> Vec<Self::Dep>;

    /// Depends-on capability: receives the sources this one was resolved to
    /// depend on. Called once per source after every edge was inserted.
    fn set_depends_on(&mut self, _providers: &[&Self]) -> Result<(), HookError> {
        Ok(())
    }

    /// Unresolved-dependency capability: receives the dependencies no other
    /// source satisfied. Only called for sources with at least one.
    fn set_unresolved_dependencies(&mut self, _missing: &[Self::Dep]) -> Result<(), HookError> {
        Ok(())
    }
}
