//! The result of a successful resolve.

use std::fmt;

use crate::error::UnresolvedDependencyError;

/// Sources in dependency order, plus who depends on whom.
#[derive(Debug)]
pub struct Resolution<S> {
    ordered: Vec<S>,
    /// Providers of each position, as ascending positions in `ordered`.
    depends_on: Vec<Vec<usize>>,
    unresolved: Option<UnresolvedDependencyError>,
}

impl<S> Resolution<S> {
    pub(crate) fn new(
        ordered: Vec<S>,
        depends_on: Vec<Vec<usize>>,
        unresolved: Option<UnresolvedDependencyError>,
    ) -> Self {
        Self {
            ordered,
            depends_on,
            unresolved,
        }
    }

    /// Sources such that every provider precedes its dependents.
    pub fn ordered(&self) -> &[S] {
        &self.ordered
    }

    pub fn into_ordered(self) -> Vec<S> {
        self.ordered
    }

    pub fn iter(&self) -> std::slice::Iter<'_, S> {
        self.ordered.iter()
    }

    pub fn len(&self) -> usize {
        self.ordered.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ordered.is_empty()
    }

    /// Direct providers of the source at `position`, in order.
    pub fn depends_on(&self, position: usize) -> Vec<&S> {
        self.depends_on
            .get(position)
            .map(|providers| providers.iter().map(|&p| &self.ordered[p]).collect())
            .unwrap_or_default()
    }

    /// Position of `source` in the order, by identity.
    ///
    /// `source` must be a reference into this resolution (e.g. from
    /// [`Resolution::iter`]); an equal value held elsewhere is not found.
    pub fn position_of(&self, source: &S) -> Option<usize> {
        self.ordered.iter().position(|s| std::ptr::eq(s, source))
    }

    /// Direct providers of `source`, which must belong to this resolution.
    pub fn depends_on_of(&self, source: &S) -> Option<Vec<&S>> {
        self.position_of(source).map(|p| self.depends_on(p))
    }

    /// The unresolved dependencies that were reported as a warning instead
    /// of failing. Always `None` in strict mode.
    pub fn unresolved(&self) -> Option<&UnresolvedDependencyError> {
        self.unresolved.as_ref()
    }
}

impl<S: fmt::Display> Resolution<S> {
    /// Print each source in order with its direct providers beneath it.
    pub fn render_tree(&self) -> String {
        let mut output = String::new();
        for (position, source) in self.ordered.iter().enumerate() {
            output.push_str(&format!("{source}\n"));
            let providers = &self.depends_on[position];
            let count = providers.len();
            for (i, &p) in providers.iter().enumerate() {
                let connector = if i == count - 1 { "└── " } else { "├── " };
                output.push_str(&format!("{connector}{}\n", self.ordered[p]));
            }
        }
        output
    }
}

impl<'a, S> IntoIterator for &'a Resolution<S> {
    type Item = &'a S;
    type IntoIter = std::slice::Iter<'a, S>;

    fn into_iter(self) -> Self::IntoIter {
        self.ordered.iter()
    }
}
