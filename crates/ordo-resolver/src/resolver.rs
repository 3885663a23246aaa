//! Core resolution algorithm: edge construction with incremental cycle
//! checks, unresolved dependency policy, and deterministic ordering.

use ordo_core::config::ResolverConfig;
use ordo_core::source::{Dependency, Source};

use crate::error::{CyclicDependencyError, ResolveError, UnresolvedDependencyError, UnresolvedEntry};
use crate::graph::SourceGraph;
use crate::resolution::Resolution;

/// Accumulates sources and orders them by their dependencies.
///
/// Each source is keyed by the slot it was added in, so two sources that
/// compare equal are still separate vertices. `add` takes ownership, which
/// makes registering one instance twice impossible as long as the source
/// owns its identity. `resolve` consumes the resolver; build a new one to
/// resolve again.
pub struct Resolver<S> {
    sources: Vec<S>,
    config: ResolverConfig,
}

impl<S: Source> Resolver<S> {
    /// A strict resolver.
    pub fn new() -> Self {
        Self::with_config(ResolverConfig::default())
    }

    pub fn with_config(config: ResolverConfig) -> Self {
        Self {
            sources: Vec::new(),
            config,
        }
    }

    /// Whether unresolved dependencies are only logged as a warning.
    pub fn warn_on_missing_dependencies(mut self, warn: bool) -> Self {
        self.config.warn_on_missing_dependencies = warn;
        self
    }

    pub fn config(&self) -> ResolverConfig {
        self.config
    }

    /// Register a source.
    ///
    /// Ownership is the only duplicate check. A source that is a cloneable
    /// handle to shared state (an `Rc<RefCell<_>>` newtype, say) can be added
    /// once per clone, and each clone then becomes its own vertex able to
    /// satisfy the others' dependencies.
    pub fn add(&mut self, source: S) -> &mut Self {
        tracing::trace!("registered `{source}` in slot {}", self.sources.len());
        self.sources.push(source);
        self
    }

    /// Register several sources, preserving their iteration order.
    pub fn add_all(&mut self, sources: impl IntoIterator<Item = S>) -> &mut Self {
        for source in sources {
            self.add(source);
        }
        self
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Order the registered sources so that providers precede dependents.
    ///
    /// Whenever several sources have all their providers placed, the one
    /// registered first goes next, so the result depends only on `add` order.
    /// Capability hooks run here: first the depends-on hook of every source,
    /// in registration order, then the unresolved-dependency hook of every
    /// source that has missing dependencies.
    ///
    /// # Panics
    ///
    /// Panics if no source was added.
    pub fn resolve(self) -> Result<Resolution<S>, ResolveError> {
        assert!(
            !self.sources.is_empty(),
            "Resolver::resolve called before any source was added"
        );
        let Resolver {
            mut sources,
            config,
        } = self;

        let (graph, unresolved) = build_graph(&sources)?;
        tracing::debug!(
            "dependency graph has {} vertices and {} edges",
            graph.vertex_count(),
            graph.edge_count()
        );

        let providers: Vec<Vec<usize>> = (0..sources.len()).map(|s| graph.providers(s)).collect();
        for (slot, slot_providers) in providers.iter().enumerate() {
            notify_depends_on(&mut sources, slot, slot_providers)?;
        }

        let report = if unresolved.is_empty() {
            None
        } else {
            let error = UnresolvedDependencyError::new(
                unresolved
                    .iter()
                    .map(|(slot, missing)| UnresolvedEntry {
                        slot: *slot,
                        source_name: sources[*slot].to_string(),
                        dependencies: missing.iter().map(|d| d.to_string()).collect(),
                    })
                    .collect(),
            );
            for (slot, missing) in &unresolved {
                let source = &mut sources[*slot];
                source
                    .set_unresolved_dependencies(missing)
                    .map_err(|cause| ResolveError::Hook {
                        source_name: source.to_string(),
                        cause,
                    })?;
            }
            if !config.warn_on_missing_dependencies {
                return Err(error.into());
            }
            tracing::warn!("{error}");
            Some(error)
        };

        let order = graph.topological_order();
        let mut position = vec![0; order.len()];
        for (pos, &slot) in order.iter().enumerate() {
            position[slot] = pos;
        }
        let depends_on = order
            .iter()
            .map(|&slot| {
                let mut positions: Vec<usize> =
                    providers[slot].iter().map(|&p| position[p]).collect();
                positions.sort_unstable();
                positions
            })
            .collect();

        let mut slots: Vec<Option<S>> = sources.into_iter().map(Some).collect();
        let ordered: Vec<S> = order.iter().filter_map(|&slot| slots[slot].take()).collect();
        tracing::debug!("resolved order of {} sources", ordered.len());

        Ok(Resolution::new(ordered, depends_on, report))
    }
}

impl<S: Source> Default for Resolver<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Source> Extend<S> for Resolver<S> {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.add_all(iter);
    }
}

type Unresolved<D> = Vec<(usize, Vec<D>)>;

/// Scan every (source, dependency) pair against every other source.
fn build_graph<S: Source>(sources: &[S]) -> Result<(SourceGraph, Unresolved<S::Dep>), ResolveError> {
    let mut graph = SourceGraph::with_vertices(sources.len());
    let mut unresolved = Vec::new();

    for (slot, source) in sources.iter().enumerate() {
        let mut missing = Vec::new();
        for dependency in source.dependencies() {
            let mut satisfied = false;
            for (other, candidate) in sources.iter().enumerate() {
                if other == slot || !dependency.satisfied_by(candidate) {
                    continue;
                }
                satisfied = true;
                match graph.add_edge(slot, other) {
                    Ok(true) => tracing::trace!("`{source}` depends on `{candidate}` ({dependency})"),
                    Ok(false) => {}
                    Err(cycle) => {
                        let chain = cycle.iter().map(|&s| sources[s].to_string()).collect();
                        return Err(CyclicDependencyError::new(chain).into());
                    }
                }
            }
            if !satisfied {
                tracing::debug!("`{source}` has no provider for {dependency}");
                missing.push(dependency);
            }
        }
        if !missing.is_empty() {
            unresolved.push((slot, missing));
        }
    }

    Ok((graph, unresolved))
}

/// Hand `sources[slot]` references to its providers.
fn notify_depends_on<S: Source>(
    sources: &mut [S],
    slot: usize,
    providers: &[usize],
) -> Result<(), ResolveError> {
    let (before, rest) = sources.split_at_mut(slot);
    let (current, after) = rest.split_first_mut().expect("slot is in bounds");
    let provider_refs: Vec<&S> = providers
        .iter()
        .map(|&p| if p < slot { &before[p] } else { &after[p - slot - 1] })
        .collect();
    current
        .set_depends_on(&provider_refs)
        .map_err(|cause| ResolveError::Hook {
            source_name: current.to_string(),
            cause,
        })
}
