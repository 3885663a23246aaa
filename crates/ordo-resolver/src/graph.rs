//! Arena graph over registration slots, backed by petgraph.
//!
//! Vertex `i` is the source registered in slot `i`. Edges point from a
//! dependent to its provider.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use petgraph::algo::astar;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;

pub(crate) struct SourceGraph {
    graph: DiGraph<usize, ()>,
}

impl SourceGraph {
    /// A graph with one vertex per slot in `0..count`.
    pub fn with_vertices(count: usize) -> Self {
        let mut graph = DiGraph::with_capacity(count, count);
        for slot in 0..count {
            graph.add_node(slot);
        }
        Self { graph }
    }

    pub fn vertex_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Insert `dependent -> provider` unless it would close a cycle.
    ///
    /// Returns `Ok(false)` if the edge already existed. On a cycle, returns
    /// the slots along it starting and ending at `dependent`.
    pub fn add_edge(&mut self, dependent: usize, provider: usize) -> Result<bool, Vec<usize>> {
        let from = NodeIndex::new(dependent);
        let to = NodeIndex::new(provider);
        if self.graph.find_edge(from, to).is_some() {
            return Ok(false);
        }
        // A path back from the provider means the new edge closes a loop.
        if let Some((_, path)) = astar(&self.graph, to, |n| n == from, |_| 1usize, |_| 0) {
            let mut cycle = Vec::with_capacity(path.len() + 1);
            cycle.push(dependent);
            cycle.extend(path.into_iter().map(|n| self.graph[n]));
            return Err(cycle);
        }
        self.graph.add_edge(from, to, ());
        Ok(true)
    }

    /// Direct providers of `slot`, in registration order.
    pub fn providers(&self, slot: usize) -> Vec<usize> {
        let mut providers: Vec<usize> = self
            .graph
            .neighbors_directed(NodeIndex::new(slot), Direction::Outgoing)
            .map(|n| self.graph[n])
            .collect();
        providers.sort_unstable();
        providers
    }

    /// Providers-first topological order.
    ///
    /// Among vertices that are ready at the same time, the lowest slot goes
    /// first, so the result only depends on registration order.
    pub fn topological_order(&self) -> Vec<usize> {
        let count = self.graph.node_count();
        let mut pending: Vec<usize> = self
            .graph
            .node_indices()
            .map(|n| self.graph.neighbors_directed(n, Direction::Outgoing).count())
            .collect();

        let mut ready: BinaryHeap<Reverse<usize>> = pending
            .iter()
            .enumerate()
            .filter(|(_, &remaining)| remaining == 0)
            .map(|(slot, _)| Reverse(slot))
            .collect();

        let mut order = Vec::with_capacity(count);
        while let Some(Reverse(slot)) = ready.pop() {
            order.push(slot);
            for dependent in self
                .graph
                .neighbors_directed(NodeIndex::new(slot), Direction::Incoming)
            {
                let d = self.graph[dependent];
                pending[d] -= 1;
                if pending[d] == 0 {
                    ready.push(Reverse(d));
                }
            }
        }

        debug_assert_eq!(order.len(), count, "graph must be acyclic");
        order
    }
}
