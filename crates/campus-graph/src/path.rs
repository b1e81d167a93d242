//! Path-finding trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! The movement driver calls routing via the [`PathFinder`] trait, so
//! applications can swap in custom implementations (A*, precomputed tables)
//! without touching the core.  The default [`DijkstraPathFinder`] is
//! sufficient for campus-scale graphs.
//!
//! # Result convention
//!
//! A path is an ordered node sequence, source first, destination last.
//! `from == to` yields `[from]`.  An **empty** sequence means the
//! destination is unreachable under the type filter; callers must treat
//! that as a fatal map-configuration error (walk graphs are expected to be
//! fully connected for every allowed type set), never as a transient
//! failure to retry.
//!
//! # Determinism
//!
//! Heap entries are ordered by `(distance, NodeId)` using `f64::total_cmp`,
//! so two nodes at equal distance always pop in ID order and the returned
//! sequence is bit-identical across runs for fixed inputs.

use std::cmp::Ordering;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

use campus_core::NodeId;

use crate::graph::{CampusGraph, NodeType};
use crate::GraphResult;

// ── PathFinder trait ──────────────────────────────────────────────────────────

/// Pluggable shortest-path engine over a [`CampusGraph`].
pub trait PathFinder: Send + Sync {
    /// Compute a shortest path from `from` to `to`.
    ///
    /// When `allowed` is supplied, relaxation only considers neighbors whose
    /// type tag is in the set; `from` itself is exempt so an agent standing
    /// on a filtered-out node can still leave it.
    ///
    /// Returns `Err` only for IDs outside the graph (input validation);
    /// unreachability is the empty sequence, per the module docs.
    fn shortest_path(
        &self,
        graph: &CampusGraph,
        from: NodeId,
        to: NodeId,
        allowed: Option<&[NodeType]>,
    ) -> GraphResult<Vec<NodeId>>;
}

// ── DijkstraPathFinder ────────────────────────────────────────────────────────

/// Standard single-pair Dijkstra over the CSR walk graph.
///
/// Edge cost is the Euclidean edge length; no all-pairs precomputation is
/// done (single-pair queries dominate the workload, one per movement
/// cycle).  Complexity: O((V + E) log V) per query.
pub struct DijkstraPathFinder;

impl PathFinder for DijkstraPathFinder {
    fn shortest_path(
        &self,
        graph: &CampusGraph,
        from: NodeId,
        to: NodeId,
        allowed: Option<&[NodeType]>,
    ) -> GraphResult<Vec<NodeId>> {
        graph.check(from)?;
        graph.check(to)?;
        Ok(dijkstra(graph, from, to, allowed))
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Frontier entry ordered by `(dist, node)`.
///
/// `total_cmp` gives a total order over `f64` (distances are never NaN —
/// they are sums of Euclidean lengths), and the `NodeId` secondary key makes
/// equal-distance pops deterministic.
#[derive(Copy, Clone, PartialEq)]
struct FrontierEntry {
    dist: f64,
    node: NodeId,
}

impl Eq for FrontierEntry {}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.dist
            .total_cmp(&other.dist)
            .then_with(|| self.node.cmp(&other.node))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn dijkstra(
    graph: &CampusGraph,
    from: NodeId,
    to: NodeId,
    allowed: Option<&[NodeType]>,
) -> Vec<NodeId> {
    if from == to {
        return vec![from];
    }

    let n = graph.node_count();
    // dist[v] = best known cost (metres) to reach v; INFINITY for unseen.
    let mut dist = vec![f64::INFINITY; n];
    // prev[v] = predecessor on the best path; INVALID for unreached nodes.
    let mut prev = vec![NodeId::INVALID; n];

    dist[from.index()] = 0.0;

    // Reverse makes BinaryHeap (max-heap) behave as a min-heap.
    let mut heap: BinaryHeap<Reverse<FrontierEntry>> = BinaryHeap::new();
    heap.push(Reverse(FrontierEntry { dist: 0.0, node: from }));

    while let Some(Reverse(FrontierEntry { dist: cost, node })) = heap.pop() {
        if node == to {
            // Destination popped — its distance is final.
            return reconstruct(prev, from, to);
        }

        // Skip stale heap entries.
        if cost > dist[node.index()] {
            continue;
        }

        for (neighbor, len) in graph.neighbors(node) {
            if let Some(types) = allowed {
                if !graph.is_type(neighbor, types) {
                    continue;
                }
            }

            let new_cost = cost + len;
            if new_cost < dist[neighbor.index()] {
                dist[neighbor.index()] = new_cost;
                prev[neighbor.index()] = node;
                heap.push(Reverse(FrontierEntry { dist: new_cost, node: neighbor }));
            }
        }
    }

    // Frontier exhausted without reaching `to`: unreachable under the filter.
    Vec::new()
}

fn reconstruct(prev: Vec<NodeId>, from: NodeId, to: NodeId) -> Vec<NodeId> {
    let mut path = vec![to];
    let mut cur = to;
    while cur != from {
        cur = prev[cur.index()];
        debug_assert!(cur != NodeId::INVALID, "broken predecessor chain");
        path.push(cur);
    }
    path.reverse();
    path
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Cumulative Euclidean length of a node sequence, in metres.
///
/// Returns `0.0` for paths with fewer than two nodes.
pub fn path_length(graph: &CampusGraph, path: &[NodeId]) -> f64 {
    path.windows(2)
        .map(|w| graph.position(w[0]).distance(graph.position(w[1])))
        .sum()
}
