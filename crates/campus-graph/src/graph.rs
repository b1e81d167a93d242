//! Walk graph representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for adjacency.
//! Given a `NodeId n`, its outgoing edge slots occupy the index range:
//!
//! ```text
//! node_out_start[n] .. node_out_start[n+1]
//! ```
//!
//! `edge_to` and `edge_len` are sorted by source node, so iterating a node's
//! neighbors is a contiguous memory scan — ideal for Dijkstra's inner loop.
//!
//! Walkways are undirected: `add_walkway` inserts one edge slot in each
//! direction, both weighted by the Euclidean distance between the endpoint
//! positions.
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) maps `(x, y)` to the nearest `NodeId`.  Used at
//! setup time to bind named locations to their graph nodes.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

use campus_core::{NodeId, Point};

use crate::{GraphError, GraphResult};

// ── NodeType ──────────────────────────────────────────────────────────────────

/// Category tag attached to every graph node (corridor, room, stairs, …).
///
/// The path finder can be restricted to a subset of tags; the numeric
/// meaning of each tag is map configuration, not fixed here.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeType(pub u8);

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "NodeType({})", self.0)
    }
}

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a 2-D `[x, y]` point with the
/// associated `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        dx * dx + dy * dy
    }
}

// ── CampusGraph ───────────────────────────────────────────────────────────────

/// Undirected walk graph in CSR format plus a spatial index for node
/// binding.
///
/// Read-only after [`CampusGraphBuilder::build`]; all core components hold
/// shared references to one instance.
pub struct CampusGraph {
    /// Map position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<Point>,

    /// Category tag of each node.  Indexed by `NodeId`.
    pub node_type: Vec<NodeType>,

    /// CSR row pointer.  Neighbors of node `n` occupy edge slots
    /// `node_out_start[n] .. node_out_start[n+1]`.
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    /// Destination node of each edge slot.
    pub edge_to: Vec<NodeId>,

    /// Euclidean length of each edge slot in metres.
    pub edge_len: Vec<f64>,

    spatial_idx: RTree<NodeEntry>,
}

impl CampusGraph {
    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    /// Number of edge slots (two per undirected walkway).
    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    /// `true` if `node` is a valid ID for this graph.
    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_pos.len()
    }

    /// Validate a caller-supplied ID, per the input-validation contract:
    /// identifiers must come from this graph.
    #[inline]
    pub fn check(&self, node: NodeId) -> GraphResult<()> {
        if self.contains(node) {
            Ok(())
        } else {
            Err(GraphError::NodeNotFound(node))
        }
    }

    // ── Structural queries ────────────────────────────────────────────────

    /// Iterator over the neighbor nodes of `node` with edge lengths.
    ///
    /// This is a contiguous index range — no heap allocation.
    #[inline]
    pub fn neighbors(&self, node: NodeId) -> impl Iterator<Item = (NodeId, f64)> + '_ {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        (start..end).map(|i| (self.edge_to[i], self.edge_len[i]))
    }

    /// Degree of `node` (number of incident walkway slots).
    #[inline]
    pub fn degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// Is `node` tagged with one of `types`?
    #[inline]
    pub fn is_type(&self, node: NodeId, types: &[NodeType]) -> bool {
        types.contains(&self.node_type[node.index()])
    }

    /// Map position of `node`.
    #[inline]
    pub fn position(&self, node: NodeId) -> Point {
        self.node_pos[node.index()]
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Return the `NodeId` of the graph node nearest to `pos`.
    ///
    /// Returns `None` only if the graph has no nodes.
    pub fn nearest_node(&self, pos: Point) -> Option<NodeId> {
        self.spatial_idx
            .nearest_neighbor(&[pos.x, pos.y])
            .map(|e| e.id)
    }
}

// ── CampusGraphBuilder ────────────────────────────────────────────────────────

/// Construct a [`CampusGraph`] incrementally, then call
/// [`build`](Self::build).
///
/// The builder accepts nodes and walkways in any order.  `build()` sorts
/// edge slots by source node, constructs the CSR arrays, and bulk-loads the
/// R-tree.
///
/// # Example
///
/// ```
/// use campus_core::Point;
/// use campus_graph::{CampusGraphBuilder, NodeType};
///
/// let mut b = CampusGraphBuilder::new();
/// let a = b.add_node(Point::new(0.0, 0.0), NodeType(0)).unwrap();
/// let c = b.add_node(Point::new(30.0, 40.0), NodeType(0)).unwrap();
/// b.add_walkway(a, c);
/// let graph = b.build();
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_count(), 2); // one slot per direction
/// ```
pub struct CampusGraphBuilder {
    nodes: Vec<(Point, NodeType)>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from: NodeId,
    to: NodeId,
    len: f64,
}

impl CampusGraphBuilder {
    pub fn new() -> Self {
        Self { nodes: Vec::new(), raw_edges: Vec::new() }
    }

    /// Pre-allocate for the expected number of nodes and walkways.
    pub fn with_capacity(nodes: usize, walkways: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(walkways * 2),
        }
    }

    /// Add a graph node and return its `NodeId` (sequential from 0).
    ///
    /// Fails once the `NodeId` range is exhausted; `NodeId::INVALID` is
    /// never handed out.
    pub fn add_node(&mut self, pos: Point, node_type: NodeType) -> GraphResult<NodeId> {
        let id = NodeId::try_from(self.nodes.len())
            .ok()
            .filter(|&id| id != NodeId::INVALID)
            .ok_or_else(|| {
                GraphError::Config(format!("graph is full ({} nodes)", self.nodes.len()))
            })?;
        self.nodes.push((pos, node_type));
        Ok(id)
    }

    /// Add an **undirected** walkway between `a` and `b`, weighted by the
    /// Euclidean distance between their positions.
    pub fn add_walkway(&mut self, a: NodeId, b: NodeId) {
        let len = self.nodes[a.index()].0.distance(self.nodes[b.index()].0);
        self.raw_edges.push(RawEdge { from: a, to: b, len });
        self.raw_edges.push(RawEdge { from: b, to: a, len });
    }

    /// Look up the position of a node added earlier.
    pub fn node_pos(&self, id: NodeId) -> Point {
        self.nodes[id.index()].0
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Consume the builder and produce a [`CampusGraph`].
    ///
    /// Time complexity: O(E log E) for the edge sort + O(N log N) for the
    /// R-tree bulk load.
    pub fn build(self) -> CampusGraph {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        // Sort edge slots by source node for CSR construction.
        let mut raw = self.raw_edges;
        raw.sort_unstable_by_key(|e| (e.from.0, e.to.0));

        let edge_to: Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_len: Vec<f64> = raw.iter().map(|e| e.len).collect();

        // Build CSR row pointer (node_out_start).
        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &raw {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        // Bulk-load R-tree for O(N log N) construction (faster than N inserts).
        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &(pos, _))| NodeEntry {
                point: [pos.x, pos.y],
                id: NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        let (node_pos, node_type) = self.nodes.into_iter().unzip();

        CampusGraph {
            node_pos,
            node_type,
            node_out_start,
            edge_to,
            edge_len,
            spatial_idx,
        }
    }
}

impl Default for CampusGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
