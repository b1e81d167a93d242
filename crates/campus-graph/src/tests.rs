//! Unit tests for campus-graph.
//!
//! All tests use hand-crafted graphs so they run without any map file.

#[cfg(test)]
mod helpers {
    use campus_core::{NodeId, Point};

    use crate::{CampusGraph, CampusGraphBuilder, NodeType, path_length};

    pub const CORRIDOR: NodeType = NodeType(0);
    pub const ROOM: NodeType = NodeType(1);

    /// Build a small grid graph for testing.
    ///
    /// Nodes (x, y), all corridor type:
    ///   0:(0,0)   1:(100,0)   2:(200,0)
    ///   3:(0,100)             4:(200,100)
    ///
    /// Walkways: 0-1, 1-2, 2-4, 0-3, 3-4.
    ///
    /// Both 0→4 routes cost 300 m (0→1→2→4 and 0→3→4), so the grid doubles
    /// as a tie-break fixture.  Tests that need a unique optimum use
    /// `skewed_graph` instead.
    pub fn grid_graph() -> (CampusGraph, [NodeId; 5]) {
        let mut b = CampusGraphBuilder::new();
        let n0 = b.add_node(Point::new(0.0, 0.0), CORRIDOR).unwrap();
        let n1 = b.add_node(Point::new(100.0, 0.0), CORRIDOR).unwrap();
        let n2 = b.add_node(Point::new(200.0, 0.0), CORRIDOR).unwrap();
        let n3 = b.add_node(Point::new(0.0, 100.0), CORRIDOR).unwrap();
        let n4 = b.add_node(Point::new(200.0, 100.0), CORRIDOR).unwrap();

        b.add_walkway(n0, n1);
        b.add_walkway(n1, n2);
        b.add_walkway(n2, n4);
        b.add_walkway(n0, n3);
        b.add_walkway(n3, n4);

        (b.build(), [n0, n1, n2, n3, n4])
    }

    /// A graph where the geometrically direct hop is beaten by a detour:
    ///
    ///   0:(0,0)  1:(50,120)  2:(100,0)  with walkways 0-1, 1-2, 0-2
    ///
    /// Direct 0→2 is 100 m; the detour via 1 is 2 × 130 = 260 m.
    pub fn skewed_graph() -> (CampusGraph, [NodeId; 3]) {
        let mut b = CampusGraphBuilder::new();
        let n0 = b.add_node(Point::new(0.0, 0.0), CORRIDOR).unwrap();
        let n1 = b.add_node(Point::new(50.0, 120.0), CORRIDOR).unwrap();
        let n2 = b.add_node(Point::new(100.0, 0.0), CORRIDOR).unwrap();
        b.add_walkway(n0, n1);
        b.add_walkway(n1, n2);
        b.add_walkway(n0, n2);
        (b.build(), [n0, n1, n2])
    }

    /// Exhaustively enumerate all simple paths `from → to` and return the
    /// minimum cumulative length.  Only usable on tiny graphs.
    pub fn brute_force_min(
        graph: &CampusGraph,
        from: NodeId,
        to: NodeId,
        allowed: Option<&[NodeType]>,
    ) -> Option<f64> {
        fn dfs(
            graph: &CampusGraph,
            at: NodeId,
            to: NodeId,
            allowed: Option<&[NodeType]>,
            visited: &mut Vec<bool>,
            acc: f64,
            best: &mut Option<f64>,
        ) {
            if at == to {
                *best = Some(best.map_or(acc, |b: f64| b.min(acc)));
                return;
            }
            for (next, len) in graph.neighbors(at) {
                if visited[next.index()] {
                    continue;
                }
                if let Some(types) = allowed {
                    if !graph.is_type(next, types) {
                        continue;
                    }
                }
                visited[next.index()] = true;
                dfs(graph, next, to, allowed, visited, acc + len, best);
                visited[next.index()] = false;
            }
        }

        let mut visited = vec![false; graph.node_count()];
        visited[from.index()] = true;
        let mut best = None;
        dfs(graph, from, to, allowed, &mut visited, 0.0, &mut best);
        best
    }

    pub fn length_of(graph: &CampusGraph, path: &[NodeId]) -> f64 {
        path_length(graph, path)
    }
}

// ── Builder & graph structure ─────────────────────────────────────────────────

#[cfg(test)]
mod builder {
    use campus_core::Point;

    use crate::{CampusGraphBuilder, NodeType};

    #[test]
    fn empty_build() {
        let graph = CampusGraphBuilder::new().build();
        assert_eq!(graph.node_count(), 0);
        assert_eq!(graph.edge_count(), 0);
        assert!(graph.is_empty());
    }

    #[test]
    fn walkway_is_bidirectional() {
        let mut b = CampusGraphBuilder::new();
        let a = b.add_node(Point::new(0.0, 0.0), NodeType(0)).unwrap();
        let c = b.add_node(Point::new(30.0, 40.0), NodeType(0)).unwrap();
        b.add_walkway(a, c);
        let graph = b.build();

        assert_eq!(graph.edge_count(), 2);
        assert_eq!(graph.degree(a), 1);
        assert_eq!(graph.degree(c), 1);
        // Weight is the Euclidean distance between the endpoints.
        let (to, len) = graph.neighbors(a).next().unwrap();
        assert_eq!(to, c);
        assert_eq!(len, 50.0);
    }

    #[test]
    fn csr_degrees() {
        let (graph, [n0, n1, n2, n3, n4]) = super::helpers::grid_graph();
        assert_eq!(graph.degree(n0), 2); // 0-1, 0-3
        assert_eq!(graph.degree(n1), 2); // 1-0, 1-2
        assert_eq!(graph.degree(n2), 2);
        assert_eq!(graph.degree(n3), 2);
        assert_eq!(graph.degree(n4), 2);
    }

    #[test]
    fn neighbors_in_id_order() {
        let (graph, [n0, n1, _, n3, _]) = super::helpers::grid_graph();
        let ns: Vec<_> = graph.neighbors(n0).map(|(n, _)| n).collect();
        assert_eq!(ns, vec![n1, n3]);
    }

    #[test]
    fn type_membership() {
        let mut b = CampusGraphBuilder::new();
        let a = b.add_node(Point::new(0.0, 0.0), super::helpers::CORRIDOR).unwrap();
        let r = b.add_node(Point::new(1.0, 0.0), super::helpers::ROOM).unwrap();
        let graph = b.build();

        assert!(graph.is_type(a, &[super::helpers::CORRIDOR]));
        assert!(!graph.is_type(a, &[super::helpers::ROOM]));
        assert!(graph.is_type(r, &[super::helpers::CORRIDOR, super::helpers::ROOM]));
    }
}

// ── Spatial binding ───────────────────────────────────────────────────────────

#[cfg(test)]
mod nearest {
    use campus_core::Point;

    use crate::CampusGraphBuilder;

    #[test]
    fn exact_position() {
        let (graph, [n0, ..]) = super::helpers::grid_graph();
        assert_eq!(graph.nearest_node(Point::new(0.0, 0.0)), Some(n0));
    }

    #[test]
    fn snaps_to_closest() {
        let (graph, [n0, n1, ..]) = super::helpers::grid_graph();
        assert_eq!(graph.nearest_node(Point::new(40.0, 0.0)), Some(n0));
        assert_eq!(graph.nearest_node(Point::new(60.0, 0.0)), Some(n1));
    }

    #[test]
    fn empty_graph_returns_none() {
        let graph = CampusGraphBuilder::new().build();
        assert!(graph.nearest_node(Point::new(0.0, 0.0)).is_none());
    }
}

// ── Shortest paths ────────────────────────────────────────────────────────────

#[cfg(test)]
mod shortest_path {
    use campus_core::{NodeId, Point};

    use crate::{CampusGraphBuilder, DijkstraPathFinder, GraphError, PathFinder, path_length};

    use super::helpers::{self, CORRIDOR, ROOM};

    #[test]
    fn degenerate_same_node() {
        let (graph, [n0, ..]) = helpers::grid_graph();
        let path = DijkstraPathFinder
            .shortest_path(&graph, n0, n0, None)
            .unwrap();
        assert_eq!(path, vec![n0]);
    }

    #[test]
    fn matches_brute_force() {
        let (graph, nodes) = helpers::grid_graph();
        for &from in &nodes {
            for &to in &nodes {
                let path = DijkstraPathFinder
                    .shortest_path(&graph, from, to, None)
                    .unwrap();
                let expected = helpers::brute_force_min(&graph, from, to, None).unwrap();
                assert!(
                    (helpers::length_of(&graph, &path) - expected).abs() < 1e-9,
                    "suboptimal path {from} -> {to}"
                );
                assert_eq!(*path.first().unwrap(), from);
                assert_eq!(*path.last().unwrap(), to);
            }
        }
    }

    #[test]
    fn prefers_direct_over_detour() {
        let (graph, [n0, _, n2]) = helpers::skewed_graph();
        let path = DijkstraPathFinder
            .shortest_path(&graph, n0, n2, None)
            .unwrap();
        assert_eq!(path, vec![n0, n2]);
        assert_eq!(path_length(&graph, &path), 100.0);
    }

    #[test]
    fn deterministic_across_repeated_queries() {
        let (graph, [n0, _, _, _, n4]) = helpers::grid_graph();
        let first = DijkstraPathFinder
            .shortest_path(&graph, n0, n4, None)
            .unwrap();
        for _ in 0..16 {
            let again = DijkstraPathFinder
                .shortest_path(&graph, n0, n4, None)
                .unwrap();
            assert_eq!(again, first);
        }
    }

    #[test]
    fn equal_cost_tie_breaks_deterministically() {
        // Both 0→1→2→4 and 0→3→4 cost 300 m in the grid.  n3 (dist 100)
        // pops before n2 (dist 200) and sets n4's predecessor first; the
        // later equal-cost relaxation must not overwrite it.
        let (graph, [n0, _, _, n3, n4]) = helpers::grid_graph();
        let path = DijkstraPathFinder
            .shortest_path(&graph, n0, n4, None)
            .unwrap();
        assert_eq!(path, vec![n0, n3, n4]);
    }

    #[test]
    fn type_filter_detours() {
        // 0:(0,0) corridor — 1:(50,0) room — 2:(100,0) corridor, plus a
        // corridor loop 0-3-2 via 3:(50,80).  Filtering to corridors must
        // route around the room.
        let mut b = CampusGraphBuilder::new();
        let n0 = b.add_node(Point::new(0.0, 0.0), CORRIDOR).unwrap();
        let n1 = b.add_node(Point::new(50.0, 0.0), ROOM).unwrap();
        let n2 = b.add_node(Point::new(100.0, 0.0), CORRIDOR).unwrap();
        let n3 = b.add_node(Point::new(50.0, 80.0), CORRIDOR).unwrap();
        b.add_walkway(n0, n1);
        b.add_walkway(n1, n2);
        b.add_walkway(n0, n3);
        b.add_walkway(n3, n2);
        let graph = b.build();

        let unfiltered = DijkstraPathFinder
            .shortest_path(&graph, n0, n2, None)
            .unwrap();
        assert_eq!(unfiltered, vec![n0, n1, n2]);

        let filtered = DijkstraPathFinder
            .shortest_path(&graph, n0, n2, Some(&[CORRIDOR]))
            .unwrap();
        assert_eq!(filtered, vec![n0, n3, n2]);
    }

    #[test]
    fn unreachable_returns_empty_not_error() {
        // n2 is only reachable through the room node n1.
        let mut b = CampusGraphBuilder::new();
        let n0 = b.add_node(Point::new(0.0, 0.0), CORRIDOR).unwrap();
        let n1 = b.add_node(Point::new(50.0, 0.0), ROOM).unwrap();
        let n2 = b.add_node(Point::new(100.0, 0.0), CORRIDOR).unwrap();
        b.add_walkway(n0, n1);
        b.add_walkway(n1, n2);
        let graph = b.build();

        let path = DijkstraPathFinder
            .shortest_path(&graph, n0, n2, Some(&[CORRIDOR]))
            .unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn disconnected_returns_empty() {
        let mut b = CampusGraphBuilder::new();
        let a = b.add_node(Point::new(0.0, 0.0), CORRIDOR).unwrap();
        let c = b.add_node(Point::new(100.0, 0.0), CORRIDOR).unwrap();
        let graph = b.build();

        let path = DijkstraPathFinder.shortest_path(&graph, a, c, None).unwrap();
        assert!(path.is_empty());
    }

    #[test]
    fn unknown_node_is_input_error() {
        let (graph, [n0, ..]) = helpers::grid_graph();
        let bogus = NodeId(99);
        let result = DijkstraPathFinder.shortest_path(&graph, n0, bogus, None);
        assert!(matches!(result, Err(GraphError::NodeNotFound(n)) if n == bogus));
    }
}
