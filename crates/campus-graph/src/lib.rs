//! `campus-graph` — walk graph, spatial indexing, and shortest paths.
//!
//! # Crate layout
//!
//! | Module    | Contents                                                   |
//! |-----------|------------------------------------------------------------|
//! | [`graph`] | `CampusGraph` (CSR + R-tree), `CampusGraphBuilder`, `NodeType` |
//! | [`path`]  | `PathFinder` trait, `DijkstraPathFinder`, `path_length`    |
//! | [`error`] | `GraphError`, `GraphResult<T>`                             |
//!
//! The graph is built once at setup and read-only afterwards; neither the
//! path finder nor any downstream component mutates it.

pub mod error;
pub mod graph;
pub mod path;

#[cfg(test)]
mod tests;

pub use error::{GraphError, GraphResult};
pub use graph::{CampusGraph, CampusGraphBuilder, NodeType};
pub use path::{DijkstraPathFinder, PathFinder, path_length};
