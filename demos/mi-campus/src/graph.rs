//! Walk graph of the MI building.
//!
//! One node per named location (at the surveyed coordinates) plus corridor
//! edges following the building's actual hallway connectivity.  All nodes
//! carry the corridor type; the graph is fully connected so every location
//! can reach every other.

use campus_core::Point;
use campus_graph::{CampusGraph, CampusGraphBuilder, GraphResult, NodeType};

/// All walkable nodes are plain corridor.
pub const CORRIDOR: NodeType = NodeType(0);

/// Build the MI building walk graph.
///
/// Node coordinates match the location survey exactly, so
/// `LocationRegistry::bind_nodes` snaps each location onto its own node.
pub fn build_walk_graph() -> GraphResult<CampusGraph> {
    let mut b = CampusGraphBuilder::new();

    let lecture_hall_1 = b.add_node(Point::new(987.70, 343.45), CORRIDOR)?;
    let lecture_hall_2 = b.add_node(Point::new(707.16, 447.99), CORRIDOR)?;
    let lecture_hall_3 = b.add_node(Point::new(860.44, 495.73), CORRIDOR)?;
    let seminar_hall_1 = b.add_node(Point::new(120.56, 0.00), CORRIDOR)?;
    let seminar_hall_2 = b.add_node(Point::new(637.79, 511.05), CORRIDOR)?;
    let seminar_hall_3 = b.add_node(Point::new(481.63, 193.80), CORRIDOR)?;
    let seminar_hall_4 = b.add_node(Point::new(278.89, 157.64), CORRIDOR)?;
    let seminar_hall_5 = b.add_node(Point::new(149.85, 135.00), CORRIDOR)?;
    let main_hall_1 = b.add_node(Point::new(814.56, 368.49), CORRIDOR)?;
    let main_hall_2 = b.add_node(Point::new(453.13, 278.73), CORRIDOR)?;
    let main_hall_3 = b.add_node(Point::new(257.52, 223.94), CORRIDOR)?;
    let mensa = b.add_node(Point::new(548.61, 393.59), CORRIDOR)?;
    let entrance = b.add_node(Point::new(881.02, 216.67), CORRIDOR)?;
    let computer_hall = b.add_node(Point::new(667.17, 208.08), CORRIDOR)?;
    let library = b.add_node(Point::new(147.56, 291.82), CORRIDOR)?;

    // East wing around the entrance.
    b.add_walkway(entrance, lecture_hall_1);
    b.add_walkway(entrance, main_hall_1);
    b.add_walkway(entrance, computer_hall);
    b.add_walkway(lecture_hall_1, main_hall_1);
    b.add_walkway(main_hall_1, lecture_hall_3);
    b.add_walkway(main_hall_1, lecture_hall_2);
    b.add_walkway(main_hall_1, mensa);

    // Central corridor past the Mensa.
    b.add_walkway(lecture_hall_2, seminar_hall_2);
    b.add_walkway(lecture_hall_2, mensa);
    b.add_walkway(computer_hall, mensa);
    b.add_walkway(computer_hall, seminar_hall_3);
    b.add_walkway(mensa, main_hall_2);
    b.add_walkway(seminar_hall_3, main_hall_2);

    // West wing toward the library.
    b.add_walkway(main_hall_2, seminar_hall_4);
    b.add_walkway(main_hall_2, main_hall_3);
    b.add_walkway(main_hall_3, library);
    b.add_walkway(main_hall_3, seminar_hall_5);
    b.add_walkway(seminar_hall_4, seminar_hall_5);
    b.add_walkway(seminar_hall_5, seminar_hall_1);

    Ok(b.build())
}
