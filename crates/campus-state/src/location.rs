//! Location definitions and the registry.

use rustc_hash::FxHashMap;

use campus_core::{AgentRng, LocationId, NodeId, Point};
use campus_graph::CampusGraph;

use crate::error::{StateError, StateResult};

/// Sentinel capacity for locations that never fill up (the entrance).
pub const CAPACITY_UNBOUNDED: u32 = u32::MAX;

// ── DwellBounds ───────────────────────────────────────────────────────────────

/// Inclusive dwell-time bounds in simulated seconds.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DwellBounds {
    pub min_secs: f64,
    pub max_secs: f64,
}

impl DwellBounds {
    /// Construct validated bounds (`0 <= min <= max`).
    pub fn new(min_secs: f64, max_secs: f64) -> StateResult<Self> {
        if min_secs < 0.0 || min_secs > max_secs {
            return Err(StateError::Config(format!(
                "invalid dwell bounds [{min_secs}, {max_secs}]"
            )));
        }
        Ok(Self { min_secs, max_secs })
    }

    /// Sample a dwell time uniformly from the bounds.
    pub fn sample(&self, rng: &mut AgentRng) -> f64 {
        if self.min_secs == self.max_secs {
            self.min_secs
        } else {
            rng.gen_range(self.min_secs..=self.max_secs)
        }
    }
}

// ── LocationDef ───────────────────────────────────────────────────────────────

/// A named destination bound to exactly one graph node.
#[derive(Debug, Clone)]
pub struct LocationDef {
    /// Human-readable name ("Library", "Mensa", …), unique per registry.
    pub name: String,

    /// Map position; used to bind the location to its graph node.
    pub position: Point,

    /// The bound graph node.  `NodeId::INVALID` until
    /// [`LocationRegistry::bind_nodes`] runs.
    pub node: NodeId,

    /// Maximum simultaneous occupants ([`CAPACITY_UNBOUNDED`] for none).
    pub max_occupancy: u32,

    /// Per-location dwell bounds; `None` falls back to the role default.
    pub wait: Option<DwellBounds>,
}

impl LocationDef {
    pub fn new(name: impl Into<String>, position: Point, max_occupancy: u32) -> Self {
        Self {
            name: name.into(),
            position,
            node: NodeId::INVALID,
            max_occupancy,
            wait: None,
        }
    }

    pub fn with_wait(mut self, bounds: DwellBounds) -> Self {
        self.wait = Some(bounds);
        self
    }
}

// ── LocationRegistry ──────────────────────────────────────────────────────────

/// All locations of one deployment, indexed by `LocationId`.
///
/// Identity is stable for the simulation's lifetime: IDs are assigned in
/// insertion order and never reused.  The registry is built and bound once
/// at setup, then shared read-only by every selector.
#[derive(Debug, Default)]
pub struct LocationRegistry {
    defs: Vec<LocationDef>,
    by_name: FxHashMap<String, LocationId>,
}

impl LocationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a location; names must be unique.
    pub fn add(&mut self, def: LocationDef) -> StateResult<LocationId> {
        if self.by_name.contains_key(&def.name) {
            return Err(StateError::DuplicateLocation(def.name));
        }
        // `LocationId::INVALID` is never handed out.
        let id = LocationId::try_from(self.defs.len())
            .ok()
            .filter(|&id| id != LocationId::INVALID)
            .ok_or_else(|| {
                StateError::Config(format!(
                    "location registry is full ({} definitions)",
                    self.defs.len()
                ))
            })?;
        self.by_name.insert(def.name.clone(), id);
        self.defs.push(def);
        Ok(id)
    }

    /// Look up a definition, validating the caller-supplied ID.
    pub fn get(&self, id: LocationId) -> StateResult<&LocationDef> {
        self.defs
            .get(id.index())
            .ok_or(StateError::UnknownLocation(id))
    }

    /// Resolve a location name to its ID.
    pub fn id_of(&self, name: &str) -> Option<LocationId> {
        self.by_name.get(name).copied()
    }

    /// The graph node a location is bound to.
    pub fn node_of(&self, id: LocationId) -> StateResult<NodeId> {
        Ok(self.get(id)?.node)
    }

    pub fn len(&self) -> usize {
        self.defs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.defs.is_empty()
    }

    /// All locations in ID order.
    pub fn iter(&self) -> impl Iterator<Item = (LocationId, &LocationDef)> + '_ {
        self.defs
            .iter()
            .enumerate()
            .map(|(i, def)| (LocationId(i as u16), def))
    }

    /// Bind every location to the graph node nearest its position.
    ///
    /// Must run once after the graph is built and before any selector is
    /// created; an empty graph is a configuration error.
    pub fn bind_nodes(&mut self, graph: &CampusGraph) -> StateResult<()> {
        for def in &mut self.defs {
            def.node = graph.nearest_node(def.position).ok_or_else(|| {
                StateError::Config(format!(
                    "cannot bind location {:?}: walk graph has no nodes",
                    def.name
                ))
            })?;
        }
        Ok(())
    }
}
