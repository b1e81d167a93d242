//! Shared per-location occupancy counters.
//!
//! One tracker instance is constructed at setup and injected into every
//! selector call by `&mut` reference — all agents contend on the same
//! counts, but there is no ambient global state and no interior mutability.
//! The driving loop is sequential within a tick, so each selector decision
//! (capacity read + enter/leave) is naturally one atomic transaction.  A
//! parallel driver would need to wrap the tracker in a single mutex held
//! for the whole decision; per-counter atomics are not enough because the
//! capacity check and the increment must be consistent.

use campus_core::LocationId;

use crate::location::LocationRegistry;

/// Current occupant count per location, bounded by each location's
/// capacity.
#[derive(Debug, Clone)]
pub struct OccupancyTracker {
    counts: Vec<u32>,
    caps: Vec<u32>,
}

impl OccupancyTracker {
    /// Build a tracker with every count at zero and capacities taken from
    /// the registry.
    pub fn from_registry(registry: &LocationRegistry) -> Self {
        let caps = registry.iter().map(|(_, def)| def.max_occupancy).collect();
        Self {
            counts: vec![0; registry.len()],
            caps,
        }
    }

    /// Record an agent committing to move into `loc`.
    #[inline]
    pub fn enter(&mut self, loc: LocationId) {
        self.counts[loc.index()] += 1;
    }

    /// Record an agent committing to move out of `loc`.  Saturates at zero.
    #[inline]
    pub fn leave(&mut self, loc: LocationId) {
        let c = &mut self.counts[loc.index()];
        *c = c.saturating_sub(1);
    }

    /// Current occupant count of `loc`.
    #[inline]
    pub fn count(&self, loc: LocationId) -> u32 {
        self.counts[loc.index()]
    }

    /// Configured capacity of `loc`.
    #[inline]
    pub fn capacity(&self, loc: LocationId) -> u32 {
        self.caps[loc.index()]
    }

    /// Has `loc` reached its capacity?
    #[inline]
    pub fn is_full(&self, loc: LocationId) -> bool {
        self.counts[loc.index()] >= self.caps[loc.index()]
    }

    /// Number of tracked locations.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}
