//! The movement driver and its tick loop.

use std::sync::Arc;

use campus_core::{AgentId, AgentRng, LocationId, NodeId, PeakWindow, SimClock, Tick};
use campus_graph::{CampusGraph, NodeType, PathFinder, path_length};
use campus_state::{
    DestinationSelector, LocationRegistry, OccupancyTracker, RoleProfile, SelectionKind,
};

use crate::observer::DriverObserver;
use crate::wake::WakeQueue;
use crate::{SimError, SimResult};

// ── DriverConfig ──────────────────────────────────────────────────────────────

/// Run-level parameters for a [`MovementDriver`].
#[derive(Clone, Debug)]
pub struct DriverConfig {
    /// Global seed; every walker derives its own RNG from this.
    pub seed: u64,

    /// Simulated seconds per tick.
    pub tick_duration_secs: u32,

    /// Run length in ticks.
    pub total_ticks: u64,

    /// Daily busy period, in simulated seconds since tick zero.
    pub peak: PeakWindow,

    /// Walking speed in metres per simulated second.
    pub walk_speed_mps: f64,

    /// Node types walkers may traverse; `None` means no restriction.
    pub allowed_types: Option<Vec<NodeType>>,
}

// ── Walker ────────────────────────────────────────────────────────────────────

/// What a walker is doing right now.
#[derive(Copy, Clone, Debug)]
enum Phase {
    /// Staying at the current location until the given tick, then picking
    /// the next destination.
    Dwelling { until: Tick },
    /// En route; on `arrival` the walker reaches `destination` and dwells
    /// there for `dwell_ticks`.
    Walking {
        arrival: Tick,
        destination: LocationId,
        dwell_ticks: u64,
    },
}

/// One agent: its selector state, its graph position, and its phase.
struct Walker {
    selector: DestinationSelector,
    /// Current node while dwelling; departure node while walking.
    node: NodeId,
    phase: Phase,
}

// ── MovementDriver ────────────────────────────────────────────────────────────

/// Owns all simulation state and drives the walkers tick by tick.
///
/// The loop is sequential: within a tick the due walkers act one at a time
/// in ascending `AgentId` order, so every selector call sees the occupancy
/// left behind by the previous one and results are reproducible from the
/// seed alone.
///
/// Each walker cycles through the same pattern indefinitely: pick a
/// destination (context-weighted draw), walk the shortest allowed route to
/// it, dwell, repeat.  Destination choice and dwelling live in
/// `campus-state`; this driver contributes the time axis and the routing.
pub struct MovementDriver<P: PathFinder> {
    config: DriverConfig,
    graph: CampusGraph,
    registry: LocationRegistry,
    finder: P,
    occupancy: OccupancyTracker,
    walkers: Vec<Walker>,
    rngs: Vec<AgentRng>,
    wake: WakeQueue,
    clock: SimClock,
}

impl<P: PathFinder> MovementDriver<P> {
    /// Create a driver over a built graph and a node-bound registry.
    ///
    /// The registry must have been through
    /// [`LocationRegistry::bind_nodes`]; an unbound location is a
    /// configuration error here rather than a panic later.
    pub fn new(
        config: DriverConfig,
        graph: CampusGraph,
        registry: LocationRegistry,
        finder: P,
    ) -> SimResult<Self> {
        if config.tick_duration_secs == 0 {
            return Err(SimError::Config("tick duration must be at least 1 s".into()));
        }
        if !(config.walk_speed_mps > 0.0) {
            return Err(SimError::Config(format!(
                "walk speed must be positive, got {}",
                config.walk_speed_mps
            )));
        }
        for (_, def) in registry.iter() {
            if def.node == NodeId::INVALID {
                return Err(SimError::Config(format!(
                    "location {:?} is not bound to a graph node",
                    def.name
                )));
            }
        }

        let occupancy = OccupancyTracker::from_registry(&registry);
        let clock = SimClock::new(config.tick_duration_secs);
        Ok(Self {
            config,
            graph,
            registry,
            finder,
            occupancy,
            walkers: Vec::new(),
            rngs: Vec::new(),
            wake: WakeQueue::new(),
            clock,
        })
    }

    /// Add a walker of the given role.
    ///
    /// The walker spawns at the role's start location (occupying it
    /// immediately) and makes its first move at the current tick.
    pub fn spawn(&mut self, profile: Arc<RoleProfile>) -> SimResult<AgentId> {
        let agent = AgentId::try_from(self.walkers.len())
            .ok()
            .filter(|&id| id != AgentId::INVALID)
            .ok_or_else(|| {
                SimError::Config(format!("walker limit reached ({} walkers)", self.walkers.len()))
            })?;
        let start = profile.start;
        let node = self.registry.node_of(start)?;

        self.occupancy.enter(start);
        self.rngs.push(AgentRng::new(self.config.seed, agent));
        self.walkers.push(Walker {
            selector: DestinationSelector::new(profile),
            node,
            phase: Phase::Dwelling {
                until: self.clock.current_tick,
            },
        });
        self.wake.push(self.clock.current_tick, agent);
        Ok(agent)
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn occupancy(&self) -> &OccupancyTracker {
        &self.occupancy
    }

    pub fn registry(&self) -> &LocationRegistry {
        &self.registry
    }

    pub fn walker_count(&self) -> usize {
        self.walkers.len()
    }

    /// The location a walker currently occupies (or is headed to).
    pub fn location_of(&self, agent: AgentId) -> LocationId {
        self.walkers[agent.index()].selector.current()
    }

    /// Is the walker currently between locations?
    pub fn is_walking(&self, agent: AgentId) -> bool {
        matches!(self.walkers[agent.index()].phase, Phase::Walking { .. })
    }

    /// Inject a wake entry outside the normal scheduling path.
    #[cfg(test)]
    pub(crate) fn force_wake(&mut self, tick: Tick, agent: AgentId) {
        self.wake.push(tick, agent);
    }

    // ── Run loop ──────────────────────────────────────────────────────────

    /// Run from the current tick to `config.total_ticks`.
    pub fn run<O: DriverObserver>(&mut self, observer: &mut O) -> SimResult<()> {
        while self.clock.current_tick.0 < self.config.total_ticks {
            let now = self.clock.current_tick;
            let acted = self.step(observer)?;
            observer.on_tick_end(now, acted);
            self.clock.advance();
        }
        observer.on_sim_end(self.clock.current_tick);
        Ok(())
    }

    /// Run exactly `n` ticks from the current position (ignores
    /// `total_ticks`).  Useful for tests and incremental stepping.
    pub fn run_ticks<O: DriverObserver>(&mut self, n: u64, observer: &mut O) -> SimResult<()> {
        for _ in 0..n {
            let now = self.clock.current_tick;
            let acted = self.step(observer)?;
            observer.on_tick_end(now, acted);
            self.clock.advance();
        }
        Ok(())
    }

    /// Process one tick: drain the wake queue and let each due walker act.
    fn step<O: DriverObserver>(&mut self, observer: &mut O) -> SimResult<usize> {
        let now = self.clock.current_tick;
        let mut due = match self.wake.drain_tick(now) {
            None => return Ok(0),
            Some(d) => d,
        };
        // Ascending AgentId, independent of scheduling history.  A walker
        // rescheduled after a spurious wake can appear twice at one tick.
        due.sort_unstable();
        due.dedup();
        let acted = due.len();

        for agent in due {
            let walker = &mut self.walkers[agent.index()];
            let rng = &mut self.rngs[agent.index()];

            match walker.phase {
                // ── Arrival ────────────────────────────────────────────────
                Phase::Walking {
                    arrival,
                    destination,
                    dwell_ticks,
                } if arrival <= now => {
                    walker.node = self.registry.node_of(destination)?;
                    let until = now + dwell_ticks;
                    walker.phase = Phase::Dwelling { until };
                    self.wake.push(until.max(now + 1), agent);
                    observer.on_arrive(now, agent, destination, dwell_ticks);
                }

                // ── Dwell over: pick the next destination ──────────────────
                Phase::Dwelling { until } if until <= now => {
                    let from = walker.selector.current();
                    let is_peak = self.config.peak.contains(&self.clock);
                    let context = walker.selector.context_for(is_peak);

                    let sel = walker.selector.next_destination(
                        &self.registry,
                        context,
                        &mut self.occupancy,
                        rng,
                    )?;
                    match sel.kind {
                        SelectionKind::Weighted => {}
                        SelectionKind::QuotaReturn => {
                            observer.on_quota_return(now, agent, sel.destination);
                        }
                        SelectionKind::CapacityFallback => {
                            observer.on_capacity_fallback(now, agent, sel.destination);
                        }
                    }

                    let dwell_secs = walker.selector.dwell_secs(&self.registry, sel.destination, rng)?;
                    let dwell_ticks = self.clock.ticks_for_secs(dwell_secs);
                    let dest_node = self.registry.node_of(sel.destination)?;

                    if dest_node == walker.node {
                        // Same node (self-transition or co-located
                        // locations): no walk, dwell starts immediately.
                        let until = now + dwell_ticks;
                        walker.phase = Phase::Dwelling { until };
                        self.wake.push(until.max(now + 1), agent);
                        observer.on_arrive(now, agent, sel.destination, dwell_ticks);
                        continue;
                    }

                    let path = self.finder.shortest_path(
                        &self.graph,
                        walker.node,
                        dest_node,
                        self.config.allowed_types.as_deref(),
                    )?;
                    if path.is_empty() {
                        return Err(SimError::Unreachable {
                            from: walker.node,
                            to: dest_node,
                        });
                    }

                    let distance_m = path_length(&self.graph, &path);
                    let travel_ticks = self
                        .clock
                        .ticks_for_secs(distance_m / self.config.walk_speed_mps)
                        .max(1);
                    let arrival = now + travel_ticks;
                    walker.phase = Phase::Walking {
                        arrival,
                        destination: sel.destination,
                        dwell_ticks,
                    };
                    self.wake.push(arrival, agent);
                    observer.on_depart(now, agent, from, sel.destination, distance_m, travel_ticks);
                }

                // Woken before the pending event fires.  The normal
                // scheduling path never does this, but a dropped walker
                // would be parked forever, so re-enqueue at the event tick.
                Phase::Walking { arrival, .. } => self.wake.push(arrival, agent),
                Phase::Dwelling { until } => self.wake.push(until, agent),
            }
        }

        Ok(acted)
    }
}
