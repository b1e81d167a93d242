//! The destination selector — a per-agent stochastic state machine.
//!
//! States are locations; the transition relation is the role's
//! [`TransitionTable`] indexed by `(current location, context)`.  There is
//! no terminal state: the machine runs for the simulation's duration,
//! starting at the role's configured start location.
//!
//! Role variation (bachelor / master / staff on a real campus) is pure
//! data: each role is a [`RoleProfile`] naming its table, thresholds,
//! dwell defaults, and optional return-home rule.  One selector type serves
//! every role.

use std::sync::Arc;

use campus_core::{AgentRng, LocationId};

use crate::context::Context;
use crate::error::{StateError, StateResult};
use crate::location::{DwellBounds, LocationRegistry};
use crate::occupancy::OccupancyTracker;
use crate::table::TransitionTable;

// ── RoleProfile ───────────────────────────────────────────────────────────────

/// "Return to `home` once `after_visits` locations have been visited" —
/// evaluated before the probability tables on every cycle.  `except_at`
/// names a location the rule does not fire from (the Mensa: agents finish
/// lunch before heading home).
#[derive(Debug, Clone)]
pub struct ReturnHomeRule {
    pub after_visits: usize,
    pub home: LocationId,
    pub except_at: Option<LocationId>,
}

/// Everything that distinguishes one agent role from another.
///
/// Shared immutably (`Arc`) by all agents of the role.
#[derive(Debug, Clone)]
pub struct RoleProfile {
    /// Role name, for traces and diagnostics.
    pub name: String,

    /// Transition relation: one weight row per (location, context).
    pub table: TransitionTable,

    /// Location agents of this role spawn at (their initial state).
    pub start: LocationId,

    /// Dwell bounds for locations without per-location bounds.
    pub default_wait: DwellBounds,

    /// Visits needed before the quota-met contexts apply.
    pub visit_quota: usize,

    /// Optional quota short-circuit (see [`ReturnHomeRule`]).
    pub return_home: Option<ReturnHomeRule>,
}

// ── Selection ─────────────────────────────────────────────────────────────────

/// How a destination was chosen.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum SelectionKind {
    /// Normal weighted draw from the capacity-adjusted row.
    Weighted,
    /// The role's return-home rule short-circuited the draw.
    QuotaReturn,
    /// Every candidate was at capacity; the draw ignored occupancy.
    ///
    /// This is the documented deadlock fallback — the one path on which a
    /// destination may exceed its capacity.  Observers should surface it.
    CapacityFallback,
}

/// The result of one destination query.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Selection {
    pub destination: LocationId,
    pub kind: SelectionKind,
}

// ── DestinationSelector ───────────────────────────────────────────────────────

/// Per-agent selector state: current location plus visit history.
///
/// Created when an agent spawns (all agents of a role share one profile),
/// mutated every movement cycle, dropped with the agent.
#[derive(Debug, Clone)]
pub struct DestinationSelector {
    profile: Arc<RoleProfile>,
    current: LocationId,
    history: Vec<LocationId>,
}

impl DestinationSelector {
    /// Create a selector at the role's start location with empty history.
    pub fn new(profile: Arc<RoleProfile>) -> Self {
        let current = profile.start;
        Self {
            profile,
            current,
            history: Vec::new(),
        }
    }

    pub fn profile(&self) -> &RoleProfile {
        &self.profile
    }

    /// The agent's current location (the machine's current state).
    pub fn current(&self) -> LocationId {
        self.current
    }

    /// Ordered visit history (destinations committed so far).
    pub fn history(&self) -> &[LocationId] {
        &self.history
    }

    /// Derive the context for the next query from the peak flag and the
    /// agent's own history: no visits yet means the first move of the day.
    pub fn context_for(&self, is_peak: bool) -> Context {
        if self.history.is_empty() {
            return Context::Start;
        }
        let quota_met = self.history.len() >= self.profile.visit_quota;
        if is_peak {
            Context::Peak { quota_met }
        } else {
            Context::OffPeak { quota_met }
        }
    }

    /// Pick the next destination and commit the occupancy transfer.
    ///
    /// The decision sequence:
    ///
    /// 1. The return-home rule, when configured and armed (history at or
    ///    past its threshold, current location not exempt), short-circuits
    ///    straight home without consulting any weight row.  The current
    ///    location's count is released; history is not extended.
    /// 2. Otherwise the `(current, context)` row is capacity-adjusted and
    ///    drawn from.  An all-zero adjusted row means every candidate is
    ///    full; rather than strand the agent, the draw is repeated against
    ///    the unadjusted row ([`SelectionKind::CapacityFallback`]).
    /// 3. On a normal draw the occupancy transfer is committed and the
    ///    destination appended to history.
    ///
    /// An all-zero *unadjusted* row is a configuration error.
    pub fn next_destination(
        &mut self,
        registry: &LocationRegistry,
        context: Context,
        occupancy: &mut OccupancyTracker,
        rng: &mut AgentRng,
    ) -> StateResult<Selection> {
        registry.get(self.current)?;

        if let Some(rule) = &self.profile.return_home {
            if self.history.len() >= rule.after_visits && rule.except_at != Some(self.current) {
                let home = rule.home;
                occupancy.leave(self.current);
                occupancy.enter(home);
                self.current = home;
                return Ok(Selection {
                    destination: home,
                    kind: SelectionKind::QuotaReturn,
                });
            }
        }

        let row = self.profile.table.row(self.current, context)?;
        let adjusted = row.adjusted_for_capacity(occupancy);
        let r = rng.gen_range(0..100u32);

        let (destination, kind) = match adjusted.draw(r) {
            Some(dest) => (dest, SelectionKind::Weighted),
            // Deadlock by capacity: resample ignoring occupancy.
            None => match row.draw(r) {
                Some(dest) => (dest, SelectionKind::CapacityFallback),
                None => {
                    return Err(StateError::DeadEndRow {
                        location: self.current,
                        context,
                    });
                }
            },
        };

        occupancy.leave(self.current);
        occupancy.enter(destination);
        self.history.push(destination);
        self.current = destination;

        Ok(Selection { destination, kind })
    }

    /// Sample how long the agent stays at `destination`, in simulated
    /// seconds: the location's own bounds when defined, else the role
    /// default.
    pub fn dwell_secs(
        &self,
        registry: &LocationRegistry,
        destination: LocationId,
        rng: &mut AgentRng,
    ) -> StateResult<f64> {
        let def = registry.get(destination)?;
        let bounds: DwellBounds = def.wait.unwrap_or(self.profile.default_wait);
        Ok(bounds.sample(rng))
    }
}
