//! Driver observer trait for progress reporting and trace collection.

use campus_core::{AgentId, LocationId, Tick};

/// Callbacks invoked by [`MovementDriver::run`][crate::MovementDriver::run]
/// at key points in the tick loop.
///
/// All methods have default no-op implementations so implementors only need
/// to override what they care about.
///
/// # Example — fallback counter
///
/// ```rust,ignore
/// #[derive(Default)]
/// struct FallbackCounter(u64);
///
/// impl DriverObserver for FallbackCounter {
///     fn on_capacity_fallback(&mut self, _t: Tick, _a: AgentId, _d: LocationId) {
///         self.0 += 1;
///     }
/// }
/// ```
pub trait DriverObserver {
    /// A walker committed to a destination and started walking.
    ///
    /// `distance_m` is the full path length; `travel_ticks` how long the
    /// walk will take.
    fn on_depart(
        &mut self,
        _tick: Tick,
        _agent: AgentId,
        _from: LocationId,
        _to: LocationId,
        _distance_m: f64,
        _travel_ticks: u64,
    ) {
    }

    /// A walker reached `location` and will dwell there for `dwell_ticks`.
    fn on_arrive(&mut self, _tick: Tick, _agent: AgentId, _location: LocationId, _dwell_ticks: u64) {
    }

    /// Every candidate destination was at capacity; the draw ignored
    /// occupancy and `destination` may now exceed its limit.
    fn on_capacity_fallback(&mut self, _tick: Tick, _agent: AgentId, _destination: LocationId) {}

    /// The walker's visit quota sent it straight home, bypassing the
    /// weight tables.
    fn on_quota_return(&mut self, _tick: Tick, _agent: AgentId, _home: LocationId) {}

    /// Called at the end of each tick; `acted` is the number of walkers
    /// that were woken this tick.
    fn on_tick_end(&mut self, _tick: Tick, _acted: usize) {}

    /// Called once after the final tick completes.
    fn on_sim_end(&mut self, _final_tick: Tick) {}
}

/// A [`DriverObserver`] that does nothing.
pub struct NoopObserver;

impl DriverObserver for NoopObserver {}
