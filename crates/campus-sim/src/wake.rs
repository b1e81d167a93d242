//! `WakeQueue` — sparse per-tick walker activation queue.
//!
//! A walker needs attention only at two kinds of ticks: when its dwell time
//! runs out (pick the next destination) and when it reaches a destination
//! (start dwelling).  Everything in between is dead time — a walker crossing
//! the campus for 200 ticks does nothing on 199 of them.  Scanning all
//! walkers every tick would cost O(N) regardless.
//!
//! The queue inverts that: whenever the driver decides a walker's next
//! event, it registers the tick at which the walker must be looked at
//! again.  Each tick drains only the walkers due exactly then, so the loop
//! does O(active) work.
//!
//! `BTreeMap` keeps distinct wake ticks ordered; with dwell times of a few
//! hundred seconds and a 1 s tick the map stays small and the log factor is
//! negligible.

use std::collections::BTreeMap;

use campus_core::{AgentId, Tick};

/// Maps future ticks to the walkers that must act at that tick.
#[derive(Default)]
pub struct WakeQueue {
    inner: BTreeMap<Tick, Vec<AgentId>>,
    /// Cached entry count for O(1) `len()`.
    total: usize,
}

impl WakeQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `agent` to act at `tick`.
    pub fn push(&mut self, tick: Tick, agent: AgentId) {
        self.inner.entry(tick).or_default().push(agent);
        self.total += 1;
    }

    /// Remove and return all walkers due at exactly `tick`, or `None` when
    /// the tick is quiet (the common case — avoids allocating).
    ///
    /// The returned list is in push order; the driver sorts it by
    /// `AgentId` before acting so the processing order never depends on
    /// scheduling history.
    pub fn drain_tick(&mut self, tick: Tick) -> Option<Vec<AgentId>> {
        let agents = self.inner.remove(&tick)?;
        self.total -= agents.len();
        Some(agents)
    }

    /// The earliest tick with at least one queued walker.
    pub fn next_tick(&self) -> Option<Tick> {
        self.inner.keys().next().copied()
    }

    /// Total queued entries across all future ticks.
    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Number of distinct future ticks with at least one queued walker.
    pub fn tick_count(&self) -> usize {
        self.inner.len()
    }
}
