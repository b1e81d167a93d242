//! Keyed weight rows and the per-role transition table.
//!
//! A `WeightRow` maps each candidate destination to a non-negative integer
//! weight; rows conceptually sum to 100 before capacity adjustment.  The
//! mapping is stored as a `Vec<(LocationId, u32)>` kept sorted by ID, which
//! gives keyed lookup *and* a deterministic iteration order for the
//! cumulative draw — the two properties positional arrays lack.

use rustc_hash::FxHashMap;

use campus_core::LocationId;

use crate::context::Context;
use crate::error::{StateError, StateResult};
use crate::location::LocationRegistry;
use crate::occupancy::OccupancyTracker;

// ── WeightRow ─────────────────────────────────────────────────────────────────

/// An explicit `LocationId → weight` mapping, iterated in ascending ID
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeightRow {
    /// Sorted by `LocationId`; at most one entry per target.
    entries: Vec<(LocationId, u32)>,
}

impl WeightRow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a row from `(target, weight)` pairs in any order.
    ///
    /// Rejects duplicate targets — a duplicated entry in a source table is
    /// a configuration error, not something to sum silently.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (LocationId, u32)>) -> StateResult<Self> {
        let mut entries: Vec<(LocationId, u32)> = pairs.into_iter().collect();
        entries.sort_unstable_by_key(|&(loc, _)| loc);
        for w in entries.windows(2) {
            if w[0].0 == w[1].0 {
                return Err(StateError::DuplicateTarget(w[0].0));
            }
        }
        Ok(Self { entries })
    }

    /// The weight assigned to `target` (0 if absent).
    pub fn weight(&self, target: LocationId) -> u32 {
        match self.entries.binary_search_by_key(&target, |&(loc, _)| loc) {
            Ok(i) => self.entries[i].1,
            Err(_) => 0,
        }
    }

    /// Insert or replace the weight for `target`.
    pub fn set(&mut self, target: LocationId, weight: u32) {
        match self.entries.binary_search_by_key(&target, |&(loc, _)| loc) {
            Ok(i) => self.entries[i].1 = weight,
            Err(i) => self.entries.insert(i, (target, weight)),
        }
    }

    /// Sum of all weights.
    pub fn total(&self) -> u32 {
        self.entries.iter().map(|&(_, w)| w).sum()
    }

    /// Entries in ascending `LocationId` order.
    pub fn iter(&self) -> impl Iterator<Item = (LocationId, u32)> + '_ {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ── Capacity adjustment ───────────────────────────────────────────────

    /// Produce a working copy with every full location's weight zeroed and
    /// the removed total redistributed evenly across the remaining open
    /// (non-full) entries.
    ///
    /// Recipients are the open entries that already carry weight; when the
    /// zeroing leaves none, every open entry becomes a recipient instead so
    /// the removed weight is never silently lost.  Single pass, not
    /// iterative: redistribution happens once even if it pushes a near-full
    /// location's attractiveness up.  The division remainder is handed out
    /// one unit at a time in ascending ID order, so the adjusted total
    /// equals the original total whenever at least one open entry exists.
    /// If every candidate is full the result is all-zero and the caller
    /// applies the deadlock fallback.
    pub fn adjusted_for_capacity(&self, occupancy: &OccupancyTracker) -> WeightRow {
        let mut adjusted = self.clone();
        let mut removed: u32 = 0;

        for &(target, weight) in &self.entries {
            if occupancy.is_full(target) {
                removed += weight;
                adjusted.set(target, 0);
            }
        }
        if removed == 0 {
            return adjusted;
        }

        let open_nonzero = adjusted.entries.iter().filter(|&&(_, w)| w > 0).count();
        let spread_to_all_open = open_nonzero == 0;
        let recipients = if spread_to_all_open {
            self.entries
                .iter()
                .filter(|&&(target, _)| !occupancy.is_full(target))
                .count()
        } else {
            open_nonzero
        };
        if recipients == 0 {
            return adjusted;
        }

        let share = removed / recipients as u32;
        let mut remainder = removed % recipients as u32;
        for (target, weight) in adjusted.entries.iter_mut() {
            let eligible = if spread_to_all_open {
                !occupancy.is_full(*target)
            } else {
                *weight > 0
            };
            if eligible {
                *weight += share;
                if remainder > 0 {
                    *weight += 1;
                    remainder -= 1;
                }
            }
        }
        adjusted
    }

    // ── Weighted draw ─────────────────────────────────────────────────────

    /// Resolve a uniform draw `r ∈ [0, 100)` against the row: the first
    /// location in ID order with nonzero weight whose cumulative sum
    /// exceeds `r`.
    ///
    /// Robust to rows that no longer sum to exactly 100 after adjustment:
    /// an under-sum row falls back to its last nonzero entry rather than
    /// failing.  Returns `None` only for an all-zero row.
    pub fn draw(&self, r: u32) -> Option<LocationId> {
        let mut sum: u32 = 0;
        let mut last_nonzero = None;

        for &(target, weight) in &self.entries {
            if weight == 0 {
                continue;
            }
            sum += weight;
            last_nonzero = Some(target);
            if sum > r {
                return Some(target);
            }
        }
        last_nonzero
    }
}

// ── TransitionTable ───────────────────────────────────────────────────────────

/// One role's full transition relation: a weight row per
/// `(location, context)` pair.
#[derive(Debug, Clone, Default)]
pub struct TransitionTable {
    rows: FxHashMap<(LocationId, Context), WeightRow>,
}

impl TransitionTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the row for `(from, context)`, replacing any existing one.
    pub fn set_row(&mut self, from: LocationId, context: Context, row: WeightRow) {
        self.rows.insert((from, context), row);
    }

    /// The row for `(from, context)`.
    ///
    /// A missing row is a configuration error: every location must define
    /// one row per context its role uses.
    pub fn row(&self, from: LocationId, context: Context) -> StateResult<&WeightRow> {
        self.rows
            .get(&(from, context))
            .ok_or(StateError::MissingRow { location: from, context })
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Load-time validation pass.
    ///
    /// For every registry location and every context in `contexts`, the
    /// table must hold a row whose targets are all registered, whose
    /// weights sum to exactly 100, and which has at least one nonzero
    /// entry.  Duplicate targets are already unrepresentable
    /// ([`WeightRow::from_pairs`] rejects them).
    pub fn validate(&self, registry: &LocationRegistry, contexts: &[Context]) -> StateResult<()> {
        for (location, _) in registry.iter() {
            for &context in contexts {
                let row = self.row(location, context)?;
                for (target, _) in row.iter() {
                    registry.get(target)?;
                }
                let total = row.total();
                if total != 100 {
                    return Err(StateError::BadWeightSum { location, context, total });
                }
                if row.draw(0).is_none() {
                    return Err(StateError::DeadEndRow { location, context });
                }
            }
        }
        Ok(())
    }
}
