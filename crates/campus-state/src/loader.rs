//! CSV loaders for location definitions and weight tables.
//!
//! Numeric table content is deployment configuration, not code; these
//! loaders are the only supported way to get it into the process.  All
//! validation happens here: duplicate or malformed entries are rejected at
//! load time instead of silently miscounting later.
//!
//! # Location CSV format
//!
//! One row per location.  `capacity` is a count or the word `unbounded`;
//! the wait columns may be empty to use the role default.
//!
//! ```csv
//! name,x,y,capacity,min_wait_secs,max_wait_secs
//! Entrance,881.02,216.67,unbounded,0,0
//! Library,147.56,291.82,300,300,600
//! Mensa,548.61,393.59,100,,
//! ```
//!
//! # Weight CSV format
//!
//! One row per `(from, context, to)` triple; context labels are those of
//! [`Context::label`].  Every registered location needs a complete row set
//! per context the role uses — [`TransitionTable::validate`] enforces that
//! after loading.
//!
//! ```csv
//! from,context,to,weight
//! Entrance,start,Library,40
//! Entrance,start,Mensa,60
//! ```

use std::io::Read;
use std::path::Path;

use serde::Deserialize;

use campus_core::Point;

use crate::context::Context;
use crate::error::{StateError, StateResult};
use crate::location::{CAPACITY_UNBOUNDED, DwellBounds, LocationDef, LocationRegistry};
use crate::table::{TransitionTable, WeightRow};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct LocationRecord {
    name: String,
    x: f64,
    y: f64,
    capacity: String,
    min_wait_secs: Option<f64>,
    max_wait_secs: Option<f64>,
}

#[derive(Deserialize)]
struct WeightRecord {
    from: String,
    context: String,
    to: String,
    weight: u32,
}

// ── Location loading ──────────────────────────────────────────────────────────

/// Load a [`LocationRegistry`] from a CSV file.
pub fn load_locations_csv(path: &Path) -> StateResult<LocationRegistry> {
    let file = std::fs::File::open(path).map_err(StateError::Io)?;
    load_locations_reader(file)
}

/// Like [`load_locations_csv`] but accepts any `Read` source.
///
/// Useful for testing (pass a `std::io::Cursor`) or embedded scenario
/// data.
pub fn load_locations_reader<R: Read>(reader: R) -> StateResult<LocationRegistry> {
    let mut csv_reader = csv::Reader::from_reader(reader);
    let mut registry = LocationRegistry::new();

    for result in csv_reader.deserialize::<LocationRecord>() {
        let row = result.map_err(|e| StateError::Parse(e.to_string()))?;

        let capacity = parse_capacity(&row.capacity)?;
        let mut def = LocationDef::new(row.name, Point::new(row.x, row.y), capacity);

        def.wait = match (row.min_wait_secs, row.max_wait_secs) {
            (Some(min), Some(max)) => Some(DwellBounds::new(min, max)?),
            (None, None) => None,
            _ => {
                return Err(StateError::Parse(format!(
                    "location {:?}: both or neither wait bound must be set",
                    def.name
                )));
            }
        };

        registry.add(def)?;
    }

    Ok(registry)
}

fn parse_capacity(s: &str) -> StateResult<u32> {
    match s.trim() {
        "unbounded" => Ok(CAPACITY_UNBOUNDED),
        n => n
            .parse::<u32>()
            .map_err(|_| StateError::Parse(format!("invalid capacity {n:?}"))),
    }
}

// ── Weight loading ────────────────────────────────────────────────────────────

/// Load a [`TransitionTable`] from a CSV file, resolving names against
/// `registry`.
pub fn load_weights_csv(path: &Path, registry: &LocationRegistry) -> StateResult<TransitionTable> {
    let file = std::fs::File::open(path).map_err(StateError::Io)?;
    load_weights_reader(file, registry)
}

/// Like [`load_weights_csv`] but accepts any `Read` source.
///
/// Rows are grouped by `(from, context)`; a target appearing twice in one
/// group is rejected.  Call [`TransitionTable::validate`] afterwards to
/// enforce arity and the sum-to-100 rule.
pub fn load_weights_reader<R: Read>(
    reader: R,
    registry: &LocationRegistry,
) -> StateResult<TransitionTable> {
    let mut csv_reader = csv::Reader::from_reader(reader);

    // (from, context) → (target, weight) pairs, in file order.
    let mut groups: Vec<((campus_core::LocationId, Context), Vec<(campus_core::LocationId, u32)>)> =
        Vec::new();

    for result in csv_reader.deserialize::<WeightRecord>() {
        let row = result.map_err(|e| StateError::Parse(e.to_string()))?;

        let from = registry
            .id_of(&row.from)
            .ok_or_else(|| StateError::UnknownLocationName(row.from.clone()))?;
        let to = registry
            .id_of(&row.to)
            .ok_or_else(|| StateError::UnknownLocationName(row.to.clone()))?;
        let context = Context::parse(&row.context)
            .ok_or_else(|| StateError::Parse(format!("unknown context {:?}", row.context)))?;

        let key = (from, context);
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, pairs)) => pairs.push((to, row.weight)),
            None => groups.push((key, vec![(to, row.weight)])),
        }
    }

    let mut table = TransitionTable::new();
    for ((from, context), pairs) in groups {
        let row = WeightRow::from_pairs(pairs)?;
        table.set_row(from, context, row);
    }

    Ok(table)
}
