//! `campus-state` — locations, occupancy, and the destination state machine.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`context`]   | `Context` — situational flags selecting a weight row      |
//! | [`table`]     | `WeightRow` (keyed weights), `TransitionTable`            |
//! | [`location`]  | `LocationDef`, `DwellBounds`, `LocationRegistry`          |
//! | [`occupancy`] | `OccupancyTracker` — shared per-location counters         |
//! | [`selector`]  | `RoleProfile`, `DestinationSelector`, `Selection`         |
//! | [`loader`]    | CSV loaders + load-time validation                        |
//! | [`error`]     | `StateError`, `StateResult<T>`                            |
//!
//! # Design notes
//!
//! The selector is a state machine whose states are locations and whose
//! transition relation is a per-(location, context) weight row.  Two
//! principles shape the crate:
//!
//! - Weights are an explicit `LocationId → weight` mapping, never a
//!   positional array.  Reordering the location list cannot silently change
//!   the meaning of a row, and duplicate entries are rejected at load time.
//! - The occupancy tracker is one explicitly owned value injected by
//!   `&mut` into every selector call — there is no process-global state.

pub mod context;
pub mod error;
pub mod loader;
pub mod location;
pub mod occupancy;
pub mod selector;
pub mod table;


pub use context::Context;
pub use error::{StateError, StateResult};
pub use loader::{load_locations_csv, load_locations_reader, load_weights_csv, load_weights_reader};
pub use location::{CAPACITY_UNBOUNDED, DwellBounds, LocationDef, LocationRegistry};
pub use occupancy::OccupancyTracker;
pub use selector::{DestinationSelector, ReturnHomeRule, RoleProfile, Selection, SelectionKind};
pub use table::{TransitionTable, WeightRow};
