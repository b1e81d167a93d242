//! `campus-sim` — the sequential movement driver.
//!
//! # Crate layout
//!
//! | Module       | Contents                                               |
//! |--------------|--------------------------------------------------------|
//! | [`driver`]   | `MovementDriver`, `DriverConfig` — the tick loop       |
//! | [`wake`]     | `WakeQueue` — sparse per-tick activation queue         |
//! | [`observer`] | `DriverObserver` trait, `NoopObserver`                 |
//! | [`trace`]    | `TraceWriter`, `CsvTraceWriter`, `TraceObserver`       |
//! | [`error`]    | `SimError`, `SimResult<T>`                             |
//!
//! The driver composes the other crates: `campus-graph` answers "how do I
//! get there", `campus-state` answers "where next and for how long", and
//! this crate supplies the time axis — walkers dwell, decide, walk, arrive,
//! forever, one tick at a time.

pub mod driver;
pub mod error;
pub mod observer;
pub mod trace;
pub mod wake;

#[cfg(test)]
mod tests;

pub use driver::{DriverConfig, MovementDriver};
pub use error::{SimError, SimResult};
pub use observer::{DriverObserver, NoopObserver};
pub use trace::{CsvTraceWriter, MoveRow, TraceObserver, TraceWriter, VisitRow};
pub use wake::WakeQueue;
