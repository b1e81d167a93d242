//! `campus-core` — foundational types for the campus movement core.
//!
//! This crate is a dependency of every other `campus-*` crate.  It
//! intentionally has no `campus-*` dependencies and minimal external ones
//! (only `rand` and `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module    | Contents                                         |
//! |-----------|--------------------------------------------------|
//! | [`ids`]   | `AgentId`, `NodeId`, `LocationId`                |
//! | [`point`] | `Point`, Euclidean distance                      |
//! | [`time`]  | `Tick`, `SimClock`, `PeakWindow`                 |
//! | [`rng`]   | `AgentRng` (per-agent, seed-derived)             |
//! | [`error`] | `CoreError`, `CoreResult`                        |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                |
//! |---------|-------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.   |

pub mod error;
pub mod ids;
pub mod point;
pub mod rng;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{CoreError, CoreResult};
pub use ids::{AgentId, LocationId, NodeId};
pub use point::Point;
pub use rng::AgentRng;
pub use time::{PeakWindow, SimClock, Tick};
