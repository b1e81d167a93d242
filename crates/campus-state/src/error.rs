//! State-subsystem error type.
//!
//! Two failure classes are kept distinct, per the error-handling design:
//! configuration errors (malformed tables, missing rows — fatal at load
//! time) and input-validation errors (unknown identifiers passed by the
//! caller).  Capacity contention is *not* an error; the selector recovers
//! locally via the documented fallback.

use thiserror::Error;

use campus_core::LocationId;

use crate::context::Context;

/// Errors produced by `campus-state`.
#[derive(Debug, Error)]
pub enum StateError {
    // ── Input validation ──────────────────────────────────────────────────
    #[error("unknown location {0}")]
    UnknownLocation(LocationId),

    #[error("unknown location name {0:?}")]
    UnknownLocationName(String),

    // ── Configuration errors ──────────────────────────────────────────────
    #[error("duplicate location {0:?}")]
    DuplicateLocation(String),

    #[error("duplicate weight entry for target {0}")]
    DuplicateTarget(LocationId),

    #[error("no weight row for location {location} in context {context}")]
    MissingRow { location: LocationId, context: Context },

    #[error("weight row for {location} in context {context} sums to {total}, expected 100")]
    BadWeightSum {
        location: LocationId,
        context: Context,
        total: u32,
    },

    #[error("weight row for {location} in context {context} has no nonzero entry")]
    DeadEndRow { location: LocationId, context: Context },

    #[error("configuration error: {0}")]
    Config(String),

    // ── Loader plumbing ───────────────────────────────────────────────────
    #[error("table parse error: {0}")]
    Parse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StateResult<T> = Result<T, StateError>;
