//! CSV trace output.
//!
//! Two files describe a run completely:
//!
//! - `moves.csv` — one row per departure (who, when, from, to, how far,
//!   how long).
//! - `visits.csv` — one row per arrival (who, when, where, dwell length,
//!   and how the destination was chosen).
//!
//! [`TraceObserver`] bridges [`DriverObserver`] to any [`TraceWriter`]
//! backend.  Observer methods cannot return errors, so write failures are
//! stored and retrieved with [`TraceObserver::take_error`] after the run.

use std::fs::File;
use std::io;
use std::path::Path;

use csv::Writer;

use campus_core::{AgentId, LocationId, Tick};

use crate::observer::DriverObserver;

// ── Rows ──────────────────────────────────────────────────────────────────────

/// One departure.
pub struct MoveRow {
    pub agent_id: u32,
    pub tick: u64,
    pub from: u16,
    pub to: u16,
    pub distance_m: f64,
    pub travel_ticks: u64,
}

/// One arrival.
pub struct VisitRow {
    pub agent_id: u32,
    pub tick: u64,
    pub location: u16,
    pub dwell_ticks: u64,
    /// `weighted`, `quota_return`, or `capacity_fallback`.
    pub selection: &'static str,
}

// ── TraceWriter ───────────────────────────────────────────────────────────────

/// Backend interface for trace sinks.
pub trait TraceWriter {
    fn write_move(&mut self, row: &MoveRow) -> io::Result<()>;
    fn write_visit(&mut self, row: &VisitRow) -> io::Result<()>;

    /// Flush and close.  Idempotent — safe to call more than once.
    fn finish(&mut self) -> io::Result<()>;
}

/// Writes `moves.csv` and `visits.csv` into a directory.
pub struct CsvTraceWriter {
    moves: Writer<File>,
    visits: Writer<File>,
    finished: bool,
}

impl CsvTraceWriter {
    /// Open (or create) the two files in `dir` and write header rows.
    pub fn new(dir: &Path) -> io::Result<Self> {
        let mut moves = Writer::from_path(dir.join("moves.csv")).map_err(into_io)?;
        moves
            .write_record(["agent_id", "tick", "from", "to", "distance_m", "travel_ticks"])
            .map_err(into_io)?;

        let mut visits = Writer::from_path(dir.join("visits.csv")).map_err(into_io)?;
        visits
            .write_record(["agent_id", "tick", "location", "dwell_ticks", "selection"])
            .map_err(into_io)?;

        Ok(Self {
            moves,
            visits,
            finished: false,
        })
    }
}

fn into_io(e: csv::Error) -> io::Error {
    io::Error::other(e)
}

impl TraceWriter for CsvTraceWriter {
    fn write_move(&mut self, row: &MoveRow) -> io::Result<()> {
        self.moves
            .write_record(&[
                row.agent_id.to_string(),
                row.tick.to_string(),
                row.from.to_string(),
                row.to.to_string(),
                format!("{:.2}", row.distance_m),
                row.travel_ticks.to_string(),
            ])
            .map_err(into_io)
    }

    fn write_visit(&mut self, row: &VisitRow) -> io::Result<()> {
        self.visits
            .write_record(&[
                row.agent_id.to_string(),
                row.tick.to_string(),
                row.location.to_string(),
                row.dwell_ticks.to_string(),
                row.selection.to_string(),
            ])
            .map_err(into_io)
    }

    fn finish(&mut self) -> io::Result<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.moves.flush()?;
        self.visits.flush()?;
        Ok(())
    }
}

// ── TraceObserver ─────────────────────────────────────────────────────────────

/// A [`DriverObserver`] that records moves and visits to a
/// [`TraceWriter`] backend.
pub struct TraceObserver<W: TraceWriter> {
    writer: W,
    /// Selection kind of the walker's pending arrival, indexed by agent.
    pending_kind: Vec<&'static str>,
    last_error: Option<io::Error>,
}

impl<W: TraceWriter> TraceObserver<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pending_kind: Vec::new(),
            last_error: None,
        }
    }

    /// Take the stored write error (if any) after the run.
    pub fn take_error(&mut self) -> Option<io::Error> {
        self.last_error.take()
    }

    /// Unwrap the inner writer (e.g. to inspect files after the run).
    pub fn into_writer(self) -> W {
        self.writer
    }

    fn store_err(&mut self, result: io::Result<()>) {
        if let Err(e) = result {
            // Keep only the first error.
            if self.last_error.is_none() {
                self.last_error = Some(e);
            }
        }
    }

    fn set_kind(&mut self, agent: AgentId, kind: &'static str) {
        let i = agent.index();
        if self.pending_kind.len() <= i {
            self.pending_kind.resize(i + 1, "weighted");
        }
        self.pending_kind[i] = kind;
    }

    fn kind_of(&mut self, agent: AgentId) -> &'static str {
        let i = agent.index();
        if i < self.pending_kind.len() {
            std::mem::replace(&mut self.pending_kind[i], "weighted")
        } else {
            "weighted"
        }
    }
}

impl<W: TraceWriter> DriverObserver for TraceObserver<W> {
    fn on_depart(
        &mut self,
        tick: Tick,
        agent: AgentId,
        from: LocationId,
        to: LocationId,
        distance_m: f64,
        travel_ticks: u64,
    ) {
        let row = MoveRow {
            agent_id: agent.0,
            tick: tick.0,
            from: from.0,
            to: to.0,
            distance_m,
            travel_ticks,
        };
        let result = self.writer.write_move(&row);
        self.store_err(result);
    }

    fn on_arrive(&mut self, tick: Tick, agent: AgentId, location: LocationId, dwell_ticks: u64) {
        let selection = self.kind_of(agent);
        let row = VisitRow {
            agent_id: agent.0,
            tick: tick.0,
            location: location.0,
            dwell_ticks,
            selection,
        };
        let result = self.writer.write_visit(&row);
        self.store_err(result);
    }

    fn on_capacity_fallback(&mut self, _tick: Tick, agent: AgentId, _destination: LocationId) {
        self.set_kind(agent, "capacity_fallback");
    }

    fn on_quota_return(&mut self, _tick: Tick, agent: AgentId, _home: LocationId) {
        self.set_kind(agent, "quota_return");
    }

    fn on_sim_end(&mut self, _final_tick: Tick) {
        let result = self.writer.finish();
        self.store_err(result);
    }
}
