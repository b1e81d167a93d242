//! mi-campus — pedestrian movement in the MI university building.
//!
//! Simulates bachelor students, master students, and staff moving between
//! the building's 15 named locations over a morning: everyone enters at the
//! Entrance, circulates between lecture halls, seminar rooms, and the
//! library according to context-weighted tables, crowds into the Mensa
//! during the lunch window, and heads back to the Entrance once their
//! visits are done.  Movement traces land in `output/mi-campus/`.

mod graph;

use std::io::Cursor;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;

use campus_core::{AgentId, LocationId, PeakWindow, Tick};
use campus_graph::DijkstraPathFinder;
use campus_state::{
    Context, DwellBounds, LocationRegistry, ReturnHomeRule, RoleProfile, TransitionTable,
    load_locations_reader, load_weights_reader,
};
use campus_sim::{CsvTraceWriter, DriverConfig, DriverObserver, MovementDriver, TraceObserver};

use graph::build_walk_graph;

// ── Constants ─────────────────────────────────────────────────────────────────

const BACHELORS: usize = 40;
const MASTERS: usize = 30;
const STAFF: usize = 10;
const SEED: u64 = 42;
const TICK_DURATION_SECS: u32 = 1;
const TOTAL_TICKS: u64 = 14_400; // a 4-hour morning at 1 s resolution

/// The lunch window, in simulated seconds.
const LUNCH: PeakWindow = PeakWindow {
    start_secs: 700,
    end_secs: 900,
};

const WALK_SPEED_MPS: f64 = 1.5;

// ── Location CSV ──────────────────────────────────────────────────────────────

// Coordinates from the building survey; capacities and dwell bounds are the
// deployment's occupancy limits in persons and seconds.
const LOCATIONS_CSV: &str = "\
name,x,y,capacity,min_wait_secs,max_wait_secs\n\
LectureHall1,987.70,343.45,200,500,500\n\
LectureHall2,707.16,447.99,150,500,500\n\
LectureHall3,860.44,495.73,100,500,500\n\
SeminarHall1,120.56,0.00,50,500,500\n\
SeminarHall2,637.79,511.05,50,500,500\n\
SeminarHall3,481.63,193.80,50,500,500\n\
SeminarHall4,278.89,157.64,50,500,500\n\
SeminarHall5,149.85,135.00,50,500,500\n\
MainHall1,814.56,368.49,100,0,500\n\
MainHall2,453.13,278.73,100,0,500\n\
MainHall3,257.52,223.94,100,0,500\n\
Mensa,548.61,393.59,100,300,600\n\
Entrance,881.02,216.67,unbounded,0,0\n\
ComputerHall,667.17,208.08,200,100,600\n\
Library,147.56,291.82,300,300,600\n\
";

// ── Weight tables ─────────────────────────────────────────────────────────────

/// Target order of every weight array below.
const TARGETS: [&str; 15] = [
    "LectureHall1",
    "LectureHall2",
    "LectureHall3",
    "SeminarHall1",
    "SeminarHall2",
    "SeminarHall3",
    "SeminarHall4",
    "SeminarHall5",
    "MainHall1",
    "MainHall2",
    "MainHall3",
    "Mensa",
    "Entrance",
    "ComputerHall",
    "Library",
];

/// One location's weight rows: which vector applies in which context.
///
/// `done` serves both quota-met contexts; once a walker has made its
/// visits, lunch no longer changes where it drifts.
struct LocationRows {
    start: [u32; 15],
    peak: [u32; 15],
    offpeak: [u32; 15],
    done: [u32; 15],
}

// Five row groups cover the 15 locations; weights within a group are
// identical (the survey tables distinguish the big lecture hall, the hall
// cluster, the central halls + Mensa, the Entrance, and the quiet rooms).
// Every row sums to exactly 100.

static ROWS_LECTURE_HALL_1: LocationRows = LocationRows {
    start: [6, 6, 6, 4, 4, 4, 4, 4, 3, 3, 3, 43, 0, 5, 5],
    peak: [8, 8, 8, 6, 6, 6, 6, 6, 5, 5, 5, 11, 0, 10, 10],
    offpeak: [5, 5, 5, 3, 3, 3, 3, 3, 5, 5, 5, 10, 15, 15, 15],
    done: [5, 5, 5, 3, 3, 3, 3, 3, 2, 2, 2, 48, 10, 3, 3],
};

static ROWS_HALL_CLUSTER: LocationRows = LocationRows {
    start: [2, 2, 2, 2, 2, 2, 2, 2, 5, 5, 5, 39, 20, 5, 5],
    peak: [6, 6, 6, 4, 4, 4, 4, 4, 2, 2, 2, 5, 21, 15, 15],
    offpeak: [5, 5, 5, 3, 3, 3, 3, 3, 5, 5, 5, 10, 15, 15, 15],
    done: [3, 3, 3, 2, 2, 2, 2, 2, 7, 7, 7, 29, 25, 3, 3],
};

static ROWS_CENTRAL: LocationRows = LocationRows {
    start: [3, 3, 3, 2, 2, 2, 2, 2, 10, 10, 10, 36, 5, 5, 5],
    peak: [5, 5, 5, 4, 4, 4, 4, 4, 8, 8, 8, 16, 5, 10, 10],
    offpeak: [5, 5, 5, 3, 3, 3, 3, 3, 0, 0, 0, 10, 30, 15, 15],
    done: [5, 5, 5, 3, 3, 3, 3, 3, 0, 0, 0, 30, 20, 10, 10],
};

static ROWS_ENTRANCE: LocationRows = LocationRows {
    start: [5, 5, 5, 4, 4, 4, 4, 4, 16, 17, 17, 0, 15, 0, 0],
    peak: [6, 6, 6, 4, 4, 4, 4, 4, 8, 8, 8, 0, 18, 10, 10],
    offpeak: [1, 1, 1, 1, 1, 1, 1, 1, 2, 2, 2, 5, 65, 8, 8],
    done: [2, 2, 2, 1, 1, 1, 1, 1, 7, 7, 7, 0, 48, 10, 10],
};

static ROWS_QUIET: LocationRows = LocationRows {
    start: [5, 5, 5, 3, 3, 3, 3, 3, 10, 10, 10, 40, 0, 0, 0],
    peak: [12, 11, 11, 7, 7, 7, 7, 7, 7, 7, 7, 5, 5, 0, 0],
    offpeak: [1, 1, 1, 1, 1, 1, 1, 1, 2, 2, 2, 5, 65, 8, 8],
    done: [3, 3, 3, 2, 2, 2, 2, 2, 5, 5, 5, 41, 25, 0, 0],
};

fn rows_for(location: &str) -> &'static LocationRows {
    match location {
        "LectureHall1" => &ROWS_LECTURE_HALL_1,
        "MainHall2" | "MainHall3" | "Mensa" => &ROWS_CENTRAL,
        "Entrance" => &ROWS_ENTRANCE,
        "ComputerHall" | "Library" => &ROWS_QUIET,
        _ => &ROWS_HALL_CLUSTER,
    }
}

/// Render the static tables as the loader's CSV format (zero weights are
/// omitted; absent targets read as zero).
fn weights_csv() -> String {
    let mut out = String::from("from,context,to,weight\n");
    for from in TARGETS {
        let rows = rows_for(from);
        let contexts: [(&str, &[u32; 15]); 5] = [
            ("start", &rows.start),
            ("peak", &rows.peak),
            ("peak_done", &rows.done),
            ("offpeak", &rows.offpeak),
            ("offpeak_done", &rows.done),
        ];
        for (label, weights) in contexts {
            for (to, &w) in TARGETS.iter().zip(weights) {
                if w > 0 {
                    out.push_str(&format!("{from},{label},{to},{w}\n"));
                }
            }
        }
    }
    out
}

// ── Roles ─────────────────────────────────────────────────────────────────────

fn make_roles(
    registry: &LocationRegistry,
    table: &TransitionTable,
) -> Result<[Arc<RoleProfile>; 3]> {
    let entrance = registry
        .id_of("Entrance")
        .ok_or_else(|| anyhow::anyhow!("Entrance missing from the location table"))?;
    let mensa = registry
        .id_of("Mensa")
        .ok_or_else(|| anyhow::anyhow!("Mensa missing from the location table"))?;
    let default_wait = DwellBounds::new(0.0, 50.0)?;

    let bachelor = Arc::new(RoleProfile {
        name: "bachelor".into(),
        table: table.clone(),
        start: entrance,
        default_wait,
        visit_quota: 4,
        return_home: None,
    });

    let master = Arc::new(RoleProfile {
        name: "master".into(),
        table: table.clone(),
        start: entrance,
        default_wait,
        visit_quota: 4,
        return_home: Some(ReturnHomeRule {
            after_visits: 8,
            home: entrance,
            except_at: Some(mensa),
        }),
    });

    let staff = Arc::new(RoleProfile {
        name: "staff".into(),
        table: table.clone(),
        start: entrance,
        default_wait,
        visit_quota: 4,
        return_home: Some(ReturnHomeRule {
            after_visits: 4,
            home: entrance,
            except_at: Some(mensa),
        }),
    });

    Ok([bachelor, master, staff])
}

// ── Observer: traces + counters ───────────────────────────────────────────────

struct CountingObserver {
    inner: TraceObserver<CsvTraceWriter>,
    moves: usize,
    visits: usize,
    fallbacks: usize,
    quota_returns: usize,
}

impl CountingObserver {
    fn new(inner: TraceObserver<CsvTraceWriter>) -> Self {
        Self {
            inner,
            moves: 0,
            visits: 0,
            fallbacks: 0,
            quota_returns: 0,
        }
    }
}

impl DriverObserver for CountingObserver {
    fn on_depart(
        &mut self,
        tick: Tick,
        agent: AgentId,
        from: LocationId,
        to: LocationId,
        distance_m: f64,
        travel_ticks: u64,
    ) {
        self.moves += 1;
        self.inner.on_depart(tick, agent, from, to, distance_m, travel_ticks);
    }

    fn on_arrive(&mut self, tick: Tick, agent: AgentId, location: LocationId, dwell_ticks: u64) {
        self.visits += 1;
        self.inner.on_arrive(tick, agent, location, dwell_ticks);
    }

    fn on_capacity_fallback(&mut self, tick: Tick, agent: AgentId, destination: LocationId) {
        self.fallbacks += 1;
        self.inner.on_capacity_fallback(tick, agent, destination);
    }

    fn on_quota_return(&mut self, tick: Tick, agent: AgentId, home: LocationId) {
        self.quota_returns += 1;
        self.inner.on_quota_return(tick, agent, home);
    }

    fn on_sim_end(&mut self, final_tick: Tick) {
        self.inner.on_sim_end(final_tick);
    }
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    println!("=== mi-campus — pedestrian movement in the MI building ===");
    println!(
        "Walkers: {BACHELORS} bachelor + {MASTERS} master + {STAFF} staff  |  Seed: {SEED}"
    );
    println!();

    // 1. Locations and walk graph.
    let mut registry = load_locations_reader(Cursor::new(LOCATIONS_CSV))?;
    let graph = build_walk_graph()?;
    registry.bind_nodes(&graph)?;
    println!(
        "Walk graph: {} nodes, {} edges; {} locations bound",
        graph.node_count(),
        graph.edge_count(),
        registry.len()
    );

    // 2. Transition tables (validated: full arity, sums of 100).
    let table = load_weights_reader(Cursor::new(weights_csv()), &registry)?;
    table.validate(&registry, &Context::ALL)?;
    let [bachelor, master, staff] = make_roles(&registry, &table)?;

    // 3. Driver.
    let config = DriverConfig {
        seed: SEED,
        tick_duration_secs: TICK_DURATION_SECS,
        total_ticks: TOTAL_TICKS,
        peak: LUNCH,
        walk_speed_mps: WALK_SPEED_MPS,
        allowed_types: None,
    };
    let mut driver = MovementDriver::new(config, graph, registry, DijkstraPathFinder)?;
    for _ in 0..BACHELORS {
        driver.spawn(bachelor.clone())?;
    }
    for _ in 0..MASTERS {
        driver.spawn(master.clone())?;
    }
    for _ in 0..STAFF {
        driver.spawn(staff.clone())?;
    }

    // 4. Trace output.
    let out_dir = std::path::Path::new("output/mi-campus");
    std::fs::create_dir_all(out_dir)?;
    let writer = CsvTraceWriter::new(out_dir)?;
    let mut observer = CountingObserver::new(TraceObserver::new(writer));

    // 5. Run.
    let started = Instant::now();
    driver.run(&mut observer)?;
    let elapsed = started.elapsed();
    if let Some(e) = observer.inner.take_error() {
        return Err(e.into());
    }

    // 6. Summary.
    println!(
        "Simulated {TOTAL_TICKS} ticks ({:.1} sim-hours) in {elapsed:.2?}",
        TOTAL_TICKS as f64 * TICK_DURATION_SECS as f64 / 3_600.0
    );
    println!(
        "{} moves, {} visits, {} capacity fallbacks, {} quota returns",
        observer.moves, observer.visits, observer.fallbacks, observer.quota_returns
    );
    println!();
    println!("Final occupancy:");
    for (loc, def) in driver.registry().iter() {
        let count = driver.occupancy().count(loc);
        if count > 0 {
            println!("  {:>14}: {count}", def.name);
        }
    }
    println!();
    println!("Traces written to {}", out_dir.display());
    Ok(())
}
