//! Unit tests for campus-sim.

#[cfg(test)]
mod helpers {
    use std::sync::Arc;

    use campus_core::{AgentId, LocationId, PeakWindow, Point, Tick};
    use campus_graph::{CampusGraph, CampusGraphBuilder, DijkstraPathFinder, NodeType};
    use campus_state::{
        CAPACITY_UNBOUNDED, Context, DwellBounds, LocationDef, LocationRegistry, RoleProfile,
        TransitionTable, WeightRow,
    };

    use crate::{DriverConfig, DriverObserver, MovementDriver};

    /// A straight corridor: nodes at x = 0, 100, 200, 300.
    pub fn corridor_graph() -> CampusGraph {
        let mut b = CampusGraphBuilder::new();
        let n: Vec<_> = (0..4)
            .map(|i| b.add_node(Point::new(i as f64 * 100.0, 0.0), NodeType(0)).unwrap())
            .collect();
        for w in n.windows(2) {
            b.add_walkway(w[0], w[1]);
        }
        b.build()
    }

    /// Home at x=0, Mensa at x=100, Lab at x=300 (all on the corridor),
    /// each with a fixed 60 s dwell.  `lab_capacity` lets tests force
    /// redirection.
    pub fn campus(lab_capacity: u32) -> (LocationRegistry, [LocationId; 3]) {
        let mut reg = LocationRegistry::new();
        let dwell = DwellBounds::new(60.0, 60.0).unwrap();
        let home = reg
            .add(
                LocationDef::new("Home", Point::new(0.0, 0.0), CAPACITY_UNBOUNDED)
                    .with_wait(dwell),
            )
            .unwrap();
        let mensa = reg
            .add(LocationDef::new("Mensa", Point::new(100.0, 0.0), CAPACITY_UNBOUNDED).with_wait(dwell))
            .unwrap();
        let lab = reg
            .add(LocationDef::new("Lab", Point::new(300.0, 0.0), lab_capacity).with_wait(dwell))
            .unwrap();
        let graph = corridor_graph();
        reg.bind_nodes(&graph).unwrap();
        (reg, [home, mensa, lab])
    }

    /// Every (location, context) row gets `weights` verbatim.
    pub fn uniform_table(reg: &LocationRegistry, weights: &[(LocationId, u32)]) -> TransitionTable {
        let mut table = TransitionTable::new();
        for (loc, _) in reg.iter() {
            for ctx in Context::ALL {
                table.set_row(loc, ctx, WeightRow::from_pairs(weights.to_vec()).unwrap());
            }
        }
        table
    }

    pub fn profile(table: TransitionTable, start: LocationId) -> Arc<RoleProfile> {
        Arc::new(RoleProfile {
            name: "test".into(),
            table,
            start,
            default_wait: DwellBounds::new(60.0, 60.0).unwrap(),
            visit_quota: usize::MAX,
            return_home: None,
        })
    }

    pub fn config(seed: u64) -> DriverConfig {
        DriverConfig {
            seed,
            tick_duration_secs: 1,
            total_ticks: 2_000,
            peak: PeakWindow::new(700, 900),
            walk_speed_mps: 1.5,
            allowed_types: None,
        }
    }

    pub fn driver(
        seed: u64,
        lab_capacity: u32,
        weights: &[(LocationId, u32)],
        walkers: usize,
    ) -> MovementDriver<DijkstraPathFinder> {
        let (reg, _) = campus(lab_capacity);
        let table = uniform_table(&reg, weights);
        let home = reg.id_of("Home").unwrap();
        let profile = profile(table, home);
        let graph = corridor_graph();
        let mut driver =
            MovementDriver::new(config(seed), graph, reg, DijkstraPathFinder).unwrap();
        for _ in 0..walkers {
            driver.spawn(profile.clone()).unwrap();
        }
        driver
    }

    /// Records every observer callback for later assertions.
    #[derive(Default)]
    pub struct Recorder {
        /// (tick, agent, from, to, travel_ticks)
        pub departs: Vec<(u64, u32, u16, u16, u64)>,
        /// (tick, agent, location, dwell_ticks)
        pub arrives: Vec<(u64, u32, u16, u64)>,
        pub fallbacks: usize,
        pub quota_returns: usize,
        pub final_tick: Option<Tick>,
    }

    impl DriverObserver for Recorder {
        fn on_depart(
            &mut self,
            tick: Tick,
            agent: AgentId,
            from: LocationId,
            to: LocationId,
            _distance_m: f64,
            travel_ticks: u64,
        ) {
            self.departs.push((tick.0, agent.0, from.0, to.0, travel_ticks));
        }

        fn on_arrive(&mut self, tick: Tick, agent: AgentId, location: LocationId, dwell_ticks: u64) {
            self.arrives.push((tick.0, agent.0, location.0, dwell_ticks));
        }

        fn on_capacity_fallback(&mut self, _tick: Tick, _agent: AgentId, _dest: LocationId) {
            self.fallbacks += 1;
        }

        fn on_quota_return(&mut self, _tick: Tick, _agent: AgentId, _home: LocationId) {
            self.quota_returns += 1;
        }

        fn on_sim_end(&mut self, final_tick: Tick) {
            self.final_tick = Some(final_tick);
        }
    }
}

// ── WakeQueue ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod wake_queue {
    use campus_core::{AgentId, Tick};

    use crate::WakeQueue;

    #[test]
    fn drains_only_the_requested_tick() {
        let mut q = WakeQueue::new();
        q.push(Tick(5), AgentId(0));
        q.push(Tick(5), AgentId(1));
        q.push(Tick(9), AgentId(2));

        assert_eq!(q.len(), 3);
        assert_eq!(q.tick_count(), 2);
        assert_eq!(q.next_tick(), Some(Tick(5)));

        assert!(q.drain_tick(Tick(4)).is_none());
        let due = q.drain_tick(Tick(5)).unwrap();
        assert_eq!(due, vec![AgentId(0), AgentId(1)]);
        assert_eq!(q.len(), 1);
        assert_eq!(q.next_tick(), Some(Tick(9)));
    }

    #[test]
    fn empty_queue_reports_nothing() {
        let mut q = WakeQueue::new();
        assert!(q.is_empty());
        assert_eq!(q.next_tick(), None);
        assert!(q.drain_tick(Tick(0)).is_none());
    }
}

// ── MovementDriver ────────────────────────────────────────────────────────────

#[cfg(test)]
mod driver {
    use campus_core::{AgentId, LocationId, Point, Tick};
    use campus_graph::{CampusGraphBuilder, DijkstraPathFinder, NodeType};
    use campus_state::{CAPACITY_UNBOUNDED, LocationDef, LocationRegistry};

    use crate::{MovementDriver, NoopObserver, SimError};

    use super::helpers::{self, Recorder};

    #[test]
    fn spawn_occupies_the_start_location() {
        let (reg, [home, ..]) = helpers::campus(CAPACITY_UNBOUNDED);
        let lab = reg.id_of("Lab").unwrap();
        let table = helpers::uniform_table(&reg, &[(lab, 100)]);
        let profile = helpers::profile(table, home);
        let graph = helpers::corridor_graph();
        let mut driver =
            MovementDriver::new(helpers::config(1), graph, reg, DijkstraPathFinder).unwrap();

        driver.spawn(profile.clone()).unwrap();
        driver.spawn(profile).unwrap();
        assert_eq!(driver.walker_count(), 2);
        assert_eq!(driver.occupancy().count(home), 2);
    }

    #[test]
    fn travel_and_dwell_times_follow_the_config() {
        // Home (x=0) to Lab (x=300) at 1.5 m/s with a 1 s tick: 200 ticks
        // of walking, then a fixed 60-tick dwell.
        let (_, [home, _, lab]) = helpers::campus(CAPACITY_UNBOUNDED);
        let mut driver = helpers::driver(7, CAPACITY_UNBOUNDED, &[(lab, 100)], 1);

        let mut rec = Recorder::default();
        driver.run_ticks(300, &mut rec).unwrap();

        assert_eq!(rec.departs[0], (0, 0, home.0, lab.0, 200));
        assert_eq!(rec.arrives[0], (200, 0, lab.0, 60));
        // Next decision fires once the dwell ends; Lab → Lab is a
        // self-transition, so it shows up as another arrival, not a depart.
        assert_eq!(rec.arrives[1].0, 260);
        assert_eq!(rec.departs.len(), 1);
    }

    #[test]
    fn population_is_conserved_across_ticks() {
        let (_, [home, mensa, lab]) = helpers::campus(CAPACITY_UNBOUNDED);
        let mut driver = helpers::driver(3, CAPACITY_UNBOUNDED, &[(home, 40), (mensa, 30), (lab, 30)], 5);

        // A walker in transit is already counted at its destination, so the
        // total occupant count always equals the population.
        for _ in 0..10 {
            driver.run_ticks(100, &mut NoopObserver).unwrap();
            let total: u32 = (0..3).map(|i| driver.occupancy().count(LocationId(i))).sum();
            assert_eq!(total, 5);
        }
    }

    #[test]
    fn runs_are_reproducible_from_the_seed() {
        let (_, [home, mensa, lab]) = helpers::campus(CAPACITY_UNBOUNDED);
        let weights = [(home, 40), (mensa, 30), (lab, 30)];

        let mut rec_a = Recorder::default();
        helpers::driver(99, CAPACITY_UNBOUNDED, &weights, 3)
            .run(&mut rec_a)
            .unwrap();

        let mut rec_b = Recorder::default();
        helpers::driver(99, CAPACITY_UNBOUNDED, &weights, 3)
            .run(&mut rec_b)
            .unwrap();

        assert_eq!(rec_a.departs, rec_b.departs);
        assert_eq!(rec_a.arrives, rec_b.arrives);

        let mut rec_c = Recorder::default();
        helpers::driver(100, CAPACITY_UNBOUNDED, &weights, 3)
            .run(&mut rec_c)
            .unwrap();
        assert_ne!(rec_a.departs, rec_c.departs);
    }

    #[test]
    fn spurious_wake_leaves_the_schedule_intact() {
        // A wake entry landing before the walker's pending event must
        // neither park the walker nor change what it does.
        let (_, [home, _, lab]) = helpers::campus(CAPACITY_UNBOUNDED);
        let weights = [(home, 50), (lab, 50)];

        let mut rec_plain = Recorder::default();
        let mut plain = helpers::driver(17, CAPACITY_UNBOUNDED, &weights, 1);
        plain.run_ticks(600, &mut rec_plain).unwrap();

        let mut rec_poked = Recorder::default();
        let mut poked = helpers::driver(17, CAPACITY_UNBOUNDED, &weights, 1);
        poked.run_ticks(5, &mut rec_poked).unwrap();
        poked.force_wake(Tick(10), AgentId(0));
        poked.run_ticks(595, &mut rec_poked).unwrap();

        assert_eq!(rec_plain.departs, rec_poked.departs);
        assert_eq!(rec_plain.arrives, rec_poked.arrives);
        assert!(!rec_poked.arrives.is_empty());
    }

    #[test]
    fn full_location_redirects_the_second_walker() {
        // Lab holds one walker; the first draw fills it, the second is
        // redirected to the zero-weight Mensa by the capacity adjustment.
        let (_, [_, mensa, lab]) = helpers::campus(1);
        let mut driver = helpers::driver(11, 1, &[(lab, 100), (mensa, 0)], 2);

        driver.run_ticks(1, &mut NoopObserver).unwrap();
        assert_eq!(driver.location_of(AgentId(0)), lab);
        assert_eq!(driver.location_of(AgentId(1)), mensa);
        assert_eq!(driver.occupancy().count(lab), 1);
        assert_eq!(driver.occupancy().count(mensa), 1);
    }

    #[test]
    fn unroutable_destination_aborts_the_run() {
        // Two disconnected islands; the table demands a crossing.
        let mut b = CampusGraphBuilder::new();
        let n0 = b.add_node(Point::new(0.0, 0.0), NodeType(0)).unwrap();
        let n1 = b.add_node(Point::new(100.0, 0.0), NodeType(0)).unwrap();
        b.add_walkway(n0, n1);
        b.add_node(Point::new(1_000.0, 0.0), NodeType(0)).unwrap();
        let graph = b.build();

        let mut reg = LocationRegistry::new();
        let home = reg
            .add(LocationDef::new("Home", Point::new(0.0, 0.0), CAPACITY_UNBOUNDED))
            .unwrap();
        let island = reg
            .add(LocationDef::new("Island", Point::new(1_000.0, 0.0), CAPACITY_UNBOUNDED))
            .unwrap();
        reg.bind_nodes(&graph).unwrap();

        let table = helpers::uniform_table(&reg, &[(island, 100)]);
        let profile = helpers::profile(table, home);

        let mut driver =
            MovementDriver::new(helpers::config(5), graph, reg, DijkstraPathFinder).unwrap();
        driver.spawn(profile).unwrap();

        let result = driver.run_ticks(1, &mut NoopObserver);
        assert!(matches!(result, Err(SimError::Unreachable { .. })));
    }

    #[test]
    fn rejects_invalid_config() {
        let (reg, _) = helpers::campus(CAPACITY_UNBOUNDED);
        let graph = helpers::corridor_graph();
        let mut config = helpers::config(1);
        config.walk_speed_mps = 0.0;
        let result = MovementDriver::new(config, graph, reg, DijkstraPathFinder);
        assert!(matches!(result, Err(SimError::Config(_))));
    }
}

// ── Trace output ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod trace {
    use campus_state::CAPACITY_UNBOUNDED;

    use crate::{CsvTraceWriter, TraceObserver};

    use super::helpers;

    #[test]
    fn writes_moves_and_visits_csv() {
        let (_, [home, mensa, lab]) = helpers::campus(CAPACITY_UNBOUNDED);
        let mut driver =
            helpers::driver(21, CAPACITY_UNBOUNDED, &[(home, 40), (mensa, 30), (lab, 30)], 2);

        let dir = tempfile::tempdir().unwrap();
        let writer = CsvTraceWriter::new(dir.path()).unwrap();
        let mut observer = TraceObserver::new(writer);

        driver.run(&mut observer).unwrap();
        assert!(observer.take_error().is_none());

        let moves = std::fs::read_to_string(dir.path().join("moves.csv")).unwrap();
        let visits = std::fs::read_to_string(dir.path().join("visits.csv")).unwrap();

        assert!(moves.starts_with("agent_id,tick,from,to,distance_m,travel_ticks"));
        assert!(visits.starts_with("agent_id,tick,location,dwell_ticks,selection"));
        // Two walkers over 2000 ticks make plenty of moves.
        assert!(moves.lines().count() > 5);
        assert!(visits.lines().count() > 10);
        assert!(visits.contains("weighted"));
    }
}
