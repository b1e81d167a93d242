//! Unit tests for campus-core.

#[cfg(test)]
mod ids {
    use crate::{AgentId, LocationId, NodeId};

    #[test]
    fn invalid_sentinel_is_default() {
        assert_eq!(NodeId::default(), NodeId::INVALID);
        assert_eq!(AgentId::default(), AgentId::INVALID);
        assert_eq!(LocationId::default(), LocationId::INVALID);
    }

    #[test]
    fn index_round_trip() {
        let n = NodeId(7);
        assert_eq!(n.index(), 7);
        assert_eq!(NodeId::try_from(7usize).unwrap(), n);
    }

    #[test]
    fn display_names_the_type() {
        assert_eq!(format!("{}", LocationId(3)), "LocationId(3)");
    }
}

#[cfg(test)]
mod point {
    use crate::Point;

    #[test]
    fn euclidean_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(b.distance(a), 5.0);
    }

    #[test]
    fn zero_distance_to_self() {
        let p = Point::new(881.02, 216.67);
        assert_eq!(p.distance(p), 0.0);
    }
}

#[cfg(test)]
mod time {
    use crate::{PeakWindow, SimClock, Tick};

    #[test]
    fn clock_advances() {
        let mut clock = SimClock::new(1);
        assert_eq!(clock.current_tick, Tick::ZERO);
        clock.advance();
        clock.advance();
        assert_eq!(clock.current_tick, Tick(2));
        assert_eq!(clock.elapsed_secs(), 2);
    }

    #[test]
    fn ticks_for_secs_rounds_up() {
        let clock = SimClock::new(10);
        assert_eq!(clock.ticks_for_secs(0.0), 0);
        assert_eq!(clock.ticks_for_secs(1.0), 1);
        assert_eq!(clock.ticks_for_secs(10.0), 1);
        assert_eq!(clock.ticks_for_secs(10.1), 2);
    }

    #[test]
    fn peak_window_half_open() {
        let window = PeakWindow::new(700, 900);
        let mut clock = SimClock::new(100);
        // t = 0
        assert!(!window.contains(&clock));
        for _ in 0..7 {
            clock.advance();
        }
        // t = 700 — inclusive lower bound
        assert!(window.contains(&clock));
        for _ in 0..2 {
            clock.advance();
        }
        // t = 900 — exclusive upper bound
        assert!(!window.contains(&clock));
    }
}

#[cfg(test)]
mod rng {
    use crate::{AgentId, AgentRng};

    #[test]
    fn same_seed_same_sequence() {
        let mut a = AgentRng::new(42, AgentId(3));
        let mut b = AgentRng::new(42, AgentId(3));
        for _ in 0..64 {
            assert_eq!(a.gen_range(0..100u32), b.gen_range(0..100u32));
        }
    }

    #[test]
    fn different_agents_diverge() {
        let mut a = AgentRng::new(42, AgentId(0));
        let mut b = AgentRng::new(42, AgentId(1));
        let xs: Vec<u32> = (0..16).map(|_| a.gen_range(0..1000)).collect();
        let ys: Vec<u32> = (0..16).map(|_| b.gen_range(0..1000)).collect();
        assert_ne!(xs, ys);
    }
}
