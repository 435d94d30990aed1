use lasertime_core::{Movement, Point, ADJACENCY_EPSILON};
use lasertime_estimator::{
    accumulate, CalibrationTables, CuttingTimeEstimator, CuttingTimeOptions, MachineProfile,
    OptimizerSettings, PathOptimizer, ResolvedParameters,
};
use proptest::prelude::*;

fn point() -> impl Strategy<Value = Point> {
    (-500.0f64..500.0, -500.0f64..500.0).prop_map(|(x, y)| Point::new(x, y))
}

fn movement() -> impl Strategy<Value = Movement> {
    (point(), point(), any::<bool>()).prop_map(|(a, b, c)| Movement::new(a, b, c))
}

/// Undirected key for a cutting movement, so reversed copies compare equal.
fn undirected(m: &Movement) -> (u64, u64, u64, u64) {
    let a = (m.start.x.to_bits(), m.start.y.to_bits());
    let b = (m.end.x.to_bits(), m.end.y.to_bits());
    let (lo, hi) = if (m.start.x, m.start.y) <= (m.end.x, m.end.y) {
        (a, b)
    } else {
        (b, a)
    };
    (lo.0, lo.1, hi.0, hi.1)
}

fn cutting_multiset(movements: &[Movement]) -> Vec<(u64, u64, u64, u64)> {
    let mut keys: Vec<_> = movements
        .iter()
        .filter(|m| m.is_cutting)
        .map(undirected)
        .collect();
    keys.sort_unstable();
    keys
}

fn params() -> ResolvedParameters {
    ResolvedParameters {
        cutting_speed: 4000.0,
        pierce_time: 0.4,
        kerf: 0.0,
        scale_factor: 1.0,
        thickness: 1.5,
    }
}

proptest! {
    #[test]
    fn interpolation_stays_between_neighbours(t in 0.5f64..12.7) {
        let tables = CalibrationTables::default();
        for table in [&tables.cutting_speed, &tables.pierce_time] {
            let entries = table.entries();
            let hi = entries.partition_point(|(k, _)| *k < t);
            let value = table.lookup(t);
            if hi < entries.len() && entries[hi].0 == t {
                prop_assert_eq!(value, entries[hi].1);
            } else {
                let (v_lo, v_hi) = (entries[hi - 1].1, entries[hi].1);
                prop_assert!(value >= v_lo.min(v_hi) - 1e-9);
                prop_assert!(value <= v_lo.max(v_hi) + 1e-9);
            }
        }
    }

    #[test]
    fn lookups_clamp_outside_range(below in -100.0f64..0.5, above in 12.7f64..1000.0) {
        let est = CuttingTimeEstimator::default();
        prop_assert_eq!(est.resolve_cutting_speed(below), 16000.0);
        prop_assert_eq!(est.resolve_cutting_speed(above), 842.0);
        prop_assert_eq!(est.resolve_pierce_time(below), 0.5);
        prop_assert_eq!(est.resolve_pierce_time(above), 1.6);
    }

    #[test]
    fn total_distance_is_sum_of_lengths(moves in prop::collection::vec(movement(), 0..40)) {
        let r = accumulate(&moves, &params(), &MachineProfile::default());
        let expected: f64 = moves.iter().map(Movement::length).sum();
        prop_assert!((r.total_distance - expected).abs() < 1e-6);
    }

    #[test]
    fn zero_length_movements_change_nothing(
        moves in prop::collection::vec(movement(), 1..20),
        at in any::<prop::sample::Index>(),
    ) {
        let machine = MachineProfile::default();
        let idx = at.index(moves.len());
        // Duplicate an endpoint as a degenerate movement with the same cutting flag
        // as its predecessor, so pierce transitions are unaffected.
        let prev = moves[idx];
        let mut padded = moves.clone();
        padded.insert(idx + 1, Movement::new(prev.end, prev.end, prev.is_cutting));

        let a = accumulate(&moves, &params(), &machine);
        let b = accumulate(&padded, &params(), &machine);
        prop_assert!((a.total_time_sec - b.total_time_sec).abs() < 1e-9);
        prop_assert!((a.total_distance - b.total_distance).abs() < 1e-9);
        prop_assert_eq!(a.pierce_count, b.pierce_count);
    }

    #[test]
    fn optimizer_output_is_connected(moves in prop::collection::vec(movement(), 0..30)) {
        let result = PathOptimizer::default().optimize(&moves);
        for pair in result.windows(2) {
            prop_assert!(pair[0].end.approx_eq(&pair[1].start, ADJACENCY_EPSILON * 2.0));
        }
    }

    #[test]
    fn optimizer_keeps_every_cut(moves in prop::collection::vec(movement(), 0..30)) {
        let optimizer = PathOptimizer::new(OptimizerSettings {
            normalize_to_origin: false,
            ..Default::default()
        });
        let result = optimizer.optimize(&moves);
        prop_assert_eq!(cutting_multiset(&moves), cutting_multiset(&result));
    }

    #[test]
    fn estimate_never_negative(
        moves in prop::collection::vec(movement(), 0..30),
        thickness in 0.1f64..20.0,
        optimize in any::<bool>(),
    ) {
        let est = CuttingTimeEstimator::default();
        let opts = CuttingTimeOptions::new(thickness).with_optimize(optimize);
        let r = est.estimate(&moves, &opts);
        prop_assert!(r.total_time_sec >= 0.0);
        prop_assert!(r.cutting_distance >= 0.0);
        prop_assert_eq!(r.part_count, r.pierce_count);
    }
}
