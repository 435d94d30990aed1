use lasertime_core::{bounding_box, connect_gaps, normalize_to_origin, Movement, Point, ADJACENCY_EPSILON};
use proptest::prelude::*;

fn movement() -> impl Strategy<Value = Movement> {
    (
        -1000.0f64..1000.0,
        -1000.0f64..1000.0,
        -1000.0f64..1000.0,
        -1000.0f64..1000.0,
        any::<bool>(),
    )
        .prop_map(|(x1, y1, x2, y2, c)| Movement::new(Point::new(x1, y1), Point::new(x2, y2), c))
}

proptest! {
    #[test]
    fn connected_sequences_have_no_gaps(moves in prop::collection::vec(movement(), 0..50)) {
        let connected = connect_gaps(&moves, ADJACENCY_EPSILON);
        for pair in connected.windows(2) {
            prop_assert!((pair[0].end.x - pair[1].start.x).abs() <= ADJACENCY_EPSILON);
            prop_assert!((pair[0].end.y - pair[1].start.y).abs() <= ADJACENCY_EPSILON);
        }
        let cuts_before = moves.iter().filter(|m| m.is_cutting).count();
        let cuts_after = connected.iter().filter(|m| m.is_cutting).count();
        prop_assert_eq!(cuts_before, cuts_after);
    }

    #[test]
    fn normalized_sequences_start_at_origin(moves in prop::collection::vec(movement(), 1..50)) {
        let normalized = normalize_to_origin(&moves);
        let bounds = bounding_box(&normalized).unwrap();
        prop_assert!(bounds.min.x.abs() < 1e-6);
        prop_assert!(bounds.min.y.abs() < 1e-6);

        let before = bounding_box(&moves).unwrap();
        prop_assert!((before.width() - bounds.width()).abs() < 1e-6);
        prop_assert!((before.height() - bounds.height()).abs() < 1e-6);
    }

    #[test]
    fn lengths_survive_normalization(moves in prop::collection::vec(movement(), 1..50)) {
        let normalized = normalize_to_origin(&moves);
        for (a, b) in moves.iter().zip(&normalized) {
            prop_assert!((a.length() - b.length()).abs() < 1e-6);
            prop_assert_eq!(a.is_cutting, b.is_cutting);
        }
    }
}
