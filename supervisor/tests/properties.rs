use proptest::prelude::*;
use supervisor::{Direction, Supervisor, SupervisorConfig};

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::Maximize), Just(Direction::Minimize)]
}

fn new_supervisor(patience: u32, direction: Direction) -> Supervisor {
    Supervisor::new(SupervisorConfig::new(patience, direction)).unwrap()
}

proptest! {
    #[test]
    fn prop_strict_improvement_never_stops(
        direction in direction(),
        patience in 1u32..10,
        start in -1000.0f64..1000.0,
        steps in prop::collection::vec(0.001f64..10.0, 1..50)
    ) {
        let mut s = new_supervisor(patience, direction);
        let mut metric = start;

        for step in steps {
            let d = s.observe(metric).unwrap();
            prop_assert!(d.is_best);
            prop_assert_eq!(d.patience_counter, 0);
            prop_assert!(!d.should_stop);

            metric = match direction {
                Direction::Maximize => metric + step,
                Direction::Minimize => metric - step,
            };
        }
    }

    #[test]
    fn prop_stops_exactly_at_patience(
        direction in direction(),
        patience in 1u32..10,
        best in -100.0f64..100.0,
        extra in 0usize..5
    ) {
        let mut s = new_supervisor(patience, direction);
        prop_assert!(s.observe(best).unwrap().is_best);

        for call in 1..=patience {
            let d = s.observe(best).unwrap();
            prop_assert!(!d.is_best);
            prop_assert_eq!(d.patience_counter, call);
            prop_assert_eq!(d.should_stop, call == patience);
        }

        for _ in 0..extra {
            prop_assert!(s.observe(best).unwrap().should_stop);
        }
    }

    #[test]
    fn prop_latch_holds_for_any_input(
        direction in direction(),
        patience in 1u32..5,
        tail in prop::collection::vec(-1e6f64..1e6, 0..30)
    ) {
        let mut s = new_supervisor(patience, direction);
        s.observe(0.0).unwrap();
        for _ in 0..patience {
            s.observe(0.0).unwrap();
        }
        prop_assert!(s.should_stop());

        for metric in tail {
            let d = s.observe(metric).unwrap();
            prop_assert!(d.should_stop);
            prop_assert!(!d.is_best);
            prop_assert_eq!(d.best_score, 0.0);
        }
    }

    #[test]
    fn prop_best_score_is_monotonic(
        direction in direction(),
        patience in 1u32..10,
        metrics in prop::collection::vec(-1e6f64..1e6, 1..100)
    ) {
        let mut s = new_supervisor(patience, direction);
        let mut previous = s.best_score();

        for metric in metrics {
            let d = s.observe(metric).unwrap();
            match direction {
                Direction::Maximize => prop_assert!(d.best_score >= previous),
                Direction::Minimize => prop_assert!(d.best_score <= previous),
            }
            prop_assert!(d.patience_counter <= patience);
            previous = d.best_score;
        }
    }

    #[test]
    fn prop_repeated_value_never_resets_counter(
        direction in direction(),
        patience in 2u32..20,
        value in -100.0f64..100.0
    ) {
        let mut s = new_supervisor(patience, direction);
        s.observe(value).unwrap();

        let mut previous = 0;
        for _ in 0..patience {
            let d = s.observe(value).unwrap();
            prop_assert!(d.patience_counter > previous);
            previous = d.patience_counter;
        }
    }

    #[test]
    fn prop_rejected_metric_keeps_state(
        direction in direction(),
        patience in 1u32..10,
        metrics in prop::collection::vec(-10.0f64..10.0, 0..20),
        bad in prop_oneof![Just(f64::NAN), Just(f64::INFINITY), Just(f64::NEG_INFINITY)]
    ) {
        let mut s = new_supervisor(patience, direction);
        for metric in metrics {
            s.observe(metric).unwrap();
        }

        let before = (s.best_score(), s.patience_counter(), s.should_stop());
        prop_assert!(s.observe(bad).is_err());
        prop_assert_eq!(before, (s.best_score(), s.patience_counter(), s.should_stop()));
    }
}
