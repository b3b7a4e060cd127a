use super::*;
use crate::analysis::power::{STANDARD_GRAVITY, WATTS_PER_HP};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Helper to create a tracker for a 7.5 kg bar
fn create_tracker(smoothing_window: usize, threshold_mm: f64) -> LiftTracker {
    let params = TrackerParams {
        distance_threshold_mm: threshold_mm,
        debounce_s: 0.05,
        min_time_diff_s: 0.001,
        smoothing_window,
    };
    LiftTracker::new(params, PowerModel::new(7.5, STANDARD_GRAVITY))
}

/// Helper to feed evenly spaced readings starting at `t0`
fn feed(tracker: &mut LiftTracker, t0: f64, step_s: f64, distances: &[f64]) -> Vec<Emission> {
    distances
        .iter()
        .enumerate()
        .map(|(i, d)| tracker.ingest(Sample::new(*d, t0 + i as f64 * step_s)))
        .collect()
}

fn expected_watts(delta_mm: f64, dt_s: f64) -> f64 {
    7.5 * STANDARD_GRAVITY * (delta_mm / 1000.0) / dt_s
}

#[test]
fn test_first_sample_is_baseline() {
    let mut tracker = create_tracker(5, 10.0);
    assert_eq!(tracker.ingest(Sample::new(1870.0, 0.0)), Emission::Baseline);
    assert_eq!(tracker.phase(), TryPhase::Idle);

    let state = tracker.state();
    assert_eq!(state.last_smoothed_distance, Some(1870.0));
    assert!(!state.try_active);
}

#[test]
fn test_worked_example_single_try() {
    let mut tracker = create_tracker(1, 10.0);

    assert_eq!(tracker.ingest(Sample::new(1870.0, 0.0)), Emission::Baseline);

    // delta == threshold is not movement (exclusive comparison)
    let emission = tracker.ingest(Sample::new(1860.0, 0.10));
    assert_eq!(emission.instantaneous_hp(), 0.0);
    assert!(!tracker.is_try_active());

    // 60 mm in 0.15 s starts the try
    let emission = tracker.ingest(Sample::new(1800.0, 0.25));
    let first_watts = expected_watts(60.0, 0.15);
    match emission {
        Emission::PowerReading(reading) => {
            assert!(reading.try_active);
            assert!((reading.watts - first_watts).abs() < 1e-6);
            assert!((reading.hp - first_watts / WATTS_PER_HP).abs() < 1e-9);
        }
        other => panic!("Expected PowerReading, got {:?}", other),
    }
    let state = tracker.state();
    assert!(state.try_active);
    assert_eq!(state.try_start_time, Some(0.25));
    assert_eq!(state.try_start_distance, Some(1800.0));

    // 20 mm in 0.15 s keeps the try going at lower power
    let emission = tracker.ingest(Sample::new(1780.0, 0.40));
    assert!((emission.instantaneous_hp() - expected_watts(20.0, 0.15) / WATTS_PER_HP).abs() < 1e-9);
    assert!((tracker.peak_in_try().watts - first_watts).abs() < 1e-6);

    // 1 mm: movement stopped
    match tracker.ingest(Sample::new(1779.0, 0.55)) {
        Emission::TryEnded(summary) => {
            assert!((summary.peak_watts - first_watts).abs() < 1e-6);
            assert!((summary.duration_s - 0.30).abs() < 1e-9);
            assert!((summary.distance_mm - 21.0).abs() < 1e-9);
            assert_eq!(summary.ended_at_s, 0.55);
        }
        other => panic!("Expected TryEnded, got {:?}", other),
    }

    let state = tracker.state();
    assert!(!state.try_active);
    assert_eq!(state.try_start_time, None);
    assert_eq!(state.try_start_distance, None);
    assert!((state.last_try_duration - 0.30).abs() < 1e-9);
    assert_eq!(tracker.tries_completed(), 1);
}

#[test]
fn test_sub_threshold_walk_never_activates() {
    let mut rng = StdRng::seed_from_u64(7);
    let mut tracker = create_tracker(1, 10.0);
    let mut distance = 1500.0;

    for i in 0..500 {
        distance += rng.gen_range(-9.9..9.9);
        let emission = tracker.ingest(Sample::new(distance, i as f64 * 0.1));
        assert!(
            matches!(emission, Emission::Baseline | Emission::PowerReading(_)),
            "Unexpected emission {:?} at step {}",
            emission,
            i
        );
        assert_eq!(emission.instantaneous_hp(), 0.0);
        assert!(!tracker.is_try_active(), "Try started at step {}", i);
    }
    assert_eq!(tracker.tries_completed(), 0);
}

#[test]
fn test_peak_is_monotonic_while_active() {
    let mut tracker = create_tracker(1, 10.0);
    tracker.ingest(Sample::new(2000.0, 0.0));

    let mut previous_peak = 0.0;
    let mut max_seen: f64 = 0.0;
    for (i, d) in [1980.0, 1900.0, 1880.0, 1800.0, 1785.0].iter().enumerate() {
        let emission = tracker.ingest(Sample::new(*d, 0.1 * (i + 1) as f64));
        max_seen = max_seen.max(emission.instantaneous_hp());

        let peak = tracker.peak_in_try().hp;
        assert!(tracker.is_try_active());
        assert!(
            peak >= previous_peak,
            "Peak decreased from {} to {}",
            previous_peak,
            peak
        );
        assert!((peak - max_seen).abs() < 1e-12);
        previous_peak = peak;
    }
}

#[test]
fn test_summary_frozen_until_next_try_ends() {
    let mut tracker = create_tracker(1, 10.0);
    feed(&mut tracker, 0.0, 0.1, &[1870.0, 1800.0, 1790.0]);
    let first = *tracker.last_try();
    assert!(first.peak_hp > 0.0);

    // Idle jitter after the try
    feed(&mut tracker, 0.3, 0.1, &[1792.0, 1789.0, 1791.0]);
    assert_eq!(*tracker.last_try(), first);

    // A second, slower try: summary stays frozen while it runs
    feed(&mut tracker, 0.6, 0.1, &[1760.0, 1730.0]);
    assert!(tracker.is_try_active());
    assert_eq!(*tracker.last_try(), first);

    let emissions = feed(&mut tracker, 0.8, 0.1, &[1729.0]);
    assert!(matches!(emissions[0], Emission::TryEnded(_)));
    assert_ne!(*tracker.last_try(), first);
    assert_eq!(tracker.tries_completed(), 2);
}

#[test]
fn test_reading_summary_is_idempotent() {
    let mut tracker = create_tracker(1, 10.0);
    feed(&mut tracker, 0.0, 0.1, &[1870.0, 1700.0, 1698.0]);

    let summary = *tracker.last_try();
    let state = tracker.state();
    for _ in 0..10 {
        assert_eq!(*tracker.last_try(), summary);
        assert_eq!(tracker.state(), state);
    }
}

#[test]
fn test_debounce_does_not_mutate_state() {
    let mut tracker = create_tracker(5, 10.0);
    tracker.ingest(Sample::new(1870.0, 0.0));
    let before = tracker.state();

    assert_eq!(
        tracker.ingest(Sample::new(1500.0, 0.03)),
        Emission::Debounced
    );
    assert_eq!(tracker.state(), before);

    // The debounced reading still sits in the smoothing window:
    // [1870, 1500, 1860] averages to 1743.33
    tracker.ingest(Sample::new(1860.0, 0.10));
    let smoothed = tracker.state().last_smoothed_distance.unwrap();
    assert!((smoothed - 5230.0 / 3.0).abs() < 1e-9);
}

#[test]
fn test_same_timestamp_batch_feeds_the_average() {
    // Five readings arrive together and share one timestamp, like a serial batch
    let mut tracker = create_tracker(5, 10.0);
    feed(&mut tracker, 0.0, 0.0, &[1870.0, 1870.0, 1870.0, 1870.0, 1870.0]);
    let batch = feed(&mut tracker, 0.2, 0.0, &[1800.0, 1750.0, 1700.0, 1650.0, 1600.0]);

    // Only the first of the batch passes the debounce, and it sees one new reading
    assert!(matches!(batch[0], Emission::PowerReading(r) if r.try_active));
    assert!(batch[1..].iter().all(|e| *e == Emission::Debounced));

    // The next batch compares against a window holding the whole previous one
    // [1870 x4, 1800] -> 1856, then [1750, 1700, 1650, 1600, 1600] -> 1660
    let next = tracker.ingest(Sample::new(1600.0, 0.4));
    let expected = expected_watts(1856.0 - 1660.0, 0.2) / WATTS_PER_HP;
    assert!((next.instantaneous_hp() - expected).abs() < 1e-9);
}

#[test]
fn test_time_going_backwards_is_debounced() {
    let mut tracker = create_tracker(1, 10.0);
    tracker.ingest(Sample::new(1870.0, 5.0));
    assert_eq!(
        tracker.ingest(Sample::new(1500.0, 4.0)),
        Emission::Debounced
    );
    assert!(!tracker.is_try_active());
}

#[test]
fn test_default_smoothing_window() {
    let mut tracker = create_tracker(5, 10.0);
    let emissions = feed(
        &mut tracker,
        0.0,
        0.1,
        &[1870.0, 1870.0, 1870.0, 1700.0, 1700.0, 1700.0, 1700.0, 1700.0, 1700.0],
    );

    // The step lands at index 3; the averaged window keeps the try alive
    // until the window is full of 1700s and the smoothed delta drops to 0
    assert!(emissions[..3]
        .iter()
        .all(|e| e.instantaneous_hp() == 0.0));
    assert!(emissions[3..8]
        .iter()
        .all(|e| matches!(e, Emission::PowerReading(r) if r.try_active)));

    match emissions[8] {
        Emission::TryEnded(summary) => {
            assert!((summary.duration_s - 0.5).abs() < 1e-9);
            assert!((summary.distance_mm - 127.5).abs() < 1e-9);
            assert!((summary.peak_watts - expected_watts(42.5, 0.1)).abs() < 1e-6);
        }
        other => panic!("Expected TryEnded, got {:?}", other),
    }
}

#[test]
fn test_state_invariant_holds_throughout() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut tracker = create_tracker(5, 10.0);
    let mut t = 0.0;

    for _ in 0..1000 {
        t += rng.gen_range(0.0..0.3);
        let distance = rng.gen_range(1000.0..2000.0);
        tracker.ingest(Sample::new(distance, t));

        let state = tracker.state();
        assert_eq!(state.try_active, state.try_start_time.is_some());
        assert_eq!(state.try_active, state.try_start_distance.is_some());
        if !state.try_active {
            assert_eq!(state.peak_power_in_try, 0.0);
        }
    }
}

#[test]
fn test_reset_returns_to_initial_state() {
    let mut tracker = create_tracker(5, 10.0);
    feed(&mut tracker, 0.0, 0.1, &[1870.0, 1600.0, 1600.0, 1600.0, 1600.0, 1600.0, 1600.0]);
    assert_eq!(tracker.tries_completed(), 1);
    feed(&mut tracker, 0.7, 0.1, &[1300.0]);
    assert!(tracker.is_try_active());

    tracker.reset();
    assert_eq!(tracker.phase(), TryPhase::Idle);
    assert_eq!(tracker.tries_completed(), 0);
    assert_eq!(*tracker.last_try(), TrySummary::default());
    assert_eq!(tracker.state().last_smoothed_distance, None);
    assert_eq!(tracker.ingest(Sample::new(1870.0, 10.0)), Emission::Baseline);
}
