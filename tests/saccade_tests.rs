// Host-side tests for the autonomous saccade generator.

use avatar_core::constants::*;
use avatar_core::{ease_in_out, saccade_values, SaccadeState};
use glam::Vec2;
use rand::rngs::mock::StepRng;
use rand::prelude::*;

fn low_rng() -> StepRng {
    StepRng::new(0, 0)
}

fn close(a: Vec2, b: Vec2) -> bool {
    (a - b).length() < 1e-5
}

#[test]
fn initial_state_looks_forward() {
    let mut rng = low_rng();
    let mut state = SaccadeState::new(0.0, &mut rng);
    assert_eq!(state.next_saccade_time, SACCADE_INTERVAL_MIN);
    assert_eq!(state.saccade_duration, SACCADE_INITIAL_DURATION);
    let g = saccade_values(&mut state, 0.5, false, &mut rng);
    assert_eq!(g, Vec2::ZERO);
}

#[test]
fn saccade_picks_biased_target_and_eases_towards_it() {
    let mut rng = low_rng();
    let mut state = SaccadeState::new(0.0, &mut rng);

    // Lower-bound samples: raw target (-1, -1)
    let expected = Vec2::new(
        -(1.0 - EYE_TARGET_CENTER_BIAS) * EYE_MOVEMENT_RANGE_X,
        -(1.0 - EYE_TARGET_CENTER_BIAS) * EYE_MOVEMENT_RANGE_Y,
    );

    let start = saccade_values(&mut state, 0.8, false, &mut rng);
    assert_eq!(start, Vec2::ZERO, "movement starts from the previous target");
    assert!(close(state.current_target, expected));
    assert_eq!(state.saccade_duration, SACCADE_DURATION_MIN);
    assert_eq!(state.saccade_start, 0.8);
    assert_eq!(
        state.next_saccade_time,
        0.8 + SACCADE_DURATION_MIN + SACCADE_INTERVAL_MIN
    );

    let mid = saccade_values(&mut state, 0.8 + SACCADE_DURATION_MIN / 2.0, false, &mut rng);
    assert!(close(mid, expected * 0.5), "mid was {mid:?}");

    let held = saccade_values(&mut state, 1.2, false, &mut rng);
    assert!(close(held, expected));
}

#[test]
fn speaking_forces_gaze_forward_without_freezing_state() {
    let mut rng = low_rng();
    let mut state = SaccadeState::new(0.0, &mut rng);
    for i in 0..200 {
        let t = i as f64 * 0.05;
        assert_eq!(saccade_values(&mut state, t, true, &mut rng), Vec2::ZERO);
    }
    // Targets kept moving underneath
    assert_ne!(state.current_target, Vec2::ZERO);
}

#[test]
fn gaze_stays_within_movement_range() {
    let mut rng = StdRng::seed_from_u64(1234);
    let mut state = SaccadeState::new(0.0, &mut rng);
    let max_x = EYE_MOVEMENT_RANGE_X * (1.0 - EYE_TARGET_CENTER_BIAS) + 1e-6;
    let max_y = EYE_MOVEMENT_RANGE_Y * (1.0 - EYE_TARGET_CENTER_BIAS) + 1e-6;
    let mut t = 0.0;
    while t < 60.0 {
        let g = saccade_values(&mut state, t, false, &mut rng);
        assert!(g.x.abs() <= max_x && g.y.abs() <= max_y, "gaze {g:?} at {t}");
        t += 1.0 / 60.0;
    }
}

#[test]
fn saccade_timing_respects_bounds() {
    let mut rng = StdRng::seed_from_u64(5);
    let mut state = SaccadeState::new(0.0, &mut rng);
    let mut t = 0.0;
    let mut count = 0;
    while t < 120.0 {
        let before = state.saccade_start;
        saccade_values(&mut state, t, false, &mut rng);
        if state.saccade_start != before {
            count += 1;
            let d = state.saccade_duration;
            assert!((SACCADE_DURATION_MIN..SACCADE_DURATION_MAX).contains(&d));
            let gap = state.next_saccade_time - t - d;
            assert!(gap >= SACCADE_INTERVAL_MIN - 1e-9 && gap <= SACCADE_INTERVAL_MAX + 1e-9);
        }
        t += 0.01;
    }
    assert!(count > 10, "expected regular saccades, got {count}");
}

#[test]
fn ease_in_out_endpoints_and_midpoint() {
    assert!(ease_in_out(0.0).abs() < 1e-6);
    assert!((ease_in_out(0.5) - 0.5).abs() < 1e-6);
    assert!((ease_in_out(1.0) - 1.0).abs() < 1e-6);
}
