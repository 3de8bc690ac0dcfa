// Host-side tests for the face rig: mount state, seeding and take lifecycle.

mod common;

use avatar_core::constants::*;
use avatar_core::{FaceRig, TickOutcome};
use common::{face_registry, lip_sync_frames, FakeTrack, TrackProbe};
use glam::Vec2;

const TWO_FRAMES: &str = r#"[{"blendShapes":{"JawOpen":0.3}},{"blendShapes":{"JawOpen":0.6}}]"#;

#[test]
fn mount_schedules_first_blink_and_saccade() {
    let rig: FaceRig<FakeTrack> = FaceRig::new(face_registry(), 10.0, 7);
    let blink = &rig.eyes.blink;
    assert!(!blink.is_blinking());
    assert!(blink.next_blink_time >= 10.0 + BLINK_INTERVAL_MIN);
    assert!(blink.next_blink_time <= 10.0 + BLINK_INTERVAL_MAX);

    let saccade = &rig.eyes.saccade;
    assert_eq!(saccade.current_target, Vec2::ZERO);
    assert_eq!(saccade.previous_target, Vec2::ZERO);
    assert_eq!(saccade.saccade_start, 10.0);
    assert_eq!(saccade.saccade_duration, SACCADE_INITIAL_DURATION);
    assert!(saccade.next_saccade_time >= 10.0 + SACCADE_INTERVAL_MIN);
    assert!(saccade.next_saccade_time <= 10.0 + SACCADE_INTERVAL_MAX);
}

#[test]
fn same_seed_gives_same_schedule() {
    let a: FaceRig<FakeTrack> = FaceRig::new(face_registry(), 0.0, 99);
    let b: FaceRig<FakeTrack> = FaceRig::new(face_registry(), 0.0, 99);
    assert_eq!(a.eyes.blink.next_blink_time, b.eyes.blink.next_blink_time);
    assert_eq!(
        a.eyes.saccade.next_saccade_time,
        b.eyes.saccade.next_saccade_time
    );
}

#[test]
fn speaking_forces_gaze_forward() {
    let probe = TrackProbe::default();
    let mut rig = FaceRig::new(face_registry(), 0.0, 42);
    rig.load_animation(&lip_sync_frames(TWO_FRAMES), &[]);
    rig.load_audio(probe.track());
    assert!(!rig.is_speaking());
    rig.set_playing(true);
    assert!(rig.is_speaking());

    // Far enough in that a saccade has certainly started
    rig.eyes.saccade.current_target = Vec2::new(0.3, 0.2);
    rig.eyes.saccade.saccade_start = 0.0;
    rig.eyes.saccade.next_saccade_time = 1000.0;
    probe.set_clock(0.01);
    rig.tick(1.0);
    assert_eq!(rig.last_signals().gaze, Vec2::ZERO);

    rig.set_playing(false);
    rig.tick(1.0);
    assert_eq!(rig.last_signals().gaze, Vec2::new(0.3, 0.2));
}

#[test]
fn natural_end_is_polled_before_compositing() {
    let probe = TrackProbe::default();
    let mut rig = FaceRig::new(face_registry(), 0.0, 42);
    rig.load_animation(&lip_sync_frames(TWO_FRAMES), &[]);
    rig.load_audio(probe.track());
    rig.set_playing(true);

    probe.set_clock(0.01);
    assert_eq!(rig.tick(0.01), TickOutcome::Applied { frame_index: 0 });

    probe.ended.set(true);
    assert_eq!(rig.tick(0.02), TickOutcome::Idle);
    assert!(!rig.playback.is_playing_intent());
    assert_eq!(probe.stops.get(), 1);
}

#[test]
fn clear_animation_falls_back_to_eyes_only() {
    let probe = TrackProbe::default();
    let mut rig = FaceRig::new(face_registry(), 0.0, 42);
    rig.load_animation(&lip_sync_frames(TWO_FRAMES), &[]);
    rig.load_audio(probe.track());
    rig.set_playing(true);
    probe.set_clock(0.04);
    assert_eq!(rig.tick(0.04), TickOutcome::Applied { frame_index: 1 });

    rig.clear_animation();
    assert!(rig.tables.is_empty());
    assert_eq!(rig.tick(0.05), TickOutcome::Idle);
    // Frozen at the last written pose
    let jaw = rig.targets.get(0).and_then(|t| t.get("jawOpen"));
    assert_eq!(jaw, Some(0.6));
}
