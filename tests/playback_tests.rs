// Host-side tests for the audio-clock bridge.

mod common;

use avatar_core::constants::ANIMATION_FPS;
use avatar_core::{frame_index, AudioTrack, PlaybackBridge};
use common::{FakeTrack, TrackProbe};
use std::cell::Cell;
use std::rc::Rc;

#[test]
fn frame_index_floors_elapsed_time() {
    assert_eq!(frame_index(1.0667, ANIMATION_FPS), 32);
    assert_eq!(frame_index(0.05, ANIMATION_FPS), 1);
    assert_eq!(frame_index(0.0, ANIMATION_FPS), 0);
    assert_eq!(frame_index(-0.01, ANIMATION_FPS), -1);
}

#[test]
fn bridge_without_track_is_inert() {
    let mut bridge: PlaybackBridge<FakeTrack> = PlaybackBridge::new();
    bridge.set_playing(true);
    assert!(bridge.is_playing_intent());
    assert!(!bridge.is_active());
    assert_eq!(bridge.elapsed(), None);
    assert_eq!(bridge.frame_index(ANIMATION_FPS), None);
    assert!(!bridge.poll_natural_end());
    bridge.set_playing(false);
    assert!(bridge.unload().is_none());
}

#[test]
fn play_starts_fresh_take_at_zero() {
    let probe = TrackProbe::default();
    probe.set_clock(4.0);
    let mut bridge = PlaybackBridge::new();
    bridge.load(probe.track());
    assert!(!bridge.is_active());

    bridge.set_playing(true);
    assert!(bridge.is_active());
    assert_eq!(bridge.start_timestamp(), Some(4.0));

    probe.set_clock(5.0);
    assert_eq!(bridge.elapsed(), Some(1.0));
    assert_eq!(bridge.frame_index(ANIMATION_FPS), Some(30));
}

#[test]
fn resume_rebases_start_so_elapsed_is_continuous() {
    let probe = TrackProbe::default();
    let mut bridge = PlaybackBridge::new();
    bridge.load(probe.track());
    bridge.set_playing(true);

    probe.set_clock(1.0);
    bridge.set_playing(false);
    assert_eq!(probe.pauses.get(), 1);
    assert_eq!(probe.stops.get(), 0, "pause must not rewind");
    assert!(!bridge.is_active());

    // Wall time passes while paused
    probe.set_clock(3.0);
    bridge.set_playing(true);
    assert_eq!(bridge.start_timestamp(), Some(2.0));

    probe.set_clock(3.5);
    assert_eq!(bridge.elapsed(), Some(1.5));
}

#[test]
fn repeated_intent_is_not_a_transition() {
    let probe = TrackProbe::default();
    let mut bridge = PlaybackBridge::new();
    bridge.load(probe.track());
    bridge.set_playing(true);
    bridge.set_playing(true);
    assert_eq!(probe.plays.get(), 1);
    bridge.set_playing(false);
    bridge.set_playing(false);
    assert_eq!(probe.pauses.get(), 1);
}

#[test]
fn loading_while_playing_stops_previous_and_starts_new() {
    let first = TrackProbe::default();
    let second = TrackProbe::default();
    second.set_clock(10.0);

    let mut bridge = PlaybackBridge::new();
    bridge.load(first.track());
    bridge.set_playing(true);

    bridge.load(second.track());
    assert_eq!(first.stops.get(), 1);
    assert_eq!(second.plays.get(), 1);
    assert_eq!(bridge.start_timestamp(), Some(10.0));
    assert!(bridge.is_active());
}

#[test]
fn natural_end_completes_once_and_fires_callback() {
    let probe = TrackProbe::default();
    let fired = Rc::new(Cell::new(0u32));
    let mut bridge = PlaybackBridge::new();
    {
        let fired = fired.clone();
        bridge.set_on_complete(move || fired.set(fired.get() + 1));
    }
    bridge.load(probe.track());
    bridge.set_playing(true);

    assert!(!bridge.poll_natural_end());
    probe.ended.set(true);
    assert!(bridge.poll_natural_end());
    assert!(!bridge.poll_natural_end());
    assert_eq!(fired.get(), 1);
    assert!(!bridge.is_playing_intent());
}

#[test]
fn manual_pause_never_fires_completion() {
    let probe = TrackProbe::default();
    let fired = Rc::new(Cell::new(0u32));
    let mut bridge = PlaybackBridge::new();
    {
        let fired = fired.clone();
        bridge.set_on_complete(move || fired.set(fired.get() + 1));
    }
    bridge.load(probe.track());
    bridge.set_playing(true);
    bridge.set_playing(false);
    assert!(!bridge.complete());
    assert_eq!(fired.get(), 0);
}

#[test]
fn completed_take_restarts_from_the_beginning() {
    let probe = TrackProbe::default();
    let mut bridge = PlaybackBridge::new();
    bridge.load(probe.track());
    bridge.set_playing(true);
    probe.set_clock(2.0);
    assert!(bridge.complete());
    assert_eq!(bridge.track().map(|t| t.position()), Some(0.0));

    probe.set_clock(6.0);
    bridge.set_playing(true);
    assert_eq!(bridge.start_timestamp(), Some(6.0));
}
