// Shared fixtures for host-side tests: a scripted audio track driven by a
// manually advanced clock, and small registry/payload builders.

#![allow(dead_code)]
use avatar_core::{AnimationFrame, AudioTrack, EmotionFrame, MorphTarget, MorphTargetRegistry};
use std::cell::Cell;
use std::rc::Rc;

#[derive(Clone, Default)]
pub struct TrackProbe {
    pub clock: Rc<Cell<f64>>,
    pub ended: Rc<Cell<bool>>,
    pub plays: Rc<Cell<u32>>,
    pub pauses: Rc<Cell<u32>>,
    pub stops: Rc<Cell<u32>>,
}

impl TrackProbe {
    pub fn set_clock(&self, t: f64) {
        self.clock.set(t);
    }

    pub fn track(&self) -> FakeTrack {
        FakeTrack {
            probe: self.clone(),
            playing: false,
            offset: 0.0,
            resumed_at: 0.0,
        }
    }
}

pub struct FakeTrack {
    probe: TrackProbe,
    playing: bool,
    offset: f64,
    resumed_at: f64,
}

impl AudioTrack for FakeTrack {
    fn is_playing(&self) -> bool {
        self.playing
    }

    fn clock_now(&self) -> f64 {
        self.probe.clock.get()
    }

    fn position(&self) -> f64 {
        if self.playing {
            self.offset + self.probe.clock.get() - self.resumed_at
        } else {
            self.offset
        }
    }

    fn play(&mut self) {
        if !self.playing {
            self.playing = true;
            self.resumed_at = self.probe.clock.get();
            self.probe.plays.set(self.probe.plays.get() + 1);
        }
    }

    fn pause(&mut self) {
        if self.playing {
            self.offset = self.position();
            self.playing = false;
            self.probe.pauses.set(self.probe.pauses.get() + 1);
        }
    }

    fn stop(&mut self) {
        self.playing = false;
        self.offset = 0.0;
        self.probe.stops.set(self.probe.stops.get() + 1);
    }

    fn take_ended(&mut self) -> bool {
        if self.probe.ended.replace(false) {
            self.playing = false;
            return true;
        }
        false
    }
}

pub const FACE_CHANNELS: &[&str] = &[
    "jawOpen",
    "mouthSmileLeft",
    "eyesClosed",
    "eyesLookUp",
    "eyesLookDown",
    "eyeLookInLeft",
    "eyeLookOutLeft",
    "eyeLookInRight",
    "eyeLookOutRight",
    "emotion_joy",
];

pub fn face_registry() -> MorphTargetRegistry {
    let mut registry = MorphTargetRegistry::new();
    registry.register(MorphTarget::new("head", FACE_CHANNELS.iter().copied()));
    registry
}

pub fn lip_sync_frames(json: &str) -> Vec<AnimationFrame> {
    serde_json::from_str(json).expect("valid lip-sync payload")
}

pub fn emotion_frames(json: &str) -> Vec<EmotionFrame> {
    serde_json::from_str(json).expect("valid emotion payload")
}

pub fn approx(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}
