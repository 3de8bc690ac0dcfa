use crate::animation::{AnimationFrame, AnimationTables, EmotionFrame};
use crate::channels::MorphTargetRegistry;
use crate::compositor::{Compositor, TickOutcome};
use crate::eyes::{EyeSignals, EyeState};
use crate::playback::{AudioTrack, PlaybackBridge};
use rand::prelude::*;

/// One mounted avatar: its channel targets, the current take and the
/// autonomous eye state, advanced together once per render tick.
pub struct FaceRig<T: AudioTrack> {
    pub targets: MorphTargetRegistry,
    pub tables: AnimationTables,
    pub playback: PlaybackBridge<T>,
    pub eyes: EyeState,
    pub compositor: Compositor,
    rng: StdRng,
    last_signals: EyeSignals,
}

impl<T: AudioTrack> FaceRig<T> {
    pub fn new(targets: MorphTargetRegistry, now: f64, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let eyes = EyeState::new(now, &mut rng);
        Self {
            targets,
            tables: AnimationTables::default(),
            playback: PlaybackBridge::new(),
            eyes,
            compositor: Compositor::default(),
            rng,
            last_signals: EyeSignals::default(),
        }
    }

    pub fn load_animation(&mut self, frames: &[AnimationFrame], emotions: &[EmotionFrame]) {
        self.tables = AnimationTables::from_payload(frames, emotions);
    }

    pub fn clear_animation(&mut self) {
        self.tables = AnimationTables::default();
    }

    pub fn load_audio(&mut self, track: T) {
        self.playback.load(track);
    }

    pub fn set_playing(&mut self, playing: bool) {
        self.playback.set_playing(playing);
    }

    pub fn is_speaking(&self) -> bool {
        self.playback.is_active()
    }

    pub fn last_signals(&self) -> EyeSignals {
        self.last_signals
    }

    pub fn tick(&mut self, now: f64) -> TickOutcome {
        if self.playback.poll_natural_end() {
            log::info!("audio reached its end");
        }
        let speaking = self.playback.is_active();
        let signals = self.eyes.sample(now, speaking, &mut self.rng);
        self.last_signals = signals;
        self.compositor
            .tick(&self.tables, &mut self.targets, &mut self.playback, signals)
    }
}
