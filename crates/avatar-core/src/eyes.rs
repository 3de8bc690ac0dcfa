//! Per-scene autonomous eye behaviour: blinking plus saccades.

use crate::blink::{blink_value, BlinkState};
use crate::saccade::{saccade_values, SaccadeState};
use glam::Vec2;
use rand::Rng;

/// What the autonomous layer wants on the face this tick.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EyeSignals {
    pub blink: f32,
    pub gaze: Vec2,
}

#[derive(Clone, Debug)]
pub struct EyeState {
    pub blink: BlinkState,
    pub saccade: SaccadeState,
}

impl EyeState {
    /// State for a freshly mounted scene.
    pub fn new<R: Rng + ?Sized>(now: f64, rng: &mut R) -> Self {
        let blink = BlinkState::new(now, rng);
        let saccade = SaccadeState::new(now, rng);
        Self { blink, saccade }
    }

    /// Advance both generators; blink first, then saccade.
    pub fn sample<R: Rng + ?Sized>(&mut self, now: f64, is_speaking: bool, rng: &mut R) -> EyeSignals {
        let blink = blink_value(&mut self.blink, now, rng);
        let gaze = saccade_values(&mut self.saccade, now, is_speaking, rng);
        EyeSignals { blink, gaze }
    }
}
