use crate::constants::*;
use glam::Vec2;
use rand::Rng;
use std::f32::consts::PI;

/// Autonomous gaze state: the fixation being moved towards, the one being
/// left, and the timing of the current ballistic movement.
///
/// Gaze is expressed as `x` positive = look right, `y` positive = look up.
#[derive(Clone, Debug)]
pub struct SaccadeState {
    pub next_saccade_time: f64,
    pub current_target: Vec2,
    pub previous_target: Vec2,
    pub saccade_start: f64,
    pub saccade_duration: f64,
}

impl SaccadeState {
    pub fn new<R: Rng + ?Sized>(now: f64, rng: &mut R) -> Self {
        Self {
            next_saccade_time: now + rng.gen_range(SACCADE_INTERVAL_MIN..SACCADE_INTERVAL_MAX),
            current_target: Vec2::ZERO,
            previous_target: Vec2::ZERO,
            saccade_start: now,
            saccade_duration: SACCADE_INITIAL_DURATION,
        }
    }

    fn start_saccade<R: Rng + ?Sized>(&mut self, now: f64, rng: &mut R) {
        self.previous_target = self.current_target;

        let raw = Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
        let biased = raw * (1.0 - EYE_TARGET_CENTER_BIAS);
        self.current_target = biased * Vec2::new(EYE_MOVEMENT_RANGE_X, EYE_MOVEMENT_RANGE_Y);

        self.saccade_duration = rng.gen_range(SACCADE_DURATION_MIN..SACCADE_DURATION_MAX);
        self.saccade_start = now;
        self.next_saccade_time = now
            + self.saccade_duration
            + rng.gen_range(SACCADE_INTERVAL_MIN..SACCADE_INTERVAL_MAX);
    }
}

/// Raised-cosine ease-in-out over `[0, 1]`.
#[inline]
pub fn ease_in_out(progress: f32) -> f32 {
    0.5 * (1.0 - (progress * PI).cos())
}

/// Gaze offset for the tick at `now`.
///
/// The state keeps advancing while `is_speaking` is set, but the returned
/// gaze is held at centre so the avatar looks forward during speech.
pub fn saccade_values<R: Rng + ?Sized>(
    state: &mut SaccadeState,
    now: f64,
    is_speaking: bool,
    rng: &mut R,
) -> Vec2 {
    if now >= state.next_saccade_time {
        state.start_saccade(now, rng);
    }

    let gaze = if now < state.saccade_start + state.saccade_duration {
        let progress = ((now - state.saccade_start) / state.saccade_duration) as f32;
        state
            .previous_target
            .lerp(state.current_target, ease_in_out(progress))
    } else {
        state.current_target
    };

    if is_speaking {
        Vec2::ZERO
    } else {
        gaze
    }
}
