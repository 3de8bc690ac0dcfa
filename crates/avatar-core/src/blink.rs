use crate::constants::{BLINK_DURATION, BLINK_INTERVAL_MAX, BLINK_INTERVAL_MIN, BLINK_STRENGTH};
use rand::Rng;
use std::f64::consts::PI;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BlinkPhase {
    Idle,
    Blinking { end_time: f64 },
}

/// Autonomous eyelid state. Owned by the scene instance and advanced once per
/// tick through [`blink_value`].
#[derive(Clone, Debug)]
pub struct BlinkState {
    pub next_blink_time: f64,
    pub phase: BlinkPhase,
}

impl BlinkState {
    /// Fresh state with the first blink scheduled one random interval after `now`.
    pub fn new<R: Rng + ?Sized>(now: f64, rng: &mut R) -> Self {
        Self {
            next_blink_time: now + sample_blink_interval(rng),
            phase: BlinkPhase::Idle,
        }
    }

    pub fn is_blinking(&self) -> bool {
        matches!(self.phase, BlinkPhase::Blinking { .. })
    }

    pub fn blink_end_time(&self) -> Option<f64> {
        match self.phase {
            BlinkPhase::Blinking { end_time } => Some(end_time),
            BlinkPhase::Idle => None,
        }
    }
}

#[inline]
pub fn sample_blink_interval<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(BLINK_INTERVAL_MIN..BLINK_INTERVAL_MAX)
}

/// Eyelid closure in `[0, BLINK_STRENGTH]` for the tick at `now`.
///
/// A blink is a half-sine pulse lasting `BLINK_DURATION`. The tick that
/// starts a blink and the tick that ends it both return 0.
pub fn blink_value<R: Rng + ?Sized>(state: &mut BlinkState, now: f64, rng: &mut R) -> f32 {
    match state.phase {
        BlinkPhase::Blinking { end_time } if now < end_time => {
            let progress = (now - (end_time - BLINK_DURATION)) / BLINK_DURATION;
            let v = BLINK_STRENGTH * (progress * PI).sin() as f32;
            v.clamp(0.0, BLINK_STRENGTH)
        }
        BlinkPhase::Blinking { .. } => {
            state.phase = BlinkPhase::Idle;
            state.next_blink_time = now + sample_blink_interval(rng);
            0.0
        }
        BlinkPhase::Idle => {
            if now >= state.next_blink_time {
                state.phase = BlinkPhase::Blinking {
                    end_time: now + BLINK_DURATION,
                };
            }
            0.0
        }
    }
}
