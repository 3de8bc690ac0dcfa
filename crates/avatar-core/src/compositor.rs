//! Per-tick facial compositing.
//!
//! Every tick writes the autonomous eye layer. When a take is actually
//! playing, the lip-sync frame under the audio cursor goes down first, the
//! blink is max-combined onto the eyelid, saccade gaze overrides the eye
//! directions and emotions are added on top with a `[0, 1]` clamp.
//!
//! Lip-sync and emotion channels are not reset when nothing is playing; the
//! face holds the last pose it was given.

use crate::animation::AnimationTables;
use crate::channels::{MorphTarget, MorphTargetRegistry};
use crate::constants::*;
use crate::eyes::EyeSignals;
use crate::playback::{AudioTrack, PlaybackBridge};
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    /// Only the autonomous layer was written.
    Idle,
    /// The lip-sync frame at `frame_index` was applied.
    Applied { frame_index: usize },
    /// The cursor ran off the table; the take was completed and nothing written.
    Completed,
}

/// Split a gaze offset into the six directional eye channels.
///
/// Vertical is `eyesLookUp`/`eyesLookDown`. Horizontal uses one of two
/// mutually exclusive pairs: looking right drives `eyeLookInLeft` and
/// `eyeLookOutRight`, anything else drives `eyeLookOutLeft` and
/// `eyeLookInRight`.
pub fn project_gaze(gaze: Vec2) -> [(&'static str, f32); 6] {
    let Vec2 { x, y } = gaze;
    let (in_left, out_right, out_left, in_right) = if x > 0.0 {
        (x, x, 0.0, 0.0)
    } else {
        (0.0, 0.0, -x, -x)
    };
    [
        (EYES_LOOK_UP, y.max(0.0)),
        (EYES_LOOK_DOWN, (-y).max(0.0)),
        (EYE_LOOK_IN_LEFT, in_left),
        (EYE_LOOK_OUT_RIGHT, out_right),
        (EYE_LOOK_OUT_LEFT, out_left),
        (EYE_LOOK_IN_RIGHT, in_right),
    ]
}

/// Mesh slot for an emotion: the verbatim name, else `emotion_<name>`.
pub fn resolve_emotion_channel(target: &MorphTarget, emotion: &str) -> Option<usize> {
    target
        .index_of(emotion)
        .or_else(|| target.index_of(&format!("{EMOTION_CHANNEL_PREFIX}{emotion}")))
}

#[inline]
fn apply_gaze(target: &mut MorphTarget, gaze: Vec2) {
    for (name, value) in project_gaze(gaze) {
        target.set(name, value);
    }
}

fn apply_autonomous(target: &mut MorphTarget, signals: EyeSignals) {
    target.set(EYES_CLOSED, signals.blink);
    apply_gaze(target, signals.gaze);
}

fn apply_frame(
    target: &mut MorphTarget,
    tables: &AnimationTables,
    index: usize,
    eyelid_column: Option<usize>,
    signals: EyeSignals,
) {
    let Some(weights) = tables.frame(index) else {
        return;
    };

    // 1. lip-sync base
    for (i, name) in tables.channel_names.iter().enumerate() {
        target.set(name, weights.get(i).copied().unwrap_or(0.0));
    }

    // 2. blink can only close the eyelid further
    let lip_sync_eyelid = eyelid_column
        .and_then(|i| weights.get(i).copied())
        .unwrap_or(0.0);
    target.set(EYES_CLOSED, lip_sync_eyelid.max(signals.blink));

    // 3. saccade owns gaze
    apply_gaze(target, signals.gaze);

    // 4. emotions, additive and clamped
    for (emotion, delta) in tables.emotions_at(index) {
        let Some(slot) = resolve_emotion_channel(target, emotion) else {
            continue;
        };
        if let Some(v) = target.slot_mut(slot) {
            *v = (*v + delta).clamp(0.0, 1.0);
        }
    }
}

#[derive(Clone, Debug)]
pub struct Compositor {
    pub fps: f64,
}

impl Default for Compositor {
    fn default() -> Self {
        Self { fps: ANIMATION_FPS }
    }
}

impl Compositor {
    pub fn new(fps: f64) -> Self {
        Self { fps }
    }

    /// Run one tick over every registered target.
    pub fn tick<T: AudioTrack>(
        &self,
        tables: &AnimationTables,
        targets: &mut MorphTargetRegistry,
        playback: &mut PlaybackBridge<T>,
        signals: EyeSignals,
    ) -> TickOutcome {
        if tables.is_empty() || !playback.is_active() {
            for target in targets.iter_mut() {
                apply_autonomous(target, signals);
            }
            return TickOutcome::Idle;
        }

        let index = match playback.frame_index(self.fps) {
            Some(i) if i >= 0 && (i as usize) < tables.len() => i as usize,
            _ => {
                playback.complete();
                return TickOutcome::Completed;
            }
        };

        let has_weights = tables.frame(index).is_some_and(|w| !w.is_empty());
        if has_weights {
            // Last duplicate is the one the base pass leaves on the mesh
            let eyelid_column = tables.channel_names.iter().rposition(|n| n == EYES_CLOSED);
            for target in targets.iter_mut() {
                apply_frame(target, tables, index, eyelid_column, signals);
            }
        }
        TickOutcome::Applied { frame_index: index }
    }
}
