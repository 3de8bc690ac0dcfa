// Shared animation tuning constants used by the compositor and the autonomous
// eye generators.

// Playback
pub const ANIMATION_FPS: f64 = 30.0; // lip-sync tracks are baked at 30 frames per second

// Blinking
pub const BLINK_INTERVAL_MIN: f64 = 2.0; // seconds between blinks (minimum)
pub const BLINK_INTERVAL_MAX: f64 = 7.0; // seconds between blinks (maximum)
pub const BLINK_DURATION: f64 = 0.15; // seconds a single blink lasts
pub const BLINK_STRENGTH: f32 = 1.0; // peak eyelid closure

// Saccades
pub const SACCADE_INTERVAL_MIN: f64 = 0.8;
pub const SACCADE_INTERVAL_MAX: f64 = 5.0;
pub const SACCADE_DURATION_MIN: f64 = 0.08;
pub const SACCADE_DURATION_MAX: f64 = 0.2;
pub const SACCADE_INITIAL_DURATION: f64 = 0.1;
pub const EYE_MOVEMENT_RANGE_X: f32 = 0.7;
pub const EYE_MOVEMENT_RANGE_Y: f32 = 0.5;
pub const EYE_TARGET_CENTER_BIAS: f32 = 0.4; // 0 = uniform, 1 = always centred

// Morph-target channel names driven by the autonomous layer
pub const EYES_CLOSED: &str = "eyesClosed";
pub const EYES_LOOK_UP: &str = "eyesLookUp";
pub const EYES_LOOK_DOWN: &str = "eyesLookDown";
pub const EYE_LOOK_IN_LEFT: &str = "eyeLookInLeft";
pub const EYE_LOOK_OUT_LEFT: &str = "eyeLookOutLeft";
pub const EYE_LOOK_IN_RIGHT: &str = "eyeLookInRight";
pub const EYE_LOOK_OUT_RIGHT: &str = "eyeLookOutRight";

// Emotion channels may be authored with this prefix on the mesh
pub const EMOTION_CHANNEL_PREFIX: &str = "emotion_";

// Inference status code that marks a usable payload
pub const INFERENCE_SUCCESS: &str = "SUCCESS";
