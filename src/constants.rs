/// Front-end wiring constants: asset locations, DOM ids and the fixed scene
/// layout around the head.
// Static assets served from the public root
pub const MODEL_URL: &str = "/output/human_character.glb";
pub const CONFIG_DOCUMENT_URL: &str = "/config/config_mark.yml";
pub const CONFIG_FILE_NAME: &str = "config_mark.yml";

// Collaborators
pub const INFERENCE_URL: &str = "http://localhost:8000/inference-from-prompt";
pub const UPDATE_CONFIG_URL: &str = "/api/update-config";

// DOM ids
pub const CANVAS_ID: &str = "app-canvas";
pub const PROMPT_INPUT_ID: &str = "prompt-input";
pub const GENERATE_BUTTON_ID: &str = "generate-button";
pub const PLAY_BUTTON_ID: &str = "play-button";
pub const LOADING_ID: &str = "loading-overlay";
pub const NOTICE_ID: &str = "notice";
pub const PANEL_ID: &str = "config-panel";
pub const PANEL_SUBMIT_ID: &str = "config-submit";

// Camera framing the face
pub const CAMERA_EYE: [f32; 3] = [0.0, 0.2, 1.8];
pub const CAMERA_TARGET: [f32; 3] = [0.0, 0.2, 0.0];
pub const CAMERA_FOV_DEG: f32 = 35.0;
pub const CAMERA_NEAR: f32 = 0.05;
pub const CAMERA_FAR: f32 = 100.0;

// Model placement and lighting
pub const MODEL_OFFSET: [f32; 3] = [0.0, -1.4, 0.0];
pub const AMBIENT_INTENSITY: f32 = 0.5;
pub const POINT_LIGHT_POS: [f32; 3] = [5.0, 5.0, 5.0];
pub const POINT_LIGHT_INTENSITY: f32 = 0.8;
pub const SKIN_TONE: [f32; 3] = [0.86, 0.72, 0.64];
pub const CLEAR_COLOR: [f64; 3] = [0.05, 0.05, 0.07];

// Slider range for the config panel
pub const SLIDER_MIN: f32 = 0.0;
pub const SLIDER_MAX: f32 = 1.0;
pub const SLIDER_STEP: f32 = 0.01;

// Seed for the autonomous eye generators
pub const EYE_RNG_SEED: u64 = 42;
