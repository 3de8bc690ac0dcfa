//! Wire payloads from the inference service and their normalisation into
//! positional frame tables.

use crate::constants::INFERENCE_SUCCESS;
use serde::Deserialize;
use serde_json::{Map, Value};
use smallvec::SmallVec;

/// One lip-sync frame's weights, positionally aligned to the channel list.
pub type FrameWeights = SmallVec<[f32; 64]>;

/// One emotion frame in payload order: emotion name → weight.
pub type EmotionWeights = Vec<(String, f32)>;

#[derive(Clone, Debug, Default, Deserialize)]
pub struct AnimationFrame {
    #[serde(rename = "blendShapes", default)]
    pub blend_shapes: Map<String, Value>,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct EmotionFrame {
    #[serde(default)]
    pub emotion_values: Map<String, Value>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct InferenceStatus {
    pub code: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct InferenceResponse {
    pub status: InferenceStatus,
    #[serde(default)]
    pub animation_frames: Vec<AnimationFrame>,
    #[serde(default)]
    pub output_audio_wav_base64: Option<String>,
    #[serde(default)]
    pub emotions: Vec<EmotionFrame>,
}

/// A usable take: animation frames plus the still-encoded audio clip.
#[derive(Clone, Debug)]
pub struct Take {
    pub animation_frames: Vec<AnimationFrame>,
    pub emotions: Vec<EmotionFrame>,
    pub audio_wav_base64: String,
}

#[derive(Debug, thiserror::Error)]
pub enum AnimationError {
    #[error("inference returned {code}: {message}")]
    Rejected { code: String, message: String },
    #[error("inference response has no audio")]
    MissingAudio,
    #[error("malformed inference response: {0}")]
    Malformed(#[from] serde_json::Error),
}

impl InferenceResponse {
    pub fn from_json(text: &str) -> Result<Self, AnimationError> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn into_take(self) -> Result<Take, AnimationError> {
        if self.status.code != INFERENCE_SUCCESS {
            return Err(AnimationError::Rejected {
                code: self.status.code,
                message: self.status.message.unwrap_or_default(),
            });
        }
        let audio_wav_base64 = self
            .output_audio_wav_base64
            .filter(|s| !s.is_empty())
            .ok_or(AnimationError::MissingAudio)?;
        Ok(Take {
            animation_frames: self.animation_frames,
            emotions: self.emotions,
            audio_wav_base64,
        })
    }
}

/// Lower-case the first character only: `JawOpen` → `jawOpen`.
pub fn normalize_channel_name(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[inline]
fn weight_of(value: Option<&Value>) -> f32 {
    value.and_then(Value::as_f64).unwrap_or(0.0) as f32
}

/// Frame tables ready for the compositor.
///
/// Invariant: every row of `frames` has `channel_names.len()` entries.
#[derive(Clone, Debug, Default)]
pub struct AnimationTables {
    pub channel_names: Vec<String>,
    pub frames: Vec<FrameWeights>,
    pub emotion_frames: Vec<EmotionWeights>,
}

impl AnimationTables {
    /// Normalise both payload sequences. The channel list comes from the key
    /// order of the first lip-sync frame; later frames are read in that order
    /// and anything missing or non-numeric becomes 0.
    pub fn from_payload(lip_sync: &[AnimationFrame], emotions: &[EmotionFrame]) -> Self {
        let (channel_names, frames) = match lip_sync.first() {
            Some(first) => {
                let api_names: Vec<&String> = first.blend_shapes.keys().collect();
                let frames = lip_sync
                    .iter()
                    .map(|frame| {
                        api_names
                            .iter()
                            .map(|name| weight_of(frame.blend_shapes.get(name.as_str())))
                            .collect::<FrameWeights>()
                    })
                    .collect::<Vec<_>>();
                let names = api_names
                    .iter()
                    .map(|n| normalize_channel_name(n))
                    .collect::<Vec<_>>();
                (names, frames)
            }
            None => (Vec::new(), Vec::new()),
        };

        let emotion_frames = emotions
            .iter()
            .map(|frame| {
                frame
                    .emotion_values
                    .iter()
                    .map(|(name, v)| (name.clone(), weight_of(Some(v))))
                    .collect::<EmotionWeights>()
            })
            .collect::<Vec<_>>();

        if !frames.is_empty() {
            log::info!(
                "Loaded frames: {} blend shapes: {}",
                frames.len(),
                channel_names.len()
            );
        }
        if !emotion_frames.is_empty() {
            log::info!("Loaded emotion frames: {}", emotion_frames.len());
        }

        Self {
            channel_names,
            frames,
            emotion_frames,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn frame(&self, index: usize) -> Option<&FrameWeights> {
        self.frames.get(index)
    }

    /// Emotion weights aligned to lip-sync frame `index`; empty when the
    /// emotion track is shorter.
    pub fn emotions_at(&self, index: usize) -> &[(String, f32)] {
        self.emotion_frames
            .get(index)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
