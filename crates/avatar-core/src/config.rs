//! Manually tuned model configuration and the persisted-document merge.
//!
//! The manual config is edited from the config panel and submitted as one
//! document. It never drives the live compositor.

use crate::animation::EmotionFrame;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Ordered name → value map. Serialises as a plain mapping so it round-trips
/// through JSON and YAML without losing slider order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ParamGroup(Vec<(String, f32)>);

impl ParamGroup {
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, f32)>) -> Self {
        let mut group = Self::default();
        for (k, v) in pairs {
            group.insert(k, v);
        }
        group
    }

    pub fn get(&self, key: &str) -> Option<f32> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    /// Update in place, or append a new entry at the end.
    pub fn insert(&mut self, key: &str, value: f32) {
        match self.0.iter_mut().find(|(k, _)| k == key) {
            Some((_, v)) => *v = value,
            None => self.0.push((key.to_string(), value)),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f32)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for ParamGroup {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ParamGroup {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct GroupVisitor;

        impl<'de> Visitor<'de> for GroupVisitor {
            type Value = ParamGroup;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of parameter names to numbers")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<ParamGroup, A::Error> {
                let mut group = ParamGroup::default();
                while let Some((k, v)) = access.next_entry::<String, f32>()? {
                    group.insert(&k, v);
                }
                Ok(group)
            }
        }

        deserializer.deserialize_map(GroupVisitor)
    }
}

pub const DEFAULT_EMOTIONS: &[(&str, f32)] = &[
    ("happiness", 0.5),
    ("anger", 0.0),
    ("sadness", 0.0),
    ("surprise", 0.0),
    ("disgust", 0.0),
    ("fear", 0.0),
    ("neutral", 0.5),
];

pub const DEFAULT_AUDIO2FACE: &[(&str, f32)] = &[
    ("jawOpen", 0.5),
    ("mouthShape", 0.5),
    ("lipSyncIntensity", 0.5),
];

pub const DEFAULT_BLENDSHAPES: &[&str] = &[
    "browInnerUp",
    "browDownLeft",
    "browDownRight",
    "browOuterUpLeft",
    "browOuterUpRight",
    "eyeLookUpLeft",
    "eyeLookUpRight",
    "eyeLookDownLeft",
    "eyeLookDownRight",
    "eyeLookInLeft",
    "eyeLookInRight",
    "eyeLookOutLeft",
    "eyeLookOutRight",
    "eyeBlinkLeft",
    "eyeBlinkRight",
    "eyeSquintLeft",
    "eyeSquintRight",
    "eyeWideLeft",
    "eyeWideRight",
    "cheekPuff",
    "cheekSquintLeft",
    "cheekSquintRight",
    "noseSneerLeft",
    "noseSneerRight",
    "mouthFunnel",
    "mouthPucker",
    "mouthLeft",
    "mouthRight",
    "mouthRollUpper",
    "mouthRollLower",
    "mouthShrugUpper",
    "mouthShrugLower",
    "mouthClose",
    "mouthSmileLeft",
    "mouthSmileRight",
    "mouthFrownLeft",
    "mouthFrownRight",
    "mouthDimpleLeft",
    "mouthDimpleRight",
    "mouthStretchLeft",
    "mouthStretchRight",
    "mouthPressLeft",
    "mouthPressRight",
    "mouthUpperUpLeft",
    "mouthUpperUpRight",
    "mouthLowerDownLeft",
    "mouthLowerDownRight",
    "mouthOpen",
    "mouthTongueOut",
    "jawForward",
    "jawLeft",
    "jawRight",
];

/// Which section of the manual config a value belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConfigSection {
    Emotion,
    Audio2Face,
    Blendshapes,
}

impl ConfigSection {
    pub const ALL: [ConfigSection; 3] = [
        ConfigSection::Emotion,
        ConfigSection::Audio2Face,
        ConfigSection::Blendshapes,
    ];

    pub fn key(self) -> &'static str {
        match self {
            ConfigSection::Emotion => "emotion",
            ConfigSection::Audio2Face => "audio2face",
            ConfigSection::Blendshapes => "blendshapes",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ConfigSection::Emotion => "Emotion Control",
            ConfigSection::Audio2Face => "Tune Audio2Face Parameters",
            ConfigSection::Blendshapes => "Blendshape Control",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ManualConfig {
    pub emotion: ParamGroup,
    pub audio2face: ParamGroup,
    pub blendshapes: ParamGroup,
}

impl Default for ManualConfig {
    fn default() -> Self {
        Self {
            emotion: ParamGroup::from_pairs(DEFAULT_EMOTIONS.iter().copied()),
            audio2face: ParamGroup::from_pairs(DEFAULT_AUDIO2FACE.iter().copied()),
            blendshapes: ParamGroup::from_pairs(DEFAULT_BLENDSHAPES.iter().map(|k| (*k, 0.0))),
        }
    }
}

impl ManualConfig {
    pub fn section(&self, section: ConfigSection) -> &ParamGroup {
        match section {
            ConfigSection::Emotion => &self.emotion,
            ConfigSection::Audio2Face => &self.audio2face,
            ConfigSection::Blendshapes => &self.blendshapes,
        }
    }

    pub fn section_mut(&mut self, section: ConfigSection) -> &mut ParamGroup {
        match section {
            ConfigSection::Emotion => &mut self.emotion,
            ConfigSection::Audio2Face => &mut self.audio2face,
            ConfigSection::Blendshapes => &mut self.blendshapes,
        }
    }

    /// Slider write; values are clamped to the slider range.
    pub fn set(&mut self, section: ConfigSection, key: &str, value: f32) {
        self.section_mut(section).insert(key, value.clamp(0.0, 1.0));
    }

    pub fn set_emotion(&mut self, key: &str, value: f32) {
        self.set(ConfigSection::Emotion, key, value);
    }

    pub fn set_audio2face(&mut self, key: &str, value: f32) {
        self.set(ConfigSection::Audio2Face, key, value);
    }

    pub fn set_blendshape(&mut self, key: &str, value: f32) {
        self.set(ConfigSection::Blendshapes, key, value);
    }

    /// Overlay the first frame of an emotion track onto the emotion section.
    /// Existing keys keep their position; unknown emotions are appended.
    pub fn sync_emotions(&mut self, emotions: &[EmotionFrame]) {
        let Some(first) = emotions.first() else {
            return;
        };
        for (name, value) in &first.emotion_values {
            match value.as_f64() {
                Some(v) => self.emotion.insert(name, v as f32),
                None => log::warn!("ignoring non-numeric emotion value for {name}"),
            }
        }
    }

    pub fn to_json(&self) -> Result<serde_json::Value, ConfigError> {
        Ok(serde_json::to_value(self)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config update must be a JSON object")]
    NotAnObject,
    #[error("persisted config is not a mapping")]
    ExistingNotMapping,
    #[error("yaml: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

/// Shallow-merge `incoming` into the persisted YAML document and return the
/// new document text.
///
/// Only top-level keys merge: an incoming section replaces the stored section
/// wholesale. Keys not mentioned in `incoming` are kept, in their original
/// order. A missing or empty existing document counts as an empty mapping.
pub fn merge_document(
    existing: Option<&str>,
    incoming: &serde_json::Value,
) -> Result<String, ConfigError> {
    let serde_json::Value::Object(fields) = incoming else {
        return Err(ConfigError::NotAnObject);
    };

    let mut doc = match existing.map(str::trim).filter(|s| !s.is_empty()) {
        Some(text) => match serde_yaml::from_str::<serde_yaml::Value>(text)? {
            serde_yaml::Value::Mapping(m) => m,
            serde_yaml::Value::Null => serde_yaml::Mapping::new(),
            _ => return Err(ConfigError::ExistingNotMapping),
        },
        None => serde_yaml::Mapping::new(),
    };

    for (key, value) in fields {
        doc.insert(
            serde_yaml::Value::String(key.clone()),
            serde_yaml::to_value(value)?,
        );
    }

    Ok(serde_yaml::to_string(&serde_yaml::Value::Mapping(doc))?)
}
