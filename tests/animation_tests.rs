// Host-side tests for payload decoding and frame-table normalisation.

mod common;

use avatar_core::{normalize_channel_name, AnimationError, AnimationTables, InferenceResponse};
use common::{emotion_frames, lip_sync_frames};

#[test]
fn channel_names_are_lower_camel_cased_on_first_letter_only() {
    assert_eq!(normalize_channel_name("JawOpen"), "jawOpen");
    assert_eq!(normalize_channel_name("EyeBlinkLeft"), "eyeBlinkLeft");
    assert_eq!(normalize_channel_name("jawOpen"), "jawOpen");
    assert_eq!(normalize_channel_name("A"), "a");
    assert_eq!(normalize_channel_name(""), "");
}

#[test]
fn channel_list_follows_first_frame_key_order() {
    let frames = lip_sync_frames(
        r#"[
            {"blendShapes": {"MouthClose": 0.1, "JawOpen": 0.2, "EyesClosed": 0.0}},
            {"blendShapes": {"JawOpen": 0.4, "MouthClose": 0.3, "EyesClosed": 0.5}}
        ]"#,
    );
    let tables = AnimationTables::from_payload(&frames, &[]);
    assert_eq!(tables.channel_names, vec!["mouthClose", "jawOpen", "eyesClosed"]);
    assert_eq!(tables.frames[0].as_slice(), &[0.1, 0.2, 0.0]);
    // Later frames are read in the first frame's order regardless of their own
    assert_eq!(tables.frames[1].as_slice(), &[0.3, 0.4, 0.5]);
}

#[test]
fn every_row_matches_channel_list_length() {
    let frames = lip_sync_frames(
        r#"[
            {"blendShapes": {"JawOpen": 0.2, "MouthSmileLeft": 0.1}},
            {"blendShapes": {"JawOpen": 0.4}},
            {"blendShapes": {"JawOpen": "loud", "MouthSmileLeft": null, "Extra": 1.0}},
            {}
        ]"#,
    );
    let tables = AnimationTables::from_payload(&frames, &[]);
    assert_eq!(tables.len(), 4);
    for row in &tables.frames {
        assert_eq!(row.len(), tables.channel_names.len());
    }
    assert_eq!(tables.frames[1].as_slice(), &[0.4, 0.0]);
    assert_eq!(tables.frames[2].as_slice(), &[0.0, 0.0]);
    assert_eq!(tables.frames[3].as_slice(), &[0.0, 0.0]);
}

#[test]
fn empty_payloads_yield_empty_tables() {
    let tables = AnimationTables::from_payload(&[], &[]);
    assert!(tables.is_empty());
    assert!(tables.channel_names.is_empty());
    assert!(tables.emotion_frames.is_empty());
    assert!(tables.emotions_at(0).is_empty());
}

#[test]
fn emotion_frames_pass_through_by_name() {
    let emotions = emotion_frames(
        r#"[
            {"emotion_values": {"joy": 0.3, "anger": 0.1}},
            {"emotion_values": {"joy": 0.6}}
        ]"#,
    );
    let tables = AnimationTables::from_payload(&[], &emotions);
    assert_eq!(
        tables.emotions_at(0),
        &[("joy".to_string(), 0.3), ("anger".to_string(), 0.1)]
    );
    assert_eq!(tables.emotions_at(1), &[("joy".to_string(), 0.6)]);
    assert!(tables.emotions_at(2).is_empty());
}

#[test]
fn inference_success_yields_take() {
    let resp = InferenceResponse::from_json(
        r#"{
            "status": {"code": "SUCCESS"},
            "animation_frames": [{"blendShapes": {"JawOpen": 0.5}}],
            "output_audio_wav_base64": "UklGRg=="
        }"#,
    )
    .unwrap();
    let take = resp.into_take().unwrap();
    assert_eq!(take.animation_frames.len(), 1);
    assert!(take.emotions.is_empty());
    assert_eq!(take.audio_wav_base64, "UklGRg==");
}

#[test]
fn inference_error_status_is_rejected_with_message() {
    let resp = InferenceResponse::from_json(
        r#"{"status": {"code": "FAILED", "message": "model offline"}}"#,
    )
    .unwrap();
    match resp.into_take() {
        Err(AnimationError::Rejected { code, message }) => {
            assert_eq!(code, "FAILED");
            assert_eq!(message, "model offline");
        }
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn inference_without_audio_is_rejected() {
    let resp = InferenceResponse::from_json(
        r#"{"status": {"code": "SUCCESS"}, "animation_frames": []}"#,
    )
    .unwrap();
    assert!(matches!(resp.into_take(), Err(AnimationError::MissingAudio)));
}

#[test]
fn malformed_inference_json_is_an_error() {
    assert!(matches!(
        InferenceResponse::from_json("not json"),
        Err(AnimationError::Malformed(_))
    ));
}
