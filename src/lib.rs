#![cfg(target_arch = "wasm32")]
use avatar_core::{FaceRig, ManualConfig, Take};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys as web;

mod api;
mod audio;
mod constants;
mod dom;
mod frame;
mod mesh;
mod overlay;
mod panel;
mod render;

use constants::*;
use frame::SharedRig;
use panel::SharedConfig;

fn wire_canvas_resize(canvas: &web::HtmlCanvasElement) {
    dom::sync_canvas_backing_size(canvas);
    let canvas_resize = canvas.clone();
    let resize_closure = Closure::wrap(Box::new(move || {
        dom::sync_canvas_backing_size(&canvas_resize);
    }) as Box<dyn FnMut()>);
    if let Some(window) = web::window() {
        _ = window
            .add_event_listener_with_callback("resize", resize_closure.as_ref().unchecked_ref());
    }
    resize_closure.forget();
}

#[inline]
fn set_play_label(document: &web::Document, playing: bool) {
    dom::set_text(
        document,
        PLAY_BUTTON_ID,
        if playing { "Pause" } else { "Play" },
    );
}

fn wire_play_button(document: &web::Document, rig: &SharedRig) {
    let rig = rig.clone();
    let doc = document.clone();
    dom::add_click_listener(document, PLAY_BUTTON_ID, move || {
        let playing = {
            let mut r = rig.borrow_mut();
            let next = !r.playback.is_playing_intent();
            r.set_playing(next);
            next
        };
        set_play_label(&doc, playing);
    });
}

/// Swap in a freshly generated take: new frame tables, new audio, auto-play.
fn install_take(
    rig: &SharedRig,
    config: &SharedConfig,
    document: &web::Document,
    take: &Take,
    track: audio::WebAudioTrack,
) {
    {
        let mut r = rig.borrow_mut();
        r.load_animation(&take.animation_frames, &take.emotions);
        r.load_audio(track);
        r.set_playing(true);
    }
    dom::set_disabled(document, PLAY_BUTTON_ID, false);
    config.borrow_mut().sync_emotions(&take.emotions);
    if let Err(e) = panel::refresh(document, config) {
        log::warn!("panel refresh failed: {e:#}");
    }
    set_play_label(document, true);
}

async fn generate(
    prompt: String,
    audio_ctx: web::AudioContext,
    rig: SharedRig,
    config: SharedConfig,
) -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let take = api::generate_animation(&prompt).await?;
    let buffer = audio::decode_base64_audio(&audio_ctx, &take.audio_wav_base64).await?;
    let track = audio::WebAudioTrack::new(audio_ctx, buffer);
    install_take(&rig, &config, &document, &take, track);
    Ok(())
}

fn wire_generate(
    document: &web::Document,
    audio_ctx: &web::AudioContext,
    rig: &SharedRig,
    config: &SharedConfig,
) -> anyhow::Result<()> {
    let prompt_input: web::HtmlInputElement = dom::element_by_id(document, PROMPT_INPUT_ID)?;
    let busy = Rc::new(RefCell::new(false));

    let trigger: Rc<dyn Fn()> = {
        let prompt_input = prompt_input.clone();
        let audio_ctx = audio_ctx.clone();
        let rig = rig.clone();
        let config = config.clone();
        Rc::new(move || {
            let prompt = prompt_input.value().trim().to_string();
            if prompt.is_empty() || *busy.borrow() {
                return;
            }
            *busy.borrow_mut() = true;
            let busy = busy.clone();
            let audio_ctx = audio_ctx.clone();
            let rig = rig.clone();
            let config = config.clone();
            spawn_local(async move {
                let Some(document) = dom::window_document() else {
                    *busy.borrow_mut() = false;
                    return;
                };
                overlay::show_loading(&document);
                dom::set_disabled(&document, GENERATE_BUTTON_ID, true);
                match generate(prompt, audio_ctx, rig, config).await {
                    Ok(()) => overlay::notify(&document, "", false),
                    Err(e) => {
                        log::error!("Failed to generate animation: {e:#}");
                        overlay::notify(&document, &format!("{e:#}"), true);
                    }
                }
                dom::set_disabled(&document, GENERATE_BUTTON_ID, false);
                overlay::hide_loading(&document);
                *busy.borrow_mut() = false;
            });
        })
    };

    let on_click = trigger.clone();
    dom::add_click_listener(document, GENERATE_BUTTON_ID, move || on_click());

    let on_key = Closure::wrap(Box::new(move |ev: web::KeyboardEvent| {
        if ev.key() == "Enter" {
            trigger();
        }
    }) as Box<dyn FnMut(web::KeyboardEvent)>);
    _ = prompt_input.add_event_listener_with_callback("keydown", on_key.as_ref().unchecked_ref());
    on_key.forget();
    Ok(())
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("avatar-web starting");

    spawn_local(async move {
        if let Err(e) = init().await {
            log::error!("init error: {:?}", e);
            if let Some(document) = dom::window_document() {
                overlay::hide_loading(&document);
                overlay::notify(&document, &format!("{e:#}"), true);
            }
        }
    });
    Ok(())
}

async fn init() -> anyhow::Result<()> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas: web::HtmlCanvasElement = dom::element_by_id(&document, CANVAS_ID)?;

    // Maintain canvas internal pixel size to match CSS size * devicePixelRatio
    wire_canvas_resize(&canvas);

    let audio_ctx = web::AudioContext::new().map_err(dom::js_error)?;

    overlay::show_loading(&document);
    let model_bytes = api::fetch_bytes(MODEL_URL).await?;
    let avatar = mesh::load_glb(&model_bytes)?;
    overlay::hide_loading(&document);

    // Scene time starts at zero on mount
    let mounted_at = Instant::now();
    let mesh::LoadedAvatar { parts, registry } = avatar;
    let mut face = FaceRig::new(registry, 0.0, EYE_RNG_SEED);
    {
        let doc = document.clone();
        face.playback
            .set_on_complete(move || set_play_label(&doc, false));
    }
    let rig: SharedRig = Rc::new(RefCell::new(face));

    let config: SharedConfig = Rc::new(RefCell::new(ManualConfig::default()));
    panel::build(&document, &config)?;
    wire_play_button(&document, &rig);
    wire_generate(&document, &audio_ctx, &rig, &config)?;
    set_play_label(&document, false);
    // Nothing to play until the first take arrives
    dom::set_disabled(&document, PLAY_BUTTON_ID, true);

    let gpu = frame::init_gpu(&canvas, &parts).await;

    let frame_ctx = Rc::new(RefCell::new(frame::FrameContext {
        rig,
        parts,
        canvas,
        gpu,
        mounted_at,
        scratch: Vec::new(),
    }));
    frame::start_loop(frame_ctx);
    Ok(())
}
