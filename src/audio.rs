use crate::dom::js_error;
use avatar_core::AudioTrack;
use base64::Engine;
use std::cell::Cell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys as web;

/// Decode a base64 WAV payload into an audio buffer on `audio_ctx`.
pub async fn decode_base64_audio(
    audio_ctx: &web::AudioContext,
    wav_base64: &str,
) -> anyhow::Result<web::AudioBuffer> {
    let bytes = base64::engine::general_purpose::STANDARD.decode(wav_base64.trim())?;
    let array = js_sys::Uint8Array::from(bytes.as_slice());
    let promise = audio_ctx
        .decode_audio_data(&array.buffer())
        .map_err(js_error)?;
    let decoded = JsFuture::from(promise).await.map_err(js_error)?;
    let buffer: web::AudioBuffer = decoded.dyn_into().map_err(js_error)?;
    log::info!(
        "decoded audio: {:.2}s at {}Hz",
        buffer.duration(),
        buffer.sample_rate()
    );
    Ok(buffer)
}

/// One decoded clip played through a fresh `AudioBufferSourceNode` per
/// play/resume. The device clock is the context's `currentTime`.
pub struct WebAudioTrack {
    audio_ctx: web::AudioContext,
    buffer: web::AudioBuffer,
    source: Option<web::AudioBufferSourceNode>,
    // Keeps the onended callback alive while its source is live
    on_ended: Option<Closure<dyn FnMut()>>,
    ended: Rc<Cell<bool>>,
    started_at: f64,
    offset: f64,
}

impl WebAudioTrack {
    pub fn new(audio_ctx: web::AudioContext, buffer: web::AudioBuffer) -> Self {
        Self {
            audio_ctx,
            buffer,
            source: None,
            on_ended: None,
            ended: Rc::new(Cell::new(false)),
            started_at: 0.0,
            offset: 0.0,
        }
    }

    fn start_source(&mut self) -> anyhow::Result<()> {
        let source = self.audio_ctx.create_buffer_source().map_err(js_error)?;
        source.set_buffer(Some(&self.buffer));
        source
            .connect_with_audio_node(&self.audio_ctx.destination())
            .map_err(js_error)?;

        let ended = self.ended.clone();
        let on_ended = Closure::wrap(Box::new(move || ended.set(true)) as Box<dyn FnMut()>);
        source.set_onended(Some(on_ended.as_ref().unchecked_ref()));

        let offset = self.offset.clamp(0.0, self.buffer.duration());
        source
            .start_with_when_and_grain_offset(0.0, offset)
            .map_err(js_error)?;

        self.started_at = self.audio_ctx.current_time();
        self.source = Some(source);
        self.on_ended = Some(on_ended);
        Ok(())
    }

    // Detach onended first so a manual stop never reads as a natural end.
    fn halt_source(&mut self) {
        if let Some(source) = self.source.take() {
            source.set_onended(None);
            _ = source.stop();
            _ = source.disconnect();
        }
        self.on_ended = None;
    }
}

impl AudioTrack for WebAudioTrack {
    fn is_playing(&self) -> bool {
        self.source.is_some()
    }

    fn clock_now(&self) -> f64 {
        self.audio_ctx.current_time()
    }

    fn position(&self) -> f64 {
        if self.source.is_some() {
            self.offset + (self.audio_ctx.current_time() - self.started_at)
        } else {
            self.offset
        }
    }

    fn play(&mut self) {
        if self.source.is_some() {
            return;
        }
        _ = self.audio_ctx.resume();
        if let Err(e) = self.start_source() {
            log::error!("audio start error: {:?}", e);
            self.halt_source();
        }
    }

    fn pause(&mut self) {
        if self.source.is_some() {
            self.offset = self.position().min(self.buffer.duration());
            self.halt_source();
        }
    }

    fn stop(&mut self) {
        self.halt_source();
        self.offset = 0.0;
        self.ended.set(false);
    }

    fn take_ended(&mut self) -> bool {
        if !self.ended.replace(false) {
            return false;
        }
        self.source = None;
        self.on_ended = None;
        self.offset = 0.0;
        true
    }
}
