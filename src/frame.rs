use crate::audio::WebAudioTrack;
use crate::mesh::{MeshPart, Vertex};
use crate::render;
use avatar_core::{FaceRig, TickOutcome};
use instant::Instant;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

pub type SharedRig = Rc<RefCell<FaceRig<WebAudioTrack>>>;

pub struct FrameContext<'a> {
    pub rig: SharedRig,
    pub parts: Vec<MeshPart>,
    pub canvas: web::HtmlCanvasElement,
    pub gpu: Option<render::GpuState<'a>>,
    pub mounted_at: Instant,
    pub scratch: Vec<Vertex>,
}

impl<'a> FrameContext<'a> {
    /// Seconds since the scene mounted; the clock the eye generators run on.
    #[inline]
    pub fn scene_time(&self) -> f64 {
        self.mounted_at.elapsed().as_secs_f64()
    }

    pub fn frame(&mut self) {
        let now = self.scene_time();
        let outcome = self.rig.borrow_mut().tick(now);
        if let TickOutcome::Applied { frame_index } = outcome {
            log::trace!("lip-sync frame {frame_index}");
        }

        let Some(g) = &mut self.gpu else {
            return;
        };
        {
            let rig = self.rig.borrow();
            for (i, part) in self.parts.iter().enumerate() {
                let Some(target) = part.target.and_then(|t| rig.targets.get(t)) else {
                    continue;
                };
                part.blend_into(target.influences(), &mut self.scratch);
                g.upload_part(i, &self.scratch);
            }
        }
        g.resize_if_needed(self.canvas.width(), self.canvas.height());
        if let Err(e) = g.render() {
            log::error!("render error: {:?}", e);
        }
    }
}

pub async fn init_gpu(
    canvas: &web::HtmlCanvasElement,
    parts: &[MeshPart],
) -> Option<render::GpuState<'static>> {
    // leak a canvas clone to satisfy 'static lifetime for surface
    let leaked_canvas = Box::leak(Box::new(canvas.clone()));
    match render::GpuState::new(leaked_canvas, parts).await {
        Ok(g) => Some(g),
        Err(e) => {
            log::error!("WebGPU init error: {:?}", e);
            None
        }
    }
}

pub fn start_loop(frame_ctx: Rc<RefCell<FrameContext<'static>>>) {
    let tick: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let tick_clone = tick.clone();
    *tick.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        frame_ctx.borrow_mut().frame();
        if let (Some(w), Some(cb)) = (web::window(), tick_clone.borrow().as_ref()) {
            _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
        }
    }) as Box<dyn FnMut()>));
    if let (Some(w), Some(cb)) = (web::window(), tick.borrow().as_ref()) {
        _ = w.request_animation_frame(cb.as_ref().unchecked_ref());
    }
}
