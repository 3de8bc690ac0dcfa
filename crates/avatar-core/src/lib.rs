pub mod animation;
pub mod blink;
pub mod channels;
pub mod compositor;
pub mod config;
pub mod constants;
pub mod eyes;
pub mod playback;
pub mod rig;
pub mod saccade;

pub use animation::*;
pub use blink::*;
pub use channels::*;
pub use compositor::*;
pub use config::*;
pub use eyes::*;
pub use playback::*;
pub use rig::*;
pub use saccade::*;
