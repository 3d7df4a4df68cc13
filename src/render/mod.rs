pub mod frame;
pub mod native;
mod shader;

pub use frame::{draw_list, DrawItem, FrameGlobals, PointParams, SpotParams};
pub use native::Renderer;
