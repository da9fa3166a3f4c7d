// render/ - Software rendering
//
// Canvas is the raw RGBA framebuffer and its primitives, layers the
// cached parallax strata, frame the per-frame compositor.

pub mod canvas;
pub mod frame;
pub mod layers;
