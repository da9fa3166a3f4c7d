// layers.rs - Cached parallax building layers
//
// Three off-screen surfaces, one per depth stratum. Buildings are
// static between scene regenerations, so each layer is rendered once
// and recomposited every frame at its own scroll rate. A layer is
// rebuilt only when its stored size no longer matches the viewport or
// someone invalidated it (resize, config toggle, weather, perf switch).

use crate::assets::FacadeAssets;
use crate::color::{Hsl, Rgba};
use crate::render::canvas::Canvas;
use crate::rng::Rng;
use crate::scene::{Building, DepthLayer, RoofStyle, Scene};

/// Horizontal scroll rate per layer: far moves least, near most.
pub const PARALLAX_RATES: [f32; 3] = [0.12, 0.25, 0.45];

/// Chance of a window being lit, per rebuild.
const LIT_CHANCE_NIGHT: f32 = 0.60;
const LIT_CHANCE_DAY: f32 = 0.14;

struct LayerEntry {
    canvas: Canvas,
    w: u32,
    h: u32,
    dirty: bool,
}

pub struct LayerCache {
    entries: [LayerEntry; 3],
}

impl LayerCache {
    pub fn new() -> Self {
        Self {
            entries: std::array::from_fn(|_| LayerEntry {
                canvas: Canvas::new(0, 0),
                w: 0,
                h: 0,
                dirty: true,
            }),
        }
    }

    /// Mark every layer for rebuild on the next frame.
    pub fn invalidate(&mut self) {
        for entry in &mut self.entries {
            entry.dirty = true;
        }
    }

    /// Lazily rebuild stale layers. Returns how many were rebuilt so
    /// callers (and tests) can observe that clean frames do no work.
    pub fn ensure(
        &mut self,
        w: u32,
        h: u32,
        scene: &Scene,
        assets: &FacadeAssets,
        night: bool,
        rng: &mut Rng,
    ) -> usize {
        let mut rebuilt = 0;
        for layer in DepthLayer::ALL {
            let entry = &mut self.entries[layer.index()];
            if entry.w == w && entry.h == h && !entry.dirty {
                continue;
            }

            entry.canvas.resize(w, h);
            for b in scene.buildings.iter().filter(|b| b.layer == layer) {
                draw_building(&mut entry.canvas, b, assets, night, rng);
            }
            entry.w = w;
            entry.h = h;
            entry.dirty = false;
            rebuilt += 1;
        }
        if rebuilt > 0 {
            log::debug!("rebuilt {rebuilt} parallax layers at {w}x{h}");
        }
        rebuilt
    }

    /// Composite all three layers onto the frame, shifted by the camera.
    pub fn composite(&self, frame: &mut Canvas, camera_x: f32) {
        for (entry, rate) in self.entries.iter().zip(PARALLAX_RATES) {
            frame.blend_canvas(&entry.canvas, -(camera_x * rate) as i32);
        }
    }
}

impl Default for LayerCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Lit state is rolled fresh on every rebuild; that re-randomization is
/// the one intentional difference between otherwise identical rebuilds.
#[inline]
pub(crate) fn window_lit(night: bool, rng: &mut Rng) -> bool {
    rng.chance(if night { LIT_CHANCE_NIGHT } else { LIT_CHANCE_DAY })
}

fn draw_building(canvas: &mut Canvas, b: &Building, assets: &FacadeAssets, night: bool, rng: &mut Rng) {
    // Image-based variant, only once its asset is actually ready. Asset
    // loads race the first paint; the procedural facade fills in until
    // (or forever, if the load failed) without complaint.
    if let Some(slot) = b.facade_asset {
        if let Some(img) = assets.ready(slot) {
            canvas.blit_scaled(img, b.x as i32, b.y as i32, b.w as i32, b.h as i32);
            return;
        }
    }

    draw_facade(canvas, b, night, rng);
}

fn draw_facade(canvas: &mut Canvas, b: &Building, night: bool, rng: &mut Rng) {
    // facade shading: light face sliding into the side tone
    let shaded = b.facade.shade(-8.0);
    let cols = b.w as i32;
    for px in 0..cols {
        let t = px as f32 / cols.max(1) as f32;
        let c = if t < 0.7 {
            mix(b.facade, b.side, t / 0.7)
        } else {
            mix(b.side, shaded, (t - 0.7) / 0.3)
        };
        canvas.fill_vspan(b.x as i32 + px, b.y as i32, (b.y + b.h) as i32, c.to_rgba(255));
    }

    match b.roof {
        RoofStyle::Peak => {
            let peak = (b.w * 0.25).min(30.0);
            canvas.fill_triangle(
                (b.x - 6.0, b.y),
                (b.x + b.w / 2.0, b.y - peak),
                (b.x + b.w + 6.0, b.y),
                b.facade.shade(-18.0).to_rgba(255),
            );
        }
        RoofStyle::Flat => {
            canvas.fill_rect(
                b.x as i32,
                (b.y - 4.0) as i32,
                b.w as i32,
                4,
                b.facade.shade(-10.0).to_rgba(255),
            );
        }
    }

    // window grid
    let win_w = (((b.w - 12.0) / b.cols as f32) - 4.0).max(6.0);
    let win_h = (((b.h - 20.0) / b.rows as f32) - 6.0).max(8.0);
    let gap_x = ((b.w - b.cols as f32 * win_w) / (b.cols + 1) as f32).max(6.0);
    let gap_y = ((b.h - b.rows as f32 * win_h) / (b.rows + 1) as f32).max(8.0);

    for col in 0..b.cols {
        for row in 0..b.rows {
            let x = b.x + gap_x + col as f32 * (win_w + gap_x);
            let y = b.y + gap_y + row as f32 * (win_h + gap_y);
            let c = if window_lit(night, rng) {
                if night {
                    Rgba::new(255, 230, 160, rng.range(90.0, 154.0) as u8)
                } else {
                    Rgba::new(255, 255, 240, 31)
                }
            } else {
                Rgba::new(10, 10, 12, rng.range(15.0, 31.0) as u8)
            };
            canvas.fill_rect(x as i32, y as i32, win_w as i32, win_h as i32, c);
        }
    }

    // right edge shadow
    canvas.fill_rect(
        (b.x + b.w - 6.0) as i32,
        (b.y + 6.0) as i32,
        6,
        (b.h - 12.0) as i32,
        Rgba::new(0, 0, 0, 15),
    );
}

#[inline]
fn mix(a: Hsl, b: Hsl, t: f32) -> Hsl {
    Hsl::new(
        a.h + (b.h - a.h) * t,
        a.s + (b.s - a.s) * t,
        a.l + (b.l - a.l) * t,
    )
}
