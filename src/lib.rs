// cityrain-engine - Animated parallax city in the rain
//
// The hosting page owns the canvas, the rAF loop, the DOM controls and
// the weather fetch; this crate owns everything behind them. Each tick
// the page calls `tick(dt)` and blits the RGBA framebuffer exposed via
// `frame_ptr`/`frame_len`; audio is pulled the same way in sample
// blocks. Control changes are plain setter calls and apply on the next
// tick.

pub mod assets;
pub mod audio;
pub mod color;
pub mod config;
pub mod render;
pub mod rng;
pub mod scene;
pub mod sim;

use wasm_bindgen::prelude::*;

use crate::config::{Config, PerfMode};
use crate::sim::CityWorld;

#[wasm_bindgen]
pub struct CityScene {
    world: CityWorld,
}

#[wasm_bindgen]
impl CityScene {
    /// Scene with the documented default configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(w: u32, h: u32) -> CityScene {
        Self {
            world: CityWorld::new(w, h, Config::default(), entropy_seed()),
        }
    }

    /// Scene seeded from the page-injected configuration JSON
    /// (`{"rainIntensity": n, "isNight": 0|1}`). Malformed input falls
    /// back to defaults.
    pub fn with_config(w: u32, h: u32, json: &str) -> CityScene {
        Self {
            world: CityWorld::new(w, h, Config::from_init_json(json), entropy_seed()),
        }
    }

    /// Advance and render one frame. `dt_ms` is elapsed wall time since
    /// the previous call.
    pub fn tick(&mut self, dt_ms: f32) {
        self.world.tick(dt_ms);
    }

    /// Viewport change; regenerates the scene and invalidates caches.
    pub fn resize(&mut self, w: u32, h: u32) {
        self.world.resize(w, h);
    }

    pub fn set_rain_intensity(&mut self, intensity: u32) {
        self.world.set_rain_intensity(intensity);
    }

    pub fn set_night(&mut self, night: bool) {
        self.world.set_night(night);
    }

    /// `fast` trades rain density for render cost; `false` restores the
    /// detailed baseline.
    pub fn set_performance_mode(&mut self, fast: bool) {
        self.world
            .set_perf_mode(if fast { PerfMode::Fast } else { PerfMode::Detailed });
    }

    pub fn set_sound(&mut self, on: bool) {
        self.world.set_sound(on);
    }

    /// Restore the server-provided baseline and disable sound.
    pub fn reset(&mut self) {
        self.world.reset();
    }

    /// Apply a fetched weather JSON payload. Malformed payloads are
    /// ignored; an unreachable endpoint means this is simply never
    /// called. Either way the configuration stays as it was.
    pub fn apply_weather(&mut self, json: &str) {
        self.world.apply_weather(json);
    }

    /// Push decoded facade art for a slot. Buildings flagged for this
    /// slot start using it on the next cache rebuild.
    pub fn load_facade(&mut self, slot: usize, w: u32, h: u32, rgba: &[u8]) {
        self.world.assets.load(slot, w, h, rgba);
        // freshly arrived art should show up without waiting for a resize
        self.world.invalidate_layers();
    }

    /// Record that a facade asset failed to load; the procedural
    /// renderer keeps covering for it.
    pub fn facade_failed(&mut self, slot: usize) {
        self.world.assets.mark_failed(slot);
    }

    /// Set up audio for the host's output sample rate. A rate of zero
    /// marks audio unsupported and silently disables the subsystem.
    pub fn init_audio(&mut self, sample_rate: u32) {
        self.world.init_audio(sample_rate);
    }

    /// Synthesize the next `frames` mono samples.
    pub fn fill_audio(&mut self, frames: usize) {
        self.world.audio.fill(frames);
    }

    pub fn audio_ptr(&self) -> *const f32 {
        self.world.audio.out_ptr()
    }

    pub fn audio_len(&self) -> usize {
        self.world.audio.out_len()
    }

    pub fn frame_ptr(&self) -> *const u8 {
        self.world.frame_ptr()
    }

    pub fn frame_len(&self) -> usize {
        self.world.frame_len()
    }

    pub fn width(&self) -> u32 {
        self.world.width()
    }

    pub fn height(&self) -> u32 {
        self.world.height()
    }
}

/// Wall-clock seed for production scenes; tests construct `CityWorld`
/// directly with fixed seeds.
fn entropy_seed() -> u32 {
    #[cfg(target_arch = "wasm32")]
    {
        js_sys::Date::now() as u64 as u32
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        use std::time::{SystemTime, UNIX_EPOCH};
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.subsec_nanos() ^ d.as_secs() as u32)
            .unwrap_or(0xC17A11)
    }
}
