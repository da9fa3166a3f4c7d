// sim/ - World state and per-tick update
//
// CityWorld is the whole simulation context: configuration, generated
// scene, animated entities, caches, framebuffer, audio. Everything runs
// on one logical thread; a tick is update-then-draw, and every mutation
// path leaves the collections consistent before returning because the
// next frame reads them immediately.

pub mod cars;
pub mod people;
pub mod raindrops;

use crate::assets::FacadeAssets;
use crate::audio::AudioEngine;
use crate::config::{Config, PerfMode};
use crate::render::canvas::Canvas;
use crate::render::frame;
use crate::render::layers::LayerCache;
use crate::rng::Rng;
use crate::scene::Scene;

use cars::Car;
use people::Person;
use raindrops::Raindrops;

/// Converts elapsed milliseconds into movement units; all entity speeds
/// are calibrated against it.
pub(crate) const TIME_SCALE: f32 = 0.06;

/// Camera drift per scaled tick; the parallax layers scroll off this.
const CAMERA_SPEED: f32 = 0.02;

pub struct CityWorld {
    w: u32,
    h: u32,
    camera_x: f32,

    pub config: Config,
    pub scene: Scene,
    pub people: Vec<Person>,
    pub cars: Vec<Car>,
    pub rain: Raindrops,

    layers: LayerCache,
    frame: Canvas,
    pub assets: FacadeAssets,
    pub audio: AudioEngine,
    rng: Rng,
}

impl CityWorld {
    pub fn new(w: u32, h: u32, config: Config, seed: u32) -> Self {
        let mut rng = Rng::new(seed);
        let scene = Scene::generate(w as f32, h as f32, &mut rng);
        let people = people::spawn(&scene.trees, &mut rng);
        let cars = cars::spawn(w as f32, scene.base_y, &mut rng);

        Self {
            w,
            h,
            camera_x: 0.0,
            config,
            scene,
            people,
            cars,
            rain: Raindrops::new(),
            layers: LayerCache::new(),
            frame: Canvas::new(w, h),
            assets: FacadeAssets::new(),
            audio: AudioEngine::inert(),
            rng,
        }
    }

    /// One frame: reconcile the rain pool, advance all entity state,
    /// then draw. Draw always sees post-update state.
    pub fn tick(&mut self, dt_ms: f32) {
        let dt = dt_ms.max(0.0);
        let (w, h) = (self.w as f32, self.h as f32);

        self.rain
            .reconcile(self.config.rain_intensity as usize, w, h, &mut self.rng);

        cars::update(&mut self.cars, dt, w, &mut self.rng);
        people::update(&mut self.people, dt, w, &mut self.rng);
        self.rain.update(dt, w, h, &mut self.rng);
        self.camera_x += CAMERA_SPEED * dt * TIME_SCALE;

        frame::draw(
            &mut self.frame,
            &mut self.layers,
            &self.scene,
            &self.people,
            &mut self.cars,
            &self.rain,
            &self.assets,
            &self.config,
            &mut self.audio,
            self.camera_x,
            &mut self.rng,
        );
    }

    /// Viewport change: regenerate the scene wholesale and drop every
    /// cached layer. Entity collections are swapped atomically so the
    /// next tick sees a complete scene.
    pub fn resize(&mut self, w: u32, h: u32) {
        self.w = w;
        self.h = h;
        self.frame.resize(w, h);
        self.regenerate();
    }

    fn regenerate(&mut self) {
        let (w, h) = (self.w as f32, self.h as f32);
        self.scene = Scene::generate(w, h, &mut self.rng);
        self.people = people::spawn(&self.scene.trees, &mut self.rng);
        self.cars = cars::spawn(w, self.scene.base_y, &mut self.rng);
        self.rain.clear();
        self.layers.invalidate();
    }

    pub fn set_rain_intensity(&mut self, intensity: u32) {
        self.config.set_intensity(intensity);
    }

    pub fn set_night(&mut self, night: bool) {
        if self.config.night != night {
            self.config.night = night;
            // window lit state depends on the flag
            self.layers.invalidate();
        }
    }

    pub fn set_perf_mode(&mut self, mode: PerfMode) {
        if self.config.set_perf_mode(mode) {
            log::info!("performance mode -> {mode:?}");
            self.layers.invalidate();
        }
    }

    pub fn set_sound(&mut self, on: bool) {
        self.config.sound = on;
        self.audio.set_enabled(on);
    }

    /// Apply a fetched weather payload; malformed input changes nothing.
    pub fn apply_weather(&mut self, json: &str) {
        if self.config.apply_weather(json) {
            self.layers.invalidate();
        }
    }

    /// Back to the server-provided baseline, sound off.
    pub fn reset(&mut self) {
        self.config.reset();
        self.audio.set_enabled(false);
        self.layers.invalidate();
    }

    /// Force a layer rebuild on the next frame (asset arrival, host
    /// driven invalidation).
    pub fn invalidate_layers(&mut self) {
        self.layers.invalidate();
    }

    pub fn init_audio(&mut self, sample_rate: u32) {
        let seed = self.rng.next_f32().to_bits();
        self.audio = AudioEngine::new(sample_rate, seed);
        self.audio.set_enabled(self.config.sound);
    }

    pub fn width(&self) -> u32 {
        self.w
    }

    pub fn height(&self) -> u32 {
        self.h
    }

    pub fn camera_x(&self) -> f32 {
        self.camera_x
    }

    pub fn frame_ptr(&self) -> *const u8 {
        self.frame.ptr()
    }

    pub fn frame_len(&self) -> usize {
        self.frame.len()
    }
}
