// frame.rs - Per-frame compositor
//
// Draws the scene strictly back to front: sky, cached parallax layers,
// background rain, road, trees, people, cars, foreground rain. Trees
// onward are drawn live every frame so they sit in front of the cached
// buildings. The car pass doubles as the whoosh trigger point.

use crate::assets::FacadeAssets;
use crate::audio::AudioEngine;
use crate::color::Rgba;
use crate::config::Config;
use crate::render::canvas::Canvas;
use crate::render::layers::LayerCache;
use crate::rng::Rng;
use crate::scene::{Scene, Tree};
use crate::sim::cars::{Car, CarKind};
use crate::sim::people::Person;
use crate::sim::raindrops::Raindrops;

const SKY_NIGHT: (Rgba, Rgba) = (Rgba::opaque(7, 20, 40), Rgba::opaque(27, 56, 86));
const SKY_DAY: (Rgba, Rgba) = (Rgba::opaque(135, 206, 235), Rgba::opaque(193, 225, 255));

const RAIN_BG_NIGHT: Rgba = Rgba::new(200, 220, 255, 64);
const RAIN_BG_DAY: Rgba = Rgba::new(120, 160, 255, 115);
const RAIN_FG_NIGHT: Rgba = Rgba::new(220, 240, 255, 54);
const RAIN_FG_DAY: Rgba = Rgba::new(140, 190, 255, 84);

/// Cap on foreground streaks redrawn per frame. Deliberately a sample,
/// not the whole pool: a bounded brighter subset reads as a nearer rain
/// layer and keeps the pass cheap at high intensities.
const FG_SAMPLE_CAP: usize = 160;

#[allow(clippy::too_many_arguments)]
pub fn draw(
    frame: &mut Canvas,
    layers: &mut LayerCache,
    scene: &Scene,
    people: &[Person],
    cars: &mut [Car],
    rain: &Raindrops,
    assets: &FacadeAssets,
    config: &Config,
    audio: &mut AudioEngine,
    camera_x: f32,
    rng: &mut Rng,
) {
    let (w, h) = (frame.width() as f32, frame.height() as f32);

    // 1. sky
    let (top, bottom) = if config.night { SKY_NIGHT } else { SKY_DAY };
    frame.vertical_gradient(top, bottom);

    // 2. cached building layers, parallax-shifted
    layers.ensure(frame.width(), frame.height(), scene, assets, config.night, rng);
    layers.composite(frame, camera_x);

    // 3. background rain, thin and faint
    let bg = if config.night { RAIN_BG_NIGHT } else { RAIN_BG_DAY };
    for i in 0..rain.count() {
        frame.stroke_line(
            rain.x[i],
            rain.y[i],
            rain.x[i] + rain.wind[i] * 4.0,
            rain.y[i] + rain.len[i],
            bg,
        );
    }

    // 4. road with lane markers
    let road_y = scene.base_y + 40.0;
    frame.fill_rect(0, road_y as i32, w as i32, (h - road_y) as i32, Rgba::opaque(43, 43, 43));
    frame.fill_rect(0, (road_y + 24.0) as i32, w as i32, 8, Rgba::opaque(68, 68, 68));
    let mut marker_x = 0;
    while marker_x < w as i32 {
        frame.fill_rect(marker_x, (road_y + 28.0) as i32, 30, 4, Rgba::opaque(246, 226, 122));
        marker_x += 60;
    }

    // 5. trees, live every frame
    for tree in &scene.trees {
        draw_tree(frame, tree, rng);
    }

    // 6. people
    for p in people {
        draw_person(frame, p);
    }

    // 7. cars; entering the center band fires the one-shot whoosh
    for car in cars {
        draw_car(frame, car);
        if config.sound && !car.whoosh_played && car.in_center_band(w) {
            audio.trigger_whoosh(rng);
            car.whoosh_played = true;
        }
    }

    // 8. foreground rain: a bounded brighter sample of the pool
    if rain.count() > 0 {
        let fg = if config.night { RAIN_FG_NIGHT } else { RAIN_FG_DAY };
        for _ in (0..FG_SAMPLE_CAP.min(rain.count())).step_by(2) {
            let i = (rng.next_f32() * rain.count() as f32) as usize % rain.count();
            frame.stroke_line(
                rain.x[i],
                rain.y[i],
                rain.x[i] + rain.wind[i] * 6.0,
                rain.y[i] + rain.len[i] * 1.2,
                fg,
            );
        }
    }
}

fn draw_tree(frame: &mut Canvas, tree: &Tree, rng: &mut Rng) {
    // trunk
    frame.fill_rect(
        (tree.x - tree.size * 0.12) as i32,
        (tree.y + tree.size * 0.4) as i32,
        (tree.size * 0.24) as i32,
        (tree.size * 0.9) as i32,
        Rgba::opaque(75, 43, 31),
    );

    // layered crown, darker outer ring under a lighter core
    for layer in 0..tree.crown_layers {
        let size = tree.size * (1.0 - layer as f32 * 0.18);
        let cy = tree.y - layer as f32 * tree.size * 0.18;
        let cx = tree.x + (rng.next_f32() - 0.5) * 6.0;
        let base = crate::color::Hsl::new(
            rng.range(100.0, 140.0),
            rng.range(30.0, 50.0),
            25.0 + layer as f32 * 6.0,
        );
        frame.fill_ellipse(cx, cy, size * 1.05, size * 0.85, base.shade(-6.0).to_rgba(255));
        frame.fill_ellipse(cx, cy, size * 0.55, size * 0.45, base.shade(18.0).to_rgba(255));
    }

    // crown highlight
    frame.fill_ellipse(
        tree.x - tree.size * 0.18,
        tree.y - tree.size * 0.12,
        tree.size * 0.45,
        tree.size * 0.28,
        Rgba::new(255, 255, 255, 10),
    );
}

fn draw_person(frame: &mut Canvas, p: &Person) {
    let sway = p.walk_phase.sin() * 1.2;
    let x = p.x + sway;
    let foot_y = p.y;
    let body_h = (p.size * 0.9).max(10.0);
    let body_w = (p.size * 0.45).max(6.0);

    // legs swing on opposite phases
    let leg_offset = p.walk_phase.sin() * body_w * 0.45;
    let leg = Rgba::opaque(34, 34, 34);
    frame.fill_rect(
        (x - body_w * 0.25 + leg_offset * 0.5) as i32,
        (foot_y - 2.0) as i32,
        (body_w * 0.18).max(1.0) as i32,
        6,
        leg,
    );
    frame.fill_rect(
        (x + body_w * 0.05 - leg_offset * 0.5) as i32,
        (foot_y - 2.0) as i32,
        (body_w * 0.18).max(1.0) as i32,
        6,
        leg,
    );

    // body and head
    frame.fill_rect(
        (x - body_w * 0.5) as i32,
        (foot_y - 2.0 - body_h) as i32,
        body_w as i32,
        body_h as i32,
        Rgba::opaque(43, 59, 75),
    );
    let head_y = foot_y - body_h - 6.0;
    let head_r = (body_w * 0.45).max(3.0);
    frame.fill_ellipse(x, head_y, head_r, head_r, Rgba::opaque(241, 215, 199));

    // umbrella: tilted handle, filled canopy arc above it
    let handle_top = head_y - p.size * 0.25;
    let tilt = (p.walk_phase * 0.8).sin() * 0.12 * -p.dir;
    let shift = tilt * p.size * 6.0;
    frame.stroke_line(x, foot_y - body_h + 2.0, x + shift, handle_top, Rgba::opaque(59, 43, 43));

    let left = x - p.size + shift;
    let right = x + p.size + shift;
    let rise = p.size * 0.9;
    let mut px = left as i32;
    while (px as f32) < right {
        let t = (px as f32 - left) / (right - left);
        // quadratic arc: flat at the ribs, peaked over the handle
        let top = handle_top - 2.0 * t * (1.0 - t) * rise;
        frame.fill_vspan(px, top as i32, handle_top as i32 + 1, p.umbrella);
        px += 1;
    }
}

fn draw_car(frame: &mut Canvas, car: &Car) {
    let (x, y, w, h) = (car.x, car.y, car.w, car.h);
    let body = car.color;
    let trim = dim(body, 0.85);

    match car.kind {
        CarKind::Truck => {
            frame.fill_rect(x as i32, y as i32, (w * 1.4) as i32, h as i32, body);
            frame.fill_rect(
                (x + w * 0.9) as i32,
                (y - h * 0.25) as i32,
                (w * 0.5) as i32,
                (h * 0.7) as i32,
                trim,
            );
        }
        CarKind::Compact => {
            frame.fill_rect(x as i32, y as i32, w as i32, h as i32, body);
            frame.fill_rect((x + 4.0) as i32, (y - 6.0) as i32, (w - 8.0) as i32, 6, trim);
        }
        CarKind::Sedan => {
            frame.fill_rect(x as i32, y as i32, w as i32, h as i32, body);
            frame.fill_rect((x + w * 0.2) as i32, (y - 6.0) as i32, (w * 0.6) as i32, 6, trim);
        }
    }

    let wheel = Rgba::opaque(17, 17, 17);
    frame.fill_rect((x + 4.0) as i32, (y + h - 2.0) as i32, 6, 3, wheel);
    frame.fill_rect((x + w * 0.9 - 6.0) as i32, (y + h - 2.0) as i32, 6, 3, wheel);
}

#[inline]
fn dim(c: Rgba, f: f32) -> Rgba {
    Rgba::new(
        (c.r as f32 * f) as u8,
        (c.g as f32 * f) as u8,
        (c.b as f32 * f) as u8,
        c.a,
    )
}
