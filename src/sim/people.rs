// people.rs - Pedestrians with umbrellas
//
// Each person is seeded next to a tree but walks the full viewport,
// wrapping at the edges. The walk phase drives leg swing and umbrella
// tilt; a small per-tick chance freezes them in place for a while.

use super::TIME_SCALE;
use crate::color::Rgba;
use crate::rng::Rng;
use crate::scene::Tree;

/// Chance per tree of getting a pedestrian.
const PERSON_CHANCE: f32 = 0.55;

/// Per-tick chance a moving person stops to wait.
const PAUSE_CHANCE: f32 = 0.0008;

const UMBRELLAS: [Rgba; 4] = [
    Rgba::opaque(204, 51, 51),
    Rgba::opaque(0, 170, 170),
    Rgba::opaque(255, 183, 77),
    Rgba::opaque(127, 201, 127),
];

pub struct Person {
    pub x: f32,
    pub y: f32,
    /// Anchor tree position, kept for layout only; movement is global.
    pub tree_x: f32,
    pub umbrella: Rgba,
    pub size: f32,
    /// Walking direction, +1 or -1.
    pub dir: f32,
    pub vx: f32,
    pub walk_phase: f32,
    pub pause_time: f32,
}

/// Seed people near roughly half the trees.
pub fn spawn(trees: &[Tree], rng: &mut Rng) -> Vec<Person> {
    let mut people = Vec::new();
    for tree in trees {
        if !rng.chance(PERSON_CHANCE) {
            continue;
        }
        let dir = if rng.chance(0.5) { 1.0 } else { -1.0 };
        let speed = rng.range(0.3, 1.1);
        people.push(Person {
            x: tree.x + (rng.next_f32() - 0.5) * tree.size * 0.5,
            y: tree.y + tree.size * 1.3,
            tree_x: tree.x,
            umbrella: *rng.pick(&UMBRELLAS),
            size: (tree.size * 0.38).max(8.0),
            dir,
            vx: speed * dir,
            walk_phase: rng.next_f32() * std::f32::consts::TAU,
            pause_time: 0.0,
        });
    }
    people
}

/// Advance walk phase and position; paused people only count down.
pub fn update(people: &mut [Person], dt: f32, viewport_w: f32, rng: &mut Rng) {
    for p in people {
        if p.pause_time > 0.0 {
            p.pause_time -= dt * 0.01;
            continue;
        }

        p.walk_phase += dt * 0.02 * p.vx.abs();
        p.x += p.vx * dt * TIME_SCALE;

        if rng.chance(PAUSE_CHANCE) {
            p.pause_time = rng.range(40.0, 180.0);
        }

        // wrap around the viewport, never despawn
        if p.x < -60.0 {
            p.x = viewport_w + 40.0;
        } else if p.x > viewport_w + 60.0 {
            p.x = -40.0;
        }
    }
}
