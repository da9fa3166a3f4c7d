// raindrops.rs - Falling rain pool
//
// Structure-of-Arrays pool whose size tracks the configured intensity.
// Drops recycle to above the top edge instead of despawning.

use super::TIME_SCALE;
use crate::rng::Rng;

/// Vertical overshoot before a drop recycles.
const BOTTOM_MARGIN: f32 = 20.0;

pub struct Raindrops {
    pub x: Vec<f32>,
    pub y: Vec<f32>,
    pub len: Vec<f32>,
    pub speed: Vec<f32>,
    pub wind: Vec<f32>,
}

impl Raindrops {
    pub fn new() -> Self {
        Self {
            x: Vec::new(),
            y: Vec::new(),
            len: Vec::new(),
            speed: Vec::new(),
            wind: Vec::new(),
        }
    }

    #[inline]
    pub fn count(&self) -> usize {
        self.x.len()
    }

    pub fn clear(&mut self) {
        self.x.clear();
        self.y.clear();
        self.len.clear();
        self.speed.clear();
        self.wind.clear();
    }

    /// Bring the pool to exactly `target` drops: truncate excess or
    /// append freshly randomized drops above the viewport.
    pub fn reconcile(&mut self, target: usize, w: f32, h: f32, rng: &mut Rng) {
        if self.count() > target {
            self.x.truncate(target);
            self.y.truncate(target);
            self.len.truncate(target);
            self.speed.truncate(target);
            self.wind.truncate(target);
            return;
        }

        while self.count() < target {
            self.x.push(rng.next_f32() * w);
            self.y.push(-rng.next_f32() * h);
            self.len.push(rng.range(8.0, 26.0));
            self.speed.push(rng.range(4.0, 12.0));
            self.wind.push(rng.range(-0.5, 0.5));
        }
    }

    /// Advance every drop by wind and fall speed; drops past the bottom
    /// edge recycle to a random point above the top.
    pub fn update(&mut self, dt: f32, w: f32, h: f32, rng: &mut Rng) {
        let step = dt * TIME_SCALE;
        for i in 0..self.count() {
            self.x[i] += self.wind[i] * step;
            self.y[i] += self.speed[i] * step;

            if self.y[i] > h + BOTTOM_MARGIN {
                self.y[i] = -10.0 - rng.next_f32() * h;
                self.x[i] = rng.next_f32() * w;
            }
        }
    }
}

impl Default for Raindrops {
    fn default() -> Self {
        Self::new()
    }
}
