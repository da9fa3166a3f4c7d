// scene/ - Procedural scene generation
//
// Builds the static city layout (buildings, trees) from the viewport
// size and a random source. Regenerated wholesale on startup and on
// every resize; entities are immutable between regenerations.

use crate::assets::FACADE_SLOTS;
use crate::color::Hsl;
use crate::rng::Rng;

/// Background strata for the parallax effect. Far scrolls least.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DepthLayer {
    Far,
    Mid,
    Near,
}

impl DepthLayer {
    pub const ALL: [DepthLayer; 3] = [DepthLayer::Far, DepthLayer::Mid, DepthLayer::Near];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            DepthLayer::Far => 0,
            DepthLayer::Mid => 1,
            DepthLayer::Near => 2,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoofStyle {
    Flat,
    Peak,
}

pub struct Building {
    pub x: f32,
    pub w: f32,
    pub h: f32,
    /// Top edge; bottom sits on the scene base line.
    pub y: f32,
    pub facade: Hsl,
    pub side: Hsl,
    pub cols: u32,
    pub rows: u32,
    pub roof: RoofStyle,
    /// Facade art slot when this building renders image-based.
    pub facade_asset: Option<usize>,
    pub layer: DepthLayer,
}

pub struct Tree {
    pub x: f32,
    pub y: f32,
    pub size: f32,
    pub crown_layers: u32,
}

pub struct Scene {
    pub buildings: Vec<Building>,
    pub trees: Vec<Tree>,
    /// Skyline base; buildings stand on it, the road sits below it.
    pub base_y: f32,
}

impl Scene {
    /// Generate a full scene for a viewport. Buildings tile [0, W) with
    /// randomized widths and small gaps until the horizontal extent is
    /// covered; every window grid is at least 2x3 so layout math never
    /// degenerates.
    pub fn generate(w: f32, h: f32, rng: &mut Rng) -> Self {
        let base_y = h * 0.65;

        let mut buildings = Vec::new();
        let mut x = 0.0;
        while x < w {
            let b = Building::generate(x, h, base_y, rng);
            x += b.w + rng.range(8.0, 36.0);
            buildings.push(b);
        }

        let tree_count = ((w / 180.0) as usize).max(4);
        let trees = (0..tree_count)
            .map(|_| Tree {
                x: rng.next_f32() * w,
                y: base_y + rng.range(18.0, 46.0),
                size: rng.range(18.0, 46.0),
                crown_layers: 2 + (rng.next_f32() * 3.0) as u32,
            })
            .collect();

        let scene = Self { buildings, trees, base_y };
        log::debug!(
            "scene generated: {} buildings, {} trees for {w}x{h}",
            scene.buildings.len(),
            scene.trees.len()
        );
        scene
    }
}

impl Building {
    fn generate(x: f32, viewport_h: f32, base_y: f32, rng: &mut Rng) -> Self {
        let w = rng.range(70.0, 210.0);
        let h = 140.0 + rng.next_f32() * (viewport_h * 0.45);

        let hue = 200.0 + (rng.next_f32() * 60.0).floor();
        let light = rng.range(30.0, 60.0);
        let facade = Hsl::new(hue, rng.range(18.0, 36.0), light);
        let side = Hsl::new(hue - 6.0, rng.range(12.0, 22.0), (light - 12.0).max(12.0));

        let layer = if rng.next_f32() > 0.6 {
            DepthLayer::Far
        } else if rng.next_f32() > 0.5 {
            DepthLayer::Mid
        } else {
            DepthLayer::Near
        };

        let facade_asset = if rng.next_f32() > 0.7 {
            Some((rng.next_f32() * FACADE_SLOTS as f32) as usize % FACADE_SLOTS)
        } else {
            None
        };

        Self {
            x,
            w,
            h,
            y: base_y - h,
            facade,
            side,
            cols: (((w - 12.0) / 18.0) as u32).max(2),
            rows: ((h / 24.0) as u32).max(3),
            roof: if rng.next_f32() > 0.7 { RoofStyle::Peak } else { RoofStyle::Flat },
            facade_asset,
            layer,
        }
    }
}
