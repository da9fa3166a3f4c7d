// canvas.rs - Software RGBA framebuffer
//
// Owns the pixel buffer handed to the host via ptr/len. Primitives clip
// to bounds and blend straight-alpha; everything is plain scanline
// rasterization, no GPU.

use crate::assets::Image;
use crate::color::Rgba;

pub struct Canvas {
    pixels: Vec<u8>,
    w: u32,
    h: u32,
}

impl Canvas {
    pub fn new(w: u32, h: u32) -> Self {
        Self {
            pixels: vec![0; (w * h * 4) as usize],
            w,
            h,
        }
    }

    pub fn resize(&mut self, w: u32, h: u32) {
        self.w = w;
        self.h = h;
        self.pixels.clear();
        self.pixels.resize((w * h * 4) as usize, 0);
    }

    /// Reset every pixel to fully transparent black.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    pub fn ptr(&self) -> *const u8 {
        self.pixels.as_ptr()
    }

    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn width(&self) -> u32 {
        self.w
    }

    pub fn height(&self) -> u32 {
        self.h
    }

    /// Read back one pixel (tests, compositing).
    #[inline]
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        let i = ((y * self.w + x) * 4) as usize;
        Rgba::new(
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        )
    }

    #[inline]
    fn store(&mut self, i: usize, c: Rgba) {
        self.pixels[i] = c.r;
        self.pixels[i + 1] = c.g;
        self.pixels[i + 2] = c.b;
        self.pixels[i + 3] = c.a;
    }

    /// Source-over blend of one pixel. Opaque sources overwrite.
    #[inline]
    pub fn blend_pixel(&mut self, x: i32, y: i32, c: Rgba) {
        if x < 0 || y < 0 || x >= self.w as i32 || y >= self.h as i32 || c.a == 0 {
            return;
        }
        let i = ((y as u32 * self.w + x as u32) * 4) as usize;
        if c.a == 255 {
            self.store(i, c);
            return;
        }
        let a = c.a as u32;
        let inv = 255 - a;
        let blended = Rgba::new(
            ((c.r as u32 * a + self.pixels[i] as u32 * inv) / 255) as u8,
            ((c.g as u32 * a + self.pixels[i + 1] as u32 * inv) / 255) as u8,
            ((c.b as u32 * a + self.pixels[i + 2] as u32 * inv) / 255) as u8,
            (a + self.pixels[i + 3] as u32 * inv / 255).min(255) as u8,
        );
        self.store(i, blended);
    }

    /// Axis-aligned filled rectangle.
    pub fn fill_rect(&mut self, x: i32, y: i32, rw: i32, rh: i32, c: Rgba) {
        let x0 = x.max(0);
        let y0 = y.max(0);
        let x1 = (x + rw).min(self.w as i32);
        let y1 = (y + rh).min(self.h as i32);
        for py in y0..y1 {
            for px in x0..x1 {
                self.blend_pixel(px, py, c);
            }
        }
    }

    /// Vertical span of one column, inclusive of y0, exclusive of y1.
    pub fn fill_vspan(&mut self, x: i32, y0: i32, y1: i32, c: Rgba) {
        for y in y0..y1 {
            self.blend_pixel(x, y, c);
        }
    }

    /// Vertical two-stop gradient over the whole surface.
    pub fn vertical_gradient(&mut self, top: Rgba, bottom: Rgba) {
        let h = self.h.max(1);
        for y in 0..self.h {
            let t = y as f32 / (h - 1).max(1) as f32;
            let c = Rgba::new(
                lerp_u8(top.r, bottom.r, t),
                lerp_u8(top.g, bottom.g, t),
                lerp_u8(top.b, bottom.b, t),
                255,
            );
            for x in 0..self.w {
                let i = ((y * self.w + x) * 4) as usize;
                self.store(i, c);
            }
        }
    }

    /// Alpha-blended line, stepped at one sample per pixel of the
    /// longer axis. Rain streaks and umbrella handles are short, so a
    /// plain DDA is plenty.
    pub fn stroke_line(&mut self, x0: f32, y0: f32, x1: f32, y1: f32, c: Rgba) {
        let dx = x1 - x0;
        let dy = y1 - y0;
        let steps = dx.abs().max(dy.abs()).ceil().max(1.0) as i32;
        for s in 0..=steps {
            let t = s as f32 / steps as f32;
            self.blend_pixel((x0 + dx * t) as i32, (y0 + dy * t) as i32, c);
        }
    }

    /// Filled axis-aligned ellipse.
    pub fn fill_ellipse(&mut self, cx: f32, cy: f32, rx: f32, ry: f32, c: Rgba) {
        if rx <= 0.0 || ry <= 0.0 {
            return;
        }
        let y0 = (cy - ry).floor() as i32;
        let y1 = (cy + ry).ceil() as i32;
        for py in y0..=y1 {
            let ny = (py as f32 + 0.5 - cy) / ry;
            let rem = 1.0 - ny * ny;
            if rem < 0.0 {
                continue;
            }
            let half = rem.sqrt() * rx;
            let x0 = (cx - half).round() as i32;
            let x1 = (cx + half).round() as i32;
            for px in x0..x1 {
                self.blend_pixel(px, py, c);
            }
        }
    }

    /// Filled triangle via half-space test over the bounding box.
    pub fn fill_triangle(&mut self, p0: (f32, f32), p1: (f32, f32), p2: (f32, f32), c: Rgba) {
        let min_x = p0.0.min(p1.0).min(p2.0).floor() as i32;
        let max_x = p0.0.max(p1.0).max(p2.0).ceil() as i32;
        let min_y = p0.1.min(p1.1).min(p2.1).floor() as i32;
        let max_y = p0.1.max(p1.1).max(p2.1).ceil() as i32;

        let edge = |a: (f32, f32), b: (f32, f32), px: f32, py: f32| {
            (b.0 - a.0) * (py - a.1) - (b.1 - a.1) * (px - a.0)
        };

        for py in min_y..=max_y {
            for px in min_x..=max_x {
                let (fx, fy) = (px as f32 + 0.5, py as f32 + 0.5);
                let w0 = edge(p0, p1, fx, fy);
                let w1 = edge(p1, p2, fx, fy);
                let w2 = edge(p2, p0, fx, fy);
                let inside = (w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0)
                    || (w0 <= 0.0 && w1 <= 0.0 && w2 <= 0.0);
                if inside {
                    self.blend_pixel(px, py, c);
                }
            }
        }
    }

    /// Nearest-neighbor blit of a host image scaled into a destination
    /// rect. Fully transparent source pixels are skipped.
    pub fn blit_scaled(&mut self, img: &Image, dx: i32, dy: i32, dw: i32, dh: i32) {
        if dw <= 0 || dh <= 0 {
            return;
        }
        for py in 0..dh {
            let sy = (py as f32 / dh as f32 * img.h as f32) as u32;
            let sy = sy.min(img.h - 1);
            for px in 0..dw {
                let sx = (px as f32 / dw as f32 * img.w as f32) as u32;
                let sx = sx.min(img.w - 1);
                let si = ((sy * img.w + sx) * 4) as usize;
                let c = Rgba::new(
                    img.rgba[si],
                    img.rgba[si + 1],
                    img.rgba[si + 2],
                    img.rgba[si + 3],
                );
                if c.a > 0 {
                    self.blend_pixel(dx + px, dy + py, c);
                }
            }
        }
    }

    /// Source-over another canvas at a horizontal offset (parallax
    /// compositing). Transparent source pixels cost nothing.
    pub fn blend_canvas(&mut self, src: &Canvas, offset_x: i32) {
        let h = self.h.min(src.h);
        for y in 0..h {
            for sx in 0..src.w {
                let si = ((y * src.w + sx) * 4) as usize;
                let a = src.pixels[si + 3];
                if a == 0 {
                    continue;
                }
                let c = Rgba::new(src.pixels[si], src.pixels[si + 1], src.pixels[si + 2], a);
                self.blend_pixel(sx as i32 + offset_x, y as i32, c);
            }
        }
    }
}

#[inline]
fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    (a as f32 + (b as f32 - a as f32) * t) as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_rect_clips_to_bounds() {
        let mut c = Canvas::new(10, 10);
        c.fill_rect(-5, -5, 8, 8, Rgba::opaque(255, 0, 0));
        assert_eq!(c.pixel(0, 0), Rgba::opaque(255, 0, 0));
        assert_eq!(c.pixel(3, 3), Rgba::new(0, 0, 0, 0));
        // off the far edge: no panic, no wraparound
        c.fill_rect(8, 8, 100, 100, Rgba::opaque(0, 255, 0));
        assert_eq!(c.pixel(9, 9), Rgba::opaque(0, 255, 0));
        assert_eq!(c.pixel(0, 9), Rgba::new(0, 0, 0, 0));
    }

    #[test]
    fn opaque_blend_overwrites_and_half_blend_mixes() {
        let mut c = Canvas::new(2, 1);
        c.fill_rect(0, 0, 2, 1, Rgba::opaque(0, 0, 0));
        c.blend_pixel(0, 0, Rgba::opaque(200, 100, 50));
        assert_eq!(c.pixel(0, 0), Rgba::opaque(200, 100, 50));

        c.blend_pixel(1, 0, Rgba::new(200, 100, 50, 128));
        let p = c.pixel(1, 0);
        assert!(p.r > 90 && p.r < 110, "r={}", p.r);
        assert_eq!(p.a, 255);
    }

    #[test]
    fn gradient_interpolates_top_to_bottom() {
        let mut c = Canvas::new(1, 3);
        c.vertical_gradient(Rgba::opaque(0, 0, 0), Rgba::opaque(200, 200, 200));
        assert_eq!(c.pixel(0, 0), Rgba::opaque(0, 0, 0));
        assert_eq!(c.pixel(0, 2), Rgba::opaque(200, 200, 200));
        let mid = c.pixel(0, 1);
        assert!(mid.r > 80 && mid.r < 120);
    }

    #[test]
    fn resize_reallocates_and_clears() {
        let mut c = Canvas::new(4, 4);
        c.fill_rect(0, 0, 4, 4, Rgba::opaque(9, 9, 9));
        c.resize(8, 2);
        assert_eq!(c.len(), 8 * 2 * 4);
        assert_eq!(c.pixel(7, 1), Rgba::new(0, 0, 0, 0));
    }

    #[test]
    fn blend_canvas_applies_offset_and_skips_transparent() {
        let mut layer = Canvas::new(4, 2);
        layer.fill_rect(0, 0, 1, 1, Rgba::opaque(10, 20, 30));

        let mut frame = Canvas::new(4, 2);
        frame.fill_rect(0, 0, 4, 2, Rgba::opaque(1, 1, 1));
        frame.blend_canvas(&layer, 2);

        assert_eq!(frame.pixel(2, 0), Rgba::opaque(10, 20, 30));
        // transparent layer pixels leave the frame untouched
        assert_eq!(frame.pixel(3, 1), Rgba::opaque(1, 1, 1));
        assert_eq!(frame.pixel(0, 0), Rgba::opaque(1, 1, 1));
    }

    #[test]
    fn triangle_covers_its_centroid_but_not_corners_outside() {
        let mut c = Canvas::new(20, 20);
        c.fill_triangle((2.0, 18.0), (10.0, 2.0), (18.0, 18.0), Rgba::opaque(5, 5, 5));
        assert_eq!(c.pixel(10, 12), Rgba::opaque(5, 5, 5));
        assert_eq!(c.pixel(1, 1), Rgba::new(0, 0, 0, 0));
    }

    #[test]
    fn blit_scaled_skips_transparent_pixels() {
        let img = Image {
            w: 2,
            h: 1,
            rgba: vec![255, 0, 0, 255, 0, 0, 0, 0],
        };
        let mut c = Canvas::new(4, 2);
        c.blit_scaled(&img, 0, 0, 4, 2);
        assert_eq!(c.pixel(0, 0), Rgba::opaque(255, 0, 0));
        assert_eq!(c.pixel(3, 1), Rgba::new(0, 0, 0, 0));
    }
}
