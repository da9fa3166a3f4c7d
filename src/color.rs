// color.rs - HSL entity colors and packed RGBA for the rasterizer
//
// Entities carry numeric HSL so shading is arithmetic, not string
// surgery. The CSS-string helpers exist only for the host boundary.

/// Hue in degrees, saturation/lightness in percent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    pub fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }

    /// Shift lightness by `delta`, clamped to [0, 100].
    pub fn shade(self, delta: f32) -> Self {
        Self { l: (self.l + delta).clamp(0.0, 100.0), ..self }
    }

    /// Convert to packed RGBA with the given alpha.
    pub fn to_rgba(self, a: u8) -> Rgba {
        let h = self.h.rem_euclid(360.0);
        let s = (self.s / 100.0).clamp(0.0, 1.0);
        let l = (self.l / 100.0).clamp(0.0, 1.0);

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
        let m = l - c / 2.0;

        let (r, g, b) = match (h / 60.0) as u32 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Rgba {
            r: ((r + m) * 255.0).clamp(0.0, 255.0) as u8,
            g: ((g + m) * 255.0).clamp(0.0, 255.0) as u8,
            b: ((b + m) * 255.0).clamp(0.0, 255.0) as u8,
            a,
        }
    }

    /// Parse `hsl(h, s%, l%)`. Whitespace-tolerant, fractional values ok.
    pub fn parse_css(text: &str) -> Option<Self> {
        let inner = text
            .trim()
            .strip_prefix("hsl(")
            .and_then(|rest| rest.strip_suffix(')'))?;
        let mut parts = inner.split(',');

        let h: f32 = parts.next()?.trim().parse().ok()?;
        let s: f32 = parts.next()?.trim().strip_suffix('%')?.trim().parse().ok()?;
        let l: f32 = parts.next()?.trim().strip_suffix('%')?.trim().parse().ok()?;
        if parts.next().is_some() {
            return None;
        }
        Some(Self { h, s, l })
    }

    pub fn to_css(self) -> String {
        format!("hsl({},{}%,{}%)", self.h, self.s, self.l)
    }
}

/// Shade a CSS `hsl(...)` string by a lightness delta.
///
/// Strings that do not parse come back unchanged. Callers at the host
/// boundary may hand us arbitrary text; a bad color is not worth a panic.
pub fn shade_css(text: &str, delta: f32) -> String {
    match Hsl::parse_css(text) {
        Some(hsl) => hsl.shade(delta).to_css(),
        None => text.to_string(),
    }
}

/// Packed 8-bit RGBA, the framebuffer's native unit.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}
