// rng.rs - Seedable random source
//
// xorshift32. Fast, no tables, identical output on wasm and native.
// Every generation/update path takes one of these explicitly so tests
// can seed it and replay a scene.

pub struct Rng {
    state: u32,
}

impl Rng {
    pub fn new(seed: u32) -> Self {
        // xorshift must never sit at zero
        Self { state: if seed == 0 { 0xDEADBEEF } else { seed } }
    }

    #[inline(always)]
    pub fn next_f32(&mut self) -> f32 {
        self.state ^= self.state << 13;
        self.state ^= self.state >> 17;
        self.state ^= self.state << 5;
        (self.state >> 8) as f32 * (1.0 / 16777216.0)
    }

    /// Uniform in [lo, hi)
    #[inline]
    pub fn range(&mut self, lo: f32, hi: f32) -> f32 {
        lo + self.next_f32() * (hi - lo)
    }

    /// True with probability p
    #[inline]
    pub fn chance(&mut self, p: f32) -> bool {
        self.next_f32() < p
    }

    /// Uniform index into a non-empty slice
    #[inline]
    pub fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        let i = (self.next_f32() * items.len() as f32) as usize;
        &items[i.min(items.len() - 1)]
    }
}
