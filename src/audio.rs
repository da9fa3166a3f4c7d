// audio.rs - Ambient rain noise and car whooshes
//
// The core synthesizes raw sample blocks; the host pulls them and feeds
// whatever audio output it has. Two paths: a looped noise generator
// through a low-pass for ambient rain (gain is the on/off control, the
// generator never stops, so toggling cannot click), and short decaying
// noise bursts through a randomized bandpass for car whooshes.
//
// If the host reports no usable audio output the engine stays inert for
// the session: every call is a no-op and the render loop never notices.

use crate::rng::Rng;

const AMBIENT_GAIN: f32 = 0.15;
const AMBIENT_NOISE_LEVEL: f32 = 0.25;
const LOWPASS_HZ: f32 = 6000.0;

const WHOOSH_SECS: f32 = 0.4;
const WHOOSH_PEAK: f32 = 0.4;
const WHOOSH_GAIN: f32 = 0.3;

pub struct AudioEngine {
    graph: Option<Graph>,
}

struct Graph {
    sample_rate: f32,
    enabled: bool,

    noise: Rng,
    lp_coeff: f32,
    lp_state: f32,
    gain: f32,

    voices: Vec<Whoosh>,
    out: Vec<f32>,
}

struct Whoosh {
    bp: Biquad,
    total: usize,
    remaining: usize,
}

impl AudioEngine {
    /// A zero or absurd sample rate means the host has no audio output;
    /// the engine degrades to a permanent no-op instead of erroring.
    pub fn new(sample_rate: u32, seed: u32) -> Self {
        if sample_rate == 0 || sample_rate > 384_000 {
            log::warn!("audio unsupported (sample rate {sample_rate}), sound disabled");
            return Self { graph: None };
        }
        let sr = sample_rate as f32;
        Self {
            graph: Some(Graph {
                sample_rate: sr,
                enabled: false,
                noise: Rng::new(seed),
                // one-pole coefficient for the ambient low-pass
                lp_coeff: 1.0 - (-std::f32::consts::TAU * LOWPASS_HZ / sr).exp(),
                lp_state: 0.0,
                gain: 0.0,
                voices: Vec::new(),
                out: Vec::new(),
            }),
        }
    }

    pub fn inert() -> Self {
        Self { graph: None }
    }

    pub fn is_inert(&self) -> bool {
        self.graph.is_none()
    }

    pub fn enabled(&self) -> bool {
        self.graph.as_ref().is_some_and(|g| g.enabled)
    }

    pub fn set_enabled(&mut self, on: bool) {
        if let Some(g) = &mut self.graph {
            g.enabled = on;
        }
    }

    /// Start one whoosh voice with a randomized bandpass center.
    /// Independent per call; the voice removes itself when exhausted.
    pub fn trigger_whoosh(&mut self, rng: &mut Rng) {
        let Some(g) = &mut self.graph else { return };
        if !g.enabled {
            return;
        }
        let center = rng.range(1000.0, 3000.0);
        // at least one sample, or a voice at a degenerate rate would
        // underflow its countdown before the retain pass sees it
        let total = ((g.sample_rate * WHOOSH_SECS) as usize).max(1);
        g.voices.push(Whoosh {
            bp: Biquad::bandpass(center, 1.0, g.sample_rate),
            total,
            remaining: total,
        });
        log::debug!("whoosh at {center:.0} Hz, {} active voices", g.voices.len());
    }

    pub fn active_whooshes(&self) -> usize {
        self.graph.as_ref().map_or(0, |g| g.voices.len())
    }

    /// Synthesize `frames` mono samples into the internal buffer.
    /// Inert engines produce silence.
    pub fn fill(&mut self, frames: usize) {
        let Some(g) = &mut self.graph else { return };
        g.out.clear();
        g.out.resize(frames, 0.0);

        let target = if g.enabled { AMBIENT_GAIN } else { 0.0 };
        for sample in g.out.iter_mut() {
            // ambient path always runs; only its gain reacts to the toggle
            let white = (g.noise.next_f32() * 2.0 - 1.0) * AMBIENT_NOISE_LEVEL;
            g.lp_state += g.lp_coeff * (white - g.lp_state);
            g.gain += (target - g.gain) * 0.001;
            *sample = g.lp_state * g.gain;

            for voice in &mut g.voices {
                let t = 1.0 - voice.remaining as f32 / voice.total as f32;
                let burst = (g.noise.next_f32() * 2.0 - 1.0) * (1.0 - t) * WHOOSH_PEAK;
                *sample += voice.bp.process(burst) * WHOOSH_GAIN;
                voice.remaining -= 1;
            }
            g.voices.retain(|v| v.remaining > 0);
        }
    }

    pub fn out_ptr(&self) -> *const f32 {
        self.graph.as_ref().map_or(std::ptr::null(), |g| g.out.as_ptr())
    }

    pub fn out_len(&self) -> usize {
        self.graph.as_ref().map_or(0, |g| g.out.len())
    }

    #[cfg(test)]
    fn out(&self) -> &[f32] {
        self.graph.as_ref().map_or(&[], |g| g.out.as_slice())
    }
}

/// RBJ bandpass (constant skirt gain).
struct Biquad {
    b0: f32,
    b1: f32,
    b2: f32,
    a1: f32,
    a2: f32,
    z1: f32,
    z2: f32,
}

impl Biquad {
    fn bandpass(center_hz: f32, q: f32, sample_rate: f32) -> Self {
        let w0 = std::f32::consts::TAU * center_hz / sample_rate;
        let alpha = w0.sin() / (2.0 * q);
        let a0 = 1.0 + alpha;
        Self {
            b0: alpha / a0,
            b1: 0.0,
            b2: -alpha / a0,
            a1: -2.0 * w0.cos() / a0,
            a2: (1.0 - alpha) / a0,
            z1: 0.0,
            z2: 0.0,
        }
    }

    #[inline]
    fn process(&mut self, x: f32) -> f32 {
        // transposed direct form II
        let y = self.b0 * x + self.z1;
        self.z1 = self.b1 * x - self.a1 * y + self.z2;
        self.z2 = self.b2 * x - self.a2 * y;
        y
    }
}
