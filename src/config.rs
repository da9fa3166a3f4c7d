// config.rs - Live scene configuration
//
// One shared instance mutated by the UI bridge and the weather fetch,
// read by every other component each frame. Changes apply on the next
// tick, no debouncing.

use serde::Deserialize;

/// Pool capacity; intensity is clamped here so the drop pool never
/// outgrows its buffers.
pub const MAX_INTENSITY: u32 = 3000;

pub const DEFAULT_INTENSITY: u32 = 220;

/// Fast mode scales rain down to this fraction of the current intensity.
pub const FAST_SCALE: f32 = 0.35;
pub const FAST_FLOOR: u32 = 40;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PerfMode {
    Detailed,
    Fast,
}

#[derive(Clone, Copy, Debug)]
pub struct Config {
    pub rain_intensity: u32,
    pub night: bool,
    pub perf: PerfMode,
    pub sound: bool,

    // Initial server-provided values, restored by reset and detailed
    // mode; weather updates never touch them
    baseline_intensity: u32,
    baseline_night: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self::new(DEFAULT_INTENSITY, false)
    }
}

impl Config {
    pub fn new(intensity: u32, night: bool) -> Self {
        let intensity = intensity.min(MAX_INTENSITY);
        Self {
            rain_intensity: intensity,
            night,
            perf: PerfMode::Detailed,
            sound: false,
            baseline_intensity: intensity,
            baseline_night: night,
        }
    }

    /// Build from the page-injected JSON channel. Missing or malformed
    /// fields fall back to the documented defaults.
    pub fn from_init_json(json: &str) -> Self {
        match serde_json::from_str::<InitPayload>(json) {
            Ok(init) => Self::new(
                init.rain_intensity.unwrap_or(DEFAULT_INTENSITY),
                init.is_night.unwrap_or(0) != 0,
            ),
            Err(err) => {
                log::warn!("bad init config, using defaults: {err}");
                Self::default()
            }
        }
    }

    pub fn set_intensity(&mut self, intensity: u32) {
        self.rain_intensity = intensity.min(MAX_INTENSITY);
    }

    /// Apply a weather payload over the live config. Returns true when
    /// anything changed (caller invalidates layer caches). Malformed
    /// JSON keeps the current configuration.
    pub fn apply_weather(&mut self, json: &str) -> bool {
        let report: WeatherPayload = match serde_json::from_str(json) {
            Ok(report) => report,
            Err(err) => {
                log::debug!("weather payload ignored: {err}");
                return false;
            }
        };

        let mut changed = false;
        if let Some(intensity) = report.intensity {
            if intensity > 0 {
                self.set_intensity(intensity);
                changed = true;
            }
        }
        if let Some(night) = report.is_night {
            self.night = night != 0;
            changed = true;
        }
        if changed {
            log::info!(
                "weather applied: intensity={} night={}",
                self.rain_intensity,
                self.night
            );
        }
        changed
    }

    /// Switch performance mode. Returns true when the mode changed.
    pub fn set_perf_mode(&mut self, mode: PerfMode) -> bool {
        if self.perf == mode {
            return false;
        }
        self.perf = mode;
        match mode {
            PerfMode::Fast => {
                let scaled = (self.rain_intensity as f32 * FAST_SCALE).floor() as u32;
                self.rain_intensity = scaled.max(FAST_FLOOR);
            }
            PerfMode::Detailed => {
                self.rain_intensity = self.baseline_intensity;
            }
        }
        true
    }

    /// Restore the initial server configuration and disable sound.
    pub fn reset(&mut self) {
        self.rain_intensity = self.baseline_intensity;
        self.night = self.baseline_night;
        self.perf = PerfMode::Detailed;
        self.sound = false;
    }

    pub fn baseline_intensity(&self) -> u32 {
        self.baseline_intensity
    }
}

#[derive(Deserialize)]
struct InitPayload {
    #[serde(rename = "rainIntensity")]
    rain_intensity: Option<u32>,
    #[serde(rename = "isNight")]
    is_night: Option<u8>,
}

#[derive(Deserialize)]
struct WeatherPayload {
    intensity: Option<u32>,
    #[serde(rename = "isNight")]
    is_night: Option<u8>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_channel_fallback() {
        let cfg = Config::default();
        assert_eq!(cfg.rain_intensity, 220);
        assert!(!cfg.night);
        assert_eq!(cfg.perf, PerfMode::Detailed);
        assert!(!cfg.sound);
    }

    #[test]
    fn init_json_round_trip() {
        let cfg = Config::from_init_json(r#"{"rainIntensity":340,"isNight":1}"#);
        assert_eq!(cfg.rain_intensity, 340);
        assert!(cfg.night);
    }

    #[test]
    fn malformed_init_falls_back_to_defaults() {
        let cfg = Config::from_init_json("{nope");
        assert_eq!(cfg.rain_intensity, 220);
        assert!(!cfg.night);
    }

    #[test]
    fn fast_mode_scales_and_floors() {
        let mut cfg = Config::new(220, false);
        assert!(cfg.set_perf_mode(PerfMode::Fast));
        assert_eq!(cfg.rain_intensity, 77); // max(40, floor(220 * 0.35))

        let mut low = Config::new(60, false);
        low.set_perf_mode(PerfMode::Fast);
        assert_eq!(low.rain_intensity, 40);
    }

    #[test]
    fn detailed_mode_restores_baseline() {
        let mut cfg = Config::new(220, false);
        cfg.set_perf_mode(PerfMode::Fast);
        assert!(cfg.set_perf_mode(PerfMode::Detailed));
        assert_eq!(cfg.rain_intensity, 220);
    }

    #[test]
    fn same_mode_is_a_no_op() {
        let mut cfg = Config::new(220, false);
        assert!(!cfg.set_perf_mode(PerfMode::Detailed));
        assert_eq!(cfg.rain_intensity, 220);
    }

    #[test]
    fn weather_overwrites_live_values_only() {
        let mut cfg = Config::new(220, false);
        assert!(cfg.apply_weather(r#"{"intensity":320,"isNight":1}"#));
        assert_eq!(cfg.rain_intensity, 320);
        assert!(cfg.night);

        // the initial server configuration stays the restore point
        cfg.reset();
        assert_eq!(cfg.rain_intensity, 220);
        assert!(!cfg.night);
    }

    #[test]
    fn detailed_mode_restores_initial_intensity_after_weather() {
        let mut cfg = Config::new(220, false);
        cfg.apply_weather(r#"{"intensity":600}"#);
        cfg.set_perf_mode(PerfMode::Fast);
        assert_eq!(cfg.rain_intensity, 210); // floor(600 * 0.35)
        cfg.set_perf_mode(PerfMode::Detailed);
        assert_eq!(cfg.rain_intensity, 220);
    }

    #[test]
    fn weather_tolerates_malformed_and_partial_payloads() {
        let mut cfg = Config::new(220, true);
        assert!(!cfg.apply_weather("not json"));
        assert!(!cfg.apply_weather(r#"{"unrelated":5}"#));
        assert_eq!(cfg.rain_intensity, 220);
        assert!(cfg.night);

        // partial payload only touches what it names
        assert!(cfg.apply_weather(r#"{"isNight":0}"#));
        assert_eq!(cfg.rain_intensity, 220);
        assert!(!cfg.night);
    }

    #[test]
    fn zero_weather_intensity_is_ignored() {
        let mut cfg = Config::new(220, false);
        assert!(!cfg.apply_weather(r#"{"intensity":0}"#));
        assert_eq!(cfg.rain_intensity, 220);
    }

    #[test]
    fn reset_disables_sound() {
        let mut cfg = Config::new(220, false);
        cfg.sound = true;
        cfg.night = true;
        cfg.reset();
        assert!(!cfg.sound);
        assert!(!cfg.night);
    }

    #[test]
    fn intensity_clamps_to_pool_capacity() {
        let mut cfg = Config::new(220, false);
        cfg.set_intensity(1_000_000);
        assert_eq!(cfg.rain_intensity, MAX_INTENSITY);
    }
}
