use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::core::engine::EngineSettings;
use crate::core::oscillator::WaveformKind;

const RENDER_RATE_RANGE_HZ: (f32, f32) = (1.0, 240.0);
const FFT_SIZE_RANGE: (usize, usize) = (32, 32768);
const MAX_CANVAS_SIDE: f32 = 4096.0;
const MAX_TRACE_LINE_WIDTH: f32 = 20.0;

/// Entry in the preset frequency list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyPreset {
    pub label: String,
    pub hz: f32,
}

impl FrequencyPreset {
    fn new(label: &str, hz: f32) -> Self {
        Self { label: label.to_string(), hz }
    }
}

/// User-tunable settings. Read once at startup and never written back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub default_frequency_hz: f32,
    pub default_waveform: WaveformKind,
    pub default_volume_percent: u8,
    pub presets: Vec<FrequencyPreset>,
    pub render_rate_hz: f32,
    pub duration_tick_ms: u64,
    pub sync_delay_ms: u64,
    pub trail_fade_alpha: f32,
    pub fft_size: usize,
    pub canvas_width: f32,
    pub canvas_height: f32,
    pub trace_line_width: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            default_frequency_hz: 963.0,
            default_waveform: WaveformKind::Sine,
            default_volume_percent: 30,
            presets: vec![
                FrequencyPreset::new("174 Hz - Foundation", 174.0),
                FrequencyPreset::new("285 Hz - Restoration", 285.0),
                FrequencyPreset::new("396 Hz - Liberation", 396.0),
                FrequencyPreset::new("417 Hz - Transmutation", 417.0),
                FrequencyPreset::new("432 Hz - Cosmic Tuning", 432.0),
                FrequencyPreset::new("528 Hz - Transformation", 528.0),
                FrequencyPreset::new("639 Hz - Connection", 639.0),
                FrequencyPreset::new("741 Hz - Expression", 741.0),
                FrequencyPreset::new("852 Hz - Intuition", 852.0),
                FrequencyPreset::new("963 Hz - Omniverse", 963.0),
            ],
            render_rate_hz: 60.0,
            duration_tick_ms: 1000,
            sync_delay_ms: 1000,
            trail_fade_alpha: 0.1,
            fft_size: 2048,
            canvas_width: 800.0,
            canvas_height: 200.0,
            trace_line_width: 2.0,
        }
    }
}

impl AppConfig {
    /// Loads the user config, falling back to defaults when it is missing or broken
    pub fn load() -> Self {
        let path = match Self::config_path() {
            Ok(path) => path,
            Err(e) => {
                log::warn!("{:#}; using default settings", e);
                return Self::default();
            }
        };

        if !path.exists() {
            log::info!("No config at {}, using defaults", path.display());
            return Self::default();
        }

        match Self::load_from(&path) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            },
            Err(e) => {
                log::warn!("{:#}; using default settings", e);
                Self::default()
            }
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let config: AppConfig = serde_json::from_reader(file)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config.sanitized())
    }

    pub fn config_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        path.push("galactic-broadcaster");
        path.push("config.json");
        Ok(path)
    }

    /// Replaces out-of-range values with their defaults
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !(self.default_frequency_hz.is_finite() && self.default_frequency_hz > 0.0) {
            self.default_frequency_hz = defaults.default_frequency_hz;
        }
        self.default_volume_percent = self.default_volume_percent.min(100);

        let (min_rate, max_rate) = RENDER_RATE_RANGE_HZ;
        if !(min_rate..=max_rate).contains(&self.render_rate_hz) {
            self.render_rate_hz = defaults.render_rate_hz;
        }
        if self.duration_tick_ms == 0 {
            self.duration_tick_ms = defaults.duration_tick_ms;
        }
        if !(0.0..=1.0).contains(&self.trail_fade_alpha) {
            self.trail_fade_alpha = defaults.trail_fade_alpha;
        }

        let (min_fft, max_fft) = FFT_SIZE_RANGE;
        if !self.fft_size.is_power_of_two() || !(min_fft..=max_fft).contains(&self.fft_size) {
            self.fft_size = defaults.fft_size;
        }

        let side_ok = |side: f32| side > 0.0 && side <= MAX_CANVAS_SIDE;
        if !side_ok(self.canvas_width) || !side_ok(self.canvas_height) {
            self.canvas_width = defaults.canvas_width;
            self.canvas_height = defaults.canvas_height;
        }
        if !(self.trace_line_width > 0.0 && self.trace_line_width <= MAX_TRACE_LINE_WIDTH) {
            self.trace_line_width = defaults.trace_line_width;
        }

        self.presets.retain(|p| p.hz.is_finite() && p.hz > 0.0);
        self
    }

    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            fft_size: self.fft_size,
            frequency_hz: self.default_frequency_hz,
            volume: self.default_volume_percent as f32 / 100.0,
            waveform: self.default_waveform,
        }
    }

    pub fn render_period(&self) -> Duration {
        Duration::from_secs_f32(1.0 / self.render_rate_hz)
    }

    pub fn duration_period(&self) -> Duration {
        Duration::from_millis(self.duration_tick_ms)
    }

    pub fn sync_delay(&self) -> Duration {
        Duration::from_millis(self.sync_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_keeps_other_defaults() {
        let config: AppConfig = serde_json::from_str(r#"{ "default_frequency_hz": 528, "default_waveform": "square" }"#).unwrap();
        assert_eq!(config.default_frequency_hz, 528.0);
        assert_eq!(config.default_waveform, WaveformKind::Square);
        assert_eq!(config.default_volume_percent, 30);
        assert_eq!(config.presets.len(), 10);
    }

    #[test]
    fn sanitize_repairs_bad_values() {
        let config = AppConfig {
            default_frequency_hz: -1.0,
            default_volume_percent: 180,
            render_rate_hz: 0.0,
            fft_size: 1000,
            presets: vec![FrequencyPreset::new("bad", 0.0)],
            ..AppConfig::default()
        }
        .sanitized();

        assert_eq!(config.default_frequency_hz, 963.0);
        assert_eq!(config.default_volume_percent, 100);
        assert_eq!(config.render_rate_hz, 60.0);
        assert_eq!(config.fft_size, 2048);
        assert!(config.presets.is_empty());
    }

    #[test]
    fn sanitize_rejects_values_too_large_to_use() {
        let config = AppConfig {
            render_rate_hz: 1e-30,
            fft_size: 1 << 20,
            trail_fade_alpha: f32::NAN,
            canvas_width: 1e9,
            trace_line_width: f32::INFINITY,
            ..AppConfig::default()
        }
        .sanitized();

        assert_eq!(config.render_rate_hz, 60.0);
        assert_eq!(config.fft_size, 2048);
        assert_eq!(config.trail_fade_alpha, 0.1);
        assert_eq!((config.canvas_width, config.canvas_height), (800.0, 200.0));
        assert_eq!(config.trace_line_width, 2.0);

        let render = config.render_period().as_secs_f32();
        assert!((render - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn sanitize_keeps_values_at_the_bounds() {
        let config = AppConfig {
            render_rate_hz: 240.0,
            fft_size: 32768,
            canvas_width: 4096.0,
            trace_line_width: 20.0,
            ..AppConfig::default()
        }
        .sanitized();

        assert_eq!(config.render_rate_hz, 240.0);
        assert_eq!(config.fft_size, 32768);
        assert_eq!(config.canvas_width, 4096.0);
        assert_eq!(config.trace_line_width, 20.0);
    }

    #[test]
    fn loaded_config_is_sanitized() {
        let path = std::env::temp_dir().join(format!("galactic-broadcaster-huge-{}.json", std::process::id()));
        std::fs::write(&path, r#"{ "render_rate_hz": 1e-30, "fft_size": 1073741824 }"#).unwrap();
        let config = AppConfig::load_from(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(config.render_rate_hz, 60.0);
        assert_eq!(config.fft_size, 2048);
    }

    #[test]
    fn periods_follow_rates() {
        let config = AppConfig::default();
        assert_eq!(config.duration_period(), Duration::from_secs(1));
        assert_eq!(config.sync_delay(), Duration::from_secs(1));
        let render = config.render_period().as_secs_f32();
        assert!((render - 1.0 / 60.0).abs() < 1e-6);
    }

    #[test]
    fn load_from_reports_malformed_json() {
        let path = std::env::temp_dir().join(format!("galactic-broadcaster-bad-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        let err = AppConfig::load_from(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(format!("{:#}", err).contains("Failed to parse config file"));
    }

    #[test]
    fn engine_settings_use_configured_defaults() {
        let settings = AppConfig::default().engine_settings();
        assert_eq!(settings.frequency_hz, 963.0);
        assert_eq!(settings.volume, 0.3);
        assert_eq!(settings.fft_size, 2048);
    }
}
