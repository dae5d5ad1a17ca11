//! Application parameters with documented defaults.
//!
//! Scene content lives in [`crate::scene::SceneConfig`]; everything here
//! is fixed application configuration: spectrum analysis, window/camera,
//! and the built-in rotation animation tuning.

/// Spectrum analyzer configuration (Web-Audio-analyser-like semantics).
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Audio sample rate (Hz)
    pub sample_rate_hz: usize,

    /// FFT window size (must be power of 2); bin count = fft_size / 2
    pub fft_size: usize,

    /// Spectrum update interval (milliseconds)
    pub update_interval_ms: u64,

    /// Exponential smoothing factor applied to magnitudes (0 = none)
    pub smoothing: f32,

    /// Decibel value mapped to byte 0
    pub min_db: f32,

    /// Decibel value mapped to byte 255
    pub max_db: f32,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            sample_rate_hz: 44100,
            fft_size: 256,
            update_interval_ms: 16,
            smoothing: 0.8,
            min_db: -100.0,
            max_db: -30.0,
        }
    }
}

impl AnalyzerConfig {
    /// Number of frequency magnitude samples produced per update.
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }

    /// Validate configuration (FFT size must be power of 2, etc.)
    pub fn validate(&self) -> Result<(), String> {
        if !self.fft_size.is_power_of_two() {
            return Err(format!(
                "FFT size must be power of 2, got {}",
                self.fft_size
            ));
        }
        if self.sample_rate_hz == 0 {
            return Err("Sample rate must be > 0".to_string());
        }
        if self.min_db >= self.max_db {
            return Err(format!(
                "Decibel range must be increasing, got {}..{}",
                self.min_db, self.max_db
            ));
        }
        Ok(())
    }
}

/// Rendering configuration
#[derive(Debug, Clone)]
pub struct RenderConfig {
    /// Window width (pixels)
    pub window_width: u32,

    /// Window height (pixels)
    pub window_height: u32,

    /// Field of view (degrees)
    pub fov_degrees: f32,

    /// Near clipping plane
    pub near_plane: f32,

    /// Far clipping plane
    pub far_plane: f32,

    /// Camera distance from the origin along +Z
    pub camera_z: f32,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            window_width: 1280,
            window_height: 720,
            fov_degrees: 75.0,
            near_plane: 0.1,
            far_plane: 1000.0,
            camera_z: 50.0,
        }
    }
}

impl RenderConfig {
    pub fn aspect_ratio(&self) -> f32 {
        self.window_width as f32 / self.window_height as f32
    }
}

/// Built-in rotation animation tuning: per-frame deltas accumulated onto
/// the mesh rotation, with band energy scaling the rate.
#[derive(Debug, Clone)]
pub struct RotationTuning {
    /// Base Y rotation per frame (radians)
    pub y_base: f32,

    /// Extra Y rotation per frame per unit of mid-band energy
    pub y_mid_scale: f32,

    /// Base X rotation per frame (radians)
    pub x_base: f32,

    /// Extra X rotation per frame per unit of low-band energy
    pub x_low_scale: f32,
}

impl Default for RotationTuning {
    fn default() -> Self {
        Self {
            y_base: 0.01,
            y_mid_scale: 0.05,
            x_base: 0.005,
            x_low_scale: 0.05,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyzer_config_defaults_are_valid() {
        let config = AnalyzerConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.bin_count(), 128);
    }

    #[test]
    fn test_analyzer_config_rejects_non_power_of_two() {
        let config = AnalyzerConfig {
            fft_size: 300,
            ..AnalyzerConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_analyzer_config_rejects_inverted_db_range() {
        let config = AnalyzerConfig {
            min_db: -30.0,
            max_db: -100.0,
            ..AnalyzerConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
