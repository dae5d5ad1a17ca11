//! Frequency bands and audio-reactive parameter modulation.
//!
//! The band aggregator reduces a byte spectrum into three coarse band
//! energies; the modulation model maps (baseline, band energies) to an
//! animated parameter value. Both are pure functions consulted once per
//! animated parameter per frame.

use serde::{Deserialize, Serialize};

/// One of the three coarse partitions of the frequency spectrum.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Band {
    Low,
    Mid,
    High,
}

impl Band {
    pub const ALL: [Band; 3] = [Band::Low, Band::Mid, Band::High];
}

/// Audio frequency band energies, each normalized to [0, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AudioBands {
    pub low: f32,
    pub mid: f32,
    pub high: f32,
}

impl AudioBands {
    pub fn get(&self, band: Band) -> f32 {
        match band {
            Band::Low => self.low,
            Band::Mid => self.mid,
            Band::High => self.high,
        }
    }
}

/// Per-parameter modulation descriptor.
///
/// `min`/`max` may be in either numeric order; an inverted pair simply
/// extrapolates downward. With several bands active the animated value can
/// exceed `max` when more than one band is near 1 (intentional headroom).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModulationSpec {
    pub min: f32,
    pub max: f32,
    #[serde(default)]
    pub bands: Vec<Band>,
}

/// Reduce a byte spectrum (values 0..=255, lowest frequencies first) into
/// three band energies by averaging contiguous thirds of the array.
///
/// Partition boundaries come from real-valued division, so lengths not
/// divisible by 3 produce near-equal thirds. An empty partition contributes
/// 0 rather than a NaN mean.
pub fn get_audio_bands(samples: &[u8]) -> AudioBands {
    let n = samples.len();
    let first = (n as f32 / 3.0) as usize;
    let second = (2.0 * n as f32 / 3.0) as usize;

    AudioBands {
        low: band_average(&samples[..first]),
        mid: band_average(&samples[first..second]),
        high: band_average(&samples[second..]),
    }
}

fn band_average(slice: &[u8]) -> f32 {
    if slice.is_empty() {
        return 0.0;
    }
    slice.iter().map(|&s| s as f32).sum::<f32>() / slice.len() as f32 / 255.0
}

/// Compute the animated value for one geometry parameter.
///
/// With no modulation spec the baseline passes through unchanged. Otherwise
/// the active band energies are summed (not normalized by band count) and
/// the result is `min + sum * (max - min)`.
pub fn animated_value(spec: Option<&ModulationSpec>, baseline: f32, bands: &AudioBands) -> f32 {
    let Some(spec) = spec else {
        return baseline;
    };

    let active_sum: f32 = spec.bands.iter().map(|&b| bands.get(b)).sum();
    spec.min + active_sum * (spec.max - spec.min)
}
