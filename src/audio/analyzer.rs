//! Spectrum analysis thread: windowed FFT over the shared sample buffer,
//! producing byte frequency magnitudes with analyser-style smoothing and
//! decibel scaling (0 maps to `min_db`, 255 to `max_db`).

use rustfft::{num_complex::Complex, FftPlanner};
use std::f32::consts::PI;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::Duration;

use crate::params::AnalyzerConfig;

/// Spawn the analysis thread. `samples` is fed by the audio callback;
/// `spectrum` holds the latest byte magnitudes (length = bin count).
pub fn spawn_analyzer_thread(
    config: AnalyzerConfig,
    samples: Arc<Mutex<Vec<f32>>>,
    spectrum: Arc<Mutex<Vec<u8>>>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_forward(config.fft_size);
        let mut fft_buffer = vec![Complex::new(0.0f32, 0.0); config.fft_size];
        let mut smoothed = vec![0.0f32; config.bin_count()];

        loop {
            thread::sleep(Duration::from_millis(config.update_interval_ms));
            analysis_pass(&config, fft.as_ref(), &samples, &spectrum, &mut fft_buffer, &mut smoothed);
        }
    })
}

/// One analysis pass: window the newest `fft_size` samples, run the FFT,
/// and publish smoothed byte magnitudes.
///
/// The audio callback produces samples faster than one window per
/// interval, so any backlog older than the newest window is discarded
/// each pass; otherwise the spectrum drifts behind the live signal. Half
/// a window is retained for 50% overlap with the next pass.
fn analysis_pass(
    config: &AnalyzerConfig,
    fft: &dyn rustfft::Fft<f32>,
    samples: &Mutex<Vec<f32>>,
    spectrum: &Mutex<Vec<u8>>,
    fft_buffer: &mut [Complex<f32>],
    smoothed: &mut [f32],
) {
    let mut buf = samples.lock().unwrap();
    if buf.len() < config.fft_size {
        return;
    }

    // Apply Hann window over the newest samples
    let start = buf.len() - config.fft_size;
    for i in 0..config.fft_size {
        let window = hann_window(i, config.fft_size);
        fft_buffer[i] = Complex::new(buf[start + i] * window, 0.0);
    }

    // Drop the backlog, keep half a window for overlap
    let keep = config.fft_size / 2;
    let drain_end = buf.len() - keep;
    buf.drain(0..drain_end);
    drop(buf);

    fft.process(fft_buffer);

    let mut out = spectrum.lock().unwrap();
    out.resize(config.bin_count(), 0);
    for (i, byte) in out.iter_mut().enumerate() {
        let magnitude = fft_buffer[i].norm() / config.fft_size as f32;
        smoothed[i] = config.smoothing * smoothed[i] + (1.0 - config.smoothing) * magnitude;
        *byte = magnitude_to_byte(smoothed[i], config);
    }
}

/// Map a smoothed linear magnitude to a byte over the configured dB range.
pub fn magnitude_to_byte(magnitude: f32, config: &AnalyzerConfig) -> u8 {
    let db = 20.0 * magnitude.max(1e-10).log10();
    let scaled = (db - config.min_db) / (config.max_db - config.min_db) * 255.0;
    scaled.clamp(0.0, 255.0) as u8
}

/// Hann window function for FFT analysis
fn hann_window(index: usize, size: usize) -> f32 {
    0.5 * (1.0 - ((2.0 * PI * index as f32) / (size as f32 - 1.0)).cos())
}
