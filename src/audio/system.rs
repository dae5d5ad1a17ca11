//! Audio system: source capture/playback plus spectrum analysis.
//!
//! Exactly one source is active per session: a WAV file looped through the
//! output device, or the default microphone. Either way the raw samples
//! land in a shared buffer consumed by the analyzer thread.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::thread;

use super::analyzer::spawn_analyzer_thread;
use crate::params::AnalyzerConfig;

/// Where the live audio signal comes from.
#[derive(Debug, Clone)]
pub enum AudioSource {
    /// Capture from the default input device.
    Microphone,
    /// Decode a WAV file and play it on loop.
    File(PathBuf),
}

/// Audio system managing capture/playback and spectrum analysis.
pub struct AudioSystem {
    /// Latest byte spectrum (thread-safe)
    spectrum: Arc<Mutex<Vec<u8>>>,

    /// Audio stream (kept alive)
    _stream: cpal::Stream,

    /// Analysis thread handle (kept for cleanup)
    _analyzer_thread: Option<thread::JoinHandle<()>>,
}

impl AudioSystem {
    /// Create and start the audio system for the chosen source.
    pub fn new(config: AnalyzerConfig, source: AudioSource) -> Result<Self, String> {
        config
            .validate()
            .map_err(|e| format!("Invalid analyzer config: {}", e))?;

        let samples = Arc::new(Mutex::new(Vec::<f32>::new()));
        let spectrum = Arc::new(Mutex::new(vec![0u8; config.bin_count()]));

        let stream = match &source {
            AudioSource::Microphone => build_capture_stream(Arc::clone(&samples))?,
            AudioSource::File(path) => build_playback_stream(path, Arc::clone(&samples))?,
        };

        stream
            .play()
            .map_err(|e| format!("Failed to start audio stream: {}", e))?;

        let analyzer_thread =
            spawn_analyzer_thread(config, samples, Arc::clone(&spectrum));

        Ok(Self {
            spectrum,
            _stream: stream,
            _analyzer_thread: Some(analyzer_thread),
        })
    }

    /// Snapshot of the latest byte spectrum (thread-safe).
    pub fn spectrum(&self) -> Vec<u8> {
        self.spectrum.lock().unwrap().clone()
    }
}

/// Build a microphone capture stream feeding the analysis buffer.
fn build_capture_stream(samples: Arc<Mutex<Vec<f32>>>) -> Result<cpal::Stream, String> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or("No audio input device found")?;

    let config = device
        .default_input_config()
        .map_err(|e| format!("Failed to get input config: {}", e))?;

    println!(
        "Audio in: {} @ {}Hz",
        device.name().unwrap_or_else(|_| "Unknown".to_string()),
        config.sample_rate().0
    );

    let channels = config.channels() as usize;

    device
        .build_input_stream(
            &config.into(),
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                let mut buf = samples.lock().unwrap();
                // Downmix interleaved frames to mono for analysis.
                for frame in data.chunks(channels) {
                    let sum: f32 = frame.iter().sum();
                    buf.push(sum / channels as f32);
                }
            },
            |err| eprintln!("Audio stream error: {}", err),
            None,
        )
        .map_err(|e| format!("Failed to build input stream: {}", e))
}

/// Build a looped-playback stream for a WAV file, tapping mono samples
/// into the analysis buffer while the file plays.
fn build_playback_stream(
    path: &Path,
    samples: Arc<Mutex<Vec<f32>>>,
) -> Result<cpal::Stream, String> {
    let track = decode_wav(path)?;
    if track.is_empty() {
        return Err(format!("{}: WAV file contains no samples", path.display()));
    }

    let host = cpal::default_host();
    let device = host
        .default_output_device()
        .ok_or("No audio output device found")?;

    let config = device
        .default_output_config()
        .map_err(|e| format!("Failed to get output config: {}", e))?;

    println!(
        "Audio out: {} @ {}Hz (looping {})",
        device.name().unwrap_or_else(|_| "Unknown".to_string()),
        config.sample_rate().0,
        path.display()
    );

    let channels = config.channels() as usize;
    let mut position = 0usize;

    device
        .build_output_stream(
            &config.into(),
            move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                let mut buf = samples.lock().unwrap();
                for frame in data.chunks_mut(channels) {
                    let sample = track[position];
                    position = (position + 1) % track.len(); // loop forever

                    for out in frame.iter_mut() {
                        *out = sample;
                    }
                    buf.push(sample); // tap for analysis
                }
            },
            |err| eprintln!("Audio stream error: {}", err),
            None,
        )
        .map_err(|e| format!("Failed to build output stream: {}", e))
}

/// Decode a WAV file to normalized mono f32 samples.
fn decode_wav(path: &Path) -> Result<Vec<f32>, String> {
    let mut reader = hound::WavReader::open(path)
        .map_err(|e| format!("{}: {}", path.display(), e))?;
    let spec = reader.spec();
    let channels = spec.channels.max(1) as usize;

    let interleaved: Vec<f32> = match spec.sample_format {
        hound::SampleFormat::Float => reader
            .samples::<f32>()
            .collect::<Result<_, _>>()
            .map_err(|e| format!("{}: {}", path.display(), e))?,
        hound::SampleFormat::Int => {
            let scale = (1i64 << (spec.bits_per_sample - 1)) as f32;
            reader
                .samples::<i32>()
                .map(|s| s.map(|v| v as f32 / scale))
                .collect::<Result<_, _>>()
                .map_err(|e| format!("{}: {}", path.display(), e))?
        }
    };

    Ok(interleaved
        .chunks(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect())
}
