//! Command-line argument parsing.

use clap::Parser;
use std::path::PathBuf;

use crate::audio::AudioSource;
use crate::params::AnalyzerConfig;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "Knotwave")]
#[command(about = "Audio-reactive torus-knot scene editor", long_about = None)]
pub struct Args {
    /// Scene document (YAML) to load at startup
    #[arg(long, value_name = "PATH")]
    pub scene: Option<PathBuf>,

    /// WAV file to loop as the audio source (defaults to microphone)
    #[arg(long, value_name = "PATH")]
    pub audio: Option<PathBuf>,

    /// YAML file to watch for debounced live-preview edits
    #[arg(long, value_name = "PATH")]
    pub edit: Option<PathBuf>,

    /// FFT window size (power of two)
    #[arg(long, value_name = "SIZE", default_value = "256")]
    pub fft_size: usize,
}

impl Args {
    /// Pick the audio source for this session (exactly one path is taken).
    pub fn audio_source(&self) -> AudioSource {
        match &self.audio {
            Some(path) => {
                println!("Audio source: file ({})", path.display());
                AudioSource::File(path.clone())
            }
            None => {
                println!("Audio source: microphone");
                AudioSource::Microphone
            }
        }
    }

    /// Analyzer configuration with CLI overrides applied.
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            fft_size: self.fft_size,
            ..AnalyzerConfig::default()
        }
    }
}
