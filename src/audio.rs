//! Audio capture and spectrum analysis.
//!
//! A cpal stream (microphone capture, or looped WAV playback) feeds a
//! shared sample buffer; an analysis thread turns it into a byte spectrum
//! for the band aggregator.

pub mod analyzer;
pub mod system;

pub use system::{AudioSource, AudioSystem};
