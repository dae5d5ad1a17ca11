//! Debounced live-preview state for the YAML editor surface.
//!
//! Each new input replaces any pending evaluation, so at most one preview
//! is ever scheduled. The frame loop polls once per frame; when the
//! deadline passes, the buffer is run through the non-strict import path
//! and the outcome handed to the caller. A failing preview leaves the live
//! config untouched.

use std::time::{Duration, Instant};

use crate::error::ConfigError;
use crate::scene::{yaml, SceneConfig};

/// Delay between the last keystroke and preview evaluation.
pub const PREVIEW_DEBOUNCE: Duration = Duration::from_millis(600);

/// Live editor buffer with a single pending evaluation deadline.
#[derive(Debug, Default)]
pub struct LiveEditor {
    buffer: String,
    deadline: Option<Instant>,
    status: String,
}

impl LiveEditor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load editor content from the current scene without scheduling a
    /// preview (mirrors opening the editor panel).
    pub fn open(&mut self, text: String) {
        self.buffer = text;
        self.deadline = None;
        self.status = "YAML loaded from scene".to_string();
    }

    /// Accept new input and (re)schedule the preview deadline. Any
    /// previously pending evaluation is implicitly canceled.
    pub fn on_input(&mut self, text: &str, now: Instant) {
        if text != self.buffer {
            self.buffer = text.to_string();
        }
        self.deadline = Some(now + PREVIEW_DEBOUNCE);
    }

    /// Evaluate the pending preview if its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<Result<SceneConfig, ConfigError>> {
        let deadline = self.deadline?;
        if now < deadline {
            return None;
        }
        self.deadline = None;

        let result = yaml::import(&self.buffer);
        self.status = match &result {
            Ok(_) => "live preview applied".to_string(),
            Err(e) => format!("YAML error: {}", e),
        };
        Some(result)
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    pub fn has_pending(&self) -> bool {
        self.deadline.is_some()
    }
}
