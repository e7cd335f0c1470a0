// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Extracted video frames and the upload response that carries them.

use serde::{Deserialize, Serialize};

/// Frame rate assumed when the backend does not report a usable one.
pub const DEFAULT_FPS: f64 = 30.0;

/// One extracted still image, addressed by its position in the frame list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    /// Server-relative (or absolute) URL of the frame image.
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_number: Option<usize>,
}

impl Frame {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            frame_number: None,
        }
    }
}

/// Body of a successful `POST /upload`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UploadResponse {
    /// Video identifier used by every later request.
    pub filename: String,
    pub frames: Vec<Frame>,
    #[serde(default)]
    pub fps: Option<f64>,
}

impl UploadResponse {
    /// Reported frame rate, falling back to [`DEFAULT_FPS`].
    pub fn effective_fps(&self) -> f64 {
        match self.fps {
            Some(fps) if fps.is_finite() && fps > 0.0 => fps,
            _ => DEFAULT_FPS,
        }
    }
}
