// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Caption data structures.
//!
//! A caption is a piece of text bound to an inclusive range of frame
//! indices. The backend owns the authoritative list; the client only
//! keeps a cached copy sorted for display.

use serde::{Deserialize, Serialize};

/// A caption covering frames `start_frame..=end_frame`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Caption {
    pub start_frame: usize,
    pub end_frame: usize,
    pub text: String,
}

impl Caption {
    /// Create a new caption for the given inclusive frame range.
    pub fn new(start_frame: usize, end_frame: usize, text: impl Into<String>) -> Self {
        Self {
            start_frame,
            end_frame,
            text: text.into(),
        }
    }

    /// Check if the caption is shown on the frame at `index`.
    pub fn covers(&self, index: usize) -> bool {
        self.start_frame <= index && index <= self.end_frame
    }

    /// Human-readable 1-based frame range, e.g. "Frames 3 - 5".
    pub fn range_label(&self) -> String {
        format!("Frames {} - {}", self.start_frame + 1, self.end_frame + 1)
    }
}

/// Request body for `POST /save-caption`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CaptionUpdate {
    pub video_id: String,
    pub start_frame: usize,
    pub end_frame: usize,
    pub text: String,
}

/// Sort captions for display: ascending by start frame, ties keep
/// the order the backend returned them in.
pub fn sort_for_display(captions: &mut [Caption]) {
    // slice::sort_by_key is stable
    captions.sort_by_key(|c| c.start_frame);
}
