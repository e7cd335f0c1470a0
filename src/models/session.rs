// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Session state management.
//!
//! This module holds the client-side state for one loaded video: its
//! frames, the cached caption list, the current position and the
//! playback flag.

use super::caption::{self, Caption};
use super::frame::{Frame, UploadResponse, DEFAULT_FPS};
use std::time::Duration;

/// Client-side state for the currently loaded video.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionState {
    pub video_id: Option<String>,
    pub frames: Vec<Frame>,
    /// Cached captions, always kept in display order.
    pub captions: Vec<Caption>,
    pub current_index: usize,
    pub is_playing: bool,
    pub fps: f64,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            video_id: None,
            frames: Vec::new(),
            captions: Vec::new(),
            current_index: 0,
            is_playing: false,
            fps: DEFAULT_FPS,
        }
    }
}

impl SessionState {
    /// Replace the session with a freshly uploaded video.
    pub fn load_video(&mut self, response: UploadResponse) {
        let fps = response.effective_fps();
        *self = Self {
            video_id: Some(response.filename),
            frames: response.frames,
            captions: Vec::new(),
            current_index: 0,
            is_playing: false,
            fps,
        };
    }

    /// Replace the caption cache, sorting it for display.
    pub fn set_captions(&mut self, mut captions: Vec<Caption>) {
        caption::sort_for_display(&mut captions);
        self.captions = captions;
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn has_video(&self) -> bool {
        self.video_id.is_some()
    }

    /// Index of the last frame, if any frames are loaded.
    pub fn last_index(&self) -> Option<usize> {
        self.frames.len().checked_sub(1)
    }

    /// Clamp a requested (possibly negative) index into the frame range.
    pub fn clamp_index(&self, requested: i64) -> Option<usize> {
        let last = self.last_index()?;
        Some(requested.clamp(0, last as i64) as usize)
    }

    pub fn current_frame(&self) -> Option<&Frame> {
        self.frames.get(self.current_index)
    }

    /// Whether the caption at display position `position` covers the
    /// current frame.
    pub fn is_caption_active(&self, position: usize) -> bool {
        self.captions
            .get(position)
            .is_some_and(|c| c.covers(self.current_index))
    }

    /// Captions covering the current frame, in display order.
    pub fn active_captions(&self) -> impl Iterator<Item = &Caption> {
        let index = self.current_index;
        self.captions.iter().filter(move |c| c.covers(index))
    }

    /// Delay between two playback ticks. Rates too small to express as a
    /// `Duration` fall back to [`DEFAULT_FPS`].
    pub fn playback_interval(&self) -> Duration {
        let fps = if self.fps.is_finite() && self.fps > 0.0 {
            self.fps
        } else {
            DEFAULT_FPS
        };
        Duration::try_from_secs_f64(1.0 / fps)
            .unwrap_or_else(|_| Duration::from_secs_f64(1.0 / DEFAULT_FPS))
    }
}
