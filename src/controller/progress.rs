// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Upload progress indicator.

use std::time::{Duration, Instant};

/// Progress bar state shown while a video is uploaded and processed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Progress {
    pub visible: bool,
    /// 0 to 100
    pub percent: u8,
    pub message: String,
    hide_at: Option<Instant>,
}

impl Progress {
    /// Show the indicator at the given stage.
    pub fn show(&mut self, percent: u8, message: impl Into<String>) {
        self.visible = true;
        self.percent = percent.min(100);
        self.message = message.into();
        self.hide_at = None;
    }

    /// Show the final stage and hide automatically after `delay`.
    pub fn finish(&mut self, message: impl Into<String>, now: Instant, delay: Duration) {
        self.show(100, message);
        self.hide_at = Some(now + delay);
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.hide_at = None;
    }

    /// Hide if the auto-hide deadline has passed.
    pub fn update(&mut self, now: Instant) {
        if self.hide_at.is_some_and(|at| at <= now) {
            self.hide();
        }
    }

    pub fn fraction(&self) -> f32 {
        f32::from(self.percent) / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stages_and_auto_hide() {
        let t0 = Instant::now();
        let mut progress = Progress::default();
        assert!(!progress.visible);

        progress.show(0, "Starting upload...");
        assert!(progress.visible);
        progress.show(50, "Processing video...");
        assert_eq!(progress.fraction(), 0.5);

        progress.finish("Upload complete!", t0, Duration::from_secs(2));
        assert_eq!(progress.percent, 100);
        progress.update(t0 + Duration::from_secs(1));
        assert!(progress.visible);
        progress.update(t0 + Duration::from_secs(2));
        assert!(!progress.visible);
    }

    #[test]
    fn test_new_stage_cancels_pending_hide() {
        let t0 = Instant::now();
        let mut progress = Progress::default();
        progress.finish("Upload complete!", t0, Duration::from_secs(2));
        progress.show(0, "Starting upload...");
        progress.update(t0 + Duration::from_secs(5));
        assert!(progress.visible);
    }
}
