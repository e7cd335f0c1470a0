// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Errors surfaced to the user.

use thiserror::Error;

/// Every failure the user is notified about. The message text is all
/// that is shown; nothing is retried automatically.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ControlError {
    #[error("Please select a video file first")]
    NoFileSelected,
    #[error("Please select a valid video file")]
    NotAVideo,
    #[error("Upload failed: {0}")]
    Upload(String),
    #[error("Failed to download video: {0}")]
    Download(String),
    #[error("Error loading captions: {0}")]
    LoadCaptions(String),
    #[error("Error saving caption: {0}")]
    SaveCaption(String),
    #[error("Please enter caption text")]
    MissingCaptionText,
    #[error("Invalid frame range")]
    InvalidFrameRange,
}
