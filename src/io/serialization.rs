// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Caption export.
//!
//! This module writes the captions of the loaded video to YAML or JSON
//! files.

use crate::models::{caption::Caption, session::SessionState};
use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Snapshot of a session's captions for export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptionExport {
    pub video_id: String,
    pub fps: f64,
    pub frame_count: usize,
    pub captions: Vec<Caption>,
}

impl CaptionExport {
    /// Build an export from the session, if a video is loaded.
    pub fn from_session(session: &SessionState) -> Option<Self> {
        let video_id = session.video_id.clone()?;
        Some(Self {
            video_id,
            fps: session.fps,
            frame_count: session.frame_count(),
            captions: session.captions.clone(),
        })
    }
}

/// Export to YAML format.
pub fn export_yaml(data: &CaptionExport, path: &Path) -> Result<()> {
    let yaml = serde_yaml::to_string(data)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

/// Export to JSON format.
pub fn export_json(data: &CaptionExport, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(data)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Export in the format implied by the file extension.
pub fn export(data: &CaptionExport, path: &Path) -> Result<()> {
    match path.extension().and_then(|s| s.to_str()) {
        Some("yaml") | Some("yml") => export_yaml(data, path),
        Some("json") => export_json(data, path),
        other => Err(anyhow!("Unsupported file extension: {:?}", other)),
    }
}
