// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Media file handling.
//!
//! This module checks and reads video files picked for upload, and
//! decodes frame images fetched from the service into RGBA pixels
//! suitable for display in egui.

use anyhow::{Context, Result};
use std::path::Path;

/// A video file ready to be sent to the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

/// Decoded image data.
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>, // RGBA8
}

/// Guess the media type of a file from its name.
pub fn media_type(path: &Path) -> Option<mime_guess::Mime> {
    mime_guess::from_path(path).first()
}

/// Check whether the file looks like a video.
pub fn is_video(path: &Path) -> bool {
    media_type(path).is_some_and(|mime| mime.type_() == mime_guess::mime::VIDEO)
}

/// Read a video file for upload.
pub fn read_upload(path: &Path) -> Result<UploadFile> {
    let bytes = std::fs::read(path).with_context(|| format!("cannot read {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "video".to_string());
    let mime_type = media_type(path)
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| "application/octet-stream".to_string());

    Ok(UploadFile {
        name,
        mime_type,
        bytes,
    })
}

/// Decode an encoded image (JPEG, PNG, ...) into RGBA pixels.
pub fn decode_image(bytes: &[u8]) -> Result<LoadedImage> {
    let img = image::load_from_memory(bytes).context("unsupported frame image")?;
    Ok(into_loaded(img))
}

/// Decode an encoded image and shrink it to fit within `max` (width, height),
/// keeping its aspect ratio. Images already small enough are left as is.
pub fn decode_thumbnail(bytes: &[u8], max: (u32, u32)) -> Result<LoadedImage> {
    let img = image::load_from_memory(bytes).context("unsupported frame image")?;
    let img = if img.width() > max.0 || img.height() > max.1 {
        img.thumbnail(max.0, max.1)
    } else {
        img
    };
    Ok(into_loaded(img))
}

fn into_loaded(img: image::DynamicImage) -> LoadedImage {
    let rgba = img.to_rgba8();
    LoadedImage {
        width: rgba.width(),
        height: rgba.height(),
        pixels: rgba.into_raw(),
    }
}
