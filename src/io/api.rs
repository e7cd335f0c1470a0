// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Caption service client.
//!
//! This module defines the [`Backend`] seam the controller talks to and
//! the blocking HTTP implementation used by the desktop app. Every call
//! is made from a worker thread, never from the UI thread.

use crate::io::media::UploadFile;
use crate::models::{
    caption::{Caption, CaptionUpdate},
    frame::UploadResponse,
};
use anyhow::{anyhow, Context, Result};
use reqwest::blocking::{multipart, Client};
use serde::Deserialize;

/// Operations offered by the caption service.
pub trait Backend: Send + Sync + 'static {
    /// Upload a video and receive its extracted frames.
    fn upload(&self, file: UploadFile) -> Result<UploadResponse>;

    /// Fetch the processed video for `video_id`.
    fn download(&self, video_id: &str) -> Result<Vec<u8>>;

    /// Fetch all captions stored for `video_id`.
    fn captions(&self, video_id: &str) -> Result<Vec<Caption>>;

    /// Create or replace the caption for the given frame range.
    fn save_caption(&self, caption: &CaptionUpdate) -> Result<()>;

    /// Fetch the image bytes of one extracted frame.
    fn fetch_frame(&self, path: &str) -> Result<Vec<u8>>;
}

/// Error body returned by the service on a failed upload.
#[derive(Debug, Deserialize)]
struct ErrorDetail {
    detail: Option<String>,
}

/// [`Backend`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    http: Client,
}

impl HttpBackend {
    /// Create a client for the service at `base_url` (e.g. `http://127.0.0.1:8000`).
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, Client::new())
    }

    pub fn with_client(base_url: impl Into<String>, http: Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, http }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl Backend for HttpBackend {
    fn upload(&self, file: UploadFile) -> Result<UploadResponse> {
        let part = multipart::Part::bytes(file.bytes)
            .file_name(file.name)
            .mime_str(&file.mime_type)
            .context("invalid media type")?;
        let form = multipart::Form::new().part("file", part);

        let response = self.http.post(self.url("/upload")).multipart(form).send()?;

        if !response.status().is_success() {
            let status = response.status();
            let detail = response
                .json::<ErrorDetail>()
                .ok()
                .and_then(|body| body.detail)
                .unwrap_or_else(|| "Upload failed".to_string());
            log::debug!("Upload rejected with {status}: {detail}");
            return Err(anyhow!(detail));
        }

        response.json().context("malformed upload response")
    }

    fn download(&self, video_id: &str) -> Result<Vec<u8>> {
        let response = self
            .http
            .get(self.url(&format!("/download/{video_id}")))
            .send()?;
        if !response.status().is_success() {
            return Err(anyhow!("Download failed"));
        }
        Ok(response.bytes()?.to_vec())
    }

    fn captions(&self, video_id: &str) -> Result<Vec<Caption>> {
        let response = self
            .http
            .get(self.url(&format!("/captions/{video_id}")))
            .send()?;
        if !response.status().is_success() {
            return Err(anyhow!("Failed to load captions"));
        }
        response.json().context("malformed caption list")
    }

    fn save_caption(&self, caption: &CaptionUpdate) -> Result<()> {
        let response = self
            .http
            .post(self.url("/save-caption"))
            .json(caption)
            .send()?;
        if !response.status().is_success() {
            return Err(anyhow!("Failed to save caption"));
        }
        Ok(())
    }

    fn fetch_frame(&self, path: &str) -> Result<Vec<u8>> {
        let bytes = self
            .http
            .get(self.url(path))
            .send()?
            .error_for_status()?
            .bytes()?;
        Ok(bytes.to_vec())
    }
}
