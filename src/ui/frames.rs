// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame image cache.
//!
//! Frame images are fetched from the caption service and decoded on
//! background threads, then turned into egui textures on the UI thread.
//! Thumbnails are downscaled before upload and kept only while their row is
//! on screen. Full-size frames are kept for the last few frames viewed.

use crate::io::{api::Backend, media};
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;

/// Concurrent fetches allowed at once; extra requests are retried on a later frame.
const MAX_PENDING: usize = 16;

/// Full-size frames kept for the viewer.
const FULL_CAPACITY: usize = 8;

/// Bounding box of a thumbnail texture, in pixels.
const THUMBNAIL_MAX: (u32, u32) = (240, 160);

/// Which rendition of a frame to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ImageSize {
    Full,
    Thumbnail,
}

type Key = (ImageSize, String);

/// Result of a background frame load.
struct LoadedFrame {
    generation: u64,
    key: Key,
    image: Result<media::LoadedImage, String>,
}

/// Textures for the frames of the loaded video, keyed by frame path.
pub struct FrameImages {
    full: HashMap<String, egui::TextureHandle>,
    /// Full-size paths, oldest first
    full_order: VecDeque<String>,
    thumbnails: HashMap<String, egui::TextureHandle>,
    pending: HashSet<Key>,
    failed: HashSet<Key>,
    /// Bumped by `clear` so loads started for a previous video are dropped
    generation: u64,
    sender: Sender<LoadedFrame>,
    receiver: Receiver<LoadedFrame>,
}

impl Default for FrameImages {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameImages {
    pub fn new() -> Self {
        let (sender, receiver) = channel();
        Self {
            full: HashMap::new(),
            full_order: VecDeque::new(),
            thumbnails: HashMap::new(),
            pending: HashSet::new(),
            failed: HashSet::new(),
            generation: 0,
            sender,
            receiver,
        }
    }

    /// Drop every cached texture and forget running loads (a new video was loaded).
    pub fn clear(&mut self) {
        self.full.clear();
        self.full_order.clear();
        self.thumbnails.clear();
        self.pending.clear();
        self.failed.clear();
        self.generation += 1;
    }

    pub fn get(&self, size: ImageSize, path: &str) -> Option<&egui::TextureHandle> {
        match size {
            ImageSize::Full => self.full.get(path),
            ImageSize::Thumbnail => self.thumbnails.get(path),
        }
    }

    pub fn is_loading(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Start loading `path` unless it is cached, loading or known bad.
    pub fn request<B: Backend>(&mut self, backend: &Arc<B>, size: ImageSize, path: &str) {
        let key = (size, path.to_string());
        if self.get(size, path).is_some()
            || self.pending.contains(&key)
            || self.failed.contains(&key)
            || self.pending.len() >= MAX_PENDING
        {
            return;
        }

        self.pending.insert(key.clone());
        let backend = Arc::clone(backend);
        let sender = self.sender.clone();
        let generation = self.generation;

        // Spawn background thread for loading
        std::thread::spawn(move || {
            let image = backend
                .fetch_frame(&key.1)
                .and_then(|bytes| match key.0 {
                    ImageSize::Full => media::decode_image(&bytes),
                    ImageSize::Thumbnail => media::decode_thumbnail(&bytes, THUMBNAIL_MAX),
                })
                .map_err(|e| format!("{e:#}"));
            let _ = sender.send(LoadedFrame {
                generation,
                key,
                image,
            });
        });
    }

    /// Keep only the thumbnails whose path `keep` accepts.
    pub fn retain_thumbnails(&mut self, mut keep: impl FnMut(&str) -> bool) {
        self.thumbnails.retain(|path, _| keep(path));
    }

    /// Turn finished loads into textures.
    pub fn poll(&mut self, ctx: &egui::Context) {
        while let Ok(loaded) = self.receiver.try_recv() {
            self.accept(ctx, loaded);
        }
    }

    fn accept(&mut self, ctx: &egui::Context, loaded: LoadedFrame) {
        if loaded.generation != self.generation {
            log::debug!("Dropping frame {} of a previous video", loaded.key.1);
            return;
        }
        self.pending.remove(&loaded.key);

        let (size, path) = loaded.key;
        match loaded.image {
            Ok(image) => {
                let dims = [image.width as usize, image.height as usize];
                let color_image = egui::ColorImage::from_rgba_unmultiplied(dims, &image.pixels);
                let texture = ctx.load_texture(&path, color_image, egui::TextureOptions::LINEAR);
                self.insert(size, path, texture);
            }
            Err(e) => {
                log::error!("Failed to load frame {}: {}", path, e);
                self.failed.insert((size, path));
            }
        }
    }

    fn insert(&mut self, size: ImageSize, path: String, texture: egui::TextureHandle) {
        match size {
            ImageSize::Thumbnail => {
                self.thumbnails.insert(path, texture);
            }
            ImageSize::Full => {
                if self.full.insert(path.clone(), texture).is_none() {
                    self.full_order.push_back(path);
                }
                while self.full_order.len() > FULL_CAPACITY {
                    if let Some(oldest) = self.full_order.pop_front() {
                        self.full.remove(&oldest);
                    }
                }
            }
        }
    }
}
