// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! UI components for the FRAMECAP application.

pub mod captions;
pub mod frames;
pub mod thumbnails;
pub mod timeline;
pub mod toolbar;
pub mod viewer;
