// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! FRAMECAP - frame-range caption editor.
//!
//! A desktop client for a video captioning service: upload a video, step
//! through the frames the service extracted, bind captions to inclusive
//! frame ranges and download the video with the captions burned in.
//!
//! [`controller::Controller`] holds all session logic and is independent
//! of the GUI; [`app::FramecapApp`] binds it to egui.

pub mod app;
pub mod config;
pub mod controller;
pub mod io;
pub mod models;
pub mod ui;
pub mod util;
