// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! FRAMECAP - frame-range caption editor for a video captioning service.

use anyhow::Result;
use framecap::app::FramecapApp;
use framecap::config::Config;
use framecap::controller::Controller;
use framecap::io::api::HttpBackend;
use std::sync::Arc;

fn main() -> Result<()> {
    // Initialize logging
    env_logger::init();

    let config = Config::load();
    log::info!("Using caption service at {}", config.server_url);

    let backend = Arc::new(HttpBackend::new(config.server_url.clone()));
    let controller = Controller::new(backend, &config);

    // Configure egui options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_min_inner_size([900.0, 600.0])
            .with_title("FRAMECAP - Video Caption Editor"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "FRAMECAP",
        options,
        Box::new(|_cc| Ok(Box::new(FramecapApp::new(controller)))),
    )
    .map_err(|e| anyhow::anyhow!("Application error: {}", e))?;

    Ok(())
}
