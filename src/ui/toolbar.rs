// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Toolbar with the file picker, upload/download buttons and upload progress.

use crate::controller::progress::Progress;
use std::path::Path;

/// Action requested from the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolbarAction {
    None,
    ChooseFile,
    Upload,
    Download,
}

/// Display the toolbar.
pub fn show(
    ui: &mut egui::Ui,
    selected_file: Option<&Path>,
    progress: &Progress,
    can_download: bool,
    last_download: Option<&Path>,
) -> ToolbarAction {
    let mut action = ToolbarAction::None;

    ui.horizontal(|ui| {
        ui.spacing_mut().item_spacing.x = 8.0;

        if ui.button("📂 Choose Video...").clicked() {
            action = ToolbarAction::ChooseFile;
        }

        let file_label = selected_file
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "No file chosen".to_string());
        ui.label(egui::RichText::new(file_label).italics());

        if ui.button("⬆ Upload").clicked() {
            action = ToolbarAction::Upload;
        }

        ui.separator();

        if ui
            .add_enabled(can_download, egui::Button::new("⬇ Download"))
            .on_hover_text("Download the video with captions burned in")
            .clicked()
        {
            action = ToolbarAction::Download;
        }

        if progress.visible {
            ui.separator();
            ui.add(
                egui::ProgressBar::new(progress.fraction())
                    .desired_width(200.0)
                    .text(format!("{}% {}", progress.percent, progress.message)),
            );
        } else if let Some(path) = last_download {
            ui.separator();
            ui.label(egui::RichText::new(format!("Saved {}", path.display())).weak());
        }
    });

    action
}
