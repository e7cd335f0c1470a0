// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame viewer.
//!
//! This module displays the current frame, letterboxed into the central
//! panel, with the captions active on that frame overlaid at the bottom.

use crate::models::session::SessionState;
use crate::ui::frames::{FrameImages, ImageSize};
use crate::util::geometry::{center_offset, fit_size};

/// Display the current frame, or a welcome message when nothing is loaded.
pub fn show(ui: &mut egui::Ui, session: &SessionState, frames: &FrameImages) {
    ui.style_mut().visuals.extreme_bg_color = egui::Color32::from_gray(40);
    let available_size = ui.available_size();

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        ui.set_min_size(available_size);

        let Some(frame) = session.current_frame() else {
            welcome(ui, session.has_video());
            return;
        };

        // The thumbnail stands in until the full-size frame arrives
        let texture = frames
            .get(ImageSize::Full, &frame.path)
            .or_else(|| frames.get(ImageSize::Thumbnail, &frame.path));
        let Some(texture) = texture else {
            ui.centered_and_justified(|ui| {
                ui.spinner();
            });
            return;
        };

        let [width, height] = texture.size();
        let available = ui.available_size();
        let (display_width, display_height) =
            fit_size((width as u32, height as u32), (available.x, available.y));
        let (x_offset, y_offset) =
            center_offset((display_width, display_height), (available.x, available.y));

        let image_rect = egui::Rect::from_min_size(
            ui.min_rect().min + egui::vec2(x_offset, y_offset),
            egui::vec2(display_width, display_height),
        );

        let painter = ui.painter();
        painter.image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        // Preview of what the burned-in caption will say
        let active: Vec<&str> = session.active_captions().map(|c| c.text.as_str()).collect();
        if !active.is_empty() {
            let galley = painter.layout(
                active.join(" | "),
                egui::FontId::proportional(18.0),
                egui::Color32::WHITE,
                image_rect.width() * 0.9,
            );
            let pos = egui::pos2(
                image_rect.center().x - galley.size().x / 2.0,
                image_rect.max.y - galley.size().y - 20.0,
            );
            let background = egui::Rect::from_min_size(pos, galley.size()).expand(8.0);
            painter.rect_filled(background, 4.0, egui::Color32::from_black_alpha(180));
            painter.galley(pos, galley, egui::Color32::WHITE);
        }
    });

    ui.separator();
    ui.horizontal(|ui| match session.video_id.as_deref() {
        Some(video_id) => {
            ui.label(format!("Video: {}", video_id));
            ui.separator();
            ui.label(format!("{:.2} fps", session.fps));
        }
        None => {
            ui.label("No video loaded");
        }
    });
}

fn welcome(ui: &mut egui::Ui, has_video: bool) {
    ui.centered_and_justified(|ui| {
        ui.vertical_centered(|ui| {
            ui.add_space(20.0);
            ui.heading(
                egui::RichText::new("FRAMECAP")
                    .size(32.0)
                    .color(egui::Color32::from_gray(200)),
            );
            ui.label(
                egui::RichText::new("Frame-accurate video captioning")
                    .size(14.0)
                    .color(egui::Color32::from_gray(150)),
            );
            ui.add_space(20.0);
            let hint = if has_video {
                "The service returned no frames for this video"
            } else {
                "Choose a video and upload it to begin captioning"
            };
            ui.label(egui::RichText::new(hint).color(egui::Color32::from_gray(180)));
        });
    });
}
