// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Frame thumbnail grid. Click a thumbnail to seek to it.

use crate::controller::Command;
use crate::io::api::Backend;
use crate::models::session::SessionState;
use crate::ui::frames::{FrameImages, ImageSize};
use crate::util::geometry::{center_offset, fit_size};
use std::collections::HashSet;
use std::sync::Arc;

const THUMB_SIZE: egui::Vec2 = egui::vec2(120.0, 80.0);
const LABEL_HEIGHT: f32 = 16.0;

/// Display the grid. Thumbnails are loaded for visible rows and evicted
/// once their row scrolls out of view.
pub fn show<B: Backend>(
    ui: &mut egui::Ui,
    session: &SessionState,
    images: &mut FrameImages,
    backend: &Arc<B>,
) -> Option<Command> {
    let mut command = None;
    let count = session.frame_count();
    if count == 0 {
        ui.label(egui::RichText::new("No frames").weak());
        return None;
    }

    let spacing = ui.spacing().item_spacing;
    let per_row = ((ui.available_width() + spacing.x) / (THUMB_SIZE.x + spacing.x))
        .floor()
        .max(1.0) as usize;
    let rows = count.div_ceil(per_row);
    let row_height = THUMB_SIZE.y + LABEL_HEIGHT;
    let mut visible = HashSet::new();

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show_rows(ui, row_height, rows, |ui, row_range| {
            for row in row_range {
                ui.horizontal(|ui| {
                    let first = row * per_row;
                    for index in first..(first + per_row).min(count) {
                        let path = session.frames[index].path.as_str();
                        visible.insert(path);
                        images.request(backend, ImageSize::Thumbnail, path);
                        let texture = images.get(ImageSize::Thumbnail, path);
                        if thumbnail(ui, texture, index, index == session.current_index) {
                            command = Some(Command::Seek(index));
                        }
                    }
                });
            }
        });
    images.retain_thumbnails(|path| visible.contains(path));

    command
}

/// Draw one thumbnail; returns true when clicked.
fn thumbnail(
    ui: &mut egui::Ui,
    texture: Option<&egui::TextureHandle>,
    index: usize,
    active: bool,
) -> bool {
    let (rect, response) = ui.allocate_exact_size(
        THUMB_SIZE + egui::vec2(0.0, LABEL_HEIGHT),
        egui::Sense::click(),
    );
    let painter = ui.painter();
    let image_area = egui::Rect::from_min_size(rect.min, THUMB_SIZE);
    painter.rect_filled(image_area, 2.0, egui::Color32::from_gray(30));

    if let Some(texture) = texture {
        let [width, height] = texture.size();
        let size = fit_size((width as u32, height as u32), (THUMB_SIZE.x, THUMB_SIZE.y));
        let offset = center_offset(size, (THUMB_SIZE.x, THUMB_SIZE.y));
        let image_rect = egui::Rect::from_min_size(
            image_area.min + egui::vec2(offset.0, offset.1),
            egui::vec2(size.0, size.1),
        );
        painter.image(
            texture.id(),
            image_rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );
    }

    if active {
        painter.rect_stroke(image_area, 2.0, egui::Stroke::new(2.0, egui::Color32::YELLOW));
    } else if response.hovered() {
        painter.rect_stroke(image_area, 2.0, egui::Stroke::new(1.0, egui::Color32::LIGHT_BLUE));
    }

    painter.text(
        egui::pos2(rect.center().x, rect.max.y - LABEL_HEIGHT / 2.0),
        egui::Align2::CENTER_CENTER,
        (index + 1).to_string(),
        egui::FontId::proportional(12.0),
        ui.visuals().text_color(),
    );

    response.clicked()
}
