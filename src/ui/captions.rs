// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Caption editor and caption list panel.
//!
//! The editor holds the start/end frame fields (0-based, as sent to the
//! service) and the caption text. The list shows every caption of the
//! video; captions covering the current frame are highlighted and
//! clicking one loads it into the editor.

use crate::controller::{Bound, CaptionEditor, Command};
use crate::models::session::SessionState;

/// Id of the caption text area. Shortcuts are ignored while it has focus.
pub fn text_edit_id() -> egui::Id {
    egui::Id::new("caption_text")
}

/// Display the caption panel. Returns the commands triggered this frame.
pub fn show(
    ui: &mut egui::Ui,
    session: &SessionState,
    editor: &mut CaptionEditor,
) -> Vec<Command> {
    let mut commands = Vec::new();

    ui.heading("Caption");
    ui.add_space(4.0);

    egui::Grid::new("caption_range")
        .num_columns(3)
        .spacing([8.0, 4.0])
        .show(ui, |ui| {
            ui.label("Start frame:");
            ui.add(egui::TextEdit::singleline(&mut editor.start).desired_width(60.0));
            if ui.button("Set").on_hover_text("Use current frame").clicked() {
                commands.push(Command::SetCaptionBound(Bound::Start));
            }
            ui.end_row();

            ui.label("End frame:");
            ui.add(egui::TextEdit::singleline(&mut editor.end).desired_width(60.0));
            if ui.button("Set").on_hover_text("Use current frame").clicked() {
                commands.push(Command::SetCaptionBound(Bound::End));
            }
            ui.end_row();
        });

    ui.add_space(4.0);
    ui.add(
        egui::TextEdit::multiline(&mut editor.text)
            .id(text_edit_id())
            .desired_rows(3)
            .desired_width(f32::INFINITY)
            .hint_text("Caption text"),
    );

    if ui
        .add_enabled(session.has_video(), egui::Button::new("Save Caption"))
        .on_hover_text("Ctrl+S")
        .clicked()
    {
        commands.push(Command::SaveCaption);
    }

    ui.separator();
    ui.heading(format!("Captions ({})", session.captions.len()));

    if session.captions.is_empty() {
        ui.label(egui::RichText::new("No captions yet").italics().weak());
        return commands;
    }

    egui::ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui| {
            for (position, caption) in session.captions.iter().enumerate() {
                let active = session.is_caption_active(position);
                let text = egui::RichText::new(format!("{}\n{}", caption.range_label(), caption.text));
                let response = ui.selectable_label(active, text);
                if response.clicked() {
                    commands.push(Command::EditCaption(position));
                }
            }
        });

    commands
}
