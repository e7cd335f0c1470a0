// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Video timeline scrubber control.
//!
//! This module provides the transport controls (play/pause, previous,
//! next), the frame scrubber and the jump-to-frame field.

use crate::controller::Command;
use crate::models::session::SessionState;

/// Display the transport bar. Returns the commands triggered this frame.
pub fn show(
    ui: &mut egui::Ui,
    session: &SessionState,
    jump_input: &mut String,
) -> Vec<Command> {
    let mut commands = Vec::new();
    let has_frames = !session.frames.is_empty();

    ui.horizontal(|ui| {
        let play_label = if session.is_playing { "⏸" } else { "▶" };
        if ui
            .add_enabled(has_frames, egui::Button::new(play_label))
            .on_hover_text("Play / pause (Space)")
            .clicked()
        {
            commands.push(Command::TogglePlayback);
        }
        if ui
            .add_enabled(has_frames, egui::Button::new("⏮"))
            .on_hover_text("Previous frame (←)")
            .clicked()
        {
            commands.push(Command::PreviousFrame);
        }
        if ui
            .add_enabled(has_frames, egui::Button::new("⏭"))
            .on_hover_text("Next frame (→)")
            .clicked()
        {
            commands.push(Command::NextFrame);
        }

        ui.separator();

        let shown = if has_frames { session.current_index + 1 } else { 0 };
        ui.label(format!("Frame {} / {}", shown, session.frame_count()));

        ui.separator();

        ui.label("Jump to:");
        ui.add(
            egui::TextEdit::singleline(jump_input)
                .desired_width(60.0)
                .hint_text("frame #"),
        );
        if ui
            .add_enabled(has_frames, egui::Button::new("Go"))
            .on_hover_text("Jump to frame (Ctrl+Enter)")
            .clicked()
        {
            commands.push(Command::JumpToTyped);
        }
    });

    if let Some(last) = session.last_index() {
        let mut value = session.current_index;
        let slider_width = ui.available_width();
        ui.spacing_mut().slider_width = slider_width;
        let response = ui.add(egui::Slider::new(&mut value, 0..=last).show_value(false));
        if response.changed() && value != session.current_index {
            commands.push(Command::Seek(value));
        }
    }

    commands
}
