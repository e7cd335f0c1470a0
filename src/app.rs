// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Main application state and egui App implementation.
//!
//! This module binds the session controller to egui: it lays out the
//! panels, turns clicks and key presses into controller commands, and
//! keeps the frame texture cache in step with the loaded video.

use crate::controller::{
    shortcuts::{self, Key},
    Command, Controller,
};
use crate::io::{api::Backend, serialization};
use crate::ui::{
    captions,
    frames::{FrameImages, ImageSize},
    thumbnails, timeline, toolbar, viewer,
};
use std::time::{Duration, Instant};

/// Repaint interval while background work is running.
const BUSY_REPAINT: Duration = Duration::from_millis(50);

/// Main application state.
pub struct FramecapApp<B: Backend> {
    controller: Controller<B>,

    /// Textures of fetched frames
    frames: FrameImages,

    /// Video the texture cache belongs to
    cached_video: Option<String>,
}

impl<B: Backend> FramecapApp<B> {
    /// Create a new application around a controller.
    pub fn new(controller: Controller<B>) -> Self {
        Self {
            controller,
            frames: FrameImages::new(),
            cached_video: None,
        }
    }

    /// Export the loaded captions to a file chosen by the user.
    fn export_captions(&self, extension: &str) {
        let Some(data) = serialization::CaptionExport::from_session(self.controller.session())
        else {
            return;
        };
        let Some(path) = rfd::FileDialog::new()
            .add_filter(extension.to_uppercase(), &[extension])
            .set_file_name(format!("{}_captions.{}", data.video_id, extension))
            .save_file()
        else {
            return;
        };

        match serialization::export(&data, &path) {
            Ok(()) => log::info!("Exported {} captions to {}", data.captions.len(), path.display()),
            Err(e) => log::error!("Failed to export captions: {}", e),
        }
    }

    fn pick_video() -> Option<Command> {
        rfd::FileDialog::new()
            .add_filter("Videos", &["mp4", "avi", "mov", "mkv"])
            .pick_file()
            .map(Command::ChooseFile)
    }

    fn show_notice(&mut self, ctx: &egui::Context) {
        let Some(message) = self.controller.notice().map(|e| e.to_string()) else {
            return;
        };
        let mut dismissed = false;
        egui::Window::new("Error")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, [0.0, 0.0])
            .show(ctx, |ui| {
                ui.label(message);
                ui.add_space(8.0);
                if ui.button("OK").clicked() {
                    dismissed = true;
                }
            });
        if dismissed || ctx.input(|i| i.key_pressed(egui::Key::Enter)) {
            self.controller.dismiss_notice();
        }
    }
}

impl<B: Backend> eframe::App for FramecapApp<B> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.controller.poll(now);
        self.frames.poll(ctx);

        // A new upload invalidates every cached frame texture
        let video_id = self.controller.session().video_id.clone();
        if video_id != self.cached_video {
            self.frames.clear();
            self.cached_video = video_id;
        }

        let blocked = self.controller.notice().is_some();
        let mut commands = if blocked {
            Vec::new()
        } else {
            shortcut_commands(ctx)
        };

        // Top menu bar
        egui::TopBottomPanel::top("menu_bar").show(ctx, |ui| {
            ui.add_enabled_ui(!blocked, |ui| {
                egui::menu::bar(ui, |ui| {
                    ui.menu_button("File", |ui| {
                        if ui.button("Choose Video...").clicked() {
                            commands.extend(Self::pick_video());
                            ui.close_menu();
                        }
                        if ui.button("Upload").clicked() {
                            commands.push(Command::Upload);
                            ui.close_menu();
                        }
                        let can_download = self.controller.can_download();
                        if ui.add_enabled(can_download, egui::Button::new("Download")).clicked() {
                            commands.push(Command::Download);
                            ui.close_menu();
                        }
                        ui.separator();
                        let has_video = self.controller.session().has_video();
                        ui.add_enabled_ui(has_video, |ui| {
                            ui.menu_button("Export Captions", |ui| {
                                if ui.button("Export as YAML...").clicked() {
                                    self.export_captions("yaml");
                                    ui.close_menu();
                                }
                                if ui.button("Export as JSON...").clicked() {
                                    self.export_captions("json");
                                    ui.close_menu();
                                }
                            });
                        });
                        if ui.add_enabled(has_video, egui::Button::new("Reload Captions")).clicked() {
                            commands.push(Command::LoadCaptions);
                            ui.close_menu();
                        }
                        ui.separator();
                        if ui.button("Quit").clicked() {
                            ctx.send_viewport_cmd(egui::ViewportCommand::Close);
                        }
                    });
                });
            });
        });

        // Toolbar
        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            ui.add_enabled_ui(!blocked, |ui| {
                let action = toolbar::show(
                    ui,
                    self.controller.selected_file(),
                    self.controller.progress(),
                    self.controller.can_download(),
                    self.controller.last_download(),
                );
                match action {
                    toolbar::ToolbarAction::ChooseFile => commands.extend(Self::pick_video()),
                    toolbar::ToolbarAction::Upload => commands.push(Command::Upload),
                    toolbar::ToolbarAction::Download => commands.push(Command::Download),
                    toolbar::ToolbarAction::None => {}
                }
            });
        });

        // Caption panel (right side)
        egui::SidePanel::right("captions")
            .default_width(280.0)
            .show(ctx, |ui| {
                ui.add_enabled_ui(!blocked, |ui| {
                    let (session, editor, _) = self.controller.inputs();
                    commands.extend(captions::show(ui, session, editor));
                });
            });

        // Transport controls (bottom)
        egui::TopBottomPanel::bottom("timeline").show(ctx, |ui| {
            ui.add_enabled_ui(!blocked, |ui| {
                let (session, _, jump_input) = self.controller.inputs();
                commands.extend(timeline::show(ui, session, jump_input));
            });
        });

        // Thumbnail grid (above the transport controls)
        let backend = self.controller.backend();
        egui::TopBottomPanel::bottom("thumbnails")
            .resizable(true)
            .default_height(140.0)
            .show(ctx, |ui| {
                ui.add_enabled_ui(!blocked, |ui| {
                    let session = self.controller.session();
                    commands.extend(thumbnails::show(ui, session, &mut self.frames, &backend));
                });
            });

        // Main viewer (center)
        if let Some(frame) = self.controller.session().current_frame() {
            self.frames.request(&backend, ImageSize::Full, &frame.path);
        }
        egui::CentralPanel::default().show(ctx, |ui| {
            viewer::show(ui, self.controller.session(), &self.frames);
        });

        self.show_notice(ctx);

        for command in commands {
            self.controller.handle(command, now);
        }

        // Keep polling while playback or background work is running
        if let Some(wait) = self.controller.time_until_next_tick(now) {
            ctx.request_repaint_after(wait);
        }
        if self.controller.is_busy() || self.controller.progress().visible || self.frames.is_loading() {
            ctx.request_repaint_after(BUSY_REPAINT);
        }
    }
}

/// Collect shortcut commands and remove the handled key events so no
/// widget sees them.
fn shortcut_commands(ctx: &egui::Context) -> Vec<Command> {
    let editing_text = ctx.memory(|m| m.has_focus(captions::text_edit_id()));

    ctx.input_mut(|i| {
        let mut commands = Vec::new();
        let mut consumed_space = false;

        i.events.retain(|event| {
            let egui::Event::Key {
                key,
                pressed: true,
                modifiers,
                ..
            } = event
            else {
                return true;
            };
            let Some(key) = shortcut_key(*key) else {
                return true;
            };
            let ctrl = modifiers.ctrl || modifiers.mac_cmd;
            match shortcuts::command_for(key, ctrl, editing_text) {
                Some(command) => {
                    consumed_space |= key == Key::Space;
                    commands.push(command);
                    false
                }
                None => true,
            }
        });

        if consumed_space {
            i.events
                .retain(|event| !matches!(event, egui::Event::Text(t) if t == " "));
        }
        commands
    })
}

fn shortcut_key(key: egui::Key) -> Option<Key> {
    match key {
        egui::Key::Space => Some(Key::Space),
        egui::Key::ArrowLeft => Some(Key::ArrowLeft),
        egui::Key::ArrowRight => Some(Key::ArrowRight),
        egui::Key::S => Some(Key::S),
        egui::Key::Enter => Some(Key::Enter),
        _ => None,
    }
}
