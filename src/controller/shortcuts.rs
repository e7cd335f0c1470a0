// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Keyboard shortcuts.
//!
//! | Key          | Command              |
//! |--------------|----------------------|
//! | Space        | play / pause         |
//! | Left / Right | previous / next frame|
//! | Ctrl+S       | save caption         |
//! | Ctrl+Enter   | jump to typed frame  |
//!
//! None of them fire while the caption text is being edited.

use super::Command;

/// Keys that carry a shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Space,
    ArrowLeft,
    ArrowRight,
    S,
    Enter,
}

/// Map a key press to a command.
pub fn command_for(key: Key, ctrl: bool, editing_text: bool) -> Option<Command> {
    if editing_text {
        return None;
    }
    match key {
        Key::Space => Some(Command::TogglePlayback),
        Key::ArrowLeft => Some(Command::PreviousFrame),
        Key::ArrowRight => Some(Command::NextFrame),
        Key::S if ctrl => Some(Command::SaveCaption),
        Key::Enter if ctrl => Some(Command::JumpToTyped),
        Key::S | Key::Enter => None,
    }
}
