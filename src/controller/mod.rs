// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

//! Session controller.
//!
//! The controller owns the session state and turns UI commands into state
//! changes and caption service calls. It knows nothing about egui: the UI
//! layer sends [`Command`]s, calls [`Controller::poll`] once per frame and
//! renders whatever the accessors report.
//!
//! Service calls run on worker threads. Each one reports back through a
//! channel that `poll` drains, so all state changes happen on the thread
//! that owns the controller.

pub mod error;
pub mod playback;
pub mod progress;
pub mod shortcuts;

use crate::config::Config;
use crate::io::{api::Backend, media};
use crate::models::{
    caption::{Caption, CaptionUpdate},
    frame::UploadResponse,
    session::SessionState,
};
use anyhow::Result;
use error::ControlError;
use playback::Ticker;
use progress::Progress;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver, Sender};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A user action, as dispatched by the UI binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    TogglePlayback,
    PreviousFrame,
    NextFrame,
    /// Slider drag or thumbnail click (0-based index).
    Seek(usize),
    /// Jump to the 1-based frame number typed in the jump field.
    JumpToTyped,
    SetCaptionBound(Bound),
    /// Load the caption at this display position into the editor.
    EditCaption(usize),
    SaveCaption,
    LoadCaptions,
    ChooseFile(PathBuf),
    Upload,
    Download,
}

/// Which end of the caption range to set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

/// Navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    To(usize),
    By(i64),
}

/// Caption editor inputs, kept as typed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CaptionEditor {
    pub start: String,
    pub end: String,
    pub text: String,
}

/// Results sent back from worker threads.
enum Outcome {
    /// The service accepted the upload and is returning frames.
    UploadAccepted,
    Uploaded {
        response: UploadResponse,
        captions: Result<Vec<Caption>>,
    },
    UploadFailed(anyhow::Error),
    CaptionsLoaded {
        video_id: String,
        captions: Result<Vec<Caption>>,
    },
    CaptionSaved {
        video_id: String,
        captions: Result<Vec<Caption>>,
    },
    CaptionSaveFailed(anyhow::Error),
    Downloaded(Result<PathBuf>),
}

impl Outcome {
    /// Whether this is the last message of its job.
    fn is_final(&self) -> bool {
        !matches!(self, Outcome::UploadAccepted)
    }
}

/// Mediates between UI commands, the session state and the caption service.
pub struct Controller<B: Backend> {
    backend: Arc<B>,
    download_dir: PathBuf,
    progress_hide_delay: Duration,

    session: SessionState,
    ticker: Ticker,
    progress: Progress,

    /// Caption editor fields
    pub editor: CaptionEditor,
    /// Contents of the jump-to-frame field
    pub jump_input: String,

    selected_file: Option<PathBuf>,
    last_download: Option<PathBuf>,
    notices: VecDeque<ControlError>,

    outcome_tx: Sender<Outcome>,
    outcome_rx: Receiver<Outcome>,
    in_flight: usize,
    uploads_in_flight: usize,
}

impl<B: Backend> Controller<B> {
    pub fn new(backend: Arc<B>, config: &Config) -> Self {
        let (outcome_tx, outcome_rx) = channel();
        Self {
            backend,
            download_dir: config.download_dir.clone(),
            progress_hide_delay: config.progress_hide_delay(),
            session: SessionState::default(),
            ticker: Ticker::new(),
            progress: Progress::default(),
            editor: CaptionEditor::default(),
            jump_input: String::new(),
            selected_file: None,
            last_download: None,
            notices: VecDeque::new(),
            outcome_tx,
            outcome_rx,
            in_flight: 0,
            uploads_in_flight: 0,
        }
    }

    pub fn backend(&self) -> Arc<B> {
        Arc::clone(&self.backend)
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// Session alongside the editable input fields, for the UI.
    pub fn inputs(&mut self) -> (&SessionState, &mut CaptionEditor, &mut String) {
        (&self.session, &mut self.editor, &mut self.jump_input)
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn is_playing(&self) -> bool {
        self.session.is_playing
    }

    pub fn selected_file(&self) -> Option<&Path> {
        self.selected_file.as_deref()
    }

    pub fn last_download(&self) -> Option<&Path> {
        self.last_download.as_deref()
    }

    /// Download is offered once a video is loaded and no upload is running.
    pub fn can_download(&self) -> bool {
        self.session.has_video() && self.uploads_in_flight == 0
    }

    /// Whether any service call is still running.
    pub fn is_busy(&self) -> bool {
        self.in_flight > 0
    }

    /// The oldest notification not yet acknowledged.
    pub fn notice(&self) -> Option<&ControlError> {
        self.notices.front()
    }

    pub fn dismiss_notice(&mut self) {
        self.notices.pop_front();
    }

    /// How long the UI may sleep before the next playback tick.
    pub fn time_until_next_tick(&self, now: Instant) -> Option<Duration> {
        self.ticker.time_until_next(now)
    }

    /// Dispatch a UI command.
    pub fn handle(&mut self, command: Command, now: Instant) {
        log::debug!("Command: {:?}", command);
        match command {
            Command::TogglePlayback => self.toggle_playback(now),
            Command::PreviousFrame => self.navigate(Navigation::By(-1)),
            Command::NextFrame => self.navigate(Navigation::By(1)),
            Command::Seek(index) => self.navigate(Navigation::To(index)),
            Command::JumpToTyped => self.jump_to_typed(),
            Command::SetCaptionBound(bound) => self.set_caption_bound(bound),
            Command::EditCaption(position) => self.edit_caption(position),
            Command::SaveCaption => self.save_caption(),
            Command::LoadCaptions => self.load_captions(),
            Command::ChooseFile(path) => self.choose_file(path),
            Command::Upload => self.upload(),
            Command::Download => self.download(),
        }
    }

    /// Apply finished service calls, run due playback ticks and expire
    /// the progress indicator. Call once per UI frame.
    pub fn poll(&mut self, now: Instant) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.apply(outcome, now);
        }
        self.run_playback(now);
        self.progress.update(now);
    }

    /// Block until every running service call has reported back.
    pub fn wait_idle(&mut self, now: Instant) {
        while self.in_flight > 0 {
            match self.outcome_rx.recv() {
                Ok(outcome) => self.apply(outcome, now),
                Err(_) => break,
            }
        }
    }

    // ---- Playback ----

    pub fn toggle_playback(&mut self, now: Instant) {
        if self.session.is_playing {
            self.stop_playback();
        } else {
            self.start_playback(now);
        }
    }

    fn start_playback(&mut self, now: Instant) {
        if self.session.frames.is_empty() {
            return;
        }
        self.ticker.start(self.session.playback_interval(), now);
        self.session.is_playing = true;
        log::debug!("Playback started at {:.2} fps", self.session.fps);
    }

    pub fn stop_playback(&mut self) {
        self.ticker.stop();
        self.session.is_playing = false;
    }

    fn run_playback(&mut self, now: Instant) {
        while self.ticker.take_due(now) {
            match self.session.last_index() {
                Some(last) if self.session.current_index < last => {
                    self.session.current_index += 1;
                }
                _ => {
                    // Reached the end: rewind and pause.
                    self.stop_playback();
                    self.session.current_index = 0;
                    break;
                }
            }
        }
    }

    // ---- Navigation ----

    /// Move to a frame. Always stops playback first.
    pub fn navigate(&mut self, target: Navigation) {
        self.stop_playback();
        let requested = match target {
            Navigation::To(index) => i64::try_from(index).unwrap_or(i64::MAX),
            Navigation::By(delta) => (self.session.current_index as i64).saturating_add(delta),
        };
        if let Some(index) = self.session.clamp_index(requested) {
            self.session.current_index = index;
        }
    }

    /// Jump to a 1-based frame number. Out-of-range numbers are ignored.
    pub fn jump_to(&mut self, frame_number: i64) {
        let count = self.session.frame_count() as i64;
        if (1..=count).contains(&frame_number) {
            self.navigate(Navigation::To((frame_number - 1) as usize));
        }
    }

    pub fn jump_to_typed(&mut self) {
        if let Ok(frame_number) = self.jump_input.trim().parse::<i64>() {
            self.jump_to(frame_number);
        }
    }

    // ---- Caption editing ----

    pub fn set_caption_bound(&mut self, bound: Bound) {
        let value = self.session.current_index.to_string();
        match bound {
            Bound::Start => self.editor.start = value,
            Bound::End => self.editor.end = value,
        }
    }

    /// Seek to a listed caption and load it into the editor.
    pub fn edit_caption(&mut self, position: usize) {
        let Some(caption) = self.session.captions.get(position).cloned() else {
            return;
        };
        self.navigate(Navigation::To(caption.start_frame));
        self.editor = CaptionEditor {
            start: caption.start_frame.to_string(),
            end: caption.end_frame.to_string(),
            text: caption.text,
        };
    }

    /// Validate the editor and send the caption to the service.
    pub fn save_caption(&mut self) {
        let text = self.editor.text.trim().to_string();
        let video_id = match &self.session.video_id {
            Some(id) if !text.is_empty() => id.clone(),
            _ => return self.notify(ControlError::MissingCaptionText),
        };

        let range = (
            self.editor.start.trim().parse::<usize>(),
            self.editor.end.trim().parse::<usize>(),
        );
        let (start_frame, end_frame) = match range {
            (Ok(start), Ok(end)) if start <= end => (start, end),
            _ => return self.notify(ControlError::InvalidFrameRange),
        };

        let update = CaptionUpdate {
            video_id: video_id.clone(),
            start_frame,
            end_frame,
            text,
        };
        log::info!(
            "Saving caption for frames {}-{} of {}",
            start_frame,
            end_frame,
            video_id
        );

        self.spawn(move |backend, tx| {
            let outcome = match backend.save_caption(&update) {
                Ok(()) => Outcome::CaptionSaved {
                    captions: backend.captions(&video_id),
                    video_id,
                },
                Err(e) => Outcome::CaptionSaveFailed(e),
            };
            let _ = tx.send(outcome);
        });
    }

    /// Refresh the caption cache from the service.
    pub fn load_captions(&mut self) {
        let Some(video_id) = self.session.video_id.clone() else {
            return;
        };
        self.spawn(move |backend, tx| {
            let captions = backend.captions(&video_id);
            let _ = tx.send(Outcome::CaptionsLoaded { video_id, captions });
        });
    }

    // ---- Upload / download ----

    pub fn choose_file(&mut self, path: PathBuf) {
        log::info!("Selected {}", path.display());
        self.selected_file = Some(path);
    }

    /// Upload the chosen file, then load its frames and captions.
    pub fn upload(&mut self) {
        let Some(path) = self.selected_file.clone() else {
            return self.notify(ControlError::NoFileSelected);
        };
        if !media::is_video(&path) {
            return self.notify(ControlError::NotAVideo);
        }

        self.progress.show(0, "Starting upload...");
        self.uploads_in_flight += 1;

        self.spawn(move |backend, tx| {
            let response = media::read_upload(&path).and_then(|file| backend.upload(file));
            let outcome = match response {
                Ok(response) => {
                    let _ = tx.send(Outcome::UploadAccepted);
                    let captions = backend.captions(&response.filename);
                    Outcome::Uploaded { response, captions }
                }
                Err(e) => Outcome::UploadFailed(e),
            };
            let _ = tx.send(outcome);
        });
    }

    /// Fetch the processed video and save it as `<video_id>_output.mp4`.
    pub fn download(&mut self) {
        let Some(video_id) = self.session.video_id.clone() else {
            log::debug!("Download requested without a loaded video");
            return;
        };
        let target = self.download_dir.join(format!("{video_id}_output.mp4"));

        self.spawn(move |backend, tx| {
            let result = backend.download(&video_id).and_then(|bytes| {
                if let Some(parent) = target.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::write(&target, bytes)?;
                Ok(target)
            });
            let _ = tx.send(Outcome::Downloaded(result));
        });
    }

    // ---- Internals ----

    fn spawn<F>(&mut self, job: F)
    where
        F: FnOnce(&B, &Sender<Outcome>) + Send + 'static,
    {
        let backend = Arc::clone(&self.backend);
        let tx = self.outcome_tx.clone();
        self.in_flight += 1;
        std::thread::spawn(move || job(&backend, &tx));
    }

    fn notify(&mut self, error: ControlError) {
        log::error!("{}", error);
        self.notices.push_back(error);
    }

    fn apply(&mut self, outcome: Outcome, now: Instant) {
        if outcome.is_final() {
            self.in_flight = self.in_flight.saturating_sub(1);
        }

        match outcome {
            Outcome::UploadAccepted => {
                self.progress.show(50, "Processing video...");
            }
            Outcome::Uploaded { response, captions } => {
                self.uploads_in_flight = self.uploads_in_flight.saturating_sub(1);
                self.stop_playback();
                log::info!(
                    "Loaded video {} ({} frames at {:.2} fps)",
                    response.filename,
                    response.frames.len(),
                    response.effective_fps()
                );
                let video_id = response.filename.clone();
                self.session.load_video(response);
                self.apply_captions(&video_id, captions);
                self.progress
                    .finish("Upload complete!", now, self.progress_hide_delay);
            }
            Outcome::UploadFailed(e) => {
                self.uploads_in_flight = self.uploads_in_flight.saturating_sub(1);
                self.progress.hide();
                self.notify(ControlError::Upload(format!("{e:#}")));
            }
            Outcome::CaptionsLoaded { video_id, captions } => {
                self.apply_captions(&video_id, captions);
            }
            Outcome::CaptionSaved { video_id, captions } => {
                if self.apply_captions(&video_id, captions) {
                    self.editor.text.clear();
                }
            }
            Outcome::CaptionSaveFailed(e) => {
                self.notify(ControlError::SaveCaption(format!("{e:#}")));
            }
            Outcome::Downloaded(Ok(path)) => {
                log::info!("Saved processed video to {}", path.display());
                self.last_download = Some(path);
            }
            Outcome::Downloaded(Err(e)) => {
                self.notify(ControlError::Download(format!("{e:#}")));
            }
        }
    }

    /// Apply a caption list fetched for `video_id`. Returns false when that
    /// video is no longer loaded and the result was dropped.
    fn apply_captions(&mut self, video_id: &str, captions: Result<Vec<Caption>>) -> bool {
        if self.session.video_id.as_deref() != Some(video_id) {
            log::debug!("Dropping captions for {} (no longer loaded)", video_id);
            return false;
        }
        match captions {
            Ok(captions) => {
                log::info!("Loaded {} captions", captions.len());
                self.session.set_captions(captions);
            }
            Err(e) => self.notify(ControlError::LoadCaptions(format!("{e:#}"))),
        }
        true
    }
}

#[cfg(test)]
mod tests;
