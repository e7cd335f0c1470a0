// Copyright (c) 2025, Jason Jenkins
// SPDX-License-Identifier: BSD-3-Clause

use super::*;
use crate::io::media::UploadFile;
use crate::models::frame::Frame;
use anyhow::anyhow;
use std::sync::Mutex;

/// In-memory caption service that records every call.
#[derive(Default)]
struct FakeBackend {
    upload_error: Mutex<Option<String>>,
    fps: Mutex<Option<f64>>,
    frame_count: Mutex<usize>,
    captions: Mutex<Vec<Caption>>,
    captions_error: Mutex<Option<String>>,
    save_error: Mutex<Option<String>>,
    download_error: Mutex<Option<String>>,
    calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    fn with_frames(count: usize) -> Arc<Self> {
        let backend = Self::default();
        *backend.frame_count.lock().unwrap() = count;
        *backend.fps.lock().unwrap() = Some(10.0);
        Arc::new(backend)
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn fail_with(slot: &Mutex<Option<String>>, message: &str) {
        *slot.lock().unwrap() = Some(message.to_string());
    }
}

impl Backend for FakeBackend {
    fn upload(&self, file: UploadFile) -> Result<UploadResponse> {
        self.record(format!("upload {}", file.name));
        if let Some(detail) = self.upload_error.lock().unwrap().clone() {
            return Err(anyhow!(detail));
        }
        let count = *self.frame_count.lock().unwrap();
        Ok(UploadResponse {
            filename: "upload_0a1b".into(),
            frames: (0..count)
                .map(|i| Frame::new(format!("/frames/upload_0a1b/frame_{i:06}.jpg")))
                .collect(),
            fps: *self.fps.lock().unwrap(),
        })
    }

    fn download(&self, video_id: &str) -> Result<Vec<u8>> {
        self.record(format!("download {video_id}"));
        match self.download_error.lock().unwrap().clone() {
            Some(message) => Err(anyhow!(message)),
            None => Ok(b"mp4 bytes".to_vec()),
        }
    }

    fn captions(&self, video_id: &str) -> Result<Vec<Caption>> {
        self.record(format!("captions {video_id}"));
        match self.captions_error.lock().unwrap().clone() {
            Some(message) => Err(anyhow!(message)),
            None => Ok(self.captions.lock().unwrap().clone()),
        }
    }

    fn save_caption(&self, caption: &CaptionUpdate) -> Result<()> {
        self.record(format!(
            "save {} {}-{} {}",
            caption.video_id, caption.start_frame, caption.end_frame, caption.text
        ));
        if let Some(message) = self.save_error.lock().unwrap().clone() {
            return Err(anyhow!(message));
        }
        let mut captions = self.captions.lock().unwrap();
        match captions
            .iter_mut()
            .find(|c| c.start_frame == caption.start_frame && c.end_frame == caption.end_frame)
        {
            Some(existing) => existing.text = caption.text.clone(),
            None => captions.push(Caption::new(
                caption.start_frame,
                caption.end_frame,
                caption.text.clone(),
            )),
        }
        Ok(())
    }

    fn fetch_frame(&self, path: &str) -> Result<Vec<u8>> {
        self.record(format!("frame {path}"));
        Ok(Vec::new())
    }
}

struct Harness {
    backend: Arc<FakeBackend>,
    controller: Controller<FakeBackend>,
    dir: tempfile::TempDir,
    now: Instant,
}

impl Harness {
    fn new(backend: Arc<FakeBackend>) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let config = Config {
            download_dir: dir.path().join("downloads"),
            ..Config::default()
        };
        Self {
            controller: Controller::new(Arc::clone(&backend), &config),
            backend,
            dir,
            now: Instant::now(),
        }
    }

    fn video_file(&self, name: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, b"fake video").unwrap();
        path
    }

    /// Upload a video and wait for frames and captions to arrive.
    fn loaded(frames: usize) -> Self {
        let mut h = Self::new(FakeBackend::with_frames(frames));
        let file = h.video_file("clip.mp4");
        h.controller.choose_file(file);
        h.controller.upload();
        h.controller.wait_idle(h.now);
        assert!(h.controller.session().has_video());
        h
    }

    fn run(&mut self, command: Command) {
        self.controller.handle(command, self.now);
    }

    fn advance(&mut self, by: Duration) {
        self.now += by;
        self.controller.poll(self.now);
    }

    fn index(&self) -> usize {
        self.controller.session().current_index
    }

    fn notice(&self) -> Option<String> {
        self.controller.notice().map(|e| e.to_string())
    }
}

const TICK: Duration = Duration::from_millis(100);

// ---- Upload ----

#[test]
fn test_upload_loads_frames_and_captions() {
    let backend = FakeBackend::with_frames(12);
    backend
        .captions
        .lock()
        .unwrap()
        .extend([Caption::new(10, 11, "b"), Caption::new(2, 4, "a")]);
    let mut h = Harness::new(backend);
    let file = h.video_file("clip.mp4");

    h.run(Command::ChooseFile(file));
    h.run(Command::Upload);
    assert!(h.controller.progress().visible);
    assert_eq!(h.controller.progress().percent, 0);
    assert!(!h.controller.can_download());
    h.controller.wait_idle(h.now);

    let session = h.controller.session();
    assert_eq!(session.video_id.as_deref(), Some("upload_0a1b"));
    assert_eq!(session.frame_count(), 12);
    assert_eq!(session.fps, 10.0);
    assert_eq!(session.captions[0].start_frame, 2);
    assert_eq!(session.captions[1].start_frame, 10);
    assert_eq!(
        h.backend.calls(),
        vec!["upload clip.mp4", "captions upload_0a1b"]
    );

    let progress = h.controller.progress();
    assert_eq!(progress.percent, 100);
    assert_eq!(progress.message, "Upload complete!");
    assert!(h.controller.can_download());
    assert!(h.controller.notice().is_none());
}

#[test]
fn test_upload_progress_hides_after_delay() {
    let mut h = Harness::loaded(3);
    assert!(h.controller.progress().visible);
    h.advance(Duration::from_millis(1900));
    assert!(h.controller.progress().visible);
    h.advance(Duration::from_millis(100));
    assert!(!h.controller.progress().visible);
}

#[test]
fn test_upload_resets_current_index() {
    let mut h = Harness::loaded(10);
    h.run(Command::Seek(7));
    h.run(Command::TogglePlayback);
    assert_eq!(h.index(), 7);

    h.run(Command::Upload);
    h.controller.wait_idle(h.now);

    assert_eq!(h.index(), 0);
    assert!(!h.controller.is_playing());
    assert_eq!(h.controller.time_until_next_tick(h.now), None);
}

#[test]
fn test_upload_defaults_fps() {
    let backend = FakeBackend::with_frames(2);
    *backend.fps.lock().unwrap() = None;
    let mut h = Harness::new(backend);
    let file = h.video_file("clip.mov");
    h.run(Command::ChooseFile(file));
    h.run(Command::Upload);
    h.controller.wait_idle(h.now);
    assert_eq!(h.controller.session().fps, 30.0);
}

#[test]
fn test_upload_without_file_is_rejected_locally() {
    let mut h = Harness::new(FakeBackend::with_frames(3));
    h.run(Command::Upload);
    assert_eq!(h.notice().as_deref(), Some("Please select a video file first"));
    assert!(h.backend.calls().is_empty());
    assert!(!h.controller.is_busy());
}

#[test]
fn test_upload_of_non_video_is_rejected_locally() {
    let mut h = Harness::new(FakeBackend::with_frames(3));
    let file = h.video_file("notes.txt");
    h.run(Command::ChooseFile(file));
    h.run(Command::Upload);
    assert_eq!(h.notice().as_deref(), Some("Please select a valid video file"));
    assert!(h.backend.calls().is_empty());
    assert!(!h.controller.progress().visible);
}

#[test]
fn test_failed_upload_keeps_previous_session() {
    let mut h = Harness::loaded(6);
    h.run(Command::Seek(4));
    let before = h.controller.session().clone();

    FakeBackend::fail_with(
        &h.backend.upload_error,
        "Unsupported video format. Please use MP4, AVI, MOV, or MKV.",
    );
    h.run(Command::Upload);
    h.controller.wait_idle(h.now);

    assert_eq!(h.controller.session(), &before);
    assert!(!h.controller.progress().visible);
    assert!(h.controller.can_download());
    assert_eq!(
        h.notice().as_deref(),
        Some("Upload failed: Unsupported video format. Please use MP4, AVI, MOV, or MKV.")
    );
}

#[test]
fn test_caption_load_failure_after_upload_still_loads_video() {
    let backend = FakeBackend::with_frames(4);
    FakeBackend::fail_with(&backend.captions_error, "Failed to load captions");
    let mut h = Harness::new(backend);
    let file = h.video_file("clip.mp4");
    h.run(Command::ChooseFile(file));
    h.run(Command::Upload);
    h.controller.wait_idle(h.now);

    assert_eq!(h.controller.session().frame_count(), 4);
    assert_eq!(
        h.notice().as_deref(),
        Some("Error loading captions: Failed to load captions")
    );
}

// ---- Navigation ----

#[test]
fn test_navigate_marks_active_captions() {
    let backend = FakeBackend::with_frames(20);
    backend.captions.lock().unwrap().extend([
        Caption::new(2, 4, "a"),
        Caption::new(4, 9, "b"),
        Caption::new(12, 12, "c"),
    ]);
    let mut h = Harness::new(backend);
    let file = h.video_file("clip.mp4");
    h.run(Command::ChooseFile(file));
    h.run(Command::Upload);
    h.controller.wait_idle(h.now);

    for i in 0..20 {
        h.run(Command::Seek(i));
        assert_eq!(h.index(), i);
        let session = h.controller.session();
        assert_eq!(
            session.current_frame().map(|f| f.path.clone()),
            Some(format!("/frames/upload_0a1b/frame_{i:06}.jpg"))
        );
        for (position, caption) in session.captions.iter().enumerate() {
            let expected = caption.start_frame <= i && i <= caption.end_frame;
            assert_eq!(session.is_caption_active(position), expected, "frame {i}");
        }
    }
}

#[test]
fn test_navigation_clamps() {
    let mut h = Harness::loaded(5);
    h.run(Command::PreviousFrame);
    assert_eq!(h.index(), 0);
    h.run(Command::Seek(99));
    assert_eq!(h.index(), 4);
    h.run(Command::NextFrame);
    assert_eq!(h.index(), 4);
    h.run(Command::PreviousFrame);
    assert_eq!(h.index(), 3);
}

#[test]
fn test_navigation_without_frames_is_noop() {
    let mut h = Harness::new(FakeBackend::with_frames(0));
    h.run(Command::NextFrame);
    h.run(Command::Seek(3));
    assert_eq!(h.index(), 0);
}

#[test]
fn test_manual_navigation_stops_playback() {
    let mut h = Harness::loaded(10);
    h.run(Command::TogglePlayback);
    assert!(h.controller.is_playing());
    h.run(Command::NextFrame);
    assert!(!h.controller.is_playing());
    assert_eq!(h.index(), 1);

    // no stray ticks afterwards
    h.advance(TICK * 5);
    assert_eq!(h.index(), 1);
}

#[test]
fn test_jump_to() {
    let mut h = Harness::loaded(8);
    h.controller.jump_to(8);
    assert_eq!(h.index(), 7);
    h.controller.jump_to(1);
    assert_eq!(h.index(), 0);
}

#[test]
fn test_jump_out_of_range_is_silent_noop() {
    let mut h = Harness::loaded(8);
    h.run(Command::Seek(3));
    h.run(Command::TogglePlayback);

    for typed in ["0", "9", "-2", "abc", ""] {
        h.controller.jump_input = typed.to_string();
        h.run(Command::JumpToTyped);
        assert_eq!(h.index(), 3, "input {typed:?}");
    }
    assert!(h.controller.is_playing());
    assert!(h.controller.notice().is_none());
}

#[test]
fn test_jump_typed_converts_to_zero_based() {
    let mut h = Harness::loaded(8);
    h.controller.jump_input = " 5 ".into();
    h.run(Command::JumpToTyped);
    assert_eq!(h.index(), 4);
}

// ---- Playback ----

#[test]
fn test_toggle_twice_restores_state() {
    let mut h = Harness::loaded(5);
    h.run(Command::Seek(2));
    h.run(Command::TogglePlayback);
    h.run(Command::TogglePlayback);
    assert!(!h.controller.is_playing());
    assert_eq!(h.controller.time_until_next_tick(h.now), None);
    h.advance(TICK * 3);
    assert_eq!(h.index(), 2);
}

#[test]
fn test_playback_needs_frames() {
    let mut h = Harness::new(FakeBackend::with_frames(0));
    h.run(Command::TogglePlayback);
    assert!(!h.controller.is_playing());
}

#[test]
fn test_playback_advances_one_frame_per_tick() {
    let mut h = Harness::loaded(5);
    h.run(Command::TogglePlayback);
    assert_eq!(h.controller.time_until_next_tick(h.now), Some(TICK));

    h.advance(TICK / 2);
    assert_eq!(h.index(), 0);
    h.advance(TICK / 2);
    assert_eq!(h.index(), 1);
    h.advance(TICK * 2);
    assert_eq!(h.index(), 3);
    assert!(h.controller.is_playing());
}

#[test]
fn test_playback_at_last_frame_rewinds_and_stops() {
    let mut h = Harness::loaded(5);
    h.run(Command::Seek(4));
    h.run(Command::TogglePlayback);
    h.advance(TICK);
    assert!(!h.controller.is_playing());
    assert_eq!(h.index(), 0);

    h.advance(TICK * 3);
    assert_eq!(h.index(), 0);
}

#[test]
fn test_playback_runs_to_end_then_pauses() {
    let mut h = Harness::loaded(3);
    h.run(Command::TogglePlayback);
    h.advance(TICK * 10);
    assert!(!h.controller.is_playing());
    assert_eq!(h.index(), 0);
}

// ---- Captions ----

#[test]
fn test_set_caption_bounds_copy_current_index() {
    let mut h = Harness::loaded(10);
    h.run(Command::Seek(3));
    h.run(Command::SetCaptionBound(Bound::Start));
    h.run(Command::Seek(6));
    h.run(Command::SetCaptionBound(Bound::End));
    assert_eq!(h.controller.editor.start, "3");
    assert_eq!(h.controller.editor.end, "6");
}

#[test]
fn test_save_caption_reloads_and_clears_text() {
    let mut h = Harness::loaded(10);
    h.controller.editor = CaptionEditor {
        start: "5".into(),
        end: "7".into(),
        text: "  hello there  ".into(),
    };
    h.run(Command::SaveCaption);
    h.controller.wait_idle(h.now);

    assert_eq!(
        h.backend.calls()[2..],
        [
            "save upload_0a1b 5-7 hello there".to_string(),
            "captions upload_0a1b".to_string()
        ]
    );
    assert_eq!(
        h.controller.session().captions,
        vec![Caption::new(5, 7, "hello there")]
    );
    assert!(h.controller.editor.text.is_empty());
    assert_eq!(h.controller.editor.start, "5");
}

#[test]
fn test_save_rejects_inverted_range_before_network() {
    let mut h = Harness::loaded(10);
    h.controller.editor = CaptionEditor {
        start: "5".into(),
        end: "3".into(),
        text: "hi".into(),
    };
    let calls_before = h.backend.calls().len();
    h.run(Command::SaveCaption);

    assert_eq!(h.notice().as_deref(), Some("Invalid frame range"));
    assert_eq!(h.backend.calls().len(), calls_before);
    assert!(!h.controller.is_busy());
    assert_eq!(h.controller.editor.text, "hi");
}

#[test]
fn test_save_rejects_blank_text_before_network() {
    let mut h = Harness::loaded(10);
    h.controller.editor = CaptionEditor {
        start: "1".into(),
        end: "2".into(),
        text: " \n\t ".into(),
    };
    let calls_before = h.backend.calls().len();
    h.run(Command::SaveCaption);

    assert_eq!(h.notice().as_deref(), Some("Please enter caption text"));
    assert_eq!(h.backend.calls().len(), calls_before);
}

#[test]
fn test_save_rejects_unparsable_bounds() {
    let mut h = Harness::loaded(10);
    for (start, end) in [("", "2"), ("1", "two"), ("-1", "2")] {
        h.controller.editor = CaptionEditor {
            start: start.into(),
            end: end.into(),
            text: "hi".into(),
        };
        h.run(Command::SaveCaption);
        assert_eq!(h.notice().as_deref(), Some("Invalid frame range"));
        h.controller.dismiss_notice();
    }
    assert!(!h.backend.calls().iter().any(|c| c.starts_with("save")));
}

#[test]
fn test_save_without_video_asks_for_text() {
    let mut h = Harness::new(FakeBackend::with_frames(3));
    h.controller.editor.text = "hello".into();
    h.run(Command::SaveCaption);
    assert_eq!(h.notice().as_deref(), Some("Please enter caption text"));
    assert!(h.backend.calls().is_empty());
}

#[test]
fn test_failed_save_keeps_text_and_cache() {
    let mut h = Harness::loaded(10);
    FakeBackend::fail_with(&h.backend.save_error, "Failed to save caption");
    h.controller.editor = CaptionEditor {
        start: "1".into(),
        end: "2".into(),
        text: "keep me".into(),
    };
    h.run(Command::SaveCaption);
    h.controller.wait_idle(h.now);

    assert_eq!(
        h.notice().as_deref(),
        Some("Error saving caption: Failed to save caption")
    );
    assert_eq!(h.controller.editor.text, "keep me");
    assert!(h.controller.session().captions.is_empty());
}

#[test]
fn test_load_captions_sorts_by_start() {
    let mut h = Harness::loaded(20);
    h.backend
        .captions
        .lock()
        .unwrap()
        .extend([Caption::new(10, 12, "x"), Caption::new(2, 4, "y")]);
    h.run(Command::LoadCaptions);
    h.controller.wait_idle(h.now);

    let starts: Vec<usize> = h
        .controller
        .session()
        .captions
        .iter()
        .map(|c| c.start_frame)
        .collect();
    assert_eq!(starts, vec![2, 10]);
}

#[test]
fn test_load_captions_failure_keeps_cache() {
    let mut h = Harness::loaded(20);
    h.backend.captions.lock().unwrap().push(Caption::new(1, 2, "kept"));
    h.run(Command::LoadCaptions);
    h.controller.wait_idle(h.now);

    FakeBackend::fail_with(&h.backend.captions_error, "Failed to load captions");
    h.run(Command::LoadCaptions);
    h.controller.wait_idle(h.now);

    assert_eq!(h.controller.session().captions, vec![Caption::new(1, 2, "kept")]);
    assert!(h.notice().is_some());
}

#[test]
fn test_captions_for_replaced_video_are_dropped() {
    let mut h = Harness::loaded(20);
    let now = h.now;
    h.controller.apply(
        Outcome::CaptionsLoaded {
            video_id: "upload_old".into(),
            captions: Ok(vec![Caption::new(0, 1, "stale")]),
        },
        now,
    );
    h.controller.apply(
        Outcome::CaptionsLoaded {
            video_id: "upload_old".into(),
            captions: Err(anyhow!("connection reset")),
        },
        now,
    );

    assert!(h.controller.session().captions.is_empty());
    assert!(h.notice().is_none());
}

#[test]
fn test_late_save_for_replaced_video_keeps_editor_text() {
    let mut h = Harness::loaded(20);
    let now = h.now;
    h.controller.editor.text = "typing for the new video".into();
    h.controller.apply(
        Outcome::CaptionSaved {
            video_id: "upload_old".into(),
            captions: Ok(vec![Caption::new(0, 1, "old")]),
        },
        now,
    );

    assert_eq!(h.controller.editor.text, "typing for the new video");
    assert!(h.controller.session().captions.is_empty());
}

#[test]
fn test_edit_caption_seeks_and_fills_editor() {
    let backend = FakeBackend::with_frames(20);
    backend
        .captions
        .lock()
        .unwrap()
        .extend([Caption::new(9, 11, "second"), Caption::new(3, 5, "first")]);
    let mut h = Harness::new(backend);
    let file = h.video_file("clip.mp4");
    h.run(Command::ChooseFile(file));
    h.run(Command::Upload);
    h.controller.wait_idle(h.now);
    h.run(Command::TogglePlayback);

    h.run(Command::EditCaption(1));
    assert!(!h.controller.is_playing());
    assert_eq!(h.index(), 9);
    assert_eq!(
        h.controller.editor,
        CaptionEditor {
            start: "9".into(),
            end: "11".into(),
            text: "second".into(),
        }
    );

    // unknown positions are ignored
    h.run(Command::EditCaption(5));
    assert_eq!(h.index(), 9);
}

// ---- Download ----

#[test]
fn test_download_writes_output_file() {
    let mut h = Harness::loaded(2);
    h.run(Command::Download);
    h.controller.wait_idle(h.now);

    let expected = h.dir.path().join("downloads").join("upload_0a1b_output.mp4");
    assert_eq!(h.controller.last_download(), Some(expected.as_path()));
    assert_eq!(std::fs::read(&expected).unwrap(), b"mp4 bytes");
    assert!(h.controller.notice().is_none());
}

#[test]
fn test_download_without_video_is_noop() {
    let mut h = Harness::new(FakeBackend::with_frames(2));
    h.run(Command::Download);
    assert!(!h.controller.is_busy());
    assert!(h.backend.calls().is_empty());
}

#[test]
fn test_download_failure_is_reported() {
    let mut h = Harness::loaded(2);
    FakeBackend::fail_with(&h.backend.download_error, "Download failed");
    h.run(Command::Download);
    h.controller.wait_idle(h.now);

    assert_eq!(
        h.notice().as_deref(),
        Some("Failed to download video: Download failed")
    );
    assert!(h.controller.last_download().is_none());
}

#[test]
fn test_notices_queue_in_order() {
    let mut h = Harness::new(FakeBackend::with_frames(2));
    h.run(Command::Upload);
    h.run(Command::SaveCaption);
    assert_eq!(h.notice().as_deref(), Some("Please select a video file first"));
    h.controller.dismiss_notice();
    assert_eq!(h.notice().as_deref(), Some("Please enter caption text"));
    h.controller.dismiss_notice();
    assert!(h.notice().is_none());
}
