use chrono::{NaiveDate, NaiveDateTime};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use stickynote_core::app::{RARE_NOTE_TITLE, SAVE_SUCCESS_MESSAGE};
use stickynote_core::{
    decode, AppContext, AppError, Clock, Color, ConsoleSink, MessageKind, NoteConfig, NoteId,
    NoteRenderer, NotificationScheduler, PersistFormat, RegistryError, ScheduleError,
    StickyNote, StickyNotesApp,
};

#[derive(Default)]
struct RecordingRenderer {
    rendered: Vec<(NoteId, Vec<String>, Color)>,
    disposed: Vec<NoteId>,
    messages: Vec<(MessageKind, String, String)>,
}

impl RecordingRenderer {
    fn last_message(&self) -> &(MessageKind, String, String) {
        self.messages.last().expect("a message should have been shown")
    }
}

impl NoteRenderer for RecordingRenderer {
    fn render(&mut self, note: &StickyNote) {
        self.rendered
            .push((note.id(), note.content.get_content(), note.color()));
    }

    fn dispose(&mut self, id: NoteId) {
        self.disposed.push(id);
    }

    fn show_message(&mut self, kind: MessageKind, title: &str, body: &str) {
        self.messages.push((kind, title.to_string(), body.to_string()));
    }
}

struct FixedClock(NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}

fn build_app(resource_dir: &Path, config: NoteConfig) -> StickyNotesApp<RecordingRenderer> {
    let now = NaiveDate::from_ymd_opt(2026, 5, 20)
        .unwrap()
        .and_hms_opt(10, 0, 0)
        .unwrap();
    let scheduler = NotificationScheduler::new(Arc::new(FixedClock(now)), Arc::new(ConsoleSink));
    let context = AppContext::new(resource_dir).unwrap();
    StickyNotesApp::new(context, config, scheduler, RecordingRenderer::default())
        .unwrap()
        .with_rng(StdRng::seed_from_u64(99))
}

#[test]
fn saving_primary_note_writes_file_and_auto_save() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = build_app(dir.path(), NoteConfig::default());
    let primary = app.start().unwrap();

    app.edit_line(primary, 0, "milk").unwrap();
    app.edit_line(primary, 1, "eggs").unwrap();

    let notes_path = dir.path().join("notes.json");
    app.save_note(primary, &notes_path).unwrap();

    let written = std::fs::read_to_string(&notes_path).unwrap();
    assert_eq!(written, r#"{"content":["milk","eggs"]}"#);
    assert_eq!(
        decode(written.as_bytes(), PersistFormat::Json).unwrap(),
        vec!["milk", "eggs"]
    );
    assert_eq!(
        std::fs::read_to_string(app.context().auto_save_path()).unwrap(),
        written
    );
    assert_eq!(
        app.renderer().last_message(),
        &(
            MessageKind::Info,
            "Success".to_string(),
            SAVE_SUCCESS_MESSAGE.to_string()
        )
    );
}

#[test]
fn next_launch_restores_primary_from_auto_save() {
    let dir = tempfile::tempdir().unwrap();
    {
        let mut app = build_app(dir.path(), NoteConfig::default());
        let primary = app.start().unwrap();
        app.edit_line(primary, 2, "call the bank").unwrap();
        app.save_note(primary, &dir.path().join("notes.txt")).unwrap();
    }

    let mut app = build_app(dir.path(), NoteConfig::default());
    let primary = app.start().unwrap();
    let note = app.registry().note(primary).unwrap();
    assert_eq!(
        note.content.get_content(),
        vec!["", "", "call the bank", "", "", ""]
    );
    assert_eq!(app.renderer().rendered.len(), 1);
}

#[test]
fn start_with_corrupted_auto_save_yields_empty_primary() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("auto_save.json"), "{not json").unwrap();

    let mut app = build_app(dir.path(), NoteConfig::default());
    let primary = app.start().unwrap();
    assert!(app.registry().note(primary).unwrap().content.is_empty());
    assert!(app.renderer().messages.is_empty());
}

#[test]
fn saving_secondary_note_does_not_touch_auto_save() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = build_app(dir.path(), NoteConfig::default());
    app.start().unwrap();
    let secondary = app.new_note(Instant::now()).unwrap();

    app.edit_line(secondary.id, 0, "scratch").unwrap();
    app.save_note(secondary.id, &dir.path().join("scratch.txt"))
        .unwrap();

    assert_eq!(
        std::fs::read_to_string(dir.path().join("scratch.txt")).unwrap(),
        "scratch\n\n\n\n\n"
    );
    assert!(!app.context().auto_save_path().exists());
}

#[test]
fn failed_open_reports_error_and_keeps_content() {
    let dir = tempfile::tempdir().unwrap();
    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "plain text, not json").unwrap();

    let mut app = build_app(dir.path(), NoteConfig::default());
    let primary = app.start().unwrap();
    app.edit_line(primary, 0, "precious").unwrap();

    let err = app.open_note(primary, &bad).unwrap_err();
    assert!(matches!(err, AppError::Registry(RegistryError::File(_))));
    assert_eq!(
        app.registry().note(primary).unwrap().content.line(0).unwrap(),
        "precious"
    );
    let (kind, title, body) = app.renderer().last_message();
    assert_eq!(*kind, MessageKind::Error);
    assert_eq!(title, "Error");
    assert!(body.starts_with("Failed to load file"));
}

#[test]
fn open_text_file_replaces_content_and_renders() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("todo.txt");
    std::fs::write(&path, "  one  \ntwo\nthree\nfour\nfive\nsix\nseven").unwrap();

    let mut app = build_app(dir.path(), NoteConfig::default());
    let primary = app.start().unwrap();
    app.open_note(primary, &path).unwrap();

    let (id, lines, _) = app.renderer().rendered.last().unwrap();
    assert_eq!(*id, primary);
    assert_eq!(lines, &vec!["one", "two", "three", "four", "five", "six"]);
}

#[test]
fn edits_are_clamped_before_rendering() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = build_app(
        dir.path(),
        NoteConfig {
            max_chars: 4,
            ..NoteConfig::default()
        },
    );
    let primary = app.start().unwrap();
    app.edit_line(primary, 0, "abcdefgh").unwrap();

    let (_, lines, _) = app.renderer().rendered.last().unwrap();
    assert_eq!(lines[0], "abcd");
    assert!(matches!(
        app.edit_line(primary, 6, "x").unwrap_err(),
        AppError::Registry(RegistryError::Note(_))
    ));
}

#[test]
fn rare_note_is_announced_once_and_recolored_on_tick() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = build_app(dir.path(), NoteConfig::default());
    app.start().unwrap();

    let start = Instant::now();
    let mut rare = None;
    for _ in 0..2_000 {
        let created = app.new_note(start).unwrap();
        if created.rare_discovered {
            rare = Some(created.id);
            break;
        }
    }
    let rare = rare.expect("a rare note should appear within 2000 notes");

    let announcements = app
        .renderer()
        .messages
        .iter()
        .filter(|(_, title, _)| title == RARE_NOTE_TITLE)
        .count();
    assert_eq!(announcements, 1);
    assert_eq!(app.registry().note(rare).unwrap().color(), Color::BLACK);

    assert_eq!(app.tick(start), vec![rare]);
    let (id, _, color) = app.renderer().rendered.last().unwrap();
    assert_eq!(*id, rare);
    assert_ne!(*color, Color::BLACK);

    app.close_note(rare).unwrap();
    assert_eq!(app.renderer().disposed, vec![rare]);
    assert!(app.tick(start + Duration::from_secs(1)).is_empty());
}

#[test]
fn secondary_cap_surfaces_an_error_message() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = build_app(
        dir.path(),
        NoteConfig {
            max_secondary_notes: Some(0),
            ..NoteConfig::default()
        },
    );
    app.start().unwrap();

    let err = app.new_note(Instant::now()).unwrap_err();
    assert!(matches!(
        err,
        AppError::Registry(RegistryError::SecondaryLimitReached(0))
    ));
    assert_eq!(app.renderer().last_message().0, MessageKind::Error);
}

#[test]
fn scheduling_reports_fire_time_or_format_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = build_app(dir.path(), NoteConfig::default());
    app.start().unwrap();

    let pending = app.schedule_notification("09:30", "").unwrap();
    assert_eq!(
        pending.fire_at().date(),
        NaiveDate::from_ymd_opt(2026, 5, 21).unwrap()
    );
    assert_eq!(
        app.renderer().last_message().2,
        "Notification scheduled for 09:30"
    );
    assert_eq!(app.pending_notifications().len(), 1);
    assert!(pending.cancel());
    assert!(app.pending_notifications().is_empty());

    let err = app.schedule_notification("9:30pm", "x").unwrap_err();
    assert!(matches!(
        err,
        AppError::Schedule(ScheduleError::InvalidTimeFormat(_))
    ));
    assert_eq!(app.renderer().last_message().0, MessageKind::Error);
}

#[test]
fn drawing_sketch_inherits_note_color() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = build_app(dir.path(), NoteConfig::default());
    let primary = app.start().unwrap();

    let sketch = app.open_drawing(primary).unwrap();
    assert_eq!(
        sketch.background(),
        app.registry().note(primary).unwrap().color()
    );
    assert!(sketch.segments().is_empty());
}

#[test]
fn closing_primary_disposes_its_window() {
    let dir = tempfile::tempdir().unwrap();
    let mut app = build_app(dir.path(), NoteConfig::default());
    let primary = app.start().unwrap();
    let secondary = app.new_note(Instant::now()).unwrap();

    app.close_note(primary).unwrap();
    assert_eq!(app.registry().primary_id(), None);
    assert!(app.registry().get(secondary.id).is_some());
    assert_eq!(app.renderer().disposed, vec![primary]);
}
