//! Headless smoke entry point.
//!
//! # Responsibility
//! - Boot the core the way a windowed shell would: context, logging,
//!   settings, auto-save restore.
//! - Honor `STICKYNOTE_LOG` as a log level override.
//! - Print the restored primary note to the terminal.

use log::warn;
use std::process::ExitCode;
use std::sync::Arc;
use stickynote_core::{
    core_version, init_logging, logging_status, AppContext, FallbackSink, LocalClock, LogLevel,
    MessageKind, NoteConfig, NoteId, NoteRenderer, NotificationScheduler, StickyNote,
    StickyNotesApp,
};

const LOG_LEVEL_ENV: &str = "STICKYNOTE_LOG";

struct TerminalRenderer;

impl NoteRenderer for TerminalRenderer {
    fn render(&mut self, note: &StickyNote) {
        println!("note {} background={}", note.id(), note.color());
        for (index, line) in note.content.lines().iter().enumerate() {
            println!("  {}| {line}", index + 1);
        }
    }

    fn dispose(&mut self, id: NoteId) {
        println!("note {id} closed");
    }

    fn show_message(&mut self, kind: MessageKind, title: &str, body: &str) {
        match kind {
            MessageKind::Info => println!("[{title}] {body}"),
            MessageKind::Error => eprintln!("[{title}] {body}"),
        }
    }
}

/// Picks the log level from an optional override, falling back to the build
/// default when it is absent or unsupported.
fn resolve_log_level(value: Option<&str>) -> LogLevel {
    let Some(value) = value else {
        return LogLevel::default_for_build();
    };
    LogLevel::parse(value).unwrap_or_else(|err| {
        eprintln!("ignoring {LOG_LEVEL_ENV}: {err}");
        LogLevel::default_for_build()
    })
}

fn main() -> ExitCode {
    println!("stickynote_core version={}", core_version());

    let context = match AppContext::discover() {
        Ok(context) => context,
        Err(err) => {
            eprintln!("failed to resolve resource directory: {err}");
            return ExitCode::FAILURE;
        }
    };

    let level = resolve_log_level(std::env::var(LOG_LEVEL_ENV).ok().as_deref());
    match init_logging(level, &context.log_dir()) {
        Ok(()) => {
            if let Some((level, dir)) = logging_status() {
                println!("logging level={} dir={}", level.as_str(), dir.display());
            }
        }
        Err(err) => eprintln!("logging disabled: {err}"),
    }

    let config = NoteConfig::load_or_default(context.settings_path()).unwrap_or_else(|err| {
        warn!("event=settings_load module=cli status=fallback error={err}");
        NoteConfig::default()
    });

    let scheduler = NotificationScheduler::new(
        Arc::new(LocalClock),
        Arc::new(FallbackSink::platform_default()),
    );
    let mut app = match StickyNotesApp::new(context, config, scheduler, TerminalRenderer) {
        Ok(app) => app,
        Err(err) => {
            eprintln!("failed to start: {err}");
            return ExitCode::FAILURE;
        }
    };

    match app.start() {
        Ok(_) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("failed to open primary note: {err}");
            ExitCode::FAILURE
        }
    }
}
