//! Core domain logic for the sticky-notes widget.
//! Widgets, dialogs and OS notification delivery stay outside this crate.

pub mod app;
pub mod codec;
pub mod config;
pub mod context;
pub mod logging;
pub mod model;
pub mod notify;
pub mod render;
pub mod service;

pub use app::{AppError, StickyNotesApp};
pub use codec::{decode, encode, DecodeError, PersistFormat, PersistedNote};
pub use config::{ConfigError, NoteConfig};
pub use context::{AppContext, ContextError};
pub use logging::{init_logging, logging_status, LogLevel, LoggingError};
pub use model::color::Color;
pub use model::drawing::{DrawingSketch, Point, Segment};
pub use model::note::{NoteContent, NoteError, NoteId, StickyNote, NOTE_LINE_COUNT};
pub use notify::scheduler::{
    Clock, LocalClock, NotificationScheduler, NotificationState, PendingNotification,
    ScheduleError, ScheduledNotification,
};
pub use notify::sink::{ConsoleSink, DesktopCommandSink, FallbackSink, NotificationSink, SinkError};
pub use render::{MessageKind, NoteRenderer};
pub use service::autosave::AutoSaveService;
pub use service::note_file::{format_for_path, NoteFileError};
pub use service::registry::{NoteRegistry, NoteRole, NoteVariant, RegistryError, SecondaryNote};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
