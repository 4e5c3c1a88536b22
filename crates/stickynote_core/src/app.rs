//! Application shell wiring note state to a renderer.
//!
//! # Responsibility
//! - Own the registry, auto-save, reminder scheduler and renderer of one
//!   process.
//! - Translate user actions into core calls and surface each outcome as a
//!   single modal message.
//!
//! # Invariants
//! - Auto-save is restored exactly once, in `start`, before any edit.
//! - Only a successful explicit save of the primary note triggers auto-save.
//! - A failed open never changes the target note.
//! - Closing a note disposes its window and stops its color cycling.

use crate::config::{ConfigError, NoteConfig};
use crate::context::AppContext;
use crate::model::drawing::DrawingSketch;
use crate::model::note::NoteId;
use crate::notify::scheduler::{
    NotificationScheduler, NotificationState, PendingNotification, ScheduleError,
    SCHEDULE_HELP_TEXT,
};
use crate::render::{MessageKind, NoteRenderer};
use crate::service::autosave::AutoSaveService;
use crate::service::registry::{NoteRegistry, RegistryError, SecondaryNote};
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

pub const SAVE_SUCCESS_MESSAGE: &str = "Your notes have been saved successfully!";
pub const RARE_NOTE_TITLE: &str = "Rare Note!";
pub const RARE_NOTE_MESSAGE: &str = "You've discovered a rare color-cycling sticky note!";
pub const ABOUT_TEXT: &str = "Thank you for using Sticky Notes!\n\n\
A minimalist and customizable sticky notes app.\n\
Enjoy your notes in a sleek and intuitive interface.";

/// Application-level failure.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Registry(RegistryError),
    Schedule(ScheduleError),
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Config(err) => write!(f, "{err}"),
            Self::Registry(err) => write!(f, "{err}"),
            Self::Schedule(err) => write!(f, "{err}"),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Config(err) => Some(err),
            Self::Registry(err) => Some(err),
            Self::Schedule(err) => Some(err),
        }
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<RegistryError> for AppError {
    fn from(value: RegistryError) -> Self {
        Self::Registry(value)
    }
}

impl From<ScheduleError> for AppError {
    fn from(value: ScheduleError) -> Self {
        Self::Schedule(value)
    }
}

/// One running sticky-notes process.
pub struct StickyNotesApp<R: NoteRenderer> {
    context: AppContext,
    registry: NoteRegistry,
    autosave: AutoSaveService,
    scheduler: NotificationScheduler,
    renderer: R,
    rng: StdRng,
    pending: Vec<PendingNotification>,
}

impl<R: NoteRenderer> StickyNotesApp<R> {
    /// Wires the shell. No note exists until `start`.
    pub fn new(
        context: AppContext,
        config: NoteConfig,
        scheduler: NotificationScheduler,
        renderer: R,
    ) -> Result<Self, AppError> {
        let autosave = AutoSaveService::new(context.auto_save_path(), config.max_chars);
        let registry = NoteRegistry::new(Arc::new(config))?;
        Ok(Self {
            context,
            registry,
            autosave,
            scheduler,
            renderer,
            rng: StdRng::from_entropy(),
            pending: Vec::new(),
        })
    }

    /// Replaces the random source; used for reproducible runs.
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn context(&self) -> &AppContext {
        &self.context
    }

    pub fn registry(&self) -> &NoteRegistry {
        &self.registry
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Creates the primary note, restores auto-save into it and renders it.
    pub fn start(&mut self) -> Result<NoteId, AppError> {
        let id = self.registry.create_primary(&mut self.rng)?;
        let restored = self.autosave.restore();
        self.registry.load_content(id, restored.lines())?;
        self.render(id)?;
        info!(
            "event=app_ready module=app status=ok restored_lines={}",
            restored.to_persisted().len()
        );
        Ok(id)
    }

    /// Applies one line edit and re-renders the clamped result.
    pub fn edit_line(&mut self, id: NoteId, index: usize, text: &str) -> Result<(), AppError> {
        self.registry.set_line(id, index, text)?;
        self.render(id)
    }

    /// Saves one note to `path`; a primary save also refreshes auto-save.
    pub fn save_note(&mut self, id: NoteId, path: &Path) -> Result<(), AppError> {
        if let Err(err) = self.registry.save_to_file(id, path) {
            self.renderer.show_message(
                MessageKind::Error,
                "Error",
                &format!("Failed to save file: {err}"),
            );
            return Err(err.into());
        }

        if self.registry.is_primary(id) {
            let note = self.registry.note(id)?;
            self.autosave.persist(&note.content);
        }
        self.renderer
            .show_message(MessageKind::Info, "Success", SAVE_SUCCESS_MESSAGE);
        Ok(())
    }

    /// Loads `path` into one note. On failure the note keeps its content.
    pub fn open_note(&mut self, id: NoteId, path: &Path) -> Result<(), AppError> {
        if let Err(err) = self.registry.load_from_file(id, path) {
            self.renderer.show_message(
                MessageKind::Error,
                "Error",
                &format!("Failed to load file: {err}"),
            );
            return Err(err.into());
        }
        self.render(id)
    }

    /// Opens a secondary note, announcing the rare variant once.
    pub fn new_note(&mut self, now: Instant) -> Result<SecondaryNote, AppError> {
        let created = match self.registry.create_secondary(&mut self.rng, now) {
            Ok(created) => created,
            Err(err) => {
                self.renderer
                    .show_message(MessageKind::Error, "Error", &err.to_string());
                return Err(err.into());
            }
        };

        self.render(created.id)?;
        if created.rare_discovered {
            self.renderer
                .show_message(MessageKind::Info, RARE_NOTE_TITLE, RARE_NOTE_MESSAGE);
        }
        Ok(created)
    }

    /// Closes one note window.
    pub fn close_note(&mut self, id: NoteId) -> Result<(), AppError> {
        self.registry.close(id)?;
        self.renderer.dispose(id);
        Ok(())
    }

    /// Schedules a reminder from the notification dialog's fields.
    pub fn schedule_notification(
        &mut self,
        time_of_day: &str,
        message: &str,
    ) -> Result<PendingNotification, AppError> {
        let pending = match self.scheduler.schedule(time_of_day, message) {
            Ok(pending) => pending,
            Err(err) => {
                self.renderer
                    .show_message(MessageKind::Error, "Error", &err.to_string());
                return Err(err.into());
            }
        };

        self.renderer.show_message(
            MessageKind::Info,
            "Success",
            &format!(
                "Notification scheduled for {}",
                pending.fire_at().format("%H:%M")
            ),
        );
        self.pending
            .retain(|existing| existing.state() == NotificationState::Scheduled);
        self.pending.push(pending.clone());
        Ok(pending)
    }

    /// Reminders that have not fired or been cancelled yet.
    pub fn pending_notifications(&self) -> Vec<PendingNotification> {
        self.pending
            .iter()
            .filter(|pending| pending.state() == NotificationState::Scheduled)
            .cloned()
            .collect()
    }

    /// UI-loop tick: advances color cycling and re-renders recolored notes.
    pub fn tick(&mut self, now: Instant) -> Vec<NoteId> {
        let recolored = self.registry.advance_color_cycles(now, &mut self.rng);
        for id in &recolored {
            if let Some(note) = self.registry.get(*id) {
                self.renderer.render(note);
            }
        }
        recolored
    }

    /// Opens a drawing sketch on top of one note.
    pub fn open_drawing(&self, id: NoteId) -> Result<DrawingSketch, AppError> {
        let note = self.registry.note(id)?;
        Ok(DrawingSketch::new(note.color()))
    }

    pub fn show_about(&mut self) {
        self.renderer
            .show_message(MessageKind::Info, "About", ABOUT_TEXT);
    }

    pub fn show_schedule_help(&mut self) {
        self.renderer.show_message(
            MessageKind::Info,
            "Notification Tutorial",
            SCHEDULE_HELP_TEXT,
        );
    }

    fn render(&mut self, id: NoteId) -> Result<(), AppError> {
        let note = self.registry.note(id)?;
        self.renderer.render(note);
        Ok(())
    }
}
