//! Registry of open note windows.
//!
//! # Responsibility
//! - Create the primary note and any number of secondary notes.
//! - Roll the rare variant for secondary notes.
//! - Route per-note edits and explicit file save/open to the right note.
//! - Own the color-cycle timers of rare notes.
//!
//! # Invariants
//! - At most one primary note exists.
//! - Notes share no state; closing one leaves every other note untouched.
//! - A failed file load leaves the target note unchanged.
//! - Closing a note drops its color-cycle timer in the same call.

use crate::codec::PersistFormat;
use crate::config::{ConfigError, NoteConfig};
use crate::model::color::Color;
use crate::model::note::{NoteError, NoteId, StickyNote};
use crate::service::color_cycle::ColorCycle;
use crate::service::note_file::{
    format_for_path, read_note_file, write_note_file, NoteFileError,
};
use log::info;
use rand::seq::SliceRandom;
use rand::Rng;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

/// Odds of a secondary note being the rare variant: 1 in 100.
pub const RARE_NOTE_NUMERATOR: u32 = 1;
pub const RARE_NOTE_DENOMINATOR: u32 = 100;

/// Whether a note is tied to auto-save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteRole {
    Primary,
    Secondary,
}

/// Flavor of a newly created secondary note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteVariant {
    Standard,
    Rare,
}

/// Creation result for a secondary note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecondaryNote {
    pub id: NoteId,
    /// Set when the rare variant was rolled; the caller informs the user once.
    pub rare_discovered: bool,
}

/// Registry errors.
#[derive(Debug)]
pub enum RegistryError {
    NoteNotFound(NoteId),
    PrimaryExists(NoteId),
    SecondaryLimitReached(usize),
    Note(NoteError),
    File(NoteFileError),
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::PrimaryExists(id) => write!(f, "primary note already exists: {id}"),
            Self::SecondaryLimitReached(limit) => {
                write!(f, "cannot open more than {limit} additional notes")
            }
            Self::Note(err) => write!(f, "{err}"),
            Self::File(err) => write!(f, "{err}"),
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Note(err) => Some(err),
            Self::File(err) => Some(err),
            _ => None,
        }
    }
}

impl From<NoteError> for RegistryError {
    fn from(value: NoteError) -> Self {
        Self::Note(value)
    }
}

impl From<NoteFileError> for RegistryError {
    fn from(value: NoteFileError) -> Self {
        Self::File(value)
    }
}

struct OpenNote {
    note: StickyNote,
    role: NoteRole,
    color_cycle: Option<ColorCycle>,
}

/// All open notes of one process.
pub struct NoteRegistry {
    config: Arc<NoteConfig>,
    primary: Option<NoteId>,
    notes: BTreeMap<NoteId, OpenNote>,
}

impl NoteRegistry {
    /// Creates an empty registry.
    ///
    /// # Errors
    /// - Any `ConfigError` from `NoteConfig::validate`.
    pub fn new(config: Arc<NoteConfig>) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            primary: None,
            notes: BTreeMap::new(),
        })
    }

    pub fn config(&self) -> &NoteConfig {
        &self.config
    }

    /// Creates the primary note with a random palette color.
    pub fn create_primary<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<NoteId, RegistryError> {
        if let Some(existing) = self.primary {
            return Err(RegistryError::PrimaryExists(existing));
        }

        let note = StickyNote::new(self.config.max_chars, self.palette_color(rng));
        let id = note.id();
        self.insert(note, NoteRole::Primary, None);
        self.primary = Some(id);
        info!("event=note_create module=registry status=ok role=primary");
        Ok(id)
    }

    /// Rolls the variant of the next secondary note.
    pub fn roll_variant<R: Rng + ?Sized>(rng: &mut R) -> NoteVariant {
        if rng.gen_ratio(RARE_NOTE_NUMERATOR, RARE_NOTE_DENOMINATOR) {
            NoteVariant::Rare
        } else {
            NoteVariant::Standard
        }
    }

    /// Creates an independent secondary note, rolling the rare variant.
    pub fn create_secondary<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
        now: Instant,
    ) -> Result<SecondaryNote, RegistryError> {
        let variant = Self::roll_variant(rng);
        self.create_secondary_as(variant, rng, now)
    }

    /// Creates a secondary note of a fixed variant.
    ///
    /// # Errors
    /// - `SecondaryLimitReached` when `max_secondary_notes` is set and reached.
    pub fn create_secondary_as<R: Rng + ?Sized>(
        &mut self,
        variant: NoteVariant,
        rng: &mut R,
        now: Instant,
    ) -> Result<SecondaryNote, RegistryError> {
        if let Some(limit) = self.config.max_secondary_notes {
            if self.secondary_count() >= limit {
                info!(
                    "event=note_create module=registry status=rejected role=secondary error_code=limit_reached limit={limit}"
                );
                return Err(RegistryError::SecondaryLimitReached(limit));
            }
        }

        let (note, color_cycle) = match variant {
            NoteVariant::Standard => (
                StickyNote::new(self.config.max_chars, self.palette_color(rng)),
                None,
            ),
            NoteVariant::Rare => (
                StickyNote::new_rare(self.config.max_chars),
                Some(ColorCycle::start(now)),
            ),
        };
        let id = note.id();
        let rare_discovered = note.is_rare();
        self.insert(note, NoteRole::Secondary, color_cycle);
        info!(
            "event=note_create module=registry status=ok role=secondary rare={rare_discovered}"
        );

        Ok(SecondaryNote {
            id,
            rare_discovered,
        })
    }

    /// Removes a note and its color-cycle timer.
    pub fn close(&mut self, id: NoteId) -> Result<StickyNote, RegistryError> {
        let open = self
            .notes
            .remove(&id)
            .ok_or(RegistryError::NoteNotFound(id))?;
        if self.primary == Some(id) {
            self.primary = None;
        }
        info!(
            "event=note_close module=registry status=ok role={}",
            role_name(open.role)
        );
        Ok(open.note)
    }

    pub fn get(&self, id: NoteId) -> Option<&StickyNote> {
        self.notes.get(&id).map(|open| &open.note)
    }

    pub fn note(&self, id: NoteId) -> Result<&StickyNote, RegistryError> {
        self.get(id).ok_or(RegistryError::NoteNotFound(id))
    }

    pub fn role(&self, id: NoteId) -> Option<NoteRole> {
        self.notes.get(&id).map(|open| open.role)
    }

    pub fn primary_id(&self) -> Option<NoteId> {
        self.primary
    }

    pub fn is_primary(&self, id: NoteId) -> bool {
        self.primary == Some(id)
    }

    pub fn ids(&self) -> Vec<NoteId> {
        self.notes.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    pub fn secondary_count(&self) -> usize {
        self.notes
            .values()
            .filter(|open| open.role == NoteRole::Secondary)
            .count()
    }

    /// Writes one line of one note.
    pub fn set_line(&mut self, id: NoteId, index: usize, text: &str) -> Result<(), RegistryError> {
        self.note_mut(id)?.content.set_line(index, text)?;
        Ok(())
    }

    /// Replaces one note's content with `load_content` semantics.
    pub fn load_content<S: AsRef<str>>(
        &mut self,
        id: NoteId,
        lines: &[S],
    ) -> Result<(), RegistryError> {
        self.note_mut(id)?.content.load_content(lines);
        Ok(())
    }

    /// Saves one note's content to `path`; format follows the extension.
    ///
    /// Text files always hold all six lines. JSON files omit trailing empty
    /// lines.
    pub fn save_to_file(&self, id: NoteId, path: &Path) -> Result<(), RegistryError> {
        let note = self.note(id)?;
        match format_for_path(path) {
            PersistFormat::Json => write_note_file(path, &note.content.to_persisted())?,
            PersistFormat::Text => write_note_file(path, note.content.lines())?,
        }
        Ok(())
    }

    /// Loads `path` into one note. On error the note is left unchanged.
    pub fn load_from_file(&mut self, id: NoteId, path: &Path) -> Result<(), RegistryError> {
        self.note(id)?;
        let lines = read_note_file(path)?;
        self.load_content(id, &lines)
    }

    /// Advances every due color-cycle timer. Returns the recolored notes.
    pub fn advance_color_cycles<R: Rng + ?Sized>(
        &mut self,
        now: Instant,
        rng: &mut R,
    ) -> Vec<NoteId> {
        let mut recolored = Vec::new();
        for (id, open) in &mut self.notes {
            let Some(cycle) = open.color_cycle.as_mut() else {
                continue;
            };
            if let Some(color) = cycle.poll(now, rng) {
                open.note.set_color(color);
                recolored.push(*id);
            }
        }
        recolored
    }

    /// Whether the note currently owns a running color-cycle timer.
    pub fn has_color_cycle(&self, id: NoteId) -> bool {
        self.notes
            .get(&id)
            .is_some_and(|open| open.color_cycle.is_some())
    }

    fn note_mut(&mut self, id: NoteId) -> Result<&mut StickyNote, RegistryError> {
        self.notes
            .get_mut(&id)
            .map(|open| &mut open.note)
            .ok_or(RegistryError::NoteNotFound(id))
    }

    fn insert(&mut self, note: StickyNote, role: NoteRole, color_cycle: Option<ColorCycle>) {
        self.notes.insert(
            note.id(),
            OpenNote {
                note,
                role,
                color_cycle,
            },
        );
    }

    fn palette_color<R: Rng + ?Sized>(&self, rng: &mut R) -> Color {
        // Palette is validated non-empty in `new`.
        self.config
            .colors
            .choose(rng)
            .copied()
            .unwrap_or(Color::BLACK)
    }
}

fn role_name(role: NoteRole) -> &'static str {
    match role {
        NoteRole::Primary => "primary",
        NoteRole::Secondary => "secondary",
    }
}
