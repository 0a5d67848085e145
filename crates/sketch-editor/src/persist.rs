//! Persistence of the canvas to a string key-value store.
//!
//! One slot holds a JSON record:
//!
//! ```json
//! {"dataURL":"data:image/png;base64,...","width":800,"height":600}
//! ```
//!
//! Loading is split in two so hosts can decode off the input path:
//! `begin_load` reads the slot and takes a restore ticket, `PendingLoad::resolve`
//! decodes, and `DecodedLoad::apply` lands the result only if nothing newer
//! happened on the surface in between.

use crate::restore::RestoreTicket;
use crate::surface::DrawingSurface;
use serde::{Deserialize, Serialize};
use sketch_core::{Bitmap, CodecError, ImageFormat, decode_data_url, encode_data_url};
use std::collections::HashMap;
use thiserror::Error;

pub const DEFAULT_STORAGE_KEY: &str = "drawingAppCanvas";

#[derive(Debug, Error)]
pub enum PersistError {
    #[error("storage unavailable: {0}")]
    Storage(String),
    #[error("malformed record: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Minimal string store, shaped like browser `localStorage`.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError>;
    fn remove(&mut self, key: &str) -> Result<(), PersistError>;
}

/// In-process store for native hosts and tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), PersistError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistError> {
        self.entries.remove(key);
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedRecord {
    #[serde(rename = "dataURL")]
    pub data_url: String,
    pub width: u32,
    pub height: u32,
}

impl PersistedRecord {
    /// Encode the surface as a PNG record.
    pub fn capture(surface: &DrawingSurface) -> Result<Self, CodecError> {
        Ok(Self {
            data_url: encode_data_url(surface.bitmap(), ImageFormat::Png)?,
            width: surface.width(),
            height: surface.height(),
        })
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Decode the image. The decoded dimensions win over the recorded ones.
    pub fn decode(&self) -> Result<Bitmap, CodecError> {
        let bitmap = decode_data_url(&self.data_url)?;
        if bitmap.dimensions() != (self.width, self.height) {
            log::warn!(
                "record says {}x{}, image is {}x{}",
                self.width,
                self.height,
                bitmap.width(),
                bitmap.height()
            );
        }
        Ok(bitmap)
    }
}

/// What a load did to the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Nothing stored; the surface is untouched.
    Missing,
    /// The stored image now covers the canvas.
    Restored,
    /// The record was unusable; the canvas was reset to the background.
    Reset,
    /// A newer change landed first; the result was dropped.
    Superseded,
}

/// A record read from the store, not yet decoded.
#[derive(Debug)]
pub struct PendingLoad {
    ticket: RestoreTicket,
    raw: String,
}

impl PendingLoad {
    pub fn ticket(&self) -> RestoreTicket {
        self.ticket
    }

    /// Parse and decode. Pure; touches no surface.
    pub fn resolve(self) -> DecodedLoad {
        let result = PersistedRecord::from_json(&self.raw)
            .map_err(PersistError::from)
            .and_then(|record| record.decode().map_err(PersistError::from));
        DecodedLoad {
            ticket: self.ticket,
            result,
        }
    }
}

#[derive(Debug)]
pub struct DecodedLoad {
    ticket: RestoreTicket,
    result: Result<Bitmap, PersistError>,
}

impl DecodedLoad {
    pub fn apply(self, surface: &mut DrawingSurface) -> LoadOutcome {
        match self.result {
            Ok(bitmap) => {
                if surface.finish_restore(self.ticket, bitmap) {
                    LoadOutcome::Restored
                } else {
                    LoadOutcome::Superseded
                }
            }
            Err(err) => {
                log::warn!("discarding stored canvas: {err}");
                if surface.fail_restore(self.ticket) {
                    LoadOutcome::Reset
                } else {
                    LoadOutcome::Superseded
                }
            }
        }
    }
}

/// Saves and restores one surface under one key.
pub struct PersistenceAdapter<S: KeyValueStore> {
    store: S,
    key: String,
}

impl<S: KeyValueStore> PersistenceAdapter<S> {
    pub fn new(store: S, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Write the surface to the slot, replacing any previous record.
    pub fn save(&mut self, surface: &DrawingSurface) -> Result<(), PersistError> {
        let json = PersistedRecord::capture(surface)?.to_json()?;
        self.store.set(&self.key, &json)?;
        log::debug!("saved {}x{} canvas to {:?}", surface.width(), surface.height(), self.key);
        Ok(())
    }

    pub fn has_record(&self) -> bool {
        matches!(self.store.get(&self.key), Ok(Some(_)))
    }

    /// Read the slot and take a restore ticket. `None` when nothing is
    /// stored; a failing store counts as empty.
    pub fn begin_load(&self, surface: &mut DrawingSurface) -> Option<PendingLoad> {
        let raw = match self.store.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(err) => {
                log::warn!("reading {:?} failed: {err}", self.key);
                return None;
            }
        };
        Some(PendingLoad {
            ticket: surface.begin_restore(),
            raw,
        })
    }

    /// Load and apply in one step.
    pub fn load(&self, surface: &mut DrawingSurface) -> LoadOutcome {
        match self.begin_load(surface) {
            Some(pending) => pending.resolve().apply(surface),
            None => LoadOutcome::Missing,
        }
    }

    /// Blank the surface and delete the slot.
    pub fn clear(&mut self, surface: &mut DrawingSurface) -> Result<(), PersistError> {
        surface.reset_to_background();
        self.store.remove(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use sketch_core::{Color, Point};

    fn adapter() -> PersistenceAdapter<MemoryStore> {
        PersistenceAdapter::new(MemoryStore::new(), DEFAULT_STORAGE_KEY)
    }

    #[test]
    fn record_uses_data_url_field_name() {
        let record = PersistedRecord {
            data_url: "data:image/png;base64,AA==".to_string(),
            width: 3,
            height: 4,
        };
        assert_eq!(
            record.to_json().unwrap(),
            r#"{"dataURL":"data:image/png;base64,AA==","width":3,"height":4}"#
        );
    }

    #[test]
    fn missing_slot_leaves_surface_alone() {
        let mut surface = DrawingSurface::new(10, 10);
        assert_eq!(adapter().load(&mut surface), LoadOutcome::Missing);
        assert!(!surface.has_pending_restore());
    }

    #[test]
    fn corrupt_record_resets_canvas() {
        let mut persist = adapter();
        persist
            .store_mut()
            .set(DEFAULT_STORAGE_KEY, "{not json")
            .unwrap();
        let mut surface = DrawingSurface::new(10, 10);
        surface.set_color(Color::BLACK);
        surface.begin_gesture(Point::new(0.0, 5.0));
        surface.move_gesture(Point::new(10.0, 5.0));
        surface.end_gesture();

        assert_eq!(persist.load(&mut surface), LoadOutcome::Reset);
        assert_eq!(surface.bitmap().count_color(Color::WHITE), 100);
    }

    #[test]
    fn bad_image_payload_resets_canvas() {
        let mut persist = adapter();
        let json = r#"{"dataURL":"data:image/png;base64,AAAA","width":10,"height":10}"#;
        persist.store_mut().set(DEFAULT_STORAGE_KEY, json).unwrap();
        let mut surface = DrawingSurface::new(10, 10);
        assert_eq!(persist.load(&mut surface), LoadOutcome::Reset);
    }

    #[test]
    fn decode_after_new_gesture_is_superseded() {
        let mut persist = adapter();
        let saved = DrawingSurface::with_config(
            10,
            10,
            crate::SurfaceConfig {
                background: Color::BLACK,
                ..Default::default()
            },
        );
        persist.save(&saved).unwrap();

        let mut surface = DrawingSurface::new(10, 10);
        let pending = persist.begin_load(&mut surface).unwrap();
        surface.begin_gesture(Point::new(1.0, 1.0));
        surface.end_gesture();

        assert_eq!(pending.resolve().apply(&mut surface), LoadOutcome::Superseded);
        assert_eq!(surface.bitmap().count_color(Color::BLACK), 0);
    }

    #[test]
    fn clear_during_gesture_does_not_bring_drawing_back() {
        let red = Color::rgb(255, 0, 0);
        let mut persist = adapter();
        let mut surface = DrawingSurface::new(40, 40);
        surface.set_tool(crate::ToolKind::Rectangle);
        surface.set_fill(true);
        surface.set_color(red);
        surface.begin_gesture(Point::new(0.0, 0.0));
        surface.move_gesture(Point::new(40.0, 40.0));
        surface.end_gesture();
        assert_eq!(surface.bitmap().count_color(red), 40 * 40);

        surface.set_tool(crate::ToolKind::Line);
        surface.begin_gesture(Point::new(1.0, 1.0));
        persist.clear(&mut surface).unwrap();
        assert!(!surface.is_drawing());

        surface.move_gesture(Point::new(1.0, 20.0));
        assert_eq!(surface.bitmap().count_color(red), 0);
    }

    #[test]
    fn clear_removes_slot() {
        let mut persist = adapter();
        let mut surface = DrawingSurface::new(4, 4);
        persist.save(&surface).unwrap();
        assert!(persist.has_record());
        persist.clear(&mut surface).unwrap();
        assert!(!persist.has_record());
    }
}
