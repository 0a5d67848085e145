//! Integration tests: saving and restoring the canvas through a store.

use pretty_assertions::assert_eq;
use sketch_core::{Color, Point};
use sketch_editor::{
    DEFAULT_STORAGE_KEY, DrawingSurface, KeyValueStore, LoadOutcome, MemoryStore, PersistError,
    PersistedRecord, PersistenceAdapter, ToolKind,
};

const RED: Color = Color::rgb(220, 20, 60);

fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn painted(width: u32, height: u32) -> DrawingSurface {
    let mut surface = DrawingSurface::new(width, height);
    surface.set_tool(ToolKind::Rectangle);
    surface.set_fill(true);
    surface.set_color(RED);
    surface.begin_gesture(Point::new(0.0, 0.0));
    surface.move_gesture(Point::new(width as f64 / 2.0, height as f64 / 2.0));
    surface.end_gesture();
    surface
}

#[test]
fn save_then_load_same_size_is_exact() {
    init_logger();
    let source = painted(80, 60);
    let mut persist = PersistenceAdapter::new(MemoryStore::new(), DEFAULT_STORAGE_KEY);
    persist.save(&source).unwrap();

    let mut target = DrawingSurface::new(80, 60);
    assert_eq!(persist.load(&mut target), LoadOutcome::Restored);
    assert_eq!(target.bitmap(), source.bitmap());
}

#[test]
fn load_into_larger_canvas_stretches() {
    init_logger();
    let source = painted(40, 40);
    let mut persist = PersistenceAdapter::new(MemoryStore::new(), DEFAULT_STORAGE_KEY);
    persist.save(&source).unwrap();

    let mut target = DrawingSurface::new(80, 120);
    assert_eq!(persist.load(&mut target), LoadOutcome::Restored);
    assert_eq!(target.bitmap().dimensions(), (80, 120));
    // Top-left quarter of the source covers the top-left quarter of the target.
    assert_eq!(target.bitmap().count_color(RED), 40 * 60);
    assert_eq!(target.bitmap().pixel(79, 119), Some(Color::WHITE));
}

#[test]
fn stored_record_matches_wire_format() {
    let source = painted(10, 8);
    let mut persist = PersistenceAdapter::new(MemoryStore::new(), DEFAULT_STORAGE_KEY);
    persist.save(&source).unwrap();

    let raw = persist.store().get("drawingAppCanvas").unwrap().unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["width"], 10);
    assert_eq!(value["height"], 8);
    assert!(
        value["dataURL"]
            .as_str()
            .unwrap()
            .starts_with("data:image/png;base64,")
    );

    let record = PersistedRecord::from_json(&raw).unwrap();
    assert_eq!(&record.decode().unwrap(), source.bitmap());
}

#[test]
fn clearing_storage_blanks_canvas_and_slot() {
    let mut surface = painted(30, 30);
    let mut persist = PersistenceAdapter::new(MemoryStore::new(), DEFAULT_STORAGE_KEY);
    persist.save(&surface).unwrap();

    persist.clear(&mut surface).unwrap();
    assert_eq!(surface.bitmap().count_color(Color::WHITE), 30 * 30);
    assert!(!persist.has_record());

    let mut fresh = DrawingSurface::new(30, 30);
    assert_eq!(persist.load(&mut fresh), LoadOutcome::Missing);
}

#[test]
fn later_load_wins_over_earlier_one() {
    let first = painted(20, 20);
    let second = DrawingSurface::new(20, 20);

    let mut a = PersistenceAdapter::new(MemoryStore::new(), DEFAULT_STORAGE_KEY);
    let mut b = PersistenceAdapter::new(MemoryStore::new(), DEFAULT_STORAGE_KEY);
    a.save(&first).unwrap();
    b.save(&second).unwrap();

    let mut target = DrawingSurface::new(20, 20);
    let older = a.begin_load(&mut target).unwrap();
    let newer = b.begin_load(&mut target).unwrap();
    assert!(older.ticket() < newer.ticket());

    // The newer decode finishes first; the older one must not overwrite it.
    assert_eq!(newer.resolve().apply(&mut target), LoadOutcome::Restored);
    assert_eq!(older.resolve().apply(&mut target), LoadOutcome::Superseded);
    assert_eq!(target.bitmap().count_color(RED), 0);
}

/// A store whose reads always fail, like a browser with storage disabled.
struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>, PersistError> {
        Err(PersistError::Storage("denied".to_string()))
    }

    fn set(&mut self, _key: &str, _value: &str) -> Result<(), PersistError> {
        Err(PersistError::Storage("quota exceeded".to_string()))
    }

    fn remove(&mut self, _key: &str) -> Result<(), PersistError> {
        Ok(())
    }
}

#[test]
fn unavailable_storage_degrades_gracefully() {
    init_logger();
    let mut surface = painted(10, 10);
    let mut persist = PersistenceAdapter::new(BrokenStore, DEFAULT_STORAGE_KEY);

    assert!(matches!(persist.save(&surface), Err(PersistError::Storage(_))));
    assert_eq!(persist.load(&mut surface), LoadOutcome::Missing);
    assert_eq!(surface.bitmap().count_color(RED), 25);
}
