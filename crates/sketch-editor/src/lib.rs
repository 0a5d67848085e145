pub mod config;
pub mod export;
pub mod history;
pub mod input;
pub mod persist;
pub mod restore;
pub mod shortcuts;
pub mod surface;
pub mod tools;

pub use config::SurfaceConfig;
pub use export::{Export, ExportRequest};
pub use history::HistoryStack;
pub use input::{InputEvent, Modifiers};
pub use persist::{
    DEFAULT_STORAGE_KEY, KeyValueStore, LoadOutcome, MemoryStore, PersistError,
    PersistedRecord, PersistenceAdapter,
};
pub use restore::{RestoreSequencer, RestoreTicket};
pub use shortcuts::{ShortcutAction, ShortcutMap};
pub use surface::DrawingSurface;
pub use tools::{ToolConfig, ToolKind};
