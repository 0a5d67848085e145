//! `log` backend writing to the browser console.

use log::{LevelFilter, Log, Metadata, Record};

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        #[cfg(target_arch = "wasm32")]
        {
            use log::Level;
            use web_sys::console;
            let msg = wasm_bindgen::JsValue::from_str(&format!(
                "[{}] {}",
                record.target(),
                record.args()
            ));
            match record.level() {
                Level::Error => console::error_1(&msg),
                Level::Warn => console::warn_1(&msg),
                Level::Info => console::info_1(&msg),
                Level::Debug | Level::Trace => console::debug_1(&msg),
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        eprintln!("{:<5} [{}] {}", record.level(), record.target(), record.args());
    }

    fn flush(&self) {}
}

/// Install the console logger at `info`. Later calls are no-ops.
pub fn init() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(LevelFilter::Info);
    }
}
