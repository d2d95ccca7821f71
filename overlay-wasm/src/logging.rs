use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;

struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool { metadata.level() <= log::max_level() }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) { return; }
        let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            Level::Info => web_sys::console::info_1(&line),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Routes library logging to the browser console. `level` is a `log` level
/// name (`"debug"`, `"info"`, ..); unknown names mean `info`. Returns false
/// if a logger was already installed.
#[wasm_bindgen]
pub fn init_logging(level: &str) -> bool {
    let filter = level.parse::<LevelFilter>().unwrap_or(LevelFilter::Info);
    let installed = log::set_logger(&LOGGER).is_ok();
    log::set_max_level(filter);
    installed
}
