//! Console logging for the browser build.

use log::info;
use once_cell::sync::OnceCell;

use crate::config::LOG_LEVEL;

static INIT: OnceCell<()> = OnceCell::new();

/// Route `log` records and panics to the browser console. Safe to call more
/// than once.
pub fn init() {
    INIT.get_or_init(|| {
        console_error_panic_hook::set_once();
        wasm_logger::init(wasm_logger::Config::new(LOG_LEVEL));
        info!("Logging initialized at {}", LOG_LEVEL);
    });
}
