use business::domain::logger::Logger;
use tracing::{debug, error, info, warn};

/// Forwards pipeline log lines to the global `tracing` subscriber.
pub struct TracingLogger;

impl Logger for TracingLogger {
    fn info(&self, message: &str) {
        info!(target: "menu_decoder", "{}", message);
    }
    fn warn(&self, message: &str) {
        warn!(target: "menu_decoder", "{}", message);
    }
    fn error(&self, message: &str) {
        error!(target: "menu_decoder", "{}", message);
    }
    fn debug(&self, message: &str) {
        debug!(target: "menu_decoder", "{}", message);
    }
}
