// Stderr notifier - Transient user notices printed to the terminal

use tracing::warn;

use crate::ports::*;

/// Notifier writing one line per notice to stderr
#[derive(Debug, Default)]
pub struct StderrNotifier;

impl StderrNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl Notifier for StderrNotifier {
    fn notify(&self, message: &str) {
        warn!(message, "user notice");
        eprintln!("{}", message);
    }
}
