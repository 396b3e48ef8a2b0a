//! Log-backed notifier.
//!
//! Stands in for a push-notification service: every message goes to the
//! log at `info`. Keeps the last message for inspection.

use crate::app::ports::NotifierPort;
use crate::error::NotifyError;

#[derive(Debug, Default)]
pub struct LogNotifier {
    sent: usize,
    last: Option<String>,
}

impl LogNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> usize {
        self.sent
    }

    pub fn last(&self) -> Option<&str> {
        self.last.as_deref()
    }
}

impl NotifierPort for LogNotifier {
    fn send(&mut self, message: &str) -> Result<(), NotifyError> {
        log::info!("NOTIFY | {}", message.replace('\n', " "));
        self.sent += 1;
        self.last = Some(message.to_string());
        Ok(())
    }
}
