//! Per-task health tracking and panic logging.
//!
//! Every controller task owns one entry in [`TaskHealth`], keyed by its
//! name. A failed cycle sets the entry's error indicator and bumps its
//! failure counter; the next successful cycle clears the indicator. The
//! number of tasks currently in error is what a status display would show.

use serde::Serialize;

/// Capacity of the health table. Power of two for the FNV index map.
const MAX_TASKS: usize = 16;

/// Health of a single task.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TaskStatus {
    /// The most recent cycle failed.
    pub faulted: bool,
    /// Failed cycles since startup.
    pub failures: u32,
    /// Successful cycles since startup.
    pub successes: u32,
}

/// Error indicators for all tasks.
#[derive(Debug, Default)]
pub struct TaskHealth {
    tasks: heapless::FnvIndexMap<&'static str, TaskStatus, MAX_TASKS>,
}

impl TaskHealth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the task's latest cycle as failed.
    pub fn record_failure(&mut self, task: &'static str) {
        if let Some(status) = self.entry(task) {
            if !status.faulted {
                log::warn!("Task '{}' entered error state", task);
            }
            status.faulted = true;
            status.failures = status.failures.saturating_add(1);
        }
    }

    /// Mark the task's latest cycle as successful, clearing its indicator.
    pub fn record_success(&mut self, task: &'static str) {
        if let Some(status) = self.entry(task) {
            if status.faulted {
                log::info!("Task '{}' recovered", task);
            }
            status.faulted = false;
            status.successes = status.successes.saturating_add(1);
        }
    }

    pub fn is_faulted(&self, task: &str) -> bool {
        self.tasks.get(task).is_some_and(|s| s.faulted)
    }

    pub fn failure_count(&self, task: &str) -> u32 {
        self.tasks.get(task).map_or(0, |s| s.failures)
    }

    pub fn status(&self, task: &str) -> Option<TaskStatus> {
        self.tasks.get(task).copied()
    }

    /// Number of tasks whose latest cycle failed.
    pub fn faulted_count(&self) -> usize {
        self.tasks.values().filter(|s| s.faulted).count()
    }

    pub fn any_faulted(&self) -> bool {
        self.faulted_count() > 0
    }

    /// Iterate `(task, status)` in first-seen order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, TaskStatus)> + '_ {
        self.tasks.iter().map(|(k, v)| (*k, *v))
    }

    fn entry(&mut self, task: &'static str) -> Option<&mut TaskStatus> {
        if !self.tasks.contains_key(task) && self.tasks.insert(task, TaskStatus::default()).is_err()
        {
            log::error!("Health table full, '{}' not tracked", task);
            return None;
        }
        self.tasks.get_mut(task)
    }
}

// ───────────────────────────────────────────────────────────────
// Custom panic handler
// ───────────────────────────────────────────────────────────────

/// Install a panic hook that logs the panic reason before the default
/// handler runs.
///
/// Call once during startup, after logging is initialised.
pub fn install_panic_handler() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let reason = if let Some(msg) = info.payload().downcast_ref::<&str>() {
            *msg
        } else if let Some(msg) = info.payload().downcast_ref::<String>() {
            msg.as_str()
        } else {
            "unknown panic"
        };

        match info.location() {
            Some(loc) => log::error!("PANIC: {} at {}:{}", reason, loc.file(), loc.line()),
            None => log::error!("PANIC: {}", reason),
        }
        default_hook(info);
    }));
}
