//! Structured logger with dry-run awareness and summary collection.
use std::path::PathBuf;
use std::sync::Mutex;

use super::subscriber::{DRY_RUN_TARGET, STAGE_TARGET};
use super::types::{ResourceEntry, ResourceStatus};

/// Structured logger with dry-run awareness and summary collection.
///
/// Messages go through [`tracing`]; the subscriber installed by
/// [`init_subscriber`](super::subscriber::init_subscriber) decides where
/// they end up.
#[derive(Debug)]
pub struct Logger {
    entries: Mutex<Vec<ResourceEntry>>,
    log_file: Option<PathBuf>,
}

impl Logger {
    /// Create a new logger. `log_file` is only shown in the summary.
    #[must_use]
    pub const fn new(log_file: Option<PathBuf>) -> Self {
        Self {
            entries: Mutex::new(Vec::new()),
            log_file,
        }
    }

    /// Log an error message.
    pub fn error(&self, msg: &str) {
        tracing::error!("{msg}");
    }

    /// Log a warning message.
    pub fn warn(&self, msg: &str) {
        tracing::warn!("{msg}");
    }

    /// Log a stage header (major section).
    pub fn stage(&self, msg: &str) {
        tracing::info!(target: STAGE_TARGET, "{msg}");
    }

    /// Log an informational message.
    pub fn info(&self, msg: &str) {
        tracing::info!("{msg}");
    }

    /// Log a debug message (suppressed on console unless verbose).
    pub fn debug(&self, msg: &str) {
        tracing::debug!("{msg}");
    }

    /// Log a dry-run action message.
    pub fn dry_run(&self, msg: &str) {
        tracing::info!(target: DRY_RUN_TARGET, "{msg}");
    }

    /// Record a resource result for the summary.
    pub fn record(&self, name: &str, status: ResourceStatus, message: Option<&str>) {
        if let Ok(mut guard) = self.entries.lock() {
            guard.push(ResourceEntry {
                name: name.to_string(),
                status,
                message: message.map(String::from),
            });
        }
    }

    /// Return a clone of all recorded entries.
    #[must_use]
    pub fn entries(&self) -> Vec<ResourceEntry> {
        self.entries.lock().map_or_else(|_| vec![], |g| g.clone())
    }

    /// Count the number of failed resources.
    #[must_use]
    pub fn failure_count(&self) -> usize {
        self.entries.lock().map_or(0, |guard| {
            guard
                .iter()
                .filter(|e| e.status == ResourceStatus::Failed)
                .count()
        })
    }

    /// Log the summary of all recorded resources.
    pub fn print_summary(&self) {
        let entries = self.entries();
        if entries.is_empty() {
            return;
        }

        self.stage("Summary");

        let mut ok = 0u32;
        let mut changed = 0u32;
        let mut skipped = 0u32;
        let mut dry_run = 0u32;
        let mut failed = 0u32;

        for entry in &entries {
            let (icon, color) = match entry.status {
                ResourceStatus::Ok => {
                    ok += 1;
                    ("✓", "\x1b[32m")
                }
                ResourceStatus::Changed => {
                    changed += 1;
                    ("+", "\x1b[36m")
                }
                ResourceStatus::Skipped => {
                    skipped += 1;
                    ("○", "\x1b[33m")
                }
                ResourceStatus::DryRun => {
                    dry_run += 1;
                    ("~", "\x1b[37m")
                }
                ResourceStatus::Failed => {
                    failed += 1;
                    ("✗", "\x1b[31m")
                }
            };

            let suffix = entry
                .message
                .as_ref()
                .map_or_else(String::new, |msg| format!(" ({msg})"));

            self.info(&format!("{color}{icon} {}{suffix}\x1b[0m", entry.name));
        }

        let total = ok + changed + skipped + dry_run + failed;
        self.info(&format!(
            "{total} profiles: \x1b[32m{ok} ok\x1b[0m, \x1b[36m{changed} changed\x1b[0m, \x1b[33m{skipped} skipped\x1b[0m, \x1b[37m{dry_run} dry-run\x1b[0m, \x1b[31m{failed} failed\x1b[0m"
        ));

        if let Some(path) = &self.log_file {
            self.info(&format!("\x1b[2mlog: {}\x1b[0m", path.display()));
        }
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn logger_new_is_empty() {
        let log = Logger::new(None);
        assert!(log.entries().is_empty());
        assert_eq!(log.failure_count(), 0);
    }

    #[test]
    fn record_keeps_order_and_message() {
        let log = Logger::new(None);
        log.record("com.example.a (system)", ResourceStatus::Ok, None);
        log.record(
            "com.example.b (user alice)",
            ResourceStatus::Skipped,
            Some("profile is not present"),
        );

        let entries = log.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].status, ResourceStatus::Ok);
        assert_eq!(entries[1].message.as_deref(), Some("profile is not present"));
    }

    #[test]
    fn failure_count_counts_only_failures() {
        let log = Logger::new(None);
        log.record("a", ResourceStatus::Failed, Some("boom"));
        log.record("b", ResourceStatus::Changed, None);
        log.record("c", ResourceStatus::Failed, None);
        assert_eq!(log.failure_count(), 2);
    }

    #[test]
    fn print_summary_with_entries_does_not_panic() {
        let log = Logger::new(Some(PathBuf::from("/tmp/apply.log")));
        log.record("a", ResourceStatus::DryRun, None);
        log.print_summary();
    }
}
