//! Progress reporting for long-running key generation.
//!
//! Generators never own a monitor; callers pass `Option<&dyn ProgressMonitor>` and `None`
//! behaves exactly like [`NoProgressMonitor`]. Monitors are shared by all search workers, so
//! `update` can arrive concurrently and out of order. Only `done` is authoritative.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use log::info;

const BAR_BLOCKS: usize = 25;

/// Receives progress notifications from a generator.
pub trait ProgressMonitor: Send + Sync {
    /// Reports that `work` units are complete. Values may be stale or non-monotonic.
    fn update(&self, work: usize);

    /// Marks the task as finished. Calling it more than once has no further effect.
    fn done(&self);
}

/// Monitor that ignores every notification.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgressMonitor;

impl ProgressMonitor for NoProgressMonitor {
    fn update(&self, _work: usize) {}

    fn done(&self) {}
}

static NO_PROGRESS: NoProgressMonitor = NoProgressMonitor;

/// Resolves an optional monitor to a usable reference.
pub(crate) fn or_noop(monitor: Option<&dyn ProgressMonitor>) -> &dyn ProgressMonitor {
    monitor.unwrap_or(&NO_PROGRESS)
}

/// Monitor that renders a textual progress bar through the `log` facade.
///
/// A line is logged each time the completed percentage grows; stale updates from slower
/// workers are dropped.
#[derive(Debug)]
pub struct LogProgressMonitor {
    info: String,
    total: Option<usize>,
    reported: AtomicUsize,
    done: AtomicBool,
}

impl LogProgressMonitor {
    /// Creates a monitor labelled `info`. Without a `total` only completion is reported.
    pub fn new(info: impl Into<String>, total: Option<usize>) -> Self {
        Self {
            info: info.into(),
            total,
            reported: AtomicUsize::new(0),
            done: AtomicBool::new(false),
        }
    }

    /// Highest percentage logged so far.
    pub fn reported_percent(&self) -> usize {
        self.reported.load(Ordering::Acquire)
    }

    /// Whether [`done`](ProgressMonitor::done) has been called.
    pub fn is_done(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }

    fn render(&self, percent: usize) -> String {
        let filled = percent * BAR_BLOCKS / 100;
        let mut bar = String::with_capacity(self.info.len() + BAR_BLOCKS + 8);
        bar.push_str(&self.info);
        bar.push_str(" |");
        bar.extend(std::iter::repeat('#').take(filled));
        bar.extend(std::iter::repeat(' ').take(BAR_BLOCKS - filled));
        bar.push_str(&format!("| {percent}%"));
        bar
    }
}

impl ProgressMonitor for LogProgressMonitor {
    fn update(&self, work: usize) {
        let Some(total) = self.total.filter(|&t| t > 0) else {
            return;
        };
        if self.is_done() {
            return;
        }
        let percent = (work.saturating_mul(100) / total).min(100);
        let previous = self.reported.fetch_max(percent, Ordering::AcqRel);
        if percent > previous {
            info!("{}", self.render(percent));
        }
    }

    fn done(&self) {
        if !self.done.swap(true, Ordering::AcqRel) {
            self.reported.store(100, Ordering::Release);
            info!("{}", self.render(100));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_noop_is_default() {
        let monitor = or_noop(None);
        monitor.update(10);
        monitor.done();
        monitor.done();
    }

    #[test]
    fn test_log_monitor_keeps_highest_percent() {
        let monitor = LogProgressMonitor::new("Generating keys", Some(200));
        monitor.update(100);
        assert_eq!(monitor.reported_percent(), 50);
        monitor.update(20);
        assert_eq!(monitor.reported_percent(), 50);
        monitor.update(1_000);
        assert_eq!(monitor.reported_percent(), 100);
    }

    #[test]
    fn test_log_monitor_done_is_idempotent() {
        let monitor = LogProgressMonitor::new("Generating keys", None);
        monitor.update(5);
        assert_eq!(monitor.reported_percent(), 0);
        monitor.done();
        monitor.done();
        assert!(monitor.is_done());
        assert_eq!(monitor.reported_percent(), 100);
    }

    #[test]
    fn test_render_bar() {
        let monitor = LogProgressMonitor::new("keys", Some(4));
        assert_eq!(monitor.render(0), format!("keys |{}| 0%", " ".repeat(25)));
        assert_eq!(monitor.render(100), format!("keys |{}| 100%", "#".repeat(25)));
    }

    #[test]
    fn test_concurrent_updates() {
        let monitor = LogProgressMonitor::new("keys", Some(1_000));
        std::thread::scope(|scope| {
            for worker in 0..4 {
                let monitor = &monitor;
                scope.spawn(move || {
                    for work in (worker..1_000).step_by(4) {
                        monitor.update(work + 1);
                    }
                });
            }
        });
        assert_eq!(monitor.reported_percent(), 100);
    }
}
