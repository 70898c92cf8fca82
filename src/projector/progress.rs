//! Progress observers for batch and table projection.
//!
//! Observers only watch; they never influence the projected values. They are
//! shared with Rayon workers, hence `Sync` and `&self` receivers.

use log::info;
use std::sync::atomic::{AtomicUsize, Ordering};

pub trait ProgressObserver: Sync {
    fn on_start(&self, _total: usize) {}

    /// Called once per finished item. `done` counts finished items, in
    /// completion order rather than input order.
    fn on_advance(&self, done: usize, total: usize);

    fn on_finish(&self, _total: usize) {}
}

/// Observer that ignores every notification.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_advance(&self, _done: usize, _total: usize) {}
}

/// Logs completion at every `step_percent` boundary through `log::info!`.
#[derive(Debug)]
pub struct LogProgress {
    label: String,
    step_percent: usize,
    last_step: AtomicUsize,
}

impl LogProgress {
    pub fn new(label: impl Into<String>, step_percent: usize) -> Self {
        Self {
            label: label.into(),
            step_percent: step_percent.clamp(1, 100),
            last_step: AtomicUsize::new(0),
        }
    }

    fn step_of(&self, done: usize, total: usize) -> usize {
        if total == 0 {
            return 0;
        }
        let percent = done.min(total) * 100 / total;
        percent / self.step_percent
    }
}

impl Default for LogProgress {
    fn default() -> Self {
        Self::new("projection", 10)
    }
}

impl ProgressObserver for LogProgress {
    fn on_start(&self, total: usize) {
        self.last_step.store(0, Ordering::Relaxed);
        info!("{}: projecting {} points", self.label, total);
    }

    fn on_advance(&self, done: usize, total: usize) {
        let step = self.step_of(done, total);
        let prev = self.last_step.fetch_max(step, Ordering::Relaxed);
        if step > prev {
            info!(
                "{}: {}% ({}/{})",
                self.label,
                (step * self.step_percent).min(100),
                done,
                total
            );
        }
    }

    fn on_finish(&self, total: usize) {
        info!("{}: done ({} points)", self.label, total);
    }
}

/// Shared completion counter handing out monotonically increasing `done`
/// values to an observer, from any thread.
pub(crate) struct ProgressTicker<'a> {
    observer: &'a dyn ProgressObserver,
    done: AtomicUsize,
    total: usize,
}

impl<'a> ProgressTicker<'a> {
    pub(crate) fn start(observer: &'a dyn ProgressObserver, total: usize) -> Self {
        observer.on_start(total);
        Self {
            observer,
            done: AtomicUsize::new(0),
            total,
        }
    }

    pub(crate) fn tick(&self) {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        self.observer.on_advance(done, self.total);
    }

    pub(crate) fn finish(self) {
        self.observer.on_finish(self.total);
    }
}
